use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::catalog::{RenderOptions, DEFAULT_CURRENCY};
use crate::error::PageResult;
use crate::export::AssetManifest;

/// Product search credentials embedded in the client script
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    pub app_id: String,
    pub api_search_key: String,
    pub index_name: String,
}

/// Export and rendering settings, typically read from a YAML file.
///
/// ```yaml
/// currency: EGP
/// search:
///   app_id: APP123
///   api_search_key: "..."
///   index_name: prod_en
/// inline_css: |
///   .hero-banner-title { letter-spacing: 0; }
/// ```
///
/// Every key is optional; `assets` defaults to the standard manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    pub currency: String,
    pub search: SearchSettings,
    pub assets: AssetManifest,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub inline_css: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub inline_js: String,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            currency: DEFAULT_CURRENCY.to_string(),
            search: SearchSettings::default(),
            assets: AssetManifest::default(),
            inline_css: String::new(),
            inline_js: String::new(),
        }
    }
}

impl ExportSettings {
    pub fn from_yaml_str(yaml: &str) -> PageResult<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn load(path: impl AsRef<Path>) -> PageResult<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    /// Settings from `path`, or the defaults when no file is given.
    pub fn load_or_default(path: Option<impl AsRef<Path>>) -> PageResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn render_options(&self) -> RenderOptions {
        let currency = self.currency.trim();
        RenderOptions {
            currency: if currency.is_empty() {
                DEFAULT_CURRENCY.to_string()
            } else {
                currency.to_string()
            },
        }
    }
}
