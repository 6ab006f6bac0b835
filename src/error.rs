use thiserror::Error;

pub type PageResult<T> = Result<T, PageError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PageError {
    #[error("Component '{id}' not found on this page")]
    ComponentNotFound { id: String },

    #[error("Index {index} is out of range for a page of {len} components")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("No components found in the supplied markup")]
    NoComponentsFound,

    #[error("Unknown component type '{tag}'")]
    UnknownComponentType { tag: String },

    #[error("Invalid config for '{kind}': {reason}")]
    InvalidConfig { kind: String, reason: String },

    #[error("Asset '{id}' is already part of the manifest")]
    DuplicateAsset { id: String },

    #[error("Asset '{id}' is not part of the manifest")]
    AssetNotFound { id: String },

    #[error("YAML error: {0}")]
    Yaml(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl From<serde_yaml::Error> for PageError {
    fn from(err: serde_yaml::Error) -> Self {
        PageError::Yaml(err.to_string())
    }
}

impl From<std::io::Error> for PageError {
    fn from(err: std::io::Error) -> Self {
        PageError::Io(err.to_string())
    }
}
