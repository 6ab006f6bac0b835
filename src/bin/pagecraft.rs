use env_logger::Env;
use pagecraft_html::{export_page, parse_page, ExportSettings, Page, PageError, TemplateCatalog};
use std::env;
use std::fs;
use std::process;

fn usage() {
    eprintln!("Usage: pagecraft <command> <file>...");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  render <page.yaml> [settings.yaml]  Sentinel-wrapped markup");
    eprintln!("  export <page.yaml> [settings.yaml]  Full export document");
    eprintln!("  import <file.html>                  Parsed page as YAML");
    eprintln!("  check <page.yaml>...                Report UTM problems");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  pagecraft import landing.html > landing.yaml");
    eprintln!("  pagecraft export landing.yaml settings.yaml > landing.html");
}

fn main() {
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        usage();
        process::exit(1);
    }

    let command = args[1].as_str();
    let files = &args[2..];

    let result = match command {
        "render" => render(&files[0], files.get(1).map(String::as_str)),
        "export" => export(&files[0], files.get(1).map(String::as_str)),
        "import" => import(&files[0]),
        "check" => {
            process::exit(check(files));
        }
        other => {
            eprintln!("Unknown command '{}'", other);
            usage();
            process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("✗ {}", e);
        process::exit(1);
    }
}

fn render(path: &str, settings_path: Option<&str>) -> Result<(), PageError> {
    let page = Page::load(path)?;
    let settings = ExportSettings::load_or_default(settings_path)?;
    println!("{}", page.render(&TemplateCatalog::new(settings.render_options())));
    Ok(())
}

fn export(path: &str, settings_path: Option<&str>) -> Result<(), PageError> {
    let page = Page::load(path)?;
    let settings = ExportSettings::load_or_default(settings_path)?;
    println!("{}", export_page(&page, &settings));
    Ok(())
}

fn import(path: &str) -> Result<(), PageError> {
    let html = fs::read_to_string(path)?;
    let page = parse_page(&html, &TemplateCatalog::standard());
    log::info!("{}: {} components", path, page.len());
    print!("{}", page.to_yaml_string()?);
    Ok(())
}

/// Returns the process exit code.
fn check(files: &[String]) -> i32 {
    let mut exit_code = 0;

    for path in files {
        match Page::load(path) {
            Ok(page) => {
                let warnings = page.utm_warnings();
                if warnings.is_empty() {
                    println!("✓ {} ({} components)", path, page.len());
                } else {
                    eprintln!("✗ {} has UTM problems:", path);
                    for warning in warnings {
                        eprintln!("    {}", warning);
                    }
                    exit_code = 1;
                }
            }
            Err(e) => {
                eprintln!("✗ {} could not be loaded:", path);
                eprintln!("    {}", e);
                exit_code = 1;
            }
        }
    }

    exit_code
}
