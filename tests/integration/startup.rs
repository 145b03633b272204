use freely_templates::config::{Config, ServerConfig};
use freely_templates::core::StartupError;
use freely_templates::templating::{FunctionLibrary, TemplateRegistry};
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

use super::unpacked_bundle;

fn init(config: &Config) -> Result<TemplateRegistry, StartupError> {
    TemplateRegistry::init(config, Arc::new(FunctionLibrary::default()))
}

#[test]
fn test_missing_templates_directory() {
    let dir = TempDir::new().unwrap();
    let err = init(&Config::with_root(dir.path())).unwrap_err();

    match &err {
        StartupError::MissingDirectory { kind, path } => {
            assert_eq!(*kind, "templates");
            assert_eq!(path, &dir.path().join("templates"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().contains("does not exist, should have been at"));
}

#[test]
fn test_missing_pages_directory() {
    let dir = unpacked_bundle();
    fs::remove_dir_all(dir.path().join("pages")).unwrap();

    let err = init(&Config::with_root(dir.path())).unwrap_err();
    assert!(matches!(err, StartupError::MissingDirectory { kind: "pages", .. }), "{err}");
}

#[test]
fn test_missing_shared_fragment_names_unit_and_path() {
    let dir = unpacked_bundle();
    fs::remove_file(dir.path().join("templates/include/post-render.tmpl")).unwrap();

    let err = init(&Config::with_root(dir.path())).unwrap_err();
    match err {
        StartupError::ReadFragment { key, path, .. } => {
            // first unit in walk order that needs post bodies
            assert_eq!(key, "chorus-collection-post");
            assert!(path.ends_with("templates/include/post-render.tmpl"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_syntax_error_in_fragment_aborts_startup() {
    let dir = unpacked_bundle();
    fs::write(dir.path().join("templates/include/footer.tmpl"), "<footer>{{ </footer>").unwrap();

    let err = init(&Config::with_root(dir.path())).unwrap_err();
    assert!(matches!(err, StartupError::Compile { .. }), "{err}");
}

#[test]
fn test_syntax_error_in_page_names_page() {
    let dir = unpacked_bundle();
    fs::write(dir.path().join("pages/privacy.tmpl"), "{% if %}").unwrap();

    let err = init(&Config::with_root(dir.path())).unwrap_err();
    match err {
        StartupError::Compile { key, .. } => assert_eq!(key, "privacy.tmpl"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_separate_parent_directories() {
    let templates = unpacked_bundle();
    let pages = TempDir::new().unwrap();
    fs::create_dir_all(pages.path().join("pages")).unwrap();
    fs::write(pages.path().join("pages/contact.tmpl"), "<h2>Contact</h2>").unwrap();

    let config = Config {
        server: ServerConfig {
            templates_parent_dir: templates.path().to_path_buf(),
            pages_parent_dir: pages.path().to_path_buf(),
        },
    };
    let registry = init(&config).unwrap();

    assert_eq!(registry.pages().keys(), vec!["contact.tmpl"]);
    assert!(registry.templates().contains("collection"));
}
