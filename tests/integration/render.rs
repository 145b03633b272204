use freely_templates::core::{NamespaceKind, RenderError};
use freely_templates::templating::{FunctionLibrary, missing_variable};
use serde::Serialize;
use serde_json::{Value, json};

use super::{load, unpacked_bundle};

#[test]
fn test_unknown_key_reports_namespace() {
    let dir = unpacked_bundle();
    let registry = load(&dir, FunctionLibrary::default());
    let mut out = Vec::new();

    // keys are scoped to their namespace
    let err = registry.render_template(&mut out, "about.tmpl", &json!({})).unwrap_err();
    assert!(matches!(err, RenderError::UnknownKey { namespace: NamespaceKind::Templates, .. }));

    let err = registry.render_user_page(&mut out, "collection", &json!({})).unwrap_err();
    assert!(matches!(err, RenderError::UnknownKey { namespace: NamespaceKind::UserPages, .. }));
    assert_eq!(err.key(), "collection");
    assert!(out.is_empty());
}

#[test]
fn test_nil_user_data_is_rejected_before_rendering() {
    let dir = unpacked_bundle();
    let registry = load(&dir, FunctionLibrary::default());
    let mut out = Vec::new();

    let err = registry.render_user_page(&mut out, "settings.tmpl", &Value::Null).unwrap_err();
    assert!(matches!(err, RenderError::NilData { .. }));

    // checked before the key is looked up
    let err = registry.render_user_page(&mut out, "no-such.tmpl", &()).unwrap_err();
    assert!(matches!(err, RenderError::NilData { .. }));
    assert!(out.is_empty());
}

#[test]
fn test_missing_field_is_an_execution_error() {
    let dir = unpacked_bundle();
    let registry = load(&dir, FunctionLibrary::default());
    let mut out = Vec::new();

    let err = registry
        .render_user_page(&mut out, "settings.tmpl", &json!({"email": "a@b.c"}))
        .unwrap_err();
    match &err {
        RenderError::Execution { key, message, .. } => {
            assert_eq!(key, "settings.tmpl");
            assert_eq!(missing_variable(message).as_deref(), Some("username"), "{message}");
        }
        other => panic!("unexpected error: {other}"),
    }

    // nothing after the failing expression reaches the writer
    let html = String::from_utf8(out).unwrap();
    assert!(!html.contains("Save changes"), "{html}");
    assert!(!html.contains("</html>"), "{html}");
}

#[test]
fn test_shell_site_template_is_an_error() {
    let dir = unpacked_bundle();
    let registry = load(&dir, FunctionLibrary::default());
    let mut out = Vec::new();

    let err = registry.render_template(&mut out, "base", &json!({"title": "T"})).unwrap_err();
    assert!(matches!(err, RenderError::Execution { .. }), "{err}");
    assert_eq!(err.key(), "base");
}

#[test]
fn test_wrong_type_is_an_execution_error() {
    let dir = unpacked_bundle();
    let registry = load(&dir, FunctionLibrary::default());
    let mut out = Vec::new();

    let data = json!({"total_posts": "many", "collection": {"title": "t", "alias": "t"}});
    let err = registry.render_template(&mut out, "collection", &data).unwrap_err();
    match err {
        RenderError::Execution { message, .. } => {
            assert!(message.contains("largeNumFmt"), "{message}");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_data_must_be_an_object() {
    #[derive(Serialize)]
    struct Wrapped(u32);

    let dir = unpacked_bundle();
    let registry = load(&dir, FunctionLibrary::default());
    let mut out = Vec::new();

    let err = registry.render_page(&mut out, "about.tmpl", &Wrapped(3)).unwrap_err();
    assert!(matches!(err, RenderError::InvalidData { .. }), "{err}");
}
