use freely_templates::assets::unpack::unpack_templates;
use freely_templates::l10n::StringTables;
use freely_templates::templating::FunctionLibrary;
use freely_templates::test_utils::init_test_logging;
use serde_json::json;
use std::fs;
use std::sync::Arc;

use super::{load, render_page, render_template, render_user_page, unpacked_bundle};

#[test]
fn test_unpacked_bundle_loads_every_namespace() {
    init_test_logging(None);
    let dir = unpacked_bundle();
    let registry = load(&dir, FunctionLibrary::default());

    for key in [
        "collection",
        "collection-tags",
        "collection-post",
        "chorus-collection",
        "chorus-collection-post",
        "post",
        "read",
    ] {
        assert!(registry.templates().contains(key), "missing site template {key}");
    }
    assert_eq!(
        registry.pages().keys(),
        vec![
            "about.tmpl",
            "landing.tmpl",
            "login.tmpl",
            "markdown.tmpl",
            "privacy.tmpl",
            "signup.tmpl",
        ]
    );
    assert_eq!(
        registry.user_pages().keys(),
        vec![
            "articles.tmpl",
            "collections.tmpl",
            "include/footer.tmpl",
            "include/header.tmpl",
            "include/nav.tmpl",
            "include/silenced.tmpl",
            "settings.tmpl",
        ]
    );
}

#[test]
fn test_page_renders_inside_shell() {
    let dir = unpacked_bundle();
    let registry = load(&dir, FunctionLibrary::default());

    let html = render_page(&registry, "about.tmpl", &json!({"title": "About us", "users": 1234}));

    assert!(html.contains("<title>About us | WriteFreely</title>"), "{html}");
    assert!(html.contains("<h2>About us</h2>"));
    assert!(html.contains("1,234 writers"));
    assert!(html.contains("powered by <a href=\"https://writefreely.org\">WriteFreely</a>"));
    assert!(!html.contains("silenced"));
    assert!(!html.contains("oauth"));
}

#[test]
fn test_silenced_notice_is_shared() {
    let dir = unpacked_bundle();
    let registry = load(&dir, FunctionLibrary::default());

    let html = render_page(&registry, "privacy.tmpl", &json!({"silenced": true}));
    assert!(html.contains("Your account has been silenced."));
}

#[test]
fn test_authentication_pages_offer_oauth() {
    let dir = unpacked_bundle();
    let registry = load(&dir, FunctionLibrary::default());
    let data = json!({
        "open_registration": true,
        "oauth": [{"id": "slack", "name": "Slack"}, {"id": "gitlab"}],
    });

    for key in ["login.tmpl", "signup.tmpl", "landing.tmpl"] {
        let html = render_page(&registry, key, &data);
        assert!(html.contains("Sign in with Slack"), "{key}: {html}");
        assert!(html.contains("Sign in with Gitlab"), "{key}: {html}");
    }
}

#[test]
fn test_collection_lists_posts() {
    let dir = unpacked_bundle();
    let registry = load(&dir, FunctionLibrary::default());
    let data = json!({
        "collection": {"title": "Field Notes", "alias": "notes", "direction": "rtl"},
        "total_posts": 2,
        "posts": [
            {"slug": "first", "title": "First", "views": 1},
            {"slug": "second", "title": "Second <b>", "views": 1234567},
        ],
    });

    let html = render_template(&registry, "collection", &data);

    assert!(html.contains("<title>Field Notes</title>"));
    assert!(html.contains("dir=\"rtl\""));
    assert!(html.contains("2 posts"));
    assert!(html.contains("1 view<"));
    assert!(html.contains("1,234,567 views"));
    assert!(html.contains("Second &lt;b&gt;"));
}

#[test]
fn test_post_body_is_not_escaped() {
    let dir = unpacked_bundle();
    let registry = load(&dir, FunctionLibrary::default());
    let data = json!({
        "post": {"title": "Hello", "html_content": "<p>Rendered <em>markdown</em></p>", "tags": ["Rust"]},
    });

    let html = render_template(&registry, "post", &data);
    assert!(html.contains("<p>Rendered <em>markdown</em></p>"));
    assert!(html.contains("<a href=\"/tag:rust\">#Rust</a>"));
}

#[test]
fn test_user_pages_render_own_chrome() {
    let dir = unpacked_bundle();
    let registry = load(&dir, FunctionLibrary::default());
    let data = json!({
        "username": "matt",
        "path": "/me/posts",
        "version": "0.15.1",
        "posts": [{"id": "abc123", "title": "Draft", "views": 2}],
    });

    let html = render_user_page(&registry, "articles.tmpl", &data);

    assert!(html.contains("<span class=\"username\">matt</span>"));
    assert!(html.contains("<a href=\"/me/posts\" class=\"selected\">Posts</a>"));
    assert!(html.contains("<a href=\"/me/settings\">Account settings</a>"));
    assert!(html.contains("2 views"));
    assert!(html.contains("WriteFreely 0.15.1"));
    assert!(!html.contains("<footer>\n  <nav>"), "site footer leaked into user page");
}

#[test]
fn test_localized_footer() {
    let dir = unpacked_bundle();
    let tables = StringTables::new()
        .with("", "published with write.as", "published with write.as")
        .with("fr", "published with write.as", "publié avec write.as");
    let registry = load(&dir, FunctionLibrary::new(Arc::new(tables)));

    let html = render_page(&registry, "privacy.tmpl", &json!({"lang": "fr"}));
    assert!(html.contains("<html lang=\"fr\">"));
    assert!(html.contains("publié avec <a href=\"https://writefreely.org\">writefreely</a>"));

    let html = render_page(&registry, "privacy.tmpl", &json!({"lang": "de"}));
    assert!(html.contains("published with <a href=\"https://writefreely.org\">writefreely</a>"));
}

#[test]
fn test_customized_files_survive_second_unpack() {
    let dir = unpacked_bundle();
    let about = dir.path().join("pages/about.tmpl");
    fs::write(&about, "<h2>Our own about page</h2>").unwrap();

    let report = unpack_templates(dir.path()).unwrap();
    assert_eq!(report.writes(), 0);
    assert_eq!(fs::read_to_string(&about).unwrap(), "<h2>Our own about page</h2>");

    let registry = load(&dir, FunctionLibrary::default());
    let html = render_page(&registry, "about.tmpl", &json!({}));
    assert!(html.contains("<h2>Our own about page</h2>"));
}

#[test]
fn test_operator_added_files_are_discovered() {
    let dir = unpacked_bundle();
    fs::create_dir_all(dir.path().join("pages/legal")).unwrap();
    fs::write(dir.path().join("pages/legal/terms.tmpl"), "<h2>Terms</h2>").unwrap();
    fs::write(dir.path().join("pages/legal/.terms.tmpl.swp"), "junk").unwrap();

    let registry = load(&dir, FunctionLibrary::default());
    assert!(registry.pages().contains("terms.tmpl"));
    assert!(!registry.pages().contains(".terms.tmpl.swp"));

    let html = render_page(&registry, "terms.tmpl", &json!({"title": "Terms"}));
    assert!(html.contains("<h2>Terms</h2>"));
}
