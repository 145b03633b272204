//! Test utilities.
//!
//! Available to unit tests and, through the `test-utils` feature, to the
//! integration suite.
//!
//! # Example
//!
//! ```rust,no_run
//! use freely_templates::templating::TemplateRegistry;
//! use freely_templates::test_utils::TemplateTreeBuilder;
//!
//! let tree = TemplateTreeBuilder::minimal().page("help/faq.tmpl", "<p>FAQ</p>").build();
//! let registry = TemplateRegistry::init(&tree.config(), Default::default()).unwrap();
//! assert!(registry.pages().contains("faq.tmpl"));
//! ```

pub mod builder;

pub use builder::{TemplateTree, TemplateTreeBuilder};

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Uses `level` when given, otherwise `RUST_LOG` when set; logs nothing if
/// neither is provided.
///
/// ```bash
/// RUST_LOG=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .try_init();
    });
}
