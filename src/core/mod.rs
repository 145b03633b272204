//! Core types shared by every other module: error types and namespace kinds.

pub mod error;
mod kind;

pub use error::{
    ErrorContext, RenderError, StartupError, UnpackError, UnpackFailure, format_tera_error,
    user_friendly_error,
};
pub use kind::NamespaceKind;
