//! Global constants used throughout the crate.
//!
//! Directory names of the on-disk layout, fragment names shared by every
//! composed template, and the fixed brand substitution used by `localhtml`.

/// Directory (under the templates parent dir) holding the flat site templates.
pub const TEMPLATES_DIR: &str = "templates";

/// Directory (under the pages parent dir) holding the standalone page tree.
pub const PAGES_DIR: &str = "pages";

/// Directory holding opaque static assets.
pub const STATIC_DIR: &str = "static";

/// Subdirectory of [`TEMPLATES_DIR`] holding per-user pages.
pub const USER_DIR: &str = "user";

/// Extension every fragment file carries on disk.
pub const TEMPLATE_EXTENSION: &str = "tmpl";

/// Name under which a unit's primary file is registered.
pub const PRIMARY_FRAGMENT: &str = "page";

/// Name of the document shell every standalone page is executed through.
pub const SHELL_ENTRYPOINT: &str = "base";

/// Brand substring replaced by [`BRAND_LINK`] in trusted localized strings.
pub const BRAND_TEXT: &str = "write.as";

/// Markup substituted for the first occurrence of [`BRAND_TEXT`].
pub const BRAND_LINK: &str = "<a href=\"https://writefreely.org\">writefreely</a>";

/// Directory permissions used when materializing bundled assets.
#[cfg(unix)]
pub const UNPACK_DIR_MODE: u32 = 0o700;

/// File permissions used when materializing bundled assets.
#[cfg(unix)]
pub const UNPACK_FILE_MODE: u32 = 0o600;
