//! Constants used throughout the CMS core crate.
//!
//! Path and naming constants live here so that stores, the page service and the binaries agree
//! on them.

/// Default directory holding one git repository per site, when no root is configured.
pub const DEFAULT_CONTENT_ROOT: &str = "content_repos";

/// Repository-relative directory that holds page files.
pub const DEFAULT_PAGES_DIR: &str = "content/pages";

/// Extension of page files.
pub const PAGE_FILE_EXTENSION: &str = "md";

/// Prefix of generated page file names (`page-<unix-millis>.md`).
pub const NEW_PAGE_FILE_PREFIX: &str = "page-";

/// Branch every repository created by the CMS commits to.
pub const MAIN_REF: &str = "refs/heads/main";

/// Commit author used when none is configured.
pub const DEFAULT_AUTHOR_NAME: &str = "CMS Editor";

/// Commit author email used when none is configured.
pub const DEFAULT_AUTHOR_EMAIL: &str = "cms@localhost";
