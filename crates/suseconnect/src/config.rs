use std::path::PathBuf;

use libsuseconnect_sys::DEFAULT_LIBRARY_PATH;

/// Environment variable overriding the shared object location.
pub const LIBRARY_ENV: &str = "SUSECONNECT_LIBRARY";

/// How to find and set up the library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderConfig {
    pub library: PathBuf,
    /// Forward the library's log output through `tracing`.
    pub forward_logs: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        LoaderConfig {
            library: PathBuf::from(DEFAULT_LIBRARY_PATH),
            forward_logs: true,
        }
    }
}

impl LoaderConfig {
    pub fn new(library: impl Into<PathBuf>) -> Self {
        LoaderConfig {
            library: library.into(),
            ..LoaderConfig::default()
        }
    }

    /// Defaults, with the library path taken from `SUSECONNECT_LIBRARY`
    /// when set and non-empty.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var_os(key))
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<std::ffi::OsString>) -> Self {
        match lookup(LIBRARY_ENV).filter(|v| !v.is_empty()) {
            Some(path) => LoaderConfig::new(path),
            None => LoaderConfig::default(),
        }
    }
}
