use std::path::PathBuf;

use thiserror::Error;

use crate::abi::Export;

#[derive(Debug, Error)]
pub enum SysError {
    #[error("failed to load {}: {source}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: libloading::Error,
    },
    #[error("symbol `{symbol}` not found: {source}")]
    MissingSymbol {
        symbol: &'static str,
        #[source]
        source: libloading::Error,
    },
    #[error("library does not export `{0}`")]
    Unsupported(Export),
    #[error("`{export}` takes {expected} argument(s), got {actual}")]
    Arity {
        export: Export,
        expected: usize,
        actual: usize,
    },
    #[error("argument {index} of `{export}` contains a NUL byte")]
    InteriorNul { export: Export, index: usize },
    #[error("`{symbol}` returned a null pointer")]
    NullReturn { symbol: &'static str },
    #[error("`{symbol}` returned invalid UTF-8: {source}")]
    Utf8 {
        symbol: &'static str,
        #[source]
        source: std::str::Utf8Error,
    },
}
