//! Runtime loading of the shared object and dispatch of its exports.

use std::ffi::CString;
use std::os::raw::c_char;
use std::path::{Path, PathBuf};

use crate::abi::{
    Call0Fn, Call1Fn, Call2Fn, Call3Fn, Call4Fn, Entry, Export, FreeFn, LogLineFn,
    SetLogCallbackFn, Symbols, FREE_SYMBOL, SET_LOG_CALLBACK_SYMBOL,
};
use crate::buffer::NativeString;
use crate::error::SysError;

/// A loaded `libsuseconnect`, or an in-process stand-in built from
/// [`Symbols`].
pub struct Library {
    symbols: Symbols,
    path: Option<PathBuf>,
    // Dropped last; the function pointers in `symbols` point into it.
    _handle: Option<libloading::Library>,
}

impl Library {
    /// Load the shared object at `path` and resolve its exports.
    ///
    /// `getstatus` and `free` must be present. Other exports are optional.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SysError> {
        let path = path.as_ref().to_path_buf();
        tracing::debug!(path = %path.display(), "loading library");
        // SAFETY: loading runs the library's initializers; the caller picks the path.
        let handle = unsafe { libloading::Library::new(&path) }.map_err(|source| SysError::Load {
            path: path.clone(),
            source,
        })?;

        let getstatus: Call1Fn = required(&handle, Export::GetStatus.symbol())?;
        let free: FreeFn = required(&handle, FREE_SYMBOL)?;
        let mut symbols = Symbols::new(getstatus, free);

        for export in Export::ALL.into_iter().filter(|e| !e.is_required()) {
            let entry = match export.arity() {
                0 => optional::<Call0Fn>(&handle, export.symbol()).map(Entry::Call0),
                1 => optional::<Call1Fn>(&handle, export.symbol()).map(Entry::Call1),
                2 => optional::<Call2Fn>(&handle, export.symbol()).map(Entry::Call2),
                3 => optional::<Call3Fn>(&handle, export.symbol()).map(Entry::Call3),
                _ => optional::<Call4Fn>(&handle, export.symbol()).map(Entry::Call4),
            };
            if let Some(entry) = entry {
                symbols.entries.insert(export, entry);
            }
        }
        symbols.set_log_callback = optional::<SetLogCallbackFn>(&handle, SET_LOG_CALLBACK_SYMBOL);

        tracing::debug!(
            path = %path.display(),
            exports = symbols.entries.len(),
            log_callback = symbols.set_log_callback.is_some(),
            "library loaded"
        );
        Ok(Library {
            symbols,
            path: Some(path),
            _handle: Some(handle),
        })
    }

    /// Wrap function pointers that live in the current process.
    pub fn from_symbols(symbols: Symbols) -> Self {
        Library {
            symbols,
            path: None,
            _handle: None,
        }
    }

    pub fn has(&self, export: Export) -> bool {
        self.symbols.entries.contains_key(&export)
    }

    /// Call `export` with `args` and take ownership of the returned buffer.
    pub fn call(&self, export: Export, args: &[&str]) -> Result<NativeString<'_>, SysError> {
        let entry = self
            .symbols
            .entry(export)
            .ok_or(SysError::Unsupported(export))?;
        if args.len() != entry.arity() {
            return Err(SysError::Arity {
                export,
                expected: entry.arity(),
                actual: args.len(),
            });
        }

        let owned = args
            .iter()
            .enumerate()
            .map(|(index, a)| {
                CString::new(*a).map_err(|_| SysError::InteriorNul { export, index })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let ptrs: Vec<*const c_char> = owned.iter().map(|s| s.as_ptr()).collect();

        tracing::trace!(%export, "calling export");
        // SAFETY: arity checked above; `owned` outlives the call.
        let raw = unsafe { entry.invoke(&ptrs) };
        // SAFETY: exports return malloc'd strings released with the library's `free`.
        unsafe { NativeString::from_raw(raw, self.symbols.free, export.symbol()) }
    }

    /// Install `callback` as the library's log sink.
    ///
    /// Returns `false` when the library has no `set_log_callback`.
    pub fn set_log_callback(&self, callback: LogLineFn) -> bool {
        match self.symbols.set_log_callback {
            Some(set) => {
                // SAFETY: the callback is a plain `extern "C"` function with 'static lifetime.
                unsafe { set(callback) };
                true
            }
            None => false,
        }
    }
}

impl std::fmt::Debug for Library {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Library")
            .field("path", &self.path)
            .field("exports", &self.symbols.exports().collect::<Vec<_>>())
            .finish()
    }
}

fn required<T: Copy>(handle: &libloading::Library, symbol: &'static str) -> Result<T, SysError> {
    // SAFETY: T is the documented signature of `symbol`.
    unsafe { handle.get::<T>(symbol.as_bytes()) }
        .map(|s| *s)
        .map_err(|source| SysError::MissingSymbol { symbol, source })
}

fn optional<T: Copy>(handle: &libloading::Library, symbol: &'static str) -> Option<T> {
    // SAFETY: T is the documented signature of `symbol`.
    match unsafe { handle.get::<T>(symbol.as_bytes()) } {
        Ok(s) => Some(*s),
        Err(_) => {
            tracing::trace!(symbol, "optional export not present");
            None
        }
    }
}
