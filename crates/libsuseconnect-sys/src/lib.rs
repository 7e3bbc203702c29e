//! Raw bindings for `libsuseconnect`, resolved at runtime.
//!
//! The library is a C shared object whose exports take `const char*`
//! arguments and return a `char*` the caller must hand back to `free`.
//! This crate loads it with `libloading`, keeps the resolved function
//! pointers in a [`Symbols`] table and wraps every returned buffer in a
//! [`NativeString`] that is released exactly once.
//!
//! # Example
//!
//! ```no_run
//! use libsuseconnect_sys::{Export, Library};
//!
//! let lib = Library::open("./out/libsuseconnect.so")?;
//! let status = lib.call(Export::GetStatus, &["json"])?.into_string()?;
//! println!("{status}");
//! # Ok::<(), libsuseconnect_sys::SysError>(())
//! ```

pub mod abi;
pub mod buffer;
pub mod error;
pub mod library;

pub use abi::{Entry, Export, FreeFn, LogLineFn, SetLogCallbackFn, Symbols};
pub use buffer::NativeString;
pub use error::SysError;
pub use library::Library;

/// Default location of the shared object, relative to the working directory.
pub const DEFAULT_LIBRARY_PATH: &str = "./out/libsuseconnect.so";
