//! Owned view over a string allocated by the library.

use std::ffi::CStr;
use std::fmt;
use std::marker::PhantomData;
use std::os::raw::{c_char, c_void};
use std::ptr::NonNull;

use crate::abi::FreeFn;
use crate::error::SysError;

/// NUL-terminated buffer returned by an export.
///
/// The buffer is handed back to the library's `free` exactly once, when the
/// value is dropped. The lifetime ties it to the library that produced it, so
/// `free` cannot be unloaded first.
pub struct NativeString<'lib> {
    ptr: NonNull<c_char>,
    free: FreeFn,
    symbol: &'static str,
    _lib: PhantomData<&'lib ()>,
}

impl<'lib> NativeString<'lib> {
    /// Take ownership of `ptr`.
    ///
    /// A null pointer yields [`SysError::NullReturn`] and nothing is freed.
    ///
    /// # Safety
    ///
    /// A non-null `ptr` must point to a NUL-terminated allocation that may be
    /// released with `free`, and nobody else may release it.
    pub unsafe fn from_raw(
        ptr: *mut c_char,
        free: FreeFn,
        symbol: &'static str,
    ) -> Result<Self, SysError> {
        let ptr = NonNull::new(ptr).ok_or(SysError::NullReturn { symbol })?;
        Ok(NativeString {
            ptr,
            free,
            symbol,
            _lib: PhantomData,
        })
    }

    pub fn as_ptr(&self) -> *const c_char {
        self.ptr.as_ptr()
    }

    /// Bytes up to, not including, the terminating NUL.
    pub fn as_bytes(&self) -> &[u8] {
        // SAFETY: from_raw guarantees a live NUL-terminated allocation.
        unsafe { CStr::from_ptr(self.ptr.as_ptr()) }.to_bytes()
    }

    pub fn to_str(&self) -> Result<&str, SysError> {
        std::str::from_utf8(self.as_bytes()).map_err(|source| SysError::Utf8 {
            symbol: self.symbol,
            source,
        })
    }

    /// Decode into an owned string and release the buffer.
    pub fn into_string(self) -> Result<String, SysError> {
        let out = self.to_str().map(str::to_owned);
        drop(self);
        out
    }
}

impl Drop for NativeString<'_> {
    fn drop(&mut self) {
        tracing::trace!(symbol = self.symbol, ptr = ?self.ptr, "releasing native buffer");
        // SAFETY: the allocation came from the library and is released once here.
        unsafe { (self.free)(self.ptr.as_ptr().cast::<c_void>()) }
    }
}

impl fmt::Debug for NativeString<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeString")
            .field("symbol", &self.symbol)
            .field("ptr", &self.ptr)
            .field("len", &self.as_bytes().len())
            .finish()
    }
}
