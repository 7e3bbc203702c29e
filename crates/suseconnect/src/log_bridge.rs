//! Forwarding of the library's log lines into `tracing`.

use std::ffi::CStr;
use std::os::raw::{c_char, c_int};

use libsuseconnect_sys::Library;

/// Level numbers used by `set_log_callback`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
    Fatal,
}

impl LogLevel {
    pub fn from_raw(level: c_int) -> Option<Self> {
        match level {
            1 => Some(LogLevel::Debug),
            2 => Some(LogLevel::Info),
            3 => Some(LogLevel::Warning),
            4 => Some(LogLevel::Error),
            5 => Some(LogLevel::Fatal),
            _ => None,
        }
    }
}

/// Emit one library log line.
pub fn forward(level: c_int, message: &str) {
    let message = message.trim_end_matches(['\n', '\r']);
    match LogLevel::from_raw(level) {
        Some(LogLevel::Debug) => tracing::debug!(target: "libsuseconnect", "{message}"),
        Some(LogLevel::Info) => tracing::info!(target: "libsuseconnect", "{message}"),
        Some(LogLevel::Warning) => tracing::warn!(target: "libsuseconnect", "{message}"),
        Some(LogLevel::Error) => tracing::error!(target: "libsuseconnect", "{message}"),
        Some(LogLevel::Fatal) => tracing::error!(target: "libsuseconnect", fatal = true, "{message}"),
        None => tracing::warn!(target: "libsuseconnect", level, "{message}"),
    }
}

/// Callback handed to `set_log_callback`.
pub unsafe extern "C" fn log_line(level: c_int, message: *const c_char) {
    if message.is_null() {
        return;
    }
    // The library frees `message` right after we return.
    let message = CStr::from_ptr(message).to_string_lossy();
    forward(level, &message);
}

/// Route the library's logging through [`log_line`]. Returns whether the
/// library supports it.
pub fn install(lib: &Library) -> bool {
    let installed = lib.set_log_callback(log_line);
    if !installed {
        tracing::debug!("library has no set_log_callback, native logging stays disabled");
    }
    installed
}
