#![allow(dead_code)]

//! In-process stand-ins for libsuseconnect exports.
//!
//! Every stub allocates its answer with `CString::into_raw` and records the
//! address; `stub_free` records each release and reclaims the allocation.
//! State is per thread, so tests running in parallel do not interfere.

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::io;
use std::os::raw::{c_char, c_int, c_void};
use std::sync::{Arc, Mutex};

use suseconnect::sys::abi::{Call1Fn, LogLineFn};
use suseconnect::sys::{Library, Symbols};

#[derive(Default)]
pub struct Ledger {
    pub answer: Option<Vec<u8>>,
    pub returned: Vec<usize>,
    pub freed: Vec<usize>,
    pub args: Vec<Vec<String>>,
    pub log_callback: Option<LogLineFn>,
}

thread_local! {
    pub static LEDGER: RefCell<Ledger> = RefCell::new(Ledger::default());
}

pub fn reset(answer: Option<&[u8]>) {
    LEDGER.with(|l| {
        *l.borrow_mut() = Ledger {
            answer: answer.map(<[u8]>::to_vec),
            ..Ledger::default()
        }
    });
}

pub fn with_ledger<T>(f: impl FnOnce(&Ledger) -> T) -> T {
    LEDGER.with(|l| f(&l.borrow()))
}

unsafe fn record_args(args: &[*const c_char]) {
    let args = args
        .iter()
        .map(|a| CStr::from_ptr(*a).to_string_lossy().into_owned())
        .collect();
    LEDGER.with(|l| l.borrow_mut().args.push(args));
}

fn answer() -> *mut c_char {
    LEDGER.with(|l| {
        let mut l = l.borrow_mut();
        match l.answer.clone() {
            Some(bytes) => {
                let raw = CString::new(bytes).expect("stub answer has no NUL").into_raw();
                l.returned.push(raw as usize);
                raw
            }
            None => std::ptr::null_mut(),
        }
    })
}

pub unsafe extern "C" fn stub_free(ptr: *mut c_void) {
    LEDGER.with(|l| l.borrow_mut().freed.push(ptr as usize));
    drop(CString::from_raw(ptr.cast::<c_char>()));
}

pub unsafe extern "C" fn stub0() -> *mut c_char {
    record_args(&[]);
    answer()
}

pub unsafe extern "C" fn stub1(a: *const c_char) -> *mut c_char {
    record_args(&[a]);
    answer()
}

pub unsafe extern "C" fn stub2(a: *const c_char, b: *const c_char) -> *mut c_char {
    record_args(&[a, b]);
    answer()
}

pub unsafe extern "C" fn stub3(a: *const c_char, b: *const c_char, c: *const c_char) -> *mut c_char {
    record_args(&[a, b, c]);
    answer()
}

pub unsafe extern "C" fn stub4(
    a: *const c_char,
    b: *const c_char,
    c: *const c_char,
    d: *const c_char,
) -> *mut c_char {
    record_args(&[a, b, c, d]);
    answer()
}

pub unsafe extern "C" fn stub_set_log_callback(callback: LogLineFn) {
    LEDGER.with(|l| l.borrow_mut().log_callback = Some(callback));
}

pub fn emit_native_log(level: c_int, message: &str) {
    let callback = with_ledger(|l| l.log_callback).expect("log callback installed");
    let message = CString::new(message).unwrap();
    unsafe { callback(level, message.as_ptr()) };
}

/// A library exporting `getstatus`, `free` and every optional export.
pub fn full_library() -> Library {
    use suseconnect::sys::{Entry, Export};

    let mut symbols = Symbols::new(stub1 as Call1Fn, stub_free).with_log_callback(stub_set_log_callback);
    for export in Export::ALL.into_iter().filter(|e| !e.is_required()) {
        let entry = match export.arity() {
            0 => Entry::Call0(stub0),
            1 => Entry::Call1(stub1),
            2 => Entry::Call2(stub2),
            3 => Entry::Call3(stub3),
            _ => Entry::Call4(stub4),
        };
        symbols = symbols.with(export, entry).expect("arity matches");
    }
    Library::from_symbols(symbols)
}

/// A library exporting only `getstatus` and `free`.
pub fn status_only_library() -> Library {
    Library::from_symbols(Symbols::new(stub1, stub_free))
}

#[derive(Clone, Default)]
struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl io::Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Run `f` under a plain-text subscriber and return what it logged.
pub fn capture_logs(f: impl FnOnce()) -> String {
    let buf = SharedBuf::default();
    let writer = buf.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    tracing::subscriber::with_default(subscriber, f);
    let bytes = buf.0.lock().unwrap().clone();
    String::from_utf8(bytes).unwrap()
}
