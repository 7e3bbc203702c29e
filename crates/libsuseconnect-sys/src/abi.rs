//! C ABI of `libsuseconnect`.
//!
//! Every export takes zero or more `const char*` arguments and hands back a
//! heap-allocated, NUL-terminated `char*` owned by the caller. The caller
//! releases it with `free`.

use std::collections::HashMap;
use std::fmt;
use std::os::raw::{c_char, c_int, c_void};

/// `void free(void*)`
pub type FreeFn = unsafe extern "C" fn(ptr: *mut c_void);

/// `void (*logLineFunc)(int level, const char* message)`
pub type LogLineFn = unsafe extern "C" fn(level: c_int, message: *const c_char);

/// `void set_log_callback(logLineFunc)`
pub type SetLogCallbackFn = unsafe extern "C" fn(callback: LogLineFn);

pub type Call0Fn = unsafe extern "C" fn() -> *mut c_char;
pub type Call1Fn = unsafe extern "C" fn(*const c_char) -> *mut c_char;
pub type Call2Fn = unsafe extern "C" fn(*const c_char, *const c_char) -> *mut c_char;
pub type Call3Fn =
    unsafe extern "C" fn(*const c_char, *const c_char, *const c_char) -> *mut c_char;
pub type Call4Fn = unsafe extern "C" fn(
    *const c_char,
    *const c_char,
    *const c_char,
    *const c_char,
) -> *mut c_char;

pub const FREE_SYMBOL: &str = "free";
pub const SET_LOG_CALLBACK_SYMBOL: &str = "set_log_callback";

// ── Exports ───────────────────────────────────────────────────────────────

/// A string-returning export of the library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Export {
    GetStatus,
    AnnounceSystem,
    UpdateSystem,
    DeactivateSystem,
    Credentials,
    CreateCredentialsFile,
    CurlrcCredentials,
    ShowProduct,
    ActivateProduct,
    ActivatedProducts,
    DeactivateProduct,
    GetConfig,
    WriteConfig,
    UpdateCertificates,
    ReloadCertificates,
    ListInstallerUpdates,
    SystemMigrations,
    OfflineSystemMigrations,
    UpgradeProduct,
    Synchronize,
    SystemActivations,
    SearchPackage,
}

impl Export {
    pub const ALL: [Export; 22] = [
        Export::GetStatus,
        Export::AnnounceSystem,
        Export::UpdateSystem,
        Export::DeactivateSystem,
        Export::Credentials,
        Export::CreateCredentialsFile,
        Export::CurlrcCredentials,
        Export::ShowProduct,
        Export::ActivateProduct,
        Export::ActivatedProducts,
        Export::DeactivateProduct,
        Export::GetConfig,
        Export::WriteConfig,
        Export::UpdateCertificates,
        Export::ReloadCertificates,
        Export::ListInstallerUpdates,
        Export::SystemMigrations,
        Export::OfflineSystemMigrations,
        Export::UpgradeProduct,
        Export::Synchronize,
        Export::SystemActivations,
        Export::SearchPackage,
    ];

    /// Symbol name as exported by the shared object.
    pub fn symbol(self) -> &'static str {
        match self {
            Export::GetStatus => "getstatus",
            Export::AnnounceSystem => "announce_system",
            Export::UpdateSystem => "update_system",
            Export::DeactivateSystem => "deactivate_system",
            Export::Credentials => "credentials",
            Export::CreateCredentialsFile => "create_credentials_file",
            Export::CurlrcCredentials => "curlrc_credentials",
            Export::ShowProduct => "show_product",
            Export::ActivateProduct => "activate_product",
            Export::ActivatedProducts => "activated_products",
            Export::DeactivateProduct => "deactivate_product",
            Export::GetConfig => "get_config",
            Export::WriteConfig => "write_config",
            Export::UpdateCertificates => "update_certificates",
            Export::ReloadCertificates => "reload_certificates",
            Export::ListInstallerUpdates => "list_installer_updates",
            Export::SystemMigrations => "system_migrations",
            Export::OfflineSystemMigrations => "offline_system_migrations",
            Export::UpgradeProduct => "upgrade_product",
            Export::Synchronize => "synchronize",
            Export::SystemActivations => "system_activations",
            Export::SearchPackage => "search_package",
        }
    }

    /// Number of `const char*` arguments the export takes.
    pub fn arity(self) -> usize {
        match self {
            Export::CurlrcCredentials | Export::UpdateCertificates | Export::ReloadCertificates => 0,
            Export::GetStatus
            | Export::DeactivateSystem
            | Export::Credentials
            | Export::ActivatedProducts
            | Export::GetConfig
            | Export::WriteConfig
            | Export::SystemActivations => 1,
            Export::AnnounceSystem
            | Export::UpdateSystem
            | Export::ShowProduct
            | Export::DeactivateProduct
            | Export::ListInstallerUpdates
            | Export::SystemMigrations
            | Export::UpgradeProduct
            | Export::Synchronize => 2,
            Export::ActivateProduct
            | Export::OfflineSystemMigrations
            | Export::SearchPackage => 3,
            Export::CreateCredentialsFile => 4,
        }
    }

    /// Whether a library without this export is unusable.
    ///
    /// Early builds of the library only export `getstatus`.
    pub fn is_required(self) -> bool {
        matches!(self, Export::GetStatus)
    }
}

impl fmt::Display for Export {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

// ── Entry points ──────────────────────────────────────────────────────────

/// A resolved export, tagged with its arity.
#[derive(Clone, Copy)]
pub enum Entry {
    Call0(Call0Fn),
    Call1(Call1Fn),
    Call2(Call2Fn),
    Call3(Call3Fn),
    Call4(Call4Fn),
}

impl Entry {
    pub fn arity(&self) -> usize {
        match self {
            Entry::Call0(_) => 0,
            Entry::Call1(_) => 1,
            Entry::Call2(_) => 2,
            Entry::Call3(_) => 3,
            Entry::Call4(_) => 4,
        }
    }

    /// Invoke the entry point.
    ///
    /// # Safety
    ///
    /// `args` must hold exactly `self.arity()` pointers to NUL-terminated
    /// strings that stay valid for the duration of the call, and the
    /// function pointer must still be loaded.
    pub(crate) unsafe fn invoke(&self, args: &[*const c_char]) -> *mut c_char {
        debug_assert_eq!(args.len(), self.arity());
        match *self {
            Entry::Call0(f) => f(),
            Entry::Call1(f) => f(args[0]),
            Entry::Call2(f) => f(args[0], args[1]),
            Entry::Call3(f) => f(args[0], args[1], args[2]),
            Entry::Call4(f) => f(args[0], args[1], args[2], args[3]),
        }
    }
}

impl fmt::Debug for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entry::Call{}", self.arity())
    }
}

// ── Symbol table ──────────────────────────────────────────────────────────

/// Resolved function pointers of one library instance.
#[derive(Debug, Clone)]
pub struct Symbols {
    pub(crate) free: FreeFn,
    pub(crate) set_log_callback: Option<SetLogCallbackFn>,
    pub(crate) entries: HashMap<Export, Entry>,
}

impl Symbols {
    /// Start a table from the two functions every library must provide.
    pub fn new(getstatus: Call1Fn, free: FreeFn) -> Self {
        let mut entries = HashMap::new();
        entries.insert(Export::GetStatus, Entry::Call1(getstatus));
        Symbols {
            free,
            set_log_callback: None,
            entries,
        }
    }

    /// Register an optional export. Returns `None` when the entry's arity
    /// does not match the export's signature.
    pub fn with(mut self, export: Export, entry: Entry) -> Option<Self> {
        if entry.arity() != export.arity() {
            return None;
        }
        self.entries.insert(export, entry);
        Some(self)
    }

    pub fn with_log_callback(mut self, set_log_callback: SetLogCallbackFn) -> Self {
        self.set_log_callback = Some(set_log_callback);
        self
    }

    pub fn entry(&self, export: Export) -> Option<Entry> {
        self.entries.get(&export).copied()
    }

    pub fn exports(&self) -> impl Iterator<Item = Export> + '_ {
        Export::ALL.into_iter().filter(|e| self.entries.contains_key(e))
    }
}
