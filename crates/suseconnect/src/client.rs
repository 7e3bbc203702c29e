//! Typed access to the library's exports.
//!
//! Every call follows the same sequence: encode arguments, call the export,
//! decode the returned buffer as UTF-8, release it, then parse the text
//! (checking for an error envelope first).

use libsuseconnect_sys::{Export, Library};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::config::LoaderConfig;
use crate::error::{decode_response, expect_success, Error, Result};
use crate::log_bridge;
use crate::model::{Activation, AnnounceResponse, ClientParams, Credentials, Product, SystemCredentials};
use crate::status::{parse_statuses, ProductStatus, StatusFormat};

/// Default zypp credentials file for the system.
pub const GLOBAL_CREDENTIALS_FILE: &str = "/etc/zypp/credentials.d/SCCcredentials";

/// Default configuration file read by the library.
pub const DEFAULT_CONFIG_FILE: &str = "/etc/SUSEConnect";

#[derive(Debug)]
pub struct Connect {
    lib: Library,
    params: ClientParams,
}

impl Connect {
    /// Load the library described by `config`.
    pub fn open(config: &LoaderConfig) -> Result<Self> {
        let lib = Library::open(&config.library)?;
        if config.forward_logs {
            log_bridge::install(&lib);
        }
        Ok(Connect::from_library(lib))
    }

    pub fn from_library(lib: Library) -> Self {
        Connect {
            lib,
            params: ClientParams::default(),
        }
    }

    /// Parameters sent with every call that accepts client parameters.
    pub fn with_params(mut self, params: ClientParams) -> Self {
        self.params = params;
        self
    }

    pub fn params(&self) -> &ClientParams {
        &self.params
    }

    pub fn library(&self) -> &Library {
        &self.lib
    }

    /// Call `export` and return its output text. The native buffer is
    /// released before this returns.
    pub fn raw(&self, export: Export, args: &[&str]) -> Result<String> {
        let out = self.lib.call(export, args)?;
        Ok(out.into_string()?)
    }

    // ── Status ────────────────────────────────────────────────────────────

    /// Output of `getstatus(format)`, verbatim.
    ///
    /// A blank result is the library's way of failing without a message and
    /// yields [`Error::EmptyStatus`].
    pub fn status_raw(&self, format: StatusFormat) -> Result<String> {
        let text = self.raw(Export::GetStatus, &[format.as_str()])?;
        if text.trim().is_empty() {
            return Err(Error::EmptyStatus);
        }
        Ok(text)
    }

    pub fn statuses(&self) -> Result<Vec<ProductStatus>> {
        parse_statuses(&self.status_raw(StatusFormat::Json)?)
    }

    // ── System ────────────────────────────────────────────────────────────

    /// Register the system and return its credentials.
    pub fn announce_system(&self, distro_target: Option<&str>) -> Result<SystemCredentials> {
        let export = Export::AnnounceSystem;
        let params = self.encoded_params()?;
        let text = self.raw(export, &[&params, distro_target.unwrap_or("")])?;
        let response: AnnounceResponse = decode_response(export.symbol(), &text)?;
        response.into_credentials().ok_or_else(|| Error::Decode {
            export: export.symbol(),
            source: serde::de::Error::custom("`credentials` lacks login or password"),
        })
    }

    pub fn update_system(&self, distro_target: Option<&str>) -> Result<()> {
        let params = self.encoded_params()?;
        self.call_unit(Export::UpdateSystem, &[&params, distro_target.unwrap_or("")])
    }

    pub fn deactivate_system(&self) -> Result<()> {
        let params = self.encoded_params()?;
        self.call_unit(Export::DeactivateSystem, &[&params])
    }

    // ── Credentials ───────────────────────────────────────────────────────

    pub fn credentials(&self, path: &str) -> Result<Credentials> {
        self.call_json(Export::Credentials, &[path])
    }

    pub fn global_credentials(&self) -> Result<Credentials> {
        self.credentials(GLOBAL_CREDENTIALS_FILE)
    }

    pub fn create_credentials_file(
        &self,
        login: &str,
        password: &str,
        token: &str,
        path: &str,
    ) -> Result<()> {
        self.call_unit(Export::CreateCredentialsFile, &[login, password, token, path])
    }

    /// Proxy credentials from `~/.curlrc`. The library ignores read errors
    /// here and returns empty fields instead.
    pub fn curlrc_credentials(&self) -> Result<Credentials> {
        self.call_json(Export::CurlrcCredentials, &[])
    }

    // ── Products ──────────────────────────────────────────────────────────

    pub fn show_product(&self, product: &Product) -> Result<Product> {
        let params = self.encoded_params()?;
        let product = encode(product)?;
        self.call_json(Export::ShowProduct, &[&params, &product])
    }

    /// Activate `product`; returns the service the library set up.
    pub fn activate_product(&self, product: &Product, email: &str) -> Result<Value> {
        let params = self.encoded_params()?;
        let product = encode(product)?;
        self.call_json(Export::ActivateProduct, &[&params, &product, email])
    }

    pub fn activated_products(&self) -> Result<Vec<Product>> {
        let params = self.encoded_params()?;
        let products: Option<Vec<Product>> = self.call_json(Export::ActivatedProducts, &[&params])?;
        Ok(products.unwrap_or_default())
    }

    pub fn deactivate_product(&self, product: &Product) -> Result<Value> {
        let params = self.encoded_params()?;
        let product = encode(product)?;
        self.call_json(Export::DeactivateProduct, &[&params, &product])
    }

    pub fn upgrade_product(&self, product: &Product) -> Result<Value> {
        let params = self.encoded_params()?;
        let product = encode(product)?;
        self.call_json(Export::UpgradeProduct, &[&params, &product])
    }

    /// Reconcile the server's activations with `installed`; returns the
    /// products that remain activated.
    pub fn synchronize(&self, installed: &[Product]) -> Result<Vec<Product>> {
        let params = self.encoded_params()?;
        let installed = encode(installed)?;
        let products: Option<Vec<Product>> =
            self.call_json(Export::Synchronize, &[&params, &installed])?;
        Ok(products.unwrap_or_default())
    }

    pub fn system_activations(&self) -> Result<Vec<Activation>> {
        let params = self.encoded_params()?;
        self.call_json(Export::SystemActivations, &[&params])
    }

    pub fn list_installer_updates(&self, product: &Product) -> Result<Value> {
        let params = self.encoded_params()?;
        let product = encode(product)?;
        self.call_json(Export::ListInstallerUpdates, &[&params, &product])
    }

    pub fn search_package(&self, product: &Product, query: &str) -> Result<Value> {
        let params = self.encoded_params()?;
        let product = encode(product)?;
        self.call_json(Export::SearchPackage, &[&params, &product, query])
    }

    // ── Migrations ────────────────────────────────────────────────────────

    pub fn system_migrations(&self, installed: &[Product]) -> Result<Value> {
        let params = self.encoded_params()?;
        let installed = encode(installed)?;
        self.call_json(Export::SystemMigrations, &[&params, &installed])
    }

    pub fn offline_system_migrations(
        &self,
        installed: &[Product],
        target_base: &Product,
    ) -> Result<Value> {
        let params = self.encoded_params()?;
        let installed = encode(installed)?;
        let target = encode(target_base)?;
        self.call_json(Export::OfflineSystemMigrations, &[&params, &installed, &target])
    }

    // ── Configuration ─────────────────────────────────────────────────────

    /// Configuration the library would use when reading `path`.
    pub fn get_config(&self, path: &str) -> Result<Value> {
        self.call_json(Export::GetConfig, &[path])
    }

    pub fn default_config(&self) -> Result<Value> {
        self.get_config(DEFAULT_CONFIG_FILE)
    }

    /// Persist the current client parameters into the library's config file.
    pub fn write_config(&self) -> Result<()> {
        let params = self.encoded_params()?;
        self.call_unit(Export::WriteConfig, &[&params])
    }

    // ── Certificates ──────────────────────────────────────────────────────

    pub fn update_certificates(&self) -> Result<()> {
        self.call_unit(Export::UpdateCertificates, &[])
    }

    pub fn reload_certificates(&self) -> Result<()> {
        self.call_unit(Export::ReloadCertificates, &[])
    }

    // ── Helpers ───────────────────────────────────────────────────────────

    fn encoded_params(&self) -> Result<String> {
        encode(&self.params)
    }

    fn call_json<T: DeserializeOwned>(&self, export: Export, args: &[&str]) -> Result<T> {
        let text = self.raw(export, args)?;
        decode_response(export.symbol(), &text)
    }

    fn call_unit(&self, export: Export, args: &[&str]) -> Result<()> {
        let text = self.raw(export, args)?;
        expect_success(export.symbol(), &text)
    }
}

fn encode<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(Error::Encode)
}
