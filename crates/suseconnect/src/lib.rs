//! Safe client for `libsuseconnect`, the SUSE registration library.
//!
//! The library is loaded at runtime (see [`libsuseconnect_sys`]). This crate
//! turns its string-in / string-out exports into typed calls, maps the JSON
//! error envelope onto [`Error`] and forwards native log lines to `tracing`.
//!
//! # Example
//!
//! ```no_run
//! use suseconnect::{Connect, LoaderConfig, StatusFormat};
//!
//! let connect = Connect::open(&LoaderConfig::from_env())?;
//! println!("{}", connect.status_raw(StatusFormat::Json)?);
//! for product in connect.statuses()? {
//!     println!("{} {}", product.triplet(), product.status);
//! }
//! # Ok::<(), suseconnect::Error>(())
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod log_bridge;
pub mod model;
pub mod status;
pub mod status_cli;

pub use client::Connect;
pub use config::LoaderConfig;
pub use error::{Error, ErrorEnvelope, Result};
pub use model::{Activation, ClientParams, Credentials, Product, SystemCredentials};
pub use status::{ProductStatus, RegistrationState, StatusFormat};

pub use libsuseconnect_sys as sys;
