//! Devwatch Core Library
//!
//! This crate provides the pieces of a one-shot controller inventory poll:
//! - Controller REST client (token endpoint, device-list endpoint)
//! - Credential store reader and 30-minute token cache
//! - Device normalization into fixed-column tables
//! - Snapshot store and hostname-based diffing
//! - Reachability probe and path configuration
//!
//! # Example
//!
//! ```no_run
//! use devwatch_core::{auth, config, controller, inventory, snapshot};
//! use devwatch_core::controller::DeviceFamily;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = config::load_settings();
//!     config::ensure_data_dirs(&settings.paths)?;
//!
//!     let cred = auth::load_credential(&settings.paths.credential_file, auth::CONTROLLER_KEY)?;
//!     let client = controller::ControllerClient::new(&cred.host, cred.port)?;
//!     let token = auth::get_valid_token(&client, &cred, &settings.paths.token_cache_file).await?;
//!
//!     let store = snapshot::SnapshotStore::new(settings.paths.snapshot_dir.clone());
//!     for family in DeviceFamily::ALL {
//!         let fresh = inventory::normalize(&client.fetch_devices(&token, family).await?);
//!         let previous = store.load(family)?.unwrap_or_default();
//!         let diff = inventory::diff::diff_hostnames(&fresh, &previous);
//!         println!("{}", inventory::diff::render_report(family.label(), &diff, None));
//!         store.save(family, &fresh)?;
//!     }
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod config;
pub mod controller;
pub mod inventory;
pub mod probe;
pub mod snapshot;
pub mod table;

// Re-export commonly used types
pub use auth::{CachedToken, Credential};
pub use config::{ConfigSource, Paths, Settings};
pub use controller::{ControllerClient, ControllerError, DeviceFamily};
pub use inventory::{DeviceTable, RawDevice, SnapshotDiff};
pub use snapshot::SnapshotStore;
