//! Controller credentials and token caching.

pub mod credentials;
pub mod token_cache;

pub use credentials::{CONTROLLER_KEY, Credential, load_credential};
pub use token_cache::{CachedToken, get_valid_token};
