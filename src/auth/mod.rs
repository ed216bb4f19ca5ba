//! Authentication module
//!
//! Reads and writes the credential file and turns credentials into an
//! authenticated API session. The `Authenticator` fetches and caches the
//! app-only bearer token.

mod authenticator;
mod credentials;
mod types;

pub use authenticator::Authenticator;
pub use credentials::{read_credentials, save_credentials, session};
pub use types::{AuthConfig, CachedToken, Credentials};
