pub mod api;
pub mod auth;
pub mod cache;
pub mod comments;
pub mod config;
pub mod error;
#[cfg(not(target_arch = "wasm32"))]
pub mod http_client;
pub mod models;
pub mod mutation;
pub mod notify;
pub mod reviews;

#[cfg(test)]
pub(crate) mod testing;

pub use api::BoardApi;
pub use auth::{AuthContext, Session, TokenSource};
pub use cache::{CachePersister, QueryCache, QueryKey};
pub use config::ClientConfig;
pub use error::{ApiError, CacheError, CredentialError};
pub use mutation::{MutationOutcome, MutationStatus};
pub use notify::{Alert, AlertKind, Confirmation, Notifier};
