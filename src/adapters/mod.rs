//! External-service adapters
//!
//! Each backend lives behind a trait so the core logic can be exercised
//! against in-memory fakes. `object_store` wraps S3 listing, `table_store`
//! the Azure Table checkpoint backend, `secrets` the key vault, and `auth`
//! AAD token acquisition shared by the latter two.

pub mod auth;
pub mod object_store;
pub mod secrets;
pub mod table_store;

pub use auth::{AadTokenProvider, TokenProvider};
pub use object_store::{ObjectPage, ObjectStore, S3ObjectStore};
pub use secrets::KeyVaultClient;
pub use table_store::{AzureTableStore, TableRecord, TableStore};
