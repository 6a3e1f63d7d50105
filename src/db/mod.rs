//! Database module: models, schema, and the grant store.
//!
//! Layout:
//! - `models.rs`: Rust structs mirroring DB rows and key/expiry assignment
//! - `schema.rs`: SQL DDL for initializing the database (SQLite-first)
//! - `sqlite.rs`: the store surface (create / lookup / invalidate)
//! - `gc.rs`: background reclamation of expired or fully-cleared rows

pub mod gc;
pub mod models;
pub mod schema;
pub mod sqlite;

pub use models::TokenRow;
pub use sqlite::{SqlitePool, TokenStorage, TokenStorageBuilder};
