pub mod config;
pub mod db;
pub mod error;
pub mod token;

pub use config::StoreConfig;
pub use db::{SqlitePool, TokenStorage, TokenStorageBuilder};
pub use error::{CastorError, ErrorSink};
pub use token::Token;
