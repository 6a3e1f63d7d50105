use crate::error::CastorError;
use crate::token::Token;
use sqlx::FromRow;

/// One stored grant row. `id` is assigned by the database.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct TokenRow {
    pub id: i64,
    pub expired_at: i64,
    pub code: String,
    pub access: String,
    pub refresh: String,
    pub data: String,
}

impl TokenRow {
    /// Compute the key columns and `expired_at` for a new grant.
    ///
    /// An authorization code wins over token facets; otherwise the access
    /// token is stored and, when a refresh token is present, the refresh
    /// expiry overrides the access expiry as the row's lifetime.
    pub fn assign(token: &Token) -> Result<Self, CastorError> {
        let data = serde_json::to_string(token)?;

        let mut row = Self {
            id: 0,
            expired_at: 0,
            code: String::new(),
            access: String::new(),
            refresh: String::new(),
            data,
        };

        if !token.code.is_empty() {
            row.code = token.code.clone();
            row.expired_at = token.code_expires_at();
        } else {
            row.access = token.access.clone();
            row.expired_at = token.access_expires_at();

            if !token.refresh.is_empty() {
                row.refresh = token.refresh.clone();
                row.expired_at = token.refresh_expires_at();
            }
        }

        Ok(row)
    }
}
