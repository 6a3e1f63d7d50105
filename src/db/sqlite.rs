use crate::config::{DEFAULT_GC_INTERVAL_SECS, DEFAULT_TABLE_NAME, StoreConfig};
use crate::db::gc;
use crate::db::models::TokenRow;
use crate::db::schema;
use crate::error::{CastorError, ErrorSink, default_sink};
use crate::token::Token;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;
use std::time::Duration;
use tokio::task::AbortHandle;
use tracing::warn;

pub type SqlitePool = Pool<Sqlite>;

/// Grant store: one row per issued grant, addressable by authorization
/// code, access token, or refresh token. Lookups by an invalidated or
/// unknown key return `None`; invalidation clears a single key column and
/// leaves reclamation to the background sweeper.
#[derive(Clone)]
pub struct TokenStorage {
    pool: SqlitePool,
    table: String,
    sink: ErrorSink,
    sweeper: AbortHandle,
}

/// Construction knobs applied before the store goes live. The error sink
/// is fixed at build time and cannot be swapped afterwards.
pub struct TokenStorageBuilder {
    table_name: String,
    gc_interval: Duration,
    sink: ErrorSink,
}

impl TokenStorageBuilder {
    /// Override the table name; an empty string keeps the default.
    pub fn table_name(mut self, table_name: impl Into<String>) -> Self {
        let table_name = table_name.into();
        if !table_name.is_empty() {
            self.table_name = table_name;
        }
        self
    }

    /// Override the sweep cadence; a zero duration keeps the default.
    pub fn gc_interval(mut self, every: Duration) -> Self {
        if !every.is_zero() {
            self.gc_interval = every;
        }
        self
    }

    /// Install a destination for background failures (sweep errors,
    /// unreadable payload blobs).
    pub fn error_sink(mut self, sink: ErrorSink) -> Self {
        self.sink = sink;
        self
    }

    pub fn from_config(self, cfg: &StoreConfig) -> Self {
        self.table_name(cfg.table_name.clone())
            .gc_interval(cfg.gc_interval())
    }

    /// Ensure the schema exists, start the sweeper, and hand back the
    /// live store. A table that cannot be created is fatal; missing
    /// indexes only degrade lookups and are reported, not raised.
    pub async fn build(self, pool: SqlitePool) -> Result<TokenStorage, CastorError> {
        ensure_schema(&pool, &self.table_name).await?;

        let sweeper = gc::spawn_sweeper(
            pool.clone(),
            self.table_name.clone(),
            self.gc_interval,
            self.sink.clone(),
        )
        .abort_handle();

        Ok(TokenStorage {
            pool,
            table: self.table_name,
            sink: self.sink,
            sweeper,
        })
    }
}

impl TokenStorage {
    pub fn builder() -> TokenStorageBuilder {
        TokenStorageBuilder {
            table_name: DEFAULT_TABLE_NAME.to_string(),
            gc_interval: Duration::from_secs(DEFAULT_GC_INTERVAL_SECS),
            sink: default_sink(),
        }
    }

    /// Open a pool per the configuration and build a store on it.
    pub async fn connect(cfg: &StoreConfig) -> Result<Self, CastorError> {
        let options = SqliteConnectOptions::from_str(&cfg.database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(cfg.max_connections)
            .min_connections(cfg.min_connections)
            .max_lifetime(cfg.max_lifetime())
            .connect_with(options)
            .await?;

        Self::builder().from_config(cfg).build(pool).await
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn table_name(&self) -> &str {
        &self.table
    }

    /// Persist a new grant. The payload is serialized once; the lookup
    /// keys and row expiry follow the code-first assignment in
    /// [`TokenRow::assign`].
    pub async fn create(&self, token: &Token) -> Result<(), CastorError> {
        let row = TokenRow::assign(token)?;

        let query = format!(
            "INSERT INTO {} (expired_at, code, access, refresh, data) VALUES (?, ?, ?, ?, ?)",
            self.table
        );
        sqlx::query(&query)
            .bind(row.expired_at)
            .bind(&row.code)
            .bind(&row.access)
            .bind(&row.refresh)
            .bind(&row.data)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn get_by_code(&self, code: &str) -> Result<Option<Token>, CastorError> {
        self.get_by_column("code", code).await
    }

    pub async fn get_by_access(&self, access: &str) -> Result<Option<Token>, CastorError> {
        self.get_by_column("access", access).await
    }

    pub async fn get_by_refresh(&self, refresh: &str) -> Result<Option<Token>, CastorError> {
        self.get_by_column("refresh", refresh).await
    }

    /// Clear the authorization code on whatever row carries it. Clearing
    /// an unknown or already-cleared code succeeds silently.
    pub async fn remove_by_code(&self, code: &str) -> Result<(), CastorError> {
        self.remove_by_column("code", code).await
    }

    pub async fn remove_by_access(&self, access: &str) -> Result<(), CastorError> {
        self.remove_by_column("access", access).await
    }

    pub async fn remove_by_refresh(&self, refresh: &str) -> Result<(), CastorError> {
        self.remove_by_column("refresh", refresh).await
    }

    /// Run one reclamation pass outside the background cadence. Returns
    /// the number of rows deleted.
    pub async fn sweep_now(&self) -> Result<u64, CastorError> {
        gc::sweep(&self.pool, &self.table).await
    }

    /// Stop the sweeper and release the pool. Calling twice is not part
    /// of the contract.
    pub async fn close(&self) {
        self.sweeper.abort();
        self.pool.close().await;
    }

    async fn get_by_column(
        &self,
        column: &'static str,
        key: &str,
    ) -> Result<Option<Token>, CastorError> {
        // The empty string is the invalidated sentinel, never a live key.
        if key.is_empty() {
            return Ok(None);
        }

        let query = format!(
            "SELECT id, expired_at, code, access, refresh, data FROM {} WHERE {column} = ?",
            self.table
        );
        let row = sqlx::query_as::<_, TokenRow>(&query)
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|row| self.decode_payload(row)))
    }

    async fn remove_by_column(&self, column: &'static str, key: &str) -> Result<(), CastorError> {
        let query = format!("UPDATE {} SET {column} = '' WHERE {column} = ?", self.table);
        sqlx::query(&query).bind(key).execute(&self.pool).await?;
        Ok(())
    }

    /// A blob that fails to deserialize yields the zero-value payload so
    /// lookups stay non-erroring, but the corruption is reported through
    /// the sink.
    fn decode_payload(&self, row: TokenRow) -> Token {
        match serde_json::from_str(&row.data) {
            Ok(token) => token,
            Err(e) => {
                (self.sink)(&CastorError::Json(e));
                Token::default()
            }
        }
    }
}

async fn ensure_schema(pool: &SqlitePool, table: &str) -> Result<(), CastorError> {
    let probe = format!("SELECT 1 FROM {table} LIMIT 1");
    if sqlx::query(&probe).fetch_optional(pool).await.is_ok() {
        return Ok(());
    }

    sqlx::query(&schema::create_table(table))
        .execute(pool)
        .await
        .map_err(|source| CastorError::TableInit {
            table: table.to_string(),
            source,
        })?;

    for ddl in schema::create_indexes(table) {
        if let Err(e) = sqlx::query(&ddl).execute(pool).await {
            warn!(table = %table, error = %e, "index creation failed; lookups will scan");
        }
    }
    Ok(())
}
