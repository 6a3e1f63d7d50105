//! SQL DDL for initializing the grant storage.
//! SQLite-first design; can be adapted for other RDBMS.

/// Grant table DDL with:
/// - `id` INTEGER PRIMARY KEY AUTOINCREMENT
/// - `expired_at` as unix seconds of the longest-lived key
/// - one column per lookup key, `''` meaning absent or invalidated
/// - `data` holding the serialized grant payload
pub fn create_table(table: &str) -> String {
    format!(
        r#"
CREATE TABLE IF NOT EXISTS {table} (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    expired_at INTEGER NOT NULL,
    code TEXT NOT NULL DEFAULT '',
    access TEXT NOT NULL DEFAULT '',
    refresh TEXT NOT NULL DEFAULT '',
    data TEXT NOT NULL
)
"#
    )
}

/// One index per lookup column, plus `expired_at` for the sweep predicate.
pub fn create_indexes(table: &str) -> [String; 4] {
    ["code", "access", "refresh", "expired_at"].map(|column| {
        format!("CREATE INDEX IF NOT EXISTS idx_{table}_{column} ON {table}({column})")
    })
}
