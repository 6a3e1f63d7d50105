//! Background reclamation of dead grant rows.
//!
//! A row is dead once its `expired_at` has passed or all three lookup keys
//! have been invalidated. The sweeper runs the same pass the store exposes
//! as `sweep_now`, once per configured interval, until the store is closed.

use crate::db::sqlite::SqlitePool;
use crate::error::{CastorError, ErrorSink};
use chrono::Utc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;

const DEAD_ROW_PREDICATE: &str = "expired_at <= ? OR (code = '' AND access = '' AND refresh = '')";

/// One sweep pass: count dead rows, then bulk-delete them. The count guard
/// avoids issuing an empty delete on quiet tables. Returns the number of
/// rows deleted.
pub(crate) async fn sweep(pool: &SqlitePool, table: &str) -> Result<u64, CastorError> {
    let now = Utc::now().timestamp();

    let query = format!("SELECT COUNT(*) FROM {table} WHERE {DEAD_ROW_PREDICATE}");
    let dead: i64 = sqlx::query_scalar(&query).bind(now).fetch_one(pool).await?;
    if dead == 0 {
        return Ok(0);
    }

    let query = format!("DELETE FROM {table} WHERE {DEAD_ROW_PREDICATE}");
    let result = sqlx::query(&query).bind(now).execute(pool).await?;
    Ok(result.rows_affected())
}

/// Spawn the sweep loop. Errors go to the sink and the tick is abandoned;
/// the next tick retries independently. Stopped by aborting the handle.
pub(crate) fn spawn_sweeper(
    pool: SqlitePool,
    table: String,
    every: Duration,
    sink: ErrorSink,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);

        loop {
            ticker.tick().await;

            match sweep(&pool, &table).await {
                Ok(0) => {}
                Ok(deleted) => debug!(table = %table, deleted, "swept dead grant rows"),
                Err(e) => (sink)(&e),
            }
        }
    })
}
