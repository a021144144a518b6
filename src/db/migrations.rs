use anyhow::{bail, Context, Result};
use rusqlite::Connection;

/// Bumped whenever `kv_entries` changes shape.
const KV_SCHEMA_VERSION: i32 = 1;

/// Create the key/value table on a fresh file and stamp `user_version`.
/// Files written by a newer build are refused rather than guessed at.
pub fn ensure_schema(conn: &mut Connection) -> Result<()> {
    let stored: i32 = conn
        .pragma_query_value(None, "user_version", |row| row.get(0))
        .context("failed to read user_version pragma")?;

    match stored {
        KV_SCHEMA_VERSION => Ok(()),
        0 => {
            let tx = conn
                .transaction()
                .context("failed to open schema transaction")?;
            tx.execute_batch(include_str!("schemas/schema_v1.sql"))
                .context("failed to create kv_entries")?;
            tx.pragma_update(None, "user_version", KV_SCHEMA_VERSION)
                .context("failed to stamp user_version")?;
            tx.commit().context("failed to commit schema")
        }
        newer => bail!(
            "store schema version {newer} is newer than this build understands ({KV_SCHEMA_VERSION})"
        ),
    }
}
