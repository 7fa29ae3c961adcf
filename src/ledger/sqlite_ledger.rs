//! SQLite implementation of the ledger tables.
use anyhow::Context;
use async_trait::async_trait;
use rusqlite::types::{ToSql, ToSqlOutput};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::PathBuf;
use tokio::task;

use crate::ledger::{Param, Query, QueryExecutor};
use crate::types::{TxInputRecord, UtxoRecord};

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS address_utxo (
        tx_hash          TEXT    NOT NULL,
        output_index     INTEGER NOT NULL,
        owner_addr       TEXT    NOT NULL,
        lovelace_amount  INTEGER NOT NULL,
        PRIMARY KEY (tx_hash, output_index)
    );

    CREATE TABLE IF NOT EXISTS tx_input (
        tx_hash        TEXT    NOT NULL,
        output_index   INTEGER NOT NULL,
        spent_at_slot  INTEGER NOT NULL,
        PRIMARY KEY (tx_hash, output_index)
    );

    CREATE INDEX IF NOT EXISTS idx_tx_input_spent_at_slot ON tx_input(spent_at_slot);
    CREATE INDEX IF NOT EXISTS idx_address_utxo_owner ON address_utxo(owner_addr);
"#;

impl ToSql for Param {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        match self {
            Param::Int(i) => Ok(ToSqlOutput::from(*i)),
            Param::Text(s) => Ok(ToSqlOutput::from(s.as_str())),
        }
    }
}

/// `address_utxo` + `tx_input` in one SQLite file.
///
/// Besides [`QueryExecutor`], exposes the writers the host pipeline uses to
/// land batches, so the hook can be driven end to end.
pub struct SqliteLedger {
    path: PathBuf,
}

impl SqliteLedger {
    /// Creates/initializes the ledger tables at `path`.
    pub fn new(path: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let path = path.into();
        let conn = Connection::open(&path)
            .with_context(|| format!("open sqlite at {}", path.display()))?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.execute_batch(SCHEMA).context("create ledger schema")?;
        Ok(Self { path })
    }

    /// Persist filtered outputs. Rows already present are left untouched.
    pub async fn insert_utxos(&self, utxos: Vec<UtxoRecord>) -> anyhow::Result<usize> {
        let path = self.path.clone();
        task::spawn_blocking(move || {
            let conn = Connection::open(path)?;
            let tx = conn.unchecked_transaction()?;
            let mut inserted = 0usize;
            {
                let mut stmt = tx.prepare(
                    "INSERT OR IGNORE INTO address_utxo
                     (tx_hash, output_index, owner_addr, lovelace_amount)
                     VALUES (?1, ?2, ?3, ?4)",
                )?;
                for u in &utxos {
                    inserted += stmt.execute(params![
                        u.tx_hash,
                        u.output_index,
                        u.owner_addr,
                        u.lovelace_amount
                    ])?;
                }
            }
            tx.commit()?;
            Ok(inserted)
        })
        .await?
    }

    /// Persist spends. Rows already present are left untouched.
    pub async fn insert_tx_inputs(&self, inputs: Vec<TxInputRecord>) -> anyhow::Result<usize> {
        let path = self.path.clone();
        task::spawn_blocking(move || {
            let conn = Connection::open(path)?;
            let tx = conn.unchecked_transaction()?;
            let mut inserted = 0usize;
            {
                let mut stmt = tx.prepare(
                    "INSERT OR IGNORE INTO tx_input (tx_hash, output_index, spent_at_slot)
                     VALUES (?1, ?2, ?3)",
                )?;
                for i in &inputs {
                    inserted += stmt.execute(params![i.tx_hash, i.output_index, i.spent_at_slot])?;
                }
            }
            tx.commit()?;
            Ok(inserted)
        })
        .await?
    }

    /// All spends, ordered by slot then outpoint.
    pub async fn tx_inputs(&self) -> anyhow::Result<Vec<TxInputRecord>> {
        let path = self.path.clone();
        task::spawn_blocking(move || {
            let conn = Connection::open(path)?;
            let mut stmt = conn.prepare(
                "SELECT tx_hash, output_index, spent_at_slot FROM tx_input
                 ORDER BY spent_at_slot, tx_hash, output_index",
            )?;
            let rows = stmt
                .query_map([], |row| {
                    Ok(TxInputRecord {
                        tx_hash: row.get(0)?,
                        output_index: row.get(1)?,
                        spent_at_slot: row.get(2)?,
                    })
                })?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(rows)
        })
        .await?
    }
}

#[async_trait]
impl QueryExecutor for SqliteLedger {
    async fn update(&self, query: &Query) -> anyhow::Result<u64> {
        let path = self.path.clone();
        let query = query.clone();
        task::spawn_blocking(move || {
            let conn = Connection::open(path)?;
            let bound: Vec<(&str, &dyn ToSql)> = query
                .params()
                .iter()
                .map(|(name, value)| (*name, value as &dyn ToSql))
                .collect();
            let n = conn
                .execute(query.sql(), bound.as_slice())
                .with_context(|| format!("execute {}", query.sql()))?;
            Ok(n as u64)
        })
        .await?
    }

    async fn query_i64(&self, query: &Query) -> anyhow::Result<Option<i64>> {
        let path = self.path.clone();
        let query = query.clone();
        task::spawn_blocking(move || {
            let conn = Connection::open(path)?;
            let bound: Vec<(&str, &dyn ToSql)> = query
                .params()
                .iter()
                .map(|(name, value)| (*name, value as &dyn ToSql))
                .collect();
            let v = conn
                .query_row(query.sql(), bound.as_slice(), |row| {
                    row.get::<_, Option<i64>>(0)
                })
                .optional()
                .with_context(|| format!("query {}", query.sql()))?;
            Ok(v.flatten())
        })
        .await?
    }
}
