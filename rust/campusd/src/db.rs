use std::marker::PhantomData;
use std::path::Path;

use rusqlite::{Connection, OptionalExtension};

use crate::error::{Error, Result};
use crate::store::{Record, Store};

pub const DB_FILE_NAME: &str = "campus.sqlite3";

pub fn open_db(workspace: &Path) -> anyhow::Result<Connection> {
    std::fs::create_dir_all(workspace)?;
    let db_path = workspace.join(DB_FILE_NAME);
    let conn = Connection::open(db_path)?;

    // One JSON document per record; `collection` carries the storage key
    // (e.g. `attendanceRecords`). Row order is insertion order.
    conn.execute(
        "CREATE TABLE IF NOT EXISTS documents(
            collection TEXT NOT NULL,
            id TEXT NOT NULL,
            doc TEXT NOT NULL,
            written_at TEXT NOT NULL,
            PRIMARY KEY(collection, id)
        )",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_documents_collection ON documents(collection)",
        [],
    )?;

    Ok(conn)
}

/// [`Store`] keeping each record as its own row, so a write touches one
/// document instead of rewriting the collection.
pub struct SqliteStore<T> {
    conn: Connection,
    _record: PhantomData<T>,
}

impl<T: Record> SqliteStore<T> {
    pub fn new(conn: Connection) -> Self {
        Self {
            conn,
            _record: PhantomData,
        }
    }
}

fn decode<T: Record>(raw: &str) -> Result<T> {
    Ok(serde_json::from_str(raw)?)
}

impl<T: Record> Store<T> for SqliteStore<T> {
    fn all(&self) -> Result<Vec<T>> {
        let mut stmt = self
            .conn
            .prepare("SELECT doc FROM documents WHERE collection = ? ORDER BY rowid")?;
        let docs = stmt
            .query_map([T::COLLECTION], |r| r.get::<_, String>(0))
            .and_then(|it| it.collect::<std::result::Result<Vec<_>, _>>())?;
        docs.iter().map(|raw| decode::<T>(raw)).collect()
    }

    fn get(&self, id: &str) -> Result<Option<T>> {
        let raw: Option<String> = self
            .conn
            .query_row(
                "SELECT doc FROM documents WHERE collection = ? AND id = ?",
                (T::COLLECTION, id),
                |r| r.get(0),
            )
            .optional()?;
        raw.as_deref().map(decode::<T>).transpose()
    }

    fn insert(&mut self, record: T) -> Result<()> {
        let exists: Option<i64> = self
            .conn
            .query_row(
                "SELECT 1 FROM documents WHERE collection = ? AND id = ?",
                (T::COLLECTION, record.id()),
                |r| r.get(0),
            )
            .optional()?;
        if exists.is_some() {
            return Err(Error::invalid(format!(
                "duplicate {} id: {}",
                T::KIND,
                record.id()
            )));
        }
        let doc = serde_json::to_string(&record)?;
        self.conn.execute(
            "INSERT INTO documents(collection, id, doc, written_at)
             VALUES(?, ?, ?, strftime('%Y-%m-%dT%H:%M:%SZ','now'))",
            (T::COLLECTION, record.id(), &doc),
        )?;
        Ok(())
    }

    fn replace(&mut self, record: T) -> Result<()> {
        let doc = serde_json::to_string(&record)?;
        let changed = self.conn.execute(
            "UPDATE documents
             SET doc = ?, written_at = strftime('%Y-%m-%dT%H:%M:%SZ','now')
             WHERE collection = ? AND id = ?",
            (&doc, T::COLLECTION, record.id()),
        )?;
        if changed == 0 {
            return Err(Error::not_found(T::KIND, record.id()));
        }
        Ok(())
    }

    /// One transaction; an existing row keeps its position.
    fn upsert_all(&mut self, records: Vec<T>) -> Result<()> {
        let tx = self.conn.transaction()?;
        for record in &records {
            let doc = serde_json::to_string(record)?;
            tx.execute(
                "INSERT INTO documents(collection, id, doc, written_at)
                 VALUES(?, ?, ?, strftime('%Y-%m-%dT%H:%M:%SZ','now'))
                 ON CONFLICT(collection, id) DO UPDATE
                 SET doc = excluded.doc, written_at = excluded.written_at",
                (T::COLLECTION, record.id(), &doc),
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    fn remove(&mut self, id: &str) -> Result<bool> {
        let changed = self.conn.execute(
            "DELETE FROM documents WHERE collection = ? AND id = ?",
            (T::COLLECTION, id),
        )?;
        Ok(changed > 0)
    }
}
