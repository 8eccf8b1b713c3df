use std::collections::{BTreeMap, HashMap};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::listing::Row;

/// An entity the back office keeps in a [`Store`].
pub trait Record: Row + Clone + Serialize + DeserializeOwned + std::fmt::Debug + 'static {
    /// Collection name, also the storage key for persisted documents.
    const COLLECTION: &'static str;

    fn id(&self) -> &str;

    /// Form-level rules checked on every create and update.
    fn validate(&self) -> Result<()> {
        Ok(())
    }

    /// Fill server-assigned fields before the first write.
    fn on_create(&mut self, _existing: &[Self]) {}
}

/// Keyed record storage. Listing order is insertion order.
pub trait Store<T: Record> {
    fn all(&self) -> Result<Vec<T>>;

    fn get(&self, id: &str) -> Result<Option<T>>;

    /// Append a record whose id is not yet present.
    fn insert(&mut self, record: T) -> Result<()>;

    /// Overwrite an existing record, keeping its position.
    fn replace(&mut self, record: T) -> Result<()>;

    /// Returns whether a record was removed.
    fn remove(&mut self, id: &str) -> Result<bool>;

    fn upsert(&mut self, record: T) -> Result<()> {
        if self.get(record.id())?.is_some() {
            self.replace(record)
        } else {
            self.insert(record)
        }
    }

    /// Upsert each record in order. Stores that can fail part way override
    /// this to write the batch atomically.
    fn upsert_all(&mut self, records: Vec<T>) -> Result<()> {
        for record in records {
            self.upsert(record)?;
        }
        Ok(())
    }
}

#[derive(Debug)]
pub struct MemoryStore<T> {
    rows: BTreeMap<u64, T>,
    index: HashMap<String, u64>,
    next_seq: u64,
}

impl<T> Default for MemoryStore<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            index: HashMap::new(),
            next_seq: 0,
        }
    }
}

impl<T: Record> MemoryStore<T> {
    pub fn with_records(records: Vec<T>) -> Result<Self> {
        let mut store = Self::default();
        for record in records {
            store.insert(record)?;
        }
        Ok(store)
    }
}

impl<T: Record> Store<T> for MemoryStore<T> {
    fn all(&self) -> Result<Vec<T>> {
        Ok(self.rows.values().cloned().collect())
    }

    fn get(&self, id: &str) -> Result<Option<T>> {
        Ok(self
            .index
            .get(id)
            .and_then(|seq| self.rows.get(seq))
            .cloned())
    }

    fn insert(&mut self, record: T) -> Result<()> {
        if self.index.contains_key(record.id()) {
            return Err(Error::invalid(format!(
                "duplicate {} id: {}",
                T::KIND,
                record.id()
            )));
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.index.insert(record.id().to_string(), seq);
        self.rows.insert(seq, record);
        Ok(())
    }

    fn replace(&mut self, record: T) -> Result<()> {
        let Some(seq) = self.index.get(record.id()).copied() else {
            return Err(Error::not_found(T::KIND, record.id()));
        };
        self.rows.insert(seq, record);
        Ok(())
    }

    fn remove(&mut self, id: &str) -> Result<bool> {
        match self.index.remove(id) {
            Some(seq) => Ok(self.rows.remove(&seq).is_some()),
            None => Ok(false),
        }
    }
}
