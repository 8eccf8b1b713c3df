//! The mock API contract, implemented once for every entity.
//!
//! Each call waits out an artificial latency and then works directly on the
//! backing [`Store`]. Creates and updates go through JSON so that a patch is
//! a shallow merge of top-level keys, exactly like spreading an object.

use std::thread;
use std::time::Duration;

use chrono::Utc;
use serde_json::{json, Map, Value};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::listing::{run_query, ListQuery, Page};
use crate::store::{MemoryStore, Record, Store};

/// Keys a patch may not overwrite.
const SERVER_FIELDS: [&str; 3] = ["id", "createdAt", "updatedAt"];

pub struct Repository<T: Record> {
    store: Box<dyn Store<T>>,
    latency: Duration,
}

impl<T: Record> Repository<T> {
    pub fn in_memory(records: Vec<T>, latency: Duration) -> Result<Self> {
        Ok(Self::with_store(
            Box::new(MemoryStore::with_records(records)?),
            latency,
        ))
    }

    pub fn with_store(store: Box<dyn Store<T>>, latency: Duration) -> Self {
        Self { store, latency }
    }

    /// Swap the backing store, e.g. once a workspace is opened.
    pub fn replace_store(&mut self, store: Box<dyn Store<T>>) {
        self.store = store;
    }

    fn delay(&self) {
        if !self.latency.is_zero() {
            tracing::trace!(collection = T::COLLECTION, latency = ?self.latency, "simulated latency");
            thread::sleep(self.latency);
        }
    }

    pub fn all(&self) -> Result<Vec<T>> {
        self.delay();
        self.store.all()
    }

    pub fn list(&self, query: &ListQuery) -> Result<Page<T>> {
        let records = self.all()?;
        run_query(&records, query)
    }

    pub fn get(&self, id: &str) -> Result<T> {
        self.delay();
        self.store
            .get(id)?
            .ok_or_else(|| Error::not_found(T::KIND, id))
    }

    /// Store a new record built from `input`, assigning `id` and `createdAt`.
    pub fn create(&mut self, input: Value) -> Result<T> {
        self.delay();
        let Value::Object(mut doc) = input else {
            return Err(Error::invalid(format!("{} must be an object", T::KIND)));
        };
        doc.insert("id".to_string(), Value::String(Uuid::new_v4().to_string()));
        doc.insert("createdAt".to_string(), json!(Utc::now()));
        doc.remove("updatedAt");

        let mut record = decode::<T>(doc)?;
        let existing = self.store.all()?;
        record.on_create(&existing);
        record.validate()?;
        self.store.insert(record.clone())?;
        tracing::debug!(collection = T::COLLECTION, id = record.id(), "record created");
        Ok(record)
    }

    /// Shallow-merge `patch` onto the record and bump `updatedAt`.
    pub fn update(&mut self, id: &str, patch: &Value) -> Result<T> {
        self.delay();
        let Value::Object(patch) = patch else {
            return Err(Error::invalid("patch must be an object"));
        };
        let current = self
            .store
            .get(id)?
            .ok_or_else(|| Error::not_found(T::KIND, id))?;
        let Value::Object(mut doc) = serde_json::to_value(&current)? else {
            return Err(Error::invalid(format!("{} is not an object", T::KIND)));
        };
        for (key, value) in patch {
            if SERVER_FIELDS.contains(&key.as_str()) {
                continue;
            }
            doc.insert(key.clone(), value.clone());
        }
        doc.insert("updatedAt".to_string(), json!(Utc::now()));

        let merged = decode::<T>(doc)?;
        merged.validate()?;
        self.store.replace(merged.clone())?;
        tracing::debug!(collection = T::COLLECTION, id, "record updated");
        Ok(merged)
    }

    /// Remove by id. A missing id is not an error.
    pub fn delete(&mut self, id: &str) -> Result<bool> {
        self.delay();
        let removed = self.store.remove(id)?;
        tracing::debug!(collection = T::COLLECTION, id, removed, "record deleted");
        Ok(removed)
    }

    /// Write complete records as-is, used by imports. Nothing is written
    /// unless every record validates.
    pub fn upsert_all(&mut self, records: Vec<T>) -> Result<usize> {
        self.delay();
        for record in &records {
            record.validate()?;
        }
        let count = records.len();
        self.store.upsert_all(records)?;
        tracing::debug!(collection = T::COLLECTION, count, "records upserted");
        Ok(count)
    }
}

fn decode<T: Record>(doc: Map<String, Value>) -> Result<T> {
    serde_json::from_value(Value::Object(doc))
        .map_err(|e| Error::invalid(format!("invalid {}: {e}", T::KIND)))
}
