//! In-memory `DocumentStore` used by the service unit tests.
//!
//! It mimics the Firestore behaviour the services rely on: merge vs. overwrite
//! writes, idempotent deletes, equality/range filters, ordering (documents
//! missing an ordered field are excluded) and limits.
#![cfg(test)]

use async_trait::async_trait;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use crate::FitlogError;
use crate::store::{
    Direction, DocumentStore, Fields, FilterOp, Query, StoredDocument, Value, WriteMode,
};

#[derive(Default)]
pub struct MemoryStore {
    collections: Mutex<HashMap<String, BTreeMap<String, Fields>>>,
    fail_with: Option<u16>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every call fails with the given HTTP status.
    pub fn failing(status: u16) -> Self {
        Self {
            fail_with: Some(status),
            ..Self::default()
        }
    }

    /// Raw stored body, bypassing the entity codec.
    pub fn raw(&self, collection: &str, id: &str) -> Option<Fields> {
        let collections = self.collections.lock().unwrap();
        collections.get(collection).and_then(|c| c.get(id)).cloned()
    }

    pub fn insert_raw(&self, collection: &str, id: &str, fields: Fields) {
        let mut collections = self.collections.lock().unwrap();
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), fields);
    }

    fn check(&self) -> Result<(), FitlogError> {
        match self.fail_with {
            Some(status) => Err(FitlogError::Store {
                status,
                message: "injected failure".into(),
            }),
            None => Ok(()),
        }
    }
}

fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Integer(x), Value::Integer(y)) => Some(x.cmp(y)),
        (Value::Double(x), Value::Double(y)) => x.partial_cmp(y),
        (Value::Integer(x), Value::Double(y)) => (*x as f64).partial_cmp(y),
        (Value::Double(x), Value::Integer(y)) => x.partial_cmp(&(*y as f64)),
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        (Value::Timestamp(x), Value::Timestamp(y)) => Some(x.cmp(y)),
        (Value::Boolean(x), Value::Boolean(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

fn matches(fields: &Fields, query: &Query) -> bool {
    query.filters.iter().all(|filter| {
        let Some(value) = fields.get(&filter.field) else {
            return false;
        };
        let ord = compare(value, &filter.value);
        match filter.op {
            FilterOp::Equal => ord == Some(Ordering::Equal),
            FilterOp::GreaterThanOrEqual => {
                matches!(ord, Some(Ordering::Greater | Ordering::Equal))
            }
            FilterOp::LessThanOrEqual => matches!(ord, Some(Ordering::Less | Ordering::Equal)),
        }
    })
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get_document(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<StoredDocument>, FitlogError> {
        self.check()?;
        Ok(self.raw(collection, id).map(|fields| StoredDocument {
            id: id.to_string(),
            fields,
        }))
    }

    async fn set_document(
        &self,
        collection: &str,
        id: &str,
        fields: Fields,
        mode: WriteMode,
    ) -> Result<(), FitlogError> {
        self.check()?;
        let mut collections = self.collections.lock().unwrap();
        let docs = collections.entry(collection.to_string()).or_default();
        match mode {
            WriteMode::Overwrite => {
                docs.insert(id.to_string(), fields);
            }
            WriteMode::Merge => {
                docs.entry(id.to_string()).or_default().extend(fields);
            }
        }
        Ok(())
    }

    async fn delete_document(&self, collection: &str, id: &str) -> Result<(), FitlogError> {
        self.check()?;
        let mut collections = self.collections.lock().unwrap();
        if let Some(docs) = collections.get_mut(collection) {
            docs.remove(id);
        }
        Ok(())
    }

    async fn run_query(&self, query: &Query) -> Result<Vec<StoredDocument>, FitlogError> {
        self.check()?;
        let collections = self.collections.lock().unwrap();
        let Some(docs) = collections.get(&query.collection) else {
            return Ok(vec![]);
        };
        let mut found: Vec<StoredDocument> = docs
            .iter()
            .filter(|(_, fields)| matches(fields, query))
            .filter(|(_, fields)| query.order_by.iter().all(|o| fields.contains_key(&o.field)))
            .map(|(id, fields)| StoredDocument {
                id: id.clone(),
                fields: fields.clone(),
            })
            .collect();
        found.sort_by(|a, b| {
            for order in &query.order_by {
                let ord = compare(&a.fields[&order.field], &b.fields[&order.field])
                    .unwrap_or(Ordering::Equal);
                let ord = match order.direction {
                    Direction::Ascending => ord,
                    Direction::Descending => ord.reverse(),
                };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            Ordering::Equal
        });
        if let Some(limit) = query.limit {
            found.truncate(limit as usize);
        }
        Ok(found)
    }
}
