//! Typed view over one collection of a store handle.

use super::handle::StoreHandle;
use super::StoreResult;
use crate::model::record::{CollectionRecord, Record, RecordId};
use serde::Serialize;
use serde_json::Value;
use std::marker::PhantomData;

/// Typed CRUD bound to `T::COLLECTION`.
pub struct Repository<'h, T> {
    handle: &'h StoreHandle,
    _record: PhantomData<T>,
}

impl<'h, T: CollectionRecord> Repository<'h, T> {
    pub(crate) fn new(handle: &'h StoreHandle) -> Self {
        Self {
            handle,
            _record: PhantomData,
        }
    }

    pub fn collection(&self) -> &'static str {
        T::COLLECTION
    }

    pub fn add(&self, fields: &T) -> StoreResult<Record<T>> {
        let body = serde_json::to_value(fields)?;
        let id = self.handle.add(T::COLLECTION, body)?;
        self.get(&id)
    }

    pub fn get(&self, id: &RecordId) -> StoreResult<Record<T>> {
        let value = self.handle.get(T::COLLECTION, id)?;
        Ok(serde_json::from_value(value)?)
    }

    pub fn get_all(&self) -> StoreResult<Vec<Record<T>>> {
        decode_all(self.handle.get_all(T::COLLECTION)?)
    }

    pub fn get_all_by_index(
        &self,
        index: &str,
        value: impl Into<Value>,
    ) -> StoreResult<Vec<Record<T>>> {
        let value = value.into();
        decode_all(self.handle.get_all_by_index(T::COLLECTION, index, &value)?)
    }

    /// Shallow-merges the serialized `patch` into the stored record.
    pub fn update(&self, id: &RecordId, patch: &impl Serialize) -> StoreResult<Record<T>> {
        let patch = serde_json::to_value(patch)?;
        let value = self.handle.update(T::COLLECTION, id, patch)?;
        Ok(serde_json::from_value(value)?)
    }

    /// Writes every serialized field of `record` back to the store.
    pub fn put(&self, record: &Record<T>) -> StoreResult<Record<T>> {
        self.update(&record.id, &record.fields)
    }

    pub fn delete(&self, id: &RecordId) -> StoreResult<()> {
        self.handle.delete(T::COLLECTION, id)
    }

    pub fn count(&self) -> StoreResult<usize> {
        self.handle.count(T::COLLECTION)
    }
}

fn decode_all<T: CollectionRecord>(values: Vec<Value>) -> StoreResult<Vec<Record<T>>> {
    values
        .into_iter()
        .map(|value| serde_json::from_value(value).map_err(Into::into))
        .collect()
}
