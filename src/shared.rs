//! Shared Store
//!
//! A cloneable, thread-safe handle around one [`Store`].
//!
//! `Store` itself has no internal locking. Callers that need to reach the
//! same store from several threads go through this wrapper, which holds one
//! mutex for the full duration of every call: writes and reads are fully
//! serialized, which is the only concurrency the log supports.

use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};

use crate::config::Config;
use crate::error::Result;
use crate::store::Store;

/// Cloneable handle that serializes every operation on a store
#[derive(Clone)]
pub struct SharedStore {
    inner: Arc<Mutex<Store>>,
}

impl SharedStore {
    /// Open a store and wrap it
    pub fn open(config: Config) -> Result<Self> {
        Ok(Self::new(Store::open(config)?))
    }

    /// Wrap an already open store
    pub fn new(store: Store) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    pub fn set(&self, key: &[u8], value: &[u8]) -> Result<()> {
        self.inner.lock().set(key, value)
    }

    pub fn delete(&self, key: &[u8]) -> Result<()> {
        self.inner.lock().delete(key)
    }

    pub fn get(&self, key: &[u8]) -> Result<Vec<u8>> {
        self.inner.lock().get(key)
    }

    pub fn has(&self, key: &[u8]) -> Result<bool> {
        self.inner.lock().has(key)
    }

    pub fn count(&self) -> Result<usize> {
        self.inner.lock().count()
    }

    /// Collect every live key under `prefix`
    ///
    /// Walk callbacks run with the lock held, so this hands back owned keys
    /// instead of exposing the callback form.
    pub fn keys(&self, prefix: &[u8]) -> Result<Vec<Vec<u8>>> {
        let store = self.inner.lock();
        let mut keys = Vec::new();
        store.walk_prefix(prefix, |key| {
            keys.push(key.to_vec());
            Ok(())
        })?;
        Ok(keys)
    }

    /// Collect every live key-value pair under `prefix`
    pub fn entries(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>> {
        let mut store = self.inner.lock();
        let mut entries = Vec::new();
        store.walk_prefix_key_value(prefix, |key, value| {
            entries.push((key.to_vec(), value.to_vec()));
            Ok(())
        })?;
        Ok(entries)
    }

    pub fn sync(&self) -> Result<()> {
        self.inner.lock().sync()
    }

    pub fn close(&self) -> Result<()> {
        self.inner.lock().close()
    }

    /// Run several operations under one lock acquisition
    pub fn with<T>(&self, f: impl FnOnce(&mut Store) -> T) -> T {
        let mut guard = self.inner.lock();
        f(&mut *guard)
    }

    /// Borrow the store directly; every other handle blocks until the guard drops
    pub fn lock(&self) -> MutexGuard<'_, Store> {
        self.inner.lock()
    }
}
