//! Lazy remote-mapping proxy.
//!
//! A [`RemoteMap`] presents a key→value view whose backing store is a remote
//! resource. Nothing is fetched until an operation runs, nothing is cached
//! between operations, and each of the four capabilities (fetch, remove,
//! insert, extend) is independently optional — some resources are read-only,
//! some append-only, some full CRUD. Operations without a backing capability
//! fail with [`AmsError::NotSupported`].

use std::collections::BTreeMap;
use std::fmt;

use crate::error::{AmsError, AmsResult};

type FetchFn<K, V> = Box<dyn Fn() -> AmsResult<BTreeMap<K, V>>>;
type RemoveFn<K> = Box<dyn Fn(&K) -> AmsResult<()>>;
type InsertFn<K, V> = Box<dyn Fn(&K, &V) -> AmsResult<()>>;
type ExtendFn<K, V> = Box<dyn Fn(&BTreeMap<K, V>) -> AmsResult<()>>;

/// Map-like view over a remote resource.
///
/// Every read goes back to the service; mutations serialize through the
/// configured capability closures. See the module docs for the capability
/// model.
pub struct RemoteMap<K, V> {
    fetch_fn: Option<FetchFn<K, V>>,
    remove_fn: Option<RemoveFn<K>>,
    insert_fn: Option<InsertFn<K, V>>,
    extend_fn: Option<ExtendFn<K, V>>,
}

impl<K, V> Default for RemoteMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> RemoteMap<K, V> {
    /// Create a mapping with no capabilities configured.
    pub fn new() -> Self {
        Self {
            fetch_fn: None,
            remove_fn: None,
            insert_fn: None,
            extend_fn: None,
        }
    }

    /// Configure the read capability: produce the full current mapping.
    pub fn with_fetch(mut self, f: impl Fn() -> AmsResult<BTreeMap<K, V>> + 'static) -> Self {
        self.fetch_fn = Some(Box::new(f));
        self
    }

    /// Configure the delete capability: remove one key remotely.
    pub fn with_remove(mut self, f: impl Fn(&K) -> AmsResult<()> + 'static) -> Self {
        self.remove_fn = Some(Box::new(f));
        self
    }

    /// Configure the write-one capability: set one key/value remotely.
    pub fn with_insert(mut self, f: impl Fn(&K, &V) -> AmsResult<()> + 'static) -> Self {
        self.insert_fn = Some(Box::new(f));
        self
    }

    /// Configure the write-many capability: push a whole batch remotely.
    pub fn with_extend(
        mut self,
        f: impl Fn(&BTreeMap<K, V>) -> AmsResult<()> + 'static,
    ) -> Self {
        self.extend_fn = Some(Box::new(f));
        self
    }
}

impl<K, V> RemoteMap<K, V>
where
    K: Ord + fmt::Display,
{
    /// Fetch the full current mapping from the service.
    ///
    /// Invoked fresh on every call; there is no caching.
    pub fn fetch(&self) -> AmsResult<BTreeMap<K, V>> {
        match &self.fetch_fn {
            Some(f) => f(),
            None => Err(AmsError::NotSupported { operation: "fetch" }),
        }
    }

    /// Look up one key, fetching the current mapping first.
    pub fn get(&self, key: &K) -> AmsResult<V> {
        self.fetch()?
            .remove(key)
            .ok_or_else(|| AmsError::NotFound(key.to_string()))
    }

    /// Whether the current mapping contains `key`.
    pub fn contains_key(&self, key: &K) -> AmsResult<bool> {
        Ok(self.fetch()?.contains_key(key))
    }

    /// Number of entries in the current mapping.
    pub fn len(&self) -> AmsResult<usize> {
        Ok(self.fetch()?.len())
    }

    /// Whether the current mapping is empty.
    pub fn is_empty(&self) -> AmsResult<bool> {
        Ok(self.fetch()?.is_empty())
    }

    /// Keys of the current mapping, in order.
    pub fn keys(&self) -> AmsResult<Vec<K>> {
        Ok(self.fetch()?.into_keys().collect())
    }

    /// Values of the current mapping, in key order.
    pub fn values(&self) -> AmsResult<Vec<V>> {
        Ok(self.fetch()?.into_values().collect())
    }

    /// Set one key/value remotely.
    ///
    /// Uses the insert capability when configured, otherwise falls back to
    /// the extend capability with a single-entry batch.
    pub fn insert(&self, key: K, value: V) -> AmsResult<()> {
        if let Some(f) = &self.insert_fn {
            return f(&key, &value);
        }
        if let Some(f) = &self.extend_fn {
            let mut batch = BTreeMap::new();
            batch.insert(key, value);
            return f(&batch);
        }
        Err(AmsError::NotSupported {
            operation: "insert",
        })
    }

    /// Remove one key remotely.
    pub fn remove(&self, key: &K) -> AmsResult<()> {
        match &self.remove_fn {
            Some(f) => f(key),
            None => Err(AmsError::NotSupported {
                operation: "remove",
            }),
        }
    }

    /// Push a batch of entries remotely.
    ///
    /// With the extend capability this is a single backing call for the whole
    /// batch; without it, degrades to one [`insert`](Self::insert) per entry
    /// in key order.
    pub fn extend(&self, entries: BTreeMap<K, V>) -> AmsResult<()> {
        if let Some(f) = &self.extend_fn {
            return f(&entries);
        }
        for (key, value) in entries {
            self.insert(key, value)?;
        }
        Ok(())
    }

    /// Read the value for `key`, then remove the key remotely.
    ///
    /// Not atomic: the read and the remove are two separate round trips, so a
    /// concurrent external delete between them surfaces as
    /// [`AmsError::NotFound`] from the read step.
    pub fn pop(&self, key: &K) -> AmsResult<V> {
        let value = self.get(key)?;
        self.remove(key)?;
        Ok(value)
    }
}

impl<K, V> fmt::Debug for RemoteMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteMap")
            .field("fetch", &self.fetch_fn.is_some())
            .field("remove", &self.remove_fn.is_some())
            .field("insert", &self.insert_fn.is_some())
            .field("extend", &self.extend_fn.is_some())
            .finish()
    }
}
