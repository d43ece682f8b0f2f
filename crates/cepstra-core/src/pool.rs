//! Aggregation pool.
//!
//! A [`Pool`] is a keyed, append-only store written by the terminal ports of a
//! [`Network`](crate::graph::Network). Each key holds the tokens of one port
//! in arrival order. The first token written under a key fixes its element
//! type; later tokens of the other type are rejected.

use std::collections::BTreeMap;

use crate::error::DataError;
use crate::graph::Token;

/// Sequence stored under one pool key.
#[derive(Debug, Clone, PartialEq)]
pub enum PoolEntry {
    /// One scalar per token.
    Reals(Vec<f32>),
    /// One vector per token.
    Vectors(Vec<Vec<f32>>),
}

impl PoolEntry {
    /// Element type name, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            PoolEntry::Reals(_) => f32::TYPE_NAME,
            PoolEntry::Vectors(_) => <Vec<f32>>::TYPE_NAME,
        }
    }

    /// Number of stored values.
    pub fn len(&self) -> usize {
        match self {
            PoolEntry::Reals(v) => v.len(),
            PoolEntry::Vectors(v) => v.len(),
        }
    }

    /// Returns `true` if no values are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Element types retrievable from a [`Pool`].
pub trait PoolValue: Sized {
    /// Name used in [`DataError::TypeMismatch`].
    const TYPE_NAME: &'static str;

    /// Borrowed view of `entry` if it holds this type.
    fn view(entry: &PoolEntry) -> Option<&[Self]>;

    /// Owned contents of `entry` if it holds this type, or the entry back.
    fn unwrap_entry(entry: PoolEntry) -> Result<Vec<Self>, PoolEntry>;
}

impl PoolValue for f32 {
    const TYPE_NAME: &'static str = "real";

    fn view(entry: &PoolEntry) -> Option<&[Self]> {
        match entry {
            PoolEntry::Reals(v) => Some(v.as_slice()),
            PoolEntry::Vectors(_) => None,
        }
    }

    fn unwrap_entry(entry: PoolEntry) -> Result<Vec<Self>, PoolEntry> {
        match entry {
            PoolEntry::Reals(v) => Ok(v),
            other => Err(other),
        }
    }
}

impl PoolValue for Vec<f32> {
    const TYPE_NAME: &'static str = "vector";

    fn view(entry: &PoolEntry) -> Option<&[Self]> {
        match entry {
            PoolEntry::Vectors(v) => Some(v.as_slice()),
            PoolEntry::Reals(_) => None,
        }
    }

    fn unwrap_entry(entry: PoolEntry) -> Result<Vec<Self>, PoolEntry> {
        match entry {
            PoolEntry::Vectors(v) => Ok(v),
            other => Err(other),
        }
    }
}

/// Keyed, multi-valued, append-only store.
///
/// # Example
///
/// ```rust
/// use cepstra_core::{Pool, Token};
///
/// let mut pool = Pool::new();
/// pool.append("rms", Token::Real(0.5)).unwrap();
/// pool.append("rms", Token::Real(0.25)).unwrap();
///
/// assert_eq!(pool.value::<f32>("rms").unwrap(), [0.5, 0.25]);
/// assert!(pool.value::<Vec<f32>>("rms").is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Pool {
    entries: BTreeMap<String, PoolEntry>,
}

impl Pool {
    /// Creates an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `token` to the sequence under `key`.
    ///
    /// # Errors
    ///
    /// [`DataError::TypeMismatch`] if `key` already holds the other element type.
    pub fn append(&mut self, key: &str, token: Token) -> Result<(), DataError> {
        let empty = match token {
            Token::Real(_) => PoolEntry::Reals(Vec::new()),
            Token::Vector(_) => PoolEntry::Vectors(Vec::new()),
        };
        let entry = self.entries.entry(key.to_string()).or_insert(empty);

        match (entry, token) {
            (PoolEntry::Reals(values), Token::Real(v)) => values.push(v),
            (PoolEntry::Vectors(values), Token::Vector(v)) => values.push(v),
            (entry, token) => {
                return Err(DataError::TypeMismatch {
                    key: key.to_string(),
                    stored: entry.type_name(),
                    requested: token.port_type().name(),
                });
            }
        }
        Ok(())
    }

    /// Returns the sequence accumulated under `key`.
    ///
    /// # Errors
    ///
    /// - [`DataError::KeyNotFound`] if nothing was written under `key`
    /// - [`DataError::TypeMismatch`] if `key` holds the other element type
    pub fn value<T: PoolValue + Clone>(&self, key: &str) -> Result<Vec<T>, DataError> {
        let entry = self
            .entries
            .get(key)
            .ok_or_else(|| DataError::KeyNotFound(key.to_string()))?;
        T::view(entry)
            .map(<[T]>::to_vec)
            .ok_or_else(|| mismatch::<T>(key, entry))
    }

    /// Removes `key` and returns its sequence.
    ///
    /// On a type mismatch the entry stays in the pool.
    pub fn take<T: PoolValue>(&mut self, key: &str) -> Result<Vec<T>, DataError> {
        let entry = self
            .entries
            .remove(key)
            .ok_or_else(|| DataError::KeyNotFound(key.to_string()))?;
        T::unwrap_entry(entry).map_err(|entry| {
            let err = mismatch::<T>(key, &entry);
            self.entries.insert(key.to_string(), entry);
            err
        })
    }

    /// Raw entry under `key`.
    pub fn get(&self, key: &str) -> Option<&PoolEntry> {
        self.entries.get(key)
    }

    /// Returns `true` if anything was written under `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Keys currently present, in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the pool holds no keys.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Clears one key back to empty. Returns `true` if it existed.
    pub fn remove(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Clears every key.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

fn mismatch<T: PoolValue>(key: &str, entry: &PoolEntry) -> DataError {
    DataError::TypeMismatch {
        key: key.to_string(),
        stored: entry.type_name(),
        requested: T::TYPE_NAME,
    }
}
