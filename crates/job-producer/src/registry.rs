//! Memory of written keys and hash fields.
//!
//! The registry only biases later selection toward realistic reuse; it never
//! tries to model what the store actually holds. Entries are keyed by a
//! length-prefixed token so that distinct strings can never collide.

use indexmap::IndexMap;

/// Collision-safe token for a value: `"<byte length>:<value>"`.
pub fn token(value: &str) -> String {
    format!("{}:{}", value.len(), value)
}

/// Keys and hash fields written so far, in first-write order.
#[derive(Debug, Clone, Default)]
pub struct KnownRegistry {
    keys: IndexMap<String, String>,
    hash_fields: IndexMap<String, IndexMap<String, String>>,
}

impl KnownRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember a key written by a bulk write.
    pub fn remember_key(&mut self, key: &str) {
        self.keys.insert(token(key), key.to_string());
    }

    /// Remember a field written into a hash.
    pub fn remember_hash_field(&mut self, hash: &str, field: &str) {
        self.hash_fields
            .entry(token(hash))
            .or_default()
            .insert(token(field), field.to_string());
    }

    /// Forget a deleted key, both as plain key and as hash.
    ///
    /// Survivors keep their relative order.
    pub fn forget(&mut self, key: &str) {
        let token = token(key);
        self.keys.shift_remove(&token);
        self.hash_fields.shift_remove(&token);
    }

    /// Number of known keys.
    pub fn key_count(&self) -> usize {
        self.keys.len()
    }

    /// Known key at a position, in first-write order.
    pub fn key_at(&self, index: usize) -> Option<&str> {
        self.keys.get_index(index).map(|(_, key)| key.as_str())
    }

    /// Check whether a key is known.
    pub fn knows_key(&self, key: &str) -> bool {
        self.keys.contains_key(&token(key))
    }

    /// Known fields of a hash, in first-write order.
    pub fn fields_of(&self, hash: &str) -> Vec<&str> {
        self.hash_fields
            .get(&token(hash))
            .map(|fields| fields.values().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Check whether nothing has been remembered.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty() && self.hash_fields.is_empty()
    }
}
