//! Registered identities, keyed by subject key.
//!
//! Account storage lives elsewhere; the login service only needs to know
//! whether a key is registered and what to call it.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::record::SubjectKey;

pub trait IdentityDirectory: Send + Sync {
    /// Display name for a registered key, `None` if unknown.
    fn display_name(&self, key: &SubjectKey) -> Option<String>;

    fn exists(&self, key: &SubjectKey) -> bool {
        self.display_name(key).is_some()
    }
}

/// In-memory directory for tests and demos.
#[derive(Debug, Default)]
pub struct MemoryDirectory {
    names: RwLock<HashMap<SubjectKey, String>>,
}

impl MemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers or renames an identity. Returns the previous name, if any.
    pub fn register(&self, key: SubjectKey, name: impl Into<String>) -> Option<String> {
        self.names.write().insert(key, name.into())
    }

    pub fn remove(&self, key: &SubjectKey) -> Option<String> {
        self.names.write().remove(key)
    }
}

impl IdentityDirectory for MemoryDirectory {
    fn display_name(&self, key: &SubjectKey) -> Option<String> {
        self.names.read().get(key).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_lookup() {
        let directory = MemoryDirectory::new();
        let key = SubjectKey::from_bytes(&[2u8; 33]);
        assert!(!directory.exists(&key));

        assert_eq!(directory.register(key.clone(), "alice"), None);
        assert_eq!(directory.display_name(&key).as_deref(), Some("alice"));
        assert_eq!(directory.register(key.clone(), "alicia").as_deref(), Some("alice"));

        assert_eq!(directory.remove(&key).as_deref(), Some("alicia"));
        assert!(!directory.exists(&key));
    }
}
