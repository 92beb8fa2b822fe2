//! In-memory SaveRepository implementation for tests and local runs.

use std::collections::HashMap;
use std::sync::RwLock;

use super::error::{RepositoryError, Result};
use super::traits::SaveRepository;

/// In-memory implementation of SaveRepository.
#[derive(Debug, Default)]
pub struct InMemorySaveRepository {
    slots: RwLock<HashMap<String, Vec<u8>>>,
}

impl InMemorySaveRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn check_slot(slot: &str) -> Result<()> {
    if slot.trim().is_empty() {
        return Err(RepositoryError::InvalidSlot(slot.to_owned()));
    }
    Ok(())
}

impl SaveRepository for InMemorySaveRepository {
    fn save(&self, slot: &str, blob: &[u8]) -> Result<()> {
        check_slot(slot)?;
        let mut slots = self
            .slots
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        slots.insert(slot.to_owned(), blob.to_vec());
        Ok(())
    }

    fn load(&self, slot: &str) -> Result<Option<Vec<u8>>> {
        check_slot(slot)?;
        let slots = self
            .slots
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(slots.get(slot).cloned())
    }

    fn exists(&self, slot: &str) -> bool {
        self.slots
            .read()
            .map(|slots| slots.contains_key(slot))
            .unwrap_or(false)
    }

    fn delete(&self, slot: &str) -> Result<()> {
        let mut slots = self
            .slots
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        slots.remove(slot);
        Ok(())
    }

    fn list_slots(&self) -> Result<Vec<String>> {
        let slots = self
            .slots
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        let mut names: Vec<String> = slots.keys().cloned().collect();
        names.sort();
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_replaces_previous_blob() {
        let repo = InMemorySaveRepository::new();
        repo.save("main", b"first").unwrap();
        repo.save("main", b"second").unwrap();
        assert_eq!(repo.load("main").unwrap(), Some(b"second".to_vec()));
        assert!(repo.exists("main"));
    }

    #[test]
    fn missing_slot_loads_as_none() {
        let repo = InMemorySaveRepository::new();
        assert_eq!(repo.load("nothing").unwrap(), None);
    }

    #[test]
    fn blank_slot_names_are_rejected() {
        let repo = InMemorySaveRepository::new();
        assert!(matches!(
            repo.save("  ", b"x"),
            Err(RepositoryError::InvalidSlot(_))
        ));
    }

    #[test]
    fn lists_and_deletes_slots() {
        let repo = InMemorySaveRepository::new();
        repo.save("b", b"2").unwrap();
        repo.save("a", b"1").unwrap();
        assert_eq!(repo.list_slots().unwrap(), vec!["a".to_owned(), "b".to_owned()]);

        repo.delete("a").unwrap();
        assert!(!repo.exists("a"));
        assert_eq!(repo.list_slots().unwrap(), vec!["b".to_owned()]);
    }
}
