//! Session favorites, independent of all filter and sort state

use std::collections::BTreeSet;

/// User-marked record identifiers. Mutated only by explicit toggles and
/// never written by filtering or sorting.
#[derive(Debug, Default, Clone)]
pub struct FavoritesStore {
    ids: BTreeSet<String>,
}

impl FavoritesStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip membership; returns whether the id is now a favorite.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.to_string());
            true
        }
    }

    pub fn has(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_has_pure_set_semantics() {
        let mut store = FavoritesStore::new();
        assert!(store.toggle("pepe-base"));
        assert!(store.has("pepe-base"));
        assert!(!store.toggle("pepe-base"));
        assert!(!store.has("pepe-base"));
        assert!(store.is_empty());
    }
}
