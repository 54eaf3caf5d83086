//! Entity store: the cards and their logical deck order.
//!
//! The deck order is the single source of truth for which slot a row card
//! occupies and for the outcome of a shuffle. It is kept in an `im::Vector`
//! so the shuffle loop can hold an O(1) snapshot of the pre-shuffle order
//! while the live order is permuted.

use im::Vector;
use rustc_hash::{FxHashMap, FxHashSet};

use super::card::{Card, CardId, CardSpec};
use crate::core::error::BoardError;
use crate::core::rng::BoardRng;

/// Cards by id plus their order.
///
/// ## Invariants
///
/// - `order` holds every card id exactly once
/// - cards are never added or removed after construction
#[derive(Clone, Debug, Default)]
pub struct EntityStore {
    cards: FxHashMap<CardId, Card>,
    order: Vector<CardId>,
}

impl EntityStore {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from specs, keeping their order.
    ///
    /// Fails on the first duplicated id.
    pub fn from_specs(specs: impl IntoIterator<Item = CardSpec>) -> Result<Self, BoardError> {
        let mut store = Self::new();
        for spec in specs {
            if store.cards.contains_key(&spec.id) {
                return Err(BoardError::DuplicateCard(spec.id));
            }
            store.order.push_back(spec.id.clone());
            store.cards.insert(spec.id.clone(), Card::from_spec(spec));
        }
        Ok(store)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    #[must_use]
    pub fn contains(&self, id: &CardId) -> bool {
        self.cards.contains_key(id)
    }

    #[must_use]
    pub fn get(&self, id: &CardId) -> Option<&Card> {
        self.cards.get(id)
    }

    pub fn get_mut(&mut self, id: &CardId) -> Option<&mut Card> {
        self.cards.get_mut(id)
    }

    /// Like `get`, but an error for unknown ids.
    pub fn require(&self, id: &CardId) -> Result<&Card, BoardError> {
        self.cards
            .get(id)
            .ok_or_else(|| BoardError::UnknownCard(id.clone()))
    }

    /// Like `get_mut`, but an error for unknown ids.
    pub fn require_mut(&mut self, id: &CardId) -> Result<&mut Card, BoardError> {
        self.cards
            .get_mut(id)
            .ok_or_else(|| BoardError::UnknownCard(id.clone()))
    }

    /// The deck order.
    #[must_use]
    pub fn order(&self) -> &Vector<CardId> {
        &self.order
    }

    /// O(1) copy of the current order.
    #[must_use]
    pub fn order_snapshot(&self) -> Vector<CardId> {
        self.order.clone()
    }

    /// Index of a card in the deck order.
    #[must_use]
    pub fn position(&self, id: &CardId) -> Option<usize> {
        self.order.index_of(id)
    }

    /// Cards in deck order.
    pub fn ordered(&self) -> impl Iterator<Item = &Card> + '_ {
        self.order.iter().filter_map(move |id| self.cards.get(id))
    }

    /// Turn every card face down.
    pub fn hide_all(&mut self) {
        for card in self.cards.values_mut() {
            card.hide();
        }
    }

    /// Uniformly permute the deck order in place.
    ///
    /// For `i` from the last index down to 1, swap element `i` with a
    /// uniformly chosen element in `0..=i`.
    pub fn permute(&mut self, rng: &mut BoardRng) {
        for i in (1..self.order.len()).rev() {
            let j = rng.gen_index(i + 1);
            self.order.swap(i, j);
        }
    }

    /// Replace the deck order.
    ///
    /// `new_order` must contain exactly the ids already in the store.
    pub fn set_order(&mut self, new_order: Vec<CardId>) -> Result<(), BoardError> {
        if new_order.len() != self.order.len() {
            return Err(BoardError::OrderMismatch);
        }
        let mut seen = FxHashSet::default();
        for id in &new_order {
            if !self.cards.contains_key(id) || !seen.insert(id) {
                return Err(BoardError::OrderMismatch);
            }
        }
        self.order = new_order.into_iter().collect();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn specs(names: &[&str]) -> Vec<CardSpec> {
        names.iter().map(|n| CardSpec::new(*n, n.to_uppercase())).collect()
    }

    fn ids(names: &[&str]) -> Vec<CardId> {
        names.iter().map(|n| CardId::new(*n)).collect()
    }

    #[test]
    fn test_from_specs_keeps_order() {
        let store = EntityStore::from_specs(specs(&["a", "b", "c"])).unwrap();

        assert_eq!(store.len(), 3);
        assert_eq!(store.order().iter().cloned().collect::<Vec<_>>(), ids(&["a", "b", "c"]));
        assert_eq!(store.position(&CardId::new("c")), Some(2));
        assert_eq!(store.get(&CardId::new("b")).unwrap().display_name, "B");
    }

    #[test]
    fn test_duplicate_rejected() {
        let err = EntityStore::from_specs(specs(&["a", "b", "a"])).unwrap_err();
        assert_eq!(err, BoardError::DuplicateCard(CardId::new("a")));
    }

    #[test]
    fn test_require_unknown() {
        let store = EntityStore::from_specs(specs(&["a"])).unwrap();
        assert!(matches!(
            store.require(&CardId::new("zz")),
            Err(BoardError::UnknownCard(_))
        ));
    }

    #[test]
    fn test_permute_is_bijection() {
        let names: Vec<String> = (0..30).map(|i| format!("c{}", i)).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let mut store = EntityStore::from_specs(specs(&refs)).unwrap();
        let before = store.order_snapshot();

        let mut rng = BoardRng::new(42);
        store.permute(&mut rng);

        let mut after: Vec<_> = store.order().iter().cloned().collect();
        assert_ne!(after, before.iter().cloned().collect::<Vec<_>>());

        after.sort();
        let mut expected: Vec<_> = before.into_iter().collect();
        expected.sort();
        assert_eq!(after, expected);
    }

    #[test]
    fn test_permute_single_card() {
        let mut store = EntityStore::from_specs(specs(&["only"])).unwrap();
        store.permute(&mut BoardRng::new(1));
        assert_eq!(store.order().iter().cloned().collect::<Vec<_>>(), ids(&["only"]));
    }

    #[test]
    fn test_snapshot_is_independent() {
        let mut store = EntityStore::from_specs(specs(&["a", "b", "c", "d", "e", "f"])).unwrap();
        let snapshot = store.order_snapshot();

        store.set_order(ids(&["f", "e", "d", "c", "b", "a"])).unwrap();

        assert_eq!(snapshot.front(), Some(&CardId::new("a")));
        assert_eq!(store.order().front(), Some(&CardId::new("f")));
    }

    #[test]
    fn test_set_order_validation() {
        let mut store = EntityStore::from_specs(specs(&["a", "b", "c"])).unwrap();

        assert_eq!(store.set_order(ids(&["a", "b"])), Err(BoardError::OrderMismatch));
        assert_eq!(store.set_order(ids(&["a", "a", "b"])), Err(BoardError::OrderMismatch));
        assert_eq!(store.set_order(ids(&["a", "b", "x"])), Err(BoardError::OrderMismatch));

        // Failed calls leave the order untouched
        assert_eq!(store.order().iter().cloned().collect::<Vec<_>>(), ids(&["a", "b", "c"]));

        store.set_order(ids(&["c", "a", "b"])).unwrap();
        assert_eq!(store.position(&CardId::new("c")), Some(0));
    }

    #[test]
    fn test_hide_all() {
        let mut store = EntityStore::from_specs(specs(&["a", "b"])).unwrap();
        store.get_mut(&CardId::new("a")).unwrap().reveal();
        store.hide_all();
        assert!(store.ordered().all(|c| !c.is_revealed()));
    }
}
