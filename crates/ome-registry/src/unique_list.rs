//! Unique ordered collection
//!
//! Provides [`UniqueList`], a sequence that refuses duplicates while keeping
//! insertion order. Reference fields holding many targets of one type are
//! stored in it, keyed by [`NodeId`](crate::NodeId).

use std::collections::HashSet;
use std::hash::Hash;

/// Insertion-ordered sequence with set membership
///
/// Membership is backed by a hash index, so [`contains`](Self::contains)
/// is O(1) and [`contains_all`](Self::contains_all) is O(k).
///
/// # Invariants
/// - No element occurs twice.
/// - The sequence and the membership index always hold the same elements.
#[derive(Debug, Clone)]
pub struct UniqueList<T> {
    items: Vec<T>,
    index: HashSet<T>,
}

impl<T: Clone + Eq + Hash> UniqueList<T> {
    /// Create empty list
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            index: HashSet::new(),
        }
    }

    /// Append `item` unless it is already a member
    ///
    /// Returns `true` if the list changed.
    pub fn add(&mut self, item: T) -> bool {
        if !self.index.insert(item.clone()) {
            return false;
        }
        self.items.push(item);
        true
    }

    /// Insert `item` at `position` unless it is already a member
    ///
    /// Returns `true` if the list changed.
    ///
    /// # Panics
    /// Panics if `position > len()` and `item` is not already a member
    pub fn add_at(&mut self, position: usize, item: T) -> bool {
        if self.index.contains(&item) {
            return false;
        }
        self.items.insert(position, item.clone());
        self.index.insert(item);
        true
    }

    /// Remove `item`
    ///
    /// Returns `true` if it was a member.
    pub fn remove(&mut self, item: &T) -> bool {
        if !self.index.remove(item) {
            return false;
        }
        if let Some(pos) = self.items.iter().position(|x| x == item) {
            self.items.remove(pos);
        }
        true
    }

    /// Remove and return the element at `position`
    pub fn remove_at(&mut self, position: usize) -> Option<T> {
        if position >= self.items.len() {
            return None;
        }
        let item = self.items.remove(position);
        self.index.remove(&item);
        Some(item)
    }

    /// Replace the element at `position`
    ///
    /// Defined as "remove the element at `position`, then add `item` at
    /// `position`". If `item` is already a member elsewhere the add is a
    /// no-op, so the list ends up one element shorter and `item` stays where
    /// it was. Returns the removed element, or `None` (and no change) when
    /// `position` is out of bounds.
    pub fn set(&mut self, position: usize, item: T) -> Option<T> {
        let removed = self.remove_at(position)?;
        self.add_at(position, item);
        Some(removed)
    }

    /// Membership test
    #[inline]
    #[must_use]
    pub fn contains(&self, item: &T) -> bool {
        self.index.contains(item)
    }

    /// Check that every element of `items` is a member
    pub fn contains_all<'a>(&self, items: impl IntoIterator<Item = &'a T>) -> bool
    where
        T: 'a,
    {
        items.into_iter().all(|item| self.index.contains(item))
    }

    /// Remove all elements
    pub fn clear(&mut self) {
        self.items.clear();
        self.index.clear();
    }

    /// Element at `position`
    #[inline]
    #[must_use]
    pub fn get(&self, position: usize) -> Option<&T> {
        self.items.get(position)
    }

    /// Position of `item`
    #[must_use]
    pub fn index_of(&self, item: &T) -> Option<usize> {
        if !self.contains(item) {
            return None;
        }
        self.items.iter().position(|x| x == item)
    }

    /// Number of elements
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the list is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate in insertion order
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Read-only view of the sequence
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Copy of the sequence
    #[must_use]
    pub fn to_vec(&self) -> Vec<T> {
        self.items.clone()
    }
}

impl<T: Clone + Eq + Hash> Default for UniqueList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Eq + Hash> PartialEq for UniqueList<T> {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl<T: Clone + Eq + Hash> Eq for UniqueList<T> {}

impl<T: Clone + Eq + Hash> FromIterator<T> for UniqueList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = Self::new();
        for item in iter {
            list.add(item);
        }
        list
    }
}

impl<'a, T: Clone + Eq + Hash> IntoIterator for &'a UniqueList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
