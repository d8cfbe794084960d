//!
//! Symbols and their finite domains
//!
use crate::error::{HmmError, Result};
use fnv::FnvHashMap;
use std::fmt::Debug;
use std::hash::Hash;

//
// traits
//

///
/// Identifier of a hidden state or of an observation.
///
/// Anything comparable, hashable and printable can be a symbol, e.g.
/// a fieldless enum, `char`, `u8` or `String`.
///
pub trait Symbol: Clone + Eq + Hash + Debug + Send + Sync {}

impl<T> Symbol for T where T: Clone + Eq + Hash + Debug + Send + Sync {}

/// Probability assigned to each hidden state, indexed by state index.
pub type StateProbs = Vec<f64>;

///
/// Ordered finite set of symbols.
///
/// Every symbol has a dense index `0..len()`, which is used to index all
/// the probability tables and accumulators.
///
#[derive(Debug, Clone)]
pub struct Domain<T: Symbol> {
    /// name of the domain used in error messages (`state` or `observation`)
    name: &'static str,
    items: Vec<T>,
    index: FnvHashMap<T, usize>,
}

impl<T: Symbol> Domain<T> {
    ///
    /// Create a domain from the symbols in the given order.
    ///
    /// Fails if `items` is empty or has a duplicated symbol.
    ///
    pub fn new(name: &'static str, items: Vec<T>) -> Result<Self> {
        if items.is_empty() {
            return Err(HmmError::EmptyDomain(name));
        }
        let mut index = FnvHashMap::default();
        for (i, item) in items.iter().enumerate() {
            if index.insert(item.clone(), i).is_some() {
                return Err(HmmError::DuplicateSymbol {
                    domain: name,
                    symbol: format!("{:?}", item),
                });
            }
        }
        Ok(Domain { name, items, index })
    }
    /// The number of symbols
    pub fn len(&self) -> usize {
        self.items.len()
    }
    /// Always false for a constructed domain
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
    pub fn name(&self) -> &'static str {
        self.name
    }
    /// Symbols in index order
    pub fn items(&self) -> &[T] {
        &self.items
    }
    ///
    /// Get the symbol of index `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= len()`.
    pub fn get(&self, i: usize) -> &T {
        &self.items[i]
    }
    ///
    /// Get the index of the symbol
    ///
    pub fn index_of(&self, item: &T) -> Result<usize> {
        self.index
            .get(item)
            .copied()
            .ok_or_else(|| HmmError::UnknownSymbol {
                domain: self.name,
                symbol: format!("{:?}", item),
            })
    }
    ///
    /// Convert the symbols into indices.
    ///
    pub fn encode(&self, items: &[T]) -> Result<Vec<usize>> {
        items.iter().map(|item| self.index_of(item)).collect()
    }
    ///
    /// Convert the indices back into symbols.
    ///
    pub fn decode(&self, indices: &[usize]) -> Vec<T> {
        indices.iter().map(|&i| self.items[i].clone()).collect()
    }
    /// Iterator of `(index, &symbol)`
    pub fn iter(&self) -> impl Iterator<Item = (usize, &T)> + '_ {
        self.items.iter().enumerate()
    }
    ///
    /// `Debug` rendering of the symbol of index `i`, for error messages.
    ///
    pub(crate) fn label(&self, i: usize) -> String {
        format!("{:?}", self.items[i])
    }
}

impl<T: Symbol> PartialEq for Domain<T> {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.items == other.items
    }
}

//
// Tests
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_index_roundtrip() {
        let d = Domain::new("observation", vec!["walk", "shop", "clean"]).unwrap();
        assert_eq!(d.len(), 3);
        assert_eq!(d.index_of(&"shop").unwrap(), 1);
        let xs = d.encode(&["clean", "walk", "walk"]).unwrap();
        assert_eq!(xs, vec![2, 0, 0]);
        assert_eq!(d.decode(&xs), vec!["clean", "walk", "walk"]);
    }
    #[test]
    fn domain_rejects_bad_input() {
        let empty: Vec<char> = vec![];
        assert!(matches!(
            Domain::new("state", empty),
            Err(HmmError::EmptyDomain("state"))
        ));
        assert!(matches!(
            Domain::new("state", vec!['A', 'B', 'A']),
            Err(HmmError::DuplicateSymbol { .. })
        ));
        let d = Domain::new("observation", vec!['x', 'y']).unwrap();
        assert!(matches!(
            d.encode(&['x', 'z']),
            Err(HmmError::UnknownSymbol { .. })
        ));
    }
}
