//! Drawn-number set
//!
//! Insertion order is the draw order. It matters for display only; matching
//! treats the set as unordered.

use serde::{Deserialize, Serialize};

/// Ordered, duplicate-free sequence of drawn numbers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DrawnNumbers(Vec<u8>);

impl DrawnNumbers {
    /// Create an empty draw
    pub fn new() -> Self {
        DrawnNumbers(Vec::new())
    }

    /// Append `number` unless it was already drawn
    ///
    /// Returns whether the set changed.
    pub fn insert(&mut self, number: u8) -> bool {
        if self.contains(number) {
            return false;
        }
        self.0.push(number);
        true
    }

    /// Remove `number` if present
    ///
    /// Returns whether the set changed.
    pub fn remove(&mut self, number: u8) -> bool {
        match self.0.iter().position(|n| *n == number) {
            Some(idx) => {
                self.0.remove(idx);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, number: u8) -> bool {
        self.0.contains(&number)
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Numbers in draw order
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Lookup table indexed by number, used by the matching engine
    pub(crate) fn membership(&self) -> [bool; 256] {
        let mut table = [false; 256];
        for n in &self.0 {
            table[usize::from(*n)] = true;
        }
        table
    }
}

impl FromIterator<u8> for DrawnNumbers {
    /// Collect numbers, dropping repeats after their first occurrence
    fn from_iter<I: IntoIterator<Item = u8>>(iter: I) -> Self {
        let mut drawn = DrawnNumbers::new();
        for n in iter {
            drawn.insert(n);
        }
        drawn
    }
}
