use std::collections::BTreeMap;

use crate::error::{HuffError, Result};

/// Occurrence count per byte value. Only bytes that occur are present, and
/// iteration is always in ascending byte order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: BTreeMap<u8, u64>,
}

impl FrequencyTable {
    /// Counts every byte of `data` in a single pass.
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut dense = [0u64; 256];
        for &byte in data {
            dense[byte as usize] += 1;
        }
        let counts = (0..=u8::MAX)
            .zip(dense)
            .filter(|&(_, count)| count > 0)
            .collect();
        Self { counts }
    }

    /// Rebuilds a table from stored `(symbol, count)` pairs.
    ///
    /// Duplicate symbols and zero counts never come out of `from_bytes`, so
    /// they are rejected here.
    pub fn from_pairs<I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (u8, u64)>,
    {
        let mut counts = BTreeMap::new();
        for (symbol, count) in pairs {
            if count == 0 {
                return Err(HuffError::format(format!(
                    "symbol {symbol:#04x} stored with zero frequency"
                )));
            }
            if counts.insert(symbol, count).is_some() {
                return Err(HuffError::format(format!(
                    "symbol {symbol:#04x} stored twice"
                )));
            }
        }
        Ok(Self { counts })
    }

    pub fn get(&self, symbol: u8) -> Option<u64> {
        self.counts.get(&symbol).copied()
    }

    /// Number of distinct symbols.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts, which is the length of the counted input.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.counts.iter().map(|(&symbol, &count)| (symbol, count))
    }
}
