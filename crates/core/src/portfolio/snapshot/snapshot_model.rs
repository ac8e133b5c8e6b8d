use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Last recorded valuation per holding key.
///
/// Serialized as a flat JSON object: `{"IRP/360750": 1224250, ...}`.
/// Amounts keep every digit of the `Decimal` (rust_decimal's arbitrary
/// precision serde), so a saved snapshot loads back unchanged.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct Snapshot {
    amounts: BTreeMap<String, Decimal>,
}

impl Snapshot {
    pub fn new(amounts: BTreeMap<String, Decimal>) -> Self {
        Self { amounts }
    }

    pub fn get(&self, key: &str) -> Option<Decimal> {
        self.amounts.get(key).copied()
    }

    pub fn insert(&mut self, key: impl Into<String>, amount: Decimal) {
        self.amounts.insert(key.into(), amount);
    }

    pub fn len(&self) -> usize {
        self.amounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.amounts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Decimal)> {
        self.amounts.iter()
    }

    pub fn into_inner(self) -> BTreeMap<String, Decimal> {
        self.amounts
    }
}

impl FromIterator<(String, Decimal)> for Snapshot {
    fn from_iter<I: IntoIterator<Item = (String, Decimal)>>(iter: I) -> Self {
        Self {
            amounts: iter.into_iter().collect(),
        }
    }
}
