use rust_decimal::Decimal;
use std::collections::HashSet;
use std::hash::Hash;

use crate::model::{TaskRecord, TransactionRecord};

/// The identity used to decide that two records are the same.
pub trait DedupKey {
    type Key: Eq + Hash;

    fn dedup_key(&self) -> Self::Key;
}

impl DedupKey for TaskRecord {
    type Key = (String, Option<String>, Option<Decimal>);

    fn dedup_key(&self) -> Self::Key {
        (
            self.title.to_lowercase(),
            self.due.clone(),
            self.weight.map(|w| w.normalize()),
        )
    }
}

impl DedupKey for TransactionRecord {
    type Key = (String, String, Decimal);

    fn dedup_key(&self) -> Self::Key {
        (
            self.date.clone(),
            self.description.clone(),
            self.amount.normalize(),
        )
    }
}

/// Drop records whose key was already seen, keeping first occurrences in
/// their original order.
pub fn dedupe<T: DedupKey>(records: Vec<T>) -> Vec<T> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|r| seen.insert(r.dedup_key()))
        .collect()
}
