// Copyright (c) 2024 Mike Tsao

use crate::{codec::ValueRecord, prelude::*};
use rustc_hash::FxHashMap;

/// The last value observed at each `(command, X, Y)`, with 1-based
/// coordinates. Entries appear on first observation and are only replaced,
/// never evicted, until the whole cache is cleared.
#[derive(Debug, Default)]
pub struct ValueCache {
    values: FxHashMap<CommandIndex, FxHashMap<(u32, u32), ScpValue>>,
}
impl ValueCache {
    /// Stores a decoded record and returns the coordinates it landed at.
    pub fn apply(&mut self, record: &ValueRecord) -> (u32, u32) {
        let (x, y) = record.coordinates();
        self.insert(record.index, x, y, record.val.clone());
        (x, y)
    }

    #[allow(missing_docs)]
    pub fn insert(&mut self, index: CommandIndex, x: u32, y: u32, value: ScpValue) {
        self.values.entry(index).or_default().insert((x, y), value);
    }

    #[allow(missing_docs)]
    pub fn get(&self, index: CommandIndex, x: u32, y: u32) -> Option<&ScpValue> {
        self.values.get(&index).and_then(|m| m.get(&(x, y)))
    }

    /// Every cached coordinate for one command.
    pub fn values_for(
        &self,
        index: CommandIndex,
    ) -> impl Iterator<Item = ((u32, u32), &ScpValue)> + '_ {
        self.values
            .get(&index)
            .into_iter()
            .flat_map(|m| m.iter().map(|(k, v)| (*k, v)))
    }

    #[allow(missing_docs)]
    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// How many coordinates hold a value.
    pub fn len(&self) -> usize {
        self.values.values().map(FxHashMap::len).sum()
    }

    #[allow(missing_docs)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
