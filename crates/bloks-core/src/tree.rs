//! Helpers over parsed trees: map search and statistics.

use std::collections::BTreeMap;

use crate::processor::MAP;
use crate::value::{Blok, Value};

/// Find the first map node that defines `key`.
///
/// Traversal is depth-first, pre-order, left to right, and only descends
/// through bloks. Only bloks named [`MAP`] are candidates, so raw
/// `bk.action.map.Make` nodes match only after the basic processors have
/// relabeled them. A map node qualifies when it has exactly two blok arguments
/// (keys and values) of equal length. Pairs with non-string keys are skipped;
/// on duplicate keys the last pair wins.
pub fn find_map<'a>(key: &str, root: &'a Value) -> Option<BTreeMap<&'a str, &'a Value>> {
    let blok = root.as_blok()?;
    if let Some(map) = map_entries(blok) {
        if map.contains_key(key) {
            return Some(map);
        }
    }
    blok.args.iter().find_map(|arg| find_map(key, arg))
}

/// Zip the keys and values of a map node.
///
/// Returns `None` if `blok` is not a well-formed map node.
pub fn map_entries(blok: &Blok) -> Option<BTreeMap<&str, &Value>> {
    if blok.name != MAP {
        return None;
    }
    let [keys, values] = blok.args.as_slice() else {
        return None;
    };
    let (keys, values) = (keys.as_blok()?, values.as_blok()?);
    if keys.args.len() != values.args.len() {
        return None;
    }
    Some(
        keys.args
            .iter()
            .zip(&values.args)
            .filter_map(|(k, v)| k.as_str().map(|k| (k, v)))
            .collect(),
    )
}

/// Counts gathered from one walk over a tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TreeStats {
    pub bloks: usize,
    pub local_bloks: usize,
    pub strings: usize,
    pub numbers: usize,
    pub bools: usize,
    pub nulls: usize,
    /// Deepest blok nesting; 0 for a tree without bloks.
    pub max_depth: usize,
    /// Blok count per name, sorted by name.
    pub names: BTreeMap<String, usize>,
}

impl TreeStats {
    pub fn collect(root: &Value) -> Self {
        let mut stats = Self::default();
        stats.visit(root, 0);
        stats
    }

    /// Total number of values, bloks included.
    pub fn total(&self) -> usize {
        self.bloks + self.strings + self.numbers + self.bools + self.nulls
    }

    fn visit(&mut self, value: &Value, depth: usize) {
        match value {
            Value::Null => self.nulls += 1,
            Value::Bool(_) => self.bools += 1,
            Value::Number(_) => self.numbers += 1,
            Value::String(_) => self.strings += 1,
            Value::Blok(blok) => {
                let depth = depth + 1;
                self.bloks += 1;
                if blok.is_local {
                    self.local_bloks += 1;
                }
                self.max_depth = self.max_depth.max(depth);
                *self.names.entry(blok.name.clone()).or_insert(0) += 1;
                for arg in &blok.args {
                    self.visit(arg, depth);
                }
            }
        }
    }
}
