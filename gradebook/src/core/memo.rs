//! Single-entry memoization nodes for the derived-view graph.

use tracing::trace;

/// Remembers the last input and the output computed from it.
///
/// `get_or_compute` only runs the computation when the input differs from the
/// remembered one, so repeated calls with an unchanged input are free.
#[derive(Debug)]
pub struct Memo<K, V> {
    name: &'static str,
    entry: Option<(K, V)>,
    computations: u64,
}

impl<K: PartialEq, V> Memo<K, V> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            entry: None,
            computations: 0,
        }
    }

    pub fn get_or_compute(&mut self, key: K, compute: impl FnOnce(&K) -> V) -> &V {
        let hit = matches!(&self.entry, Some((cached, _)) if *cached == key);
        if !hit {
            self.entry = None;
        }
        let name = self.name;
        let computations = &mut self.computations;
        let (_, value) = self.entry.get_or_insert_with(|| {
            trace!(node = name, "memo recompute");
            *computations += 1;
            let value = compute(&key);
            (key, value)
        });
        value
    }

    /// Number of times the computation actually ran.
    pub fn computations(&self) -> u64 {
        self.computations
    }

    pub fn clear(&mut self) {
        self.entry = None;
    }
}

/// Key for float series compared by bit pattern, so `NaN` never defeats caching
/// and `-0.0`/`0.0` are kept distinct.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SeriesKey(Vec<u64>);

impl SeriesKey {
    pub fn new(series: &[f64]) -> Self {
        Self(series.iter().map(|value| value.to_bits()).collect())
    }

    pub fn values(&self) -> Vec<f64> {
        self.0.iter().copied().map(f64::from_bits).collect()
    }
}
