use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

/// Key for one memoized result: the component, the entity it was computed
/// for, and the numeric parameters that shaped the computation.
pub fn cache_key(component: &str, entity: &str, params: &[f64]) -> u64 {
    let mut hasher = DefaultHasher::new();
    component.hash(&mut hasher);
    entity.hash(&mut hasher);
    for param in params {
        param.to_bits().hash(&mut hasher);
    }
    hasher.finish()
}

/// Explicit memoization for analysis results. The caller owns the cache and
/// decides when entries are stale; nothing here is process-global.
pub struct AnalysisCache<V> {
    entries: HashMap<u64, V>,
}

impl<V: Clone> AnalysisCache<V> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Return the cached value for `key`, computing and storing it on a miss.
    pub fn get_or_compute(&mut self, key: u64, compute: impl FnOnce() -> V) -> V {
        self.entries.entry(key).or_insert_with(compute).clone()
    }

    pub fn get(&self, key: u64) -> Option<&V> {
        self.entries.get(&key)
    }

    /// Drop one entry; true when something was actually removed.
    pub fn invalidate(&mut self, key: u64) -> bool {
        self.entries.remove(&key).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V: Clone> Default for AnalysisCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_skips_recomputation() {
        let mut cache: AnalysisCache<f64> = AnalysisCache::new();
        let key = cache_key("experiment", "Homepage", &[1.96]);

        let mut calls = 0;
        let first = cache.get_or_compute(key, || {
            calls += 1;
            42.0
        });
        let second = cache.get_or_compute(key, || {
            calls += 1;
            99.0
        });

        assert_eq!(first, 42.0);
        assert_eq!(second, 42.0);
        assert_eq!(calls, 1);
    }

    #[test]
    fn invalidation_forces_recomputation() {
        let mut cache: AnalysisCache<f64> = AnalysisCache::new();
        let key = cache_key("forecast", "total_sales", &[7.0, 0.02]);

        cache.get_or_compute(key, || 1.0);
        assert!(cache.invalidate(key));
        assert!(!cache.invalidate(key));

        let recomputed = cache.get_or_compute(key, || 2.0);
        assert_eq!(recomputed, 2.0);
    }

    #[test]
    fn different_parameters_map_to_different_keys() {
        let base = cache_key("experiment", "Homepage", &[1.96]);
        assert_ne!(base, cache_key("experiment", "Homepage", &[2.58]));
        assert_ne!(base, cache_key("experiment", "Checkout", &[1.96]));
        assert_ne!(base, cache_key("elasticity", "Homepage", &[1.96]));
    }
}
