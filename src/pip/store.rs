//! Holder of the active feature set.

use std::sync::{Arc, PoisonError, RwLock};
use tracing::info;

use super::FeatureSet;
use crate::models::{Coordinate, LevelPolygon};

/// The currently active polygon set, replaced wholesale on every load.
///
/// Readers take an `Arc` snapshot and release the lock before scanning, so a
/// lookup sees either the previous set or the new one in full.
#[derive(Debug, Default)]
pub struct FeatureStore {
    active: RwLock<Arc<FeatureSet>>,
}

impl FeatureStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the active set. Returns the generation of the new set.
    pub fn load(&self, polygons: Vec<LevelPolygon>) -> u64 {
        let count = polygons.len();
        // Index outside the lock
        let set = FeatureSet::build(polygons);

        let mut active = self.active.write().unwrap_or_else(PoisonError::into_inner);
        let generation = active.generation() + 1;
        *active = Arc::new(set.with_generation(generation));
        drop(active);

        info!("Loaded {} polygons (generation {})", count, generation);
        generation
    }

    /// Same as loading an empty set
    pub fn clear(&self) -> u64 {
        self.load(Vec::new())
    }

    /// Snapshot of the active set
    pub fn current(&self) -> Arc<FeatureSet> {
        let active = self.active.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&*active)
    }

    pub fn len(&self) -> usize {
        self.current().len()
    }

    pub fn is_empty(&self) -> bool {
        self.current().is_empty()
    }

    /// Look up `point` against one snapshot of the active set
    pub fn find_level(&self, point: Coordinate) -> Option<f64> {
        self.current().find_level(point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn square(min: f64, max: f64, level: f64) -> LevelPolygon {
        LevelPolygon::new(
            vec![
                Coordinate::new(min, min),
                Coordinate::new(min, max),
                Coordinate::new(max, max),
                Coordinate::new(max, min),
            ],
            vec![],
            level,
        )
        .unwrap()
    }

    #[test]
    fn test_starts_empty() {
        let store = FeatureStore::new();
        assert!(store.is_empty());
        assert_eq!(store.current().generation(), 0);
        assert_eq!(store.find_level(Coordinate::new(5.0, 5.0)), None);
    }

    #[test]
    fn test_load_replaces_not_merges() {
        let store = FeatureStore::new();
        assert_eq!(store.load(vec![square(0.0, 10.0, 1.0), square(20.0, 30.0, 2.0)]), 1);
        assert_eq!(store.len(), 2);

        assert_eq!(store.load(vec![square(40.0, 50.0, 3.0)]), 2);
        let current = store.current();
        assert_eq!(current.len(), 1);
        assert_eq!(current.polygons()[0].level(), 3.0);
        assert_eq!(store.find_level(Coordinate::new(5.0, 5.0)), None);
        assert_eq!(store.find_level(Coordinate::new(45.0, 45.0)), Some(3.0));
    }

    #[test]
    fn test_clear() {
        let store = FeatureStore::new();
        store.load(vec![square(0.0, 10.0, 42.0)]);
        assert_eq!(store.clear(), 2);
        assert!(store.is_empty());
        assert_eq!(store.find_level(Coordinate::new(5.0, 5.0)), None);
    }

    #[test]
    fn test_snapshot_survives_reload() {
        let store = FeatureStore::new();
        store.load(vec![square(0.0, 10.0, 42.0)]);
        let snapshot = store.current();
        store.clear();

        assert_eq!(snapshot.find_level(Coordinate::new(5.0, 5.0)), Some(42.0));
        assert_eq!(store.find_level(Coordinate::new(5.0, 5.0)), None);
    }

    #[test]
    fn test_concurrent_readers_see_whole_sets() {
        // Set A: levels 1 and 2; set B: levels 10 and 20. Every snapshot
        // must be one or the other, never a mix.
        let store = Arc::new(FeatureStore::new());
        let set_a = vec![square(0.0, 10.0, 1.0), square(20.0, 30.0, 2.0)];
        let set_b = vec![square(0.0, 10.0, 10.0), square(20.0, 30.0, 20.0)];
        store.load(set_a.clone());

        let writer = {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for i in 0..200 {
                    if i % 2 == 0 {
                        store.load(set_b.clone());
                    } else {
                        store.load(set_a.clone());
                    }
                }
            })
        };

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for _ in 0..500 {
                        let snapshot = store.current();
                        let a = snapshot.find_level(Coordinate::new(5.0, 5.0));
                        let b = snapshot.find_level(Coordinate::new(25.0, 25.0));
                        let whole = (a, b) == (Some(1.0), Some(2.0))
                            || (a, b) == (Some(10.0), Some(20.0));
                        assert!(whole, "mixed snapshot: {:?}", (a, b));
                    }
                })
            })
            .collect();

        writer.join().unwrap();
        for reader in readers {
            reader.join().unwrap();
        }
        assert_eq!(store.current().generation(), 201);
    }
}
