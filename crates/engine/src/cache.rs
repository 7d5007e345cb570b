use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};

use crate::preview::PreviewFrame;
use crate::time::seconds_to_micros;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct PreviewCacheKey {
    path: PathBuf,
    bucket: i64,
}

/// LRU cache for decoded preview frames, bucketed by source time.
///
/// Timestamps closer than one bucket share a frame, so scrubbing back and
/// forth over the same region does not decode again.
///
/// # Example
/// ```
/// use std::sync::Arc;
///
/// use engine::PreviewFrame;
/// use engine::cache::PreviewFrameCache;
///
/// let mut cache = PreviewFrameCache::new(8, 1.0 / 30.0);
/// cache.insert(
///     "demo.mp4",
///     1.5,
///     PreviewFrame {
///         width: 2,
///         height: 2,
///         bytes: Arc::from(vec![0; 16]),
///     },
/// );
///
/// assert!(cache.get("demo.mp4", 1.501).is_some());
/// ```
#[derive(Debug)]
pub struct PreviewFrameCache {
    capacity: usize,
    bucket_micros: i64,
    entries: HashMap<PreviewCacheKey, PreviewFrame>,
    lru_order: VecDeque<PreviewCacheKey>,
}

impl PreviewFrameCache {
    /// Creates a preview cache.
    ///
    /// `capacity` must be positive; buckets shorter than a microsecond are
    /// widened to one microsecond.
    pub fn new(capacity: usize, bucket_seconds: f64) -> Self {
        assert!(capacity > 0, "preview cache capacity must be positive");
        Self {
            capacity,
            bucket_micros: seconds_to_micros(bucket_seconds).max(1),
            entries: HashMap::new(),
            lru_order: VecDeque::new(),
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.lru_order.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns one cached frame and marks it as recently used.
    pub fn get(&mut self, path: impl AsRef<Path>, at_seconds: f64) -> Option<PreviewFrame> {
        let key = self.make_key(path.as_ref(), at_seconds);
        let frame = self.entries.get(&key)?.clone();
        self.touch(&key);
        Some(frame)
    }

    /// Inserts or replaces one frame, evicting the least recently used entry
    /// once over capacity.
    pub fn insert(&mut self, path: impl AsRef<Path>, at_seconds: f64, frame: PreviewFrame) {
        let key = self.make_key(path.as_ref(), at_seconds);
        self.entries.insert(key.clone(), frame);
        self.touch(&key);
        while self.entries.len() > self.capacity {
            let Some(oldest) = self.lru_order.pop_front() else {
                break;
            };
            self.entries.remove(&oldest);
        }
    }

    fn make_key(&self, path: &Path, at_seconds: f64) -> PreviewCacheKey {
        PreviewCacheKey {
            path: path.to_path_buf(),
            bucket: seconds_to_micros(at_seconds)
                .max(0)
                .div_euclid(self.bucket_micros),
        }
    }

    fn touch(&mut self, key: &PreviewCacheKey) {
        if let Some(index) = self.lru_order.iter().position(|existing| existing == key) {
            self.lru_order.remove(index);
        }
        self.lru_order.push_back(key.clone());
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::PreviewFrameCache;
    use crate::preview::PreviewFrame;

    const BUCKET: f64 = 1.0 / 30.0;

    #[test]
    fn timestamps_in_one_bucket_share_a_frame() {
        let mut cache = PreviewFrameCache::new(8, BUCKET);
        cache.insert("demo.mp4", 1.5, sample_frame(10));

        let frame = cache.get("demo.mp4", 1.51).expect("frame should be cached");
        assert_eq!(frame.bytes[0], 10);
        assert!(cache.get("demo.mp4", 1.6).is_none());
        assert!(cache.get("other.mp4", 1.5).is_none());
    }

    #[test]
    fn least_recently_used_frame_is_evicted_first() {
        let mut cache = PreviewFrameCache::new(2, BUCKET);
        cache.insert("demo.mp4", 1.0, sample_frame(1));
        cache.insert("demo.mp4", 2.0, sample_frame(2));

        cache.get("demo.mp4", 1.0).expect("first frame should exist");
        cache.insert("demo.mp4", 3.0, sample_frame(3));

        assert_eq!(cache.len(), 2);
        assert!(cache.get("demo.mp4", 1.0).is_some());
        assert!(cache.get("demo.mp4", 2.0).is_none());
        assert!(cache.get("demo.mp4", 3.0).is_some());
    }

    #[test]
    fn clear_drops_everything() {
        let mut cache = PreviewFrameCache::new(4, BUCKET);
        cache.insert("demo.mp4", 0.0, sample_frame(0));

        cache.clear();

        assert!(cache.is_empty());
    }

    fn sample_frame(value: u8) -> PreviewFrame {
        PreviewFrame {
            width: 1,
            height: 1,
            bytes: Arc::from(vec![value; 4]),
        }
    }
}
