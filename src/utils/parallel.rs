//! Runtime switch for the optional `rayon` backend.
//!
//! With the `parallel` feature enabled, per-index work such as the per-lane
//! dead-time normalization is spread over the rayon pool unless the switch is
//! turned off. Every worker writes only its own output slot, so results are
//! identical to the sequential path.

#[cfg(feature = "parallel")]
use std::sync::atomic::{AtomicBool, Ordering};

#[cfg(feature = "parallel")]
static PARALLEL_ENABLED: AtomicBool = AtomicBool::new(true);

const MIN_CHUNK_SIZE: usize = 256;

/// Smallest number of indices handed to one worker.
pub fn preferred_chunk_size(total_items: usize) -> usize {
    MIN_CHUNK_SIZE.min(total_items.max(1))
}

#[cfg(feature = "parallel")]
pub fn parallelism_enabled() -> bool {
    PARALLEL_ENABLED.load(Ordering::SeqCst)
}

#[cfg(not(feature = "parallel"))]
pub fn parallelism_enabled() -> bool {
    false
}

/// Turns the parallel path on or off until the returned guard is dropped.
#[cfg(feature = "parallel")]
pub fn set_parallelism(enabled: bool) -> ParallelismGuard {
    let previous = PARALLEL_ENABLED.swap(enabled, Ordering::SeqCst);
    ParallelismGuard { previous }
}

#[cfg(not(feature = "parallel"))]
pub fn set_parallelism(_enabled: bool) -> ParallelismGuard {
    ParallelismGuard {}
}

/// Restores the previous parallelism setting on drop.
pub struct ParallelismGuard {
    #[cfg(feature = "parallel")]
    previous: bool,
}

#[cfg(feature = "parallel")]
impl Drop for ParallelismGuard {
    fn drop(&mut self) {
        PARALLEL_ENABLED.store(self.previous, Ordering::SeqCst);
    }
}

#[cfg(not(feature = "parallel"))]
impl Drop for ParallelismGuard {
    fn drop(&mut self) {}
}

/// Evaluates `f` for every index in `0..len`, in index order.
pub fn map_indexed<T, F>(len: usize, f: F) -> Vec<T>
where
    T: Send,
    F: Fn(usize) -> T + Send + Sync,
{
    #[cfg(feature = "parallel")]
    {
        if parallelism_enabled() {
            use rayon::prelude::*;
            return (0..len)
                .into_par_iter()
                .with_min_len(preferred_chunk_size(len))
                .map(f)
                .collect();
        }
    }
    (0..len).map(f).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_indexed_keeps_index_order() {
        let values = map_indexed(1_000, |index| index * 3);
        assert_eq!(values.len(), 1_000);
        assert!(values.iter().enumerate().all(|(index, &value)| value == index * 3));
        assert!(map_indexed(0, |index| index).is_empty());
    }

    #[test]
    fn guard_restores_previous_setting() {
        let before = parallelism_enabled();
        {
            let _guard = set_parallelism(false);
            assert!(!parallelism_enabled());
        }
        assert_eq!(parallelism_enabled(), before);
    }

    #[test]
    fn chunk_size_is_bounded_by_input() {
        assert_eq!(preferred_chunk_size(0), 1);
        assert_eq!(preferred_chunk_size(10), 10);
        assert_eq!(preferred_chunk_size(10_000), MIN_CHUNK_SIZE);
    }
}
