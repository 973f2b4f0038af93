//! Run folds and binary joins sequentially or on a rayon thread pool.
//!
//! Algorithms that can be split into independent pieces are written once against
//! the [`Strategy`] trait and then executed with whichever strategy the caller picks:
//!
//! - [`Sequential`]: everything runs on the calling thread (available in `no_std`).
//! - [`Parallel`]: work is scheduled on a shared rayon [`ThreadPool`](rayon::ThreadPool)
//!   (requires the `std` feature, enabled by default).
//!
//! Two shapes of work are supported:
//!
//! - **Flat folds** over a collection ([`fold`](Strategy::fold),
//!   [`fold_init`](Strategy::fold_init), [`map_collect_vec`](Strategy::map_collect_vec)).
//!   Partial results are always combined in input order, so `reduce_op` only needs to
//!   be associative.
//! - **Binary joins** ([`join`](Strategy::join)) for divide-and-conquer recursion, where
//!   the caller decides how to split and merge.
//!
//! # Example
//!
//! ```
//! use kiln_parallel::{Sequential, Strategy};
//!
//! fn count_between<S: Strategy>(strategy: &S, lo: u64, hi: u64) -> u64 {
//!     if hi - lo <= 16 {
//!         return hi - lo;
//!     }
//!     let mid = lo + (hi - lo) / 2;
//!     let (left, right) = strategy.join(
//!         || count_between(strategy, lo, mid),
//!         || count_between(strategy, mid, hi),
//!     );
//!     left + right
//! }
//!
//! assert_eq!(count_between(&Sequential, 0, 1000), 1000);
//! ```

#![cfg_attr(not(any(test, feature = "std")), no_std)]

use cfg_if::cfg_if;
use core::fmt;

cfg_if! {
    if #[cfg(feature = "std")] {
        use rayon::{
            iter::{IntoParallelIterator, ParallelIterator},
            ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder,
        };
        use std::sync::Arc;
    } else {
        extern crate alloc;
        use alloc::vec::Vec;
    }
}

/// A way of executing independent pieces of work.
///
/// Implementations must produce the same result as a plain left-to-right
/// evaluation whenever the combining operations are associative.
pub trait Strategy: Clone + Send + Sync + fmt::Debug + 'static {
    /// Folds a collection, giving each partition its own scratch value.
    ///
    /// - `init` creates the scratch value for a partition.
    /// - `identity` creates the starting accumulator for a partition.
    /// - `fold_op` folds one item into an accumulator.
    /// - `reduce_op` merges the accumulators of two adjacent partitions (left, right).
    fn fold_init<I, INIT, T, R, ID, F, RD>(
        &self,
        iter: I,
        init: INIT,
        identity: ID,
        fold_op: F,
        reduce_op: RD,
    ) -> R
    where
        I: IntoIterator<IntoIter: Send, Item: Send> + Send,
        INIT: Fn() -> T + Send + Sync,
        T: Send,
        R: Send,
        ID: Fn() -> R + Send + Sync,
        F: Fn(R, &mut T, I::Item) -> R + Send + Sync,
        RD: Fn(R, R) -> R + Send + Sync;

    /// Folds a collection into a single value.
    ///
    /// ```
    /// use kiln_parallel::{Sequential, Strategy};
    ///
    /// let total = Sequential.fold(&[1, 2, 3, 4], || 0, |acc, &n| acc + n, |a, b| a + b);
    /// assert_eq!(total, 10);
    /// ```
    fn fold<I, R, ID, F, RD>(&self, iter: I, identity: ID, fold_op: F, reduce_op: RD) -> R
    where
        I: IntoIterator<IntoIter: Send, Item: Send> + Send,
        R: Send,
        ID: Fn() -> R + Send + Sync,
        F: Fn(R, I::Item) -> R + Send + Sync,
        RD: Fn(R, R) -> R + Send + Sync,
    {
        self.fold_init(
            iter,
            || (),
            identity,
            |acc, _, item| fold_op(acc, item),
            reduce_op,
        )
    }

    /// Maps every element and collects the results, preserving input order.
    fn map_collect_vec<I, F, T>(&self, iter: I, map_op: F) -> Vec<T>
    where
        I: IntoIterator<IntoIter: Send, Item: Send> + Send,
        F: Fn(I::Item) -> T + Send + Sync,
        T: Send,
    {
        self.fold(
            iter,
            Vec::new,
            |mut acc, item| {
                acc.push(map_op(item));
                acc
            },
            |mut left, right| {
                left.extend(right);
                left
            },
        )
    }

    /// Runs two independent closures and returns both results.
    ///
    /// The closures may run concurrently. Neither may assume anything about the
    /// order in which the other is evaluated.
    fn join<A, B, RA, RB>(&self, a: A, b: B) -> (RA, RB)
    where
        A: FnOnce() -> RA + Send,
        B: FnOnce() -> RB + Send,
        RA: Send,
        RB: Send;
}

/// Executes everything on the calling thread, in order.
///
/// Useful for debugging, for `no_std` targets, and for workloads too small to
/// amortize scheduling overhead.
#[derive(Default, Debug, Clone, Copy)]
pub struct Sequential;

impl Strategy for Sequential {
    fn fold_init<I, INIT, T, R, ID, F, RD>(
        &self,
        iter: I,
        init: INIT,
        identity: ID,
        fold_op: F,
        _reduce_op: RD,
    ) -> R
    where
        I: IntoIterator<IntoIter: Send, Item: Send> + Send,
        INIT: Fn() -> T + Send + Sync,
        T: Send,
        R: Send,
        ID: Fn() -> R + Send + Sync,
        F: Fn(R, &mut T, I::Item) -> R + Send + Sync,
        RD: Fn(R, R) -> R + Send + Sync,
    {
        let mut scratch = init();
        iter.into_iter()
            .fold(identity(), |acc, item| fold_op(acc, &mut scratch, item))
    }

    fn join<A, B, RA, RB>(&self, a: A, b: B) -> (RA, RB)
    where
        A: FnOnce() -> RA + Send,
        B: FnOnce() -> RB + Send,
        RA: Send,
        RB: Send,
    {
        let ra = a();
        let rb = b();
        (ra, rb)
    }
}

cfg_if! {
    if #[cfg(feature = "std")] {
        /// Executes work on a rayon thread pool.
        ///
        /// `Parallel` holds an [`Arc<ThreadPool>`], so clones are cheap and share
        /// the same workers. Calls made from inside the pool (for example, a nested
        /// [`join`](Strategy::join)) reuse the current worker instead of blocking it.
        ///
        /// ```
        /// use kiln_parallel::{Parallel, Strategy};
        ///
        /// let strategy = Parallel::with_threads(2).unwrap();
        /// let (a, b) = strategy.join(|| (0..100u64).sum::<u64>(), || 7);
        /// assert_eq!((a, b), (4950, 7));
        /// ```
        #[derive(Debug, Clone)]
        pub struct Parallel {
            thread_pool: Arc<ThreadPool>,
        }

        impl Parallel {
            /// Creates a new [`Parallel`] strategy with the given [`ThreadPool`].
            pub const fn new(thread_pool: Arc<ThreadPool>) -> Self {
                Self { thread_pool }
            }

            /// Builds a dedicated pool with `threads` workers.
            pub fn with_threads(threads: usize) -> Result<Self, ThreadPoolBuildError> {
                let pool = ThreadPoolBuilder::new().num_threads(threads).build()?;
                Ok(Self::new(Arc::new(pool)))
            }

            /// Number of workers in the underlying pool.
            pub fn threads(&self) -> usize {
                self.thread_pool.current_num_threads()
            }
        }

        impl From<Arc<ThreadPool>> for Parallel {
            fn from(thread_pool: Arc<ThreadPool>) -> Self {
                Self::new(thread_pool)
            }
        }

        impl Strategy for Parallel {
            fn fold_init<I, INIT, T, R, ID, F, RD>(
                &self,
                iter: I,
                init: INIT,
                identity: ID,
                fold_op: F,
                reduce_op: RD,
            ) -> R
            where
                I: IntoIterator<IntoIter: Send, Item: Send> + Send,
                INIT: Fn() -> T + Send + Sync,
                T: Send,
                R: Send,
                ID: Fn() -> R + Send + Sync,
                F: Fn(R, &mut T, I::Item) -> R + Send + Sync,
                RD: Fn(R, R) -> R + Send + Sync,
            {
                // Materializing gives rayon an indexed source, whose reduce merges
                // adjacent partitions left to right.
                let items: Vec<I::Item> = iter.into_iter().collect();
                self.thread_pool.install(|| {
                    // Partitions that saw no items stay `None`, so empty input
                    // yields exactly one `identity()`.
                    items
                        .into_par_iter()
                        .fold(
                            || (init(), None),
                            |(mut scratch, acc), item| {
                                let acc = acc.unwrap_or_else(&identity);
                                let acc = fold_op(acc, &mut scratch, item);
                                (scratch, Some(acc))
                            },
                        )
                        .filter_map(|(_, acc)| acc)
                        .reduce_with(&reduce_op)
                        .unwrap_or_else(&identity)
                })
            }

            fn join<A, B, RA, RB>(&self, a: A, b: B) -> (RA, RB)
            where
                A: FnOnce() -> RA + Send,
                B: FnOnce() -> RB + Send,
                RA: Send,
                RB: Send,
            {
                self.thread_pool.join(a, b)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{Parallel, Sequential, Strategy};
    use proptest::prelude::*;

    fn parallel_strategy() -> Parallel {
        Parallel::with_threads(4).unwrap()
    }

    /// Divide-and-conquer sum that records the visiting order of leaves.
    fn collect_leaves<S: Strategy>(strategy: &S, data: &[u32]) -> Vec<u32> {
        if data.len() <= 2 {
            return data.to_vec();
        }
        let (left, right) = data.split_at(data.len() / 2);
        let (mut l, r) = strategy.join(
            || collect_leaves(strategy, left),
            || collect_leaves(strategy, right),
        );
        l.extend(r);
        l
    }

    #[test]
    fn test_fold_empty_returns_identity() {
        let empty: Vec<i64> = vec![];
        let seq = Sequential.fold(&empty, || 7i64, |acc, &x| acc + x, |a, b| a + b);
        let par = parallel_strategy().fold(&empty, || 7i64, |acc, &x| acc + x, |a, b| a + b);
        assert_eq!(seq, 7);
        assert_eq!(par, 7);
    }

    #[test]
    fn test_sequential_join_runs_in_order() {
        let order = std::sync::Mutex::new(Vec::new());
        Sequential.join(
            || order.lock().unwrap().push("a"),
            || order.lock().unwrap().push("b"),
        );
        assert_eq!(order.into_inner().unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn test_parallel_threads() {
        assert_eq!(parallel_strategy().threads(), 4);
    }

    #[test]
    fn test_nested_join_inside_pool() {
        let strategy = parallel_strategy();
        let data: Vec<u32> = (0..1000).collect();
        assert_eq!(collect_leaves(&strategy, &data), data);
    }

    proptest! {
        #[test]
        fn test_fold_empty_returns_any_identity(identity in any::<i64>()) {
            let empty: Vec<i64> = vec![];
            let seq = Sequential.fold(
                &empty,
                || identity,
                |acc, &x| acc.wrapping_add(x),
                |a, b| a.wrapping_add(b),
            );
            let par = parallel_strategy().fold_init(
                &empty,
                || (),
                || identity,
                |acc, _, &x| acc.wrapping_add(x),
                |a, b| a.wrapping_add(b),
            );
            prop_assert_eq!(seq, identity);
            prop_assert_eq!(par, identity);
        }

        #[test]
        fn test_fold_matches_sum(end in 0u64..5000) {
            let range: Vec<u64> = (0..end).collect();
            let expected = (0..end).sum::<u64>();
            let seq = Sequential.fold(&range, || 0u64, |acc, &x| acc + x, |a, b| a + b);
            let par = parallel_strategy().fold(&range, || 0u64, |acc, &x| acc + x, |a, b| a + b);
            prop_assert_eq!(seq, expected);
            prop_assert_eq!(par, expected);
        }

        #[test]
        fn test_fold_preserves_order(data in prop::collection::vec(any::<i32>(), 0..500)) {
            // Concatenation is associative but not commutative.
            let par: Vec<i32> = parallel_strategy().fold(
                &data,
                Vec::new,
                |mut acc, &x| { acc.push(x); acc },
                |mut a, b| { a.extend(b); a },
            );
            prop_assert_eq!(par, data);
        }

        #[test]
        fn test_fold_init_scratch_is_per_partition(data in prop::collection::vec(any::<u8>(), 0..300)) {
            let expected: u64 = data.iter().map(|&x| x as u64).sum();
            let par = parallel_strategy().fold_init(
                &data,
                || 0usize,
                || 0u64,
                |acc, seen, &x| { *seen += 1; acc + x as u64 },
                |a, b| a + b,
            );
            prop_assert_eq!(par, expected);
        }

        #[test]
        fn test_map_collect_vec_matches(data in prop::collection::vec(any::<i32>(), 0..500)) {
            let expected: Vec<i64> = data.iter().map(|&x| (x as i64) * 3).collect();
            let seq: Vec<i64> = Sequential.map_collect_vec(&data, |&x| (x as i64) * 3);
            let par: Vec<i64> = parallel_strategy().map_collect_vec(&data, |&x| (x as i64) * 3);
            prop_assert_eq!(seq, expected.clone());
            prop_assert_eq!(par, expected);
        }

        #[test]
        fn test_join_matches_sequential(data in prop::collection::vec(any::<u32>(), 0..300)) {
            let seq = collect_leaves(&Sequential, &data);
            let par = collect_leaves(&parallel_strategy(), &data);
            prop_assert_eq!(&seq, &data);
            prop_assert_eq!(par, data);
        }
    }
}
