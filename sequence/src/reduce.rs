//! Depth-bounded divide-and-conquer reduction over [`Generator`]s.
//!
//! The reducer keeps splitting a generator while it is splittable and the recursion
//! depth is within [`Config::max_depth`], handing both halves to
//! [`Strategy::join`]. Past the bound, or at an unsplittable generator, it folds
//! linearly: nested generators are reduced child by child (each child may split
//! again), leaf generators are folded element by element.
//!
//! Partial results are `Option<T>`, where `None` means "no element folded yet". This
//! lets the reducer work without an identity element for `T` and apply the caller's
//! `start` exactly once, no matter how the work was divided.
//!
//! The two halves of a split are merged as `op(left, right)`, so the grouping of
//! operands depends on how the generator splits. Results are well defined for
//! associative operators.

use crate::{Generator, IntoGenerator};
use core::ops::Add;
use kiln_parallel::Strategy;
use tracing::{debug, trace};

/// Default bound on the recursion depth at which splitting stops.
pub const DEFAULT_MAX_DEPTH: usize = 9;

/// Configuration for [`reduce`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// Generators reached at a depth greater than this are folded linearly.
    ///
    /// `0` still splits the top-level generator once; use a larger value to expose
    /// more parallelism at the cost of more (smaller) tasks.
    pub max_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Reduces `sequence` with `op`, returning `start` combined with every element.
///
/// Returns `start` unchanged if the sequence is empty; otherwise returns
/// `op(start, fold)`, where `fold` combines all elements in sequence order.
///
/// ```
/// use kiln_parallel::Sequential;
/// use kiln_sequence::{reduce, Range};
///
/// let config = reduce::Config::default();
/// let product = reduce::reduce(&Sequential, Range::new(1, 5, 1), 1, |a, b| a * b, &config);
/// assert_eq!(product, 120);
/// ```
pub fn reduce<S, I, F>(strategy: &S, sequence: I, start: I::Item, op: F, config: &Config) -> I::Item
where
    S: Strategy,
    I: IntoGenerator,
    F: Fn(I::Item, I::Item) -> I::Item + Send + Sync,
{
    let generator = sequence.into_generator();
    debug!(
        max_depth = config.max_depth,
        len = ?generator.len_hint(),
        nested = generator.is_nested(),
        "reducing generator"
    );
    match fold_at(strategy, &generator, &op, config.max_depth, 0) {
        Some(total) => op(start, total),
        None => start,
    }
}

/// Reduces `sequence` with `op` without a starting value.
///
/// Returns `None` if the sequence has no elements.
pub fn fold_partial<S, I, F>(strategy: &S, sequence: I, op: F, config: &Config) -> Option<I::Item>
where
    S: Strategy,
    I: IntoGenerator,
    F: Fn(I::Item, I::Item) -> I::Item + Send + Sync,
{
    let generator = sequence.into_generator();
    fold_at(strategy, &generator, &op, config.max_depth, 0)
}

/// Adds every element of `sequence` to `start`.
///
/// ```
/// use kiln_parallel::Sequential;
/// use kiln_sequence::reduce;
///
/// let config = reduce::Config::default();
/// assert_eq!(reduce::sum(&Sequential, Vec::<i64>::new(), 5, &config), 5);
/// assert_eq!(reduce::sum(&Sequential, vec![1.5, 2.5], 0.0, &config), 4.0);
/// ```
pub fn sum<S, I>(strategy: &S, sequence: I, start: I::Item, config: &Config) -> I::Item
where
    S: Strategy,
    I: IntoGenerator,
    I::Item: Add<Output = I::Item>,
{
    reduce(strategy, sequence, start, |a, b| a + b, config)
}

/// Merges two partial results, treating `None` as "nothing to merge".
fn merge<T, F>(left: Option<T>, right: Option<T>, op: &F) -> Option<T>
where
    F: Fn(T, T) -> T,
{
    match (left, right) {
        (Some(left), Some(right)) => Some(op(left, right)),
        (left, None) => left,
        (None, right) => right,
    }
}

fn fold_at<S, G, F>(
    strategy: &S,
    generator: &G,
    op: &F,
    max_depth: usize,
    depth: usize,
) -> Option<G::Item>
where
    S: Strategy,
    G: Generator,
    F: Fn(G::Item, G::Item) -> G::Item + Send + Sync,
{
    if depth <= max_depth {
        if let Some((left, right)) = generator.split() {
            let (left, right) = strategy.join(
                || fold_at(strategy, &left, op, max_depth, depth + 1),
                || fold_at(strategy, &right, op, max_depth, depth + 1),
            );
            return merge(left, right, op);
        }
    }
    fold_linear(strategy, generator, op, max_depth, depth)
}

fn fold_linear<S, G, F>(
    strategy: &S,
    generator: &G,
    op: &F,
    max_depth: usize,
    depth: usize,
) -> Option<G::Item>
where
    S: Strategy,
    G: Generator,
    F: Fn(G::Item, G::Item) -> G::Item + Send + Sync,
{
    if generator.is_nested() {
        // The outer generator is exhausted for splitting, but its children may not be.
        trace!(depth, "reducing children of nested generator");
        return generator.children().fold(None, |acc, child| {
            let partial = fold_at(strategy, &child, op, max_depth, depth + 1);
            merge(acc, partial, op)
        });
    }

    trace!(depth, "folding leaf generator");
    generator.iter().fold(None, |acc, item| match acc {
        Some(acc) => Some(op(acc, item)),
        None => Some(item),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{xrange, Elements, Generator, Range};
    use kiln_macros::test_traced;
    use kiln_parallel::{Parallel, Sequential};
    use proptest::prelude::*;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    fn parallel_strategy() -> Parallel {
        Parallel::with_threads(4).unwrap()
    }

    fn depth(max_depth: usize) -> Config {
        Config { max_depth }
    }

    /// Wraps a generator and counts how often it (or any piece of it) is split.
    #[derive(Clone, Debug)]
    struct Counting<G> {
        inner: G,
        splits: Arc<AtomicUsize>,
    }

    impl<G: Generator> Generator for Counting<G> {
        type Item = G::Item;
        type Iter = G::Iter;
        type Child = G::Child;
        type Children = G::Children;

        fn iter(&self) -> G::Iter {
            self.inner.iter()
        }

        fn can_split(&self) -> bool {
            self.inner.can_split()
        }

        fn split(&self) -> Option<(Self, Self)> {
            let (left, right) = self.inner.split()?;
            self.splits.fetch_add(1, Ordering::Relaxed);
            Some((
                Self {
                    inner: left,
                    splits: self.splits.clone(),
                },
                Self {
                    inner: right,
                    splits: self.splits.clone(),
                },
            ))
        }

        fn is_nested(&self) -> bool {
            self.inner.is_nested()
        }

        fn children(&self) -> G::Children {
            self.inner.children()
        }
    }

    #[test]
    fn test_sum_example() {
        let evens = xrange(0, Some(10), Some(2)).unwrap();
        assert_eq!(evens.iter().collect::<Vec<_>>(), vec![0, 2, 4, 6, 8]);
        assert_eq!(sum(&Sequential, evens, 100, &Config::default()), 120);
        assert_eq!(sum(&Sequential, 0..5i64, 100, &Config::default()), 110);
    }

    #[test]
    fn test_empty_returns_start() {
        let config = Config::default();
        assert_eq!(sum(&Sequential, Vec::<i64>::new(), 0, &config), 0);
        assert_eq!(sum(&Sequential, Vec::<i64>::new(), 5, &config), 5);
        assert_eq!(sum(&parallel_strategy(), Range::new(3, 0, 1), 5, &config), 5);
        assert_eq!(
            fold_partial(&Sequential, Range::new(3, 0, 1), |a, b| a + b, &config),
            None
        );
    }

    #[test]
    fn test_single_element_applies_op_once() {
        let calls = AtomicUsize::new(0);
        let result = reduce(
            &Sequential,
            vec![7i64],
            100,
            |a, b| {
                calls.fetch_add(1, Ordering::Relaxed);
                a + b
            },
            &Config::default(),
        );
        assert_eq!(result, 107);
        assert_eq!(calls.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_start_applied_once_regardless_of_splits() {
        // Empty sub-ranges everywhere must not contribute `start` again.
        let filtered = Range::new(0, 64, 1).filter(|x| *x == 63);
        for max_depth in [0, 3, 9, 64] {
            assert_eq!(
                sum(&Sequential, filtered.clone(), 1000, &depth(max_depth)),
                1063
            );
        }
    }

    #[test]
    fn test_depth_bounds_splitting() {
        let splits = Arc::new(AtomicUsize::new(0));
        let generator = Counting {
            inner: Range::new(0, 1 << 12, 1),
            splits: splits.clone(),
        };

        // Depths 0..=2 may split: 1 + 2 + 4 splits.
        let total = sum(&Sequential, generator.clone(), 0, &depth(2));
        assert_eq!(total, (0..1 << 12).sum::<i64>());
        assert_eq!(splits.load(Ordering::Relaxed), 7);

        splits.store(0, Ordering::Relaxed);
        sum(&Sequential, generator, 0, &depth(100));
        assert_eq!(splits.load(Ordering::Relaxed), (1 << 12) - 1);
    }

    #[test]
    fn test_nested_children_are_split() {
        let splits = Arc::new(AtomicUsize::new(0));
        let counter = splits.clone();

        // The outer generator cannot split, so the reducer must descend into children.
        let nested = Range::new(0, 1, 1).nest(move |_| Counting {
            inner: Range::new(0, 16, 1),
            splits: counter.clone(),
        });
        assert!(!nested.can_split());

        let total = sum(&Sequential, nested, 0, &Config::default());
        assert_eq!(total, (0..16).sum::<i64>());
        assert_eq!(splits.load(Ordering::Relaxed), 15);
    }

    #[test]
    fn test_preserves_order_for_non_commutative_op() {
        let words = Elements::from(
            ["the", "quick", "brown", "fox", "jumps"]
                .iter()
                .map(|w| w.to_string())
                .collect::<Vec<_>>(),
        );
        let joined = reduce(
            &parallel_strategy(),
            words,
            String::from(">"),
            |a, b| a + &b,
            &Config::default(),
        );
        assert_eq!(joined, ">thequickbrownfoxjumps");
    }

    #[test]
    fn test_nested_with_empty_children() {
        let nested = Range::new(0, 10, 1).nest(|n| Range::new(n, (n % 3) as u64, 1));
        let expected: i64 = nested.iter().sum();
        for max_depth in [0, 1, 9] {
            assert_eq!(sum(&Sequential, nested.clone(), 0, &depth(max_depth)), expected);
        }
    }

    #[test_traced("TRACE")]
    fn test_reduce_with_logging() {
        let nested = Range::new(0, 3, 1).nest(|n| Range::new(0, n as u64, 1));
        assert_eq!(sum(&parallel_strategy(), nested, 1, &depth(0)), 2);
    }

    proptest! {
        #[test]
        fn test_depth_does_not_change_result(data in prop::collection::vec(-1000i64..1000, 0..400), start in -50i64..50) {
            let expected = data.iter().fold(start, |acc, x| acc + x);
            let shallow = sum(&Sequential, data.clone(), start, &depth(0));
            let deep = sum(&Sequential, data.clone(), start, &depth(64));
            let parallel = sum(&parallel_strategy(), data, start, &depth(64));
            prop_assert_eq!(shallow, expected);
            prop_assert_eq!(deep, expected);
            prop_assert_eq!(parallel, expected);
        }

        #[test]
        fn test_concatenation_order(data in prop::collection::vec(any::<u8>(), 0..200), max_depth in 0usize..12) {
            let items: Vec<Vec<u8>> = data.iter().map(|&b| vec![b]).collect();
            let joined = reduce(
                &parallel_strategy(),
                items,
                Vec::new(),
                |mut a, b| { a.extend(b); a },
                &depth(max_depth),
            );
            prop_assert_eq!(joined, data);
        }

        #[test]
        fn test_nested_equals_concatenation(widths in prop::collection::vec(0u64..20, 0..30), max_depth in 0usize..10) {
            let widths = Arc::new(widths);
            let lookup = widths.clone();
            let nested = Range::new(0, widths.len() as u64, 1)
                .nest(move |i| Range::new(i * 7, lookup[i as usize], 3));
            let concatenated: Vec<i64> = widths
                .iter()
                .enumerate()
                .flat_map(|(i, &w)| Range::new(i as i64 * 7, w, 3).iter())
                .collect();
            let expected = sum(&Sequential, concatenated, 0, &Config::default());
            prop_assert_eq!(sum(&Sequential, nested.clone(), 0, &depth(max_depth)), expected);
            prop_assert_eq!(sum(&parallel_strategy(), nested, 0, &depth(max_depth)), expected);
        }

        #[test]
        fn test_mapped_range_matches_plain_fold(start in -100i64..100, stop in -100i64..100, step in 1i64..7) {
            let range = xrange(start, Some(stop), Some(step)).unwrap();
            let squares = range.map(|x| x * x);
            let expected: i64 = range.iter().map(|x| x * x).sum();
            prop_assert_eq!(sum(&parallel_strategy(), squares, 0, &Config::default()), expected);
        }
    }
}
