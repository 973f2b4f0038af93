//! Lazy, splittable sequences and a depth-bounded divide-and-conquer reducer.
//!
//! A [`Generator`] is an immutable description of a sequence that can be traversed
//! any number of times and, when it represents more than one unit of work, split into
//! two smaller generators whose concatenation reproduces it. [`reduce`] uses this to
//! fold a sequence by recursively splitting it (running both halves through a
//! [`Strategy`](kiln_parallel::Strategy)) until a depth bound or an unsplittable leaf
//! is reached, and then folding linearly.
//!
//! # Generators
//!
//! - [`Range`]: an arithmetic progression (`start`, `count`, `increment`), created
//!   directly or with the half-open [`xrange`] factory.
//! - [`Elements`]: a window over a shared, immutable buffer.
//! - [`Map`], [`Filter`], [`Nest`]: lazy adapters built with [`Generator::map`],
//!   [`Generator::filter`], and [`Generator::nest`].
//!
//! # Example
//!
//! ```
//! use kiln_parallel::Sequential;
//! use kiln_sequence::{reduce, xrange, Generator};
//!
//! let evens = xrange(0, Some(10), Some(2)).unwrap();
//! assert_eq!(evens.iter().collect::<Vec<_>>(), vec![0, 2, 4, 6, 8]);
//!
//! let total = reduce::sum(&Sequential, evens, 100, &reduce::Config::default());
//! assert_eq!(total, 120);
//!
//! // Nest one generator per outer element; the reducer recurses into each child.
//! let triangle = xrange(1, Some(4), None)
//!     .unwrap()
//!     .nest(|n| xrange(0, Some(n), None).unwrap());
//! let flattened: Vec<i64> = triangle.iter().collect();
//! assert_eq!(flattened, vec![0, 0, 1, 0, 1, 2]);
//! ```

mod adapters;
pub use adapters::{Filter, FilterChildren, Map, MapChildren, Nest, NestIter};
mod elements;
pub use elements::{Elements, ElementsIter};
mod range;
pub use range::{xrange, Error, Range, RangeIter};
pub mod reduce;

/// A lazy sequence that supports divide-and-conquer traversal.
///
/// # Contract
///
/// - [`iter`](Self::iter) never mutates the generator; every call starts a fresh traversal.
/// - If [`can_split`](Self::can_split) is `true`, [`split`](Self::split) returns `(left, right)`,
///   both strictly smaller than `self`, such that iterating `left` then `right` yields
///   exactly the elements of `self` in order. Otherwise `split` returns `None`.
/// - If [`is_nested`](Self::is_nested) is `true`, iterating the generators returned by
///   [`children`](Self::children) in order yields exactly the elements of `self`. Leaf
///   generators return no children.
///
/// Violations are not detected: a generator that breaks the contract produces wrong
/// (but well-defined) reductions.
pub trait Generator: Sized + Send + Sync {
    /// The type of leaf element.
    type Item: Send;

    /// Owned iterator over the leaf elements.
    type Iter: Iterator<Item = Self::Item>;

    /// Type of the sub-generators of a nested generator.
    ///
    /// Leaf generators typically use `Self` and yield no children.
    type Child: Generator<Item = Self::Item>;

    /// Iterator over sub-generators.
    type Children: Iterator<Item = Self::Child>;

    /// Starts a new traversal of the leaf elements.
    fn iter(&self) -> Self::Iter;

    /// Whether the generator represents more than one unit of work.
    fn can_split(&self) -> bool;

    /// Splits into two contiguous, order-preserving halves.
    fn split(&self) -> Option<(Self, Self)>;

    /// Whether the sequence is composed of sub-generators.
    fn is_nested(&self) -> bool {
        false
    }

    /// The sub-generators, in order (empty for leaf generators).
    fn children(&self) -> Self::Children;

    /// The number of elements, when known without iterating.
    fn len_hint(&self) -> Option<u64> {
        None
    }

    /// Lazily applies `f` to every element at consumption time.
    fn map<U, F>(self, f: F) -> Map<Self, F>
    where
        U: Send,
        F: Fn(Self::Item) -> U + Clone + Send + Sync,
    {
        Map::new(self, f)
    }

    /// Lazily keeps only the elements that satisfy `predicate`.
    fn filter<P>(self, predicate: P) -> Filter<Self, P>
    where
        P: Fn(&Self::Item) -> bool + Clone + Send + Sync,
    {
        Filter::new(self, predicate)
    }

    /// Replaces every element with the generator `f` produces for it.
    fn nest<H, F>(self, f: F) -> Nest<Self, F>
    where
        H: Generator,
        F: Fn(Self::Item) -> H + Clone + Send + Sync,
    {
        Nest::new(self, f)
    }
}

/// Conversion into a [`Generator`].
///
/// Every generator converts into itself; `Vec<T>` becomes [`Elements`] and
/// `core::ops::Range<i64>` becomes a unit-step [`Range`].
pub trait IntoGenerator {
    /// Leaf element type of the produced generator.
    type Item: Send;

    /// The produced generator.
    type Generator: Generator<Item = Self::Item>;

    /// Performs the conversion.
    fn into_generator(self) -> Self::Generator;
}

impl<G: Generator> IntoGenerator for G {
    type Item = G::Item;
    type Generator = G;

    fn into_generator(self) -> G {
        self
    }
}

impl<T: Clone + Send + Sync> IntoGenerator for Vec<T> {
    type Item = T;
    type Generator = Elements<T>;

    fn into_generator(self) -> Elements<T> {
        Elements::from(self)
    }
}

impl IntoGenerator for core::ops::Range<i64> {
    type Item = i64;
    type Generator = Range;

    fn into_generator(self) -> Range {
        Range::half_open(self.start, self.end, 1)
    }
}
