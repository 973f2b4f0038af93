//! Generators over materialized data.

use crate::Generator;
use core::iter::Empty;
use std::sync::Arc;

/// A contiguous window `[lo, hi)` over a shared, immutable buffer.
///
/// Splitting never copies elements: both halves reference the same buffer.
#[derive(Debug)]
pub struct Elements<T> {
    items: Arc<[T]>,
    lo: usize,
    hi: usize,
}

impl<T> Clone for Elements<T> {
    fn clone(&self) -> Self {
        Self {
            items: self.items.clone(),
            lo: self.lo,
            hi: self.hi,
        }
    }
}

impl<T> Elements<T> {
    /// Number of elements in the window.
    pub fn len(&self) -> usize {
        self.hi - self.lo
    }

    /// Whether the window is empty.
    pub fn is_empty(&self) -> bool {
        self.lo == self.hi
    }

    /// The elements of the window.
    pub fn as_slice(&self) -> &[T] {
        &self.items[self.lo..self.hi]
    }
}

impl<T> From<Arc<[T]>> for Elements<T> {
    fn from(items: Arc<[T]>) -> Self {
        let hi = items.len();
        Self { items, lo: 0, hi }
    }
}

impl<T> From<Vec<T>> for Elements<T> {
    fn from(items: Vec<T>) -> Self {
        Self::from(Arc::<[T]>::from(items))
    }
}

/// Iterator over an [`Elements`] window, cloning each element.
#[derive(Debug)]
pub struct ElementsIter<T> {
    items: Arc<[T]>,
    next: usize,
    end: usize,
}

impl<T: Clone> Iterator for ElementsIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.next == self.end {
            return None;
        }
        let item = self.items[self.next].clone();
        self.next += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end - self.next;
        (remaining, Some(remaining))
    }
}

impl<T: Clone> ExactSizeIterator for ElementsIter<T> {}

impl<T: Clone + Send + Sync> Generator for Elements<T> {
    type Item = T;
    type Iter = ElementsIter<T>;
    type Child = Elements<T>;
    type Children = Empty<Elements<T>>;

    fn iter(&self) -> ElementsIter<T> {
        ElementsIter {
            items: self.items.clone(),
            next: self.lo,
            end: self.hi,
        }
    }

    fn can_split(&self) -> bool {
        self.len() > 1
    }

    fn split(&self) -> Option<(Self, Self)> {
        if !self.can_split() {
            return None;
        }
        let mid = self.lo + self.len() / 2;
        Some((
            Self {
                items: self.items.clone(),
                lo: self.lo,
                hi: mid,
            },
            Self {
                items: self.items.clone(),
                lo: mid,
                hi: self.hi,
            },
        ))
    }

    fn children(&self) -> Empty<Elements<T>> {
        core::iter::empty()
    }

    fn len_hint(&self) -> Option<u64> {
        Some(self.len() as u64)
    }
}
