//! Lazy adapters that preserve the splitting structure of the generator they wrap.

use crate::Generator;

/// Applies a function to every element of the wrapped generator.
///
/// Created by [`Generator::map`]. The function runs when elements are consumed,
/// never when the adapter is built or split.
#[derive(Clone, Debug)]
pub struct Map<G, F> {
    inner: G,
    f: F,
}

impl<G, F> Map<G, F> {
    pub(crate) fn new(inner: G, f: F) -> Self {
        Self { inner, f }
    }
}

impl<G, F, U> Generator for Map<G, F>
where
    G: Generator,
    U: Send,
    F: Fn(G::Item) -> U + Clone + Send + Sync,
{
    type Item = U;
    type Iter = core::iter::Map<G::Iter, F>;
    type Child = Map<G::Child, F>;
    type Children = MapChildren<G::Children, F>;

    fn iter(&self) -> Self::Iter {
        self.inner.iter().map(self.f.clone())
    }

    fn can_split(&self) -> bool {
        self.inner.can_split()
    }

    fn split(&self) -> Option<(Self, Self)> {
        let (left, right) = self.inner.split()?;
        Some((
            Self::new(left, self.f.clone()),
            Self::new(right, self.f.clone()),
        ))
    }

    fn is_nested(&self) -> bool {
        self.inner.is_nested()
    }

    fn children(&self) -> Self::Children {
        MapChildren {
            children: self.inner.children(),
            f: self.f.clone(),
        }
    }

    fn len_hint(&self) -> Option<u64> {
        self.inner.len_hint()
    }
}

/// Sub-generators of a [`Map`], each wrapped with the same function.
#[derive(Clone, Debug)]
pub struct MapChildren<I, F> {
    children: I,
    f: F,
}

impl<I: Iterator, F: Clone> Iterator for MapChildren<I, F> {
    type Item = Map<I::Item, F>;

    fn next(&mut self) -> Option<Self::Item> {
        let child = self.children.next()?;
        Some(Map::new(child, self.f.clone()))
    }
}

/// Keeps the elements of the wrapped generator that satisfy a predicate.
///
/// Created by [`Generator::filter`]. Splitting filters both halves, so the
/// halves may end up with very different element counts.
#[derive(Clone, Debug)]
pub struct Filter<G, P> {
    inner: G,
    predicate: P,
}

impl<G, P> Filter<G, P> {
    pub(crate) fn new(inner: G, predicate: P) -> Self {
        Self { inner, predicate }
    }
}

impl<G, P> Generator for Filter<G, P>
where
    G: Generator,
    P: Fn(&G::Item) -> bool + Clone + Send + Sync,
{
    type Item = G::Item;
    type Iter = core::iter::Filter<G::Iter, P>;
    type Child = Filter<G::Child, P>;
    type Children = FilterChildren<G::Children, P>;

    fn iter(&self) -> Self::Iter {
        self.inner.iter().filter(self.predicate.clone())
    }

    fn can_split(&self) -> bool {
        self.inner.can_split()
    }

    fn split(&self) -> Option<(Self, Self)> {
        let (left, right) = self.inner.split()?;
        Some((
            Self::new(left, self.predicate.clone()),
            Self::new(right, self.predicate.clone()),
        ))
    }

    fn is_nested(&self) -> bool {
        self.inner.is_nested()
    }

    fn children(&self) -> Self::Children {
        FilterChildren {
            children: self.inner.children(),
            predicate: self.predicate.clone(),
        }
    }
}

/// Sub-generators of a [`Filter`], each wrapped with the same predicate.
#[derive(Clone, Debug)]
pub struct FilterChildren<I, P> {
    children: I,
    predicate: P,
}

impl<I: Iterator, P: Clone> Iterator for FilterChildren<I, P> {
    type Item = Filter<I::Item, P>;

    fn next(&mut self) -> Option<Self::Item> {
        let child = self.children.next()?;
        Some(Filter::new(child, self.predicate.clone()))
    }
}

/// A generator of generators: every outer element is replaced by the generator
/// produced for it.
///
/// Created by [`Generator::nest`]. Splitting divides the outer generator, and
/// [`children`](Generator::children) exposes the inner generators so that a reducer
/// can keep dividing them after the outer generator can no longer be split.
#[derive(Clone, Debug)]
pub struct Nest<G, F> {
    outer: G,
    f: F,
}

impl<G, F> Nest<G, F> {
    pub(crate) fn new(outer: G, f: F) -> Self {
        Self { outer, f }
    }
}

impl<G, F, H> Generator for Nest<G, F>
where
    G: Generator,
    H: Generator,
    F: Fn(G::Item) -> H + Clone + Send + Sync,
{
    type Item = H::Item;
    type Iter = NestIter<G::Iter, F, H>;
    type Child = H;
    type Children = core::iter::Map<G::Iter, F>;

    fn iter(&self) -> Self::Iter {
        NestIter {
            outer: self.outer.iter(),
            f: self.f.clone(),
            current: None,
        }
    }

    fn can_split(&self) -> bool {
        self.outer.can_split()
    }

    fn split(&self) -> Option<(Self, Self)> {
        let (left, right) = self.outer.split()?;
        Some((
            Self::new(left, self.f.clone()),
            Self::new(right, self.f.clone()),
        ))
    }

    fn is_nested(&self) -> bool {
        true
    }

    fn children(&self) -> Self::Children {
        self.outer.iter().map(self.f.clone())
    }
}

/// Flattening iterator over a [`Nest`].
pub struct NestIter<I, F, H: Generator> {
    outer: I,
    f: F,
    current: Option<H::Iter>,
}

impl<I, F, H> Iterator for NestIter<I, F, H>
where
    I: Iterator,
    F: Fn(I::Item) -> H,
    H: Generator,
{
    type Item = H::Item;

    fn next(&mut self) -> Option<H::Item> {
        loop {
            if let Some(item) = self.current.as_mut().and_then(Iterator::next) {
                return Some(item);
            }
            let child = (self.f)(self.outer.next()?);
            self.current = Some(child.iter());
        }
    }
}
