//! Specifications - reusable, composable predicates with optional ordering and paging.
//!
//! ## Example
//!
//! ```ignore
//! use access_rust::Specification;
//!
//! let adults = Specification::named("adult", |p: &Person| p.age >= 18);
//! let named_a = Specification::named("starts with A", |p: &Person| p.name.starts_with('A'));
//!
//! let spec = adults.and(&named_a).ordered_by(|a, b| a.age.cmp(&b.age)).paged(0, Some(10));
//! let people = store.get_all_satisfying(&spec, &cancel).await?;
//! ```

use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

type Predicate<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;
type Comparator<T> = Arc<dyn Fn(&T, &T) -> Ordering + Send + Sync>;

/// A window over an ordered result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Page {
    pub skip: usize,
    pub take: Option<usize>,
}

/// How an adapter evaluates a specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvaluationMode {
    /// Translated into the store's own query language.
    Native,
    /// Evaluated over a full scan.
    InMemory,
}

/// An immutable predicate over `T`, optionally carrying an ordering and a page.
///
/// Cloning is cheap. Composition never mutates its operands. Predicates must be pure:
/// adapters may evaluate them any number of times.
pub struct Specification<T> {
    predicate: Predicate<T>,
    ordering: Option<Comparator<T>>,
    page: Option<Page>,
    label: Cow<'static, str>,
    depth: usize,
}

impl<T> Clone for Specification<T> {
    fn clone(&self) -> Self {
        Specification {
            predicate: Arc::clone(&self.predicate),
            ordering: self.ordering.clone(),
            page: self.page,
            label: self.label.clone(),
            depth: self.depth,
        }
    }
}

impl<T> fmt::Debug for Specification<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Specification")
            .field("label", &self.label)
            .field("depth", &self.depth)
            .field("ordered", &self.ordering.is_some())
            .field("page", &self.page)
            .finish()
    }
}

impl<T: 'static> Specification<T> {
    pub fn new<P>(predicate: P) -> Self
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Self::named("predicate", predicate)
    }

    pub fn named<P>(label: impl Into<Cow<'static, str>>, predicate: P) -> Self
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Specification {
            predicate: Arc::new(predicate),
            ordering: None,
            page: None,
            label: label.into(),
            depth: 1,
        }
    }

    /// Matches everything.
    pub fn all() -> Self {
        Self::named("all", |_: &T| true)
    }

    pub fn and(&self, other: &Specification<T>) -> Self {
        let (a, b) = (Arc::clone(&self.predicate), Arc::clone(&other.predicate));
        self.compose(
            format!("({} AND {})", self.label, other.label),
            other.depth,
            move |item| a(item) && b(item),
        )
    }

    pub fn or(&self, other: &Specification<T>) -> Self {
        let (a, b) = (Arc::clone(&self.predicate), Arc::clone(&other.predicate));
        self.compose(
            format!("({} OR {})", self.label, other.label),
            other.depth,
            move |item| a(item) || b(item),
        )
    }

    pub fn not(&self) -> Self {
        let a = Arc::clone(&self.predicate);
        self.compose(format!("NOT {}", self.label), 0, move |item| !a(item))
    }

    fn compose<P>(&self, label: String, other_depth: usize, predicate: P) -> Self
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Specification {
            predicate: Arc::new(predicate),
            ordering: None,
            page: None,
            label: Cow::Owned(label),
            depth: 1 + self.depth.max(other_depth),
        }
    }
}

impl<T> Specification<T> {
    /// Order matching results with `compare`.
    pub fn ordered_by<C>(mut self, compare: C) -> Self
    where
        C: Fn(&T, &T) -> Ordering + Send + Sync + 'static,
    {
        self.ordering = Some(Arc::new(compare));
        self
    }

    /// Keep `take` results after skipping `skip`. Applied after ordering.
    pub fn paged(mut self, skip: usize, take: Option<usize>) -> Self {
        self.page = Some(Page { skip, take });
        self
    }

    pub fn is_satisfied_by(&self, candidate: &T) -> bool {
        (self.predicate)(candidate)
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Composition depth; a leaf specification has depth 1.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn page(&self) -> Option<Page> {
        self.page
    }

    pub fn is_ordered(&self) -> bool {
        self.ordering.is_some()
    }

    /// Filter, then order, then page `items`.
    pub fn apply(&self, items: Vec<T>) -> Vec<T> {
        let mut matched: Vec<T> = items
            .into_iter()
            .filter(|item| self.is_satisfied_by(item))
            .collect();

        if let Some(compare) = &self.ordering {
            matched.sort_by(|a, b| compare(a, b));
        }

        match self.page {
            Some(Page { skip, take }) => matched
                .into_iter()
                .skip(skip)
                .take(take.unwrap_or(usize::MAX))
                .collect(),
            None => matched,
        }
    }
}
