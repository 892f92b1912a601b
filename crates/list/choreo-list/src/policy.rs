//! Duplicate, sort and link policies.

use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

use crate::model::Model;

/// Uniqueness policy, checked after every mutation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Duplicates {
    #[default]
    Allow,
    /// No two elements may share the same identity (primitives: value).
    Unique,
    /// No two elements may share the same value of the named property.
    UniqueBy(String),
}

/// Sort policy, re-applied after every mutation.
pub enum SortOn<T> {
    None,
    /// Natural order of the elements' value keys.
    Natural,
    /// Ascending by the named numeric property.
    Property(String),
    Comparator(Rc<dyn Fn(&T, &T) -> Ordering>),
}

impl<T> SortOn<T> {
    pub fn property(name: impl Into<String>) -> Self {
        SortOn::Property(name.into())
    }

    pub fn comparator(cmp: impl Fn(&T, &T) -> Ordering + 'static) -> Self {
        SortOn::Comparator(Rc::new(cmp))
    }

    pub fn is_none(&self) -> bool {
        matches!(self, SortOn::None)
    }
}

impl<T> Default for SortOn<T> {
    fn default() -> Self {
        SortOn::None
    }
}

impl<T> Clone for SortOn<T> {
    fn clone(&self) -> Self {
        match self {
            SortOn::None => SortOn::None,
            SortOn::Natural => SortOn::Natural,
            SortOn::Property(name) => SortOn::Property(name.clone()),
            SortOn::Comparator(cmp) => SortOn::Comparator(Rc::clone(cmp)),
        }
    }
}

impl<T> fmt::Debug for SortOn<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOn::None => f.write_str("None"),
            SortOn::Natural => f.write_str("Natural"),
            SortOn::Property(name) => f.debug_tuple("Property").field(name).finish(),
            SortOn::Comparator(_) => f.write_str("Comparator(..)"),
        }
    }
}

/// Full policy set for constructing a list.
pub struct Policies<T: Model> {
    pub duplicates: Duplicates,
    pub sort_on: SortOn<T>,
    pub linked: bool,
}

impl<T: Model> Default for Policies<T> {
    fn default() -> Self {
        Self {
            duplicates: Duplicates::Allow,
            sort_on: SortOn::None,
            linked: false,
        }
    }
}

impl<T: Model> Policies<T> {
    pub fn unique_by(mut self, property: impl Into<String>) -> Self {
        self.duplicates = Duplicates::UniqueBy(property.into());
        self
    }

    pub fn sort_on(mut self, sort_on: SortOn<T>) -> Self {
        self.sort_on = sort_on;
        self
    }

    pub fn linked(mut self, linked: bool) -> Self {
        self.linked = linked;
        self
    }
}
