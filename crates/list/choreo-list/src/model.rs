//! Model capability: what a list element must provide.
//!
//! Every element type stored in a [`List`](crate::List) implements [`Model`].
//! Entity types (params, transitions, ...) project to and hydrate from a plain
//! `Object`; scalar types implement it as primitives whose object form is the
//! value itself. Primitives have no identity of their own and cannot be linked.

use std::cmp::Ordering;
use std::fmt;

use crate::error::ListError;
use crate::item::Bubble;

/// Comparable/hashable projection of an element or one of its properties.
/// Used for duplicate detection and sorting.
#[derive(Clone, Debug, PartialEq)]
pub enum Key {
    /// Property absent (or the element has no value key).
    Undefined,
    Bool(bool),
    Number(f64),
    Text(String),
    /// Identity of a shared reference (pointer address).
    Ref(usize),
}

impl Key {
    fn rank(&self) -> u8 {
        match self {
            Key::Bool(_) => 0,
            Key::Number(_) => 1,
            Key::Text(_) => 2,
            Key::Ref(_) => 3,
            Key::Undefined => 4,
        }
    }

    /// Natural ordering: numbers numerically, text lexicographically, mixed
    /// kinds by kind. `Undefined` sorts last.
    pub fn natural_cmp(&self, other: &Key) -> Ordering {
        match (self, other) {
            (Key::Bool(a), Key::Bool(b)) => a.cmp(b),
            (Key::Number(a), Key::Number(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
            (Key::Text(a), Key::Text(b)) => a.cmp(b),
            (Key::Ref(a), Key::Ref(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Key::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Undefined => f.write_str("undefined"),
            Key::Bool(b) => write!(f, "{b}"),
            Key::Number(n) => write!(f, "{n}"),
            Key::Text(s) => f.write_str(s),
            Key::Ref(addr) => write!(f, "ref@{addr:#x}"),
        }
    }
}

/// Element capability for [`List`](crate::List).
pub trait Model: Sized + 'static {
    /// Model name used in diagnostics.
    const NAME: &'static str;

    /// Bare values carry no back-reference and cannot be linked.
    const PRIMITIVE: bool = false;

    /// Plain-object projection (no back-references, no links).
    type Object: Clone + fmt::Debug + PartialEq;

    fn from_object(object: Self::Object) -> Result<Self, ListError>;

    fn to_object(&self) -> Self::Object;

    /// Whole-value key. Only primitives have one; entities are compared by
    /// identity.
    fn value_key(&self) -> Option<Key> {
        None
    }

    /// Named property lookup for `UniqueBy` / `SortOn::Property` policies.
    fn property(&self, _name: &str) -> Key {
        Key::Undefined
    }

    /// Called when the element is attached to a list. Entities that own
    /// nested lists use the handle to forward their events upward.
    fn attach(&mut self, _bubble: Bubble<Self>) {}
}

macro_rules! primitive_model {
    ($($ty:ty => $name:literal, $key:expr;)*) => {
        $(
            impl Model for $ty {
                const NAME: &'static str = $name;
                const PRIMITIVE: bool = true;
                type Object = $ty;

                fn from_object(object: Self::Object) -> Result<Self, ListError> {
                    Ok(object)
                }

                fn to_object(&self) -> Self::Object {
                    self.clone()
                }

                fn value_key(&self) -> Option<Key> {
                    let to_key: fn(&$ty) -> Key = $key;
                    Some(to_key(self))
                }
            }
        )*
    };
}

primitive_model! {
    f64 => "f64", |v| Key::Number(*v);
    i64 => "i64", |v| Key::Number(*v as f64);
    u32 => "u32", |v| Key::Number(f64::from(*v));
    bool => "bool", |v| Key::Bool(*v);
    String => "String", |v| Key::Text(v.clone());
}
