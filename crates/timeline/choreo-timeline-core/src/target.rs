//! Animation targets and the resolver seam.
//!
//! A timeline animates a target: a visual object owned by the host (a DOM
//! node, a scene-graph entity, a plain object). The core only needs identity,
//! a kind for the exported `type` discriminator, and a description for
//! diagnostics. Hosts implement [`TargetResolver`] to map declared ids and path
//! expressions to targets within a root context.

use std::fmt;
use std::rc::Rc;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    #[default]
    Dom,
    Object,
}

pub trait Target: fmt::Debug {
    fn kind(&self) -> TargetKind {
        TargetKind::Dom
    }

    fn describe(&self) -> String;
}

/// Shared handle to a target. Equality is identity.
#[derive(Clone)]
pub struct TargetRef(Rc<dyn Target>);

impl TargetRef {
    pub fn new(target: impl Target + 'static) -> Self {
        Self(Rc::new(target))
    }

    pub fn kind(&self) -> TargetKind {
        self.0.kind()
    }

    pub fn describe(&self) -> String {
        self.0.describe()
    }

    pub fn addr(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }

    pub fn ptr_eq(&self, other: &TargetRef) -> bool {
        self.addr() == other.addr()
    }
}

impl PartialEq for TargetRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for TargetRef {}

impl fmt::Debug for TargetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TargetRef").field(&self.0).finish()
    }
}

/// Resolves declared target references within a root context.
pub trait TargetResolver {
    fn by_id(&self, id: &str) -> Option<TargetRef>;

    fn by_path(&self, path: &str) -> Option<TargetRef>;

    /// Path expression locating `target` relative to the root, if any.
    fn expression(&self, target: &TargetRef) -> Option<String>;
}

/// Plain named target for hosts without a scene graph of their own.
#[derive(Clone, Debug, PartialEq)]
pub struct NamedTarget {
    pub name: String,
    pub kind: TargetKind,
}

impl NamedTarget {
    pub fn dom(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: TargetKind::Dom,
        }
    }

    pub fn object(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: TargetKind::Object,
        }
    }
}

impl Target for NamedTarget {
    fn kind(&self) -> TargetKind {
        self.kind
    }

    fn describe(&self) -> String {
        self.name.clone()
    }
}

/// Map-backed resolver: targets registered up front under an optional id and
/// a path expression. A target registered under several paths reports the
/// first one as its expression.
#[derive(Debug, Default)]
pub struct StaticResolver {
    ids: HashMap<String, TargetRef>,
    paths: HashMap<String, TargetRef>,
    expressions: HashMap<usize, String>,
}

impl StaticResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `target` under `path` and, when given, `id`.
    pub fn insert(&mut self, id: Option<&str>, path: &str, target: TargetRef) -> &mut Self {
        if let Some(id) = id {
            self.ids.insert(id.to_string(), target.clone());
        }
        self.expressions
            .entry(target.addr())
            .or_insert_with(|| path.to_string());
        self.paths.insert(path.to_string(), target);
        self
    }
}

impl TargetResolver for StaticResolver {
    fn by_id(&self, id: &str) -> Option<TargetRef> {
        self.ids.get(id).cloned()
    }

    fn by_path(&self, path: &str) -> Option<TargetRef> {
        self.paths.get(path).cloned()
    }

    fn expression(&self, target: &TargetRef) -> Option<String> {
        self.expressions.get(&target.addr()).cloned()
    }
}
