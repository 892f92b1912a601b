//! A target plus the transitions animating it.

use std::fmt;
use std::ops::{Deref, DerefMut};

use choreo_list::{Bubble, Item, Key, List, ListError, ListenerId, Model, Policies};
use serde::{Deserialize, Serialize};

use crate::target::{TargetKind, TargetRef};
use crate::transition::{TransitionObject, Transitions};

pub struct Timeline {
    /// Resolved target, `None` until resolution succeeded.
    pub target: Option<TargetRef>,
    pub label: Option<String>,
    pub path: Option<String>,
    pub id: Option<String>,
    pub transitions: Transitions,
    forward: Option<ListenerId>,
}

/// Plain-object projection. The target handle is carried through
/// `from_object`/`to_object` but never serialized; `type` is derived from it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TimelineObject {
    #[serde(rename = "type", default)]
    pub kind: TargetKind,
    #[serde(skip)]
    pub target: Option<TargetRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub transitions: Vec<TransitionObject>,
}

impl Timeline {
    pub fn new(target: Option<TargetRef>) -> Self {
        Self {
            target,
            label: None,
            path: None,
            id: None,
            transitions: Transitions::new(),
            forward: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Diagnostic label: a non-blank label, then the id, then the path.
    pub fn display_label(&self) -> String {
        label_for(self.label.as_deref(), self.id.as_deref(), self.path.as_deref())
    }

    pub fn kind(&self) -> TargetKind {
        self.target
            .as_ref()
            .map(TargetRef::kind)
            .unwrap_or(TargetKind::Object)
    }
}

/// Label priority shared by timelines and unresolved declarations.
pub fn label_for(label: Option<&str>, id: Option<&str>, path: Option<&str>) -> String {
    if let Some(label) = label.filter(|l| !l.trim().is_empty()) {
        return label.to_string();
    }
    id.filter(|id| !id.is_empty())
        .or(path.filter(|p| !p.is_empty()))
        .unwrap_or("undefined")
        .to_string()
}

impl fmt::Debug for Timeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Timeline")
            .field("label", &self.display_label())
            .field("target", &self.target)
            .field("transitions", &self.transitions.len())
            .finish()
    }
}

impl Model for Timeline {
    const NAME: &'static str = "Timeline";
    type Object = TimelineObject;

    fn from_object(object: TimelineObject) -> Result<Self, ListError> {
        Ok(Self {
            target: object.target,
            label: object.label,
            path: object.path,
            id: object.id,
            transitions: Transitions::from_objects(object.transitions)?,
            forward: None,
        })
    }

    fn to_object(&self) -> TimelineObject {
        TimelineObject {
            kind: self.kind(),
            target: self.target.clone(),
            label: self.label.clone(),
            path: self.path.clone(),
            id: self.id.clone(),
            transitions: self.transitions.to_array(),
        }
    }

    fn property(&self, name: &str) -> Key {
        match name {
            // Timelines without a target are keyed by their own identity so
            // that only resolved targets can collide.
            "target" => match &self.target {
                Some(target) => Key::Ref(target.addr()),
                None => Key::Ref(self as *const Self as usize),
            },
            "label" => Key::Text(self.display_label()),
            _ => Key::Undefined,
        }
    }

    fn attach(&mut self, bubble: Bubble<Self>) {
        if let Some(id) = self.forward.take() {
            self.transitions.unsubscribe(id);
        }
        self.forward = Some(self.transitions.forward_to(bubble));
    }
}

/// Timelines of a group, unique by target.
#[derive(Debug)]
pub struct Timelines(List<Timeline>);

impl Default for Timelines {
    fn default() -> Self {
        Self::new()
    }
}

impl Timelines {
    pub fn new() -> Self {
        Self(List::with_policies(Policies::default().unique_by("target")))
    }

    pub fn get(&self, target: &TargetRef) -> Option<Item<Timeline>> {
        self.find(|timeline| timeline.target.as_ref() == Some(target))
    }

    pub fn by_label(&self, label: &str) -> Option<Item<Timeline>> {
        self.find(|timeline| timeline.display_label() == label)
    }
}

impl Deref for Timelines {
    type Target = List<Timeline>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Timelines {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}
