//! Keyframes: a frame offset, the params reached at that frame, and an ease.

use std::fmt;
use std::ops::{Deref, DerefMut};

use choreo_list::{Bubble, Item, Key, List, ListError, ListenerId, Model, Policies, SortOn};
use serde::{Deserialize, Serialize};
use serde_json::{Map as JsonMap, Value as JsonValue};

use crate::param::Params;

pub const DEFAULT_EASE: &str = "Linear.easeNone";

/// Easing descriptor handed to the engine as-is.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ease(pub String);

impl Default for Ease {
    fn default() -> Self {
        Ease(DEFAULT_EASE.to_string())
    }
}

impl From<&str> for Ease {
    fn from(value: &str) -> Self {
        Ease(value.to_string())
    }
}

impl fmt::Display for Ease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub struct Transition {
    frame: f64,
    pub params: Params,
    pub ease: Ease,
    forward: Option<ListenerId>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitionObject {
    pub frame: f64,
    #[serde(default)]
    pub params: JsonMap<String, JsonValue>,
    #[serde(default)]
    pub ease: Ease,
}

impl Transition {
    pub fn new(frame: f64, params: Params, ease: Ease) -> Result<Self, ListError> {
        check_frame(frame)?;
        Ok(Self {
            frame,
            params,
            ease,
            forward: None,
        })
    }

    /// Transition at `frame` with the default ease.
    pub fn at(frame: f64, params: JsonMap<String, JsonValue>) -> Result<Self, ListError> {
        Self::new(frame, Params::from_map(params)?, Ease::default())
    }

    pub fn frame(&self) -> f64 {
        self.frame
    }

    /// Params as an ordered JSON object, the shape handed to the engine.
    pub fn params_map(&self) -> JsonMap<String, JsonValue> {
        self.params.to_map()
    }
}

fn check_frame(frame: f64) -> Result<(), ListError> {
    if frame.is_finite() && frame >= 0.0 {
        Ok(())
    } else {
        Err(ListError::Construction {
            model: Transition::NAME,
            reason: format!("frame needs to be a non-negative number, got {frame}"),
        })
    }
}

impl fmt::Debug for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("frame", &self.frame)
            .field("params", &self.params.to_map())
            .field("ease", &self.ease)
            .finish()
    }
}

impl Model for Transition {
    const NAME: &'static str = "Transition";
    type Object = TransitionObject;

    fn from_object(object: TransitionObject) -> Result<Self, ListError> {
        Self::new(object.frame, Params::from_map(object.params)?, object.ease)
    }

    fn to_object(&self) -> TransitionObject {
        TransitionObject {
            frame: self.frame,
            params: self.params.to_map(),
            ease: self.ease.clone(),
        }
    }

    fn property(&self, name: &str) -> Key {
        match name {
            "frame" => Key::Number(self.frame),
            _ => Key::Undefined,
        }
    }

    fn attach(&mut self, bubble: Bubble<Self>) {
        if let Some(id) = self.forward.take() {
            self.params.unsubscribe(id);
        }
        self.forward = Some(self.params.forward_to(bubble));
    }
}

/// Transitions of one timeline: unique by frame, kept in ascending frame
/// order and linked.
#[derive(Debug)]
pub struct Transitions(List<Transition>);

impl Default for Transitions {
    fn default() -> Self {
        Self::new()
    }
}

impl Transitions {
    pub fn new() -> Self {
        Self(List::with_policies(
            Policies::default()
                .unique_by("frame")
                .sort_on(SortOn::property("frame"))
                .linked(true),
        ))
    }

    pub fn from_objects(objects: Vec<TransitionObject>) -> Result<Self, ListError> {
        let mut transitions = Self::new();
        transitions.add_objects(objects)?;
        Ok(transitions)
    }

    pub fn get(&self, frame: f64) -> Option<Item<Transition>> {
        self.find(|transition| transition.frame == frame)
    }

    /// Frame of the last transition, if any.
    pub fn last_frame(&self) -> Option<f64> {
        self.iter().map(|item| item.borrow().frame).reduce(f64::max)
    }
}

impl Deref for Transitions {
    type Target = List<Transition>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Transitions {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}
