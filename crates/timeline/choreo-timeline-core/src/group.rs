//! Groups: named, frame-rate-bearing aggregates of timelines that own the
//! runtime timeline built from them.

use std::fmt;

use choreo_list::{Bubble, Key, ListError, ListenerId, Model};
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::{Map as JsonMap, Value as JsonValue};

use crate::engine::RuntimeTimeline;
use crate::error::GroupError;
use crate::parser::Unresolved;
use crate::timeline::{Timeline, TimelineObject, Timelines};

pub const DEFAULT_NAME: &str = "untitled";
pub const DEFAULT_FPS: f64 = 30.0;

pub struct Group {
    pub(crate) name: String,
    pub(crate) fps: f64,
    pub timelines: Timelines,
    pub(crate) unresolved: Vec<Unresolved>,
    pub(crate) runtime: Option<Box<dyn RuntimeTimeline>>,
    forward: Option<ListenerId>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GroupObject {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_fps")]
    pub fps: f64,
    #[serde(default)]
    pub timelines: Vec<TimelineObject>,
}

fn default_name() -> String {
    DEFAULT_NAME.to_string()
}

fn default_fps() -> f64 {
    DEFAULT_FPS
}

impl Default for GroupObject {
    fn default() -> Self {
        Self {
            name: default_name(),
            fps: default_fps(),
            timelines: Vec::new(),
        }
    }
}

impl Default for Group {
    fn default() -> Self {
        Self::new()
    }
}

impl Group {
    pub fn new() -> Self {
        Self {
            name: default_name(),
            fps: DEFAULT_FPS,
            timelines: Timelines::new(),
            unresolved: Vec::new(),
            runtime: None,
            forward: None,
        }
    }

    pub fn named(name: impl Into<String>) -> Self {
        let mut group = Self::new();
        group.name = name.into();
        group
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn fps(&self) -> f64 {
        self.fps
    }

    /// Frames per second; must be a positive, finite number.
    pub fn set_fps(&mut self, fps: f64) -> Result<(), GroupError> {
        self.fps = check_fps(fps)?;
        Ok(())
    }

    /// Replace all timelines.
    pub fn set_timelines<I>(&mut self, timelines: I) -> Result<(), GroupError>
    where
        I: IntoIterator<Item = Timeline>,
    {
        self.timelines.reset(timelines)?;
        Ok(())
    }

    /// Timeline declarations that could not be resolved while parsing.
    pub fn unresolved(&self) -> &[Unresolved] {
        &self.unresolved
    }

    /// Total length in seconds: the last frame across all timelines over fps.
    pub fn duration(&self) -> f64 {
        self.timelines
            .iter()
            .filter_map(|timeline| timeline.borrow().transitions.last_frame())
            .fold(0.0, f64::max)
            / self.fps
    }

    pub fn runtime(&self) -> Option<&dyn RuntimeTimeline> {
        self.runtime.as_deref()
    }

    pub fn runtime_mut(&mut self) -> Option<&mut (dyn RuntimeTimeline + 'static)> {
        self.runtime.as_deref_mut()
    }

    /// Stop and release the current runtime timeline, if any.
    pub fn teardown(&mut self) {
        if let Some(mut runtime) = self.runtime.take() {
            debug!("group '{}': tearing down runtime timeline", self.name);
            runtime.stop();
            runtime.release();
        }
    }

    /// Build a group from declarative JSON, validating field types.
    pub fn from_json(data: &JsonValue) -> Result<Self, GroupError> {
        let map = data.as_object().ok_or(GroupError::NotAnObject)?;
        let mut group = Group::named(read_name(map)?);
        group.set_fps(read_fps(map)?)?;
        if let Some(timelines) = map.get("timelines").filter(|t| !t.is_null()) {
            group.timelines.add_json(timelines)?;
        }
        Ok(group)
    }

    pub fn to_json(&self) -> serde_json::Result<JsonValue> {
        serde_json::to_value(self.to_object())
    }
}

fn check_fps(fps: f64) -> Result<f64, GroupError> {
    if fps.is_finite() && fps > 0.0 {
        Ok(fps)
    } else {
        Err(GroupError::InvalidFps)
    }
}

pub(crate) fn read_name(map: &JsonMap<String, JsonValue>) -> Result<String, GroupError> {
    match map.get("name") {
        None | Some(JsonValue::Null) => Ok(default_name()),
        Some(JsonValue::String(name)) => Ok(name.clone()),
        Some(_) => Err(GroupError::InvalidName),
    }
}

pub(crate) fn read_fps(map: &JsonMap<String, JsonValue>) -> Result<f64, GroupError> {
    match map.get("fps") {
        None | Some(JsonValue::Null) => Ok(DEFAULT_FPS),
        Some(JsonValue::Number(fps)) => fps.as_f64().ok_or(GroupError::InvalidFps),
        Some(_) => Err(GroupError::InvalidFps),
    }
}

impl fmt::Debug for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Group")
            .field("name", &self.name)
            .field("fps", &self.fps)
            .field("timelines", &self.timelines.len())
            .field("unresolved", &self.unresolved.len())
            .field("constructed", &self.runtime.is_some())
            .finish()
    }
}

impl Model for Group {
    const NAME: &'static str = "Group";
    type Object = GroupObject;

    fn from_object(object: GroupObject) -> Result<Self, ListError> {
        let fps = check_fps(object.fps).map_err(|e| ListError::Construction {
            model: Self::NAME,
            reason: e.to_string(),
        })?;
        let mut group = Group::named(object.name);
        group.fps = fps;
        group.timelines.add_objects(object.timelines)?;
        Ok(group)
    }

    fn to_object(&self) -> GroupObject {
        GroupObject {
            name: self.name.clone(),
            fps: self.fps,
            timelines: self.timelines.to_array(),
        }
    }

    fn property(&self, name: &str) -> Key {
        match name {
            "name" => Key::Text(self.name.clone()),
            "fps" => Key::Number(self.fps),
            _ => Key::Undefined,
        }
    }

    fn attach(&mut self, bubble: Bubble<Self>) {
        if let Some(id) = self.forward.take() {
            self.timelines.unsubscribe(id);
        }
        self.forward = Some(self.timelines.forward_to(bubble));
    }
}
