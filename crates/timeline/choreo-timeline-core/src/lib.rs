//! Choreo Timeline Core
//!
//! Engine-agnostic data model and construction pipeline for declarative
//! animations. Groups own timelines, timelines own transitions, transitions
//! own params; every aggregate is a [`choreo_list::List`]. Declarative JSON is
//! turned into [`Groups`] by [`parse`], and each [`Group`] can be constructed
//! into a live timeline on any [`TweenEngine`].

pub mod config;
pub mod construct;
pub mod engine;
pub mod error;
pub mod group;
pub mod groups;
pub mod param;
pub mod parser;
pub mod recording;
pub mod target;
pub mod timeline;
pub mod transition;

// Re-exports for consumers
pub use config::{Config, EngineConfig, DEFAULT_ENGINE_URL};
pub use engine::{EngineLoader, Keyframe, RuntimeTimeline, TweenEngine};
pub use error::{
    BuildFailure, ConstructCause, ConstructError, EngineError, EngineNotFoundError, GroupError,
    ParseError, ResolutionError,
};
pub use group::{Group, GroupObject, DEFAULT_FPS, DEFAULT_NAME};
pub use groups::Groups;
pub use param::{Param, ParamObject, Params};
pub use parser::{parse, Unresolved};
pub use recording::{EngineCall, RecordingEngine, RecordingTimeline};
pub use target::{NamedTarget, StaticResolver, Target, TargetKind, TargetRef, TargetResolver};
pub use timeline::{label_for, Timeline, TimelineObject, Timelines};
pub use transition::{Ease, Transition, TransitionObject, Transitions, DEFAULT_EASE};
