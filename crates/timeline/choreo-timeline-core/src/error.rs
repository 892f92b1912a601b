//! Error taxonomy for entities, parsing and timeline construction.
//!
//! Collection-level failures are [`ListError`]s and surface synchronously.
//! Resolution failures never leave the parser; they are recorded as
//! unresolved entries. Engine and build failures surface through the result
//! of `Group::construct`.

use choreo_list::ListError;
use thiserror::Error;

/// Validation failures on group fields, plus wrapped collection errors.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GroupError {
    #[error("Name needs to be a string")]
    InvalidName,

    #[error("Fps needs to be a number")]
    InvalidFps,

    #[error("group data needs to be an object")]
    NotAnObject,

    #[error(transparent)]
    List(#[from] ListError),
}

/// A timeline target could not be found.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ResolutionError {
    #[error("cannot find element with id \"{id}\"")]
    IdNotFound { id: String },

    #[error("cannot find element with path expression {path}")]
    PathNotFound { path: String },

    #[error("cannot find element: no id or path declared")]
    Unresolvable,
}

/// Failure reported by a tweening engine.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("{message}")]
pub struct EngineError {
    pub message: String,
}

impl EngineError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// The tweening engine is unavailable.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineNotFoundError {
    #[error("tweening engine not found and auto-injection is disabled")]
    AutoInjectDisabled,

    #[error("tweening engine not found: loading {url} failed: {source}")]
    LoadFailed {
        url: String,
        #[source]
        source: EngineError,
    },

    #[error("tweening engine not found after loading {url}")]
    StillUnavailable { url: String },
}

/// One timeline (or one of its keyframes) that could not be built.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum BuildFailure {
    #[error("timeline '{label}' has no resolved target")]
    UnresolvedTarget { label: String },

    #[error("timeline '{label}' rejected keyframe at frame {frame}: {source}")]
    Keyframe {
        label: String,
        frame: f64,
        #[source]
        source: EngineError,
    },
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConstructCause {
    #[error(transparent)]
    EngineNotFound(#[from] EngineNotFoundError),

    #[error("{}", describe_failures(.0))]
    Build(Vec<BuildFailure>),
}

/// Aggregate failure of `Group::construct`.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("Could not construct timeline for group '{group}': {cause}")]
pub struct ConstructError {
    pub group: String,
    #[source]
    pub cause: ConstructCause,
}

impl ConstructError {
    pub fn failures(&self) -> &[BuildFailure] {
        match &self.cause {
            ConstructCause::Build(failures) => failures,
            ConstructCause::EngineNotFound(_) => &[],
        }
    }

    pub fn is_engine_not_found(&self) -> bool {
        matches!(self.cause, ConstructCause::EngineNotFound(_))
    }
}

fn describe_failures(failures: &[BuildFailure]) -> String {
    let details = failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ");
    format!("{} build failure(s): {details}", failures.len())
}

/// Structural problems in declarative input.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseError {
    #[error("group #{index} needs to be an object")]
    GroupShape { index: usize },

    #[error("group #{index}, timeline #{timeline}: {reason}")]
    TimelineShape {
        index: usize,
        timeline: usize,
        reason: String,
    },

    #[error("group #{index}: {source}")]
    Group {
        index: usize,
        #[source]
        source: GroupError,
    },
}
