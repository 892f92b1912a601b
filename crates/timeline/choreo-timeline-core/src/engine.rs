//! Tweening engine seam.
//!
//! The engine is an external collaborator: it creates runtime timelines,
//! accepts keyframes on them and plays them back. [`EngineLoader`] wraps an
//! engine with the bootstrap configuration and a single-init guard so that
//! every group sharing the loader triggers at most one in-flight load.

use std::future::Future;

use log::debug;
use serde_json::{Map as JsonMap, Value as JsonValue};
use tokio::sync::OnceCell;

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineNotFoundError};
use crate::target::TargetRef;
use crate::transition::Ease;

/// One keyframe as handed to a runtime timeline.
#[derive(Clone, Debug, PartialEq)]
pub struct Keyframe {
    /// Offset from the start of the timeline, in seconds.
    pub time: f64,
    pub target: TargetRef,
    pub params: JsonMap<String, JsonValue>,
    pub ease: Ease,
}

/// Live timeline produced by an engine.
pub trait RuntimeTimeline {
    fn add_keyframe(&mut self, keyframe: Keyframe) -> Result<(), EngineError>;

    /// Total duration in seconds.
    fn duration(&self) -> f64;

    /// Halt active tweens.
    fn stop(&mut self);

    /// Drop all keyframes and internal state.
    fn release(&mut self);
}

impl std::fmt::Debug for dyn RuntimeTimeline + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuntimeTimeline").finish_non_exhaustive()
    }
}

pub trait TweenEngine {
    type Timeline: RuntimeTimeline + 'static;

    fn is_available(&self) -> bool;

    /// Fetch and initialise the engine from `url`.
    fn load(&self, url: &str) -> impl Future<Output = Result<(), EngineError>>;

    fn create_timeline(&self) -> Self::Timeline;
}

pub struct EngineLoader<E: TweenEngine> {
    engine: E,
    config: EngineConfig,
    loaded: OnceCell<()>,
}

impl<E: TweenEngine> EngineLoader<E> {
    pub fn new(engine: E, config: EngineConfig) -> Self {
        Self {
            engine,
            config,
            loaded: OnceCell::new(),
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Make sure the engine is usable, loading it on first use when
    /// auto-injection is enabled. Concurrent callers share one in-flight load;
    /// a failed load is retried by the next caller.
    pub async fn ensure(&self) -> Result<(), EngineNotFoundError> {
        if self.engine.is_available() {
            return Ok(());
        }
        if !self.config.auto_inject {
            return Err(EngineNotFoundError::AutoInjectDisabled);
        }

        let url = &self.config.auto_inject_url;
        self.loaded
            .get_or_try_init(|| async {
                debug!("loading tweening engine from {url}");
                self.engine
                    .load(url)
                    .await
                    .map_err(|source| EngineNotFoundError::LoadFailed {
                        url: url.clone(),
                        source,
                    })
            })
            .await?;

        if self.engine.is_available() {
            Ok(())
        } else {
            Err(EngineNotFoundError::StillUnavailable { url: url.clone() })
        }
    }
}
