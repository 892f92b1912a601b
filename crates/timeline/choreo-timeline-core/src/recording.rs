//! Headless engine that journals every call instead of animating.
//!
//! Useful for hosts that only need the keyframe schedule, and for tests.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use serde_json::{Map as JsonMap, Value as JsonValue};

use crate::engine::{Keyframe, RuntimeTimeline, TweenEngine};
use crate::error::EngineError;

#[derive(Clone, Debug, PartialEq)]
pub enum EngineCall {
    Load {
        url: String,
    },
    Create {
        timeline: usize,
    },
    Keyframe {
        timeline: usize,
        time: f64,
        target: String,
        params: JsonMap<String, JsonValue>,
        ease: String,
    },
    Stop {
        timeline: usize,
    },
    Release {
        timeline: usize,
    },
}

type Journal = Rc<RefCell<Vec<EngineCall>>>;

#[derive(Debug, Default)]
pub struct RecordingEngine {
    available: Cell<bool>,
    load_error: Option<String>,
    reject_param: Option<String>,
    next_id: Cell<usize>,
    journal: Journal,
}

impl RecordingEngine {
    /// Engine that is already loaded.
    pub fn available() -> Self {
        let engine = Self::default();
        engine.available.set(true);
        engine
    }

    /// Engine that becomes available once loaded.
    pub fn unavailable() -> Self {
        Self::default()
    }

    /// Engine whose load always fails with `message`.
    pub fn failing_load(message: impl Into<String>) -> Self {
        Self {
            load_error: Some(message.into()),
            ..Self::default()
        }
    }

    /// Make timelines refuse keyframes that tween `name`.
    pub fn reject_param(mut self, name: impl Into<String>) -> Self {
        self.reject_param = Some(name.into());
        self
    }

    pub fn calls(&self) -> Vec<EngineCall> {
        self.journal.borrow().clone()
    }

    pub fn count(&self, pred: impl Fn(&EngineCall) -> bool) -> usize {
        self.journal.borrow().iter().filter(|call| pred(*call)).count()
    }

    pub fn loads(&self) -> usize {
        self.count(|call| matches!(call, EngineCall::Load { .. }))
    }
}

impl TweenEngine for RecordingEngine {
    type Timeline = RecordingTimeline;

    fn is_available(&self) -> bool {
        self.available.get()
    }

    async fn load(&self, url: &str) -> Result<(), EngineError> {
        self.journal.borrow_mut().push(EngineCall::Load {
            url: url.to_string(),
        });
        // Suspend once so concurrent callers observe the load in flight.
        tokio::task::yield_now().await;
        match &self.load_error {
            Some(message) => Err(EngineError::new(message.clone())),
            None => {
                self.available.set(true);
                Ok(())
            }
        }
    }

    fn create_timeline(&self) -> RecordingTimeline {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.journal
            .borrow_mut()
            .push(EngineCall::Create { timeline: id });
        RecordingTimeline {
            id,
            duration: 0.0,
            reject_param: self.reject_param.clone(),
            journal: Rc::clone(&self.journal),
        }
    }
}

#[derive(Debug)]
pub struct RecordingTimeline {
    id: usize,
    duration: f64,
    reject_param: Option<String>,
    journal: Journal,
}

impl RuntimeTimeline for RecordingTimeline {
    fn add_keyframe(&mut self, keyframe: Keyframe) -> Result<(), EngineError> {
        if let Some(name) = &self.reject_param {
            if keyframe.params.contains_key(name) {
                return Err(EngineError::new(format!(
                    "cannot tween '{name}' on {}",
                    keyframe.target.describe()
                )));
            }
        }
        self.journal.borrow_mut().push(EngineCall::Keyframe {
            timeline: self.id,
            time: keyframe.time,
            target: keyframe.target.describe(),
            params: keyframe.params,
            ease: keyframe.ease.to_string(),
        });
        self.duration = self.duration.max(keyframe.time);
        Ok(())
    }

    fn duration(&self) -> f64 {
        self.duration
    }

    fn stop(&mut self) {
        self.journal
            .borrow_mut()
            .push(EngineCall::Stop { timeline: self.id });
    }

    fn release(&mut self) {
        self.duration = 0.0;
        self.journal
            .borrow_mut()
            .push(EngineCall::Release { timeline: self.id });
    }
}
