//! Turning a group's data into a live runtime timeline.

use log::{debug, warn};

use crate::engine::{EngineLoader, Keyframe, RuntimeTimeline, TweenEngine};
use crate::error::{BuildFailure, ConstructCause, ConstructError};
use crate::group::Group;

impl Group {
    /// Build a fresh runtime timeline from the current data.
    ///
    /// The engine is ensured first. Any previous runtime timeline is then
    /// stopped and released, so at most one is ever live per group. Every
    /// timeline contributes one keyframe per transition at `frame / fps`
    /// seconds. Unresolved targets and rejected keyframes are collected; if
    /// any occurred the new timeline is released and the failures are
    /// returned together.
    pub async fn construct<E: TweenEngine>(
        &mut self,
        loader: &EngineLoader<E>,
    ) -> Result<&dyn RuntimeTimeline, ConstructError> {
        if let Err(err) = loader.ensure().await {
            warn!("group '{}': {err}", self.name);
            return Err(self.construct_error(err.into()));
        }

        self.teardown();

        let mut runtime = loader.engine().create_timeline();
        let failures = self.build(&mut runtime);
        if !failures.is_empty() {
            runtime.release();
            return Err(self.construct_error(ConstructCause::Build(failures)));
        }

        debug!(
            "group '{}': constructed runtime timeline ({}s)",
            self.name,
            runtime.duration()
        );
        let runtime: Box<dyn RuntimeTimeline> = Box::new(runtime);
        Ok(&**self.runtime.insert(runtime))
    }

    fn build<R: RuntimeTimeline>(&self, runtime: &mut R) -> Vec<BuildFailure> {
        let mut failures = Vec::new();
        for timeline in self.timelines.iter() {
            let timeline = timeline.borrow();
            let label = timeline.display_label();
            let Some(target) = timeline.target.clone() else {
                warn!("group '{}': timeline '{label}' has no target", self.name);
                failures.push(BuildFailure::UnresolvedTarget { label });
                continue;
            };

            for transition in timeline.transitions.iter() {
                let transition = transition.borrow();
                let keyframe = Keyframe {
                    time: transition.frame() / self.fps,
                    target: target.clone(),
                    params: transition.params_map(),
                    ease: transition.ease.clone(),
                };
                if let Err(source) = runtime.add_keyframe(keyframe) {
                    warn!("group '{}': timeline '{label}': {source}", self.name);
                    failures.push(BuildFailure::Keyframe {
                        label: label.clone(),
                        frame: transition.frame(),
                        source,
                    });
                }
            }
        }
        failures
    }

    fn construct_error(&self, cause: ConstructCause) -> ConstructError {
        ConstructError {
            group: self.name.clone(),
            cause,
        }
    }
}
