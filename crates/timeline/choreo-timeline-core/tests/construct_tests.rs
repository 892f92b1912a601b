mod common;

use choreo_timeline_core::{
    BuildFailure, ConstructCause, EngineCall, EngineConfig, EngineLoader, EngineNotFoundError,
    Group, NamedTarget, RecordingEngine, TargetRef, Timeline, Transition, DEFAULT_ENGINE_URL,
};
use common::{approx, loader, parse_fixture};
use serde_json::json;

fn keyframes(engine: &RecordingEngine, timeline: usize) -> Vec<EngineCall> {
    engine
        .calls()
        .into_iter()
        .filter(|call| matches!(call, EngineCall::Keyframe { timeline: t, .. } if *t == timeline))
        .collect()
}

/// it should build one keyframe per transition and span the last frame
#[tokio::test]
async fn constructs_a_runtime_timeline() {
    let (groups, _) = parse_fixture("modify-timeline");
    let item = groups.get("modify-timeline").unwrap();
    let mut group = item.borrow_mut();
    let loader = loader(RecordingEngine::available());

    let duration = group.construct(&loader).await.unwrap().duration();
    assert!(approx(duration, 250.0 / 30.0), "duration {duration}");
    assert!(approx(group.duration(), duration));
    assert!(group.runtime().is_some());

    let engine = loader.engine();
    assert_eq!(engine.calls()[0], EngineCall::Create { timeline: 0 });
    assert_eq!(engine.loads(), 0);

    let frames = keyframes(engine, 0);
    assert_eq!(frames.len(), 6);
    // Collection order, then ascending frames within a timeline.
    assert_eq!(
        frames[1],
        EngineCall::Keyframe {
            timeline: 0,
            time: 100.0 / 30.0,
            target: "divA".into(),
            params: json!({ "x": 1000 }).as_object().cloned().unwrap(),
            ease: "Linear.easeNone".into(),
        }
    );
    assert!(matches!(
        &frames[3],
        EngineCall::Keyframe { target, .. } if target == "divB"
    ));
}

/// it should stop and release the previous timeline exactly once per rebuild
#[tokio::test]
async fn rebuild_replaces_the_runtime_timeline() {
    let (groups, targets) = parse_fixture("modify-timeline");
    let item = groups.get("modify-timeline").unwrap();
    let mut group = item.borrow_mut();
    let loader = loader(RecordingEngine::available());

    group.construct(&loader).await.unwrap();

    let tl = group.timelines.get(&targets["divA"]).unwrap();
    let tr = tl.borrow().transitions.get(100.0).unwrap();
    tr.borrow_mut().params.set("x", 500).unwrap();

    group.construct(&loader).await.unwrap();

    let engine = loader.engine();
    let count = |call: EngineCall| engine.count(|c| *c == call);
    assert_eq!(count(EngineCall::Stop { timeline: 0 }), 1);
    assert_eq!(count(EngineCall::Release { timeline: 0 }), 1);
    assert_eq!(count(EngineCall::Stop { timeline: 1 }), 0);
    assert_eq!(count(EngineCall::Release { timeline: 1 }), 0);
    assert_eq!(engine.count(|c| matches!(c, EngineCall::Create { .. })), 2);

    let rebuilt = keyframes(engine, 1);
    assert!(matches!(
        &rebuilt[1],
        EngineCall::Keyframe { params, .. } if params["x"] == json!(500)
    ));

    // A third build tears down the second timeline only.
    group.construct(&loader).await.unwrap();
    assert_eq!(count(EngineCall::Stop { timeline: 0 }), 1);
    assert_eq!(count(EngineCall::Stop { timeline: 1 }), 1);
}

/// it should fail when the engine is missing and auto-injection is off
#[tokio::test]
async fn engine_not_found_without_auto_inject() {
    let loader = EngineLoader::new(
        RecordingEngine::unavailable(),
        EngineConfig {
            auto_inject: false,
            ..EngineConfig::default()
        },
    );
    let mut group = Group::named("intro");

    let err = group.construct(&loader).await.unwrap_err();
    assert!(err.is_engine_not_found());
    assert_eq!(
        err.cause,
        ConstructCause::EngineNotFound(EngineNotFoundError::AutoInjectDisabled)
    );
    assert!(err.to_string().contains("tweening engine not found"));
    assert!(group.runtime().is_none());
    assert!(loader.engine().calls().is_empty());
}

/// it should fail when loading the engine fails
#[tokio::test]
async fn engine_not_found_when_load_fails() {
    let loader = loader(RecordingEngine::failing_load("404 Not Found"));
    let mut group = Group::new();

    let err = group.construct(&loader).await.unwrap_err();
    match &err.cause {
        ConstructCause::EngineNotFound(EngineNotFoundError::LoadFailed { url, source }) => {
            assert_eq!(url, DEFAULT_ENGINE_URL);
            assert_eq!(source.message, "404 Not Found");
        }
        other => panic!("unexpected cause {other:?}"),
    }
    assert!(group.runtime().is_none());
    assert_eq!(loader.engine().loads(), 1);
}

/// it should load the engine on demand from the configured url
#[tokio::test]
async fn auto_injects_the_engine() {
    let loader = EngineLoader::new(
        RecordingEngine::unavailable(),
        EngineConfig {
            auto_inject: true,
            auto_inject_url: "test/fixtures/engine.js".into(),
        },
    );
    let mut group = Group::new();

    group.construct(&loader).await.unwrap();
    group.construct(&loader).await.unwrap();

    assert_eq!(
        loader.engine().calls()[0],
        EngineCall::Load {
            url: "test/fixtures/engine.js".into()
        }
    );
    assert_eq!(loader.engine().loads(), 1);
}

/// it should share one in-flight engine load between groups
#[tokio::test]
async fn concurrent_constructs_share_the_engine_load() {
    let loader = loader(RecordingEngine::unavailable());
    let mut left = Group::named("left");
    let mut right = Group::named("right");

    let (a, b) = tokio::join!(left.construct(&loader), right.construct(&loader));
    assert!(a.is_ok());
    assert!(b.is_ok());
    assert_eq!(loader.engine().loads(), 1);
}

/// it should fail for a timeline without a target and leave no runtime
#[tokio::test]
async fn unresolved_target_fails_the_build() {
    let div = TargetRef::new(NamedTarget::dom("divA"));
    let mut group = Group::new();
    let mut resolved = Timeline::new(Some(div));
    resolved
        .transitions
        .add(Transition::at(0.0, json!({ "x": 0 }).as_object().cloned().unwrap()).unwrap())
        .unwrap();
    group.timelines.add(resolved).unwrap();

    let loader = loader(RecordingEngine::available());
    group.construct(&loader).await.unwrap();

    let mut ghost = Timeline::new(None).with_label("ghost");
    ghost
        .transitions
        .add(Transition::at(10.0, Default::default()).unwrap())
        .unwrap();
    group.timelines.add(ghost).unwrap();

    let err = group.construct(&loader).await.unwrap_err();
    assert!(err
        .to_string()
        .starts_with("Could not construct timeline for group 'untitled'"));
    assert_eq!(
        err.failures(),
        [BuildFailure::UnresolvedTarget {
            label: "ghost".into()
        }]
    );
    assert!(group.runtime().is_none());

    let engine = loader.engine();
    // The previous timeline was torn down and the partial one released.
    assert_eq!(engine.count(|c| *c == EngineCall::Stop { timeline: 0 }), 1);
    assert_eq!(engine.count(|c| *c == EngineCall::Release { timeline: 0 }), 1);
    assert_eq!(engine.count(|c| *c == EngineCall::Release { timeline: 1 }), 1);
}

/// it should collect rejected keyframes without skipping other timelines
#[tokio::test]
async fn rejected_keyframes_are_aggregated() {
    let (groups, _) = parse_fixture("modify-timeline");
    let item = groups.get("modify-timeline").unwrap();
    let mut group = item.borrow_mut();
    let loader = loader(RecordingEngine::available().reject_param("skewX"));

    let err = group.construct(&loader).await.unwrap_err();
    let failures = err.failures();
    assert_eq!(failures.len(), 1);
    assert!(matches!(
        &failures[0],
        BuildFailure::Keyframe { label, frame, .. } if label == "c" && *frame == 50.0
    ));
    assert_eq!(keyframes(loader.engine(), 0).len(), 5);
    assert!(group.runtime().is_none());
}

/// it should produce a zero-length timeline for a group without transitions
#[tokio::test]
async fn empty_group_has_zero_duration() {
    let loader = loader(RecordingEngine::available());
    let mut group = Group::new();
    let runtime = group.construct(&loader).await.unwrap();
    assert_eq!(runtime.duration(), 0.0);
    assert_eq!(group.duration(), 0.0);
}
