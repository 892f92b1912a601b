mod common;

use choreo_list::ListError;
use choreo_timeline_core::{
    parse, GroupError, ParseError, RecordingEngine, ResolutionError, StaticResolver, TargetKind,
};
use common::{animation, loader, parse_fixture, stage};
use serde_json::json;

/// it should keep resolved timelines and collect the unresolved ones
#[test]
fn partial_parse_is_resilient() {
    let (groups, targets) = parse_fixture("partial");
    assert_eq!(groups.len(), 2);

    let intro = groups.get("intro").unwrap();
    let intro = intro.borrow();
    assert_eq!(intro.timelines.len(), 1);
    assert!(intro.timelines.get(&targets["divA"]).is_some());
    assert_eq!(intro.unresolved().len(), 1);

    let missing = &intro.unresolved()[0];
    assert_eq!(missing.group, "intro");
    assert_eq!(missing.label, "does-not-exist");
    assert_eq!(
        missing.error,
        ResolutionError::IdNotFound {
            id: "does-not-exist".into()
        }
    );
    assert_eq!(missing.data, animation("partial")[0]["timelines"][1]);

    let outro = groups.get("outro").unwrap();
    let outro = outro.borrow();
    assert_eq!(outro.fps(), 60.0);
    assert_eq!(outro.unresolved()[0].label, "lost");
    assert_eq!(
        outro.unresolved()[0].error,
        ResolutionError::PathNotFound {
            path: "/html/body/section[9]".into()
        }
    );

    // Object timelines skip resolution and are kept without a target.
    let camera = outro.timelines.by_label("camera").unwrap();
    assert!(camera.borrow().target.is_none());
    assert_eq!(camera.borrow().kind(), TargetKind::Object);

    assert_eq!(groups.unresolved().len(), 2);
}

/// it should label timelines by label, then id, then path
#[test]
fn labels_and_paths_are_normalized() {
    let (groups, targets) = parse_fixture("wrapped");
    assert_eq!(groups.len(), 2);
    assert!(groups.unresolved().is_empty());

    let right = groups.get("right").unwrap();
    let right = right.borrow();

    let by_id = right.timelines.get(&targets["divB"]).unwrap();
    assert_eq!(by_id.borrow().display_label(), "b");
    assert_eq!(by_id.borrow().path.as_deref(), Some("/html/body/div[2]"));
    assert_eq!(by_id.borrow().id.as_deref(), Some("b"));

    let by_path = right.timelines.get(&targets["divC"]).unwrap();
    assert_eq!(by_path.borrow().label.as_deref(), Some("/html/body/div[3]"));
}

/// it should accept a single group object
#[test]
fn single_group_shape() {
    let (groups, targets) = parse_fixture("ghost");
    assert_eq!(groups.len(), 1);

    let ghost = groups.at(0).unwrap();
    let ghost = ghost.borrow();
    assert_eq!(ghost.name(), "ghost");
    assert_eq!(ghost.fps(), 25.0);

    let body = ghost.timelines.by_label("body").unwrap();
    assert_eq!(body.borrow().target.as_ref(), Some(&targets["divA"]));
    let eased = body.borrow().transitions.get(40.0).unwrap();
    assert_eq!(eased.borrow().ease.0, "Power2.easeOut");
}

/// it should accept a bare array of groups and default missing fields
#[test]
fn array_shape_defaults() {
    let (root, _) = stage();
    let groups = parse(&json!([{}, { "name": "second" }]), &root).unwrap();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups.at(0).unwrap().borrow().name(), "untitled");
    assert_eq!(groups.at(0).unwrap().borrow().fps(), 30.0);
    assert!(groups.get("second").is_some());
}

/// it should report structural problems as parse errors
#[test]
fn structural_errors() {
    let root = StaticResolver::new();

    assert_eq!(
        parse(&json!(["nope"]), &root).unwrap_err(),
        ParseError::GroupShape { index: 0 }
    );
    assert_eq!(
        parse(&json!([{}, { "name": 5 }]), &root).unwrap_err(),
        ParseError::Group {
            index: 1,
            source: GroupError::InvalidName
        }
    );
    assert_eq!(
        parse(&json!({ "fps": "fast" }), &root).unwrap_err().to_string(),
        "group #0: Fps needs to be a number"
    );
    assert!(matches!(
        parse(&json!({ "timelines": { "id": "a" } }), &root).unwrap_err(),
        ParseError::TimelineShape { index: 0, .. }
    ));
    assert!(matches!(
        parse(
            &json!({ "timelines": [{ "type": "object", "transitions": [{ "frame": "x" }] }] }),
            &root
        )
        .unwrap_err(),
        ParseError::TimelineShape { timeline: 0, .. }
    ));
    assert!(matches!(
        parse(
            &json!({ "timelines": [{ "type": "object", "transitions": [{ "frame": 1 }, { "frame": 1 }] }] }),
            &root
        )
        .unwrap_err(),
        ParseError::Group {
            source: GroupError::List(ListError::Duplicate { .. }),
            ..
        }
    ));
}

/// it should construct every parsed group on a shared engine
#[tokio::test]
async fn parsed_groups_construct() {
    let (groups, _) = parse_fixture("wrapped");
    let loader = loader(RecordingEngine::unavailable());

    for item in groups.iter() {
        let mut group = item.borrow_mut();
        group.construct(&loader).await.unwrap();
    }

    let left = groups.get("left").unwrap();
    assert_eq!(left.borrow().runtime().unwrap().duration(), 2.0);
    let right = groups.get("right").unwrap();
    assert_eq!(right.borrow().runtime().unwrap().duration(), 3.0);
    assert_eq!(loader.engine().loads(), 1);
}
