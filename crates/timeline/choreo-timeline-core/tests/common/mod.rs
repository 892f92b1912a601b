#![allow(dead_code)]

use std::collections::HashMap;

use choreo_test_fixtures::{animations, scenes};
use choreo_timeline_core::{
    parse, Config, EngineLoader, Groups, NamedTarget, RecordingEngine, StaticResolver, TargetRef,
};
use serde_json::Value as JsonValue;

/// Resolver over the "stage" scene plus its targets by node name.
pub fn stage() -> (StaticResolver, HashMap<String, TargetRef>) {
    let mut resolver = StaticResolver::new();
    let mut targets = HashMap::new();
    for node in scenes::load("stage").expect("stage scene") {
        let target = match node.kind.as_str() {
            "object" => NamedTarget::object(node.name.clone()),
            _ => NamedTarget::dom(node.name.clone()),
        };
        let target = TargetRef::new(target);
        resolver.insert(node.id.as_deref(), &node.path, target.clone());
        targets.insert(node.name, target);
    }
    (resolver, targets)
}

pub fn animation(name: &str) -> JsonValue {
    animations::load(name).expect("animation fixture")
}

/// Parse an animation fixture against the stage.
pub fn parse_fixture(name: &str) -> (Groups, HashMap<String, TargetRef>) {
    let (resolver, targets) = stage();
    let groups = parse(&animation(name), &resolver).expect("fixture parses");
    (groups, targets)
}

pub fn loader(engine: RecordingEngine) -> EngineLoader<RecordingEngine> {
    EngineLoader::new(engine, Config::default().engine)
}

pub fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}
