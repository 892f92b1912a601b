//! Declarative animation data to groups.
//!
//! Accepted shapes: a wrapper object `{ "groups": [...] }`, an array of group
//! objects, or a single group object. Timeline targets are resolved against a
//! [`TargetResolver`]; declarations that cannot be resolved are kept as
//! [`Unresolved`] entries on their group instead of failing the parse.

use choreo_list::Model;
use log::warn;
use serde::Deserialize;
use serde_json::{Map as JsonMap, Value as JsonValue};

use crate::error::{GroupError, ParseError, ResolutionError};
use crate::group::{read_fps, read_name, Group};
use crate::groups::Groups;
use crate::target::{TargetKind, TargetRef, TargetResolver};
use crate::timeline::{label_for, Timeline, TimelineObject};
use crate::transition::TransitionObject;

/// A timeline declaration whose target could not be found.
#[derive(Clone, Debug, PartialEq)]
pub struct Unresolved {
    /// Name of the group the declaration belongs to.
    pub group: String,
    pub label: String,
    /// The declaration as it appeared in the input.
    pub data: JsonValue,
    pub error: ResolutionError,
}

#[derive(Debug, Deserialize)]
struct TimelineDecl {
    #[serde(rename = "type", default)]
    kind: Option<TargetKind>,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    path: Option<String>,
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    transitions: Vec<TransitionObject>,
}

impl TimelineDecl {
    fn id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }

    fn path(&self) -> Option<&str> {
        self.path.as_deref().filter(|path| !path.is_empty())
    }

    fn label(&self) -> String {
        label_for(self.label.as_deref(), self.id(), self.path())
    }
}

pub fn parse(data: &JsonValue, root: &dyn TargetResolver) -> Result<Groups, ParseError> {
    let entries: Vec<&JsonValue> = match data {
        JsonValue::Object(map) => match map.get("groups") {
            Some(JsonValue::Array(groups)) => groups.iter().collect(),
            _ => vec![data],
        },
        JsonValue::Array(groups) => groups.iter().collect(),
        other => vec![other],
    };

    let mut groups = Groups::new();
    for (index, entry) in entries.into_iter().enumerate() {
        let group = parse_group(index, entry, root)?;
        groups.add(group).map_err(|e| ParseError::Group {
            index,
            source: e.into(),
        })?;
    }
    Ok(groups)
}

fn parse_group(
    index: usize,
    entry: &JsonValue,
    root: &dyn TargetResolver,
) -> Result<Group, ParseError> {
    let map = entry.as_object().ok_or(ParseError::GroupShape { index })?;
    let group_error = move |source: GroupError| ParseError::Group { index, source };

    let mut group = Group::named(read_name(map).map_err(group_error)?);
    group
        .set_fps(read_fps(map).map_err(group_error)?)
        .map_err(group_error)?;

    let mut timelines = Vec::new();
    for (position, declaration) in declarations(index, map)?.iter().enumerate() {
        let decl: TimelineDecl =
            serde_json::from_value(declaration.clone()).map_err(|e| ParseError::TimelineShape {
                index,
                timeline: position,
                reason: e.to_string(),
            })?;
        let label = decl.label();

        let target = if decl.kind == Some(TargetKind::Object) {
            None
        } else {
            match resolve(&decl, root) {
                Ok(target) => Some(target),
                Err(error) => {
                    warn!("group '{}': {error} (timeline '{label}')", group.name());
                    group.unresolved.push(Unresolved {
                        group: group.name().to_string(),
                        label,
                        data: declaration.clone(),
                        error,
                    });
                    continue;
                }
            }
        };

        let path = target
            .as_ref()
            .and_then(|t| root.expression(t))
            .or_else(|| decl.path().map(str::to_owned));
        let timeline = Timeline::from_object(TimelineObject {
            kind: decl.kind.unwrap_or_default(),
            target,
            label: Some(label),
            path,
            id: decl.id().map(str::to_owned),
            transitions: decl.transitions,
        })
        .map_err(|e| group_error(e.into()))?;
        timelines.push(timeline);
    }

    group.set_timelines(timelines).map_err(group_error)?;
    Ok(group)
}

fn declarations(index: usize, map: &JsonMap<String, JsonValue>) -> Result<&[JsonValue], ParseError> {
    match map.get("timelines") {
        None | Some(JsonValue::Null) => Ok(&[]),
        Some(JsonValue::Array(items)) => Ok(items.as_slice()),
        Some(_) => Err(ParseError::TimelineShape {
            index,
            timeline: 0,
            reason: "timelines needs to be an array".into(),
        }),
    }
}

/// Id lookup first, then path. An id miss only falls through when a path is
/// declared.
fn resolve(decl: &TimelineDecl, root: &dyn TargetResolver) -> Result<TargetRef, ResolutionError> {
    if let Some(id) = decl.id() {
        if let Some(target) = root.by_id(id) {
            return Ok(target);
        }
        if decl.path().is_none() {
            return Err(ResolutionError::IdNotFound { id: id.to_string() });
        }
    }
    match decl.path() {
        Some(path) => root.by_path(path).ok_or_else(|| ResolutionError::PathNotFound {
            path: path.to_string(),
        }),
        None => Err(ResolutionError::Unresolvable),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::{NamedTarget, StaticResolver};
    use serde_json::json;

    fn decl(value: JsonValue) -> TimelineDecl {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn id_miss_falls_back_to_path() {
        let div = TargetRef::new(NamedTarget::dom("div"));
        let mut root = StaticResolver::new();
        root.insert(None, "/div[1]", div.clone());

        let found = resolve(&decl(json!({ "id": "nope", "path": "/div[1]" })), &root).unwrap();
        assert_eq!(found, div);

        assert_eq!(
            resolve(&decl(json!({ "id": "nope" })), &root),
            Err(ResolutionError::IdNotFound { id: "nope".into() })
        );
        assert_eq!(
            resolve(&decl(json!({ "path": "/span" })), &root),
            Err(ResolutionError::PathNotFound { path: "/span".into() })
        );
        assert_eq!(resolve(&decl(json!({})), &root), Err(ResolutionError::Unresolvable));
    }
}
