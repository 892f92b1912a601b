//! Named parameter values applied by a transition.

use std::ops::{Deref, DerefMut};

use choreo_list::{Item, Key, List, ListError, ListResult, Model, Policies};
use serde::{Deserialize, Serialize};
use serde_json::{Map as JsonMap, Value as JsonValue};

#[derive(Clone, Debug, PartialEq)]
pub struct Param {
    pub name: String,
    pub value: JsonValue,
}

impl Param {
    pub fn new(name: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParamObject {
    pub name: String,
    #[serde(default)]
    pub value: JsonValue,
}

impl Model for Param {
    const NAME: &'static str = "Param";
    type Object = ParamObject;

    fn from_object(object: ParamObject) -> Result<Self, ListError> {
        Ok(Param {
            name: object.name,
            value: object.value,
        })
    }

    fn to_object(&self) -> ParamObject {
        ParamObject {
            name: self.name.clone(),
            value: self.value.clone(),
        }
    }

    fn property(&self, name: &str) -> Key {
        match name {
            "name" => Key::Text(self.name.clone()),
            _ => Key::Undefined,
        }
    }
}

/// Params of one transition, unique by name, in declaration order.
#[derive(Debug)]
pub struct Params(List<Param>);

impl Default for Params {
    fn default() -> Self {
        Self::new()
    }
}

impl Params {
    pub fn new() -> Self {
        Self(List::with_policies(Policies::default().unique_by("name")))
    }

    /// Build from a JSON object, one param per key.
    pub fn from_map(map: JsonMap<String, JsonValue>) -> ListResult<Self> {
        let mut params = Self::new();
        params.add_all(map.into_iter().map(|(name, value)| Param { name, value }))?;
        Ok(params)
    }

    pub fn to_map(&self) -> JsonMap<String, JsonValue> {
        self.iter()
            .map(|item| {
                let param = item.borrow();
                (param.name.clone(), param.value.clone())
            })
            .collect()
    }

    pub fn get(&self, name: &str) -> Option<Item<Param>> {
        self.find(|param| param.name == name)
    }

    /// Update the value of `name`, adding the param when it is missing.
    pub fn set(&mut self, name: &str, value: impl Into<JsonValue>) -> ListResult<()> {
        let value = value.into();
        match self.get(name) {
            Some(item) => {
                item.borrow_mut().value = value;
            }
            None => {
                self.add(Param::new(name, value))?;
            }
        }
        Ok(())
    }
}

impl Deref for Params {
    type Target = List<Param>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Params {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn map_order_is_preserved() {
        let map = json!({ "y": 2, "x": 1, "scale": 1.5 });
        let params = Params::from_map(map.as_object().cloned().unwrap()).unwrap();
        let names: Vec<String> = params.iter().map(|p| p.borrow().name.clone()).collect();
        assert_eq!(names, vec!["y", "x", "scale"]);
        assert_eq!(JsonValue::Object(params.to_map()), map);
    }

    #[test]
    fn names_are_unique() {
        let mut params = Params::new();
        params.add(Param::new("x", 0)).unwrap();
        let err = params.add(Param::new("x", 10)).unwrap_err();
        assert_eq!(err.to_string(), "list has duplicates. List > Param > { name: x }");
    }

    #[test]
    fn set_updates_in_place() {
        let mut params = Params::new();
        params.set("x", 0).unwrap();
        let x = params.get("x").unwrap();
        params.set("x", 500).unwrap();
        assert_eq!(params.len(), 1);
        assert_eq!(x.borrow().value, json!(500));
    }
}
