//! Errors raised synchronously by list operations.

use thiserror::Error;

/// Failures of list mutations and lookups. None of these are recovered
/// internally; a failed mutation leaves the list in its post-mutation state.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ListError {
    /// An item could not be coerced into the list's model.
    #[error("could not construct {model} from item: {reason}")]
    Construction { model: &'static str, reason: String },

    /// Uniqueness was violated after a mutation.
    #[error("list has duplicates. {}", describe_duplicate(.model, .property, .key))]
    Duplicate {
        model: Option<&'static str>,
        property: Option<String>,
        key: String,
    },

    /// Linking was requested on a list holding bare values.
    #[error("can not link primitives ({model})")]
    Link { model: &'static str },

    /// Out-of-range access.
    #[error("index exceeded. requested {index}, have length of {len}")]
    Index { index: usize, len: usize },
}

pub type ListResult<T> = Result<T, ListError>;

fn describe_duplicate(model: &Option<&'static str>, property: &Option<String>, key: &str) -> String {
    let entry = match property {
        Some(prop) => format!("{{ {prop}: {key} }}"),
        None => format!("{{ {key} }}"),
    };
    match model {
        Some(model) => format!("List > {model} > {entry}"),
        None => entry,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_message_names_model_and_property() {
        let err = ListError::Duplicate {
            model: Some("Transition"),
            property: Some("frame".into()),
            key: "100".into(),
        };
        assert_eq!(
            err.to_string(),
            "list has duplicates. List > Transition > { frame: 100 }"
        );
    }

    #[test]
    fn duplicate_message_without_model() {
        let err = ListError::Duplicate {
            model: None,
            property: None,
            key: "4".into(),
        };
        assert_eq!(err.to_string(), "list has duplicates. { 4 }");
    }
}
