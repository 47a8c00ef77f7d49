//! Text fields of a work item that can be filtered, counted or listed.

use std::fmt;
use std::str::FromStr;

use fieldops_models::WorkItem;

use crate::error::LifecycleError;

/// A text field of [`WorkItem`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Status,
    Assignee,
    Make,
    Model,
}

impl Field {
    /// Returns the field's value on `item`, if set.
    pub fn value_of<'a>(&self, item: &'a WorkItem) -> Option<&'a str> {
        match self {
            Field::Status => Some(item.status_code.as_str()),
            Field::Assignee => item.assignee.as_deref(),
            Field::Make => item.make.as_deref(),
            Field::Model => item.model.as_deref(),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Status => "status",
            Field::Assignee => "assignee",
            Field::Make => "make",
            Field::Model => "model",
        };
        f.write_str(name)
    }
}

impl FromStr for Field {
    type Err = LifecycleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "status" => Ok(Field::Status),
            "assignee" | "owner" => Ok(Field::Assignee),
            "make" => Ok(Field::Make),
            "model" => Ok(Field::Model),
            _ => Err(LifecycleError::validation(
                "dimension",
                format!("unknown dimension '{}'", s.trim()),
            )),
        }
    }
}
