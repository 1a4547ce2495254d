use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::user::User;
use crate::types::DbId;

/// Whether a slot holds one occupant or many participants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SelectionType {
    Single,
    Multiple,
}

impl SelectionType {
    pub fn as_str(self) -> &'static str {
        match self {
            SelectionType::Single => "SINGLE",
            SelectionType::Multiple => "MULTIPLE",
        }
    }
}

impl fmt::Display for SelectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SelectionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SINGLE" => Ok(SelectionType::Single),
            "MULTIPLE" => Ok(SelectionType::Multiple),
            other => Err(format!("Unknown selection type: {other}")),
        }
    }
}

/// A scheduling event owned by its organizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub organizer: User,
    pub selection_type: SelectionType,
}
