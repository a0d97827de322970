use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::ValidationError;

/// One of the two people sharing the calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum User {
    Ilias,
    Melissa,
}

impl User {
    pub const ALL: [User; 2] = [User::Ilias, User::Melissa];

    pub fn as_str(&self) -> &'static str {
        match self {
            User::Ilias => "ilias",
            User::Melissa => "melissa",
        }
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for User {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ilias" => Ok(User::Ilias),
            "melissa" => Ok(User::Melissa),
            other => Err(ValidationError::UnknownUser(other.to_string())),
        }
    }
}

impl TryFrom<String> for User {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
