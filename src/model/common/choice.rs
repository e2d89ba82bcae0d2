use std::fmt::{Display, Formatter};
use std::str::FromStr;

use mongodb::bson::{to_bson, Bson};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The two answers a participant may give to the poll question.
///
/// This set is closed: every stored vote holds exactly one of these values,
/// and results always report a count for each of them.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Choice {
    Oui,
    Non,
}

impl Choice {
    /// Every member of the choice set, in display order.
    pub const ALL: [Choice; 2] = [Choice::Oui, Choice::Non];

    pub fn as_str(&self) -> &'static str {
        match self {
            Choice::Oui => "Oui",
            Choice::Non => "Non",
        }
    }
}

impl Display for Choice {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("Choice must be one of 'Oui' or 'Non', got {0:?}")]
pub struct ParseChoiceError(pub String);

impl FromStr for Choice {
    type Err = ParseChoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Oui" => Ok(Choice::Oui),
            "Non" => Ok(Choice::Non),
            other => Err(ParseChoiceError(other.to_string())),
        }
    }
}

impl From<Choice> for Bson {
    fn from(choice: Choice) -> Self {
        to_bson(&choice).expect("Serialisation is infallible")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_exact_members_only() {
        assert_eq!("Oui".parse::<Choice>().unwrap(), Choice::Oui);
        assert_eq!("Non".parse::<Choice>().unwrap(), Choice::Non);
        // Case matters; the wire format is exact.
        "oui".parse::<Choice>().unwrap_err();
        "NON".parse::<Choice>().unwrap_err();
        "Peut-être".parse::<Choice>().unwrap_err();
        "".parse::<Choice>().unwrap_err();
    }

    #[test]
    fn serialises_as_bare_string() {
        use rocket::serde::json::serde_json;

        assert_eq!(serde_json::to_string(&Choice::Oui).unwrap(), "\"Oui\"");
        assert_eq!(
            serde_json::from_str::<Choice>("\"Non\"").unwrap(),
            Choice::Non
        );
    }

    #[test]
    fn displays_like_the_wire_format() {
        for choice in Choice::ALL {
            assert_eq!(choice.to_string().parse::<Choice>().unwrap(), choice);
        }
    }
}
