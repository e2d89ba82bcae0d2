use std::ops::{Deref, DerefMut};

use chrono::{DateTime, Utc};
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use serde::{Deserialize, Serialize};

use crate::model::{common::Email, mongodb::Id};

/// Core participant data, as stored in the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantCore {
    /// Natural key: the email the participant registered with.
    pub email: Email,
    /// Display name shown next to their vote.
    pub pseudo: String,
    /// When the participant first registered.
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

impl ParticipantCore {
    /// Create a new participant. A missing or empty pseudo defaults to the email.
    pub fn new(email: Email, pseudo: Option<String>) -> Self {
        let pseudo = pseudo
            .filter(|pseudo| !pseudo.is_empty())
            .unwrap_or_else(|| email.to_string());
        Self {
            email,
            pseudo,
            // BSON datetimes are millisecond precision; take the timestamp at
            // that precision so the record round-trips unchanged.
            created_at: mongodb::bson::DateTime::now().to_chrono(),
        }
    }
}

/// A participant without an ID.
pub type NewParticipant = ParticipantCore;

/// A participant from the database, with its unique ID.
#[derive(Debug, Serialize, Deserialize)]
pub struct Participant {
    #[serde(rename = "_id")]
    pub id: Id,
    #[serde(flatten)]
    pub participant: ParticipantCore,
}

impl Deref for Participant {
    type Target = ParticipantCore;

    fn deref(&self) -> &Self::Target {
        &self.participant
    }
}

impl DerefMut for Participant {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.participant
    }
}

/// Example data for tests.
#[cfg(test)]
mod examples {
    use super::*;

    impl ParticipantCore {
        pub fn example() -> Self {
            Self::new(Email::example(), Some("Alice".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_an_explicit_pseudo() {
        let participant = ParticipantCore::new(Email::example(), Some("Alice".to_string()));
        assert_eq!(participant.pseudo, "Alice");
    }

    #[test]
    fn missing_pseudo_defaults_to_email() {
        let participant = ParticipantCore::new(Email::example(), None);
        assert_eq!(participant.pseudo, "alice@example.com");
    }

    #[test]
    fn empty_pseudo_defaults_to_email() {
        let participant = ParticipantCore::new(Email::example(), Some(String::new()));
        assert_eq!(participant.pseudo, "alice@example.com");
    }
}
