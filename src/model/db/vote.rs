use std::ops::{Deref, DerefMut};

use chrono::{DateTime, Utc};
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use serde::{Deserialize, Serialize};

use crate::model::{
    common::{Choice, Email},
    db::participant::ParticipantCore,
    mongodb::Id,
};

/// Core vote data, as stored in the database.
///
/// The voter's pseudo is denormalised into the vote at cast time so the
/// listing never needs a join; it cannot drift because both records are
/// immutable once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteCore {
    /// Email of the participant who cast this vote; unique across the collection.
    pub email: Email,
    /// Display name captured from the participant.
    pub pseudo: String,
    /// The answer they gave.
    pub choice: Choice,
    /// When the vote was cast; drives the listing order.
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub cast_at: DateTime<Utc>,
}

impl VoteCore {
    /// Create a new vote on behalf of the given participant.
    pub fn new(participant: &ParticipantCore, choice: Choice) -> Self {
        Self {
            email: participant.email.clone(),
            pseudo: participant.pseudo.clone(),
            choice,
            // Millisecond precision, matching the BSON representation.
            cast_at: mongodb::bson::DateTime::now().to_chrono(),
        }
    }
}

/// A vote without an ID.
pub type NewVote = VoteCore;

/// A vote from the database, with its unique ID.
#[derive(Debug, Serialize, Deserialize)]
pub struct Vote {
    #[serde(rename = "_id")]
    pub id: Id,
    #[serde(flatten)]
    pub vote: VoteCore,
}

impl Deref for Vote {
    type Target = VoteCore;

    fn deref(&self) -> &Self::Target {
        &self.vote
    }
}

impl DerefMut for Vote {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.vote
    }
}
