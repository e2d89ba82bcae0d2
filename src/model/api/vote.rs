use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{
    common::{Choice, Email},
    db::vote::{Vote, VoteCore},
};

/// Request body for casting a vote.
///
/// Like registration, fields arrive unvalidated so the handler can answer
/// with the precise rejection (`InvalidInput` vs `InvalidChoice`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CastVoteRequest {
    pub email: Option<String>,
    pub choice: Option<String>,
}

/// A freshly cast vote, as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteResponse {
    pub email: Email,
    pub pseudo: String,
    pub choice: Choice,
    pub cast_at: DateTime<Utc>,
}

impl From<VoteCore> for VoteResponse {
    fn from(vote: VoteCore) -> Self {
        Self {
            email: vote.email,
            pseudo: vote.pseudo,
            choice: vote.choice,
            cast_at: vote.cast_at,
        }
    }
}

/// One entry in the public vote listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteSummary {
    pub email: Email,
    pub pseudo: String,
    pub choice: Choice,
}

impl From<Vote> for VoteSummary {
    fn from(vote: Vote) -> Self {
        Self {
            email: vote.vote.email,
            pseudo: vote.vote.pseudo,
            choice: vote.vote.choice,
        }
    }
}

/// Answer to a has-voted query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HasVotedResponse {
    pub email: Email,
    pub has_voted: bool,
}

/// Example data for tests.
#[cfg(test)]
mod examples {
    use super::*;

    impl CastVoteRequest {
        pub fn example() -> Self {
            Self {
                email: Some("alice@example.com".to_string()),
                choice: Some("Oui".to_string()),
            }
        }
    }
}
