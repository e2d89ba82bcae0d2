use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{common::Email, db::participant::ParticipantCore};

/// Request body for participant registration.
///
/// Both fields arrive unvalidated; the handler turns a missing or malformed
/// email into an `InvalidInput` rejection rather than a generic parse failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: Option<String>,
    /// Display name; defaults to the email when missing or empty.
    pub pseudo: Option<String>,
}

/// A registered participant, as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantResponse {
    pub email: Email,
    pub pseudo: String,
    pub created_at: DateTime<Utc>,
}

impl From<ParticipantCore> for ParticipantResponse {
    fn from(participant: ParticipantCore) -> Self {
        Self {
            email: participant.email,
            pseudo: participant.pseudo,
            created_at: participant.created_at,
        }
    }
}
