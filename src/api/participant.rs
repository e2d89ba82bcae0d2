use mongodb::bson::doc;
use rocket::{serde::json::Json, Route};

use crate::{
    error::{Error, Result},
    model::{
        api::{
            participant::{ParticipantResponse, RegisterRequest},
            vote::HasVotedResponse,
        },
        common::Email,
        db::{
            participant::{NewParticipant, Participant},
            vote::Vote,
        },
        mongodb::{is_duplicate_key_error, Coll},
    },
};

pub fn routes() -> Vec<Route> {
    routes![register, has_voted]
}

/// Register a participant. Registering an email that already exists is a
/// no-op: the stored record is returned unchanged (first write wins), so
/// clients may call this on every connect.
#[post("/user", data = "<request>", format = "json")]
async fn register(
    request: Json<RegisterRequest>,
    participants: Coll<Participant>,
    new_participants: Coll<NewParticipant>,
) -> Result<Json<ParticipantResponse>> {
    let request = request.0;
    let email = request
        .email
        .as_deref()
        .ok_or_else(|| Error::InvalidInput("missing email".to_string()))?
        .parse::<Email>()?;

    let participant = NewParticipant::new(email, request.pseudo);

    // Atomic insert-if-absent: the unique index on `email` resolves
    // concurrent double registration, so there is no check-then-insert race.
    let inserted = new_participants.insert_one(&participant, None).await;
    if is_duplicate_key_error(inserted.as_ref()) {
        let existing = participants
            .find_one(doc! { "email": participant.email.clone() }, None)
            .await?
            .ok_or_else(|| {
                Error::NotFound(format!("Participant with email '{}'", participant.email))
            })?;
        return Ok(Json(existing.participant.into()));
    }
    inserted?;

    Ok(Json(participant.into()))
}

/// Report whether the given email has already cast a vote. Unregistered
/// emails have not voted; they are not an error.
#[get("/hasVoted?<email>")]
async fn has_voted(email: Option<String>, votes: Coll<Vote>) -> Result<Json<HasVotedResponse>> {
    let email = email
        .ok_or_else(|| Error::InvalidInput("missing email".to_string()))?
        .parse::<Email>()?;

    let vote_count = votes
        .count_documents(doc! { "email": email.clone() }, None)
        .await?;

    Ok(Json(HasVotedResponse {
        email,
        has_voted: vote_count > 0,
    }))
}

#[cfg(test)]
mod tests {
    use rocket::{
        http::{ContentType, Status},
        local::asynchronous::Client,
        serde::json::serde_json::json,
    };

    use crate::error::ErrorResponse;

    use super::*;

    #[backend_test]
    async fn register_new_participant(client: Client, participants: Coll<Participant>) {
        let response = client
            .post(uri!(register))
            .header(ContentType::JSON)
            .body(json!(RegisterRequest::example()).to_string())
            .dispatch()
            .await;

        assert_eq!(Status::Ok, response.status());
        let body = response.into_json::<ParticipantResponse>().await.unwrap();
        assert_eq!(body.email, Email::example());
        assert_eq!(body.pseudo, "Alice");

        // Check the stored record.
        let stored = participants
            .find_one(doc! { "email": Email::example() }, None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.pseudo, "Alice");
        assert_eq!(stored.created_at, body.created_at);
    }

    #[backend_test]
    async fn register_defaults_pseudo_to_email(client: Client) {
        let response = client
            .post(uri!(register))
            .header(ContentType::JSON)
            .body(json!(RegisterRequest::example2()).to_string())
            .dispatch()
            .await;

        assert_eq!(Status::Ok, response.status());
        let body = response.into_json::<ParticipantResponse>().await.unwrap();
        assert_eq!(body.pseudo, "bob@example.com");

        // An empty pseudo defaults too.
        let response = client
            .post(uri!(register))
            .header(ContentType::JSON)
            .body(json!({ "email": "carol@example.com", "pseudo": "" }).to_string())
            .dispatch()
            .await;

        assert_eq!(Status::Ok, response.status());
        let body = response.into_json::<ParticipantResponse>().await.unwrap();
        assert_eq!(body.pseudo, "carol@example.com");
    }

    #[backend_test]
    async fn register_is_idempotent(client: Client, participants: Coll<Participant>) {
        let first = client
            .post(uri!(register))
            .header(ContentType::JSON)
            .body(json!(RegisterRequest::example()).to_string())
            .dispatch()
            .await;
        assert_eq!(Status::Ok, first.status());
        let first = first.into_json::<ParticipantResponse>().await.unwrap();

        // Re-register with a different pseudo: no new record, no update.
        let second = client
            .post(uri!(register))
            .header(ContentType::JSON)
            .body(json!({ "email": "alice@example.com", "pseudo": "Impostor" }).to_string())
            .dispatch()
            .await;
        assert_eq!(Status::Ok, second.status());
        let second = second.into_json::<ParticipantResponse>().await.unwrap();

        // First write wins, including the original registration time.
        assert_eq!(first, second);

        let count = participants.count_documents(None, None).await.unwrap();
        assert_eq!(count, 1);
    }

    #[backend_test]
    async fn register_rejects_bad_email(client: Client, participants: Coll<Participant>) {
        for body in [
            json!({ "pseudo": "NoEmail" }),
            json!({ "email": "" }),
            json!({ "email": "not-an-email" }),
        ] {
            let response = client
                .post(uri!(register))
                .header(ContentType::JSON)
                .body(body.to_string())
                .dispatch()
                .await;

            assert_eq!(Status::BadRequest, response.status());
            let error = response.into_json::<ErrorResponse>().await.unwrap();
            assert_eq!(error.code, "InvalidInput");
        }

        let count = participants.count_documents(None, None).await.unwrap();
        assert_eq!(count, 0);
    }

    #[backend_test]
    async fn has_voted_tracks_the_vote(client: Client) {
        // Unregistered: has not voted.
        let response = client
            .get(uri!(has_voted(Some("alice@example.com"))))
            .dispatch()
            .await;
        assert_eq!(Status::Ok, response.status());
        let body = response.into_json::<HasVotedResponse>().await.unwrap();
        assert!(!body.has_voted);
        assert_eq!(body.email, Email::example());

        // Registered but not yet voted.
        client
            .post(uri!(register))
            .header(ContentType::JSON)
            .body(json!(RegisterRequest::example()).to_string())
            .dispatch()
            .await;
        let response = client
            .get(uri!(has_voted(Some("alice@example.com"))))
            .dispatch()
            .await;
        let body = response.into_json::<HasVotedResponse>().await.unwrap();
        assert!(!body.has_voted);

        // Voted.
        let response = client
            .post("/vote")
            .header(ContentType::JSON)
            .body(json!({ "email": "alice@example.com", "choice": "Oui" }).to_string())
            .dispatch()
            .await;
        assert_eq!(Status::Ok, response.status());

        let response = client
            .get(uri!(has_voted(Some("alice@example.com"))))
            .dispatch()
            .await;
        let body = response.into_json::<HasVotedResponse>().await.unwrap();
        assert!(body.has_voted);
    }

    #[backend_test]
    async fn has_voted_rejects_bad_email(client: Client) {
        // Missing the query parameter entirely.
        let response = client.get("/hasVoted").dispatch().await;
        assert_eq!(Status::BadRequest, response.status());
        let error = response.into_json::<ErrorResponse>().await.unwrap();
        assert_eq!(error.code, "InvalidInput");

        // Malformed address.
        let response = client
            .get(uri!(has_voted(Some("not-an-email"))))
            .dispatch()
            .await;
        assert_eq!(Status::BadRequest, response.status());
        let error = response.into_json::<ErrorResponse>().await.unwrap();
        assert_eq!(error.code, "InvalidInput");
    }
}
