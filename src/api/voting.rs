use std::collections::HashMap;

use mongodb::{bson::doc, options::FindOptions};
use rocket::{futures::TryStreamExt, serde::json::Json, Route};

use crate::{
    error::{Error, Result},
    model::{
        api::vote::{CastVoteRequest, VoteResponse, VoteSummary},
        common::{Choice, Email},
        db::{
            participant::Participant,
            vote::{NewVote, Vote},
        },
        mongodb::{is_duplicate_key_error, Coll},
    },
};

pub fn routes() -> Vec<Route> {
    routes![cast_vote, list_votes, results]
}

/// Cast a vote for a registered participant. Each email gets exactly one
/// vote; a second cast fails with a conflict and leaves the first intact.
#[post("/vote", data = "<request>", format = "json")]
async fn cast_vote(
    request: Json<CastVoteRequest>,
    participants: Coll<Participant>,
    new_votes: Coll<NewVote>,
) -> Result<Json<VoteResponse>> {
    let request = request.0;
    let email = request
        .email
        .as_deref()
        .ok_or_else(|| Error::InvalidInput("missing email".to_string()))?
        .parse::<Email>()?;
    let choice = request
        .choice
        .as_deref()
        .ok_or_else(|| Error::InvalidChoice("missing choice".to_string()))?
        .parse::<Choice>()?;

    let participant = participants
        .find_one(doc! { "email": email.clone() }, None)
        .await?
        .ok_or_else(|| Error::NotFound(format!("No participant registered for '{email}'")))?;

    let vote = NewVote::new(&participant, choice);

    // Atomic insert-if-absent against the unique index on `email`: of two
    // concurrent casts for the same email, exactly one insert succeeds.
    let inserted = new_votes.insert_one(&vote, None).await;
    if is_duplicate_key_error(inserted.as_ref()) {
        return Err(Error::AlreadyVoted(email.to_string()));
    }
    inserted?;

    info!("New vote: {}", vote.choice);

    Ok(Json(vote.into()))
}

/// List every vote cast so far, oldest first.
#[get("/votes")]
async fn list_votes(votes: Coll<Vote>) -> Result<Json<Vec<VoteSummary>>> {
    // `_id` breaks ties between votes cast in the same millisecond.
    let options = FindOptions::builder()
        .sort(doc! { "cast_at": 1, "_id": 1 })
        .build();
    let all_votes: Vec<Vote> = votes.find(None, options).await?.try_collect().await?;

    Ok(Json(all_votes.into_iter().map(VoteSummary::from).collect()))
}

/// Tally the votes per choice. Every choice appears in the result, zero or
/// not.
#[get("/results")]
async fn results(votes: Coll<Vote>) -> Result<Json<HashMap<Choice, u64>>> {
    let mut counts = HashMap::with_capacity(Choice::ALL.len());
    for choice in Choice::ALL {
        let count = votes
            .count_documents(doc! { "choice": choice }, None)
            .await?;
        counts.insert(choice, count);
    }

    Ok(Json(counts))
}
