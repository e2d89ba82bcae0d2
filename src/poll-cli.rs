//! A small CLI client for taking part in a poll from a terminal.
//! It speaks to the server through the same request and response types the
//! API itself uses, so it can never drift out of step with the endpoints.

use std::collections::HashMap;
use std::thread;
use std::time::Duration;

use clap::{Arg, ArgAction, ArgMatches, Command};
use reqwest::blocking::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

use quickpoll_backend::error::ErrorResponse;
use quickpoll_backend::model::{
    api::{
        participant::{ParticipantResponse, RegisterRequest},
        vote::{CastVoteRequest, HasVotedResponse, VoteResponse, VoteSummary},
    },
    common::Choice,
};

const PROGRAM_NAME: &str = "poll-cli";

const ABOUT_TEXT: &str = "Take part in a poll from the command line.

Registers you with the server, optionally casts your vote, and prints the
votes and totals so far.

EXIT CODES:
     0: Success.
     2: The server rejected the request; the reason is printed.
 Other: Error.";

const SERVER: &str = "SERVER";
const SERVER_HELP: &str = "Base URL of the poll server";

const EMAIL: &str = "EMAIL";
const EMAIL_HELP: &str = "Email address to register and vote under";

const PSEUDO: &str = "PSEUDO";
const PSEUDO_HELP: &str = "Display name shown next to your vote; defaults to your email";

const VOTE: &str = "VOTE";
const VOTE_HELP: &str = "Cast this vote ('Oui' or 'Non') unless you have already voted";

const WATCH: &str = "WATCH";
const WATCH_HELP: &str = "Keep refreshing the results until interrupted";

const INTERVAL: &str = "INTERVAL";
const INTERVAL_HELP: &str = "Seconds between refreshes in watch mode";

/// Construct the CLI configuration.
fn cli() -> Command {
    // Make the build dirty when the toml changes.
    include_str!("../Cargo.toml");

    clap::command!(PROGRAM_NAME)
        .about(ABOUT_TEXT)
        .arg(
            Arg::new(SERVER)
                .long("server")
                .help(SERVER_HELP)
                .action(ArgAction::Set)
                .default_value("http://127.0.0.1:8000"),
        )
        .arg(
            Arg::new(EMAIL)
                .long("email")
                .help(EMAIL_HELP)
                .action(ArgAction::Set)
                .required(true),
        )
        .arg(
            Arg::new(PSEUDO)
                .long("pseudo")
                .help(PSEUDO_HELP)
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new(VOTE)
                .long("vote")
                .help(VOTE_HELP)
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new(WATCH)
                .long("watch")
                .help(WATCH_HELP)
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new(INTERVAL)
                .long("interval")
                .help(INTERVAL_HELP)
                .action(ArgAction::Set)
                .value_parser(clap::value_parser!(u64))
                .default_value("5"),
        )
}

/// Errors that this program may produce.
#[derive(Debug, Eq, PartialEq)]
enum Error {
    /// Could not reach the server or read its response.
    Transport(String),
    /// The server answered with one of its error codes.
    Api { code: String, reason: String },
    /// Bad command line input.
    Usage(String),
}

/// Send a request and decode the response, translating API rejections.
fn send<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, Error> {
    let response = request.send().map_err(|e| Error::Transport(e.to_string()))?;
    let status = response.status();
    if status.is_success() {
        response.json().map_err(|e| Error::Transport(e.to_string()))
    } else {
        let error: ErrorResponse = response.json().map_err(|_| {
            Error::Transport(format!("Server answered {status} with an unreadable body"))
        })?;
        Err(Error::Api {
            code: error.code,
            reason: error.error,
        })
    }
}

/// Print the votes and the totals.
fn render(votes: &[VoteSummary], totals: &HashMap<Choice, u64>) {
    if votes.is_empty() {
        println!("No votes yet.");
    } else {
        for vote in votes {
            println!("{}: {}", vote.pseudo, vote.choice);
        }
    }
    let summary = Choice::ALL
        .iter()
        .map(|choice| format!("{choice} {}", totals.get(choice).copied().unwrap_or(0)))
        .collect::<Vec<_>>()
        .join(", ");
    println!("Totals: {summary}");
}

/// Register, optionally vote, and show the poll.
fn poll(args: &ArgMatches) -> Result<(), Error> {
    let server: &String = args.get_one(SERVER).unwrap(); // Defaulted argument is always present.
    let email: &String = args.get_one(EMAIL).unwrap(); // Required argument is guaranteed to be present.
    let pseudo: Option<&String> = args.get_one(PSEUDO);
    let vote: Option<&String> = args.get_one(VOTE);
    let watch = args.get_flag(WATCH);
    let interval: u64 = *args.get_one(INTERVAL).unwrap(); // Defaulted argument is always present.

    // Reject a bad vote before talking to the server.
    let choice = vote
        .map(|vote| {
            vote.parse::<Choice>()
                .map_err(|e| Error::Usage(e.to_string()))
        })
        .transpose()?;

    let client = Client::new();

    // Registration is idempotent, so it is safe to repeat on every run.
    let registration = RegisterRequest {
        email: Some(email.clone()),
        pseudo: pseudo.cloned(),
    };
    let participant: ParticipantResponse =
        send(client.post(format!("{server}/user")).json(&registration))?;
    println!(
        "Registered as {} <{}>.",
        participant.pseudo, participant.email
    );

    // Cast the vote if asked to and not already done.
    if let Some(choice) = choice {
        let voted: HasVotedResponse = send(
            client
                .get(format!("{server}/hasVoted"))
                .query(&[("email", email)]),
        )?;
        if voted.has_voted {
            println!("You have already voted; your existing vote stands.");
        } else {
            let request = CastVoteRequest {
                email: Some(email.clone()),
                choice: Some(choice.to_string()),
            };
            let vote: VoteResponse = send(client.post(format!("{server}/vote")).json(&request))?;
            println!("Vote cast: {}.", vote.choice);
        }
    }

    // Show the poll, repeatedly in watch mode.
    loop {
        let votes: Vec<VoteSummary> = send(client.get(format!("{server}/votes")))?;
        let totals: HashMap<Choice, u64> = send(client.get(format!("{server}/results")))?;
        render(&votes, &totals);
        if !watch {
            break;
        }
        thread::sleep(Duration::from_secs(interval));
    }

    Ok(())
}

/// Run the poll interaction, report the outcome, and return the exit code.
fn run(args: &ArgMatches) -> u8 {
    match poll(args) {
        Ok(()) => 0,
        Err(Error::Usage(msg)) => {
            println!("Usage error: {msg}");
            1
        }
        Err(Error::Transport(msg)) => {
            println!("Could not talk to the server: {msg}");
            1
        }
        Err(Error::Api { code, reason }) => {
            println!("The server rejected the request ({code}): {reason}");
            2
        }
    }
}

fn main() {
    let args = cli().get_matches();
    let exit_code = run(&args);
    std::process::exit(exit_code.into())
}
