//! Types shared between the API and database representations.

mod choice;
mod email;

pub use choice::{Choice, ParseChoiceError};
pub use email::{Email, ParseEmailError};
