use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::str::FromStr;

use mongodb::bson::Bson;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A participant's email address: the natural key that identifies them.
///
/// Stored case-sensitive as received; no normalisation is applied.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email {
    inner: String,
}

impl Deref for Email {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl Display for Email {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

#[derive(Debug, Error)]
#[error("{0:?} is not a valid email address")]
pub struct ParseEmailError(pub String);

impl FromStr for Email {
    type Err = ParseEmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if validator::validate_email(s) {
            Ok(Email {
                inner: s.to_string(),
            })
        } else {
            Err(ParseEmailError(s.to_string()))
        }
    }
}

impl TryFrom<String> for Email {
    type Error = ParseEmailError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Email> for String {
    fn from(email: Email) -> Self {
        email.inner
    }
}

impl From<Email> for Bson {
    fn from(email: Email) -> Self {
        Bson::String(email.inner)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_well_formed_addresses() {
        let email = "user.name+tag@sub.example.org".parse::<Email>().unwrap();
        assert_eq!(&*email, "user.name+tag@sub.example.org");
    }

    #[test]
    fn preserves_case() {
        let email = "Alice@Example.COM".parse::<Email>().unwrap();
        assert_eq!(email.to_string(), "Alice@Example.COM");
    }

    #[test]
    fn rejects_malformed_addresses() {
        "".parse::<Email>().unwrap_err();
        "   ".parse::<Email>().unwrap_err();
        "no-at-sign".parse::<Email>().unwrap_err();
        "trailing@".parse::<Email>().unwrap_err();
        "@leading.com".parse::<Email>().unwrap_err();
    }

    #[test]
    fn deserialisation_validates() {
        use rocket::serde::json::serde_json;

        let email: Email = serde_json::from_str("\"alice@example.com\"").unwrap();
        assert_eq!(email, Email::example());
        serde_json::from_str::<Email>("\"nonsense\"").unwrap_err();
    }
}
