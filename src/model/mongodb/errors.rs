//! The mongodb crate reports server-side write failures by bare numeric code;
//! this module names the one we rely on.

use mongodb::error::{Error as DbError, ErrorKind, WriteFailure};

/// Server code for a write rejected by a unique index.
const DUPLICATE_KEY: i32 = 11000;

/// Return true if the given result failed with a duplicate key write error.
///
/// This is how the unique `email` indexes report that a record already
/// exists: the losing insert of a concurrent pair surfaces here.
pub fn is_duplicate_key_error<T>(result: Result<T, &DbError>) -> bool {
    match result {
        Err(err) => matches!(
            *err.kind,
            ErrorKind::Write(WriteFailure::WriteError(ref e)) if e.code == DUPLICATE_KEY
        ),
        Ok(_) => false,
    }
}
