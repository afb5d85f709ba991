use chrono::{Datelike, Utc};

pub use uuid::{uuid, Uuid};

mod comment;
pub use comment::{Comment, CommentEdit, CommentId, NewComment};

mod error;
pub use error::Error;

mod post;
pub use post::{Post, PostId};

mod store;
pub use store::Store;

mod user;
pub use user::{User, UserId};

pub type Time = chrono::DateTime<Utc>;

pub const STUB_UUID: Uuid = uuid!("ffffffff-ffff-ffff-ffff-ffffffffffff");

/// Strings are stored as-is by the backend, except that it chokes on NUL bytes
pub fn validate_string(s: &str) -> Result<(), Error> {
    match s.contains('\0') {
        true => Err(Error::NullByteInString(s.to_string())),
        false => Ok(()),
    }
}

pub fn validate_time(t: &Time) -> Result<(), Error> {
    match t.year() {
        0..=9999 => Ok(()),
        _ => Err(Error::DateOutOfRange(*t)),
    }
}

/// A user tag is `@` followed by word characters only, eg. `@alice_01`
pub fn validate_tag(tag: &str) -> Result<(), Error> {
    let mut chars = tag.chars();
    if chars.next() != Some('@') {
        return Err(Error::InvalidTag(tag.to_string()));
    }
    let mut empty = true;
    for c in chars {
        if !(c.is_alphanumeric() || c == '_') {
            return Err(Error::InvalidTag(tag.to_string()));
        }
        empty = false;
    }
    match empty {
        true => Err(Error::InvalidTag(tag.to_string())),
        false => Ok(()),
    }
}
