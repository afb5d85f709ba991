use std::str::FromStr;

use anyhow::{anyhow, Context};
use serde_json::json;
use uuid::Uuid;

use crate::{CommentId, Time};

#[derive(Debug, Eq, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("Unknown error: {0}")]
    Unknown(String),

    #[error("Permission denied")]
    PermissionDenied,

    #[error("Uuid already used {0}")]
    UuidAlreadyUsed(Uuid),

    #[error("Tag already used {0}")]
    TagAlreadyUsed(String),

    #[error("Unknown comment {0:?}")]
    UnknownComment(CommentId),

    #[error("Null byte in string is not allowed {0:?}")]
    NullByteInString(String),

    #[error("Invalid user tag {0:?}")]
    InvalidTag(String),

    #[error("Comment text must not be empty")]
    EmptyText,

    #[error("Date out of the backend's supported range {0}")]
    DateOutOfRange(Time),
}

impl Error {
    pub fn status_code(&self) -> http::StatusCode {
        use http::StatusCode;
        match self {
            Error::Unknown(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::PermissionDenied => StatusCode::FORBIDDEN,
            Error::UuidAlreadyUsed(_) => StatusCode::CONFLICT,
            Error::TagAlreadyUsed(_) => StatusCode::CONFLICT,
            Error::UnknownComment(_) => StatusCode::NOT_FOUND,
            Error::NullByteInString(_) => StatusCode::BAD_REQUEST,
            Error::InvalidTag(_) => StatusCode::BAD_REQUEST,
            Error::EmptyText => StatusCode::BAD_REQUEST,
            Error::DateOutOfRange(_) => StatusCode::BAD_REQUEST,
        }
    }

    pub fn contents(&self) -> Vec<u8> {
        serde_json::to_vec(&match self {
            Error::Unknown(msg) => json!({
                "message": msg,
                "type": "unknown",
            }),
            Error::PermissionDenied => json!({
                "message": "permission denied",
                "type": "permission-denied",
            }),
            Error::UuidAlreadyUsed(u) => json!({
                "message": "uuid conflict",
                "type": "conflict-uuid",
                "uuid": u,
            }),
            Error::TagAlreadyUsed(t) => json!({
                "message": "tag already used",
                "type": "conflict-tag",
                "tag": t,
            }),
            Error::UnknownComment(c) => json!({
                "message": "comment does not exist",
                "type": "unknown-comment",
                "comment": c.0,
            }),
            Error::NullByteInString(s) => json!({
                "message": "there was a null byte in argument string",
                "type": "null-byte",
                "string": s,
            }),
            Error::InvalidTag(t) => json!({
                "message": "there was an invalid character in a user tag",
                "type": "invalid-tag",
                "tag": t,
            }),
            Error::EmptyText => json!({
                "message": "comment text must not be empty",
                "type": "empty-text",
            }),
            Error::DateOutOfRange(d) => json!({
                "message": "date is out of the backend's supported range",
                "type": "date-out-of-range",
                "date": d,
            }),
        })
        .expect("serializing error contents")
    }

    pub fn parse(body: &[u8]) -> anyhow::Result<Error> {
        let data: serde_json::Value =
            serde_json::from_slice(body).context("parsing error contents")?;
        Ok(
            match data
                .get("type")
                .and_then(|t| t.as_str())
                .ok_or_else(|| anyhow!("error type is not a string"))?
            {
                "unknown" => Error::Unknown(String::from(
                    data.get("message")
                        .and_then(|msg| msg.as_str())
                        .unwrap_or(""),
                )),
                "permission-denied" => Error::PermissionDenied,
                "conflict-uuid" => Error::UuidAlreadyUsed(
                    data.get("uuid")
                        .and_then(|uuid| uuid.as_str())
                        .and_then(|uuid| Uuid::from_str(uuid).ok())
                        .ok_or_else(|| anyhow!("error is a uuid conflict without a proper uuid"))?,
                ),
                "conflict-tag" => Error::TagAlreadyUsed(String::from(
                    data.get("tag")
                        .and_then(|t| t.as_str())
                        .ok_or_else(|| anyhow!("error is a tag conflict without a tag"))?,
                )),
                "unknown-comment" => Error::UnknownComment(CommentId(
                    data.get("comment")
                        .and_then(|c| c.as_str())
                        .and_then(|c| Uuid::from_str(c).ok())
                        .ok_or_else(|| {
                            anyhow!("error is about an unknown comment without a proper id")
                        })?,
                )),
                "null-byte" => Error::NullByteInString(String::from(
                    data.get("string").and_then(|s| s.as_str()).ok_or_else(|| {
                        anyhow!("error is a null-byte-in-string without a string")
                    })?,
                )),
                "invalid-tag" => Error::InvalidTag(String::from(
                    data.get("tag").and_then(|t| t.as_str()).ok_or_else(|| {
                        anyhow!("error is about an invalid tag but no tag was provided")
                    })?,
                )),
                "empty-text" => Error::EmptyText,
                "date-out-of-range" => Error::DateOutOfRange(
                    data.get("date")
                        .cloned()
                        .and_then(|d| serde_json::from_value(d).ok())
                        .ok_or_else(|| {
                            anyhow!("error is about an out-of-range date without a proper date")
                        })?,
                ),
                _ => return Err(anyhow!("error contents has unknown type")),
            },
        )
    }
}
