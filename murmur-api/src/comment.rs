use uuid::Uuid;

use crate::{PostId, Time, UserId, STUB_UUID};

#[derive(
    Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize,
)]
pub struct CommentId(pub Uuid);

impl CommentId {
    pub fn stub() -> CommentId {
        CommentId(STUB_UUID)
    }
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Comment {
    /// Assigned by the storage layer on creation
    pub id: CommentId,

    pub post_id: PostId,

    /// Authorship is immutable after creation
    pub author_id: UserId,

    /// Display name cached at submission time, so rendering does not need a
    /// user lookup per comment
    pub author_name: String,

    pub date: Time,

    pub text: String,

    /// None for a root comment. If set, references another comment of the
    /// same post; the referenced comment always predates this one, so reply
    /// chains cannot cycle.
    pub reply_to: Option<CommentId>,

    /// Display name of the parent's author, cached at submission time
    pub reply_to_name: Option<String>,

    /// Identities resolved from `@tag` tokens in `text`
    pub mentions: Vec<UserId>,

    /// Monotonically non-decreasing for the lifetime of the comment
    pub report_count: u32,

    pub edited_at: Option<Time>,

    /// Monotonically non-decreasing, bumped on each edit
    pub edit_count: u32,
}

impl Comment {
    pub fn is_root(&self) -> bool {
        self.reply_to.is_none()
    }

    pub fn was_edited(&self) -> bool {
        self.edited_at.is_some()
    }
}

/// Submission payload; the store assigns id and timestamp
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct NewComment {
    pub post_id: PostId,
    pub author_id: UserId,
    pub author_name: String,
    pub text: String,
    pub reply_to: Option<CommentId>,
    pub reply_to_name: Option<String>,
    pub mentions: Vec<UserId>,
}

impl NewComment {
    // See comments on other `validate` functions throughout murmur-api
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.text.trim().is_empty() {
            return Err(crate::Error::EmptyText);
        }
        crate::validate_string(&self.text)?;
        crate::validate_string(&self.author_name)?;
        if let Some(name) = &self.reply_to_name {
            crate::validate_string(name)?;
        }
        Ok(())
    }
}

/// In-place mutation of text and mentions; counters only ever go up
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct CommentEdit {
    pub comment_id: CommentId,
    pub text: String,
    pub mentions: Vec<UserId>,
}

impl CommentEdit {
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.text.trim().is_empty() {
            return Err(crate::Error::EmptyText);
        }
        crate::validate_string(&self.text)
    }
}
