use uuid::Uuid;

use crate::{Time, UserId, STUB_UUID};

#[derive(
    Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize,
)]
pub struct PostId(pub Uuid);

impl PostId {
    pub fn stub() -> PostId {
        PostId(STUB_UUID)
    }
}

/// Comments are owned by their post; the post record itself is otherwise
/// the backend's concern.
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Post {
    pub id: PostId,
    pub author_id: UserId,
    pub date: Time,
    pub title: String,
}

impl Post {
    pub fn validate(&self) -> Result<(), crate::Error> {
        crate::validate_time(&self.date)?;
        crate::validate_string(&self.title)
    }
}
