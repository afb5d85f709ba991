use uuid::Uuid;

use crate::STUB_UUID;

#[derive(
    Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize,
)]
pub struct UserId(pub Uuid);

impl UserId {
    pub fn stub() -> UserId {
        UserId(STUB_UUID)
    }
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct User {
    pub id: UserId,
    pub name: String,

    /// Unique `@handle`, the key for mention resolution
    pub tag: String,
}

impl User {
    pub fn validate(&self) -> Result<(), crate::Error> {
        crate::validate_string(&self.name)?;
        crate::validate_tag(&self.tag)
    }
}
