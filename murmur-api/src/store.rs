use async_trait::async_trait;

use crate::{Comment, CommentEdit, CommentId, Error, NewComment, PostId, User, UserId};

/// The hosted document-store/auth backend, seen as an opaque capability.
///
/// Transport-level failures are mapped to `Error::Unknown` by
/// implementations; callers surface them without retrying.
#[async_trait]
pub trait Store {
    fn current_user(&self) -> UserId;

    /// Returns the stored record, with id and timestamp assigned
    async fn create_comment(&mut self, c: NewComment) -> Result<Comment, Error>;

    async fn edit_comment(&mut self, e: CommentEdit) -> Result<(), Error>;

    /// At most one report per (comment, reporting user); duplicates are a no-op
    async fn report_comment(&mut self, c: CommentId) -> Result<(), Error>;

    /// Atomic multi-delete: either every listed comment is deleted, or none
    async fn delete_comments(&mut self, post: PostId, batch: Vec<CommentId>) -> Result<(), Error>;

    /// Batched identity lookup by unique `@tag`, one round trip for the
    /// whole token set; tags matching no identity are absent from the
    /// result, which is not an error
    async fn users_by_tags(&mut self, tags: &[String]) -> Result<Vec<User>, Error>;

    /// Current flat comment set for a post, most-recent-first
    async fn fetch_comments(&mut self, post: PostId) -> Result<Vec<Comment>, Error>;
}
