use std::collections::HashSet;

use anyhow::Context;

use crate::api::{
    Comment, CommentEdit, CommentId, Error, NewComment, PostId, Store, UserId,
};
use crate::mentions::{extract_mentions, resolve_mentions, MentionResolution};
use crate::{navigate, render, FocusRequest, RenderNode, Thread};

/// Pending reply target, consumed by the next submission
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReplyTarget {
    pub id: CommentId,
    pub author_name: String,
}

/// One open thread view: the flat-snapshot cache and every bit of UI state
/// that used to live in page-level globals (pending reply target, open
/// inline edit, collapse set, highlight). Owned exclusively by the page
/// that subscribed to the post; rebuilt wholesale on every snapshot.
#[derive(Clone, Debug)]
pub struct ThreadView {
    pub owner: UserId,
    pub post_id: PostId,

    /// For the author badge; None while the post record has not loaded yet
    pub post_author: Option<UserId>,

    thread: Thread,
    expanded: HashSet<CommentId>,
    reply_to: Option<ReplyTarget>,
    editing: Option<CommentId>,
    highlight: Option<CommentId>,

    /// Bumped per submission; stamps mention resolutions so late ones are
    /// discarded instead of landing on the wrong submission
    generation: u64,
}

impl ThreadView {
    pub fn new(owner: UserId, post_id: PostId, post_author: Option<UserId>) -> ThreadView {
        ThreadView {
            owner,
            post_id,
            post_author,
            thread: Thread::default(),
            expanded: HashSet::new(),
            reply_to: None,
            editing: None,
            highlight: None,
            generation: 0,
        }
    }

    pub fn thread(&self) -> &Thread {
        &self.thread
    }

    /// Wholesale replacement with a fresh flat snapshot from the
    /// subscription. Safe to call repeatedly; collapse state for comments
    /// that survived is kept, and UI state pointing at comments that did
    /// not is dropped.
    pub fn apply_snapshot(&mut self, flat: Vec<Comment>) {
        self.thread = Thread::build(flat);
        if let Some(target) = &self.reply_to {
            if !self.thread.contains(&target.id) {
                tracing::warn!(reply_to = ?target.id, "reply target deleted, clearing");
                self.reply_to = None;
            }
        }
        if let Some(editing) = self.editing {
            if !self.thread.contains(&editing) {
                tracing::warn!(?editing, "comment under edit deleted, closing editor");
                self.editing = None;
            }
        }
    }

    /// Initial load: fetch the current flat set once and rebuild. Live
    /// updates then come through the subscription and `apply_snapshot`.
    pub async fn refresh<S: Store + Send>(&mut self, store: &mut S) -> anyhow::Result<()> {
        let flat = store
            .fetch_comments(self.post_id)
            .await
            .with_context(|| format!("fetching comments for post {:?}", self.post_id))?;
        self.apply_snapshot(flat);
        Ok(())
    }

    pub fn render(&self) -> Vec<RenderNode> {
        render(&self.thread, &self.expanded, self.post_author)
    }

    /// Flip a subtree's collapse state; returns true when now expanded
    pub fn toggle(&mut self, id: CommentId) -> bool {
        if self.expanded.remove(&id) {
            false
        } else {
            self.expanded.insert(id);
            true
        }
    }

    /// Expand every ancestor of `target` and ask the host to scroll to it.
    /// The returned request carries the fixed highlight duration; the host
    /// owes exactly one `clear_highlight` call that much later.
    pub fn reveal(&mut self, target: CommentId) -> Option<FocusRequest> {
        let focus = navigate::reveal(&self.thread, &mut self.expanded, target)?;
        self.highlight = Some(target);
        Some(focus)
    }

    pub fn highlighted(&self) -> Option<CommentId> {
        self.highlight
    }

    pub fn clear_highlight(&mut self) {
        self.highlight = None;
    }

    pub fn reply_target(&self) -> Option<&ReplyTarget> {
        self.reply_to.as_ref()
    }

    pub fn set_reply_to(&mut self, id: CommentId) -> Result<(), Error> {
        let c = self.thread.get(&id).ok_or(Error::UnknownComment(id))?;
        self.reply_to = Some(ReplyTarget {
            id,
            author_name: c.author_name.clone(),
        });
        Ok(())
    }

    pub fn cancel_reply(&mut self) {
        self.reply_to = None;
    }

    pub fn editing(&self) -> Option<CommentId> {
        self.editing
    }

    /// Open the inline editor on `id`. Only the comment's author may edit,
    /// checked locally before anything reaches the store. At most one edit
    /// is in progress per view; starting a new one closes the previous one.
    pub fn start_edit(&mut self, id: CommentId) -> Result<(), Error> {
        let c = self.thread.get(&id).ok_or(Error::UnknownComment(id))?;
        if c.author_id != self.owner {
            return Err(Error::PermissionDenied);
        }
        self.editing = Some(id);
        Ok(())
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Stamp for the next submission's mention resolution
    pub fn next_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    /// A resolution that completed after a newer submission started is
    /// stale and must not be written anywhere
    pub fn accept_resolution(&self, r: MentionResolution) -> Option<Vec<UserId>> {
        if r.generation == self.generation {
            Some(r.users)
        } else {
            tracing::warn!(
                got = r.generation,
                current = self.generation,
                "discarding stale mention resolution"
            );
            None
        }
    }

    /// Submit the comment box contents, as a reply if a reply target is
    /// pending (consumed on success). Mentions are resolved before the
    /// write; authorization is the store's concern here since anyone may
    /// comment.
    pub async fn submit_comment<S: Store + Send>(
        &mut self,
        store: &mut S,
        author_name: &str,
        text: &str,
    ) -> Result<Comment, Error> {
        let new = NewComment {
            post_id: self.post_id,
            author_id: self.owner,
            author_name: author_name.to_string(),
            text: text.trim().to_string(),
            reply_to: self.reply_to.as_ref().map(|r| r.id),
            reply_to_name: self.reply_to.as_ref().map(|r| r.author_name.clone()),
            mentions: vec![],
        };
        new.validate()?;

        let generation = self.next_generation();
        let users = resolve_mentions(store, &extract_mentions(text)).await;
        let mentions = self
            .accept_resolution(MentionResolution { generation, users })
            .unwrap_or_default();

        match store.create_comment(NewComment { mentions, ..new }).await {
            Ok(c) => {
                self.reply_to = None;
                Ok(c)
            }
            Err(err) => {
                tracing::error!(post = ?self.post_id, %err, "comment submission failed");
                Err(err)
            }
        }
    }

    /// Save the inline editor on `id`. Author-only, checked locally first.
    pub async fn save_edit<S: Store + Send>(
        &mut self,
        store: &mut S,
        id: CommentId,
        text: &str,
    ) -> Result<(), Error> {
        let c = self.thread.get(&id).ok_or(Error::UnknownComment(id))?;
        if c.author_id != self.owner {
            return Err(Error::PermissionDenied);
        }
        let edit = CommentEdit {
            comment_id: id,
            text: text.trim().to_string(),
            mentions: vec![],
        };
        edit.validate()?;

        let generation = self.next_generation();
        let users = resolve_mentions(store, &extract_mentions(text)).await;
        let mentions = self
            .accept_resolution(MentionResolution { generation, users })
            .unwrap_or_default();

        match store.edit_comment(CommentEdit { mentions, ..edit }).await {
            Ok(()) => {
                self.editing = None;
                Ok(())
            }
            Err(err) => {
                tracing::error!(comment = ?id, %err, "comment edit failed");
                Err(err)
            }
        }
    }

    /// Delete `id` and its whole reply closure in one atomic batch.
    /// Author-only, checked locally before any network call.
    pub async fn delete_comment<S: Store + Send>(
        &mut self,
        store: &mut S,
        id: CommentId,
    ) -> Result<(), Error> {
        let c = self.thread.get(&id).ok_or(Error::UnknownComment(id))?;
        if c.author_id != self.owner {
            return Err(Error::PermissionDenied);
        }
        let batch = self.thread.closure_of(id);
        match store.delete_comments(self.post_id, batch).await {
            Ok(()) => Ok(()),
            Err(err) => {
                tracing::error!(comment = ?id, %err, "cascade delete failed");
                Err(err)
            }
        }
    }

    /// Report someone else's comment; reporting your own is rejected
    /// locally, matching the UI never offering it
    pub async fn report_comment<S: Store + Send>(
        &mut self,
        store: &mut S,
        id: CommentId,
    ) -> Result<(), Error> {
        let c = self.thread.get(&id).ok_or(Error::UnknownComment(id))?;
        if c.author_id == self.owner {
            return Err(Error::PermissionDenied);
        }
        match store.report_comment(id).await {
            Ok(()) => Ok(()),
            Err(err) => {
                tracing::error!(comment = ?id, %err, "report failed");
                Err(err)
            }
        }
    }
}
