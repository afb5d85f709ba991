use std::collections::{btree_map, BTreeMap, HashMap, HashSet};

use async_trait::async_trait;
use chrono::Utc;
use murmur_api::{
    Comment, CommentEdit, CommentId, Error, NewComment, Post, PostId, Store, User, UserId, Uuid,
};
use tokio::sync::mpsc;

/// In-memory stand-in for the hosted document store, for tests. Mutations
/// relay a full most-recent-first snapshot of the post's comments to every
/// subscriber, the way the real backend's live queries do — never an
/// incremental patch.
pub struct MockServer {
    current: Option<UserId>,
    users: BTreeMap<UserId, User>,
    posts: BTreeMap<PostId, PostRecord>,
}

struct PostRecord {
    post: Post,
    /// Most-recent-first, like the backend's ordered live query
    comments: Vec<Comment>,
    /// Who already reported what; a second report from the same user is a
    /// no-op so the counter stays accurate
    reports: HashMap<CommentId, HashSet<UserId>>,
    feeds: Vec<mpsc::UnboundedSender<Vec<Comment>>>,
}

impl PostRecord {
    fn relay_snapshot(&mut self) {
        let snapshot = self.comments.clone();
        self.feeds.retain(|f| f.send(snapshot.clone()).is_ok());
    }

    fn find(&self, id: CommentId) -> Option<&Comment> {
        self.comments.iter().find(|c| c.id == id)
    }
}

impl MockServer {
    pub fn new() -> MockServer {
        MockServer {
            current: None,
            users: BTreeMap::new(),
            posts: BTreeMap::new(),
        }
    }

    pub fn create_user(&mut self, u: User) -> Result<(), Error> {
        u.validate()?;
        if self.users.values().any(|v| v.tag == u.tag) {
            return Err(Error::TagAlreadyUsed(u.tag));
        }
        match self.users.entry(u.id) {
            btree_map::Entry::Occupied(_) => Err(Error::UuidAlreadyUsed(u.id.0)),
            btree_map::Entry::Vacant(entry) => {
                entry.insert(u);
                Ok(())
            }
        }
    }

    /// Tests act as one user at a time; no real session handling here
    pub fn login_as(&mut self, u: UserId) {
        self.current = Some(u);
    }

    pub fn create_post(&mut self, author_id: UserId, title: &str) -> Result<Post, Error> {
        let post = Post {
            id: PostId(Uuid::new_v4()),
            author_id,
            date: Utc::now(),
            title: title.to_string(),
        };
        post.validate()?;
        self.posts.insert(
            post.id,
            PostRecord {
                post: post.clone(),
                comments: Vec::new(),
                reports: HashMap::new(),
                feeds: Vec::new(),
            },
        );
        Ok(post)
    }

    pub fn post(&self, id: PostId) -> Option<&Post> {
        self.posts.get(&id).map(|r| &r.post)
    }

    /// Live ordered comment set for one post. The current snapshot is
    /// delivered immediately, then a fresh one after every mutation.
    pub fn subscribe_comments(
        &mut self,
        post: PostId,
    ) -> Result<mpsc::UnboundedReceiver<Vec<Comment>>, Error> {
        let rec = self
            .posts
            .get_mut(&post)
            .ok_or_else(|| Error::Unknown(format!("no post {post:?} in mock store")))?;
        let (sender, receiver) = mpsc::unbounded_channel();
        let _ = sender.send(rec.comments.clone());
        rec.feeds.push(sender);
        Ok(receiver)
    }

    fn record_for_comment(&mut self, id: CommentId) -> Result<&mut PostRecord, Error> {
        for rec in self.posts.values_mut() {
            if rec.comments.iter().any(|c| c.id == id) {
                return Ok(rec);
            }
        }
        Err(Error::UnknownComment(id))
    }
}

impl Default for MockServer {
    fn default() -> MockServer {
        MockServer::new()
    }
}

#[async_trait]
impl Store for MockServer {
    fn current_user(&self) -> UserId {
        self.current.unwrap_or_else(UserId::stub)
    }

    async fn create_comment(&mut self, c: NewComment) -> Result<Comment, Error> {
        c.validate()?;
        if Some(c.author_id) != self.current {
            return Err(Error::PermissionDenied);
        }
        let rec = self
            .posts
            .get_mut(&c.post_id)
            .ok_or_else(|| Error::Unknown(format!("no post {:?} in mock store", c.post_id)))?;
        // A reply_to pointing at an already-deleted comment is accepted;
        // clients render such replies unparented
        let stored = Comment {
            id: CommentId(Uuid::new_v4()),
            post_id: c.post_id,
            author_id: c.author_id,
            author_name: c.author_name,
            date: Utc::now(),
            text: c.text,
            reply_to: c.reply_to,
            reply_to_name: c.reply_to_name,
            mentions: c.mentions,
            report_count: 0,
            edited_at: None,
            edit_count: 0,
        };
        rec.comments.insert(0, stored.clone());
        rec.relay_snapshot();
        Ok(stored)
    }

    async fn edit_comment(&mut self, e: CommentEdit) -> Result<(), Error> {
        e.validate()?;
        let me = self.current;
        let rec = self.record_for_comment(e.comment_id)?;
        let c = rec
            .comments
            .iter_mut()
            .find(|c| c.id == e.comment_id)
            .expect("record_for_comment returned a record without the comment");
        if Some(c.author_id) != me {
            return Err(Error::PermissionDenied);
        }
        c.text = e.text;
        c.mentions = e.mentions;
        c.edited_at = Some(Utc::now());
        c.edit_count += 1;
        rec.relay_snapshot();
        Ok(())
    }

    async fn report_comment(&mut self, id: CommentId) -> Result<(), Error> {
        let me = self
            .current
            .ok_or(Error::PermissionDenied)?;
        let rec = self.record_for_comment(id)?;
        if rec.reports.entry(id).or_default().insert(me) {
            let c = rec
                .comments
                .iter_mut()
                .find(|c| c.id == id)
                .expect("record_for_comment returned a record without the comment");
            c.report_count += 1;
            rec.relay_snapshot();
        }
        Ok(())
    }

    async fn delete_comments(&mut self, post: PostId, batch: Vec<CommentId>) -> Result<(), Error> {
        let rec = self
            .posts
            .get_mut(&post)
            .ok_or_else(|| Error::Unknown(format!("no post {post:?} in mock store")))?;
        // Validate the whole batch before touching anything: either every
        // listed comment is deleted, or none are
        for id in &batch {
            if rec.find(*id).is_none() {
                return Err(Error::UnknownComment(*id));
            }
        }
        let batch = batch.into_iter().collect::<HashSet<_>>();
        rec.comments.retain(|c| !batch.contains(&c.id));
        for id in &batch {
            rec.reports.remove(id);
        }
        rec.relay_snapshot();
        Ok(())
    }

    async fn users_by_tags(&mut self, tags: &[String]) -> Result<Vec<User>, Error> {
        Ok(tags
            .iter()
            .filter_map(|tag| self.users.values().find(|u| u.tag == *tag).cloned())
            .collect())
    }

    async fn fetch_comments(&mut self, post: PostId) -> Result<Vec<Comment>, Error> {
        Ok(self
            .posts
            .get(&post)
            .ok_or_else(|| Error::Unknown(format!("no post {post:?} in mock store")))?
            .comments
            .clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(n: u128, tag: &str) -> User {
        User {
            id: UserId(Uuid::from_u128(n)),
            name: format!("user{n}"),
            tag: tag.to_string(),
        }
    }

    fn server_with_post() -> (MockServer, Post) {
        let mut server = MockServer::new();
        server.create_user(user(1, "@alice")).unwrap();
        server.create_user(user(2, "@bob")).unwrap();
        server.login_as(UserId(Uuid::from_u128(1)));
        let post = server.create_post(UserId(Uuid::from_u128(1)), "hello").unwrap();
        (server, post)
    }

    async fn add_comment(server: &mut MockServer, post: PostId, text: &str) -> Comment {
        server
            .create_comment(NewComment {
                post_id: post,
                author_id: server.current_user(),
                author_name: "someone".to_string(),
                text: text.to_string(),
                reply_to: None,
                reply_to_name: None,
                mentions: vec![],
            })
            .await
            .unwrap()
    }

    #[test]
    fn duplicate_tags_are_rejected() {
        let mut server = MockServer::new();
        server.create_user(user(1, "@alice")).unwrap();
        assert_eq!(
            server.create_user(user(2, "@alice")),
            Err(Error::TagAlreadyUsed("@alice".to_string()))
        );
    }

    #[tokio::test]
    async fn snapshots_are_most_recent_first() {
        let (mut server, post) = server_with_post();
        let mut feed = server.subscribe_comments(post.id).unwrap();
        assert_eq!(feed.recv().await.unwrap(), vec![]);

        let first = add_comment(&mut server, post.id, "first").await;
        let second = add_comment(&mut server, post.id, "second").await;

        let _after_first = feed.recv().await.unwrap();
        let after_second = feed.recv().await.unwrap();
        assert_eq!(
            after_second.iter().map(|c| c.id).collect::<Vec<_>>(),
            vec![second.id, first.id]
        );
    }

    #[tokio::test]
    async fn batch_delete_is_all_or_nothing() {
        let (mut server, post) = server_with_post();
        let a = add_comment(&mut server, post.id, "a").await;
        let b = add_comment(&mut server, post.id, "b").await;

        let ghost = CommentId(Uuid::from_u128(999));
        assert_eq!(
            server
                .delete_comments(post.id, vec![a.id, ghost])
                .await,
            Err(Error::UnknownComment(ghost))
        );
        // nothing was applied
        assert_eq!(server.fetch_comments(post.id).await.unwrap().len(), 2);

        server.delete_comments(post.id, vec![a.id, b.id]).await.unwrap();
        assert!(server.fetch_comments(post.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn repeated_reports_from_one_user_count_once() {
        let (mut server, post) = server_with_post();
        let c = add_comment(&mut server, post.id, "spam").await;

        server.login_as(UserId(Uuid::from_u128(2)));
        server.report_comment(c.id).await.unwrap();
        server.report_comment(c.id).await.unwrap();
        let comments = server.fetch_comments(post.id).await.unwrap();
        assert_eq!(comments[0].report_count, 1);
    }

    #[tokio::test]
    async fn edits_bump_counters_and_require_authorship() {
        let (mut server, post) = server_with_post();
        let c = add_comment(&mut server, post.id, "tpyo").await;

        let edit = CommentEdit {
            comment_id: c.id,
            text: "typo".to_string(),
            mentions: vec![],
        };
        server.login_as(UserId(Uuid::from_u128(2)));
        assert_eq!(
            server.edit_comment(edit.clone()).await,
            Err(Error::PermissionDenied)
        );

        server.login_as(UserId(Uuid::from_u128(1)));
        server.edit_comment(edit).await.unwrap();
        let comments = server.fetch_comments(post.id).await.unwrap();
        assert_eq!(comments[0].text, "typo");
        assert_eq!(comments[0].edit_count, 1);
        assert!(comments[0].edited_at.is_some());
    }
}
