//! End-to-end flows over a thread view backed by the mock store

use murmur_api::{Error, Store};
use murmur_client::{ThreadView, REPORTED_THRESHOLD};
use tests::{alice_and_bob, uid};

#[tokio::test]
async fn comment_reply_and_cascade_delete() {
    let (mut server, post) = alice_and_bob();
    let mut alice = ThreadView::new(uid(1), post.id, Some(post.author_id));

    let root = alice
        .submit_comment(&mut server, "Alice", "first!")
        .await
        .expect("posting root comment");

    // bob replies to alice, through his own view
    server.login_as(uid(2));
    let mut bob = ThreadView::new(uid(2), post.id, Some(post.author_id));
    bob.refresh(&mut server).await.unwrap();
    bob.set_reply_to(root.id).unwrap();
    let reply = bob
        .submit_comment(&mut server, "Bob", "second!")
        .await
        .expect("posting reply");
    assert_eq!(reply.reply_to, Some(root.id));
    assert_eq!(reply.reply_to_name.as_deref(), Some("Alice"));

    // alice re-renders from the fresh snapshot and sees the nested reply
    alice.apply_snapshot(server.fetch_comments(post.id).await.unwrap());
    assert_eq!(alice.thread().len(), 2);
    assert_eq!(alice.thread().child_count(&root.id), 1);

    let nodes = alice.render();
    assert_eq!(nodes.len(), 1); // reply starts collapsed
    assert!(nodes[0].is_post_author);
    alice.toggle(root.id);
    let nodes = alice.render();
    assert_eq!(nodes.len(), 2);
    assert_eq!(nodes[1].depth, 1);

    // deleting the root takes bob's reply with it, in one atomic batch
    server.login_as(uid(1));
    alice
        .delete_comment(&mut server, root.id)
        .await
        .expect("cascade delete");
    assert!(server.fetch_comments(post.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn live_snapshots_replace_the_previous_render() {
    let (mut server, post) = alice_and_bob();
    let mut feed = server.subscribe_comments(post.id).unwrap();
    assert!(feed.recv().await.unwrap().is_empty());

    let mut view = ThreadView::new(uid(1), post.id, Some(post.author_id));
    view.submit_comment(&mut server, "Alice", "one")
        .await
        .unwrap();
    view.submit_comment(&mut server, "Alice", "two")
        .await
        .unwrap();

    let _after_one = feed.recv().await.unwrap();
    let after_two = feed.recv().await.unwrap();
    // most-recent-first, and a full list every time
    assert_eq!(after_two.len(), 2);
    assert_eq!(after_two[0].text, "two");

    view.apply_snapshot(after_two);
    assert_eq!(view.render().len(), 2);
}

#[tokio::test]
async fn mentions_resolve_against_the_identity_index() {
    let (mut server, post) = alice_and_bob();
    let mut view = ThreadView::new(uid(1), post.id, Some(post.author_id));
    let c = view
        .submit_comment(&mut server, "Alice", "hi @bob, also hi @nobody")
        .await
        .unwrap();
    // @nobody resolves to no identity and is dropped without error
    assert_eq!(c.mentions, vec![uid(2)]);
}

#[tokio::test]
async fn reply_racing_a_delete_renders_unparented() {
    let (mut server, post) = alice_and_bob();
    let mut alice = ThreadView::new(uid(1), post.id, Some(post.author_id));
    let root = alice
        .submit_comment(&mut server, "Alice", "soon gone")
        .await
        .unwrap();
    alice.refresh(&mut server).await.unwrap();

    // alice's view never saw bob's reply, so her delete closure is just
    // the root; the reply lands right after and survives as an orphan
    server.login_as(uid(2));
    let mut bob = ThreadView::new(uid(2), post.id, Some(post.author_id));
    bob.refresh(&mut server).await.unwrap();
    bob.set_reply_to(root.id).unwrap();

    server.login_as(uid(1));
    alice.delete_comment(&mut server, root.id).await.unwrap();

    server.login_as(uid(2));
    let orphan = bob
        .submit_comment(&mut server, "Bob", "too late")
        .await
        .unwrap();

    alice.apply_snapshot(server.fetch_comments(post.id).await.unwrap());
    let nodes = alice.render();
    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0].comment.id, orphan.id);
    assert_eq!(nodes[0].depth, 0);
}

#[tokio::test]
async fn foreign_comments_cannot_be_deleted_or_edited() {
    let (mut server, post) = alice_and_bob();
    let mut alice = ThreadView::new(uid(1), post.id, Some(post.author_id));
    let c = alice
        .submit_comment(&mut server, "Alice", "mine")
        .await
        .unwrap();

    server.login_as(uid(2));
    let mut bob = ThreadView::new(uid(2), post.id, Some(post.author_id));
    bob.refresh(&mut server).await.unwrap();

    assert_eq!(
        bob.delete_comment(&mut server, c.id).await,
        Err(Error::PermissionDenied)
    );
    assert_eq!(bob.start_edit(c.id), Err(Error::PermissionDenied));
    // the rejected operations never reached the store
    assert_eq!(server.fetch_comments(post.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn enough_reports_flag_the_comment() {
    let (mut server, post) = alice_and_bob();
    let mut alice = ThreadView::new(uid(1), post.id, Some(post.author_id));
    let c = alice
        .submit_comment(&mut server, "Alice", "contested")
        .await
        .unwrap();

    for n in 0..REPORTED_THRESHOLD as u128 {
        let reporter = tests::user(10 + n, &format!("@rep{n}"));
        server.create_user(reporter.clone()).unwrap();
        server.login_as(reporter.id);
        let mut view = ThreadView::new(reporter.id, post.id, Some(post.author_id));
        view.apply_snapshot(server.fetch_comments(post.id).await.unwrap());
        view.report_comment(&mut server, c.id).await.unwrap();
    }

    alice.apply_snapshot(server.fetch_comments(post.id).await.unwrap());
    let nodes = alice.render();
    assert!(nodes[0].reported);
    assert_eq!(nodes[0].comment.report_count, REPORTED_THRESHOLD);
}
