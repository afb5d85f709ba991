//! Shared fixtures for the integration tests

use murmur_api::{Post, Store, User, UserId, Uuid};
use murmur_mock_server::MockServer;

pub fn user(n: u128, tag: &str) -> User {
    User {
        id: UserId(Uuid::from_u128(n)),
        name: format!("user{n}"),
        tag: tag.to_string(),
    }
}

/// A server with two users (@alice = 1, @bob = 2), logged in as @alice,
/// holding one post authored by her
pub fn alice_and_bob() -> (MockServer, Post) {
    let mut server = MockServer::new();
    server
        .create_user(user(1, "@alice"))
        .expect("creating alice");
    server.create_user(user(2, "@bob")).expect("creating bob");
    server.login_as(UserId(Uuid::from_u128(1)));
    let post = server
        .create_post(server.current_user(), "a post")
        .expect("creating post");
    (server, post)
}

pub fn uid(n: u128) -> UserId {
    UserId(Uuid::from_u128(n))
}
