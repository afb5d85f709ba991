use crate::api::{Store, UserId};

/// Ordered, first-seen-distinct `@token` substrings of `text`.
///
/// A token is `@` followed by one or more word characters; matching is
/// case-sensitive and deduplication is exact string equality. Pure, never
/// fails.
pub fn extract_mentions(text: &str) -> Vec<String> {
    let mut res: Vec<String> = Vec::new();
    let mut rest = text;
    while let Some(at) = rest.find('@') {
        rest = &rest[at + 1..];
        let word_len = rest
            .char_indices()
            .find(|(_, c)| !(c.is_alphanumeric() || *c == '_'))
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        if word_len > 0 {
            let token = format!("@{}", &rest[..word_len]);
            if !res.contains(&token) {
                res.push(token);
            }
            rest = &rest[word_len..];
        }
    }
    res
}

/// Resolves the token set against the identity-by-tag index in one
/// combined round trip. Unresolved tokens are simply absent from the
/// result; a failed lookup degrades to no mentions at all rather than
/// blocking the submission.
pub async fn resolve_mentions<S: Store + Send>(store: &mut S, tokens: &[String]) -> Vec<UserId> {
    if tokens.is_empty() {
        return Vec::new();
    }
    match store.users_by_tags(tokens).await {
        Ok(users) => users.into_iter().map(|u| u.id).collect(),
        Err(err) => {
            tracing::warn!(?err, "mention lookup failed, submitting without mentions");
            Vec::new()
        }
    }
}

/// Resolved mentions stamped with the submission generation they were
/// requested under, so the view session can discard resolutions that
/// complete after the user has moved on.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MentionResolution {
    pub generation: u64,
    pub users: Vec<UserId>,
}
