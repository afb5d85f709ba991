use std::collections::HashSet;

use crate::api::{Comment, CommentId, UserId};
use crate::Thread;

/// Nesting indent stops deepening past this tier; logical depth keeps
/// counting
pub const MAX_VISUAL_DEPTH: usize = 5;

/// Comments with at least this many reports get flagged in the UI
pub const REPORTED_THRESHOLD: u32 = 3;

/// One render instruction per visible comment, in pre-order. The host page
/// materializes these however it wants; nothing here touches a DOM.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RenderNode {
    pub comment: Comment,

    /// Logical nesting depth, uncapped
    pub depth: usize,

    /// Indent/border tier, capped at `MAX_VISUAL_DEPTH`
    pub visual_depth: usize,

    /// Direct replies only
    pub child_count: usize,

    /// Whether this node's reply container is currently hidden. Only
    /// meaningful when `child_count > 0`; subtrees are collapsed by default.
    pub collapsed: bool,

    pub is_post_author: bool,
    pub edited: bool,
    pub reported: bool,
}

impl RenderNode {
    pub fn has_children(&self) -> bool {
        self.child_count > 0
    }

    /// Label for the collapse toggle, reflecting current state and count
    pub fn toggle_label(&self) -> Option<String> {
        if self.child_count == 0 {
            return None;
        }
        Some(match (self.collapsed, self.child_count) {
            (true, 1) => "Show 1 reply".to_string(),
            (true, n) => format!("Show {n} replies"),
            (false, _) => "Hide replies".to_string(),
        })
    }
}

/// Walks the thread pre-order and emits one instruction per visible
/// comment. A node's subtree is emitted only when its id is in `expanded`;
/// stale `expanded` entries referring to comments no longer in the
/// snapshot are simply ignored.
pub fn render(
    thread: &Thread,
    expanded: &HashSet<CommentId>,
    post_author: Option<UserId>,
) -> Vec<RenderNode> {
    let mut res = Vec::new();
    let mut stack = thread
        .roots()
        .map(|c| (c.id, 0))
        .collect::<Vec<_>>();
    stack.reverse();
    while let Some((id, depth)) = stack.pop() {
        let c = match thread.get(&id) {
            Some(c) => c,
            None => continue,
        };
        let child_count = thread.child_count(&id);
        let is_expanded = child_count > 0 && expanded.contains(&id);
        res.push(RenderNode {
            comment: c.clone(),
            depth,
            visual_depth: depth.min(MAX_VISUAL_DEPTH),
            child_count,
            collapsed: !is_expanded,
            is_post_author: post_author == Some(c.author_id),
            edited: c.was_edited(),
            reported: c.report_count >= REPORTED_THRESHOLD,
        });
        if is_expanded {
            let mut kids = thread.children_of(&id).map(|k| (k.id, depth + 1)).collect::<Vec<_>>();
            kids.reverse();
            stack.extend(kids);
        }
    }
    res
}
