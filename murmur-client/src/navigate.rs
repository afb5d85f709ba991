use std::collections::HashSet;
use std::time::Duration;

use crate::api::CommentId;
use crate::Thread;

/// Highlight lifetime after a scroll-to-comment. The clear fires after
/// this fixed delay regardless of further user interaction.
pub const HIGHLIGHT_DURATION: Duration = Duration::from_millis(2000);

/// Ask the host UI to scroll `target` into view and flash it. Exactly one
/// highlight-clear is to be scheduled, `highlight_for` after the scroll.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FocusRequest {
    pub target: CommentId,
    pub highlight_for: Duration,
}

/// Force every collapsible ancestor container of `target` to the expanded
/// state, outward from the nearest enclosing one, then request focus.
///
/// Returns None when the target is not in the current snapshot (eg. it was
/// deleted between render and click); that is not an error.
pub fn reveal(
    thread: &Thread,
    expanded: &mut HashSet<CommentId>,
    target: CommentId,
) -> Option<FocusRequest> {
    if !thread.contains(&target) {
        tracing::warn!(?target, "scroll target is gone from the snapshot");
        return None;
    }
    for ancestor in thread.ancestors_of(&target) {
        expanded.insert(ancestor);
    }
    Some(FocusRequest {
        target,
        highlight_for: HIGHLIGHT_DURATION,
    })
}
