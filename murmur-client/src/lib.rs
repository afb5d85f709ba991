mod mentions;
pub use mentions::{extract_mentions, resolve_mentions, MentionResolution};

mod navigate;
pub use navigate::{reveal, FocusRequest, HIGHLIGHT_DURATION};

mod render;
pub use render::{render, RenderNode, MAX_VISUAL_DEPTH, REPORTED_THRESHOLD};

mod thread;
pub use thread::Thread;

mod time_ago;
pub use time_ago::time_ago;

mod view;
pub use view::{ReplyTarget, ThreadView};

pub mod api {
    pub use murmur_api::*;
}
