//! Poll loop that watches a group and answers trigger messages.

mod handler;
mod poll;
mod trigger;

pub use handler::{PollOutcome, SkipReason};
pub use poll::{Bot, run_poll_loop};
pub use trigger::{is_own_message, strip_trigger};
