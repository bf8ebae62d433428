//! Consumer-side subscriptions
//!
//! Each consumer connection owns one [`SubscriptionStream`], which turns
//! reads against the broadcast log into [`StreamEvent`]s: a `Reset` first,
//! then batches of records, and another `Reset` whenever the log is cleared.

pub mod event;
pub mod stream;

pub use event::{StreamEvent, RESET_PAYLOAD};
pub use stream::{SubscriptionState, SubscriptionStream};
