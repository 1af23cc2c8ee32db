//! Observer port for run progress and store changes.

use crate::domain::models::{MemberList, ProgressUpdate};

/// Subscriber to engine events.
///
/// Callbacks are invoked synchronously on the notifying context, in
/// registration order, over an immutable copy of the subscriber list.
/// Implementations must not block and must not call back into the store.
pub trait RunObserver: Send + Sync {
    /// A state-machine transition happened.
    fn on_state_change(&self, update: &ProgressUpdate);

    /// The list store changed; `lists` is a consistent snapshot.
    fn on_lists_changed(&self, lists: &[MemberList]);
}
