//! Leaf building blocks for the suggestion controller: the suggestion record,
//! request identity, input/scroll coalescing and user-facing settings.

pub mod announce;
pub mod request_guard;
pub mod scheduler;
pub mod settings;
pub mod suggestion;

pub use announce::{results_message, selection_message, Politeness};
pub use request_guard::{RequestGuard, RequestId};
pub use scheduler::{Debouncer, Throttle};
pub use suggestion::{FetchError, Suggestion};
