//! Choreo List
//!
//! Ordered, observable container used for every aggregate in the Choreo data
//! model (groups, timelines, transitions, params). A `List<T>` is bound to a
//! [`Model`] type, enforces an optional uniqueness policy after each mutation,
//! keeps itself sorted, can maintain prev/next links between elements, and
//! emits [`ListEvent`]s to subscribers.

pub mod error;
pub mod events;
pub mod item;
pub mod list;
pub mod model;
pub mod policy;

// Re-exports for consumers
pub use error::{ListError, ListResult};
pub use events::{Action, Bubbled, ListEvent, ListenerId};
pub use item::{Bubble, Item};
pub use list::List;
pub use model::{Key, Model};
pub use policy::{Duplicates, Policies, SortOn};
