//! Storage is organized through [state_storage::StateStorageImpl].
//!  - There is a single `state.json` file inside the application directory.
//!  - It holds every routine and every scheduled reminder.
//!  - Changes are done as read-modify-write under an exclusive lock on `state.json.lock`.
//!  - The new state is written next to the old one and renamed over it.

pub mod state_storage;
