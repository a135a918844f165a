// External collaborator interfaces
//
// The engine never talks to the host directly: token movement, deferred-call
// scheduling and persistent storage all go through these traits. The host (or
// a test harness) implements them and injects them into the contract.

mod deferred_call;
mod storage;
mod token;

pub use deferred_call::{CallHandle, DeferredCallProvider, Slot};
pub use storage::StorageProvider;
pub use token::TokenProvider;
