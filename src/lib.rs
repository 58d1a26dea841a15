//! State core for a role-based school wellbeing application: domain model,
//! action/reducer transition system, snapshot persistence with a migration
//! chain, and derived statistics. The `wellbeingd` binary wraps it in a
//! line-delimited-JSON stdio sidecar for the UI shell.

pub mod action;
pub mod backup;
pub mod calc;
pub mod ipc;
pub mod model;
pub mod normalize;
pub mod persist;
pub mod reducer;
pub mod seed;
pub mod store;

pub use action::Action;
pub use model::AppState;
pub use reducer::{reduce, TransitionError};
pub use store::Store;
