//! Link share domain entities.

pub mod model;
pub mod mutation;

pub use model::LinkShare;
pub use mutation::{MutationRules, ShareMutation};
