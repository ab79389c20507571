//! # linkshare-entity
//!
//! Domain entities for LinkShare. A [`share::LinkShare`] holds one remote
//! link share's attributes together with its single in-flight mutation, and
//! decides which mutation requests are admissible under the server's
//! capabilities.

pub mod naming;
pub mod share;

pub use naming::display_name;
pub use share::{LinkShare, MutationRules, ShareMutation};
