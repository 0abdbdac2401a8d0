//! Time Trial — Player bounded context.
//!
//! A player projection folds events from two sources keyed by the same
//! player identity: the player's own registration stream and achievement
//! events physically appended to map streams. The application layer merges
//! both into one deterministic timeline before folding.

pub mod application;
pub mod domain;
