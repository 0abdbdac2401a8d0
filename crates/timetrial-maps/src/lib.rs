//! Time Trial — Map bounded context.
//!
//! A map stream starts with a `MapAdded` event and accumulates achievement
//! events; folding the stream yields the map's leaderboard projection.

pub mod application;
pub mod domain;
