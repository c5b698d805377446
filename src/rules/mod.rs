//! Game rules.
//!
//! - `CardComparator`: which of two cards wins
//! - `TurnResolver`: the phase state machine that moves cards
//! - `TurnOutcome`: what a resolution step did
//!
//! The controller calls into the resolver but never interprets card
//! comparisons itself.

pub mod comparator;
pub mod outcome;
pub mod resolver;

pub use comparator::{CardComparator, Comparison, StandardComparator};
pub use outcome::{CardList, TurnOutcome};
pub use resolver::TurnResolver;
