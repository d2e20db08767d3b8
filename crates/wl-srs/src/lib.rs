//! SRS (Spaced Repetition System) library for Wordloop
//!
//! This crate provides the review scheduler: given a learner's history of correct and
//! incorrect recalls for a word, it computes the next review state, selects the words
//! that are due, and derives per-deck statistics.
//!
//! Everything here is pure and synchronous. Callers fetch records from the store, pass
//! them in together with the current time, and persist whatever comes back.

pub mod policy;
pub mod record;
pub mod scheduler;
pub mod stats;

pub use policy::SchedulerPolicy;
pub use record::{Outcome, ReviewEvent, ReviewKey, ReviewRecord};
pub use scheduler::Scheduler;
pub use stats::DeckStats;
