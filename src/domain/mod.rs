//! Domain layer containing the dialogue engine's business logic.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (ids, lifecycle status, errors)
//! - `persuasion` - Classifiers, trackers, strategy weighting, guardrails
//!   and the session aggregate
pub mod foundation;
pub mod persuasion;
