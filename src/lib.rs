//! ATLAS - Adaptive persuasion dialogue engine
//!
//! This crate runs donation-persuasion conversations that track the user's
//! belief and trust turn by turn, classify rejections, adapt strategy weights
//! and stop according to a per-condition guardrail policy.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
