//! Operating mode of a dialogue session.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// Experimental condition controlling how persistent the agent is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Condition {
    /// Pushy: ignores polite exits and tolerates repeated refusals.
    C1,
    /// Trust-aware: honors refusals and polite exits, stops on low trust.
    C3,
}

impl Condition {
    pub fn is_trust_aware(&self) -> bool {
        matches!(self, Condition::C3)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::C1 => "C1",
            Condition::C3 => "C3",
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Condition {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "C1" => Ok(Condition::C1),
            "C3" => Ok(Condition::C3),
            other => Err(ValidationError::invalid_format(
                "condition",
                format!("expected C1 or C3, got '{}'", other),
            )),
        }
    }
}
