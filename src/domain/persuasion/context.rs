//! Donation campaign context supplied at session creation.

use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::foundation::ValidationError;

/// Immutable description of the campaign the agent is raising money for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonationContext {
    organization: String,
    cause: String,
    /// Suggested amounts, in presentation order.
    #[serde(deserialize_with = "deserialize_amounts")]
    amounts: Vec<String>,
    impact: String,
}

impl DonationContext {
    pub fn new(
        organization: impl Into<String>,
        cause: impl Into<String>,
        amounts: Vec<String>,
        impact: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let ctx = Self {
            organization: organization.into().trim().to_string(),
            cause: cause.into().trim().to_string(),
            amounts: normalize_amounts(amounts),
            impact: impact.into().trim().to_string(),
        };
        ctx.validate()?;
        Ok(ctx)
    }

    /// Checks the required fields. Deserialized contexts must be validated
    /// explicitly before use.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.organization.trim().is_empty() {
            return Err(ValidationError::empty_field("organization"));
        }
        if self.cause.trim().is_empty() {
            return Err(ValidationError::empty_field("cause"));
        }
        for amount in &self.amounts {
            if amount.parse::<f64>().map(|v| v < 0.0).unwrap_or(true) {
                return Err(ValidationError::invalid_format(
                    "amounts",
                    format!("'{}' is not a non-negative number", amount),
                ));
            }
        }
        Ok(())
    }

    pub fn organization(&self) -> &str {
        &self.organization
    }

    pub fn cause(&self) -> &str {
        &self.cause
    }

    pub fn amounts(&self) -> &[String] {
        &self.amounts
    }

    pub fn impact(&self) -> &str {
        &self.impact
    }

    /// Amounts joined for prompts and canned text, e.g. `100, 200, 500`.
    pub fn amounts_display(&self) -> String {
        self.amounts.join(", ")
    }

    /// The first suggested amount, used by the canned fallbacks.
    pub fn headline_amount(&self) -> &str {
        self.amounts.first().map(String::as_str).unwrap_or("200")
    }
}

impl Default for DonationContext {
    fn default() -> Self {
        Self {
            organization: "Bright Futures Foundation".to_string(),
            cause: "children's education".to_string(),
            amounts: vec!["100".to_string(), "200".to_string(), "500".to_string()],
            impact: "200 provides school supplies for one child for a full term".to_string(),
        }
    }
}

fn normalize_amounts(amounts: Vec<String>) -> Vec<String> {
    amounts
        .into_iter()
        .map(|a| a.trim().trim_start_matches(['$', '₹']).to_string())
        .filter(|a| !a.is_empty())
        .collect()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AmountsRepr {
    List(Vec<AmountItem>),
    Joined(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AmountItem {
    Text(String),
    Number(f64),
}

fn deserialize_amounts<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = match AmountsRepr::deserialize(deserializer)? {
        AmountsRepr::Joined(s) => s.split(',').map(str::to_string).collect(),
        AmountsRepr::List(items) => items
            .into_iter()
            .map(|item| match item {
                AmountItem::Text(s) => s,
                AmountItem::Number(n) if n.fract() == 0.0 => format!("{}", n as i64),
                AmountItem::Number(n) => n.to_string(),
            })
            .collect(),
    };
    Ok(normalize_amounts(raw))
}
