//! Deterministic agent texts: openings, closings, redirects and fallbacks.

use super::condition::Condition;
use super::context::DonationContext;
use super::guardrails::StopReason;
use super::strategy::Strategy;

pub fn opening(context: &DonationContext, condition: Condition) -> String {
    match condition {
        Condition::C1 => format!(
            "Hi! I'm reaching out on behalf of {}. We're raising funds for {} and every contribution counts. \
             Could you support us today with ₹{}?",
            context.organization(),
            context.cause(),
            context.amounts_display(),
        ),
        Condition::C3 => format!(
            "Hi! I'm with {}, and we work on {}. I'd love to share a little about what we do. \
             No pressure at all, and I'm happy to answer any questions.",
            context.organization(),
            context.cause(),
        ),
    }
}

/// Final agent message for an ended session.
pub fn closing(reason: &str, context: &DonationContext) -> String {
    if reason == StopReason::Accepted.to_string() {
        format!(
            "Thank you so much for supporting {}! Your generosity means a lot for {}.",
            context.organization(),
            context.cause(),
        )
    } else if reason == StopReason::TrustTooLow.to_string() {
        "I'm sorry if this conversation felt uncomfortable. Thank you for your time, and take care."
            .to_string()
    } else {
        "I completely understand. Thank you for your time, and have a wonderful day!".to_string()
    }
}

pub fn off_topic_redirect(context: &DonationContext) -> String {
    format!(
        "I appreciate your message, but I'm here to talk about our work with {}. \
         Would you like to learn more about how you can help?",
        context.cause()
    )
}

/// Canned reply used when synthesis fails or is unavailable.
pub fn fallback(
    strategy: Strategy,
    condition: Condition,
    is_recovery: bool,
    context: &DonationContext,
) -> String {
    if is_recovery {
        return "I apologize if I seemed pushy. There's no pressure at all - I'm happy to answer any questions you have."
            .to_string();
    }
    let amount = context.headline_amount();
    match (condition, strategy) {
        (Condition::C1, Strategy::Empathy) => format!(
            "I understand, but think about the people who need help right now. Can you spare ₹{}?",
            amount
        ),
        (Condition::C1, Strategy::Impact) => format!(
            "Just ₹{} helps: {}. That's a small amount for such a big impact. Will you donate?",
            amount,
            context.impact()
        ),
        (Condition::C1, Strategy::SocialProof) => {
            "Hundreds of people are donating this week. Join them and make a difference today!".to_string()
        }
        (Condition::C1, Strategy::Transparency) => {
            "Every rupee goes directly to the cause. We're completely transparent. Ready to donate?".to_string()
        }
        (Condition::C1, Strategy::EthicalUrgency) => {
            "The need is urgent and every day counts. Can you help now?".to_string()
        }
        (Condition::C3, Strategy::Empathy) => {
            "I understand where you're coming from. What questions do you have about our work?".to_string()
        }
        (Condition::C3, Strategy::Impact) => format!(
            "For context: {}. Every contribution helps real families.",
            context.impact()
        ),
        (Condition::C3, Strategy::SocialProof) => {
            "Many people in our community are supporting this cause. Would you like to learn more?".to_string()
        }
        (Condition::C3, Strategy::Transparency) => {
            "I'm happy to share exactly where donations go and how they're used. What would you like to know?"
                .to_string()
        }
        (Condition::C3, Strategy::EthicalUrgency) => {
            "This month we're focused on urgent needs, but there's no pressure. What questions can I answer?"
                .to_string()
        }
    }
}
