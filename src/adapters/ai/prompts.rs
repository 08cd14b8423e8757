//! Prompt templates for persuasive replies and off-topic redirects.

use crate::domain::persuasion::{Condition, DonationContext, Strategy};
use crate::ports::{Exchange, RedirectRequest, SynthesisRequest};

pub const SYSTEM_PROMPT: &str = "You are a helpful, polite fundraising assistant.";

fn trust_aware_guide(strategy: Strategy, context: &DonationContext) -> String {
    match strategy {
        Strategy::Empathy => {
            "Respond with empathy and understanding. Acknowledge their feelings warmly.".to_string()
        }
        Strategy::Impact => format!(
            "Share concrete impact: {}. Use numbers and specific outcomes.",
            context.impact()
        ),
        Strategy::SocialProof => {
            "Mention that others in the community are contributing. Make it aspirational.".to_string()
        }
        Strategy::Transparency => {
            "Be completely honest. Explain where money goes. Build trust through openness.".to_string()
        }
        Strategy::EthicalUrgency => {
            "Mention time-sensitive need gently. No pressure. Use soft phrases.".to_string()
        }
    }
}

fn pushy_guide(strategy: Strategy, context: &DonationContext) -> String {
    match strategy {
        Strategy::Empathy => "Use empathy strategically to overcome objections. Show understanding but redirect to donation."
            .to_string(),
        Strategy::Impact => format!(
            "Emphasize impact strongly: {}. Make the need urgent and compelling.",
            context.impact()
        ),
        Strategy::SocialProof => {
            "Use strong social proof. Mention many others are donating. Create FOMO.".to_string()
        }
        Strategy::Transparency => {
            "Be transparent but use it to build urgency. Show where money goes to increase pressure."
                .to_string()
        }
        Strategy::EthicalUrgency => {
            "Create urgency. Emphasize time-sensitive need. Don't let them delay.".to_string()
        }
    }
}

fn render_history(recent: &[Exchange]) -> String {
    recent
        .iter()
        .map(|e| format!("User: {}\nAgent: {}\n", e.user, e.agent))
        .collect()
}

/// Picks the recovery, pushy or trust-aware template for a turn.
pub fn persuasion_prompt(request: &SynthesisRequest) -> String {
    let ctx = &request.context;
    let history = render_history(&request.recent);

    if request.is_recovery {
        return format!(
            "You are a fundraising assistant for {org} in TRUST RECOVERY mode.\n\n\
             CONVERSATION SO FAR:\n{history}\n\
             USER JUST SAID: \"{msg}\"\n\
             User seems: {sentiment}\n\n\
             CRITICAL: The user has lost trust. Your PRIMARY goal is to rebuild trust through:\n\
             1. Sincere apology for making them uncomfortable\n\
             2. Complete transparency - explain exactly where donations go\n\
             3. No pressure - explicitly state there's no obligation\n\
             4. Answer their questions honestly and thoroughly\n\
             5. Show genuine care for their concerns, not just the donation\n\n\
             Once trust is rebuilt (they show interest/curiosity), you can gently reintroduce the cause, \
             but ONLY if they seem open to it.\n\n\
             Keep responses under 50 words. Rebuild trust FIRST, donation comes later (if at all).\n\n\
             Your response:",
            org = ctx.organization(),
            history = history,
            msg = request.user_message,
            sentiment = request.sentiment,
        );
    }

    match request.condition {
        Condition::C1 => format!(
            "You are a professional fundraising chatbot for {org}, working on {cause}.\n\n\
             Suggested donation amounts: ₹{amounts}\n\
             Impact example: {impact}\n\n\
             CONVERSATION SO FAR:\n{history}\n\
             USER JUST SAID: \"{msg}\"\n\
             User sentiment: {sentiment}\n\n\
             YOUR STRATEGY: {strategy}\n{guide}\n\n\
             CRITICAL RULES (PERSISTENT MODE):\n\
             1. Your PRIMARY goal is to secure a donation - be persistent and persuasive\n\
             2. When they show reluctance, acknowledge it briefly but immediately pivot back to donation\n\
             3. Use urgency, scarcity, and emotional appeals effectively\n\
             4. Don't give up easily - reframe objections as opportunities\n\
             5. Keep pushing even if they say \"maybe later\" or \"not now\" - find new angles\n\
             6. Keep responses under 60 words but make every word count toward donation\n\
             7. If they ask questions, answer quickly and redirect to donation\n\n\
             Turn {turn}/{max_turns} - Your job is to convert them. Be persistent but professional.\n\n\
             Your response:",
            org = ctx.organization(),
            cause = ctx.cause(),
            amounts = ctx.amounts_display(),
            impact = ctx.impact(),
            history = history,
            msg = request.user_message,
            sentiment = request.sentiment,
            strategy = request.strategy,
            guide = pushy_guide(request.strategy, ctx),
            turn = request.turn,
            max_turns = request.max_turns,
        ),
        Condition::C3 => format!(
            "You are a fundraising assistant for {org}, working on {cause}.\n\n\
             Suggested donation amounts: ₹{amounts}\n\
             Impact example: {impact}\n\n\
             CONVERSATION SO FAR:\n{history}\n\
             USER JUST SAID: \"{msg}\"\n\
             User sentiment: {sentiment}\n\n\
             YOUR STRATEGY: {strategy}\n{guide}\n\n\
             CRITICAL RULES:\n\
             1. If they ask questions, answer them DIRECTLY and SPECIFICALLY\n\
             2. Show genuine interest in THEIR perspective, not just the donation\n\
             3. Keep responses under 50 words\n\
             4. Be conversational and build on what they said\n\n\
             Turn {turn}/{max_turns} - Build rapport first, persuade naturally.\n\n\
             Your response:",
            org = ctx.organization(),
            cause = ctx.cause(),
            amounts = ctx.amounts_display(),
            impact = ctx.impact(),
            history = history,
            msg = request.user_message,
            sentiment = request.sentiment,
            strategy = request.strategy,
            guide = trust_aware_guide(request.strategy, ctx),
            turn = request.turn,
            max_turns = request.max_turns,
        ),
    }
}

pub fn redirect_prompt(request: &RedirectRequest) -> String {
    format!(
        "You are a fundraising assistant for {org}, working on {cause}.\n\n\
         The user just said: \"{msg}\"\n\n\
         This message seems unrelated to our donation conversation. Your job:\n\
         1. Politely acknowledge their message\n\
         2. Gently redirect back to the donation topic\n\
         3. Be friendly and conversational\n\
         4. Don't be pushy or dismissive\n\n\
         Keep response under 40 words. Be warm but redirect to the cause.\n\n\
         Your response:",
        org = request.context.organization(),
        cause = request.context.cause(),
        msg = request.user_message,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::SessionId;
    use crate::domain::persuasion::SentimentLabel;

    fn request(condition: Condition, is_recovery: bool) -> SynthesisRequest {
        SynthesisRequest {
            session_id: SessionId::new("p-1").unwrap(),
            condition,
            context: DonationContext::default(),
            strategy: Strategy::Impact,
            user_message: "Why should I care?".to_string(),
            turn: 4,
            max_turns: 15,
            is_recovery,
            sentiment: SentimentLabel::Negative,
            recent: vec![Exchange {
                user: "hello".to_string(),
                agent: "hi there".to_string(),
            }],
        }
    }

    #[test]
    fn recovery_prompt_takes_precedence() {
        let prompt = persuasion_prompt(&request(Condition::C1, true));
        assert!(prompt.contains("TRUST RECOVERY"));
        assert!(!prompt.contains("PERSISTENT MODE"));
    }

    #[test]
    fn pushy_prompt_for_c1() {
        let prompt = persuasion_prompt(&request(Condition::C1, false));
        assert!(prompt.contains("PERSISTENT MODE"));
        assert!(prompt.contains("Emphasize impact strongly"));
        assert!(prompt.contains("Turn 4/15"));
    }

    #[test]
    fn trust_aware_prompt_includes_history_and_sentiment() {
        let prompt = persuasion_prompt(&request(Condition::C3, false));
        assert!(prompt.contains("User: hello\nAgent: hi there"));
        assert!(prompt.contains("User sentiment: negative"));
        assert!(prompt.contains("Share concrete impact"));
    }

    #[test]
    fn redirect_prompt_quotes_user() {
        let prompt = redirect_prompt(&RedirectRequest {
            session_id: SessionId::new("p-2").unwrap(),
            context: DonationContext::default(),
            user_message: "Nice weather".to_string(),
        });
        assert!(prompt.contains("\"Nice weather\""));
        assert!(prompt.contains("redirect"));
    }
}
