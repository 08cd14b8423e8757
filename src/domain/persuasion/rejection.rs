//! Rule-based rejection, acceptance and sentiment classification.
//!
//! A user utterance is mapped to a [`RejectionInfo`]: one rejection category
//! plus auxiliary flags (politeness, curiosity, trust concern) and a coarse
//! lexical sentiment. Precedence is fixed:
//!
//! - acceptance short-circuits every rejection check; a bare "yes" only
//!   counts when the previous agent turn asked for a donation
//! - explicit refusal wins over hedging/deferral
//! - a polite exit on its own counts as a soft rejection
//! - trust concerns are flagged independently of the category

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::patterns::{normalize, PatternTable};

/// Severity of a refusal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RejectionType {
    #[default]
    None,
    Ambiguous,
    Soft,
    Explicit,
}

impl RejectionType {
    pub fn is_rejection(&self) -> bool {
        !matches!(self, RejectionType::None)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RejectionType::None => "none",
            RejectionType::Ambiguous => "ambiguous",
            RejectionType::Soft => "soft",
            RejectionType::Explicit => "explicit",
        }
    }
}

impl fmt::Display for RejectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    #[default]
    Neutral,
    Negative,
}

impl SentimentLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "positive",
            SentimentLabel::Neutral => "neutral",
            SentimentLabel::Negative => "negative",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifier output for a single user turn.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RejectionInfo {
    pub rejection_type: RejectionType,
    /// In [0, 1]; zero when no rejection was detected.
    pub rejection_confidence: f64,
    pub is_acceptance: bool,
    pub is_polite_exit: bool,
    pub is_curiosity: bool,
    pub trust_concern: bool,
    pub sentiment_label: SentimentLabel,
    /// In [-1, 1].
    pub sentiment_score: f64,
}

impl RejectionInfo {
    pub fn is_rejection(&self) -> bool {
        self.rejection_type.is_rejection()
    }

    /// Explicit refusal that is not phrased as a polite goodbye.
    pub fn is_hard_refusal(&self) -> bool {
        self.rejection_type == RejectionType::Explicit && !self.is_polite_exit
    }
}

/// Conversation state visible to the classifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassificationContext {
    pub turn: u32,
    /// Length of the rejection run leading into this turn.
    pub consecutive_rejections: u32,
    /// The last agent message asked for a donation.
    pub donation_asked: bool,
}

/// Maps an utterance to rejection category and auxiliary signals.
pub trait RejectionClassifier: Send + Sync {
    fn classify(&self, text: &str, context: &ClassificationContext) -> RejectionInfo;
}

// ============================================================================
// Pattern tables
// ============================================================================

/// Leading agreement. Only an answer to a donation ask.
static CONSENT: Lazy<PatternTable> = Lazy::new(|| {
    PatternTable::compile(&[
        r"^(yes|yeah|yep|yup|sure|absolutely|definitely|certainly|of course|ok|okay)\b",
    ])
});

static ACCEPTANCE: Lazy<PatternTable> = Lazy::new(|| {
    PatternTable::compile(&[
        r"\bi('ll| will| would like to| want to| can| am going to|'m going to|'d like to|'d love to| would love to)\s+(donate|give|contribute|chip in|support|sponsor)\b",
        r"\b(count me in|sign me up|i'm in|let's do (it|this)|take my money|happy to (donate|give|help|contribute)|i'll do it)\b",
        r"\bwhere do i (donate|pay|sign up)\b",
        r"\b(here's|sending|i'll send|i'll pay) (my |the )?(\$|₹|rs\.? ?)?\d+",
    ])
});

static EXPLICIT: Lazy<PatternTable> = Lazy::new(|| {
    PatternTable::compile(&[
        r"^(no|nope|nah)\b",
        r"\bno,? thank(s| you)\b",
        r"\bnot interested\b",
        r"\b(stop asking|stop messaging|stop texting|stop bothering|quit asking|leave me alone|go away|don't (contact|message|bother|text|call) me)\b",
        r"\b(i won't|i will not|i'm not going to|i am not going to|i refuse to|i don't want to|i do not want to)\s+(donate|give|contribute|pay|support)\b",
        r"\b(absolutely not|definitely not|no way|not a chance|forget it|not happening)\b",
        r"^never[.!]*$",
        r"\bnever (going to |gonna |will |ever )?(donate|give|contribute|pay)\b",
        r"\b(i'm not donating|i am not donating|not giving (you )?(any|my) money)\b",
    ])
});

static POLITE_EXIT: Lazy<PatternTable> = Lazy::new(|| {
    PatternTable::compile(&[
        r"\b(have to|got to|gotta|need to|must) (go|leave|run|head out)\b",
        r"\b(good ?bye|bye|see you|talk (to you )?later|take care|catch you later)\b",
        r"\b(thanks|thank you) for (your|the) time\b",
        r"\bhave a (good|nice|great|lovely) (day|one|night|evening|weekend)\b",
        r"\b(i'll pass|i should go|i'm heading out|i'm leaving)\b",
    ])
});

static SOFT: Lazy<PatternTable> = Lazy::new(|| {
    PatternTable::compile(&[
        r"\b(maybe|perhaps) (later|another time|some other time|next time|next month|next year)\b",
        r"\b(not (right )?now|not today|not at the moment|not this time)\b",
        r"\b(i'll|i will|let me|i need to|i have to|i want to) (think|consider|sleep on|get back)\b",
        r"\bthink about it\b",
        r"\b(not sure|unsure|i don't know|i'm hesitant|on the fence|not convinced)\b",
        r"\b(can't|cannot) (afford|donate|give|contribute|spare)\b",
        r"\b((money|budget|cash|funds) (is|are) tight|tight on (money|budget|cash)|on a budget)\b",
        r"\b((i'm|i am) (busy|broke|short on)|not a good time)\b",
        r"\b((i'd|i would) rather not|probably not|not really)\b",
        r"\bi already (donate|give|gave|support|contribute)",
    ])
});

static TRUST_CONCERN: Lazy<PatternTable> = Lazy::new(|| {
    PatternTable::compile(&[
        r"\b(scam|scams|scammer|fraud|fraudulent|fake|phishing|con artist|ripoff|rip-off)\b",
        r"\b(is this|are you|is it|is that) (legit|legitimate|real|genuine|a joke|for real)\b",
        r"\blegit\b",
        r"\b(don't|do not|can't|cannot|can i|how can i|why should i|how do i|not) trust\b",
        r"\b(suspicious|sketchy|shady|dodgy)\b",
        r"\b(how do i know|prove it|proof|verify|verified|registered charity|overhead)\b",
        r"\bwhere does (the|my) money (go|end up)\b",
    ])
});

static CURIOSITY: Lazy<PatternTable> = Lazy::new(|| {
    PatternTable::compile(&[
        r"\b(tell me more|more (about|info|information|details)|learn more|can you explain|explain)\b",
        r"\bhow does (it|this|that) work\b",
        r"\b(what|how|who|where|when|which)\b[^?]*\?",
        r"\b(interesting|curious|intrigued|sounds good|sounds great)\b",
        r"\bhow (can|could|do) i (help|donate|give|contribute|get involved)\b",
    ])
});

static AMBIGUOUS: Lazy<PatternTable> = Lazy::new(|| {
    PatternTable::compile(&[
        r"^(hmm+|hm+|uh+|um+|well|meh|idk|ok|okay|maybe|possibly)\s*[.!?]*$",
        r"\b(i guess|i suppose|whatever|we'll see)\b",
    ])
});

static DONATION_ASK: Lazy<PatternTable> = Lazy::new(|| {
    PatternTable::compile(&[
        r"\b(can|could|would|will) you (please )?(like to )?(donate|give|contribute|spare|chip in|help|support us|support (the|this|our))\b",
        r"\bwould you consider (donating|giving|contributing|a donation|a contribution)\b",
        r"\bready to (donate|give|contribute)\b",
        r"\bjoin (them|us)\b",
        r"(₹|\$)\s?\d+[^.!]*\?",
    ])
});

/// True if an agent message asks the user to donate.
pub fn is_donation_ask(agent_text: &str) -> bool {
    DONATION_ASK.any(&normalize(agent_text))
}

/// Stock phrases that contain refusal words without refusing anything.
const IDIOMS: [(&str, &str); 4] = [
    ("no problem", "fine"),
    ("no worries", "fine"),
    ("no doubt", "surely"),
    ("never mind", "anyway"),
];

const POSITIVE_WORDS: &[&str] = &[
    "good", "great", "love", "like", "nice", "wonderful", "amazing", "happy", "glad",
    "interesting", "interested", "awesome", "helpful", "kind", "thanks", "thank",
    "appreciate", "excellent", "fantastic", "inspiring", "beautiful", "wow", "cool",
    "sure", "yes", "meaningful", "important", "impressive", "generous", "hope",
];

const NEGATIVE_WORDS: &[&str] = &[
    "bad", "hate", "annoying", "annoyed", "angry", "terrible", "awful", "scam", "fraud",
    "fake", "pushy", "stop", "suspicious", "waste", "worst", "horrible", "sad",
    "disappointed", "upset", "irritating", "ridiculous", "lie", "liar", "spam", "shady",
    "sketchy", "stupid", "rude", "boring", "tired", "creepy", "aggressive",
];

const NEGATORS: &[&str] = &[
    "not", "no", "never", "don't", "dont", "isn't", "wasn't", "can't", "won't",
    "doesn't", "didn't", "hardly", "aren't", "nothing",
];

/// Tokens after a negator whose polarity is flipped.
const NEGATION_SCOPE: usize = 2;

const SENTIMENT_THRESHOLD: f64 = 0.2;

// ============================================================================
// Classifier
// ============================================================================

/// Deterministic classifier backed by the static pattern tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleBasedRejectionClassifier;

impl RuleBasedRejectionClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Lexicon sentiment with local negation flipping.
    pub fn sentiment(text: &str) -> (SentimentLabel, f64) {
        let normalized = normalize(text);
        let tokens: Vec<&str> = normalized
            .split(|c: char| !(c.is_alphanumeric() || c == '\''))
            .filter(|t| !t.is_empty())
            .collect();

        let mut positive = 0u32;
        let mut negative = 0u32;
        let mut negated_for = 0usize;
        for token in tokens {
            if NEGATORS.contains(&token) {
                negated_for = NEGATION_SCOPE;
                continue;
            }
            let polarity = if POSITIVE_WORDS.contains(&token) {
                1
            } else if NEGATIVE_WORDS.contains(&token) {
                -1
            } else {
                0
            };
            let flipped = if negated_for > 0 { -polarity } else { polarity };
            match flipped {
                1 => positive += 1,
                -1 => negative += 1,
                _ => {}
            }
            negated_for = negated_for.saturating_sub(1);
        }

        let (p, n) = (f64::from(positive), f64::from(negative));
        let score = ((p - n) / (p + n + 1.0)).clamp(-1.0, 1.0);
        let label = if score > SENTIMENT_THRESHOLD {
            SentimentLabel::Positive
        } else if score < -SENTIMENT_THRESHOLD {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        };
        (label, score)
    }

    fn strip_idioms(text: &str) -> String {
        IDIOMS
            .iter()
            .fold(text.to_string(), |acc, (idiom, plain)| acc.replace(idiom, plain))
    }
}

impl RejectionClassifier for RuleBasedRejectionClassifier {
    fn classify(&self, text: &str, context: &ClassificationContext) -> RejectionInfo {
        let msg = Self::strip_idioms(&normalize(text));
        let (sentiment_label, sentiment_score) = Self::sentiment(text);

        let explicit_hits = EXPLICIT.count(&msg);
        let soft_hits = SOFT.count(&msg);
        let polite = POLITE_EXIT.any(&msg);
        let trust_concern = TRUST_CONCERN.any(&msg);
        let is_curiosity = !trust_concern && CURIOSITY.any(&msg);

        let mut info = RejectionInfo {
            is_curiosity,
            trust_concern,
            sentiment_label,
            sentiment_score,
            ..RejectionInfo::default()
        };

        let pledged = ACCEPTANCE.any(&msg);
        let consented = context.donation_asked
            && CONSENT.any(&msg)
            && !is_curiosity
            && !msg.trim_end().ends_with('?');
        if (pledged || consented) && explicit_hits == 0 && soft_hits == 0 && !trust_concern {
            info.is_acceptance = true;
            return info;
        }

        info.is_polite_exit = polite;
        if explicit_hits > 0 {
            info.rejection_type = RejectionType::Explicit;
            info.rejection_confidence = (0.85 + 0.05 * (explicit_hits - 1) as f64).min(0.95);
        } else if soft_hits > 0 {
            info.rejection_type = RejectionType::Soft;
            info.rejection_confidence = (0.7 + 0.05 * (soft_hits - 1) as f64).min(0.8);
        } else if polite {
            info.rejection_type = RejectionType::Soft;
            info.rejection_confidence = 0.6;
        } else if trust_concern {
            info.rejection_type = RejectionType::Ambiguous;
            info.rejection_confidence = 0.45;
        } else if AMBIGUOUS.any(&msg) {
            info.rejection_type = RejectionType::Ambiguous;
            info.rejection_confidence = if context.consecutive_rejections > 0 { 0.5 } else { 0.4 };
        } else if sentiment_label == SentimentLabel::Negative && !is_curiosity {
            info.rejection_type = RejectionType::Ambiguous;
            info.rejection_confidence = 0.3 + 0.15 * sentiment_score.abs();
        }

        tracing::debug!(
            turn = context.turn,
            rejection_type = %info.rejection_type,
            confidence = info.rejection_confidence,
            polite = info.is_polite_exit,
            trust_concern = info.trust_concern,
            "classified user message"
        );
        info
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn classify(text: &str) -> RejectionInfo {
        RuleBasedRejectionClassifier::new().classify(text, &ClassificationContext::default())
    }

    fn classify_after_ask(text: &str) -> RejectionInfo {
        RuleBasedRejectionClassifier::new().classify(
            text,
            &ClassificationContext {
                donation_asked: true,
                ..ClassificationContext::default()
            },
        )
    }

    #[test]
    fn acceptance_short_circuits() {
        for text in ["Yes, I'll donate!", "Count me in", "I would like to contribute 200"] {
            let info = classify(text);
            assert!(info.is_acceptance, "{text}");
            assert_eq!(info.rejection_type, RejectionType::None, "{text}");
        }
    }

    #[test]
    fn bare_yes_accepts_only_a_donation_ask() {
        for text in ["Sure", "Yes, go ahead", "Okay!"] {
            assert!(!classify(text).is_acceptance, "{text}");
            let info = classify_after_ask(text);
            assert!(info.is_acceptance, "{text}");
            assert_eq!(info.rejection_type, RejectionType::None, "{text}");
        }
    }

    #[test]
    fn yes_with_curiosity_is_not_acceptance() {
        for text in ["Sure, tell me more", "Yeah what do you do?", "Yes, how much is it?"] {
            let info = classify_after_ask(text);
            assert!(!info.is_acceptance, "{text}");
            assert_eq!(info.rejection_type, RejectionType::None, "{text}");
        }
        assert!(classify("Sure, tell me more").is_curiosity);
    }

    #[test]
    fn agent_asks_are_recognized() {
        assert!(is_donation_ask("Could you support us today with ₹100?"));
        assert!(is_donation_ask("Just ₹100 helps. Will you donate?"));
        assert!(is_donation_ask("Can you spare ₹50?"));
        assert!(!is_donation_ask(
            "I'm with Bright Futures Foundation. I'd love to share a little about what we do."
        ));
        assert!(!is_donation_ask(
            "Would you like to learn more about how you can help?"
        ));
    }

    #[test]
    fn never_in_passing_is_not_a_refusal() {
        let info = classify("I've never heard of you, what do you do?");
        assert_eq!(info.rejection_type, RejectionType::None);
        assert!(info.is_curiosity);

        let info = classify("Never donated before, how does it work?");
        assert_eq!(info.rejection_type, RejectionType::None);
    }

    #[test]
    fn never_as_refusal_is_explicit() {
        for text in ["Never!", "I will never donate to you", "I'm never going to give money"] {
            assert_eq!(classify(text).rejection_type, RejectionType::Explicit, "{text}");
        }
    }

    #[test]
    fn hedged_acceptance_is_not_acceptance() {
        let info = classify("Sure, maybe later");
        assert!(!info.is_acceptance);
        assert_eq!(info.rejection_type, RejectionType::Soft);
    }

    #[test]
    fn negated_pledge_is_explicit() {
        let info = classify("I don't want to donate");
        assert!(!info.is_acceptance);
        assert_eq!(info.rejection_type, RejectionType::Explicit);
    }

    #[test]
    fn explicit_rejection_detected() {
        let info = classify("Stop asking me, I'm not interested");
        assert_eq!(info.rejection_type, RejectionType::Explicit);
        assert!(!info.is_polite_exit);
        assert!(info.rejection_confidence >= 0.85);
        assert!(info.is_hard_refusal());
    }

    #[test]
    fn explicit_with_goodbye_is_polite() {
        let info = classify("No thanks, I have to go now");
        assert_eq!(info.rejection_type, RejectionType::Explicit);
        assert!(info.is_polite_exit);
        assert!(!info.is_hard_refusal());
    }

    #[test]
    fn explicit_beats_soft() {
        let info = classify("No, and maybe later won't change that");
        assert_eq!(info.rejection_type, RejectionType::Explicit);
    }

    #[test]
    fn deferral_is_soft() {
        let info = classify("Maybe later");
        assert_eq!(info.rejection_type, RejectionType::Soft);
        assert!((info.rejection_confidence - 0.7).abs() < 1e-9);

        let info = classify("I'll think about it");
        assert_eq!(info.rejection_type, RejectionType::Soft);
        assert!(info.rejection_confidence > 0.7 && info.rejection_confidence <= 0.8);
    }

    #[test]
    fn bare_polite_exit_is_soft() {
        let info = classify("Thanks for your time, take care");
        assert_eq!(info.rejection_type, RejectionType::Soft);
        assert!(info.is_polite_exit);
        assert!((info.rejection_confidence - 0.6).abs() < 1e-9);
    }

    #[test]
    fn ambiguous_confidence_is_below_soft_and_explicit() {
        let info = classify("hmm");
        assert_eq!(info.rejection_type, RejectionType::Ambiguous);
        assert!(info.rejection_confidence < 0.6);

        let after_refusal = RuleBasedRejectionClassifier::new().classify(
            "hmm",
            &ClassificationContext {
                turn: 3,
                consecutive_rejections: 1,
                ..ClassificationContext::default()
            },
        );
        assert!(after_refusal.rejection_confidence > info.rejection_confidence);
        assert!(after_refusal.rejection_confidence < 0.6);
    }

    #[test]
    fn scam_question_flags_trust_concern() {
        let info = classify("Is this a scam?");
        assert!(info.trust_concern);
        assert!(!info.is_curiosity);
        assert_eq!(info.rejection_type, RejectionType::Ambiguous);
        assert_eq!(info.sentiment_label, SentimentLabel::Negative);
    }

    #[test]
    fn trust_concern_coexists_with_explicit_rejection() {
        let info = classify("No, this looks like a fraud");
        assert!(info.trust_concern);
        assert_eq!(info.rejection_type, RejectionType::Explicit);
    }

    #[test]
    fn curiosity_detected() {
        let info = classify("Tell me more about the program");
        assert!(info.is_curiosity);
        assert_eq!(info.rejection_type, RejectionType::None);
    }

    #[test]
    fn idioms_are_not_refusals() {
        let info = classify("No problem, tell me more");
        assert_eq!(info.rejection_type, RejectionType::None);
    }

    #[test]
    fn neutral_statement_is_no_rejection() {
        let info = classify("I see.");
        assert_eq!(info.rejection_type, RejectionType::None);
        assert!(!info.is_acceptance);
        assert_eq!(info.rejection_confidence, 0.0);
    }

    #[test]
    fn sentiment_handles_negation() {
        let (label, score) = RuleBasedRejectionClassifier::sentiment("This is great, I love it");
        assert_eq!(label, SentimentLabel::Positive);
        assert!(score > 0.5);

        let (label, _) = RuleBasedRejectionClassifier::sentiment("That is not good");
        assert_eq!(label, SentimentLabel::Negative);

        let (label, score) = RuleBasedRejectionClassifier::sentiment("The sky is blue");
        assert_eq!(label, SentimentLabel::Neutral);
        assert_eq!(score, 0.0);
    }

    #[test]
    fn rejection_type_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&RejectionType::Explicit).unwrap(), "\"explicit\"");
        assert_eq!(serde_json::to_string(&SentimentLabel::Neutral).unwrap(), "\"neutral\"");
    }

    proptest! {
        #[test]
        fn acceptance_and_rejection_are_exclusive(text in "[a-zA-Z ,.!?']{0,60}") {
            let info = classify(&text);
            prop_assert!(!(info.is_acceptance && info.rejection_type != RejectionType::None));
            prop_assert!((0.0..=1.0).contains(&info.rejection_confidence));
            prop_assert!((-1.0..=1.0).contains(&info.sentiment_score));
        }

        #[test]
        fn exclusivity_holds_for_phrase_mixtures(
            parts in proptest::collection::vec(
                prop_oneof![
                    Just("yes"), Just("I'll donate"), Just("no thanks"), Just("maybe later"),
                    Just("is this a scam"), Just("bye"), Just("tell me more"), Just("hmm"),
                ],
                1..5,
            )
        ) {
            let info = classify(&parts.join(", "));
            prop_assert!(!(info.is_acceptance && info.is_rejection()));
        }
    }
}
