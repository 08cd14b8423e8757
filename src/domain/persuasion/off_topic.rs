//! Relevance check of user messages against the donation conversation.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::context::DonationContext;
use super::patterns::{normalize, PatternTable};

/// Result of an off-topic check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OffTopicVerdict {
    pub is_off_topic: bool,
    pub confidence: f64,
    pub reason: String,
}

impl OffTopicVerdict {
    fn off(confidence: f64, reason: &str) -> Self {
        Self {
            is_off_topic: true,
            confidence,
            reason: reason.to_string(),
        }
    }

    fn on(confidence: f64, reason: &str) -> Self {
        Self {
            is_off_topic: false,
            confidence,
            reason: reason.to_string(),
        }
    }
}

/// Decides whether a message belongs to the donation conversation.
pub trait OffTopicDetector: Send + Sync {
    fn detect(&self, text: &str) -> OffTopicVerdict;
}

/// Builds a detector bound to one session's campaign.
pub trait OffTopicDetectorFactory: Send + Sync {
    fn for_context(&self, context: &DonationContext) -> Box<dyn OffTopicDetector>;
}

static ON_TOPIC: Lazy<PatternTable> = Lazy::new(|| {
    PatternTable::compile(&[
        // donation vocabulary
        r"\b(donate|donated|donation|donations|donating|donor|donors|give|giving|contribute|contribution|support|help|fund|funds|fundraising|fundraiser)\b",
        r"\b(money|payment|pay|amount|rupees?|dollars?|usd)\b",
        r"(₹|\$)\s?\d+",
        r"\b(charity|charitable|cause|organi[sz]ation|ngo|non-?profit)\b",
        // cause vocabulary
        r"\b(education|children|kids|school|students|learning|teach|families)\b",
        r"\b(assist|aid|benefit|impact|difference)\b",
        r"\b(need|needy|underprivileged|poor|poverty|disadvantaged)\b",
        // legitimacy
        r"\b(trust|legitimate|legit|real|genuine|verify|prove|authentic|scam|fraud|fake)\b",
        r"\b(where.*money|how.*used|transparency|accountability|overhead)\b",
        // information requests
        r"\b(tell.*more|explain|information|details|question|curious|interested|learn|understand)\b",
        r"\bhow (does|do|will|would) (it|this|that|my \w+) work\b",
        r"\bwhat (do|does) (you|your \w+|it) do\b",
        // replies to the agent
        r"\b(yes|no|nope|maybe|sure|ok|okay|thanks|thank|appreciate)\b",
        r"\b(later|think|consider|afford)\b",
        // conversational flow
        r"\b(hello|hi|hey|greetings|morning|afternoon|evening)\b",
        r"\b(bye|goodbye|see.*you|talk|chat|conversation|go|leave)\b",
    ])
});

static OFF_TOPIC: Lazy<PatternTable> = Lazy::new(|| {
    PatternTable::compile(&[
        r"\b(weather|rain|sunny|cloud|clouds|temperature|forecast)\b",
        r"\b(sports|football|soccer|basketball|cricket|game|match|team|player)\b",
        r"\b(movie|film|actor|actress|cinema|theater|show|tv|television)\b",
        r"\b(food|restaurant|recipe|cooking|eat|meal|dinner|lunch|breakfast)\b",
        r"\b(travel|vacation|trip|hotel|flight|airplane|beach|holiday)\b",
        r"\b(shopping|buy|purchase|store|mall|shop|product|item)\b",
        r"\b(work|job|career|office|boss|colleague|meeting|project)\b",
        r"\b(relationship|dating|girlfriend|boyfriend|marriage|wedding)\b",
        r"\b(health|doctor|hospital|medicine|sick|ill|disease|treatment)\b",
        r"\b(politics|election|vote|president|government|policy|law)\b",
        r"\b(technology|computer|phone|app|software|internet|website)\b",
        r"\b(car|vehicle|drive|road|traffic|parking|gas|fuel)\b",
        r"\b(pet|dog|cat|animal|veterinary)\b",
        r"\b(hobby|pastime|activity|fun|entertainment)\b",
    ])
});

/// Minimum length of an organization/cause word to count as context.
const MIN_CONTEXT_WORD_LEN: usize = 4;

/// Keyword detector combining fixed topic tables with campaign words.
#[derive(Debug, Clone)]
pub struct KeywordOffTopicDetector {
    context_patterns: PatternTable,
}

impl KeywordOffTopicDetector {
    pub fn new(context: &DonationContext) -> Self {
        let text = format!("{} {}", context.organization(), context.cause());
        let words: Vec<String> = normalize(&text)
            .split_whitespace()
            .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()).to_string())
            .filter(|w| w.chars().count() >= MIN_CONTEXT_WORD_LEN)
            .collect();
        Self {
            context_patterns: PatternTable::from_keywords(words),
        }
    }
}

impl OffTopicDetector for KeywordOffTopicDetector {
    fn detect(&self, text: &str) -> OffTopicVerdict {
        let msg = normalize(text);
        let off = OFF_TOPIC.count(&msg);
        let on = ON_TOPIC.count(&msg);
        let ctx = self.context_patterns.count(&msg);

        if off >= 2 {
            return OffTopicVerdict::off(
                (0.5 + 0.15 * off as f64).min(0.9),
                "Message contains multiple off-topic topics",
            );
        }
        if off >= 1 && on == 0 && ctx == 0 {
            return OffTopicVerdict::off(0.7, "Message appears unrelated to donation conversation");
        }
        if on >= 1 || ctx >= 1 {
            let confidence = if on + ctx >= 2 { 0.8 } else { 0.6 };
            return OffTopicVerdict::on(confidence, "Message is relevant to donation conversation");
        }
        if msg.split_whitespace().count() <= 2 {
            return OffTopicVerdict::on(0.5, "Short message, assumed relevant");
        }
        if msg.ends_with('?') && off == 0 {
            return OffTopicVerdict::on(0.6, "Question without clear off-topic indicators");
        }
        OffTopicVerdict {
            is_off_topic: off > 0,
            confidence: 0.5,
            reason: "Ambiguous message".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordOffTopicDetectorFactory;

impl OffTopicDetectorFactory for KeywordOffTopicDetectorFactory {
    fn for_context(&self, context: &DonationContext) -> Box<dyn OffTopicDetector> {
        Box::new(KeywordOffTopicDetector::new(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detector() -> KeywordOffTopicDetector {
        let ctx = DonationContext::new(
            "Bright Futures Foundation",
            "rural literacy",
            vec!["100".into()],
            "books for a classroom",
        )
        .unwrap();
        KeywordOffTopicDetector::new(&ctx)
    }

    #[test]
    fn weather_question_is_off_topic() {
        let verdict = detector().detect("What's the weather like today?");
        assert!(verdict.is_off_topic);
        assert!(verdict.confidence >= 0.7);
    }

    #[test]
    fn how_it_works_questions_are_on_topic() {
        for text in [
            "How does it work?",
            "Never donated before, how does it work?",
            "How will my money work for the kids?",
            "I've never heard of you, what do you do?",
        ] {
            assert!(!detector().detect(text).is_off_topic, "{text}");
        }
    }

    #[test]
    fn multiple_off_topic_categories_raise_confidence() {
        let verdict = detector().detect("Did you watch the football match and the movie after dinner?");
        assert!(verdict.is_off_topic);
        assert!(verdict.confidence > 0.7);
        assert!(verdict.confidence <= 0.9);
    }

    #[test]
    fn off_topic_category_count_caps_at_point_nine() {
        let verdict = detector()
            .detect("weather, football, movie, dinner, vacation, shopping, my boss and my dog");
        assert!((verdict.confidence - 0.9).abs() < 1e-9);
    }

    #[test]
    fn donation_talk_is_on_topic() {
        let verdict = detector().detect("How will my donation help the children?");
        assert!(!verdict.is_off_topic);
        assert!((verdict.confidence - 0.8).abs() < 1e-9);
    }

    #[test]
    fn context_words_count_as_on_topic() {
        let verdict = detector().detect("Literacy programs really matter to me");
        assert!(!verdict.is_off_topic);
    }

    #[test]
    fn single_off_topic_word_with_context_is_on_topic() {
        let verdict = detector().detect("Does the foundation work in villages?");
        assert!(!verdict.is_off_topic);
    }

    #[test]
    fn scam_question_stays_on_topic() {
        assert!(!detector().detect("Is this a scam?").is_off_topic);
    }

    #[test]
    fn short_unknown_reply_is_assumed_relevant() {
        let verdict = detector().detect("I see.");
        assert!(!verdict.is_off_topic);
        assert!((verdict.confidence - 0.5).abs() < 1e-9);
    }

    #[test]
    fn unmatched_question_is_on_topic() {
        let verdict = detector().detect("Why does that matter so much?");
        assert!(!verdict.is_off_topic);
        assert!((verdict.confidence - 0.6).abs() < 1e-9);
    }

    #[test]
    fn unmatched_statement_is_ambiguous_on_topic() {
        let verdict = detector().detect("My neighbour painted the fence blue yesterday");
        assert!(!verdict.is_off_topic);
        assert_eq!(verdict.reason, "Ambiguous message");
    }

    #[test]
    fn short_context_words_are_ignored() {
        let ctx = DonationContext::new("Aid For All", "art", vec![], "").unwrap();
        let detector = KeywordOffTopicDetector::new(&ctx);
        assert!(detector.context_patterns.is_empty());
    }

    #[test]
    fn factory_builds_context_bound_detector() {
        let ctx = DonationContext::default();
        let detector = KeywordOffTopicDetectorFactory.for_context(&ctx);
        assert!(!detector.detect("Tell me about Bright Futures").is_off_topic);
    }
}
