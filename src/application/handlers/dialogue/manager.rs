//! DialogueManager - per-turn orchestration over the session ports.

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::domain::foundation::{ErrorCode, SessionId, ValidationError};
use crate::domain::persuasion::{
    ArchiveReason, DialogueParams, KeywordOffTopicDetectorFactory, OffTopicDetectorFactory,
    RejectionClassifier, RuleBasedRejectionClassifier, Session, SessionRecord, Speaker,
};
use crate::ports::{
    Exchange, ResponseSynthesizer, SessionArchive, SessionStore, SessionStoreError,
};

/// Number of user/agent exchanges passed to the synthesizer as memory.
pub(crate) const PROMPT_MEMORY: usize = 3;

#[derive(Debug, thiserror::Error)]
pub enum DialogueError {
    #[error("session not found: {0}")]
    SessionNotFound(SessionId),

    #[error("invalid condition: {0}")]
    InvalidCondition(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] SessionStoreError),
}

impl DialogueError {
    pub fn code(&self) -> ErrorCode {
        match self {
            DialogueError::SessionNotFound(_) => ErrorCode::SessionNotFound,
            DialogueError::InvalidCondition(_) => ErrorCode::InvalidCondition,
            DialogueError::Validation(_) => ErrorCode::ValidationFailed,
            DialogueError::Store(_) => ErrorCode::StorageError,
        }
    }
}

/// Owns the collaborators of the dialogue engine. Turns for one session id
/// must be serialized by the caller.
pub struct DialogueManager {
    pub(super) store: Arc<dyn SessionStore>,
    pub(super) archive: Arc<dyn SessionArchive>,
    pub(super) synthesizer: Arc<dyn ResponseSynthesizer>,
    pub(super) classifier: Arc<dyn RejectionClassifier>,
    pub(super) detectors: Arc<dyn OffTopicDetectorFactory>,
    pub(super) params: DialogueParams,
    rng: Mutex<StdRng>,
}

impl DialogueManager {
    pub fn new(
        store: Arc<dyn SessionStore>,
        archive: Arc<dyn SessionArchive>,
        synthesizer: Arc<dyn ResponseSynthesizer>,
    ) -> Self {
        Self {
            store,
            archive,
            synthesizer,
            classifier: Arc::new(RuleBasedRejectionClassifier::new()),
            detectors: Arc::new(KeywordOffTopicDetectorFactory),
            params: DialogueParams::default(),
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    pub fn with_params(mut self, params: DialogueParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_classifier(mut self, classifier: Arc<dyn RejectionClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_detector_factory(mut self, detectors: Arc<dyn OffTopicDetectorFactory>) -> Self {
        self.detectors = detectors;
        self
    }

    /// Makes strategy sampling reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }

    pub fn params(&self) -> &DialogueParams {
        &self.params
    }

    pub(super) fn rng(&self) -> MutexGuard<'_, StdRng> {
        self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub(super) async fn load(&self, id: &SessionId) -> Result<Session, DialogueError> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| DialogueError::SessionNotFound(id.clone()))
    }

    /// Writes an archive record. Failures are logged and swallowed.
    pub(super) async fn archive(&self, session: &Session, reason: ArchiveReason) {
        let record = SessionRecord::from_session(session, reason);
        if let Err(err) = self.archive.append(&record).await {
            tracing::warn!(
                session_id = %session.id(),
                reason = %reason,
                error = %err,
                "failed to archive session"
            );
        }
    }
}

/// Pairs each user message with the agent reply that followed it and keeps
/// the most recent `limit` pairs.
pub(crate) fn recent_exchanges(session: &Session, limit: usize) -> Vec<Exchange> {
    let exchanges: Vec<Exchange> = session
        .history()
        .windows(2)
        .filter(|pair| pair[0].speaker == Speaker::User && pair[1].speaker == Speaker::Agent)
        .map(|pair| Exchange {
            user: pair[0].text.clone(),
            agent: pair[1].text.clone(),
        })
        .collect();
    let skip = exchanges.len().saturating_sub(limit);
    exchanges.into_iter().skip(skip).collect()
}
