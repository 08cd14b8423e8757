//! GetMetrics - current metrics snapshot without advancing the dialogue.

use crate::domain::foundation::SessionId;
use crate::domain::persuasion::{TurnDeltas, TurnMetrics};

use super::manager::{DialogueError, DialogueManager};

#[derive(Debug, Clone)]
pub struct GetMetricsQuery {
    pub session_id: SessionId,
}

impl DialogueManager {
    /// Deltas are reported as zero.
    pub async fn metrics(&self, query: GetMetricsQuery) -> Result<TurnMetrics, DialogueError> {
        let session = self.load(&query.session_id).await?;
        Ok(session.metrics(TurnDeltas::default()))
    }
}
