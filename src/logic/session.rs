//! Detection session state machine
//!
//! One slot per login session: Idle -> Analyzing -> Complete, with Aborted
//! covering cancellation and timeout. Only one verdict is ever in flight
//! per session; there is no queue.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use uuid::Uuid;

use crate::error::DetectError;
use crate::logic::verdict::VerdictProvider;
use crate::models::{DetectionResult, MediaKind};
use crate::state::AccountStore;

#[derive(Debug, Clone)]
pub enum SessionState {
    /// No file chosen.
    Idle,
    /// File accepted, verdict pending.
    Analyzing {
        filename: String,
        media_kind: MediaKind,
        run_id: Uuid,
    },
    /// Verdict available.
    Complete(DetectionResult),
    /// Analysis was cancelled or timed out; any in-flight verdict was
    /// discarded.
    Aborted,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Analyzing { .. } => "analyzing",
            Self::Complete(_) => "complete",
            Self::Aborted => "aborted",
        }
    }
}

struct Slot {
    state: SessionState,
    task: Option<tokio::task::JoinHandle<()>>,
}

impl Slot {
    fn idle() -> Self {
        Self {
            state: SessionState::Idle,
            task: None,
        }
    }
}

/// In-memory registry of detection sessions, keyed by login session id.
pub struct DetectionRegistry {
    slots: Arc<Mutex<HashMap<Uuid, Slot>>>,
    analysis_delay: Duration,
    analysis_timeout: Duration,
}

impl DetectionRegistry {
    pub fn new(analysis_delay: Duration, analysis_timeout: Duration) -> Self {
        Self {
            slots: Arc::new(Mutex::new(HashMap::new())),
            analysis_delay,
            analysis_timeout,
        }
    }

    /// Accept a submission and schedule the delayed verdict computation.
    ///
    /// Rejects with `AnalysisInProgress` while a verdict is pending
    /// (single-slot guarantee). A session in `Complete` or `Aborted` rolls
    /// over into a fresh run.
    pub fn submit(
        &self,
        session_id: Uuid,
        user_id: Uuid,
        filename: String,
        media_kind: MediaKind,
        provider: Arc<dyn VerdictProvider>,
        accounts: Arc<AccountStore>,
    ) -> Result<SessionState, DetectError> {
        let run_id = Uuid::new_v4();

        {
            let mut slots = self.slots.lock();
            let slot = slots.entry(session_id).or_insert_with(Slot::idle);
            if matches!(slot.state, SessionState::Analyzing { .. }) {
                return Err(DetectError::AnalysisInProgress);
            }
            slot.state = SessionState::Analyzing {
                filename: filename.clone(),
                media_kind,
                run_id,
            };
        }

        tracing::debug!(
            "Analysis started: session={} file={} kind={}",
            session_id,
            filename,
            media_kind.as_str()
        );

        let slots = Arc::clone(&self.slots);
        let delay = self.analysis_delay;
        let deadline = self.analysis_timeout;
        let task_filename = filename.clone();
        let handle = tokio::spawn(async move {
            // The sleep stands in for the analysis itself; no bytes are
            // ever inspected.
            if tokio::time::timeout(deadline, tokio::time::sleep(delay))
                .await
                .is_err()
            {
                abort_run(&slots, session_id, run_id);
                return;
            }

            let result = provider.evaluate(&task_filename, media_kind);
            finish(&slots, session_id, user_id, run_id, result, &accounts);
        });

        let mut slots = self.slots.lock();
        if let Some(slot) = slots.get_mut(&session_id) {
            slot.task = Some(handle);
            Ok(slot.state.clone())
        } else {
            // Session was torn down between the two lock scopes.
            handle.abort();
            Err(DetectError::NoActiveAnalysis)
        }
    }

    /// Cancel the in-flight analysis. Only meaningful while `Analyzing`.
    pub fn cancel(&self, session_id: Uuid) -> Result<SessionState, DetectError> {
        let mut slots = self.slots.lock();
        let slot = slots
            .get_mut(&session_id)
            .ok_or(DetectError::NoActiveAnalysis)?;

        if !matches!(slot.state, SessionState::Analyzing { .. }) {
            return Err(DetectError::NoActiveAnalysis);
        }

        if let Some(task) = slot.task.take() {
            task.abort();
        }
        slot.state = SessionState::Aborted;
        tracing::debug!("Analysis cancelled: session={}", session_id);
        Ok(slot.state.clone())
    }

    /// Discard any stored result and return to `Idle`.
    pub fn reset(&self, session_id: Uuid) -> SessionState {
        let mut slots = self.slots.lock();
        let slot = slots.entry(session_id).or_insert_with(Slot::idle);
        if let Some(task) = slot.task.take() {
            task.abort();
        }
        slot.state = SessionState::Idle;
        SessionState::Idle
    }

    /// Current state of a session's slot.
    pub fn snapshot(&self, session_id: Uuid) -> SessionState {
        self.slots
            .lock()
            .get(&session_id)
            .map(|slot| slot.state.clone())
            .unwrap_or(SessionState::Idle)
    }

    /// Tear down a session's slot entirely (logout, expiry).
    pub fn remove(&self, session_id: Uuid) {
        if let Some(mut slot) = self.slots.lock().remove(&session_id) {
            if let Some(task) = slot.task.take() {
                task.abort();
            }
        }
    }
}

fn finish(
    slots: &Mutex<HashMap<Uuid, Slot>>,
    session_id: Uuid,
    user_id: Uuid,
    run_id: Uuid,
    result: DetectionResult,
    accounts: &AccountStore,
) {
    let mut slots = slots.lock();
    let Some(slot) = slots.get_mut(&session_id) else {
        return;
    };

    match &slot.state {
        SessionState::Analyzing { run_id: current, .. } if *current == run_id => {
            tracing::info!(
                "Analysis complete: session={} file={} verdict={} confidence={}",
                session_id,
                result.filename,
                result.verdict.as_str(),
                result.confidence
            );
            accounts.record_detection(user_id, result.clone());
            slot.state = SessionState::Complete(result);
            slot.task = None;
        }
        // The run was cancelled or superseded; its verdict is discarded.
        _ => {}
    }
}

fn abort_run(slots: &Mutex<HashMap<Uuid, Slot>>, session_id: Uuid, run_id: Uuid) {
    let mut slots = slots.lock();
    let Some(slot) = slots.get_mut(&session_id) else {
        return;
    };

    if let SessionState::Analyzing { run_id: current, .. } = &slot.state {
        if *current == run_id {
            tracing::warn!("Analysis timed out: session={}", session_id);
            slot.state = SessionState::Aborted;
            slot.task = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::verdict::MockVerdictProvider;
    use crate::models::{SubscriptionPlan, UserRole, Verdict};

    fn registry(delay_ms: u64, timeout_ms: u64) -> Arc<DetectionRegistry> {
        Arc::new(DetectionRegistry::new(
            Duration::from_millis(delay_ms),
            Duration::from_millis(timeout_ms),
        ))
    }

    fn account() -> (Arc<AccountStore>, Uuid) {
        let accounts = Arc::new(AccountStore::new());
        let user = accounts
            .create("Test User", "test@example.com", "password1", UserRole::User, SubscriptionPlan::Free)
            .unwrap();
        (accounts, user.id)
    }

    fn provider() -> Arc<dyn VerdictProvider> {
        Arc::new(MockVerdictProvider)
    }

    #[tokio::test]
    async fn test_submit_runs_to_completion() {
        let registry = registry(10, 5000);
        let (accounts, user_id) = account();
        let session_id = Uuid::new_v4();

        let state = registry
            .submit(
                session_id,
                user_id,
                "clip.mp4".to_string(),
                MediaKind::Video,
                provider(),
                Arc::clone(&accounts),
            )
            .unwrap();
        assert!(matches!(state, SessionState::Analyzing { .. }));

        tokio::time::sleep(Duration::from_millis(200)).await;

        match registry.snapshot(session_id) {
            SessionState::Complete(result) => {
                assert_eq!(result.filename, "clip.mp4");
                assert_eq!(result.media_kind, MediaKind::Video);
                assert!((65..=99).contains(&result.confidence));
                assert!(matches!(result.verdict, Verdict::Real | Verdict::Deepfake));
            }
            other => panic!("expected Complete, got {:?}", other),
        }

        // Completion lands in the user's history and counter.
        let user = accounts.get(user_id).unwrap();
        assert_eq!(user.detections_made, 1);
        assert_eq!(accounts.history(user_id).len(), 1);
    }

    #[tokio::test]
    async fn test_single_slot_rejects_concurrent_submission() {
        let registry = registry(100, 5000);
        let (accounts, user_id) = account();
        let session_id = Uuid::new_v4();

        registry
            .submit(
                session_id,
                user_id,
                "first.mp4".to_string(),
                MediaKind::Video,
                provider(),
                Arc::clone(&accounts),
            )
            .unwrap();

        let err = registry
            .submit(
                session_id,
                user_id,
                "second.mp4".to_string(),
                MediaKind::Video,
                provider(),
                Arc::clone(&accounts),
            )
            .unwrap_err();
        assert_eq!(err, DetectError::AnalysisInProgress);

        tokio::time::sleep(Duration::from_millis(300)).await;

        // Exactly one verdict was computed.
        assert_eq!(accounts.get(user_id).unwrap().detections_made, 1);
        match registry.snapshot(session_id) {
            SessionState::Complete(result) => assert_eq!(result.filename, "first.mp4"),
            other => panic!("expected Complete, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_cancel_discards_inflight_verdict() {
        let registry = registry(150, 5000);
        let (accounts, user_id) = account();
        let session_id = Uuid::new_v4();

        registry
            .submit(
                session_id,
                user_id,
                "clip.mp4".to_string(),
                MediaKind::Video,
                provider(),
                Arc::clone(&accounts),
            )
            .unwrap();

        let state = registry.cancel(session_id).unwrap();
        assert!(matches!(state, SessionState::Aborted));

        // Well past the original delay: the aborted run's verdict must
        // never surface.
        tokio::time::sleep(Duration::from_millis(400)).await;
        assert!(matches!(registry.snapshot(session_id), SessionState::Aborted));
        assert_eq!(accounts.get(user_id).unwrap().detections_made, 0);
    }

    #[tokio::test]
    async fn test_cancel_requires_inflight_analysis() {
        let registry = registry(10, 5000);
        let session_id = Uuid::new_v4();

        assert_eq!(registry.cancel(session_id).unwrap_err(), DetectError::NoActiveAnalysis);

        registry.reset(session_id);
        assert_eq!(registry.cancel(session_id).unwrap_err(), DetectError::NoActiveAnalysis);
    }

    #[tokio::test]
    async fn test_reset_after_complete_yields_idle() {
        let registry = registry(10, 5000);
        let (accounts, user_id) = account();
        let session_id = Uuid::new_v4();

        registry
            .submit(
                session_id,
                user_id,
                "clip.mp4".to_string(),
                MediaKind::Video,
                provider(),
                Arc::clone(&accounts),
            )
            .unwrap();
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(matches!(registry.snapshot(session_id), SessionState::Complete(_)));

        registry.reset(session_id);
        assert!(matches!(registry.snapshot(session_id), SessionState::Idle));
    }

    #[tokio::test]
    async fn test_completed_session_accepts_new_submission() {
        let registry = registry(10, 5000);
        let (accounts, user_id) = account();
        let session_id = Uuid::new_v4();

        registry
            .submit(
                session_id,
                user_id,
                "first.mp4".to_string(),
                MediaKind::Video,
                provider(),
                Arc::clone(&accounts),
            )
            .unwrap();
        tokio::time::sleep(Duration::from_millis(200)).await;

        let state = registry
            .submit(
                session_id,
                user_id,
                "second.jpg".to_string(),
                MediaKind::Image,
                provider(),
                Arc::clone(&accounts),
            )
            .unwrap();
        assert!(matches!(state, SessionState::Analyzing { .. }));

        tokio::time::sleep(Duration::from_millis(200)).await;
        match registry.snapshot(session_id) {
            SessionState::Complete(result) => {
                assert_eq!(result.filename, "second.jpg");
                assert_eq!(result.media_kind, MediaKind::Image);
            }
            other => panic!("expected Complete, got {:?}", other),
        }
        assert_eq!(accounts.get(user_id).unwrap().detections_made, 2);
    }

    #[tokio::test]
    async fn test_timeout_surfaces_as_aborted() {
        // Delay longer than the timeout: the run must abort, not resolve.
        let registry = registry(5000, 20);
        let (accounts, user_id) = account();
        let session_id = Uuid::new_v4();

        registry
            .submit(
                session_id,
                user_id,
                "clip.mp4".to_string(),
                MediaKind::Video,
                provider(),
                Arc::clone(&accounts),
            )
            .unwrap();

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(matches!(registry.snapshot(session_id), SessionState::Aborted));
        assert_eq!(accounts.get(user_id).unwrap().detections_made, 0);
    }

    #[tokio::test]
    async fn test_remove_tears_down_slot() {
        let registry = registry(100, 5000);
        let (accounts, user_id) = account();
        let session_id = Uuid::new_v4();

        registry
            .submit(
                session_id,
                user_id,
                "clip.mp4".to_string(),
                MediaKind::Video,
                provider(),
                Arc::clone(&accounts),
            )
            .unwrap();
        registry.remove(session_id);

        // A removed slot reads as Idle and the aborted run leaves no trace.
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert!(matches!(registry.snapshot(session_id), SessionState::Idle));
        assert_eq!(accounts.get(user_id).unwrap().detections_made, 0);
    }
}
