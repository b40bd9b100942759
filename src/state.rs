//! Shared application state
//!
//! All stores are in-memory and live for the lifetime of the process.
//! State is carried explicitly through the router rather than through
//! ambient globals; per-login state is torn down on logout or expiry.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use parking_lot::RwLock;
use rand::Rng;
use uuid::Uuid;

use crate::config::Config;
use crate::error::AppError;
use crate::logic::session::DetectionRegistry;
use crate::logic::verdict::{MockVerdictProvider, VerdictProvider, AUTHENTIC_DETAILS, DEEPFAKE_DETAILS};
use crate::middleware::auth::SessionContext;
use crate::models::{
    AssistantMessage, DetectionResult, FontSize, MediaKind, SubscriptionPlan, Theme, User,
    UserRole, Verdict, DEMO_ACCOUNTS,
};

/// Seed-only explanation; the verdict provider never produces uncertain
/// results.
const UNCERTAIN_DETAILS: &str =
    "Low confidence in authenticity. Minor anomalies suggest possible tampering.";

/// History entries kept per account.
const HISTORY_CAP: usize = 50;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub provider: Arc<dyn VerdictProvider>,
    pub accounts: Arc<AccountStore>,
    pub sessions: Arc<SessionStore>,
    pub detections: Arc<DetectionRegistry>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let detections = Arc::new(DetectionRegistry::new(
            Duration::from_millis(config.analysis_delay_ms),
            Duration::from_millis(config.analysis_timeout_ms),
        ));

        Self {
            provider: Arc::new(MockVerdictProvider),
            accounts: Arc::new(AccountStore::with_demo_accounts()),
            sessions: Arc::new(SessionStore::new()),
            detections,
            config,
        }
    }
}

struct Account {
    user: User,
    password: String,
    history: Vec<DetectionResult>,
}

/// In-memory account registry.
pub struct AccountStore {
    accounts: RwLock<HashMap<Uuid, Account>>,
}

impl AccountStore {
    pub fn new() -> Self {
        Self {
            accounts: RwLock::new(HashMap::new()),
        }
    }

    /// Registry pre-seeded with the two demo accounts, each carrying the
    /// demo dashboard history and a randomized usage counter.
    pub fn with_demo_accounts() -> Self {
        let store = Self::new();
        let mut rng = rand::thread_rng();

        for demo in &DEMO_ACCOUNTS {
            let mut user = User::new(demo.name, demo.email, demo.role, SubscriptionPlan::Pro);
            user.detections_made = rng.gen_range(0..100);

            store.accounts.write().insert(
                user.id,
                Account {
                    user,
                    password: demo.password.to_string(),
                    history: seed_history(),
                },
            );
        }

        store
    }

    pub fn create(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: UserRole,
        plan: SubscriptionPlan,
    ) -> Result<User, AppError> {
        let mut accounts = self.accounts.write();
        if accounts.values().any(|a| a.user.email == email) {
            return Err(AppError::AlreadyExists("Email already registered".to_string()));
        }

        let user = User::new(name, email, role, plan);
        accounts.insert(
            user.id,
            Account {
                user: user.clone(),
                password: password.to_string(),
                history: Vec::new(),
            },
        );
        Ok(user)
    }

    pub fn authenticate(&self, email: &str, password: &str) -> Result<User, AppError> {
        let accounts = self.accounts.read();
        accounts
            .values()
            .find(|a| a.user.email == email && a.password == password)
            .map(|a| a.user.clone())
            .ok_or(AppError::InvalidCredentials)
    }

    pub fn get(&self, user_id: Uuid) -> Option<User> {
        self.accounts.read().get(&user_id).map(|a| a.user.clone())
    }

    /// Detection history, newest first.
    pub fn history(&self, user_id: Uuid) -> Vec<DetectionResult> {
        self.accounts
            .read()
            .get(&user_id)
            .map(|a| a.history.clone())
            .unwrap_or_default()
    }

    /// Record a completed detection against the account.
    pub fn record_detection(&self, user_id: Uuid, result: DetectionResult) {
        let mut accounts = self.accounts.write();
        if let Some(account) = accounts.get_mut(&user_id) {
            account.history.insert(0, result);
            account.history.truncate(HISTORY_CAP);
            account.user.detections_made += 1;
        }
    }

    pub fn update_profile(
        &self,
        user_id: Uuid,
        name: Option<String>,
        email: Option<String>,
    ) -> Result<User, AppError> {
        let mut accounts = self.accounts.write();

        if let Some(email) = &email {
            if accounts
                .iter()
                .any(|(id, a)| *id != user_id && a.user.email == *email)
            {
                return Err(AppError::AlreadyExists("Email already registered".to_string()));
            }
        }

        let account = accounts
            .get_mut(&user_id)
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        if let Some(name) = name {
            account.user.name = name.trim().to_string();
        }
        if let Some(email) = email {
            account.user.email = email;
        }
        Ok(account.user.clone())
    }

    pub fn update_preferences(
        &self,
        user_id: Uuid,
        theme: Option<Theme>,
        font_size: Option<FontSize>,
    ) -> Result<User, AppError> {
        let mut accounts = self.accounts.write();
        let account = accounts
            .get_mut(&user_id)
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        if let Some(theme) = theme {
            account.user.theme = theme;
        }
        if let Some(font_size) = font_size {
            account.user.font_size = font_size;
        }
        Ok(account.user.clone())
    }

    pub fn count(&self) -> usize {
        self.accounts.read().len()
    }

    /// Total detections recorded across all accounts.
    pub fn total_detections(&self) -> u64 {
        self.accounts
            .read()
            .values()
            .map(|a| a.user.detections_made as u64)
            .sum()
    }
}

impl Default for AccountStore {
    fn default() -> Self {
        Self::new()
    }
}

/// The demo dashboard feed every account starts with.
fn seed_history() -> Vec<DetectionResult> {
    vec![
        seeded("sample_video.mp4", MediaKind::Video, Verdict::Deepfake, 92, DEEPFAKE_DETAILS, 1),
        seeded("image_001.jpg", MediaKind::Image, Verdict::Real, 88, AUTHENTIC_DETAILS, 2),
        seeded("voice_sample.mp3", MediaKind::Audio, Verdict::Uncertain, 65, UNCERTAIN_DETAILS, 3),
    ]
}

fn seeded(
    filename: &str,
    media_kind: MediaKind,
    verdict: Verdict,
    confidence: u8,
    details: &str,
    days_ago: i64,
) -> DetectionResult {
    DetectionResult {
        id: Uuid::new_v4(),
        filename: filename.to_string(),
        media_kind,
        verdict,
        confidence,
        timestamp: Utc::now() - ChronoDuration::days(days_ago),
        details: details.to_string(),
    }
}

struct LoginSession {
    id: Uuid,
    user_id: Uuid,
    role: UserRole,
    expires_at: DateTime<Utc>,
    transcript: Vec<AssistantMessage>,
}

/// Outcome of a bearer-token lookup.
pub enum SessionLookup {
    Active(SessionContext),
    /// Session existed but lapsed; carries the session id so per-session
    /// state can be torn down.
    Expired(Uuid),
    Missing,
}

/// In-memory login sessions, keyed by SHA-256 token hash.
pub struct SessionStore {
    sessions: RwLock<HashMap<String, LoginSession>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Mint an opaque bearer token for the user. Only the token hash is
    /// retained server-side.
    pub fn create(&self, user: &User, ttl_hours: u64) -> String {
        let token = Uuid::new_v4().to_string();
        let token_hash = crate::middleware::auth::hash_token(&token);

        let session = LoginSession {
            id: Uuid::new_v4(),
            user_id: user.id,
            role: user.role,
            expires_at: Utc::now() + ChronoDuration::hours(ttl_hours as i64),
            transcript: Vec::new(),
        };

        self.sessions.write().insert(token_hash, session);
        token
    }

    pub fn resolve(&self, token_hash: &str) -> SessionLookup {
        let mut sessions = self.sessions.write();
        let Some(session) = sessions.get(token_hash) else {
            return SessionLookup::Missing;
        };

        if session.expires_at < Utc::now() {
            let session_id = session.id;
            sessions.remove(token_hash);
            return SessionLookup::Expired(session_id);
        }

        SessionLookup::Active(SessionContext {
            session_id: session.id,
            user_id: session.user_id,
            role: session.role,
            token_hash: token_hash.to_string(),
        })
    }

    /// Drop the session; returns its id for dependent-state teardown.
    pub fn remove(&self, token_hash: &str) -> Option<Uuid> {
        self.sessions.write().remove(token_hash).map(|s| s.id)
    }

    pub fn push_message(&self, token_hash: &str, message: AssistantMessage) {
        let mut sessions = self.sessions.write();
        if let Some(session) = sessions.get_mut(token_hash) {
            session.transcript.push(message);
        }
    }

    pub fn messages(&self, token_hash: &str) -> Vec<AssistantMessage> {
        self.sessions
            .read()
            .get(token_hash)
            .map(|s| s.transcript.clone())
            .unwrap_or_default()
    }

    pub fn clear_messages(&self, token_hash: &str) {
        let mut sessions = self.sessions.write();
        if let Some(session) = sessions.get_mut(token_hash) {
            session.transcript.clear();
        }
    }

    pub fn active_count(&self) -> usize {
        let now = Utc::now();
        self.sessions
            .read()
            .values()
            .filter(|s| s.expires_at >= now)
            .count()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_accounts_are_seeded() {
        let store = AccountStore::with_demo_accounts();
        assert_eq!(store.count(), 2);

        let user = store.authenticate("user@demo.com", "demo1234").unwrap();
        assert_eq!(user.name, "Demo User");
        assert_eq!(user.role, UserRole::User);
        assert_eq!(user.plan, SubscriptionPlan::Pro);
        assert!(user.detections_made < 100);

        let admin = store.authenticate("admin@demo.com", "admin1234").unwrap();
        assert_eq!(admin.role, UserRole::Admin);

        // Seeded history: deepfake, real, uncertain - newest first.
        let history = store.history(user.id);
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].filename, "sample_video.mp4");
        assert_eq!(history[0].verdict, Verdict::Deepfake);
        assert_eq!(history[0].confidence, 92);
        assert_eq!(history[2].verdict, Verdict::Uncertain);
    }

    #[test]
    fn test_authenticate_rejects_bad_credentials() {
        let store = AccountStore::with_demo_accounts();
        assert!(store.authenticate("user@demo.com", "wrong").is_err());
        assert!(store.authenticate("nobody@demo.com", "demo1234").is_err());
    }

    #[test]
    fn test_create_rejects_duplicate_email() {
        let store = AccountStore::with_demo_accounts();
        let err = store
            .create("Dup", "user@demo.com", "password1", UserRole::User, SubscriptionPlan::Free)
            .unwrap_err();
        assert!(matches!(err, AppError::AlreadyExists(_)));
    }

    #[test]
    fn test_record_detection_caps_history() {
        let store = AccountStore::new();
        let user = store
            .create("Test", "t@example.com", "password1", UserRole::User, SubscriptionPlan::Free)
            .unwrap();

        for i in 0..60 {
            store.record_detection(
                user.id,
                seeded(&format!("file_{}.mp4", i), MediaKind::Video, Verdict::Real, 70, AUTHENTIC_DETAILS, 0),
            );
        }

        let history = store.history(user.id);
        assert_eq!(history.len(), HISTORY_CAP);
        assert_eq!(history[0].filename, "file_59.mp4");
        assert_eq!(store.get(user.id).unwrap().detections_made, 60);
    }

    #[test]
    fn test_update_preferences() {
        let store = AccountStore::with_demo_accounts();
        let user = store.authenticate("user@demo.com", "demo1234").unwrap();

        let updated = store
            .update_preferences(user.id, Some(Theme::Light), Some(FontSize::Large))
            .unwrap();
        assert_eq!(updated.theme, Theme::Light);
        assert_eq!(updated.font_size, FontSize::Large);

        // Partial update leaves the other preference alone.
        let updated = store.update_preferences(user.id, Some(Theme::Dark), None).unwrap();
        assert_eq!(updated.theme, Theme::Dark);
        assert_eq!(updated.font_size, FontSize::Large);
    }

    #[test]
    fn test_update_profile_guards_email_uniqueness() {
        let store = AccountStore::with_demo_accounts();
        let user = store.authenticate("user@demo.com", "demo1234").unwrap();

        let err = store
            .update_profile(user.id, None, Some("admin@demo.com".to_string()))
            .unwrap_err();
        assert!(matches!(err, AppError::AlreadyExists(_)));

        let updated = store
            .update_profile(user.id, Some("Renamed".to_string()), None)
            .unwrap();
        assert_eq!(updated.name, "Renamed");
    }

    #[test]
    fn test_session_lifecycle() {
        let store = SessionStore::new();
        let user = User::new("Test", "t@example.com", UserRole::User, SubscriptionPlan::Free);

        let token = store.create(&user, 24);
        let hash = crate::middleware::auth::hash_token(&token);

        match store.resolve(&hash) {
            SessionLookup::Active(ctx) => {
                assert_eq!(ctx.user_id, user.id);
                assert_eq!(ctx.role, UserRole::User);
            }
            _ => panic!("expected active session"),
        }

        assert!(store.remove(&hash).is_some());
        assert!(matches!(store.resolve(&hash), SessionLookup::Missing));
    }

    #[test]
    fn test_expired_session_is_evicted_on_resolve() {
        let store = SessionStore::new();
        let user = User::new("Test", "t@example.com", UserRole::User, SubscriptionPlan::Free);

        // TTL of zero hours expires immediately.
        let token = store.create(&user, 0);
        let hash = crate::middleware::auth::hash_token(&token);

        assert!(matches!(store.resolve(&hash), SessionLookup::Expired(_)));
        assert!(matches!(store.resolve(&hash), SessionLookup::Missing));
    }
}
