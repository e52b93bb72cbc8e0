use std::{collections::HashMap, sync::Arc};

use aps_plan::CalendarIndex;
use chrono::{DateTime, Duration, Utc};
use sqlx::PgPool;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};
use uuid::Uuid;

use super::ScoreCache;
use crate::{metrics::record_active_sessions, plan::PlanStatus};

/// State kept for one signed-in user
#[derive(Debug)]
pub struct StudySession {
    pub user_id: Uuid,
    pub scores: ScoreCache,
    /// Index produced by the last build-or-load
    pub calendar: CalendarIndex,
    pub plan_status: Option<PlanStatus>,
    /// Lessons the last build-or-load moved onto today
    pub rolled_over: usize,
    pub started_at: DateTime<Utc>,
    last_seen: DateTime<Utc>,
    ended: bool,
}

impl StudySession {
    pub fn new(user_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            scores: ScoreCache::new(),
            calendar: CalendarIndex::new(),
            plan_status: None,
            rolled_over: 0,
            started_at: now,
            last_seen: now,
            ended: false,
        }
    }

    pub fn touch(&mut self) {
        self.touch_at(Utc::now());
    }

    pub fn touch_at(&mut self, at: DateTime<Utc>) {
        self.last_seen = at;
    }

    pub fn last_seen(&self) -> DateTime<Utc> {
        self.last_seen
    }

    /// Set once the session was signed out, replaced or evicted.
    /// Requests still queued on its lock must not use it.
    pub fn is_ended(&self) -> bool {
        self.ended
    }
}

pub type SharedSession = Arc<Mutex<StudySession>>;

/// All live sessions, keyed by user id
///
/// Lock order is session mutex first, then the map. The map lock is never
/// held while waiting on a session.
#[derive(Clone, Default)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<Uuid, SharedSession>>>,
}

impl SessionRegistry {
    /// Start a fresh session with scores loaded from the store
    ///
    /// Replaces any session the user already had.
    pub async fn sign_in(&self, pool: &PgPool, user_id: Uuid) -> Result<SharedSession, sqlx::Error> {
        let mut session = StudySession::new(user_id);
        session.scores.load(pool, user_id).await?;

        let shared = self.insert(session).await;
        tracing::info!(%user_id, "Study session started");

        Ok(shared)
    }

    /// Register a session, replacing any existing one for the same user
    ///
    /// Waits for a request holding the old session to finish, then marks it
    /// ended so queued requests move to the new one.
    pub async fn insert(&self, session: StudySession) -> SharedSession {
        let user_id = session.user_id;
        let shared = Arc::new(Mutex::new(session));

        let previous = self.lock_existing(user_id).await;

        let mut sessions = self.sessions.write().await;
        if let Some(mut previous) = previous {
            previous.ended = true;
            tracing::debug!(%user_id, "Replaced existing study session");
        }
        sessions.insert(user_id, shared.clone());
        record_active_sessions(sessions.len());

        shared
    }

    pub async fn get(&self, user_id: Uuid) -> Option<SharedSession> {
        self.sessions.read().await.get(&user_id).cloned()
    }

    /// Existing session for the user, or a new one with scores loaded
    pub async fn get_or_start(
        &self,
        pool: &PgPool,
        user_id: Uuid,
    ) -> Result<SharedSession, sqlx::Error> {
        if let Some(existing) = self.get(user_id).await {
            return Ok(existing);
        }

        let mut session = StudySession::new(user_id);
        session.scores.load(pool, user_id).await?;

        // Another request may have started one while we were loading
        let mut sessions = self.sessions.write().await;
        let shared = sessions
            .entry(user_id)
            .or_insert_with(|| Arc::new(Mutex::new(session)))
            .clone();
        record_active_sessions(sessions.len());

        Ok(shared)
    }

    /// Lock the user's session, starting one if needed
    ///
    /// The guard is held for the whole request, which serializes concurrent
    /// requests from the same user.
    pub async fn acquire(
        &self,
        pool: &PgPool,
        user_id: Uuid,
    ) -> Result<OwnedMutexGuard<StudySession>, sqlx::Error> {
        loop {
            let shared = self.get_or_start(pool, user_id).await?;
            let mut guard = shared.lock_owned().await;
            if guard.is_ended() {
                continue;
            }
            guard.touch();
            return Ok(guard);
        }
    }

    /// Lock the user's live session without starting one
    pub async fn lock_existing(&self, user_id: Uuid) -> Option<OwnedMutexGuard<StudySession>> {
        loop {
            let shared = self.get(user_id).await?;
            let guard = shared.lock_owned().await;
            if !guard.is_ended() {
                return Some(guard);
            }
        }
    }

    /// Mark a locked session ended and drop it from the registry
    pub async fn end(&self, mut guard: OwnedMutexGuard<StudySession>) {
        guard.ended = true;
        let user_id = guard.user_id;

        let mut sessions = self.sessions.write().await;
        let current = sessions
            .get(&user_id)
            .is_some_and(|shared| Arc::ptr_eq(shared, OwnedMutexGuard::mutex(&guard)));
        if current {
            sessions.remove(&user_id);
        }
        record_active_sessions(sessions.len());

        tracing::info!(%user_id, "Study session ended");
    }

    /// Drop the user's session once no request holds it. Returns whether one
    /// existed.
    pub async fn sign_out(&self, user_id: Uuid) -> bool {
        match self.lock_existing(user_id).await {
            Some(guard) => {
                self.end(guard).await;
                true
            }
            None => false,
        }
    }

    /// Remove sessions not used for longer than `max_idle`
    ///
    /// Sessions locked by an in-flight request are kept.
    pub async fn evict_idle(&self, max_idle: Duration) -> usize {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();

        sessions.retain(|_, session| match session.try_lock() {
            Ok(mut session) if now - session.last_seen() > max_idle => {
                session.ended = true;
                false
            }
            _ => true,
        });

        record_active_sessions(sessions.len());
        before - sessions.len()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}
