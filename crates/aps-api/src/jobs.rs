//! Background maintenance tasks.

use std::time::Duration;

use tokio::time::interval;

use crate::session::SessionRegistry;

/// How often idle sessions are looked for
const EVICTION_PERIOD: Duration = Duration::from_secs(300);

/// Start all background jobs
///
/// Returns the join handles so the caller can abort them on shutdown.
pub fn start_background_jobs(
    sessions: SessionRegistry,
    session_idle_minutes: i64,
) -> Vec<tokio::task::JoinHandle<()>> {
    vec![tokio::spawn(idle_session_eviction_job(
        sessions,
        chrono::Duration::minutes(session_idle_minutes),
    ))]
}

async fn idle_session_eviction_job(sessions: SessionRegistry, max_idle: chrono::Duration) {
    let mut interval = interval(EVICTION_PERIOD);

    loop {
        interval.tick().await;

        let evicted = sessions.evict_idle(max_idle).await;
        if evicted > 0 {
            let remaining = sessions.len().await;
            tracing::info!(evicted, remaining, "Evicted idle study sessions");
        } else {
            tracing::debug!("No idle study sessions to evict");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_background_jobs_start_and_abort() {
        let sessions = SessionRegistry::default();

        let handles = start_background_jobs(sessions.clone(), 30);
        assert_eq!(handles.len(), 1);

        for handle in handles {
            handle.abort();
            assert!(handle.await.unwrap_err().is_cancelled());
        }
        assert!(sessions.is_empty().await);
    }

    #[tokio::test]
    async fn test_eviction_job_drops_idle_sessions() {
        let sessions = SessionRegistry::default();
        let mut stale = crate::session::StudySession::new(uuid::Uuid::new_v4());
        stale.touch_at(chrono::Utc::now() - chrono::Duration::hours(3));
        sessions.insert(stale).await;

        let handle = tokio::spawn(idle_session_eviction_job(
            sessions.clone(),
            chrono::Duration::minutes(30),
        ));

        // First tick fires immediately
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(sessions.is_empty().await);

        handle.abort();
    }
}
