use std::sync::Arc;

use anyhow::Context;
use aps_plan::Curriculum;
use axum::extract::FromRef;
use sqlx::PgPool;

use crate::{ApiConfig, config::Environment, session::SessionRegistry};

#[derive(Clone)]
pub struct ApiState {
    pub pool: PgPool,
    pub jwt_secret: String,
    pub environment: Environment,
    pub curriculum: Arc<Curriculum>,
    pub sessions: SessionRegistry,
}

impl ApiState {
    pub fn new(config: &ApiConfig, pool: PgPool) -> anyhow::Result<Self> {
        let curriculum = load_curriculum(config.curriculum_path.as_deref())?;

        tracing::info!(
            units = curriculum.units.len(),
            lessons = curriculum.lesson_count(),
            "Curriculum loaded"
        );

        Ok(Self {
            pool,
            jwt_secret: config.jwt_secret.clone(),
            environment: config.env,
            curriculum: Arc::new(curriculum),
            sessions: SessionRegistry::default(),
        })
    }
}

/// Read the curriculum from `path`, or use the bundled one
pub fn load_curriculum(path: Option<&str>) -> anyhow::Result<Curriculum> {
    let Some(path) = path else {
        return Curriculum::bundled().context("bundled curriculum is invalid");
    };

    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read curriculum file {path}"))?;
    Curriculum::from_json(&json).with_context(|| format!("invalid curriculum in {path}"))
}

/// What the `AuthUser` extractor needs from the state
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
}

impl FromRef<ApiState> for AuthConfig {
    fn from_ref(state: &ApiState) -> Self {
        Self {
            jwt_secret: state.jwt_secret.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_bundled_curriculum() {
        let curriculum = load_curriculum(None).unwrap();
        assert!(curriculum.lesson_count() > 0);
    }

    #[test]
    fn test_missing_curriculum_file_names_path() {
        let path = std::env::temp_dir().join("aps-no-such-curriculum.json");
        let path = path.to_str().unwrap();

        let err = load_curriculum(Some(path)).unwrap_err();
        assert!(err.to_string().contains(path));
    }

    #[test]
    fn test_malformed_curriculum_file_names_path() {
        let path = std::env::temp_dir().join(format!("aps-curriculum-{}.json", uuid::Uuid::new_v4()));
        std::fs::write(&path, "{ not json").unwrap();
        let path_str = path.to_str().unwrap();

        let err = load_curriculum(Some(path_str)).unwrap_err();
        std::fs::remove_file(&path).ok();

        assert!(err.to_string().contains(path_str));
        assert!(err.chain().count() >= 2);
    }
}
