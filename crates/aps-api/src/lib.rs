pub mod auth;
pub mod config;
pub mod curriculum;
pub mod error;
pub mod jobs;
pub mod metrics;
pub mod middleware;
pub mod plan;
pub mod profile;
pub mod router;
pub mod score;
pub mod session;
pub mod state;
pub mod tracing;
pub mod v1;
pub mod validation;

pub use config::ApiConfig;
pub use state::{ApiState, AuthConfig};
