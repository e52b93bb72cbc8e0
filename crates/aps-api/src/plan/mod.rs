pub mod routes;
pub mod service;

pub use routes::routes;
pub use service::{PlanOutcome, PlanStatus, build_or_load, today};
