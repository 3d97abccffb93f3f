//! HTTP API module for the Pension Engine.
//!
//! This module exposes the engine over JSON endpoints: the full pension
//! report, the goal-seeking solver and the contribution burden split.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{BurdenRequest, CalculationRequest, GoalSeekRequest};
pub use response::{ApiError, ApiErrorResponse};
pub use state::AppState;
