//! HTTP request handlers for the Pension Engine API.
//!
//! This module contains the handler functions for all API endpoints.

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{
    calculate_contribution_burden, calculate_pension_report, project_pension_report,
    seek_required_base,
};
use crate::config::{ConfigLoader, ReferenceOverlay};
use crate::error::{EngineError, EngineResult};
use crate::models::{PensionReport, YearMonth};

use super::request::{BurdenRequest, CalculationRequest, GoalSeekRequest};
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/calculate", post(calculate_handler))
        .route("/goal-seek", post(goal_seek_handler))
        .route("/burden", post(burden_handler))
        .with_state(state)
}

/// Handler for POST /calculate.
///
/// Returns the full pension report for the submitted history.
async fn calculate_handler(
    State(state): State<AppState>,
    payload: Result<Json<CalculationRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing calculation request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    match perform_calculation(&request, state.config()) {
        Ok(report) => {
            info!(
                correlation_id = %correlation_id,
                calculation_id = %report.calculation_id,
                records = request.history.records.len(),
                pension = %report.pension.amount,
                duration_us = report.audit_trace.duration_us,
                "Calculation completed successfully"
            );
            json_response(StatusCode::OK, &report)
        }
        Err(err) => engine_error_response(correlation_id, err),
    }
}

/// Handler for POST /goal-seek.
async fn goal_seek_handler(
    State(state): State<AppState>,
    payload: Result<Json<GoalSeekRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing goal-seek request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let result = seek_required_base(
        request.target_pension,
        request.total_weeks,
        request.last_ten_years_sum,
        request.last_ten_years_months,
        request.liquidation_year,
        state.config().tables(),
    );

    match result {
        Ok(horizons) => {
            info!(
                correlation_id = %correlation_id,
                feasible_horizons = horizons.iter().filter(|h| h.feasible).count(),
                "Goal seek completed successfully"
            );
            json_response(StatusCode::OK, &horizons)
        }
        Err(err) => engine_error_response(correlation_id, err),
    }
}

/// Handler for POST /burden.
async fn burden_handler(payload: Result<Json<BurdenRequest>, JsonRejection>) -> Response {
    let correlation_id = Uuid::new_v4();

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    if request.base < Decimal::ZERO {
        let err = EngineError::InvalidInput {
            field: "base".to_string(),
            message: "must not be negative".to_string(),
        };
        return engine_error_response(correlation_id, err);
    }

    json_response(StatusCode::OK, &calculate_contribution_burden(request.base))
}

/// Runs the report, extrapolating the tables first when the request asks
/// for a projection.
fn perform_calculation(
    request: &CalculationRequest,
    config: &ConfigLoader,
) -> EngineResult<PensionReport> {
    let as_of = request.as_of.unwrap_or_else(|| Utc::now().date_naive());
    let tables = config.tables();

    match request.projection {
        Some(assumptions) => {
            let overlay = ReferenceOverlay::extrapolate(
                tables,
                YearMonth::from_date(request.liquidation_date),
                assumptions,
            )?;
            project_pension_report(
                &request.history,
                &request.applicant,
                request.liquidation_date,
                as_of,
                tables,
                &overlay,
            )
        }
        None => calculate_pension_report(
            &request.history,
            &request.applicant,
            request.liquidation_date,
            as_of,
            tables,
        ),
    }
}

fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

fn engine_error_response(correlation_id: Uuid, err: EngineError) -> Response {
    warn!(
        correlation_id = %correlation_id,
        error = %err,
        "Calculation failed"
    );
    let api_error: ApiErrorResponse = err.into();
    json_response(api_error.status, &api_error.error)
}

fn rejection_response(correlation_id: Uuid, rejection: JsonRejection) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    json_response(StatusCode::BAD_REQUEST, &error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ContributionBurden, GoalSeekHorizon};
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    fn create_test_state() -> AppState {
        let config = ConfigLoader::load("./config/colombia").expect("Failed to load config");
        AppState::new(config)
    }

    fn post_json(uri: &str, body: impl Into<Body>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(body.into())
            .unwrap()
    }

    async fn body_bytes(response: Response) -> axum::body::Bytes {
        axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
    }

    fn valid_request_body() -> String {
        serde_json::json!({
            "history": {
                "records": [
                    {
                        "employer_id": "860002",
                        "employer_name": "Comercializadora Andina",
                        "start_date": "2000-01-01",
                        "end_date": "2024-06-30",
                        "salary": "2400000",
                        "reported_weeks": "1260",
                        "total_weeks": "1260"
                    }
                ]
            },
            "applicant": { "age": 59, "gender": "female" },
            "liquidation_date": "2024-06-30",
            "as_of": "2024-07-01"
        })
        .to_string()
    }

    #[tokio::test]
    async fn test_calculate_valid_request_returns_200() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(post_json("/calculate", valid_request_body()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response.headers().get("content-type").unwrap();
        assert_eq!(content_type, "application/json");

        let report: PensionReport = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(report.weeks.total_weeks, Decimal::new(1260, 0));
        assert!(report.ibl.value >= Decimal::new(1_300_000, 0));
        assert!(report.pension.amount >= Decimal::new(1_300_000, 0));
        assert!(report.indemnity.applicable);
        assert_eq!(report.audit_trace.steps.len(), 6);
    }

    #[tokio::test]
    async fn test_calculate_malformed_json_returns_400() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(post_json("/calculate", "{invalid json"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ApiError = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(error.code, "MALFORMED_JSON");
    }

    #[tokio::test]
    async fn test_calculate_missing_applicant_returns_validation_error() {
        let router = create_router(create_test_state());
        let body = r#"{ "history": {}, "liquidation_date": "2024-06-30" }"#;

        let response = router.oneshot(post_json("/calculate", body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ApiError = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(error.code, "VALIDATION_ERROR");
        assert!(error.message.contains("applicant"));
    }

    #[tokio::test]
    async fn test_calculate_beyond_tables_returns_price_index_error() {
        let router = create_router(create_test_state());
        let body = serde_json::json!({
            "history": {},
            "applicant": { "age": 50, "gender": "male" },
            "liquidation_date": "2035-01-31",
            "as_of": "2025-01-01"
        })
        .to_string();

        let response = router.oneshot(post_json("/calculate", body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ApiError = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(error.code, "PRICE_INDEX_NOT_FOUND");
        assert!(error.message.contains("2035-01"));
    }

    #[tokio::test]
    async fn test_calculate_with_projection_extends_tables() {
        let router = create_router(create_test_state());
        let body = serde_json::json!({
            "history": {},
            "applicant": { "age": 50, "gender": "male" },
            "liquidation_date": "2035-01-31",
            "as_of": "2025-01-01",
            "projection": { "wage_growth": "0.05", "inflation": "0.04" }
        })
        .to_string();

        let response = router.oneshot(post_json("/calculate", body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let report: PensionReport = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert!(report.ibl.floor_applied);
        assert_eq!(report.pension.amount, report.ibl.value);
    }

    #[tokio::test]
    async fn test_goal_seek_returns_five_horizons() {
        let router = create_router(create_test_state());
        let body = serde_json::json!({
            "target_pension": "1423500",
            "total_weeks": "1300",
            "last_ten_years_sum": "170820000",
            "last_ten_years_months": 120,
            "liquidation_year": 2025
        })
        .to_string();

        let response = router.oneshot(post_json("/goal-seek", body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let horizons: Vec<GoalSeekHorizon> =
            serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(horizons.len(), 5);
        assert!(horizons.iter().all(|h| h.feasible));
        assert_eq!(horizons[0].required_monthly_base, Decimal::new(1_423_500, 0));
    }

    #[tokio::test]
    async fn test_goal_seek_zero_target_returns_invalid_input() {
        let router = create_router(create_test_state());
        let body = serde_json::json!({
            "target_pension": "0",
            "total_weeks": "1300",
            "last_ten_years_sum": "0",
            "last_ten_years_months": 0,
            "liquidation_year": 2025
        })
        .to_string();

        let response = router.oneshot(post_json("/goal-seek", body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ApiError = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(error.code, "INVALID_INPUT");
    }

    #[tokio::test]
    async fn test_burden_split() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(post_json("/burden", r#"{ "base": "2000000" }"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let burden: ContributionBurden =
            serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(burden.total, Decimal::new(580_440, 0));
    }

    #[tokio::test]
    async fn test_burden_negative_base_rejected() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(post_json("/burden", r#"{ "base": "-1" }"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
