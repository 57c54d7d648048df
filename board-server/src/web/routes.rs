//! HTTP route handlers.

use askama::Template;
use axum::body::Bytes;
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use tower_http::services::ServeDir;
use tracing::{debug, error};

use crate::refresh::{Session, Trigger};

use super::dto::*;
use super::state::AppState;
use super::templates::BoardTemplate;

/// Create the application router.
///
/// `static_dir` is the path to the static assets directory.
pub fn create_router(state: AppState, static_dir: &str) -> Router {
    Router::new()
        .route("/", get(board_page))
        .route("/health", get(health))
        .route("/api/trains", get(trains))
        .route("/api/refresh", post(refresh))
        .route("/api/direction", post(change_direction))
        .route("/api/visibility", post(visibility))
        .nest_service("/static", ServeDir::new(static_dir))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

fn board(state: &AppState, session: &Session) -> BoardResponse {
    BoardResponse::from_session(session, state.scheduler.route(), state.scheduler.now())
}

/// The board page.
async fn board_page(State(state): State<AppState>) -> Result<Response, AppError> {
    let session = state.scheduler.session().await;
    let html = BoardTemplate::new(board(&state, &session))
        .render()
        .map_err(|e| AppError::Internal {
            message: format!("Template error: {}", e),
        })?;
    Ok(Html(html).into_response())
}

/// The last published board.
async fn trains(State(state): State<AppState>) -> Json<BoardResponse> {
    let session = state.scheduler.session().await;
    Json(board(&state, &session))
}

/// Refresh now and return the new board.
async fn refresh(State(state): State<AppState>) -> Json<BoardResponse> {
    let session = state.scheduler.refresh(Trigger::Manual).await;
    Json(board(&state, &session))
}

/// Set the direction, or toggle it if the body is empty.
async fn change_direction(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<BoardResponse>, AppError> {
    let direction = if body.iter().all(u8::is_ascii_whitespace) {
        None
    } else {
        let req: DirectionRequest =
            serde_json::from_slice(&body).map_err(|e| AppError::BadRequest {
                message: format!("Invalid direction request: {}", e),
            })?;
        Some(req.direction)
    };

    let session = state.scheduler.set_direction(direction).await;
    Ok(Json(board(&state, &session)))
}

/// The page was hidden or shown.
async fn visibility(
    State(state): State<AppState>,
    Json(req): Json<VisibilityRequest>,
) -> Json<BoardResponse> {
    debug!(visible = req.visible, "visibility changed");
    let session = state.scheduler.set_visible(req.visible).await;
    Json(board(&state, &session))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    Internal { message: String },
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        error!(%status, %message, "request failed");

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::darwin::MockDarwinClient;
    use crate::domain::{Crs, Direction, Route, known_station};
    use crate::engine::EngineConfig;
    use crate::refresh::{
        Clock, MemoryDirectionStore, Scheduler, SchedulerConfig, Session, Upstream,
    };
    use chrono::NaiveDate;
    use std::sync::Arc;

    fn state() -> AppState {
        let route = Route::new(
            known_station(&Crs::parse("TWI").unwrap()).unwrap(),
            known_station(&Crs::parse("WAT").unwrap()).unwrap(),
        );
        let now = NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(9, 50, 0)
            .unwrap();
        let clock: Clock = Arc::new(move || now);
        let source = Upstream::Mock(MockDarwinClient::new("data/mock_boards").unwrap());

        AppState::new(Scheduler::with_clock(
            source,
            route,
            Session::new(Direction::Outbound),
            Arc::new(MemoryDirectionStore::new()),
            EngineConfig::default(),
            SchedulerConfig::default(),
            clock,
        ))
    }

    #[tokio::test]
    async fn refresh_returns_new_board() {
        let state = state();

        let Json(before) = trains(State(state.clone())).await;
        assert!(before.trains.is_empty());
        assert_eq!(before.updated_at, None);

        let Json(after) = refresh(State(state.clone())).await;
        assert_eq!(after.from, "Twickenham");
        assert_eq!(after.to, "London Waterloo");
        assert_eq!(after.trains.len(), 3);
        assert_eq!(after.trains[0].scheduled_departure, "10:00");
        assert_eq!(after.updated_at.as_deref(), Some("09:50:00"));

        state.scheduler.shutdown().await;
    }

    #[tokio::test]
    async fn empty_body_toggles_direction() {
        let state = state();

        let Json(board) = change_direction(State(state.clone()), Bytes::new())
            .await
            .unwrap();
        assert_eq!(board.direction, Direction::Inbound);
        assert_eq!(board.from, "London Waterloo");

        let Json(board) = change_direction(
            State(state.clone()),
            Bytes::from_static(br#"{"direction":"outbound"}"#),
        )
        .await
        .unwrap();
        assert_eq!(board.direction, Direction::Outbound);

        state.scheduler.shutdown().await;
    }

    #[tokio::test]
    async fn bad_direction_is_rejected() {
        let state = state();
        let result = change_direction(
            State(state.clone()),
            Bytes::from_static(br#"{"direction":"sideways"}"#),
        )
        .await;
        assert!(matches!(result, Err(AppError::BadRequest { .. })));

        let response = result.unwrap_err().into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn board_page_renders() {
        let state = state();
        state.scheduler.refresh(Trigger::Manual).await;

        let response = board_page(State(state.clone())).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        state.scheduler.shutdown().await;
    }
}
