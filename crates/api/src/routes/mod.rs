pub mod health;
pub mod schools;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /schools                 list (?q, city), create (multipart)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/schools", schools::router())
}
