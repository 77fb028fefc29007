use axum::routing::get;
use axum::Router;

use crate::handlers::schools;
use crate::state::AppState;

/// School routes mounted at `/schools`.
///
/// ```text
/// GET    /        -> list_schools
/// POST   /        -> create_school (multipart)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(schools::list_schools).post(schools::create_school))
}
