use axum::{Router, routing::get};

use crate::modules::evaluation_settings::controller::{get_settings, upsert_settings};
use crate::state::AppState;

pub fn init_evaluation_settings_router() -> Router<AppState> {
    Router::new().route("/", get(get_settings).put(upsert_settings))
}
