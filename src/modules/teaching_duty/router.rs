use axum::{Router, routing::get};

use crate::modules::teaching_duty::controller::{
    get_group_overview, get_overview, get_own_balance, get_teacher_balance,
};
use crate::state::AppState;

pub fn init_teaching_duty_router() -> Router<AppState> {
    Router::new()
        .route("/balance", get(get_own_balance))
        .route("/teachers/{id}", get(get_teacher_balance))
        .route("/overview", get(get_overview))
        .route("/groups", get(get_group_overview))
}
