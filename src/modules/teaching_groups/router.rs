use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{
    create_group, delete_group, get_group, get_group_members, get_groups, update_group,
};

pub fn init_teaching_groups_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_groups).post(create_group))
        .route("/{id}", get(get_group).put(update_group).delete(delete_group))
        .route("/{id}/members", get(get_group_members))
}
