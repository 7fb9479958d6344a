use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{
    create_user, get_profile, get_user, get_user_by_username, get_users, update_user,
};

pub fn init_users_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_users).post(create_user))
        .route("/profile", get(get_profile))
        .route("/by-username/{username}", get(get_user_by_username))
        .route("/{id}", get(get_user).put(update_user))
}
