use axum::{Router, routing::delete, routing::get};

use crate::modules::comments::controller::{create_comment, delete_comment, get_comments};
use crate::state::AppState;

pub fn init_comments_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_comments).post(create_comment))
        .route("/{id}", delete(delete_comment))
}
