use axum::{Router, routing::get, routing::put};

use crate::modules::supervision::controller::{
    create_supervision, create_supervision_type, delete_supervision, delete_supervision_type,
    get_supervision, get_supervision_types, get_supervisions, update_supervision,
    update_supervision_type,
};
use crate::state::AppState;

pub fn init_supervision_types_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_supervision_types).post(create_supervision_type))
        .route(
            "/{id}",
            put(update_supervision_type).delete(delete_supervision_type),
        )
}

pub fn init_supervisions_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_supervisions).post(create_supervision))
        .route(
            "/{id}",
            get(get_supervision)
                .put(update_supervision)
                .delete(delete_supervision),
        )
}
