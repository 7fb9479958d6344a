use axum::{Router, routing::get, routing::put};

use crate::modules::discounts::controller::{
    create_discount, create_discount_type, delete_discount, delete_discount_type, get_discount,
    get_discount_types, get_discounts, update_discount, update_discount_type,
};
use crate::state::AppState;

pub fn init_discount_types_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_discount_types).post(create_discount_type))
        .route("/{id}", put(update_discount_type).delete(delete_discount_type))
}

pub fn init_discounts_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_discounts).post(create_discount))
        .route(
            "/{id}",
            get(get_discount).put(update_discount).delete(delete_discount),
        )
}
