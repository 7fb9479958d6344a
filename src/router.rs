use crate::docs::ApiDoc;
use crate::logging::logging_middleware;
use crate::middleware::role::require_controller;
use crate::modules::auth::router::init_auth_router;
use crate::modules::comments::router::init_comments_router;
use crate::modules::discounts::router::{init_discount_types_router, init_discounts_router};
use crate::modules::evaluation_settings::router::init_evaluation_settings_router;
use crate::modules::semesters::router::init_semesters_router;
use crate::modules::supervision::router::{init_supervision_types_router, init_supervisions_router};
use crate::modules::teachers::router::init_teachers_router;
use crate::modules::teaching_duty::router::init_teaching_duty_router;
use crate::modules::teaching_events::router::init_teaching_events_router;
use crate::modules::teaching_groups::router::init_teaching_groups_router;
use crate::modules::users::router::init_users_router;
use crate::state::AppState;
use axum::http::{HeaderValue, Method};
use axum::{Router, middleware};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

pub fn init_router(state: AppState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .nest(
            "/api",
            Router::new()
                .nest("/auth", init_auth_router())
                .nest("/users", init_users_router())
                .nest("/semesters", init_semesters_router())
                .nest("/teachers", init_teachers_router())
                .nest(
                    "/teaching-groups",
                    init_teaching_groups_router().route_layer(middleware::from_fn_with_state(
                        state.clone(),
                        require_controller,
                    )),
                )
                .nest("/teaching-events", init_teaching_events_router())
                .nest("/supervision-types", init_supervision_types_router())
                .nest("/supervisions", init_supervisions_router())
                .nest("/discount-types", init_discount_types_router())
                .nest("/discounts", init_discounts_router())
                .nest("/comments", init_comments_router())
                .nest("/evaluation-settings", init_evaluation_settings_router())
                .nest("/teaching-duty", init_teaching_duty_router()),
        )
        .with_state(state.clone())
        .layer({
            let allowed_origins: Vec<HeaderValue> = state
                .cors_config
                .allowed_origins
                .iter()
                .filter_map(|origin| origin.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(allowed_origins)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::PATCH,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([
                    axum::http::header::AUTHORIZATION,
                    axum::http::header::CONTENT_TYPE,
                    axum::http::header::ACCEPT,
                ])
                .allow_credentials(true)
        })
        .layer(middleware::from_fn(logging_middleware))
}
