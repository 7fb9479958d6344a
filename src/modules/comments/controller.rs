use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;

use crate::middleware::auth::AuthUser;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::comments::model::{Comment, CommentFilterParams, CreateCommentDto};
use crate::modules::comments::service::CommentService;
use crate::modules::teachers::service::TeacherService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

async fn own_teacher_id(state: &AppState, auth_user: &AuthUser) -> Result<i32, AppError> {
    let own = TeacherService::get_teacher_by_user_id(&state.db, auth_user.user_id()?)
        .await?
        .ok_or_else(|| AppError::forbidden("No teacher record for this account"))?;
    Ok(own.id)
}

/// Create a comment; the author is taken from the access token. Teachers
/// may only comment on their own record.
#[utoipa::path(
    post,
    path = "/api/comments",
    request_body = CreateCommentDto,
    responses(
        (status = 201, description = "Comment created", body = Comment),
        (status = 400, description = "Bad request", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Comments"
)]
#[instrument(skip(state, dto))]
pub async fn create_comment(
    auth_user: AuthUser,
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateCommentDto>,
) -> Result<(StatusCode, Json<Comment>), AppError> {
    if !auth_user.is_controller() && own_teacher_id(&state, &auth_user).await? != dto.teacher_id {
        return Err(AppError::forbidden(
            "Teachers can only comment on their own record",
        ));
    }

    let comment = CommentService::create_comment(&state.db, auth_user.user_id()?, dto).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

/// List comments; teachers only see comments on their own record
#[utoipa::path(
    get,
    path = "/api/comments",
    params(
        ("teacher_id" = Option<i32>, Query, description = "Filter by teacher"),
        ("semester_id" = Option<i32>, Query, description = "Filter by semester")
    ),
    responses((status = 200, description = "Comments", body = [Comment])),
    security(("bearer_auth" = [])),
    tag = "Comments"
)]
#[instrument(skip(state))]
pub async fn get_comments(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Query(mut filters): Query<CommentFilterParams>,
) -> Result<Json<Vec<Comment>>, AppError> {
    if !auth_user.is_controller() {
        filters.teacher_id = Some(own_teacher_id(&state, &auth_user).await?);
    }

    let comments = CommentService::get_comments(&state.db, filters).await?;
    Ok(Json(comments))
}

/// Delete a comment; allowed for controllers and for the comment's author
#[utoipa::path(
    delete,
    path = "/api/comments/{id}",
    params(("id" = i32, Path, description = "Comment ID")),
    responses(
        (status = 204, description = "Comment deleted"),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Comment not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Comments"
)]
#[instrument(skip(state))]
pub async fn delete_comment(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    let comment = CommentService::get_comment(&state.db, id)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Comment not found")))?;

    if !auth_user.is_controller() && comment.author_user_id != auth_user.user_id()? {
        return Err(AppError::forbidden(
            "Only controllers or the author can delete a comment",
        ));
    }

    CommentService::delete_comment(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
