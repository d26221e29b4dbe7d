use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::core::blog_post::{BlogPostResponse, CreatePostRequest, UpdatePostRequest};
use crate::error::{ApiError, ErrorResponse};
use crate::middleware::validation::ValidationErrorResponse;
use crate::state::AppState;

fn post_id(id: Result<Path<Uuid>, PathRejection>) -> Result<Uuid, ApiError> {
    id.map(|Path(id)| id).map_err(|rejection| {
        warn!(error = %rejection.body_text(), "Rejected malformed post id");
        ApiError::InvalidId(rejection.body_text())
    })
}

fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload.map(|Json(body)| body).map_err(|rejection| {
        warn!(error = %rejection.body_text(), "Rejected request body");
        ApiError::Validation(ValidationErrorResponse::from_json_error(&rejection.body_text()))
    })
}

#[utoipa::path(
    get,
    path = "/posts",
    responses(
        (status = 200, description = "Every blog post in the collection", body = [BlogPostResponse]),
        (status = 500, description = "Store error", body = ErrorResponse)
    ),
    tag = "posts"
)]
pub async fn list_posts(State(state): State<AppState>) -> Result<Json<Vec<BlogPostResponse>>, ApiError> {
    debug!("Listing blog posts");
    let posts = state.store.find().await?;
    info!(count = posts.len(), "Blog posts listed");
    Ok(Json(posts.iter().map(|post| post.serialize()).collect()))
}

#[utoipa::path(
    post,
    path = "/posts",
    request_body = CreatePostRequest,
    responses(
        (status = 201, description = "Blog post created", body = BlogPostResponse),
        (status = 400, description = "Missing required field or malformed JSON", body = ValidationErrorResponse),
        (status = 500, description = "Store error", body = ErrorResponse)
    ),
    tag = "posts"
)]
pub async fn create_post(
    State(state): State<AppState>,
    payload: Result<Json<CreatePostRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let request = json_body(payload)?;
    let new_post = request.into_new_post().map_err(|errors| {
        let fields: Vec<&str> = errors.field_errors().into_keys().collect();
        warn!(?fields, "Blog post creation failed validation");
        ApiError::from(errors)
    })?;

    info!(title = %new_post.title, "Creating new blog post");
    let post = state.store.insert(new_post).await?;
    info!(post_id = %post.id, "Blog post created successfully");

    Ok((StatusCode::CREATED, Json(post.serialize())))
}

#[utoipa::path(
    get,
    path = "/posts/{id}",
    params(
        ("id" = Uuid, Path, description = "Blog post id")
    ),
    responses(
        (status = 200, description = "Blog post found", body = BlogPostResponse),
        (status = 400, description = "Malformed id", body = ErrorResponse),
        (status = 404, description = "Blog post not found", body = ErrorResponse),
        (status = 500, description = "Store error", body = ErrorResponse)
    ),
    tag = "posts"
)]
pub async fn get_post(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<BlogPostResponse>, ApiError> {
    let id = post_id(id)?;
    debug!(post_id = %id, "Getting blog post");

    match state.store.find_by_id(id).await? {
        Some(post) => Ok(Json(post.serialize())),
        None => {
            warn!(post_id = %id, "Blog post not found");
            Err(ApiError::NotFound(id))
        }
    }
}

#[utoipa::path(
    put,
    path = "/posts/{id}",
    params(
        ("id" = Uuid, Path, description = "Blog post id")
    ),
    request_body = UpdatePostRequest,
    responses(
        (status = 204, description = "Blog post updated"),
        (status = 400, description = "Malformed id or body, or body id differs from path id", body = ErrorResponse),
        (status = 404, description = "Blog post not found", body = ErrorResponse),
        (status = 500, description = "Store error", body = ErrorResponse)
    ),
    tag = "posts"
)]
pub async fn update_post(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<UpdatePostRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let id = post_id(id)?;
    let request = json_body(payload)?;

    if let Some(body_id) = request.id.filter(|_| request.conflicts_with(id)) {
        warn!(post_id = %id, body_id = %body_id, "Path id and body id differ");
        return Err(ApiError::IdMismatch { path: id, body: body_id });
    }

    let update = request.into_update();
    if update.is_empty() {
        debug!(post_id = %id, "Update body carries no fields");
    }
    info!(
        post_id = %id,
        title = update.title.is_some(),
        content = update.content.is_some(),
        author = update.author.is_some(),
        "Updating blog post"
    );

    match state.store.update_by_id(id, update).await? {
        Some(_) => {
            info!(post_id = %id, "Blog post updated successfully");
            Ok(StatusCode::NO_CONTENT)
        }
        None => {
            warn!(post_id = %id, "Blog post not found for update");
            Err(ApiError::NotFound(id))
        }
    }
}

#[utoipa::path(
    delete,
    path = "/posts/{id}",
    params(
        ("id" = Uuid, Path, description = "Blog post id")
    ),
    responses(
        (status = 204, description = "Blog post deleted"),
        (status = 400, description = "Malformed id", body = ErrorResponse),
        (status = 404, description = "Blog post not found", body = ErrorResponse),
        (status = 500, description = "Store error", body = ErrorResponse)
    ),
    tag = "posts"
)]
pub async fn delete_post(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let id = post_id(id)?;
    info!(post_id = %id, "Deleting blog post");

    match state.store.delete_by_id(id).await? {
        0 => {
            warn!(post_id = %id, "Blog post not found for deletion");
            Err(ApiError::NotFound(id))
        }
        affected => {
            info!(post_id = %id, affected_rows = affected, "Blog post deleted successfully");
            Ok(StatusCode::NO_CONTENT)
        }
    }
}
