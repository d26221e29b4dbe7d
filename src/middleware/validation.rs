use axum::{
    body::{to_bytes, Body},
    extract::Request,
    http::{Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, error, warn};
use utoipa::ToSchema;
use validator::ValidationErrors;

/// Largest request body the middleware will buffer.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Standard validation error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ValidationErrorResponse {
    pub error: String,
    pub message: String,
    pub validation_errors: HashMap<String, Vec<String>>,
}

impl ValidationErrorResponse {
    pub fn new(errors: ValidationErrors) -> Self {
        let mut validation_errors = HashMap::new();

        for (field, field_errors) in errors.field_errors() {
            let error_messages: Vec<String> = field_errors
                .iter()
                .map(|error| {
                    error
                        .message
                        .as_ref()
                        .map(|msg| msg.to_string())
                        .unwrap_or_else(|| format!("Invalid value for field '{}'", field))
                })
                .collect();
            validation_errors.insert(field.to_string(), error_messages);
        }

        Self {
            error: "VALIDATION_ERROR".to_string(),
            message: "Request validation failed".to_string(),
            validation_errors,
        }
    }

    pub fn from_json_error(error: &str) -> Self {
        let mut validation_errors = HashMap::new();
        validation_errors.insert("json".to_string(), vec![error.to_string()]);

        Self {
            error: "JSON_PARSE_ERROR".to_string(),
            message: "Invalid JSON format".to_string(),
            validation_errors,
        }
    }

    pub fn from_content_type_error() -> Self {
        let mut validation_errors = HashMap::new();
        validation_errors.insert("content_type".to_string(), vec!["Expected application/json".to_string()]);

        Self {
            error: "INVALID_CONTENT_TYPE".to_string(),
            message: "Invalid content type".to_string(),
            validation_errors,
        }
    }
}

impl IntoResponse for ValidationErrorResponse {
    fn into_response(self) -> Response {
        (StatusCode::BAD_REQUEST, Json(self)).into_response()
    }
}

/// Rejects POST/PUT/PATCH requests whose body is not well-formed JSON before
/// they reach a handler.
pub async fn validate_json_middleware(request: Request, next: Next) -> Result<Response, ValidationErrorResponse> {
    let (parts, body) = request.into_parts();

    let should_validate = matches!(parts.method, Method::POST | Method::PUT | Method::PATCH);
    if !should_validate {
        let request = Request::from_parts(parts, body);
        return Ok(next.run(request).await);
    }

    let content_type = parts
        .headers
        .get("content-type")
        .and_then(|ct| ct.to_str().ok())
        .unwrap_or("");

    if !content_type.starts_with("application/json") {
        warn!(path = %parts.uri.path(), content_type = %content_type, "Invalid content type for validation");
        return Err(ValidationErrorResponse::from_content_type_error());
    }

    let body_bytes = match to_bytes(body, MAX_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(e) => {
            error!(error = %e, "Failed to read request body");
            return Err(ValidationErrorResponse::from_json_error("Failed to read request body"));
        }
    };

    if !body_bytes.is_empty() {
        match serde_json::from_slice::<Value>(&body_bytes) {
            Ok(_) => {
                debug!(path = %parts.uri.path(), "JSON syntax validation passed");
            }
            Err(e) => {
                warn!(path = %parts.uri.path(), error = %e, "JSON syntax validation failed");
                return Err(ValidationErrorResponse::from_json_error(&e.to_string()));
            }
        }
    }

    let request = Request::from_parts(parts, Body::from(body_bytes));
    debug!("Request validation middleware passed, proceeding to handler");
    Ok(next.run(request).await)
}
