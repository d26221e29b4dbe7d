use utoipa::OpenApi;

/// OpenAPI document for the blog post API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Blog Post API",
        version = "0.1.0",
        description = "CRUD API over a single collection of blog posts.",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    paths(
        crate::api::posts::list_posts,
        crate::api::posts::create_post,
        crate::api::posts::get_post,
        crate::api::posts::update_post,
        crate::api::posts::delete_post,

        crate::api::health::live,
        crate::api::health::ready,
    ),
    components(
        schemas(
            crate::core::blog_post::BlogPostResponse,
            crate::core::blog_post::CreatePostRequest,
            crate::core::blog_post::UpdatePostRequest,
            crate::core::blog_post::AuthorInput,
            crate::core::blog_post::AuthorUpdate,
            crate::api::health::HealthStatus,
            crate::error::ErrorResponse,
            crate::middleware::validation::ValidationErrorResponse,
        )
    ),
    tags(
        (name = "posts", description = "Blog post collection: list, create, read, update and delete"),
        (name = "health", description = "Liveness and readiness probes"),
    )
)]
pub struct ApiDoc;
