use std::borrow::Cow;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

/// Nested author document stored with every post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub first_name: String,
    pub last_name: String,
}

impl Author {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }

    /// Display form used in every API response: `"First Last"`.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Merge the supplied name parts, leaving the others untouched.
    pub fn apply(&mut self, update: &AuthorUpdate) {
        if let Some(first_name) = &update.first_name {
            self.first_name = first_name.clone();
        }
        if let Some(last_name) = &update.last_name {
            self.last_name = last_name.clone();
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogPost {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub author: Author,
    pub created: DateTime<Utc>,
}

impl BlogPost {
    /// Assign an id and creation timestamp to a new post
    pub fn new(post: NewBlogPost) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: post.title,
            content: post.content,
            author: post.author,
            created: Utc::now(),
        }
    }

    /// Apply a partial update. `id` and `created` never change.
    pub fn apply(&mut self, update: &BlogPostUpdate) {
        if let Some(title) = &update.title {
            self.title = title.clone();
        }
        if let Some(content) = &update.content {
            self.content = content.clone();
        }
        if let Some(author) = &update.author {
            self.author.apply(author);
        }
    }

    pub fn serialize(&self) -> BlogPostResponse {
        BlogPostResponse {
            id: self.id,
            title: self.title.clone(),
            content: self.content.clone(),
            author: self.author.display_name(),
            created: self.created,
        }
    }
}

/// A post that has passed presence validation but has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBlogPost {
    pub title: String,
    pub content: String,
    pub author: Author,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthorUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlogPostUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
    pub author: Option<AuthorUpdate>,
}

impl BlogPostUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.author.is_none()
    }
}

/// Wire form of a post. Always exactly these five fields.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BlogPostResponse {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    /// Author display string, `"firstName lastName"`
    pub author: String,
    pub created: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthorInput {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Body of `POST /posts`.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct CreatePostRequest {
    #[validate(required(message = "title is required"))]
    pub title: Option<String>,
    #[validate(required(message = "content is required"))]
    pub content: Option<String>,
    #[validate(required(message = "author is required"))]
    pub author: Option<AuthorInput>,
}

impl CreatePostRequest {
    /// Check that every required field is present and build the post to insert.
    pub fn into_new_post(self) -> Result<NewBlogPost, ValidationErrors> {
        let mut errors = match self.validate() {
            Ok(()) => ValidationErrors::new(),
            Err(errors) => errors,
        };

        if let Some(author) = &self.author {
            if author.first_name.is_none() {
                errors.add("author.firstName", required("author.firstName is required"));
            }
            if author.last_name.is_none() {
                errors.add("author.lastName", required("author.lastName is required"));
            }
        }

        match (self.title, self.content, self.author) {
            (
                Some(title),
                Some(content),
                Some(AuthorInput {
                    first_name: Some(first_name),
                    last_name: Some(last_name),
                }),
            ) => Ok(NewBlogPost {
                title,
                content,
                author: Author::new(first_name, last_name),
            }),
            _ => Err(errors),
        }
    }
}

fn required(message: &'static str) -> ValidationError {
    let mut error = ValidationError::new("required");
    error.message = Some(Cow::Borrowed(message));
    error
}

/// Body of `PUT /posts/:id`. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdatePostRequest {
    pub id: Option<Uuid>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub author: Option<AuthorUpdate>,
}

impl UpdatePostRequest {
    /// `true` when the body names a different post than the path.
    pub fn conflicts_with(&self, path_id: Uuid) -> bool {
        matches!(self.id, Some(body_id) if body_id != path_id)
    }

    pub fn into_update(self) -> BlogPostUpdate {
        BlogPostUpdate {
            title: self.title,
            content: self.content,
            author: self.author,
        }
    }
}
