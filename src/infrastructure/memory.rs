use async_trait::async_trait;
use dashmap::DashMap;
use tracing::debug;
use uuid::Uuid;

use crate::core::blog_post::{BlogPost, BlogPostUpdate, NewBlogPost};
use crate::infrastructure::database::{BlogPostStore, StoreError};

/// In-process document store, selected with `memory://`.
#[derive(Debug, Default)]
pub struct MemoryBlogPostStore {
    posts: DashMap<Uuid, BlogPost>,
}

impl MemoryBlogPostStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BlogPostStore for MemoryBlogPostStore {
    async fn insert(&self, post: NewBlogPost) -> Result<BlogPost, StoreError> {
        let post = BlogPost::new(post);
        debug!(post_id = %post.id, "Inserting post into memory store");
        self.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn find(&self) -> Result<Vec<BlogPost>, StoreError> {
        let mut posts: Vec<BlogPost> = self.posts.iter().map(|entry| entry.value().clone()).collect();
        posts.sort_by(|a, b| a.created.cmp(&b.created).then(a.id.cmp(&b.id)));
        Ok(posts)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<BlogPost>, StoreError> {
        Ok(self.posts.get(&id).map(|entry| entry.value().clone()))
    }

    async fn find_one(&self) -> Result<Option<BlogPost>, StoreError> {
        Ok(self
            .posts
            .iter()
            .min_by(|a, b| a.created.cmp(&b.created).then(a.id.cmp(&b.id)))
            .map(|entry| entry.value().clone()))
    }

    async fn update_by_id(&self, id: Uuid, update: BlogPostUpdate) -> Result<Option<BlogPost>, StoreError> {
        Ok(self.posts.get_mut(&id).map(|mut entry| {
            entry.value_mut().apply(&update);
            entry.value().clone()
        }))
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<u64, StoreError> {
        Ok(u64::from(self.posts.remove(&id).is_some()))
    }

    async fn count(&self) -> Result<u64, StoreError> {
        Ok(self.posts.len() as u64)
    }

    async fn drop_all(&self) -> Result<(), StoreError> {
        self.posts.clear();
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
