//! Post management: CRUD with author-only mutation.

use tracing::info;

use crate::entities::Post;
use crate::repositories::SqlitePostStore;
use crate::types::{PostError, PostResult};

/// Partial update; absent fields keep their current value.
#[derive(Debug, Clone, Default)]
pub struct PostChanges {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// Service over the post store. Reads are open; updates and deletes are
/// restricted to the author.
#[derive(Clone)]
pub struct PostService {
    store: SqlitePostStore,
}

impl PostService {
    pub fn new(store: SqlitePostStore) -> Self {
        Self { store }
    }

    pub async fn create_post(
        &self,
        author_id: i64,
        author_public_id: &str,
        title: &str,
        content: &str,
        tags: Vec<String>,
    ) -> PostResult<Post> {
        let post = Post::new(title, content, tags, author_id, author_public_id)?;
        let post = self.store.create(&post).await?;
        info!(post = %post.public_id, author = %post.author, "post created");
        Ok(post)
    }

    pub async fn list_posts(&self) -> PostResult<Vec<Post>> {
        self.store.list_all().await
    }

    pub async fn get_post(&self, public_id: &str) -> PostResult<Post> {
        self.store
            .find_by_public_id(public_id)
            .await?
            .ok_or(PostError::PostNotFound)
    }

    pub async fn update_post(
        &self,
        public_id: &str,
        caller_id: i64,
        changes: PostChanges,
    ) -> PostResult<Post> {
        let mut post = self.get_post(public_id).await?;
        if !post.is_author(caller_id) {
            return Err(PostError::Forbidden);
        }

        if let Some(title) = changes.title.as_deref() {
            post.update_title(title)?;
        }
        if let Some(content) = changes.content.as_deref() {
            post.update_content(content)?;
        }
        if let Some(tags) = changes.tags {
            post.set_tags(tags);
        }

        let post = self.store.update(&post).await?;
        info!(post = %post.public_id, "post updated");
        Ok(post)
    }

    pub async fn delete_post(&self, public_id: &str, caller_id: i64) -> PostResult<()> {
        let post = self.get_post(public_id).await?;
        if !post.is_author(caller_id) {
            return Err(PostError::Forbidden);
        }

        self.store.delete(post.id).await?;
        info!(post = %post.public_id, "post deleted");
        Ok(())
    }
}
