//! SQLite-backed post store.

use sqlx::{Row, SqlitePool};

use crate::entities::Post;
use crate::types::{PostError, PostResult};

const POST_COLUMNS: &str = "p.id, p.public_id, p.title, p.content, p.tags, \
     p.author_id, u.public_id AS author, p.created_at, p.updated_at";

/// Repository over the `posts` table. Tags persist as a JSON array in a
/// text column; the author's public id is joined in from `users`.
#[derive(Clone)]
pub struct SqlitePostStore {
    pool: SqlitePool,
}

impl SqlitePostStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find_by_public_id(&self, public_id: &str) -> PostResult<Option<Post>> {
        let query = format!(
            "SELECT {POST_COLUMNS} FROM posts p JOIN users u ON u.id = p.author_id \
             WHERE p.public_id = ?"
        );
        let row = sqlx::query(&query)
            .bind(public_id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(map_post_row).transpose()
    }

    /// All posts, newest first.
    pub async fn list_all(&self) -> PostResult<Vec<Post>> {
        let query = format!(
            "SELECT {POST_COLUMNS} FROM posts p JOIN users u ON u.id = p.author_id \
             ORDER BY p.created_at DESC, p.id DESC"
        );
        let rows = sqlx::query(&query).fetch_all(&self.pool).await?;

        rows.into_iter().map(map_post_row).collect()
    }

    pub async fn create(&self, post: &Post) -> PostResult<Post> {
        let tags = serialize_tags(&post.tags)?;

        let result = sqlx::query(
            "INSERT INTO posts (public_id, title, content, tags, author_id, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&post.public_id)
        .bind(&post.title)
        .bind(&post.content)
        .bind(&tags)
        .bind(post.author_id)
        .bind(&post.created_at)
        .bind(&post.updated_at)
        .execute(&self.pool)
        .await?;

        let mut created = post.clone();
        created.id = result.last_insert_rowid();
        Ok(created)
    }

    pub async fn update(&self, post: &Post) -> PostResult<Post> {
        let tags = serialize_tags(&post.tags)?;

        let result = sqlx::query(
            "UPDATE posts SET title = ?, content = ?, tags = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&post.title)
        .bind(&post.content)
        .bind(&tags)
        .bind(&post.updated_at)
        .bind(post.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(PostError::PostNotFound);
        }
        Ok(post.clone())
    }

    pub async fn delete(&self, id: i64) -> PostResult<()> {
        let result = sqlx::query("DELETE FROM posts WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(PostError::PostNotFound);
        }
        Ok(())
    }
}

fn serialize_tags(tags: &[String]) -> PostResult<String> {
    serde_json::to_string(tags).map_err(|error| PostError::Database(error.to_string()))
}

fn map_post_row(row: sqlx::sqlite::SqliteRow) -> PostResult<Post> {
    let tags: String = row.get("tags");
    let tags: Vec<String> =
        serde_json::from_str(&tags).map_err(|error| PostError::Database(error.to_string()))?;

    Ok(Post {
        id: row.get("id"),
        public_id: row.get("public_id"),
        title: row.get("title"),
        content: row.get("content"),
        tags,
        author_id: row.get("author_id"),
        author: row.get("author"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}
