use chrono::Utc;
use serde::Serialize;

use crate::types::PostError;

const SUMMARY_LENGTH: usize = 150;

/// A blog post.
///
/// `author` is the author's public identifier; the internal row ids
/// never serialize.
#[derive(Debug, Clone, Serialize)]
pub struct Post {
    /// Database primary key, internal only.
    #[serde(skip_serializing)]
    pub id: i64,
    /// Publicly visible stable identifier.
    pub public_id: String,
    pub title: String,
    pub content: String,
    /// Normalized (trimmed, lowercase) tags.
    pub tags: Vec<String>,
    #[serde(skip_serializing)]
    pub author_id: i64,
    /// Public identifier of the authoring user.
    pub author: String,
    pub created_at: String,
    pub updated_at: String,
}

impl Post {
    /// Build a new, not-yet-persisted post. `id` stays 0 until the store
    /// assigns a row.
    pub fn new(
        title: &str,
        content: &str,
        tags: Vec<String>,
        author_id: i64,
        author: &str,
    ) -> Result<Self, PostError> {
        let title = validate_field("title", title)?;
        let content = validate_field("content", content)?;
        let now = Utc::now().to_rfc3339();

        let mut post = Self {
            id: 0,
            public_id: cuid2::create_id(),
            title,
            content,
            tags: Vec::new(),
            author_id,
            author: author.to_string(),
            created_at: now.clone(),
            updated_at: now,
        };
        post.set_tags(tags);
        Ok(post)
    }

    pub fn update_title(&mut self, new_title: &str) -> Result<(), PostError> {
        self.title = validate_field("title", new_title)?;
        self.touch();
        Ok(())
    }

    pub fn update_content(&mut self, new_content: &str) -> Result<(), PostError> {
        self.content = validate_field("content", new_content)?;
        self.touch();
        Ok(())
    }

    /// Add a normalized tag; duplicates are rejected.
    pub fn add_tag(&mut self, tag: &str) -> Result<(), PostError> {
        let normalized = normalize_tag(tag)
            .ok_or_else(|| PostError::Validation("tag cannot be empty".to_string()))?;

        if self.tags.contains(&normalized) {
            return Err(PostError::Validation(format!(
                "tag \"{normalized}\" already exists"
            )));
        }

        self.tags.push(normalized);
        self.touch();
        Ok(())
    }

    pub fn remove_tag(&mut self, tag: &str) -> Result<(), PostError> {
        let normalized = normalize_tag(tag)
            .ok_or_else(|| PostError::Validation("tag cannot be empty".to_string()))?;

        let before = self.tags.len();
        self.tags.retain(|existing| *existing != normalized);
        if self.tags.len() == before {
            return Err(PostError::Validation(format!(
                "tag \"{normalized}\" not found"
            )));
        }

        self.touch();
        Ok(())
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        normalize_tag(tag)
            .map(|normalized| self.tags.contains(&normalized))
            .unwrap_or(false)
    }

    /// Replace all tags, normalizing and dropping empties.
    pub fn set_tags(&mut self, new_tags: Vec<String>) {
        self.tags = new_tags
            .iter()
            .filter_map(|tag| normalize_tag(tag))
            .collect();
        self.touch();
    }

    pub fn is_author(&self, user_id: i64) -> bool {
        self.author_id == user_id
    }

    /// Leading slice of the content for list views.
    pub fn summary(&self) -> String {
        if self.content.len() <= SUMMARY_LENGTH {
            return self.content.clone();
        }
        let mut cut = SUMMARY_LENGTH;
        while !self.content.is_char_boundary(cut) {
            cut -= 1;
        }
        format!("{}...", self.content[..cut].trim_end())
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now().to_rfc3339();
    }
}

fn validate_field(field: &str, value: &str) -> Result<String, PostError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(PostError::Validation(format!("post {field} cannot be empty")));
    }
    Ok(trimmed.to_string())
}

fn normalize_tag(tag: &str) -> Option<String> {
    let normalized = tag.trim().to_lowercase();
    (!normalized.is_empty()).then_some(normalized)
}
