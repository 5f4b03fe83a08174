use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Entity, EntityId};

/// A post belonging to a blog
///
/// Comments are embedded; they have no id and are addressed by position.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BlogPost {
    pub id: Option<EntityId>,
    pub blog_id: Option<EntityId>,
    pub title: String,
    pub content: String,
    pub categories: Vec<String>,
    pub tags: Vec<String>,
    pub comments: Vec<BlogPostComment>,
}

impl BlogPost {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn with_categories<I, T>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_tags<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_comment(mut self, comment: BlogPostComment) -> Self {
        self.comments.push(comment);
        self
    }
}

impl Entity for BlogPost {
    const TYPE_TAG: &'static str = "BlogPost";

    fn id(&self) -> Option<EntityId> {
        self.id
    }

    fn set_id(&mut self, id: EntityId) {
        self.id = Some(id);
    }
}

/// A comment embedded in a [`BlogPost`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogPostComment {
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl BlogPostComment {
    /// A comment stamped with the current UTC time
    pub fn new(content: impl Into<String>) -> Self {
        Self::at(content, Utc::now())
    }

    pub fn at(content: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            content: content.into(),
            created_at,
        }
    }
}
