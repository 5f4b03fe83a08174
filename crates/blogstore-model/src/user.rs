use serde::{Deserialize, Serialize};

use crate::{push_unique, Entity, EntityId};

/// A blog owner
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct User {
    pub id: Option<EntityId>,
    pub name: String,
    /// Owned blogs in creation order, no duplicates
    pub blog_ids: Vec<EntityId>,
}

impl User {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            blog_ids: Vec::new(),
        }
    }

    /// Record ownership of a blog. Returns `false` if it was already recorded.
    pub fn add_blog_id(&mut self, blog_id: EntityId) -> bool {
        push_unique(&mut self.blog_ids, blog_id)
    }
}

impl Entity for User {
    const TYPE_TAG: &'static str = "User";

    fn id(&self) -> Option<EntityId> {
        self.id
    }

    fn set_id(&mut self, id: EntityId) {
        self.id = Some(id);
    }
}
