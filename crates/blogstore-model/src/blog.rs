use serde::{Deserialize, Serialize};

use crate::{push_unique, Entity, EntityId, User};

/// A blog owned by a single user
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Blog {
    pub id: Option<EntityId>,
    pub user_id: Option<EntityId>,
    /// Owner's name when the blog was stored. Not updated on rename.
    pub user_name: String,
    pub tags: Vec<String>,
    pub post_ids: Vec<EntityId>,
}

impl Blog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tags<I, T>(tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            tags: tags.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Point this blog at `owner`, snapshotting the owner's current name.
    pub fn assign_owner(&mut self, owner: &User) {
        self.user_id = owner.id;
        self.user_name = owner.name.clone();
    }

    /// Returns `false` if the post was already listed.
    pub fn add_post_id(&mut self, post_id: EntityId) -> bool {
        push_unique(&mut self.post_ids, post_id)
    }
}

impl Entity for Blog {
    const TYPE_TAG: &'static str = "Blog";

    fn id(&self) -> Option<EntityId> {
        self.id
    }

    fn set_id(&mut self, id: EntityId) {
        self.id = Some(id);
    }
}
