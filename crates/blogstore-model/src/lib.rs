//! Blogstore Model - plain entities persisted by the repository
//!
//! Entities carry data only. Anything that needs to fetch a related object
//! (a user's blogs, a blog's posts) is a repository method taking ids.
//!
//! Ids are `Option<u64>`: `None` means "not yet stored". The store assigns
//! ids on first save, starting at 1 per entity type.

mod blog;
mod post;
mod user;

pub use blog::Blog;
pub use post::{BlogPost, BlogPostComment};
pub use user::User;

/// Numeric identifier assigned by the store.
pub type EntityId = u64;

/// An entity with its own id-space in primary storage.
pub trait Entity {
    /// Name of the per-type object space and id sequence.
    const TYPE_TAG: &'static str;

    fn id(&self) -> Option<EntityId>;

    fn set_id(&mut self, id: EntityId);
}

/// Append `id` to `ids` unless it is already present, preserving order.
///
/// Returns `true` if the id was appended.
pub(crate) fn push_unique(ids: &mut Vec<EntityId>, id: EntityId) -> bool {
    if ids.contains(&id) {
        return false;
    }
    ids.push(id);
    true
}
