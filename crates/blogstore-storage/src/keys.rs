//! Index key namespace
//!
//! Every derived structure the repository maintains is addressed through
//! one of these names. Keep new index keys here so the namespace stays in
//! one place.

/// Ranked set: tag name -> cumulative occurrence count
pub const TAG_CLOUD: &str = "urn:TagCloud";

/// Capped list of post snapshots, newest first
pub const RECENT_POSTS: &str = "urn:BlogPosts:RecentPosts";

/// Capped list of comments, newest first
pub const RECENT_COMMENTS: &str = "urn:BlogPostComment:RecentComments";

/// Set of every category name ever indexed
pub const ALL_CATEGORIES: &str = "urn:Categories";

const CATEGORY_PREFIX: &str = "urn:Category:";

/// Set of post ids filed under `name`
pub fn category(name: &str) -> String {
    format!("{CATEGORY_PREFIX}{name}")
}
