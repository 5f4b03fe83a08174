//! The blog repository and its index maintenance

use crate::codec::{decode, decode_all, encode};
use crate::{IndexConsistency, RepositoryConfig, RepositoryError, Result};
use blogstore_model::{Blog, BlogPost, BlogPostComment, Entity, EntityId, User};
use blogstore_storage::{keys, KeyValueStore, StorageError, StoreOp};
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Repository over a [`KeyValueStore`]
///
/// Holds no state of its own between calls. Entities passed in by `&mut`
/// are updated in place (ids, owner fields, id lists) so the caller sees
/// what was persisted.
///
/// Concurrent writers are not coordinated here. Two `store_blogs` calls for
/// the same user can each persist a blog-id list missing the other's
/// addition, and concurrent `store_new_blog_posts` calls may trim each
/// other's feed entries. Serialize writes per user externally if that
/// matters.
///
/// Ids and links written into the caller's entities stay set even when the
/// commit aborts; discard those values rather than storing them again.
pub struct BlogRepository<S> {
    store: S,
    config: RepositoryConfig,
}

impl<S: KeyValueStore> BlogRepository<S> {
    /// Repository with the default configuration
    pub fn new(store: S) -> Self {
        Self {
            store,
            config: RepositoryConfig::default(),
        }
    }

    pub fn with_config(store: S, config: RepositoryConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { store, config })
    }

    /// Get a reference to the underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &RepositoryConfig {
        &self.config
    }

    // ========== Users ==========

    /// Assign ids to new users and store them all
    ///
    /// A failed batch write is reported as `StoreUnavailable`; only the
    /// blog and post writes report `TransactionAborted`.
    pub fn store_users(&self, users: &mut [User]) -> Result<()> {
        let mut entries = Vec::with_capacity(users.len());
        for user in users.iter_mut() {
            let id = self.ensure_id(user)?;
            entries.push((id, encode(user)?));
        }
        self.store
            .put_all(User::TYPE_TAG, &entries)
            .map_err(|err| match err {
                aborted @ StorageError::TransactionAborted(_) => {
                    RepositoryError::StoreUnavailable(aborted)
                }
                other => other.into(),
            })?;
        debug!(count = entries.len(), "stored users");
        Ok(())
    }

    pub fn get_all_users(&self) -> Result<Vec<User>> {
        decode_all(self.store.get_all(User::TYPE_TAG)?)
    }

    // ========== Blogs ==========

    /// Store `blogs` under `owner`
    ///
    /// Each blog gets an id if it has none, and the owner's id and current
    /// name. The owner's blog-id list gains any new ids. Owner and blogs are
    /// committed in one transaction.
    pub fn store_blogs(&self, owner: &mut User, blogs: &mut [Blog]) -> Result<()> {
        let owner_id = owner.id.ok_or(RepositoryError::Unassigned {
            type_tag: User::TYPE_TAG,
        })?;

        for blog in blogs.iter_mut() {
            let blog_id = self.ensure_id(blog)?;
            blog.assign_owner(owner);
            owner.add_blog_id(blog_id);
        }

        let mut ops = Vec::with_capacity(blogs.len() + 1);
        ops.push(StoreOp::put(User::TYPE_TAG, owner_id, encode(owner)?));
        for blog in blogs.iter() {
            ops.push(put_op(blog)?);
        }
        self.commit(ops)?;

        debug!(user_id = owner_id, count = blogs.len(), "stored blogs");
        Ok(())
    }

    /// Store a single new blog for `owner` and return it with its id
    pub fn create_blog(&self, owner: &mut User, blog: Blog) -> Result<Blog> {
        let mut blogs = [blog];
        self.store_blogs(owner, &mut blogs)?;
        let [blog] = blogs;
        Ok(blog)
    }

    /// Blogs for `ids`, in request order; ids that don't resolve are skipped
    pub fn get_blogs(&self, ids: &[EntityId]) -> Result<Vec<Blog>> {
        decode_all(self.store.get_by_ids(Blog::TYPE_TAG, ids)?)
    }

    pub fn get_all_blogs(&self) -> Result<Vec<Blog>> {
        decode_all(self.store.get_all(Blog::TYPE_TAG)?)
    }

    pub fn get_user_blogs(&self, user: &User) -> Result<Vec<Blog>> {
        self.get_blogs(&user.blog_ids)
    }

    // ========== Posts ==========

    /// Posts for `ids`, in request order; ids that don't resolve are skipped
    pub fn get_blog_posts(&self, ids: &[EntityId]) -> Result<Vec<BlogPost>> {
        decode_all(self.store.get_by_ids(BlogPost::TYPE_TAG, ids)?)
    }

    pub fn get_posts_of_blog(&self, blog: &Blog) -> Result<Vec<BlogPost>> {
        self.get_blog_posts(&blog.post_ids)
    }

    /// Store `posts` under `blog` and index them
    ///
    /// For each post in order: assign an id if needed, attach it to `blog`,
    /// prepend it to the recent-posts feed and its comments to the
    /// recent-comments feed, count its tags (repeats count again), and file
    /// it under each of its categories. The feeds are then trimmed to the
    /// configured capacity and the blog and posts are committed.
    ///
    /// With [`IndexConsistency::Atomic`] all of the above is one
    /// transaction. With [`IndexConsistency::BestEffort`] the index writes
    /// land first and stay even if the final commit aborts.
    pub fn store_new_blog_posts(&self, blog: &mut Blog, posts: &mut [BlogPost]) -> Result<()> {
        let blog_id = blog.id.ok_or(RepositoryError::Unassigned {
            type_tag: Blog::TYPE_TAG,
        })?;

        let mut index_ops = Vec::new();
        for post in posts.iter_mut() {
            let post_id = self.ensure_id(post)?;
            post.blog_id = Some(blog_id);
            blog.add_post_id(post_id);
            index_ops.extend(index_ops_for(post, post_id)?);
        }

        let last = self.config.recent_feed_capacity - 1;
        index_ops.push(StoreOp::list_trim(keys::RECENT_POSTS, 0, last));
        index_ops.push(StoreOp::list_trim(keys::RECENT_COMMENTS, 0, last));

        let mut primary_ops = Vec::with_capacity(posts.len() + 1);
        primary_ops.push(put_op(blog)?);
        for post in posts.iter() {
            primary_ops.push(put_op(post)?);
        }

        match self.config.index_consistency {
            IndexConsistency::Atomic => {
                index_ops.extend(primary_ops);
                self.commit(index_ops)?;
            }
            IndexConsistency::BestEffort => {
                for op in index_ops {
                    self.store.apply(op)?;
                }
                self.commit(primary_ops)?;
            }
        }

        debug!(blog_id, count = posts.len(), "stored new blog posts");
        Ok(())
    }

    /// Upsert one post by its existing id
    ///
    /// No indexing happens here: categories or tags added through this
    /// path never reach the category sets or tag ranking, and the recent
    /// feeds keep their earlier snapshot. Use it for in-place edits such as
    /// appending a comment.
    pub fn store_blog_post(&self, post: &BlogPost) -> Result<()> {
        let id = post.id.ok_or(RepositoryError::Unassigned {
            type_tag: BlogPost::TYPE_TAG,
        })?;
        self.store.put(BlogPost::TYPE_TAG, id, &encode(post)?)?;
        debug!(post_id = id, "updated blog post");
        Ok(())
    }

    pub fn get_blog_post(&self, id: EntityId) -> Result<BlogPost> {
        decode(&self.store.get_by_id(BlogPost::TYPE_TAG, id)?)
    }

    /// Append `comment` to a stored post and store it again
    ///
    /// Goes through [`store_blog_post`](Self::store_blog_post), so the
    /// comment does not enter the recent-comments feed.
    pub fn add_comment(&self, post_id: EntityId, comment: BlogPostComment) -> Result<BlogPost> {
        let mut post = self.get_blog_post(post_id)?;
        post.comments.push(comment);
        self.store_blog_post(&post)?;
        Ok(post)
    }

    // ========== Indexes ==========

    /// Recent-posts feed, newest first
    pub fn get_recent_blog_posts(&self) -> Result<Vec<BlogPost>> {
        decode_all(self.store.list_get_all(keys::RECENT_POSTS)?)
    }

    /// Recent-comments feed, newest first
    pub fn get_recent_blog_post_comments(&self) -> Result<Vec<BlogPostComment>> {
        decode_all(self.store.list_get_all(keys::RECENT_COMMENTS)?)
    }

    /// The `n` most frequent tags with their counts, highest first
    pub fn get_top_tags(&self, n: usize) -> Result<Vec<(String, f64)>> {
        Ok(self.store.sorted_set_top_n(keys::TAG_CLOUD, n)?)
    }

    pub fn get_all_categories(&self) -> Result<BTreeSet<String>> {
        Ok(self.store.set_get_all(keys::ALL_CATEGORIES)?)
    }

    /// Posts filed under `category`, by ascending id
    pub fn get_blog_posts_by_category(&self, category: &str) -> Result<Vec<BlogPost>> {
        let members = self.store.set_get_all(&keys::category(category))?;
        let mut ids: Vec<EntityId> = members
            .iter()
            .filter_map(|member| match member.parse() {
                Ok(id) => Some(id),
                Err(_) => {
                    warn!(category, member = %member, "skipping non-numeric category member");
                    None
                }
            })
            .collect();
        ids.sort_unstable();
        self.get_blog_posts(&ids)
    }

    // ========== Helpers ==========

    fn ensure_id<E: Entity>(&self, entity: &mut E) -> Result<EntityId> {
        if let Some(id) = entity.id() {
            return Ok(id);
        }
        let id = self.store.next_id(E::TYPE_TAG)?;
        entity.set_id(id);
        Ok(id)
    }

    /// Queue `ops` in one transaction and commit
    ///
    /// The handle is dropped (and its operations discarded) on every early
    /// return.
    fn commit(&self, ops: Vec<StoreOp>) -> Result<()> {
        let mut txn = self.store.begin_transaction()?;
        for op in ops {
            txn.queue(op);
        }
        let queued = txn.len();
        txn.commit().map_err(|err| {
            warn!(operations = queued, error = %err, "transaction commit failed");
            RepositoryError::TransactionAborted(err)
        })
    }
}

fn put_op<E: Entity + serde::Serialize>(entity: &E) -> Result<StoreOp> {
    let id = entity.id().ok_or(RepositoryError::Unassigned {
        type_tag: E::TYPE_TAG,
    })?;
    Ok(StoreOp::put(E::TYPE_TAG, id, encode(entity)?))
}

/// Feed, tag and category mutations for one post
fn index_ops_for(post: &BlogPost, post_id: EntityId) -> Result<Vec<StoreOp>> {
    let mut ops = Vec::new();

    ops.push(StoreOp::list_prepend(keys::RECENT_POSTS, encode(post)?));
    for comment in &post.comments {
        ops.push(StoreOp::list_prepend(keys::RECENT_COMMENTS, encode(comment)?));
    }

    for tag in &post.tags {
        ops.push(StoreOp::sorted_set_increment(keys::TAG_CLOUD, tag.as_str(), 1.0));
    }

    for category in &post.categories {
        ops.push(StoreOp::set_add(keys::ALL_CATEGORIES, category.as_str()));
        ops.push(StoreOp::set_add(&keys::category(category), post_id.to_string()));
    }

    Ok(ops)
}
