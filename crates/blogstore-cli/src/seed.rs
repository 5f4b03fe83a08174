//! Sample data set: two users, one blog each, four posts

use serde::Serialize;

use blogstore_model::{Blog, BlogPost, BlogPostComment, EntityId, User};
use blogstore_repository::{BlogRepository, Result};
use blogstore_storage::KeyValueStore;

/// Ids created by [`insert_sample_data`]
#[derive(Debug, Serialize)]
pub struct SeedSummary {
    pub users: Vec<EntityId>,
    pub blogs: Vec<EntityId>,
    pub posts: Vec<EntityId>,
}

pub fn insert_sample_data<S: KeyValueStore>(repo: &BlogRepository<S>) -> Result<SeedSummary> {
    let mut users = [User::new("ayende"), User::new("mythz")];
    repo.store_users(&mut users)?;
    let [mut ayende, mut mythz] = users;

    let blog_tags = ["Architecture", ".NET", "Databases"];
    let mut ayende_blog = repo.create_blog(&mut ayende, Blog::with_tags(blog_tags))?;
    let mut mythz_blog = repo.create_blog(&mut mythz, Blog::with_tags(blog_tags))?;

    let mut ayende_posts = [
        BlogPost::new("RavenDB")
            .with_content("A second-generation document database for .NET")
            .with_categories(["NoSQL", "DocumentDB"])
            .with_tags(["Raven", "NoSQL", "JSON", ".NET"])
            .with_comment(BlogPostComment::new("First Comment!"))
            .with_comment(BlogPostComment::new("Second Comment!")),
        BlogPost::new("Cassandra")
            .with_categories(["NoSQL", "Cluster"])
            .with_tags(["Cassandra", "NoSQL", "Scalability", "Hashing"])
            .with_comment(BlogPostComment::new("First Comment!")),
    ];
    repo.store_new_blog_posts(&mut ayende_blog, &mut ayende_posts)?;

    let mut mythz_posts = [
        BlogPost::new("Redis")
            .with_content("An in-memory data structure server")
            .with_categories(["NoSQL", "Cache"])
            .with_tags(["Redis", "NoSQL", "Scalability", "Performance"])
            .with_comment(BlogPostComment::new("First Comment!")),
        BlogPost::new("Couch Db")
            .with_categories(["NoSQL", "DocumentDB"])
            .with_tags(["CouchDb", "NoSQL", "JSON"])
            .with_comment(BlogPostComment::new("First Comment!")),
    ];
    repo.store_new_blog_posts(&mut mythz_blog, &mut mythz_posts)?;

    Ok(SeedSummary {
        users: [&ayende, &mythz].iter().filter_map(|u| u.id).collect(),
        blogs: [&ayende_blog, &mythz_blog].iter().filter_map(|b| b.id).collect(),
        posts: ayende_posts
            .iter()
            .chain(mythz_posts.iter())
            .filter_map(|p| p.id)
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use blogstore_storage::{InMemoryStore, RedbStore};

    #[test]
    fn seed_populates_every_index() {
        let repo = BlogRepository::new(InMemoryStore::new());
        let summary = insert_sample_data(&repo).unwrap();

        assert_eq!(summary.users, vec![1, 2]);
        assert_eq!(summary.blogs, vec![1, 2]);
        assert_eq!(summary.posts, vec![1, 2, 3, 4]);

        let top = repo.get_top_tags(1).unwrap();
        assert_eq!(top, vec![("NoSQL".to_string(), 4.0)]);
        assert_eq!(repo.get_blog_posts_by_category("NoSQL").unwrap().len(), 4);
        assert_eq!(repo.get_recent_blog_post_comments().unwrap().len(), 5);

        let redis = repo.get_blog_post(summary.posts[2]).unwrap();
        assert_eq!(redis.content, "An in-memory data structure server");
    }

    #[test]
    fn seed_into_redb_file() {
        let dir = tempfile::tempdir().unwrap();
        let repo = BlogRepository::new(RedbStore::new(dir.path().join("seed.redb")).unwrap());
        insert_sample_data(&repo).unwrap();

        let titles: Vec<String> = repo
            .get_recent_blog_posts()
            .unwrap()
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(titles, vec!["Couch Db", "Redis", "Cassandra", "RavenDB"]);
    }
}
