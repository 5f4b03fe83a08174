use std::path::Path;

use blogstore::{Blog, BlogPost, BlogRepository, InMemoryStore, KeyValueStore, RedbStore, User};

/// Repository over a fresh in-memory store
pub fn memory_repo() -> BlogRepository<InMemoryStore> {
    BlogRepository::new(InMemoryStore::new())
}

/// Repository over `blog.redb` inside `dir`
pub fn redb_repo(dir: &Path) -> BlogRepository<RedbStore> {
    let store = RedbStore::new(dir.join("blog.redb")).expect("Failed to open redb store");
    BlogRepository::new(store)
}

/// Store a single user and return it with its id
pub fn stored_user<S: KeyValueStore>(repo: &BlogRepository<S>, name: &str) -> User {
    let mut users = [User::new(name)];
    repo.store_users(&mut users).expect("Failed to store user");
    let [user] = users;
    user
}

/// Create a blog for `owner`
pub fn blog_for<S: KeyValueStore>(repo: &BlogRepository<S>, owner: &mut User) -> Blog {
    repo.create_blog(owner, Blog::with_tags(["Architecture", "Databases"]))
        .expect("Failed to create blog")
}

pub fn post(title: &str, categories: &[&str], tags: &[&str]) -> BlogPost {
    BlogPost::new(title)
        .with_categories(categories.iter().copied())
        .with_tags(tags.iter().copied())
}
