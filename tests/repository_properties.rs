//! Repository behaviour over the in-memory store
//!
//! One test per observable guarantee of the repository: id assignment,
//! ownership links, capped feeds, tag ranking, category membership and
//! the in-place post update path.

mod common;

use std::collections::BTreeSet;

use blogstore::{BlogPost, BlogPostComment, User};
use common::assertions::{assert_scores, assert_titles, assert_unique_ids};
use common::fixtures::{blog_for, memory_repo, post, stored_user};

#[test]
fn stored_users_get_unique_nonzero_ids() {
    let repo = memory_repo();
    let mut users = [User::new("ayende"), User::new("mythz"), User::new("ayende")];
    repo.store_users(&mut users).unwrap();

    let all = repo.get_all_users().unwrap();
    assert_eq!(all.len(), 3);

    let ids: Vec<u64> = all.iter().map(|u| u.id.expect("stored user has id")).collect();
    assert!(ids.iter().all(|id| *id != 0));
    assert_unique_ids(&ids);

    for user in &users {
        assert!(all.iter().any(|u| u.id == user.id && u.name == user.name));
    }
}

#[test]
fn blog_carries_owner_snapshot_and_is_listed_once() {
    let repo = memory_repo();
    let mut owner = stored_user(&repo, "ayende");
    let mut blog = blog_for(&repo, &mut owner);

    // Storing the same blog again must not duplicate the link
    repo.store_blogs(&mut owner, std::slice::from_mut(&mut blog)).unwrap();

    let fetched = repo.get_blogs(&[blog.id.unwrap()]).unwrap();
    assert_eq!(fetched.len(), 1);
    assert_eq!(fetched[0].user_id, owner.id);
    assert_eq!(fetched[0].user_name, "ayende");

    let refetched = repo
        .get_all_users()
        .unwrap()
        .into_iter()
        .find(|u| u.id == owner.id)
        .unwrap();
    assert_eq!(refetched.blog_ids, vec![blog.id.unwrap()]);
}

#[test]
fn owner_rename_does_not_touch_existing_blogs() {
    let repo = memory_repo();
    let mut owner = stored_user(&repo, "ayende");
    let blog = blog_for(&repo, &mut owner);

    owner.name = "oren".to_string();
    repo.store_users(std::slice::from_mut(&mut owner)).unwrap();

    let fetched = repo.get_blogs(&[blog.id.unwrap()]).unwrap().remove(0);
    assert_eq!(fetched.user_name, "ayende");
}

#[test]
fn recent_posts_are_capped_and_newest_first() {
    let repo = memory_repo();
    let mut owner = stored_user(&repo, "mythz");
    let mut blog = blog_for(&repo, &mut owner);

    let mut first: Vec<BlogPost> = (1..=3).map(|i| BlogPost::new(format!("a{i}"))).collect();
    repo.store_new_blog_posts(&mut blog, &mut first).unwrap();
    assert_titles(&repo.get_recent_blog_posts().unwrap(), &["a3", "a2", "a1"]);

    let mut second: Vec<BlogPost> = (1..=4).map(|i| BlogPost::new(format!("b{i}"))).collect();
    repo.store_new_blog_posts(&mut blog, &mut second).unwrap();
    assert_titles(
        &repo.get_recent_blog_posts().unwrap(),
        &["b4", "b3", "b2", "b1", "a3"],
    );
}

#[test]
fn recent_comments_follow_post_then_comment_order() {
    let repo = memory_repo();
    let mut owner = stored_user(&repo, "mythz");
    let mut blog = blog_for(&repo, &mut owner);

    let mut posts = [
        BlogPost::new("RavenDB")
            .with_comment(BlogPostComment::new("r1"))
            .with_comment(BlogPostComment::new("r2")),
        BlogPost::new("Redis")
            .with_comment(BlogPostComment::new("x1"))
            .with_comment(BlogPostComment::new("x2"))
            .with_comment(BlogPostComment::new("x3"))
            .with_comment(BlogPostComment::new("x4")),
    ];
    repo.store_new_blog_posts(&mut blog, &mut posts).unwrap();

    let contents: Vec<String> = repo
        .get_recent_blog_post_comments()
        .unwrap()
        .into_iter()
        .map(|c| c.content)
        .collect();
    assert_eq!(contents, vec!["x4", "x3", "x2", "x1", "r2"]);
}

#[test]
fn tag_ranking_is_additive_across_batches() {
    let batches = |split: bool| {
        let repo = memory_repo();
        let mut owner = stored_user(&repo, "ayende");
        let mut blog = blog_for(&repo, &mut owner);
        let p1 = post("P1", &[], &["NoSQL", "JSON"]);
        let p2 = post("P2", &[], &["NoSQL", "Redis"]);
        let p3 = post("P3", &[], &["JSON", "JSON"]);
        if split {
            repo.store_new_blog_posts(&mut blog, &mut [p1, p2]).unwrap();
            repo.store_new_blog_posts(&mut blog, &mut [p3]).unwrap();
        } else {
            repo.store_new_blog_posts(&mut blog, &mut [p1, p2, p3]).unwrap();
        }
        repo.get_top_tags(10).unwrap()
    };

    let split = batches(true);
    assert_eq!(split, batches(false));
    assert_scores(&split, &[("JSON", 3.0), ("NoSQL", 2.0), ("Redis", 1.0)]);
}

#[test]
fn repeated_tags_rank_ahead_of_single() {
    let repo = memory_repo();
    let mut owner = stored_user(&repo, "ayende");
    let mut blog = blog_for(&repo, &mut owner);

    let mut posts = [post("one", &[], &["A", "A", "B"]), post("two", &[], &["B", "C"])];
    repo.store_new_blog_posts(&mut blog, &mut posts).unwrap();

    let top = repo.get_top_tags(2).unwrap();
    assert_eq!(top.len(), 2);
    assert!(top.iter().all(|(_, score)| *score == 2.0));
    let names: BTreeSet<&str> = top.iter().map(|(tag, _)| tag.as_str()).collect();
    assert_eq!(names, BTreeSet::from(["A", "B"]));

    let all = repo.get_top_tags(3).unwrap();
    assert_eq!(all[2], ("C".to_string(), 1.0));
}

#[test]
fn category_membership_is_a_set() {
    let repo = memory_repo();
    let mut owner = stored_user(&repo, "ayende");
    let mut blog = blog_for(&repo, &mut owner);

    let mut posts = [post("Cassandra", &["X"], &[])];
    repo.store_new_blog_posts(&mut blog, &mut posts).unwrap();
    repo.store_new_blog_posts(&mut blog, &mut posts).unwrap();

    let in_x = repo.get_blog_posts_by_category("X").unwrap();
    assert_eq!(in_x.len(), 1);
    assert_eq!(blog.post_ids, vec![posts[0].id.unwrap()]);
}

#[test]
fn categories_resolve_to_posts() {
    let repo = memory_repo();
    let mut owner = stored_user(&repo, "ayende");
    let mut blog = blog_for(&repo, &mut owner);

    let mut posts = [
        post("RavenDB", &["NoSQL", "DocumentDB"], &[]),
        post("Cassandra", &["NoSQL", "Cluster"], &[]),
    ];
    repo.store_new_blog_posts(&mut blog, &mut posts).unwrap();

    assert_titles(
        &repo.get_blog_posts_by_category("NoSQL").unwrap(),
        &["RavenDB", "Cassandra"],
    );
    assert_titles(&repo.get_blog_posts_by_category("Cluster").unwrap(), &["Cassandra"]);

    let categories = repo.get_all_categories().unwrap();
    assert_eq!(
        categories,
        BTreeSet::from(["NoSQL", "DocumentDB", "Cluster"].map(String::from))
    );
}

#[test]
fn comment_round_trip_through_store_blog_post() {
    let repo = memory_repo();
    let mut owner = stored_user(&repo, "ayende");
    let mut blog = blog_for(&repo, &mut owner);

    let mut posts = [BlogPost::new("RavenDB")
        .with_comment(BlogPostComment::new("First Comment!"))
        .with_comment(BlogPostComment::new("Second Comment!"))];
    repo.store_new_blog_posts(&mut blog, &mut posts).unwrap();
    let id = posts[0].id.unwrap();

    let original = repo.get_blog_post(id).unwrap();
    let mut edited = original.clone();
    edited.comments.push(BlogPostComment::new("Third Comment!"));
    repo.store_blog_post(&edited).unwrap();

    let fetched = repo.get_blog_post(id).unwrap();
    assert_eq!(fetched.comments.len(), original.comments.len() + 1);
    assert_eq!(fetched.comments[..2], original.comments[..]);
    assert_eq!(fetched.comments[2].content, "Third Comment!");
}

#[test]
fn user_blogs_and_blog_posts_resolve_by_id() {
    let repo = memory_repo();
    let mut owner = stored_user(&repo, "mythz");
    let mut blog = blog_for(&repo, &mut owner);
    let mut posts = [post("Redis", &[], &[]), post("Couch Db", &[], &[])];
    repo.store_new_blog_posts(&mut blog, &mut posts).unwrap();

    let blogs = repo.get_user_blogs(&owner).unwrap();
    assert_eq!(blogs.len(), 1);
    assert_titles(&repo.get_posts_of_blog(&blogs[0]).unwrap(), &["Redis", "Couch Db"]);
    assert!(posts.iter().all(|p| p.blog_id == blog.id));
}
