//! Tag ranking does not depend on how posts are batched

mod common;

use proptest::prelude::*;

use blogstore::BlogPost;
use common::fixtures::{blog_for, memory_repo, stored_user};

fn tag_lists() -> impl Strategy<Value = Vec<Vec<String>>> {
    let tag = prop::sample::select(vec!["NoSQL", "JSON", "Redis", "Raven", "Cache"]);
    prop::collection::vec(prop::collection::vec(tag.prop_map(String::from), 0..5), 1..8)
}

fn ranking_for(batches: &[&[Vec<String>]]) -> Vec<(String, f64)> {
    let repo = memory_repo();
    let mut owner = stored_user(&repo, "ayende");
    let mut blog = blog_for(&repo, &mut owner);
    for batch in batches {
        let mut posts: Vec<BlogPost> = batch
            .iter()
            .map(|tags| BlogPost::new("post").with_tags(tags.iter().cloned()))
            .collect();
        repo.store_new_blog_posts(&mut blog, &mut posts).unwrap();
    }
    repo.get_top_tags(usize::MAX).unwrap()
}

proptest! {
    #[test]
    fn split_batches_give_same_scores(tags in tag_lists(), split in any::<prop::sample::Index>()) {
        let at = split.index(tags.len() + 1);
        let (head, tail) = tags.split_at(at);

        let whole = ranking_for(&[tags.as_slice()]);
        let split = ranking_for(&[head, tail]);
        prop_assert_eq!(&whole, &split);

        let total: f64 = whole.iter().map(|(_, score)| score).sum();
        let expected = tags.iter().map(Vec::len).sum::<usize>() as f64;
        prop_assert_eq!(total, expected);
    }
}
