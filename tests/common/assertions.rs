use blogstore::BlogPost;

/// Assert posts carry exactly these titles, in order
pub fn assert_titles(posts: &[BlogPost], expected: &[&str]) {
    let titles: Vec<&str> = posts.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, expected, "Unexpected post titles");
}

/// Assert a tag ranking matches exactly, in order
pub fn assert_scores(ranking: &[(String, f64)], expected: &[(&str, f64)]) {
    let actual: Vec<(&str, f64)> = ranking
        .iter()
        .map(|(tag, score)| (tag.as_str(), *score))
        .collect();
    assert_eq!(actual, expected, "Unexpected tag ranking");
}

/// Assert no id appears twice
pub fn assert_unique_ids(ids: &[u64]) {
    let mut sorted = ids.to_vec();
    sorted.sort_unstable();
    sorted.dedup();
    assert_eq!(sorted.len(), ids.len(), "Duplicate ids in {:?}", ids);
}
