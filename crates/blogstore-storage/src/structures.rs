//! List and ranked-set semantics shared by the backends

use std::cmp::Ordering;
use std::collections::{HashMap, VecDeque};

pub(crate) type List = VecDeque<Vec<u8>>;
pub(crate) type Ranking = HashMap<String, f64>;

/// Keep positions `start..=end`, clamping `end` to the list length
pub(crate) fn trim(list: &mut List, start: usize, end: usize) {
    if start > end || start >= list.len() {
        list.clear();
        return;
    }
    list.truncate(end + 1);
    list.drain(..start);
}

pub(crate) fn increment(ranking: &mut Ranking, member: &str, delta: f64) -> f64 {
    let score = ranking.entry(member.to_string()).or_insert(0.0);
    *score += delta;
    *score
}

pub(crate) fn top_n(ranking: &Ranking, n: usize) -> Vec<(String, f64)> {
    let mut entries: Vec<(String, f64)> = ranking
        .iter()
        .map(|(member, score)| (member.clone(), *score))
        .collect();
    entries.sort_by(|a, b| match b.1.total_cmp(&a.1) {
        Ordering::Equal => a.0.cmp(&b.0),
        other => other,
    });
    entries.truncate(n);
    entries
}
