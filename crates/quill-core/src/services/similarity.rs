//! Similar-post ranking by shared tags.

use std::cmp::Reverse;
use std::collections::HashSet;

use uuid::Uuid;

use crate::domain::Post;

/// Number of tags `candidate` shares with `tag_ids`.
pub fn shared_tag_count(tag_ids: &HashSet<Uuid>, candidate: &Post) -> usize {
    candidate
        .tags
        .iter()
        .filter(|t| tag_ids.contains(&t.id))
        .count()
}

/// Rank `candidates` against `source`.
///
/// Only published posts other than `source` sharing at least one tag are
/// kept. Order: shared tag count desc, publish desc, id.
pub fn rank_similar(source: &Post, candidates: Vec<Post>, limit: usize) -> Vec<Post> {
    let tag_ids: HashSet<Uuid> = source.tags.iter().map(|t| t.id).collect();
    if tag_ids.is_empty() {
        return Vec::new();
    }

    let mut scored: Vec<(usize, Post)> = candidates
        .into_iter()
        .filter(|p| p.id != source.id && p.is_published())
        .map(|p| (shared_tag_count(&tag_ids, &p), p))
        .filter(|(shared, _)| *shared > 0)
        .collect();

    scored.sort_by_key(|(shared, p)| (Reverse(*shared), Reverse(p.publish), p.id));
    scored.dedup_by_key(|(_, p)| p.id);

    scored.into_iter().take(limit).map(|(_, p)| p).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Tag;
    use chrono::{Duration, Utc};

    fn published(title: &str, tags: &[&Tag], age_days: i64) -> Post {
        Post::new(Uuid::new_v4(), title, "body")
            .with_tags(tags.iter().map(|t| (*t).clone()).collect())
            .published_at(Utc::now() - Duration::days(age_days))
    }

    #[test]
    fn test_more_shared_tags_rank_first_regardless_of_date() {
        let rust = Tag::new("rust");
        let web = Tag::new("web");
        let db = Tag::new("db");

        let source = published("source", &[&rust, &web, &db], 0);
        let old_two = published("old two", &[&rust, &web], 300);
        let new_one = published("new one", &[&db], 1);

        let ranked = rank_similar(&source, vec![new_one.clone(), old_two.clone()], 4);
        let titles: Vec<_> = ranked.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["old two", "new one"]);
    }

    #[test]
    fn test_ties_broken_by_newest_publish() {
        let rust = Tag::new("rust");
        let source = published("source", &[&rust], 0);
        let older = published("older", &[&rust], 10);
        let newer = published("newer", &[&rust], 2);

        let ranked = rank_similar(&source, vec![older, newer], 4);
        assert_eq!(ranked[0].title, "newer");
        assert_eq!(ranked[1].title, "older");
    }

    #[test]
    fn test_excludes_source_drafts_and_unrelated() {
        let rust = Tag::new("rust");
        let go = Tag::new("go");
        let source = published("source", &[&rust], 0);
        let draft = Post::new(Uuid::new_v4(), "draft", "body").with_tags(vec![rust.clone()]);
        let unrelated = published("unrelated", &[&go], 1);

        let ranked = rank_similar(
            &source,
            vec![source.clone(), draft, unrelated],
            4,
        );
        assert!(ranked.is_empty());
    }

    #[test]
    fn test_limit_and_untagged_source() {
        let rust = Tag::new("rust");
        let source = published("source", &[&rust], 0);
        let candidates: Vec<Post> = (1..=6)
            .map(|i| published(&format!("p{i}"), &[&rust], i))
            .collect();

        assert_eq!(rank_similar(&source, candidates.clone(), 4).len(), 4);

        let untagged = published("untagged", &[], 0);
        assert!(rank_similar(&untagged, candidates, 4).is_empty());
    }
}
