//! Typed predicates over the post collection.
//!
//! Feed and search queries are described with [`PostFilter`] and translated by
//! the storage adapter. [`PostFilter::matches`] evaluates the same predicate in
//! memory and is the reference semantics for the SQL translation.

use crate::domain::entities::Post;
use chrono::{DateTime, Utc};

/// Which authors' rows a query is restricted to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Authorship {
    Anyone,
    /// `author_id ∈ ids OR retweet_author_id ∈ ids`
    FollowedBy(Vec<String>),
    /// `(author_id = id AND NOT is_retweet) OR retweet_author_id = id`
    Profile(String),
    /// `is_retweet AND (author_id = id OR retweet_author_id = id)`
    RetweetsInvolving(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Visibility {
    Unrestricted,
    /// `public OR author_id ∈ ids OR retweet_author_id ∈ ids`
    PublicOrFollowing(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagPredicate {
    Any,
    /// Post tags intersect the set.
    AnyOf(Vec<String>),
    /// Post tags are a superset of the set.
    AllOf(Vec<String>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PostFilter {
    pub before: DateTime<Utc>,
    pub authorship: Authorship,
    pub visibility: Visibility,
    pub tags: TagPredicate,
    /// Lowercased words; a row matches when its content contains any of them.
    pub words: Vec<String>,
}

impl PostFilter {
    /// Rows strictly older than `cursor`, with no further restriction.
    /// Blocked rows are never matched.
    pub fn before(cursor: DateTime<Utc>) -> Self {
        Self {
            before: cursor,
            authorship: Authorship::Anyone,
            visibility: Visibility::Unrestricted,
            tags: TagPredicate::Any,
            words: Vec::new(),
        }
    }

    pub fn authored_by(mut self, authorship: Authorship) -> Self {
        self.authorship = authorship;
        self
    }

    pub fn visible_via(mut self, following_ids: Vec<String>) -> Self {
        self.visibility = Visibility::PublicOrFollowing(following_ids);
        self
    }

    pub fn tagged(mut self, tags: TagPredicate) -> Self {
        self.tags = tags;
        self
    }

    pub fn containing_any(mut self, words: Vec<String>) -> Self {
        self.words = words.into_iter().map(|w| w.to_lowercase()).collect();
        self
    }

    pub fn matches(&self, post: &Post) -> bool {
        if post.blocked || post.created_at >= self.before {
            return false;
        }

        let by_author = |ids: &[String]| {
            ids.contains(&post.author_id)
                || post
                    .retweet_author_id
                    .as_ref()
                    .is_some_and(|id| ids.contains(id))
        };

        let authored = match &self.authorship {
            Authorship::Anyone => true,
            Authorship::FollowedBy(ids) => by_author(ids),
            Authorship::Profile(target) => {
                (post.author_id == *target && !post.is_retweet)
                    || post.retweet_author_id.as_deref() == Some(target.as_str())
            }
            Authorship::RetweetsInvolving(target) => {
                post.is_retweet
                    && (post.author_id == *target
                        || post.retweet_author_id.as_deref() == Some(target.as_str()))
            }
        };
        if !authored {
            return false;
        }

        let visible = match &self.visibility {
            Visibility::Unrestricted => true,
            Visibility::PublicOrFollowing(ids) => post.public || by_author(ids),
        };
        if !visible {
            return false;
        }

        let tagged = match &self.tags {
            TagPredicate::Any => true,
            TagPredicate::AnyOf(tags) => tags.iter().any(|tag| post.tags.contains(tag)),
            TagPredicate::AllOf(tags) => tags.iter().all(|tag| post.tags.contains(tag)),
        };
        if !tagged {
            return false;
        }

        if self.words.is_empty() {
            return true;
        }
        let content = post.content.to_lowercase();
        self.words.iter().any(|word| content.contains(word.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn post(author: &str, minutes_ago: i64) -> Post {
        Post::new("hello #a".into(), author.into())
            .with_created_at(Utc::now() - Duration::minutes(minutes_ago))
    }

    #[test]
    fn cursor_is_exclusive_and_blocked_never_matches() {
        let p = post("alice", 5);
        assert!(PostFilter::before(Utc::now()).matches(&p));
        assert!(!PostFilter::before(p.created_at).matches(&p));

        let mut blocked = p.clone();
        blocked.blocked = true;
        assert!(!PostFilter::before(Utc::now()).matches(&blocked));
    }

    #[test]
    fn followed_by_matches_author_or_retweeter() {
        let original = post("alice", 5);
        let retweet = Post::new_retweet(&original, "bob");
        let filter =
            PostFilter::before(Utc::now()).authored_by(Authorship::FollowedBy(vec!["bob".into()]));
        assert!(!filter.matches(&original));
        assert!(filter.matches(&retweet));
    }

    #[test]
    fn profile_excludes_retweet_rows_of_own_posts_by_others() {
        let original = post("alice", 5);
        let retweet = Post::new_retweet(&original, "bob");
        let filter = PostFilter::before(Utc::now()).authored_by(Authorship::Profile("alice".into()));
        assert!(filter.matches(&original));
        assert!(!filter.matches(&retweet));

        let bob = PostFilter::before(Utc::now()).authored_by(Authorship::Profile("bob".into()));
        assert!(bob.matches(&retweet));
    }

    #[test]
    fn private_posts_need_following() {
        let private = post("alice", 5).with_visibility(false);
        let stranger = PostFilter::before(Utc::now()).visible_via(vec![]);
        let follower = PostFilter::before(Utc::now()).visible_via(vec!["alice".into()]);
        assert!(!stranger.matches(&private));
        assert!(follower.matches(&private));
    }

    #[test]
    fn tag_predicates() {
        let mut p = post("alice", 5);
        p.tags = vec!["a".into(), "b".into()];
        let any = PostFilter::before(Utc::now()).tagged(TagPredicate::AnyOf(vec!["b".into(), "z".into()]));
        let all = PostFilter::before(Utc::now()).tagged(TagPredicate::AllOf(vec!["a".into(), "z".into()]));
        assert!(any.matches(&p));
        assert!(!all.matches(&p));
    }

    #[test]
    fn words_match_case_insensitively() {
        let mut p = post("alice", 5);
        p.content = "Rust is Fun".into();
        let filter =
            PostFilter::before(Utc::now()).containing_any(vec!["FUN".into(), "boring".into()]);
        assert!(filter.matches(&p));
    }
}
