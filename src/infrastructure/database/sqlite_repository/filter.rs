use super::queries::POST_COLUMNS;
use crate::domain::post_filter::{Authorship, PostFilter, TagPredicate, Visibility};
use crate::domain::value_objects::PageRequest;
use sqlx::{QueryBuilder, Sqlite};
use std::collections::BTreeSet;

/// Translates a [`PostFilter`] into a paginated `SELECT` over `posts`.
pub(super) fn build_post_query(filter: &PostFilter, page: PageRequest) -> QueryBuilder<'static, Sqlite> {
    let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT ");
    builder.push(POST_COLUMNS);
    builder.push(" FROM posts WHERE blocked = 0 AND created_at < ");
    builder.push_bind(filter.before.timestamp_millis());

    match &filter.authorship {
        Authorship::Anyone => {}
        Authorship::FollowedBy(ids) => {
            builder.push(" AND ");
            push_authored_by_any(&mut builder, ids);
        }
        Authorship::Profile(target) => {
            builder.push(" AND ((author_id = ");
            builder.push_bind(target.clone());
            builder.push(" AND is_retweet = 0) OR retweet_author_id = ");
            builder.push_bind(target.clone());
            builder.push(")");
        }
        Authorship::RetweetsInvolving(target) => {
            builder.push(" AND is_retweet = 1 AND (author_id = ");
            builder.push_bind(target.clone());
            builder.push(" OR retweet_author_id = ");
            builder.push_bind(target.clone());
            builder.push(")");
        }
    }

    if let Visibility::PublicOrFollowing(ids) = &filter.visibility {
        builder.push(" AND (public = 1 OR ");
        push_authored_by_any(&mut builder, ids);
        builder.push(")");
    }

    match &filter.tags {
        TagPredicate::Any => {}
        TagPredicate::AnyOf(tags) if tags.is_empty() => {
            builder.push(" AND 0");
        }
        TagPredicate::AnyOf(tags) => {
            builder.push(
                " AND EXISTS (SELECT 1 FROM json_each(posts.tags) WHERE json_each.value IN (SELECT value FROM json_each(",
            );
            builder.push_bind(json_list(tags));
            builder.push(")))");
        }
        TagPredicate::AllOf(tags) => {
            let wanted: BTreeSet<&String> = tags.iter().collect();
            if !wanted.is_empty() {
                builder.push(
                    " AND (SELECT COUNT(DISTINCT json_each.value) FROM json_each(posts.tags) WHERE json_each.value IN (",
                );
                let mut separated = builder.separated(", ");
                for tag in &wanted {
                    separated.push_bind((*tag).clone());
                }
                builder.push(")) = ");
                builder.push_bind(wanted.len() as i64);
            }
        }
    }

    if !filter.words.is_empty() {
        builder.push(" AND (");
        for (index, word) in filter.words.iter().enumerate() {
            if index > 0 {
                builder.push(" OR ");
            }
            builder.push("instr(lower(content), ");
            builder.push_bind(word.to_lowercase());
            builder.push(") > 0");
        }
        builder.push(")");
    }

    builder.push(" ORDER BY created_at DESC, seq DESC LIMIT ");
    builder.push_bind(i64::from(page.fetch_limit()));
    builder.push(" OFFSET ");
    builder.push_bind(i64::from(page.skip));
    builder
}

fn push_authored_by_any(builder: &mut QueryBuilder<'static, Sqlite>, ids: &[String]) {
    if ids.is_empty() {
        builder.push("0");
        return;
    }
    let ids = json_list(ids);
    builder.push("(author_id IN (SELECT value FROM json_each(");
    builder.push_bind(ids.clone());
    builder.push(")) OR retweet_author_id IN (SELECT value FROM json_each(");
    builder.push_bind(ids);
    builder.push(")))");
}

/// Id lists travel as one JSON array bind so their length never counts
/// against SQLite's host parameter limit.
fn json_list(values: &[String]) -> String {
    serde_json::Value::from(values.to_vec()).to_string()
}
