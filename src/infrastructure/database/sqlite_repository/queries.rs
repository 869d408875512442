pub(super) const POST_COLUMNS: &str = "id, content, author_id, created_at, public, tags, mentions, media, \
     likes_count, retweets_count, blocked, is_retweet, retweet_author_id, original_post_id";

pub(super) const INSERT_POST: &str = r#"
    INSERT INTO posts (
        id,
        content,
        author_id,
        created_at,
        updated_at,
        public,
        tags,
        mentions,
        media,
        likes_count,
        retweets_count,
        blocked,
        is_retweet,
        retweet_author_id,
        original_post_id
    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)
"#;

pub(super) const SELECT_POST_BY_ID: &str = r#"
    SELECT id, content, author_id, created_at, public, tags, mentions, media,
           likes_count, retweets_count, blocked, is_retweet, retweet_author_id, original_post_id
    FROM posts
    WHERE id = ?1
"#;

pub(super) const INCREMENT_LIKES: &str = r#"
    UPDATE posts
    SET likes_count = MAX(likes_count + ?2, 0),
        updated_at = ?3
    WHERE id = ?1 OR original_post_id = ?1
"#;

pub(super) const INCREMENT_RETWEETS: &str = r#"
    UPDATE posts
    SET retweets_count = MAX(retweets_count + ?2, 0),
        updated_at = ?3
    WHERE id = ?1 OR original_post_id = ?1
"#;

pub(super) const UPDATE_POST_TAGS: &str = r#"
    UPDATE posts SET tags = ?2, updated_at = ?3
    WHERE id = ?1 OR original_post_id = ?1
"#;

pub(super) const UPDATE_POST_CONTENT: &str = r#"
    UPDATE posts SET content = ?2, updated_at = ?3
    WHERE id = ?1 OR original_post_id = ?1
"#;

pub(super) const UPDATE_POST_PUBLIC: &str = r#"
    UPDATE posts SET public = ?2, updated_at = ?3
    WHERE id = ?1 OR original_post_id = ?1
"#;

pub(super) const UPDATE_POST_MEDIA: &str = r#"
    UPDATE posts SET media = ?2, updated_at = ?3
    WHERE id = ?1 OR original_post_id = ?1
"#;

pub(super) const UPDATE_POST_MENTIONS: &str = r#"
    UPDATE posts SET mentions = ?2, updated_at = ?3
    WHERE id = ?1 OR original_post_id = ?1
"#;

pub(super) const UPDATE_POST_BLOCKED: &str = r#"
    UPDATE posts SET blocked = ?2, updated_at = ?3
    WHERE id = ?1 OR original_post_id = ?1
"#;

pub(super) const DELETE_BOOKMARKS_FOR_POST_FAMILY: &str = r#"
    DELETE FROM bookmarks
    WHERE post_id IN (SELECT id FROM posts WHERE id = ?1 OR original_post_id = ?1)
"#;

pub(super) const DELETE_LIKES_FOR_POST: &str = r#"
    DELETE FROM post_likes WHERE post_id = ?1
"#;

pub(super) const DELETE_RETWEETS_FOR_POST: &str = r#"
    DELETE FROM post_retweets WHERE original_post_id = ?1
"#;

pub(super) const DELETE_POST_FAMILY: &str = r#"
    DELETE FROM posts WHERE id = ?1 OR original_post_id = ?1
"#;

pub(super) const SELECT_LIKE: &str = r#"
    SELECT 1 FROM post_likes WHERE post_id = ?1 AND user_id = ?2
"#;

pub(super) const INSERT_LIKE: &str = r#"
    INSERT INTO post_likes (post_id, user_id, created_at)
    VALUES (?1, ?2, ?3)
    ON CONFLICT(post_id, user_id) DO NOTHING
"#;

pub(super) const DELETE_LIKE: &str = r#"
    DELETE FROM post_likes WHERE post_id = ?1 AND user_id = ?2
"#;

pub(super) const SELECT_RETWEET: &str = r#"
    SELECT 1 FROM post_retweets WHERE original_post_id = ?1 AND user_id = ?2
"#;

pub(super) const INSERT_RETWEET: &str = r#"
    INSERT INTO post_retweets (original_post_id, user_id, retweet_post_id, created_at)
    VALUES (?1, ?2, ?3, ?4)
    ON CONFLICT(original_post_id, user_id) DO NOTHING
"#;

pub(super) const DELETE_RETWEET_RETURNING_ROW: &str = r#"
    DELETE FROM post_retweets
    WHERE original_post_id = ?1 AND user_id = ?2
    RETURNING retweet_post_id
"#;

pub(super) const INSERT_BOOKMARK: &str = r#"
    INSERT INTO bookmarks (user_id, post_id, created_at)
    VALUES (?1, ?2, ?3)
    ON CONFLICT(user_id, post_id) DO NOTHING
"#;

pub(super) const DELETE_BOOKMARK: &str = r#"
    DELETE FROM bookmarks
    WHERE user_id = ?1 AND post_id = ?2
"#;

pub(super) const SELECT_BOOKMARKED_POSTS: &str = r#"
    SELECT p.id, p.content, p.author_id, p.created_at, p.public, p.tags, p.mentions, p.media,
           p.likes_count, p.retweets_count, p.blocked, p.is_retweet, p.retweet_author_id,
           p.original_post_id
    FROM bookmarks b
    INNER JOIN posts p ON p.id = b.post_id
    WHERE b.user_id = ?1 AND p.blocked = 0
    ORDER BY b.created_at DESC, b.rowid DESC
    LIMIT ?2 OFFSET ?3
"#;

// Malformed tag lists are replaced by an empty array before unwinding so
// json_each never sees invalid input.
pub(super) const SELECT_TAG_OCCURRENCES: &str = r#"
    SELECT j.value AS tag, p.created_at AS created_at
    FROM posts p,
         json_each(CASE WHEN json_valid(p.tags) AND json_type(p.tags) = 'array'
                        THEN p.tags ELSE '[]' END) j
    WHERE p.blocked = 0
      AND j.type = 'text'
      AND typeof(p.created_at) = 'integer'
"#;
