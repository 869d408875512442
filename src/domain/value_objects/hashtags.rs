/// Extracts `#tag` tokens from post content.
///
/// Content is split on single spaces; every word starting with `#` contributes
/// the remainder as a lowercase tag. Order follows first appearance, duplicates
/// and bare `#` words are dropped.
pub fn extract_hashtags(content: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for word in content.split(' ') {
        let Some(tag) = word.strip_prefix('#') else {
            continue;
        };
        if tag.is_empty() {
            continue;
        }
        let tag = tag.to_lowercase();
        if !tags.contains(&tag) {
            tags.push(tag);
        }
    }
    tags
}

/// Normalizes caller-supplied tags (query parameters, explicit edits) the same
/// way extracted tags are stored.
pub fn normalize_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut normalized: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.as_ref().trim();
        let tag = tag.strip_prefix('#').unwrap_or(tag).to_lowercase();
        if !tag.is_empty() && !normalized.contains(&tag) {
            normalized.push(tag);
        }
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_in_order_of_appearance() {
        assert_eq!(
            extract_hashtags("#b first then #a and #c"),
            vec!["b".to_string(), "a".to_string(), "c".to_string()]
        );
    }

    #[test]
    fn ignores_words_without_leading_hash() {
        assert!(extract_hashtags("no tags here, mid#word either").is_empty());
    }

    #[test]
    fn drops_bare_hash_and_duplicates() {
        assert_eq!(
            extract_hashtags("# #Rust #rust #RUST"),
            vec!["rust".to_string()]
        );
    }

    #[test]
    fn keeps_punctuation_attached_to_the_word() {
        assert_eq!(extract_hashtags("#done."), vec!["done.".to_string()]);
    }

    #[test]
    fn normalize_strips_hash_and_blank_entries() {
        assert_eq!(
            normalize_tags(["#Rust", " ", "tokio", "rust"]),
            vec!["rust".to_string(), "tokio".to_string()]
        );
    }
}
