use crate::application::ports::user_service::FollowGraph;
use crate::shared::error::AppError;
use std::collections::HashSet;

const FOLLOWING_PAGE_SIZE: u32 = 100;

/// Drains the paginated follow-graph listing for `user_id`.
///
/// Stops when the service reports no further page, returns an empty page, or
/// hands back an offset that does not move forward.
pub async fn collect_following_ids(
    graph: &dyn FollowGraph,
    user_id: &str,
) -> Result<Vec<String>, AppError> {
    let mut ids: Vec<String> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut offset = 0u32;

    loop {
        let page = graph
            .following_page(user_id, offset, FOLLOWING_PAGE_SIZE)
            .await?;
        if page.ids.is_empty() {
            break;
        }
        for id in page.ids {
            if seen.insert(id.clone()) {
                ids.push(id);
            }
        }
        match page.next_offset {
            Some(next) if next > offset => offset = next,
            _ => break,
        }
    }

    Ok(ids)
}
