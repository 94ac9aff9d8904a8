//! Cursor pagination over AtVenu connections.

use std::future::Future;

use serde::Deserialize;

use super::AtVenuError;
use super::types::null_as_empty;

/// `pageInfo` of a connection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// Whether the server has another page.
    pub has_next_page: bool,
    /// Opaque cursor to resume after this page.
    pub end_cursor: Option<String>,
}

/// One page of a connection.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", bound(deserialize = "T: Deserialize<'de>"))]
pub struct Connection<T> {
    /// Pagination state.
    pub page_info: PageInfo,
    /// Items on this page.
    #[serde(default = "Vec::new", deserialize_with = "null_as_empty")]
    pub nodes: Vec<T>,
}

impl<T> Connection<T> {
    /// A terminal page with no items.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            page_info: PageInfo {
                has_next_page: false,
                end_cursor: None,
            },
            nodes: Vec::new(),
        }
    }
}

/// Drain a cursor-paginated connection.
///
/// Calls `fetch_page` with `None`, then with each page's `endCursor` while
/// `hasNextPage` is true, appending nodes in page order. Issues exactly one
/// call per page. The first failing page aborts the walk and nothing collected
/// so far is returned.
///
/// # Errors
///
/// Propagates any error from `fetch_page`. Returns `AtVenuError::MissingData`
/// if a page claims a next page without an `endCursor`.
pub async fn collect_pages<T, F, Fut>(mut fetch_page: F) -> Result<Vec<T>, AtVenuError>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Connection<T>, AtVenuError>>,
{
    let mut nodes = Vec::new();
    let mut cursor = None;
    let mut page = 0_usize;

    loop {
        let connection = fetch_page(cursor.take()).await?;
        page += 1;
        tracing::debug!(page, items = connection.nodes.len(), "Fetched page");
        nodes.extend(connection.nodes);

        if !connection.page_info.has_next_page {
            break;
        }
        match connection.page_info.end_cursor {
            Some(next) => cursor = Some(next),
            None => {
                return Err(AtVenuError::MissingData(format!(
                    "page {page} has a next page but no endCursor"
                )));
            }
        }
    }

    Ok(nodes)
}
