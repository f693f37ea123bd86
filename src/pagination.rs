//! Draining paginated listing calls.

use std::future::Future;

use async_stream::try_stream;
use futures_util::{Stream, TryStreamExt};

/// One page of a paginated listing call.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Page<T> {
    /// The items on this page.
    pub items: Vec<T>,

    /// The continuation token (or marker) for the next page, if there is one.
    pub next_token: Option<String>,
}

impl<T> Page<T> {
    /// Construct a page from its items and the token returned alongside them.
    ///
    /// An empty token is treated the same as an absent one.
    pub fn new(items: Vec<T>, next_token: Option<impl Into<String>>) -> Self {
        Self {
            items,
            next_token: next_token.map(Into::into).filter(|token| !token.is_empty()),
        }
    }
}

/// Stream the items of every page, following continuation tokens until a page has none.
///
/// `fetch` receives `None` for the first page and the previous page's token afterwards. The first
/// error ends the stream.
pub fn paginate<'a, T, E, F, Fut>(mut fetch: F) -> impl Stream<Item = Result<T, E>> + 'a
where
    F: FnMut(Option<String>) -> Fut + 'a,
    Fut: Future<Output = Result<Page<T>, E>> + 'a,
    T: 'a,
    E: 'a,
{
    try_stream! {
        let mut next_token = None;
        loop {
            let page = fetch(next_token.take()).await?;
            for item in page.items {
                yield item;
            }
            match page.next_token {
                Some(token) => next_token = Some(token),
                None => break,
            }
        }
    }
}

/// Collect the items of every page into a `Vec`, in page order.
pub async fn collect_all<'a, T, E, F, Fut>(fetch: F) -> Result<Vec<T>, E>
where
    F: FnMut(Option<String>) -> Fut + 'a,
    Fut: Future<Output = Result<Page<T>, E>> + 'a,
    T: 'a,
    E: 'a,
{
    paginate(fetch).try_collect().await
}
