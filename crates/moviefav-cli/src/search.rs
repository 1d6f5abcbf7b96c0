//! Search input synchronization with the remote lookup.
//!
//! Every query change issues a new request token. Only the response for the
//! latest token may touch the result list, so a slow response for an older
//! query can never overwrite newer results.

use anyhow::Result;
use moviefav_api::omdb::{MovieSummary, OmdbApi, OmdbSearchResponse, SearchParams};

use crate::pagination::Paginator;

/// Identifies one issued lookup. Strictly increasing per [`SearchState`].
pub type RequestToken = u64;

/// A lookup to perform for a query change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    /// Token the response must carry back.
    pub token: RequestToken,
    /// Remote parameters, or `None` for a blank query resolved locally.
    pub params: Option<SearchParams>,
}

/// A finished lookup, ready to be applied.
#[derive(Debug)]
pub struct SearchCompletion {
    /// Token of the originating request.
    pub token: RequestToken,
    /// Remote outcome.
    pub result: Result<OmdbSearchResponse>,
}

/// What [`SearchState::apply`] did with a completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// Results replaced with this many entries; page reset to 1.
    Replaced(usize),
    /// No result collection or the request failed; state unchanged.
    Unchanged,
    /// A newer request was issued since; response dropped.
    Stale,
}

/// Query, current results, and their page state.
#[derive(Debug, Default)]
pub struct SearchState {
    /// Current query text.
    query: String,
    /// Last accepted result list.
    results: Vec<MovieSummary>,
    /// Page state over `results`.
    pager: Paginator,
    /// Most recently issued token.
    latest_token: RequestToken,
}

impl SearchState {
    /// Creates an empty search state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current query text.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Full result list.
    #[must_use]
    pub fn results(&self) -> &[MovieSummary] {
        &self.results
    }

    /// Results on the current page.
    #[must_use]
    pub fn visible(&self) -> &[MovieSummary] {
        self.pager.slice(&self.results)
    }

    /// Page state over the results.
    #[must_use]
    pub const fn pager(&self) -> &Paginator {
        &self.pager
    }

    /// Mutable page state over the results.
    pub const fn pager_mut(&mut self) -> &mut Paginator {
        &mut self.pager
    }

    /// Most recently issued token.
    #[must_use]
    pub const fn latest_token(&self) -> RequestToken {
        self.latest_token
    }

    /// Replaces the query and issues a request for it.
    pub fn set_query(&mut self, query: impl Into<String>) -> SearchRequest {
        self.query = query.into();
        self.issue()
    }

    /// Appends a character to the query and issues a request.
    pub fn push_char(&mut self, ch: char) -> SearchRequest {
        self.query.push(ch);
        self.issue()
    }

    /// Removes the last character and issues a request.
    ///
    /// Returns `None` when the query was already empty.
    pub fn pop_char(&mut self) -> Option<SearchRequest> {
        self.query.pop()?;
        Some(self.issue())
    }

    /// Issues a new token for the current query.
    fn issue(&mut self) -> SearchRequest {
        self.latest_token = self.latest_token.wrapping_add(1);
        let params = if self.query.trim().is_empty() {
            None
        } else {
            Some(SearchParams::new(self.query.clone()))
        };
        tracing::debug!(token = self.latest_token, query = %self.query, "search issued");
        SearchRequest {
            token: self.latest_token,
            params,
        }
    }

    /// Applies a finished lookup.
    pub fn apply(&mut self, completion: SearchCompletion) -> ApplyOutcome {
        if completion.token != self.latest_token {
            tracing::debug!(
                token = completion.token,
                latest = self.latest_token,
                "dropping stale search response"
            );
            return ApplyOutcome::Stale;
        }

        match completion.result {
            Ok(OmdbSearchResponse {
                search: Some(list), ..
            }) => {
                let count = list.len();
                self.results = list;
                self.pager.reset();
                ApplyOutcome::Replaced(count)
            }
            Ok(_) => ApplyOutcome::Unchanged,
            Err(e) => {
                tracing::debug!(error = %e, "search request failed");
                ApplyOutcome::Unchanged
            }
        }
    }
}

/// Performs the lookup described by `request`.
///
/// A blank query resolves to a response without a result collection and
/// never reaches the network.
pub async fn resolve<A>(api: &A, request: &SearchRequest) -> SearchCompletion
where
    A: OmdbApi + Sync + ?Sized,
{
    let result = match request.params {
        Some(ref params) => api.search(params).await,
        None => Ok(OmdbSearchResponse::default()),
    };
    SearchCompletion {
        token: request.token,
        result,
    }
}
