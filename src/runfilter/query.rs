//! Request parameters for the backend.
//!
//! The composer turns the active filters and pagination into the parameter
//! object the HTTP layer sends. It never performs the request itself; that is
//! the job of an [`HttpClient`] supplied by the host.

use crate::codec;
use crate::context::FilterContext;
use crate::model::Filter;
use serde::{Deserialize, Serialize};

/// How the `filter` parameter is put on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterEncoding {
    /// One `filter` pair per token.
    #[default]
    Array,
    /// A single `filter` pair, tokens joined with `,`.
    Joined,
}

/// Parameters for a list request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestParams {
    /// Backend filter tokens. Always present, empty when nothing is filtered.
    pub filter: Vec<String>,
    pub page: u32,
    #[serde(rename = "pageSize")]
    pub page_size: u32,
}

impl RequestParams {
    pub fn joined_filter(&self) -> String {
        self.filter.join(",")
    }

    /// Flatten into query pairs for an HTTP client.
    pub fn to_pairs(&self, encoding: FilterEncoding) -> Vec<(String, String)> {
        let mut pairs: Vec<(String, String)> = match encoding {
            FilterEncoding::Array => self
                .filter
                .iter()
                .map(|token| ("filter".to_string(), token.clone()))
                .collect(),
            FilterEncoding::Joined => vec![("filter".to_string(), self.joined_filter())],
        };
        pairs.push(("page".to_string(), self.page.to_string()));
        pairs.push(("pageSize".to_string(), self.page_size.to_string()));
        pairs
    }
}

/// Something that can perform a typed GET against the backend.
pub trait HttpClient {
    type Response;
    type Error: std::fmt::Display;

    fn get(&self, path: &str, params: &RequestParams) -> Result<Self::Response, Self::Error>;
}

/// Builds [`RequestParams`] for a view.
pub struct QueryComposer<'a> {
    ctx: &'a FilterContext,
}

impl<'a> QueryComposer<'a> {
    pub fn new(ctx: &'a FilterContext) -> Self {
        Self { ctx }
    }

    /// Page and page size pass through unchecked; range errors are the
    /// backend's to report.
    pub fn compose(&self, filters: &[Filter], page: u32, page_size: u32) -> RequestParams {
        RequestParams {
            filter: filters.iter().map(codec::to_api_param).collect(),
            page,
            page_size,
        }
    }

    /// Compose with the view's default page size.
    pub fn compose_first_page(&self, filters: &[Filter]) -> RequestParams {
        self.compose(filters, 1, self.ctx.default_page_size)
    }
}
