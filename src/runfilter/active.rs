//! # Active Filter Set
//!
//! The ordered collection of filters currently applied to a view, plus the
//! view's pagination and the not-yet-applied ("draft") filter inputs.
//!
//! ## Invariants
//!
//! - At most one filter per field. Updating a field that already has a filter
//!   replaces it in place; insertion order is otherwise preserved.
//! - Pinned fields survive [`ActiveFilterSet::clear_all`] and cannot be
//!   removed. Fields in the block-remove list cannot be removed either.
//! - Any filter change resets the page to 1. Page changes never touch filters.
//! - After every change the whole set is serialized back into the URL, so a
//!   reload rebuilds the same state.
//!
//! ## URL layout
//!
//! ```text
//! result=[in]failed;error&component=[eq]ui&page=2&pageSize=20
//! ```
//!
//! Every key except `page` and `pageSize` is a field name.

use crate::codec;
use crate::context::FilterContext;
use crate::error::Result;
use crate::model::{Filter, FilterValue};
use crate::nav::Navigator;
use crate::operators::Operator;
use url::form_urlencoded;

pub use crate::model::{PAGE_KEY, PAGE_SIZE_KEY};

/// 1-based page cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
}

impl Pagination {
    pub fn first(page_size: u32) -> Self {
        Self { page: 1, page_size }
    }
}

/// Filter inputs the user is still editing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftFilter {
    pub field: Option<String>,
    pub operator: Option<Operator>,
    pub value: Option<String>,
}

impl DraftFilter {
    pub fn is_blank(&self) -> bool {
        self.field.is_none() && self.operator.is_none() && self.value.is_none()
    }
}

pub struct ActiveFilterSet<'a, N: Navigator> {
    ctx: &'a FilterContext,
    filters: Vec<Filter>,
    pagination: Pagination,
    draft: DraftFilter,
    navigator: N,
}

impl<'a, N: Navigator> ActiveFilterSet<'a, N> {
    /// An empty set. Nothing is read from or written to the navigator.
    pub fn new(ctx: &'a FilterContext, navigator: N) -> Self {
        Self {
            ctx,
            filters: Vec::new(),
            pagination: Pagination::first(ctx.default_page_size),
            draft: DraftFilter::default(),
            navigator,
        }
    }

    /// Seed the set from the navigator's current query.
    pub fn mount(ctx: &'a FilterContext, navigator: N) -> Self {
        let query = navigator.current_query().to_string();
        Self::from_query(ctx, &query, navigator)
    }

    /// Seed the set from a query string, with or without the leading `?`.
    ///
    /// Unreadable parameters are recovered or dropped, never reported to the
    /// caller. When a field repeats, the last occurrence wins.
    pub fn from_query(ctx: &'a FilterContext, query: &str, navigator: N) -> Self {
        let mut set = Self::new(ctx, navigator);
        let query = query.strip_prefix('?').unwrap_or(query);

        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match &*key {
                PAGE_KEY => set.pagination.page = parse_count(&key, &value).unwrap_or(1),
                PAGE_SIZE_KEY => {
                    set.pagination.page_size =
                        parse_count(&key, &value).unwrap_or(ctx.default_page_size)
                }
                field => match codec::parse_url_param(&ctx.catalog, field, &value) {
                    Some(filter) => set.seed(filter),
                    None => set.filters.retain(|f| f.field() != field),
                },
            }
        }
        set
    }

    /// Insert or replace a filter without touching pagination or the URL.
    pub(crate) fn seed(&mut self, filter: Filter) {
        match self.position(filter.field()) {
            Some(i) => self.filters[i] = filter,
            None => self.filters.push(filter),
        }
    }

    /// Apply `operator value` to `field`.
    ///
    /// An empty or missing value removes the field's filter instead. Returns
    /// whether the filters or pagination changed.
    pub fn update(
        &mut self,
        field: &str,
        operator: Operator,
        value: Option<FilterValue>,
    ) -> Result<bool> {
        let value = match value {
            Some(v) if !v.is_empty() => v,
            _ => return Ok(self.remove(field)),
        };
        let filter = Filter::new(&self.ctx.catalog, field, operator, value)?;

        let mut changed = self.pagination.page != 1;
        match self.position(field) {
            Some(i) if self.filters[i] == filter => {}
            Some(i) => {
                self.filters[i] = filter;
                changed = true;
            }
            None => {
                self.filters.push(filter);
                changed = true;
            }
        }
        self.pagination.page = 1;
        self.commit();
        Ok(changed)
    }

    /// Remove the filter on `field`. Blocked and pinned fields are left alone.
    pub fn remove(&mut self, field: &str) -> bool {
        if self.ctx.policy.is_remove_blocked(field) {
            tracing::debug!(field, "remove ignored for protected field");
            return false;
        }
        let Some(i) = self.position(field) else {
            return false;
        };
        self.filters.remove(i);
        self.pagination.page = 1;
        self.commit();
        true
    }

    /// Drop every filter except pinned ones, and reset the draft inputs.
    pub fn clear_all(&mut self) -> bool {
        let before = self.filters.len();
        let policy = &self.ctx.policy;
        self.filters.retain(|f| policy.is_pinned(f.field()));

        let changed = before != self.filters.len() || self.pagination.page != 1;
        self.draft = DraftFilter::default();
        self.pagination.page = 1;
        self.commit();
        changed
    }

    /// Move to another page. Filters are untouched.
    pub fn set_page(&mut self, page: u32) -> bool {
        if self.pagination.page == page {
            return false;
        }
        self.pagination.page = page;
        self.commit();
        true
    }

    /// Change the page size and go back to the first page.
    pub fn set_page_size(&mut self, page_size: u32) -> bool {
        if self.pagination.page_size == page_size && self.pagination.page == 1 {
            return false;
        }
        self.pagination.page_size = page_size;
        self.pagination.page = 1;
        self.commit();
        true
    }

    pub fn set_draft_field(&mut self, field: impl Into<String>) {
        let field = field.into();
        // An operator picked for the previous field may not apply to this one.
        if let Some(op) = self.draft.operator {
            if !self.ctx.catalog.is_legal(&field, op) {
                self.draft.operator = None;
            }
        }
        self.draft.field = Some(field);
    }

    pub fn set_draft_operator(&mut self, operator: Operator) {
        self.draft.operator = Some(operator);
    }

    pub fn set_draft_value(&mut self, value: impl Into<String>) {
        self.draft.value = Some(value.into());
    }

    /// Turn the draft into an applied filter.
    ///
    /// Returns `Ok(false)` while the draft has no field or no value. The draft
    /// is only reset once it has been applied.
    pub fn apply_draft(&mut self) -> Result<bool> {
        let (Some(field), Some(raw)) = (self.draft.field.clone(), self.draft.value.clone()) else {
            return Ok(false);
        };
        let operator = self.draft.operator.unwrap_or(Operator::DEFAULT);
        self.update(&field, operator, Some(FilterValue::parse(operator.mode(), &raw)))?;
        self.draft = DraftFilter::default();
        Ok(true)
    }

    /// Serialize the visible filters and pagination as a query string.
    ///
    /// A zero page or page size is left out, since seeding would reject it
    /// and fall back to the default anyway.
    pub fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for filter in &self.filters {
            if self.ctx.policy.is_hidden(filter.field()) {
                continue;
            }
            let (key, value) = codec::to_url_param(filter);
            serializer.append_pair(&key, &value);
        }
        for (key, count) in [
            (PAGE_KEY, self.pagination.page),
            (PAGE_SIZE_KEY, self.pagination.page_size),
        ] {
            if count > 0 {
                serializer.append_pair(key, &count.to_string());
            }
        }
        serializer.finish()
    }

    fn commit(&mut self) {
        let query = self.to_query_string();
        if query != self.navigator.current_query() {
            tracing::debug!(%query, "committing filter state to URL");
            self.navigator.push_query(query);
        }
    }

    fn position(&self, field: &str) -> Option<usize> {
        self.filters.iter().position(|f| f.field() == field)
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    pub fn get(&self, field: &str) -> Option<&Filter> {
        self.filters.iter().find(|f| f.field() == field)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.filters.iter().map(Filter::field)
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn pagination(&self) -> Pagination {
        self.pagination
    }

    pub fn draft(&self) -> &DraftFilter {
        &self.draft
    }

    pub fn context(&self) -> &'a FilterContext {
        self.ctx
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    pub fn into_navigator(self) -> N {
        self.navigator
    }
}

fn parse_count(key: &str, raw: &str) -> Option<u32> {
    match raw.parse::<u32>() {
        Ok(n) if n > 0 => Some(n),
        _ => {
            tracing::warn!(key, raw, "ignoring invalid pagination value");
            None
        }
    }
}
