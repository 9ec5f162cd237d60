//! # API Facade
//!
//! [`FilterView`] is the single entry point a UI uses to drive one filtered
//! list view. It wires the pieces together in the order data flows:
//!
//! ```text
//! UI control ─▶ ActiveFilterSet ─▶ Navigator (URL)
//!                     │
//!                     ▼
//!               QueryComposer ─▶ FetchGate ─▶ HttpClient (host)
//! ```
//!
//! On mount the flow runs backwards: the navigator's current query seeds the
//! active filter set.
//!
//! ## What the facade does NOT do
//!
//! - **Rendering**: it returns chips, descriptors and states, not markup.
//! - **Networking**: requests go through a host-supplied [`HttpClient`].
//! - **Rollback**: a failed fetch only changes the view state. The filters
//!   and URL stay as the user left them.

use crate::active::{ActiveFilterSet, DraftFilter, Pagination};
use crate::context::FilterContext;
use crate::error::Result;
use crate::fetch::{FetchGate, FetchOutcome, Generation, ViewState};
use crate::model::{Filter, FilterValue};
use crate::nav::Navigator;
use crate::operators::{self, Operator, OperatorDescriptor};
use crate::query::{HttpClient, QueryComposer, RequestParams};
use std::time::Instant;

/// Field every view is scoped by when the context names a project.
pub const PROJECT_FIELD: &str = "project_id";

/// A request the host should send, tagged with the state it was built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub generation: Generation,
    pub params: RequestParams,
}

pub struct FilterView<'a, N: Navigator> {
    filters: ActiveFilterSet<'a, N>,
    composer: QueryComposer<'a>,
    gate: FetchGate,
    state: ViewState<serde_json::Value>,
}

impl<'a, N: Navigator> FilterView<'a, N> {
    /// Build the view from the navigator's current URL.
    ///
    /// A project in the context becomes a `project_id` filter unless the URL
    /// already has one. The first fetch is scheduled right away.
    pub fn mount(ctx: &'a FilterContext, navigator: N, now: Instant) -> Self {
        let mut filters = ActiveFilterSet::mount(ctx, navigator);

        if let Some(project) = &ctx.project_id {
            if filters.get(PROJECT_FIELD).is_none() {
                match Filter::new(&ctx.catalog, PROJECT_FIELD, Operator::Eq, project.as_str()) {
                    Ok(filter) => filters.seed(filter),
                    Err(e) => tracing::warn!("cannot scope view to project {project}: {e}"),
                }
            }
        }

        let mut gate = FetchGate::new(ctx.debounce);
        gate.mark_dirty(now);

        Self {
            filters,
            composer: QueryComposer::new(ctx),
            gate,
            state: ViewState::Idle,
        }
    }

    pub fn update(
        &mut self,
        field: &str,
        operator: Operator,
        value: Option<FilterValue>,
        now: Instant,
    ) -> Result<bool> {
        let changed = self.filters.update(field, operator, value)?;
        Ok(self.touch(changed, now))
    }

    /// Update from raw UI input.
    ///
    /// Unknown operator names fall back to `eq`. The raw value is read
    /// according to the operator's mode (`a;b` for `in`, `true` for `exists`).
    pub fn update_named(
        &mut self,
        field: &str,
        operator: &str,
        raw_value: Option<&str>,
        now: Instant,
    ) -> Result<bool> {
        let operator = operators::resolve_or_default(operator);
        let value = raw_value.map(|raw| FilterValue::parse(operator.mode(), raw));
        self.update(field, operator, value, now)
    }

    pub fn remove(&mut self, field: &str, now: Instant) -> bool {
        let changed = self.filters.remove(field);
        self.touch(changed, now)
    }

    pub fn clear_all(&mut self, now: Instant) -> bool {
        let changed = self.filters.clear_all();
        self.touch(changed, now)
    }

    pub fn set_page(&mut self, page: u32, now: Instant) -> bool {
        let changed = self.filters.set_page(page);
        self.touch(changed, now)
    }

    pub fn set_page_size(&mut self, page_size: u32, now: Instant) -> bool {
        let changed = self.filters.set_page_size(page_size);
        self.touch(changed, now)
    }

    pub fn set_draft_field(&mut self, field: impl Into<String>) {
        self.filters.set_draft_field(field);
    }

    pub fn set_draft_operator(&mut self, operator: Operator) {
        self.filters.set_draft_operator(operator);
    }

    pub fn set_draft_value(&mut self, value: impl Into<String>) {
        self.filters.set_draft_value(value);
    }

    pub fn apply_draft(&mut self, now: Instant) -> Result<bool> {
        let applied = self.filters.apply_draft()?;
        Ok(self.touch(applied, now))
    }

    fn touch(&mut self, changed: bool, now: Instant) -> bool {
        if changed {
            self.gate.mark_dirty(now);
        }
        changed
    }

    /// Parameters for the current filters and page.
    pub fn request_params(&self) -> RequestParams {
        let Pagination { page, page_size } = self.filters.pagination();
        self.composer.compose(self.filters.filters(), page, page_size)
    }

    /// The request to send now, if the debounce window has passed.
    pub fn poll_fetch(&mut self, now: Instant) -> Option<FetchTicket> {
        let generation = self.gate.poll(now)?;
        self.state = ViewState::Loading(generation);
        Some(FetchTicket {
            generation,
            params: self.request_params(),
        })
    }

    /// Apply a response for `ticket`, unless the filters moved on since.
    pub fn complete<E: std::fmt::Display>(
        &mut self,
        ticket: &FetchTicket,
        response: std::result::Result<serde_json::Value, E>,
    ) -> FetchOutcome {
        if !self.gate.is_current(ticket.generation) {
            tracing::debug!(
                generation = ticket.generation.value(),
                "discarding stale response"
            );
            return FetchOutcome::Stale;
        }
        self.state = match response {
            Ok(body) => ViewState::Loaded(body),
            Err(e) => {
                tracing::warn!("fetch failed: {e}");
                ViewState::Failed(e.to_string())
            }
        };
        FetchOutcome::Applied
    }

    /// Send the current request right away, skipping the debounce window.
    ///
    /// The pending window is consumed, so `poll_fetch` will not repeat it.
    pub fn fetch_now<C>(&mut self, client: &C, path: &str) -> FetchOutcome
    where
        C: HttpClient<Response = serde_json::Value>,
    {
        let ticket = FetchTicket {
            generation: self.gate.take(),
            params: self.request_params(),
        };
        self.state = ViewState::Loading(ticket.generation);
        let response = client.get(path, &ticket.params);
        self.complete(&ticket, response)
    }

    pub fn state(&self) -> &ViewState<serde_json::Value> {
        &self.state
    }

    /// Operators to offer for `field`, in registry order.
    pub fn operator_choices(&self, field: &str) -> Vec<&'static OperatorDescriptor> {
        self.filters
            .context()
            .catalog
            .legal_operators(field)
            .into_iter()
            .map(Operator::descriptor)
            .collect()
    }

    /// One label per active filter, in display order.
    pub fn chips(&self) -> Vec<String> {
        self.filters.filters().iter().map(ToString::to_string).collect()
    }

    pub fn filters(&self) -> &ActiveFilterSet<'a, N> {
        &self.filters
    }

    pub fn draft(&self) -> &DraftFilter {
        self.filters.draft()
    }

    pub fn query_string(&self) -> String {
        self.filters.to_query_string()
    }

    pub fn into_navigator(self) -> N {
        self.filters.into_navigator()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nav::memory::MemoryNavigator;
    use serde_json::json;
    use std::cell::RefCell;
    use std::time::Duration;

    const WINDOW: Duration = Duration::from_millis(100);

    fn mount<'a>(
        ctx: &'a FilterContext,
        query: &str,
        t0: Instant,
    ) -> FilterView<'a, MemoryNavigator> {
        FilterView::mount(ctx, MemoryNavigator::new(query), t0)
    }

    /// Records every request and answers with a canned response.
    struct FakeClient {
        calls: RefCell<Vec<(String, RequestParams)>>,
        fail: bool,
    }

    impl FakeClient {
        fn new(fail: bool) -> Self {
            Self {
                calls: RefCell::new(Vec::new()),
                fail,
            }
        }
    }

    impl HttpClient for FakeClient {
        type Response = serde_json::Value;
        type Error = String;

        fn get(
            &self,
            path: &str,
            params: &RequestParams,
        ) -> std::result::Result<Self::Response, String> {
            self.calls
                .borrow_mut()
                .push((path.to_string(), params.clone()));
            if self.fail {
                Err("503 Service Unavailable".to_string())
            } else {
                Ok(json!({"results": [], "pagination": {"page": params.page}}))
            }
        }
    }

    #[test]
    fn mount_seeds_and_schedules_first_fetch() {
        let t0 = Instant::now();
        let ctx = FilterContext::default();
        let mut view = mount(&ctx, "result=[in]failed;error&page=2", t0);

        assert_eq!(view.chips(), vec!["result is one of failed, error"]);
        let ticket = view.poll_fetch(t0 + WINDOW).unwrap();
        assert_eq!(ticket.params.filter, vec!["result*failed;error"]);
        assert_eq!(ticket.params.page, 2);
        assert_eq!(view.state(), &ViewState::Loading(ticket.generation));
    }

    #[test]
    fn mount_scopes_to_context_project() {
        let t0 = Instant::now();
        let ctx = FilterContext::default().with_project("p-7");
        let view = mount(&ctx, "", t0);

        assert_eq!(view.request_params().filter, vec!["project_id=p-7"]);
    }

    #[test]
    fn url_project_wins_over_context() {
        let t0 = Instant::now();
        let ctx = FilterContext::default().with_project("p-7");
        let view = mount(&ctx, "project_id=[eq]p-1", t0);

        assert_eq!(view.request_params().filter, vec!["project_id=p-1"]);
    }

    #[test]
    fn filter_change_resets_page_page_change_keeps_filters() {
        let t0 = Instant::now();
        let ctx = FilterContext::default();
        let mut view = mount(&ctx, "component=[eq]ui&page=3", t0);

        view.set_page(5, t0);
        assert_eq!(view.request_params().filter, vec!["component=ui"]);
        assert_eq!(view.request_params().page, 5);

        view.update_named("env", "eq", Some("prod"), t0).unwrap();
        assert_eq!(view.request_params().page, 1);
    }

    #[test]
    fn update_named_falls_back_to_eq() {
        let t0 = Instant::now();
        let ctx = FilterContext::default();
        let mut view = mount(&ctx, "", t0);

        view.update_named("component", "resembles", Some("ui"), t0)
            .unwrap();
        assert_eq!(view.request_params().filter, vec!["component=ui"]);
    }

    #[test]
    fn update_named_reads_value_by_mode() {
        let t0 = Instant::now();
        let ctx = FilterContext::default();
        let mut view = mount(&ctx, "", t0);

        view.update_named("result", "in", Some("failed;error"), t0)
            .unwrap();
        view.update_named("metadata.flaky", "exists", Some("false"), t0)
            .unwrap();
        assert_eq!(
            view.request_params().filter,
            vec!["result*failed;error", "metadata.flaky@false"]
        );
        assert!(view.update_named("result", "in", None, t0).unwrap());
        assert_eq!(view.filters().len(), 1);
    }

    #[test]
    fn stale_response_is_discarded() {
        let t0 = Instant::now();
        let ctx = FilterContext::default();
        let mut view = mount(&ctx, "", t0);

        let slow = view.poll_fetch(t0 + WINDOW).unwrap();
        view.update_named("result", "eq", Some("failed"), t0 + WINDOW)
            .unwrap();
        let fast = view.poll_fetch(t0 + WINDOW * 2).unwrap();

        let fresh = json!({"results": ["fresh"]});
        assert_eq!(
            view.complete::<String>(&fast, Ok(fresh.clone())),
            FetchOutcome::Applied
        );
        assert_eq!(
            view.complete::<String>(&slow, Ok(json!({"results": ["old"]}))),
            FetchOutcome::Stale
        );
        assert_eq!(view.state(), &ViewState::Loaded(fresh));
    }

    #[test]
    fn debounce_only_fetches_last_state() {
        let t0 = Instant::now();
        let ctx = FilterContext::default();
        let mut view = mount(&ctx, "", t0);

        for (i, value) in ["f", "fa", "fai", "fail"].iter().enumerate() {
            let at = t0 + Duration::from_millis(30 * i as u64);
            view.update_named("result", "contains", Some(value), at)
                .unwrap();
            assert!(view.poll_fetch(at).is_none());
        }
        let ticket = view.poll_fetch(t0 + Duration::from_millis(90) + WINDOW).unwrap();
        assert_eq!(ticket.params.filter, vec!["result~fail"]);
        assert!(view.poll_fetch(t0 + WINDOW * 5).is_none());
    }

    #[test]
    fn failed_fetch_keeps_filters_and_url() {
        let t0 = Instant::now();
        let ctx = FilterContext::default();
        let mut view = mount(&ctx, "", t0);
        view.update_named("component", "eq", Some("ui"), t0).unwrap();
        let query = view.query_string();

        let client = FakeClient::new(true);
        assert_eq!(view.fetch_now(&client, "/result"), FetchOutcome::Applied);
        assert!(matches!(view.state(), ViewState::Failed(msg) if msg.contains("503")));
        assert_eq!(view.query_string(), query);
        assert_eq!(view.filters().len(), 1);
    }

    #[test]
    fn fetch_now_sends_composed_params() {
        let t0 = Instant::now();
        let ctx = FilterContext::default();
        let mut view = mount(&ctx, "run_id=[eq]r-1&pageSize=50", t0);

        let client = FakeClient::new(false);
        view.fetch_now(&client, "/result");

        let calls = client.calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "/result");
        assert_eq!(calls[0].1.filter, vec!["run_id=r-1"]);
        assert_eq!(calls[0].1.page_size, 50);
        assert!(matches!(view.state(), ViewState::Loaded(_)));
    }

    #[test]
    fn fetch_now_consumes_pending_fetch() {
        let t0 = Instant::now();
        let ctx = FilterContext::default();
        let mut view = mount(&ctx, "", t0);
        view.update_named("component", "eq", Some("ui"), t0).unwrap();

        let client = FakeClient::new(false);
        assert_eq!(view.fetch_now(&client, "/result"), FetchOutcome::Applied);
        assert!(view.poll_fetch(t0 + WINDOW * 5).is_none());
        assert!(matches!(view.state(), ViewState::Loaded(_)));
        assert_eq!(client.calls.borrow().len(), 1);

        view.update_named("component", "eq", Some("api"), t0 + WINDOW * 5)
            .unwrap();
        assert!(view.poll_fetch(t0 + WINDOW * 6).is_some());
    }

    #[test]
    fn unchanged_update_does_not_refetch() {
        let t0 = Instant::now();
        let ctx = FilterContext::default();
        let mut view = mount(&ctx, "", t0);
        view.update_named("component", "eq", Some("ui"), t0).unwrap();
        view.poll_fetch(t0 + WINDOW).unwrap();

        let changed = view.update_named("component", "eq", Some("ui"), t0 + WINDOW);
        assert!(!changed.unwrap());
        assert!(view.poll_fetch(t0 + WINDOW * 3).is_none());
    }

    #[test]
    fn operator_choices_follow_field_family() {
        let t0 = Instant::now();
        let ctx = FilterContext::default();
        let view = mount(&ctx, "", t0);

        let names: Vec<_> = view
            .operator_choices("duration")
            .iter()
            .map(|d| d.name)
            .collect();
        assert!(!names.contains(&"contains"));
        assert_eq!(
            view.operator_choices("metadata.whatever").len(),
            operators::OPERATORS.len()
        );
    }

    #[test]
    fn clear_all_through_view() {
        let t0 = Instant::now();
        let ctx = FilterContext::default().with_project("p-1");
        let mut view = mount(&ctx, "result=[eq]failed&component=[eq]ui", t0);
        view.set_draft_field("env");
        view.set_draft_value("prod");

        assert!(view.clear_all(t0));
        assert_eq!(view.request_params().filter, vec!["project_id=p-1"]);
        assert!(view.draft().is_blank());
    }

    #[test]
    fn apply_draft_through_view() {
        let t0 = Instant::now();
        let ctx = FilterContext::default();
        let mut view = mount(&ctx, "", t0);
        view.set_draft_field("duration");
        view.set_draft_operator(Operator::Lt);
        view.set_draft_value("2");

        assert!(view.apply_draft(t0).unwrap());
        assert_eq!(view.request_params().filter, vec!["duration<2"]);
        assert!(view.into_navigator().current_query().contains("duration"));
    }
}
