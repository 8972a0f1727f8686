//! View/fetch state for the search and recommendation flows
//!
//! The controller owns everything the main view renders except theming and
//! toasts. It never performs I/O itself: `begin_*` hands back a request
//! description tagged with a [`Ticket`], the caller runs it, and `finish_*`
//! applies the outcome. Only the most recently issued ticket of a flow may
//! change that flow's state, so a slow response cannot overwrite a newer one.

use crate::backend::{BackendError, FeedbackEvent, ItemId, Recommendation, SearchItem};
use crate::config::Config;

pub const SEARCH_FAILED: &str = "Search failed";
pub const RECOMMEND_FAILED: &str = "Failed to fetch recommendations";
pub const SEARCH_EMPTY: &str = "No search results, try another keyword.";
pub const RECOMMEND_EMPTY: &str = "No recommendations yet. Enter a keyword and press Recommend.";

/// Action sent when a user marks an item as interesting
pub const DEFAULT_ACTION: &str = "click";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Recommend,
    Search,
}

impl Tab {
    pub fn label(self) -> &'static str {
        match self {
            Tab::Recommend => "Recommended",
            Tab::Search => "Search results",
        }
    }
}

/// Sequence number of an issued request within one flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

/// Result list plus loading/error flags for one data-fetching flow
#[derive(Debug, Clone)]
pub struct Flow<T> {
    items: Vec<T>,
    loading: bool,
    error: Option<String>,
    issued: u64,
}

impl<T> Default for Flow<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loading: false,
            error: None,
            issued: 0,
        }
    }
}

impl<T> Flow<T> {
    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    fn begin(&mut self) -> Ticket {
        self.issued += 1;
        self.loading = true;
        self.error = None;
        Ticket(self.issued)
    }

    /// Apply a response. Returns `false` if the ticket was superseded.
    fn finish(&mut self, ticket: Ticket, result: Result<Vec<T>, BackendError>, fallback: &str) -> bool {
        if ticket.0 != self.issued {
            tracing::debug!("Discarding stale response #{} (latest #{})", ticket.0, self.issued);
            return false;
        }

        self.loading = false;
        match result {
            Ok(items) => self.items = items,
            Err(e) => {
                self.error = Some(e.user_message(fallback));
                self.items.clear();
            }
        }
        true
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub ticket: Ticket,
    pub query: String,
    pub limit: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecommendRequest {
    pub ticket: Ticket,
    pub uid: String,
    pub query: String,
    pub k: u32,
}

#[derive(Debug, Clone)]
pub struct Controller {
    uid: String,
    query: String,
    tab: Tab,
    search: Flow<SearchItem>,
    recommend: Flow<Recommendation>,
    search_limit: u32,
    recommend_k: u32,
}

impl Default for Controller {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl Controller {
    pub fn new(config: &Config) -> Self {
        Self {
            uid: config.default_uid.clone(),
            query: String::new(),
            tab: Tab::default(),
            search: Flow::default(),
            recommend: Flow::default(),
            search_limit: config.search_limit,
            recommend_k: config.recommend_k,
        }
    }

    pub fn uid(&self) -> &str {
        &self.uid
    }

    pub fn set_uid(&mut self, uid: String) {
        self.uid = uid;
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: String) {
        self.query = query;
    }

    pub fn clear_query(&mut self) {
        self.query.clear();
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    /// Switch the visible tab. Result lists are untouched.
    pub fn select_tab(&mut self, tab: Tab) {
        self.tab = tab;
    }

    pub fn search_flow(&self) -> &Flow<SearchItem> {
        &self.search
    }

    pub fn recommend_flow(&self) -> &Flow<Recommendation> {
        &self.recommend
    }

    pub fn begin_search(&mut self) -> SearchRequest {
        self.tab = Tab::Search;
        SearchRequest {
            ticket: self.search.begin(),
            query: self.query.clone(),
            limit: self.search_limit,
        }
    }

    pub fn finish_search(&mut self, ticket: Ticket, result: Result<Vec<SearchItem>, BackendError>) -> bool {
        self.search.finish(ticket, result, SEARCH_FAILED)
    }

    pub fn begin_recommend(&mut self) -> RecommendRequest {
        self.tab = Tab::Recommend;
        RecommendRequest {
            ticket: self.recommend.begin(),
            uid: self.uid.clone(),
            query: self.query.clone(),
            k: self.recommend_k,
        }
    }

    pub fn finish_recommend(
        &mut self,
        ticket: Ticket,
        result: Result<Vec<Recommendation>, BackendError>,
    ) -> bool {
        self.recommend.finish(ticket, result, RECOMMEND_FAILED)
    }

    /// Feedback event for the current user
    pub fn feedback(&self, item_id: ItemId, action: &str) -> FeedbackEvent {
        FeedbackEvent {
            uid: self.uid.clone(),
            item_id,
            action: action.to_string(),
        }
    }

    pub fn active_count(&self) -> usize {
        match self.tab {
            Tab::Search => self.search.items.len(),
            Tab::Recommend => self.recommend.items.len(),
        }
    }

    pub fn is_loading(&self) -> bool {
        match self.tab {
            Tab::Search => self.search.loading,
            Tab::Recommend => self.recommend.loading,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self.tab {
            Tab::Search => self.search.error(),
            Tab::Recommend => self.recommend.error(),
        }
    }

    /// Empty-state text for the active tab, when it has nothing to show
    pub fn empty_state(&self) -> Option<&'static str> {
        if self.is_loading() || self.active_count() > 0 {
            return None;
        }
        match self.tab {
            Tab::Search => Some(SEARCH_EMPTY),
            Tab::Recommend => Some(RECOMMEND_EMPTY),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(id: i64, title: &str) -> SearchItem {
        SearchItem {
            id: ItemId::Int(id),
            title: title.to_string(),
            author: None,
            year: None,
            availability: None,
            abstract_text: None,
            tags: None,
            subject: None,
        }
    }

    fn rec(id: i64, title: &str) -> Recommendation {
        Recommendation {
            item_id: ItemId::Int(id),
            title: title.to_string(),
            author: None,
            score: 0.5,
            reason: vec!["classic".to_string()],
        }
    }

    #[test]
    fn test_defaults() {
        let controller = Controller::default();
        assert_eq!(controller.uid(), "u123");
        assert_eq!(controller.tab(), Tab::Recommend);
        assert!(!controller.is_loading());
    }

    #[test]
    fn test_search_switches_tab_and_sets_loading() {
        let mut controller = Controller::default();
        controller.set_query("chekhov".to_string());

        let request = controller.begin_search();

        assert_eq!(controller.tab(), Tab::Search);
        assert!(controller.is_loading());
        assert!(controller.empty_state().is_none());
        assert_eq!(request.query, "chekhov");
        assert_eq!(request.limit, 12);
    }

    #[test]
    fn test_search_success_replaces_results() {
        let mut controller = Controller::default();
        let first = controller.begin_search();
        controller.finish_search(first.ticket, Ok(vec![book(1, "Emma"), book(2, "Persuasion")]));

        let second = controller.begin_search();
        controller.finish_search(second.ticket, Ok(vec![book(3, "Dune")]));

        let titles: Vec<_> = controller.search_flow().items().iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["Dune"]);
        assert_eq!(controller.active_count(), 1);
        assert!(!controller.is_loading());
    }

    #[test]
    fn test_zero_results_is_empty_state_not_error() {
        let mut controller = Controller::default();
        let request = controller.begin_search();
        controller.finish_search(request.ticket, Ok(Vec::new()));

        assert!(controller.error_message().is_none());
        assert_eq!(controller.empty_state(), Some(SEARCH_EMPTY));
    }

    #[test]
    fn test_failed_search_clears_results_and_sets_error() {
        let mut controller = Controller::default();
        let first = controller.begin_search();
        controller.finish_search(first.ticket, Ok(vec![book(1, "Emma")]));

        let second = controller.begin_search();
        controller.finish_search(
            second.ticket,
            Err(BackendError::Transport("error sending request: connection refused".to_string())),
        );

        assert!(controller.search_flow().items().is_empty());
        let message = controller.error_message().unwrap();
        assert!(message.contains("connection refused"));
    }

    #[test]
    fn test_new_request_clears_previous_error() {
        let mut controller = Controller::default();
        let first = controller.begin_recommend();
        controller.finish_recommend(
            first.ticket,
            Err(BackendError::Server { status: 500, detail: None }),
        );
        assert!(controller.error_message().is_some());

        controller.begin_recommend();
        assert!(controller.error_message().is_none());
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let mut controller = Controller::default();
        let slow = controller.begin_search();
        let fast = controller.begin_search();

        assert!(controller.finish_search(fast.ticket, Ok(vec![book(2, "Newer")])));
        assert!(!controller.finish_search(slow.ticket, Ok(vec![book(1, "Older")])));

        assert_eq!(controller.search_flow().items()[0].title, "Newer");
        assert!(!controller.is_loading());
    }

    #[test]
    fn test_stale_response_keeps_loading_until_latest_arrives() {
        let mut controller = Controller::default();
        let slow = controller.begin_recommend();
        let _latest = controller.begin_recommend();

        controller.finish_recommend(slow.ticket, Ok(vec![rec(1, "Emma")]));

        assert!(controller.is_loading());
        assert!(controller.recommend_flow().items().is_empty());
    }

    #[test]
    fn test_tab_switch_keeps_both_lists() {
        let mut controller = Controller::default();
        let r = controller.begin_recommend();
        controller.finish_recommend(r.ticket, Ok(vec![rec(1, "Emma")]));
        let s = controller.begin_search();
        controller.finish_search(s.ticket, Ok(vec![book(2, "Dune"), book(3, "Emma")]));

        controller.select_tab(Tab::Recommend);
        assert_eq!(controller.active_count(), 1);
        controller.select_tab(Tab::Search);
        assert_eq!(controller.active_count(), 2);
        assert_eq!(controller.recommend_flow().items().len(), 1);
    }

    #[test]
    fn test_flows_are_independent() {
        let mut controller = Controller::default();
        let s = controller.begin_search();
        let r = controller.begin_recommend();

        controller.finish_search(s.ticket, Err(BackendError::Transport("offline".to_string())));

        assert_eq!(controller.tab(), Tab::Recommend);
        assert!(controller.is_loading());
        assert!(controller.error_message().is_none());

        controller.finish_recommend(r.ticket, Ok(vec![rec(1, "Emma")]));
        controller.select_tab(Tab::Search);
        assert_eq!(controller.error_message(), Some("offline"));
    }

    #[test]
    fn test_recommend_uses_current_uid_and_query() {
        let mut controller = Controller::default();
        controller.set_uid("u9".to_string());
        controller.set_query("poetry".to_string());

        let request = controller.begin_recommend();
        assert_eq!(request.uid, "u9");
        assert_eq!(request.query, "poetry");
        assert_eq!(request.k, 12);

        let event = controller.feedback(ItemId::Int(5), DEFAULT_ACTION);
        assert_eq!(event.uid, "u9");
        assert_eq!(event.action, "click");
    }

    #[test]
    fn test_clear_query() {
        let mut controller = Controller::default();
        controller.set_query("dune".to_string());
        controller.clear_query();
        assert_eq!(controller.query(), "");
    }
}
