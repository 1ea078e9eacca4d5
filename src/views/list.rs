//! List View
//!
//! Paged table over one dataset plus a detail overlay. The view itself does
//! no I/O: it hands out tickets describing the fetch to run and accepts the
//! results back. Every ticket carries a request token; a result whose token
//! is no longer the latest for its slot is stale and gets dropped, so a slow
//! page-1 response can never overwrite page 2.

use std::sync::Arc;

use tracing::debug;

use crate::graphql::{
    fetch_detail, fetch_page, DataClient, Dataset, FetchError, FetchPolicy, ListPage,
};
use crate::session::SessionContext;

/// Load state of one fetch slot.
#[derive(Debug, Clone, PartialEq)]
pub enum Slot<T> {
    Idle,
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> Slot<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Slot::Loading)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Slot::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Slot::Failed(message) => Some(message),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListTicket {
    pub token: u64,
    pub page: u32,
    pub policy: FetchPolicy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailTicket {
    pub token: u64,
    pub id: String,
}

pub struct DetailOverlay<T> {
    pub id: String,
    pub state: Slot<T>,
}

/// What a list screen shows right now.
pub enum ListDisplay<'a, D: Dataset> {
    /// No identity: the gate renders instead and nothing is fetched.
    Gate,
    Loading,
    Error(&'a str),
    Table(&'a ListPage<D::Item>),
}

pub struct ListView<D: Dataset> {
    dataset: Arc<D>,
    /// Page the current list slot belongs to; `None` until first navigation.
    page: Option<u32>,
    list: Slot<ListPage<D::Item>>,
    /// Last total reported by the upstream, kept across refetches.
    known_total: Option<u32>,
    selected: usize,
    detail: Option<DetailOverlay<D::Detail>>,
    /// Set by `invalidate`: the next list fetch bypasses the response cache.
    refresh: bool,
    list_token: u64,
    detail_token: u64,
    next_token: u64,
}

impl<D: Dataset> ListView<D> {
    pub fn new(dataset: Arc<D>) -> Self {
        Self {
            dataset,
            page: None,
            list: Slot::Idle,
            known_total: None,
            selected: 0,
            detail: None,
            refresh: false,
            list_token: 0,
            detail_token: 0,
            next_token: 0,
        }
    }

    pub fn dataset(&self) -> &Arc<D> {
        &self.dataset
    }

    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1)
    }

    pub fn list(&self) -> &Slot<ListPage<D::Item>> {
        &self.list
    }

    pub fn detail(&self) -> Option<&DetailOverlay<D::Detail>> {
        self.detail.as_ref()
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    fn issue_token(&mut self) -> u64 {
        self.next_token += 1;
        self.next_token
    }

    /// Brings the view in line with the page from the address. Returns a
    /// ticket only when a fetch is needed: on first mount and whenever the
    /// page changes, never for a repeat of the same page.
    pub fn sync_page(&mut self, page: u32, session: &SessionContext) -> Option<ListTicket> {
        if !session.is_present() {
            self.reset();
            return None;
        }

        let page = page.max(1);
        if self.page == Some(page) {
            return None;
        }

        self.page = Some(page);
        self.list = Slot::Loading;
        self.selected = 0;
        self.close_detail();

        let policy = if std::mem::take(&mut self.refresh) {
            FetchPolicy::NetworkOnly
        } else {
            FetchPolicy::CacheFirst
        };
        let token = self.issue_token();
        self.list_token = token;
        debug!(
            "{} list: requesting page {} (token {}, {:?})",
            self.dataset.title(),
            page,
            token,
            policy
        );
        Some(ListTicket { token, page, policy })
    }

    /// Forgets the current page so the next sync refetches it from the
    /// network.
    pub fn invalidate(&mut self) {
        self.page = None;
        self.refresh = true;
    }

    /// Drops all data and in-flight requests (sign-out).
    pub fn reset(&mut self) {
        self.page = None;
        self.list = Slot::Idle;
        self.selected = 0;
        self.refresh = false;
        self.close_detail();
        // Anything still in flight now answers a token nobody holds.
        self.list_token = self.issue_token();
    }

    /// Applies a list result. Returns `false` when the result was stale.
    pub fn apply_page(
        &mut self,
        ticket: ListTicket,
        result: Result<ListPage<D::Item>, FetchError>,
    ) -> bool {
        if ticket.token != self.list_token {
            debug!(
                "{} list: dropping stale response for page {} (token {}, current {})",
                self.dataset.title(),
                ticket.page,
                ticket.token,
                self.list_token
            );
            return false;
        }

        self.list = match result {
            Ok(page) => {
                if page.total_pages.is_some() {
                    self.known_total = page.total_pages;
                }
                Slot::Ready(page)
            }
            Err(e) => Slot::Failed(e.to_string()),
        };
        true
    }

    /// Opens the overlay for a row of the loaded page.
    pub fn open_detail(&mut self, index: usize, session: &SessionContext) -> Option<DetailTicket> {
        if !session.is_present() {
            return None;
        }
        let id = {
            let page = self.list.ready()?;
            let item = page.items.get(index)?;
            self.dataset.item_id(item).to_string()
        };

        self.selected = index;
        let token = self.issue_token();
        self.detail_token = token;
        self.detail = Some(DetailOverlay {
            id: id.clone(),
            state: Slot::Loading,
        });
        debug!("{} detail: requesting {} (token {})", self.dataset.title(), id, token);
        Some(DetailTicket { token, id })
    }

    pub fn open_selected(&mut self, session: &SessionContext) -> Option<DetailTicket> {
        self.open_detail(self.selected, session)
    }

    pub fn apply_detail(
        &mut self,
        ticket: DetailTicket,
        result: Result<D::Detail, FetchError>,
    ) -> bool {
        let Some(overlay) = self.detail.as_mut() else {
            debug!("{} detail: overlay closed, dropping {}", self.dataset.title(), ticket.id);
            return false;
        };
        if ticket.token != self.detail_token || overlay.id != ticket.id {
            debug!("{} detail: dropping stale response for {}", self.dataset.title(), ticket.id);
            return false;
        }
        overlay.state = match result {
            Ok(detail) => Slot::Ready(detail),
            Err(e) => Slot::Failed(e.to_string()),
        };
        true
    }

    pub fn close_detail(&mut self) {
        self.detail = None;
        self.detail_token = 0;
    }

    pub fn select_next(&mut self) {
        if let Some(page) = self.list.ready() {
            if self.selected + 1 < page.items.len() {
                self.selected += 1;
            }
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn total_pages(&self) -> Option<u32> {
        self.known_total
    }

    pub fn has_previous(&self) -> bool {
        self.page() > 1
    }

    /// With no known total the upstream is treated as unbounded, up to the
    /// last representable page.
    pub fn has_next(&self) -> bool {
        match self.known_total {
            Some(total) => self.page() < total,
            None => self.page() < u32::MAX,
        }
    }

    /// Target page for "previous", if enabled. The caller changes the address.
    pub fn previous_page(&self) -> Option<u32> {
        self.has_previous().then(|| self.page() - 1)
    }

    pub fn next_page(&self) -> Option<u32> {
        self.page().checked_add(1).filter(|_| self.has_next())
    }

    /// Presence is checked on every render, not only when navigating.
    pub fn display(&self, session: &SessionContext) -> ListDisplay<'_, D> {
        if !session.is_present() {
            return ListDisplay::Gate;
        }
        match &self.list {
            Slot::Idle | Slot::Loading => ListDisplay::Loading,
            Slot::Failed(message) => ListDisplay::Error(message),
            Slot::Ready(page) => ListDisplay::Table(page),
        }
    }

    /// Syncs to `page` and, if that requires a fetch, runs it to completion.
    pub async fn load(&mut self, page: u32, session: &SessionContext, client: &DataClient) -> bool {
        let Some(ticket) = self.sync_page(page, session) else {
            return false;
        };
        let result = fetch_page(client, self.dataset.as_ref(), ticket.page, ticket.policy).await;
        self.apply_page(ticket, result)
    }

    /// Opens the overlay for `index` and runs the detail fetch.
    pub async fn show_detail(
        &mut self,
        index: usize,
        session: &SessionContext,
        client: &DataClient,
    ) -> bool {
        let Some(ticket) = self.open_detail(index, session) else {
            return false;
        };
        let result = fetch_detail(client, self.dataset.as_ref(), &ticket.id).await;
        self.apply_detail(ticket, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphql::{Character, Characters, Launches};
    use crate::session::{MemoryStorage, SessionStore};

    fn signed_in() -> SessionContext {
        let ctx = SessionContext::mount(SessionStore::new(Arc::new(MemoryStorage::new())));
        ctx.sign_in("ana", "eng");
        ctx
    }

    fn page_of(ids: &[&str], page: u32, total: Option<u32>) -> ListPage<Character> {
        ListPage {
            items: ids
                .iter()
                .map(|id| Character {
                    id: id.to_string(),
                    name: Some(format!("char {}", id)),
                    status: None,
                    species: None,
                    gender: None,
                    image: None,
                })
                .collect(),
            page_index: page,
            total_pages: total,
        }
    }

    #[test]
    fn test_no_fetch_without_identity() {
        let ctx = SessionContext::mount(SessionStore::detached());
        let mut view = ListView::new(Arc::new(Characters));
        assert!(view.sync_page(1, &ctx).is_none());
        assert!(matches!(view.display(&ctx), ListDisplay::Gate));
    }

    #[test]
    fn test_same_page_fetches_once() {
        let ctx = signed_in();
        let mut view = ListView::new(Arc::new(Characters));
        assert!(view.sync_page(1, &ctx).is_some());
        assert!(view.sync_page(1, &ctx).is_none());
        assert!(view.sync_page(2, &ctx).is_some());
    }

    #[test]
    fn test_loading_hides_previous_rows() {
        let ctx = signed_in();
        let mut view = ListView::new(Arc::new(Characters));
        let t1 = view.sync_page(1, &ctx).unwrap();
        view.apply_page(t1, Ok(page_of(&["1", "2"], 1, Some(3))));
        assert!(matches!(view.display(&ctx), ListDisplay::Table(_)));

        view.sync_page(2, &ctx).unwrap();
        assert!(matches!(view.display(&ctx), ListDisplay::Loading));
    }

    #[test]
    fn test_stale_response_is_dropped() {
        let ctx = signed_in();
        let mut view = ListView::new(Arc::new(Characters));
        let slow = view.sync_page(1, &ctx).unwrap();
        let fast = view.sync_page(2, &ctx).unwrap();

        assert!(view.apply_page(fast, Ok(page_of(&["21"], 2, Some(3)))));
        assert!(!view.apply_page(slow, Ok(page_of(&["1"], 1, Some(3)))));
        assert_eq!(view.list().ready().unwrap().items[0].id, "21");
    }

    #[test]
    fn test_failed_list_blocks_detail() {
        let ctx = signed_in();
        let mut view = ListView::new(Arc::new(Characters));
        let t = view.sync_page(1, &ctx).unwrap();
        view.apply_page(t, Err(FetchError::Network("offline".into())));

        assert_eq!(view.list().error(), Some("Network error: offline"));
        assert!(view.open_detail(0, &ctx).is_none());
        assert!(view.has_next());
    }

    #[test]
    fn test_detail_error_leaves_list_untouched() {
        let ctx = signed_in();
        let mut view = ListView::new(Arc::new(Characters));
        let t = view.sync_page(1, &ctx).unwrap();
        view.apply_page(t, Ok(page_of(&["1", "2"], 1, Some(1))));

        let d = view.open_detail(1, &ctx).unwrap();
        assert_eq!(d.id, "2");
        assert!(view.detail().unwrap().state.is_loading());
        view.apply_detail(d, Err(FetchError::NotFound("2".into())));

        assert_eq!(view.detail().unwrap().state.error(), Some("No record found for id 2"));
        assert_eq!(view.list().ready().unwrap().items.len(), 2);
    }

    #[test]
    fn test_closed_overlay_ignores_late_detail() {
        let ctx = signed_in();
        let mut view = ListView::new(Arc::new(Characters));
        let t = view.sync_page(1, &ctx).unwrap();
        view.apply_page(t, Ok(page_of(&["1"], 1, Some(1))));

        let d = view.open_detail(0, &ctx).unwrap();
        view.close_detail();
        let late = Characters
            .read_detail("1", serde_json::json!({ "character": { "id": "1" } }));
        assert!(!view.apply_detail(d, late));
        assert!(view.detail().is_none());
    }

    #[test]
    fn test_pagination_bounds_with_total() {
        let ctx = signed_in();
        let mut view = ListView::new(Arc::new(Characters));
        let t = view.sync_page(1, &ctx).unwrap();
        view.apply_page(t, Ok(page_of(&["1"], 1, Some(2))));
        assert_eq!(view.previous_page(), None);
        assert_eq!(view.next_page(), Some(2));

        let t = view.sync_page(2, &ctx).unwrap();
        // Bound still known while page 2 loads.
        assert_eq!(view.next_page(), None);
        view.apply_page(t, Ok(page_of(&["9"], 2, Some(2))));
        assert_eq!(view.next_page(), None);
        assert_eq!(view.previous_page(), Some(1));
    }

    #[test]
    fn test_unbounded_dataset_always_allows_next() {
        let ctx = signed_in();
        let mut view = ListView::new(Arc::new(Launches::default()));
        view.sync_page(40, &ctx).unwrap();
        assert!(view.has_next());
        assert_eq!(view.next_page(), Some(41));
    }

    #[test]
    fn test_reset_on_sign_out_drops_in_flight() {
        let ctx = signed_in();
        let mut view = ListView::new(Arc::new(Characters));
        let t = view.sync_page(1, &ctx).unwrap();

        ctx.sign_out();
        assert!(view.sync_page(1, &ctx).is_none());
        assert!(!view.apply_page(t, Ok(page_of(&["1"], 1, Some(1)))));
        assert!(matches!(view.display(&ctx), ListDisplay::Gate));
    }

    #[test]
    fn test_selection_is_clamped() {
        let ctx = signed_in();
        let mut view = ListView::new(Arc::new(Characters));
        let t = view.sync_page(1, &ctx).unwrap();
        view.apply_page(t, Ok(page_of(&["1", "2"], 1, Some(1))));

        view.select_previous();
        assert_eq!(view.selected(), 0);
        view.select_next();
        view.select_next();
        assert_eq!(view.selected(), 1);
    }

    #[test]
    fn test_request_tokens_are_unique() {
        let ctx = signed_in();
        let mut view = ListView::new(Arc::new(Characters));
        let a = view.sync_page(1, &ctx).unwrap();
        view.invalidate();
        let b = view.sync_page(1, &ctx).unwrap();
        assert_ne!(a.token, b.token);
    }

    #[test]
    fn test_next_page_stops_at_last_representable_page() {
        let ctx = signed_in();
        let mut view = ListView::new(Arc::new(Launches::default()));
        let page = crate::views::Route::parse("/launches?page=4294967295")
            .page()
            .unwrap();
        view.sync_page(page, &ctx).unwrap();

        assert_eq!(view.page(), u32::MAX);
        assert!(!view.has_next());
        assert_eq!(view.next_page(), None);
        assert_eq!(view.previous_page(), Some(u32::MAX - 1));
    }

    #[test]
    fn test_invalidate_bypasses_cache_once() {
        let ctx = signed_in();
        let mut view = ListView::new(Arc::new(Characters));
        let first = view.sync_page(1, &ctx).unwrap();
        assert_eq!(first.policy, FetchPolicy::CacheFirst);

        view.invalidate();
        let reload = view.sync_page(1, &ctx).unwrap();
        assert_eq!(reload.policy, FetchPolicy::NetworkOnly);

        let next = view.sync_page(2, &ctx).unwrap();
        assert_eq!(next.policy, FetchPolicy::CacheFirst);
    }
}
