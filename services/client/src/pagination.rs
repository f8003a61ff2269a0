//! services/client/src/pagination.rs
//!
//! The contract every record-list screen uses: the current page and filters
//! live in a published [`QueryParams`], and each change of the derived
//! `(page, filters)` pair triggers exactly one fetch.
//!
//! Only the latest issued fetch may write the list state; an older response
//! that resolves late is dropped. Once unmounted, no fetch writes anything.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use sysfree_core::domain::Page;
use sysfree_core::ports::PageFetcher;
use sysfree_core::query::{Filters, QueryParams};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

pub const LOAD_ERROR: &str = "Error loading data";

/// What a list screen renders.
#[derive(Debug, Clone, PartialEq)]
pub struct ListState<T> {
    pub items: Vec<T>,
    pub total_items: u64,
    pub total_pages: u64,
    pub loading: bool,
    pub error: Option<String>,
}

impl<T> Default for ListState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total_items: 0,
            total_pages: 0,
            loading: false,
            error: None,
        }
    }
}

pub struct ListController<T> {
    fetcher: Arc<dyn PageFetcher<T>>,
    initial_filters: Filters,
    query: watch::Sender<QueryParams>,
    state: watch::Sender<ListState<T>>,
    /// Id of the most recently issued fetch.
    issued: AtomicU64,
    cancel: CancellationToken,
}

impl<T> ListController<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new(fetcher: Arc<dyn PageFetcher<T>>, initial_filters: Filters) -> Self {
        Self::with_query(fetcher, initial_filters, QueryParams::new())
    }

    /// Starts from an existing query, e.g. one restored from a URL.
    pub fn with_query(fetcher: Arc<dyn PageFetcher<T>>, initial_filters: Filters, query: QueryParams) -> Self {
        let (query, _) = watch::channel(query);
        let (state, _) = watch::channel(ListState::default());
        Self {
            fetcher,
            initial_filters,
            query,
            state,
            issued: AtomicU64::new(0),
            cancel: CancellationToken::new(),
        }
    }

    //-------------------------------------------------------------------------------------
    // Derived query state
    //-------------------------------------------------------------------------------------

    pub fn current_page(&self) -> u32 {
        self.query.borrow().page()
    }

    /// The initial filters overlaid with every non-page query entry.
    pub fn filters(&self) -> Filters {
        self.query.borrow().filters(&self.initial_filters)
    }

    pub fn query(&self) -> QueryParams {
        self.query.borrow().clone()
    }

    pub fn subscribe_query(&self) -> watch::Receiver<QueryParams> {
        self.query.subscribe()
    }

    /// `{page, ...filters}` as sent to the fetcher.
    pub fn request_params(&self) -> QueryParams {
        QueryParams::for_request(self.current_page(), &self.filters())
    }

    //-------------------------------------------------------------------------------------
    // List state
    //-------------------------------------------------------------------------------------

    pub fn state(&self) -> ListState<T> {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ListState<T>> {
        self.state.subscribe()
    }

    //-------------------------------------------------------------------------------------
    // Query updates
    //-------------------------------------------------------------------------------------

    /// Moves to page `page`, leaving the filters untouched.
    ///
    /// The page is clamped to `[1, total_pages]` once a load has reported the total.
    pub fn go_to_page(&self, page: u32) {
        let page = clamp_page(page, self.state.borrow().total_pages);
        let next = self.query.borrow().with_page(page);
        self.publish(next);
    }

    /// Merges `updates` over the current filters, drops empty values and
    /// goes back to page 1. Keys absent from the merge are removed.
    pub fn apply_filters<I, K, V>(&self, updates: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let next = QueryParams::apply_filters(&self.filters(), updates);
        self.publish(next);
    }

    /// Back to page 1 with no filter keys.
    pub fn clear_filters(&self) {
        self.publish(QueryParams::first_page());
    }

    fn publish(&self, next: QueryParams) {
        self.query.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });
    }

    //-------------------------------------------------------------------------------------
    // Fetching
    //-------------------------------------------------------------------------------------

    /// Fetches the current `(page, filters)` without changing them.
    pub async fn refresh(&self) {
        self.load().await
    }

    /// Fetches the page the query currently points at.
    ///
    /// A failure keeps the previous items and only sets the error message.
    pub async fn load(&self) {
        if self.cancel.is_cancelled() {
            return;
        }
        let id = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        let params = self.request_params();
        self.state.send_modify(|s| {
            s.loading = true;
            s.error = None;
        });

        let result = tokio::select! {
            _ = self.cancel.cancelled() => return,
            result = self.fetcher.fetch_page(&params) => result,
        };

        if self.cancel.is_cancelled() {
            return;
        }
        if self.issued.load(Ordering::SeqCst) != id {
            debug!(request = id, "discarding stale page response");
            return;
        }

        match result {
            Ok(page) => {
                let total_pages = page.total_pages();
                self.state.send_modify(|s| apply_page(s, page));
                // The collection shrank below the current page.
                let current = self.current_page();
                let clamped = clamp_page(current, total_pages);
                if clamped != current {
                    debug!(from = current, to = clamped, "clamping page to the last page");
                    self.go_to_page(clamped);
                }
            }
            Err(e) => {
                error!("error loading page {}: {:?}", params.page(), e);
                self.state.send_modify(|s| {
                    s.loading = false;
                    s.error = Some(LOAD_ERROR.to_string());
                });
            }
        }
    }

    //-------------------------------------------------------------------------------------
    // Lifecycle
    //-------------------------------------------------------------------------------------

    /// Fetches once now and again on every change of `(page, filters)`,
    /// until [`unmount`](Self::unmount) is called.
    pub fn mount(self: &Arc<Self>) -> JoinHandle<()> {
        let controller = Arc::clone(self);
        let mut changes = self.query.subscribe();
        tokio::spawn(async move {
            let mut last = controller.request_params();
            controller.spawn_load();
            loop {
                tokio::select! {
                    _ = controller.cancel.cancelled() => break,
                    changed = changes.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        changes.borrow_and_update();
                        let next = controller.request_params();
                        if next != last {
                            last = next;
                            controller.spawn_load();
                        }
                    }
                }
            }
            debug!("list controller unmounted");
        })
    }

    /// Stops watching the query; in-flight fetches resolve without effect.
    pub fn unmount(&self) {
        self.cancel.cancel();
    }

    pub fn is_mounted(&self) -> bool {
        !self.cancel.is_cancelled()
    }

    fn spawn_load(self: &Arc<Self>) {
        let controller = Arc::clone(self);
        tokio::spawn(async move { controller.load().await });
    }
}

/// `page` within `[1, total_pages]`; only the floor applies while the total is unknown.
fn clamp_page(page: u32, total_pages: u64) -> u32 {
    let last = u32::try_from(total_pages).unwrap_or(u32::MAX);
    if last == 0 {
        page.max(1)
    } else {
        page.clamp(1, last)
    }
}

fn apply_page<T>(state: &mut ListState<T>, page: Page<T>) {
    state.total_items = page.count;
    state.total_pages = page.total_pages();
    state.items = page.results;
    state.loading = false;
    state.error = None;
}
