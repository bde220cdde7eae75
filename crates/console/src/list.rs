use {
    convene_gateway::{Operation, OperationGateway, TransportError},
    convene_operations::{MutationOutcome, NullableExt, Page, PageQuery},
    tracing::debug,
};

use crate::notice::Notice;

pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// State behind one paginated list screen.
///
/// Items are kept in the order the server returned them. A failed load
/// leaves the previous items in place and records a notice.
#[derive(Debug, Clone, PartialEq)]
pub struct PageState<T> {
    items: Vec<T>,
    total: u64,
    page: u64,
    /// Page count as last reported by the server.
    pages: Option<u64>,
    page_size: u32,
    key: Option<String>,
    loading: bool,
    notice: Option<Notice>,
}

impl<T> Default for PageState<T> {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl<T> PageState<T> {
    pub fn new(page_size: u32) -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            page: 1,
            pages: None,
            page_size,
            key: None,
            loading: false,
            notice: None,
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    /// Number of pages, derived from the total when the server sent none.
    pub fn pages(&self) -> u64 {
        self.pages
            .unwrap_or_else(|| self.total.div_ceil(u64::from(self.page_size.max(1))))
            .max(1)
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Change the search key; the next load starts from page one.
    pub fn search(&mut self, key: impl Into<String>) {
        let key = key.into();
        self.key = (!key.trim().is_empty()).then_some(key);
        self.page = 1;
    }

    pub fn go_to(&mut self, page: u64) {
        self.page = page.max(1);
    }

    /// Mark the list as loading and return the arguments to fetch with.
    pub fn begin_load(&mut self) -> PageQuery {
        self.loading = true;
        self.notice = None;
        let page = u32::try_from(self.page).unwrap_or(u32::MAX);
        let query = PageQuery::page(page, self.page_size);
        match &self.key {
            Some(key) => query.with_key(key.clone()),
            None => query,
        }
    }

    /// Take in the result of a load.
    pub fn apply(&mut self, result: Result<Page<T>, TransportError>) {
        self.loading = false;
        match result {
            Ok(page) => {
                self.total = page.total;
                self.page = page.page.max(1);
                self.pages = page.pages.value().copied();
                self.items = page.results;
            },
            Err(_) => self.notice = Some(Notice::RequestFailed),
        }
    }

    /// Drop matching items once the backend confirmed a delete or removal.
    /// Nothing changes unless the mutation succeeded.
    pub fn apply_removal<P>(
        &mut self,
        result: &Result<MutationOutcome<P>, TransportError>,
        matches: impl Fn(&T) -> bool,
    ) -> Notice {
        let notice = Notice::from_mutation(result);
        if matches!(notice, Notice::Success(_)) {
            let before = self.items.len();
            self.items.retain(|item| !matches(item));
            let removed = (before - self.items.len()) as u64;
            self.total = self.total.saturating_sub(removed);
            self.pages = None;
            debug!(removed, "removed items after confirmed mutation");
        }
        self.notice = Some(notice.clone());
        notice
    }
}

/// Load one page of a listing operation into `state`.
///
/// `build` receives the paging arguments derived from the state.
pub async fn load_page<T, O>(
    gateway: &OperationGateway,
    state: &mut PageState<T>,
    build: impl FnOnce(PageQuery) -> O,
) where
    O: Operation<Output = Page<T>>,
{
    let op = build(state.begin_load());
    let result = gateway.call(&op).await;
    state.apply(result);
}
