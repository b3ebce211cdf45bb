//! Page routing and the dataset <-> route binding.

use crate::observable::SubscriptionId;
use crate::state::ChartState;
use clim_core::DatasetType;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

pub const DEFAULT_PATH: &str = "/";
pub const NOT_FOUND_PATH: &str = "/not-found";

/// Redirect chains longer than this are treated as unresolvable.
const MAX_REDIRECTS: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub path: String,
    pub title: String,
    pub dataset: Option<DatasetType>,
    pub redirect: Option<String>,
    pub is_error: bool,
}

impl Page {
    pub fn new(path: &str, title: &str) -> Self {
        Self {
            path: path.to_string(),
            title: title.to_string(),
            dataset: None,
            redirect: None,
            is_error: false,
        }
    }

    /// The chart page for one dataset, at `/<identifier>`.
    pub fn for_dataset(dataset: DatasetType) -> Self {
        Self {
            dataset: Some(dataset),
            ..Self::new(&dataset.route(), dataset.title())
        }
    }

    pub fn redirecting_to(mut self, target: &str) -> Self {
        self.redirect = Some(target.to_string());
        self
    }
}

pub trait Router {
    fn current_path(&self) -> String;
    fn current_page(&self) -> Option<Page>;
    fn push(&self, path: &str);
    fn on_change(&self, callback: Box<dyn Fn(&Page)>);
}

/// What a router guard wants done with a navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    Accept,
    Redirect(String),
}

type PageCallback = Rc<dyn Fn(&Page)>;

/// A router over `#/path` style locations.
///
/// Always knows a default page at `/` and an error page at `/not-found`.
/// An empty path resolves to the default page, an unknown path to the
/// error page.
pub struct HashRouter {
    pages: BTreeMap<String, Page>,
    current: RefCell<String>,
    listeners: RefCell<Vec<PageCallback>>,
}

impl HashRouter {
    pub fn new(pages: impl IntoIterator<Item = Page>) -> Self {
        let mut all = BTreeMap::new();
        all.insert(
            NOT_FOUND_PATH.to_string(),
            Page {
                is_error: true,
                ..Page::new(NOT_FOUND_PATH, "Not found")
            },
        );
        all.insert(
            DEFAULT_PATH.to_string(),
            Page::new(DEFAULT_PATH, "Default page"),
        );
        for page in pages {
            all.insert(page.path.clone(), page);
        }
        Self {
            pages: all,
            current: RefCell::new(DEFAULT_PATH.to_string()),
            listeners: RefCell::new(Vec::new()),
        }
    }

    /// One page per dataset, with `/` redirecting to `default`.
    pub fn for_datasets(default: DatasetType) -> Self {
        let mut pages: Vec<Page> = DatasetType::ALL.iter().map(|d| Page::for_dataset(*d)).collect();
        pages.push(Page::new(DEFAULT_PATH, "Default page").redirecting_to(&default.route()));
        let router = Self::new(pages);
        let (path, _) = router.resolve(DEFAULT_PATH);
        *router.current.borrow_mut() = path;
        router
    }

    pub fn page(&self, path: &str) -> Option<&Page> {
        self.pages.get(path)
    }

    /// Handle a location change from outside, e.g. the address bar or
    /// history navigation. Accepts `#/path` or `/path`.
    pub fn navigate(&self, location: &str) {
        let path = location.trim_start_matches('#');
        self.go(path);
    }

    /// Resolve `path` to the page that will actually be shown.
    fn resolve(&self, path: &str) -> (String, Page) {
        let mut path = if path.is_empty() {
            DEFAULT_PATH.to_string()
        } else {
            path.to_string()
        };
        for _ in 0..=MAX_REDIRECTS {
            match self.pages.get(&path) {
                None => break,
                Some(page) => match &page.redirect {
                    Some(target) if *target != path => path = target.clone(),
                    _ => return (path, page.clone()),
                },
            }
        }
        log::warn!("[clim] no page for {}", path);
        let page = self.pages[NOT_FOUND_PATH].clone();
        (NOT_FOUND_PATH.to_string(), page)
    }

    fn go(&self, path: &str) {
        let (resolved, page) = self.resolve(path);
        if *self.current.borrow() == resolved {
            return;
        }
        log::debug!("[clim] route {} -> {}", path, resolved);
        *self.current.borrow_mut() = resolved.clone();
        let listeners: Vec<PageCallback> = self.listeners.borrow().clone();
        for cb in listeners {
            cb(&page);
            // A listener navigated elsewhere; that navigation already told
            // everyone about the newer page.
            if *self.current.borrow() != resolved {
                break;
            }
        }
    }
}

impl Router for HashRouter {
    fn current_path(&self) -> String {
        self.current.borrow().clone()
    }

    fn current_page(&self) -> Option<Page> {
        self.pages.get(&*self.current.borrow()).cloned()
    }

    fn push(&self, path: &str) {
        self.go(path);
    }

    fn on_change(&self, callback: Box<dyn Fn(&Page)>) {
        self.listeners.borrow_mut().push(Rc::from(callback));
    }
}

/// Keep `state`'s dataset and `router`'s page in step.
///
/// Router changes set the dataset unless `guard` asks for a redirect, in
/// which case the router is sent to the fallback path instead. Dataset
/// changes push `/<dataset>`. The current page is run through the same
/// guard once at bind time.
pub fn bind_router(
    state: &Rc<ChartState>,
    router: Rc<dyn Router>,
    guard: impl Fn(&Page) -> RouteDecision + 'static,
) -> SubscriptionId {
    let guard: Rc<dyn Fn(&Page) -> RouteDecision> = Rc::new(guard);

    let weak_state = Rc::downgrade(state);
    let weak_router = Rc::downgrade(&router);
    let on_page = Rc::clone(&guard);
    router.on_change(Box::new(move |page| {
        let (Some(state), Some(router)) = (weak_state.upgrade(), weak_router.upgrade()) else {
            return;
        };
        apply_page(&state, router.as_ref(), on_page.as_ref(), page);
    }));

    if let Some(page) = router.current_page() {
        apply_page(state, router.as_ref(), guard.as_ref(), &page);
    }

    state.on_dataset(move |dataset| router.push(&dataset.route()))
}

fn apply_page(
    state: &ChartState,
    router: &dyn Router,
    guard: &dyn Fn(&Page) -> RouteDecision,
    page: &Page,
) {
    match guard(page) {
        RouteDecision::Accept => {
            if let Some(dataset) = page.dataset {
                state.set_dataset(dataset);
            }
        }
        RouteDecision::Redirect(path) => {
            log::info!("[clim] route {} rejected, redirecting to {}", page.path, path);
            router.push(&path);
        }
    }
}
