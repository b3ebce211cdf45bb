use crate::config::AppConfig;
use crate::navigation::{shifted, Direction};
use crate::notice::{Notice, NoticeKind};
use clim_chart::render::{self, AxisLabels};
use clim_chart::{project, Canvas, Projection};
use clim_core::{ClimateError, RangeQuery, YearRecord};
use clim_db::loader::RawSeriesLoader;
use clim_db::{StorageMode, Store};
use clim_state::{bind_router, ChartState, Page, RouteDecision, Router, SubscriptionId};
use serde::Serialize;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use std::time::Instant;
use tokio::task::JoinHandle;

/// What happened to a draw request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawOutcome {
    Drawn,
    /// A newer request was issued while this one waited for data.
    Superseded,
}

/// The data behind the chart currently on the canvas.
#[derive(Debug, Clone)]
pub struct RangeData {
    pub query: RangeQuery,
    pub records: Vec<YearRecord>,
    pub projection: Projection,
    pub labels: AxisLabels,
}

/// Point inspector contents, in measurement units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PointInspection {
    pub year: i32,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub value_at_cursor: f64,
}

impl fmt::Display for PointInspection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: mean {:.2}, min {:.2}, max {:.2}",
            self.year, self.mean, self.min, self.max
        )
    }
}

const MEMORY_ONLY_NOTICE: &str =
    "persistent storage unavailable; caching in memory for this session";

pub struct App<L, C> {
    config: AppConfig,
    state: Rc<ChartState>,
    store: Store<L>,
    canvas: RefCell<C>,
    /// Ticket of the newest draw request.
    seq: Cell<u64>,
    current: RefCell<Option<RangeData>>,
    notices: RefCell<Vec<Notice>>,
    pending: RefCell<Vec<JoinHandle<()>>>,
}

impl<L, C> App<L, C>
where
    L: RawSeriesLoader + 'static,
    C: Canvas + 'static,
{
    pub fn new(config: AppConfig, store: Store<L>, canvas: C) -> Rc<Self> {
        let bounds = config.bounds;
        let state = ChartState::new(bounds, bounds.min, bounds.max, config.default_dataset);
        Rc::new(Self {
            config,
            state: Rc::new(state),
            store,
            canvas: RefCell::new(canvas),
            seq: Cell::new(0),
            current: RefCell::new(None),
            notices: RefCell::new(Vec::new()),
            pending: RefCell::new(Vec::new()),
        })
    }

    /// Open the store described by `config`, degrading to memory-only
    /// caching when persistent storage is unsupported. A degraded store
    /// raises a dismissible banner.
    pub fn open(config: AppConfig, loader: L, canvas: C) -> Result<Rc<Self>, ClimateError> {
        let store = Store::open_or_degrade(config.db_path.as_deref(), config.schema_version, loader)?;
        let app = Self::new(config, store, canvas);
        if app.store.mode() == StorageMode::MemoryOnly {
            app.notices.borrow_mut().push(Notice {
                kind: NoticeKind::Banner,
                message: MEMORY_ONLY_NOTICE.to_string(),
            });
        }
        Ok(app)
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn state(&self) -> &Rc<ChartState> {
        &self.state
    }

    pub fn store(&self) -> &Store<L> {
        &self.store
    }

    pub fn with_canvas<R>(&self, f: impl FnOnce(&C) -> R) -> R {
        f(&self.canvas.borrow())
    }

    pub fn current(&self) -> Option<RangeData> {
        self.current.borrow().clone()
    }

    pub fn current_query(&self) -> Option<RangeQuery> {
        self.current.borrow().as_ref().map(|data| data.query)
    }

    /// Fetch the records for `query` and draw them.
    ///
    /// Only the newest request may touch the canvas: if another draw was
    /// requested while this one awaited data, the result is dropped and
    /// `Superseded` returned. Errors are also reported as notices.
    pub async fn draw_graph(&self, query: RangeQuery) -> Result<DrawOutcome, ClimateError> {
        let ticket = self.seq.get() + 1;
        self.seq.set(ticket);
        let started = Instant::now();

        let result = self
            .store
            .get_data(query.start_year, query.end_year, query.dataset)
            .await;
        let latest = ticket == self.seq.get();

        let records = match result {
            Ok(records) => records,
            Err(e) => {
                if latest || e.is_fatal() {
                    self.report(&e);
                }
                return Err(e);
            }
        };
        if !latest {
            log::debug!(
                "[clim] draw {}-{} {} superseded by #{}",
                query.start_year,
                query.end_year,
                query.dataset,
                self.seq.get()
            );
            return Ok(DrawOutcome::Superseded);
        }

        let projection = project(&records, &self.config.chart);
        let labels = AxisLabels {
            title: query.dataset.title().to_string(),
            first_year: records.first().map(|r| r.year),
            last_year: records.last().map(|r| r.year),
        };
        render::draw(&mut *self.canvas.borrow_mut(), &projection, &labels);
        log::debug!(
            "[clim] draw {}-{} {}: {} records, {:?} mode in {:?}",
            query.start_year,
            query.end_year,
            query.dataset,
            records.len(),
            projection.mode,
            started.elapsed()
        );
        *self.current.borrow_mut() = Some(RangeData {
            query,
            records,
            projection,
            labels,
        });
        Ok(DrawOutcome::Drawn)
    }

    /// Draw whatever the state currently selects.
    pub async fn refresh(&self) -> Result<DrawOutcome, ClimateError> {
        self.draw_graph(self.state.range()).await
    }

    /// Redraw on every `range` event.
    ///
    /// Each event spawns its own local task, so this must be called inside
    /// a `tokio::task::LocalSet`.
    pub fn connect(self: &Rc<Self>) -> SubscriptionId {
        let weak = Rc::downgrade(self);
        self.state.on_range(move |range| {
            if let Some(app) = weak.upgrade() {
                app.spawn_draw(*range);
            }
        })
    }

    fn spawn_draw(self: &Rc<Self>, query: RangeQuery) {
        let app = Rc::clone(self);
        let handle = tokio::task::spawn_local(async move {
            if let Err(e) = app.draw_graph(query).await {
                log::warn!("[clim] draw failed: {}", e);
            }
        });
        self.pending.borrow_mut().push(handle);
    }

    /// Wait for every spawned draw, including ones spawned meanwhile.
    pub async fn settle(&self) {
        loop {
            let handles = std::mem::take(&mut *self.pending.borrow_mut());
            if handles.is_empty() {
                return;
            }
            for handle in handles {
                if let Err(e) = handle.await {
                    log::error!("[clim] draw task failed: {}", e);
                }
            }
        }
    }

    /// Keep the dataset in step with `router`. Pages without a dataset
    /// raise an alert and send the router to the default dataset.
    pub fn bind_router(self: &Rc<Self>, router: Rc<dyn Router>) -> SubscriptionId {
        let weak = Rc::downgrade(self);
        let fallback = self.config.default_dataset.route();
        bind_router(&self.state, router, move |page: &Page| {
            if page.dataset.is_some() {
                return RouteDecision::Accept;
            }
            log::warn!("[clim] invalid route {}", page.path);
            if let Some(app) = weak.upgrade() {
                app.report(&ClimateError::InvalidRoute(page.path.clone()));
            }
            RouteDecision::Redirect(fallback.clone())
        })
    }

    /// Move the range one year. Returns false at the edge of the bounds.
    pub fn shift(&self, direction: Direction) -> bool {
        let (start, end) = (self.state.start_year(), self.state.end_year());
        match shifted(start, end, self.state.bounds(), direction) {
            Some((start, end)) => self.state.set_years(start, end),
            None => false,
        }
    }

    /// Handle a key press; only the arrow keys do anything.
    pub fn handle_key(&self, key: &str) -> bool {
        match Direction::from_key(key) {
            Some(direction) => self.shift(direction),
            None => false,
        }
    }

    /// Record and value under a canvas pixel, if any.
    pub fn inspect(&self, px: f64, py: f64) -> Option<PointInspection> {
        let current = self.current.borrow();
        let data = current.as_ref()?;
        let located = data.projection.locate(px, py)?;
        let record = data.records.get(located.year_index)?;
        Some(PointInspection {
            year: record.year,
            mean: record.mean(),
            min: record.min(),
            max: record.max(),
            value_at_cursor: located.value,
        })
    }

    /// Redraw the current chart with a marker on the record under the
    /// pixel. Without a record there the chart is redrawn plain.
    pub fn show_inspector(&self, px: f64, py: f64) -> Option<PointInspection> {
        let inspection = self.inspect(px, py);
        let current = self.current.borrow();
        let data = current.as_ref()?;
        let mut canvas = self.canvas.borrow_mut();
        render::draw(&mut *canvas, &data.projection, &data.labels);
        if let (Some(found), Some(located)) = (inspection, data.projection.locate(px, py)) {
            render::draw_marker(&mut *canvas, &data.projection, located.year_index, &found.to_string());
        }
        inspection
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.borrow().clone()
    }

    /// Drop every dismissible notice. Fatal notices stay.
    pub fn dismiss_notices(&self) {
        self.notices.borrow_mut().retain(|n| !n.is_dismissible());
    }

    /// True once a fatal error was reported; the app must be reloaded.
    pub fn is_fatal(&self) -> bool {
        self.notices
            .borrow()
            .iter()
            .any(|n| n.kind == NoticeKind::Fatal)
    }

    fn report(&self, err: &ClimateError) {
        let notice = Notice::from_error(err);
        match notice.kind {
            NoticeKind::Fatal => log::error!("[clim] {}", notice.message),
            _ => log::warn!("[clim] {}", notice.message),
        }
        let mut notices = self.notices.borrow_mut();
        if !notices.contains(&notice) {
            notices.push(notice);
        }
    }
}
