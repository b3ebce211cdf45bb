//! Reactive state for the climate chart.
//!
//! - `observable`: a value cell with change subscribers, and a bare emitter
//! - `state`: `ChartState`, the year range and dataset plus the derived `range`
//! - `binding`: two-way sync between a state field and a form control
//! - `router`: the router interface, a hash router, and the dataset <-> route binding
//!
//! One `ChartState` is created by the application and shared by `Rc`; there
//! is no global instance.

pub mod binding;
pub mod observable;
pub mod router;
pub mod state;

pub use binding::{bind_control, BindableControl, Binding};
pub use observable::{Emitter, Observable, SubscriptionId};
pub use router::{bind_router, HashRouter, Page, RouteDecision, Router};
pub use state::{ChartState, Field};
