use crate::observable::{Emitter, Observable, SubscriptionId};
use clim_core::{DatasetType, RangeQuery, YearBounds};
use clim_utils::years::coerce_year;

/// A bindable field of [`ChartState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    StartYear,
    EndYear,
    Dataset,
}

/// The selected year range and dataset.
///
/// Each field is an [`Observable`]; every change to one of them is followed
/// by a `range` event carrying the normalized [`RangeQuery`]. Chart redraws
/// subscribe to `range` only.
pub struct ChartState {
    bounds: YearBounds,
    start_year: Observable<i32>,
    end_year: Observable<i32>,
    dataset: Observable<DatasetType>,
    range: Emitter<RangeQuery>,
}

impl ChartState {
    /// Years outside `bounds` are clamped on the way in.
    pub fn new(bounds: YearBounds, start_year: i32, end_year: i32, dataset: DatasetType) -> Self {
        Self {
            bounds,
            start_year: Observable::new(bounds.clamp(start_year)),
            end_year: Observable::new(bounds.clamp(end_year)),
            dataset: Observable::new(dataset),
            range: Emitter::new(),
        }
    }

    /// Full bounds selected, temperature shown.
    pub fn with_bounds(bounds: YearBounds) -> Self {
        Self::new(bounds, bounds.min, bounds.max, DatasetType::Temperature)
    }

    pub fn bounds(&self) -> YearBounds {
        self.bounds
    }

    pub fn start_year(&self) -> i32 {
        self.start_year.get()
    }

    pub fn end_year(&self) -> i32 {
        self.end_year.get()
    }

    pub fn dataset(&self) -> DatasetType {
        self.dataset.get()
    }

    /// The normalized range, computed from the current fields.
    pub fn range(&self) -> RangeQuery {
        RangeQuery::normalized(self.start_year(), self.end_year(), self.dataset())
    }

    pub fn set_start_year(&self, year: i32) -> bool {
        let changed = self.start_year.set(self.bounds.clamp(year));
        if changed {
            self.emit_range();
        }
        changed
    }

    pub fn set_end_year(&self, year: i32) -> bool {
        let changed = self.end_year.set(self.bounds.clamp(year));
        if changed {
            self.emit_range();
        }
        changed
    }

    /// Move both bounds at once. Field events fire after both values are
    /// stored, then a single `range` event.
    pub fn set_years(&self, start_year: i32, end_year: i32) -> bool {
        let start_changed = self.start_year.replace(self.bounds.clamp(start_year));
        let end_changed = self.end_year.replace(self.bounds.clamp(end_year));
        if start_changed {
            self.start_year.notify();
        }
        if end_changed {
            self.end_year.notify();
        }
        if start_changed || end_changed {
            self.emit_range();
        }
        start_changed || end_changed
    }

    pub fn set_dataset(&self, dataset: DatasetType) -> bool {
        let changed = self.dataset.set(dataset);
        if changed {
            self.emit_range();
        }
        changed
    }

    /// Set the dataset from its identifier. Unknown identifiers are ignored.
    pub fn set_type_str(&self, value: &str) -> bool {
        match value.parse::<DatasetType>() {
            Ok(dataset) => self.set_dataset(dataset),
            Err(e) => {
                log::debug!("[clim] ignoring dataset change: {}", e);
                false
            }
        }
    }

    /// Assign a field from control text. Years are coerced and clamped;
    /// input that is not a number leaves the field untouched.
    pub fn set_field_str(&self, field: Field, value: &str) -> bool {
        match field {
            Field::StartYear => match coerce_year(value, self.bounds.min, self.bounds.max) {
                Some(year) => self.set_start_year(year),
                None => false,
            },
            Field::EndYear => match coerce_year(value, self.bounds.min, self.bounds.max) {
                Some(year) => self.set_end_year(year),
                None => false,
            },
            Field::Dataset => self.set_type_str(value),
        }
    }

    /// The field as a control would display it.
    pub fn field_string(&self, field: Field) -> String {
        match field {
            Field::StartYear => self.start_year().to_string(),
            Field::EndYear => self.end_year().to_string(),
            Field::Dataset => self.dataset().to_string(),
        }
    }

    pub fn on_start_year(&self, callback: impl Fn(&i32) + 'static) -> SubscriptionId {
        self.start_year.subscribe(callback)
    }

    pub fn on_end_year(&self, callback: impl Fn(&i32) + 'static) -> SubscriptionId {
        self.end_year.subscribe(callback)
    }

    pub fn on_dataset(&self, callback: impl Fn(&DatasetType) + 'static) -> SubscriptionId {
        self.dataset.subscribe(callback)
    }

    pub fn on_range(&self, callback: impl Fn(&RangeQuery) + 'static) -> SubscriptionId {
        self.range.subscribe(callback)
    }

    /// Subscribe to a field's changes in their display form.
    pub fn on_field(&self, field: Field, callback: impl Fn(&str) + 'static) -> SubscriptionId {
        match field {
            Field::StartYear => self.on_start_year(move |v| callback(&v.to_string())),
            Field::EndYear => self.on_end_year(move |v| callback(&v.to_string())),
            Field::Dataset => self.on_dataset(move |v| callback(v.as_str())),
        }
    }

    pub fn unsubscribe_field(&self, field: Field, id: SubscriptionId) -> bool {
        match field {
            Field::StartYear => self.start_year.unsubscribe(id),
            Field::EndYear => self.end_year.unsubscribe(id),
            Field::Dataset => self.dataset.unsubscribe(id),
        }
    }

    pub fn unsubscribe_range(&self, id: SubscriptionId) -> bool {
        self.range.unsubscribe(id)
    }

    fn emit_range(&self) {
        let range = self.range();
        log::debug!(
            "[clim] range {}-{} {}",
            range.start_year,
            range.end_year,
            range.dataset
        );
        self.range.emit(&range);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn state() -> ChartState {
        ChartState::with_bounds(YearBounds::default())
    }

    fn record_ranges(state: &ChartState) -> Rc<RefCell<Vec<RangeQuery>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        state.on_range(move |r| sink.borrow_mut().push(*r));
        seen
    }

    #[test]
    fn range_is_normalized() {
        let s = state();
        s.set_start_year(2000);
        s.set_end_year(1990);
        let r = s.range();
        assert_eq!((r.start_year, r.end_year), (1990, 2000));
        assert_eq!(r.dataset, DatasetType::Temperature);
    }

    #[test]
    fn field_event_precedes_range_event() {
        let s = Rc::new(state());
        let log = Rc::new(RefCell::new(Vec::new()));
        let l1 = Rc::clone(&log);
        s.on_start_year(move |y| l1.borrow_mut().push(format!("start {}", y)));
        let l2 = Rc::clone(&log);
        s.on_range(move |r| l2.borrow_mut().push(format!("range {}", r.start_year)));

        s.set_start_year(1950);
        assert_eq!(*log.borrow(), vec!["start 1950", "range 1950"]);
    }

    #[test]
    fn unchanged_assignment_is_silent() {
        let s = state();
        let ranges = record_ranges(&s);
        assert!(!s.set_start_year(1881));
        assert!(!s.set_dataset(DatasetType::Temperature));
        assert!(ranges.borrow().is_empty());
    }

    #[test]
    fn unknown_dataset_is_ignored_without_event() {
        let s = state();
        let ranges = record_ranges(&s);
        let fired = Rc::new(RefCell::new(0));
        let f = Rc::clone(&fired);
        s.on_dataset(move |_| *f.borrow_mut() += 1);

        assert!(!s.set_type_str("humidity"));
        assert_eq!(s.dataset(), DatasetType::Temperature);
        assert_eq!(*fired.borrow(), 0);
        assert!(ranges.borrow().is_empty());

        assert!(s.set_type_str("precipitation"));
        assert_eq!(s.dataset(), DatasetType::Precipitation);
        assert_eq!(ranges.borrow().len(), 1);
    }

    #[test]
    fn string_years_are_coerced() {
        let s = state();
        assert!(s.set_field_str(Field::StartYear, " 1950 "));
        assert_eq!(s.start_year(), 1950);
        assert!(!s.set_field_str(Field::StartYear, "abc"));
        assert_eq!(s.start_year(), 1950);
        assert!(s.set_field_str(Field::EndYear, "3000"));
        assert_eq!(s.end_year(), 2006);
        assert!(s.set_field_str(Field::StartYear, "1000"));
        assert_eq!(s.start_year(), 1881);
    }

    #[test]
    fn set_years_emits_one_range_event() {
        let s = state();
        let ranges = record_ranges(&s);
        assert!(s.set_years(1900, 1910));
        assert_eq!(ranges.borrow().len(), 1);
        assert_eq!(ranges.borrow()[0].start_year, 1900);
        assert!(!s.set_years(1900, 1910));
        assert_eq!(ranges.borrow().len(), 1);
    }

    #[test]
    fn field_subscribers_see_both_years_after_set_years() {
        let s = Rc::new(state());
        let seen = Rc::new(RefCell::new(None));
        let inner = Rc::downgrade(&s);
        let sink = Rc::clone(&seen);
        s.on_start_year(move |_| {
            if let Some(s) = inner.upgrade() {
                *sink.borrow_mut() = Some((s.start_year(), s.end_year()));
            }
        });
        s.set_years(1900, 1910);
        assert_eq!(*seen.borrow(), Some((1900, 1910)));
    }

    #[test]
    fn construction_clamps_years() {
        let s = ChartState::new(YearBounds::new(1900, 1950), 1800, 2000, DatasetType::Precipitation);
        assert_eq!((s.start_year(), s.end_year()), (1900, 1950));
        assert_eq!(s.field_string(Field::Dataset), "precipitation");
    }
}
