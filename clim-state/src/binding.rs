//! Two-way sync between a [`ChartState`] field and a form control.

use crate::observable::SubscriptionId;
use crate::state::{ChartState, Field};
use std::rc::Rc;

/// A control whose value can be read, written and watched, such as a
/// `<select>` element.
///
/// `set_value` is a programmatic write and must not fire change handlers.
pub trait BindableControl {
    fn value(&self) -> String;
    fn set_value(&self, value: &str);
    fn on_change(&self, handler: Box<dyn Fn(String)>);
}

/// A live binding. Dropping it keeps the binding; call [`Binding::unbind`]
/// to stop state changes reaching the control.
#[derive(Debug)]
pub struct Binding {
    field: Field,
    subscription: SubscriptionId,
}

impl Binding {
    pub fn unbind(self, state: &ChartState) -> bool {
        state.unsubscribe_field(self.field, self.subscription)
    }
}

/// Bind `control` to `field`.
///
/// The control is initialized from state. Control changes are pushed into
/// state and, if coercion left state showing something else, the control is
/// reset to the state value. State changes are written to the control unless
/// it already displays the same text.
pub fn bind_control(
    state: &Rc<ChartState>,
    control: Rc<dyn BindableControl>,
    field: Field,
) -> Binding {
    control.set_value(&state.field_string(field));

    let weak_state = Rc::downgrade(state);
    let weak_control = Rc::downgrade(&control);
    control.on_change(Box::new(move |value| {
        let Some(state) = weak_state.upgrade() else {
            return;
        };
        state.set_field_str(field, &value);
        if let Some(control) = weak_control.upgrade() {
            let shown = state.field_string(field);
            if control.value() != shown {
                control.set_value(&shown);
            }
        }
    }));

    let subscription = state.on_field(field, move |value| {
        if control.value() == value {
            return;
        }
        control.set_value(value);
    });

    Binding {
        field,
        subscription,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clim_core::{DatasetType, YearBounds};
    use std::cell::{Cell, RefCell};

    type Handler = Rc<dyn Fn(String)>;

    #[derive(Default)]
    struct MockControl {
        value: RefCell<String>,
        writes: Cell<usize>,
        handlers: RefCell<Vec<Handler>>,
    }

    impl MockControl {
        /// What a user edit does: change the value, then fire handlers.
        fn input(&self, value: &str) {
            *self.value.borrow_mut() = value.to_string();
            let handlers: Vec<Handler> = self.handlers.borrow().clone();
            for h in handlers {
                h(value.to_string());
            }
        }
    }

    impl BindableControl for MockControl {
        fn value(&self) -> String {
            self.value.borrow().clone()
        }
        fn set_value(&self, value: &str) {
            self.writes.set(self.writes.get() + 1);
            *self.value.borrow_mut() = value.to_string();
        }
        fn on_change(&self, handler: Box<dyn Fn(String)>) {
            self.handlers.borrow_mut().push(Rc::from(handler));
        }
    }

    fn setup(field: Field) -> (Rc<ChartState>, Rc<MockControl>, Binding) {
        let state = Rc::new(ChartState::with_bounds(YearBounds::default()));
        let control = Rc::new(MockControl::default());
        let binding = bind_control(&state, control.clone(), field);
        (state, control, binding)
    }

    #[test]
    fn initializes_control_from_state() {
        let (_state, control, _b) = setup(Field::EndYear);
        assert_eq!(control.value(), "2006");
        assert_eq!(control.writes.get(), 1);
    }

    #[test]
    fn control_changes_reach_state() {
        let (state, control, _b) = setup(Field::StartYear);
        control.input("1950");
        assert_eq!(state.start_year(), 1950);
        // state echo matched the control, so no write-back happened
        assert_eq!(control.writes.get(), 1);
    }

    #[test]
    fn state_changes_reach_control() {
        let (state, control, _b) = setup(Field::StartYear);
        state.set_start_year(1999);
        assert_eq!(control.value(), "1999");
        assert_eq!(control.writes.get(), 2);
    }

    #[test]
    fn coerced_input_is_written_back() {
        let (state, control, _b) = setup(Field::EndYear);
        control.input("3000");
        assert_eq!(state.end_year(), 2006);
        assert_eq!(control.value(), "2006");

        control.input("junk");
        assert_eq!(state.end_year(), 2006);
        assert_eq!(control.value(), "2006");
    }

    #[test]
    fn dataset_field_binds_by_identifier() {
        let (state, control, _b) = setup(Field::Dataset);
        assert_eq!(control.value(), "temperature");
        control.input("precipitation");
        assert_eq!(state.dataset(), DatasetType::Precipitation);
        control.input("snow");
        assert_eq!(state.dataset(), DatasetType::Precipitation);
        assert_eq!(control.value(), "precipitation");
    }

    #[test]
    fn unbind_stops_state_to_control() {
        let (state, control, binding) = setup(Field::StartYear);
        assert!(binding.unbind(&state));
        state.set_start_year(1920);
        assert_eq!(control.value(), "1881");
    }
}
