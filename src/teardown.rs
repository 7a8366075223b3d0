//! One-shot shutdown shared by the page-hide listener and the frame loop's
//! fatal-error path. No `web_sys` types so host tests can include it.

use std::cell::RefCell;
use std::rc::Rc;

type Action = Box<dyn FnOnce()>;

#[derive(Clone, Default)]
pub struct Teardown(Rc<RefCell<Option<Action>>>);

impl Teardown {
    /// Install the shutdown action, replacing any earlier one that has not run.
    pub fn set(&self, action: impl FnOnce() + 'static) {
        *self.0.borrow_mut() = Some(Box::new(action));
    }

    /// Run the action if it is installed and has not run yet.
    pub fn run(&self) -> bool {
        let action = self.0.borrow_mut().take();
        match action {
            Some(f) => {
                f();
                true
            }
            None => false,
        }
    }
}
