// The shutdown action shared by page hide and fatal frame errors.

#![allow(dead_code)]
#[path = "../src/teardown.rs"]
mod teardown;

use std::cell::Cell;
use std::rc::Rc;
use teardown::Teardown;

#[test]
fn runs_once_across_clones() {
    let calls = Rc::new(Cell::new(0));
    let teardown = Teardown::default();
    let from_frame_loop = teardown.clone();
    let counter = calls.clone();
    teardown.set(move || counter.set(counter.get() + 1));

    // A fatal frame runs it first; the later page hide is a no-op.
    assert!(from_frame_loop.run());
    assert!(!teardown.run());
    assert_eq!(calls.get(), 1);
}

#[test]
fn run_before_set_does_nothing() {
    let teardown = Teardown::default();
    assert!(!teardown.run());

    let ran = Rc::new(Cell::new(false));
    let flag = ran.clone();
    teardown.set(move || flag.set(true));
    assert!(teardown.run());
    assert!(ran.get());
}
