// Drag tracking and wheel normalization shared by both frontends.

use halo_core::input::{pixel_wheel_notches, DragTracker, PIXELS_PER_NOTCH};

#[test]
fn drag_reports_deltas_for_the_pressed_pointer() {
    let mut drag = DragTracker::default();
    assert_eq!(drag.moved(1, 10.0, 10.0), None);

    drag.press(1, 10.0, 10.0);
    assert_eq!(drag.moved(1, 14.0, 7.0), Some((4.0, -3.0)));
    assert_eq!(drag.moved(1, 15.0, 7.0), Some((1.0, 0.0)));

    // A second pointer neither moves nor steals the drag.
    drag.press(2, 0.0, 0.0);
    assert_eq!(drag.moved(2, 50.0, 50.0), None);
    drag.release(2);
    assert_eq!(drag.moved(1, 16.0, 8.0), Some((1.0, 1.0)));

    drag.release(1);
    assert_eq!(drag.moved(1, 30.0, 30.0), None);
}

#[test]
fn new_press_starts_from_its_own_position() {
    let mut drag = DragTracker::default();
    drag.press(1, 0.0, 0.0);
    drag.release(1);
    drag.press(1, 100.0, 100.0);
    assert_eq!(drag.moved(1, 101.0, 100.0), Some((1.0, 0.0)));
}

#[test]
fn pixel_scroll_converts_to_notches() {
    assert_eq!(pixel_wheel_notches(PIXELS_PER_NOTCH), 1.0);
    assert_eq!(pixel_wheel_notches(-250.0), -2.5);
    assert_eq!(pixel_wheel_notches(f64::NAN), 0.0);
    assert_eq!(pixel_wheel_notches(f64::INFINITY), 0.0);
}
