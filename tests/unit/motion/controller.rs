use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use super::*;
use crate::shell::window::HeadlessWindow;

fn window_at(x: f64, y: f64) -> HeadlessWindow {
    HeadlessWindow::new(
        Point::new(x, y),
        FrameSize::new(64, 48),
        Rect::new(0.0, 0.0, 800.0, 600.0),
    )
}

fn controller(seed: u64) -> MotionController {
    MotionController::new(MotionConfig::default(), PetRng::seeded(seed))
}

#[test]
fn bounds_keep_full_extent_on_screen() {
    let b = wander_bounds(Rect::new(10.0, 20.0, 810.0, 620.0), FrameSize::new(64, 48));
    assert_eq!(b, Rect::new(10.0, 20.0, 746.0, 572.0));

    let oversized = wander_bounds(Rect::new(0.0, 0.0, 50.0, 50.0), FrameSize::new(64, 64));
    assert_eq!(oversized, Rect::new(0.0, 0.0, 0.0, 0.0));
}

#[test]
fn stopped_controller_does_not_move() {
    let mut ctl = controller(1);
    let mut win = window_at(100.0, 100.0);
    assert_eq!(ctl.step(&mut win), StepOutcome::Stopped);
    assert_eq!(win.position(), Point::new(100.0, 100.0));
}

#[test]
fn step_advances_fixed_length_toward_target() {
    let mut ctl = controller(2);
    let mut win = window_at(100.0, 100.0);
    ctl.start_wander(&win);
    ctl.target = Point::new(200.0, 100.0);

    let first = ctl.step(&mut win);
    let second = ctl.step(&mut win);
    assert_eq!(first, StepOutcome::Moved(Point::new(102.0, 100.0)));
    assert_eq!(second, StepOutcome::Moved(Point::new(104.0, 100.0)));
}

#[test]
fn arrival_retargets_without_moving() {
    let mut ctl = controller(3);
    let mut win = window_at(100.0, 100.0);
    ctl.start_wander(&win);
    ctl.target = Point::new(101.0, 101.0);

    let outcome = ctl.step(&mut win);
    assert!(matches!(outcome, StepOutcome::Retargeted(_)));
    assert_eq!(win.position(), Point::new(100.0, 100.0));
}

#[test]
fn wander_stays_inside_bounds() {
    let mut ctl = controller(4);
    let mut win = window_at(0.0, 0.0);
    let bounds = wander_bounds(win.work_area(), win.size());
    ctl.start_wander(&win);
    for _ in 0..20_000 {
        ctl.step(&mut win);
        let p = win.position();
        assert!(p.x >= bounds.x0 && p.x <= bounds.x1, "x outside: {p:?}");
        assert!(p.y >= bounds.y0 && p.y <= bounds.y1, "y outside: {p:?}");
        let t = ctl.target();
        assert!(t.x >= bounds.x0 && t.x <= bounds.x1);
        assert!(t.y >= bounds.y0 && t.y <= bounds.y1);
    }
}

#[test]
fn facing_flip_is_announced_once_before_the_move() {
    let mut ctl = controller(5);
    let win = Rc::new(RefCell::new(window_at(100.0, 100.0)));
    let seen = Rc::new(RefCell::new(Vec::new()));
    {
        let seen = seen.clone();
        let win = win.clone();
        ctl.on_facing_changed(move |left| {
            // Position at notification time must still be the pre-step one.
            seen.borrow_mut().push((left, win.borrow().position()));
        });
    }

    ctl.start_wander(&*win.borrow());
    ctl.target = Point::new(200.0, 100.0);
    let mut w = win.borrow().clone();
    ctl.step(&mut w);
    *win.borrow_mut() = w.clone();
    assert!(seen.borrow().is_empty());

    ctl.target = Point::new(0.0, 100.0);
    ctl.step(&mut w);
    assert_eq!(*seen.borrow(), vec![(true, Point::new(102.0, 100.0))]);
    assert!(ctl.facing_left());
    assert_eq!(w.position(), Point::new(100.0, 100.0));

    ctl.step(&mut w);
    assert_eq!(seen.borrow().len(), 1);
}

#[test]
fn stop_halts_and_poll_respects_timer() {
    let t0 = std::time::Instant::now();
    let mut ctl = controller(6);
    let mut win = window_at(100.0, 100.0);
    ctl.start_wander(&win);
    assert_eq!(ctl.poll(&mut win, t0), StepOutcome::Stopped);
    assert_ne!(
        ctl.poll(&mut win, t0 + Duration::from_millis(16)),
        StepOutcome::Stopped
    );

    ctl.stop();
    assert!(!ctl.is_moving());
    let before = win.position();
    assert_eq!(
        ctl.poll(&mut win, t0 + Duration::from_millis(100)),
        StepOutcome::Stopped
    );
    assert_eq!(ctl.step(&mut win), StepOutcome::Stopped);
    assert_eq!(win.position(), before);
}
