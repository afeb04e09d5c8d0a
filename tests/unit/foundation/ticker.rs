use super::*;

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

#[test]
fn disarmed_ticker_never_fires() {
    let t0 = Instant::now();
    let mut t = Ticker::new(ms(10));
    assert!(!t.poll(t0));
    assert!(!t.poll(t0 + ms(100)));
}

#[test]
fn first_poll_anchors_then_fires_each_interval() {
    let t0 = Instant::now();
    let mut t = Ticker::new(ms(500));
    t.arm();
    assert!(!t.poll(t0));
    assert!(!t.poll(t0 + ms(499)));
    assert!(t.poll(t0 + ms(500)));
    assert!(!t.poll(t0 + ms(600)));
    assert!(t.poll(t0 + ms(1000)));
}

#[test]
fn missed_ticks_collapse_into_one() {
    let t0 = Instant::now();
    let mut t = Ticker::new(ms(16));
    t.arm();
    t.poll(t0);
    assert!(t.poll(t0 + ms(1000)));
    assert!(!t.poll(t0 + ms(1001)));
    assert_eq!(t.next_due(), Some(t0 + ms(1016)));
}

#[test]
fn reschedule_changes_period_from_now() {
    let t0 = Instant::now();
    let mut t = Ticker::new(ms(100));
    t.arm();
    t.poll(t0);
    assert!(t.poll(t0 + ms(100)));
    t.reschedule(t0 + ms(100), ms(40));
    assert_eq!(t.interval(), ms(40));
    assert!(!t.poll(t0 + ms(139)));
    assert!(t.poll(t0 + ms(140)));
}

#[test]
fn disarm_stops_future_ticks_and_zero_interval_is_clamped() {
    let t0 = Instant::now();
    let mut t = Ticker::new(Duration::ZERO);
    assert_eq!(t.interval(), ms(1));
    t.arm();
    t.poll(t0);
    t.disarm();
    assert!(!t.is_armed());
    assert!(!t.poll(t0 + ms(10)));
}
