use super::*;

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

fn setup(seed: u64) -> (BehaviorScheduler, StateMachine, Instant) {
    let mut machine = StateMachine::new();
    machine.initialize(PetState::Idle);
    let sched = BehaviorScheduler::new(ScheduleConfig::default(), PetRng::seeded(seed));
    (sched, machine, Instant::now())
}

#[test]
fn weighted_draw_thresholds() {
    let cfg = ScheduleConfig::default();
    assert_eq!(pick_next_state(0.0, &cfg), PetState::Idle);
    assert_eq!(pick_next_state(0.49, &cfg), PetState::Idle);
    assert_eq!(pick_next_state(0.5, &cfg), PetState::Wander);
    assert_eq!(pick_next_state(0.84, &cfg), PetState::Wander);
    assert_eq!(pick_next_state(0.85, &cfg), PetState::Idle);
    assert_eq!(pick_next_state(0.999, &cfg), PetState::Idle);
}

#[test]
fn autonomous_draw_never_yields_sleep_or_interact() {
    let cfg = ScheduleConfig::default();
    let mut rng = PetRng::seeded(11);
    for _ in 0..2000 {
        let s = pick_next_state(rng.roll(), &cfg);
        assert!(matches!(s, PetState::Idle | PetState::Wander));
    }
}

#[test]
fn start_seeds_hold_time_within_idle_range() {
    let (mut sched, machine, t0) = setup(1);
    assert!(!sched.is_running());
    sched.start(&machine, t0);
    assert!(sched.is_running());
    let hold = sched.state_end().unwrap() - t0;
    assert!((3..6).contains(&hold.as_secs()));
}

#[test]
fn tick_before_hold_elapses_does_nothing() {
    let (mut sched, mut machine, t0) = setup(2);
    sched.start(&machine, t0);
    let end = sched.state_end().unwrap();
    sched.tick(&mut machine, t0 + ms(500));
    assert_eq!(machine.current(), PetState::Idle);
    assert_eq!(sched.state_end(), Some(end));
}

#[test]
fn tick_after_hold_draws_new_state_and_hold() {
    let (mut sched, mut machine, t0) = setup(3);
    sched.start(&machine, t0);
    let later = t0 + Duration::from_secs(6);
    sched.tick(&mut machine, later);
    let state = machine.current();
    assert!(matches!(state, PetState::Idle | PetState::Wander));
    let hold = sched.state_end().unwrap() - later;
    let expected = match state {
        PetState::Wander => 4..8,
        _ => 3..6,
    };
    assert!(expected.contains(&hold.as_secs()));
}

#[test]
fn interact_is_held_for_two_seconds() {
    let (mut sched, mut machine, t0) = setup(4);
    sched.start(&machine, t0);
    sched.trigger_interact(&mut machine, t0);
    assert_eq!(machine.current(), PetState::Interact);
    assert_eq!(sched.state_end(), Some(t0 + Duration::from_secs(2)));
    assert_eq!(sched.last_interaction(), Some(t0));

    sched.tick(&mut machine, t0 + ms(500));
    sched.tick(&mut machine, t0 + ms(1000));
    sched.tick(&mut machine, t0 + ms(1999));
    assert_eq!(machine.current(), PetState::Interact);

    sched.tick(&mut machine, t0 + ms(2000));
    assert_ne!(machine.current(), PetState::Interact);
}

#[test]
fn drag_override_suspends_ticks_until_end_drag() {
    let (mut sched, mut machine, t0) = setup(5);
    sched.start(&machine, t0);
    sched.begin_drag(&mut machine, t0);
    assert!(sched.is_override_active());
    assert_eq!(machine.current(), PetState::Drag);

    for i in 1..=100 {
        sched.tick(&mut machine, t0 + Duration::from_secs(i));
    }
    assert_eq!(machine.current(), PetState::Drag);

    let release = t0 + Duration::from_secs(101);
    sched.end_drag(&mut machine, release);
    assert!(!sched.is_override_active());
    assert_eq!(machine.current(), PetState::Idle);
    let hold = sched.state_end().unwrap() - release;
    assert!((3..6).contains(&hold.as_secs()));
}

#[test]
fn poll_runs_tick_only_when_timer_due() {
    let (mut sched, mut machine, t0) = setup(6);
    assert!(!sched.poll(&mut machine, t0));
    sched.start(&machine, t0);
    assert!(!sched.poll(&mut machine, t0));
    assert!(!sched.poll(&mut machine, t0 + ms(499)));
    assert!(sched.poll(&mut machine, t0 + ms(500)));
    sched.stop();
    assert!(!sched.poll(&mut machine, t0 + ms(5000)));
}

#[test]
fn fixed_durations_for_drag_and_interact() {
    let (mut sched, _, _) = setup(7);
    let drag = sched.sample_duration(PetState::Drag);
    let interact = sched.sample_duration(PetState::Interact);
    assert_eq!(drag, Duration::from_secs(1));
    assert_eq!(interact, Duration::from_secs(2));
    for _ in 0..200 {
        let d = sched.sample_duration(PetState::Sleep);
        assert!(d >= Duration::from_secs(6) && d < Duration::from_secs(12));
    }
}
