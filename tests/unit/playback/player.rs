use image::Rgba;

use super::*;

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

fn animation(durations: &[u32]) -> Arc<AnimatedImage> {
    let frames = durations
        .iter()
        .enumerate()
        .map(|(i, _)| {
            let mut img = RgbaImage::new(3, 2);
            img.put_pixel(0, 0, Rgba([i as u8, 0, 0, 255]));
            img
        })
        .collect();
    Arc::new(AnimatedImage::new(frames, durations.to_vec()).unwrap())
}

#[test]
fn timer_follows_per_frame_durations() {
    let mut player = FramePlayer::new();
    player.start(animation(&[100, 300, 50]));
    assert!(player.is_playing());
    assert_eq!(player.frame_interval(), ms(100));

    let t0 = Instant::now();
    assert!(!player.poll(t0));
    assert!(!player.poll(t0 + ms(99)));
    assert!(player.poll(t0 + ms(100)));
    assert_eq!(player.frame_index(), 1);
    assert_eq!(player.frame_interval(), ms(300));

    assert!(!player.poll(t0 + ms(399)));
    assert!(player.poll(t0 + ms(400)));
    assert_eq!(player.frame_index(), 2);
    assert_eq!(player.frame_interval(), ms(50));

    assert!(player.poll(t0 + ms(450)));
    assert_eq!(player.frame_index(), 0);
    assert_eq!(player.frames_advanced(), 3);
}

#[test]
fn stills_do_not_run_a_timer() {
    let mut player = FramePlayer::new();
    player.start(animation(&[1000]));
    assert!(!player.is_playing());
    let t0 = Instant::now();
    assert!(!player.poll(t0));
    assert!(!player.poll(t0 + ms(5000)));
    assert!(!player.advance(t0));
    assert_eq!(player.frame_index(), 0);
}

#[test]
fn restart_shows_first_frame() {
    let anim = animation(&[10, 10]);
    let mut player = FramePlayer::new();
    player.start(anim.clone());
    player.advance(Instant::now());
    assert_eq!(player.frame_index(), 1);
    player.start(anim);
    assert_eq!(player.frame_index(), 0);
    player.stop();
    assert!(!player.is_playing());
}

#[test]
fn facing_left_mirrors_and_memoizes() {
    let mut player = FramePlayer::new();
    assert!(player.current_frame().is_none());
    player.start(animation(&[10, 10]));

    let plain = player.current_frame().unwrap();
    assert_eq!(plain.get_pixel(0, 0)[3], 255);

    player.set_facing_left(true);
    let first = player.current_frame().unwrap();
    assert_eq!(first.get_pixel(2, 0)[3], 255);
    assert_eq!(first.get_pixel(0, 0)[3], 0);
    let again = player.current_frame().unwrap();
    assert!(Arc::ptr_eq(&first, &again));

    player.set_facing_left(false);
    assert!(Arc::ptr_eq(&player.current_frame().unwrap(), &plain));
}

#[test]
fn display_size_rounds_and_never_collapses() {
    let mut player = FramePlayer::new();
    assert_eq!(player.display_size(2.0), None);
    player.start(animation(&[10]));
    assert_eq!(player.display_size(1.0), Some(FrameSize::new(3, 2)));
    assert_eq!(player.display_size(1.5), Some(FrameSize::new(5, 3)));
    assert_eq!(player.display_size(0.1), Some(FrameSize::new(1, 1)));
}
