use super::*;

#[test]
fn scaled_rounds_and_floors_at_one_pixel() {
    let s = FrameSize::new(100, 50);
    assert_eq!(s.scaled(1.0), s);
    assert_eq!(s.scaled(1.25), FrameSize::new(125, 63));
    assert_eq!(FrameSize::new(1, 1).scaled(0.5), FrameSize::new(1, 1));
}

#[test]
fn parse_accepts_wxh_and_rejects_zero() {
    assert_eq!(FrameSize::parse("64x48"), Some(FrameSize::new(64, 48)));
    assert_eq!(FrameSize::parse(" 3X2 "), Some(FrameSize::new(3, 2)));
    assert_eq!(FrameSize::parse("0x2"), None);
    assert_eq!(FrameSize::parse("64"), None);
    assert_eq!(FrameSize::new(7, 9).to_string(), "7x9");
}
