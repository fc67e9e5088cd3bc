use super::*;

#[test]
fn parses_css_forms() {
    assert_eq!(Rgb8::parse_css("#ff0000"), Some(Rgb8::new(255, 0, 0)));
    assert_eq!(Rgb8::parse_css("#0f0"), Some(Rgb8::new(0, 255, 0)));
    assert_eq!(Rgb8::parse_css("#0000ff80"), Some(Rgb8::new(0, 0, 255)));
    assert_eq!(
        Rgb8::parse_css("rgb(10, 20, 30)"),
        Some(Rgb8::new(10, 20, 30))
    );
    assert_eq!(
        Rgb8::parse_css("RGBA(10,20,30,0.5)"),
        Some(Rgb8::new(10, 20, 30))
    );
    assert_eq!(Rgb8::parse_css("white"), Some(Rgb8::WHITE));
    assert_eq!(Rgb8::parse_css("none"), None);
    assert_eq!(Rgb8::parse_css("currentColor"), None);
    assert_eq!(Rgb8::parse_css("#12"), None);
}

#[test]
fn hex6_is_strict() {
    assert_eq!(Rgb8::from_hex6("#A0b1C2"), Some(Rgb8::new(0xa0, 0xb1, 0xc2)));
    assert_eq!(Rgb8::from_hex6("a0b1c2"), Some(Rgb8::new(0xa0, 0xb1, 0xc2)));
    assert_eq!(Rgb8::from_hex6("#fff"), None);
    assert_eq!(Rgb8::from_hex6("#gg0000"), None);
}

#[test]
fn interpolation_rounds_and_reencodes() {
    assert_eq!(interpolate_hex_colors("#000000", "#ffffff", 0.5), "rgb(128,128,128)");
    assert_eq!(interpolate_hex_colors("#ff0000", "#0000ff", 0.0), "rgb(255,0,0)");
    assert_eq!(interpolate_hex_colors("#ff0000", "#0000ff", 1.0), "rgb(0,0,255)");
}

#[test]
fn interpolation_with_non_hex_returns_start() {
    assert_eq!(interpolate_hex_colors("red", "#0000ff", 0.5), "red");
    assert_eq!(interpolate_hex_colors("#ff0000", "rgb(0,0,255)", 0.5), "#ff0000");
}
