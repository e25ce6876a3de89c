use super::*;

#[test]
fn defaults_match_classic_layout() {
    let s = CaptionStyle::default();
    assert_eq!(s.title_font_px, 28.0);
    assert_eq!(s.alt_font_px, 18.0);
    assert_eq!(s.line_padding_px, 5);
    assert_eq!(s.wrap_fill_ratio, 0.95);
    assert_eq!(s.foreground, [255, 255, 255, 255]);
    s.validate().unwrap();
}

#[test]
fn scaling_multiplies_font_sizes() {
    let s = CaptionStyle::default();
    assert_eq!(s.title_px(1), 28.0);
    assert_eq!(s.title_px(2), 56.0);
    assert_eq!(s.alt_px(2), 36.0);
    assert_eq!(s.alt_px(0), 18.0);
}

#[test]
fn partial_json_keeps_defaults() {
    let s = CaptionStyle::from_json_str(r#"{ "alt_font_px": 20, "background": [0,0,0,0] }"#)
        .unwrap();
    assert_eq!(s.alt_font_px, 20.0);
    assert_eq!(s.background, [0, 0, 0, 0]);
    assert_eq!(s.title_font_px, 28.0);
}

#[test]
fn unknown_fields_are_rejected() {
    let err = CaptionStyle::from_json_str(r#"{ "title_size": 3 }"#).unwrap_err();
    assert!(matches!(err, CaptionError::Config(_)));
}

#[test]
fn invalid_values_are_rejected() {
    assert!(CaptionStyle::from_json_str(r#"{ "title_font_px": 0 }"#).is_err());
    assert!(CaptionStyle::from_json_str(r#"{ "alt_font_px": -1 }"#).is_err());
    assert!(CaptionStyle::from_json_str(r#"{ "wrap_fill_ratio": 1.5 }"#).is_err());
    assert!(CaptionStyle::from_json_str(r#"{ "wrap_fill_ratio": 0 }"#).is_err());
}

#[test]
fn from_path_reads_file() {
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path().join("style.json");
    std::fs::write(&p, r#"{ "line_padding_px": 8 }"#).unwrap();
    assert_eq!(CaptionStyle::from_path(&p).unwrap().line_padding_px, 8);
    assert!(CaptionStyle::from_path(dir.path().join("missing.json")).is_err());
}
