use super::*;

const BARREL: &str = r#"{
    "month": "1", "num": 1, "link": "", "year": "2006", "news": "",
    "safe_title": "Barrel - Part 1",
    "transcript": "",
    "alt": "Don't we all.",
    "img": "https://imgs.xkcd.com/comics/barrel_cropped_(1).jpg",
    "title": "Barrel - Part 1", "day": "1"
}"#;

#[test]
fn parses_info_json() {
    let r = ComicRecord::from_json_slice(BARREL.as_bytes()).unwrap();
    assert_eq!(r.id, 1);
    assert_eq!(r.title, "Barrel - Part 1");
    assert_eq!(r.alt_text, "Don't we all.");
    assert_eq!(r.extension, "jpg");
    assert!(!r.is_gif);
    assert_eq!(r.file_name(), "1.jpg");
}

#[test]
fn safe_title_wins_over_title() {
    let json = r#"{"num": 7, "safe_title": "Safe", "title": "<b>Raw</b>",
        "alt": "a", "img": "https://imgs.xkcd.com/comics/x.png"}"#;
    assert_eq!(ComicRecord::from_json_slice(json.as_bytes()).unwrap().title, "Safe");
}

#[test]
fn gif_is_detected_case_insensitively() {
    let r = ComicRecord::new(961, "Eternal Flame", "", "https://imgs.xkcd.com/comics/eternal_flame.GIF")
        .unwrap();
    assert!(r.is_gif);
    assert_eq!(r.extension, "gif");
}

#[test]
fn hires_url_inserts_2x_before_extension() {
    let r = ComicRecord::new(2000, "t", "a", "https://imgs.xkcd.com/comics/xkcd_phone_2.png").unwrap();
    assert_eq!(
        r.hires_url().as_str(),
        "https://imgs.xkcd.com/comics/xkcd_phone_2_2x.png"
    );
}

#[test]
fn missing_fields_are_fetch_errors() {
    let err = ComicRecord::from_json_slice(br#"{"num": 1}"#).unwrap_err();
    assert!(matches!(err, CaptionError::Fetch(_)));
    assert!(err.is_per_comic());
}

#[test]
fn image_url_without_extension_is_rejected() {
    assert!(ComicRecord::new(1, "t", "a", "https://imgs.xkcd.com/comics/").is_err());
    assert!(ComicRecord::new(1, "t", "a", "not a url").is_err());
}
