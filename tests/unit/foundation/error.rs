use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        CaptionError::config("x")
            .to_string()
            .contains("config error:")
    );
    assert!(CaptionError::font("x").to_string().contains("font error:"));
    assert!(CaptionError::fetch("x").to_string().contains("fetch error:"));
    assert!(
        CaptionError::layout("x")
            .to_string()
            .contains("layout error:")
    );
}

#[test]
fn http_error_names_url_and_status() {
    let err = CaptionError::Http {
        url: "https://imgs.xkcd.com/comics/x.png".to_string(),
        status: 404,
    };
    let msg = err.to_string();
    assert!(msg.contains("imgs.xkcd.com/comics/x.png"));
    assert!(msg.contains("404"));
}

#[test]
fn only_network_failures_are_per_comic() {
    assert!(CaptionError::fetch("timeout").is_per_comic());
    assert!(
        CaptionError::Http {
            url: "u".to_string(),
            status: 500
        }
        .is_per_comic()
    );
    assert!(!CaptionError::config("bad dir").is_per_comic());
    assert!(!CaptionError::font("missing").is_per_comic());
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = CaptionError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
