//! End-to-end tests for the browser pipeline: load, style, layout, scroll.

use joey_browser::css::{ApproximateFontMetrics, DisplayCommand};
use joey_browser::{Browser, BrowserConfig, LoadError};
use joey_common::net::{FetchError, MemorySource};

const INDEX: &str = "http://example.com/site/index.html";

fn browser(source: MemorySource) -> Browser<MemorySource, ApproximateFontMetrics> {
    Browser::new(source, ApproximateFontMetrics, &BrowserConfig::default())
}

fn texts(browser: &Browser<MemorySource, ApproximateFontMetrics>) -> Vec<String> {
    browser
        .page()
        .expect("page loaded")
        .display_list
        .iter()
        .filter_map(DisplayCommand::text)
        .map(str::to_string)
        .collect()
}

fn long_document(paragraphs: usize) -> String {
    let body: String = (0..paragraphs)
        .map(|i| format!("<p>paragraph {i}</p>"))
        .collect();
    format!("<html><body>{body}</body></html>")
}

#[test]
fn test_load_from_source() {
    let source = MemorySource::new().with(INDEX, "<html><body><p>Hello world</p></body></html>");
    let mut browser = browser(source);

    let page = browser.load(INDEX).expect("load");
    assert_eq!(page.url.as_deref(), Some(INDEX));
    assert!(page.height() > 0.0);
    assert_eq!(texts(&browser), ["Hello", "world"]);
}

#[test]
fn test_linked_stylesheet_applies() {
    let source = MemorySource::new()
        .with(
            INDEX,
            r#"<html><head><link rel="stylesheet" href="style.css"></head>
               <body><p>Hi</p></body></html>"#,
        )
        .with("http://example.com/site/style.css", "p { color: red; }");
    let mut browser = browser(source);
    let _ = browser.load(INDEX).expect("load");

    let page = browser.page().expect("page");
    let colors: Vec<&str> = page
        .display_list
        .iter()
        .filter_map(|command| match command {
            DisplayCommand::Text { color, .. } => Some(color.as_str()),
            DisplayCommand::Rect { .. } => None,
        })
        .collect();
    assert_eq!(colors, ["red"]);
}

#[test]
fn test_missing_stylesheet_is_skipped() {
    let source = MemorySource::new()
        .with(
            INDEX,
            r#"<html><head><link rel="stylesheet" href="gone.css">
               <link rel="stylesheet" href="ok.css"></head><body><p>Hi</p></body></html>"#,
        )
        .with("http://example.com/site/ok.css", "p { background-color: yellow; }");
    let mut browser = browser(source);

    let page = browser.load(INDEX).expect("a bad stylesheet does not fail the page");
    let has_yellow = page.display_list.iter().any(|command| {
        matches!(command, DisplayCommand::Rect { color, .. } if color == "yellow")
    });
    assert!(has_yellow);
}

#[test]
fn test_style_element_and_inline_style() {
    let mut browser = browser(MemorySource::new());
    let _ = browser
        .load_html(
            r#"<html><head><style>p { color: blue; }</style></head>
               <body><p>one</p><p style="color:green">two</p></body></html>"#,
            None,
        )
        .expect("load");

    let page = browser.page().expect("page");
    let colors: Vec<(&str, &str)> = page
        .display_list
        .iter()
        .filter_map(|command| match command {
            DisplayCommand::Text { text, color, .. } => Some((text.as_str(), color.as_str())),
            DisplayCommand::Rect { .. } => None,
        })
        .collect();
    assert_eq!(colors, [("one", "blue"), ("two", "green")]);
}

#[test]
fn test_missing_document_is_fetch_error() {
    let mut browser = browser(MemorySource::new());
    let err = browser.load("http://example.com/nope").err().expect("should fail");
    assert!(matches!(err, LoadError::Fetch(FetchError::NotFound(_))));
    assert!(browser.page().is_none());
}

#[test]
fn test_empty_document_is_parse_error() {
    let mut browser = browser(MemorySource::new());
    let err = browser.load_html("", None).err().expect("should fail");
    assert!(matches!(err, LoadError::Parse(_)));
}

#[test]
fn test_failed_load_keeps_previous_page() {
    let source = MemorySource::new().with(INDEX, "<p>kept</p>");
    let mut browser = browser(source);
    let _ = browser.load(INDEX).expect("load");
    assert!(browser.load("http://example.com/missing").is_err());
    assert_eq!(texts(&browser), ["kept"]);
}

#[test]
fn test_resize_relayouts_only_on_width_change() {
    let words = "alpha beta gamma delta epsilon zeta eta theta iota kappa";
    let mut browser = browser(MemorySource::new());
    let _ = browser
        .load_html(&format!("<html><body><p>{words}</p></body></html>"), None)
        .expect("load");
    let wide_height = browser.document_height();

    assert!(!browser.resize(800.0, 400.0));
    assert!((browser.viewport().height - 400.0).abs() < f32::EPSILON);
    assert!((browser.document_height() - wide_height).abs() < f32::EPSILON);

    assert!(browser.resize(150.0, 400.0));
    assert!(browser.document_height() > wide_height);
    // Same words, more lines.
    assert_eq!(texts(&browser).len(), 10);
}

#[test]
fn test_scroll_is_clamped_to_document() {
    let mut browser = browser(MemorySource::new());
    let _ = browser.load_html(&long_document(100), None).expect("load");
    let max = browser.document_height() - browser.viewport().height;
    assert!(max > 0.0);

    assert!(browser.scroll_up().abs() < f32::EPSILON);
    assert!((browser.scroll_down() - 54.0).abs() < f32::EPSILON);
    assert!((browser.scroll_by(1.0e6) - max).abs() < 1e-3);
    assert!((browser.scroll_down() - max).abs() < 1e-3);
}

#[test]
fn test_short_document_does_not_scroll() {
    let mut browser = browser(MemorySource::new());
    let _ = browser.load_html("<p>short</p>", None).expect("load");
    assert!(browser.scroll_down().abs() < f32::EPSILON);
}

#[test]
fn test_visible_commands_are_culled() {
    let mut browser = browser(MemorySource::new());
    let _ = browser.load_html(&long_document(200), None).expect("load");
    let total = browser.page().expect("page").display_list.len();

    let at_top = browser.visible_commands().count();
    assert!(at_top > 0);
    assert!(at_top < total);

    let scroll = browser.scroll_by(1000.0);
    let height = browser.viewport().height;
    for command in browser.visible_commands() {
        assert!(command.bottom() >= scroll);
        assert!(command.top() <= scroll + height);
    }
}

#[test]
fn test_navigation_resets_scroll() {
    let mut browser = browser(MemorySource::new());
    let _ = browser.load_html(&long_document(100), None).expect("load");
    let _ = browser.scroll_by(500.0);
    let _ = browser.load_html(&long_document(100), None).expect("reload");
    assert!(browser.viewport().scroll.abs() < f32::EPSILON);
}

#[test]
fn test_fonts_are_cached_across_layouts() {
    let mut browser = browser(MemorySource::new());
    let _ = browser
        .load_html("<html><body><p>plain <b>bold</b> <i>italic</i></p></body></html>", None)
        .expect("load");
    let fonts = browser.fonts().font_count();
    assert!(fonts >= 3);
    let _ = browser.resize(400.0, 600.0);
    assert_eq!(browser.fonts().font_count(), fonts);
}

#[test]
fn test_page_title_comes_from_head() {
    let mut browser = browser(MemorySource::new());
    let page = browser
        .load_html(
            "<html><head><title>  My   Page </title></head><body><p>x</p></body></html>",
            None,
        )
        .expect("load");
    assert_eq!(page.title().as_deref(), Some("My Page"));

    let page = browser.load_html("<p>untitled</p>", None).expect("load");
    assert_eq!(page.title(), None);
}
