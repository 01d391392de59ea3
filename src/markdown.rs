//! Markdown Rendering
//!
//! Meeting and task descriptions are Markdown. Built on pulldown-cmark
//! with a few event rewrites:
//! - Raw HTML is shown as text, never injected
//! - `javascript:`/`data:`/`vbscript:` link targets are dropped
//! - Images are constrained; video links (mp4/webm/mov) become `<video>`

use pulldown_cmark::{html::push_html, CowStr, Event, Options, Parser, Tag, TagEnd};

/// Parse markdown into sanitized HTML
pub fn parse_markdown(text: &str) -> String {
    let parser = Parser::new_ext(text, get_options());
    let events = transform_events(parser);
    let mut html_output = String::new();
    push_html(&mut html_output, events.into_iter());
    html_output
}

/// Parse markdown for inline use (strips outer <p> tags)
pub fn parse_markdown_inline(text: &str) -> String {
    let html = parse_markdown(text);

    html.trim()
        .strip_prefix("<p>")
        .and_then(|s| s.strip_suffix("</p>"))
        .map(|s| s.to_string())
        .unwrap_or(html)
}

fn get_options() -> Options {
    Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TABLES | Options::ENABLE_TASKLISTS
}

// State for the event transformer
enum State {
    Normal,
    /// Inside an image whose alt text is dropped
    InMedia { depth: usize },
}

fn transform_events<'a>(parser: Parser<'a>) -> Vec<Event<'a>> {
    let mut events = Vec::new();
    let mut state = State::Normal;

    for event in parser {
        match state {
            State::Normal => match event {
                Event::Html(html) | Event::InlineHtml(html) => events.push(Event::Text(html)),

                Event::Start(Tag::Link { link_type, dest_url, title, id }) => {
                    let dest_url = if is_safe_url(&dest_url) { dest_url } else { CowStr::from("#") };
                    events.push(Event::Start(Tag::Link { link_type, dest_url, title, id }));
                }

                Event::Start(Tag::Image { dest_url, .. }) => {
                    if is_safe_url(&dest_url) {
                        let url = escape_attr(&dest_url);
                        let html = if is_video_url(&dest_url) {
                            format!(r#"<video controls src="{}" class="md-media"></video>"#, url)
                        } else {
                            format!(r#"<img src="{}" class="md-media" />"#, url)
                        };
                        events.push(Event::Html(CowStr::from(html)));
                    }
                    state = State::InMedia { depth: 0 };
                }

                other => events.push(other),
            },
            State::InMedia { depth } => match event {
                Event::Start(_) => state = State::InMedia { depth: depth + 1 },
                Event::End(TagEnd::Image) if depth == 0 => state = State::Normal,
                Event::End(_) => state = State::InMedia { depth: depth.saturating_sub(1) },
                _ => {}
            },
        }
    }
    events
}

fn is_safe_url(url: &str) -> bool {
    let lower: String = url.trim().chars().filter(|c| !c.is_whitespace() && !c.is_control()).collect::<String>().to_lowercase();
    !(lower.starts_with("javascript:") || lower.starts_with("data:") || lower.starts_with("vbscript:"))
}

fn is_video_url(url: &str) -> bool {
    let lower = url.to_lowercase();
    lower.ends_with(".mp4") || lower.ends_with(".webm") || lower.ends_with(".mov")
}

fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_markdown() {
        let html = parse_markdown("**Paper:** _Nature_ 2026\n\n- one\n- two");
        assert!(html.contains("<strong>Paper:</strong>"));
        assert!(html.contains("<em>Nature</em>"));
        assert!(html.contains("<li>one</li>"));
    }

    #[test]
    fn test_raw_html_is_escaped() {
        let html = parse_markdown("<script>alert(1)</script>\n\nhi <b>there</b>");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<b>"));
    }

    #[test]
    fn test_javascript_links_are_neutralized() {
        let html = parse_markdown("[click](javascript:alert(1)) and [docs](https://example.org)");
        assert!(!html.contains("javascript:"));
        assert!(html.contains(r##"href="#""##));
        assert!(html.contains(r#"href="https://example.org""#));
    }

    #[test]
    fn test_images_and_videos() {
        let html = parse_markdown("![gel](https://lab.example/gel.png)");
        assert!(html.contains(r#"<img src="https://lab.example/gel.png""#));
        assert!(!html.contains("gel</"));

        let html = parse_markdown("![talk](https://lab.example/talk.mp4)");
        assert!(html.contains("<video controls"));
    }

    #[test]
    fn test_inline_strips_paragraph() {
        assert_eq!(parse_markdown_inline("plain *text*"), "plain <em>text</em>");
    }
}
