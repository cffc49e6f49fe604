// Video id extraction from pasted links.

use std::sync::OnceLock;

use regex::Regex;

fn link_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?:[?&]v=|youtu\.be/|/embed/|/shorts/|/live/)([A-Za-z0-9_-]{11})(?:[^A-Za-z0-9_-]|$)")
            .expect("video link pattern is valid")
    })
}

fn bare_id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z0-9_-]{11}$").expect("video id pattern is valid"))
}

/// Pull the 11-character video id out of a watch, short, embed or
/// shorts link. A bare id is accepted as is.
pub fn extract_video_id(input: &str) -> Option<String> {
    let input = input.trim();
    if bare_id_pattern().is_match(input) {
        return Some(input.to_string());
    }

    link_pattern()
        .captures(input)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}
