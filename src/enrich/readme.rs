// src/enrich/readme.rs
// =============================================================================
// This module pulls a live-demo link and a preview image out of README text.
//
// How it works:
// - Each kind of link has an ordered list of regex patterns
// - Patterns are tried in order; the first pattern with ANY match wins and
//   its first capture group is the result
// - So priority comes from the pattern list, not from where the link sits in
//   the README
// - Relative image paths are turned into raw.githubusercontent.com URLs
//
// Rust concepts:
// - regex::Regex: Compiled once, reused for every README
// - Option chaining: find_map stops at the first Some
// =============================================================================

use regex::Regex;
use url::Url;

pub const RAW_CONTENT_ROOT: &str = "https://raw.githubusercontent.com";

// Demo links, highest priority first:
// bare hosted-app URLs, then markdown links labelled as a demo
//
// A bare host must END at the app domain: the character after it may not
// continue the hostname (so "foo.streamlit.appspot.com" is not a demo), and a
// lone "." is only allowed as sentence punctuation.
const DEMO_PATTERNS: &[&str] = &[
    r#"(https?://[A-Za-z0-9-]+(?:\.[A-Za-z0-9-]+)*\.streamlit\.app(?:/[^\s)\]"'<>]*)?)(?:[^A-Za-z0-9.-]|\.(?:[^A-Za-z0-9-]|$)|$)"#,
    r#"(https?://huggingface\.co/spaces/[^\s)\]"'<>]+)"#,
    r#"(https?://[A-Za-z0-9-]+\.hf\.space(?:/[^\s)\]"'<>]*)?)(?:[^A-Za-z0-9.-]|\.(?:[^A-Za-z0-9-]|$)|$)"#,
    r#"\[[^\]]*(?i:demo|live|try it)[^\]]*\]\((https?://[^)\s]+)\)"#,
];

// Sentence punctuation that can follow a URL in prose but is never its end
const TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?'];

// Preview images, highest priority first
//
// The <img> pattern wants whitespace before `src` so that attributes like
// `data-src` are not mistaken for it.
const IMAGE_PATTERNS: &[&str] = &[
    r#"!\[[^\]]*\]\((https?://[^)\s]+)"#,
    r#"!\[[^\]]*\]\(([^)\s]+)"#,
    r#"(?i)<img\b[^>]*?\ssrc\s*=\s*["']([^"']+)["']"#,
];

/// Compiled demo/image patterns.
#[derive(Debug, Clone)]
pub struct ReadmeScanner {
    demo_patterns: Vec<Regex>,
    image_patterns: Vec<Regex>,
}

impl ReadmeScanner {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(ReadmeScanner {
            demo_patterns: compile(DEMO_PATTERNS)?,
            image_patterns: compile(IMAGE_PATTERNS)?,
        })
    }

    // First demo link found by the highest-priority matching pattern
    pub fn find_demo_url(&self, readme: &str) -> Option<String> {
        // "Visit https://foo.streamlit.app/page." should not keep the "."
        first_capture(&self.demo_patterns, readme)
            .map(|url| url.trim_end_matches(TRAILING_PUNCTUATION).to_string())
    }

    // First preview image, made absolute for `org/repo` on `branch`
    pub fn find_preview_image(&self, readme: &str, org: &str, repo: &str, branch: &str) -> Option<String> {
        first_capture(&self.image_patterns, readme)
            .map(|path| resolve_image_url(&path, org, repo, branch))
    }
}

fn compile(patterns: &[&str]) -> Result<Vec<Regex>, regex::Error> {
    patterns.iter().map(|pattern| Regex::new(pattern)).collect()
}

fn first_capture(patterns: &[Regex], text: &str) -> Option<String> {
    patterns.iter().find_map(|pattern| {
        pattern
            .captures(text)
            .and_then(|captures| captures.get(1))
            .map(|group| group.as_str().to_string())
    })
}

// Turns an image path from a README into a URL a browser can load
//
// Examples (org "bar", repo "Foo", branch "main"):
//   "https://img.shields.io/x.svg" -> unchanged
//   "./img/demo.png"  -> "https://raw.githubusercontent.com/bar/Foo/main/img/demo.png"
//   "/docs/shot.png"  -> "https://raw.githubusercontent.com/bar/Foo/main/docs/shot.png"
//   "//cdn.example.com/a.png" -> "https://cdn.example.com/a.png"
pub fn resolve_image_url(path: &str, org: &str, repo: &str, branch: &str) -> String {
    // Anything that already has a scheme (https:, data:, ...) is absolute
    if Url::parse(path).is_ok() {
        return path.to_string();
    }

    // Protocol-relative ("//host/...") points at another host, not the repo
    if path.starts_with("//") {
        return format!("https:{path}");
    }

    // Everything else is a path inside the repository:
    // drop one "./" and any leading "/" (repo root), then join onto raw content
    let relative = path.strip_prefix("./").unwrap_or(path).trim_start_matches('/');
    format!("{RAW_CONTENT_ROOT}/{org}/{repo}/{branch}/{relative}")
}
