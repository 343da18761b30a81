//! Path pattern matching.
//!
//! # Responsibilities
//! - Compare a `/`-delimited pattern against a concrete request path
//! - Capture named segments (`:id`) and wildcard remainders (`*`)
//! - Report the unmatched remainder of the path for mounted routers
//!
//! # Design Decisions
//! - Pure function, no shared state
//! - Empty segments are ignored, so `/a//b/` and `/a/b` are the same path
//! - Literal segments are case-sensitive and compared as received
//! - Captured values (`:name`, trailing `*`) are percent-decoded; `captured`
//!   keeps the raw segments so a mounted router sees the path as sent
//! - No regex: a single left-to-right walk over the segments

use percent_encoding::percent_decode_str;

/// Segment token matching exactly one segment, or the remainder when trailing.
/// As a whole pattern it matches every path.
pub const WILDCARD: &str = "*";

/// Prefix marking a named single-segment capture, as in `/users/:id`.
pub const PARAM_PREFIX: char = ':';

/// How a pattern relates to a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    None,
    /// The pattern is a prefix of the path; the rest is in `captured`.
    Partial,
    Full,
}

/// Values captured while matching a path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    named: Vec<(String, String)>,
    rest: Option<String>,
}

impl Params {
    /// Value of a `:name` segment, percent-decoded.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.named
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Path swallowed by a trailing `*`, without a leading slash,
    /// percent-decoded.
    pub fn rest(&self) -> Option<&str> {
        self.rest.as_deref()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.named.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.named.is_empty() && self.rest.is_none()
    }
}

/// Outcome of [`match_path`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    pub verdict: Verdict,
    /// Path segments not consumed by literal or named segments.
    pub captured: Vec<String>,
    pub params: Params,
}

impl MatchResult {
    fn none() -> Self {
        Self {
            verdict: Verdict::None,
            captured: Vec::new(),
            params: Params::default(),
        }
    }

    fn full(params: Params) -> Self {
        Self {
            verdict: Verdict::Full,
            captured: Vec::new(),
            params,
        }
    }

    pub fn is_match(&self) -> bool {
        self.verdict != Verdict::None
    }

    /// The captured segments joined back into a path suffix.
    pub fn remainder(&self) -> String {
        self.captured.join("/")
    }
}

/// Non-empty segments of a path or pattern.
pub fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// Match `path` against `pattern`.
pub fn match_path(pattern: &str, path: &str) -> MatchResult {
    if pattern.trim() == WILDCARD {
        return MatchResult::full(Params::default());
    }

    let pattern: Vec<&str> = segments(pattern).collect();
    let actual: Vec<&str> = segments(path).collect();
    let mut params = Params::default();

    for (i, expected) in pattern.iter().enumerate() {
        let Some(segment) = actual.get(i) else {
            return MatchResult::none();
        };

        if *expected == WILDCARD {
            if i + 1 == pattern.len() {
                let captured: Vec<String> = actual[i..].iter().map(|s| s.to_string()).collect();
                params.rest = Some(decode(&captured.join("/")));
                return MatchResult {
                    verdict: Verdict::Full,
                    captured,
                    params,
                };
            }
            continue;
        }

        if let Some(name) = expected.strip_prefix(PARAM_PREFIX) {
            params.named.push((name.to_string(), decode(segment)));
            continue;
        }

        if expected != segment {
            return MatchResult::none();
        }
    }

    if actual.len() == pattern.len() {
        return MatchResult::full(params);
    }

    MatchResult {
        verdict: Verdict::Partial,
        captured: actual[pattern.len()..].iter().map(|s| s.to_string()).collect(),
        params,
    }
}

/// Invalid UTF-8 after decoding is replaced rather than rejected.
fn decode(raw: &str) -> String {
    percent_decode_str(raw).decode_utf8_lossy().into_owned()
}

/// Join a mount prefix and an entry pattern into one pattern.
pub fn join(prefix: &str, pattern: &str) -> String {
    let prefix = prefix.trim_end_matches('/');
    let pattern = pattern.trim_start_matches('/');
    if pattern.is_empty() {
        if prefix.is_empty() {
            return "/".to_string();
        }
        return prefix.to_string();
    }
    format!("{}/{}", prefix, pattern)
}
