//! # Path Whitelist
//!
//! Paths exempt from authentication. Patterns are matched segment by
//! segment:
//!
//! | Segment   | Matches                                  |
//! |-----------|------------------------------------------|
//! | `login`   | exactly `login`                          |
//! | `*.html`  | any single segment, `*` and `?` wildcards |
//! | `**`      | zero or more whole segments              |
//!
//! So `/swagger-ui.html/**` matches `/swagger-ui.html` and everything under
//! it, while `/api/v1/login` matches only itself. Paths containing `.` or
//! `..` segments never match.

/// Patterns whitelisted when none are configured.
pub const DEFAULT_WHITELIST: &[&str] = &[
    "/index",
    "/swagger-ui.html",
    "/swagger-ui.html/**",
    "/swagger-resources/**",
    "/v2/api-docs",
    "/webjars/**",
    "/api/v1/login",
    "/api/v1/login/token",
    "/api/v1/alive",
];

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Glob(Vec<char>),
    AnyDepth,
}

impl Segment {
    fn parse(raw: &str) -> Self {
        if raw == "**" {
            Self::AnyDepth
        } else if raw.contains(['*', '?']) {
            Self::Glob(raw.chars().collect())
        } else {
            Self::Literal(raw.to_string())
        }
    }

    fn matches(&self, segment: &str) -> bool {
        match self {
            Self::Literal(lit) => lit == segment,
            Self::Glob(pattern) => glob_match(pattern, &segment.chars().collect::<Vec<_>>()),
            Self::AnyDepth => true,
        }
    }
}

/// A compiled path pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    raw: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    /// Compile a pattern. A missing leading `/` is implied.
    pub fn new(raw: &str) -> Self {
        let raw = raw.trim();
        let body = raw.strip_prefix('/').unwrap_or(raw);
        Self {
            raw: format!("/{body}"),
            segments: body.split('/').map(Segment::parse).collect(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Whether `path` (the URI path, without query) matches this pattern.
    pub fn matches(&self, path: &str) -> bool {
        let Some(body) = path.strip_prefix('/') else {
            return false;
        };
        let parts: Vec<&str> = body.split('/').collect();
        if parts.iter().any(|p| *p == "." || *p == "..") {
            return false;
        }
        match_segments(&self.segments, &parts)
    }
}

impl std::fmt::Display for PathPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

fn match_segments(pattern: &[Segment], path: &[&str]) -> bool {
    match pattern.split_first() {
        None => path.is_empty(),
        Some((Segment::AnyDepth, rest)) => {
            (0..=path.len()).any(|skip| match_segments(rest, &path[skip..]))
        }
        Some((segment, rest)) => match path.split_first() {
            Some((head, tail)) => segment.matches(head) && match_segments(rest, tail),
            None => false,
        },
    }
}

/// Wildcard match within one segment: `*` is any run, `?` is one char.
fn glob_match(pattern: &[char], text: &[char]) -> bool {
    let (mut p, mut t) = (0, 0);
    let mut backtrack: Option<(usize, usize)> = None;
    while t < text.len() {
        match pattern.get(p) {
            Some('*') => {
                backtrack = Some((p, t));
                p += 1;
            }
            Some(c) if *c == '?' || *c == text[t] => {
                p += 1;
                t += 1;
            }
            _ => match backtrack {
                Some((star, matched)) => {
                    p = star + 1;
                    t = matched + 1;
                    backtrack = Some((star, matched + 1));
                }
                None => return false,
            },
        }
    }
    pattern[p..].iter().all(|c| *c == '*')
}

/// The set of whitelisted path patterns. Immutable after startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Whitelist {
    patterns: Vec<PathPattern>,
}

impl Whitelist {
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            patterns: patterns
                .into_iter()
                .map(|p| PathPattern::new(p.as_ref()))
                .collect(),
        }
    }

    /// A whitelist that exempts nothing.
    pub fn empty() -> Self {
        Self {
            patterns: Vec::new(),
        }
    }

    pub fn is_whitelisted(&self, path: &str) -> bool {
        self.patterns.iter().any(|p| p.matches(path))
    }

    pub fn patterns(&self) -> &[PathPattern] {
        &self.patterns
    }
}

impl Default for Whitelist {
    fn default() -> Self {
        Self::new(DEFAULT_WHITELIST)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_entries_match_only_themselves() {
        let wl = Whitelist::default();
        assert!(wl.is_whitelisted("/api/v1/login"));
        assert!(wl.is_whitelisted("/api/v1/login/token"));
        assert!(wl.is_whitelisted("/api/v1/alive"));
        assert!(!wl.is_whitelisted("/api/v1/alive/me"));
        assert!(!wl.is_whitelisted("/api/v1/alive/secret"));
        assert!(!wl.is_whitelisted("/api/v1/loginx"));
        assert!(!wl.is_whitelisted("/api/v1/alive/"));
    }

    #[test]
    fn double_star_matches_prefix_and_descendants() {
        let wl = Whitelist::default();
        assert!(wl.is_whitelisted("/swagger-ui.html"));
        assert!(wl.is_whitelisted("/swagger-ui.html/index"));
        assert!(wl.is_whitelisted("/webjars/springfox/a/b.js"));
        assert!(wl.is_whitelisted("/webjars"));
        assert!(!wl.is_whitelisted("/webjarsx/a"));
    }

    #[test]
    fn dot_segments_never_match() {
        let wl = Whitelist::default();
        assert!(!wl.is_whitelisted("/webjars/../api/v1/alive/secret"));
        assert!(!wl.is_whitelisted("/webjars/./x"));
    }

    #[test]
    fn single_star_stays_within_a_segment() {
        let p = PathPattern::new("/static/*.css");
        assert!(p.matches("/static/site.css"));
        assert!(p.matches("/static/.css"));
        assert!(!p.matches("/static/css/site.css"));
        assert!(!p.matches("/static/site.js"));
    }

    #[test]
    fn question_mark_is_one_character() {
        let p = PathPattern::new("/v?/docs");
        assert!(p.matches("/v2/docs"));
        assert!(!p.matches("/v10/docs"));
    }

    #[test]
    fn double_star_in_the_middle() {
        let p = PathPattern::new("/a/**/z");
        assert!(p.matches("/a/z"));
        assert!(p.matches("/a/b/c/z"));
        assert!(!p.matches("/a/b/c"));
    }

    #[test]
    fn leading_slash_is_implied() {
        assert_eq!(PathPattern::new("index").as_str(), "/index");
        assert!(PathPattern::new("index").matches("/index"));
    }

    #[test]
    fn relative_paths_never_match() {
        assert!(!PathPattern::new("/index").matches("index"));
    }

    #[test]
    fn empty_whitelist_exempts_nothing() {
        assert!(!Whitelist::empty().is_whitelisted("/api/v1/login"));
    }

    #[test]
    fn glob_backtracks() {
        let p = PathPattern::new("/*a*b");
        assert!(p.matches("/xaxxab"));
        assert!(!p.matches("/xaxxa"));
    }
}
