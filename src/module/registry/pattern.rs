//! Glob pattern matching for module discovery
//!
//! Translates the glob subset used by include/exclude lists into anchored
//! regular expressions: `**` crosses separators, `*` does not, `?` is any one
//! character and `{a,b}` is an alternation. Everything else is literal.

use regex::Regex;
use tracing::warn;

use crate::module::traits::ModuleError;

/// A compiled glob pattern
#[derive(Debug, Clone)]
pub struct GlobPattern {
    source: String,
    regex: Regex,
}

impl GlobPattern {
    /// Compile a glob pattern
    pub fn new(pattern: &str) -> Result<Self, ModuleError> {
        let expression = translate(pattern);
        let regex = Regex::new(&expression).map_err(|e| ModuleError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            source: pattern.to_string(),
            regex,
        })
    }

    /// Original glob text
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Match a `/`-separated path relative to the scan root
    #[inline]
    pub fn is_match(&self, relative_path: &str) -> bool {
        self.regex.is_match(relative_path)
    }
}

/// Translate a glob pattern to an anchored regular expression
pub fn translate(pattern: &str) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::with_capacity(pattern.len() * 2 + 2);
    let mut brace_depth = 0usize;
    let mut i = 0;

    out.push('^');
    while i < chars.len() {
        match chars[i] {
            '*' if chars.get(i + 1) == Some(&'*') => {
                // `**/` may also match zero directories
                if chars.get(i + 2) == Some(&'/') {
                    out.push_str("(?:.*/)?");
                    i += 3;
                } else {
                    out.push_str(".*");
                    i += 2;
                }
                continue;
            }
            '*' => out.push_str("[^/]*"),
            '?' => out.push('.'),
            '{' if chars[i + 1..].contains(&'}') => {
                brace_depth += 1;
                out.push_str("(?:");
            }
            '}' if brace_depth > 0 => {
                brace_depth -= 1;
                out.push(')');
            }
            ',' if brace_depth > 0 => out.push('|'),
            c => {
                let mut buf = [0u8; 4];
                out.push_str(&regex::escape(c.encode_utf8(&mut buf)));
            }
        }
        i += 1;
    }
    out.push('$');
    out
}

/// One-shot match of a relative path against a glob pattern
///
/// Pure: no filesystem access. A pattern that fails to compile matches nothing.
pub fn matches(relative_path: &str, pattern: &str) -> bool {
    match GlobPattern::new(pattern) {
        Ok(glob) => glob.is_match(relative_path),
        Err(e) => {
            warn!("{}", e);
            false
        }
    }
}

/// An ordered set of globs, matching if any member matches
#[derive(Debug, Clone, Default)]
pub struct PatternSet {
    patterns: Vec<GlobPattern>,
}

impl PatternSet {
    /// Compile every pattern, failing on the first invalid one
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self, ModuleError> {
        let patterns = patterns
            .iter()
            .map(|p| GlobPattern::new(p.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// Compile every pattern, dropping invalid ones with a warning
    pub fn lenient<S: AsRef<str>>(patterns: &[S]) -> Self {
        let patterns = patterns
            .iter()
            .filter_map(|p| match GlobPattern::new(p.as_ref()) {
                Ok(glob) => Some(glob),
                Err(e) => {
                    warn!("Ignoring pattern: {}", e);
                    None
                }
            })
            .collect();
        Self { patterns }
    }

    pub fn is_match(&self, relative_path: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(relative_path))
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
