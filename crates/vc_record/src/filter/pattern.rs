use alloc::boxed::Box;
use core::fmt;

/// A glob over type paths or field names.
///
/// `*` matches any run of characters (including `::`), `?` matches one byte.
/// Everything else matches literally.
///
/// # Examples
///
/// ```
/// use vc_record::filter::Pattern;
///
/// let models = Pattern::new("app::model::*");
/// assert!(models.matches("app::model::Coverage"));
/// assert!(!models.matches("app::dao::CoverageDao"));
///
/// assert!(Pattern::new("*Dao").matches("app::dao::CoverageDao"));
/// assert!(Pattern::new("step_?d").matches("step_id"));
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Pattern {
    source: Box<str>,
}

impl Pattern {
    pub fn new(source: impl Into<Box<str>>) -> Self {
        Self {
            source: source.into(),
        }
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    #[inline]
    pub fn matches(&self, text: &str) -> bool {
        glob_match(self.source.as_bytes(), text.as_bytes())
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pattern({:?})", self.source)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

// Greedy matcher with single-star backtracking. Linear in practice.
fn glob_match(pattern: &[u8], text: &[u8]) -> bool {
    let (mut p, mut t) = (0, 0);
    let mut star: Option<(usize, usize)> = None;

    while t < text.len() {
        match pattern.get(p) {
            Some(b'*') => {
                star = Some((p, t));
                p += 1;
            }
            Some(&c) if c == b'?' || c == text[t] => {
                p += 1;
                t += 1;
            }
            _ => match star {
                Some((star_p, star_t)) => {
                    p = star_p + 1;
                    t = star_t + 1;
                    star = Some((star_p, star_t + 1));
                }
                None => return false,
            },
        }
    }

    pattern[p..].iter().all(|&c| c == b'*')
}

#[cfg(test)]
mod tests {
    use super::glob_match;

    fn check(pattern: &str, text: &str) -> bool {
        glob_match(pattern.as_bytes(), text.as_bytes())
    }

    #[test]
    fn literal_and_wildcards() {
        assert!(check("", ""));
        assert!(!check("", "a"));
        assert!(check("*", ""));
        assert!(check("*", "anything::at::all"));
        assert!(check("a*c", "abbbc"));
        assert!(check("a*c", "ac"));
        assert!(!check("a*c", "abcd"));
        assert!(check("*::Coverage*", "app::model::CoverageTier"));
        assert!(check("a?c", "abc"));
        assert!(!check("a?c", "ac"));
        assert!(check("**x", "yyx"));
        assert!(!check("exact", "exactly"));
    }

    #[test]
    fn backtracks_across_repeated_prefixes() {
        assert!(check("*ab*ab", "abxabyab"));
        assert!(!check("*ab*ab", "abxaby"));
    }
}
