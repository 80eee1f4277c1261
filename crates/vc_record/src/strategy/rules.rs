use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::str::FromStr;

use thiserror::Error;

use crate::filter::Pattern;

// -----------------------------------------------------------------------------
// RuleParseError

/// A pattern rule string could not be parsed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RuleParseError {
    #[error("pattern rule `{0}` has no type pattern")]
    EmptyTypePattern(String),
    #[error("unknown option `{0}`; expected `identity=` or `exclude=`")]
    UnknownOption(String),
    #[error("option `{0}` has an empty field pattern")]
    EmptyFieldPattern(String),
}

// -----------------------------------------------------------------------------
// FieldRule

/// Field options for the types whose path matches one glob.
///
/// The text form is `<type glob>#identity=<field glob>#exclude=<field glob>`,
/// with any number of options in any order.
///
/// # Examples
///
/// ```
/// use vc_record::strategy::FieldRule;
///
/// let rule: FieldRule = "app::model::*#identity=id#exclude=secret*".parse().unwrap();
/// assert!(rule.applies_to("app::model::Coverage"));
/// assert!(rule.is_identity("id"));
/// assert!(rule.excludes("secret_key"));
/// assert!(!rule.excludes("id"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldRule {
    types: Pattern,
    identity: Vec<Pattern>,
    exclude: Vec<Pattern>,
}

impl FieldRule {
    pub fn new(type_glob: &str) -> Self {
        Self {
            types: Pattern::new(type_glob),
            identity: Vec::new(),
            exclude: Vec::new(),
        }
    }

    /// Flag matching fields as identity fields.
    pub fn with_identity(mut self, field_glob: &str) -> Self {
        self.identity.push(Pattern::new(field_glob));
        self
    }

    /// Leave matching fields out.
    pub fn with_exclude(mut self, field_glob: &str) -> Self {
        self.exclude.push(Pattern::new(field_glob));
        self
    }

    #[inline]
    pub fn applies_to(&self, type_path: &str) -> bool {
        self.types.matches(type_path)
    }

    pub fn is_identity(&self, field: &str) -> bool {
        self.identity.iter().any(|p| p.matches(field))
    }

    pub fn excludes(&self, field: &str) -> bool {
        self.exclude.iter().any(|p| p.matches(field))
    }
}

impl FromStr for FieldRule {
    type Err = RuleParseError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let mut parts = text.split('#');
        let type_glob = parts.next().unwrap_or_default().trim();
        if type_glob.is_empty() {
            return Err(RuleParseError::EmptyTypePattern(text.to_string()));
        }

        let mut rule = Self::new(type_glob);
        for option in parts {
            let option = option.trim();
            let (key, glob) = option
                .split_once('=')
                .ok_or_else(|| RuleParseError::UnknownOption(option.to_string()))?;
            let glob = glob.trim();
            if glob.is_empty() {
                return Err(RuleParseError::EmptyFieldPattern(option.to_string()));
            }
            rule = match key.trim() {
                "identity" => rule.with_identity(glob),
                "exclude" => rule.with_exclude(glob),
                _ => return Err(RuleParseError::UnknownOption(option.to_string())),
            };
        }
        Ok(rule)
    }
}

// -----------------------------------------------------------------------------
// PatternRules

/// All field rules of a pattern-matching codec.
///
/// Every rule whose type glob matches applies: a field is excluded if any
/// of them excludes it, and is an identity field if any of them says so.
///
/// # Examples
///
/// ```
/// use vc_record::strategy::PatternRules;
///
/// let rules: PatternRules = "app::*#identity=id, app::Claim#exclude=audit*".parse().unwrap();
/// assert!(rules.is_identity("app::Claim", "id"));
/// assert!(rules.excludes("app::Claim", "audit_log"));
/// assert!(!rules.excludes("app::Coverage", "audit_log"));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PatternRules {
    rules: Vec<FieldRule>,
}

impl PatternRules {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, rule: FieldRule) -> Self {
        self.rules.push(rule);
        self
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn excludes(&self, type_path: &str, field: &str) -> bool {
        self.matching(type_path).any(|rule| rule.excludes(field))
    }

    pub fn is_identity(&self, type_path: &str, field: &str) -> bool {
        self.matching(type_path).any(|rule| rule.is_identity(field))
    }

    fn matching<'a>(&'a self, type_path: &'a str) -> impl Iterator<Item = &'a FieldRule> {
        self.rules.iter().filter(move |rule| rule.applies_to(type_path))
    }
}

impl FromStr for PatternRules {
    type Err = RuleParseError;

    /// Comma separated [`FieldRule`]s. Empty entries are skipped.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        text.split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(str::parse)
            .collect::<Result<Vec<_>, _>>()
            .map(|rules| Self { rules })
    }
}

impl FromIterator<FieldRule> for PatternRules {
    fn from_iter<I: IntoIterator<Item = FieldRule>>(iter: I) -> Self {
        Self {
            rules: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{FieldRule, PatternRules, RuleParseError};

    #[test]
    fn parse_errors() {
        assert_eq!(
            "#identity=id".parse::<FieldRule>(),
            Err(RuleParseError::EmptyTypePattern("#identity=id".into()))
        );
        assert_eq!(
            "app::*#key=id".parse::<FieldRule>(),
            Err(RuleParseError::UnknownOption("key=id".into()))
        );
        assert_eq!(
            "app::*#exclude=".parse::<FieldRule>(),
            Err(RuleParseError::EmptyFieldPattern("exclude=".into()))
        );
        assert!("app::*#flag".parse::<FieldRule>().is_err());
    }

    #[test]
    fn rules_without_options_only_select_types() {
        let rules: PatternRules = " app::* , ".parse().unwrap();
        assert_eq!(rules.len(), 1);
        assert!(!rules.excludes("app::A", "x"));
        assert!(!rules.is_identity("app::A", "x"));
    }

    #[test]
    fn builder_matches_text_form() {
        let built = FieldRule::new("a::*").with_identity("id").with_exclude("tmp_*");
        assert_eq!("a::*#identity=id#exclude=tmp_*".parse(), Ok(built.clone()));

        let rules: PatternRules = [built].into_iter().collect();
        assert!(rules.excludes("a::B", "tmp_value"));
        assert!(!rules.excludes("b::B", "tmp_value"));
    }
}
