//! Grouping of extracted lemmas into catalog families.
//!
//! `auth.failed` belongs to the `auth` family under key `failed`; lemmas
//! that read as sentences (`Welcome back.`) go to the locale's JSON catalog.

use std::collections::BTreeMap;
use std::fmt;

use super::flatten::FlatCatalog;
use super::key_path::{DELIMITER, SplitRule};

/// Extracted lemma → file that references it.
pub type Lemmas = BTreeMap<String, String>;

/// A catalog grouping within one locale.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Family {
    /// Named catalog file, e.g. `messages`.
    Generic(String),
    /// The locale's JSON catalog.
    Json,
}

impl Family {
    pub fn name(&self) -> &str {
        match self {
            Family::Generic(name) => name,
            Family::Json => "json",
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// True when a lemma belongs to the JSON catalog rather than a named family.
pub fn is_json_lemma(lemma: &str, rule: &SplitRule) -> bool {
    let segments = rule.split(lemma);
    segments.len() < 2
        || segments.iter().any(|segment| segment.is_empty())
        || segments[0].chars().any(char::is_whitespace)
}

/// Split lemmas into per-family flat catalogs of `key → defining file`.
///
/// With `output_flat`, only the family is split off and the rest of the
/// lemma stays a single key.
pub fn group_by_family(
    lemmas: &Lemmas,
    rule: &SplitRule,
    output_flat: bool,
) -> BTreeMap<Family, FlatCatalog> {
    let mut families: BTreeMap<Family, FlatCatalog> = BTreeMap::new();

    for (lemma, file) in lemmas {
        if is_json_lemma(lemma, rule) {
            families
                .entry(Family::Json)
                .or_default()
                .insert(lemma.clone(), Some(file.clone()));
            continue;
        }

        let segments = if output_flat {
            rule.splitn(lemma, 2)
        } else {
            rule.split(lemma)
        };
        let Some((family, rest)) = segments.split_first() else {
            continue;
        };
        let key = rest.join(&*DELIMITER.to_string());
        families
            .entry(Family::Generic(family.to_string()))
            .or_default()
            .insert(key, Some(file.clone()));
    }

    families
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn lemmas(entries: &[(&str, &str)]) -> Lemmas {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn keys(catalog: &FlatCatalog) -> Vec<&str> {
        catalog.keys().map(String::as_str).collect()
    }

    #[test]
    fn test_json_lemmas() {
        let rule = SplitRule::default();
        assert!(is_json_lemma("Welcome", &rule));
        assert!(is_json_lemma("Welcome back.", &rule));
        assert!(is_json_lemma("Hello world. Bye", &rule));
        assert!(!is_json_lemma("auth.failed", &rule));
        assert!(!is_json_lemma("auth.failed message", &rule));
    }

    #[test]
    fn test_group_by_family() {
        let rule = SplitRule::default();
        let grouped = group_by_family(
            &lemmas(&[
                ("auth.failed", "app/Login.php"),
                ("auth.throttle.wait", "app/Login.php"),
                ("nav.home", "views/nav.blade.php"),
                ("Welcome back.", "views/home.blade.php"),
            ]),
            &rule,
            false,
        );

        assert_eq!(grouped.len(), 3);
        let auth = &grouped[&Family::Generic("auth".to_string())];
        assert_eq!(keys(auth), vec!["failed", "throttle.wait"]);
        assert_eq!(auth["failed"].as_deref(), Some("app/Login.php"));
        assert_eq!(keys(&grouped[&Family::Json]), vec!["Welcome back."]);
    }

    #[test]
    fn test_group_with_custom_rule_rejoins_with_dot() {
        let rule = SplitRule::pattern("::").unwrap();
        let grouped = group_by_family(&lemmas(&[("auth::errors::failed", "a.php")]), &rule, false);
        assert_eq!(
            keys(&grouped[&Family::Generic("auth".to_string())]),
            vec!["errors.failed"]
        );
    }

    #[test]
    fn test_group_output_flat_uses_two_levels() {
        let rule = SplitRule::default();
        let grouped = group_by_family(&lemmas(&[("auth.throttle.wait", "a.php")]), &rule, true);
        assert_eq!(
            keys(&grouped[&Family::Generic("auth".to_string())]),
            vec!["throttle.wait"]
        );
    }

    #[test]
    fn test_family_display() {
        assert_eq!(Family::Generic("messages".to_string()).to_string(), "messages");
        assert_eq!(Family::Json.to_string(), "json");
    }
}
