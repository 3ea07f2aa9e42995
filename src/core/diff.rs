//! Partitioning of extracted lemmas against an existing catalog.
//!
//! Given the flattened old catalog (obsolete namespace already stripped) and
//! the freshly extracted keys, [`diff`] computes four disjoint partitions:
//!
//! - **new**: extracted but not yet in the catalog (value = defining file)
//! - **kept**: extracted and already translated (value from the catalog)
//! - **protected**: no longer extracted but matched by a never-obsolete rule
//! - **obsolete**: no longer extracted
//!
//! Keys where the extraction reads a scalar but the catalog holds a subtree
//! (`new = "a"`, `old = "a.b"`) are dropped from every partition and reported
//! as [`Collision`]s.

use std::collections::{BTreeSet, HashSet};
use std::ops::Bound;

use indexmap::IndexMap;

use super::flatten::FlatCatalog;
use super::key_path::DELIMITER;

/// A new key that addresses an existing subtree of the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collision {
    pub new_key: String,
    pub old_key: String,
}

#[derive(Debug, Clone, Default)]
pub struct DiffOptions {
    /// Literal fragments that keep a key out of the obsolete partition.
    pub never_obsolete: Vec<String>,
    /// Treat obsolete keys as kept.
    pub disable_obsolete_check: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Partitions {
    pub new: FlatCatalog,
    pub kept: FlatCatalog,
    pub protected: FlatCatalog,
    pub obsolete: FlatCatalog,
    /// Protected key → the rule that matched it.
    pub protected_by: IndexMap<String, String>,
    pub collisions: Vec<Collision>,
}

impl Partitions {
    /// The catalog needs rewriting when keys appear or disappear.
    pub fn something_to_do(&self) -> bool {
        !self.new.is_empty() || !self.obsolete.is_empty()
    }
}

/// Return the first never-obsolete rule matching `key`.
///
/// A rule matches when the key starts with it or when it appears right after
/// a delimiter inside the key.
pub fn never_obsolete_rule<'r>(key: &str, rules: &'r [String]) -> Option<&'r str> {
    rules
        .iter()
        .filter(|rule| !rule.is_empty())
        .find(|rule| {
            key.starts_with(rule.as_str()) || key.contains(&format!("{DELIMITER}{rule}"))
        })
        .map(String::as_str)
}

pub fn diff(old: &FlatCatalog, new: &FlatCatalog, options: &DiffOptions) -> Partitions {
    let (suppressed_new, suppressed_old, collisions) = find_collisions(old, new);

    let mut partitions = Partitions {
        collisions,
        ..Default::default()
    };

    for (key, provenance) in new {
        if suppressed_new.contains(key.as_str()) {
            continue;
        }
        match old.get(key) {
            Some(value) if !suppressed_old.contains(key.as_str()) => {
                partitions.kept.insert(key.clone(), value.clone());
            }
            _ => {
                partitions.new.insert(key.clone(), provenance.clone());
            }
        }
    }

    for (key, value) in old {
        if suppressed_old.contains(key.as_str()) || partitions.kept.contains_key(key) {
            continue;
        }
        if new.contains_key(key) && !suppressed_new.contains(key.as_str()) {
            continue;
        }
        partitions.obsolete.insert(key.clone(), value.clone());
    }

    if options.disable_obsolete_check {
        for (key, value) in std::mem::take(&mut partitions.obsolete) {
            partitions.kept.entry(key).or_insert(value);
        }
    }

    let obsolete = std::mem::take(&mut partitions.obsolete);
    for (key, value) in obsolete {
        match never_obsolete_rule(&key, &options.never_obsolete) {
            Some(rule) => {
                partitions.protected_by.insert(key.clone(), rule.to_string());
                partitions.protected.insert(key, value);
            }
            None => {
                partitions.obsolete.insert(key, value);
            }
        }
    }

    partitions.new.sort_keys();
    partitions.kept.sort_keys();
    partitions.protected.sort_keys();
    partitions.obsolete.sort_keys();
    partitions.protected_by.sort_keys();

    partitions
}

/// Find every old key nested below a new key.
///
/// A new key may suppress several old keys; each old key is reported against
/// the first new key that reaches it.
fn find_collisions<'a>(
    old: &'a FlatCatalog,
    new: &'a FlatCatalog,
) -> (HashSet<&'a str>, HashSet<&'a str>, Vec<Collision>) {
    let old_sorted: BTreeSet<&str> = old.keys().map(String::as_str).collect();
    let mut suppressed_new = HashSet::new();
    let mut suppressed_old = HashSet::new();
    let mut collisions = Vec::new();

    for new_key in new.keys() {
        let namespace = format!("{new_key}{DELIMITER}");
        for old_key in old_sorted
            .range::<str, _>((Bound::Included(namespace.as_str()), Bound::Unbounded))
            .take_while(|key| key.starts_with(&namespace))
        {
            suppressed_new.insert(new_key.as_str());
            if suppressed_old.insert(*old_key) {
                collisions.push(Collision {
                    new_key: new_key.clone(),
                    old_key: old_key.to_string(),
                });
            }
        }
    }

    (suppressed_new, suppressed_old, collisions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn flat(entries: &[(&str, &str)]) -> FlatCatalog {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), Some(v.to_string())))
            .collect()
    }

    fn keys(catalog: &FlatCatalog) -> Vec<&str> {
        catalog.keys().map(String::as_str).collect()
    }

    #[test]
    fn test_basic_partitions() {
        let old = flat(&[("greeting", "Hello"), ("stale", "Old")]);
        let new = flat(&[("greeting", "file1.php"), ("farewell", "file2.php")]);

        let p = diff(&old, &new, &DiffOptions::default());

        assert_eq!(p.new, flat(&[("farewell", "file2.php")]));
        assert_eq!(p.kept, flat(&[("greeting", "Hello")]));
        assert_eq!(p.obsolete, flat(&[("stale", "Old")]));
        assert!(p.protected.is_empty());
        assert!(p.something_to_do());
    }

    #[test]
    fn test_empty_old_makes_everything_new() {
        let new = flat(&[("b", "f.php"), ("a", "f.php")]);
        let p = diff(&FlatCatalog::new(), &new, &DiffOptions::default());
        assert_eq!(keys(&p.new), vec!["a", "b"]);
        assert!(p.kept.is_empty());
        assert!(p.obsolete.is_empty());
    }

    #[test]
    fn test_empty_new_makes_everything_obsolete() {
        let old = flat(&[("a", "A"), ("b.dynamic.x", "X")]);
        let options = DiffOptions {
            never_obsolete: vec!["dynamic".to_string()],
            ..Default::default()
        };
        let p = diff(&old, &FlatCatalog::new(), &options);
        assert!(p.new.is_empty());
        assert!(p.kept.is_empty());
        assert_eq!(keys(&p.obsolete), vec!["a"]);
        assert_eq!(keys(&p.protected), vec!["b.dynamic.x"]);
    }

    #[test]
    fn test_collision_suppresses_both_sides() {
        let old = flat(&[("a.b", "x")]);
        let new = flat(&[("a", "y")]);
        let p = diff(&old, &new, &DiffOptions::default());

        assert!(p.new.is_empty());
        assert!(p.kept.is_empty());
        assert!(p.obsolete.is_empty());
        assert!(p.protected.is_empty());
        assert_eq!(
            p.collisions,
            vec![Collision {
                new_key: "a".to_string(),
                old_key: "a.b".to_string()
            }]
        );
    }

    #[test]
    fn test_one_new_key_suppresses_many_old_keys() {
        let old = flat(&[("menu.open", "Open"), ("menu.close", "Close"), ("menus", "Menus")]);
        let new = flat(&[("menu", "nav.php"), ("menus", "nav.php")]);
        let p = diff(&old, &new, &DiffOptions::default());

        assert_eq!(p.collisions.len(), 2);
        assert_eq!(keys(&p.kept), vec!["menus"]);
        assert!(p.new.is_empty());
        assert!(p.obsolete.is_empty());
    }

    #[test]
    fn test_old_key_is_reported_once() {
        let old = flat(&[("a.b.c", "x")]);
        let new = flat(&[("a", "f.php"), ("a.b", "f.php")]);
        let p = diff(&old, &new, &DiffOptions::default());

        assert_eq!(p.collisions.len(), 1);
        assert_eq!(p.collisions[0].new_key, "a");
        assert!(p.new.is_empty());
    }

    #[test]
    fn test_disable_obsolete_check() {
        let old = flat(&[("x", "1"), ("y", "2")]);
        let new = flat(&[("x", "1")]);
        let options = DiffOptions {
            disable_obsolete_check: true,
            ..Default::default()
        };
        let p = diff(&old, &new, &options);

        assert!(p.obsolete.is_empty());
        assert_eq!(p.kept, flat(&[("x", "1"), ("y", "2")]));
        assert!(!p.something_to_do());
    }

    #[test]
    fn test_never_obsolete_protection() {
        let old = flat(&[
            ("validation.custom.email", "Custom"),
            ("dynamic_title", "Dynamic"),
            ("nav.home", "Home"),
        ]);
        let options = DiffOptions {
            never_obsolete: vec!["custom".to_string(), "dynamic".to_string()],
            ..Default::default()
        };
        let p = diff(&old, &FlatCatalog::new(), &options);

        assert_eq!(
            p.protected,
            flat(&[
                ("dynamic_title", "Dynamic"),
                ("validation.custom.email", "Custom"),
            ])
        );
        assert_eq!(p.protected_by["validation.custom.email"], "custom");
        assert_eq!(p.protected_by["dynamic_title"], "dynamic");
        assert_eq!(keys(&p.obsolete), vec!["nav.home"]);
    }

    #[test]
    fn test_rule_must_follow_delimiter() {
        let rules = vec!["fields".to_string()];
        assert_eq!(never_obsolete_rule("form.fields.name", &rules), Some("fields"));
        assert_eq!(never_obsolete_rule("fields.name", &rules), Some("fields"));
        assert_eq!(never_obsolete_rule("formfields.name", &rules), None);
        assert_eq!(never_obsolete_rule("anything", &["".to_string()]), None);
    }

    #[test]
    fn test_case_sensitive_keys() {
        let old = flat(&[("Title", "Title")]);
        let new = flat(&[("title", "page.php")]);
        let p = diff(&old, &new, &DiffOptions::default());
        assert_eq!(keys(&p.new), vec!["title"]);
        assert_eq!(keys(&p.obsolete), vec!["Title"]);
    }

    #[test]
    fn test_partitions_are_sorted() {
        let old = flat(&[("z", "Z"), ("m", "M"), ("a", "A")]);
        let new = flat(&[("y", "f"), ("m", "f"), ("b", "f"), ("a", "f")]);
        let p = diff(&old, &new, &DiffOptions::default());
        assert_eq!(keys(&p.new), vec!["b", "y"]);
        assert_eq!(keys(&p.kept), vec!["a", "m"]);
        assert_eq!(keys(&p.obsolete), vec!["z"]);
    }

    #[test]
    fn test_partition_completeness_and_disjointness() {
        let old = flat(&[
            ("a", "A"),
            ("b.c", "BC"),
            ("d.dynamic", "D"),
            ("e", "E"),
            ("LLH", "x"),
        ]);
        let new = flat(&[("a", "f"), ("b", "f"), ("g", "f"), ("e", "f")]);
        let options = DiffOptions {
            never_obsolete: vec!["dynamic".to_string()],
            ..Default::default()
        };
        let p = diff(&old, &new, &options);

        let suppressed: HashSet<&str> = p
            .collisions
            .iter()
            .flat_map(|c| [c.new_key.as_str(), c.old_key.as_str()])
            .collect();
        let expected: BTreeSet<&str> = old
            .keys()
            .chain(new.keys())
            .map(String::as_str)
            .filter(|k| !suppressed.contains(k))
            .collect();

        let mut seen: Vec<&str> = Vec::new();
        for part in [&p.new, &p.kept, &p.protected, &p.obsolete] {
            seen.extend(part.keys().map(String::as_str));
        }
        let unique: BTreeSet<&str> = seen.iter().copied().collect();

        assert_eq!(seen.len(), unique.len(), "partitions overlap");
        assert_eq!(unique, expected);
    }
}
