use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::domain::Feed;

static NUMBERED_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.+?)\s+\((\d+)\)$").expect("numbered name regex should compile")
});

/// Split `"Panda Cam (3)"` into `("Panda Cam", 3)`.
fn split_suffix(name: &str) -> Option<(&str, u64)> {
    let caps = NUMBERED_NAME.captures(name)?;
    let base = caps.get(1)?.as_str();
    let number = caps.get(2)?.as_str().parse().ok()?;
    Some((base, number))
}

/// Pick a feed name that does not collide with any existing feed.
///
/// Unused names come back unchanged. Otherwise the `" (N)"` suffix is bumped
/// past the highest one already in use for the same base name, counting the
/// bare base name as 1: `"Panda Cam"` becomes `"Panda Cam (2)"`, then
/// `"Panda Cam (3)"`.
pub fn resolve_duplicate_name(name: &str, existing: &[Feed]) -> String {
    if !existing.iter().any(|feed| feed.name == name) {
        debug!("Name '{}' is unique", name);
        return name.to_string();
    }

    let (base, mut max_suffix) = split_suffix(name).unwrap_or((name, 1));

    for feed in existing {
        if feed.name == base {
            max_suffix = max_suffix.max(1);
        } else if let Some((existing_base, n)) = split_suffix(&feed.name) {
            if existing_base == base {
                max_suffix = max_suffix.max(n);
            }
        }
    }

    let Some(next) = max_suffix.checked_add(1) else {
        // Suffix space exhausted for this base; number under a new one
        return resolve_duplicate_name(&format!("{} (2)", name), existing);
    };
    let resolved = format!("{} ({})", base, next);
    debug!("Resolved duplicate name '{}' to '{}'", name, resolved);
    resolved
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feeds(names: &[&str]) -> Vec<Feed> {
        names
            .iter()
            .enumerate()
            .map(|(i, name)| Feed::new(name, &format!("https://example.org/{}.m3u8", i)).unwrap())
            .collect()
    }

    #[test]
    fn test_unique_name_unchanged() {
        let existing = feeds(&["Panda Cam"]);
        assert_eq!(resolve_duplicate_name("Otter Live", &existing), "Otter Live");
        assert_eq!(resolve_duplicate_name("Panda Cam", &[]), "Panda Cam");
    }

    #[test]
    fn test_first_duplicate_gets_two() {
        let existing = feeds(&["Panda Cam"]);
        assert_eq!(resolve_duplicate_name("Panda Cam", &existing), "Panda Cam (2)");
    }

    #[test]
    fn test_uses_highest_existing_suffix() {
        let existing = feeds(&["Panda Cam", "Panda Cam (2)"]);
        assert_eq!(resolve_duplicate_name("Panda Cam", &existing), "Panda Cam (3)");

        let gappy = feeds(&["Panda Cam", "Panda Cam (7)", "Panda Cam (3)"]);
        assert_eq!(resolve_duplicate_name("Panda Cam", &gappy), "Panda Cam (8)");
    }

    #[test]
    fn test_suffixed_proposal_strips_to_base() {
        let existing = feeds(&["Panda Cam", "Panda Cam (2)"]);
        assert_eq!(resolve_duplicate_name("Panda Cam (2)", &existing), "Panda Cam (3)");
    }

    #[test]
    fn test_other_bases_ignored() {
        let existing = feeds(&["Panda Cam", "Panda Cam Night (9)", "Red Panda Cam (4)"]);
        assert_eq!(resolve_duplicate_name("Panda Cam", &existing), "Panda Cam (2)");
    }

    #[test]
    fn test_largest_suffix_does_not_overflow() {
        let name = format!("Cam ({})", u64::MAX);
        let existing = feeds(&[name.as_str()]);

        let resolved = resolve_duplicate_name(&name, &existing);

        assert_eq!(resolved, format!("Cam ({}) (2)", u64::MAX));
        assert!(existing.iter().all(|feed| feed.name != resolved));

        let taken = feeds(&[name.as_str(), resolved.as_str()]);
        assert_eq!(
            resolve_duplicate_name(&name, &taken),
            format!("Cam ({}) (3)", u64::MAX)
        );
    }
}
