//! Permission matching
//!
//! A held permission value is either `*` (covers everything) or a literal
//! action string in which each `*` stands for any run of characters.

use regex::Regex;
use shared::models::Permission;

/// Value that grants every action
pub const WILDCARD_ALL: &str = "*";

/// Does `held` cover the `requested` action?
pub fn matches(held: &Permission, requested: &str) -> bool {
    matches_value(&held.value, requested)
}

/// Match against a bare permission value.
pub fn matches_value(held: &str, requested: &str) -> bool {
    if held == WILDCARD_ALL {
        return true;
    }

    let pattern = format!("^{}$", regex::escape(held).replace(r"\*", ".*"));
    match Regex::new(&pattern) {
        Ok(re) => re.is_match(requested),
        Err(e) => {
            tracing::warn!(held, error = %e, "Permission pattern failed to compile");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::PermissionScope;

    fn perm(value: &str) -> Permission {
        Permission::new(1, value, PermissionScope::Admin)
    }

    #[test]
    fn test_star_matches_everything() {
        let p = perm("*");
        assert!(matches(&p, "broker.create"));
        assert!(matches(&p, "transaction.delete_by_broker"));
        assert!(matches(&p, ""));
    }

    #[test]
    fn test_trailing_wildcard_is_prefix_match() {
        let p = perm("a.b.*");
        assert!(matches(&p, "a.b.c"));
        assert!(matches(&p, "a.b.c.d"));
        assert!(matches(&p, "a.b."));
        assert!(!matches(&p, "a.b"));
        assert!(!matches(&p, "a.bc"));
        assert!(!matches(&p, "x.a.b.c"));
    }

    #[test]
    fn test_exact_value() {
        let p = perm("broker.create");
        assert!(matches(&p, "broker.create"));
        assert!(!matches(&p, "broker.create.extra"));
        assert!(!matches(&p, "broker.update"));
    }

    #[test]
    fn test_metacharacters_are_literal() {
        // `.` must not act as "any character"
        let p = perm("broker.create");
        assert!(!matches(&p, "brokerXcreate"));

        let p = perm("a+b(c)?");
        assert!(matches(&p, "a+b(c)?"));
        assert!(!matches(&p, "aab"));
    }

    #[test]
    fn test_inner_wildcard() {
        let p = perm("broker.*.delete");
        assert!(matches(&p, "broker.image.delete"));
        assert!(!matches(&p, "broker.image.create"));
    }

    #[test]
    fn test_empty_value_matches_only_empty() {
        let p = perm("");
        assert!(matches(&p, ""));
        assert!(!matches(&p, "broker.create"));
    }
}
