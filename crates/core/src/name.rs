//! Document type identifiers
//!
//! This module defines [`DocumentName`], the canonical identifier for a
//! mapped document type. Names are namespaced with a `::` separator
//! ("Documents::CmsUser"); a name without a separator is a global type.
//!
//! Mapping sources are allowed to hand over bare (unqualified) names for
//! parents, subclasses and association targets. Those names are qualified
//! against the owning class's namespace by the resolution pass, never at
//! the point where the raw mapping is recorded.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Namespace separator used in fully qualified document names
pub const NAMESPACE_SEPARATOR: &str = "::";

/// Identifier of a mapped document type
///
/// A DocumentName is a thin wrapper around the textual type identifier.
/// It may be fully qualified ("Documents::CmsUser") or bare ("UserParent");
/// bare names are resolved against a namespace via [`qualified_in`].
///
/// [`qualified_in`]: DocumentName::qualified_in
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentName(String);

impl DocumentName {
    /// Create a document name from its textual form
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Get the textual form of this name
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check whether this name carries a namespace
    pub fn is_qualified(&self) -> bool {
        self.0.contains(NAMESPACE_SEPARATOR)
    }

    /// Get the namespace portion of this name
    ///
    /// Returns everything before the final separator, or None for a
    /// global (separator-free) name.
    pub fn namespace(&self) -> Option<&str> {
        self.0
            .rfind(NAMESPACE_SEPARATOR)
            .map(|idx| &self.0[..idx])
    }

    /// Get the short (unqualified) portion of this name
    pub fn short_name(&self) -> &str {
        match self.0.rfind(NAMESPACE_SEPARATOR) {
            Some(idx) => &self.0[idx + NAMESPACE_SEPARATOR.len()..],
            None => &self.0,
        }
    }

    /// Qualify this name against a namespace
    ///
    /// A name that already carries a separator is returned unchanged, as
    /// is any name when `namespace` is empty (the global-type case).
    /// Idempotent: qualifying twice yields the same name as qualifying
    /// once.
    pub fn qualified_in(&self, namespace: &str) -> DocumentName {
        if namespace.is_empty() || self.is_qualified() {
            self.clone()
        } else {
            DocumentName(format!("{}{}{}", namespace, NAMESPACE_SEPARATOR, self.0))
        }
    }
}

impl fmt::Display for DocumentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for DocumentName {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for DocumentName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl AsRef<str> for DocumentName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for DocumentName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for DocumentName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_namespace_of_qualified_name() {
        let name = DocumentName::new("Documents::CmsUser");
        assert_eq!(name.namespace(), Some("Documents"));
        assert_eq!(name.short_name(), "CmsUser");
        assert!(name.is_qualified());
    }

    #[test]
    fn test_namespace_of_nested_name() {
        let name = DocumentName::new("App::Documents::CmsUser");
        assert_eq!(name.namespace(), Some("App::Documents"));
        assert_eq!(name.short_name(), "CmsUser");
    }

    #[test]
    fn test_global_name_has_no_namespace() {
        let name = DocumentName::new("GlobalArticle");
        assert_eq!(name.namespace(), None);
        assert_eq!(name.short_name(), "GlobalArticle");
        assert!(!name.is_qualified());
    }

    #[test]
    fn test_qualify_bare_name() {
        let name = DocumentName::new("UserRepository");
        assert_eq!(name.qualified_in("Documents"), "Documents::UserRepository");
    }

    #[test]
    fn test_qualify_leaves_qualified_name_unchanged() {
        let name = DocumentName::new("Other::UserRepository");
        assert_eq!(name.qualified_in("Documents"), "Other::UserRepository");
    }

    #[test]
    fn test_qualify_with_empty_namespace_is_identity() {
        let name = DocumentName::new("GlobalArticle");
        assert_eq!(name.qualified_in(""), "GlobalArticle");
    }

    #[test]
    fn test_qualify_is_idempotent() {
        let name = DocumentName::new("Bar");
        let once = name.qualified_in("Documents");
        let twice = once.qualified_in("Documents");
        assert_eq!(once, twice);
        assert_eq!(twice, "Documents::Bar");
    }

    #[test]
    fn test_display_and_as_str() {
        let name = DocumentName::new("Documents::CmsUser");
        assert_eq!(format!("{}", name), "Documents::CmsUser");
        assert_eq!(name.as_str(), "Documents::CmsUser");
    }

    #[test]
    fn test_serde_transparent() {
        let name = DocumentName::new("Documents::CmsUser");
        let json = serde_json::to_string(&name).unwrap();
        assert_eq!(json, "\"Documents::CmsUser\"");
        let restored: DocumentName = serde_json::from_str(&json).unwrap();
        assert_eq!(name, restored);
    }

    proptest! {
        // Qualification must be idempotent for any bare name and namespace.
        #[test]
        fn qualification_idempotent(
            bare in "[A-Za-z_][A-Za-z0-9_]{0,24}",
            ns in "[A-Za-z_][A-Za-z0-9_]{0,24}",
        ) {
            let name = DocumentName::new(bare);
            let once = name.qualified_in(&ns);
            let twice = once.qualified_in(&ns);
            prop_assert_eq!(&once, &twice);
            prop_assert!(once.is_qualified());
            prop_assert_eq!(once.namespace().unwrap(), ns.as_str());
        }

        // Short name round-trips through qualification.
        #[test]
        fn short_name_preserved(
            bare in "[A-Za-z_][A-Za-z0-9_]{0,24}",
            ns in "[A-Za-z_][A-Za-z0-9_]{0,24}",
        ) {
            let name = DocumentName::new(bare.clone());
            let qualified = name.qualified_in(&ns);
            prop_assert_eq!(qualified.short_name(), bare.as_str());
        }
    }
}
