//! Role to category permission table.
//!
//! Roles belong to the surrounding bot application and arrive here as plain
//! strings. The table says which export categories each role may download.
//!
//! # Default table
//!
//! | Role | Categories |
//! |------|------------|
//! | `call_center` | calls, orders, feedback |
//! | `supervisor` | calls, feedback, workflow, statistics, users |
//! | `warehouse` | inventory, issued_items |
//! | `manager` | orders, inventory, issued_items, statistics, users, feedback |
//! | `controller` | every category |
//!
//! A role missing from the table is permitted nothing.

use crate::models::ExportCategory;
use crate::{Error, Result};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

/// Read-only mapping from role name to permitted categories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RolePermissions {
    role_categories: HashMap<String, HashSet<ExportCategory>>,
}

impl Default for RolePermissions {
    fn default() -> Self {
        Self::new()
    }
}

impl RolePermissions {
    /// Creates the default permission table.
    #[must_use]
    pub fn new() -> Self {
        use ExportCategory::{
            Calls, Feedback, Inventory, IssuedItems, Orders, Statistics, Users, Workflow,
        };

        let mut table = Self::empty();
        table.grant("call_center", [Calls, Orders, Feedback]);
        table.grant(
            "supervisor",
            [Calls, Feedback, Workflow, Statistics, Users],
        );
        table.grant("warehouse", [Inventory, IssuedItems]);
        table.grant(
            "manager",
            [Orders, Inventory, IssuedItems, Statistics, Users, Feedback],
        );
        table.grant("controller", ExportCategory::all().iter().copied());
        table
    }

    /// Creates a table with no roles.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            role_categories: HashMap::new(),
        }
    }

    /// Adds categories to a role, creating the role if needed.
    pub fn grant(&mut self, role: &str, categories: impl IntoIterator<Item = ExportCategory>) {
        self.role_categories
            .entry(normalize_role(role))
            .or_default()
            .extend(categories);
    }

    /// Replaces a role's categories with those named by `tags`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if any tag is not a known category; the
    /// table is left unchanged in that case.
    pub fn set_from_tags<S: AsRef<str>>(&mut self, role: &str, tags: &[S]) -> Result<()> {
        let categories = tags
            .iter()
            .map(|tag| {
                ExportCategory::parse(tag.as_ref()).ok_or_else(|| {
                    Error::InvalidInput(format!(
                        "unknown category '{}' in permissions for role '{role}'",
                        tag.as_ref()
                    ))
                })
            })
            .collect::<Result<HashSet<_>>>()?;
        self.role_categories.insert(normalize_role(role), categories);
        Ok(())
    }

    /// Returns true if `role` may export `category`.
    #[must_use]
    pub fn is_permitted(&self, role: &str, category: ExportCategory) -> bool {
        self.role_categories
            .get(&normalize_role(role))
            .is_some_and(|set| set.contains(&category))
    }

    /// Checks that `role` may export `category`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownCategory`] when the category is not permitted;
    /// a forbidden category is indistinguishable from a missing one.
    pub fn check(&self, role: &str, category: ExportCategory) -> Result<()> {
        if self.is_permitted(role, category) {
            Ok(())
        } else {
            Err(Error::UnknownCategory(format!(
                "{category} (not permitted for role '{role}')"
            )))
        }
    }

    /// Returns the permitted categories for `role` in catalogue order.
    #[must_use]
    pub fn categories_for(&self, role: &str) -> Vec<ExportCategory> {
        let Some(set) = self.role_categories.get(&normalize_role(role)) else {
            return Vec::new();
        };
        ExportCategory::all()
            .iter()
            .copied()
            .filter(|c| set.contains(c))
            .collect()
    }

    /// Returns every known role name, sorted.
    #[must_use]
    pub fn roles(&self) -> Vec<&str> {
        let mut roles: Vec<&str> = self.role_categories.keys().map(String::as_str).collect();
        roles.sort_unstable();
        roles
    }

    /// Returns the table as sorted role → sorted category tags.
    #[must_use]
    pub fn to_tag_map(&self) -> BTreeMap<String, BTreeSet<&'static str>> {
        self.role_categories
            .iter()
            .map(|(role, set)| (role.clone(), set.iter().map(ExportCategory::as_str).collect()))
            .collect()
    }
}

fn normalize_role(role: &str) -> String {
    role.trim().to_lowercase().replace('-', "_")
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("manager", ExportCategory::Orders, true; "manager orders")]
    #[test_case("manager", ExportCategory::Calls, false; "manager calls")]
    #[test_case("warehouse", ExportCategory::IssuedItems, true; "warehouse issued")]
    #[test_case("warehouse", ExportCategory::Orders, false; "warehouse orders")]
    #[test_case("call_center", ExportCategory::Feedback, true; "call center feedback")]
    #[test_case("Call-Center", ExportCategory::Calls, true; "role name normalized")]
    #[test_case("controller", ExportCategory::Workflow, true; "controller everything")]
    #[test_case("intern", ExportCategory::Orders, false; "unknown role")]
    fn test_default_table(role: &str, category: ExportCategory, expected: bool) {
        assert_eq!(RolePermissions::new().is_permitted(role, category), expected);
    }

    #[test]
    fn test_check_denial_is_unknown_category() {
        let err = RolePermissions::new()
            .check("warehouse", ExportCategory::Users)
            .unwrap_err();
        assert!(matches!(err, Error::UnknownCategory(_)));
    }

    #[test]
    fn test_categories_for_keeps_catalogue_order() {
        let perms = RolePermissions::new();
        assert_eq!(
            perms.categories_for("call_center"),
            vec![
                ExportCategory::Orders,
                ExportCategory::Feedback,
                ExportCategory::Calls
            ]
        );
        assert!(perms.categories_for("nobody").is_empty());
        assert_eq!(perms.categories_for("controller"), ExportCategory::all());
    }

    #[test]
    fn test_set_from_tags_replaces_role() {
        let mut perms = RolePermissions::new();
        perms.set_from_tags("manager", &["orders"]).unwrap();
        assert!(perms.is_permitted("manager", ExportCategory::Orders));
        assert!(!perms.is_permitted("manager", ExportCategory::Inventory));
    }

    #[test]
    fn test_set_from_tags_rejects_unknown_tag() {
        let mut perms = RolePermissions::new();
        let err = perms
            .set_from_tags("manager", &["orders", "payroll"])
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert!(perms.is_permitted("manager", ExportCategory::Inventory));
    }

    #[test]
    fn test_roles_sorted() {
        assert_eq!(
            RolePermissions::new().roles(),
            vec!["call_center", "controller", "manager", "supervisor", "warehouse"]
        );
    }
}
