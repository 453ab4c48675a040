//! Export categories.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A named class of exportable business data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportCategory {
    /// Warehouse stock levels.
    Inventory,
    /// Equipment handed out to staff or customers.
    IssuedItems,
    /// Customer service orders.
    Orders,
    /// Flattened operational metrics, one row per metric and period.
    Statistics,
    /// Staff directory.
    Users,
    /// Customer feedback tickets.
    Feedback,
    /// Internal workflow tasks.
    Workflow,
    /// Call-center call log.
    Calls,
}

impl ExportCategory {
    /// Returns all categories in registry order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Inventory,
            Self::IssuedItems,
            Self::Orders,
            Self::Statistics,
            Self::Users,
            Self::Feedback,
            Self::Workflow,
            Self::Calls,
        ]
    }

    /// Returns the category tag, which doubles as the filename slug.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Inventory => "inventory",
            Self::IssuedItems => "issued_items",
            Self::Orders => "orders",
            Self::Statistics => "statistics",
            Self::Users => "users",
            Self::Feedback => "feedback",
            Self::Workflow => "workflow",
            Self::Calls => "calls",
        }
    }

    /// Parses a category tag.
    ///
    /// Case-insensitive; a hyphen is accepted in place of the underscore.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "inventory" => Some(Self::Inventory),
            "issued_items" => Some(Self::IssuedItems),
            "orders" => Some(Self::Orders),
            "statistics" => Some(Self::Statistics),
            "users" => Some(Self::Users),
            "feedback" => Some(Self::Feedback),
            "workflow" => Some(Self::Workflow),
            "calls" => Some(Self::Calls),
            _ => None,
        }
    }
}

impl FromStr for ExportCategory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s).ok_or_else(|| Error::UnknownCategory(s.to_string()))
    }
}

impl fmt::Display for ExportCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
