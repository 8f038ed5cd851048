//! Core visitor domain types.

use serde::Serialize;

/// Database identifier for a visitor.
pub type VisitorId = i64;

/// A person that attends parties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Visitor {
    /// The ID of the visitor.
    pub id: VisitorId,
    /// The visitor's full name.
    pub full_name: String,
    /// The visitor's age in years.
    pub age: u32,
}
