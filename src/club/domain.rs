//! Core club domain types.

use serde::Serialize;

/// Database identifier for a club.
pub type ClubId = i64;

/// A club that hosts parties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Club {
    /// The ID of the club.
    pub id: ClubId,
    /// The display name of the club.
    pub name: String,
}
