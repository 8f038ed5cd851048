//! Core party domain types.

use serde::Serialize;

use crate::club::ClubId;

/// Database identifier for a party.
pub type PartyId = i64;

/// A party hosted by a club.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Party {
    /// The ID of the party.
    pub id: PartyId,
    /// The display name of the party.
    pub name: String,
    /// The club hosting the party.
    pub club_id: ClubId,
}
