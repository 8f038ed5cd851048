//! Parties hosted by clubs and the party listing.

mod db;
mod domain;
mod list;

pub use db::{create_party, create_party_table, get_all_parties, get_party};
pub use domain::{Party, PartyId};
pub use list::{PARTY_PAGE_SIZE, PartyListItem, get_party_list};
