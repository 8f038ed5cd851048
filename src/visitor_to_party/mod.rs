//! The links between visitors and the parties they attended.
//!
//! A link may carry the invoice for the visitor's spending at the party.

mod db;
mod domain;
mod list;

pub use db::{
    create_visitor_to_party, create_visitor_to_party_table, get_all_visitor_to_parties,
};
pub use domain::{VisitorToParty, VisitorToPartyId};
pub use list::{VISITOR_TO_PARTY_PAGE_SIZE, VisitorToPartyListItem, get_visitor_to_party_list};
