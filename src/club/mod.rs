//! Clubs and the club listing.

mod db;
mod domain;
mod list;

pub use db::{create_club, create_club_table, get_all_clubs, get_club};
pub use domain::{Club, ClubId};
pub use list::{CLUB_PAGE_SIZE, ClubListItem, get_club_list};
