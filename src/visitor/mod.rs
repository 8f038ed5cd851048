//! People that visit parties.

mod db;
mod domain;

pub use db::{create_visitor, create_visitor_table, get_all_visitors, get_visitor};
pub use domain::{Visitor, VisitorId};
