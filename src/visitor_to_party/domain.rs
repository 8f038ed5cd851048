//! Core visitor-to-party domain types.

use crate::{invoice::InvoiceId, party::PartyId, visitor::VisitorId};

/// Database identifier for a visitor-to-party link.
pub type VisitorToPartyId = i64;

/// Records that a visitor attended a party, optionally with an invoice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitorToParty {
    /// The ID of the link.
    pub id: VisitorToPartyId,
    /// The visitor that attended.
    pub visitor_id: VisitorId,
    /// The party that was attended.
    pub party_id: PartyId,
    /// The invoice for the visit, if the visitor was billed.
    pub invoice_id: Option<InvoiceId>,
}
