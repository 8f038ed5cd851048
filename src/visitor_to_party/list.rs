//! The visitor-to-party listing endpoint.

use axum::{Json, extract::State};
use serde::Serialize;

use crate::{
    Error,
    invoice::InvoiceId,
    money::format_money,
    party::PartyId,
    report::{ReportState, VisitorToPartySummary},
    visitor::VisitorId,
    visitor_to_party::VisitorToPartyId,
};

/// The maximum number of links returned by the visitor-to-party listing.
pub const VISITOR_TO_PARTY_PAGE_SIZE: u32 = 30;

/// A visitor-to-party link as shown in the listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisitorToPartyListItem {
    /// The ID of the link.
    pub id: VisitorToPartyId,
    /// The ID of the visitor.
    pub visitor: VisitorId,
    /// The ID of the party.
    pub party: PartyId,
    /// The ID of the attached invoice, if any.
    pub invoice: Option<InvoiceId>,
    /// The total of the attached invoice, if any.
    pub invoice_amount: Option<String>,
}

impl From<VisitorToPartySummary> for VisitorToPartyListItem {
    fn from(summary: VisitorToPartySummary) -> Self {
        Self {
            id: summary.id,
            visitor: summary.visitor_id,
            party: summary.party_id,
            invoice: summary.invoice_id,
            invoice_amount: summary.invoice_amount.map(format_money),
        }
    }
}

/// A route handler that lists the first [VISITOR_TO_PARTY_PAGE_SIZE] links.
pub async fn get_visitor_to_party_list(
    State(state): State<ReportState>,
) -> Result<Json<Vec<VisitorToPartyListItem>>, Error> {
    let links = state
        .query(|report| report.visitor_to_parties(VISITOR_TO_PARTY_PAGE_SIZE))
        .inspect_err(|error| tracing::error!("could not list visitors at parties: {error}"))?;

    Ok(Json(
        links.into_iter().map(VisitorToPartyListItem::from).collect(),
    ))
}
