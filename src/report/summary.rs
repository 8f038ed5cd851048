//! The flattened records returned by a [Report](super::Report).

use rust_decimal::Decimal;

use crate::{
    club::ClubId,
    invoice::InvoiceId,
    invoice_row::InvoiceRowId,
    money::{TaxRate, UnitPrice},
    party::PartyId,
    report::CalculationError,
    visitor::VisitorId,
    visitor_to_party::VisitorToPartyId,
};

/// An invoice row with its computed amounts.
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceRowSummary {
    /// The ID of the row.
    pub id: InvoiceRowId,
    /// The invoice the row belongs to.
    pub invoice_id: InvoiceId,
    /// What was sold.
    pub description: String,
    /// The row's own tax rate.
    pub tax_rate: TaxRate,
    /// How many units were sold.
    pub quantity: u32,
    /// The price of a single unit before tax.
    pub unit_price: UnitPrice,
    /// `quantity * unit_price`.
    pub amount_without_tax: Decimal,
    /// The amount including the effective tax rate.
    pub amount: Decimal,
}

/// An invoice with its computed details and total.
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceSummary {
    /// The ID of the invoice.
    pub id: InvoiceId,
    /// The description, or the first row's description as a fallback.
    pub details: Option<String>,
    /// The tax rate applied to rows without their own rate.
    pub default_tax_rate: TaxRate,
    /// The sum of the row amounts, zero for an invoice without rows.
    pub total_amount: Decimal,
}

/// A visitor-to-party link with the amount of its invoice.
#[derive(Debug, Clone, PartialEq)]
pub struct VisitorToPartySummary {
    /// The ID of the link.
    pub id: VisitorToPartyId,
    /// The visitor at the party.
    pub visitor_id: VisitorId,
    /// The party the visitor attended.
    pub party_id: PartyId,
    /// The invoice attached to the link, if any.
    pub invoice_id: Option<InvoiceId>,
    /// The total of the linked invoice, `None` when no invoice is linked.
    pub invoice_amount: Option<Decimal>,
}

/// A party with its invoice statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct PartySummary {
    /// The ID of the party.
    pub id: PartyId,
    /// The name of the party.
    pub name: String,
    /// The club that hosted the party.
    pub club_id: ClubId,
    /// The number of visitors at the party that have an invoice.
    pub invoices_count: i64,
    /// The sum of the invoice amounts of the party's visitors.
    pub total_party_income: Decimal,
}

/// A club with statistics over its parties.
///
/// The first and last party fields are `None` for a club without parties.
#[derive(Debug, Clone, PartialEq)]
pub struct ClubSummary {
    /// The ID of the club.
    pub id: ClubId,
    /// The name of the club.
    pub name: String,
    /// The number of parties the club hosted.
    pub parties_count: i64,
    /// The income of all parties, rounded to cents.
    pub total_incomes: Decimal,
    /// The total income divided by the number of parties, rounded to cents.
    ///
    /// Fails with [CalculationError::NoParties] for a club without parties.
    pub average_income_per_party: Result<Decimal, CalculationError>,
    /// The name of the party with the lowest ID.
    pub first_party_name: Option<String>,
    /// The unrounded income of the party with the lowest ID.
    pub first_party_income: Option<Decimal>,
    /// The name of the party with the highest ID.
    pub last_party_name: Option<String>,
    /// The unrounded income of the party with the highest ID.
    pub last_party_income: Option<Decimal>,
}
