//! Computes the aggregates by walking the records in memory.

use std::collections::{BTreeMap, HashMap};

use rusqlite::Connection;
use rust_decimal::Decimal;

use crate::{
    Error,
    club::{Club, ClubId, get_all_clubs},
    invoice::{Invoice, InvoiceId, get_all_invoices},
    invoice_row::{InvoiceRow, get_all_invoice_rows},
    money::{round_money, sum_amounts},
    party::{Party, PartyId, get_all_parties},
    report::{
        CalculationError, ClubSummary, InvoiceRowSummary, InvoiceSummary, PartySummary, Report,
        VisitorToPartySummary,
    },
    visitor_to_party::{VisitorToParty, get_all_visitor_to_parties},
};

/// A snapshot of the records with the relations between them resolved.
///
/// All record lists are kept ordered by ID, so "first" and "last" always
/// refer to the lowest and highest ID.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    clubs: Vec<Club>,
    parties: Vec<Party>,
    links: Vec<VisitorToParty>,
    invoices: BTreeMap<InvoiceId, Invoice>,
    rows: Vec<InvoiceRow>,
    parties_by_club: HashMap<ClubId, Vec<usize>>,
    links_by_party: HashMap<PartyId, Vec<usize>>,
    rows_by_invoice: HashMap<InvoiceId, Vec<InvoiceRow>>,
}

impl Ledger {
    /// Build a ledger from the given records.
    ///
    /// The records may be given in any order.
    pub fn new(
        mut clubs: Vec<Club>,
        mut parties: Vec<Party>,
        mut links: Vec<VisitorToParty>,
        invoices: Vec<Invoice>,
        mut rows: Vec<InvoiceRow>,
    ) -> Self {
        clubs.sort_by_key(|club| club.id);
        parties.sort_by_key(|party| party.id);
        links.sort_by_key(|link| link.id);
        rows.sort_by_key(|row| row.id);

        let mut parties_by_club: HashMap<ClubId, Vec<usize>> = HashMap::new();
        for (index, party) in parties.iter().enumerate() {
            parties_by_club.entry(party.club_id).or_default().push(index);
        }

        let mut links_by_party: HashMap<PartyId, Vec<usize>> = HashMap::new();
        for (index, link) in links.iter().enumerate() {
            links_by_party.entry(link.party_id).or_default().push(index);
        }

        let mut rows_by_invoice: HashMap<InvoiceId, Vec<InvoiceRow>> = HashMap::new();
        for row in &rows {
            rows_by_invoice
                .entry(row.invoice_id)
                .or_default()
                .push(row.clone());
        }

        Self {
            clubs,
            parties,
            links,
            invoices: invoices
                .into_iter()
                .map(|invoice| (invoice.id, invoice))
                .collect(),
            rows,
            parties_by_club,
            links_by_party,
            rows_by_invoice,
        }
    }

    /// Load every record from the database into a ledger.
    ///
    /// # Errors
    /// Returns an error if there is an SQL error.
    pub fn load(connection: &Connection) -> Result<Self, Error> {
        Ok(Self::new(
            get_all_clubs(connection)?,
            get_all_parties(connection)?,
            get_all_visitor_to_parties(connection)?,
            get_all_invoices(connection)?,
            get_all_invoice_rows(connection)?,
        ))
    }

    fn invoice(&self, invoice_id: InvoiceId) -> Result<&Invoice, Error> {
        self.invoices.get(&invoice_id).ok_or(Error::NotFound)
    }

    fn rows_of(&self, invoice_id: InvoiceId) -> &[InvoiceRow] {
        self.rows_by_invoice
            .get(&invoice_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    fn parties_of(&self, club_id: ClubId) -> impl Iterator<Item = &Party> {
        self.parties_by_club
            .get(&club_id)
            .into_iter()
            .flatten()
            .map(|&index| &self.parties[index])
    }

    fn links_of(&self, party_id: PartyId) -> impl Iterator<Item = &VisitorToParty> {
        self.links_by_party
            .get(&party_id)
            .into_iter()
            .flatten()
            .map(|&index| &self.links[index])
    }

    /// The sum of the row amounts of an invoice, zero if it has no rows.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if the invoice does not exist, or
    /// [CalculationError::AmountOverflow] if the total is too large.
    pub fn invoice_total(&self, invoice_id: InvoiceId) -> Result<Decimal, Error> {
        let invoice = self.invoice(invoice_id)?;

        Ok(invoice.total_amount(self.rows_of(invoice_id))?)
    }

    /// The total of the invoice attached to a link, `None` if there is none.
    pub fn invoice_amount(&self, link: &VisitorToParty) -> Result<Option<Decimal>, Error> {
        link.invoice_id
            .map(|invoice_id| self.invoice_total(invoice_id))
            .transpose()
    }

    /// The number of links at a party that have an invoice.
    pub fn invoices_count(&self, party_id: PartyId) -> i64 {
        self.links_of(party_id)
            .filter(|link| link.invoice_id.is_some())
            .count() as i64
    }

    /// The sum of the invoice amounts of a party's links.
    ///
    /// The income is not rounded.
    pub fn total_party_income(&self, party_id: PartyId) -> Result<Decimal, Error> {
        let amounts = self
            .links_of(party_id)
            .map(|link| self.invoice_amount(link).map(Option::unwrap_or_default))
            .collect::<Result<Vec<_>, Error>>()?;

        Ok(sum_amounts(amounts)?)
    }

    /// The number of parties hosted by a club.
    pub fn parties_count(&self, club_id: ClubId) -> i64 {
        self.parties_of(club_id).count() as i64
    }

    /// The income of all parties of a club, rounded to cents.
    pub fn total_incomes(&self, club_id: ClubId) -> Result<Decimal, Error> {
        let incomes = self
            .parties_of(club_id)
            .map(|party| self.total_party_income(party.id))
            .collect::<Result<Vec<_>, Error>>()?;

        Ok(round_money(sum_amounts(incomes)?))
    }

    /// The rounded total income divided by the number of parties, rounded to
    /// cents.
    ///
    /// # Errors
    /// Returns [CalculationError::NoParties] if the club has no parties.
    pub fn average_income_per_party(
        &self,
        club_id: ClubId,
    ) -> Result<Result<Decimal, CalculationError>, Error> {
        let parties_count = self.parties_count(club_id);

        if parties_count == 0 {
            return Ok(Err(CalculationError::NoParties(club_id)));
        }

        let total = self.total_incomes(club_id)?;

        Ok(Ok(round_money(total / Decimal::from(parties_count))))
    }

    /// The party of a club with the lowest ID.
    pub fn first_party(&self, club_id: ClubId) -> Option<&Party> {
        self.parties_of(club_id).next()
    }

    /// The party of a club with the highest ID.
    pub fn last_party(&self, club_id: ClubId) -> Option<&Party> {
        self.parties_of(club_id).last()
    }

    fn party_income_of(&self, party: Option<&Party>) -> Result<Option<Decimal>, Error> {
        party
            .map(|party| self.total_party_income(party.id))
            .transpose()
    }
}

/// A [Report] that computes the aggregates from a [Ledger].
#[derive(Debug, Clone)]
pub struct InProcessReport {
    ledger: Ledger,
}

impl InProcessReport {
    /// Create a report over `ledger`.
    pub fn new(ledger: Ledger) -> Self {
        Self { ledger }
    }

    /// Create a report over every record in the database.
    ///
    /// # Errors
    /// Returns an error if there is an SQL error.
    pub fn load(connection: &Connection) -> Result<Self, Error> {
        Ledger::load(connection).map(Self::new)
    }
}

impl Report for InProcessReport {
    fn invoice_rows(&self, limit: u32) -> Result<Vec<InvoiceRowSummary>, Error> {
        let ledger = &self.ledger;

        ledger
            .rows
            .iter()
            .take(limit as usize)
            .map(|row| {
                let invoice = ledger.invoice(row.invoice_id)?;

                Ok(InvoiceRowSummary {
                    id: row.id,
                    invoice_id: row.invoice_id,
                    description: row.description.clone(),
                    tax_rate: row.tax_rate,
                    quantity: row.quantity,
                    unit_price: row.unit_price,
                    amount_without_tax: row.amount_without_tax(),
                    amount: row.amount(invoice.default_tax_rate),
                })
            })
            .collect()
    }

    fn invoices(&self, limit: u32) -> Result<Vec<InvoiceSummary>, Error> {
        let ledger = &self.ledger;

        ledger
            .invoices
            .values()
            .take(limit as usize)
            .map(|invoice| {
                let rows = ledger.rows_of(invoice.id);

                Ok(InvoiceSummary {
                    id: invoice.id,
                    details: invoice.details(rows).map(str::to_owned),
                    default_tax_rate: invoice.default_tax_rate,
                    total_amount: invoice.total_amount(rows)?,
                })
            })
            .collect()
    }

    fn visitor_to_parties(&self, limit: u32) -> Result<Vec<VisitorToPartySummary>, Error> {
        let ledger = &self.ledger;

        ledger
            .links
            .iter()
            .take(limit as usize)
            .map(|link| {
                Ok(VisitorToPartySummary {
                    id: link.id,
                    visitor_id: link.visitor_id,
                    party_id: link.party_id,
                    invoice_id: link.invoice_id,
                    invoice_amount: ledger.invoice_amount(link)?,
                })
            })
            .collect()
    }

    fn parties(&self, limit: u32) -> Result<Vec<PartySummary>, Error> {
        let ledger = &self.ledger;

        ledger
            .parties
            .iter()
            .take(limit as usize)
            .map(|party| {
                Ok(PartySummary {
                    id: party.id,
                    name: party.name.clone(),
                    club_id: party.club_id,
                    invoices_count: ledger.invoices_count(party.id),
                    total_party_income: ledger.total_party_income(party.id)?,
                })
            })
            .collect()
    }

    fn clubs(&self, limit: u32) -> Result<Vec<ClubSummary>, Error> {
        let ledger = &self.ledger;

        ledger
            .clubs
            .iter()
            .take(limit as usize)
            .map(|club| {
                let first_party = ledger.first_party(club.id);
                let last_party = ledger.last_party(club.id);

                Ok(ClubSummary {
                    id: club.id,
                    name: club.name.clone(),
                    parties_count: ledger.parties_count(club.id),
                    total_incomes: ledger.total_incomes(club.id)?,
                    average_income_per_party: ledger.average_income_per_party(club.id)?,
                    first_party_name: first_party.map(|party| party.name.clone()),
                    first_party_income: ledger.party_income_of(first_party)?,
                    last_party_name: last_party.map(|party| party.name.clone()),
                    last_party_income: ledger.party_income_of(last_party)?,
                })
            })
            .collect()
    }
}
