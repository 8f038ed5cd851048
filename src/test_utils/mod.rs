#![allow(missing_docs)]

use axum_test::TestServer;
use rusqlite::Connection;

use crate::{
    AggregationSource, AppState, build_router,
    club::{Club, ClubId, create_club},
    db::initialize,
    invoice::{Invoice, InvoiceId, create_invoice},
    invoice_row::{InvoiceRow, NewInvoiceRow, create_invoice_row},
    money::{TaxRate, UnitPrice},
    party::{Party, PartyId, create_party},
    visitor::create_visitor,
    visitor_to_party::{VisitorToParty, create_visitor_to_party},
};

pub(crate) fn get_test_connection() -> Connection {
    let connection = Connection::open_in_memory().unwrap();
    initialize(&connection).expect("Could not initialize database");
    connection
}

pub(crate) fn test_server(connection: Connection, aggregation: AggregationSource) -> TestServer {
    let state = AppState::new(connection, aggregation).expect("Could not create app state");

    TestServer::new(build_router(state)).expect("Could not create test server")
}

pub(crate) fn club(id: ClubId, name: &str) -> Club {
    Club {
        id,
        name: name.to_owned(),
    }
}

pub(crate) fn party(id: PartyId, name: &str, club_id: ClubId) -> Party {
    Party {
        id,
        name: name.to_owned(),
        club_id,
    }
}

pub(crate) fn link(id: i64, party_id: PartyId, invoice_id: Option<InvoiceId>) -> VisitorToParty {
    VisitorToParty {
        id,
        visitor_id: 1,
        party_id,
        invoice_id,
    }
}

pub(crate) fn invoice(id: InvoiceId, description: Option<&str>, tax_percent: i64) -> Invoice {
    Invoice {
        id,
        description: description.map(str::to_owned),
        default_tax_rate: TaxRate::from_percent(tax_percent),
    }
}

pub(crate) fn row(
    id: i64,
    invoice_id: InvoiceId,
    description: &str,
    tax_percent: i64,
    quantity: u32,
    unit_price_cents: i64,
) -> InvoiceRow {
    InvoiceRow {
        id,
        invoice_id,
        description: description.to_owned(),
        tax_rate: TaxRate::from_percent(tax_percent),
        quantity,
        unit_price: UnitPrice::from_cents(unit_price_cents),
    }
}

/// Create a party of `club_id` with one visitor whose invoice has a single
/// row of `quantity` vodkas at 5.00 taxed at 50%.
pub(crate) fn create_billed_party(
    name: &str,
    club_id: ClubId,
    quantity: u32,
    connection: &Connection,
) -> Party {
    let party = create_party(name, club_id, connection).unwrap();
    let visitor = create_visitor("Ivo", 20, connection).unwrap();
    let invoice = create_invoice(None, TaxRate::from_percent(50), connection).unwrap();
    create_invoice_row(
        NewInvoiceRow {
            invoice_id: invoice.id,
            description: "Vodka".to_owned(),
            tax_rate: TaxRate::from_percent(50),
            quantity,
            unit_price: UnitPrice::from_cents(500),
        },
        connection,
    )
    .unwrap();
    create_visitor_to_party(visitor.id, party.id, Some(invoice.id), connection).unwrap();

    party
}

/// Create the club "Versai" with the parties "Boro" (income 30), "Boro"
/// (income 15) and "Boro i Madmatik" (income 7.5).
pub(crate) fn create_versai_club(connection: &Connection) -> Club {
    let club = create_club("Versai", connection).unwrap();

    create_billed_party("Boro", club.id, 4, connection);
    create_billed_party("Boro", club.id, 2, connection);
    create_billed_party("Boro i Madmatik", club.id, 1, connection);

    club
}
