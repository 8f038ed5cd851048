//! The party listing endpoint.

use axum::{Json, extract::State};
use serde::Serialize;

use crate::{
    Error,
    club::ClubId,
    money::format_money,
    party::PartyId,
    report::{PartySummary, ReportState},
};

/// The maximum number of parties returned by the party listing.
pub const PARTY_PAGE_SIZE: u32 = 30;

/// A party as shown in the party listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartyListItem {
    /// The ID of the party.
    pub id: PartyId,
    /// The name of the party.
    pub name: String,
    /// The ID of the club that hosted the party.
    pub club: ClubId,
    /// The number of visitors with an invoice.
    pub invoices_count: i64,
    /// The sum of the visitors' invoice amounts.
    pub total_party_income: String,
}

impl From<PartySummary> for PartyListItem {
    fn from(summary: PartySummary) -> Self {
        Self {
            id: summary.id,
            name: summary.name,
            club: summary.club_id,
            invoices_count: summary.invoices_count,
            total_party_income: format_money(summary.total_party_income),
        }
    }
}

/// A route handler that lists the first [PARTY_PAGE_SIZE] parties.
pub async fn get_party_list(
    State(state): State<ReportState>,
) -> Result<Json<Vec<PartyListItem>>, Error> {
    let parties = state
        .query(|report| report.parties(PARTY_PAGE_SIZE))
        .inspect_err(|error| tracing::error!("could not list parties: {error}"))?;

    Ok(Json(parties.into_iter().map(PartyListItem::from).collect()))
}

#[cfg(test)]
mod party_list_tests {
    use serde_json::{Value, json};

    use crate::{
        AggregationSource,
        club::create_club,
        endpoints,
        invoice::create_invoice,
        money::TaxRate,
        party::create_party,
        test_utils::{create_billed_party, get_test_connection, test_server},
        visitor::create_visitor,
        visitor_to_party::create_visitor_to_party,
    };

    async fn list_parties(aggregation: AggregationSource) -> Value {
        let connection = get_test_connection();
        let club = create_club("Versai", &connection).unwrap();
        let boro = create_billed_party("Boro", club.id, 4, &connection);
        let visitor = create_visitor("Ana", 31, &connection).unwrap();
        let empty_invoice = create_invoice(None, TaxRate::ZERO, &connection).unwrap();
        create_visitor_to_party(visitor.id, boro.id, Some(empty_invoice.id), &connection).unwrap();
        create_visitor_to_party(visitor.id, boro.id, None, &connection).unwrap();
        create_party("Quiet", club.id, &connection).unwrap();

        let response = test_server(connection, aggregation)
            .get(endpoints::PARTY_LIST)
            .await;

        response.assert_status_ok();
        response.json()
    }

    fn want_parties() -> Value {
        json!([
            {
                "id": 1,
                "name": "Boro",
                "club": 1,
                "invoices_count": 2,
                "total_party_income": "30.00",
            },
            {
                "id": 2,
                "name": "Quiet",
                "club": 1,
                "invoices_count": 0,
                "total_party_income": "0.00",
            },
        ])
    }

    #[tokio::test]
    async fn lists_parties_from_database_aggregates() {
        assert_eq!(list_parties(AggregationSource::Database).await, want_parties());
    }

    #[tokio::test]
    async fn lists_parties_from_in_process_aggregates() {
        assert_eq!(
            list_parties(AggregationSource::InProcess).await,
            want_parties()
        );
    }
}
