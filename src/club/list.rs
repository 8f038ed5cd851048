//! The club listing endpoint.

use axum::{Json, extract::State};
use serde::Serialize;

use crate::{
    Error,
    club::ClubId,
    money::format_money,
    report::{CalculationError, ClubSummary, ReportState},
};

/// The maximum number of clubs returned by the club listing.
pub const CLUB_PAGE_SIZE: u32 = 10;

/// A club as shown in the club listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClubListItem {
    /// The ID of the club.
    pub id: ClubId,
    /// The name of the club.
    pub name: String,
    /// The number of parties the club hosted.
    pub parties_count: i64,
    /// The income of all parties.
    pub total_incomes: String,
    /// The average income per party, `None` if the club hosted no parties.
    pub average_income_per_party: Option<String>,
    /// The name of the party with the lowest ID.
    pub first_party_name: Option<String>,
    /// The income of the party with the lowest ID.
    pub first_party_income: Option<String>,
    /// The name of the party with the highest ID.
    pub last_party_name: Option<String>,
    /// The income of the party with the highest ID.
    pub last_party_income: Option<String>,
}

impl From<ClubSummary> for ClubListItem {
    fn from(summary: ClubSummary) -> Self {
        let average_income_per_party = match summary.average_income_per_party {
            Ok(average) => Some(format_money(average)),
            Err(error @ CalculationError::NoParties(_)) => {
                tracing::warn!("listing club without average income: {error}");
                None
            }
            Err(error @ CalculationError::AmountOverflow) => {
                tracing::error!("listing club without average income: {error}");
                None
            }
        };

        Self {
            id: summary.id,
            name: summary.name,
            parties_count: summary.parties_count,
            total_incomes: format_money(summary.total_incomes),
            average_income_per_party,
            first_party_name: summary.first_party_name,
            first_party_income: summary.first_party_income.map(format_money),
            last_party_name: summary.last_party_name,
            last_party_income: summary.last_party_income.map(format_money),
        }
    }
}

/// A route handler that lists the first [CLUB_PAGE_SIZE] clubs.
pub async fn get_club_list(
    State(state): State<ReportState>,
) -> Result<Json<Vec<ClubListItem>>, Error> {
    let clubs = state
        .query(|report| report.clubs(CLUB_PAGE_SIZE))
        .inspect_err(|error| tracing::error!("could not list clubs: {error}"))?;

    Ok(Json(clubs.into_iter().map(ClubListItem::from).collect()))
}
