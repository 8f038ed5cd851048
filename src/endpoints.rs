//! The API endpoints URIs.

/// The route for listing clubs with their party statistics.
pub const CLUB_LIST: &str = "/dashboard/list/club";
/// The route for listing parties with their income.
pub const PARTY_LIST: &str = "/dashboard/list/party";
/// The route for listing invoices with their totals.
pub const INVOICE_LIST: &str = "/dashboard/list/invoice";
/// The route for listing invoice rows with their amounts.
pub const INVOICE_ROW_LIST: &str = "/dashboard/list/invoice-row";
/// The route for listing visitors at parties with their invoice amounts.
pub const VISITOR_TO_PARTY_LIST: &str = "/dashboard/list/visitor-to-party";
