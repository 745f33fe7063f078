// Reporting API client
pub mod reporting;
