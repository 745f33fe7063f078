use chrono::{DateTime, SecondsFormat, Utc};
use http::Method;

use super::report_dto::ReportDataRequestDto;
use crate::domain::query::interval::Interval;
use crate::domain::query::window::AlignedWindow;
use crate::domain::query::zone_list::ZoneList;

pub const REPORT_DATA_PATH: &str =
    "/reporting-api/v1/reports/load-balancing-dns-traffic-all-properties/versions/2/report-data";

/// Zone that never exists; the API answers it with 403 when credentials work.
pub const PROBE_ZONE: &str = "-fake-";

/// A request against the reporting API, relative to the configured host.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRequest {
    pub method: Method,
    pub path_and_query: String,
    pub body: Option<ReportDataRequestDto>,
}

impl ReportRequest {
    /// POST for the traffic of `zones` over `window`.
    pub fn report_data(zones: &ZoneList, window: &AlignedWindow, interval: Interval) -> Self {
        Self {
            method: Method::POST,
            path_and_query: report_data_path(window, interval),
            body: Some(ReportDataRequestDto::for_zones(zones.as_slice())),
        }
    }

    /// Body-less GET naming a single object in the query string.
    pub fn probe(window: &AlignedWindow, interval: Interval, zone: &str) -> Self {
        Self {
            method: Method::GET,
            path_and_query: format!(
                "{}&objectIds={}",
                report_data_path(window, interval),
                urlencoding::encode(zone)
            ),
            body: None,
        }
    }
}

fn report_data_path(window: &AlignedWindow, interval: Interval) -> String {
    format!(
        "{}?start={}&end={}&interval={}",
        REPORT_DATA_PATH,
        url_time(window.from),
        url_time(window.to),
        interval.as_code()
    )
}

/// RFC 3339, URL-escaped, as the API expects in query strings.
fn url_time(t: DateTime<Utc>) -> String {
    urlencoding::encode(&t.to_rfc3339_opts(SecondsFormat::Secs, true)).into_owned()
}
