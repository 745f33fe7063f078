use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use tracing::{error, info, Instrument};
use uuid::Uuid;

use crate::core::client::reporting::report_request::ReportRequest;
use crate::core::client::reporting::report_transport::ReportTransport;
use crate::domain::query::credentials::Credentials;
use crate::domain::query::interval::select_interval;
use crate::domain::query::model::{DataQuery, LabeledSeries, QueryModel, QuerySlots};
use crate::domain::query::query_error::QueryError;
use crate::domain::query::report_mapper::map_report_response;
use crate::domain::query::window::align_window;
use crate::domain::query::zone_list::ZoneList;

/// Runs batches of traffic queries against the reporting API.
pub struct QueryService {
    transport: Arc<dyn ReportTransport>,
}

impl QueryService {
    pub fn new(transport: Arc<dyn ReportTransport>) -> Self {
        Self { transport }
    }

    /// Runs every query of a batch and returns one slot per `ref_id`.
    ///
    /// Only undecodable settings fail the batch; everything else is recorded
    /// in the slot of the query that failed.
    pub async fn query_data(
        &self,
        settings: &serde_json::Value,
        queries: Vec<DataQuery>,
    ) -> Result<QuerySlots, QueryError> {
        self.query_data_at(settings, queries, Utc::now()).await
    }

    pub(crate) async fn query_data_at(
        &self,
        settings: &serde_json::Value,
        queries: Vec<DataQuery>,
        now: DateTime<Utc>,
    ) -> Result<QuerySlots, QueryError> {
        let credentials = Credentials::from_settings(settings)?;
        let batch_id = Uuid::new_v4();
        info!(%batch_id, queries = queries.len(), host = %credentials.host, "Running query batch");

        let credentials = &credentials;
        let runs = queries.into_iter().map(move |query| {
            let span = tracing::info_span!("query", %batch_id, ref_id = %query.ref_id);
            async move {
                let result = self.run_query(credentials, &query, now).await;
                if let Err(e) = &result {
                    error!(?e, "Query failed");
                }
                (query.ref_id, result)
            }
            .instrument(span)
        });

        Ok(join_all(runs).await.into_iter().collect())
    }

    async fn run_query(
        &self,
        credentials: &Credentials,
        query: &DataQuery,
        now: DateTime<Utc>,
    ) -> Result<LabeledSeries, QueryError> {
        let model = QueryModel::decode(&query.model)?;
        info!(
            from = %query.from,
            to = %query.to,
            max_data_points = model.max_data_points,
            zone_names = %model.zone_names,
            metric_name = ?model.metric_name,
            interval_ms = model.interval_ms,
            data_source_id = model.data_source_id,
            "Validating query"
        );

        let zones = ZoneList::parse(&model.zone_names);
        if zones.is_empty() {
            return Err(QueryError::NoZonesSpecified);
        }

        let interval = select_interval(query.from, query.to, model.max_data_points);
        let window = align_window(query.from, query.to, interval, now)?;
        info!(from = %window.from, to = %window.to, %interval, zones = zones.len(), "Fetching traffic report");

        let request = ReportRequest::report_data(&zones, &window, interval);
        let raw = self
            .transport
            .execute(credentials, request)
            .await
            .map_err(|e| QueryError::Transport(format!("{e:#}")))?;
        info!(status = %raw.status, "Reporting API answered");

        let points = map_report_response(&raw)?;

        Ok(LabeledSeries {
            label: model.label(),
            points,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::client::reporting::report_transport::mock::{json_response, MockReportTransport};
    use anyhow::anyhow;
    use chrono::{Duration, TimeZone};
    use http::Method;
    use serde_json::{json, Value};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn settings() -> Value {
        json!({
            "clientSecret": "secret",
            "host": "akab-example.luna.akamaiapis.net",
            "accessToken": "access",
            "clientToken": "client"
        })
    }

    fn query(ref_id: &str, zone_names: &str, metric_name: &str) -> DataQuery {
        DataQuery {
            ref_id: ref_id.to_string(),
            from: now() - Duration::hours(6),
            to: now(),
            model: json!({
                "zoneNames": zone_names,
                "metricName": metric_name,
                "maxDataPoints": 1000,
                "intervalMs": 20000,
                "dataSourceId": 1
            }),
        }
    }

    fn two_rows() -> Value {
        json!({
            "data": [
                { "startdatetime": "1717221600000", "hits": "10" },
                { "startdatetime": "1717221900000", "hits": "N/A" }
            ],
            "metadata": { "rowCount": 2, "interval": "FIVE_MINUTES" }
        })
    }

    #[tokio::test]
    async fn isolates_failing_queries_in_their_slot() {
        let transport = Arc::new(MockReportTransport::always(200, two_rows()));
        let service = QueryService::new(transport.clone());

        let slots = service
            .query_data_at(
                &settings(),
                vec![
                    query("A", "a.example.net", ""),
                    query("B", "", ""),
                    query("C", "c.example.net, d.example.net", "Custom"),
                ],
                now(),
            )
            .await
            .unwrap();

        assert_eq!(slots.len(), 3);
        assert_eq!(slots["B"], Err(QueryError::NoZonesSpecified));

        let a = slots["A"].as_ref().unwrap();
        assert_eq!(a.label, "a.example.net hits");
        assert_eq!(a.points.len(), 2);
        assert_eq!(a.points[1].value, 0.0);

        let c = slots["C"].as_ref().unwrap();
        assert_eq!(c.label, "Custom");

        assert_eq!(transport.recorded().len(), 2);
    }

    #[tokio::test]
    async fn builds_the_report_request_from_the_aligned_window() {
        let transport = Arc::new(MockReportTransport::always(200, two_rows()));
        let service = QueryService::new(transport.clone());

        let mut q = query("A", " a.example.net , b.example.net", "");
        q.from = now() - Duration::hours(6) + Duration::seconds(100);
        q.to = now() - Duration::seconds(40);
        service.query_data_at(&settings(), vec![q], now()).await.unwrap();

        let requests = transport.recorded();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, Method::POST);
        assert!(requests[0].path_and_query.ends_with(
            "?start=2024-06-01T06%3A00%3A00Z&end=2024-06-01T12%3A00%3A00Z&interval=FIVE_MINUTES"
        ));
        assert_eq!(
            requests[0].body.as_ref().unwrap().object_ids,
            ["a.example.net", "b.example.net"]
        );
    }

    #[tokio::test]
    async fn undecodable_settings_fail_the_batch() {
        let transport = Arc::new(MockReportTransport::always(200, two_rows()));
        let service = QueryService::new(transport.clone());
        let err = service
            .query_data_at(&json!(["not", "settings"]), vec![query("A", "a.net", "")], now())
            .await
            .unwrap_err();
        assert!(matches!(err, QueryError::Configuration(_)));
        assert!(transport.recorded().is_empty());
    }

    #[tokio::test]
    async fn null_zone_names_ask_for_zones() {
        let transport = Arc::new(MockReportTransport::always(200, two_rows()));
        let service = QueryService::new(transport.clone());

        let mut q = query("A", "", "");
        q.model = json!({ "zoneNames": null, "maxDataPoints": 1000 });
        let slots = service.query_data_at(&settings(), vec![q], now()).await.unwrap();

        assert_eq!(slots["A"], Err(QueryError::NoZonesSpecified));
        assert!(transport.recorded().is_empty());
    }

    #[tokio::test]
    async fn window_before_retention_is_reported_without_a_request() {
        let transport = Arc::new(MockReportTransport::always(200, two_rows()));
        let service = QueryService::new(transport.clone());

        let mut q = query("A", "a.example.net", "");
        q.from = now() - Duration::days(200);
        q.to = now() - Duration::days(100);
        let slots = service.query_data_at(&settings(), vec![q], now()).await.unwrap();

        assert!(matches!(
            slots["A"],
            Err(QueryError::WindowBeforeRetentionHorizon { .. })
        ));
        assert!(transport.recorded().is_empty());
    }

    #[tokio::test]
    async fn transport_and_remote_failures_stay_per_query() {
        let transport = Arc::new(MockReportTransport::new(|request| {
            let zones = &request.body.as_ref().unwrap().object_ids;
            match zones[0].as_str() {
                "down.example.net" => Err(anyhow!("connection refused")),
                "denied.example.net" => Ok(json_response(
                    403,
                    json!({ "errors": [{ "title": "Some of the requested objects are unauthorized: [denied.example.net]", "type": "x" }] }),
                )),
                _ => Ok(json_response(
                    200,
                    json!({ "data": [{ "startdatetime": "bad", "hits": "1" }], "metadata": {} }),
                )),
            }
        }));
        let service = QueryService::new(transport);

        let slots = service
            .query_data_at(
                &settings(),
                vec![
                    query("down", "down.example.net", ""),
                    query("denied", "denied.example.net", ""),
                    query("malformed", "ok.example.net", ""),
                    DataQuery {
                        model: json!({ "zoneNames": 5 }),
                        ..query("invalid", "", "")
                    },
                ],
                now(),
            )
            .await
            .unwrap();

        assert!(matches!(&slots["down"], Err(QueryError::Transport(m)) if m.contains("connection refused")));
        assert_eq!(
            slots["denied"],
            Err(QueryError::RemoteRejection {
                status: 403,
                message: "Some of the requested objects are unauthorized: [denied.example.net]".into()
            })
        );
        assert!(matches!(slots["malformed"], Err(QueryError::MalformedSample { .. })));
        assert!(matches!(slots["invalid"], Err(QueryError::InvalidQuery(_))));
    }

    #[tokio::test]
    async fn long_ranges_use_hourly_buckets() {
        let transport = Arc::new(MockReportTransport::always(200, two_rows()));
        let service = QueryService::new(transport.clone());

        let mut q = query("A", "a.example.net", "");
        q.from = now() - Duration::days(30);
        service.query_data_at(&settings(), vec![q], now()).await.unwrap();

        assert!(transport.recorded()[0].path_and_query.ends_with("&interval=HOUR"));
    }
}
