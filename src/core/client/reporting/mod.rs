pub mod report_dto;
pub mod report_request;
pub mod report_transport;
pub mod reporting_http_client;
