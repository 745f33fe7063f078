//! Traffic queries: zone parsing, interval choice, window alignment and
//! report-to-series mapping.

pub mod credentials;
pub mod interval;
pub mod model;
pub mod query_error;
pub mod report_mapper;
pub mod service;
pub mod window;
pub mod zone_list;
