pub mod health_service;
pub mod query_service;
