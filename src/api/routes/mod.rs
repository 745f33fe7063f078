pub mod datasource_routes;
