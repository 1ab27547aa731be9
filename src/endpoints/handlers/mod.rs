pub mod configs;
pub mod fetch_handler;
pub mod graphql;
pub mod rest;
