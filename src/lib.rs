pub mod config;
pub mod endpoints;
pub mod lifecycle;
pub mod models;
pub mod policy;
pub mod repos;
