pub mod catalog;
pub mod config;
pub mod error;
pub mod form;
pub mod models;
pub mod session;
pub mod sources;
