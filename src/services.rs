pub mod auth;
pub mod board;
pub mod catalog;
pub mod dashboard_service;
pub mod donation_service;
pub mod session;
