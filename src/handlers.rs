pub mod auth;
pub mod catalog;
pub mod dashboard;
pub mod donations;
pub mod organizations;
pub mod requests;
pub mod resources;
