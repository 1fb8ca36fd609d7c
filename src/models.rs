pub mod auth;
pub mod catalog;
pub mod organization;
pub mod request;
pub mod resource;
