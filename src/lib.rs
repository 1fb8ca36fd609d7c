//! PetConnect: doação de medicamentos, rações e artigos entre ONGs de
//! proteção animal.

pub mod app;
pub mod common;
pub mod config;
pub mod db;
pub mod docs;
pub mod gateway;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
