pub mod app;
pub mod audit;
pub mod config;
pub mod db;
pub mod dto;
pub mod entity;
pub mod error;
pub mod extract;
pub mod media;
pub mod middleware;
pub mod migration;
pub mod models;
pub mod rate_limit;
pub mod response;
pub mod routes;
pub mod services;
pub mod shop_code;
pub mod state;
pub mod stats;
pub mod validation;
