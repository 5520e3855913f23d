pub mod app_config;
pub mod db;
pub mod middleware;
pub mod orm;
pub mod permission;
pub mod session;
pub mod tenancy;
pub mod web;
