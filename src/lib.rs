pub mod auth;
pub mod db;
pub mod errors;
pub mod geo;
pub mod handlers;
pub mod ids;
pub mod models;
pub mod scheduler;
pub mod templates_structs;
