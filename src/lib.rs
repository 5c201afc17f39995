pub mod api;
pub mod booking;
pub mod config;
pub mod db;
pub mod engine;
pub mod entities;
pub mod error;
pub mod fare;
pub mod fleet;
pub mod mock;
pub mod server;
pub mod validation;
pub mod wizard;
