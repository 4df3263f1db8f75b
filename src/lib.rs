pub mod game;
pub mod store;
pub mod service;
pub mod api;
pub mod error;
pub mod config;

pub use error::{GameError, PersistenceError, ServiceError, Result, ServiceResult};
pub use config::Config;
