pub mod cost;
pub mod database;
pub mod errors;
pub mod features;
pub mod hysteresis;
pub mod plugin;
pub mod query;
pub mod search;
pub mod sections;
pub mod settings;
pub mod utils;
