pub mod aggregate;
pub mod cache;
pub mod engine;
pub mod errors;
pub mod factors;
pub mod intensity;
pub mod records;
pub mod report;
pub mod server;
pub mod settings;
pub mod sources;
pub mod utilities;

use chrono::{DateTime, Utc};

pub type TimeStamp = DateTime<Utc>;
