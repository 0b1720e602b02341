pub mod attributes;
pub mod config;
pub mod context;
pub mod error;
pub mod logging;
pub mod person;
pub mod types;

pub use attributes::*;
pub use config::*;
pub use context::*;
pub use error::*;
pub use logging::*;
pub use person::*;
pub use types::*;
