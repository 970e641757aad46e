pub mod config;
pub mod endpoints;
pub mod params;
pub mod response;

pub use config::*;
pub use endpoints::*;
pub use params::*;
pub use response::*;
