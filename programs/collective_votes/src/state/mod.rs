//! State structures for the collective vote market

pub mod collective;
pub mod config;
pub mod roles;
pub mod season;

pub use collective::*;
pub use config::*;
pub use roles::*;
pub use season::*;
