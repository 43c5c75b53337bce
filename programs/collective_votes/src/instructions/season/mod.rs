pub mod distribute;
pub mod oracle;
pub mod set_season;

pub use distribute::*;
pub use oracle::*;
pub use set_season::*;
