//! Instruction handlers for the collective vote market
//!
//! - `initialize` - Set up config, role registry and vault (once)
//! - `admin` - Fees, pause switch and roles (admin only)
//! - `trade` - Buy/sell votes on a collective's curve
//! - `transfer` - Open balance records; claimer batch transfers
//! - `redeem` - Burn votes for a share of the collective treasury
//! - `season` - Schedule seasons, oracle feed, prize distribution
//! - `pool` - Top up the prize pool; withdraw surplus
//! - `quote` - Price previews
//! - `collective` - Display name

pub mod payments;

pub mod initialize;
pub mod admin;
pub mod trade;
pub mod transfer;
pub mod redeem;
pub mod season;
pub mod pool;
pub mod quote;
pub mod collective;

pub use initialize::*;
pub use admin::*;
pub use trade::*;
pub use transfer::*;
pub use redeem::*;
pub use season::*;
pub use pool::*;
pub use quote::*;
pub use collective::*;
