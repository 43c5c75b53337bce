//! # Pricing Module
//!
//! Pure pricing math for collective votes: the linear bonding curve and the
//! three-way fee split applied on top of it.
//!
//! ```text
//!   price per vote
//!       ▲
//!       │                 ╱
//!       │               ╱│
//!       │             ╱  │   cost of a trade = area of the
//!       │           ╱////│   trapezoid between supply + 1
//!       │         ╱//////│   and supply + amount
//!       │       ╱│///////│
//!       │     ╱  │///////│
//!       └────────┴───────┴──────▶ supply
//!              s+1      s+a
//! ```

pub mod bonding_curve;
pub mod fees;

pub use bonding_curve::*;
pub use fees::*;
