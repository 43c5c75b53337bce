use anchor_lang::prelude::*;

// ===== FEES =====
#[constant]
pub const BPS_DENOMINATOR: u64 = 10_000; // 100%

// ===== SEASONS =====
#[constant]
pub const MIN_ROUNDS: u8 = 2;
#[constant]
pub const MAX_ROUNDS: u8 = 32;
/// Residue below this many base units still lets a season close
#[constant]
pub const DUST_THRESHOLD: u64 = 10;

// ===== LIMITS =====
pub const MAX_NAME_LEN: usize = 32;
pub const MAX_ROLE_MEMBERS: usize = 8;
