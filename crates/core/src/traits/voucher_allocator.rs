//! Voucher allocator trait for tiered, batch-rationed promotions
//!
//! Maps a cumulative signup count to:
//! - the voucher tier currently in effect
//! - how many vouchers the next visitor is told remain in the open batch
//! - whether a batch-release announcement should fire
//!
//! The signup count is owned by the lead store and passed into every call.
//! Nothing here holds or advances a counter, so querying is idempotent.
//!
//! # Example
//!
//! ```ignore
//! use dental_funnel_core::traits::VoucherAllocator;
//!
//! let allocator = campaign_bridge.voucher_allocator();
//! let tier = allocator.current_tier(signup_count);
//! let left = allocator.remaining_in_batch(signup_count);
//! ```

use serde::{Deserialize, Serialize};

/// Vouchers handed out per batch before a restock is announced
pub const BATCH_SIZE: u64 = 90;

/// Vouchers advertised as released per batch. Larger than [`BATCH_SIZE`]:
/// ten of every hundred announced are held back.
pub const BATCH_RELEASE_SIZE: u64 = 100;

/// Default announcement, `{signup_count}` and `{released}` are substituted
pub const DEFAULT_ANNOUNCEMENT_TEMPLATE: &str = "{signup_count} people have already claimed \
    their voucher. We've just released {released} more!";

/// Voucher tier covering the half-open signup interval `[min, max)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoucherTier {
    /// Inclusive lower bound
    pub min: u64,
    /// Exclusive upper bound (None = unbounded)
    #[serde(default)]
    pub max: Option<u64>,
    /// Voucher value in whole currency units
    pub value: u32,
    /// Display message shown alongside the voucher
    #[serde(default)]
    pub message: String,
}

impl VoucherTier {
    pub fn new(min: u64, max: Option<u64>, value: u32, message: impl Into<String>) -> Self {
        Self {
            min,
            max,
            value,
            message: message.into(),
        }
    }

    /// Whether `signup_count` falls inside this tier
    pub fn contains(&self, signup_count: u64) -> bool {
        signup_count >= self.min && self.max.map_or(true, |max| signup_count < max)
    }
}

/// Position of a signup count within the batch cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchState {
    pub batch_index: u64,
    /// Always below the batch size
    pub claimed_in_current_batch: u64,
}

/// Default tier table used when no campaign config overrides it
pub fn default_voucher_tiers() -> Vec<VoucherTier> {
    vec![
        VoucherTier::new(0, Some(500), 50, "£50 off your first check-up"),
        VoucherTier::new(500, Some(1000), 40, "£40 off your first check-up"),
        VoucherTier::new(1000, Some(2500), 30, "£30 off your first check-up"),
        VoucherTier::new(2500, Some(5000), 20, "£20 off your first check-up"),
        VoucherTier::new(5000, None, 0, "Free smile consultation"),
    ]
}

/// Trait for tiered voucher allocation
///
/// All operations are total over non-negative counts.
pub trait VoucherAllocator: Send + Sync {
    /// Tier in effect for the given signup count
    fn current_tier(&self, signup_count: u64) -> &VoucherTier;

    /// Vouchers shown as remaining to the next visitor, in `1..=batch_size`
    fn remaining_in_batch(&self, signup_count: u64) -> u64;

    /// True when `signup_count` just completed a batch
    fn should_announce_new_batch(&self, signup_count: u64) -> bool;

    /// Human-readable restock announcement
    fn batch_announcement_message(&self, signup_count: u64) -> String;

    /// Derived batch position
    fn batch_state(&self, signup_count: u64) -> BatchState;

    /// Configured tier table, ascending by `min`
    fn tiers(&self) -> &[VoucherTier];
}

/// Config-driven voucher allocator
#[derive(Debug, Clone)]
pub struct TieredVoucherAllocator {
    tiers: Vec<VoucherTier>,
    batch_size: u64,
    release_size: u64,
    announcement_template: String,
}

impl TieredVoucherAllocator {
    /// Create from config structures.
    ///
    /// `tiers` must be non-empty and is sorted by `min`. A zero `batch_size`
    /// is replaced with [`BATCH_SIZE`].
    pub fn new(
        mut tiers: Vec<VoucherTier>,
        batch_size: u64,
        release_size: u64,
        announcement_template: impl Into<String>,
    ) -> Self {
        if tiers.is_empty() {
            tiers = default_voucher_tiers();
        }
        tiers.sort_by_key(|t| t.min);

        Self {
            tiers,
            batch_size: if batch_size == 0 { BATCH_SIZE } else { batch_size },
            release_size,
            announcement_template: announcement_template.into(),
        }
    }

    /// Create with the given tiers and default batch constants
    pub fn with_tiers(tiers: Vec<VoucherTier>) -> Self {
        Self::new(
            tiers,
            BATCH_SIZE,
            BATCH_RELEASE_SIZE,
            DEFAULT_ANNOUNCEMENT_TEMPLATE,
        )
    }

    pub fn batch_size(&self) -> u64 {
        self.batch_size
    }

    pub fn release_size(&self) -> u64 {
        self.release_size
    }
}

impl Default for TieredVoucherAllocator {
    fn default() -> Self {
        Self::with_tiers(default_voucher_tiers())
    }
}

impl VoucherAllocator for TieredVoucherAllocator {
    fn current_tier(&self, signup_count: u64) -> &VoucherTier {
        self.tiers
            .iter()
            .find(|t| t.contains(signup_count))
            .or_else(|| self.tiers.last())
            .unwrap_or_else(|| unreachable!("tier table is never empty"))
    }

    fn remaining_in_batch(&self, signup_count: u64) -> u64 {
        self.batch_size - signup_count % self.batch_size
    }

    fn should_announce_new_batch(&self, signup_count: u64) -> bool {
        signup_count > 0 && signup_count % self.batch_size == 0
    }

    fn batch_announcement_message(&self, signup_count: u64) -> String {
        self.announcement_template
            .replace("{signup_count}", &signup_count.to_string())
            .replace("{released}", &self.release_size.to_string())
    }

    fn batch_state(&self, signup_count: u64) -> BatchState {
        BatchState {
            batch_index: signup_count / self.batch_size,
            claimed_in_current_batch: signup_count % self.batch_size,
        }
    }

    fn tiers(&self) -> &[VoucherTier] {
        &self.tiers
    }
}
