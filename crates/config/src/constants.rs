//! Centralized constants for the dental funnel
//!
//! Single source of truth for promotion thresholds. Call sites import these
//! rather than repeating the numbers.

/// Voucher batch rationing
pub mod vouchers {
    /// Vouchers claimed before the next batch opens
    pub use dental_funnel_core::BATCH_SIZE;

    /// Vouchers advertised per released batch (10 of every 100 held back)
    pub use dental_funnel_core::BATCH_RELEASE_SIZE;

    /// Currency symbol used when rendering voucher values
    pub const CURRENCY_SYMBOL: &str = "£";
}

/// Household member promotion
pub mod household {
    /// Global cap on bonus entries granted for household members
    pub const MAX_BONUS_ENTRIES: u32 = 250;

    /// Campaign source tag written on auto-generated household entries
    pub const DEFAULT_SOURCE_TAG: &str = "household";
}

/// Follow-up cadence defaults
pub mod follow_up {
    /// Hours to wait before each follow-up attempt, by attempt number
    pub const DEFAULT_DELAYS_HOURS: [i64; 3] = [24, 72, 168];

    /// Longest accepted follow-up delay (one year)
    pub const MAX_DELAY_HOURS: i64 = 24 * 365;

    /// Template language used when a requested one is missing
    pub const DEFAULT_LANGUAGE: &str = "en";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_exceeds_batch() {
        assert!(vouchers::BATCH_RELEASE_SIZE > vouchers::BATCH_SIZE);
        assert_eq!(vouchers::BATCH_RELEASE_SIZE - vouchers::BATCH_SIZE, 10);
    }

    #[test]
    fn test_follow_up_delays_increase() {
        assert!(follow_up::DEFAULT_DELAYS_HOURS
            .windows(2)
            .all(|w| w[0] < w[1]));
        assert!(follow_up::DEFAULT_DELAYS_HOURS
            .iter()
            .all(|h| *h <= follow_up::MAX_DELAY_HOURS));
    }
}
