//! Rescaling between asymmetric token precisions.
//!
//! A token bridged across chains may carry different decimal counts on each
//! side (a 24-decimal NEAR token is commonly 18 decimals on Ethereum). The
//! contract normalizes amount and fee independently and subtracts the
//! normalized values; normalizing the difference instead loses the precision
//! the contract keeps, so callers must follow the same order.

/// Convert `value` from a `from_decimals` base to a `to_decimals` base.
///
/// Scaling up multiplies by a power of ten; scaling down divides with
/// truncation. Returns `None` on overflow.
///
/// # Example
///
/// ```
/// use omni_bridge_types::decimals::normalize;
///
/// // 1 wNEAR (24 decimals) becomes 10^18 on an 18-decimal chain.
/// assert_eq!(
///     normalize(1_000_000_000_000_000_000_000_000, 24, 18),
///     Some(1_000_000_000_000_000_000),
/// );
/// ```
pub fn normalize(value: u128, from_decimals: u8, to_decimals: u8) -> Option<u128> {
    if from_decimals == to_decimals {
        return Some(value);
    }
    if to_decimals > from_decimals {
        let factor = 10u128.checked_pow(u32::from(to_decimals - from_decimals))?;
        value.checked_mul(factor)
    } else {
        let factor = 10u128.checked_pow(u32::from(from_decimals - to_decimals))?;
        Some(value / factor)
    }
}

/// Normalize `amount` and `fee` independently and return what lands for the
/// recipient, `normalize(amount) - normalize(fee)`.
///
/// Returns `None` on overflow or when the fee does not fit under the amount
/// after rescaling.
pub fn normalized_post_fee(
    amount: u128,
    fee: u128,
    from_decimals: u8,
    to_decimals: u8,
) -> Option<u128> {
    let amount = normalize(amount, from_decimals, to_decimals)?;
    let fee = normalize(fee, from_decimals, to_decimals)?;
    amount.checked_sub(fee)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_base_is_identity() {
        assert_eq!(normalize(12345, 18, 18), Some(12345));
    }

    #[test]
    fn scaling_down_truncates() {
        assert_eq!(normalize(1_999_999, 6, 0), Some(1));
        assert_eq!(normalize(999_999, 6, 0), Some(0));
    }

    #[test]
    fn scaling_up_overflow_detected() {
        assert_eq!(normalize(u128::MAX / 2, 0, 18), None);
    }

    #[test]
    fn normalize_then_subtract_keeps_precision() {
        // EVM event amounts rescaled 18 -> 12: each value divides by 10^6
        // before the subtraction.
        let amount = 10u128.pow(18);
        let fee = 10u128.pow(17);
        assert_eq!(
            normalized_post_fee(amount, fee, 18, 12),
            Some(9 * 10u128.pow(11))
        );
    }

    #[test]
    fn subtract_then_normalize_is_rejected_by_truncation() {
        // 1500 and 600 both truncate to different values than their
        // difference does: independently 1 - 0 = 1, but (1500 - 600) / 1000
        // would be 0. The order of operations is observable here.
        assert_eq!(normalized_post_fee(1_500, 600, 3, 0), Some(1));
        assert_ne!(normalized_post_fee(1_500, 600, 3, 0), normalize(900, 3, 0));
    }

    #[test]
    fn fee_larger_than_amount_after_rescale() {
        // Amount truncates to zero, fee stays positive.
        assert_eq!(normalized_post_fee(999, 100, 3, 0), Some(0));
        assert_eq!(normalized_post_fee(999, 1001, 3, 0), None);
    }
}
