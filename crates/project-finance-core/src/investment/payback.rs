use crate::time_value::cumulative_flows;

/// Simple (undiscounted) payback period.
///
/// Returns the first index of the running total of `[-investment, flows...]`
/// that is strictly positive. Index 0 is the initial outlay, so an index of
/// `k` means the investment is recovered during period `k`. `None` means the
/// flows never recover it within the horizon.
pub fn payback_period(investment: f64, flows: &[f64]) -> Option<usize> {
    cumulative_flows(investment, flows)
        .iter()
        .position(|&cumulative| cumulative > 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_break_even_is_not_recovery() {
        // Cumulative: -100, -50, 0, 50. Zero is not yet recovered.
        assert_eq!(payback_period(100.0, &[50.0, 50.0, 50.0]), Some(3));
    }

    #[test]
    fn test_never_recovered() {
        assert_eq!(payback_period(100.0, &[10.0, 20.0, 30.0]), None);
    }

    #[test]
    fn test_recovery_after_negative_period() {
        assert_eq!(payback_period(100.0, &[-50.0, 100.0, 100.0]), Some(3));
        assert_eq!(payback_period(100.0, &[150.0, -200.0, 300.0]), Some(1));
    }

    #[test]
    fn test_zero_investment() {
        assert_eq!(payback_period(0.0, &[0.0, 5.0]), Some(2));
        assert_eq!(payback_period(0.0, &[]), None);
    }
}
