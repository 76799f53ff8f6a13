//! Display strings for price bounds.

/// Missing-price label for terminal output.
pub const PRICE_NOT_AVAILABLE: &str = "(price not available)";

/// Missing-price label for API responses.
pub const PRICE_NA: &str = "N/A";

/// `"$X.XX"` for equal bounds, `"from $X.XX - $Y.YY"` for a range, and
/// `missing_label` when neither bound is known. A single known bound prints
/// on its own.
pub fn format_price(low: Option<f64>, high: Option<f64>, missing_label: &str) -> String {
    match (low, high) {
        (Some(low), Some(high)) => {
            let (low, high) = (format!("{:.2}", low), format!("{:.2}", high));
            if low == high {
                format!("${}", low)
            } else {
                format!("from ${} - ${}", low, high)
            }
        }
        (Some(only), None) | (None, Some(only)) => format!("${:.2}", only),
        (None, None) => missing_label.to_string(),
    }
}
