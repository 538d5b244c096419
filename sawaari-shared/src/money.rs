//! Monetary amounts are integer paise (minor units) end to end.
//! Formatting to rupees happens only at presentation boundaries
//! (emails, tracking views).

/// Format an amount in paise as a rupee string, e.g. `119800` → `"₹1198.00"`.
pub fn format_paise(amount: i32) -> String {
    let sign = if amount < 0 { "-" } else { "" };
    let abs = amount.unsigned_abs();
    format!("{}₹{}.{:02}", sign, abs / 100, abs % 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_whole_and_fractional_rupees() {
        assert_eq!(format_paise(119800), "₹1198.00");
        assert_eq!(format_paise(59900), "₹599.00");
        assert_eq!(format_paise(105), "₹1.05");
        assert_eq!(format_paise(0), "₹0.00");
    }

    #[test]
    fn formats_negative_amounts() {
        assert_eq!(format_paise(-250), "-₹2.50");
    }
}
