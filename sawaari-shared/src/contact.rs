use serde::{Deserialize, Serialize};

/// Customer contact fields captured at proof submission.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContactDetails {
    pub name: String,
    pub phone: String,
    pub email: String,
}

/// Indian mobile numbers: exactly ten ASCII digits, no separators.
pub fn is_valid_phone(phone: &str) -> bool {
    phone.len() == 10 && phone.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_ten_digit_numbers() {
        assert!(is_valid_phone("9876543210"));
    }

    #[test]
    fn rejects_wrong_lengths_and_non_digits() {
        assert!(!is_valid_phone("987654321"));
        assert!(!is_valid_phone("98765432100"));
        assert!(!is_valid_phone("98765-4321"));
        assert!(!is_valid_phone("+919876543"));
        assert!(!is_valid_phone(""));
    }
}
