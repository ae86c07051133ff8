//! Cache key generators for consistent key naming.

/// Key of the in-flight guard for a `(mobile, gift_code)` pair.
#[must_use]
pub fn redemption_guard(mobile: &str, gift_code: &str) -> String {
    format!("discounts:{}:{}", mobile, gift_code)
}

/// Key of the cached charge terms of a gift code.
#[must_use]
pub fn gift_code(code: &str) -> String {
    format!("gifts:{}", code)
}

/// Key of a gift code cached by its ID.
#[must_use]
pub fn gift_code_by_id(id: i64) -> String {
    format!("gifts:id:{}", id)
}

/// Key of the cached report set for a gift code.
#[must_use]
pub fn reports_by_gift_code(code: &str) -> String {
    format!("reports:code:{}", code)
}

/// Key of the cached report set for a customer.
#[must_use]
pub fn reports_by_mobile(mobile: &str) -> String {
    format!("reports:mobile:{}", mobile)
}

/// Key of the cached usage count for a gift code.
#[must_use]
pub fn usage_count(code: &str) -> String {
    format!("reports:count:{}", code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_key() {
        assert_eq!(redemption_guard("+1555", "WELCOME10"), "discounts:+1555:WELCOME10");
    }

    #[test]
    fn test_gift_code_keys() {
        assert_eq!(gift_code("WELCOME10"), "gifts:WELCOME10");
        assert_eq!(gift_code_by_id(42), "gifts:id:42");
    }

    #[test]
    fn test_report_keys_do_not_collide() {
        let keys = [
            reports_by_gift_code("X"),
            reports_by_mobile("X"),
            usage_count("X"),
        ];
        assert_eq!(keys[0], "reports:code:X");
        assert_eq!(keys[1], "reports:mobile:X");
        assert_eq!(keys[2], "reports:count:X");
    }
}
