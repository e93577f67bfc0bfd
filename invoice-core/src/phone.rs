/// Number of digits a valid phone number carries once the country code
/// is removed.
pub const PHONE_DIGITS: usize = 10;

/// Inline message for a phone number that fails validation.
pub const PHONE_ERROR_MESSAGE: &str = "Phone number must be 10 digits.";

/// Keep only the ASCII digits of `phone`.
pub fn digits_only(phone: &str) -> String {
    phone.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// A phone number is valid when it holds exactly ten digits, ignoring any
/// separators.
pub fn is_valid_phone(phone: &str) -> bool {
    phone.chars().filter(|c| c.is_ascii_digit()).count() == PHONE_DIGITS
}

/// Remove the display prefix (e.g. `"+91 "`) from raw input before it is
/// stored. Input without the prefix is returned unchanged.
pub fn strip_phone_prefix(input: &str, prefix: &str) -> String {
    if !prefix.is_empty() {
        if let Some(rest) = input.strip_prefix(prefix) {
            return rest.to_string();
        }
        let bare = prefix.trim_end();
        if !bare.is_empty() {
            if let Some(rest) = input.strip_prefix(bare) {
                return rest.trim_start().to_string();
            }
        }
    }
    input.to_string()
}

/// Display form of a stored phone number. Empty numbers stay empty.
pub fn format_phone(stored: &str, prefix: &str) -> String {
    if stored.is_empty() {
        String::new()
    } else {
        format!("{}{}", prefix, stored)
    }
}
