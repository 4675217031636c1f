//! Luhn (mod 10) checksum for numeric identifiers such as card numbers.

use crate::error::{CmsClientError, Result};

/// Checks `number` against the Luhn checksum.
///
/// Digits are scanned right to left and every second one is doubled, folding
/// values above 9 back by subtracting 9. The number passes when the sum is a
/// multiple of 10.
///
/// Length policy belongs to the caller. An empty string or any non-digit
/// character is a precondition failure and returns `InvalidArgument`, never
/// `Ok(false)`.
pub fn is_valid(number: &str) -> Result<bool> {
    if number.is_empty() {
        return Err(CmsClientError::invalid("number must not be empty"));
    }
    if !number.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CmsClientError::invalid("number must contain only digits"));
    }

    let sum: u32 = number
        .bytes()
        .rev()
        .enumerate()
        .map(|(position, b)| {
            let digit = u32::from(b - b'0');
            if position % 2 == 1 {
                let doubled = digit * 2;
                if doubled > 9 { doubled - 9 } else { doubled }
            } else {
                digit
            }
        })
        .sum();

    Ok(sum % 10 == 0)
}
