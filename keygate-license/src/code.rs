//! License code generation and format validation.
//!
//! Codes look like `LIC-{4-char customer prefix}-{12 random}-{4 checksum}`.
//! The checksum is derived from the ASCII sum of the prefix and random
//! parts over a 62-character alphabet, so obviously mistyped codes are
//! rejected before any store lookup.

use keygate_types::{CustomerId, LicenseCode};
use rand::Rng;

const PREFIX: &str = "LIC";
const RANDOM_LEN: usize = 12;
const CHECKSUM_LEN: usize = 4;
const CUSTOMER_LEN: usize = 4;

/// A-Z, a-z, 0-9.
const ALPHABET: &[u8; 62] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Generates a fresh license code for a customer. Uniqueness is the
/// issuer's job (collision-checked against the store); this only
/// guarantees the format.
#[must_use]
pub fn generate_code(customer_id: &CustomerId) -> LicenseCode {
    let mut rng = rand::thread_rng();
    let random: String = (0..RANDOM_LEN)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect();
    let prefix = customer_prefix(customer_id);
    let check = checksum(&format!("{prefix}{random}"));
    LicenseCode::new(format!("{PREFIX}-{prefix}-{random}-{check}"))
}

/// Checks the `LIC-XXXX-XXXXXXXXXXXX-XXXX` structure and the checksum.
#[must_use]
pub fn validate_code_format(code: &str) -> bool {
    let parts: Vec<&str> = code.split('-').collect();
    if parts.len() != 4 || parts[0] != PREFIX {
        return false;
    }
    if parts[1].len() != CUSTOMER_LEN
        || parts[2].len() != RANDOM_LEN
        || parts[3].len() != CHECKSUM_LEN
    {
        return false;
    }
    checksum(&format!("{}{}", parts[1], parts[2])) == parts[3]
}

/// Derives the 4-character customer prefix from the customer id
/// (first 4 hex digits of the UUID, uppercased).
fn customer_prefix(customer_id: &CustomerId) -> String {
    customer_id
        .as_uuid()
        .simple()
        .to_string()
        .chars()
        .take(CUSTOMER_LEN)
        .collect::<String>()
        .to_uppercase()
}

/// Four checksum characters from the ASCII sum of the input.
fn checksum(input: &str) -> String {
    let mut sum: usize = input.bytes().map(usize::from).sum();
    let mut out = String::with_capacity(CHECKSUM_LEN);
    for _ in 0..CHECKSUM_LEN {
        out.push(ALPHABET[sum % ALPHABET.len()] as char);
        sum /= ALPHABET.len();
    }
    out
}
