//! crates/sysfree_core/src/validators.rs
//!
//! Check-digit validation for Ecuadorian identifiers: the 10-digit national
//! ID (cédula) and the 13-digit tax ID (RUC).

const PUBLIC_ENTITY_COEFFICIENTS: [u32; 8] = [3, 2, 7, 6, 5, 4, 3, 2];
const PRIVATE_ENTITY_COEFFICIENTS: [u32; 9] = [4, 3, 2, 7, 6, 5, 4, 3, 2];

/// Converts a string into its decimal digits when it is exactly `len` ASCII digits.
fn digits(value: &str, len: usize) -> Option<Vec<u32>> {
    if value.len() != len || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(value.bytes().map(|b| u32::from(b - b'0')).collect())
}

/// Validates a 10-digit national ID.
pub fn validate_national_id(id: &str) -> bool {
    digits(id, 10).is_some_and(|d| national_id_checksum(&d))
}

fn national_id_checksum(d: &[u32]) -> bool {
    let province = d[0] * 10 + d[1];
    if !(1..=24).contains(&province) || d[2] > 5 {
        return false;
    }

    let sum: u32 = d[..9]
        .iter()
        .enumerate()
        .map(|(i, &digit)| {
            if i % 2 == 0 {
                let doubled = digit * 2;
                if doubled > 9 {
                    doubled - 9
                } else {
                    doubled
                }
            } else {
                digit
            }
        })
        .sum();

    (10 - sum % 10) % 10 == d[9]
}

/// Validates a 13-digit tax ID.
///
/// The third digit selects the scheme: below 6 the first ten digits are a
/// national ID, 6 is a public entity and 9 a private one. Every other type
/// is rejected.
pub fn validate_tax_id(id: &str) -> bool {
    let Some(d) = digits(id, 13) else {
        return false;
    };
    if d[10..] != [0, 0, 1] {
        return false;
    }

    match d[2] {
        0..=5 => national_id_checksum(&d[..10]),
        6 => {
            let verifier = 11 - weighted_sum(&d, &PUBLIC_ENTITY_COEFFICIENTS) % 11;
            verifier == d[8]
        }
        9 => {
            let verifier = match 11 - weighted_sum(&d, &PRIVATE_ENTITY_COEFFICIENTS) % 11 {
                11 => 0,
                v => v,
            };
            verifier == d[9]
        }
        _ => false,
    }
}

fn weighted_sum(d: &[u32], coefficients: &[u32]) -> u32 {
    d.iter().zip(coefficients).map(|(digit, c)| digit * c).sum()
}
