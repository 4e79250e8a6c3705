//! Form input checks applied before anything is sent to the backend.

use regex::Regex;
use std::collections::BTreeSet;
use std::sync::OnceLock;
use uuid::Uuid;

use crate::error::ValidationError;
use crate::models::{CompartmentSize, CompartmentSpec};

const MIN_PHONE_LEN: usize = 9;
const OTP_LEN: usize = 6;
const MIN_PICKUP_CODE_LEN: usize = 4;
pub const MAX_COMPARTMENTS_PER_BATCH: usize = 500;

fn digits_only() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[0-9]+$").expect("static regex"))
}

fn compartment_row() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*(\d+)\s*(?:-\s*(\d+)\s*)?(?::\s*([A-Za-z])\s*)?$").expect("static regex")
    })
}

/// Phone numbers are at least 9 digits, nothing else
pub fn phone(value: &str) -> Result<String, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::Required { field: "phone" });
    }
    if value.len() < MIN_PHONE_LEN {
        return Err(ValidationError::TooShort {
            field: "phone",
            min: MIN_PHONE_LEN,
        });
    }
    if !digits_only().is_match(value) {
        return Err(ValidationError::NotDigits { field: "phone" });
    }
    Ok(value.to_string())
}

pub fn otp_code(value: &str) -> Result<String, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::Required { field: "otp" });
    }
    if value.len() != OTP_LEN {
        return Err(ValidationError::WrongLength {
            field: "otp",
            len: OTP_LEN,
        });
    }
    if !digits_only().is_match(value) {
        return Err(ValidationError::NotDigits { field: "otp" });
    }
    Ok(value.to_string())
}

pub fn pickup_code(value: &str) -> Result<String, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::Required {
            field: "pickup code",
        });
    }
    if value.chars().count() < MIN_PICKUP_CODE_LEN {
        return Err(ValidationError::TooShort {
            field: "pickup code",
            min: MIN_PICKUP_CODE_LEN,
        });
    }
    Ok(value.to_string())
}

/// Backend identifiers are UUIDs; reject anything else before the round trip
pub fn entity_id(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::Required { field });
    }
    Uuid::parse_str(value)
        .map(|id| id.to_string())
        .map_err(|_| ValidationError::Invalid {
            field,
            value: value.to_string(),
        })
}

pub fn required(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::Required { field });
    }
    Ok(value.to_string())
}

/// Parse compartment rows for batch creation.
///
/// Each row is `<no>[:<size>]` or `<from>-<to>[:<size>]`; size defaults to M.
/// `["1-3:S", "4:L"]` yields compartments 1, 2, 3 (S) and 4 (L).
/// A batch holds at most [`MAX_COMPARTMENTS_PER_BATCH`] compartments.
pub fn compartment_rows<S: AsRef<str>>(rows: &[S]) -> Result<Vec<CompartmentSpec>, ValidationError> {
    if rows.is_empty() {
        return Err(ValidationError::Required {
            field: "compartments",
        });
    }

    let mut seen = BTreeSet::new();
    let mut specs = Vec::new();
    let mut total: u64 = 0;

    for row in rows {
        let row = row.as_ref();
        let invalid = || ValidationError::Invalid {
            field: "compartment row",
            value: row.to_string(),
        };

        let caps = compartment_row().captures(row).ok_or_else(invalid)?;
        let from: u32 = caps[1].parse().map_err(|_| invalid())?;
        let to: u32 = match caps.get(2) {
            Some(m) => m.as_str().parse().map_err(|_| invalid())?,
            None => from,
        };
        let size = match caps.get(3) {
            Some(m) => m.as_str().parse::<CompartmentSize>()?,
            None => CompartmentSize::M,
        };

        if from == 0 || to < from {
            return Err(invalid());
        }
        total += u64::from(to - from) + 1;
        if total > MAX_COMPARTMENTS_PER_BATCH as u64 {
            return Err(ValidationError::TooManyCompartments {
                max: MAX_COMPARTMENTS_PER_BATCH,
            });
        }

        for no in from..=to {
            if !seen.insert(no) {
                return Err(ValidationError::DuplicateCompartment(no));
            }
            specs.push(CompartmentSpec {
                compartment_no: no,
                size,
            });
        }
    }

    Ok(specs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_rules() {
        assert_eq!(phone(" 0812345678 ").unwrap(), "0812345678");
        assert_eq!(
            phone("08123"),
            Err(ValidationError::TooShort {
                field: "phone",
                min: 9
            })
        );
        assert_eq!(
            phone("08123-45678"),
            Err(ValidationError::NotDigits { field: "phone" })
        );
        assert_eq!(phone(""), Err(ValidationError::Required { field: "phone" }));
    }

    #[test]
    fn test_otp_rules() {
        assert_eq!(otp_code("123456").unwrap(), "123456");
        assert!(matches!(
            otp_code("12345"),
            Err(ValidationError::WrongLength { len: 6, .. })
        ));
        assert!(matches!(otp_code("12a456"), Err(ValidationError::NotDigits { .. })));
    }

    #[test]
    fn test_pickup_code_rules() {
        assert_eq!(pickup_code("A1B2").unwrap(), "A1B2");
        assert!(pickup_code("123").is_err());
    }

    #[test]
    fn test_entity_id_requires_uuid() {
        let id = "7f1c2d0e-8a4b-4c1d-9e2f-3a4b5c6d7e8f";
        assert_eq!(entity_id("locker_id", id).unwrap(), id);
        assert!(matches!(
            entity_id("locker_id", "locker-1"),
            Err(ValidationError::Invalid { field: "locker_id", .. })
        ));
    }

    #[test]
    fn test_compartment_rows_ranges_and_defaults() {
        let specs = compartment_rows(&["1-3:s", "4:L", "5"]).unwrap();
        let nos: Vec<u32> = specs.iter().map(|s| s.compartment_no).collect();
        assert_eq!(nos, vec![1, 2, 3, 4, 5]);
        assert_eq!(specs[0].size, CompartmentSize::S);
        assert_eq!(specs[3].size, CompartmentSize::L);
        assert_eq!(specs[4].size, CompartmentSize::M);
    }

    #[test]
    fn test_compartment_rows_rejects_bad_input() {
        assert_eq!(
            compartment_rows(&["1-3:S", "3:M"]),
            Err(ValidationError::DuplicateCompartment(3))
        );
        assert!(compartment_rows(&["0:S"]).is_err());
        assert!(compartment_rows(&["5-2:S"]).is_err());
        assert!(compartment_rows(&["2:XL"]).is_err());
        assert!(compartment_rows::<&str>(&[]).is_err());
    }

    #[test]
    fn test_compartment_rows_batch_cap() {
        let too_many = Err(ValidationError::TooManyCompartments {
            max: MAX_COMPARTMENTS_PER_BATCH,
        });
        assert_eq!(compartment_rows(&["1-4294967295:S"]), too_many);
        assert_eq!(compartment_rows(&["1-5000000:S"]), too_many);
        assert_eq!(compartment_rows(&["1-300:S", "301-501:L"]), too_many);
        assert_eq!(compartment_rows(&["1-500:M"]).unwrap().len(), MAX_COMPARTMENTS_PER_BATCH);
    }
}
