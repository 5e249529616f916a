//! Common validation utilities.

use validator::ValidationError;

/// Length of a group code, in characters.
pub const GROUP_CODE_LEN: usize = 6;

/// Maximum accepted length of a device identifier.
const MAX_DEVICE_ID_LEN: usize = 128;

/// Validates that a group code is exactly six characters.
pub fn validate_group_code(code: &str) -> Result<(), ValidationError> {
    if code.chars().count() == GROUP_CODE_LEN {
        Ok(())
    } else {
        let mut err = ValidationError::new("group_code_length");
        err.message = Some("Group code must be exactly 6 characters".into());
        Err(err)
    }
}

/// Validates a caller-supplied device identifier.
///
/// Device identifiers are opaque to the backend; only their shape is
/// checked (non-empty, bounded length).
pub fn validate_device_id(device_id: &str) -> Result<(), ValidationError> {
    let len = device_id.chars().count();
    if len >= 1 && len <= MAX_DEVICE_ID_LEN {
        Ok(())
    } else {
        let mut err = ValidationError::new("device_id_length");
        err.message = Some("Device ID must be 1-128 characters".into());
        Err(err)
    }
}
