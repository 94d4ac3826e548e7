use crate::error::{CpError, CpResult};

/// Random UUID v4 for rows that do not have a database id yet.
pub(crate) fn generate_uid() -> CpResult<String> {
    let mut bytes = [0u8; 16];
    getrandom::getrandom(&mut bytes).map_err(|e| CpError::Entropy(e.to_string()))?;
    Ok(uuid::Builder::from_random_bytes(bytes).into_uuid().to_string())
}

/// Form values are strings; empty means "not set".
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
