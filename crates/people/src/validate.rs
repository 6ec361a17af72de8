use campus_core::{DomainError, DomainResult};

pub(crate) fn non_empty(field: &str, value: &str) -> DomainResult<()> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Campus identifier: 2-3 lowercase letters followed by 1-4 digits (`abc1234`).
pub(crate) fn uni(value: &str) -> DomainResult<()> {
    let letters = value.chars().take_while(|c| c.is_ascii_lowercase()).count();
    let digits = &value[letters..];
    let ok = (2..=3).contains(&letters)
        && (1..=4).contains(&digits.len())
        && digits.chars().all(|c| c.is_ascii_digit());
    if !ok {
        return Err(DomainError::validation(format!(
            "uni must be 2-3 lowercase letters followed by 1-4 digits (got {value:?})"
        )));
    }
    Ok(())
}

pub(crate) fn email(value: &str) -> DomainResult<()> {
    let valid = match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    };
    if !valid {
        return Err(DomainError::validation(format!(
            "invalid email address: {value:?}"
        )));
    }
    Ok(())
}
