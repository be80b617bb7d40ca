use validator::ValidationError;

/// Validates that a category name is non-blank and at most 40 characters after trimming
pub fn validate_category_name(name: &str) -> Result<(), ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        let mut error = ValidationError::new("invalid_name");
        error.message = Some("Name must not be blank".into());
        return Err(error);
    }
    if trimmed.chars().count() > 40 {
        let mut error = ValidationError::new("invalid_name");
        error.message = Some("Name must be at most 40 characters".into());
        return Err(error);
    }
    Ok(())
}

/// Validates that an expense reason is non-blank
pub fn validate_reason(reason: &str) -> Result<(), ValidationError> {
    if reason.trim().is_empty() {
        let mut error = ValidationError::new("invalid_reason");
        error.message = Some("Reason must not be blank".into());
        return Err(error);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_category_name_accepts_normal_name() {
        assert!(validate_category_name("Groceries").is_ok());
    }

    #[test]
    fn test_validate_category_name_rejects_blank() {
        assert!(validate_category_name("   ").is_err());
        assert!(validate_category_name("").is_err());
    }

    #[test]
    fn test_validate_category_name_rejects_too_long() {
        let name = "x".repeat(41);
        assert!(validate_category_name(&name).is_err());
        let name = "x".repeat(40);
        assert!(validate_category_name(&name).is_ok());
    }

    #[test]
    fn test_validate_category_name_trims_before_length_check() {
        let name = format!("  {}  ", "x".repeat(40));
        assert!(validate_category_name(&name).is_ok());
    }

    #[test]
    fn test_validate_reason_rejects_blank() {
        assert!(validate_reason("").is_err());
        assert!(validate_reason("  ").is_err());
        assert!(validate_reason("lunch").is_ok());
    }
}
