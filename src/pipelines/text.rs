use crate::error::PipelineError;

/// Pasted text goes to the model as-is, once blank input is ruled out
pub fn validate(text: &str) -> Result<&str, PipelineError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(PipelineError::InvalidInput(
            "Recipe text cannot be empty".to_string(),
        ));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate() {
        assert_eq!(validate("  2 eggs\n").unwrap(), "2 eggs");
        assert!(matches!(
            validate(" \n\t"),
            Err(PipelineError::InvalidInput(_))
        ));
    }
}
