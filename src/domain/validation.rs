use super::ValidationError;

const MAX_TEXT_LENGTH: usize = 255;

// Shared rule for every textual identifier and name: non-blank, at most
// MAX_TEXT_LENGTH characters. The value is kept exactly as supplied.
pub(crate) fn parse_text(
    value: &str,
    field: &str,
) -> Result<String, ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(format!("{field} cannot be empty")));
    }
    if value.chars().count() > MAX_TEXT_LENGTH {
        return Err(ValidationError::new(format!(
            "Max {} length is {MAX_TEXT_LENGTH} characters",
            field.to_lowercase()
        )));
    }
    Ok(value.to_owned())
}

#[test]
fn test_blank_values_are_rejected() {
    for value in ["", " ", "\t\n"] {
        let error = parse_text(value, "Team name").expect_err(value);
        assert_eq!(error.as_ref(), "Team name cannot be empty");
    }
}

#[test]
fn test_long_values_are_rejected() {
    let error = parse_text(&"x".repeat(256), "Team name").unwrap_err();
    assert_eq!(error.as_ref(), "Max team name length is 255 characters");
}

#[test]
fn test_value_is_not_trimmed() {
    assert_eq!(parse_text(" a ", "Username").unwrap(), " a ");
}
