use crate::models::movie::MovieInput;

pub const MAX_TITLE_LEN: usize = 60;
pub const MAX_YEAR_LEN: usize = 4;
pub const MAX_NAME_LEN: usize = 20;

pub const INVALID_INPUT_MESSAGE: &str = "Invalid input.";

/// Rejected form input. Handlers answer it with the "Invalid input." flash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidInput;

/// Lengths count characters, not bytes.
fn within(value: &str, max: usize) -> bool {
    !value.is_empty() && value.chars().count() <= max
}

pub fn validate_movie(title: &str, year: &str) -> Result<MovieInput, InvalidInput> {
    if !within(title, MAX_TITLE_LEN) || !within(year, MAX_YEAR_LEN) {
        return Err(InvalidInput);
    }
    Ok(MovieInput::new(title, year))
}

pub fn validate_name(name: &str) -> Result<&str, InvalidInput> {
    if !within(name, MAX_NAME_LEN) {
        return Err(InvalidInput);
    }
    Ok(name)
}

pub fn validate_credentials<'a>(
    username: &'a str,
    password: &'a str,
) -> Result<(&'a str, &'a str), InvalidInput> {
    if username.is_empty() || password.is_empty() {
        return Err(InvalidInput);
    }
    Ok((username, password))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_movie() {
        assert!(validate_movie("Parasite", "2019").is_ok());
        assert!(validate_movie(&"a".repeat(60), "1").is_ok());
        assert!(validate_movie("", "2019").is_err());
        assert!(validate_movie("Parasite", "").is_err());
        assert!(validate_movie(&"a".repeat(61), "2019").is_err());
        assert!(validate_movie("Parasite", "20190").is_err());
        // year is not required to be numeric
        assert!(validate_movie("Parasite", "MMXX").is_ok());
    }

    #[test]
    fn test_lengths_count_characters() {
        assert!(validate_movie(&"千".repeat(60), "二〇一九").is_ok());
        assert!(validate_name(&"é".repeat(20)).is_ok());
        assert!(validate_name(&"é".repeat(21)).is_err());
    }

    #[test]
    fn test_validate_name() {
        assert_eq!(validate_name("Grey Li"), Ok("Grey Li"));
        assert!(validate_name("").is_err());
        assert!(validate_name(&"n".repeat(21)).is_err());
    }

    #[test]
    fn test_validate_credentials() {
        assert!(validate_credentials("admin", "pw").is_ok());
        assert!(validate_credentials("", "pw").is_err());
        assert!(validate_credentials("admin", "").is_err());
    }
}
