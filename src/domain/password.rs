//! Password rules for self-registration. The seed binary only enforces a
//! minimum length for the admin account.

use std::borrow::Cow;

use validator::ValidationError;
use zxcvbn::zxcvbn;

const MIN_LENGTH: usize = 8;
const MIN_STRENGTH_SCORE: u8 = 3;

/// Words a guesser would try first against this site.
const SITE_WORDS: [&str; 4] = ["portfolio", "admin", "blog", "password"];

pub fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_LENGTH {
        return Err(rule_error(
            "password_length",
            format!("The password must be at least {} characters.", MIN_LENGTH),
        ));
    }

    let missing = missing_classes(password);
    if !missing.is_empty() {
        return Err(rule_error(
            "password_complexity",
            format!("The password must contain at least one {}.", missing.join(", one ")),
        ));
    }

    let estimate = zxcvbn(password, &SITE_WORDS);
    if (estimate.score() as u8) < MIN_STRENGTH_SCORE {
        let message = match estimate.feedback().and_then(|f| f.warning()) {
            Some(warning) => format!("The password is too easy to guess. {}", warning),
            None => "The password is too easy to guess.".to_string(),
        };
        return Err(rule_error("password_strength", message));
    }

    Ok(())
}

fn missing_classes(password: &str) -> Vec<&'static str> {
    let mut missing = Vec::new();
    if !password.chars().any(char::is_uppercase) {
        missing.push("uppercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        missing.push("number");
    }
    if password.chars().all(char::is_alphanumeric) {
        missing.push("symbol");
    }
    missing
}

fn rule_error(code: &'static str, message: impl Into<Cow<'static, str>>) -> ValidationError {
    ValidationError::new(code).with_message(message.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_passwords_are_rejected() {
        let err = validate_password_strength("Ab1!").unwrap_err();
        assert_eq!(err.code, "password_length");
    }

    #[test]
    fn missing_classes_are_named_in_the_message() {
        let err = validate_password_strength("alllowercase").unwrap_err();
        assert_eq!(err.code, "password_complexity");
        assert_eq!(
            err.message.unwrap(),
            "The password must contain at least one uppercase letter, one number, one symbol."
        );
    }

    #[test]
    fn site_words_count_as_guessable() {
        let err = validate_password_strength("Portfolio1!").unwrap_err();
        assert_eq!(err.code, "password_strength");
    }

    #[test]
    fn strong_passwords_pass() {
        assert!(validate_password_strength("Correct-Horse-Battery-9").is_ok());
    }
}
