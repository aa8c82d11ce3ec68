use thiserror::Error;

use crate::models::SignupRequest;
use crate::services::captcha::Captcha;

pub const MIN_PASSWORD_CHARS: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignupError {
    #[error("Username must be 3-20 letters, digits or underscores")]
    InvalidUsername,
    #[error("Please enter a valid email address")]
    InvalidEmail,
    #[error("Password must be at least 8 characters and contain a letter and a digit")]
    WeakPassword,
    #[error("Passwords do not match")]
    PasswordMismatch,
    #[error("CAPTCHA answer is incorrect")]
    CaptchaMismatch,
}

#[derive(Debug, Clone, Default)]
pub struct SignupForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl SignupForm {
    /// Checks every field and the CAPTCHA answer; on success yields the request body.
    pub fn validate(
        &self,
        captcha: &Captcha,
        captcha_answer: &str,
    ) -> Result<SignupRequest, Vec<SignupError>> {
        let mut errors = Vec::new();
        let username = self.username.trim();
        let email = self.email.trim();

        if !is_valid_username(username) {
            errors.push(SignupError::InvalidUsername);
        }
        if !is_valid_email(email) {
            errors.push(SignupError::InvalidEmail);
        }
        if !is_strong_password(&self.password) {
            errors.push(SignupError::WeakPassword);
        }
        if self.password != self.confirm_password {
            errors.push(SignupError::PasswordMismatch);
        }
        if !captcha.verify(captcha_answer) {
            errors.push(SignupError::CaptchaMismatch);
        }

        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(SignupRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: self.password.clone(),
        })
    }
}

pub fn is_valid_username(username: &str) -> bool {
    (3..=20).contains(&username.chars().count())
        && username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
}

pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    let labels: Vec<&str> = domain.split('.').collect();
    !local.is_empty()
        && !domain.contains('@')
        && !email.chars().any(char::is_whitespace)
        && labels.len() >= 2
        && labels.iter().all(|label| !label.is_empty())
}

pub fn is_strong_password(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_CHARS
        && password.chars().any(|c| c.is_alphabetic())
        && password.chars().any(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn form() -> SignupForm {
        SignupForm {
            username: " coder_42 ".to_string(),
            email: "coder@example.com".to_string(),
            password: "hunter2hunter".to_string(),
            confirm_password: "hunter2hunter".to_string(),
        }
    }

    #[test]
    fn valid_form_builds_request() {
        let captcha = Captcha::generate(&mut StdRng::seed_from_u64(1));
        let request = form().validate(&captcha, &captcha.text()).unwrap();
        assert_eq!(request.username, "coder_42");
        assert_eq!(request.email, "coder@example.com");
    }

    #[test]
    fn collects_all_field_errors() {
        let captcha = Captcha::generate(&mut StdRng::seed_from_u64(1));
        let bad = SignupForm {
            username: "a!".to_string(),
            email: "nobody".to_string(),
            password: "short".to_string(),
            confirm_password: "other".to_string(),
        };
        let errors = bad.validate(&captcha, "wrong!").unwrap_err();
        assert_eq!(
            errors,
            vec![
                SignupError::InvalidUsername,
                SignupError::InvalidEmail,
                SignupError::WeakPassword,
                SignupError::PasswordMismatch,
                SignupError::CaptchaMismatch,
            ]
        );
    }

    #[test]
    fn email_shapes() {
        assert!(is_valid_email("a@b.co"));
        assert!(!is_valid_email("@b.co"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a@b..co"));
        assert!(!is_valid_email("a@@b.co"));
        assert!(!is_valid_email("a b@c.io"));
    }

    #[test]
    fn password_needs_letter_and_digit() {
        assert!(is_strong_password("abcdefg1"));
        assert!(!is_strong_password("abcdefgh"));
        assert!(!is_strong_password("12345678"));
        assert!(!is_strong_password("abc1"));
    }
}
