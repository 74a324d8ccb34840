use crate::error::ValidationError;
use once_cell::sync::Lazy;
use regex::Regex;

pub const MIN_PASSWORD_LEN: usize = 8;

static EMAIL_RE: Lazy<Result<Regex, regex::Error>> = Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$"));

/// `local@domain.tld`: one `@`, a dot after it, no whitespace anywhere.
pub fn is_valid_email(email: &str) -> bool {
    match EMAIL_RE.as_ref() {
        Ok(re) => re.is_match(email),
        Err(e) => {
            log::error!("email pattern failed to compile: {e}");
            false
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self { email: email.into(), password: password.into() }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let email = self.email.trim();
        if email.is_empty() {
            return Err(ValidationError::MissingEmail);
        }
        if !is_valid_email(email) {
            return Err(ValidationError::InvalidEmail);
        }
        if self.password.is_empty() {
            return Err(ValidationError::MissingPassword);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirmation: String,
}

impl RegisterForm {
    /// Checks run in form order; the first failure is the one shown.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingName);
        }
        let email = self.email.trim();
        if email.is_empty() {
            return Err(ValidationError::MissingEmail);
        }
        if !is_valid_email(email) {
            return Err(ValidationError::InvalidEmail);
        }
        if self.password.is_empty() {
            return Err(ValidationError::MissingPassword);
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ValidationError::PasswordTooShort);
        }
        if self.password != self.confirmation {
            return Err(ValidationError::PasswordMismatch);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(name: &str, email: &str, password: &str, confirmation: &str) -> RegisterForm {
        RegisterForm {
            name: name.into(),
            email: email.into(),
            password: password.into(),
            confirmation: confirmation.into(),
        }
    }

    #[test]
    fn email_shape() {
        assert!(is_valid_email("admin@ia.com"));
        assert!(is_valid_email("a.b@clinic.com.br"));
        assert!(!is_valid_email("admin@ia"));
        assert!(!is_valid_email("admin ia@x.com"));
        assert!(!is_valid_email("@ia.com"));
        assert!(!is_valid_email("a@b@c.com"));
        assert!(!is_valid_email("a@.com"));
        assert!(!is_valid_email("a@b."));
    }

    #[test]
    fn email_domain_may_end_in_a_dot() {
        assert!(is_valid_email("a@b.c."));
        assert!(is_valid_email("a@b.."));
        assert!(is_valid_email("a@b.c.d"));
        assert!(!is_valid_email("a@b.c\t"));
    }

    #[test]
    fn login_checks_in_order() {
        assert_eq!(LoginForm::new("", "").validate(), Err(ValidationError::MissingEmail));
        assert_eq!(LoginForm::new("nope", "").validate(), Err(ValidationError::InvalidEmail));
        assert_eq!(LoginForm::new("admin@ia.com", "").validate(), Err(ValidationError::MissingPassword));
        assert_eq!(LoginForm::new("admin@ia.com", "123456789").validate(), Ok(()));
    }

    #[test]
    fn register_rejects_short_password() {
        let form = register("Ana", "ana@ia.com", "1234567", "1234567");
        assert_eq!(form.validate(), Err(ValidationError::PasswordTooShort));
    }

    #[test]
    fn register_rejects_mismatch() {
        let form = register("Ana", "ana@ia.com", "12345678", "12345679");
        assert_eq!(form.validate(), Err(ValidationError::PasswordMismatch));
    }

    #[test]
    fn register_requires_name_first() {
        let form = register("  ", "", "", "");
        assert_eq!(form.validate(), Err(ValidationError::MissingName));
    }

    #[test]
    fn register_accepts_valid_form() {
        assert_eq!(register("Ana", "ana@ia.com", "12345678", "12345678").validate(), Ok(()));
    }
}
