use serde::Serialize;

use crate::validation::{CheckRequest, Validate};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Validate)]
pub struct ContactForm {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(
        length(min = 1, message = "Email is required"),
        email(message = "Email address is not valid")
    )]
    pub email: String,
    #[validate(length(min = 1, message = "Subject is required"))]
    pub subject: String,
    #[validate(length(min = 1, max = 5000, message = "Message must be 1 to 5000 characters"))]
    pub message: String,
    /// Hidden spam trap; real visitors leave it empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 0, message = "Submission rejected"))]
    pub honeypot: Option<String>,
}

impl CheckRequest for ContactForm {
    const FIELDS: &'static [&'static str] = &["name", "email", "subject", "message", "honeypot"];
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> ContactForm {
        ContactForm {
            name: "Ahmad".into(),
            email: "ahmad@example.org".into(),
            subject: "Jadwal".into(),
            message: "Kapan kajian berikutnya?".into(),
            honeypot: None,
        }
    }

    #[test]
    fn test_valid_form() {
        assert!(form().check().is_ok());
    }

    #[test]
    fn test_honeypot_rejected() {
        let mut f = form();
        f.honeypot = Some("http://spam".into());
        assert_eq!(
            f.check().unwrap_err().for_field("honeypot"),
            Some("Submission rejected")
        );
    }

    #[test]
    fn test_bad_email() {
        let mut f = form();
        f.email = "ahmad".into();
        assert_eq!(
            f.check().unwrap_err().for_field("email"),
            Some("Email address is not valid")
        );
    }

    #[test]
    fn test_empty_message_rejected() {
        let mut f = form();
        f.message = String::new();
        let errors = f.check().unwrap_err();
        assert_eq!(errors.errors().len(), 1);
        assert_eq!(
            errors.for_field("message"),
            Some("Message must be 1 to 5000 characters")
        );
    }
}
