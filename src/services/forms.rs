// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Sign-up and sign-in form rules.
//!
//! Handles:
//! - Field validation with the messages the web forms display
//! - Password strength scoring
//! - Mapping auth provider error codes to user-facing messages

use crate::error::FieldErrors;
use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::sync::LazyLock;
use validator::{Validate, ValidationError, ValidationErrors};

/// Strict address check used on sign-up and booking forms.
static SIGNUP_EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid regex"));

/// Looser address check used on the sign-in form.
static LOGIN_EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S+@\S+\.\S+").expect("valid regex"));

fn error(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

pub fn is_valid_email(email: &str) -> bool {
    SIGNUP_EMAIL_RE.is_match(email)
}

fn signup_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(error("required", "Name is required"));
    }
    Ok(())
}

fn signup_email(email: &str) -> Result<(), ValidationError> {
    if email.trim().is_empty() {
        return Err(error("required", "Email is required"));
    }
    if !is_valid_email(email) {
        return Err(error("email", "Invalid email format"));
    }
    Ok(())
}

fn signup_password(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(error("required", "Password is required"));
    }
    if password.chars().count() < 8 {
        return Err(error("length", "Password must be at least 8 characters"));
    }
    Ok(())
}

fn must_agree(agreed: &bool) -> Result<(), ValidationError> {
    if !*agreed {
        return Err(error(
            "terms",
            "You must agree to the terms and conditions",
        ));
    }
    Ok(())
}

fn login_email(email: &str) -> Result<(), ValidationError> {
    if email.trim().is_empty() {
        return Err(error("required", "Email is required"));
    }
    if !LOGIN_EMAIL_RE.is_match(email) {
        return Err(error("email", "Please enter a valid email"));
    }
    Ok(())
}

fn login_password(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(error("required", "Password is required"));
    }
    Ok(())
}

/// Sign-up form as submitted by the client.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SignupForm {
    #[serde(default)]
    #[validate(custom(function = "signup_name"))]
    pub name: String,
    #[serde(default)]
    #[validate(custom(function = "signup_email"))]
    pub email: String,
    #[serde(default)]
    #[validate(custom(function = "signup_password"))]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
    #[serde(default)]
    #[validate(custom(function = "must_agree"))]
    pub agree_to_terms: bool,
}

/// Sign-in form as submitted by the client.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct LoginForm {
    #[serde(default)]
    #[validate(custom(function = "login_email"))]
    pub email: String,
    #[serde(default)]
    #[validate(custom(function = "login_password"))]
    pub password: String,
}

/// Convert `snake_case` struct field names to the client's `camelCase`.
fn client_field_name(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Flatten validator output to one message per field.
pub fn to_field_errors(errors: &ValidationErrors) -> FieldErrors {
    errors
        .field_errors()
        .into_iter()
        .filter_map(|(field, errs)| {
            let first = errs.first()?;
            let message = first
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| first.code.to_string());
            Some((client_field_name(&field), message))
        })
        .collect()
}

pub fn validate_signup(form: &SignupForm) -> Result<(), FieldErrors> {
    let mut fields = match form.validate() {
        Ok(()) => FieldErrors::new(),
        Err(errors) => to_field_errors(&errors),
    };

    // Cross-field rule
    if form.confirm_password.is_empty() {
        fields.insert(
            "confirmPassword".to_string(),
            "Please confirm your password".to_string(),
        );
    } else if form.password != form.confirm_password {
        fields.insert(
            "confirmPassword".to_string(),
            "Passwords do not match".to_string(),
        );
    }

    if fields.is_empty() {
        Ok(())
    } else {
        Err(fields)
    }
}

pub fn validate_login(form: &LoginForm) -> Result<(), FieldErrors> {
    form.validate().map_err(|errors| to_field_errors(&errors))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StrengthLabel {
    #[serde(rename = "")]
    Empty,
    Weak,
    Medium,
    Strong,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PasswordStrength {
    pub score: u8,
    pub label: StrengthLabel,
}

/// Score a password from 0 to 6.
///
/// One point each for length >= 8, length >= 12, an uppercase letter, a
/// lowercase letter, a digit, and any other character.
pub fn password_strength(password: &str) -> PasswordStrength {
    if password.is_empty() {
        return PasswordStrength {
            score: 0,
            label: StrengthLabel::Empty,
        };
    }

    let len = password.chars().count();
    let checks = [
        len >= 8,
        len >= 12,
        password.chars().any(|c| c.is_ascii_uppercase()),
        password.chars().any(|c| c.is_ascii_lowercase()),
        password.chars().any(|c| c.is_ascii_digit()),
        password.chars().any(|c| !c.is_ascii_alphanumeric()),
    ];
    let score = checks.iter().filter(|&&c| c).count() as u8;

    let label = match score {
        0..=2 => StrengthLabel::Weak,
        3..=4 => StrengthLabel::Medium,
        _ => StrengthLabel::Strong,
    };

    PasswordStrength { score, label }
}

/// Which flow raised an auth error; messages differ slightly per flow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuthAction {
    #[default]
    Login,
    GoogleSignIn,
    GoogleSignUp,
    PasswordReset,
}

/// Form field an auth error is shown under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FormField {
    Email,
    Password,
    General,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthErrorMessage {
    pub field: FormField,
    pub message: &'static str,
}

fn message(field: FormField, message: &'static str) -> AuthErrorMessage {
    AuthErrorMessage { field, message }
}

/// User-facing message for an auth provider error code.
pub fn auth_error_message(code: &str, action: AuthAction) -> AuthErrorMessage {
    use FormField::*;

    match (action, code) {
        (AuthAction::Login, "auth/invalid-credential" | "auth/wrong-password") => message(
            Password,
            "Invalid email or password. Please check your credentials.",
        ),
        (AuthAction::Login, "auth/user-not-found") => message(
            Email,
            "No account found with this email address. Please sign up first.",
        ),
        (AuthAction::Login | AuthAction::PasswordReset, "auth/invalid-email") => {
            message(Email, "Please enter a valid email address.")
        }
        (AuthAction::Login, "auth/too-many-requests") => {
            message(General, "Too many failed attempts. Please try again later.")
        }
        (AuthAction::Login, _) => message(General, "Login failed. Please try again."),

        (AuthAction::GoogleSignIn, "auth/popup-blocked") => {
            message(General, "Please allow popups for this website.")
        }
        (AuthAction::GoogleSignIn, "auth/popup-closed-by-user") => {
            message(General, "Sign-in was cancelled.")
        }
        (AuthAction::GoogleSignIn, "auth/account-exists-with-different-credential") => {
            message(General, "An account already exists with this email.")
        }
        (AuthAction::GoogleSignIn, _) => message(General, "Failed to sign in with Google."),

        (AuthAction::GoogleSignUp, "auth/popup-blocked") => message(
            General,
            "Please allow popups for this website to sign up with Google.",
        ),
        (AuthAction::GoogleSignUp, "auth/popup-closed-by-user") => {
            message(General, "Google sign up was cancelled. Please try again.")
        }
        (AuthAction::GoogleSignUp, "auth/account-exists-with-different-credential") => message(
            General,
            "An account already exists with this email. Please try signing in.",
        ),
        (AuthAction::GoogleSignUp, _) => message(General, "Failed to sign up with Google."),

        (AuthAction::PasswordReset, "auth/user-not-found") => {
            message(Email, "No account found with this email address.")
        }
        (AuthAction::PasswordReset, _) => message(General, "Failed to send reset email."),
    }
}

/// A verification code as typed into the six OTP boxes.
pub fn is_valid_otp_format(otp: &str) -> bool {
    otp.len() == 6 && otp.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signup() -> SignupForm {
        SignupForm {
            name: "Asha Rao".to_string(),
            email: "asha@example.com".to_string(),
            password: "Sup3rSecret!".to_string(),
            confirm_password: "Sup3rSecret!".to_string(),
            agree_to_terms: true,
        }
    }

    #[test]
    fn test_valid_signup() {
        assert_eq!(validate_signup(&signup()), Ok(()));
    }

    #[test]
    fn test_signup_rejects_mismatch_and_terms() {
        let mut form = signup();
        form.confirm_password = "different".to_string();
        form.agree_to_terms = false;

        let fields = validate_signup(&form).unwrap_err();
        assert_eq!(fields["confirmPassword"], "Passwords do not match");
        assert_eq!(
            fields["agreeToTerms"],
            "You must agree to the terms and conditions"
        );
        assert_eq!(fields.len(), 2);
    }

    #[test]
    fn test_signup_required_messages_take_precedence() {
        let form = SignupForm::default();
        let fields = validate_signup(&form).unwrap_err();
        assert_eq!(fields["name"], "Name is required");
        assert_eq!(fields["email"], "Email is required");
        assert_eq!(fields["password"], "Password is required");
        assert_eq!(fields["confirmPassword"], "Please confirm your password");
    }

    #[test]
    fn test_signup_email_and_length_rules() {
        let mut form = signup();
        form.email = "asha@example".to_string();
        form.password = "short".to_string();
        form.confirm_password = "short".to_string();

        let fields = validate_signup(&form).unwrap_err();
        assert_eq!(fields["email"], "Invalid email format");
        assert_eq!(fields["password"], "Password must be at least 8 characters");
    }

    #[test]
    fn test_login_rules() {
        let form = LoginForm {
            email: "nope".to_string(),
            password: String::new(),
        };
        let fields = validate_login(&form).unwrap_err();
        assert_eq!(fields["email"], "Please enter a valid email");
        assert_eq!(fields["password"], "Password is required");

        let form = LoginForm {
            email: "a@b.co".to_string(),
            password: "x".to_string(),
        };
        assert!(validate_login(&form).is_ok());
    }

    #[test]
    fn test_password_strength_scores() {
        let weak = password_strength("abc");
        assert!(weak.score <= 2);
        assert_eq!(weak.label, StrengthLabel::Weak);

        let strong = password_strength("Abcdefgh1!");
        assert!(strong.score >= 5);
        assert_eq!(strong.label, StrengthLabel::Strong);

        assert_eq!(password_strength("abcdefgh1").label, StrengthLabel::Medium);
        assert_eq!(password_strength("Abcdefghij1!xyz").score, 6);
        assert_eq!(password_strength("").label, StrengthLabel::Empty);
    }

    #[test]
    fn test_auth_error_messages() {
        let m = auth_error_message("auth/wrong-password", AuthAction::Login);
        assert_eq!(m.field, FormField::Password);

        let m = auth_error_message("auth/user-not-found", AuthAction::PasswordReset);
        assert_eq!(m.message, "No account found with this email address.");

        let m = auth_error_message("auth/popup-closed-by-user", AuthAction::GoogleSignIn);
        assert_eq!(m.message, "Sign-in was cancelled.");

        let m = auth_error_message("auth/unknown", AuthAction::Login);
        assert_eq!(m.field, FormField::General);
    }

    #[test]
    fn test_otp_format() {
        assert!(is_valid_otp_format("012345"));
        assert!(!is_valid_otp_format("12345"));
        assert!(!is_valid_otp_format("12345a"));
        assert!(!is_valid_otp_format("１２３４５６"));
    }
}
