//! Input validation for registration, account, and upload forms.

use once_cell::sync::Lazy;
use regex::Regex;

/// Email shape accepted at registration and email change.
pub static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9_.+-]+@[a-zA-Z0-9-]+\.[a-zA-Z0-9-.]+$").expect("valid email regex")
});

pub const USERNAME_MIN: usize = 3;
pub const USERNAME_MAX: usize = 50;
pub const PASSWORD_MIN: usize = 6;
pub const IMAGE_NAME_MAX: usize = 100;

pub fn validate_email(email: &str) -> Result<(), String> {
    if EMAIL_REGEX.is_match(email) {
        Ok(())
    } else {
        Err("Invalid email format. Please enter a valid email address.".to_string())
    }
}

pub fn validate_username(username: &str) -> Result<(), String> {
    let len = username.chars().count();
    if (USERNAME_MIN..=USERNAME_MAX).contains(&len) {
        Ok(())
    } else {
        Err(format!(
            "Username must be between {USERNAME_MIN} and {USERNAME_MAX} characters long."
        ))
    }
}

pub fn validate_password(password: &str) -> Result<(), String> {
    if password.chars().count() >= PASSWORD_MIN {
        Ok(())
    } else {
        Err(format!(
            "Password must be at least {PASSWORD_MIN} characters long."
        ))
    }
}

pub fn validate_image_name(name: &str) -> Result<(), String> {
    let len = name.trim().chars().count();
    if (1..=IMAGE_NAME_MAX).contains(&len) {
        Ok(())
    } else {
        Err(format!(
            "Image name must be between 1 and {IMAGE_NAME_MAX} characters long."
        ))
    }
}
