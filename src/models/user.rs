//! User account and authenticated identity types.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::{Gender, UserRole};

/// Authenticated subject resolved from a bearer token.
/// Never mutated by the screening core.
#[derive(Debug, Clone, Serialize)]
pub struct Identity {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    pub phone_number: Option<String>,
    pub role: UserRole,
    pub created_at: NaiveDateTime,
}

/// Registration request body. New accounts are always patients;
/// admin accounts are provisioned out of band.
#[derive(Debug, Clone, Deserialize)]
pub struct UserRegister {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    pub phone_number: Option<String>,
}

impl UserRegister {
    /// Field-level validation mirroring the account constraints.
    pub fn validate(&self) -> Result<(), String> {
        if !self.email.contains('@') || self.email.len() < 3 {
            return Err("Invalid email address".into());
        }
        if self.password.len() < 8 {
            return Err("Password must be at least 8 characters".into());
        }
        if self.full_name.len() < 2 || self.full_name.len() > 255 {
            return Err("Full name must be 2-255 characters".into());
        }
        if let Some(phone) = &self.phone_number {
            if !phone.starts_with('+') {
                return Err("Phone number must start with +".into());
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserLogin {
    pub email: String,
    pub password: String,
}

/// Bearer token issued on login.
#[derive(Debug, Clone, Serialize)]
pub struct Token {
    pub access_token: String,
    pub token_type: &'static str,
}

impl Token {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_register() -> UserRegister {
        UserRegister {
            email: "jane@example.com".into(),
            password: "longenough".into(),
            full_name: "Jane Doe".into(),
            date_of_birth: NaiveDate::from_ymd_opt(1980, 3, 12).unwrap(),
            gender: Gender::Female,
            phone_number: Some("+4915112345678".into()),
        }
    }

    #[test]
    fn valid_registration_passes() {
        assert!(valid_register().validate().is_ok());
    }

    #[test]
    fn short_password_rejected() {
        let mut reg = valid_register();
        reg.password = "short".into();
        assert!(reg.validate().is_err());
    }

    #[test]
    fn phone_without_plus_rejected() {
        let mut reg = valid_register();
        reg.phone_number = Some("015112345678".into());
        assert!(reg.validate().is_err());
    }

    #[test]
    fn missing_phone_is_fine() {
        let mut reg = valid_register();
        reg.phone_number = None;
        assert!(reg.validate().is_ok());
    }

    #[test]
    fn single_char_name_rejected() {
        let mut reg = valid_register();
        reg.full_name = "J".into();
        assert!(reg.validate().is_err());
    }
}
