//! Account form guards (registration and password change)

use super::result::{Error, Result};

pub const MIN_PASSWORD_LEN: usize = 6;

pub const MSG_PASSWORD_MISMATCH: &str = "Password tidak cocok";
pub const MSG_NEW_PASSWORD_MISMATCH: &str = "Password baru tidak cocok";
pub const MSG_PASSWORD_TOO_SHORT: &str = "Password minimal 6 karakter";

/// Registration form as typed by the user
#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegistrationForm {
    pub fn validate(&self) -> Result<()> {
        if self.password != self.confirm_password {
            return Err(Error::validation(MSG_PASSWORD_MISMATCH));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(Error::validation(MSG_PASSWORD_TOO_SHORT));
        }
        Ok(())
    }
}

/// Password change form
#[derive(Debug, Clone, Default)]
pub struct PasswordChangeForm {
    pub old_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

impl PasswordChangeForm {
    pub fn validate(&self) -> Result<()> {
        if self.new_password != self.confirm_password {
            return Err(Error::validation(MSG_NEW_PASSWORD_MISMATCH));
        }
        if self.new_password.chars().count() < MIN_PASSWORD_LEN {
            return Err(Error::validation(MSG_PASSWORD_TOO_SHORT));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration(password: &str, confirm: &str) -> RegistrationForm {
        RegistrationForm {
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            password: password.to_string(),
            confirm_password: confirm.to_string(),
        }
    }

    #[test]
    fn test_registration_guards() {
        assert!(registration("rahasia1", "rahasia1").validate().is_ok());

        let err = registration("rahasia1", "rahasia2").validate().unwrap_err();
        assert_eq!(err.user_message(""), MSG_PASSWORD_MISMATCH);

        let err = registration("abc", "abc").validate().unwrap_err();
        assert_eq!(err.user_message(""), MSG_PASSWORD_TOO_SHORT);
    }

    #[test]
    fn test_password_change_guards() {
        let form = PasswordChangeForm {
            old_password: "lama123".to_string(),
            new_password: "baru123".to_string(),
            confirm_password: "baru124".to_string(),
        };
        assert_eq!(form.validate().unwrap_err().user_message(""), MSG_NEW_PASSWORD_MISMATCH);

        let form = PasswordChangeForm {
            confirm_password: "baru123".to_string(),
            ..form
        };
        assert!(form.validate().is_ok());
    }
}
