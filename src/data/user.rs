use serde::{Deserialize, Serialize};

/// Signed-in user
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub email: String,
    pub name: String,
    /// Bearer token attached to every backend request
    pub token: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LoginError {
    #[error("email is required")]
    MissingEmail,
    #[error("email must contain '@'")]
    InvalidEmail,
}

impl User {
    /// Validate the login form and build the user
    pub fn login(email: &str, token: &str) -> Result<Self, LoginError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(LoginError::MissingEmail);
        }
        let Some((local, domain)) = email.split_once('@') else {
            return Err(LoginError::InvalidEmail);
        };
        if local.is_empty() || domain.is_empty() {
            return Err(LoginError::InvalidEmail);
        }
        let token = token.trim();
        Ok(Self {
            email: email.to_string(),
            name: local.to_string(),
            token: (!token.is_empty()).then(|| token.to_string()),
        })
    }

    /// Session created from a configured token, skipping the login form
    pub fn from_token(token: &str) -> Self {
        Self {
            email: String::new(),
            name: "api".to_string(),
            token: Some(token.to_string()),
        }
    }

    /// Get display name, fallback to email if name is empty
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.email
        } else {
            &self.name
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{LoginError, User};

    #[test]
    fn login_derives_name_from_email() {
        let user = User::login("  jane.doe@example.com ", "").expect("valid login");
        assert_eq!(user.email, "jane.doe@example.com");
        assert_eq!(user.display_name(), "jane.doe");
        assert_eq!(user.token, None);
    }

    #[test]
    fn login_keeps_token() {
        let user = User::login("a@b.io", " secret ").expect("valid login");
        assert_eq!(user.token.as_deref(), Some("secret"));
    }

    #[test]
    fn login_rejects_bad_email() {
        assert_eq!(User::login("   ", "x"), Err(LoginError::MissingEmail));
        assert_eq!(User::login("nobody", ""), Err(LoginError::InvalidEmail));
        assert_eq!(User::login("@example.com", ""), Err(LoginError::InvalidEmail));
        assert_eq!(User::login("someone@", ""), Err(LoginError::InvalidEmail));
    }
}
