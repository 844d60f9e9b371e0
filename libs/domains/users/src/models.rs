use axum_helpers::Role;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidateEmail, ValidationError};

/// Stored account, including the password hash
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    /// Argon2 password hash (never exposed in API responses)
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields needed to insert a user; the id and timestamps come from storage
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

/// User as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "Ada Lovelace")]
    pub name: String,
    #[schema(example = "ada@example.com")]
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Registration request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RegisterUser {
    #[validate(custom(function = "validate_name"))]
    #[schema(example = "Ada Lovelace", min_length = 1, max_length = 100)]
    pub name: String,
    /// Surrounding whitespace and case are ignored
    #[validate(custom(function = "validate_email_address"))]
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[validate(length(min = 8, max = 128, message = "Password must be between 8 and 128 characters"))]
    #[schema(example = "correct-horse-battery")]
    pub password: String,
    /// Defaults to `user`
    #[serde(default)]
    pub role: Option<Role>,
}

/// Login request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(custom(function = "validate_email_address"))]
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Issued bearer token plus the account it belongs to
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Token lifetime in seconds
    #[schema(example = 86400)]
    pub expires_in: u64,
    pub user: UserResponse,
}

/// Lowercased, trimmed form used for storage and lookups
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn validate_email_address(email: &str) -> Result<(), ValidationError> {
    if !email.trim().validate_email() {
        return Err(ValidationError::new("email").with_message("Invalid email format".into()));
    }
    Ok(())
}

fn validate_name(name: &str) -> Result<(), ValidationError> {
    let len = name.trim().chars().count();
    if !(1..=100).contains(&len) {
        return Err(ValidationError::new("length")
            .with_message("Name must be between 1 and 100 characters".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(name: &str, email: &str, password: &str) -> RegisterUser {
        RegisterUser {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            role: None,
        }
    }

    #[test]
    fn test_register_validation() {
        assert!(register("Ada", "ada@example.com", "longenough").validate().is_ok());
        assert!(register("", "ada@example.com", "longenough").validate().is_err());
        assert!(register("Ada", "not-an-email", "longenough").validate().is_err());
        assert!(register("Ada", "ada@example.com", "short").validate().is_err());
        assert!(register("Ada", "ada@example.com", &"x".repeat(129)).validate().is_err());
        assert!(register(&"n".repeat(101), "ada@example.com", "longenough").validate().is_err());
    }

    #[test]
    fn test_register_checks_trimmed_email_and_name() {
        assert!(register("Ada", " ada@example.com\n", "longenough").validate().is_ok());
        assert!(register(" Ada ", "ada@example.com", "longenough").validate().is_ok());
        assert!(register("   ", "ada@example.com", "longenough").validate().is_err());
        assert!(register("Ada", "   ", "longenough").validate().is_err());
        assert!(register("Ada", "ada @example.com", "longenough").validate().is_err());

        let login = LoginRequest {
            email: "  Ada@Example.com ".into(),
            password: "longenough".into(),
        };
        assert!(login.validate().is_ok());
    }

    #[test]
    fn test_register_role_is_optional_and_lowercase() {
        let input: RegisterUser = serde_json::from_str(
            r#"{"name":"Ada","email":"ada@example.com","password":"longenough"}"#,
        )
        .unwrap();
        assert_eq!(input.role, None);

        let input: RegisterUser = serde_json::from_str(
            r#"{"name":"Ada","email":"ada@example.com","password":"longenough","role":"admin"}"#,
        )
        .unwrap();
        assert_eq!(input.role, Some(Role::Admin));

        assert!(serde_json::from_str::<RegisterUser>(
            r#"{"name":"Ada","email":"ada@example.com","password":"longenough","role":"root"}"#,
        )
        .is_err());
    }

    #[test]
    fn test_user_never_serializes_password_hash() {
        let user = User {
            id: 1,
            name: "Ada".into(),
            email: "ada@example.com".into(),
            password_hash: "$argon2id$secret".into(),
            role: Role::User,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());

        let json = serde_json::to_value(UserResponse::from(user)).unwrap();
        assert!(json.get("password_hash").is_none());
        assert!(json.get("password").is_none());
        assert_eq!(json["role"], "user");
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Ada@Example.COM "), "ada@example.com");
    }
}
