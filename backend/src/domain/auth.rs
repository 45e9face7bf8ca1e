//! Authentication primitives: login credentials and stored password digests.
//!
//! Inbound payloads are validated into [`LoginCredentials`] before a handler
//! talks to the login port. Stored credentials carry an Argon2id hash in
//! PHC string format.

use std::fmt;

use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use zeroize::Zeroizing;

use crate::domain::UserId;

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Email was missing or blank once trimmed.
    EmptyEmail,
    /// Email does not look like `local@domain`.
    MalformedEmail,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::MalformedEmail => write!(f, "email must be a valid address"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated login credentials used by authentication services.
///
/// ## Invariants
/// - `email` is trimmed, lower-cased and contains a non-empty local part and
///   domain separated by a single `@`.
/// - `password` is non-empty and retains caller-provided whitespace.
///
/// # Examples
/// ```
/// use backend::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" Ada@Example.com ", "hunter22").unwrap();
/// assert_eq!(creds.email(), "ada@example.com");
/// assert_eq!(creds.password(), "hunter22");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalized = email.trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyEmail);
        }
        match normalized.split_once('@') {
            Some((local, domain))
                if !local.is_empty() && !domain.is_empty() && !domain.contains('@') => {}
            _ => return Err(LoginValidationError::MalformedEmail),
        }

        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }

        Ok(Self {
            email: normalized.to_ascii_lowercase(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Normalised email suitable for user lookups.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Errors raised while hashing or checking passwords.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PasswordHashError {
    /// Hashing a new password failed.
    #[error("password hashing failed: {message}")]
    Hash {
        /// Underlying `password-hash` error.
        message: String,
    },
    /// A stored hash could not be parsed or uses unsupported parameters.
    #[error("stored password hash is malformed: {message}")]
    Malformed {
        /// Underlying `password-hash` error.
        message: String,
    },
}

/// Credentials as persisted for a user account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCredentials {
    /// Account the credentials belong to.
    pub user_id: UserId,
    /// Argon2id hash in PHC string format, salt and parameters included.
    pub password_hash: String,
}

impl StoredCredentials {
    /// Check a candidate password against the stored hash.
    ///
    /// Returns `Ok(false)` for a wrong password and an error when the stored
    /// hash itself is unusable.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::{StoredCredentials, UserId, hash_password};
    ///
    /// let stored = StoredCredentials {
    ///     user_id: UserId::random(),
    ///     password_hash: hash_password("hunter22").unwrap(),
    /// };
    /// assert!(stored.verify("hunter22").unwrap());
    /// assert!(!stored.verify("hunter23").unwrap());
    /// ```
    pub fn verify(&self, password: &str) -> Result<bool, PasswordHashError> {
        let parsed = PasswordHash::new(&self.password_hash).map_err(|err| {
            PasswordHashError::Malformed {
                message: err.to_string(),
            }
        })?;
        match Argon2::default().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(err) => Err(PasswordHashError::Malformed {
                message: err.to_string(),
            }),
        }
    }
}

/// Hash a password with Argon2id and a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, PasswordHashError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| PasswordHashError::Hash {
            message: err.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "pw", LoginValidationError::EmptyEmail)]
    #[case("   ", "pw", LoginValidationError::EmptyEmail)]
    #[case("ada", "pw", LoginValidationError::MalformedEmail)]
    #[case("@example.com", "pw", LoginValidationError::MalformedEmail)]
    #[case("ada@", "pw", LoginValidationError::MalformedEmail)]
    #[case("a@b@c", "pw", LoginValidationError::MalformedEmail)]
    #[case("ada@example.com", "", LoginValidationError::EmptyPassword)]
    fn invalid_credentials(
        #[case] email: &str,
        #[case] password: &str,
        #[case] expected: LoginValidationError,
    ) {
        let err = LoginCredentials::try_from_parts(email, password)
            .expect_err("invalid inputs must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn password_whitespace_is_preserved() {
        let creds = LoginCredentials::try_from_parts("ada@example.com", " spaced ")
            .expect("valid inputs should succeed");
        assert_eq!(creds.password(), " spaced ");
    }

    #[rstest]
    fn hashes_are_salted_argon2id() {
        let first = hash_password("pw").expect("hash");
        let second = hash_password("pw").expect("hash");

        assert!(first.starts_with("$argon2id$"));
        assert_ne!(first, second);
    }

    #[rstest]
    #[case("hunter22", true)]
    #[case("hunter2", false)]
    #[case("", false)]
    fn verify_checks_the_stored_hash(#[case] candidate: &str, #[case] expected: bool) {
        let stored = StoredCredentials {
            user_id: UserId::random(),
            password_hash: hash_password("hunter22").expect("hash"),
        };
        assert_eq!(stored.verify(candidate), Ok(expected));
    }

    #[rstest]
    fn unparseable_hash_is_an_error() {
        let stored = StoredCredentials {
            user_id: UserId::random(),
            password_hash: "5a17:deadbeef".to_owned(),
        };

        assert!(matches!(
            stored.verify("hunter22"),
            Err(PasswordHashError::Malformed { .. })
        ));
    }
}
