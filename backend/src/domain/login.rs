//! Password login use-case.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error};

use crate::domain::billing::map_user_error;
use crate::domain::ports::{LoginService, UserRepository};
use crate::domain::{Error, LoginCredentials, UserId};

const INVALID_CREDENTIALS: &str = "invalid credentials";

/// `LoginService` that checks Argon2id password hashes from the user store.
///
/// Unknown accounts and wrong passwords produce the same error so callers
/// cannot probe which emails are registered.
pub struct PasswordLoginService<U: ?Sized> {
    users: Arc<U>,
}

impl<U: ?Sized> PasswordLoginService<U> {
    /// Create a login service over a user repository.
    pub fn new(users: Arc<U>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl<U> LoginService for PasswordLoginService<U>
where
    U: UserRepository + ?Sized,
{
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        let Some(stored) = self
            .users
            .find_credentials_by_email(credentials.email())
            .await
            .map_err(map_user_error)?
        else {
            debug!("login attempt for unknown account");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };

        let matches = stored.verify(credentials.password()).map_err(|err| {
            error!(user_id = %stored.user_id, error = %err, "stored password hash unusable");
            Error::internal(err.to_string())
        })?;
        if !matches {
            debug!(user_id = %stored.user_id, "login attempt with wrong password");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }
        Ok(stored.user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MockUserRepository, UserPersistenceError};
    use crate::domain::{ErrorCode, StoredCredentials, hash_password};
    use rstest::rstest;

    fn stored(user_id: UserId) -> StoredCredentials {
        StoredCredentials {
            user_id,
            password_hash: hash_password("correct horse").expect("hash"),
        }
    }

    fn credentials(password: &str) -> LoginCredentials {
        LoginCredentials::try_from_parts("Ada@Example.com", password).expect("valid credentials")
    }

    #[tokio::test]
    async fn matching_password_returns_user_id() {
        let user_id = UserId::random();
        let mut users = MockUserRepository::new();
        users
            .expect_find_credentials_by_email()
            .withf(|email| email == "ada@example.com")
            .times(1)
            .return_once(move |_| Ok(Some(stored(user_id))));

        let service = PasswordLoginService::new(Arc::new(users));
        let authenticated = service
            .authenticate(&credentials("correct horse"))
            .await
            .expect("login succeeds");

        assert_eq!(authenticated, user_id);
    }

    #[rstest]
    #[case(true)]
    #[case(false)]
    #[tokio::test]
    async fn failures_are_indistinguishable(#[case] account_exists: bool) {
        let mut users = MockUserRepository::new();
        users
            .expect_find_credentials_by_email()
            .return_once(move |_| Ok(account_exists.then(|| stored(UserId::random()))));

        let service = PasswordLoginService::new(Arc::new(users));
        let err = service
            .authenticate(&credentials("battery staple"))
            .await
            .expect_err("login fails");

        assert_eq!(err.code(), ErrorCode::Unauthorized);
        assert_eq!(err.message(), INVALID_CREDENTIALS);
    }

    #[tokio::test]
    async fn repository_failure_is_internal() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_credentials_by_email()
            .return_once(|_| Err(UserPersistenceError::query("relation does not exist")));

        let service = PasswordLoginService::new(Arc::new(users));
        let err = service
            .authenticate(&credentials("correct horse"))
            .await
            .expect_err("login fails");

        assert_eq!(err.code(), ErrorCode::InternalError);
    }

    #[tokio::test]
    async fn corrupt_stored_hash_is_internal() {
        let mut users = MockUserRepository::new();
        users.expect_find_credentials_by_email().return_once(|_| {
            Ok(Some(StoredCredentials {
                user_id: UserId::random(),
                password_hash: "not-a-phc-string".to_owned(),
            }))
        });

        let service = PasswordLoginService::new(Arc::new(users));
        let err = service
            .authenticate(&credentials("correct horse"))
            .await
            .expect_err("login fails");

        assert_eq!(err.code(), ErrorCode::InternalError);
    }
}
