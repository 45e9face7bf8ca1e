//! In-memory port implementations for integration tests.
//!
//! Compiled only with the `test-support` feature. Doubles keep their state
//! behind a `Mutex` so a test can seed data, drive the HTTP app and then
//! inspect what the services wrote.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Local, NaiveDate, Utc};
use mockable::Clock;
use url::Url;

use crate::domain::ports::{
    BillingProvider, BillingProviderError, CheckoutSessionRequest, HostedSession,
    NewBillingCustomer, NotificationRepository, NotificationRepositoryError, PortalSessionRequest,
    ReceiptUsageRepository, ReceiptUsageRepositoryError, UserPersistenceError, UserRepository,
};
use crate::domain::{Notification, StoredCredentials, User, UserId, hash_password};

fn lock<'a, T>(mutex: &'a Mutex<T>, label: &str) -> MutexGuard<'a, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(_) => panic!("{label} mutex poisoned"),
    }
}

/// Clock frozen at a single instant.
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

/// User accounts keyed by id, with optional password credentials.
#[derive(Default)]
pub struct InMemoryUsers {
    users: Mutex<HashMap<UserId, User>>,
    credentials: Mutex<HashMap<String, StoredCredentials>>,
}

impl InMemoryUsers {
    pub fn insert(&self, user: User) {
        lock(&self.users, "users").insert(*user.id(), user);
    }

    /// Insert a user that can log in with `password`.
    pub fn insert_with_password(&self, user: User, password: &str) {
        let password_hash = match hash_password(password) {
            Ok(hash) => hash,
            Err(err) => panic!("hash test password: {err}"),
        };
        let stored = StoredCredentials {
            user_id: *user.id(),
            password_hash,
        };
        lock(&self.credentials, "credentials").insert(user.email().to_ascii_lowercase(), stored);
        self.insert(user);
    }

    pub fn get(&self, id: &UserId) -> Option<User> {
        lock(&self.users, "users").get(id).cloned()
    }
}

#[async_trait]
impl UserRepository for InMemoryUsers {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.get(id))
    }

    async fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError> {
        Ok(lock(&self.credentials, "credentials").get(email).cloned())
    }

    async fn set_billing_customer_id(
        &self,
        id: &UserId,
        customer_id: &str,
    ) -> Result<(), UserPersistenceError> {
        let mut users = lock(&self.users, "users");
        let user = users
            .remove(id)
            .ok_or_else(|| UserPersistenceError::query("user not found"))?;
        users.insert(
            *id,
            user.with_billing_customer_id(Some(customer_id.to_owned())),
        );
        Ok(())
    }
}

/// Receipt counters keyed by user and period start.
#[derive(Default)]
pub struct InMemoryReceiptUsage {
    counters: Mutex<HashMap<(UserId, NaiveDate), u32>>,
}

impl InMemoryReceiptUsage {
    pub fn record(&self, user_id: UserId, period_start: NaiveDate, used: u32) {
        lock(&self.counters, "receipt usage").insert((user_id, period_start), used);
    }
}

#[async_trait]
impl ReceiptUsageRepository for InMemoryReceiptUsage {
    async fn receipts_used(
        &self,
        user_id: &UserId,
        period_start: NaiveDate,
    ) -> Result<Option<u32>, ReceiptUsageRepositoryError> {
        Ok(lock(&self.counters, "receipt usage")
            .get(&(*user_id, period_start))
            .copied())
    }
}

/// Append-only notification log. Inserts for users missing from the
/// attached directory fail with `UnknownUser`.
pub struct InMemoryNotifications {
    users: Arc<InMemoryUsers>,
    rows: Mutex<Vec<Notification>>,
}

impl InMemoryNotifications {
    pub fn new(users: Arc<InMemoryUsers>) -> Self {
        Self {
            users,
            rows: Mutex::new(Vec::new()),
        }
    }

    /// Every stored notification, in insertion order.
    pub fn all(&self) -> Vec<Notification> {
        lock(&self.rows, "notifications").clone()
    }
}

#[async_trait]
impl NotificationRepository for InMemoryNotifications {
    async fn insert(&self, notification: &Notification) -> Result<(), NotificationRepositoryError> {
        if self.users.get(&notification.user_id).is_none() {
            return Err(NotificationRepositoryError::unknown_user(
                notification.user_id.to_string(),
            ));
        }
        lock(&self.rows, "notifications").push(notification.clone());
        Ok(())
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
        limit: u32,
    ) -> Result<Vec<Notification>, NotificationRepositoryError> {
        let mut rows: Vec<Notification> = lock(&self.rows, "notifications")
            .iter()
            .filter(|row| row.user_id == *user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        rows.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(rows)
    }
}

/// Billing provider answering with predictable hosted URLs.
///
/// Customers are numbered `cus_test_1`, `cus_test_2`, ... in creation order.
pub struct StubBillingProvider {
    origin: Url,
    customers: Mutex<Vec<NewBillingCustomer>>,
}

impl StubBillingProvider {
    pub fn new(origin: Url) -> Self {
        Self {
            origin,
            customers: Mutex::new(Vec::new()),
        }
    }

    /// Customers registered so far.
    pub fn customers(&self) -> Vec<NewBillingCustomer> {
        lock(&self.customers, "customers").clone()
    }

    fn hosted(&self, path: &str, id: String) -> Result<HostedSession, BillingProviderError> {
        let url = self
            .origin
            .join(&format!("{path}/{id}"))
            .map_err(|err| BillingProviderError::decode(err.to_string()))?;
        Ok(HostedSession { id, url })
    }
}

#[async_trait]
impl BillingProvider for StubBillingProvider {
    async fn create_customer(
        &self,
        customer: &NewBillingCustomer,
    ) -> Result<String, BillingProviderError> {
        let mut customers = lock(&self.customers, "customers");
        customers.push(customer.clone());
        Ok(format!("cus_test_{}", customers.len()))
    }

    async fn create_checkout_session(
        &self,
        request: &CheckoutSessionRequest,
    ) -> Result<HostedSession, BillingProviderError> {
        self.hosted("c/pay", format!("cs_{}", request.customer_id))
    }

    async fn create_portal_session(
        &self,
        request: &PortalSessionRequest,
    ) -> Result<HostedSession, BillingProviderError> {
        self.hosted("p/session", format!("bps_{}", request.customer_id))
    }
}
