//! User identity and account state.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Validation errors returned by user constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyId,
    InvalidId,
    UnknownPlan { value: String },
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "user id must not be empty"),
            Self::InvalidId => write!(f, "user id must be a valid UUID"),
            Self::UnknownPlan { value } => write!(f, "unknown subscription plan: {value}"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Stable user identifier stored as a UUID.
///
/// # Examples
/// ```
/// use backend::domain::UserId;
///
/// let id = UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("valid id");
/// assert_eq!(id.to_string(), "3fa85f64-5717-4562-b3fc-2c963f66afa6");
/// assert!(UserId::new("not-a-uuid").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(Uuid);

impl UserId {
    /// Validate and construct a [`UserId`] from its string form.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let raw = id.as_ref();
        if raw.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if raw.trim() != raw {
            return Err(UserValidationError::InvalidId);
        }
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|_| UserValidationError::InvalidId)
    }

    /// Wrap a UUID read from storage.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0.to_string()
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Subscription plan governing usage allowances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Plan {
    /// Default plan with a bounded monthly receipt allowance.
    #[default]
    Free,
    /// Paid plan without receipt limits.
    Pro,
}

impl Plan {
    /// Storage representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Pro => "pro",
        }
    }
}

impl std::str::FromStr for Plan {
    type Err = UserValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "free" => Ok(Self::Free),
            "pro" => Ok(Self::Pro),
            other => Err(UserValidationError::UnknownPlan {
                value: other.to_owned(),
            }),
        }
    }
}

/// Account holder as seen by billing and quota services.
///
/// ## Invariants
/// - `billing_customer_id`, when present, is the provider's customer handle
///   and is never blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    email: String,
    display_name: String,
    plan: Plan,
    billing_customer_id: Option<String>,
}

impl User {
    /// Build a user record.
    pub fn new(
        id: UserId,
        email: impl Into<String>,
        display_name: impl Into<String>,
        plan: Plan,
    ) -> Self {
        Self {
            id,
            email: email.into(),
            display_name: display_name.into(),
            plan,
            billing_customer_id: None,
        }
    }

    /// Attach a billing customer id; blank values are ignored.
    pub fn with_billing_customer_id(mut self, customer_id: Option<String>) -> Self {
        self.billing_customer_id = customer_id.filter(|id| !id.trim().is_empty());
        self
    }

    /// Stable identifier.
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Contact email used for billing receipts.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Name shown to other group members.
    pub fn display_name(&self) -> &str {
        self.display_name.as_str()
    }

    /// Current subscription plan.
    pub fn plan(&self) -> Plan {
        self.plan
    }

    /// Billing provider customer handle, once checkout has been started.
    pub fn billing_customer_id(&self) -> Option<&str> {
        self.billing_customer_id.as_deref()
    }
}
