//! In-app notification model.
//!
//! A [`NotificationDraft`] is the validated input for the notification
//! writer; a [`Notification`] is the persisted record. Notifications belong to
//! exactly one user and are never deduplicated.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

use crate::domain::UserId;

/// Maximum title length in characters.
pub const NOTIFICATION_TITLE_MAX: usize = 120;
/// Maximum body length in characters.
pub const NOTIFICATION_BODY_MAX: usize = 1000;

/// Category of an in-app notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// Someone added a bill to a shared group.
    BillAdded,
    /// A member settled part of their balance.
    PaymentReceived,
    /// Nudge about an outstanding balance.
    SettlementReminder,
    /// Receipt scan allowance is running low.
    QuotaWarning,
    /// Subscription state changed at the billing provider.
    SubscriptionUpdated,
    /// Operational announcement.
    System,
}

impl NotificationKind {
    /// Storage representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BillAdded => "bill_added",
            Self::PaymentReceived => "payment_received",
            Self::SettlementReminder => "settlement_reminder",
            Self::QuotaWarning => "quota_warning",
            Self::SubscriptionUpdated => "subscription_updated",
            Self::System => "system",
        }
    }
}

impl std::str::FromStr for NotificationKind {
    type Err = NotificationValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "bill_added" => Ok(Self::BillAdded),
            "payment_received" => Ok(Self::PaymentReceived),
            "settlement_reminder" => Ok(Self::SettlementReminder),
            "quota_warning" => Ok(Self::QuotaWarning),
            "subscription_updated" => Ok(Self::SubscriptionUpdated),
            "system" => Ok(Self::System),
            other => Err(NotificationValidationError::UnknownKind {
                value: other.to_owned(),
            }),
        }
    }
}

/// Validation failures for notification input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationValidationError {
    /// Title is blank after trimming.
    EmptyTitle,
    /// Title exceeds `max` characters.
    TitleTooLong { max: usize },
    /// Body is blank after trimming.
    EmptyBody,
    /// Body exceeds `max` characters.
    BodyTooLong { max: usize },
    /// Link is not a relative path or absolute http(s) URL.
    InvalidUrl,
    /// Kind is not one of the recognised notification kinds.
    UnknownKind { value: String },
}

impl fmt::Display for NotificationValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "notification title must not be empty"),
            Self::TitleTooLong { max } => {
                write!(f, "notification title must be at most {max} characters")
            }
            Self::EmptyBody => write!(f, "notification body must not be empty"),
            Self::BodyTooLong { max } => {
                write!(f, "notification body must be at most {max} characters")
            }
            Self::InvalidUrl => write!(
                f,
                "notification url must be an absolute http(s) URL or an app path"
            ),
            Self::UnknownKind { value } => write!(f, "unknown notification type: {value}"),
        }
    }
}

impl std::error::Error for NotificationValidationError {}

/// Validated request to create a notification.
///
/// # Examples
/// ```
/// use backend::domain::{NotificationDraft, NotificationKind, UserId};
///
/// let draft = NotificationDraft::new(
///     UserId::random(),
///     NotificationKind::BillAdded,
///     "New bill",
///     "Sam added Dinner (42.00)",
///     Some("/groups/7".to_owned()),
/// )
/// .expect("valid draft");
/// assert_eq!(draft.url(), Some("/groups/7"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationDraft {
    user_id: UserId,
    kind: NotificationKind,
    title: String,
    body: String,
    url: Option<String>,
}

impl NotificationDraft {
    /// Validate notification fields.
    pub fn new(
        user_id: UserId,
        kind: NotificationKind,
        title: impl Into<String>,
        body: impl Into<String>,
        url: Option<String>,
    ) -> Result<Self, NotificationValidationError> {
        let title = title.into();
        let body = body.into();
        if title.trim().is_empty() {
            return Err(NotificationValidationError::EmptyTitle);
        }
        if title.chars().count() > NOTIFICATION_TITLE_MAX {
            return Err(NotificationValidationError::TitleTooLong {
                max: NOTIFICATION_TITLE_MAX,
            });
        }
        if body.trim().is_empty() {
            return Err(NotificationValidationError::EmptyBody);
        }
        if body.chars().count() > NOTIFICATION_BODY_MAX {
            return Err(NotificationValidationError::BodyTooLong {
                max: NOTIFICATION_BODY_MAX,
            });
        }
        if let Some(link) = url.as_deref() {
            validate_link(link)?;
        }

        Ok(Self {
            user_id,
            kind,
            title,
            body,
            url,
        })
    }

    /// Recipient.
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Category.
    pub fn kind(&self) -> NotificationKind {
        self.kind
    }

    /// Headline.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Body text.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Optional deep link.
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Materialise the record that will be persisted.
    pub fn into_notification(self, id: Uuid, created_at: DateTime<Utc>) -> Notification {
        Notification {
            id,
            user_id: self.user_id,
            kind: self.kind,
            title: self.title,
            body: self.body,
            url: self.url,
            created_at,
            read_at: None,
        }
    }
}

fn validate_link(link: &str) -> Result<(), NotificationValidationError> {
    if link.starts_with('/') && !link.starts_with("//") {
        return Ok(());
    }
    match Url::parse(link) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(()),
        _ => Err(NotificationValidationError::InvalidUrl),
    }
}

/// Persisted in-app notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: UserId,
    pub kind: NotificationKind,
    pub title: String,
    pub body: String,
    pub url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
}
