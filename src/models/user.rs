//! User model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    User,
    Admin,
    Moderator,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
            Self::Moderator => "moderator",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionPlan {
    Free,
    Pro,
    Enterprise,
}

impl SubscriptionPlan {
    /// Monthly detection quota. `None` means unlimited.
    pub fn monthly_quota(&self) -> Option<u32> {
        match self {
            Self::Free => Some(10),
            Self::Pro => Some(500),
            Self::Enterprise => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontSize {
    Small,
    Medium,
    Large,
}

#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: UserRole,
    pub plan: SubscriptionPlan,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan_expiry: Option<DateTime<Utc>>,
    pub theme: Theme,
    pub font_size: FontSize,
    pub detections_made: u32,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(name: &str, email: &str, role: UserRole, plan: SubscriptionPlan) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: email.to_string(),
            name: name.to_string(),
            role,
            plan,
            plan_expiry: None,
            theme: Theme::Dark,
            font_size: FontSize::Medium,
            detections_made: 0,
            created_at: Utc::now(),
        }
    }
}

/// Hard-coded demo credential fixtures. These are intentionally plaintext:
/// the product ships no real account system.
pub struct DemoAccount {
    pub email: &'static str,
    pub password: &'static str,
    pub name: &'static str,
    pub role: UserRole,
}

pub const DEMO_ACCOUNTS: [DemoAccount; 2] = [
    DemoAccount {
        email: "user@demo.com",
        password: "demo1234",
        name: "Demo User",
        role: UserRole::User,
    },
    DemoAccount {
        email: "admin@demo.com",
        password: "admin1234",
        name: "Admin User",
        role: UserRole::Admin,
    },
];

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}
