//! Account and per-request session context.
//!
//! Accounts are owned by the hosted auth provider. The server only reads the
//! name, email and two metadata fields (audience category and subscription
//! plan) carried by the verified session token.

use serde::{Deserialize, Serialize};

use crate::types::DbId;

/// Subscription plan shown when the account carries none.
pub const DEFAULT_SUBSCRIPTION_PLAN: &str = "Starter";

/// Audience the assistant tailors its persona to.
///
/// Wire values are the ones stored in account metadata and sent by the
/// dashboard: `"diy"` and `"pro"`. Anything else falls back to hobbyist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum AudienceCategory {
    #[default]
    #[serde(rename = "diy")]
    Hobbyist,
    #[serde(rename = "pro")]
    Professional,
}

impl AudienceCategory {
    /// Parse a metadata/request value. Only `"pro"` selects professionals.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "pro" => AudienceCategory::Professional,
            _ => AudienceCategory::Hobbyist,
        }
    }

    pub fn as_tag(self) -> &'static str {
        match self {
            AudienceCategory::Hobbyist => "diy",
            AudienceCategory::Professional => "pro",
        }
    }

    /// Dutch label used in the profile view.
    pub fn label(self) -> &'static str {
        match self {
            AudienceCategory::Hobbyist => "Doe-het-zelver",
            AudienceCategory::Professional => "Pro/Bedrijf",
        }
    }
}

impl<'de> Deserialize<'de> for AudienceCategory {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let tag = Option::<String>::deserialize(deserializer)?;
        Ok(tag.as_deref().map(Self::from_tag).unwrap_or_default())
    }
}

/// Read-only view of an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Account {
    pub id: DbId,
    pub email: Option<String>,
    pub name: Option<String>,
    pub audience: AudienceCategory,
    pub subscription_plan: String,
}

impl Account {
    /// Name used in greetings, falling back to a generic salutation.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or("klusser")
    }
}

/// Explicit per-request context: who is calling and the token the hosted
/// store needs to apply its row-level rules.
#[derive(Debug, Clone)]
pub struct Session {
    pub account: Account,
    pub access_token: String,
}

impl Session {
    pub fn user_id(&self) -> DbId {
        self.account.id
    }
}
