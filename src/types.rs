use serde::{Deserialize, Serialize};

// =============================================================================
// Configuration
// =============================================================================

/// Service configuration, read once at startup from the process environment.
///
/// Keys use the environment variable names directly. Unset (or empty)
/// optional keys fall back to the documented defaults; the two Airtable
/// credentials stay `None` and make every read endpoint fail with a
/// configuration error instead of stopping the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(rename = "AIRTABLE_API_KEY", default, skip_serializing)]
    pub airtable_api_key: Option<String>,
    #[serde(rename = "AIRTABLE_BASE_ID", default)]
    pub airtable_base_id: Option<String>,
    #[serde(rename = "AIRTABLE_TABLE_NAME", default = "default_leads_table")]
    pub leads_table: String,
    #[serde(
        rename = "AIRTABLE_MESSAGES_TABLE_NAME",
        default = "default_messages_table"
    )]
    pub messages_table: String,
    #[serde(rename = "AIRTABLE_POSTS_TABLE_NAME", default = "default_posts_table")]
    pub posts_table: String,
    /// Named view requested by the list operations.
    #[serde(rename = "AIRTABLE_VIEW", default = "default_view")]
    pub view: String,
    #[serde(rename = "AIRTABLE_API_URL", default = "default_api_url")]
    pub api_url: String,
    #[serde(flatten)]
    pub webhooks: WebhookConfig,
    #[serde(rename = "CRM_BIND_ADDR", default = "default_bind_addr")]
    pub bind_addr: String,
}

/// n8n automation endpoints the action buttons forward to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookConfig {
    #[serde(
        rename = "GENERATE_MESSAGE_WEBHOOK_URL",
        default = "default_generate_message_webhook"
    )]
    pub generate_message: String,
    #[serde(
        rename = "RETRIEVE_POSTS_WEBHOOK_URL",
        default = "default_retrieve_posts_webhook"
    )]
    pub retrieve_posts: String,
    #[serde(rename = "OUTREACH_WEBHOOK_URL", default = "default_outreach_webhook")]
    pub outreach: String,
}

fn default_leads_table() -> String {
    "Leads".to_string()
}

fn default_messages_table() -> String {
    "Messages".to_string()
}

fn default_posts_table() -> String {
    "Posts".to_string()
}

fn default_view() -> String {
    "Grid view".to_string()
}

fn default_api_url() -> String {
    "https://api.airtable.com/v0".to_string()
}

fn default_bind_addr() -> String {
    "127.0.0.1:3000".to_string()
}

fn default_generate_message_webhook() -> String {
    "https://faos.app.n8n.cloud/webhook/generate-message".to_string()
}

fn default_retrieve_posts_webhook() -> String {
    "https://faos.app.n8n.cloud/webhook/pull-posts".to_string()
}

fn default_outreach_webhook() -> String {
    "https://faos.app.n8n.cloud/webhook/generate-outreach".to_string()
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            generate_message: default_generate_message_webhook(),
            retrieve_posts: default_retrieve_posts_webhook(),
            outreach: default_outreach_webhook(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            airtable_api_key: None,
            airtable_base_id: None,
            leads_table: default_leads_table(),
            messages_table: default_messages_table(),
            posts_table: default_posts_table(),
            view: default_view(),
            api_url: default_api_url(),
            webhooks: WebhookConfig::default(),
            bind_addr: default_bind_addr(),
        }
    }
}

// =============================================================================
// Entities
// =============================================================================

/// Pipeline stage of a lead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum LeadStatus {
    #[default]
    New,
    Contacted,
    Qualified,
    Lost,
    Customer,
}

impl LeadStatus {
    pub const ALL: [LeadStatus; 5] = [
        LeadStatus::New,
        LeadStatus::Contacted,
        LeadStatus::Qualified,
        LeadStatus::Lost,
        LeadStatus::Customer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LeadStatus::New => "New",
            LeadStatus::Contacted => "Contacted",
            LeadStatus::Qualified => "Qualified",
            LeadStatus::Lost => "Lost",
            LeadStatus::Customer => "Customer",
        }
    }

    /// Exact, case-sensitive match against the stored Airtable option name.
    pub fn from_stored(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == value)
    }
}

/// A prospective or existing contact.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    /// Airtable record id (`rec...`).
    pub id: String,
    /// Human-facing identifier from the `ID` column; falls back to `id`.
    pub custom_id: String,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_pic: Option<String>,
    pub status: LeadStatus,
    pub created_at: String,
}

/// An outreach message addressed to a lead's custom id.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub content: String,
    pub recipient: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Engagement {
    pub likes: u64,
    pub comments: u64,
    pub shares: u64,
}

impl Engagement {
    /// `None` when every counter is zero, so "no engagement" has one representation.
    pub fn non_zero(likes: u64, comments: u64, shares: u64) -> Option<Self> {
        if likes > 0 || comments > 0 || shares > 0 {
            Some(Self {
                likes,
                comments,
                shares,
            })
        } else {
            None
        }
    }
}

/// A LinkedIn post authored by or about a lead.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub title: String,
    pub content: String,
    pub author: String,
    pub published_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engagement: Option<Engagement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lead_id: Option<String>,
}
