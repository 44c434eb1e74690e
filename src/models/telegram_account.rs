use serde::{Deserialize, Serialize};

/// A linked Telegram account as stored in `telegram_accounts`.
///
/// `session_string` is the opaque serialized credential produced by the
/// protocol client after a successful login; it is stored and restored
/// verbatim and never inspected here.
#[derive(Debug, Clone)]
pub struct TelegramAccount {
    pub id: String,
    pub phone_number: String,
    pub api_id: i64,
    pub api_hash: String,
    pub session_string: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: Option<String>,
    pub photo: Option<String>,
    pub is_active: bool,
    pub created_at: String,
    pub owner_id: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateTelegramAccountRequest {
    pub phone_number: String,
    pub api_id: Option<i64>,
    pub api_hash: Option<String>,
}

/// Account row as returned to the frontend. `is_authorized` reflects live
/// registry membership at the time of the request, not stored state, and
/// the API credentials stay server-side.
#[derive(Debug, Serialize)]
pub struct TelegramAccountView {
    pub id: String,
    pub phone_number: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: Option<String>,
    pub photo: Option<String>,
    pub is_active: bool,
    pub created_at: String,
    pub owner_id: String,
    pub is_authorized: bool,
}

impl TelegramAccountView {
    pub fn from_account(account: TelegramAccount, is_authorized: bool) -> Self {
        Self {
            id: account.id,
            phone_number: account.phone_number,
            first_name: account.first_name,
            last_name: account.last_name,
            username: account.username,
            photo: account.photo,
            is_active: account.is_active,
            created_at: account.created_at,
            owner_id: account.owner_id,
            is_authorized,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct TelegramAuthRequest {
    pub phone_number: Option<String>,
    pub verification_code: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthStep {
    CodeNeeded,
    PasswordNeeded,
    Success,
}

#[derive(Debug, Serialize)]
pub struct TelegramAuthResponse {
    pub account_id: String,
    pub auth_step: AuthStep,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TelegramChat {
    pub id: i64,
    pub title: String,
    pub unread_count: i32,
    pub thumb: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TelegramMessage {
    pub id: i64,
    pub sender: String,
    pub text: String,
    pub date: chrono::DateTime<chrono::Utc>,
}
