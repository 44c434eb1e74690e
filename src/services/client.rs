use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::TelegramError;
use crate::models::TelegramAccount;

/// Outcome of submitting a login code or a 2FA password.
///
/// The two-factor case is a normal outcome, not an error: the provider
/// reports it through a dedicated variant of its sign-in error type and we
/// surface it the same way instead of string-matching messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignInOutcome {
    Authorized,
    PasswordRequired,
}

/// One provider-side conversation summary. Telegram identifies the peer by
/// exactly one of three id kinds; `peer_id` collapses them in that order.
#[derive(Debug, Clone, Default)]
pub struct DialogSummary {
    pub user_id: Option<i64>,
    pub chat_id: Option<i64>,
    pub channel_id: Option<i64>,
    pub unread_count: i32,
}

impl DialogSummary {
    pub fn peer_id(&self) -> Option<i64> {
        self.user_id.or(self.chat_id).or(self.channel_id)
    }
}

/// A user or group/channel entity returned alongside a dialog page.
#[derive(Debug, Clone)]
pub enum PeerInfo {
    User {
        id: i64,
        first_name: String,
        last_name: Option<String>,
    },
    Group {
        id: i64,
        title: String,
    },
}

impl PeerInfo {
    pub fn id(&self) -> i64 {
        match self {
            PeerInfo::User { id, .. } => *id,
            PeerInfo::Group { id, .. } => *id,
        }
    }
}

/// One page of dialogs: the per-peer summaries plus every distinct entity
/// the provider returned for them.
#[derive(Debug, Clone, Default)]
pub struct DialogBatch {
    pub dialogs: Vec<DialogSummary>,
    pub peers: Vec<PeerInfo>,
}

#[derive(Debug, Clone)]
pub struct SenderInfo {
    pub first_name: String,
    pub last_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct MessageInfo {
    pub id: i64,
    pub sender: Option<SenderInfo>,
    pub text: String,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct ProfileInfo {
    pub peer_id: i64,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: Option<String>,
}

/// A live, connected protocol-client instance for one account.
///
/// Every method is a suspension point that talks to Telegram; nothing here
/// blocks a worker thread. The production implementation wraps
/// `grammers-client`, tests substitute a fake.
#[async_trait]
pub trait TelegramSession: Send + Sync {
    async fn is_authorized(&self) -> Result<bool, TelegramError>;

    /// Ask Telegram to send a verification code to `phone`.
    async fn request_login_code(&self, phone: &str) -> Result<(), TelegramError>;

    /// Sign in with the code received after [`request_login_code`].
    async fn submit_code(&self, code: &str) -> Result<SignInOutcome, TelegramError>;

    /// Sign in with the 2FA password after a `PasswordRequired` outcome.
    async fn submit_password(&self, password: &str) -> Result<SignInOutcome, TelegramError>;

    /// Serialize the current session credential as an opaque base64 string.
    async fn export_session(&self) -> Result<String, TelegramError>;

    /// Log the account out on the provider side.
    async fn sign_out(&self) -> Result<(), TelegramError>;

    /// Tear down the network connection. Infallible; dropping the handle
    /// afterwards releases whatever is left.
    async fn disconnect(&self);

    /// Fetch a single page of up to `limit` dialogs.
    async fn fetch_dialogs(&self, limit: usize) -> Result<DialogBatch, TelegramError>;

    /// Fetch up to `limit` messages from `chat_id`, most recent first in
    /// the provider's native order.
    async fn fetch_messages(
        &self,
        chat_id: i64,
        limit: usize,
    ) -> Result<Vec<MessageInfo>, TelegramError>;

    /// The authenticated account's own profile.
    async fn fetch_profile(&self) -> Result<ProfileInfo, TelegramError>;

    /// Download a peer's profile photo, `None` when it has none.
    async fn download_peer_photo(&self, peer_id: i64) -> Result<Option<Vec<u8>>, TelegramError>;
}

impl std::fmt::Debug for dyn TelegramSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("TelegramSession")
    }
}

/// Constructs connected sessions from stored account credentials.
#[async_trait]
pub trait TelegramConnector: Send + Sync {
    async fn connect(
        &self,
        account: &TelegramAccount,
    ) -> Result<Arc<dyn TelegramSession>, TelegramError>;
}
