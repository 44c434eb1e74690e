use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use grammers_client::session::Session;
use grammers_client::types::Chat;
use grammers_client::grammers_tl_types as tl;
use grammers_client::{Client, Config, InitParams, SignInError};
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::TelegramError;
use crate::models::TelegramAccount;
use crate::services::client::{
    DialogBatch, DialogSummary, MessageInfo, PeerInfo, ProfileInfo, SenderInfo, SignInOutcome,
    TelegramConnector, TelegramSession,
};

/// Builds [`GrammersSession`]s from stored account credentials.
pub struct GrammersConnector;

#[async_trait]
impl TelegramConnector for GrammersConnector {
    async fn connect(
        &self,
        account: &TelegramAccount,
    ) -> Result<Arc<dyn TelegramSession>, TelegramError> {
        // The stored credential is opaque: base64 of whatever bytes the
        // session serializer produced, restored verbatim.
        let session = match account.session_string.as_deref().filter(|s| !s.is_empty()) {
            Some(blob) => {
                let bytes = BASE64
                    .decode(blob)
                    .map_err(|e| TelegramError::Connection(format!("invalid stored session: {e}")))?;
                Session::load(&bytes)
                    .map_err(|e| TelegramError::Connection(format!("invalid stored session: {e}")))?
            }
            None => Session::new(),
        };

        let client = Client::connect(Config {
            session,
            api_id: account.api_id as i32,
            api_hash: account.api_hash.clone(),
            params: InitParams::default(),
        })
        .await
        .map_err(|e| TelegramError::Connection(e.to_string()))?;

        Ok(Arc::new(GrammersSession {
            client,
            login_token: Mutex::new(None),
            password_token: Mutex::new(None),
            peers: Mutex::new(HashMap::new()),
        }))
    }
}

/// Live `grammers` client for one account.
///
/// The login and password tokens bridge the multi-request login flow:
/// Telegram hands them out on one step and expects them back on the next,
/// while the HTTP caller only resubmits the account id.
pub struct GrammersSession {
    client: Client,
    login_token: Mutex<Option<grammers_client::types::LoginToken>>,
    password_token: Mutex<Option<grammers_client::types::PasswordToken>>,
    /// Peers seen in dialog listings, kept so message fetches and photo
    /// downloads can address a chat by bare id.
    peers: Mutex<HashMap<i64, Chat>>,
}

impl GrammersSession {
    async fn remember(&self, chat: &Chat) {
        self.peers.lock().await.insert(chat.id(), chat.clone());
    }

    /// Find the chat entity for a bare id, scanning the dialog list when it
    /// has not been seen yet.
    async fn resolve_chat(&self, chat_id: i64) -> Result<Chat, TelegramError> {
        if let Some(chat) = self.peers.lock().await.get(&chat_id) {
            return Ok(chat.clone());
        }

        let mut iter = self.client.iter_dialogs();
        while let Some(dialog) = iter
            .next()
            .await
            .map_err(|e| TelegramError::Fetch(e.to_string()))?
        {
            let chat = dialog.chat().clone();
            self.remember(&chat).await;
            if chat.id() == chat_id {
                return Ok(chat);
            }
        }

        Err(TelegramError::Fetch(format!("unknown chat {chat_id}")))
    }
}

fn peer_info(chat: &Chat) -> PeerInfo {
    match chat {
        Chat::User(user) => PeerInfo::User {
            id: user.id(),
            first_name: user.first_name().to_string(),
            last_name: user.last_name().map(str::to_string),
        },
        other => PeerInfo::Group {
            id: other.id(),
            title: other.name().to_string(),
        },
    }
}

fn sender_info(chat: &Chat) -> SenderInfo {
    match chat {
        Chat::User(user) => SenderInfo {
            first_name: user.first_name().to_string(),
            last_name: user.last_name().map(str::to_string),
        },
        other => SenderInfo {
            first_name: other.name().to_string(),
            last_name: None,
        },
    }
}

#[async_trait]
impl TelegramSession for GrammersSession {
    async fn is_authorized(&self) -> Result<bool, TelegramError> {
        self.client
            .is_authorized()
            .await
            .map_err(|e| TelegramError::Connection(e.to_string()))
    }

    async fn request_login_code(&self, phone: &str) -> Result<(), TelegramError> {
        let token = self
            .client
            .request_login_code(phone)
            .await
            .map_err(|e| TelegramError::Auth(e.to_string()))?;
        *self.login_token.lock().await = Some(token);
        Ok(())
    }

    async fn submit_code(&self, code: &str) -> Result<SignInOutcome, TelegramError> {
        let token_guard = self.login_token.lock().await;
        let token = token_guard
            .as_ref()
            .ok_or_else(|| TelegramError::Auth("no login code was requested".to_string()))?;

        match self.client.sign_in(token, code).await {
            Ok(_) => Ok(SignInOutcome::Authorized),
            // Structured 2FA signal, no message sniffing.
            Err(SignInError::PasswordRequired(password_token)) => {
                *self.password_token.lock().await = Some(password_token);
                Ok(SignInOutcome::PasswordRequired)
            }
            Err(e) => Err(TelegramError::Auth(e.to_string())),
        }
    }

    async fn submit_password(&self, password: &str) -> Result<SignInOutcome, TelegramError> {
        let token = self
            .password_token
            .lock()
            .await
            .take()
            .ok_or_else(|| TelegramError::Auth("no 2FA password was requested".to_string()))?;

        match self.client.check_password(token, password).await {
            Ok(_) => Ok(SignInOutcome::Authorized),
            Err(SignInError::PasswordRequired(password_token)) => {
                *self.password_token.lock().await = Some(password_token);
                Ok(SignInOutcome::PasswordRequired)
            }
            Err(e) => Err(TelegramError::Auth(e.to_string())),
        }
    }

    async fn export_session(&self) -> Result<String, TelegramError> {
        Ok(BASE64.encode(self.client.session().save()))
    }

    async fn sign_out(&self) -> Result<(), TelegramError> {
        self.client
            .sign_out()
            .await
            .map(|_| ())
            .map_err(|e| TelegramError::Connection(e.to_string()))
    }

    async fn disconnect(&self) {
        // The client's network task shuts down when the last handle is
        // dropped; nothing to tear down explicitly.
        debug!("dropping grammers client");
    }

    async fn fetch_dialogs(&self, limit: usize) -> Result<DialogBatch, TelegramError> {
        let mut batch = DialogBatch::default();
        let mut iter = self.client.iter_dialogs().limit(limit);

        while let Some(dialog) = iter
            .next()
            .await
            .map_err(|e| TelegramError::Fetch(e.to_string()))?
        {
            let chat = dialog.chat();
            self.remember(chat).await;

            let unread_count = match &dialog.raw {
                tl::enums::Dialog::Dialog(d) => d.unread_count,
                tl::enums::Dialog::Folder(_) => 0,
            };
            let mut summary = DialogSummary {
                unread_count,
                ..DialogSummary::default()
            };
            match chat {
                Chat::User(_) => summary.user_id = Some(chat.id()),
                Chat::Group(_) => summary.chat_id = Some(chat.id()),
                Chat::Channel(_) => summary.channel_id = Some(chat.id()),
            }

            batch.dialogs.push(summary);
            batch.peers.push(peer_info(chat));
        }

        Ok(batch)
    }

    async fn fetch_messages(
        &self,
        chat_id: i64,
        limit: usize,
    ) -> Result<Vec<MessageInfo>, TelegramError> {
        let chat = self.resolve_chat(chat_id).await?;
        let mut messages = Vec::new();
        let mut iter = self.client.iter_messages(&chat).limit(limit);

        while let Some(message) = iter
            .next()
            .await
            .map_err(|e| TelegramError::Fetch(e.to_string()))?
        {
            messages.push(MessageInfo {
                id: message.id() as i64,
                sender: message.sender().map(|sender| sender_info(&sender)),
                text: message.text().to_string(),
                date: message.date(),
            });
        }

        Ok(messages)
    }

    async fn fetch_profile(&self) -> Result<ProfileInfo, TelegramError> {
        let me = self
            .client
            .get_me()
            .await
            .map_err(|e| TelegramError::Fetch(e.to_string()))?;

        let profile = ProfileInfo {
            peer_id: me.id(),
            first_name: Some(me.first_name().to_string()).filter(|s| !s.is_empty()),
            last_name: me.last_name().map(str::to_string),
            username: me.username().map(str::to_string),
        };
        self.remember(&Chat::User(me)).await;

        Ok(profile)
    }

    async fn download_peer_photo(&self, peer_id: i64) -> Result<Option<Vec<u8>>, TelegramError> {
        let chat = self.resolve_chat(peer_id).await?;
        let Some(photo) = chat.photo_downloadable(true) else {
            return Ok(None);
        };

        let mut bytes = Vec::new();
        let mut download = self.client.iter_download(&photo);
        while let Some(chunk) = download
            .next()
            .await
            .map_err(|e| TelegramError::Fetch(e.to_string()))?
        {
            bytes.extend(chunk);
        }

        Ok(Some(bytes))
    }
}
