use std::collections::HashMap;
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use sqlx::{Row, SqlitePool};
use tracing::{error, warn};
use uuid::Uuid;

use crate::error::TelegramError;
use crate::models::{
    AuthStep, TelegramAccount, TelegramAccountView, TelegramAuthRequest, TelegramAuthResponse,
    TelegramChat, TelegramMessage,
};
use crate::services::client::{PeerInfo, SignInOutcome, TelegramSession};
use crate::services::registry::ClientRegistry;

/// Dialogs are fetched as a single page of this size; deeper pagination is
/// out of scope.
pub const DIALOG_PAGE_SIZE: usize = 100;
pub const MESSAGE_PAGE_SIZE: usize = 100;

pub async fn find_account(
    pool: &SqlitePool,
    account_id: &str,
    owner_id: &str,
) -> Result<Option<TelegramAccount>, TelegramError> {
    let row = sqlx::query(
        "SELECT id, phone_number, api_id, api_hash, session_string, first_name, last_name,
                username, photo, is_active, created_at, owner_id
         FROM telegram_accounts
         WHERE id = ? AND owner_id = ?
         LIMIT 1",
    )
    .bind(account_id)
    .bind(owner_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.as_ref().map(account_from_row))
}

fn account_from_row(row: &sqlx::sqlite::SqliteRow) -> TelegramAccount {
    TelegramAccount {
        id: row.get("id"),
        phone_number: row.get("phone_number"),
        api_id: row.get("api_id"),
        api_hash: row.get("api_hash"),
        session_string: row.try_get("session_string").unwrap_or(None),
        first_name: row.try_get("first_name").unwrap_or(None),
        last_name: row.try_get("last_name").unwrap_or(None),
        username: row.try_get("username").unwrap_or(None),
        photo: row.try_get("photo").unwrap_or(None),
        is_active: row.get("is_active"),
        created_at: row.get("created_at"),
        owner_id: row.get("owner_id"),
    }
}

/// Persist a new account and try to bring up its client right away.
///
/// The second value reports whether a stored credential already authorizes
/// the account. Connect or probe failures only log; linking an account must
/// succeed even while Telegram is unreachable.
pub async fn create_account(
    pool: &SqlitePool,
    registry: &ClientRegistry,
    owner_id: &str,
    phone_number: &str,
    api_id: i64,
    api_hash: &str,
) -> Result<(TelegramAccount, bool), TelegramError> {
    let account = TelegramAccount {
        id: Uuid::new_v4().to_string(),
        phone_number: phone_number.to_string(),
        api_id,
        api_hash: api_hash.to_string(),
        session_string: None,
        first_name: None,
        last_name: None,
        username: None,
        photo: None,
        is_active: true,
        created_at: chrono::Utc::now().to_rfc3339(),
        owner_id: owner_id.to_string(),
    };

    sqlx::query(
        "INSERT INTO telegram_accounts
            (id, phone_number, api_id, api_hash, session_string, first_name, last_name,
             username, photo, is_active, created_at, owner_id)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&account.id)
    .bind(&account.phone_number)
    .bind(account.api_id)
    .bind(&account.api_hash)
    .bind(&account.session_string)
    .bind(&account.first_name)
    .bind(&account.last_name)
    .bind(&account.username)
    .bind(&account.photo)
    .bind(account.is_active)
    .bind(&account.created_at)
    .bind(&account.owner_id)
    .execute(pool)
    .await?;

    let mut is_authorized = false;
    match registry.obtain(&account).await {
        Ok(session) => match session.is_authorized().await {
            Ok(true) => {
                is_authorized = true;
                if let Err(e) = persist_session_string(pool, &account.id, &session).await {
                    warn!(account_id = %account.id, error = %e, "failed to save session string");
                }
            }
            Ok(false) => {}
            Err(e) => {
                error!(account_id = %account.id, error = %e, "authorization probe failed");
            }
        },
        Err(e) => {
            error!(account_id = %account.id, error = %e, "error connecting to Telegram");
        }
    }

    Ok((account, is_authorized))
}

/// Drive the account one step through Telegram's login state machine.
///
/// The request carries at most one of phone number, verification code or
/// 2FA password; which one is present selects the transition. With none of
/// them this answers `code_needed` without touching the client or the
/// store.
pub async fn authenticate(
    pool: &SqlitePool,
    registry: &ClientRegistry,
    account: &TelegramAccount,
    request: &TelegramAuthRequest,
) -> Result<TelegramAuthResponse, TelegramError> {
    if request.phone_number.is_none()
        && request.verification_code.is_none()
        && request.password.is_none()
    {
        return Ok(TelegramAuthResponse {
            account_id: account.id.clone(),
            auth_step: AuthStep::CodeNeeded,
            message: "Please provide your phone number to start authentication.".to_string(),
        });
    }

    // Re-authentication must reuse an existing handle rather than open a
    // second connection for the account.
    let session = obtain_session(registry, account).await?;

    if let Some(phone_number) = &request.phone_number {
        session.request_login_code(phone_number).await?;

        if account.phone_number != *phone_number {
            sqlx::query("UPDATE telegram_accounts SET phone_number = ? WHERE id = ?")
                .bind(phone_number)
                .bind(&account.id)
                .execute(pool)
                .await?;
        }

        return Ok(TelegramAuthResponse {
            account_id: account.id.clone(),
            auth_step: AuthStep::CodeNeeded,
            message: "Verification code sent to your phone. Please enter it.".to_string(),
        });
    }

    // A finished login is terminal; resubmitting a code or password just
    // reports the current status.
    if matches!(session.is_authorized().await, Ok(true)) {
        return Ok(TelegramAuthResponse {
            account_id: account.id.clone(),
            auth_step: AuthStep::Success,
            message: "Successfully authenticated with Telegram.".to_string(),
        });
    }

    let outcome = if let Some(code) = &request.verification_code {
        session.submit_code(code).await?
    } else if let Some(password) = &request.password {
        session.submit_password(password).await?
    } else {
        unreachable!("guarded above");
    };

    match outcome {
        SignInOutcome::Authorized => {
            persist_session_string(pool, &account.id, &session).await?;

            // Best effort only; a failed refresh must not undo the login.
            if let Err(e) = refresh_profile(pool, &account.id, &session).await {
                error!(account_id = %account.id, error = %e, "error refreshing profile");
            }

            Ok(TelegramAuthResponse {
                account_id: account.id.clone(),
                auth_step: AuthStep::Success,
                message: "Successfully authenticated with Telegram.".to_string(),
            })
        }
        SignInOutcome::PasswordRequired => Ok(TelegramAuthResponse {
            account_id: account.id.clone(),
            auth_step: AuthStep::PasswordNeeded,
            message: "Two-factor authentication is enabled. Please enter your password."
                .to_string(),
        }),
    }
}

/// Reuse the registered client for the account, creating one only when the
/// registry has none.
pub async fn obtain_session(
    registry: &ClientRegistry,
    account: &TelegramAccount,
) -> Result<Arc<dyn TelegramSession>, TelegramError> {
    match registry.lookup(&account.id).await {
        Ok(session) => Ok(session),
        Err(TelegramError::NotRegistered(_)) => registry.obtain(account).await,
        Err(e) => Err(e),
    }
}

async fn persist_session_string(
    pool: &SqlitePool,
    account_id: &str,
    session: &Arc<dyn TelegramSession>,
) -> Result<(), TelegramError> {
    let session_string = session.export_session().await?;
    sqlx::query("UPDATE telegram_accounts SET session_string = ? WHERE id = ?")
        .bind(&session_string)
        .bind(account_id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Refresh the stored profile (name, username, avatar) from Telegram.
async fn refresh_profile(
    pool: &SqlitePool,
    account_id: &str,
    session: &Arc<dyn TelegramSession>,
) -> Result<(), TelegramError> {
    let profile = session.fetch_profile().await?;
    let photo = download_photo_b64(session.as_ref(), profile.peer_id).await;

    sqlx::query(
        "UPDATE telegram_accounts SET first_name = ?, last_name = ?, username = ?, photo = ?
         WHERE id = ?",
    )
    .bind(&profile.first_name)
    .bind(&profile.last_name)
    .bind(&profile.username)
    .bind(&photo)
    .bind(account_id)
    .execute(pool)
    .await?;

    Ok(())
}

/// Download a peer's avatar as base64. Purely cosmetic, so every failure is
/// logged and collapses to `None`.
async fn download_photo_b64(session: &dyn TelegramSession, peer_id: i64) -> Option<String> {
    match session.download_peer_photo(peer_id).await {
        Ok(Some(bytes)) => Some(BASE64.encode(bytes)),
        Ok(None) => None,
        Err(e) => {
            error!(peer_id, error = %e, "error downloading profile photo");
            None
        }
    }
}

/// All accounts owned by `owner_id`, with `is_authorized` reflecting live
/// registry membership rather than stored state.
pub async fn list_accounts(
    pool: &SqlitePool,
    registry: &ClientRegistry,
    owner_id: &str,
) -> Result<Vec<TelegramAccountView>, TelegramError> {
    let rows = sqlx::query(
        "SELECT id, phone_number, api_id, api_hash, session_string, first_name, last_name,
                username, photo, is_active, created_at, owner_id
         FROM telegram_accounts
         WHERE owner_id = ?
         ORDER BY created_at",
    )
    .bind(owner_id)
    .fetch_all(pool)
    .await?;

    let mut views = Vec::with_capacity(rows.len());
    for row in &rows {
        let account = account_from_row(row);
        let is_authorized = registry.contains(&account.id).await;
        views.push(TelegramAccountView::from_account(account, is_authorized));
    }

    Ok(views)
}

/// Unlink the account: release any live client (errors logged and ignored,
/// the row must go regardless), then delete the persisted record.
pub async fn delete_account(
    pool: &SqlitePool,
    registry: &ClientRegistry,
    account: &TelegramAccount,
) -> Result<(), TelegramError> {
    if let Err(e) = registry.release(&account.id).await {
        warn!(account_id = %account.id, error = %e, "logout during deletion failed");
    }

    sqlx::query("DELETE FROM telegram_accounts WHERE id = ?")
        .bind(&account.id)
        .execute(pool)
        .await?;

    Ok(())
}

/// Release the account's live client; reports whether one was active.
pub async fn logout(registry: &ClientRegistry, account_id: &str) -> Result<bool, TelegramError> {
    registry.release(account_id).await
}

/// One page of the account's dialogs, shaped for the frontend.
///
/// Only the dialog fetch itself can fail; avatar downloads are tolerated
/// per entity and missing unread counts default to zero.
pub async fn get_chats(
    session: &Arc<dyn TelegramSession>,
) -> Result<Vec<TelegramChat>, TelegramError> {
    let batch = session.fetch_dialogs(DIALOG_PAGE_SIZE).await?;

    let unread_counts: HashMap<i64, i32> = batch
        .dialogs
        .iter()
        .filter_map(|dialog| dialog.peer_id().map(|id| (id, dialog.unread_count)))
        .collect();

    let mut chats = Vec::with_capacity(batch.peers.len());
    for peer in &batch.peers {
        let thumb = download_photo_b64(session.as_ref(), peer.id()).await;
        let title = match peer {
            PeerInfo::User {
                first_name,
                last_name,
                ..
            } => display_name(first_name, last_name.as_deref()),
            PeerInfo::Group { title, .. } => title.clone(),
        };

        chats.push(TelegramChat {
            id: peer.id(),
            title,
            unread_count: unread_counts.get(&peer.id()).copied().unwrap_or(0),
            thumb,
        });
    }

    Ok(chats)
}

/// Up to `limit` most recent messages of a chat, in the provider's native
/// most-recent-first order.
pub async fn get_messages(
    session: &Arc<dyn TelegramSession>,
    chat_id: i64,
    limit: usize,
) -> Result<Vec<TelegramMessage>, TelegramError> {
    let messages = session.fetch_messages(chat_id, limit).await?;

    Ok(messages
        .into_iter()
        .map(|message| TelegramMessage {
            id: message.id,
            sender: message
                .sender
                .map(|s| display_name(&s.first_name, s.last_name.as_deref()))
                .unwrap_or_else(|| "Unknown".to_string()),
            text: message.text,
            date: message.date,
        })
        .collect())
}

fn display_name(first_name: &str, last_name: Option<&str>) -> String {
    format!("{} {}", first_name, last_name.unwrap_or(""))
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use sqlx::sqlite::SqlitePoolOptions;

    use super::*;
    use crate::services::client::testing::{FakeConnector, FakeSession};
    use crate::services::client::{
        DialogBatch, DialogSummary, MessageInfo, ProfileInfo, SenderInfo,
    };

    async fn test_pool() -> SqlitePool {
        // A single connection keeps every query on the same in-memory
        // database.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        crate::db::create_schema(&pool).await.unwrap();

        sqlx::query(
            "INSERT INTO users (id, email, password, is_active, created_at) VALUES (?, ?, ?, 1, ?)",
        )
        .bind("owner")
        .bind("owner@example.com")
        .bind("hash")
        .bind(chrono::Utc::now().to_rfc3339())
        .execute(&pool)
        .await
        .unwrap();

        pool
    }

    fn registry_with(session: Arc<FakeSession>) -> (Arc<FakeConnector>, ClientRegistry) {
        let connector = Arc::new(FakeConnector::new(session));
        (connector.clone(), ClientRegistry::new(connector))
    }

    fn auth_request(
        phone: Option<&str>,
        code: Option<&str>,
        password: Option<&str>,
    ) -> TelegramAuthRequest {
        TelegramAuthRequest {
            phone_number: phone.map(str::to_string),
            verification_code: code.map(str::to_string),
            password: password.map(str::to_string),
        }
    }

    async fn stored_account(pool: &SqlitePool, account_id: &str) -> TelegramAccount {
        find_account(pool, account_id, "owner")
            .await
            .unwrap()
            .unwrap()
    }

    #[actix_web::test]
    async fn no_input_reports_code_needed_without_side_effects() {
        let pool = test_pool().await;
        let (connector, registry) = registry_with(Arc::new(FakeSession::new()));
        let (account, _) = create_account(&pool, &registry, "owner", "+15551234567", 12345, "h")
            .await
            .unwrap();
        registry.release(&account.id).await.unwrap();
        let connects_before = connector.connects.load(Ordering::SeqCst);

        let response = authenticate(&pool, &registry, &account, &auth_request(None, None, None))
            .await
            .unwrap();

        assert_eq!(response.auth_step, AuthStep::CodeNeeded);
        assert_eq!(connector.connects.load(Ordering::SeqCst), connects_before);
        assert!(!registry.contains(&account.id).await);
        let stored = stored_account(&pool, &account.id).await;
        assert_eq!(stored.session_string, None);
    }

    #[actix_web::test]
    async fn two_factor_login_persists_session_only_on_success() {
        let pool = test_pool().await;
        let session = Arc::new(FakeSession {
            two_factor: true,
            profile: ProfileInfo {
                peer_id: 7,
                first_name: Some("Ann".into()),
                last_name: None,
                username: Some("ann".into()),
            },
            ..FakeSession::new()
        });
        let (_, registry) = registry_with(session);

        let (account, is_authorized) =
            create_account(&pool, &registry, "owner", "+15551234567", 12345, "h")
                .await
                .unwrap();
        assert!(!is_authorized);

        let response = authenticate(
            &pool,
            &registry,
            &account,
            &auth_request(Some("+15551234567"), None, None),
        )
        .await
        .unwrap();
        assert_eq!(response.auth_step, AuthStep::CodeNeeded);

        let response = authenticate(
            &pool,
            &registry,
            &account,
            &auth_request(None, Some("12345"), None),
        )
        .await
        .unwrap();
        assert_eq!(response.auth_step, AuthStep::PasswordNeeded);
        assert_eq!(stored_account(&pool, &account.id).await.session_string, None);

        let response = authenticate(
            &pool,
            &registry,
            &account,
            &auth_request(None, None, Some("secret")),
        )
        .await
        .unwrap();
        assert_eq!(response.auth_step, AuthStep::Success);

        let stored = stored_account(&pool, &account.id).await;
        assert_eq!(stored.session_string.as_deref(), Some("opaque-session-blob"));
        assert_eq!(stored.first_name.as_deref(), Some("Ann"));
        assert_eq!(stored.username.as_deref(), Some("ann"));

        let views = list_accounts(&pool, &registry, "owner").await.unwrap();
        assert_eq!(views.len(), 1);
        assert!(views[0].is_authorized);
    }

    #[actix_web::test]
    async fn finished_login_short_circuits_to_success() {
        let pool = test_pool().await;
        let (_, registry) = registry_with(Arc::new(FakeSession::new()));
        let (account, _) = create_account(&pool, &registry, "owner", "+15551234567", 12345, "h")
            .await
            .unwrap();

        authenticate(
            &pool,
            &registry,
            &account,
            &auth_request(None, Some("12345"), None),
        )
        .await
        .unwrap();

        // Resubmitting a code, even a bad one, reports the current status.
        let response = authenticate(
            &pool,
            &registry,
            &account,
            &auth_request(None, Some("invalid"), None),
        )
        .await
        .unwrap();
        assert_eq!(response.auth_step, AuthStep::Success);
    }

    #[actix_web::test]
    async fn authenticate_reuses_the_registered_client() {
        let pool = test_pool().await;
        let (connector, registry) = registry_with(Arc::new(FakeSession::new()));
        let (account, _) = create_account(&pool, &registry, "owner", "+15551234567", 12345, "h")
            .await
            .unwrap();

        authenticate(
            &pool,
            &registry,
            &account,
            &auth_request(Some("+15551234567"), None, None),
        )
        .await
        .unwrap();

        // One connect from create_account, none from authenticate.
        assert_eq!(connector.connects.load(Ordering::SeqCst), 1);
    }

    #[actix_web::test]
    async fn phone_submission_updates_a_changed_number() {
        let pool = test_pool().await;
        let (_, registry) = registry_with(Arc::new(FakeSession::new()));
        let (account, _) = create_account(&pool, &registry, "owner", "+15551234567", 12345, "h")
            .await
            .unwrap();

        authenticate(
            &pool,
            &registry,
            &account,
            &auth_request(Some("+15559876543"), None, None),
        )
        .await
        .unwrap();

        let stored = stored_account(&pool, &account.id).await;
        assert_eq!(stored.phone_number, "+15559876543");
    }

    #[actix_web::test]
    async fn failed_code_request_leaves_persisted_state_alone() {
        let pool = test_pool().await;
        let (_, registry) = registry_with(Arc::new(FakeSession {
            fail_code_request: true,
            ..FakeSession::new()
        }));
        let (account, _) = create_account(&pool, &registry, "owner", "+15551234567", 12345, "h")
            .await
            .unwrap();

        let result = authenticate(
            &pool,
            &registry,
            &account,
            &auth_request(Some("+15559876543"), None, None),
        )
        .await;

        assert!(matches!(result, Err(TelegramError::Auth(_))));
        let stored = stored_account(&pool, &account.id).await;
        assert_eq!(stored.phone_number, "+15551234567");
    }

    #[actix_web::test]
    async fn profile_refresh_failure_does_not_undo_the_login() {
        let pool = test_pool().await;
        let (_, registry) = registry_with(Arc::new(FakeSession {
            fail_profile: true,
            ..FakeSession::new()
        }));
        let (account, _) = create_account(&pool, &registry, "owner", "+15551234567", 12345, "h")
            .await
            .unwrap();

        let response = authenticate(
            &pool,
            &registry,
            &account,
            &auth_request(None, Some("12345"), None),
        )
        .await
        .unwrap();

        assert_eq!(response.auth_step, AuthStep::Success);
        let stored = stored_account(&pool, &account.id).await;
        assert_eq!(stored.session_string.as_deref(), Some("opaque-session-blob"));
        assert_eq!(stored.first_name, None);
    }

    #[actix_web::test]
    async fn session_round_trip_restores_authorization() {
        let pool = test_pool().await;
        let session = Arc::new(FakeSession::new());
        let connector = Arc::new(FakeConnector {
            authorize_from_session: true,
            ..FakeConnector::new(session)
        });
        let registry = ClientRegistry::new(connector.clone());

        let (account, is_authorized) =
            create_account(&pool, &registry, "owner", "+15551234567", 12345, "h")
                .await
                .unwrap();
        assert!(!is_authorized);

        authenticate(
            &pool,
            &registry,
            &account,
            &auth_request(None, Some("12345"), None),
        )
        .await
        .unwrap();
        registry.release(&account.id).await.unwrap();

        // Reconnecting from the stored credential restores authorization.
        let stored = stored_account(&pool, &account.id).await;
        let restored = obtain_session(&registry, &stored).await.unwrap();
        assert!(restored.is_authorized().await.unwrap());
        assert_eq!(connector.connects.load(Ordering::SeqCst), 2);
    }

    #[actix_web::test]
    async fn delete_account_removes_the_row_even_when_logout_fails() {
        let pool = test_pool().await;
        let (_, registry) = registry_with(Arc::new(FakeSession {
            fail_sign_out: true,
            ..FakeSession::new()
        }));
        let (account, _) = create_account(&pool, &registry, "owner", "+15551234567", 12345, "h")
            .await
            .unwrap();
        assert!(registry.contains(&account.id).await);

        delete_account(&pool, &registry, &account).await.unwrap();

        assert!(find_account(&pool, &account.id, "owner")
            .await
            .unwrap()
            .is_none());
    }

    #[actix_web::test]
    async fn logout_reports_whether_a_client_was_active() {
        let pool = test_pool().await;
        let (_, registry) = registry_with(Arc::new(FakeSession::new()));
        let (account, _) = create_account(&pool, &registry, "owner", "+15551234567", 12345, "h")
            .await
            .unwrap();

        assert!(logout(&registry, &account.id).await.unwrap());
        assert!(!logout(&registry, &account.id).await.unwrap());
    }

    fn two_dialog_batch() -> DialogBatch {
        DialogBatch {
            dialogs: vec![
                DialogSummary {
                    user_id: Some(1),
                    unread_count: 3,
                    ..DialogSummary::default()
                },
                DialogSummary {
                    channel_id: Some(2),
                    unread_count: 0,
                    ..DialogSummary::default()
                },
            ],
            peers: vec![
                PeerInfo::User {
                    id: 1,
                    first_name: "Ann".into(),
                    last_name: None,
                },
                PeerInfo::Group {
                    id: 2,
                    title: "Team".into(),
                },
                // Listed without a dialog entry, unread defaults to 0.
                PeerInfo::User {
                    id: 3,
                    first_name: "Bob".into(),
                    last_name: Some("Stone".into()),
                },
            ],
        }
    }

    #[actix_web::test]
    async fn chats_are_titled_and_counted_per_peer() {
        let session = Arc::new(FakeSession {
            dialogs: two_dialog_batch(),
            photos: HashMap::from([(2, b"png".to_vec())]),
            photo_failures: vec![1],
            ..FakeSession::new()
        });
        let session: Arc<dyn TelegramSession> = session;

        let chats = get_chats(&session).await.unwrap();

        assert_eq!(
            chats,
            vec![
                TelegramChat {
                    id: 1,
                    title: "Ann".into(),
                    unread_count: 3,
                    // Download failed; tolerated, thumb simply omitted.
                    thumb: None,
                },
                TelegramChat {
                    id: 2,
                    title: "Team".into(),
                    unread_count: 0,
                    thumb: Some(BASE64.encode(b"png")),
                },
                TelegramChat {
                    id: 3,
                    title: "Bob Stone".into(),
                    unread_count: 0,
                    thumb: None,
                },
            ]
        );
    }

    #[actix_web::test]
    async fn messages_are_bounded_and_keep_provider_order() {
        let date = chrono::Utc::now();
        let messages = (0..5)
            .map(|i| MessageInfo {
                id: 100 - i,
                sender: if i == 0 {
                    None
                } else {
                    Some(SenderInfo {
                        first_name: "Ann".into(),
                        last_name: Some("Lee".into()),
                    })
                },
                text: format!("message {i}"),
                date,
            })
            .collect();
        let session: Arc<dyn TelegramSession> = Arc::new(FakeSession {
            messages,
            ..FakeSession::new()
        });

        let listed = get_messages(&session, 42, 2).await.unwrap();

        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, 100);
        assert_eq!(listed[1].id, 99);
        assert_eq!(listed[0].sender, "Unknown");
        assert_eq!(listed[1].sender, "Ann Lee");
    }
}
