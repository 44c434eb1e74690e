use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::error::TelegramError;
use crate::models::TelegramAccount;
use crate::services::client::{TelegramConnector, TelegramSession};

/// Process-wide map from account id to its single live protocol client.
///
/// The async mutex is held across the connect in [`obtain`], so the
/// check-then-insert sequence is serialized and two concurrent requests for
/// the same never-yet-registered account cannot open duplicate connections.
///
/// [`obtain`]: ClientRegistry::obtain
pub struct ClientRegistry {
    connector: Arc<dyn TelegramConnector>,
    clients: Mutex<HashMap<String, Arc<dyn TelegramSession>>>,
}

impl ClientRegistry {
    pub fn new(connector: Arc<dyn TelegramConnector>) -> Self {
        Self {
            connector,
            clients: Mutex::new(HashMap::new()),
        }
    }

    /// Return the live client for `account`, connecting and registering a
    /// new one from the stored credential if none exists yet.
    ///
    /// A connect failure surfaces as [`TelegramError::Connection`]; callers
    /// that need the account to be usable must probe authorization
    /// themselves afterwards.
    pub async fn obtain(
        &self,
        account: &TelegramAccount,
    ) -> Result<Arc<dyn TelegramSession>, TelegramError> {
        let mut clients = self.clients.lock().await;

        if let Some(session) = clients.get(&account.id) {
            return Ok(session.clone());
        }

        let session = self.connector.connect(account).await?;
        clients.insert(account.id.clone(), session.clone());
        info!(account_id = %account.id, "registered new Telegram client");

        Ok(session)
    }

    /// Return the registered client or [`TelegramError::NotRegistered`].
    pub async fn lookup(
        &self,
        account_id: &str,
    ) -> Result<Arc<dyn TelegramSession>, TelegramError> {
        self.clients
            .lock()
            .await
            .get(account_id)
            .cloned()
            .ok_or_else(|| TelegramError::NotRegistered(account_id.to_string()))
    }

    pub async fn contains(&self, account_id: &str) -> bool {
        self.clients.lock().await.contains_key(account_id)
    }

    /// Log out, disconnect and deregister the account's client.
    ///
    /// Returns `Ok(false)` when no client was registered; that is not an
    /// error, releasing twice is fine. A failed provider log-out leaves the
    /// client registered and propagates.
    pub async fn release(&self, account_id: &str) -> Result<bool, TelegramError> {
        let mut clients = self.clients.lock().await;

        let Some(session) = clients.get(account_id).cloned() else {
            debug!(account_id, "release requested for unregistered account");
            return Ok(false);
        };

        session.sign_out().await?;
        session.disconnect().await;
        clients.remove(account_id);
        info!(account_id, "released Telegram client");

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;
    use std::time::Duration;

    use super::*;
    use crate::services::client::testing::{FakeConnector, FakeSession};

    fn account(id: &str) -> TelegramAccount {
        TelegramAccount {
            id: id.to_string(),
            phone_number: "+15551234567".to_string(),
            api_id: 12345,
            api_hash: "hash".to_string(),
            session_string: None,
            first_name: None,
            last_name: None,
            username: None,
            photo: None,
            is_active: true,
            created_at: chrono::Utc::now().to_rfc3339(),
            owner_id: "owner".to_string(),
        }
    }

    #[actix_web::test]
    async fn obtain_registers_once_and_reuses_the_handle() {
        let connector = Arc::new(FakeConnector::new(Arc::new(FakeSession::new())));
        let registry = ClientRegistry::new(connector.clone());
        let acc = account("acc-1");

        registry.obtain(&acc).await.unwrap();
        registry.obtain(&acc).await.unwrap();

        assert_eq!(connector.connects.load(Ordering::SeqCst), 1);
        assert!(registry.contains("acc-1").await);
    }

    #[actix_web::test]
    async fn concurrent_obtains_create_a_single_connection() {
        let mut connector = FakeConnector::new(Arc::new(FakeSession::new()));
        connector.connect_delay = Duration::from_millis(20);
        let connector = Arc::new(connector);
        let registry = Arc::new(ClientRegistry::new(connector.clone()));

        let mut tasks = Vec::new();
        for _ in 0..8 {
            let registry = registry.clone();
            let acc = account("acc-1");
            tasks.push(tokio::spawn(async move { registry.obtain(&acc).await }));
        }
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        assert_eq!(connector.connects.load(Ordering::SeqCst), 1);
    }

    #[actix_web::test]
    async fn lookup_miss_reports_not_registered() {
        let registry = ClientRegistry::new(Arc::new(FakeConnector::new(Arc::new(
            FakeSession::new(),
        ))));

        match registry.lookup("missing").await {
            Err(TelegramError::NotRegistered(id)) => assert_eq!(id, "missing"),
            other => panic!("expected NotRegistered, got {other:?}"),
        }
    }

    #[actix_web::test]
    async fn release_is_idempotent() {
        let session = Arc::new(FakeSession::authorized());
        let registry = ClientRegistry::new(Arc::new(FakeConnector::new(session.clone())));
        let acc = account("acc-1");

        registry.obtain(&acc).await.unwrap();

        assert!(registry.release("acc-1").await.unwrap());
        assert!(session.signed_out.load(Ordering::SeqCst));
        assert!(session.disconnected.load(Ordering::SeqCst));
        assert!(!registry.contains("acc-1").await);

        // Second release finds nothing and must not error.
        assert!(!registry.release("acc-1").await.unwrap());
    }

    #[actix_web::test]
    async fn failed_sign_out_keeps_the_client_registered() {
        let session = Arc::new(FakeSession {
            fail_sign_out: true,
            ..FakeSession::new()
        });
        let registry = ClientRegistry::new(Arc::new(FakeConnector::new(session)));
        let acc = account("acc-1");

        registry.obtain(&acc).await.unwrap();

        assert!(matches!(
            registry.release("acc-1").await,
            Err(TelegramError::Connection(_))
        ));
        assert!(registry.contains("acc-1").await);
    }
}
