use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{info, warn};

use storage::repository::CredentialRepository;

use crate::ai::AnalysisModel;
use crate::error::{AiError, CredentialError};

/// Resolves, validates and forgets the API key.
///
/// The key entered by the user lives in the session-scoped store and wins
/// over the environment fallback. A rejected key is dropped from wherever
/// it came from.
pub struct CredentialService {
    repo: Arc<dyn CredentialRepository>,
    model: Arc<dyn AnalysisModel>,
    env_key: Option<String>,
    env_rejected: AtomicBool,
}

impl CredentialService {
    #[must_use]
    pub fn new(
        repo: Arc<dyn CredentialRepository>,
        model: Arc<dyn AnalysisModel>,
        env_key: Option<String>,
    ) -> Self {
        Self {
            repo,
            model,
            env_key: env_key
                .map(|key| key.trim().to_string())
                .filter(|key| !key.is_empty()),
            env_rejected: AtomicBool::new(false),
        }
    }

    /// The key to use for the next request, if any.
    pub async fn current_key(&self) -> Option<String> {
        match self.repo.get_api_key().await {
            Ok(Some(key)) => return Some(key),
            Ok(None) => {}
            Err(err) => warn!(error = %err, "failed to read session api key"),
        }
        if self.env_rejected.load(Ordering::Relaxed) {
            return None;
        }
        self.env_key.clone()
    }

    pub async fn has_key(&self) -> bool {
        self.current_key().await.is_some()
    }

    /// Validate `key` against the provider and keep it for this session.
    ///
    /// # Errors
    ///
    /// Returns `CredentialError::Empty` for a blank key,
    /// `CredentialError::Validation` when the provider rejects it or cannot be
    /// reached, and `CredentialError::Storage` if it cannot be stored.
    pub async fn submit_key(&self, key: &str) -> Result<(), CredentialError> {
        let key = key.trim();
        if key.is_empty() {
            return Err(CredentialError::Empty);
        }
        self.model.validate_key(key).await?;
        self.repo.set_api_key(key).await?;
        info!("api key accepted");
        Ok(())
    }

    /// Check the current key, clearing it if the provider rejects it.
    ///
    /// Returns `false` when there is no usable key afterwards.
    ///
    /// # Errors
    ///
    /// Returns `CredentialError::Validation` for failures other than a
    /// rejected key (network, unexpected status).
    pub async fn revalidate(&self) -> Result<bool, CredentialError> {
        let Some(key) = self.current_key().await else {
            return Ok(false);
        };
        match self.model.validate_key(&key).await {
            Ok(()) => Ok(true),
            Err(AiError::Unauthorized) => {
                self.reject().await;
                Ok(false)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Drop the current key after the provider rejected it.
    ///
    /// Only the key that was in use is dropped: a rejected session key falls
    /// back to the environment key, which is disabled only once it was the
    /// one rejected.
    pub async fn reject(&self) {
        let session_key = match self.repo.get_api_key().await {
            Ok(key) => key,
            Err(err) => {
                warn!(error = %err, "failed to read session api key");
                None
            }
        };
        if session_key.is_some() {
            warn!("session api key rejected by provider; clearing it");
            if let Err(err) = self.repo.clear_api_key().await {
                warn!(error = %err, "failed to clear session api key");
            }
        } else if self.env_key.is_some() {
            warn!("environment api key rejected by provider; disabling it");
            self.env_rejected.store(true, Ordering::Relaxed);
        }
    }

    /// Forget the key the user entered for this session.
    ///
    /// # Errors
    ///
    /// Returns `CredentialError::Storage` if the session store fails.
    pub async fn forget(&self) -> Result<(), CredentialError> {
        self.repo.clear_api_key().await?;
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use storage::repository::Storage;

    /// Model double that accepts one key and answers with canned content.
    pub(crate) struct FakeModel {
        pub accepted_key: &'static str,
        pub content: Mutex<Result<String, ()>>,
        pub prompts: Mutex<Vec<String>>,
    }

    impl FakeModel {
        pub(crate) fn new(accepted_key: &'static str, content: impl Into<String>) -> Self {
            Self {
                accepted_key,
                content: Mutex::new(Ok(content.into())),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl AnalysisModel for FakeModel {
        async fn generate(&self, api_key: &str, prompt: &str) -> Result<String, AiError> {
            self.validate_key(api_key).await?;
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.content
                .lock()
                .unwrap()
                .clone()
                .map_err(|()| AiError::EmptyResponse)
        }

        async fn validate_key(&self, api_key: &str) -> Result<(), AiError> {
            if api_key == self.accepted_key {
                Ok(())
            } else {
                Err(AiError::Unauthorized)
            }
        }
    }

    fn service(env_key: Option<&str>) -> CredentialService {
        let storage = Storage::in_memory();
        CredentialService::new(
            storage.credentials,
            Arc::new(FakeModel::new("sk-good", "{}")),
            env_key.map(str::to_string),
        )
    }

    #[tokio::test]
    async fn session_key_wins_over_env() {
        let svc = service(Some("sk-env"));
        assert_eq!(svc.current_key().await.as_deref(), Some("sk-env"));
        svc.submit_key("  sk-good ").await.unwrap();
        assert_eq!(svc.current_key().await.as_deref(), Some("sk-good"));
    }

    #[tokio::test]
    async fn rejected_key_is_not_stored() {
        let svc = service(None);
        let err = svc.submit_key("sk-bad").await.unwrap_err();
        assert!(matches!(err, CredentialError::Validation(AiError::Unauthorized)));
        assert!(!svc.has_key().await);
        assert!(matches!(svc.submit_key("   ").await, Err(CredentialError::Empty)));
    }

    #[tokio::test]
    async fn revalidate_clears_a_rejected_env_key() {
        let svc = service(Some("sk-stale"));
        assert!(!svc.revalidate().await.unwrap());
        assert_eq!(svc.current_key().await, None);
        svc.submit_key("sk-good").await.unwrap();
        assert!(svc.revalidate().await.unwrap());
    }

    #[tokio::test]
    async fn rejected_session_key_falls_back_to_env() {
        let storage = Storage::in_memory();
        storage.credentials.set_api_key("sk-revoked").await.unwrap();
        let svc = CredentialService::new(
            Arc::clone(&storage.credentials),
            Arc::new(FakeModel::new("sk-env", "{}")),
            Some("sk-env".into()),
        );
        assert_eq!(svc.current_key().await.as_deref(), Some("sk-revoked"));

        svc.reject().await;
        assert_eq!(storage.credentials.get_api_key().await.unwrap(), None);
        assert_eq!(svc.current_key().await.as_deref(), Some("sk-env"));
        assert!(svc.revalidate().await.unwrap());
    }
}
