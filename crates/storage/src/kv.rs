//! Typed repositories layered over a [`KeyValueStore`].
//!
//! Every concern lives under one key as one JSON document, read-modify-written
//! as a whole. Nothing here is transactional: two writers racing on the same
//! key can lose an update.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use study_core::model::{ArticleId, QuizProgress, SavedArticle, Theme};

use crate::keys;
use crate::repository::{
    CredentialRepository, KeyValueStore, LibraryRepository, PreferencesRepository,
    ProgressRepository, StorageError,
};

#[derive(Clone)]
pub struct KvRepository {
    store: Arc<dyn KeyValueStore>,
}

impl KvRepository {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    async fn read_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        let Some(raw) = self.store.get(key).await? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|err| StorageError::Serialization(err.to_string()))
    }

    async fn write_json<T: Serialize + ?Sized + Sync>(
        &self,
        key: &str,
        value: &T,
    ) -> Result<(), StorageError> {
        let raw = serde_json::to_string(value)
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        self.store.set(key, &raw).await
    }

    /// Library list in stored order. An unreadable list reads as empty and is
    /// overwritten by the next write.
    async fn read_library(&self) -> Result<Vec<SavedArticle>, StorageError> {
        match self.read_json::<Vec<SavedArticle>>(keys::LIBRARY).await {
            Ok(list) => Ok(list.unwrap_or_default()),
            Err(StorageError::Serialization(err)) => {
                tracing::warn!(error = %err, "saved library is unreadable, treating as empty");
                Ok(Vec::new())
            }
            Err(err) => Err(err),
        }
    }
}

fn newest_first(mut articles: Vec<SavedArticle>) -> Vec<SavedArticle> {
    articles.sort_by(|a, b| b.saved_at().cmp(&a.saved_at()));
    articles
}

#[async_trait]
impl LibraryRepository for KvRepository {
    async fn list_articles(&self) -> Result<Vec<SavedArticle>, StorageError> {
        Ok(newest_first(self.read_library().await?))
    }

    async fn prepend_article(
        &self,
        article: &SavedArticle,
    ) -> Result<Vec<SavedArticle>, StorageError> {
        let mut list = self.read_library().await?;
        list.insert(0, article.clone());
        self.write_json(keys::LIBRARY, &list).await?;
        tracing::debug!(id = %article.id(), total = list.len(), "article saved");
        Ok(newest_first(list))
    }

    async fn delete_article(&self, id: &ArticleId) -> Result<Vec<SavedArticle>, StorageError> {
        let mut list = self.read_library().await?;
        let before = list.len();
        list.retain(|article| article.id() != id);
        self.write_json(keys::LIBRARY, &list).await?;
        tracing::debug!(%id, removed = before - list.len(), "article deleted");
        Ok(newest_first(list))
    }
}

#[async_trait]
impl ProgressRepository for KvRepository {
    async fn load_progress(&self) -> Result<Option<QuizProgress>, StorageError> {
        self.read_json(keys::QUIZ_PROGRESS).await
    }

    async fn save_progress(&self, progress: &QuizProgress) -> Result<(), StorageError> {
        self.write_json(keys::QUIZ_PROGRESS, progress).await
    }

    async fn clear_progress(&self) -> Result<(), StorageError> {
        self.store.remove(keys::QUIZ_PROGRESS).await
    }
}

#[async_trait]
impl PreferencesRepository for KvRepository {
    async fn get_theme(&self) -> Result<Option<Theme>, StorageError> {
        Ok(self
            .store
            .get(keys::THEME)
            .await?
            .map(|raw| Theme::from_stored(&raw)))
    }

    async fn set_theme(&self, theme: Theme) -> Result<(), StorageError> {
        self.store.set(keys::THEME, theme.as_str()).await
    }
}

#[async_trait]
impl CredentialRepository for KvRepository {
    async fn get_api_key(&self) -> Result<Option<String>, StorageError> {
        Ok(self
            .store
            .get(keys::API_KEY)
            .await?
            .filter(|key| !key.trim().is_empty()))
    }

    async fn set_api_key(&self, key: &str) -> Result<(), StorageError> {
        self.store.set(keys::API_KEY, key.trim()).await
    }

    async fn clear_api_key(&self) -> Result<(), StorageError> {
        self.store.remove(keys::API_KEY).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryStore;
    use chrono::Duration;
    use study_core::model::{
        AnalysisResult, Flashcard, Question, Quiz, QuizSettings, Specialty, Topic,
    };
    use study_core::time::fixed_now;

    fn analysis() -> AnalysisResult {
        let topic = Topic::new("Cardiology").unwrap();
        let question = Question::new(
            "Q?",
            ["a".into(), "b".into(), "c".into(), "d".into()],
            0,
            "because",
            topic.clone(),
        )
        .unwrap();
        let quiz = Quiz::new("Heart", QuizSettings::default(), vec![question]).unwrap();
        let card = Flashcard::new("Preload", "End-diastolic stretch", topic).unwrap();
        AnalysisResult::new("<p>summary</p>", quiz, vec![card]).unwrap()
    }

    fn article(id: &str, minutes: i64) -> SavedArticle {
        SavedArticle::new(
            id.parse().unwrap(),
            format!("{id}.pdf"),
            Specialty::new("Cardiology").unwrap(),
            analysis(),
            fixed_now() + Duration::minutes(minutes),
        )
        .unwrap()
    }

    fn repo() -> (KvRepository, InMemoryStore) {
        let store = InMemoryStore::new();
        (KvRepository::new(Arc::new(store.clone())), store)
    }

    #[tokio::test]
    async fn list_sorts_newest_first_regardless_of_storage_order() {
        let (repo, store) = repo();
        let list = vec![article("old", 0), article("new", 10), article("mid", 5)];
        store
            .set(keys::LIBRARY, &serde_json::to_string(&list).unwrap())
            .await
            .unwrap();

        let listed = repo.list_articles().await.unwrap();
        let ids: Vec<_> = listed.iter().map(|a| a.id().as_str()).collect();
        assert_eq!(ids, vec!["new", "mid", "old"]);
    }

    #[tokio::test]
    async fn save_then_delete_restores_stored_bytes() {
        let (repo, store) = repo();
        repo.prepend_article(&article("a", 0)).await.unwrap();
        repo.prepend_article(&article("b", 1)).await.unwrap();
        let before = store.get(keys::LIBRARY).await.unwrap();

        let added = article("c", 2);
        repo.prepend_article(&added).await.unwrap();
        repo.delete_article(added.id()).await.unwrap();

        assert_eq!(store.get(keys::LIBRARY).await.unwrap(), before);
    }

    #[tokio::test]
    async fn unreadable_library_reads_as_empty_and_is_overwritten() {
        let (repo, store) = repo();
        store.set(keys::LIBRARY, "{not json").await.unwrap();
        assert!(repo.list_articles().await.unwrap().is_empty());

        let saved = repo.prepend_article(&article("x", 0)).await.unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(repo.list_articles().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn unreadable_progress_is_a_serialization_error() {
        let (repo, store) = repo();
        store.set(keys::QUIZ_PROGRESS, "[]").await.unwrap();
        let err = repo.load_progress().await.unwrap_err();
        assert!(matches!(err, StorageError::Serialization(_)));
    }

    #[tokio::test]
    async fn theme_and_credential_round_trip() {
        let (repo, _store) = repo();
        assert_eq!(repo.get_theme().await.unwrap(), None);
        repo.set_theme(Theme::Dark).await.unwrap();
        assert_eq!(repo.get_theme().await.unwrap(), Some(Theme::Dark));

        repo.set_api_key("  sk-test  ").await.unwrap();
        assert_eq!(repo.get_api_key().await.unwrap().as_deref(), Some("sk-test"));
        repo.clear_api_key().await.unwrap();
        assert_eq!(repo.get_api_key().await.unwrap(), None);
    }
}
