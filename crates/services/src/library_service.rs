use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{info, warn};

use storage::repository::LibraryRepository;
use study_core::model::{AnalysisResult, ArticleId, SavedArticle, Specialty};

use crate::Clock;
use crate::error::LibraryServiceError;

/// What the user provides when saving an analysis to the library.
#[derive(Debug, Clone)]
pub struct SaveArticleDraft {
    pub file_name: String,
    pub specialty: String,
    pub analysis: AnalysisResult,
}

/// What a save left behind.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveOutcome {
    /// Id of the stored article; `None` when storage refused the write.
    pub saved: Option<ArticleId>,
    /// The library after the save, newest first.
    pub articles: Vec<SavedArticle>,
}

/// Saved articles sharing one specialty, newest first.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecialtyGroup {
    pub specialty: Specialty,
    pub articles: Vec<SavedArticle>,
}

/// The local library of saved analyses.
///
/// Storage failures are logged and degrade: reads return an empty list and
/// writes leave the library as it was.
#[derive(Clone)]
pub struct LibraryService {
    clock: Clock,
    repo: Arc<dyn LibraryRepository>,
}

impl LibraryService {
    #[must_use]
    pub fn new(clock: Clock, repo: Arc<dyn LibraryRepository>) -> Self {
        Self { clock, repo }
    }

    /// All saved articles, newest first.
    pub async fn list(&self) -> Vec<SavedArticle> {
        self.repo.list_articles().await.unwrap_or_else(|err| {
            warn!(error = %err, "failed to read library");
            Vec::new()
        })
    }

    pub async fn get(&self, id: &ArticleId) -> Option<SavedArticle> {
        self.list().await.into_iter().find(|article| article.id() == id)
    }

    /// Save an analysis and return the updated library.
    ///
    /// # Errors
    ///
    /// Returns `LibraryServiceError` when the specialty or file name is
    /// blank. Storage failures are not errors; the outcome carries no id and
    /// the current list.
    pub async fn save(&self, draft: SaveArticleDraft) -> Result<SaveOutcome, LibraryServiceError> {
        let specialty = Specialty::new(draft.specialty)?;
        let saved_at = self.clock.now();
        let id = ArticleId::generate(saved_at, &mut rand::rng());
        let article = SavedArticle::new(id, draft.file_name, specialty, draft.analysis, saved_at)?;

        match self.repo.prepend_article(&article).await {
            Ok(articles) => {
                info!(id = %article.id(), specialty = %article.specialty(), "saved article");
                Ok(SaveOutcome {
                    saved: Some(article.id().clone()),
                    articles,
                })
            }
            Err(err) => {
                warn!(error = %err, "failed to save article");
                Ok(SaveOutcome {
                    saved: None,
                    articles: self.list().await,
                })
            }
        }
    }

    /// Remove an article and return the updated library.
    pub async fn delete(&self, id: &ArticleId) -> Vec<SavedArticle> {
        match self.repo.delete_article(id).await {
            Ok(list) => list,
            Err(err) => {
                warn!(error = %err, id = %id, "failed to delete article");
                self.list().await
            }
        }
    }

    /// Library grouped by specialty, groups in alphabetical order.
    pub async fn by_specialty(&self) -> Vec<SpecialtyGroup> {
        group_by_specialty(self.list().await)
    }
}

/// Group newest-first articles by specialty, keeping their order inside
/// each group.
#[must_use]
pub fn group_by_specialty(articles: Vec<SavedArticle>) -> Vec<SpecialtyGroup> {
    let mut groups: BTreeMap<String, SpecialtyGroup> = BTreeMap::new();
    for article in articles {
        let key = article.specialty().as_str().to_lowercase();
        groups
            .entry(key)
            .or_insert_with(|| SpecialtyGroup {
                specialty: article.specialty().clone(),
                articles: Vec::new(),
            })
            .articles
            .push(article);
    }
    groups.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use storage::repository::{InMemoryStore, KeyValueStore, Storage};
    use study_core::model::{Question, Quiz, QuizSettings, Topic};
    use study_core::time::fixed_now;

    fn analysis() -> AnalysisResult {
        let question = Question::new(
            "Q",
            ["a".into(), "b".into(), "c".into(), "d".into()],
            1,
            "",
            Topic::new("Cardio").unwrap(),
        )
        .unwrap();
        let quiz = Quiz::new("Quiz", QuizSettings::default(), vec![question]).unwrap();
        AnalysisResult::new("<p>s</p>", quiz, Vec::new()).unwrap()
    }

    fn draft(specialty: &str) -> SaveArticleDraft {
        SaveArticleDraft {
            file_name: "notes.pdf".into(),
            specialty: specialty.into(),
            analysis: analysis(),
        }
    }

    #[tokio::test]
    async fn save_prepends_and_delete_restores() {
        let svc = LibraryService::new(Clock::fixed(fixed_now()), Storage::in_memory().library);
        let first = svc.save(draft("Cardiology")).await.unwrap().articles;
        assert_eq!(first.len(), 1);

        let outcome = svc.save(draft("Nephrology")).await.unwrap();
        let with_second = outcome.articles;
        assert_eq!(with_second.len(), 2);
        let new_id = with_second[0].id().clone();
        assert_eq!(outcome.saved.as_ref(), Some(&new_id));
        assert_eq!(with_second[0].specialty().as_str(), "Nephrology");

        let after_delete = svc.delete(&new_id).await;
        assert_eq!(after_delete, first);
        assert_eq!(svc.get(first[0].id()).await.as_ref(), Some(&first[0]));
    }

    #[tokio::test]
    async fn blank_specialty_is_rejected() {
        let svc = LibraryService::new(Clock::fixed(fixed_now()), Storage::in_memory().library);
        assert!(matches!(
            svc.save(draft("   ")).await,
            Err(LibraryServiceError::Label(_))
        ));
        assert!(svc.list().await.is_empty());
    }

    #[tokio::test]
    async fn quota_failure_leaves_library_unchanged() {
        let store: Arc<dyn KeyValueStore> = Arc::new(InMemoryStore::with_quota(64));
        let storage = Storage::from_stores(store, Arc::new(InMemoryStore::new()));
        let svc = LibraryService::new(Clock::fixed(fixed_now()), storage.library);
        let outcome = svc.save(draft("Cardiology")).await.unwrap();
        assert_eq!(outcome.saved, None);
        assert!(outcome.articles.is_empty());
    }

    #[tokio::test]
    async fn failed_save_does_not_report_an_earlier_copy() {
        let one_article = serde_json::to_string(&vec![
            SavedArticle::new(
                ArticleId::generate(fixed_now(), &mut rand::rng()),
                "notes.pdf",
                Specialty::new("Cardiology").unwrap(),
                analysis(),
                fixed_now(),
            )
            .unwrap(),
        ])
        .unwrap()
        .len();
        // Room for one article, not two.
        let quota = storage::keys::LIBRARY.len() + one_article * 3 / 2;
        let store: Arc<dyn KeyValueStore> = Arc::new(InMemoryStore::with_quota(quota));
        let storage = Storage::from_stores(store, Arc::new(InMemoryStore::new()));
        let svc = LibraryService::new(Clock::fixed(fixed_now()), storage.library);

        let first = svc.save(draft("Cardiology")).await.unwrap();
        let earlier = first.saved.expect("first save fits");

        let second = svc.save(draft("Cardiology")).await.unwrap();
        assert_eq!(second.saved, None);
        assert_eq!(second.articles.len(), 1);
        assert_eq!(second.articles[0].id(), &earlier);
        assert_eq!(second.articles[0].analysis(), &analysis());
    }

    #[tokio::test]
    async fn groups_are_alphabetical_and_keep_recency() {
        let mut clock = Clock::fixed(fixed_now());
        let storage = Storage::in_memory();
        for specialty in ["Nephrology", "cardiology", "Nephrology"] {
            let svc = LibraryService::new(clock, Arc::clone(&storage.library));
            svc.save(draft(specialty)).await.unwrap();
            clock.advance(Duration::minutes(1));
        }
        let svc = LibraryService::new(clock, storage.library);
        let groups = svc.by_specialty().await;
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].specialty.as_str(), "cardiology");
        assert_eq!(groups[1].articles.len(), 2);
        assert!(groups[1].articles[0].saved_at() > groups[1].articles[1].saved_at());
    }
}
