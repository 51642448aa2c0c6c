use std::sync::Arc;

use tracing::warn;

use storage::repository::PreferencesRepository;
use study_core::model::Theme;

/// Reads and writes the colour-scheme preference.
///
/// Storage failures are logged and never surface: reads fall back to the
/// light theme and writes become no-ops.
#[derive(Clone)]
pub struct PreferencesService {
    repo: Arc<dyn PreferencesRepository>,
}

impl PreferencesService {
    #[must_use]
    pub fn new(repo: Arc<dyn PreferencesRepository>) -> Self {
        Self { repo }
    }

    pub async fn theme(&self) -> Theme {
        match self.repo.get_theme().await {
            Ok(theme) => theme.unwrap_or_default(),
            Err(err) => {
                warn!(error = %err, "failed to read theme preference");
                Theme::default()
            }
        }
    }

    pub async fn set_theme(&self, theme: Theme) {
        if let Err(err) = self.repo.set_theme(theme).await {
            warn!(error = %err, theme = theme.as_str(), "failed to persist theme preference");
        }
    }

    /// Flip between light and dark and persist the result.
    pub async fn toggle_theme(&self) -> Theme {
        let next = self.theme().await.toggled();
        self.set_theme(next).await;
        next
    }
}
