mod api_key;
mod flashcards;
mod library;
mod quiz;
mod results;
mod settings;
mod state;
mod topic_picker;
mod upload;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use api_key::ApiKeyView;
pub use flashcards::FlashcardsView;
pub use library::LibraryView;
pub use quiz::QuizView;
pub use results::ResultsView;
pub use settings::SettingsView;
pub use state::{ViewError, ViewState, view_state_from_resource};
pub use topic_picker::TopicPicker;
pub use upload::UploadView;
