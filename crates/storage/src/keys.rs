//! Storage keys. One key per concern, each holding a single JSON document.

/// Saved-article library (JSON array, newest first).
pub const LIBRARY: &str = "studyAid.savedArticles";

/// In-flight quiz progress snapshot (JSON object).
pub const QUIZ_PROGRESS: &str = "studyAid.quizProgress";

/// Theme preference (`"light"` or `"dark"`).
pub const THEME: &str = "studyAid.theme";

/// Manually entered API credential. Lives in the session store only.
pub const API_KEY: &str = "studyAid.apiKey";
