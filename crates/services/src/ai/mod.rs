pub mod client;
pub mod prompt;
pub mod response;

pub use client::{AnalysisModel, OpenAiClient};
pub use prompt::{MAX_DOCUMENT_CHARS, build_prompt, response_schema};
pub use response::parse_analysis;
