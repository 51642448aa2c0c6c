mod flashcard_vm;
mod library_vm;
mod quiz_vm;
mod selection_vm;
mod summary_vm;
mod time_fmt;

pub use flashcard_vm::{FlashcardVm, flashcard_vm};
pub use library_vm::{LibraryGroupVm, LibraryItemVm, map_library_groups};
pub use quiz_vm::{OptionState, OptionVm, OutcomeVm, QuestionVm, outcome_vm, question_vm};
pub use selection_vm::{CountSliderVm, TopicChipVm, count_slider, topic_chips};
pub use summary_vm::sanitize_summary;
pub use time_fmt::{format_datetime, format_score};
