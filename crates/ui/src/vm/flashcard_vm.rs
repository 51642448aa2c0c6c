use services::{CardFace, FlashcardDeck};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlashcardVm {
    pub position_label: String,
    pub face_label: &'static str,
    pub text: String,
    pub topic: String,
    pub can_previous: bool,
    pub can_next: bool,
}

#[must_use]
pub fn flashcard_vm(deck: &FlashcardDeck) -> FlashcardVm {
    let (position, total) = deck.position();
    FlashcardVm {
        position_label: format!("{position} / {total}"),
        face_label: match deck.face() {
            CardFace::Term => "Term",
            CardFace::Definition => "Definition",
        },
        text: deck.visible_text().to_string(),
        topic: deck.current().topic().to_string(),
        can_previous: position > 1,
        can_next: position < total,
    }
}
