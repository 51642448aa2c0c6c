use rand::Rng;

use study_core::model::Flashcard;
use study_core::sampling::{SessionKind, Shuffle};

use super::selection::TopicSelection;
use crate::error::FlashcardSessionError;

/// Topic and count selection before a flashcard run.
#[derive(Debug, Clone)]
pub struct FlashcardSetup {
    selection: TopicSelection<Flashcard>,
}

impl FlashcardSetup {
    #[must_use]
    pub fn new(cards: &[Flashcard]) -> Self {
        Self {
            selection: TopicSelection::new(cards.to_vec(), SessionKind::Flashcards),
        }
    }

    #[must_use]
    pub fn selection(&self) -> &TopicSelection<Flashcard> {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut TopicSelection<Flashcard> {
        &mut self.selection
    }

    /// # Errors
    ///
    /// Returns `FlashcardSessionError::Empty` when no card matches.
    pub fn start<R: Rng>(&self, rng: &mut R) -> Result<FlashcardDeck, FlashcardSessionError> {
        FlashcardDeck::new(self.selection.draw(Shuffle::Keyed, rng))
    }
}

/// Which face of the current card is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardFace {
    Term,
    Definition,
}

/// A shuffled run of flashcards with flip and bounded navigation.
#[derive(Debug, Clone)]
pub struct FlashcardDeck {
    cards: Vec<Flashcard>,
    index: usize,
    face: CardFace,
}

impl FlashcardDeck {
    /// # Errors
    ///
    /// Returns `FlashcardSessionError::Empty` for an empty deck.
    pub fn new(cards: Vec<Flashcard>) -> Result<Self, FlashcardSessionError> {
        if cards.is_empty() {
            return Err(FlashcardSessionError::Empty);
        }
        Ok(Self {
            cards,
            index: 0,
            face: CardFace::Term,
        })
    }

    #[must_use]
    pub fn current(&self) -> &Flashcard {
        &self.cards[self.index]
    }

    #[must_use]
    pub fn face(&self) -> CardFace {
        self.face
    }

    /// Text on the visible face.
    #[must_use]
    pub fn visible_text(&self) -> &str {
        match self.face {
            CardFace::Term => self.current().term(),
            CardFace::Definition => self.current().definition(),
        }
    }

    pub fn flip(&mut self) -> CardFace {
        self.face = match self.face {
            CardFace::Term => CardFace::Definition,
            CardFace::Definition => CardFace::Term,
        };
        self.face
    }

    /// Move forward; returns `false` on the last card.
    pub fn next(&mut self) -> bool {
        if self.index + 1 >= self.cards.len() {
            return false;
        }
        self.index += 1;
        self.face = CardFace::Term;
        true
    }

    /// Move back; returns `false` on the first card.
    pub fn previous(&mut self) -> bool {
        if self.index == 0 {
            return false;
        }
        self.index -= 1;
        self.face = CardFace::Term;
        true
    }

    /// One-based position and deck size, e.g. `(3, 12)`.
    #[must_use]
    pub fn position(&self) -> (usize, usize) {
        (self.index + 1, self.cards.len())
    }

    #[must_use]
    pub fn cards(&self) -> &[Flashcard] {
        &self.cards
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use study_core::model::Topic;

    fn cards(count: usize) -> Vec<Flashcard> {
        (0..count)
            .map(|i| {
                Flashcard::new(format!("T{i}"), format!("D{i}"), Topic::new("Cardio").unwrap())
                    .unwrap()
            })
            .collect()
    }

    #[test]
    fn navigation_is_bounded_and_resets_the_face() {
        let mut deck = FlashcardDeck::new(cards(3)).unwrap();
        assert!(!deck.previous());
        assert_eq!(deck.flip(), CardFace::Definition);
        assert_eq!(deck.visible_text(), "D0");
        assert!(deck.next());
        assert_eq!(deck.face(), CardFace::Term);
        assert!(deck.next());
        assert!(!deck.next());
        assert_eq!(deck.position(), (3, 3));
    }

    #[test]
    fn small_pools_use_every_card() {
        let setup = FlashcardSetup::new(&cards(3));
        assert_eq!(setup.selection().count(), 3);
        let deck = setup.start(&mut StdRng::seed_from_u64(5)).unwrap();
        assert_eq!(deck.position(), (1, 3));
    }

    #[test]
    fn empty_deck_is_rejected() {
        assert_eq!(FlashcardDeck::new(Vec::new()).unwrap_err(), FlashcardSessionError::Empty);
    }
}
