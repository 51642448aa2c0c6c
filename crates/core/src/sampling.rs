//! Topic-filtered sampling for quiz and flashcard sessions.
//!
//! A session starts from the full pool of questions or flashcards, keeps the
//! items whose topic the user selected, clamps the requested count to the
//! filtered pool and draws a random prefix of a shuffled copy.

use std::collections::HashSet;

use rand::Rng;

use crate::model::{Flashcard, Question, Topic};

/// Lower bound on a session size when enough items are available.
pub const MIN_SESSION_SIZE: usize = 5;
/// Upper bound on the number of questions in a single quiz session.
pub const MAX_QUIZ_QUESTIONS: usize = 20;
/// Count the slider starts at before clamping.
pub const DEFAULT_SESSION_SIZE: usize = 10;

/// Anything carrying a topic label.
pub trait Topical {
    fn topic(&self) -> &Topic;
}

impl Topical for Question {
    fn topic(&self) -> &Topic {
        Question::topic(self)
    }
}

impl Topical for Flashcard {
    fn topic(&self) -> &Topic {
        Flashcard::topic(self)
    }
}

/// Distinct topics in first-seen order.
#[must_use]
pub fn available_topics<T: Topical>(pool: &[T]) -> Vec<Topic> {
    let mut seen = HashSet::new();
    pool.iter()
        .map(Topical::topic)
        .filter(|topic| seen.insert((*topic).clone()))
        .cloned()
        .collect()
}

/// Items whose topic is in `selected`. An empty selection selects nothing.
#[must_use]
pub fn filter_by_topics<'a, T: Topical>(pool: &'a [T], selected: &HashSet<Topic>) -> Vec<&'a T> {
    pool.iter()
        .filter(|item| selected.contains(item.topic()))
        .collect()
}

//
// ─── COUNT BOUNDS ──────────────────────────────────────────────────────────────
//

/// Which kind of session a count applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionKind {
    Quiz,
    Flashcards,
}

/// Inclusive range the session-size slider may take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountBounds {
    floor: usize,
    ceiling: usize,
}

impl CountBounds {
    /// Quiz sessions are capped at `MAX_QUIZ_QUESTIONS`.
    #[must_use]
    pub fn for_quiz(available: usize) -> Self {
        Self {
            floor: available.min(MIN_SESSION_SIZE),
            ceiling: available.min(MAX_QUIZ_QUESTIONS),
        }
    }

    #[must_use]
    pub fn for_flashcards(available: usize) -> Self {
        Self {
            floor: available.min(MIN_SESSION_SIZE),
            ceiling: available,
        }
    }

    #[must_use]
    pub fn for_kind(kind: SessionKind, available: usize) -> Self {
        match kind {
            SessionKind::Quiz => Self::for_quiz(available),
            SessionKind::Flashcards => Self::for_flashcards(available),
        }
    }

    #[must_use]
    pub fn floor(&self) -> usize {
        self.floor
    }

    #[must_use]
    pub fn ceiling(&self) -> usize {
        self.ceiling
    }

    #[must_use]
    pub fn clamp(&self, count: usize) -> usize {
        // floor <= ceiling holds for both constructors.
        count.clamp(self.floor, self.ceiling)
    }
}

/// User-adjustable session size that follows the filtered pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountSlider {
    kind: SessionKind,
    bounds: CountBounds,
    value: usize,
}

impl CountSlider {
    #[must_use]
    pub fn new(kind: SessionKind, available: usize) -> Self {
        let bounds = CountBounds::for_kind(kind, available);
        Self {
            kind,
            bounds,
            value: bounds.clamp(DEFAULT_SESSION_SIZE),
        }
    }

    #[must_use]
    pub fn value(&self) -> usize {
        self.value
    }

    #[must_use]
    pub fn bounds(&self) -> CountBounds {
        self.bounds
    }

    /// Set a new count; the stored value is always clamped.
    pub fn set(&mut self, count: usize) -> usize {
        self.value = self.bounds.clamp(count);
        self.value
    }

    /// Recompute the bounds for a new filtered pool size and re-clamp.
    pub fn on_pool_changed(&mut self, available: usize) -> usize {
        self.bounds = CountBounds::for_kind(self.kind, available);
        self.value = self.bounds.clamp(self.value);
        self.value
    }
}

//
// ─── SHUFFLING ─────────────────────────────────────────────────────────────────
//

/// How a pool is permuted before slicing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shuffle {
    /// In-place Fisher–Yates, used for quizzes.
    FisherYates,
    /// Random sort keys followed by a stable sort, used for flashcards.
    Keyed,
}

/// Uniform in-place Fisher–Yates permutation.
pub fn fisher_yates<T, R: Rng>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.random_range(0..=i);
        items.swap(i, j);
    }
}

/// Comparator-based shuffle: every item gets a random key, then the pool is sorted by it.
#[must_use]
pub fn keyed_shuffle<T, R: Rng>(items: Vec<T>, rng: &mut R) -> Vec<T> {
    let mut keyed: Vec<(u64, T)> = items.into_iter().map(|item| (rng.random(), item)).collect();
    keyed.sort_by_key(|(key, _)| *key);
    keyed.into_iter().map(|(_, item)| item).collect()
}

/// Shuffle `pool` and keep the first `count` items.
#[must_use]
pub fn sample<T, R: Rng>(mut pool: Vec<T>, count: usize, shuffle: Shuffle, rng: &mut R) -> Vec<T> {
    pool = match shuffle {
        Shuffle::FisherYates => {
            fisher_yates(&mut pool, rng);
            pool
        }
        Shuffle::Keyed => keyed_shuffle(pool, rng),
    };
    pool.truncate(count);
    pool
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::OPTION_COUNT;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashMap;

    fn question(i: usize, topic: &str) -> Question {
        let options: [String; OPTION_COUNT] =
            ["a".into(), "b".into(), "c".into(), "d".into()];
        Question::new(format!("Q{i}"), options, 0, "", Topic::new(topic).unwrap()).unwrap()
    }

    fn pool() -> Vec<Question> {
        let topics = ["Cardio", "Renal", "Neuro"];
        (0..30).map(|i| question(i, topics[i % 3])).collect()
    }

    fn topics(names: &[&str]) -> HashSet<Topic> {
        names.iter().map(|n| Topic::new(*n).unwrap()).collect()
    }

    #[test]
    fn available_topics_keeps_first_seen_order() {
        let found = available_topics(&pool());
        let names: Vec<_> = found.iter().map(Topic::as_str).collect();
        assert_eq!(names, vec!["Cardio", "Renal", "Neuro"]);
    }

    #[test]
    fn filter_keeps_only_selected_topics() {
        let pool = pool();
        let filtered = filter_by_topics(&pool, &topics(&["Renal"]));
        assert_eq!(filtered.len(), 10);
        assert!(filtered.iter().all(|q| q.topic().as_str() == "Renal"));
        assert!(filter_by_topics(&pool, &HashSet::new()).is_empty());
    }

    #[test]
    fn clamped_count_stays_within_bounds_for_every_subset() {
        let pool = pool();
        let names = ["Cardio", "Renal", "Neuro"];
        for mask in 0_u8..8 {
            let selected: Vec<&str> = names
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, n)| *n)
                .collect();
            let available = filter_by_topics(&pool, &topics(&selected)).len();
            for kind in [SessionKind::Quiz, SessionKind::Flashcards] {
                let bounds = CountBounds::for_kind(kind, available);
                assert!(bounds.ceiling() <= available);
                for requested in 0..40 {
                    let count = bounds.clamp(requested);
                    assert!(bounds.floor() <= count && count <= bounds.ceiling());
                }
            }
        }
    }

    #[test]
    fn quiz_ceiling_caps_at_twenty() {
        assert_eq!(CountBounds::for_quiz(30).ceiling(), MAX_QUIZ_QUESTIONS);
        assert_eq!(CountBounds::for_flashcards(30).ceiling(), 30);
        assert_eq!(CountBounds::for_quiz(3).floor(), 3);
        assert_eq!(CountBounds::for_quiz(0).clamp(10), 0);
    }

    #[test]
    fn slider_reclamps_when_pool_shrinks_and_grows() {
        let mut slider = CountSlider::new(SessionKind::Quiz, 30);
        assert_eq!(slider.value(), DEFAULT_SESSION_SIZE);
        assert_eq!(slider.set(50), 20);
        assert_eq!(slider.on_pool_changed(7), 7);
        assert_eq!(slider.on_pool_changed(2), 2);
        // growing the pool keeps the (re-clamped) value, then raises it to the floor
        assert_eq!(slider.on_pool_changed(30), 5);
    }

    #[test]
    fn seeded_sampling_is_deterministic() {
        let items: Vec<usize> = (0..50).collect();
        for shuffle in [Shuffle::FisherYates, Shuffle::Keyed] {
            let a = sample(items.clone(), 12, shuffle, &mut StdRng::seed_from_u64(42));
            let b = sample(items.clone(), 12, shuffle, &mut StdRng::seed_from_u64(42));
            assert_eq!(a, b);
            assert_eq!(a.len(), 12);
        }
    }

    #[test]
    fn sample_is_a_permutation_prefix() {
        let items: Vec<usize> = (0..25).collect();
        let mut drawn = sample(items.clone(), 25, Shuffle::FisherYates, &mut StdRng::seed_from_u64(1));
        drawn.sort_unstable();
        assert_eq!(drawn, items);
    }

    #[test]
    fn fisher_yates_is_uniform_chi_square() {
        // 4 items → 24 permutations; df = 23, critical value at p = 0.001 is 49.73.
        const TRIALS: usize = 48_000;
        let mut rng = StdRng::seed_from_u64(0x5EED);
        let mut counts: HashMap<[u8; 4], usize> = HashMap::new();
        for _ in 0..TRIALS {
            let mut items = [0_u8, 1, 2, 3];
            fisher_yates(&mut items, &mut rng);
            *counts.entry(items).or_default() += 1;
        }
        assert_eq!(counts.len(), 24);
        let expected = TRIALS as f64 / 24.0;
        let chi_square: f64 = counts
            .values()
            .map(|&observed| {
                let diff = observed as f64 - expected;
                diff * diff / expected
            })
            .sum();
        assert!(chi_square < 49.73, "chi-square too large: {chi_square}");
    }
}
