use std::collections::HashSet;

use rand::Rng;

use study_core::model::Topic;
use study_core::sampling::{
    CountBounds, CountSlider, SessionKind, Shuffle, Topical, available_topics, filter_by_topics,
    sample,
};

/// Topic checkboxes plus the session-size slider shared by quiz and
/// flashcard setup screens.
///
/// Every topic starts selected. Any change to the selection re-clamps the
/// slider to the new filtered pool.
#[derive(Debug, Clone)]
pub struct TopicSelection<T> {
    pool: Vec<T>,
    topics: Vec<Topic>,
    selected: HashSet<Topic>,
    slider: CountSlider,
}

impl<T: Topical + Clone> TopicSelection<T> {
    #[must_use]
    pub fn new(pool: Vec<T>, kind: SessionKind) -> Self {
        let topics = available_topics(&pool);
        let selected: HashSet<Topic> = topics.iter().cloned().collect();
        let slider = CountSlider::new(kind, pool.len());
        Self {
            pool,
            topics,
            selected,
            slider,
        }
    }

    /// Topics in the order they first appear in the pool.
    #[must_use]
    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    #[must_use]
    pub fn is_selected(&self, topic: &Topic) -> bool {
        self.selected.contains(topic)
    }

    #[must_use]
    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    pub fn toggle(&mut self, topic: &Topic) {
        if !self.selected.remove(topic) && self.topics.contains(topic) {
            self.selected.insert(topic.clone());
        }
        self.refresh();
    }

    pub fn select_all(&mut self) {
        self.selected = self.topics.iter().cloned().collect();
        self.refresh();
    }

    pub fn clear(&mut self) {
        self.selected.clear();
        self.refresh();
    }

    /// Set the requested count; returns the clamped value.
    pub fn set_count(&mut self, count: usize) -> usize {
        self.slider.set(count)
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.slider.value()
    }

    #[must_use]
    pub fn bounds(&self) -> CountBounds {
        self.slider.bounds()
    }

    #[must_use]
    pub fn filtered(&self) -> Vec<&T> {
        filter_by_topics(&self.pool, &self.selected)
    }

    #[must_use]
    pub fn filtered_len(&self) -> usize {
        self.filtered().len()
    }

    /// Shuffle the filtered pool and keep `count()` items.
    pub fn draw<R: Rng>(&self, shuffle: Shuffle, rng: &mut R) -> Vec<T> {
        let filtered: Vec<T> = self.filtered().into_iter().cloned().collect();
        sample(filtered, self.count(), shuffle, rng)
    }

    fn refresh(&mut self) {
        let available = self.filtered_len();
        self.slider.on_pool_changed(available);
    }
}
