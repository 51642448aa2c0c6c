use services::TopicSelection;
use study_core::model::Topic;
use study_core::sampling::Topical;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TopicChipVm {
    pub topic: Topic,
    pub selected: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CountSliderVm {
    pub min: usize,
    pub max: usize,
    pub value: usize,
    pub available: usize,
}

impl CountSliderVm {
    /// Nothing to choose between when the bounds collapse.
    #[must_use]
    pub fn is_fixed(&self) -> bool {
        self.min == self.max
    }

    #[must_use]
    pub fn can_start(&self) -> bool {
        self.value > 0
    }
}

#[must_use]
pub fn topic_chips<T: Topical + Clone>(selection: &TopicSelection<T>) -> Vec<TopicChipVm> {
    selection
        .topics()
        .iter()
        .map(|topic| TopicChipVm {
            topic: topic.clone(),
            selected: selection.is_selected(topic),
        })
        .collect()
}

#[must_use]
pub fn count_slider<T: Topical + Clone>(selection: &TopicSelection<T>) -> CountSliderVm {
    let bounds = selection.bounds();
    CountSliderVm {
        min: bounds.floor(),
        max: bounds.ceiling(),
        value: selection.count(),
        available: selection.filtered_len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use study_core::model::Flashcard;
    use study_core::sampling::SessionKind;

    #[test]
    fn chips_and_slider_follow_the_selection() {
        let cards: Vec<Flashcard> = ["Cardio", "Renal", "Cardio"]
            .iter()
            .enumerate()
            .map(|(i, topic)| {
                Flashcard::new(format!("t{i}"), "d", Topic::new(*topic).unwrap()).unwrap()
            })
            .collect();
        let mut selection = TopicSelection::new(cards, SessionKind::Flashcards);
        let renal = Topic::new("Renal").unwrap();
        selection.toggle(&renal);

        let chips = topic_chips(&selection);
        assert_eq!(chips.len(), 2);
        assert!(chips[0].selected);
        assert!(!chips[1].selected);

        let slider = count_slider(&selection);
        assert_eq!(slider.available, 2);
        assert_eq!((slider.min, slider.max, slider.value), (2, 2, 2));
        assert!(slider.is_fixed());
        assert!(slider.can_start());
    }
}
