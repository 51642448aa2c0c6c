use services::SpecialtyGroup;
use study_core::model::{ArticleId, SavedArticle};

use crate::vm::time_fmt::format_datetime;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LibraryItemVm {
    pub id: ArticleId,
    pub file_name: String,
    pub quiz_title: String,
    pub saved_at_str: String,
    pub counts_label: String,
}

impl From<&SavedArticle> for LibraryItemVm {
    fn from(article: &SavedArticle) -> Self {
        let analysis = article.analysis();
        Self {
            id: article.id().clone(),
            file_name: article.file_name().to_string(),
            quiz_title: analysis.quiz().title().to_string(),
            saved_at_str: format_datetime(article.saved_at()),
            counts_label: format!(
                "{} questions · {} flashcards",
                analysis.quiz().questions().len(),
                analysis.flashcards().len()
            ),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LibraryGroupVm {
    pub specialty: String,
    pub items: Vec<LibraryItemVm>,
}

#[must_use]
pub fn map_library_groups(groups: &[SpecialtyGroup]) -> Vec<LibraryGroupVm> {
    groups
        .iter()
        .map(|group| LibraryGroupVm {
            specialty: group.specialty.to_string(),
            items: group.articles.iter().map(LibraryItemVm::from).collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use study_core::model::{
        AnalysisResult, Question, Quiz, QuizSettings, Specialty, Topic,
    };
    use study_core::time::fixed_now;

    #[test]
    fn items_show_title_date_and_counts() {
        let question = Question::new(
            "Q",
            ["a".into(), "b".into(), "c".into(), "d".into()],
            0,
            "",
            Topic::new("Neuro").unwrap(),
        )
        .unwrap();
        let quiz = Quiz::new("Stroke", QuizSettings::default(), vec![question]).unwrap();
        let analysis = AnalysisResult::new("<p>s</p>", quiz, Vec::new()).unwrap();
        let specialty = Specialty::new("Neurology").unwrap();
        let article = SavedArticle::new(
            "abc-1".parse().unwrap(),
            "stroke.pdf",
            specialty.clone(),
            analysis,
            fixed_now(),
        )
        .unwrap();
        let groups = map_library_groups(&[SpecialtyGroup {
            specialty,
            articles: vec![article],
        }]);
        assert_eq!(groups[0].specialty, "Neurology");
        let item = &groups[0].items[0];
        assert_eq!(item.quiz_title, "Stroke");
        assert_eq!(item.saved_at_str, "2023-11-14 22:13");
        assert_eq!(item.counts_label, "1 questions · 0 flashcards");
    }
}
