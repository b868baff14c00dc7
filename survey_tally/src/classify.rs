use std::collections::HashSet;

use crate::config::{QuestionKind, TallyRules};

/// Assigns a presentation kind to each question, based on fixed lists of question keys.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Classifier {
    graphical: HashSet<String>,
    open_text: HashSet<String>,
}

impl Classifier {
    pub fn new(rules: &TallyRules) -> Classifier {
        Classifier {
            graphical: rules.graphical_questions.iter().cloned().collect(),
            open_text: rules.open_text_questions.iter().cloned().collect(),
        }
    }

    // A key listed in both lists is graphical.
    pub fn classify(&self, question_key: &str) -> QuestionKind {
        if self.graphical.contains(question_key) {
            QuestionKind::Graphical
        } else if self.open_text.contains(question_key) {
            QuestionKind::OpenText
        } else {
            QuestionKind::Simple
        }
    }
}
