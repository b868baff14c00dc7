pub use crate::config::*;

/// A builder for the records of a respondent.
///
/// ```
/// use survey_tally::builder::RespondentBuilder;
/// use survey_tally::Answer;
///
/// let record = RespondentBuilder::new("Ana Soto Rojas")
///     .course("1EM-A")
///     .add_multiple("1_Recreo_Mas", &["Luis Diaz Mora".to_string()])
///     .add_single("6_Se_Siente_Seguro", "Si")
///     .build();
///
/// assert_eq!(record.answer("6_Se_Siente_Seguro"), Some(&Answer::Single("Si".to_string())));
/// ```
pub struct RespondentBuilder {
    pub(crate) _identity: String,
    pub(crate) _course: Option<String>,
    pub(crate) _fields: Vec<(String, Answer)>,
}

impl RespondentBuilder {
    pub fn new(identity: &str) -> RespondentBuilder {
        RespondentBuilder {
            _identity: identity.to_string(),
            _course: None,
            _fields: Vec::new(),
        }
    }

    pub fn course(self, course: &str) -> RespondentBuilder {
        RespondentBuilder {
            _course: Some(course.to_string()),
            ..self
        }
    }

    /// Adds a single choice or free text answer.
    pub fn add_single(self, key: &str, value: &str) -> RespondentBuilder {
        self.add_answer(key, Answer::Single(value.to_string()))
    }

    /// Adds the selections of a multi-select question. The list may be empty.
    pub fn add_multiple(self, key: &str, values: &[String]) -> RespondentBuilder {
        self.add_answer(key, Answer::Multiple(values.to_vec()))
    }

    pub fn add_missing(self, key: &str) -> RespondentBuilder {
        self.add_answer(key, Answer::Missing)
    }

    /// Adds an answer. If the key was already present, the previous answer is replaced
    /// and keeps its position.
    pub fn add_answer(mut self, key: &str, answer: Answer) -> RespondentBuilder {
        if let Some(elt) = self._fields.iter_mut().find(|(k, _)| k == key) {
            elt.1 = answer;
        } else {
            self._fields.push((key.to_string(), answer));
        }
        self
    }

    pub fn build(self) -> Respondent {
        Respondent {
            identity: self._identity,
            course: self._course,
            fields: self._fields,
        }
    }
}
