// ********* Input data structures ***********

use std::collections::HashMap;
use std::error::Error;
use std::fmt::Display;

/// The label used when displaying a missing answer.
pub const MISSING_LABEL: &str = "(Sin respuesta)";

/// The answer of one respondent to one question, tagged when the record is read.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub enum Answer {
    /// A single choice, or some free text.
    Single(String),
    /// The options picked in a multi-select question, in the order they were given.
    Multiple(Vec<String>),
    /// A null value in the record.
    Missing,
}

/// All the answers of a single respondent.
///
/// The fields are kept in the order of the source file: the set of questions of a
/// survey is derived from the order of the first record.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Respondent {
    /// The unique display name of the respondent.
    pub identity: String,
    pub course: Option<String>,
    pub fields: Vec<(String, Answer)>,
}

impl Respondent {
    /// The answer for the given key, if the record carries that key.
    pub fn answer(&self, key: &str) -> Option<&Answer> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, answer)| answer)
    }
}

// ******** Output data structures *********

/// A single selected value, as produced when exploding the answers.
#[derive(Eq, PartialEq, Debug, Clone, Hash, Ord, PartialOrd)]
pub enum Choice {
    Value(String),
    /// The answer was absent. It is counted as a value of its own for single-choice questions.
    Missing,
}

impl Display for Choice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Choice::Value(s) => write!(f, "{}", s),
            Choice::Missing => write!(f, "{}", MISSING_LABEL),
        }
    }
}

impl Choice {
    /// The value behind a displayed label. The missing label stands for [`Choice::Missing`].
    pub fn from_label(label: &str) -> Choice {
        if label == MISSING_LABEL {
            Choice::Missing
        } else {
            Choice::Value(label.to_string())
        }
    }
}

impl From<&str> for Choice {
    fn from(s: &str) -> Choice {
        Choice::Value(s.to_string())
    }
}

/// One row of an exploded question: who selected what.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ExpandedPair {
    pub identity: String,
    pub choice: Choice,
}

/// The number of times each distinct value was selected.
///
/// Values are kept in the order in which they were first seen.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct FrequencyCount {
    entries: Vec<(Choice, u64)>,
    positions: HashMap<Choice, usize>,
}

impl FrequencyCount {
    pub fn new() -> FrequencyCount {
        FrequencyCount::default()
    }

    pub fn increment(&mut self, choice: &Choice) {
        if let Some(pos) = self.positions.get(choice) {
            self.entries[*pos].1 += 1;
        } else {
            self.positions.insert(choice.clone(), self.entries.len());
            self.entries.push((choice.clone(), 1));
        }
    }

    pub fn get(&self, choice: &Choice) -> u64 {
        self.positions
            .get(choice)
            .map(|pos| self.entries[*pos].1)
            .unwrap_or(0)
    }

    /// The counts in first-seen order.
    pub fn entries(&self) -> &[(Choice, u64)] {
        &self.entries
    }

    /// The counts sorted by decreasing count. Ties keep the first-seen order.
    pub fn ranked(&self) -> Vec<(Choice, u64)> {
        let mut res = self.entries.clone();
        // sort_by is stable
        res.sort_by(|a, b| b.1.cmp(&a.1));
        res
    }

    /// The sum of all the counts.
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, c)| *c).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The outcome of exploding and counting one question.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Aggregate {
    pub counts: FrequencyCount,
    pub pairs: Vec<ExpandedPair>,
    /// The shape detected for the question, or None if no record carries it.
    pub shape: Option<AnswerShape>,
}

impl Aggregate {
    pub fn empty() -> Aggregate {
        Aggregate {
            counts: FrequencyCount::new(),
            pairs: Vec::new(),
            shape: None,
        }
    }
}

/// Errors that prevent building a survey.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum TallyErrors {
    /// No record was provided.
    EmptySurvey,
}

impl Error for TallyErrors {}

impl Display for TallyErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TallyErrors::EmptySurvey => write!(f, "TallyError: the survey contains no records"),
        }
    }
}

// ********* Configuration **********

/// How a question is presented. This does not say anything about the shape of the answers.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum QuestionKind {
    /// The respondents choose classmates: rendered as a bar chart.
    Graphical,
    /// Free text explanations: rendered with their author.
    OpenText,
    /// Any other question (yes / no, etc.): rendered as a table of counts.
    Simple,
}

impl QuestionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            QuestionKind::Graphical => "graphical",
            QuestionKind::OpenText => "openText",
            QuestionKind::Simple => "simple",
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum AnswerShape {
    Single,
    Multiple,
}

impl AnswerShape {
    pub fn as_str(self) -> &'static str {
        match self {
            AnswerShape::Single => "single",
            AnswerShape::Multiple => "multiple",
        }
    }
}

/// How records whose answer does not match the shape of the question are handled.
///
/// - ColumnUniform: the first record decides the shape of the whole question. Under a
/// multi-select question, a single answer is treated as an empty selection.
///
/// - PerRecord: every answer is exploded according to its own tag. The shape of the
/// question only decides whether missing answers are counted.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum ShapePolicy {
    ColumnUniform,
    PerRecord,
}

pub const GRAPHICAL_QUESTIONS: [&str; 7] = [
    "1_Recreo_Mas",
    "2_Recreo_Menos",
    "3_Trabajo_Mas",
    "4_Trabajo_Menos",
    "5_Molesta_Continuamente",
    "8_Companero_Solo",
    "10_Lider_Positivo_Quien",
];

pub const OPEN_TEXT_QUESTIONS: [&str; 5] = [
    "1.1_Explicacion_Recreo_Mas",
    "2.1_Explicacion_Recreo_Menos",
    "3.1_Explicacion_Trabajo_Mas",
    "4.1_Explicacion_Trabajo_Menos",
    "5.1_Bromas_Afectado",
];

/// Identity and metadata fields, which are not questions.
pub const EXCLUDED_KEYS: [&str; 8] = [
    "RUT",
    "Nombre",
    "Curso",
    "Nombre_Completo",
    "ApellidoPaterno",
    "ApellidoMaterno",
    "Display_Name",
    "11_Comentarios_Adicionales",
];

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct TallyRules {
    pub excluded_keys: Vec<String>,
    pub graphical_questions: Vec<String>,
    pub open_text_questions: Vec<String>,
    pub shape_policy: ShapePolicy,
}

impl Default for TallyRules {
    fn default() -> Self {
        TallyRules {
            excluded_keys: EXCLUDED_KEYS.iter().map(|s| s.to_string()).collect(),
            graphical_questions: GRAPHICAL_QUESTIONS.iter().map(|s| s.to_string()).collect(),
            open_text_questions: OPEN_TEXT_QUESTIONS.iter().map(|s| s.to_string()).collect(),
            shape_policy: ShapePolicy::ColumnUniform,
        }
    }
}
