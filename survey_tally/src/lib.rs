/*!
Tabulation of classroom survey answers.

A survey is a set of [`Respondent`] records loaded into a [`SurveyStore`]. For each
question, [`explode_and_count`] expands the multi-select answers into one row per
selection and counts how many times each value was chosen. [`voters_for`] answers the
reverse question: who chose a given value.

```
use survey_tally::builder::RespondentBuilder;
use survey_tally::*;

let records = vec![
    RespondentBuilder::new("R1").add_multiple("Q", &["A".to_string(), "B".to_string()]).build(),
    RespondentBuilder::new("R2").add_multiple("Q", &["A".to_string()]).build(),
    RespondentBuilder::new("R3").add_multiple("Q", &[]).build(),
];
let store = SurveyStore::load(records, &TallyRules::default())?;

let agg = explode_and_count(&store, "Q");
assert_eq!(agg.counts.get(&Choice::from("A")), 2);
assert_eq!(agg.pairs.len(), 3);
assert_eq!(voters_for(&store, "Q", &Choice::from("A")), vec!["R1", "R2"]);
# Ok::<(), TallyErrors>(())
```
*/

pub mod builder;
mod classify;
mod config;
mod store;
use log::debug;

pub use crate::classify::Classifier;
pub use crate::config::*;
pub use crate::store::SurveyStore;

/// The shape of a question, as given by the first record.
///
/// Returns None if no record carries the question.
fn detect_shape(store: &SurveyStore, question_key: &str) -> Option<AnswerShape> {
    let present = store
        .records()
        .iter()
        .any(|r| r.answer(question_key).is_some());
    if !present {
        return None;
    }
    match store.records().first().and_then(|r| r.answer(question_key)) {
        Some(Answer::Multiple(_)) => Some(AnswerShape::Multiple),
        _ => Some(AnswerShape::Single),
    }
}

/// The selections contributed by one answer, given the shape of its question.
fn explode_answer(
    answer: Option<&Answer>,
    shape: AnswerShape,
    policy: ShapePolicy,
) -> Vec<Choice> {
    match (answer, shape) {
        (Some(Answer::Multiple(items)), _) => items.iter().map(|s| Choice::from_label(s)).collect(),
        // A single answer in a multi-select question is not a selection, unless every
        // answer is read by its own tag.
        (Some(Answer::Single(s)), AnswerShape::Multiple) => match policy {
            ShapePolicy::ColumnUniform => vec![],
            ShapePolicy::PerRecord => vec![Choice::from_label(s)],
        },
        (Some(Answer::Single(s)), AnswerShape::Single) => vec![Choice::from_label(s)],
        // Non-responses are invisible in multi-select tallies, but counted otherwise.
        (Some(Answer::Missing) | None, AnswerShape::Multiple) => vec![],
        (Some(Answer::Missing) | None, AnswerShape::Single) => vec![Choice::Missing],
    }
}

/// Expands the answers to a question into (respondent, value) pairs and counts the values.
///
/// Multi-select answers produce one pair per selected item, in order. An empty selection
/// produces no pair. For single-choice questions, every record produces exactly one pair,
/// and a missing answer is counted as [`Choice::Missing`].
/// An answer spelled like [`MISSING_LABEL`] is counted as missing too.
///
/// A question that no record carries gives an empty aggregate.
pub fn explode_and_count(store: &SurveyStore, question_key: &str) -> Aggregate {
    let shape = match detect_shape(store, question_key) {
        Some(s) => s,
        None => {
            debug!("explode_and_count: no record has {:?}", question_key);
            return Aggregate::empty();
        }
    };
    let policy = store.shape_policy();
    debug!(
        "explode_and_count: question: {:?} shape: {:?} policy: {:?}",
        question_key, shape, policy
    );

    let mut counts = FrequencyCount::new();
    let mut pairs: Vec<ExpandedPair> = Vec::new();
    for r in store.records() {
        for choice in explode_answer(r.answer(question_key), shape, policy) {
            counts.increment(&choice);
            pairs.push(ExpandedPair {
                identity: r.identity.clone(),
                choice,
            });
        }
    }

    debug!(
        "explode_and_count: question: {:?} pairs: {} distinct values: {}",
        question_key,
        pairs.len(),
        counts.len()
    );
    Aggregate {
        counts,
        pairs,
        shape: Some(shape),
    }
}

/// The respondents who selected the given value for a question, sorted.
///
/// Values are compared exactly. A respondent who selected the same value twice appears
/// twice. No match gives an empty list.
pub fn voters_for(store: &SurveyStore, question_key: &str, choice: &Choice) -> Vec<String> {
    let agg = explode_and_count(store, question_key);
    let mut voters: Vec<String> = agg
        .pairs
        .into_iter()
        .filter(|p| p.choice == *choice)
        .map(|p| p.identity)
        .collect();
    voters.sort();
    debug!(
        "voters_for: question: {:?} choice: {:?} voters: {:?}",
        question_key, choice, voters
    );
    voters
}

#[cfg(test)]
mod tests {
    use super::builder::RespondentBuilder;
    use super::*;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn strings(l: &[&str]) -> Vec<String> {
        l.iter().map(|s| s.to_string()).collect()
    }

    fn list_store(policy: ShapePolicy) -> SurveyStore {
        let records = vec![
            RespondentBuilder::new("R1")
                .add_multiple("Q", &strings(&["A", "B"]))
                .add_single("Q2", "Yes")
                .build(),
            RespondentBuilder::new("R2")
                .add_multiple("Q", &strings(&["A"]))
                .add_single("Q2", "No")
                .build(),
            RespondentBuilder::new("R3")
                .add_multiple("Q", &[])
                .add_single("Q2", "Yes")
                .build(),
        ];
        let rules = TallyRules {
            shape_policy: policy,
            ..TallyRules::default()
        };
        SurveyStore::load(records, &rules).unwrap()
    }

    #[test]
    fn list_question() {
        init();
        let store = list_store(ShapePolicy::ColumnUniform);
        let agg = explode_and_count(&store, "Q");
        assert_eq!(agg.shape, Some(AnswerShape::Multiple));
        assert_eq!(
            agg.counts.entries(),
            &[(Choice::from("A"), 2), (Choice::from("B"), 1)]
        );
        assert_eq!(agg.pairs.len(), 3);
        assert_eq!(
            agg.pairs[1],
            ExpandedPair {
                identity: "R1".to_string(),
                choice: Choice::from("B")
            }
        );
        assert_eq!(voters_for(&store, "Q", &Choice::from("A")), strings(&["R1", "R2"]));
    }

    #[test]
    fn scalar_question() {
        init();
        let store = list_store(ShapePolicy::ColumnUniform);
        let agg = explode_and_count(&store, "Q2");
        assert_eq!(agg.shape, Some(AnswerShape::Single));
        assert_eq!(
            agg.counts.entries(),
            &[(Choice::from("Yes"), 2), (Choice::from("No"), 1)]
        );
        assert_eq!(agg.pairs.len(), store.len());
        assert_eq!(
            voters_for(&store, "Q2", &Choice::from("Yes")),
            strings(&["R1", "R3"])
        );
    }

    #[test]
    fn voters_sorted_by_identity() {
        init();
        let store = SurveyStore::load(
            vec![
                RespondentBuilder::new("Zoe").add_single("Q", "Yes").build(),
                RespondentBuilder::new("Ana").add_single("Q", "No").build(),
                RespondentBuilder::new("Mia").add_single("Q", "Yes").build(),
            ],
            &TallyRules::default(),
        )
        .unwrap();
        assert_eq!(voters_for(&store, "Q", &Choice::from("Yes")), strings(&["Mia", "Zoe"]));
    }

    #[test]
    fn no_match_and_exact_comparison() {
        init();
        let store = list_store(ShapePolicy::ColumnUniform);
        assert!(voters_for(&store, "Q", &Choice::from("C")).is_empty());
        assert!(voters_for(&store, "Q2", &Choice::from("yes")).is_empty());
        assert!(voters_for(&store, "Q2", &Choice::from("Yes ")).is_empty());
    }

    #[test]
    fn unknown_question() {
        init();
        let store = list_store(ShapePolicy::ColumnUniform);
        let agg = explode_and_count(&store, "Nope");
        assert_eq!(agg, Aggregate::empty());
        assert!(voters_for(&store, "Nope", &Choice::Missing).is_empty());
    }

    #[test]
    fn key_absent_in_later_record() {
        init();
        let records = vec![
            RespondentBuilder::new("R1")
                .add_multiple("L", &strings(&["A"]))
                .add_single("S", "Yes")
                .build(),
            RespondentBuilder::new("R2").build(),
        ];
        let store = SurveyStore::load(records, &TallyRules::default()).unwrap();

        let list = explode_and_count(&store, "L");
        assert_eq!(list.pairs.len(), 1);
        assert_eq!(list.counts.total(), 1);

        let scalar = explode_and_count(&store, "S");
        assert_eq!(scalar.pairs.len(), 2);
        assert_eq!(scalar.counts.get(&Choice::Missing), 1);
        assert_eq!(voters_for(&store, "S", &Choice::Missing), strings(&["R2"]));
    }

    #[test]
    fn null_scalar_is_counted() {
        init();
        let store = SurveyStore::load(
            vec![
                RespondentBuilder::new("R1").add_missing("S").build(),
                RespondentBuilder::new("R2").add_single("S", "Yes").build(),
                RespondentBuilder::new("R3").add_missing("S").build(),
            ],
            &TallyRules::default(),
        )
        .unwrap();
        let agg = explode_and_count(&store, "S");
        assert_eq!(agg.shape, Some(AnswerShape::Single));
        assert_eq!(
            agg.counts.entries(),
            &[(Choice::Missing, 2), (Choice::from("Yes"), 1)]
        );
        assert_eq!(agg.pairs.len(), 3);
    }

    #[test]
    fn mixed_shapes_column_uniform() {
        init();
        let store = SurveyStore::load(
            vec![
                RespondentBuilder::new("R1")
                    .add_multiple("L", &strings(&["A"]))
                    .add_single("S", "Yes")
                    .build(),
                RespondentBuilder::new("R2")
                    .add_single("L", "A")
                    .add_multiple("S", &strings(&["Yes", "No"]))
                    .build(),
            ],
            &TallyRules::default(),
        )
        .unwrap();
        // A single answer in a list column is an empty selection.
        let list = explode_and_count(&store, "L");
        assert_eq!(list.counts.entries(), &[(Choice::from("A"), 1)]);
        // A list in a single column is read as a list.
        let scalar = explode_and_count(&store, "S");
        assert_eq!(
            scalar.counts.entries(),
            &[(Choice::from("Yes"), 2), (Choice::from("No"), 1)]
        );
        assert_eq!(scalar.pairs.len(), 3);
    }

    #[test]
    fn mixed_shapes_per_record() {
        init();
        let rules = TallyRules {
            shape_policy: ShapePolicy::PerRecord,
            ..TallyRules::default()
        };
        let store = SurveyStore::load(
            vec![
                RespondentBuilder::new("R1")
                    .add_multiple("L", &strings(&["A"]))
                    .build(),
                RespondentBuilder::new("R2").add_single("L", "A").build(),
                RespondentBuilder::new("R3").add_missing("L").build(),
            ],
            &rules,
        )
        .unwrap();
        let list = explode_and_count(&store, "L");
        assert_eq!(list.counts.entries(), &[(Choice::from("A"), 2)]);
        assert_eq!(voters_for(&store, "L", &Choice::from("A")), strings(&["R1", "R2"]));
    }

    #[test]
    fn duplicate_selection_is_kept() {
        init();
        let store = SurveyStore::load(
            vec![
                RespondentBuilder::new("R2")
                    .add_multiple("L", &strings(&["A", "A"]))
                    .build(),
                RespondentBuilder::new("R1")
                    .add_multiple("L", &strings(&["A"]))
                    .build(),
            ],
            &TallyRules::default(),
        )
        .unwrap();
        assert_eq!(
            voters_for(&store, "L", &Choice::from("A")),
            strings(&["R1", "R2", "R2"])
        );
    }

    #[test]
    fn totals_match_pairs() {
        init();
        for policy in [ShapePolicy::ColumnUniform, ShapePolicy::PerRecord] {
            let store = list_store(policy);
            for q in ["Q", "Q2", "Missing"] {
                let agg = explode_and_count(&store, q);
                assert_eq!(agg.counts.total(), agg.pairs.len() as u64);
            }
            let list_len: usize = store
                .records()
                .iter()
                .map(|r| match r.answer("Q") {
                    Some(Answer::Multiple(l)) => l.len(),
                    _ => 0,
                })
                .sum();
            assert_eq!(explode_and_count(&store, "Q").pairs.len(), list_len);
        }
    }

    #[test]
    fn reverse_query_is_idempotent() {
        init();
        let store = list_store(ShapePolicy::ColumnUniform);
        let first = voters_for(&store, "Q", &Choice::from("A"));
        let second = voters_for(&store, "Q", &Choice::from("A"));
        assert_eq!(first, second);
        assert_eq!(explode_and_count(&store, "Q"), explode_and_count(&store, "Q"));
    }

    #[test]
    fn missing_label_is_the_missing_bucket() {
        init();
        let records = vec![
            RespondentBuilder::new("R1").add_missing("Q").build(),
            RespondentBuilder::new("R2").add_single("Q", "Si").build(),
            RespondentBuilder::new("R3").add_single("Q", MISSING_LABEL).build(),
        ];
        let store = SurveyStore::load(records, &TallyRules::default()).unwrap();
        let agg = explode_and_count(&store, "Q");
        // A single entry for the label.
        assert_eq!(
            agg.counts.ranked(),
            vec![(Choice::Missing, 2), (Choice::from("Si"), 1)]
        );
        assert_eq!(
            voters_for(&store, "Q", &Choice::from_label(MISSING_LABEL)),
            vec!["R1", "R3"]
        );
        assert_eq!(Choice::from_label("Si"), Choice::from("Si"));
    }

    #[test]
    fn ranked_counts() {
        let mut counts = FrequencyCount::new();
        for v in ["B", "A", "C", "A", "C", "D"] {
            counts.increment(&Choice::from(v));
        }
        assert_eq!(
            counts.ranked(),
            vec![
                (Choice::from("A"), 2),
                (Choice::from("C"), 2),
                (Choice::from("B"), 1),
                (Choice::from("D"), 1)
            ]
        );
        assert_eq!(counts.total(), 6);
        assert_eq!(counts.get(&Choice::from("E")), 0);
    }
}
