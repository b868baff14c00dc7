use log::{debug, info, warn};
use std::collections::{BTreeSet, HashMap, HashSet};

use crate::classify::Classifier;
use crate::config::*;

/// The set of survey records for one course.
///
/// The store is built once from all the loaded records and is not modified afterwards.
#[derive(Debug, Clone)]
pub struct SurveyStore {
    // Load order. Records sharing an identity are all kept here.
    records: Vec<Respondent>,
    by_identity: HashMap<String, usize>,
    question_keys: Vec<String>,
    excluded_keys: HashSet<String>,
    classifier: Classifier,
    shape_policy: ShapePolicy,
}

impl SurveyStore {
    /// Builds the store.
    ///
    /// The questions are the keys of the first record, minus the excluded keys. All the
    /// records are expected to have the same keys, but this is not checked: a missing key
    /// in a record is treated as a missing answer.
    pub fn load(records: Vec<Respondent>, rules: &TallyRules) -> Result<SurveyStore, TallyErrors> {
        let first = records.first().ok_or(TallyErrors::EmptySurvey)?;

        let excluded_keys: HashSet<String> = rules.excluded_keys.iter().cloned().collect();
        let question_keys: Vec<String> = first
            .fields
            .iter()
            .map(|(k, _)| k.clone())
            .filter(|k| !excluded_keys.contains(k))
            .collect();
        debug!("load: question keys: {:?}", question_keys);

        let mut by_identity: HashMap<String, usize> = HashMap::new();
        for (idx, r) in records.iter().enumerate() {
            if by_identity.insert(r.identity.clone(), idx).is_some() {
                warn!(
                    "load: identity {:?} appears in multiple records, keeping the last one for display",
                    r.identity
                );
            }
        }

        info!(
            "load: {} records, {} questions",
            records.len(),
            question_keys.len()
        );

        Ok(SurveyStore {
            records,
            by_identity,
            question_keys,
            excluded_keys,
            classifier: Classifier::new(rules),
            shape_policy: rules.shape_policy,
        })
    }

    pub fn question_keys(&self) -> &[String] {
        &self.question_keys
    }

    /// True for the identity and metadata fields, which are not questions.
    pub fn is_excluded(&self, key: &str) -> bool {
        self.excluded_keys.contains(key)
    }

    pub fn get_record(&self, identity: &str) -> Option<&Respondent> {
        self.by_identity.get(identity).map(|idx| &self.records[*idx])
    }

    /// All the display names, sorted.
    pub fn all_display_identities(&self) -> Vec<String> {
        let names: BTreeSet<&String> = self.by_identity.keys().collect();
        names.into_iter().cloned().collect()
    }

    pub fn records(&self) -> &[Respondent] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The course label, as given by the first record.
    pub fn course(&self) -> Option<&str> {
        self.records.first().and_then(|r| r.course.as_deref())
    }

    pub fn classify(&self, question_key: &str) -> QuestionKind {
        self.classifier.classify(question_key)
    }

    pub fn shape_policy(&self) -> ShapePolicy {
        self.shape_policy
    }
}
