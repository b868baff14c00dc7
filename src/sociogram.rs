use log::{debug, info, warn};

use snafu::{prelude::*, Snafu};
use survey_tally::*;

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::json;
use serde_json::Map as JSMap;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::sociogram::config_reader::*;
use crate::sociogram::io_roster::read_roster;
use crate::sociogram::render::format_key;

pub mod chart;
pub mod config_reader;
mod io_common;
pub mod io_responses;
pub mod io_roster;
pub mod render;
pub mod view;

#[derive(Debug, Snafu)]
pub enum SociogramError {
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing the JSON content of {path}"))]
    ParsingJson {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("The content of {path} is not a JSON object"))]
    NotAnObject { path: String },
    #[snafu(display("Error writing file {path}"))]
    WritingFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error opening Excel file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("Excel file {path} has no worksheet or no header"))]
    EmptyExcel { path: String },
    #[snafu(display("Error opening CSV file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error parsing CSV line {lineno}"))]
    CsvLineParse { source: csv::Error, lineno: usize },
    #[snafu(display("Column {column} not found in the roster header"))]
    MissingRosterColumn { column: String },
    #[snafu(display("The roster {path} does not contain any student"))]
    EmptyRoster { path: String },
    #[snafu(display("Setting {name} is missing: provide it in the configuration or on the command line"))]
    MissingSetting { name: String },
    #[snafu(display(
        "ERROR: No se encontraron respuestas. Asegúrate de que los archivos JSON estén en la carpeta '{folder}'."
    ))]
    NoResponses { folder: String },
    #[snafu(display("Error building the survey"))]
    Tally { source: TallyErrors },
    #[snafu(display("Unknown student {name}"))]
    UnknownStudent { name: String },
    #[snafu(display("The chart has no bar at index {index}"))]
    UnknownBar { index: usize },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type SgResult<T> = Result<T, SociogramError>;

/// Reads the configuration file (if any) and applies the overrides of the command line.
///
/// Paths in the configuration file are relative to the file itself.
pub fn resolve_config(
    config_path: Option<&str>,
    roster_path: Option<&str>,
    roster_type: Option<&str>,
    input: Option<&str>,
) -> SgResult<SurveyConfig> {
    let mut config = match config_path {
        Some(p) => {
            let mut config = read_config(p)?;
            let root: PathBuf = Path::new(p)
                .parent()
                .map(|x| x.to_path_buf())
                .unwrap_or_default();
            if let Some(r) = config.roster.as_mut() {
                r.file_path = io_common::resolve_path(&root, &r.file_path);
            }
            config.responses_folder = config
                .responses_folder
                .map(|f| io_common::resolve_path(&root, &f));
            config.output_settings.output_directory = config
                .output_settings
                .output_directory
                .map(|d| io_common::resolve_path(&root, &d));
            config
        }
        None => SurveyConfig::empty(),
    };

    if let Some(p) = roster_path {
        let provider = match roster_type {
            Some(t) => t.to_string(),
            None => guess_roster_provider(p).to_string(),
        };
        config.roster = Some(match config.roster {
            Some(r) => RosterSource {
                provider,
                file_path: p.to_string(),
                ..r
            },
            None => RosterSource::simple(&provider, p),
        });
    }
    if let Some(i) = input {
        config.responses_folder = Some(i.to_string());
    }
    debug!("resolve_config: {:?}", config);
    Ok(config)
}

fn guess_roster_provider(path: &str) -> &'static str {
    let lower = path.to_lowercase();
    if lower.ends_with(".csv") {
        "csv"
    } else if lower.ends_with(".xlsx") {
        "xlsx"
    } else {
        "json"
    }
}

/// Reads the roster, then the response of each student, and builds the survey.
pub fn load_survey(config: &SurveyConfig) -> SgResult<SurveyStore> {
    let rules = config.tally_rules()?;
    let source = config
        .roster
        .as_ref()
        .context(MissingSettingSnafu { name: "roster" })?;
    let folder = config
        .responses_folder
        .as_ref()
        .context(MissingSettingSnafu {
            name: "responsesFolder",
        })?;

    let roster = read_roster(&source.file_path, source)?;
    let records = io_responses::load_responses(folder, &roster, &config.file_suffix())?;
    let store = SurveyStore::load(records, &rules).context(TallySnafu {})?;
    info!(
        "Survey {:?}: {} respondents, {} questions",
        config.output_settings.survey_name,
        store.len(),
        store.question_keys().len()
    );
    Ok(store)
}

fn question_to_json(store: &SurveyStore, key: &str) -> JSValue {
    let agg = explode_and_count(store, key);
    let tally: Vec<JSValue> = agg
        .counts
        .ranked()
        .iter()
        .map(|(choice, count)| json!({"value": choice.to_string(), "count": count}))
        .collect();
    json!({
        "question": key,
        "label": format_key(key),
        "kind": store.classify(key).as_str(),
        "shape": agg.shape.map(|s| s.as_str()),
        "responses": agg.pairs.len(),
        "tally": tally
    })
}

pub fn build_summary_js(config: &SurveyConfig, store: &SurveyStore) -> JSValue {
    let c = OutputConfig {
        survey: config.output_settings.survey_name.clone(),
        course: store.course().map(|s| s.to_string()),
        respondents: store.len(),
    };
    let results: Vec<JSValue> = store
        .question_keys()
        .iter()
        .map(|key| question_to_json(store, key))
        .collect();
    json!({
        "config": c,
        "results": results })
}

/// Writes the summary to the given path, or to the standard output for 'stdout'.
pub fn write_summary(summary: &JSValue, out: &str) -> SgResult<()> {
    let pretty_js = serde_json::to_string_pretty(summary).context(ParsingJsonSnafu { path: out })?;
    if out == "stdout" {
        println!("{}", pretty_js);
    } else {
        info!("Writing summary to {:?}", out);
        fs::write(out, pretty_js).context(WritingFileSnafu { path: out })?;
    }
    Ok(())
}

/// The default location of the summary, when the configuration sets an output directory.
pub fn default_summary_path(config: &SurveyConfig) -> Option<String> {
    config.output_settings.output_directory.as_ref().map(|d| {
        let name = format!("{}_summary.json", config.output_settings.survey_name);
        let p: PathBuf = [d.as_str(), name.as_str()].iter().collect();
        p.as_path().display().to_string()
    })
}

/// Where to write the summary: the given location, or the default one when none is given.
/// An empty location turns the output off.
pub fn summary_destination(out: Option<&str>, config: &SurveyConfig) -> Option<String> {
    match out {
        Some("") => None,
        Some(p) => Some(p.to_string()),
        None => default_summary_path(config),
    }
}

/// Checks the summary against a reference summary and prints the differences.
pub fn check_reference(summary: &JSValue, reference_path: &str) -> SgResult<()> {
    let summary_ref = read_summary(reference_path)?;
    if summary_ref != *summary {
        let pretty_ref = serde_json::to_string_pretty(&summary_ref)
            .context(ParsingJsonSnafu {
                path: reference_path,
            })?;
        let pretty_stats = serde_json::to_string_pretty(summary).context(ParsingJsonSnafu {
            path: reference_path,
        })?;
        warn!("Found differences with the reference summary");
        print_diff(pretty_ref.as_str(), pretty_stats.as_str(), "\n");
        whatever!("Difference detected between calculated summary and reference summary")
    }
    info!("The summary matches the reference {:?}", reference_path);
    Ok(())
}

/// Loads a survey from its configuration and checks the summary against a reference.
#[cfg(test)]
fn run_survey(config_path: &str, check_summary_path: Option<&str>) -> SgResult<JSValue> {
    let config = resolve_config(Some(config_path), None, None, None)?;
    let store = load_survey(&config)?;
    let summary = build_summary_js(&config, &store);
    if let Some(p) = check_summary_path {
        check_reference(&summary, p)?;
    }
    Ok(summary)
}

#[cfg(test)]
fn test_dir() -> String {
    option_env!("SOCIOGRAM_TEST_DIR")
        .map(|s| s.to_string())
        .unwrap_or_else(|| format!("{}/tests/data", env!("CARGO_MANIFEST_DIR")))
}

#[cfg(test)]
fn run_survey_test(test_name: &str, config_lpath: &str, summary_lpath: &str) -> SgResult<JSValue> {
    let test_dir = test_dir();
    info!("Running test {}", test_name);
    run_survey(
        &format!("{}/{}/{}", test_dir, test_name, config_lpath),
        Some(&format!("{}/{}/{}", test_dir, test_name, summary_lpath)),
    )
}

#[cfg(test)]
fn test_wrapper(test_name: &str) -> SgResult<JSValue> {
    run_survey_test(
        test_name,
        format!("{}_config.json", test_name).as_str(),
        format!("{}_expected_summary.json", test_name).as_str(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn sample_course() {
        init();
        let res = test_wrapper("sample_course");
        assert!(res.is_ok(), "{:?}", res.err());
    }

    #[test]
    fn csv_roster() {
        init();
        let res = test_wrapper("csv_roster");
        assert!(res.is_ok(), "{:?}", res.err());
    }

    #[test]
    fn no_responses() {
        init();
        let res = test_wrapper("no_responses");
        assert!(matches!(res, Err(SociogramError::NoResponses { .. })));
    }

    #[test]
    fn reference_mismatch() {
        init();
        let res = run_survey_test(
            "sample_course",
            "sample_course_config.json",
            "wrong_expected_summary.json",
        );
        assert!(matches!(res, Err(SociogramError::Whatever { .. })));
    }

    #[test]
    fn missing_roster_setting() {
        init();
        let config = resolve_config(None, None, None, Some("somewhere")).unwrap();
        let res = load_survey(&config);
        assert!(matches!(res, Err(SociogramError::MissingSetting { .. })));
    }

    #[test]
    fn paths_relative_to_config() {
        init();
        let dir = format!("{}/sample_course", test_dir());
        let config =
            resolve_config(Some(&format!("{}/sample_course_config.json", dir)), None, None, None)
                .unwrap();
        let root = Path::new(&dir);
        assert_eq!(
            config.roster.as_ref().unwrap().file_path,
            root.join("roster.json").display().to_string()
        );
        assert_eq!(
            config.responses_folder,
            Some(root.join("respuestas").display().to_string())
        );
        assert_eq!(
            default_summary_path(&config),
            Some(
                root.join("out")
                    .join("Sociograma 1EM-A_summary.json")
                    .display()
                    .to_string()
            )
        );
    }

    #[test]
    fn summary_destinations() {
        let mut config = SurveyConfig::empty();
        assert_eq!(summary_destination(None, &config), None);
        assert_eq!(summary_destination(Some("stdout"), &config).as_deref(), Some("stdout"));
        config.output_settings.output_directory = Some("out".to_string());
        assert_eq!(summary_destination(Some(""), &config), None);
        assert_eq!(
            summary_destination(None, &config),
            default_summary_path(&config)
        );
    }

    #[test]
    fn command_line_overrides() {
        init();
        let config = resolve_config(None, Some("class/roster.CSV"), None, Some("answers")).unwrap();
        let roster = config.roster.unwrap();
        assert_eq!(roster.provider, "csv");
        assert_eq!(roster.file_path, "class/roster.CSV");
        assert_eq!(config.responses_folder.as_deref(), Some("answers"));
        assert_eq!(guess_roster_provider("a.xlsx"), "xlsx");
        assert_eq!(guess_roster_provider("a.json"), "json");
    }
}
