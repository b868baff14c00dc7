// Reading the response files of the students.

use std::path::PathBuf;

use survey_tally::builder::RespondentBuilder;

use crate::sociogram::{io_common::simplify_file_name, io_roster::RosterEntry, *};

/// Reads the response file of every student of the roster found in the folder.
///
/// A missing or unreadable file is skipped with a warning. Only the absence of any
/// response is an error.
pub fn load_responses(
    folder: &str,
    roster: &[RosterEntry],
    file_suffix: &str,
) -> SgResult<Vec<Respondent>> {
    let mut records: Vec<Respondent> = Vec::new();
    for student in roster.iter() {
        let p: PathBuf = [folder, student.artifact_file_name(file_suffix).as_str()]
            .iter()
            .collect();
        let path = p.as_path().display().to_string();
        if !p.is_file() {
            warn!("No response file for {:?}: {:?}", student.display_name(), path);
            continue;
        }
        match read_response(&path, &student.display_name()) {
            Ok(r) => {
                debug!("Read response file {:?}", simplify_file_name(&path));
                records.push(r);
            }
            Err(e) => {
                warn!("Could not load or parse {:?}: {}", path, e);
            }
        }
    }
    info!(
        "Loaded {} response files out of {} students",
        records.len(),
        roster.len()
    );
    ensure!(
        !records.is_empty(),
        NoResponsesSnafu {
            folder: folder.to_string()
        }
    );
    Ok(records)
}

/// Reads one response file. The identity of the respondent is given by the roster.
pub fn read_response(path: &str, display_name: &str) -> SgResult<Respondent> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })?;
    let obj = js.as_object().context(NotAnObjectSnafu { path })?;
    Ok(respondent_from_json(obj, display_name))
}

pub fn respondent_from_json(obj: &JSMap<String, JSValue>, display_name: &str) -> Respondent {
    let mut builder = RespondentBuilder::new(display_name);
    if let Some(course) = obj.get("Curso").and_then(|v| v.as_str()) {
        builder = builder.course(course);
    }
    for (key, value) in obj.iter() {
        builder = builder.add_answer(key, answer_from_json(value));
    }
    builder.build()
}

fn answer_from_json(value: &JSValue) -> Answer {
    match value {
        JSValue::Null => Answer::Missing,
        JSValue::String(s) => Answer::Single(s.clone()),
        JSValue::Array(items) => Answer::Multiple(items.iter().map(json_to_text).collect()),
        x => Answer::Single(x.to_string()),
    }
}

fn json_to_text(value: &JSValue) -> String {
    match value {
        JSValue::String(s) => s.clone(),
        x => x.to_string(),
    }
}
