use crate::sociogram::*;

use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(rename = "surveyName")]
    pub survey_name: String,
    #[serde(rename = "outputDirectory")]
    pub output_directory: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub survey: String,
    pub course: Option<String>,
    pub respondents: usize,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct RosterSource {
    pub provider: String,
    #[serde(rename = "filePath")]
    pub file_path: String,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
    // Column names for the csv and xlsx providers
    #[serde(rename = "idColumn")]
    pub id_column: Option<String>,
    #[serde(rename = "firstNamesColumn")]
    pub first_names_column: Option<String>,
    #[serde(rename = "paternalSurnameColumn")]
    pub paternal_surname_column: Option<String>,
    #[serde(rename = "maternalSurnameColumn")]
    pub maternal_surname_column: Option<String>,
}

impl RosterSource {
    pub fn simple(provider: &str, file_path: &str) -> RosterSource {
        RosterSource {
            provider: provider.to_string(),
            file_path: file_path.to_string(),
            excel_worksheet_name: None,
            id_column: None,
            first_names_column: None,
            paternal_surname_column: None,
            maternal_surname_column: None,
        }
    }

    /// The names of the id, first names, paternal surname and maternal surname columns.
    pub fn column_names(&self) -> [String; 4] {
        [
            self.id_column.clone().unwrap_or_else(|| "RUT".to_string()),
            self.first_names_column
                .clone()
                .unwrap_or_else(|| "Nombre".to_string()),
            self.paternal_surname_column
                .clone()
                .unwrap_or_else(|| "ApellidoPaterno".to_string()),
            self.maternal_surname_column
                .clone()
                .unwrap_or_else(|| "ApellidoMaterno".to_string()),
        ]
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize, Default)]
pub struct QuestionSettings {
    pub graphical: Option<Vec<String>>,
    #[serde(rename = "openText")]
    pub open_text: Option<Vec<String>>,
    pub excluded: Option<Vec<String>>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize, Default)]
pub struct SurveyRules {
    #[serde(rename = "shapePolicy")]
    pub shape_policy: Option<String>,
}

impl SurveyRules {
    pub fn shape_policy(&self) -> SgResult<ShapePolicy> {
        match self.shape_policy.as_deref() {
            None | Some("columnUniform") => Ok(ShapePolicy::ColumnUniform),
            Some("perRecord") => Ok(ShapePolicy::PerRecord),
            Some(x) => {
                whatever!("unknown shape policy: {}", x)
            }
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct SurveyConfig {
    #[serde(rename = "outputSettings")]
    pub output_settings: OutputSettings,
    #[serde(rename = "responsesFolder")]
    pub responses_folder: Option<String>,
    #[serde(rename = "fileSuffix")]
    pub file_suffix: Option<String>,
    pub roster: Option<RosterSource>,
    #[serde(default)]
    pub questions: QuestionSettings,
    #[serde(default)]
    pub rules: SurveyRules,
}

pub const DEFAULT_FILE_SUFFIX: &str = "_encuesta.json";
pub const DEFAULT_SURVEY_NAME: &str = "Sociograma";

impl SurveyConfig {
    /// The configuration used when no file is provided.
    pub fn empty() -> SurveyConfig {
        SurveyConfig {
            output_settings: OutputSettings {
                survey_name: DEFAULT_SURVEY_NAME.to_string(),
                output_directory: None,
            },
            responses_folder: None,
            file_suffix: None,
            roster: None,
            questions: QuestionSettings::default(),
            rules: SurveyRules::default(),
        }
    }

    pub fn file_suffix(&self) -> String {
        self.file_suffix
            .clone()
            .unwrap_or_else(|| DEFAULT_FILE_SUFFIX.to_string())
    }

    /// The tabulation rules. The question lists that are not configured keep their default values.
    pub fn tally_rules(&self) -> SgResult<TallyRules> {
        let defaults = TallyRules::default();
        Ok(TallyRules {
            excluded_keys: self
                .questions
                .excluded
                .clone()
                .unwrap_or(defaults.excluded_keys),
            graphical_questions: self
                .questions
                .graphical
                .clone()
                .unwrap_or(defaults.graphical_questions),
            open_text_questions: self
                .questions
                .open_text
                .clone()
                .unwrap_or(defaults.open_text_questions),
            shape_policy: self.rules.shape_policy()?,
        })
    }
}

pub fn read_config(path: &str) -> SgResult<SurveyConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let config: SurveyConfig =
        serde_json::from_str(&contents).context(ParsingJsonSnafu { path })?;
    debug!("read_config: {:?}", config);
    Ok(config)
}

pub fn read_summary(path: &str) -> SgResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })?;
    Ok(js)
}
