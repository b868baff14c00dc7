// Readers for the roster of the course.

use calamine::{open_workbook, DataType, Reader, Xlsx};

use crate::sociogram::{io_common::get_col_index_mapping, *};

/// A student registered in the course.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct RosterEntry {
    pub id: String,
    pub first_names: String,
    pub paternal_surname: String,
    pub maternal_surname: String,
}

impl RosterEntry {
    /// The name under which the student is displayed. The roster id is not part of it.
    pub fn display_name(&self) -> String {
        format!(
            "{} {} {}",
            self.first_names, self.paternal_surname, self.maternal_surname
        )
        .trim()
        .to_string()
    }

    /// The name of the response file: the first given name in capitals, the roster id and the suffix.
    pub fn artifact_file_name(&self, suffix: &str) -> String {
        let first_name = self.first_names.split_whitespace().next().unwrap_or("");
        format!("{}_{}{}", first_name.to_uppercase(), self.id, suffix)
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
struct JsonRosterEntry {
    #[serde(rename = "Nombre")]
    nombre: String,
    #[serde(rename = "ApellidoPaterno", default)]
    apellido_paterno: String,
    #[serde(rename = "ApellidoMaterno", default)]
    apellido_materno: String,
}

pub fn read_roster(path: &str, source: &RosterSource) -> SgResult<Vec<RosterEntry>> {
    info!(
        "Attempting to read roster file {:?} (provider {})",
        path, source.provider
    );
    let entries = match source.provider.as_str() {
        "json" => read_json_roster(path)?,
        "csv" => read_csv_roster(path, source)?,
        "xlsx" | "excel" => read_excel_roster(path, source)?,
        x => {
            whatever!("Roster provider not implemented {:?}", x)
        }
    };
    ensure!(!entries.is_empty(), EmptyRosterSnafu { path });
    debug!("read_roster: {} entries", entries.len());
    Ok(entries)
}

/// The roster as a JSON object: roster id -> names. The order of the file is kept.
pub fn read_json_roster(path: &str) -> SgResult<Vec<RosterEntry>> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let js: JSMap<String, JSValue> =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })?;
    let mut res: Vec<RosterEntry> = Vec::new();
    for (id, value) in js.into_iter() {
        let e: JsonRosterEntry =
            serde_json::from_value(value).context(ParsingJsonSnafu { path })?;
        res.push(RosterEntry {
            id,
            first_names: e.nombre,
            paternal_surname: e.apellido_paterno,
            maternal_surname: e.apellido_materno,
        });
    }
    Ok(res)
}

pub fn read_csv_roster(path: &str, source: &RosterSource) -> SgResult<Vec<RosterEntry>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .context(CsvOpenSnafu { path })?;
    let header: Vec<Option<String>> = rdr
        .headers()
        .context(CsvLineParseSnafu { lineno: 1_usize })?
        .iter()
        .map(|s| Some(s.to_string()))
        .collect();
    let col_indexes = get_col_index_mapping(&source.column_names(), &header)?;

    let mut res: Vec<RosterEntry> = Vec::new();
    for (idx, line_r) in rdr.records().enumerate() {
        // The header is the first line
        let lineno = idx + 2;
        let line = line_r.context(CsvLineParseSnafu { lineno })?;
        debug!("read_csv_roster: lineno: {:?} row: {:?}", lineno, line);
        let cells: Vec<String> = col_indexes
            .iter()
            .map(|i| line.get(*i).unwrap_or("").trim().to_string())
            .collect();
        if let Some(e) = entry_from_cells(&cells) {
            res.push(e);
        } else {
            warn!("read_csv_roster: line {}: no roster id, skipping", lineno);
        }
    }
    Ok(res)
}

pub fn read_excel_roster(path: &str, source: &RosterSource) -> SgResult<Vec<RosterEntry>> {
    let wrange = get_range(path, source)?;

    let mut iter = wrange.rows();
    let header: Vec<Option<String>> = iter
        .next()
        .context(EmptyExcelSnafu { path })?
        .iter()
        .map(cell_to_string)
        .collect();
    debug!("read_excel_roster: header: {:?}", header);
    let col_indexes = get_col_index_mapping(&source.column_names(), &header)?;

    let mut res: Vec<RosterEntry> = Vec::new();
    for (idx, row) in iter.enumerate() {
        let cells: Vec<String> = col_indexes
            .iter()
            .map(|i| {
                row.get(*i)
                    .and_then(cell_to_string)
                    .unwrap_or_default()
                    .trim()
                    .to_string()
            })
            .collect();
        debug!("read_excel_roster: idx: {:?} cells: {:?}", idx, cells);
        if let Some(e) = entry_from_cells(&cells) {
            res.push(e);
        }
    }
    Ok(res)
}

// Cells are id, first names, paternal surname, maternal surname.
fn entry_from_cells(cells: &[String]) -> Option<RosterEntry> {
    match cells {
        [id, first_names, paternal, maternal] if !id.is_empty() => Some(RosterEntry {
            id: id.clone(),
            first_names: first_names.clone(),
            paternal_surname: paternal.clone(),
            maternal_surname: maternal.clone(),
        }),
        _ => None,
    }
}

// Identifiers typed as numbers in a spreadsheet are read as floats.
fn cell_to_string(cell: &DataType) -> Option<String> {
    match cell {
        DataType::String(s) => Some(s.clone()),
        DataType::Int(i) => Some(i.to_string()),
        DataType::Float(f) if f.fract() == 0.0 => Some(format!("{}", *f as i64)),
        DataType::Float(f) => Some(f.to_string()),
        DataType::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn get_range(path: &str, source: &RosterSource) -> SgResult<calamine::Range<DataType>> {
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;

    // A worksheet name was provided, use it.
    if let Some(worksheet_name) = source.excel_worksheet_name.clone() {
        debug!(
            "read_excel_roster: path: {:?} worksheet: {:?}",
            path, &worksheet_name
        );
        let wrange = workbook
            .worksheet_range(&worksheet_name)
            .context(EmptyExcelSnafu { path })?
            .context(OpeningExcelSnafu { path })?;
        Ok(wrange)
    } else {
        let wrange = workbook
            .worksheet_range_at(0)
            .context(EmptyExcelSnafu { path })?
            .context(OpeningExcelSnafu { path })?;
        Ok(wrange)
    }
}
