// Text renditions of the views.

use crate::sociogram::{
    view::{Menus, ViewAction},
    *,
};

const OPEN_RESPONSE_WIDTH: usize = 80;
pub const NO_VOTERS_MESSAGE: &str = "No se encontraron estudiantes con esa respuesta.";
pub const NO_DATA_MESSAGE: &str = "Sin datos para esta pregunta.";

/// Turns a question key into a label: `3.1_Explicacion_Trabajo_Mas` -> `3.1. Explicacion Trabajo Mas`.
pub fn format_key(key: &str) -> String {
    let mut res = String::with_capacity(key.len() + 2);
    let mut prev: Option<char> = None;
    for c in key.chars() {
        let c = if c == '_' { ' ' } else { c };
        match prev {
            Some(p) if c.is_whitespace() && p.is_ascii_digit() => res.push_str(". "),
            _ => res.push(c),
        }
        prev = Some(c);
    }
    let trimmed = res.trim();
    let mut chars = trimmed.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn format_answer(answer: &Answer) -> String {
    match answer {
        Answer::Single(s) => s.clone(),
        Answer::Multiple(items) => items.join(", "),
        Answer::Missing => MISSING_LABEL.to_string(),
    }
}

pub fn render_status(store: &SurveyStore) -> String {
    format!(
        "Curso: {} | Respuestas cargadas: {}",
        store.course().unwrap_or("N/A"),
        store.len()
    )
}

/// All the answers of a student, except for the identity fields.
pub fn render_student_detail(store: &SurveyStore, record: &Respondent) -> String {
    let mut res = String::new();
    for (key, answer) in record.fields.iter() {
        if store.is_excluded(key) || key.contains("Apellido") || key == "Nombre" || key == "RUT" {
            continue;
        }
        res.push_str(&format!("--- {} ---\n", format_key(key)));
        res.push_str(&format!("{}\n\n", format_answer(answer)));
    }
    res
}

/// The counts in the order in which the values were first seen.
pub fn render_simple_counts(counts: &FrequencyCount) -> String {
    if counts.is_empty() {
        return format!("{}\n", NO_DATA_MESSAGE);
    }
    let mut res = "Conteo de Respuestas\n".to_string();
    for (choice, count) in counts.entries() {
        res.push_str(&format!("{:<40}: {}\n", choice.to_string(), count));
    }
    res
}

/// The free text answers with their author. Long answers are wrapped.
pub fn render_open_responses(pairs: &[ExpandedPair]) -> String {
    if pairs.is_empty() {
        return format!("{}\n", NO_DATA_MESSAGE);
    }
    let mut res = "Respuestas Abiertas y Autor\n".to_string();
    res.push_str(&format!(
        "{:<85}| AUTOR\n",
        format!("RESPUESTA COMPLETA (Max {} chars)", OPEN_RESPONSE_WIDTH)
    ));
    res.push_str(&format!("{}\n", "-".repeat(120)));

    for pair in pairs.iter() {
        let text = match &pair.choice {
            Choice::Value(s) if !s.is_empty() => s.clone(),
            _ => MISSING_LABEL.to_string(),
        };
        let chars: Vec<char> = text.chars().collect();
        for (idx, chunk) in chars.chunks(OPEN_RESPONSE_WIDTH).enumerate() {
            let line: String = chunk.iter().collect();
            if idx == 0 {
                res.push_str(&format!("{:<85} | {}\n", line, pair.identity));
            } else {
                res.push_str(&format!("{:<85} |\n", line));
            }
        }
        res.push('\n');
    }
    res
}

pub fn render_voters(choice: &Choice, voters: &[String]) -> String {
    let mut res = format!(
        "OPCIÓN SELECCIONADA: '{}' (TOTAL: {})\n",
        choice,
        voters.len()
    );
    res.push_str(&format!("{}\n", "=".repeat(48)));
    if voters.is_empty() {
        res.push_str(NO_VOTERS_MESSAGE);
        res.push('\n');
    } else {
        for name in voters.iter() {
            res.push_str(&format!("- {}\n", name));
        }
    }
    res
}

pub fn render_menus(menus: &Menus) -> String {
    let mut res = "Estudiantes\n".to_string();
    for entry in menus.students.iter() {
        res.push_str(&format!("  {}\n", entry.label));
    }
    res.push_str("Preguntas\n");
    for entry in menus.questions.iter() {
        if let ViewAction::ShowQuestion(key) = &entry.action {
            res.push_str(&format!("  {:<45} [{}]\n", entry.label, key));
        }
    }
    res
}
