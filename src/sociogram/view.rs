// Menus and view state. Only the chart surface touches display primitives.

use crate::sociogram::{
    chart::{BarChart, ChartSurface},
    render::*,
    *,
};

/// What happens when a menu entry or a bar of the chart is selected.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum ViewAction {
    ShowStudent(String),
    ShowQuestion(String),
    ShowVoters { question: String, choice: Choice },
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct MenuEntry {
    pub label: String,
    pub action: ViewAction,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Menus {
    pub students: Vec<MenuEntry>,
    pub questions: Vec<MenuEntry>,
}

/// The menus of a survey: the students in alphabetical order, then the questions in the
/// order of the survey.
pub fn build_menus(store: &SurveyStore) -> Menus {
    let students = store
        .all_display_identities()
        .into_iter()
        .map(|name| MenuEntry {
            label: name.clone(),
            action: ViewAction::ShowStudent(name),
        })
        .collect();
    let questions = store
        .question_keys()
        .iter()
        .map(|key| MenuEntry {
            label: format_key(key),
            action: ViewAction::ShowQuestion(key.clone()),
        })
        .collect();
    Menus {
        students,
        questions,
    }
}

/// The content to display after an action.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Screen {
    pub title: String,
    pub text: String,
    /// True when a chart is currently displayed on the surface.
    pub chart: bool,
}

/// The state of the display: the surface and the chart currently shown on it.
pub struct ViewState<S: ChartSurface> {
    surface: S,
    current_chart: Option<(BarChart, S::Handle)>,
}

impl<S: ChartSurface> ViewState<S> {
    pub fn new(surface: S) -> ViewState<S> {
        ViewState {
            surface,
            current_chart: None,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn current_chart(&self) -> Option<&BarChart> {
        self.current_chart.as_ref().map(|(c, _)| c)
    }

    /// Disposes the current chart, if any.
    pub fn clear(&mut self) {
        if let Some((chart, handle)) = self.current_chart.take() {
            debug!("clear: removing chart for {:?}", chart.question);
            drop(handle);
        }
    }

    fn show_chart(&mut self, chart: BarChart) {
        // The previous chart goes away before the new one is drawn.
        self.clear();
        let handle = self.surface.draw(&chart);
        self.current_chart = Some((chart, handle));
    }

    /// The action triggered by a click on the bar at the given index of the current chart.
    pub fn click_bar(&self, index: usize) -> Option<ViewAction> {
        let chart = self.current_chart()?;
        chart.label_at(index).map(|choice| ViewAction::ShowVoters {
            question: chart.question.clone(),
            choice: choice.clone(),
        })
    }

    pub fn perform(&mut self, store: &SurveyStore, action: &ViewAction) -> SgResult<Screen> {
        debug!("perform: {:?}", action);
        match action {
            ViewAction::ShowStudent(name) => {
                self.clear();
                let record = store
                    .get_record(name)
                    .context(UnknownStudentSnafu { name })?;
                Ok(Screen {
                    title: format!("Detalle de Respuestas: {}", name),
                    text: render_student_detail(store, record),
                    chart: false,
                })
            }
            ViewAction::ShowQuestion(key) => {
                self.clear();
                let agg = explode_and_count(store, key);
                let text = match store.classify(key) {
                    QuestionKind::Graphical if agg.counts.is_empty() => {
                        format!("{}\n", NO_DATA_MESSAGE)
                    }
                    QuestionKind::Graphical => {
                        self.show_chart(BarChart::from_counts(key, &agg.counts));
                        String::new()
                    }
                    QuestionKind::OpenText => render_open_responses(&agg.pairs),
                    QuestionKind::Simple => render_simple_counts(&agg.counts),
                };
                Ok(Screen {
                    title: format!("Análisis Global: {}", format_key(key)),
                    text,
                    chart: self.current_chart.is_some(),
                })
            }
            ViewAction::ShowVoters { question, choice } => {
                // The chart stays on display.
                let voters = voters_for(store, question, choice);
                Ok(Screen {
                    title: format!("Votantes: {}", format_key(question)),
                    text: render_voters(choice, &voters),
                    chart: self.current_chart.is_some(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sociogram::chart::TextChartSurface;
    use survey_tally::builder::RespondentBuilder;

    fn strings(l: &[&str]) -> Vec<String> {
        l.iter().map(|s| s.to_string()).collect()
    }

    fn store() -> SurveyStore {
        let records = vec![
            RespondentBuilder::new("LUIS DIAZ")
                .course("1EM-A")
                .add_single("Nombre", "LUIS")
                .add_single("ApellidoPaterno", "DIAZ")
                .add_multiple("1_Recreo_Mas", &strings(&["ANA SOTO", "EVA PAZ"]))
                .add_single("1.1_Explicacion_Recreo_Mas", "Son amables")
                .add_single("6_Seguro", "Si")
                .build(),
            RespondentBuilder::new("ANA SOTO")
                .course("1EM-A")
                .add_single("Nombre", "ANA")
                .add_multiple("1_Recreo_Mas", &strings(&["EVA PAZ"]))
                .add_single("1.1_Explicacion_Recreo_Mas", "")
                .add_single("6_Seguro", "No")
                .build(),
            RespondentBuilder::new("EVA PAZ")
                .course("1EM-A")
                .add_multiple("1_Recreo_Mas", &[])
                .add_single("6_Seguro", "Si")
                .build(),
        ];
        SurveyStore::load(records, &TallyRules::default()).unwrap()
    }

    #[test]
    fn menus() {
        let m = build_menus(&store());
        let names: Vec<&str> = m.students.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(names, vec!["ANA SOTO", "EVA PAZ", "LUIS DIAZ"]);
        assert_eq!(
            m.questions[0],
            MenuEntry {
                label: "1. Recreo Mas".to_string(),
                action: ViewAction::ShowQuestion("1_Recreo_Mas".to_string())
            }
        );
        assert_eq!(m.questions.len(), 3);
    }

    #[test]
    fn graphical_question_and_click() {
        let s = store();
        let mut view = ViewState::new(TextChartSurface::new(10));
        let screen = view
            .perform(&s, &ViewAction::ShowQuestion("1_Recreo_Mas".to_string()))
            .unwrap();
        assert!(screen.chart);
        assert_eq!(screen.title, "Análisis Global: 1. Recreo Mas");
        assert_eq!(view.surface().live_charts(), 1);

        let action = view.click_bar(0).unwrap();
        assert_eq!(
            action,
            ViewAction::ShowVoters {
                question: "1_Recreo_Mas".to_string(),
                choice: Choice::from("EVA PAZ")
            }
        );
        let screen = view.perform(&s, &action).unwrap();
        assert!(screen.text.contains("(TOTAL: 2)"));
        assert!(screen.text.contains("- ANA SOTO\n- LUIS DIAZ\n"));
        assert!(view.click_bar(2).is_none());
    }

    #[test]
    fn charts_are_replaced() {
        let s = store();
        let mut view = ViewState::new(TextChartSurface::new(10));
        let q = ViewAction::ShowQuestion("1_Recreo_Mas".to_string());
        view.perform(&s, &q).unwrap();
        view.perform(&s, &q).unwrap();
        view.perform(&s, &q).unwrap();
        assert_eq!(view.surface().live_charts(), 1);

        let screen = view
            .perform(&s, &ViewAction::ShowQuestion("6_Seguro".to_string()))
            .unwrap();
        assert!(!screen.chart);
        assert_eq!(view.surface().live_charts(), 0);
        assert!(screen.text.starts_with("Conteo de Respuestas\n"));
    }

    #[test]
    fn open_text_question() {
        let s = store();
        let mut view = ViewState::new(TextChartSurface::new(10));
        let screen = view
            .perform(
                &s,
                &ViewAction::ShowQuestion("1.1_Explicacion_Recreo_Mas".to_string()),
            )
            .unwrap();
        assert!(screen.text.contains("Son amables"));
        assert!(screen.text.contains(MISSING_LABEL));
    }

    #[test]
    fn student_detail() {
        let s = store();
        let mut view = ViewState::new(TextChartSurface::new(10));
        let screen = view
            .perform(&s, &ViewAction::ShowStudent("LUIS DIAZ".to_string()))
            .unwrap();
        assert_eq!(screen.title, "Detalle de Respuestas: LUIS DIAZ");
        assert!(screen.text.starts_with("--- 1. Recreo Mas ---\nANA SOTO, EVA PAZ\n\n"));
        assert!(!screen.text.contains("Apellido"));
        assert!(!screen.text.contains("--- Nombre ---"));

        let res = view.perform(&s, &ViewAction::ShowStudent("NADIE".to_string()));
        assert!(matches!(res, Err(SociogramError::UnknownStudent { .. })));
    }

    #[test]
    fn unknown_question_has_no_data() {
        let s = store();
        let mut view = ViewState::new(TextChartSurface::new(10));
        let screen = view
            .perform(&s, &ViewAction::ShowQuestion("1_Recreo_Menos".to_string()))
            .unwrap();
        assert!(!screen.chart);
        assert_eq!(screen.text, format!("{}\n", NO_DATA_MESSAGE));
    }
}
