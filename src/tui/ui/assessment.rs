//! Assessment form: 13 clinical fields.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use zeroize::Zeroize;

use crate::domain::{
    AssessmentInput, ChestPainType, Choice, RestingEcg, Sex, StSlope, Thalassemia, YesNo,
};
use crate::tui::styles::MedicalTheme;

const MAX_INPUT_LEN: usize = 6;
const VESSEL_OPTIONS: [&str; 5] = ["0", "1", "2", "3", "4"];

const AGE: usize = 0;
const SEX: usize = 1;
const CHEST_PAIN: usize = 2;
const RESTING_BP: usize = 3;
const CHOLESTEROL: usize = 4;
const FASTING_BLOOD_SUGAR: usize = 5;
const RESTING_ECG: usize = 6;
const MAX_HEART_RATE: usize = 7;
const EXERCISE_ANGINA: usize = 8;
const ST_DEPRESSION: usize = 9;
const ST_SLOPE: usize = 10;
const MAJOR_VESSELS: usize = 11;
const THALASSEMIA: usize = 12;

/// How a field is edited.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    /// Free numeric text
    Number,
    /// One of a fixed list, cycled with ←/→
    Select {
        options: Vec<&'static str>,
        selected: usize,
    },
}

/// Form field definition
#[derive(Debug, Clone)]
pub struct FormField {
    pub label: &'static str,
    pub hint: &'static str,
    pub kind: FieldKind,
    pub value: String,
}

impl FormField {
    fn number(label: &'static str, hint: &'static str) -> Self {
        Self {
            label,
            hint,
            kind: FieldKind::Number,
            value: String::new(),
        }
    }

    fn select(label: &'static str, options: Vec<&'static str>) -> Self {
        Self {
            label,
            hint: "←→ to change",
            kind: FieldKind::Select {
                options,
                selected: 0,
            },
            value: String::new(),
        }
    }

    fn selected(&self) -> usize {
        match self.kind {
            FieldKind::Select { selected, .. } => selected,
            FieldKind::Number => 0,
        }
    }

    fn set_selected(&mut self, index: usize) {
        if let FieldKind::Select { options, selected } = &mut self.kind {
            *selected = index.min(options.len().saturating_sub(1));
        }
    }

    /// Text shown in the field box.
    #[must_use]
    pub fn display(&self) -> &str {
        match &self.kind {
            FieldKind::Number => &self.value,
            FieldKind::Select { options, selected } => {
                options.get(*selected).copied().unwrap_or_default()
            }
        }
    }
}

/// Assessment form state
pub struct AssessmentFormState {
    pub fields: Vec<FormField>,
    pub selected_field: usize,
    pub error_message: Option<String>,
}

impl Default for AssessmentFormState {
    fn default() -> Self {
        let mut state = Self {
            fields: vec![
                FormField::number("Age", "years (1-120)"),
                FormField::select("Sex", Sex::labels()),
                FormField::select("Chest Pain Type", ChestPainType::labels()),
                FormField::number("Resting Blood Pressure", "mm Hg (90-200)"),
                FormField::number("Serum Cholesterol", "mg/dl (100-600)"),
                FormField::select("Fasting Blood Sugar > 120 mg/dl", YesNo::labels()),
                FormField::select("Resting ECG", RestingEcg::labels()),
                FormField::number("Max Heart Rate", "bpm (60-220)"),
                FormField::select("Exercise Induced Angina", YesNo::labels()),
                FormField::number("ST Depression", "0.0-6.2"),
                FormField::select("Peak Exercise ST Slope", StSlope::labels()),
                FormField::select("Major Vessels Colored", VESSEL_OPTIONS.to_vec()),
                FormField::select("Thalassemia", Thalassemia::labels()),
            ],
            selected_field: 0,
            error_message: None,
        };
        state.load_from(&AssessmentInput::default());
        state
    }
}

impl AssessmentFormState {
    /// Move to the next field
    pub fn next_field(&mut self) {
        self.selected_field = (self.selected_field + 1) % self.fields.len();
    }

    /// Move to the previous field
    pub fn prev_field(&mut self) {
        if self.selected_field == 0 {
            self.selected_field = self.fields.len() - 1;
        } else {
            self.selected_field -= 1;
        }
    }

    /// Cycle the current select field; numeric fields are left alone.
    pub fn cycle_choice(&mut self, forward: bool) {
        if let FieldKind::Select { options, selected } =
            &mut self.fields[self.selected_field].kind
        {
            let n = options.len();
            *selected = if forward {
                (*selected + 1) % n
            } else {
                (*selected + n - 1) % n
            };
            self.error_message = None;
        }
    }

    /// Add a character to the current numeric field
    pub fn input_char(&mut self, c: char) {
        let field = &mut self.fields[self.selected_field];
        if field.kind != FieldKind::Number || field.value.len() >= MAX_INPUT_LEN {
            return;
        }
        if c.is_ascii_digit() || c == '.' || c == '-' {
            field.value.push(c);
            self.error_message = None;
        }
    }

    /// Delete the last character
    pub fn delete_char(&mut self) {
        self.fields[self.selected_field].value.pop();
    }

    /// Clear the current field
    pub fn clear_field(&mut self) {
        self.fields[self.selected_field].value.clear();
    }

    /// Fill every field from an input.
    pub fn load_from(&mut self, input: &AssessmentInput) {
        self.fields[AGE].value = input.age.to_string();
        self.fields[SEX].set_selected(input.sex.index());
        self.fields[CHEST_PAIN].set_selected(input.chest_pain.index());
        self.fields[RESTING_BP].value = input.resting_bp.to_string();
        self.fields[CHOLESTEROL].value = input.cholesterol.to_string();
        self.fields[FASTING_BLOOD_SUGAR].set_selected(input.fasting_blood_sugar.index());
        self.fields[RESTING_ECG].set_selected(input.resting_ecg.index());
        self.fields[MAX_HEART_RATE].value = input.max_heart_rate.to_string();
        self.fields[EXERCISE_ANGINA].set_selected(input.exercise_angina.index());
        self.fields[ST_DEPRESSION].value = format!("{:.1}", input.st_depression);
        self.fields[ST_SLOPE].set_selected(input.st_slope.index());
        self.fields[MAJOR_VESSELS].set_selected(usize::from(input.major_vessels));
        self.fields[THALASSEMIA].set_selected(input.thalassemia.index());
        self.error_message = None;
    }

    /// Load the reference patient.
    pub fn load_sample_data(&mut self) {
        self.load_from(&AssessmentInput::sample());
    }

    /// Wipe all field buffers and restore the defaults.
    pub fn clear_sensitive(&mut self) {
        for field in &mut self.fields {
            field.value.zeroize();
        }
        self.load_from(&AssessmentInput::default());
        self.selected_field = 0;
    }

    fn number<T: std::str::FromStr>(&self, index: usize) -> Result<T, String> {
        let field = &self.fields[index];
        field
            .value
            .trim()
            .parse()
            .map_err(|_| format!("{}: Invalid number", field.label))
    }

    fn choice<C: Choice>(&self, index: usize) -> C {
        let i = self.fields[index].selected().min(C::ALL.len() - 1);
        C::ALL[i]
    }

    /// Parse the form into an input. Ranges are checked by the caller.
    pub fn to_input(&self) -> Result<AssessmentInput, String> {
        Ok(AssessmentInput {
            age: self.number(AGE)?,
            sex: self.choice(SEX),
            chest_pain: self.choice(CHEST_PAIN),
            resting_bp: self.number(RESTING_BP)?,
            cholesterol: self.number(CHOLESTEROL)?,
            fasting_blood_sugar: self.choice(FASTING_BLOOD_SUGAR),
            resting_ecg: self.choice(RESTING_ECG),
            max_heart_rate: self.number(MAX_HEART_RATE)?,
            exercise_angina: self.choice(EXERCISE_ANGINA),
            st_depression: self.number(ST_DEPRESSION)?,
            st_slope: self.choice(ST_SLOPE),
            major_vessels: self.fields[MAJOR_VESSELS].selected() as u8,
            thalassemia: self.choice(THALASSEMIA),
        })
    }
}

/// Render the assessment form
pub fn render_assessment_form(f: &mut Frame, area: Rect, state: &AssessmentFormState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Form
            Constraint::Length(3), // Footer/error
        ])
        .split(area);

    render_form_header(f, chunks[0]);
    render_form_fields(f, chunks[1], state);
    render_form_footer(f, chunks[2], state);
}

fn render_form_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", MedicalTheme::body()),
        Span::styled("Heart Health Assessment", MedicalTheme::heading()),
        Span::styled(
            " │ Cleveland clinical features",
            MedicalTheme::dim(),
        ),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(MedicalTheme::outline(false)),
    );

    f.render_widget(header, area);
}

fn render_form_fields(f: &mut Frame, area: Rect, state: &AssessmentFormState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .margin(1)
        .split(area);

    let mid = (state.fields.len() + 1) / 2;
    render_field_column(f, columns[0], &state.fields[..mid], 0, state.selected_field);
    render_field_column(
        f,
        columns[1],
        &state.fields[mid..],
        mid,
        state.selected_field,
    );
}

fn render_field_column(
    f: &mut Frame,
    area: Rect,
    fields: &[FormField],
    offset: usize,
    selected: usize,
) {
    let constraints: Vec<Constraint> = fields
        .iter()
        .map(|_| Constraint::Length(3))
        .chain(std::iter::once(Constraint::Min(0)))
        .collect();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (i, field) in fields.iter().enumerate() {
        let is_selected = offset + i == selected;
        let (border_style, title_style) = if is_selected {
            (MedicalTheme::outline(true), MedicalTheme::accent())
        } else {
            (MedicalTheme::outline(false), MedicalTheme::dim())
        };

        let block = Block::default()
            .title(Span::styled(format!(" {} ", field.label), title_style))
            .borders(Borders::ALL)
            .border_style(border_style);

        let mut spans = vec![Span::raw(" ")];
        match &field.kind {
            FieldKind::Number if field.value.is_empty() => {
                spans.push(Span::styled(field.hint, MedicalTheme::faint()));
            }
            FieldKind::Number => {
                spans.push(Span::styled(field.display(), MedicalTheme::body()));
                spans.push(Span::styled(format!("  {}", field.hint), MedicalTheme::faint()));
            }
            FieldKind::Select { .. } => {
                let arrow = if is_selected { MedicalTheme::accent() } else { MedicalTheme::faint() };
                spans.push(Span::styled("◀ ", arrow));
                spans.push(Span::styled(field.display(), MedicalTheme::body()));
                spans.push(Span::styled(" ▶", arrow));
            }
        }
        if is_selected && field.kind == FieldKind::Number {
            spans.push(Span::styled("▌", MedicalTheme::cursor()));
        }

        f.render_widget(Paragraph::new(Line::from(spans)).block(block), chunks[i]);
    }
}

fn render_form_footer(f: &mut Frame, area: Rect, state: &AssessmentFormState) {
    let content = if let Some(err) = &state.error_message {
        Line::from(vec![
            Span::styled("! ", MedicalTheme::alert()),
            Span::styled(err.clone(), MedicalTheme::alert()),
        ])
    } else {
        Line::from(vec![
            Span::styled("[↑↓] ", MedicalTheme::accent()),
            Span::styled("Navigate ", MedicalTheme::dim()),
            Span::styled("[←→] ", MedicalTheme::accent()),
            Span::styled("Change ", MedicalTheme::dim()),
            Span::styled("[Enter] ", MedicalTheme::accent()),
            Span::styled("Predict ", MedicalTheme::dim()),
            Span::styled("[S] ", MedicalTheme::accent()),
            Span::styled("Sample Data ", MedicalTheme::dim()),
            Span::styled("[Esc] ", MedicalTheme::accent()),
            Span::styled("Home", MedicalTheme::dim()),
        ])
    };

    let footer = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(MedicalTheme::outline(false)),
    );

    f.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_parse_to_default_input() {
        let form = AssessmentFormState::default();
        assert_eq!(form.fields.len(), 13);
        assert_eq!(form.to_input().expect("Should parse"), AssessmentInput::default());
    }

    #[test]
    fn test_sample_data_round_trips() {
        let mut form = AssessmentFormState::default();
        form.load_sample_data();
        assert_eq!(form.to_input().expect("Should parse"), AssessmentInput::sample());
        assert_eq!(form.fields[THALASSEMIA].display(), "Fixed defect");
    }

    #[test]
    fn test_cycle_choice_wraps() {
        let mut form = AssessmentFormState::default();
        form.selected_field = CHEST_PAIN;
        form.cycle_choice(false);
        assert_eq!(form.to_input().expect("parse").chest_pain, ChestPainType::Asymptomatic);
        form.cycle_choice(true);
        assert_eq!(form.to_input().expect("parse").chest_pain, ChestPainType::TypicalAngina);

        // No effect on numeric fields
        form.selected_field = AGE;
        form.cycle_choice(true);
        assert_eq!(form.fields[AGE].value, "50");
    }

    #[test]
    fn test_numeric_editing() {
        let mut form = AssessmentFormState::default();
        form.clear_field();
        form.input_char('x');
        form.input_char('6');
        form.input_char('7');
        assert_eq!(form.to_input().expect("parse").age, 67);

        form.clear_field();
        assert_eq!(form.to_input().expect_err("empty"), "Age: Invalid number");

        // Typing into a select field is ignored
        form.selected_field = SEX;
        form.input_char('1');
        assert!(form.fields[SEX].value.is_empty());
    }

    #[test]
    fn test_clear_sensitive_restores_defaults() {
        let mut form = AssessmentFormState::default();
        form.load_sample_data();
        form.selected_field = 5;
        form.clear_sensitive();
        assert_eq!(form.selected_field, 0);
        assert_eq!(form.to_input().expect("parse"), AssessmentInput::default());
    }
}
