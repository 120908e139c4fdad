//! Main TUI application state machine.
//!
//! Handles:
//! - Screen navigation (Home → Assessment → Results)
//! - Input event handling, one handler per screen
//! - Session state (last result, report status)

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};

use crate::adapters::artifacts::FsArtifactStore;
use crate::adapters::forest::ForestModel;
use crate::application::{InferenceService, ReportWriter};
use crate::config::Settings;
use crate::domain::Assessment;
use crate::ports::{ArtifactStore, RiskClassifier};
use crate::HeartGuardError;

use super::ui::{
    assessment::{render_assessment_form, AssessmentFormState},
    home::render_home,
    render_disclaimer,
    results::{render_results, ReportStatus},
};

/// Shown on the form when results are requested before any submission.
pub const NO_RESULT_NOTICE: &str = "Please complete the assessment first.";

/// Command named in startup diagnostics when the model cannot be loaded.
pub const TRAIN_COMMAND: &str = "heartguard-train train";

/// Current screen/view in the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Home,
    Assessment,
    Results,
}

/// Per-session data carried across screens.
#[derive(Default)]
pub struct Session {
    /// Last completed assessment
    pub result: Option<Assessment>,

    /// Form buffers
    pub form: AssessmentFormState,

    /// Outcome of the last report download for the current result
    pub report_status: Option<ReportStatus>,
}

impl Session {
    /// Drop the stored result and wipe the form.
    pub fn reset(&mut self) {
        self.result = None;
        self.report_status = None;
        self.form.clear_sensitive();
    }
}

/// Main application state
pub struct App<C: RiskClassifier> {
    /// Current screen
    screen: Screen,

    /// Whether the app should quit
    should_quit: bool,

    /// Session context
    session: Session,

    /// Inference service over the loaded classifier
    inference: InferenceService<C>,

    /// Report output
    reports: ReportWriter,
}

impl App<ForestModel> {
    /// Create a new application from settings, loading the persisted model.
    ///
    /// # Errors
    /// Returns error if the artifacts are missing, corrupt or inconsistent.
    pub fn new(settings: &Settings) -> Result<Self> {
        let store = FsArtifactStore::new(&settings.model_dir);
        if !store.has_artifacts() {
            return Err(anyhow!(
                "No trained model found in {:?}. Run `{TRAIN_COMMAND}` first.",
                store.dir()
            ));
        }

        let model = store.load().map_err(|e| {
            anyhow!(
                "Failed to load model from {:?}: {}. Re-run `{TRAIN_COMMAND}`.",
                store.dir(),
                e
            )
        })?;
        tracing::info!("Model loaded from {:?}", store.dir());

        Ok(Self::with_dependencies(
            InferenceService::new(Arc::new(model)),
            ReportWriter::new(&settings.report_dir),
        ))
    }
}

impl<C: RiskClassifier> App<C> {
    /// Create application with injected dependencies.
    pub fn with_dependencies(inference: InferenceService<C>, reports: ReportWriter) -> Self {
        Self {
            screen: Screen::Home,
            should_quit: false,
            session: Session::default(),
            inference,
            reports,
        }
    }

    /// Current screen.
    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Session context.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Whether a quit was requested.
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Run the main application loop.
    ///
    /// # Errors
    /// Returns error if terminal operations fail.
    pub fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.main_loop(&mut terminal);

        // Restore terminal
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    fn main_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        loop {
            terminal.draw(|f| {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Min(0), Constraint::Length(3)])
                    .split(f.area());

                match (self.screen, &self.session.result) {
                    (Screen::Results, Some(result)) => render_results(
                        f,
                        chunks[0],
                        result,
                        self.session.report_status.as_ref(),
                    ),
                    (Screen::Assessment, _) => {
                        render_assessment_form(f, chunks[0], &self.session.form)
                    }
                    _ => render_home(f, chunks[0], self.session.result.is_some()),
                }

                render_disclaimer(f, chunks[1]);
            })?;

            if event::poll(Duration::from_millis(100))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code, key.modifiers);
                    }
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    /// Dispatch a key press to the handler of the current screen.
    pub fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        if key == KeyCode::Char('q') && modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match self.screen {
            Screen::Home => self.handle_home_key(key),
            Screen::Assessment => self.handle_assessment_key(key),
            Screen::Results => self.handle_results_key(key),
        }
    }

    fn handle_home_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Enter => self.screen = Screen::Assessment,
            KeyCode::Char('r') | KeyCode::Char('R') => self.show_results(),
            KeyCode::Char('q') | KeyCode::Char('Q') => self.should_quit = true,
            _ => {}
        }
    }

    fn handle_assessment_key(&mut self, key: KeyCode) {
        let form = &mut self.session.form;
        match key {
            KeyCode::Esc => self.screen = Screen::Home,
            KeyCode::Up | KeyCode::BackTab => form.prev_field(),
            KeyCode::Down | KeyCode::Tab => form.next_field(),
            KeyCode::Left => form.cycle_choice(false),
            KeyCode::Right => form.cycle_choice(true),
            KeyCode::Char('s') | KeyCode::Char('S') => form.load_sample_data(),
            KeyCode::Char(c) => form.input_char(c),
            KeyCode::Backspace => form.delete_char(),
            KeyCode::Delete => form.clear_field(),
            KeyCode::Enter => self.submit_assessment(),
            _ => {}
        }
    }

    fn handle_results_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('n') | KeyCode::Char('N') => {
                self.session.reset();
                self.screen = Screen::Assessment;
            }
            KeyCode::Char('h') | KeyCode::Char('H') | KeyCode::Esc => {
                self.screen = Screen::Home;
            }
            KeyCode::Char('d') | KeyCode::Char('D') => self.download_report(),
            _ => {}
        }
    }

    /// Show the stored result, or redirect to the form when there is none.
    fn show_results(&mut self) {
        if self.session.result.is_some() {
            self.screen = Screen::Results;
        } else {
            tracing::debug!("Results requested without an assessment; redirecting");
            self.session.form.error_message = Some(NO_RESULT_NOTICE.to_string());
            self.screen = Screen::Assessment;
        }
    }

    fn submit_assessment(&mut self) {
        let input = match self.session.form.to_input() {
            Ok(input) => input,
            Err(e) => {
                self.session.form.error_message = Some(e);
                return;
            }
        };

        match self.inference.assess(input) {
            Ok(assessment) => {
                self.session.form.error_message = None;
                self.session.result = Some(assessment);
                self.session.report_status = None;
                self.screen = Screen::Results;
            }
            Err(HeartGuardError::Validation(msg)) => {
                self.session.form.error_message = Some(msg);
            }
            Err(e) => {
                tracing::error!("Assessment failed: {}", e);
                self.session.form.error_message = Some(format!("Assessment failed: {e}"));
            }
        }
    }

    fn download_report(&mut self) {
        let Some(result) = &self.session.result else {
            return;
        };

        self.session.report_status = Some(match self.reports.write(result) {
            Ok(path) => ReportStatus::Saved(path.display().to_string()),
            Err(e) => {
                tracing::error!("Failed to write report: {}", e);
                ReportStatus::Failed(e.to_string())
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ModelError, PatientRecord, Prediction, RiskLabel};

    /// Flags anyone over 55 as high risk.
    struct AgeThreshold;

    impl RiskClassifier for AgeThreshold {
        fn predict(&self, record: &PatientRecord) -> std::result::Result<Prediction, ModelError> {
            let high = if record.age > 55.0 { 0.8 } else { 0.2 };
            Ok(Prediction::from_votes([1.0 - high, high]))
        }
    }

    fn app(dir: &std::path::Path) -> App<AgeThreshold> {
        App::with_dependencies(
            InferenceService::new(Arc::new(AgeThreshold)),
            ReportWriter::new(dir),
        )
    }

    fn press(app: &mut App<AgeThreshold>, key: KeyCode) {
        app.handle_key(key, KeyModifiers::NONE);
    }

    #[test]
    fn test_results_without_submission_redirects() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut app = app(dir.path());
        assert_eq!(app.screen(), Screen::Home);

        press(&mut app, KeyCode::Char('r'));
        assert_eq!(app.screen(), Screen::Assessment);
        assert_eq!(
            app.session().form.error_message.as_deref(),
            Some(NO_RESULT_NOTICE)
        );
    }

    #[test]
    fn test_submit_reaches_results() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut app = app(dir.path());

        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('s'));
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.screen(), Screen::Results);
        let result = app.session().result.as_ref().expect("result stored");
        assert_eq!(result.prediction.label, RiskLabel::High);
        assert!((result.prediction.confidence - 80.0).abs() < 1e-9);
        assert_eq!(result.input.age, 63);
    }

    #[test]
    fn test_out_of_range_stays_on_form() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut app = app(dir.path());

        press(&mut app, KeyCode::Enter);
        // Age field: 50 → 5000
        press(&mut app, KeyCode::Char('0'));
        press(&mut app, KeyCode::Char('0'));
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.screen(), Screen::Assessment);
        assert!(app.session().result.is_none());
        assert!(app
            .session()
            .form
            .error_message
            .as_deref()
            .is_some_and(|m| m.contains("Age")));
    }

    #[test]
    fn test_home_keeps_result_and_new_clears_it() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut app = app(dir.path());

        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.screen(), Screen::Results);

        press(&mut app, KeyCode::Char('h'));
        assert_eq!(app.screen(), Screen::Home);
        assert!(app.session().result.is_some());

        press(&mut app, KeyCode::Char('r'));
        assert_eq!(app.screen(), Screen::Results);

        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.screen(), Screen::Assessment);
        assert!(app.session().result.is_none());
        assert!(app.session().form.error_message.is_none());
    }

    #[test]
    fn test_download_writes_report() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut app = app(dir.path());

        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('d'));

        let Some(ReportStatus::Saved(path)) = &app.session().report_status else {
            panic!("report not saved: {:?}", app.session().report_status);
        };
        let text = std::fs::read_to_string(path).expect("read report");
        assert!(text.contains("Low Risk of Heart Disease"));
    }

    fn startup_error(model_dir: &std::path::Path) -> String {
        let settings = Settings {
            model_dir: model_dir.to_path_buf(),
            ..Settings::default()
        };
        match App::new(&settings) {
            Ok(_) => panic!("started without a usable model in {model_dir:?}"),
            Err(e) => e.to_string(),
        }
    }

    #[test]
    fn test_startup_fails_without_artifacts() {
        let dir = tempfile::tempdir().expect("tempdir");
        let message = startup_error(dir.path());
        assert!(message.contains("No trained model found"), "{message}");
        assert!(message.contains(TRAIN_COMMAND), "{message}");
    }

    #[test]
    fn test_startup_fails_on_tampered_scaler() {
        use crate::adapters::artifacts::SCALER_FILE;
        use crate::adapters::forest::tests::synthetic_cohort;
        use crate::domain::ForestParams;

        let dir = tempfile::tempdir().expect("tempdir");
        let (records, labels) = synthetic_cohort(30);
        let params = ForestParams {
            n_trees: 5,
            ..ForestParams::default()
        };
        let model = ForestModel::fit(&records, &labels, params).expect("Should fit");
        let store = FsArtifactStore::new(dir.path());
        store.save(&model).expect("Should save");

        let settings = Settings {
            model_dir: dir.path().to_path_buf(),
            ..Settings::default()
        };
        assert!(App::new(&settings).is_ok());

        std::fs::write(dir.path().join(SCALER_FILE), b"{}").expect("write");
        let message = startup_error(dir.path());
        assert!(message.contains("Failed to load model"), "{message}");
        assert!(message.contains(TRAIN_COMMAND), "{message}");
    }

    #[test]
    fn test_quit_keys() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut app = app(dir.path());

        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.should_quit());

        app.handle_key(KeyCode::Char('q'), KeyModifiers::CONTROL);
        assert!(app.should_quit());
    }
}
