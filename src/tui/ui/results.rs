//! Results screen: risk headline, data summary, recommendations.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::domain::Assessment;
use crate::tui::styles::{MedicalTheme, HEART};

pub const RECOMMENDATIONS: [&str; 4] = [
    "Consult a healthcare provider for a detailed assessment.",
    "Increase physical activity under medical guidance.",
    "Adopt a heart-healthy diet (e.g., Mediterranean).",
    "Monitor blood pressure and cholesterol regularly.",
];

/// Outcome of the last report download, shown under the actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportStatus {
    Saved(String),
    Failed(String),
}

/// Headline line, e.g. "High Risk of Heart Disease (Confidence: 73.3%)".
#[must_use]
pub fn headline(assessment: &Assessment) -> String {
    let p = &assessment.prediction;
    format!("{} (Confidence: {:.1}%)", p.label.headline(), p.confidence)
}

/// Key inputs echoed on screen as (label, value) pairs.
#[must_use]
pub fn summary_lines(assessment: &Assessment) -> [(&'static str, String); 5] {
    let input = &assessment.input;
    [
        ("Age", format!("{} years", input.age)),
        ("Sex", input.sex.to_string()),
        ("Blood Pressure", format!("{} mm Hg", input.resting_bp)),
        ("Cholesterol", format!("{} mg/dl", input.cholesterol)),
        ("Max Heart Rate", format!("{} bpm", input.max_heart_rate)),
    ]
}

/// Render the results screen
pub fn render_results(
    f: &mut Frame,
    area: Rect,
    assessment: &Assessment,
    report: Option<&ReportStatus>,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Body
            Constraint::Length(4), // Actions + report status
        ])
        .split(area);

    let header = Paragraph::new(Line::from(vec![
        Span::styled(format!(" {HEART} "), MedicalTheme::alert()),
        Span::styled("Your Heart Health Results", MedicalTheme::heading()),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(MedicalTheme::outline(false)),
    );
    f.render_widget(header, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(chunks[1]);

    render_assessment_panel(f, body[0], assessment);
    render_recommendations(f, body[1]);
    render_actions(f, chunks[2], report);
}

fn render_assessment_panel(f: &mut Frame, area: Rect, assessment: &Assessment) {
    let label = assessment.prediction.label;
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(headline(assessment), MedicalTheme::risk(label))),
        Line::from(""),
        Line::from(Span::styled(label.guidance(), MedicalTheme::body())),
        Line::from(""),
        Line::from(Span::styled("Summary of Your Data", MedicalTheme::accent())),
    ];
    for (name, value) in summary_lines(assessment) {
        lines.push(Line::from(vec![
            Span::styled(format!("  {name:<16}"), MedicalTheme::dim()),
            Span::styled(value, MedicalTheme::body()),
        ]));
    }

    let panel = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .title(Span::styled(" Risk Assessment ", MedicalTheme::accent()))
            .borders(Borders::ALL)
            .border_style(MedicalTheme::outline(true)),
    );
    f.render_widget(panel, area);
}

fn render_recommendations(f: &mut Frame, area: Rect) {
    let mut lines = vec![Line::from("")];
    for item in RECOMMENDATIONS {
        lines.push(Line::from(vec![
            Span::styled(" • ", MedicalTheme::accent()),
            Span::styled(item, MedicalTheme::body()),
        ]));
    }

    let panel = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
        Block::default()
            .title(Span::styled(" Recommendations ", MedicalTheme::dim()))
            .borders(Borders::ALL)
            .border_style(MedicalTheme::outline(false)),
    );
    f.render_widget(panel, area);
}

fn render_actions(f: &mut Frame, area: Rect, report: Option<&ReportStatus>) {
    let mut lines = vec![Line::from(vec![
        Span::styled("[N] ", MedicalTheme::accent()),
        Span::styled("New Assessment ", MedicalTheme::dim()),
        Span::styled("[D] ", MedicalTheme::accent()),
        Span::styled("Download Report ", MedicalTheme::dim()),
        Span::styled("[H] ", MedicalTheme::accent()),
        Span::styled("Back to Home", MedicalTheme::dim()),
    ])];
    match report {
        Some(ReportStatus::Saved(path)) => lines.push(Line::from(Span::styled(
            format!("Report saved to {path}"),
            MedicalTheme::ok(),
        ))),
        Some(ReportStatus::Failed(err)) => lines.push(Line::from(Span::styled(
            format!("Report not saved: {err}"),
            MedicalTheme::alert(),
        ))),
        None => {}
    }

    f.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::TOP)
                .border_style(MedicalTheme::outline(false)),
        ),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AssessmentInput, Prediction};

    #[test]
    fn test_headline_and_summary() {
        let input = AssessmentInput::sample();
        let a = Assessment::new(input, input.encode(), Prediction::from_votes([0.27, 0.73]));

        assert_eq!(headline(&a), "High Risk of Heart Disease (Confidence: 73.0%)");
        let summary = summary_lines(&a);
        assert_eq!(summary[0], ("Age", "63 years".to_string()));
        assert_eq!(summary[2].1, "145 mm Hg");
        assert_eq!(summary[3].1, "233 mg/dl");
        assert_eq!(summary[4].1, "150 bpm");
    }
}
