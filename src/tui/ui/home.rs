//! Home screen.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::tui::styles::{MedicalTheme, HEART};

/// Render the home screen
pub fn render_home(f: &mut Frame, area: Rect, has_result: bool) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(8), // Hero
            Constraint::Min(0),    // Actions
            Constraint::Length(3), // Key hints
        ])
        .split(area);

    let hero = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled(format!("{HEART} "), MedicalTheme::alert()),
            Span::styled("HeartGuard", MedicalTheme::heading()),
        ]),
        Line::from(Span::styled(
            "AI-Powered Heart Disease Detection System",
            MedicalTheme::accent(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Advanced machine learning technology for rapid, accurate cardiovascular risk assessment using comprehensive patient health data.",
            MedicalTheme::dim(),
        )),
    ];
    f.render_widget(
        Paragraph::new(hero)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        chunks[0],
    );

    let mut actions = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("  {HEART} Start Assessment  "),
            MedicalTheme::highlight(),
        )),
        Line::from(""),
    ];
    if has_result {
        actions.push(Line::from(Span::styled(
            "A previous result is available.",
            MedicalTheme::dim(),
        )));
    }
    f.render_widget(
        Paragraph::new(actions).alignment(Alignment::Center),
        chunks[1],
    );

    let hints = Line::from(vec![
        Span::styled("[Enter] ", MedicalTheme::accent()),
        Span::styled("Start Assessment ", MedicalTheme::dim()),
        Span::styled("[R] ", MedicalTheme::accent()),
        Span::styled("View Results ", MedicalTheme::dim()),
        Span::styled("[Q] ", MedicalTheme::accent()),
        Span::styled("Quit", MedicalTheme::dim()),
    ]);
    f.render_widget(
        Paragraph::new(hints).block(
            Block::default()
                .borders(Borders::TOP)
                .border_style(MedicalTheme::outline(false)),
        ),
        chunks[2],
    );
}
