use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::agent::VoiceAgent;

pub const HERO_TITLE: &str = "ATELIER";
pub const HERO_SUBTITLE: &str = "Voice Design Agent";
pub const HERO_TAGLINE: &str = "Speak your intent. Get instant, professional design direction: \
ideas, palettes, fonts, layouts, and resources, all with a human-like voice.";

pub const TRANSCRIPT_PLACEHOLDER: &str =
    "Press Space and speak. Try: \"Suggest tech color palettes with purple accent.\"";

/// Feature grid content
pub const FEATURES: &[(&str, &str)] = &[
    (
        "Voice In / Voice Out",
        "Speak naturally. Get clear, human-sounding answers.",
    ),
    (
        "Design Research",
        "Trends, styles, UI patterns, and inspiration on demand.",
    ),
    (
        "Idea Generation",
        "Logos, posters, branding, thumbnails, reels, ads, packaging, and social.",
    ),
    (
        "Craft Toolkit",
        "Palettes, font pairs, gradients, shadows, layouts, compositions.",
    ),
    (
        "Brief to Tasks",
        "Turn any client brief into actionable, prioritized steps.",
    ),
    (
        "Resources",
        "Icons, mockups, inspiration, palettes, references, UI kits, templates.",
    ),
];

pub const FOOTER_TEXT: &str =
    "Space=mic  Enter=ask  1-4=quick actions  q=quit  |  Atelier voice design agent";

pub fn draw_hero(frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(Span::styled(
            HERO_TITLE,
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            HERO_SUBTITLE,
            Style::default().fg(Color::Cyan),
        )),
        Line::from(""),
        Line::from(HERO_TAGLINE),
    ];

    let para = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(para, area);
}

pub fn draw_voice_panel(frame: &mut Frame, area: Rect, agent: &VoiceAgent) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // mic + transcript
            Constraint::Min(4),    // reply
            Constraint::Length(3), // quick actions
            Constraint::Length(1), // status line
        ])
        .split(area);

    let (mic_label, mic_style) = if agent.is_listening() {
        (
            " ● LISTENING ",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )
    } else {
        (
            " ○ mic off ",
            Style::default().fg(Color::DarkGray),
        )
    };

    let transcript = agent.transcript();
    let transcript_line = if transcript.is_empty() {
        Span::styled(TRANSCRIPT_PLACEHOLDER, Style::default().fg(Color::DarkGray))
    } else {
        Span::raw(transcript)
    };

    let command = Paragraph::new(Line::from(vec![
        Span::styled(mic_label, mic_style),
        Span::raw(" "),
        transcript_line,
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Voice Command "),
    );
    frame.render_widget(command, chunks[0]);

    let reply_title = if agent.is_loading() {
        " Thinking... "
    } else {
        " Reply "
    };
    let reply = Paragraph::new(agent.reply())
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title(reply_title));
    frame.render_widget(reply, chunks[1]);

    let actions = agent
        .actions()
        .iter()
        .enumerate()
        .map(|(i, action)| format!("[{}] {}", i + 1, action.label))
        .collect::<Vec<_>>()
        .join("   ");
    let quick = Paragraph::new(actions)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(" Quick "));
    frame.render_widget(quick, chunks[2]);

    let mut status = Vec::new();
    if let Some(hint) = agent.capability_hint() {
        status.push(Span::styled(hint, Style::default().fg(Color::Yellow)));
    }
    if agent.is_speaking() {
        status.push(Span::styled(
            " Speaking… ",
            Style::default().fg(Color::Green),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(status)), chunks[3]);
}

pub fn draw_features(frame: &mut Frame, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    for (i, column) in columns.iter().enumerate() {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)])
            .split(*column);

        for (j, row) in rows.iter().enumerate() {
            let (title, desc) = FEATURES[i * 2 + j];
            let para = Paragraph::new(desc).wrap(Wrap { trim: true }).block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" {} ", title)),
            );
            frame.render_widget(para, *row);
        }
    }
}

pub fn draw_footer(frame: &mut Frame, area: Rect) {
    let para = Paragraph::new(FOOTER_TEXT)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(para, area);
}
