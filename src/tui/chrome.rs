// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Panorama-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Panorama and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

/// Layout, title, row, footer, and help helpers used by TUI rendering.
fn panel_width(area: Rect, collapsed: bool) -> u16 {
    if collapsed {
        return COLLAPSED_PANEL_WIDTH.min(area.width);
    }
    if area.width < 60 {
        area.width
    } else {
        (area.width * 2 / 5).max(32).min(area.width)
    }
}

fn view_title(label: &str, tail: Option<&str>) -> String {
    let mut title = format!("─ {label}");
    if let Some(tail) = tail {
        let tail = tail.trim();
        if !tail.is_empty() {
            title.push(' ');
            title.push_str(tail);
        }
    }
    title.push(' ');
    title
}

fn tree_row_line(view: &View, row: &TreeRow, style: Style, theme: &TuiTheme) -> Line<'static> {
    let marker = match (row.has_children, row.expanded) {
        (true, true) => "▾ ",
        (true, false) => "▸ ",
        (false, _) => "  ",
    };
    Line::from(vec![
        Span::raw("  ".repeat(row.depth)),
        Span::styled(marker, style),
        Span::styled(view.name().to_owned(), style),
        Span::styled(format!("  {}", zoom_label(view.zoom())), theme.dim_style()),
    ])
}

fn zoom_label(zoom: f64) -> String {
    format!("×{zoom:.2}")
}

fn pan_label(pan: Pan) -> String {
    format!("({:.1}, {:.1})", pan.x, pan.y)
}

fn signed(value: f64) -> String {
    if value >= 0.0 {
        format!("+{value:.1}")
    } else {
        format!("{value:.1}")
    }
}

fn delta_label(delta: &ViewportDelta) -> String {
    if delta.is_identity() {
        return "at saved view".to_owned();
    }
    format!(
        "×{:.2} ({}, {})",
        delta.zoom_ratio,
        signed(delta.pan_dx),
        signed(delta.pan_dy)
    )
}

/// Header readout: live viewport, then the difference to the selected view.
fn viewport_header_line<S: ViewStore>(app: &App<S>) -> Line<'static> {
    let viewport = app.manager.viewport();
    let mut spans = Vec::<Span<'static>>::new();
    footer_entry(&mut spans, "Zoom", &zoom_label(viewport.zoom()), true);
    footer_entry(&mut spans, "Pan", &pan_label(viewport.pan()), true);
    if let Some(delta) = app.manager.viewport_delta() {
        footer_entry(&mut spans, "Δ", &delta_label(&delta), true);
    }
    Line::from(spans)
}

fn detail_lines<S: ViewStore>(app: &App<S>) -> Vec<Line<'static>> {
    let dim = app.theme.dim_style();
    let Some(view) = app.manager.selected_view() else {
        return vec![Line::from(Span::styled("No view selected", dim))];
    };

    let parent = view
        .parent_id()
        .and_then(|parent_id| app.manager.view(parent_id))
        .map(|parent| parent.name().to_owned())
        .unwrap_or_else(|| "—".to_owned());

    let mut lines = vec![
        Line::from(Span::styled(view.name().to_owned(), help_header_style())),
        Line::from(format!("Id: {}", view.view_id())),
        Line::from(format!("Parent: {parent}")),
        Line::from(format!("Saved zoom: {}", zoom_label(view.zoom()))),
        Line::from(format!("Saved pan: {}", pan_label(view.pan()))),
        Line::raw(""),
    ];

    let comments = app.manager.comments_for(view.view_id());
    if comments.is_empty() {
        lines.push(Line::from(Span::styled("No comments", dim)));
    } else {
        lines.push(Line::from(Span::styled(
            format!("Comments ({})", comments.len()),
            help_header_style(),
        )));
        for comment in comments {
            lines.push(Line::from(format!("• {}", comment.text())));
        }
    }
    lines
}

fn footer_help_line<S: ViewStore>(app: &App<S>, toast: Option<&Toast>) -> Line<'static> {
    let mut spans = Vec::<Span<'static>>::new();
    let history = app.manager.history();

    for (label, key) in [("Save", "n"), ("Load", "⏎"), ("Move", "HJKL")] {
        footer_entry(&mut spans, label, key, true);
    }
    footer_entry(&mut spans, "Undo", "^z", history.can_undo());
    footer_entry(&mut spans, "Redo", "^y", history.can_redo());
    footer_entry(&mut spans, "Sort", app.manager.sort_mode().label(), true);
    footer_entry(&mut spans, "Help", "?", true);
    footer_entry(&mut spans, "Quit", "q", true);

    push_toast(&mut spans, toast, &app.theme);
    Line::from(spans)
}

fn prompt_footer_line(prompt: &Prompt, toast: Option<&Toast>, theme: &TuiTheme) -> Line<'static> {
    let mut spans = vec![
        Span::styled(
            format!("{}: ", prompt.kind.label()),
            key_style(),
        ),
        Span::raw(prompt.buffer.clone()),
        Span::raw("   "),
    ];
    footer_entry(&mut spans, "Accept", "Enter", true);
    footer_entry(&mut spans, "Cancel", "Esc", true);
    push_toast(&mut spans, toast, theme);
    Line::from(spans)
}

fn search_footer_line(search: &SearchState, toast: Option<&Toast>, theme: &TuiTheme) -> Line<'static> {
    let count = if search.query.is_empty() {
        None
    } else if search.results.is_empty() {
        Some("0".to_owned())
    } else {
        Some(format!("{}/{}", search.index + 1, search.results.len()))
    };

    let mut spans = vec![
        Span::styled(
            "/".to_owned(),
            key_style(),
        ),
        Span::raw(search.query.clone()),
        Span::raw("   "),
    ];
    if let Some(count) = count {
        spans.push(Span::styled(count, Style::default().fg(Color::LightGreen)));
    }
    for (label, key) in [("Next", "↑/↓"), ("Accept", "Enter"), ("Close", "Esc")] {
        footer_entry(&mut spans, label, key, true);
    }
    push_toast(&mut spans, toast, theme);
    Line::from(spans)
}

fn confirm_footer_line(name: &str, theme: &TuiTheme) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("Delete \"{name}\"? "),
            theme.notice_style(NoticeLevel::Warning),
        ),
        Span::styled(
            "y/x".to_owned(),
            key_style(),
        ),
        Span::raw(" confirm, any other key cancels"),
    ])
}

fn push_toast(spans: &mut Vec<Span<'static>>, toast: Option<&Toast>, theme: &TuiTheme) {
    let Some(toast) = toast else {
        return;
    };
    spans.push(Span::styled(" | ", Style::default().fg(FOOTER_LABEL_COLOR)));
    spans.push(Span::styled(
        toast.message.clone(),
        theme.notice_style(toast.level),
    ));
}

fn footer_brand_line() -> Line<'static> {
    Line::from(vec![Span::styled(
        FOOTER_BRAND.to_owned(),
        Style::default().fg(FOOTER_BRAND_COLOR),
    )])
}

fn key_style() -> Style {
    Style::default()
        .fg(FOOTER_KEY_COLOR)
        .add_modifier(Modifier::BOLD)
}

fn help_header_style() -> Style {
    Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD)
}

fn centered_rect(width_percent: u16, height_percent: u16, area: Rect) -> Rect {
    let [band] = Layout::vertical([Constraint::Percentage(height_percent)])
        .flex(Flex::Center)
        .areas(area);
    let [centered] = Layout::horizontal([Constraint::Percentage(width_percent)])
        .flex(Flex::Center)
        .areas(band);
    centered
}

fn help_entry_line(key: &str, desc: &str, key_width: usize) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{key:>key_width$}  "), key_style()),
        Span::raw(desc.to_owned()),
    ])
}

const HELP_ENTRIES: &[(&str, &[(&str, &str)])] = &[
    (
        "Views",
        &[
            ("j/k, ↑/↓", "Move the cursor"),
            ("Enter", "Load the view under the cursor"),
            ("n", "Save the current viewport as a new view"),
            ("r", "Rename view"),
            ("u", "Overwrite view with the current viewport"),
            ("x", "Delete view (asks first)"),
            ("c", "Comment on view"),
            ("Space", "Expand or collapse children"),
            ("o", "Cycle sort mode"),
            ("/", "Fuzzy search by name"),
        ],
    ),
    (
        "Tree",
        &[
            ("L", "Nest under the view above"),
            ("H", "Move out one level"),
            ("K/J", "Swap with the sibling above/below"),
            ("drag", "Reorder, or drag right to nest"),
            ("Ctrl-z", "Undo"),
            ("Ctrl-y, Ctrl-Shift-z", "Redo"),
        ],
    ),
    (
        "Viewport",
        &[
            ("+/-", "Zoom in/out"),
            ("←/→", "Pan horizontally"),
            ("PgUp/PgDn", "Pan vertically"),
            ("p", "Collapse or expand the panel"),
            ("?", "Toggle this help"),
            ("q", "Quit"),
        ],
    ),
];

fn help_lines() -> Vec<Line<'static>> {
    let key_col_width = HELP_ENTRIES
        .iter()
        .flat_map(|(_, entries)| entries.iter())
        .map(|(key, _)| key.chars().count())
        .max()
        .unwrap_or(0);

    let mut lines = Vec::<Line<'static>>::new();
    for (idx, (header, entries)) in HELP_ENTRIES.iter().enumerate() {
        if idx > 0 {
            lines.push(Line::raw(""));
        }
        lines.push(Line::from(Span::styled(
            format!("--- {header} ---"),
            help_header_style(),
        )));
        for (key, desc) in entries.iter() {
            lines.push(help_entry_line(key, desc, key_col_width));
        }
    }
    lines
}

fn render_help(frame: &mut Frame<'_>, main_area: Rect) {
    let area = centered_rect(70, 80, main_area);
    frame.render_widget(Clear, area);

    let paragraph = Paragraph::new(Text::from(help_lines()))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(view_title("Help", Some("— Esc to close"))),
        )
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

/// Appends `Label:key`, separated from earlier entries. Unavailable keys are dimmed.
fn footer_entry(spans: &mut Vec<Span<'static>>, label: &str, key: &str, available: bool) {
    if !spans.is_empty() {
        spans.push(Span::styled(" | ", Style::default().fg(FOOTER_LABEL_COLOR)));
    }
    spans.push(Span::styled(
        format!("{label}:"),
        Style::default().fg(FOOTER_LABEL_COLOR),
    ));
    let key_style = if available {
        key_style()
    } else {
        key_style().fg(Color::DarkGray)
    };
    spans.push(Span::styled(key.to_owned(), key_style));
}
