//! # Rendering
//!
//! Draws the whole frame from immutable app state. Layout is header,
//! body, footer; the body is either the requests panel (full grid, or
//! brief grid plus detail pane) or the overview panel. Overlays render
//! last so they sit on top.

use crate::record::Record;
use crate::ui::app::{App, InputMode};
use crate::ui::context_menu::ContextMenu;
use crate::ui::controller::{RowDensity, ViewMode};
use crate::ui::detail_view::{DetailTab, DetailView};
use crate::ui::panel::PanelId;
use crate::ui::theme::Theme;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame,
};

pub fn render(frame: &mut Frame, app: &App) {
    // Main layout: Header + Body + Footer
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Body
            Constraint::Length(1), // Footer
        ])
        .split(frame.area());

    render_header(frame, app, main_chunks[0]);

    match app.active_panel {
        PanelId::Requests => render_requests_panel(frame, app, main_chunks[1]),
        PanelId::Overview => render_overview_panel(frame, app, main_chunks[1]),
    }

    render_footer(frame, app, main_chunks[2]);

    // Overlays sit on top of whatever the body drew.
    if let Some(menu) = &app.context_menu {
        render_context_menu(frame, &app.theme, menu, frame.area());
    }
    if app.show_info {
        render_info(frame, &app.theme, frame.area());
    }
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;

    let mut spans = vec![Span::styled(
        "  reqscope  ",
        Style::default()
            .fg(theme.accent)
            .add_modifier(Modifier::BOLD),
    )];
    for (i, panel) in [PanelId::Requests, PanelId::Overview].iter().enumerate() {
        let style = if *panel == app.active_panel {
            Style::default()
                .fg(theme.secondary)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.fg_dim)
        };
        spans.push(Span::styled(
            format!("[{}] {}  ", i + 1, panel.title()),
            style,
        ));
    }

    let header = Paragraph::new(Line::from(spans))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.fg_dim)),
        )
        .style(Style::default().bg(theme.bg));

    frame.render_widget(header, area);
}

fn render_requests_panel(frame: &mut Frame, app: &App, area: Rect) {
    if app.requests.container().viewing_record {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
            .split(area);

        render_record_grid(frame, app, chunks[0], true);
        if let Some(view) = app.requests.visible_view() {
            render_detail_pane(frame, &app.theme, view, chunks[1]);
        }
        return;
    }

    // Grid mode keeps a one-line preview of the highlighted row.
    let show_preview =
        app.requests.list().allow_popover() && app.requests.selected_record().is_some();
    if show_preview {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(area);
        render_record_grid(frame, app, chunks[0], false);
        render_preview_line(frame, app, chunks[1]);
    } else {
        render_record_grid(frame, app, area, false);
    }
}

fn render_record_grid(frame: &mut Frame, app: &App, area: Rect, brief: bool) {
    let theme = &app.theme;
    let list_view = app.requests.list();
    let rows = list_view.visible_rows();
    let total = list_view.records().len();

    let title = if rows.len() == total {
        format!(" Requests ({total}) ")
    } else {
        format!(" Requests ({}/{total}) ", rows.len())
    };

    let border_style = if app.requests.mode() == ViewMode::Grid {
        Style::default().fg(theme.accent)
    } else {
        Style::default().fg(theme.fg_dim)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(border_style);

    if rows.is_empty() {
        let message = if list_view.filter_query().is_some() {
            "No rows match the filter"
        } else {
            "No records captured"
        };
        let paragraph = Paragraph::new(message)
            .style(Style::default().fg(theme.fg_dim).bg(theme.bg))
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let spacious = app.requests.container().density == RowDensity::Spacious;
    let item_height: usize = if spacious { 2 } else { 1 };
    let visible = (usize::from(area.height.saturating_sub(2)) / item_height).max(1);
    let selected = list_view.selected_index();
    let offset = match selected {
        Some(s) if s + 1 > visible => s + 1 - visible,
        _ => 0,
    };

    let items: Vec<ListItem> = rows
        .iter()
        .enumerate()
        .skip(offset)
        .take(visible)
        .map(|(i, record)| {
            let is_selected = Some(i) == selected;
            let is_match = list_view.is_match(i);
            grid_row(theme, record, brief, spacious, is_selected, is_match)
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .style(Style::default().bg(theme.bg));
    frame.render_widget(list, area);
}

fn grid_row<'a>(
    theme: &Theme,
    record: &Record,
    brief: bool,
    spacious: bool,
    is_selected: bool,
    is_match: bool,
) -> ListItem<'a> {
    let url_style = if is_match {
        Style::default()
            .fg(theme.secondary)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.fg)
    };

    let mut spans = vec![
        Span::styled(
            format!("{:<7} ", clip(&record.method, 7)),
            Style::default().fg(theme.fg),
        ),
        Span::styled(
            format!("{:<12} ", clip(&record.status_display(), 12)),
            Style::default().fg(theme.status_color(record.status)),
        ),
    ];
    if !brief {
        spans.push(Span::styled(
            format!("{:<18} ", clip(&record.mime_type, 18)),
            Style::default().fg(theme.fg_dim),
        ));
        spans.push(Span::styled(
            format!("{:>9} ", record.size_display()),
            Style::default().fg(theme.fg_dim),
        ));
        let time = format!("{:.0} ms", record.duration_ms);
        spans.push(Span::styled(
            format!("{time:>9}  "),
            Style::default().fg(theme.fg_dim),
        ));
    }
    spans.push(Span::styled(record.url.clone(), url_style));

    let mut lines = vec![Line::from(spans)];
    if spacious {
        lines.push(Line::from(Span::styled(
            format!(
                "        started {}  {}",
                record.started_at.format("%H:%M:%S%.3f"),
                record.mime_type
            ),
            Style::default().fg(theme.fg_dim),
        )));
    }

    let mut item = ListItem::new(lines);
    if is_selected {
        item = item.style(
            Style::default()
                .bg(theme.selection_bg)
                .add_modifier(Modifier::BOLD),
        );
    }
    item
}

fn render_preview_line(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let Some(record) = app.requests.selected_record() else {
        return;
    };

    let line = Line::from(vec![
        Span::styled(" preview ", Style::default().fg(theme.fg_dim)),
        Span::styled(record.url.clone(), Style::default().fg(theme.fg)),
        Span::styled(
            format!("  {}  {}", record.mime_type, record.size_display()),
            Style::default().fg(theme.fg_dim),
        ),
    ]);
    frame.render_widget(
        Paragraph::new(line).style(Style::default().bg(theme.bg)),
        area,
    );
}

fn render_detail_pane(frame: &mut Frame, theme: &Theme, view: &DetailView, area: Rect) {
    let record = view.record();

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Detail {} ", record.id))
        .border_style(Style::default().fg(theme.accent));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Tab strip
            Constraint::Min(0),    // Tab body
            Constraint::Length(1), // Close hint
        ])
        .split(inner);

    let mut tab_spans = Vec::new();
    for tab in DetailTab::ALL {
        let style = if tab == view.tab() {
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(theme.fg_dim)
        };
        tab_spans.push(Span::styled(format!(" {} ", tab.title()), style));
    }
    frame.render_widget(Paragraph::new(Line::from(tab_spans)), chunks[0]);

    let lines = match view.tab() {
        DetailTab::Summary => summary_lines(theme, record),
        DetailTab::Headers => header_lines(theme, record),
        DetailTab::Response => response_lines(theme, record),
        DetailTab::Timing => timing_lines(theme, record),
    };
    let body = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((view.scroll(), 0))
        .style(Style::default().bg(theme.bg));
    frame.render_widget(body, chunks[1]);

    // Close affordance stays put no matter which tab is up.
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            "[Esc] close  [Tab] section  [PgUp/PgDn] scroll",
            Style::default().fg(theme.fg_dim),
        ))),
        chunks[2],
    );
}

fn labeled<'a>(theme: &Theme, label: &'a str, value: String, value_style: Style) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("{label:<10}"), Style::default().fg(theme.fg_dim)),
        Span::styled(value, value_style),
    ])
}

fn summary_lines<'a>(theme: &Theme, record: &Record) -> Vec<Line<'a>> {
    let fg = Style::default().fg(theme.fg);
    vec![
        labeled(theme, "URL:", record.url.clone(), fg),
        labeled(theme, "Method:", record.method.clone(), fg),
        labeled(
            theme,
            "Status:",
            record.status_display(),
            Style::default().fg(theme.status_color(record.status)),
        ),
        labeled(theme, "Type:", record.mime_type.clone(), fg),
        labeled(theme, "Size:", record.size_display(), fg),
        labeled(
            theme,
            "Started:",
            record
                .started_at
                .format("%Y-%m-%d %H:%M:%S%.3f UTC")
                .to_string(),
            fg,
        ),
        labeled(
            theme,
            "Duration:",
            format!("{:.1} ms", record.duration_ms),
            fg,
        ),
    ]
}

fn header_section<'a>(
    theme: &Theme,
    title: &'a str,
    headers: &[(String, String)],
) -> Vec<Line<'a>> {
    let mut lines = vec![Line::from(Span::styled(
        title,
        Style::default()
            .fg(theme.accent)
            .add_modifier(Modifier::BOLD),
    ))];
    if headers.is_empty() {
        lines.push(Line::from(Span::styled(
            "  (none)",
            Style::default().fg(theme.fg_dim),
        )));
    }
    for (name, value) in headers {
        lines.push(Line::from(vec![
            Span::styled(format!("  {name}: "), Style::default().fg(theme.secondary)),
            Span::styled(value.clone(), Style::default().fg(theme.fg)),
        ]));
    }
    lines
}

fn header_lines<'a>(theme: &Theme, record: &Record) -> Vec<Line<'a>> {
    let mut lines = header_section(theme, "Request Headers", &record.request_headers);
    lines.push(Line::from(""));
    lines.extend(header_section(theme, "Response Headers", &record.response_headers));
    lines
}

fn response_lines<'a>(theme: &Theme, record: &Record) -> Vec<Line<'a>> {
    match &record.response_body {
        Some(body) => body
            .lines()
            .map(|l| Line::from(Span::styled(l.to_string(), Style::default().fg(theme.fg))))
            .collect(),
        None => vec![Line::from(Span::styled(
            "(no body captured)",
            Style::default().fg(theme.fg_dim),
        ))],
    }
}

fn timing_lines<'a>(theme: &Theme, record: &Record) -> Vec<Line<'a>> {
    let phases = [
        ("Blocked:", record.timings.blocked),
        ("DNS:", record.timings.dns),
        ("Connect:", record.timings.connect),
        ("Send:", record.timings.send),
        ("Wait:", record.timings.wait),
        ("Receive:", record.timings.receive),
    ];

    let mut lines: Vec<Line> = phases
        .iter()
        .map(|(label, value)| match value {
            Some(ms) => labeled(
                theme,
                label,
                format!("{ms:.1} ms"),
                Style::default().fg(theme.fg),
            ),
            None => labeled(theme, label, "-".to_string(), Style::default().fg(theme.fg_dim)),
        })
        .collect();

    lines.push(Line::from(""));
    lines.push(labeled(
        theme,
        "Total:",
        format!("{:.1} ms", record.duration_ms),
        Style::default()
            .fg(theme.secondary)
            .add_modifier(Modifier::BOLD),
    ));
    lines
}

fn render_overview_panel(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let summary = app.overview.summary();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(8), Constraint::Min(0)])
        .split(area);

    let count =
        |value: usize, style: Style| Span::styled(format!("{value}"), style);
    let fg = Style::default().fg(theme.fg);
    let slowest = app
        .overview
        .slowest()
        .map_or_else(|| "-".to_string(), |(url, ms)| format!("{url}  ({ms:.0} ms)"));
    let lines = vec![
        labeled(theme, "Requests:", summary.total.to_string(), fg),
        Line::from(vec![
            Span::styled(format!("{:<10}", "Status:"), Style::default().fg(theme.fg_dim)),
            count(summary.ok, Style::default().fg(theme.success)),
            Span::styled(" ok  ", Style::default().fg(theme.fg_dim)),
            count(summary.redirect, Style::default().fg(theme.warning)),
            Span::styled(" redirect  ", Style::default().fg(theme.fg_dim)),
            count(
                summary.client_error + summary.server_error,
                Style::default().fg(theme.error),
            ),
            Span::styled(" error  ", Style::default().fg(theme.fg_dim)),
            count(summary.failed, Style::default().fg(theme.error)),
            Span::styled(" failed", Style::default().fg(theme.fg_dim)),
        ]),
        labeled(
            theme,
            "Bytes:",
            format!("{}", summary.total_bytes),
            fg,
        ),
        labeled(
            theme,
            "Time:",
            format!("{:.0} ms total", summary.total_time_ms),
            fg,
        ),
        labeled(theme, "Slowest:", slowest, fg),
    ];

    let summary_block = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Capture summary ")
                .border_style(Style::default().fg(theme.accent)),
        )
        .style(Style::default().bg(theme.bg));
    frame.render_widget(summary_block, chunks[0]);

    let failures = app.overview.failures();
    let items: Vec<ListItem> = failures
        .iter()
        .enumerate()
        .map(|(i, url)| {
            let mut item = ListItem::new(Line::from(vec![
                Span::styled(
                    format!(" {:>2}. ", i + 1),
                    Style::default().fg(theme.fg_dim),
                ),
                Span::styled(url.clone(), Style::default().fg(theme.error)),
            ]));
            if i == app.overview.selected() {
                item = item.style(
                    Style::default()
                        .bg(theme.selection_bg)
                        .add_modifier(Modifier::BOLD),
                );
            }
            item
        })
        .collect();

    let title = format!(" Failed requests ({}) ", failures.len());
    if items.is_empty() {
        let paragraph = Paragraph::new("No failures in this capture")
            .style(Style::default().fg(theme.fg_dim).bg(theme.bg))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(title)
                    .border_style(Style::default().fg(theme.fg_dim)),
            );
        frame.render_widget(paragraph, chunks[1]);
    } else {
        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(title)
                    .border_style(Style::default().fg(theme.fg_dim)),
            )
            .style(Style::default().bg(theme.bg));
        frame.render_widget(list, chunks[1]);
    }
}

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;

    let line = if app.input_mode == InputMode::Normal {
        let mut hints = String::new();
        for item in app.active_status_bar_items() {
            hints.push_str(&format!("[{}] {}  ", item.key, item.label));
        }
        hints.push_str("[m] menu  [i] help  [q] quit");

        let mut spans = vec![Span::styled(
            format!(" {hints}"),
            Style::default().fg(theme.fg_dim),
        )];
        if let Ok(status) = app.search_status.lock() {
            if let Some(display) = status.display() {
                spans.push(Span::styled(
                    format!("   {display}"),
                    Style::default()
                        .fg(theme.secondary)
                        .add_modifier(Modifier::BOLD),
                ));
            }
        }
        Line::from(spans)
    } else {
        let prompt = match app.input_mode {
            InputMode::Search => " search: ",
            InputMode::Filter => " filter: ",
            InputMode::Normal => " ",
        };
        Line::from(vec![
            Span::styled(
                prompt,
                Style::default()
                    .fg(theme.accent)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(app.input_buffer.clone(), Style::default().fg(theme.fg)),
            Span::styled("█", Style::default().fg(theme.accent)),
        ])
    };

    frame.render_widget(
        Paragraph::new(line).style(Style::default().bg(theme.bg)),
        area,
    );
}

fn render_context_menu(frame: &mut Frame, theme: &Theme, menu: &ContextMenu, area: Rect) {
    let height = u16::try_from(menu.len()).unwrap_or(u16::MAX).saturating_add(2);
    let popup = centered_rect(44, height, area);
    frame.render_widget(Clear, popup);

    let items: Vec<ListItem> = menu
        .items()
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let mut list_item = ListItem::new(Line::from(Span::styled(
                format!(" {} ", item.label),
                Style::default().fg(theme.fg),
            )));
            if i == menu.selected() {
                list_item = list_item.style(
                    Style::default()
                        .bg(theme.selection_bg)
                        .add_modifier(Modifier::BOLD),
                );
            }
            list_item
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Actions ")
                .border_style(Style::default().fg(theme.accent)),
        )
        .style(Style::default().bg(theme.bg));
    frame.render_widget(list, popup);
}

fn render_info(frame: &mut Frame, theme: &Theme, area: Rect) {
    let popup = centered_rect(56, 18, area);
    frame.render_widget(Clear, popup);

    let key = Style::default().fg(theme.accent);
    let text = Style::default().fg(theme.fg);
    let bindings: Vec<(&str, &str)> = vec![
        ("j/k, arrows", "move selection"),
        ("Enter", "open record / reveal failure"),
        ("Esc", "close detail, leave input"),
        ("Tab", "next detail section"),
        ("PgUp/PgDn", "scroll detail"),
        ("/", "search URLs"),
        ("f", "filter rows"),
        ("n / N", "next / previous match"),
        ("c", "clear all records"),
        ("d", "toggle row density"),
        ("m", "context menu"),
        ("y", "copy URL"),
        ("1 / 2", "switch panel"),
        ("t", "cycle theme"),
        ("q", "quit"),
    ];

    let mut lines = vec![Line::from("")];
    for (keys, action) in bindings {
        lines.push(Line::from(vec![
            Span::styled(format!("  {keys:<14}"), key),
            Span::styled(action, text),
        ]));
    }

    let info = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Help ")
                .border_style(Style::default().fg(theme.accent)),
        )
        .style(Style::default().bg(theme.bg));
    frame.render_widget(info, popup);
}

fn clip(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        text.chars().take(max.saturating_sub(1)).collect::<String>() + "…"
    }
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
