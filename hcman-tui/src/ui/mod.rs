/*!
 * HCMAN TUI Interface
 * Device list, key help and modal notices
 */

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, Notice, NoticeKind};

// Conservative color palette
const BLUE: Color = Color::Rgb(100, 149, 237);
const GRAY: Color = Color::Rgb(128, 128, 128);
const WHITE: Color = Color::Rgb(255, 255, 255);
const GREEN: Color = Color::Rgb(34, 139, 34);
const YELLOW: Color = Color::Rgb(218, 165, 32);
const RED: Color = Color::Rgb(220, 20, 60);

pub fn render_ui<R, L>(f: &mut Frame, app: &App<R, L>)
where
    R: hcman_core::CommandRunner + 'static,
    L: hcman_core::ActivityLog + 'static,
{
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(5),     // Device list
            Constraint::Length(4),  // Status and keys
        ])
        .split(f.area());

    render_device_list(f, chunks[0], app);
    render_status_bar(f, chunks[1], app);

    if let Some(notice) = &app.notice {
        render_notice(f, notice);
    }
}

fn render_device_list<R, L>(f: &mut Frame, area: Rect, app: &App<R, L>)
where
    R: hcman_core::CommandRunner + 'static,
    L: hcman_core::ActivityLog + 'static,
{
    let border_style = if app.is_busy() {
        Style::default().fg(GRAY)
    } else {
        Style::default().fg(BLUE)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Bluetooth Devices")
        .border_style(border_style);

    if app.devices.is_empty() {
        let text = if app.is_busy() { "Scanning..." } else { "No devices" };
        let paragraph = Paragraph::new(text)
            .style(Style::default().fg(GRAY))
            .block(block)
            .alignment(Alignment::Center);
        f.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = app
        .devices
        .iter()
        .enumerate()
        .map(|(i, device)| {
            let selected = app.selected_device == Some(i);
            let prefix = if selected { "▶ " } else { "  " };
            let content = Line::from(vec![
                Span::raw(prefix),
                Span::styled(device.as_str(), Style::default().fg(WHITE)),
            ]);
            if selected {
                ListItem::new(content).style(Style::default().bg(BLUE).fg(WHITE))
            } else {
                ListItem::new(content)
            }
        })
        .collect();

    f.render_widget(List::new(items).block(block), area);
}

fn render_status_bar<R, L>(f: &mut Frame, area: Rect, app: &App<R, L>)
where
    R: hcman_core::CommandRunner + 'static,
    L: hcman_core::ActivityLog + 'static,
{
    let status_color = if app.is_busy() { YELLOW } else { GREEN };
    let keys = if app.is_busy() {
        "Working, please wait"
    } else {
        "[s] Scan  [Enter] Connect  [↑/↓] Select  [q] Quit"
    };

    let content = vec![
        Line::from(vec![
            Span::styled("Status: ", Style::default().fg(GRAY)),
            Span::styled(&app.status, Style::default().fg(status_color)),
        ]),
        Line::from(Span::styled(keys, Style::default().fg(GRAY))),
    ];

    let paragraph = Paragraph::new(content)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(GRAY)),
        )
        .alignment(Alignment::Left);
    f.render_widget(paragraph, area);
}

fn render_notice(f: &mut Frame, notice: &Notice) {
    let (title, color) = match notice.kind {
        NoticeKind::Info => ("Success", GREEN),
        NoticeKind::Warning => ("Warning", YELLOW),
        NoticeKind::Error => ("Error", RED),
    };

    let mut content = vec![
        Line::from(Span::styled(
            notice.message.as_str(),
            Style::default().fg(WHITE).add_modifier(Modifier::BOLD),
        )),
    ];
    if let Some(detail) = &notice.detail {
        content.push(Line::from(""));
        content.extend(
            detail
                .lines()
                .map(|l| Line::from(Span::styled(l, Style::default().fg(GRAY)))),
        );
    }
    content.push(Line::from(""));
    content.push(Line::from(Span::styled("[Enter] OK", Style::default().fg(GRAY))));

    let area = centered_rect(60, 40, f.area());
    let paragraph = Paragraph::new(content)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(Style::default().fg(color)),
        )
        .wrap(Wrap { trim: false })
        .alignment(Alignment::Center);

    f.render_widget(Clear, area);
    f.render_widget(paragraph, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
