use crate::app::App;
use chrono::{DateTime, Utc};
use notekeep_core::{
    models::{Category, Note},
    notification::NotificationKind,
    presentation::{hex_to_rgb, DEFAULT_TINT_ALPHA},
};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const TITLE_COLUMN_WIDTH: usize = 28;

/// Render the header with title and key hints
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let key_hints = if app.search_open {
        " [Esc/Enter:Close] [Type to filter] [Backspace:Delete] ".to_string()
    } else if app.confirming_delete() {
        " [y/Enter:Delete] [n/Esc:Cancel] ".to_string()
    } else {
        let k = &app.config.keymap;
        let mut hints = format!(
            " [{}:Quit] [{}:Help] [{}:Search] [{}:Sort] [{}:Category] [{}:Open] [{}:Like] [{}:Delete] ",
            k.quit, k.help, k.search, k.cycle_sort, k.cycle_category, k.open_note, k.like, k.delete
        );
        if app.can_page() {
            hints.push_str(&format!("[{}/{}:Page] ", k.next_page, k.prev_page));
        }
        hints
    };

    let header_spans = vec![
        Span::styled(
            " 🗒 Notekeep ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" | "),
        Span::styled(key_hints, Style::default().fg(Color::DarkGray)),
    ];

    let header = Paragraph::new(Line::from(header_spans))
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Left);

    frame.render_widget(header, area);
}

/// Category colors: the color itself for text, a faint tint of it for the background
pub fn category_style(category: &Category) -> Style {
    let (r, g, b) = hex_to_rgb(category.color.as_deref());
    Style::default()
        .fg(Color::Rgb(r, g, b))
        .bg(tint_over_black((r, g, b), DEFAULT_TINT_ALPHA))
}

/// Blend a color with alpha onto a black terminal background
pub fn tint_over_black((r, g, b): (u8, u8, u8), alpha: f64) -> Color {
    let scale = |c: u8| (f64::from(c) * alpha.clamp(0.0, 1.0)).round() as u8;
    Color::Rgb(scale(r), scale(g), scale(b))
}

/// Cut `text` to at most `width` terminal cells, padding with spaces
pub fn fit_to_width(text: &str, width: usize) -> String {
    if text.width() <= width {
        return format!("{}{}", text, " ".repeat(width - text.width()));
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    used += 1;
    out.push_str(&" ".repeat(width.saturating_sub(used)));
    out
}

pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    if ts == DateTime::<Utc>::UNIX_EPOCH {
        "—".to_string()
    } else {
        ts.format("%Y-%m-%d %H:%M").to_string()
    }
}

fn note_line<'a>(app: &'a App, note: &'a Note) -> Line<'a> {
    let title = if note.title.is_empty() { "(untitled)" } else { note.title.as_str() };
    let likes = if app.controller.is_like_in_flight(&note.id) {
        format!("♥ {}…", note.likes())
    } else {
        format!("♥ {}", note.likes())
    };

    let mut spans = vec![
        Span::styled(fit_to_width(title, TITLE_COLUMN_WIDTH), Style::default().fg(Color::White)),
        Span::raw(" "),
    ];
    if let Some(category) = app.category_for(note) {
        spans.push(Span::styled(format!(" {} ", category.name), category_style(category)));
        spans.push(Span::raw(" "));
    }
    spans.push(Span::styled(likes, Style::default().fg(Color::Red)));
    spans.push(Span::raw("  "));
    spans.push(Span::styled(
        format_timestamp(note.effective_timestamp()),
        Style::default().fg(Color::DarkGray),
    ));
    if !note.attachments.is_empty() {
        let icons: String = note.attachments.iter().map(|a| a.icon().glyph()).collect();
        spans.push(Span::raw("  "));
        spans.push(Span::raw(icons));
    }
    Line::from(spans)
}

/// Render the filtered and sorted note list
pub fn render_note_list(frame: &mut Frame, app: &App, area: Rect) {
    let notes = app.visible_notes();
    let title = format!(" Notes ({}) ", notes.len());

    if notes.is_empty() {
        let message = if app.controller.notes().is_empty() {
            "No notes loaded."
        } else {
            "No notes match the current filters."
        };
        let empty_message = Paragraph::new(message)
            .block(Block::default().borders(Borders::ALL).title(title))
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty_message, area);
        return;
    }

    let items: Vec<ListItem> = notes.iter().map(|note| ListItem::new(note_line(app, note))).collect();

    let mut state = ListState::default();
    state.select(Some(app.selected_index));

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .title_alignment(Alignment::Left),
        )
        .highlight_style(Style::default().bg(Color::Blue).add_modifier(Modifier::BOLD));

    frame.render_stateful_widget(list, area, &mut state);
}

/// Render the selected note's content and attachments
pub fn render_note_detail(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Note ");
    let Some(note) = app.selected_note() else {
        frame.render_widget(block, area);
        return;
    };

    let mut lines: Vec<Line> = vec![Line::from(Span::styled(
        note.title.clone(),
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    ))];

    if let Some(category) = app.category_for(note) {
        lines.push(Line::from(Span::styled(format!(" {} ", category.name), category_style(category))));
    }

    let dim = Style::default().fg(Color::DarkGray);
    if let Some(created) = note.created_at.as_deref() {
        lines.push(Line::from(Span::styled(format!("Created: {}", created), dim)));
    }
    if let Some(updated) = note.updated_at.as_deref() {
        lines.push(Line::from(Span::styled(format!("Updated: {}", updated), dim)));
    }
    lines.push(Line::from(Span::styled(format!("♥ {} likes", note.likes()), Style::default().fg(Color::Red))));
    lines.push(Line::from(""));

    for text_line in note.content.lines() {
        lines.push(Line::from(text_line.to_string()));
    }

    if !note.attachments.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Attachments",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )));
        for attachment in &note.attachments {
            let kind = if attachment.is_image() { " (image)" } else { "" };
            lines.push(Line::from(vec![
                Span::raw(format!("{} ", attachment.icon().glyph())),
                Span::raw(attachment.filename.clone()),
                Span::styled(format!(" [{}]{}", attachment.extension_label(), kind), dim),
            ]));
        }
    }

    let paragraph = Paragraph::new(Text::from(lines))
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

/// Render the status bar at the bottom
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let view = app.controller.view();
    let category = view
        .selected_category
        .as_ref()
        .and_then(|id| app.controller.category(id))
        .map(|c| c.name.clone())
        .unwrap_or_else(|| "All".to_string());

    let mut status_text = format!(
        " {}/{} notes | Sort: {} | Category: {} ",
        app.visible_notes().len(),
        app.controller.notes().len(),
        view.sort_by,
        category
    );
    if !view.search_query.trim().is_empty() {
        status_text.push_str(&format!("| Search: \"{}\" ", view.search_query.trim()));
    }
    if let Some(pagination) = app.controller.pagination() {
        if let (Some(page), Some(pages)) = (pagination.page, pagination.pages) {
            status_text.push_str(&format!("| Page {}/{} ", page, pages));
        }
        if let Some(total) = pagination.total {
            status_text.push_str(&format!("| {} on server ", total));
        }
    }
    if let Some(page) = app.page_in_flight {
        status_text.push_str(&format!("| Loading page {}… ", page));
    }

    let status_bar = Paragraph::new(status_text)
        .style(Style::default().bg(Color::DarkGray).fg(Color::White))
        .alignment(Alignment::Center);

    frame.render_widget(status_bar, area);
}

/// Render the search input
pub fn render_search_overlay(frame: &mut Frame, app: &App, area: Rect) {
    let popup_width = 60.min(area.width);
    let popup_area = Rect::new((area.width.saturating_sub(popup_width)) / 2, 3.min(area.height), popup_width, 3.min(area.height));

    let input = Paragraph::new(Text::from(format!("/ {}▊", app.controller.view().search_query)))
        .style(Style::default().fg(Color::White))
        .block(Block::default().borders(Borders::ALL).title(" Search "));

    frame.render_widget(Clear, popup_area);
    frame.render_widget(input, popup_area);
}

pub fn render_delete_confirmation(frame: &mut Frame, app: &App, area: Rect) {
    let popup_width = 60.min(area.width);
    let popup_height = 5.min(area.height);

    let x = (area.width.saturating_sub(popup_width)) / 2;
    let y = (area.height.saturating_sub(popup_height)) / 2;

    let popup_area = Rect::new(x, y, popup_width, popup_height);

    let title = app
        .controller
        .pending_delete_target()
        .map(|n| n.title.clone())
        .unwrap_or_default();
    let text = if app.delete_in_flight.is_some() {
        format!("Deleting \"{}\"…", title)
    } else {
        format!("Delete \"{}\"? This cannot be undone. (y/n)", title)
    };
    let paragraph = Paragraph::new(text)
        .block(
            Block::default()
                .title("Confirm Deletion")
                .borders(Borders::ALL)
                .style(Style::default().fg(Color::Yellow)),
        )
        .style(Style::default().fg(Color::White))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    frame.render_widget(Clear, popup_area); // This clears the area behind the popup
    frame.render_widget(paragraph, popup_area);
}

/// Render notifications stacked in the top-right corner
pub fn render_toasts(frame: &mut Frame, app: &App, area: Rect) {
    let toasts = app.toasts.visible();
    if toasts.is_empty() {
        return;
    }

    let width = 40.min(area.width);
    let x = area.width.saturating_sub(width + 1);
    let column = Rect::new(x, 1.min(area.height), width, area.height.saturating_sub(1));
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(toasts.iter().map(|_| Constraint::Length(3)).chain([Constraint::Min(0)]))
        .split(column);

    for (toast, row) in toasts.iter().zip(rows.iter()) {
        let color = match toast.notification.kind {
            NotificationKind::Success => Color::Green,
            NotificationKind::Error => Color::Red,
            NotificationKind::Warning => Color::Yellow,
            NotificationKind::Info => Color::Cyan,
        };
        let paragraph = Paragraph::new(toast.notification.message.clone())
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" {} ", toast.notification.kind.as_str()))
                    .style(Style::default().fg(color)),
            )
            .style(Style::default().fg(Color::White));
        frame.render_widget(Clear, *row);
        frame.render_widget(paragraph, *row);
    }
}

/// Render the help screen overlay
pub fn render_help_screen(frame: &mut Frame, app: &App, size: Rect) {
    let k = &app.config.keymap;
    let heading = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
    let entry = |key: &str, what: &str| Line::from(format!("{:<13}{}", key, what));

    let help_text = vec![
        Line::from(""),
        Line::from(Span::styled("Navigation", heading)),
        entry(&format!("{}/{}", k.cursor_up, k.cursor_down), "Move selection"),
        entry(&k.open_note, "Open note in browser"),
        entry(&format!("{}/{}", k.next_page, k.prev_page), "Next / previous page"),
        Line::from(""),
        Line::from(Span::styled("Filters", heading)),
        entry(&k.search, "Search titles and content"),
        entry(&k.cycle_category, "Next category"),
        entry(&k.cycle_sort, "Sort by date / title / likes"),
        entry(&k.clear_filters, "Clear search and category"),
        Line::from(""),
        Line::from(Span::styled("Actions", heading)),
        entry(&k.like, "Like note"),
        entry(&k.delete, "Delete note"),
        Line::from(""),
        Line::from(Span::styled("Interface", heading)),
        entry(&k.help, "Show this help"),
        entry(&k.quit, "Quit application"),
        Line::from(""),
        Line::from(Span::styled(format!("Press '{}' or 'Esc' to close", k.help), Style::default().fg(Color::DarkGray))),
    ];

    let popup_width = 60.min(size.width);
    let popup_height = (help_text.len() as u16 + 2).min(size.height);
    let x = (size.width.saturating_sub(popup_width)) / 2;
    let y = (size.height.saturating_sub(popup_height)) / 2;
    let popup_area = Rect::new(x, y, popup_width, popup_height);

    let paragraph = Paragraph::new(help_text)
        .block(
            Block::default()
                .title(" Help - Keyboard Shortcuts ")
                .borders(Borders::ALL)
                .style(Style::default().bg(Color::Black)),
        )
        .wrap(Wrap { trim: true })
        .style(Style::default().fg(Color::White));

    frame.render_widget(Clear, popup_area);
    frame.render_widget(paragraph, popup_area);
}
