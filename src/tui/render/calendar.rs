use chrono::NaiveDate;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph};

use crate::ops::day_nav::{self, MonthRef, month_grid};
use crate::tui::app::App;
use crate::tui::theme::Theme;

const MONTHS_PER_ROW: usize = 4;
/// Each day cell is three columns wide
const CELL: usize = 3;
const MONTH_WIDTH: usize = CELL * 7;
const GAP: usize = 2;
/// Rows reserved for weeks so every month block lines up
const WEEK_ROWS: usize = 6;
const WEEKDAYS: [&str; 7] = ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"];
const HINT: &str = "hjkl move  [ ] page  t today  Enter open  Esc close";

/// Render the date picker overlay
pub fn render_calendar(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let bg = theme.background;
    let months = app.calendar.months();
    let marks = Marks {
        cursor: app.calendar.cursor,
        selected: app.session.date(),
        today: day_nav::today(),
    };

    let mut lines: Vec<Line> = vec![
        Line::from(Span::styled(
            "Select a Date",
            Style::default()
                .fg(theme.text_bright)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    for row in months.chunks(MONTHS_PER_ROW) {
        lines.extend(month_row(row, &marks, theme));
        lines.push(Line::from(""));
    }
    lines.push(Line::from(Span::styled(
        HINT,
        Style::default().fg(theme.dim).bg(bg),
    )));

    let inner_width = MONTHS_PER_ROW * MONTH_WIDTH + (MONTHS_PER_ROW - 1) * GAP;
    let height = lines.len() + 2;
    let overlay = super::centered_rect((inner_width + 4) as u16, height as u16, area);
    frame.render_widget(Clear, overlay);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.dim).bg(bg))
        .padding(Padding::horizontal(1))
        .style(Style::default().bg(bg));
    frame.render_widget(
        Paragraph::new(lines).block(block).style(Style::default().bg(bg)),
        overlay,
    );
}

struct Marks {
    cursor: NaiveDate,
    selected: NaiveDate,
    today: NaiveDate,
}

/// Label, weekday header and week rows for months laid side by side
fn month_row(months: &[MonthRef], marks: &Marks, theme: &Theme) -> Vec<Line<'static>> {
    let bg = Style::default().bg(theme.background);
    let gap = || Span::styled(" ".repeat(GAP), bg);

    let mut label = Vec::new();
    let mut header = Vec::new();
    let mut weeks: Vec<Vec<Span>> = vec![Vec::new(); WEEK_ROWS];

    for (i, month) in months.iter().enumerate() {
        if i > 0 {
            label.push(gap());
            header.push(gap());
            for week in weeks.iter_mut() {
                week.push(gap());
            }
        }

        let style = if month.contains(marks.cursor) {
            bg.fg(theme.highlight).add_modifier(Modifier::BOLD)
        } else {
            bg.fg(theme.text_bright)
        };
        label.push(Span::styled(
            format!("{:^width$}", month.label(), width = MONTH_WIDTH),
            style,
        ));
        header.push(Span::styled(
            WEEKDAYS.iter().map(|d| format!(" {}", d)).collect::<String>(),
            bg.fg(theme.dim),
        ));

        let grid = month_grid(*month);
        for (w, spans) in weeks.iter_mut().enumerate() {
            match grid.get(w) {
                Some(week) => {
                    for cell in week {
                        spans.push(day_cell(*cell, marks, theme));
                    }
                }
                None => spans.push(Span::styled(" ".repeat(MONTH_WIDTH), bg)),
            }
        }
    }

    let mut lines = vec![Line::from(label), Line::from(header)];
    lines.extend(weeks.into_iter().map(Line::from));
    lines
}

fn day_cell(day: Option<NaiveDate>, marks: &Marks, theme: &Theme) -> Span<'static> {
    let bg = Style::default().bg(theme.background);
    let Some(date) = day else {
        return Span::styled(" ".repeat(CELL), bg);
    };
    let text = format!("{:>width$}", date.format("%-d").to_string(), width = CELL);
    let mut style = bg.fg(theme.text);
    if date == marks.today {
        style = style.fg(theme.highlight).add_modifier(Modifier::BOLD);
    }
    if date == marks.selected {
        style = style.add_modifier(Modifier::UNDERLINED);
    }
    if date == marks.cursor {
        style = style.bg(theme.selection_bg).fg(theme.text_bright);
    }
    Span::styled(text, style)
}
