//! Custom TUI widgets

use super::theme::ThemeColors;
use crate::engine::SessionSummary;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Widget},
};

/// Single line of text centred on a fully painted background
pub struct CenteredText<'a> {
    text: &'a str,
    style: Style,
}

impl<'a> CenteredText<'a> {
    pub fn new(text: &'a str, style: Style) -> Self {
        Self { text, style }
    }
}

impl<'a> Widget for CenteredText<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, self.style);
        if area.width == 0 || area.height == 0 {
            return;
        }
        let len = self.text.chars().count() as u16;
        let x = area.x + area.width.saturating_sub(len) / 2;
        let y = area.y + area.height / 2;
        buf.set_stringn(x, y, self.text, area.width as usize, self.style);
    }
}

/// Status of a summary row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowStatus {
    Ok,
    Warning,
    Info,
}

/// A labelled value on the summary screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRow {
    pub label: String,
    pub value: String,
    pub status: RowStatus,
}

impl SummaryRow {
    fn new(label: &str, value: impl Into<String>, status: RowStatus) -> Self {
        Self {
            label: label.to_string(),
            value: value.into(),
            status,
        }
    }

    /// Warning when non-zero
    fn count(label: &str, value: impl Into<u64>) -> Self {
        let value = value.into();
        let status = if value > 0 {
            RowStatus::Warning
        } else {
            RowStatus::Ok
        };
        Self::new(label, value.to_string(), status)
    }
}

/// Rows shown at the end of a session
pub fn summary_rows(summary: &SessionSummary) -> Vec<SummaryRow> {
    let stats = &summary.stats;
    let mut rows = vec![
        SummaryRow::new(
            "Test Configuration",
            summary.configuration.to_string(),
            RowStatus::Info,
        ),
        SummaryRow::new("Event count", stats.stimuli_count.to_string(), RowStatus::Info),
        SummaryRow::count("Lapses", stats.lapses),
        SummaryRow::count("False starts", stats.false_starts),
        SummaryRow::count("Extraneous keypresses", stats.errors),
    ];

    let latency = &summary.latency;
    if let Some(median) = latency.median_ms {
        rows.push(SummaryRow::new("Median RT", format!("{:.0} ms", median), RowStatus::Info));
    }
    if let Some(mean) = latency.mean_ms {
        rows.push(SummaryRow::new("Mean RT", format!("{:.1} ms", mean), RowStatus::Info));
    }
    if let (Some(fastest), Some(slowest)) = (latency.fastest_ms, latency.slowest_ms) {
        rows.push(SummaryRow::new(
            "Fastest / slowest",
            format!("{} / {} ms", fastest, slowest),
            RowStatus::Info,
        ));
    }
    rows
}

/// Widget for the end-of-session results
pub struct SummaryPanel<'a> {
    rows: &'a [SummaryRow],
    colors: ThemeColors,
}

impl<'a> SummaryPanel<'a> {
    pub fn new(rows: &'a [SummaryRow], colors: ThemeColors) -> Self {
        Self { rows, colors }
    }

    fn status_color(&self, status: RowStatus) -> Color {
        match status {
            RowStatus::Ok => self.colors.ok,
            RowStatus::Warning => self.colors.warn,
            RowStatus::Info => self.colors.heading,
        }
    }

    fn status_symbol(status: RowStatus) -> &'static str {
        match status {
            RowStatus::Ok => "[OK]",
            RowStatus::Warning => "[!!]",
            RowStatus::Info => "[--]",
        }
    }
}

impl<'a> Widget for SummaryPanel<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let base = Style::default().fg(self.colors.fg).bg(self.colors.bg);
        buf.set_style(area, base);

        let block = Block::default()
            .title(" Session complete ")
            .borders(Borders::ALL)
            .border_style(base.fg(self.colors.dim));
        let inner = block.inner(area);
        block.render(area, buf);

        let mut y = inner.y;
        // Keep the last line for the exit prompt
        let last = (inner.y + inner.height).saturating_sub(1);
        for row in self.rows {
            if y >= last {
                break;
            }
            let color = self.status_color(row.status);
            let line = Line::from(vec![
                Span::styled(format!("{} ", Self::status_symbol(row.status)), base.fg(color)),
                Span::styled(
                    format!("{}: ", row.label),
                    base.add_modifier(Modifier::BOLD),
                ),
                Span::styled(row.value.as_str(), base.fg(color)),
            ]);
            buf.set_line(inner.x, y, &line, inner.width);
            y += 1;
        }

        if inner.height > 0 {
            buf.set_stringn(
                inner.x,
                last,
                "Press any key to exit.",
                inner.width as usize,
                base.fg(self.colors.dim),
            );
        }
    }
}
