//! Text rendering of the roster.

use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, Table};

use marksheet_core::mark::MarkState;
use marksheet_core::model::Theme;
use marksheet_core::statistics::{format_average, RosterSummary};

/// Placeholder shown for a blank mark entry.
const BLANK: &str = "_";

/// Render one mark entry, flagging unfinished input such as `"7."`.
pub fn mark_label(entry: &str) -> String {
    match MarkState::classify(entry) {
        MarkState::Empty => BLANK.to_string(),
        MarkState::Complete => entry.to_string(),
        MarkState::Incomplete => format!("{entry}*"),
    }
}

pub fn subject_label(name: &str) -> &str {
    if name.is_empty() {
        "(unnamed)"
    } else {
        name
    }
}

/// Build the roster table.
///
/// Colours only show up when stdout is a terminal.
pub fn roster_table(summary: &RosterSummary, theme: Theme) -> Table {
    let (preset, accent) = match theme {
        Theme::Light => (UTF8_FULL, Color::Black),
        Theme::Dark => (UTF8_FULL_CONDENSED, Color::White),
    };

    let mut table = Table::new();
    table.load_preset(preset);
    table.set_header(vec![
        Cell::new("#").fg(accent).add_attribute(Attribute::Bold),
        Cell::new("Subject").fg(accent).add_attribute(Attribute::Bold),
        Cell::new("Marks").fg(accent).add_attribute(Attribute::Bold),
        Cell::new("Average").fg(accent).add_attribute(Attribute::Bold),
    ]);

    for (i, subject) in summary.subjects.iter().enumerate() {
        let marks = subject
            .marks
            .iter()
            .enumerate()
            .map(|(j, m)| format!("{}:{}", j + 1, mark_label(m)))
            .collect::<Vec<_>>()
            .join("  ");
        let has_incomplete = subject
            .marks
            .iter()
            .any(|m| MarkState::classify(m) == MarkState::Incomplete);

        let mut marks_cell = Cell::new(marks);
        if has_incomplete {
            marks_cell = marks_cell.fg(Color::Red);
        }

        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(subject_label(&subject.name)),
            marks_cell,
            Cell::new(format_average(subject.average)).set_alignment(CellAlignment::Right),
        ]);
    }

    table
}

/// Plain-text view: the table followed by the overall average.
pub fn roster_text(summary: &RosterSummary, theme: Theme) -> String {
    let table = roster_table(summary, theme);
    let mut out = format!("{table}\n");
    out.push_str(&format!(
        "Overall Average: {}\n",
        format_average(summary.overall_average)
    ));
    if summary
        .subjects
        .iter()
        .flat_map(|s| &s.marks)
        .any(|m| MarkState::classify(m) == MarkState::Incomplete)
    {
        out.push_str("* unfinished mark\n");
    }
    out
}
