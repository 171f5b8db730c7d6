//! Frame building: turns session state into styled lines and hit regions.

use crossterm::style::Color;
use flexfilter::{FilterSession, ValueMap};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::app::Focus;
use crate::theme::Theme;

/// Rows above the widget (title line).
const HEADER_ROWS: u16 = 1;
/// Maximum number of suggestion rows drawn.
const MAX_DROPDOWN_ROWS: usize = 10;
const REMOVE_LABEL: &str = " × ";
const CHIP_GAP: &str = " ";

/// What a click at a given cell lands on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    MainSearch,
    Input(String),
    Remove(String),
    Option(usize),
}

#[derive(Debug, Clone)]
pub struct Region {
    pub row: u16,
    pub start: u16,
    pub end: u16,
    pub target: Target,
}

#[derive(Debug, Clone, Default)]
pub struct Span {
    pub text: String,
    pub fg: Option<Color>,
    pub bg: Option<Color>,
    pub bold: bool,
    pub reverse: bool,
}

impl Span {
    fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }
}

/// A fully laid out screen.
#[derive(Debug, Clone, Default)]
pub struct Frame {
    pub lines: Vec<Vec<Span>>,
    pub regions: Vec<Region>,
    /// Rows occupied by the widget itself (chips, search box, dropdown).
    pub widget_rows: std::ops::Range<u16>,
    /// Keys of the per-filter inputs present in this frame.
    pub inputs: Vec<String>,
}

impl Frame {
    /// Region under the given cell, if any.
    pub fn hit(&self, column: u16, row: u16) -> Option<&Target> {
        self.regions
            .iter()
            .find(|r| r.row == row && column >= r.start && column < r.end)
            .map(|r| &r.target)
    }

    /// Lines paired with their screen row. Lines past the last addressable
    /// row are dropped.
    pub fn rows(&self) -> impl Iterator<Item = (u16, &[Span])> {
        (0..=u16::MAX).zip(self.lines.iter().map(Vec::as_slice))
    }

    /// Whether a cell lies inside the widget.
    pub fn inside_widget(&self, row: u16) -> bool {
        self.widget_rows.contains(&row)
    }
}

/// Accumulates spans for one line while tracking the current column.
struct LineBuilder {
    row: u16,
    column: u16,
    max_width: u16,
    spans: Vec<Span>,
    regions: Vec<Region>,
}

impl LineBuilder {
    fn new(row: u16, max_width: u16) -> Self {
        Self {
            row,
            column: 0,
            max_width,
            spans: Vec::new(),
            regions: Vec::new(),
        }
    }

    fn push(&mut self, span: Span, target: Option<Target>) {
        let room = self.max_width.saturating_sub(self.column) as usize;
        let text = truncate(&span.text, room);
        let width = text.width() as u16;
        if width == 0 {
            return;
        }
        if let Some(target) = target {
            self.regions.push(Region {
                row: self.row,
                start: self.column,
                end: self.column + width,
                target,
            });
        }
        self.column += width;
        self.spans.push(Span { text, ..span });
    }

    fn finish(self, frame: &mut Frame) {
        frame.lines.push(self.spans);
        frame.regions.extend(self.regions);
    }
}

/// Cut `text` to at most `max` display columns.
fn truncate(text: &str, max: usize) -> String {
    let mut used = 0;
    let mut out = String::new();
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > max {
            break;
        }
        used += w;
        out.push(c);
    }
    out
}

/// Index of the first suggestion drawn, so that `highlighted` is inside
/// the visible window.
fn dropdown_offset(highlighted: usize, len: usize) -> usize {
    if len <= MAX_DROPDOWN_ROWS || highlighted < MAX_DROPDOWN_ROWS {
        0
    } else {
        (highlighted + 1 - MAX_DROPDOWN_ROWS).min(len - MAX_DROPDOWN_ROWS)
    }
}

/// Lay out the whole screen.
pub fn build(
    session: &FilterSession,
    focus: &Focus,
    theme: &Theme,
    output: &ValueMap,
    terminal_width: u16,
) -> Frame {
    let width = terminal_width.min(theme.max_width);
    let mut frame = Frame::default();

    let mut title = LineBuilder::new(0, width);
    title.push(
        Span {
            text: "flexfilter  Tab: next input  Esc: close  Ctrl+D: remove  Ctrl+Q: quit"
                .into(),
            fg: Some(theme.muted),
            ..Default::default()
        },
        None,
    );
    title.finish(&mut frame);

    let mut row = HEADER_ROWS;

    // Chips, wrapped onto as many rows as they need
    let mut chips = LineBuilder::new(row, width);
    for filter in session.active().iter() {
        let focused = matches!(focus, Focus::Filter(key) if *key == filter.key);
        let input = filter.kind.has_input().then(|| {
            let text = session.input_text(&filter.key);
            let shown = if focused {
                format!("{}_", text)
            } else {
                text.to_string()
            };
            format!("{:<8}", shown)
        });

        let fixed = input.as_deref().map_or(0, |text| text.width())
            + REMOVE_LABEL.width()
            + CHIP_GAP.width();
        let label = format!(" {} ", filter.label);
        let label = truncate(&label, (width as usize).saturating_sub(fixed));
        let chip_width = (label.width() + fixed) as u16;

        if chips.column > 0 && chips.column + chip_width > width {
            chips.finish(&mut frame);
            row += 1;
            chips = LineBuilder::new(row, width);
        }

        chips.push(
            Span {
                text: label,
                fg: Some(theme.text),
                bg: Some(theme.chip_bg),
                bold: focused,
                ..Default::default()
            },
            None,
        );
        if let Some(text) = input {
            chips.push(
                Span {
                    text,
                    fg: Some(theme.text),
                    bg: Some(theme.input_bg),
                    ..Default::default()
                },
                Some(Target::Input(filter.key.clone())),
            );
            frame.inputs.push(filter.key.clone());
        }
        chips.push(
            Span {
                text: REMOVE_LABEL.into(),
                fg: Some(theme.text),
                bg: Some(theme.remove_bg),
                ..Default::default()
            },
            Some(Target::Remove(filter.key.clone())),
        );
        chips.push(Span::plain(CHIP_GAP), None);
    }
    chips.finish(&mut frame);
    row += 1;

    // Main search
    let mut search = LineBuilder::new(row, width);
    let query = session.main_query();
    let search_span = if query.is_empty() && *focus != Focus::MainSearch {
        Span {
            text: format!("> {}", theme.placeholder),
            fg: Some(theme.muted),
            ..Default::default()
        }
    } else {
        let cursor = if *focus == Focus::MainSearch { "_" } else { "" };
        Span::plain(format!("> {}{}", query, cursor))
    };
    search.push(search_span, Some(Target::MainSearch));
    search.finish(&mut frame);
    row += 1;

    // Dropdown, scrolled so the highlighted row stays visible
    let suggestions = session.suggestions();
    let first = dropdown_offset(suggestions.highlighted(), suggestions.len());
    for (index, option) in suggestions
        .items()
        .iter()
        .enumerate()
        .skip(first)
        .take(MAX_DROPDOWN_ROWS)
    {
        let mut line = LineBuilder::new(row, width);
        let text = match option.description() {
            Some(description) => format!("  {}: {}", option.label(), description),
            None => format!("  {}", option.label()),
        };
        line.push(
            Span {
                text,
                reverse: index == suggestions.highlighted(),
                ..Default::default()
            },
            Some(Target::Option(index)),
        );
        line.finish(&mut frame);
        row += 1;
    }
    frame.widget_rows = HEADER_ROWS..row;

    // Output
    let mut out = LineBuilder::new(row + 1, terminal_width);
    out.push(
        Span {
            text: format!("output: {}", output.to_json()),
            fg: Some(theme.muted),
            ..Default::default()
        },
        None,
    );
    frame.lines.push(Vec::new());
    out.finish(&mut frame);

    frame
}
