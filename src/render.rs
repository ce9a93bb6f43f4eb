use std::ops::Range;

use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};
use unicode_width::UnicodeWidthChar;

use crate::document::{Document, Section};
use crate::sections::{DISPLAY_ROWS, SectionId};
use crate::theme::Theme;

/// Minimum width at which paired sections are laid out side by side.
pub const SIDE_BY_SIDE_MIN_WIDTH: usize = 100;

const COLUMN_GAP: usize = 2;
const RULE: &str = "│ ";
const RULE_WIDTH: usize = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CursorVisualPosition {
    pub line: usize,
    pub column: u16,
}

/// Plain text broken into display rows.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WrappedText {
    pub lines: Vec<String>,
    pub cursor: Option<CursorVisualPosition>,
}

/// Wraps `text` to `width` columns, preferring breaks after whitespace.
///
/// Every character is kept, so a char offset maps to exactly one visual
/// position. A cursor sitting on a soft break is shown at the start of the
/// following row.
pub fn wrap_text(text: &str, width: usize, cursor: Option<usize>) -> WrappedText {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut cursor_position = None;
    let mut line_offset = 0usize;

    for logical in text.split('\n') {
        let chars: Vec<char> = logical.chars().collect();
        let rows = wrap_chars(&chars, width);
        let row_count = rows.len();

        for (row_idx, range) in rows.into_iter().enumerate() {
            if let Some(target) = cursor
                && cursor_position.is_none()
            {
                let start = line_offset + range.start;
                let end = line_offset + range.end;
                let last_row = row_idx + 1 == row_count;
                if target >= start && (target < end || (last_row && target == end)) {
                    let column: usize = chars[range.start..target - line_offset]
                        .iter()
                        .copied()
                        .map(char_width)
                        .sum();
                    cursor_position = Some(CursorVisualPosition {
                        line: lines.len(),
                        column: column as u16,
                    });
                }
            }
            lines.push(chars[range].iter().collect());
        }

        line_offset += chars.len() + 1;
    }

    WrappedText {
        lines,
        cursor: cursor_position,
    }
}

fn wrap_chars(chars: &[char], width: usize) -> Vec<Range<usize>> {
    let mut rows = Vec::new();
    let mut start = 0;
    let mut line_width = 0;
    let mut last_break: Option<usize> = None;
    let mut idx = 0;

    while idx < chars.len() {
        let ch = chars[idx];
        let char_w = char_width(ch);
        let fits = line_width + char_w <= width;
        // A single space may hang past the edge so rows break after it.
        let hangs = ch.is_whitespace() && line_width <= width;
        if !fits && !hangs && idx > start {
            let break_at = match last_break {
                Some(candidate) if candidate > start && candidate <= idx => candidate,
                _ => idx,
            };
            rows.push(start..break_at);
            start = break_at;
            line_width = chars[start..idx].iter().copied().map(char_width).sum();
            last_break = None;
            continue;
        }
        line_width += char_w;
        if ch.is_whitespace() {
            last_break = Some(idx + 1);
        }
        idx += 1;
    }

    rows.push(start..chars.len());
    rows
}

fn char_width(ch: char) -> usize {
    ch.width().unwrap_or(0)
}

fn visible_width(text: &str) -> usize {
    text.chars().map(char_width).sum()
}

/// Where a section landed in the rendered output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SectionRegion {
    pub id: SectionId,
    pub top: usize,
    pub height: usize,
    pub left: usize,
    pub width: usize,
}

impl SectionRegion {
    pub fn contains(&self, line: usize, column: usize) -> bool {
        line >= self.top
            && line < self.top + self.height
            && column >= self.left
            && column < self.left + self.width
    }

    pub fn is_header(&self, line: usize) -> bool {
        line == self.top
    }

    /// Line that puts the section in the middle of a viewport.
    pub fn centered_scroll_top(&self, viewport_height: usize) -> usize {
        (self.top + self.height / 2).saturating_sub(viewport_height / 2)
    }
}

#[derive(Debug)]
pub struct RenderResult {
    pub lines: Vec<Line<'static>>,
    pub cursor: Option<CursorVisualPosition>,
    pub total_lines: usize,
    pub regions: Vec<SectionRegion>,
}

impl RenderResult {
    pub fn region(&self, id: SectionId) -> Option<&SectionRegion> {
        self.regions.iter().find(|region| region.id == id)
    }
}

/// The section card under a list-relative position, if any.
pub fn region_at(regions: &[SectionRegion], line: usize, column: usize) -> Option<&SectionRegion> {
    regions.iter().find(|region| region.contains(line, column))
}

/// What the section list should highlight.
#[derive(Clone, Copy, Debug, Default)]
pub struct RenderOptions {
    /// Section being edited and the cursor's char offset in it.
    pub focus: Option<(SectionId, usize)>,
    /// Section under the live cursor; `Some` only while live.
    pub live_cursor: Option<SectionId>,
}

struct CardRender {
    lines: Vec<Line<'static>>,
    cursor: Option<CursorVisualPosition>,
}

/// Lays out every section card in display order.
pub fn render_sections(
    document: &Document,
    width: usize,
    options: RenderOptions,
    theme: &Theme,
) -> RenderResult {
    let width = width.max(1);
    let side_by_side = width >= SIDE_BY_SIDE_MIN_WIDTH;
    let mut lines: Vec<Line<'static>> = Vec::new();
    let mut regions = Vec::new();
    let mut cursor = None;

    for row in DISPLAY_ROWS {
        let top = lines.len();
        if side_by_side && row.len() == 2 {
            let column_width = (width - COLUMN_GAP) / 2;
            let left = render_card(document.section(row[0]), column_width, options, theme);
            let right = render_card(document.section(row[1]), column_width, options, theme);
            let height = left.lines.len().max(right.lines.len());

            if let Some(position) = left.cursor {
                cursor = Some(CursorVisualPosition {
                    line: top + position.line,
                    column: position.column,
                });
            }
            if let Some(position) = right.cursor {
                cursor = Some(CursorVisualPosition {
                    line: top + position.line,
                    column: position.column + (column_width + COLUMN_GAP) as u16,
                });
            }

            regions.push(SectionRegion {
                id: row[0],
                top,
                height: left.lines.len(),
                left: 0,
                width: column_width,
            });
            regions.push(SectionRegion {
                id: row[1],
                top,
                height: right.lines.len(),
                left: column_width + COLUMN_GAP,
                width: column_width,
            });

            let mut left_lines = left.lines.into_iter();
            let mut right_lines = right.lines.into_iter();
            for _ in 0..height {
                let mut spans = left_lines
                    .next()
                    .map(|line| line.spans)
                    .unwrap_or_default();
                let used = spans
                    .iter()
                    .map(|span| visible_width(span.content.as_ref()))
                    .sum::<usize>();
                let padding = column_width.saturating_sub(used) + COLUMN_GAP;
                spans.push(Span::raw(" ".repeat(padding)));
                if let Some(line) = right_lines.next() {
                    spans.extend(line.spans);
                }
                lines.push(Line::from(spans));
            }
        } else {
            for id in row.iter().copied() {
                let card_top = lines.len();
                let card = render_card(document.section(id), width, options, theme);
                if let Some(position) = card.cursor {
                    cursor = Some(CursorVisualPosition {
                        line: card_top + position.line,
                        column: position.column,
                    });
                }
                regions.push(SectionRegion {
                    id,
                    top: card_top,
                    height: card.lines.len(),
                    left: 0,
                    width,
                });
                lines.extend(card.lines);
            }
        }
        lines.push(Line::default());
    }

    let total_lines = lines.len();
    RenderResult {
        lines,
        cursor,
        total_lines,
        regions,
    }
}

fn render_card(
    section: &Section,
    width: usize,
    options: RenderOptions,
    theme: &Theme,
) -> CardRender {
    let id = section.id();
    let color = section.color();
    let live = options.live_cursor.is_some();
    let live_active = options.live_cursor == Some(id);
    let focus_offset = match options.focus {
        Some((focused, offset)) if focused == id && !live => Some(offset),
        _ => None,
    };

    let marker = if section.expanded { "▾" } else { "▸" };
    let mut title_style = Style::default().add_modifier(Modifier::BOLD);
    if focus_offset.is_some() {
        title_style = title_style.add_modifier(Modifier::UNDERLINED);
    }
    let badge_style = if live_active {
        theme.live_active_style(color)
    } else {
        theme.badge_style(color)
    };

    let mut lines = vec![Line::from(vec![
        Span::styled(format!(" {} ", section.label()), badge_style),
        Span::raw(" "),
        Span::styled(section.title().to_string(), title_style),
        Span::raw(" "),
        Span::styled(marker.to_string(), theme.rule_style(color)),
    ])];
    let mut cursor = None;

    if section.expanded {
        let body_width = width.saturating_sub(RULE_WIDTH).max(1);
        if section.content.is_empty() {
            for text in wrap_text(section.placeholder(), body_width, None).lines {
                lines.push(Line::from(vec![
                    Span::styled(RULE, theme.rule_style(color)),
                    Span::styled(text, theme.placeholder_style()),
                ]));
            }
            if focus_offset.is_some() {
                cursor = Some(CursorVisualPosition {
                    line: 1,
                    column: RULE_WIDTH as u16,
                });
            }
        } else {
            let wrapped = wrap_text(&section.content, body_width, focus_offset);
            if let Some(position) = wrapped.cursor {
                cursor = Some(CursorVisualPosition {
                    line: position.line + 1,
                    column: position.column + RULE_WIDTH as u16,
                });
            }
            for text in wrapped.lines {
                lines.push(Line::from(vec![
                    Span::styled(RULE, theme.rule_style(color)),
                    Span::raw(text),
                ]));
            }
        }
    }

    if live && !live_active {
        let dim = theme.live_dim_modifier();
        lines = lines
            .into_iter()
            .map(|line| {
                Line::from(
                    line.spans
                        .into_iter()
                        .map(|span| {
                            let style = span.style.add_modifier(dim);
                            span.style(style)
                        })
                        .collect::<Vec<_>>(),
                )
            })
            .collect();
    }

    CardRender { lines, cursor }
}

/// Plain-text projection of the whole document, as it would be printed.
pub fn plain_text(document: &Document) -> String {
    let mut out = String::new();
    if !document.reference.is_empty() {
        out.push_str(&document.reference);
        out.push('\n');
    }
    if !document.verses.is_empty() {
        out.push_str(&document.verses);
        out.push('\n');
    }
    out.push_str("THE ONE POINT: ");
    out.push_str(&document.statement);
    out.push('\n');

    for section in document.sections.iter() {
        out.push('\n');
        out.push_str(&format!("[{}] {}\n", section.label(), section.title()));
        if section.content.is_empty() {
            out.push_str("No content added.\n");
        } else {
            out.push_str(&section.content);
            out.push('\n');
        }
    }
    out
}

#[cfg(test)]
#[path = "render_tests.rs"]
mod render_tests;
