use pretty_assertions::assert_eq;

use super::*;
use crate::sections::SECTION_ORDER;

fn line_text(line: &Line<'_>) -> String {
    line.spans
        .iter()
        .map(|span| span.content.as_ref())
        .collect()
}

fn texts(render: &RenderResult) -> Vec<String> {
    render.lines.iter().map(line_text).collect()
}

#[test]
fn wrap_breaks_after_whitespace() {
    let wrapped = wrap_text("hello world again", 8, None);
    assert_eq!(wrapped.lines, vec!["hello ", "world ", "again"]);
}

#[test]
fn wrap_splits_words_longer_than_the_width() {
    let wrapped = wrap_text("abcdefgh", 3, None);
    assert_eq!(wrapped.lines, vec!["abc", "def", "gh"]);
}

#[test]
fn wrap_keeps_hard_line_breaks() {
    let wrapped = wrap_text("one\n\ntwo", 10, None);
    assert_eq!(wrapped.lines, vec!["one", "", "two"]);
}

#[test]
fn wrap_counts_wide_characters() {
    let wrapped = wrap_text("日本語です", 4, None);
    assert_eq!(wrapped.lines, vec!["日本", "語で", "す"]);
}

#[test]
fn cursor_on_soft_break_moves_to_next_row() {
    let wrapped = wrap_text("hello world", 5, Some(6));
    assert_eq!(
        wrapped.cursor,
        Some(CursorVisualPosition { line: 1, column: 0 })
    );

    let wrapped = wrap_text("hello world", 5, Some(5));
    assert_eq!(
        wrapped.cursor,
        Some(CursorVisualPosition { line: 0, column: 5 })
    );
}

#[test]
fn cursor_at_end_of_text_and_after_newline() {
    let wrapped = wrap_text("ab\ncd", 10, Some(5));
    assert_eq!(
        wrapped.cursor,
        Some(CursorVisualPosition { line: 1, column: 2 })
    );

    let wrapped = wrap_text("ab\n", 10, Some(3));
    assert_eq!(
        wrapped.cursor,
        Some(CursorVisualPosition { line: 1, column: 0 })
    );

    let wrapped = wrap_text("", 10, Some(0));
    assert_eq!(
        wrapped.cursor,
        Some(CursorVisualPosition { line: 0, column: 0 })
    );
}

#[test]
fn narrow_layout_stacks_every_section() {
    let document = Document::new();
    let render = render_sections(&document, 60, RenderOptions::default(), &Theme::default());

    let order: Vec<SectionId> = render.regions.iter().map(|region| region.id).collect();
    assert_eq!(order, SECTION_ORDER.to_vec());
    assert!(render.regions.iter().all(|region| region.left == 0));
    assert!(
        render
            .regions
            .windows(2)
            .all(|pair| pair[0].top + pair[0].height <= pair[1].top)
    );
    assert_eq!(render.total_lines, render.lines.len());
}

#[test]
fn wide_layout_pairs_rows_side_by_side() {
    let document = Document::new();
    let render = render_sections(&document, 120, RenderOptions::default(), &Theme::default());

    let me = render.region(SectionId::Me).copied().unwrap();
    let we = render.region(SectionId::We1).copied().unwrap();
    assert_eq!(me.top, we.top);
    assert_eq!(me.left, 0);
    assert_eq!(we.left, me.width + 2);

    let god = render.region(SectionId::God).copied().unwrap();
    assert_eq!(god.left, 0);
    assert_eq!(god.width, 120);

    let header = line_text(&render.lines[me.top]);
    assert!(header.contains("ORIENTATION"));
    assert!(header.contains("IDENTIFICATION"));
}

#[test]
fn empty_sections_show_their_placeholder() {
    let document = Document::new();
    let render = render_sections(&document, 200, RenderOptions::default(), &Theme::default());
    let out = texts(&render);
    assert!(out.iter().any(|line| line.contains("Summarize the main point")));
}

#[test]
fn collapsed_sections_render_only_the_header() {
    let mut document = Document::new();
    document.sections.get_mut(SectionId::God).expanded = false;
    document.sections.get_mut(SectionId::God).content = "hidden words".to_string();

    let render = render_sections(&document, 80, RenderOptions::default(), &Theme::default());
    let god = render.region(SectionId::God).copied().unwrap();
    assert_eq!(god.height, 1);
    assert!(line_text(&render.lines[god.top]).contains("▸"));
    assert!(!texts(&render).iter().any(|line| line.contains("hidden words")));
}

#[test]
fn focused_section_reports_cursor_inside_its_body() {
    let mut document = Document::new();
    document.sections.get_mut(SectionId::You).content = "go and do".to_string();
    let options = RenderOptions {
        focus: Some((SectionId::You, 3)),
        live_cursor: None,
    };

    let render = render_sections(&document, 80, options, &Theme::default());
    let you = render.region(SectionId::You).copied().unwrap();
    assert_eq!(
        render.cursor,
        Some(CursorVisualPosition {
            line: you.top + 1,
            column: 5,
        })
    );
}

#[test]
fn focus_cursor_is_hidden_while_live() {
    let document = Document::new();
    let options = RenderOptions {
        focus: Some((SectionId::Intro, 0)),
        live_cursor: Some(SectionId::Intro),
    };
    let render = render_sections(&document, 80, options, &Theme::default());
    assert_eq!(render.cursor, None);
}

#[test]
fn live_mode_dims_other_sections() {
    let document = Document::new();
    let options = RenderOptions {
        focus: None,
        live_cursor: Some(SectionId::Intro),
    };
    let render = render_sections(&document, 80, options, &Theme::default());
    let intro = render.region(SectionId::Intro).copied().unwrap();
    let out = render.region(SectionId::Out).copied().unwrap();

    let dimmed = |line: &Line<'_>| {
        line.spans
            .iter()
            .all(|span| span.style.add_modifier.contains(Modifier::DIM))
    };
    assert!(!dimmed(&render.lines[intro.top]));
    assert!(dimmed(&render.lines[out.top]));
}

#[test]
fn region_lookup_and_centering() {
    let document = Document::new();
    let render = render_sections(&document, 120, RenderOptions::default(), &Theme::default());
    let we = render.region(SectionId::We1).copied().unwrap();

    let hit = region_at(&render.regions, we.top, we.left + 1).map(|region| region.id);
    assert_eq!(hit, Some(SectionId::We1));
    assert!(we.is_header(we.top));
    assert!(!we.is_header(we.top + 1));
    assert_eq!(region_at(&render.regions, we.top, we.left - 1).map(|r| r.id), None);

    let region = SectionRegion {
        id: SectionId::Out,
        top: 40,
        height: 4,
        left: 0,
        width: 80,
    };
    assert_eq!(region.centered_scroll_top(20), 32);
    let near_top = SectionRegion { top: 0, ..region };
    assert_eq!(near_top.centered_scroll_top(20), 0);
}

#[test]
fn plain_text_lists_every_section() {
    let mut document = Document::new();
    document.reference = "John 3:16".to_string();
    document.statement = "God loves you".to_string();
    document.sections.get_mut(SectionId::Intro).content = "Once upon a time".to_string();

    let text = plain_text(&document);
    assert!(text.starts_with("John 3:16\nTHE ONE POINT: God loves you\n"));
    assert!(text.contains("[INTRO] INTRODUCTION\nOnce upon a time\n"));
    assert!(text.contains("[OUT] CONCLUSION\nNo content added.\n"));
}
