use std::{
    io::{self, BufRead, Write},
    path::{Path, PathBuf},
    sync::Arc,
    time::{Duration, Instant},
};

use anyhow::{Context, Result, bail};
use chrono::Local;
use clap::Parser;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Position, Rect},
    style::Style,
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph},
};

use sprout_tui::config::{Cli, Command, Config};
use sprout_tui::generation::GeminiGenerator;
use sprout_tui::input::{Action, Focus, map_key};
use sprout_tui::persistence::{
    FileStore, Persistence, default_export_file_name, export_to_file, import_from_file,
};
use sprout_tui::render::{
    RenderOptions, RenderResult, SectionRegion, plain_text, region_at, render_sections,
    wrap_text,
};
use sprout_tui::sections::SectionId;
use sprout_tui::session::Session;
use sprout_tui::text_edit::{EditCommand, apply_edit, char_len};
use sprout_tui::theme::Theme;

const STATUS_TIMEOUT: Duration = Duration::from_secs(4);
const TICK_RATE: Duration = Duration::from_millis(250);
const TIMER_INTERVAL: Duration = Duration::from_secs(1);
const MOUSE_SCROLL_LINES: usize = 3;
const TIMER_WIDTH: u16 = 20;
const MAX_VERSES_LINES: usize = 4;
const IMPORT_PROMPT: &str = "Import file: ";

fn main() -> Result<()> {
    run()
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_cli(&cli);
    let data_dir = config.ensure_data_dir()?.to_path_buf();
    if let Err(err) = sprout_tui::logging::init(&config.log_file) {
        eprintln!(
            "warning: logging disabled, cannot open {}: {err}",
            config.log_file.display()
        );
    }
    tracing::info!(data_dir = %data_dir.display(), generation = ?config.generation, "starting");

    let persistence = Persistence::new(FileStore::new(&data_dir));
    let generator = Arc::new(GeminiGenerator::new(config.generation.clone()));
    let mut session = Session::new(persistence, generator);

    match cli.command {
        Some(command) => run_command(&mut session, command),
        None => run_tui(session),
    }
}

fn run_command(session: &mut Session<FileStore>, command: Command) -> Result<()> {
    match command {
        Command::Export { path } => {
            let path = path.unwrap_or_else(default_export_path);
            export_to_file(session.store().document(), &path)
                .with_context(|| format!("failed to export to {}", path.display()))?;
            println!("Exported to {}", path.display());
        }
        Command::Import { path } => {
            let snapshot = import_from_file(&path)
                .with_context(|| format!("failed to import {}", path.display()))?;
            session.store_mut().replace_all(snapshot);
            check_saved(session)?;
            println!("Imported {}", path.display());
        }
        Command::Generate => {
            session.start_generation()?;
            match session.wait_generation() {
                Some(Ok(())) => {
                    check_saved(session)?;
                    println!("Generated all sections");
                }
                Some(Err(err)) => return Err(err.into()),
                None => bail!("generation did not start"),
            }
        }
        Command::Reset { yes } => {
            let cleared = session
                .store_mut()
                .reset(|| yes || confirm_on_stdin("Clear the saved sermon? [y/N] "));
            check_saved(session)?;
            if cleared {
                println!("Sermon cleared");
            } else {
                println!("Nothing changed");
            }
        }
        Command::Show => {
            print!("{}", plain_text(session.store().document()));
        }
    }
    Ok(())
}

fn default_export_path() -> PathBuf {
    PathBuf::from(default_export_file_name(Local::now().date_naive()))
}

fn check_saved(session: &mut Session<FileStore>) -> Result<()> {
    if let Some(err) = session.store_mut().take_save_error() {
        bail!("failed to save sermon: {err}");
    }
    Ok(())
}

fn confirm_on_stdin(question: &str) -> bool {
    print!("{question}");
    if io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    if io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim(), "y" | "Y" | "yes")
}

fn run_tui(session: Session<FileStore>) -> Result<()> {
    let mut app = App::new(session);

    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("failed to initialize terminal")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal backend")?;
    terminal.clear().ok();

    let res = run_app(&mut terminal, &mut app).context("application error");

    disable_raw_mode().ok();
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .ok();
    terminal.show_cursor().ok();

    tracing::info!("exiting");
    res
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    let mut last_tick = Instant::now();
    let mut last_second = Instant::now();
    let mut needs_redraw = true;

    while !app.should_quit {
        if needs_redraw {
            terminal
                .draw(|frame| app.draw(frame))
                .context("failed to draw frame")?;
            needs_redraw = false;
        }

        let timeout = TICK_RATE
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout).context("event poll failed")? {
            let evt = event::read().context("failed to read event")?;
            if let Event::Resize(_, _) = evt {
                needs_redraw = true;
                continue;
            }
            app.handle_event(evt);
            needs_redraw = true;
        }

        if last_tick.elapsed() >= TICK_RATE {
            if app.on_tick() {
                needs_redraw = true;
            }
            last_tick = Instant::now();
        }

        // One increment per heartbeat; a late heartbeat is not made up.
        if last_second.elapsed() >= TIMER_INTERVAL {
            app.on_second();
            last_second = Instant::now();
            needs_redraw = true;
        }
    }

    Ok(())
}

/// Modal input line shown in place of the status bar.
#[derive(Clone, Debug)]
enum Prompt {
    ConfirmReset,
    ImportPath { text: String, cursor: usize },
}

struct App {
    session: Session<FileStore>,
    theme: Theme,
    focus: Focus,
    cursor: usize,
    scroll_top: usize,
    follow_cursor: bool,
    should_quit: bool,
    status_message: Option<(String, Instant)>,
    prompt: Option<Prompt>,
    pending_scroll: Option<SectionId>,
    regions: Vec<SectionRegion>,
    sections_area: Rect,
    field_areas: Vec<(Focus, Rect)>,
    last_total_lines: usize,
}

impl App {
    fn new(session: Session<FileStore>) -> Self {
        let focus = Focus::default();
        let cursor = char_len(focus.text(session.store().document()));
        Self {
            session,
            theme: Theme::new(),
            focus,
            cursor,
            scroll_top: 0,
            follow_cursor: true,
            should_quit: false,
            status_message: None,
            prompt: None,
            pending_scroll: None,
            regions: Vec::new(),
            sections_area: Rect::default(),
            field_areas: Vec::new(),
            last_total_lines: 0,
        }
    }

    fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some((message.into(), Instant::now()));
    }

    fn prune_status_message(&mut self) {
        if let Some((_, instant)) = &self.status_message
            && instant.elapsed() > STATUS_TIMEOUT
        {
            self.status_message = None;
        }
    }

    fn report_save_error(&mut self) {
        if let Some(err) = self.session.store_mut().take_save_error() {
            self.set_status(format!("Save failed: {err}"));
        }
    }

    /// Returns whether anything visible changed.
    fn on_tick(&mut self) -> bool {
        let had_message = self.status_message.is_some();
        self.prune_status_message();
        let mut changed = had_message && self.status_message.is_none();

        if let Some(outcome) = self.session.poll_generation() {
            match outcome {
                Ok(()) => {
                    self.clamp_cursor();
                    self.set_status("Sermon generated");
                    self.report_save_error();
                }
                Err(err) => self.set_status(err.to_string()),
            }
            changed = true;
        }
        changed
    }

    fn on_second(&mut self) {
        self.session.tick_timer();
        self.session.sample_clock();
    }

    fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();
        if area.height == 0 || area.width == 0 {
            return;
        }

        let verses_height = self.verses_height(area.width.saturating_sub(2) as usize);
        let vertical = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(verses_height),
                Constraint::Length(3),
                Constraint::Min(1),
                Constraint::Length(1),
            ])
            .split(area);
        let top = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(10), Constraint::Length(TIMER_WIDTH)])
            .split(vertical[0]);

        self.field_areas.clear();
        self.draw_field(frame, top[0], Focus::Reference, " Reference ", "Reference...");
        self.draw_timer(frame, top[1]);
        self.draw_field(frame, vertical[1], Focus::Verses, " Verses ", "Paste scripture...");
        self.draw_field(
            frame,
            vertical[2],
            Focus::Statement,
            " THE ONE POINT ",
            "State your main idea...",
        );
        self.draw_sections(frame, vertical[3]);

        let status_area = vertical[4];
        let status_line = self.status_line(status_area.width as usize);
        let style = if self.prompt.is_some() {
            self.theme.prompt_style()
        } else {
            self.theme.status_bar_style()
        };
        let status_widget = Paragraph::new(status_line)
            .block(Block::default().borders(Borders::NONE))
            .style(style);
        frame.render_widget(status_widget, status_area);

        if let Some(Prompt::ImportPath { text, cursor }) = &self.prompt {
            let prefix = char_len(IMPORT_PROMPT) + (*cursor).min(char_len(text));
            let x = status_area.x + (prefix as u16).min(status_area.width.saturating_sub(1));
            frame.set_cursor_position(Position::new(x, status_area.y));
        }
    }

    fn verses_height(&self, inner_width: usize) -> u16 {
        let verses = &self.session.store().document().verses;
        let rows = wrap_text(verses, inner_width.max(1), None).lines.len();
        (rows.clamp(1, MAX_VERSES_LINES) + 2) as u16
    }

    fn draw_field(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        focus: Focus,
        title: &str,
        placeholder: &str,
    ) {
        self.field_areas.push((focus, area));
        let focused = self.focus == focus && !self.session.is_live() && self.prompt.is_none();
        let title_style = match focus {
            Focus::Statement => self.theme.statement_label_style(),
            _ => Style::default(),
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(focused))
            .title(Span::styled(title.to_string(), title_style));
        let inner = block.inner(area);

        let text = focus.text(self.session.store().document());
        let wrapped = wrap_text(text, inner.width.max(1) as usize, focused.then_some(self.cursor));
        let cursor = wrapped.cursor;
        let offset = cursor
            .map(|position| {
                position
                    .line
                    .saturating_sub(inner.height.saturating_sub(1) as usize)
            })
            .unwrap_or(0);

        let lines: Vec<Line<'static>> = if text.is_empty() {
            vec![Line::from(Span::styled(
                placeholder.to_string(),
                self.theme.placeholder_style(),
            ))]
        } else {
            let style = match focus {
                Focus::Reference => self.theme.reference_style(),
                _ => Style::default(),
            };
            wrapped
                .lines
                .into_iter()
                .skip(offset)
                .map(|line| Line::from(Span::styled(line, style)))
                .collect()
        };
        frame.render_widget(Paragraph::new(lines).block(block), area);

        if let Some(position) = cursor
            && inner.width > 0
            && inner.height > 0
        {
            let y = inner.y + (position.line - offset) as u16;
            let x = inner.x + position.column.min(inner.width - 1);
            frame.set_cursor_position(Position::new(x, y));
        }
    }

    fn draw_timer(&self, frame: &mut Frame, area: Rect) {
        let timer = self.session.timer();
        let running = timer.is_running();
        let marker = if running { "▶" } else { "⏸" };
        let line = Line::from(vec![
            Span::styled(
                format!("{marker} {}", timer.display()),
                self.theme.timer_style(running),
            ),
            Span::raw("  "),
            Span::raw(self.session.clock().display()),
        ]);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(running))
            .title(" Timer ");
        frame.render_widget(Paragraph::new(line).block(block), area);
    }

    fn draw_sections(&mut self, frame: &mut Frame, area: Rect) {
        let width = area.width.max(1) as usize;
        let editing = !self.session.is_live() && self.prompt.is_none();
        let options = RenderOptions {
            focus: self
                .focus
                .section()
                .filter(|_| editing)
                .map(|id| (id, self.cursor)),
            live_cursor: self.session.navigation().cursor(),
        };
        let render = render_sections(self.session.store().document(), width, options, &self.theme);

        let viewport_height = area.height as usize;
        self.apply_pending_scroll(&render, viewport_height);
        self.adjust_scroll(&render, viewport_height);
        self.regions = render.regions.clone();
        self.sections_area = area;
        self.last_total_lines = render.total_lines;

        let cursor = render.cursor;
        let paragraph = Paragraph::new(Text::from(render.lines))
            .block(Block::default().borders(Borders::NONE))
            .scroll((self.scroll_top as u16, 0));
        frame.render_widget(paragraph, area);

        if let Some(cursor) = cursor
            && cursor.line >= self.scroll_top
            && cursor.line < self.scroll_top + viewport_height
            && area.width > 0
        {
            let cursor_y = area.y + (cursor.line - self.scroll_top) as u16;
            let cursor_x = area.x + cursor.column.min(area.width - 1);
            frame.set_cursor_position(Position::new(cursor_x, cursor_y));
        }
    }

    fn apply_pending_scroll(&mut self, render: &RenderResult, viewport_height: usize) {
        if let Some(id) = self.pending_scroll.take()
            && let Some(region) = render.region(id)
        {
            self.scroll_top = region.centered_scroll_top(viewport_height);
            self.follow_cursor = false;
        }
    }

    fn adjust_scroll(&mut self, render: &RenderResult, viewport_height: usize) {
        let viewport = viewport_height.max(1);
        let max_scroll = render.total_lines.saturating_sub(viewport);
        if self.follow_cursor
            && let Some(id) = self.focus.section()
        {
            let target = render
                .cursor
                .map(|cursor| cursor.line)
                .or_else(|| render.region(id).map(|region| region.top));
            if let Some(line) = target {
                if line < self.scroll_top {
                    self.scroll_top = line;
                } else if line >= self.scroll_top + viewport {
                    self.scroll_top = line + 1 - viewport;
                }
            }
        }
        if self.scroll_top > max_scroll {
            self.scroll_top = max_scroll;
        }
    }

    fn status_line(&mut self, terminal_width: usize) -> Line<'static> {
        self.prune_status_message();

        match &self.prompt {
            Some(Prompt::ConfirmReset) => {
                return Line::from("Are you sure you want to clear all data? (y/n)");
            }
            Some(Prompt::ImportPath { text, .. }) => {
                return Line::from(format!("{IMPORT_PROMPT}{text}"));
            }
            None => {}
        }

        if let Some((message, _)) = &self.status_message {
            return Line::from(vec![Span::raw(" "), Span::raw(message.clone())]);
        }

        let live = self.session.is_live();
        let mut spans = Vec::new();
        if live {
            let current = self
                .session
                .navigation()
                .cursor()
                .map(|id| id.meta().title)
                .unwrap_or_default();
            spans.push(Span::raw(format!(" LIVE {current}")));
        } else {
            let word_count = self.session.store().document().count_words();
            spans.push(Span::raw(format!(
                " EDIT {}, {} words",
                self.focus.label(),
                word_count
            )));
        }
        if self.session.is_generating() {
            spans.push(Span::raw(" · Generating..."));
        }

        // Least important first; dropped from the front when space runs out.
        let all_shortcuts: &[&str] = if live {
            &["^T:Reset timer", "Esc:Edit", "↑↓:Navigate", "^Q:Quit"]
        } else {
            &[
                "^U:Import",
                "^E:Export",
                "^R:Reset",
                "^O:Fold",
                "^G:Generate",
                "^L:Live",
                "^Q:Quit",
            ]
        };

        let left_width: usize = spans.iter().map(|span| span.content.chars().count()).sum();
        let min_padding = 1;
        let mut shortcuts_to_show = Vec::new();
        let mut shortcuts_width = 0;
        for shortcut in all_shortcuts.iter().rev() {
            let test_width = if shortcuts_to_show.is_empty() {
                shortcut.chars().count()
            } else {
                shortcuts_width + 1 + shortcut.chars().count()
            };
            if left_width + min_padding + test_width <= terminal_width {
                shortcuts_to_show.insert(0, *shortcut);
                shortcuts_width = test_width;
            } else {
                break;
            }
        }

        if !shortcuts_to_show.is_empty() {
            let padding = terminal_width
                .saturating_sub(left_width)
                .saturating_sub(shortcuts_width)
                .max(min_padding);
            spans.push(Span::raw(" ".repeat(padding)));
            spans.push(Span::raw(shortcuts_to_show.join(" ")));
        }

        Line::from(spans)
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(KeyEvent {
                code,
                modifiers,
                kind: KeyEventKind::Press,
                ..
            }) => self.handle_key(code, modifiers),
            Event::Mouse(mouse) => self.handle_mouse_event(mouse),
            _ => {}
        }
    }

    fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) {
        if let Some(prompt) = self.prompt.take() {
            self.handle_prompt_key(prompt, code, modifiers);
            return;
        }

        let Some(action) = map_key(code, modifiers, self.session.is_live()) else {
            return;
        };
        match action {
            Action::Quit => self.should_quit = true,
            Action::ToggleLive => {
                let live = !self.session.is_live();
                self.set_live(live);
            }
            Action::LeaveLive => self.set_live(false),
            Action::ResetTimer => {
                self.session.reset_timer();
                self.set_status("Timer reset");
            }
            Action::Generate => match self.session.start_generation() {
                Ok(()) => self.set_status("Generating sermon..."),
                Err(err) => self.set_status(err.to_string()),
            },
            Action::Export => self.export(),
            Action::Import => {
                self.prompt = Some(Prompt::ImportPath {
                    text: String::new(),
                    cursor: 0,
                });
            }
            Action::ResetDocument => self.prompt = Some(Prompt::ConfirmReset),
            Action::ToggleExpanded => {
                let target = if self.session.is_live() {
                    self.session.navigation().cursor()
                } else {
                    self.focus.section()
                };
                if let Some(id) = target {
                    self.session.store_mut().toggle_expanded(id);
                    self.report_save_error();
                }
            }
            Action::FocusNext => self.set_focus(self.focus.next()),
            Action::FocusPrevious => self.set_focus(self.focus.previous()),
            Action::Advance => {
                if let Some(request) = self.session.advance() {
                    self.pending_scroll = Some(request.target);
                }
            }
            Action::Retreat => {
                if let Some(request) = self.session.retreat() {
                    self.pending_scroll = Some(request.target);
                }
            }
            Action::Edit(command) => self.edit_focused(command),
        }
    }

    fn handle_prompt_key(&mut self, prompt: Prompt, code: KeyCode, modifiers: KeyModifiers) {
        match prompt {
            Prompt::ConfirmReset => {
                let confirmed = matches!(code, KeyCode::Char('y') | KeyCode::Char('Y'));
                if self.session.store_mut().reset(|| confirmed) {
                    self.clamp_cursor();
                    self.set_status("Sermon cleared");
                    self.report_save_error();
                }
            }
            Prompt::ImportPath { text, cursor } => {
                let command = match code {
                    KeyCode::Esc => return,
                    KeyCode::Enter => {
                        let path = PathBuf::from(text.trim());
                        if !path.as_os_str().is_empty() {
                            self.import(&path);
                        }
                        return;
                    }
                    KeyCode::Char(_) if modifiers.contains(KeyModifiers::CONTROL) => None,
                    KeyCode::Char(ch) => Some(EditCommand::Insert(ch)),
                    KeyCode::Backspace => Some(EditCommand::Backspace),
                    KeyCode::Delete => Some(EditCommand::Delete),
                    KeyCode::Left => Some(EditCommand::Left),
                    KeyCode::Right => Some(EditCommand::Right),
                    KeyCode::Home => Some(EditCommand::Home),
                    KeyCode::End => Some(EditCommand::End),
                    _ => None,
                };
                let (text, cursor) = match command {
                    Some(command) => {
                        let outcome = apply_edit(&text, cursor, command, false);
                        (outcome.text.unwrap_or(text), outcome.cursor)
                    }
                    None => (text, cursor),
                };
                self.prompt = Some(Prompt::ImportPath { text, cursor });
            }
        }
    }

    fn set_live(&mut self, enabled: bool) {
        self.session.set_live(enabled);
        if enabled {
            self.pending_scroll = self.session.navigation().cursor();
            self.set_status("Live mode");
        } else {
            self.follow_cursor = true;
            self.set_status("Edit mode");
        }
    }

    fn set_focus(&mut self, focus: Focus) {
        self.focus = focus;
        self.cursor = char_len(focus.text(self.session.store().document()));
        self.follow_cursor = true;
    }

    fn clamp_cursor(&mut self) {
        let len = char_len(self.focus.text(self.session.store().document()));
        self.cursor = self.cursor.min(len);
    }

    fn edit_focused(&mut self, command: EditCommand) {
        if !self.session.can_edit() {
            return;
        }
        let focus = self.focus;
        let document = self.session.store().document();
        if let Some(id) = focus.section()
            && !document.section(id).expanded
        {
            return;
        }

        let outcome = apply_edit(focus.text(document), self.cursor, command, focus.is_multiline());
        self.cursor = outcome.cursor;
        self.follow_cursor = true;
        if let Some(text) = outcome.text {
            focus.write(self.session.store_mut(), text);
            self.report_save_error();
        }
    }

    fn export(&mut self) {
        let path = default_export_path();
        match export_to_file(self.session.store().document(), &path) {
            Ok(()) => {
                tracing::info!(path = %path.display(), "exported");
                self.set_status(format!("Exported to {}", path.display()));
            }
            Err(err) => {
                tracing::warn!(error = %err, "export failed");
                self.set_status(format!("Export failed: {err}"));
            }
        }
    }

    fn import(&mut self, path: &Path) {
        match import_from_file(path) {
            Ok(snapshot) => {
                self.session.store_mut().replace_all(snapshot);
                self.clamp_cursor();
                tracing::info!(path = %path.display(), "imported");
                self.set_status(format!("Imported {}", path.display()));
                self.report_save_error();
            }
            Err(err) => {
                tracing::warn!(error = %err, "import failed");
                self.set_status(err.to_string());
            }
        }
    }

    fn scroll_by_lines(&mut self, delta: isize) {
        if delta == 0 {
            return;
        }
        self.follow_cursor = false;
        let viewport = (self.sections_area.height as usize).max(1);
        let max_scroll = self.last_total_lines.saturating_sub(viewport) as isize;
        let new_scroll = (self.scroll_top as isize + delta).clamp(0, max_scroll.max(0));
        self.scroll_top = new_scroll as usize;
    }

    fn handle_mouse_event(&mut self, event: MouseEvent) {
        if self.prompt.is_some() {
            return;
        }
        match event.kind {
            MouseEventKind::ScrollUp => self.scroll_by_lines(-(MOUSE_SCROLL_LINES as isize)),
            MouseEventKind::ScrollDown => self.scroll_by_lines(MOUSE_SCROLL_LINES as isize),
            MouseEventKind::Down(MouseButton::Left) => self.handle_mouse_down(event),
            _ => {}
        }
    }

    fn handle_mouse_down(&mut self, event: MouseEvent) {
        let position = Position::new(event.column, event.row);

        if self.sections_area.contains(position) {
            let line = self.scroll_top + (event.row - self.sections_area.y) as usize;
            let column = (event.column - self.sections_area.x) as usize;
            let Some(region) = region_at(&self.regions, line, column).copied() else {
                return;
            };

            if self.session.is_live() {
                self.session.activate(region.id);
            } else if region.is_header(line) {
                self.session.store_mut().toggle_expanded(region.id);
                self.report_save_error();
            } else {
                self.set_focus(Focus::Section(region.id));
            }
            return;
        }

        if self.session.is_live() {
            return;
        }
        if let Some((focus, _)) = self
            .field_areas
            .iter()
            .find(|(_, area)| area.contains(position))
            .copied()
        {
            self.set_focus(focus);
        }
    }
}
