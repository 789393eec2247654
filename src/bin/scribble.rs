use std::{
    fs::File,
    io,
    sync::{
        Arc,
        mpsc::{self, Receiver, Sender},
    },
    thread,
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::{error, info};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Position, Rect},
    style::Style,
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use scribble_tui::config::Config;
use scribble_tui::editor::{NoteEditor, SaveOutcome, StyleClass, load_notes, save_note};
use scribble_tui::note::{DEFAULT_TITLE, Note};
use scribble_tui::prompt::{Prompt, PromptOutcome};
use scribble_tui::render::{RenderResult, render_region, visible_width};
use scribble_tui::store::{HttpNoteStore, NoteStore, StoreError};
use scribble_tui::theme::Theme;

const STATUS_TIMEOUT: Duration = Duration::from_secs(4);
const SIDE_NOTE_LABEL: &str = "Write a quick side note:";
const TITLE_LABEL: &str = "Title:";

fn main() -> Result<()> {
    run()
}

fn editor_wrap_configuration(width: usize) -> (usize, usize) {
    if width == 0 {
        return (1, 0);
    }
    if width < 60 {
        let wrap_width = width.saturating_sub(1).max(1);
        return (wrap_width, 0);
    }
    let padding = 2.min(width / 2);
    let wrap_width = width.saturating_sub(padding.saturating_mul(2)).max(1);
    (wrap_width, padding)
}

fn side_panel_width(width: u16) -> u16 {
    if width < 50 { 0 } else { (width / 3).min(32) }
}

fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width.saturating_sub(width)) / 2,
        area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    )
}

fn run() -> Result<()> {
    let config = Config::from_args_and_env()?;
    init_logging(&config)?;
    info!("using notes endpoint {}", config.endpoint);

    let store: Arc<dyn NoteStore> = Arc::new(HttpNoteStore::new(config.endpoint.clone()));
    let mut app = App::new(store, config.endpoint.clone(), config.note_id.clone());
    app.start_load();

    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("failed to initialize terminal")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal backend")?;
    terminal.clear().ok();

    let res = run_app(&mut terminal, &mut app).context("application error");

    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();

    res
}

fn init_logging(config: &Config) -> Result<()> {
    let Some(path) = &config.log_file else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;
    env_logger::Builder::new()
        .filter_level(config.log_level)
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init()
        .context("failed to initialize logging")?;
    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();
    let mut needs_redraw = true;

    while !app.should_quit() {
        if app.poll_jobs() {
            needs_redraw = true;
        }

        if needs_redraw {
            terminal
                .draw(|frame| app.draw(frame))
                .context("failed to draw frame")?;
            needs_redraw = false;
        }

        let timeout = tick_rate
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

        if last_tick.elapsed() >= tick_rate {
            let had_message_before = app.has_status_message();
            app.on_tick();
            last_tick = Instant::now();
            if had_message_before && !app.has_status_message() {
                needs_redraw = true;
            }
        }
    }

    Ok(())
}

enum JobResult {
    Loaded(Result<Vec<Note>, StoreError>),
    Saved { outcome: SaveOutcome, generation: u64 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PromptPurpose {
    SideNote,
    Title,
}

struct ActivePrompt {
    purpose: PromptPurpose,
    prompt: Prompt,
}

struct App {
    editor: NoteEditor,
    store: Arc<dyn NoteStore>,
    endpoint: String,
    requested_note: Option<String>,
    theme: Theme,
    /// Caret offset kept while the region has no selection.
    caret: usize,
    scroll_top: usize,
    should_quit: bool,
    dirty: bool,
    /// Bumped on every edit so a finished save only clears `dirty` when
    /// nothing changed in the meantime.
    generation: u64,
    confirm_reload: bool,
    status_message: Option<(String, Instant)>,
    alert: Option<String>,
    prompt: Option<ActivePrompt>,
    jobs_tx: Sender<JobResult>,
    jobs_rx: Receiver<JobResult>,
    last_render: Option<RenderResult>,
}

impl App {
    fn new(store: Arc<dyn NoteStore>, endpoint: String, requested_note: Option<String>) -> Self {
        let (jobs_tx, jobs_rx) = mpsc::channel();
        Self {
            editor: NoteEditor::new(),
            store,
            endpoint,
            requested_note,
            theme: Theme::default(),
            caret: 0,
            scroll_top: 0,
            should_quit: false,
            dirty: false,
            generation: 0,
            confirm_reload: false,
            status_message: None,
            alert: None,
            prompt: None,
            jobs_tx,
            jobs_rx,
            last_render: None,
        }
    }

    fn should_quit(&self) -> bool {
        self.should_quit
    }

    fn has_status_message(&self) -> bool {
        self.status_message.is_some()
    }

    fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some((message.into(), Instant::now()));
    }

    fn start_load(&mut self) {
        let store = Arc::clone(&self.store);
        let tx = self.jobs_tx.clone();
        let requested = self.requested_note.clone();
        self.set_status("Loading…");
        thread::spawn(move || {
            let result = load_notes(store.as_ref(), requested.as_deref());
            let _ = tx.send(JobResult::Loaded(result));
        });
    }

    fn start_save(&mut self) {
        let note = self.editor.serialize_document();
        let store = Arc::clone(&self.store);
        let tx = self.jobs_tx.clone();
        let generation = self.generation;
        self.set_status("Saving…");
        thread::spawn(move || {
            let outcome = save_note(store.as_ref(), &note);
            let _ = tx.send(JobResult::Saved {
                outcome,
                generation,
            });
        });
    }

    fn poll_jobs(&mut self) -> bool {
        let mut changed = false;
        while let Ok(result) = self.jobs_rx.try_recv() {
            self.apply_job(result);
            changed = true;
        }
        changed
    }

    fn apply_job(&mut self, result: JobResult) {
        match result {
            JobResult::Loaded(Ok(notes)) => {
                if self.editor.apply_loaded(notes) {
                    self.dirty = false;
                    self.caret = 0;
                    self.scroll_top = 0;
                    let message = format!("Opened \"{}\"", self.editor.title());
                    self.set_status(message);
                } else if let Some(id) = &self.requested_note {
                    let message = format!("Note {id} not found");
                    self.set_status(message);
                } else {
                    self.set_status("No saved notes yet");
                }
            }
            JobResult::Loaded(Err(err)) => {
                error!("load failed: {err}");
                self.set_status("Load failed");
            }
            JobResult::Saved {
                outcome,
                generation,
            } => {
                self.editor.apply_save_outcome(&outcome);
                if matches!(outcome, SaveOutcome::Saved(_)) && generation == self.generation {
                    self.dirty = false;
                }
                self.status_message = None;
                self.alert = Some(outcome.notice());
            }
        }
    }

    fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();
        if area.height < 3 || area.width == 0 {
            return;
        }

        let vertical = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(1),
                Constraint::Length(1),
            ])
            .split(area);
        let title_area = vertical[0];
        let body_area = vertical[1];
        let status_area = vertical[2];

        let side_width = side_panel_width(body_area.width);
        let horizontal = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(1), Constraint::Length(side_width)])
            .split(body_area);
        let text_area = horizontal[0];
        let side_area = horizontal[1];

        frame.render_widget(Paragraph::new(self.title_line()), title_area);

        let (wrap_width, left_padding) = editor_wrap_configuration(text_area.width as usize);
        let caret = self.focus();
        let region = self.editor.region();
        let render = render_region(
            region.nodes(),
            wrap_width,
            region.selection().map(|selection| selection.range()),
            Some(caret),
            &self.theme,
        );
        let viewport_height = text_area.height as usize;
        self.adjust_scroll(&render, viewport_height);

        let padding = (left_padding as u16).min(text_area.width);
        let content_area = Rect::new(
            text_area.x + padding,
            text_area.y,
            text_area.width - padding,
            text_area.height,
        );
        let paragraph = Paragraph::new(Text::from(render.lines.clone()))
            .style(Style::default().bg(self.theme.background))
            .scroll((self.scroll_top as u16, 0));
        frame.render_widget(paragraph, content_area);

        if self.prompt.is_none()
            && self.alert.is_none()
            && let Some(cursor) = render.cursor
            && cursor.line >= self.scroll_top
            && cursor.line < self.scroll_top + viewport_height
            && content_area.width > 0
        {
            let cursor_y = content_area.y + (cursor.line - self.scroll_top) as u16;
            let cursor_x = content_area.x + cursor.column.min(content_area.width - 1);
            frame.set_cursor_position(Position::new(cursor_x, cursor_y));
        }

        if side_width > 0 {
            self.draw_side_notes(frame, side_area);
        }

        let status_line = self.status_line(&render, status_area.width as usize);
        let status_widget = Paragraph::new(status_line).style(self.theme.status_bar_style());
        frame.render_widget(status_widget, status_area);

        if let Some(active) = &self.prompt {
            self.draw_prompt(frame, area, active);
        }
        if let Some(message) = &self.alert {
            self.draw_alert(frame, area, message);
        }

        self.last_render = Some(render);
    }

    fn title_line(&self) -> Line<'static> {
        let title = if self.editor.title().trim().is_empty() {
            DEFAULT_TITLE.to_string()
        } else {
            self.editor.title().to_string()
        };
        let mut spans = vec![Span::styled(title, self.theme.title_style())];
        if self.dirty {
            spans.push(Span::styled(" *", self.theme.dirty_style()));
        }
        if let Some(id) = self.editor.note_id() {
            spans.push(Span::raw(format!("  #{id}")));
        }
        Line::from(spans)
    }

    fn draw_side_notes(&self, frame: &mut Frame, area: Rect) {
        let style = self.theme.side_note_style();
        let lines: Vec<Line> = if self.editor.side_notes().is_empty() {
            vec![Line::styled("^N adds a side note", style)]
        } else {
            self.editor
                .side_notes()
                .iter()
                .map(|note| Line::styled(format!("• {note}"), style))
                .collect()
        };
        let widget = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
            Block::default()
                .title(" Side notes ")
                .borders(Borders::LEFT)
                .border_style(self.theme.side_note_border_style()),
        );
        frame.render_widget(widget, area);
    }

    fn draw_prompt(&self, frame: &mut Frame, area: Rect, active: &ActivePrompt) {
        let popup = centered_rect(area, 60, 3);
        frame.render_widget(Clear, popup);

        let block = Block::default()
            .title(format!(" {} ", active.prompt.label()))
            .borders(Borders::ALL)
            .style(self.theme.prompt_style());
        let inner = block.inner(popup);
        let text = active.prompt.text();
        let before_cursor: String = text.chars().take(active.prompt.cursor()).collect();
        let cursor_width = visible_width(&before_cursor) as u16;
        let scroll = cursor_width.saturating_sub(inner.width.saturating_sub(1));
        let widget = Paragraph::new(text.to_string())
            .block(block)
            .scroll((0, scroll));
        frame.render_widget(widget, popup);

        if inner.width > 0 && inner.height > 0 {
            frame.set_cursor_position(Position::new(inner.x + cursor_width - scroll, inner.y));
        }
    }

    fn draw_alert(&self, frame: &mut Frame, area: Rect, message: &str) {
        let hint = "Enter to continue";
        let width = (visible_width(message).max(hint.len()) as u16).saturating_add(6);
        let popup = centered_rect(area, width.max(20), 4);
        frame.render_widget(Clear, popup);
        let widget = Paragraph::new(vec![Line::from(message.to_string()), Line::from(hint)])
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .style(self.theme.alert_style()),
            );
        frame.render_widget(widget, popup);
    }

    fn status_line(&mut self, render: &RenderResult, terminal_width: usize) -> Line<'static> {
        self.prune_status_message();

        let position = render
            .cursor
            .map(|cursor| format!("{}:{}", cursor.line + 1, cursor.column + 1))
            .unwrap_or_else(|| "-:-".to_string());

        if let Some((message, _)) = &self.status_message {
            return Line::from(vec![
                Span::raw(format!("{} ", position)),
                Span::raw(message.clone()),
            ]);
        }

        let word_count = self.editor.region().text_content().split_whitespace().count();
        let side_notes = self.editor.side_notes().len();

        // Least important first
        let all_shortcuts = [
            "^T:Title",
            "^R:Reload",
            "^O:Circle",
            "^L:Highlight",
            "^G:Headline",
            "^N:Note",
            "^S:Save",
            "^Q:Quit",
        ];

        let mut spans = vec![
            Span::raw(position),
            Span::raw(" "),
            Span::raw(self.endpoint.clone()),
            Span::raw(format!(", {} words, {} side notes", word_count, side_notes)),
        ];

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

    fn prune_status_message(&mut self) {
        if let Some((_, instant)) = &self.status_message
            && instant.elapsed() > STATUS_TIMEOUT
        {
            self.status_message = None;
        }
    }

    fn adjust_scroll(&mut self, render: &RenderResult, viewport_height: usize) {
        let viewport = viewport_height.max(1);
        let max_scroll = render.total_lines.saturating_sub(viewport);
        if let Some(cursor) = render.cursor {
            self.scroll_top = self.scroll_top_for_cursor(cursor.line, viewport, max_scroll);
        }
        if self.scroll_top > max_scroll {
            self.scroll_top = max_scroll;
        }
    }

    fn scroll_top_for_cursor(
        &self,
        cursor_line: usize,
        viewport: usize,
        max_scroll: usize,
    ) -> usize {
        let mut scroll = self.scroll_top.min(max_scroll);
        if viewport == 0 {
            return scroll;
        }

        let margin = if viewport >= 3 { 1 } else { 0 };
        if margin == 0 {
            if cursor_line < scroll {
                scroll = cursor_line;
            } else if cursor_line >= scroll.saturating_add(viewport) {
                scroll = cursor_line.saturating_sub(viewport.saturating_sub(1));
            }
        } else {
            let top_limit = scroll.saturating_add(margin);
            let bottom_offset = viewport.saturating_sub(1).saturating_sub(margin);
            let bottom_limit = scroll.saturating_add(bottom_offset);
            if cursor_line < top_limit {
                scroll = cursor_line.saturating_sub(margin);
            } else if cursor_line > bottom_limit {
                scroll = cursor_line.saturating_sub(bottom_offset);
            }
        }

        scroll.min(max_scroll)
    }

    fn handle_event(&mut self, event: Event) {
        let Event::Key(key) = event else {
            return;
        };
        if key.kind != KeyEventKind::Press {
            return;
        }

        if self.alert.is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
                self.alert = None;
            }
            return;
        }

        if let Some(active) = self.prompt.as_mut() {
            if let Some(outcome) = active.prompt.handle_key(key) {
                let purpose = active.purpose;
                self.prompt = None;
                self.finish_prompt(purpose, outcome);
            }
            return;
        }

        if !matches!(key.code, KeyCode::Char('r')) {
            self.confirm_reload = false;
        }
        self.handle_editor_key(key);
    }

    fn handle_editor_key(&mut self, key: KeyEvent) {
        let control = key.modifiers.contains(KeyModifiers::CONTROL);
        let shift = key.modifiers.contains(KeyModifiers::SHIFT);

        match key.code {
            KeyCode::Char('q') | KeyCode::Char('c') if control => {
                self.should_quit = true;
            }
            KeyCode::Char('s') if control => self.start_save(),
            KeyCode::Char('r') if control => self.request_reload(),
            KeyCode::Char('g') if control => {
                self.ensure_caret();
                self.editor.insert_headline();
                self.after_edit();
            }
            KeyCode::Char('l') if control => self.wrap(StyleClass::Highlight),
            KeyCode::Char('o') if control => self.wrap(StyleClass::Circle),
            KeyCode::Char('n') if control => self.open_prompt(PromptPurpose::SideNote),
            KeyCode::Char('t') if control => self.open_prompt(PromptPurpose::Title),
            KeyCode::Char('a') if control => {
                let len = self.editor.region().text_len();
                self.editor.region_mut().select(0, len);
                self.sync_caret();
            }
            KeyCode::Char(ch) if !control && !key.modifiers.contains(KeyModifiers::ALT) => {
                self.ensure_caret();
                if self.editor.region_mut().insert_text(&ch.to_string()) {
                    self.after_edit();
                }
            }
            KeyCode::Tab => {
                self.ensure_caret();
                if self.editor.region_mut().insert_text("    ") {
                    self.after_edit();
                }
            }
            KeyCode::Enter => {
                self.ensure_caret();
                if self.editor.region_mut().insert_line_break() {
                    self.after_edit();
                }
            }
            KeyCode::Backspace => {
                self.ensure_caret();
                if self.editor.region_mut().delete_backward() {
                    self.after_edit();
                }
            }
            KeyCode::Delete => {
                self.ensure_caret();
                if self.editor.region_mut().delete_forward() {
                    self.after_edit();
                }
            }
            KeyCode::Left => {
                let target = match self.editor.region().selection() {
                    Some(selection) if !shift && !selection.is_collapsed() => {
                        selection.range().start
                    }
                    _ => self.focus().saturating_sub(1),
                };
                self.move_caret(target, shift);
            }
            KeyCode::Right => {
                let target = match self.editor.region().selection() {
                    Some(selection) if !shift && !selection.is_collapsed() => selection.range().end,
                    _ => (self.focus() + 1).min(self.editor.region().text_len()),
                };
                self.move_caret(target, shift);
            }
            KeyCode::Up | KeyCode::Down => {
                let down = key.code == KeyCode::Down;
                let focus = self.focus();
                if let Some(target) = self
                    .last_render
                    .as_ref()
                    .and_then(|render| render.vertical_target(focus, down))
                {
                    self.move_caret(target, shift);
                }
            }
            KeyCode::Home | KeyCode::End => {
                let column = if key.code == KeyCode::Home { 0 } else { u16::MAX };
                let focus = self.focus();
                if let Some(target) = self.last_render.as_ref().and_then(|render| {
                    let line = render.position_of(focus)?.line;
                    render.offset_near(line, column)
                }) {
                    self.move_caret(target, shift);
                }
            }
            KeyCode::Esc => {
                let focus = self.focus();
                self.move_caret(focus, false);
            }
            _ => {}
        }
    }

    fn on_tick(&mut self) {
        self.prune_status_message();
    }

    fn focus(&self) -> usize {
        let region = self.editor.region();
        region
            .selection()
            .map(|selection| selection.focus)
            .unwrap_or(self.caret)
            .min(region.text_len())
    }

    fn move_caret(&mut self, target: usize, extend: bool) {
        let caret = self.caret;
        let region = self.editor.region_mut();
        let anchor = match region.selection() {
            Some(selection) if extend => selection.anchor,
            None if extend => caret,
            _ => target,
        };
        region.select(anchor, target);
        self.sync_caret();
    }

    fn ensure_caret(&mut self) {
        if self.editor.region().selection().is_none() {
            let caret = self.focus();
            self.editor.region_mut().collapse_to(caret);
        }
    }

    fn sync_caret(&mut self) {
        if let Some(selection) = self.editor.region().selection() {
            self.caret = selection.focus;
        }
    }

    fn after_edit(&mut self) {
        self.mark_dirty();
        self.sync_caret();
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
        self.generation += 1;
    }

    fn wrap(&mut self, class: StyleClass) {
        match self.editor.region().selection() {
            Some(selection) if !selection.is_collapsed() => {
                if self.editor.wrap_selection(class) {
                    self.after_edit();
                    self.set_status(format!("{} applied", class.label()));
                }
            }
            _ => self.set_status("Select some text first"),
        }
    }

    fn open_prompt(&mut self, purpose: PromptPurpose) {
        let prompt = match purpose {
            PromptPurpose::SideNote => Prompt::new(SIDE_NOTE_LABEL),
            PromptPurpose::Title => Prompt::with_text(TITLE_LABEL, self.editor.title()),
        };
        self.prompt = Some(ActivePrompt { purpose, prompt });
    }

    fn finish_prompt(&mut self, purpose: PromptPurpose, outcome: PromptOutcome) {
        match purpose {
            PromptPurpose::SideNote => {
                if self.editor.add_side_note(outcome) {
                    self.mark_dirty();
                }
            }
            PromptPurpose::Title => {
                if let PromptOutcome::Submitted(title) = outcome
                    && title != self.editor.title()
                {
                    self.editor.set_title(title);
                    self.mark_dirty();
                }
            }
        }
    }

    fn request_reload(&mut self) {
        if self.dirty && !self.confirm_reload {
            self.confirm_reload = true;
            self.set_status("Unsaved changes, press ^R again to reload");
            return;
        }
        self.confirm_reload = false;
        self.start_load();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NoStore;

    impl NoteStore for NoStore {
        fn list(&self) -> Result<Vec<Note>, StoreError> {
            Ok(Vec::new())
        }

        fn get(&self, _id: &str) -> Result<Option<Note>, StoreError> {
            Ok(None)
        }

        fn save(&self, _note: &Note) -> Result<String, StoreError> {
            Ok("1".to_string())
        }
    }

    fn app_with(content: &str) -> App {
        let mut app = App::new(Arc::new(NoStore), "http://test".to_string(), None);
        app.editor.open(Note::new("T", content));
        app
    }

    fn ctrl(ch: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL)
    }

    #[test]
    fn headline_lands_at_the_caret_without_a_selection() {
        let mut app = app_with("<p>abc</p>");
        app.caret = 1;
        app.handle_editor_key(ctrl('g'));
        assert_eq!(
            app.editor.region().to_markup(),
            "<p>a<h2>Headline</h2>bc</p>"
        );
        assert!(app.dirty);
    }

    #[test]
    fn headline_after_a_wrap_uses_the_caret_left_behind() {
        let mut app = app_with("<p>abcd</p>");
        app.editor.region_mut().select(0, 2);
        app.sync_caret();
        app.handle_editor_key(ctrl('l'));
        assert_eq!(app.editor.region().selection(), None);
        app.handle_editor_key(ctrl('g'));
        assert_eq!(
            app.editor.region().to_markup(),
            "<p><span class=\"highlight\">ab<h2>Headline</h2></span>cd</p>"
        );
    }
}
