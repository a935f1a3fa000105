use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use page_composer_config::Config;
use page_composer_engine::{
    BlockId, BlockType, Document, EditError, EngineOptions, IoError, Patch, Properties, Registry,
    Session,
    blocks::Breakpoint,
    editing::{OutlineRow, outline},
    read_page, write_page,
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};
use serde_json::{Value, json};
use std::{env, io::stdout, path::PathBuf, process, sync::Arc};

/// Property holding the container count of each cardinality block type
fn count_key(block_type: &BlockType) -> Option<&'static str> {
    match block_type.as_str() {
        "grid" => Some("cellCount"),
        "tabs" => Some("tabCount"),
        "carousel" => Some("slideCount"),
        _ => None,
    }
}

/// Property and new value for growing or shrinking block `id` by `delta`
/// containers. Starts from the containers the block actually has, which
/// may come from a default rather than the property.
fn cardinality_change(doc: &Document, id: &str, delta: i64) -> Result<(&'static str, i64), String> {
    let block = doc
        .find_block(id)
        .ok_or_else(|| format!("Block not found: {id}"))?;
    let key = count_key(block.block_type())
        .ok_or_else(|| format!("{} has no container count", block.block_type()))?;
    let current = doc.slots(id).len() as i64;
    Ok((key, (current + delta).max(1)))
}

struct App {
    page_path: PathBuf,
    doc: Document,
    session: Session,
    breakpoint: Breakpoint,
    rows: Vec<OutlineRow>,
    outline_state: ListState,
    status: String,
}

impl App {
    fn new(page_path: PathBuf, breakpoint: Breakpoint, options: EngineOptions) -> Result<Self> {
        let registry = Arc::new(Registry::builtin());
        let (doc, status) = match read_page(&page_path, registry.clone(), options) {
            Ok(doc) => (doc, format!("Opened {}", page_path.display())),
            Err(IoError::NotFound(_)) => {
                log::info!("{} does not exist yet, starting a new page", page_path.display());
                (
                    Document::with_options(registry, options)?,
                    format!("New page, s saves to {}", page_path.display()),
                )
            }
            Err(e) => return Err(e.into()),
        };

        let mut app = Self {
            page_path,
            doc,
            session: Session::new(),
            breakpoint,
            rows: Vec::new(),
            outline_state: ListState::default(),
            status,
        };
        app.refresh();
        app.session.select(Some(app.doc.root().id().clone()));
        app.refresh();
        Ok(app)
    }

    /// Rebuild the outline and point the list cursor at the selection
    fn refresh(&mut self) {
        self.session.sync(&self.doc);
        self.session.take_events();
        self.rows = outline(&self.doc);
        let position = self
            .session
            .selected()
            .and_then(|id| self.rows.iter().position(|row| row.block_id() == Some(id)));
        self.outline_state.select(position);
    }

    fn selected(&self) -> Option<BlockId> {
        self.session.selected().cloned()
    }

    /// Move the selection to the next block row, skipping slot rows
    fn step_selection(&mut self, forward: bool) {
        let len = self.rows.len();
        if len == 0 {
            return;
        }
        let mut i = self.outline_state.selected().unwrap_or(0);
        for _ in 0..len {
            i = if forward { (i + 1) % len } else { (i + len - 1) % len };
            if let Some(id) = self.rows[i].block_id() {
                self.session.select(Some(id.clone()));
                break;
            }
        }
        self.refresh();
    }

    fn cycle_breakpoint(&mut self) {
        self.breakpoint = self.breakpoint.next();
        self.status = format!("Breakpoint: {}", self.breakpoint.as_str());
    }

    fn change_cardinality(&mut self, delta: i64) {
        let Some(id) = self.selected() else { return };
        match cardinality_change(&self.doc, id.as_str(), delta) {
            Ok((key, count)) => {
                let result = self.doc.update_properties(
                    id.as_str(),
                    Properties::from([(key.to_string(), json!(count))]),
                );
                self.report(result, &format!("{key} = {count}"));
            }
            Err(message) => self.status = message,
        }
    }

    fn delete_selected(&mut self) {
        let Some(id) = self.selected() else { return };
        let result = self.doc.remove_block(id.as_str()).map(|_| Patch::default());
        self.report(result, &format!("Deleted {id}"));
    }

    fn duplicate_selected(&mut self) {
        let Some(id) = self.selected() else { return };
        match self.doc.duplicate_block(id.as_str()) {
            Ok(patch) => {
                self.session.select(patch.block.clone());
                self.report(Ok(patch), "Duplicated");
            }
            Err(e) => self.report(Err(e), ""),
        }
    }

    fn save(&mut self) {
        self.status = match write_page(&self.page_path, &self.doc) {
            Ok(()) => {
                log::info!(
                    "Saved {} blocks to {}",
                    self.doc.block_count(),
                    self.page_path.display()
                );
                format!("Saved {}", self.page_path.display())
            }
            Err(e) => {
                log::error!("Failed to save {}: {e}", self.page_path.display());
                format!("Error: {e}")
            }
        };
    }

    /// Show the outcome of an edit on the status line
    fn report(&mut self, result: Result<Patch, EditError>, done: &str) {
        self.status = match result {
            Ok(patch) => match patch.warnings.last() {
                Some(warning) => format!("Warning: {warning}"),
                None => done.to_string(),
            },
            Err(e) => format!("Error: {e}"),
        };
        self.refresh();
    }

    fn inspector_lines(&self) -> Vec<Line<'static>> {
        let Some(id) = self.selected() else {
            return vec![Line::from("Select a block to inspect it")];
        };
        let fields = match self.doc.property_editor(id.as_str(), self.breakpoint) {
            Ok(fields) => fields,
            Err(e) => return vec![Line::from(format!("Error: {e}"))],
        };

        let mut lines = vec![Line::from(Span::styled(
            id.to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        ))];
        for field in fields {
            let value = field
                .value
                .as_ref()
                .map(Value::to_string)
                .unwrap_or_else(|| "-".to_string());
            let mut spans = vec![Span::raw(format!("{}: {value}", field.label))];
            if field.inherited {
                spans.push(Span::styled(
                    " (inherited)",
                    Style::default().fg(Color::DarkGray),
                ));
            }
            lines.push(Line::from(spans));
        }
        lines
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Determine page path from CLI args or config file
    let args: Vec<String> = env::args().collect();
    let config_path = Config::config_path();
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            process::exit(1);
        }
    };

    let page_path = match (args.len(), &config) {
        (2, _) => PathBuf::from(&args[1]),
        (1, Some(config)) => config.page_path.clone(),
        (1, None) => {
            eprintln!("Error: No page file provided and no config file found");
            eprintln!("Usage: {} <page.json>", args[0]);
            eprintln!("Or create a config file at {}", config_path.display());
            process::exit(1);
        }
        _ => {
            eprintln!("Usage: {} [page.json]", args[0]);
            process::exit(1);
        }
    };
    let (breakpoint, options) = config
        .map(|c| (c.default_breakpoint, c.engine))
        .unwrap_or_default();

    let mut app = match App::new(page_path.clone(), breakpoint, options) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("Error: Page '{}' could not be opened: {e}", page_path.display());
            process::exit(1);
        }
    };

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            match key.code {
                KeyCode::Char('q') => return Ok(()),
                KeyCode::Down | KeyCode::Char('j') => app.step_selection(true),
                KeyCode::Up | KeyCode::Char('k') => app.step_selection(false),
                KeyCode::Char('b') => app.cycle_breakpoint(),
                KeyCode::Char('+') => app.change_cardinality(1),
                KeyCode::Char('-') => app.change_cardinality(-1),
                KeyCode::Char('d') => app.delete_selected(),
                KeyCode::Char('y') => app.duplicate_selected(),
                KeyCode::Char('s') => app.save(),
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(2)])
        .split(f.area());
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[0]);

    // Outline panel
    let items: Vec<ListItem> = app
        .rows
        .iter()
        .map(|row| {
            let style = match row {
                OutlineRow::Slot { .. } => Style::default().fg(Color::DarkGray),
                OutlineRow::Block { .. } => Style::default(),
            };
            ListItem::new(Line::from(Span::styled(row.to_string(), style)))
        })
        .collect();

    let outline_list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Outline (v{})", app.doc.version())),
        )
        .highlight_style(Style::default().bg(Color::Yellow).fg(Color::Black));

    f.render_stateful_widget(outline_list, chunks[0], &mut app.outline_state);

    // Inspector panel
    let inspector = Paragraph::new(app.inspector_lines())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Properties [{}]", app.breakpoint.as_str())),
        )
        .wrap(ratatui::widgets::Wrap { trim: true });

    f.render_widget(inspector, chunks[1]);

    let help = Paragraph::new(vec![
        Line::from(app.status.clone()),
        Line::from(
            "q: Quit | j/k: Select | b: Breakpoint | +/-: Containers | d: Delete | y: Duplicate | s: Save",
        ),
    ]);

    f.render_widget(help, rows[1]);
}
