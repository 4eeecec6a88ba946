//! Brunch TUI - interactive browser for the bottomless brunch directory
//!
//! Shows the sorted venue list with slide-in panels for each facet:
//! - c: cuisines, s: suburbs (by group), d: days, p: price band
//! - o: sort order, v: favourites, Enter: venue details
//! - /: search, f: toggle favourite, r: reset filters, q: quit
//!
//! In the favourites panel Enter opens the venue and x removes it.
//!
//! Logs go to a file (config `[tui] log_file`) so the terminal stays clean.

use anyhow::{Context, Result};
use brunch_directory::domain::{GroupSelection, PriceBand, SortKey, Venue, VenueId, Weekday};
use brunch_directory::infra::Config;
use brunch_directory::io::{FavouritesStore, Loader};
use brunch_directory::services::{Action, Controller, ListStatus, Panel, PanelPhase};
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Row, Table, TableState, Wrap},
    Frame, Terminal,
};
use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::info;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::EnvFilter;

/// Panel width as a share of the screen when fully open
const PANEL_WIDTH_PCT: f32 = 0.4;

#[derive(Parser, Debug)]
#[command(name = "brunch-tui", version, about = "Browse bottomless brunch venues")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Venue list (path or URL), overrides config
    #[arg(long)]
    venues: Option<String>,

    /// Suburb groups (path or URL), overrides config
    #[arg(long)]
    suburb_groups: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Browse,
    Search,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PanelKind {
    Cuisine,
    Suburb,
    Day,
    Price,
    Sort,
    Favourites,
    Detail,
}

impl PanelKind {
    fn from_key(c: char) -> Option<Self> {
        match c {
            'c' => Some(PanelKind::Cuisine),
            's' => Some(PanelKind::Suburb),
            'd' => Some(PanelKind::Day),
            'p' => Some(PanelKind::Price),
            'o' => Some(PanelKind::Sort),
            'v' => Some(PanelKind::Favourites),
            _ => None,
        }
    }
}

/// One selectable row in a facet panel
struct PanelItem {
    label: String,
    active: bool,
    action: Action,
}

struct App {
    controller: Controller,
    cursor: usize,
    mode: Mode,
    search: String,
    panel: Panel,
    panel_kind: PanelKind,
    panel_cursor: usize,
    detail: Option<VenueId>,
}

impl App {
    fn new(controller: Controller, transition: Duration) -> Self {
        Self {
            controller,
            cursor: 0,
            mode: Mode::Browse,
            search: String::new(),
            panel: Panel::new(transition),
            panel_kind: PanelKind::Cuisine,
            panel_cursor: 0,
            detail: None,
        }
    }

    fn dispatch(&mut self, action: Action) {
        self.controller.dispatch(action);
        let visible = self.controller.view().visible_count();
        self.cursor = self.cursor.min(visible.saturating_sub(1));
    }

    fn selected_venue(&self) -> Option<&Venue> {
        self.controller.visible().nth(self.cursor)
    }

    fn open_panel(&mut self, kind: PanelKind, now: Instant) {
        if self.panel.is_engaged() && self.panel_kind == kind {
            return;
        }
        self.panel_kind = kind;
        self.panel_cursor = 0;
        self.panel.open(now);
    }

    /// Returns false when the app should exit
    fn handle_key(&mut self, code: KeyCode, now: Instant) -> bool {
        if self.mode == Mode::Search {
            match code {
                KeyCode::Enter | KeyCode::Esc => self.mode = Mode::Browse,
                KeyCode::Backspace => {
                    self.search.pop();
                    self.dispatch(Action::SetSearch(self.search.clone()));
                }
                KeyCode::Char(c) => {
                    self.search.push(c);
                    self.dispatch(Action::SetSearch(self.search.clone()));
                }
                _ => {}
            }
            return true;
        }

        if self.panel.is_engaged() {
            self.handle_panel_key(code, now);
            return true;
        }

        match code {
            KeyCode::Char('q') | KeyCode::Esc => return false,
            KeyCode::Char('/') => self.mode = Mode::Search,
            KeyCode::Down | KeyCode::Char('j') => {
                let visible = self.controller.view().visible_count();
                if self.cursor + 1 < visible {
                    self.cursor += 1;
                }
            }
            KeyCode::Up | KeyCode::Char('k') => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Enter => {
                if let Some(id) = self.selected_venue().map(|v| v.id) {
                    self.detail = Some(id);
                    self.open_panel(PanelKind::Detail, now);
                }
            }
            KeyCode::Char('f') => {
                if let Some(id) = self.selected_venue().map(|v| v.id) {
                    self.dispatch(Action::ToggleFavourite(id));
                }
            }
            KeyCode::Char('r') => {
                self.search.clear();
                self.dispatch(Action::Reset);
            }
            KeyCode::Char(c) => {
                if let Some(kind) = PanelKind::from_key(c) {
                    self.open_panel(kind, now);
                }
            }
            _ => {}
        }
        true
    }

    fn handle_panel_key(&mut self, code: KeyCode, now: Instant) {
        match code {
            KeyCode::Esc | KeyCode::Char('q') => self.panel.close(now),
            KeyCode::Char('f') if self.panel_kind == PanelKind::Detail => {
                if let Some(id) = self.detail {
                    self.dispatch(Action::ToggleFavourite(id));
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.panel_cursor + 1 < self.panel_items().len() {
                    self.panel_cursor += 1;
                }
            }
            KeyCode::Up | KeyCode::Char('k') => self.panel_cursor = self.panel_cursor.saturating_sub(1),
            KeyCode::Char(' ') | KeyCode::Enter if self.panel_kind == PanelKind::Favourites => {
                if let Some(id) = self.favourite_at(self.panel_cursor) {
                    self.detail = Some(id);
                    self.open_panel(PanelKind::Detail, now);
                }
            }
            KeyCode::Char('x') if self.panel_kind == PanelKind::Favourites => {
                if let Some(id) = self.favourite_at(self.panel_cursor) {
                    self.dispatch(Action::ToggleFavourite(id));
                    self.panel_cursor = self.panel_cursor.min(self.panel_items().len().saturating_sub(1));
                }
            }
            KeyCode::Char(' ') | KeyCode::Enter => {
                let action = self.panel_items().into_iter().nth(self.panel_cursor).map(|item| item.action);
                if let Some(action) = action {
                    self.dispatch(action);
                    self.panel_cursor = self.panel_cursor.min(self.panel_items().len().saturating_sub(1));
                }
            }
            KeyCode::Char(c) => {
                if let Some(kind) = PanelKind::from_key(c) {
                    self.open_panel(kind, now);
                }
            }
            _ => {}
        }
    }

    fn favourite_at(&self, index: usize) -> Option<VenueId> {
        self.controller.favourite_venues().get(index).map(|v| v.id)
    }

    fn panel_items(&self) -> Vec<PanelItem> {
        let filter = self.controller.filter();
        match self.panel_kind {
            PanelKind::Cuisine => self
                .controller
                .store()
                .cuisine_options()
                .into_iter()
                .map(|c| PanelItem {
                    active: filter.has_cuisine(&c),
                    label: c.clone(),
                    action: Action::ToggleCuisine(c),
                })
                .collect(),
            PanelKind::Suburb => {
                let mut items = Vec::new();
                for group in self.controller.store().groups().iter() {
                    let selection = self.controller.group_selection(&group.label);
                    let marker = match selection {
                        GroupSelection::All => "[x]",
                        GroupSelection::Partial => "[-]",
                        GroupSelection::None => "[ ]",
                    };
                    items.push(PanelItem {
                        label: format!("{marker} {}", group.label),
                        active: selection != GroupSelection::None,
                        action: Action::ToggleSuburbGroup(group.label.clone()),
                    });
                    for suburb in &group.suburbs {
                        let active = filter.has_suburb(suburb);
                        items.push(PanelItem {
                            label: format!("    {} {suburb}", if active { "[x]" } else { "[ ]" }),
                            active,
                            action: Action::ToggleSuburb(suburb.clone()),
                        });
                    }
                }
                items
            }
            PanelKind::Day => Weekday::ALL
                .into_iter()
                .map(|day| PanelItem {
                    label: day.long().to_string(),
                    active: filter.days().contains(day),
                    action: Action::ToggleDay(day),
                })
                .collect(),
            PanelKind::Price => PriceBand::ALL
                .into_iter()
                .map(|band| PanelItem {
                    label: format!("{:<5} {}", band.as_str(), band.range_label()),
                    active: filter.price() == Some(band),
                    action: Action::TogglePrice(band),
                })
                .collect(),
            PanelKind::Sort => SortKey::ALL
                .into_iter()
                .map(|key| PanelItem {
                    label: key.label().to_string(),
                    active: self.controller.sort_key() == key,
                    action: Action::SetSort(key),
                })
                .collect(),
            PanelKind::Favourites => self
                .controller
                .favourite_venues()
                .into_iter()
                .map(|v| PanelItem {
                    label: format!("{} ({})", v.name, v.suburb),
                    active: true,
                    action: Action::ToggleFavourite(v.id),
                })
                .collect(),
            PanelKind::Detail => Vec::new(),
        }
    }

    fn panel_title(&self) -> String {
        let filter = self.controller.filter();
        match self.panel_kind {
            PanelKind::Cuisine => format!(" Cuisine ({}) ", filter.cuisines().len()),
            PanelKind::Suburb => format!(
                " Suburbs ({} groups, {} suburbs) ",
                self.controller.active_group_count(),
                filter.suburbs().len()
            ),
            PanelKind::Day => format!(" Days ({}) ", filter.days().len()),
            PanelKind::Price => " Price per person ".to_string(),
            PanelKind::Sort => " Sort by ".to_string(),
            PanelKind::Favourites => " Favourites ".to_string(),
            PanelKind::Detail => " Venue ".to_string(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = Config::load(args.config.as_deref());
    if let Some(venues) = &args.venues {
        config = config.with_venues(venues.as_str());
    }
    if let Some(groups) = &args.suburb_groups {
        config = config.with_suburb_groups(groups.as_str());
    }

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(config.tui_log_file())
        .with_context(|| format!("opening log file {}", config.tui_log_file()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(UtcTime::rfc_3339())
        .with_target(false)
        .with_ansi(false)
        .with_writer(Mutex::new(log_file))
        .init();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        git = env!("GIT_HASH"),
        config_file = %config.config_file(),
        "brunch_tui_starting"
    );

    let loader = Loader::new(config.http_timeout())?;
    let groups_source = config.suburb_groups_source();
    let (store, _report) = loader.load_store(&config.venues_source(), groups_source.as_ref()).await?;
    let favourites = FavouritesStore::load(config.favourites_file());
    let controller = Controller::new(store, favourites, config.default_sort());
    let mut app = App::new(controller, config.transition());

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_ui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!("brunch_tui_stopped");
    result
}

fn run_ui(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    let tick_rate = Duration::from_millis(100);
    let mut last_tick = Instant::now();

    loop {
        let now = Instant::now();
        app.panel.tick(now);
        terminal.draw(|f| draw_ui(f, app, now))?;

        let timeout = tick_rate.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && !app.handle_key(key.code, Instant::now()) {
                    return Ok(());
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }
    }
}

fn draw_ui(f: &mut Frame, app: &App, now: Instant) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header + search
            Constraint::Min(0),    // Venue list
            Constraint::Length(3), // Status + keys
        ])
        .split(f.area());

    draw_header(f, chunks[0], app);
    draw_venues(f, chunks[1], app);
    draw_footer(f, chunks[2], app);

    if app.panel.is_visible() {
        let width = (chunks[1].width as f32 * PANEL_WIDTH_PCT * app.panel.progress(now)) as u16;
        if width > 2 {
            let area = Rect {
                x: chunks[1].x + chunks[1].width - width,
                y: chunks[1].y,
                width,
                height: chunks[1].height,
            };
            f.render_widget(Clear, area);
            match app.panel_kind {
                PanelKind::Detail => draw_detail(f, area, app),
                _ => draw_panel(f, area, app),
            }
        }
    }
}

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
    let searching = app.mode == Mode::Search;
    let search_style = if searching {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };
    let cursor = if searching { "_" } else { "" };

    let header = Paragraph::new(Line::from(vec![
        Span::styled("Bottomless Brunch ", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        Span::raw("| Search: "),
        Span::styled(format!("{}{cursor}", app.search), search_style),
        Span::raw(" | Sort: "),
        Span::styled(app.controller.sort_key().label(), Style::default().fg(Color::Yellow)),
    ]))
    .block(Block::default().borders(Borders::ALL));

    f.render_widget(header, area);
}

fn draw_venues(f: &mut Frame, area: Rect, app: &App) {
    let rows: Vec<Row> = app
        .controller
        .visible()
        .map(|v| {
            let star = if app.controller.is_favourite(v.id) { "*" } else { " " };
            let price = v.min_price().map(|p| format!("${p:.0}")).unwrap_or_else(|| "-".to_string());
            let name = match v.rating {
                Some(rating) => format!("{} ({rating:.1})", v.name),
                None => v.name.clone(),
            };
            Row::new(vec![
                star.to_string(),
                name,
                v.suburb.clone(),
                v.cuisine.clone(),
                price,
                v.days().describe(),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(2),      // Favourite
            Constraint::Percentage(30), // Name
            Constraint::Percentage(20), // Suburb
            Constraint::Percentage(20), // Cuisine
            Constraint::Length(6),      // From
            Constraint::Min(10),        // Days
        ],
    )
    .header(
        Row::new(vec!["", "Venue", "Suburb", "Cuisine", "From", "Days"])
            .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
    )
    .row_highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
    .block(
        Block::default()
            .title(format!(" Venues ({}) ", app.controller.view().visible_count()))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Blue)),
    );

    let mut state = TableState::default().with_selected(Some(app.cursor));
    f.render_stateful_widget(table, area, &mut state);
}

fn draw_footer(f: &mut Frame, area: Rect, app: &App) {
    let status = app.controller.status();
    let color = match status {
        ListStatus::NoMatches => Color::Red,
        ListStatus::ShowingAll => Color::Green,
        ListStatus::Matched(_) => Color::Yellow,
    };
    let keys = match (app.mode, app.panel.phase()) {
        (Mode::Search, _) => "type to search | Enter/Esc done",
        (_, PanelPhase::Open | PanelPhase::Opening) if app.panel_kind == PanelKind::Favourites => {
            "j/k move | Enter open | x remove | Esc close"
        }
        (_, PanelPhase::Open | PanelPhase::Opening) if app.panel_kind == PanelKind::Detail => {
            "f fav | Esc close"
        }
        (_, PanelPhase::Open | PanelPhase::Opening) => "j/k move | Space toggle | Esc close",
        _ => "/ search | c s d p o v panels | Enter details | f fav | r reset | q quit",
    };

    let mut spans = vec![Span::styled(status.to_string(), Style::default().fg(color))];
    if let Some(error) = app.controller.favourites_error() {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(format!("favourites not saved: {error}"), Style::default().fg(Color::Red)));
    }
    spans.push(Span::raw(" | "));
    spans.push(Span::styled(keys, Style::default().fg(Color::DarkGray)));

    let footer = Paragraph::new(Line::from(spans))
    .block(Block::default().borders(Borders::ALL));

    f.render_widget(footer, area);
}

fn draw_panel(f: &mut Frame, area: Rect, app: &App) {
    let items: Vec<ListItem> = app
        .panel_items()
        .into_iter()
        .map(|item| {
            let style = if item.active {
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(Span::styled(item.label, style)))
        })
        .collect();

    let empty = items.is_empty();
    let list = List::new(items)
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("> ")
        .block(
            Block::default()
                .title(app.panel_title())
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Magenta)),
        );

    let mut state = ListState::default().with_selected((!empty).then_some(app.panel_cursor));
    f.render_stateful_widget(list, area, &mut state);
}

fn draw_detail(f: &mut Frame, area: Rect, app: &App) {
    let Some(venue) = app.detail.and_then(|id| app.controller.store().by_id(id)) else {
        return;
    };

    let dim = Style::default().fg(Color::DarkGray);
    let mut lines = vec![
        Line::from(Span::styled(venue.name.clone(), Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))),
        Line::from(format!("{} | {}", venue.suburb, venue.cuisine)),
    ];
    if let Some(address) = &venue.address {
        lines.push(Line::from(Span::styled(address.clone(), dim)));
    }
    if let Some((lat, lng)) = venue.coordinates() {
        lines.push(Line::from(Span::styled(format!("{lat:.4}, {lng:.4}"), dim)));
    }
    if let Some(rating) = venue.rating {
        lines.push(Line::from(format!("Rating {rating:.1}")));
    }
    if app.controller.is_favourite(venue.id) {
        lines.push(Line::from(Span::styled("Favourite", Style::default().fg(Color::Yellow))));
    }
    if let Some(image) = venue.main_image() {
        let more = venue.images.len() - 1;
        let label = if more > 0 { format!("Image: {image} (+{more} more)") } else { format!("Image: {image}") };
        lines.push(Line::from(Span::styled(label, dim)));
    }
    lines.push(Line::from(""));

    for package in &venue.packages {
        let title = package.name.as_deref().unwrap_or("Package");
        let mut summary = format!("{title}: ${:.0}", package.price);
        if package.duration_mins > 0 {
            summary.push_str(&format!(" | {} min", package.duration_mins));
        }
        let days = package.days.describe();
        if !days.is_empty() {
            summary.push_str(&format!(" | {days}"));
        }
        lines.push(Line::from(Span::styled(summary, Style::default().fg(Color::Green))));
        if !package.sessions.is_empty() {
            lines.push(Line::from(Span::styled(format!("  Sessions: {}", package.sessions.join(", ")), dim)));
        }
        if let Some(description) = &package.description {
            lines.push(Line::from(format!("  {description}")));
        }
    }
    if venue.packages.is_empty() {
        lines.push(Line::from(Span::styled("No packages listed", dim)));
    }

    lines.push(Line::from(""));
    if let Some(website) = &venue.website {
        lines.push(Line::from(format!("Web: {website}")));
    }
    if let Some(instagram) = &venue.instagram {
        lines.push(Line::from(format!("Instagram: {instagram}")));
    }
    lines.push(Line::from(format!("Maps: {}", venue.maps_url())));

    let detail = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
        Block::default()
            .title(app.panel_title())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Magenta)),
    );
    f.render_widget(detail, area);
}
