use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Result, bail};
use clap::Parser;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph, Widget, Wrap};

use dailyword::app::{App, AppScreen, StartOptions};
use dailyword::clock::SystemClock;
use dailyword::config::Config;
use dailyword::engine::calendar::CalendarView;
use dailyword::engine::hash_sync::{HashSync, fragment_of, parse_fragment};
use dailyword::engine::navigator::Navigator;
use dailyword::event::{AppEvent, EventHandler};
use dailyword::logging;
use dailyword::session::SelectionState;
use dailyword::source::cache::DiskCache;
use dailyword::source::directory::LocalSource;
use dailyword::source::remote::RemoteSource;
use dailyword::source::{CategoryId, ItemSource, load_or_empty};
use dailyword::ui::components::calendar_picker::CalendarPicker;
use dailyword::ui::components::category_tabs::CategoryTabs;
use dailyword::ui::components::item_card::{ItemCard, reveal_lines};
use dailyword::ui::layout::{AppLayout, centered_rect, pack_hint_lines};
use dailyword::ui::line_input::InputResult;
use dailyword::ui::theme::Theme;

#[derive(Parser)]
#[command(
    name = "dailyword",
    version,
    about = "Word of the day, reproducible and shareable by date"
)]
struct Cli {
    #[arg(short, long, help = "Category to open (e.g. n3)")]
    category: Option<String>,

    #[arg(short, long, help = "Date to open (YYYY-MM-DD)")]
    date: Option<String>,

    #[arg(long, help = "Share link or #YYYY-MM-DD fragment to open")]
    link: Option<String>,

    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(short, long, help = "Print the selection and its share link, then exit")]
    print: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let (config, config_error) = match Config::load() {
        Ok(config) => (config, None),
        Err(err) => (Config::default(), Some(err)),
    };
    match logging::init(&config.log_level) {
        Ok(path) => log::info!("logging to {}", path.display()),
        Err(err) => eprintln!("Warning: logging disabled: {err}"),
    }
    if let Some(err) = config_error {
        log::warn!("config unreadable, using defaults: {err}");
    }

    let category = match cli.category {
        Some(ref name) => match config.find_category(name) {
            Some(id) => Some(id),
            None => bail!(
                "unknown category {name:?}; configured: {}",
                config.categories.join(", ")
            ),
        },
        None => None,
    };
    let link = cli.link.or(cli.date);
    let source = build_source(&config);

    if cli.print {
        let category = category.unwrap_or_else(|| config.default_category_id());
        return print_selection(&config, source.as_ref(), &category, link.as_deref());
    }

    let theme_name = cli.theme.as_deref().unwrap_or(&config.theme);
    let theme = Theme::load(theme_name).unwrap_or_else(|| {
        log::warn!("theme {theme_name:?} not found, using default");
        Theme::default()
    });
    let theme: &'static Theme = Box::leak(Box::new(theme));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(Duration::from_millis(100));
    let start = StartOptions { category, link };
    let mut app = App::new(
        config,
        theme,
        source,
        Arc::new(SystemClock),
        start,
        events.sender(),
    );

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        log::error!("exiting after error: {err:?}");
        eprintln!("Error: {err:?}");
    }

    println!("{}", app.share_link());
    Ok(())
}

/// User directory, then bundled lists; with `items_url` set, the download
/// and its disk cache come first.
fn build_source(config: &Config) -> Arc<dyn ItemSource> {
    let local = LocalSource::new(config.items_dir.clone());
    match config.items_url {
        Some(ref url) => Arc::new(RemoteSource::new(url, DiskCache::new("lists"), local)),
        None => Arc::new(local),
    }
}

fn print_selection(
    config: &Config,
    source: &dyn ItemSource,
    category: &CategoryId,
    link: Option<&str>,
) -> Result<()> {
    let nav = Navigator::new(config.epoch, Arc::new(SystemClock));
    let requested = link.and_then(fragment_of);
    let date = match requested.as_deref().and_then(parse_fragment) {
        Some(date) => date,
        None => {
            if let Some(ref bad) = requested {
                eprintln!("No valid date in {bad:?}, showing today");
            }
            nav.today()
        }
    };

    let items = load_or_empty(source, category);
    let state = SelectionState::resolve(&nav, &items, date);

    println!(
        "{} · Day {} · {}",
        state.category.label(),
        state.day_number,
        state.date
    );
    match state.selection.item() {
        Some(item) => {
            println!("{}", item.word);
            for (_, text) in reveal_lines(item) {
                println!("  {text}");
            }
        }
        None => println!("No words available for this level."),
    }

    let mut hash = HashSync::new(&config.share_base_url, None);
    hash.publish(state.date);
    println!("{}", hash.share_link());
    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key),
            AppEvent::Tick => app.tick(Instant::now()),
            AppEvent::Resize(_, _) => {}
            AppEvent::ItemsLoaded {
                generation,
                category,
            } => app.items_loaded(generation, category),
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match app.screen {
        AppScreen::Daily => handle_daily_key(app, key),
        AppScreen::Calendar => handle_calendar_key(app, key),
        AppScreen::OpenLink => handle_link_key(app, key),
    }
}

fn handle_daily_key(app: &mut App, key: KeyEvent) {
    app.status = None;
    let alt = key.modifiers.contains(KeyModifiers::ALT);
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Left if alt => app.history_back(),
        KeyCode::Right if alt => app.history_forward(),
        KeyCode::Char('H') => app.history_back(),
        KeyCode::Char('L') => app.history_forward(),
        KeyCode::Left | KeyCode::Char('h') => app.step(-1),
        KeyCode::Right | KeyCode::Char('l') => app.step(1),
        KeyCode::Char('t') | KeyCode::End => app.go_today(),
        KeyCode::Home => app.go_start(),
        KeyCode::Char('r') => app.go_random(),
        KeyCode::Tab => app.next_category(true),
        KeyCode::BackTab => app.next_category(false),
        KeyCode::Char(ch @ '1'..='9') => app.select_category(ch as usize - '1' as usize),
        KeyCode::Char('c') => app.open_calendar(),
        KeyCode::Char('g') | KeyCode::Char('/') => app.open_link_prompt(),
        KeyCode::Char(' ') | KeyCode::Enter => app.reveal_all(),
        KeyCode::Char('T') => app.cycle_theme(),
        _ => {}
    }
}

fn handle_calendar_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('c') => app.close_calendar(),
        KeyCode::Left | KeyCode::Char('h') => app.calendar_move(-1),
        KeyCode::Right | KeyCode::Char('l') => app.calendar_move(1),
        KeyCode::Up | KeyCode::Char('k') => app.calendar_move(-7),
        KeyCode::Down | KeyCode::Char('j') => app.calendar_move(7),
        KeyCode::PageUp | KeyCode::Char('<') => app.calendar_month(false),
        KeyCode::PageDown | KeyCode::Char('>') => app.calendar_month(true),
        KeyCode::Enter | KeyCode::Char(' ') => app.calendar_choose(),
        _ => {}
    }
}

fn handle_link_key(app: &mut App, key: KeyEvent) {
    let Some(ref mut input) = app.prompt else {
        app.close_link_prompt();
        return;
    };
    match input.handle(key) {
        InputResult::Submit => app.submit_link(),
        InputResult::Cancel => app.close_link_prompt(),
        InputResult::Continue => {}
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    render_daily(frame, app);
    match app.screen {
        AppScreen::Daily => {}
        AppScreen::Calendar => render_calendar(frame, app),
        AppScreen::OpenLink => render_link_prompt(frame, app),
    }
}

fn render_daily(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;
    let session = &app.session;

    let hints = [
        "[←/→] Day",
        "[t] Today",
        "[Home] Start",
        "[r] Random",
        "[Tab/1-9] Level",
        "[c] Calendar",
        "[g] Open link",
        "[H/L] Back/Fwd",
        "[Space] Reveal",
        "[T] Theme",
        "[q] Quit",
    ];
    let hint_lines = pack_hint_lines(&hints, area.width as usize);
    let layout = AppLayout::new(area, hint_lines.len() as u16);

    let mut header_spans = vec![Span::styled(
        " dailyword ",
        Style::default()
            .fg(colors.header_fg())
            .bg(colors.header_bg())
            .add_modifier(Modifier::BOLD),
    )];
    let nav_info = match session.current() {
        Some(state) => {
            let mut edges = String::new();
            if session.is_at_start() {
                edges.push_str(" · first day");
            }
            if session.is_at_today() {
                edges.push_str(" · today");
            }
            format!(" Day {}{edges} ", state.day_number)
        }
        None => " … ".to_string(),
    };
    header_spans.push(Span::styled(
        nav_info,
        Style::default().fg(colors.muted()).bg(colors.header_bg()),
    ));
    if let Some(ref status) = app.status {
        header_spans.push(Span::styled(
            format!(" {status} "),
            Style::default().fg(colors.warning()).bg(colors.header_bg()),
        ));
    }
    let header =
        Paragraph::new(Line::from(header_spans)).style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, layout.header);

    frame.render_widget(
        CategoryTabs::new(
            &app.categories,
            session.category(),
            session.is_loading(),
            app.theme,
        ),
        layout.tabs,
    );

    let card_area = centered_rect(72, layout.main.height, layout.main);
    frame.render_widget(
        ItemCard::new(session.current(), app.reveal.stage(), app.theme),
        card_area,
    );

    if let Some(sidebar) = layout.sidebar {
        render_sidebar(frame, app, sidebar);
    }

    let footer_lines: Vec<Line> = hint_lines
        .into_iter()
        .map(|line| Line::from(Span::styled(line, Style::default().fg(colors.muted()))))
        .collect();
    frame.render_widget(Paragraph::new(footer_lines), layout.footer);
}

fn render_sidebar(frame: &mut ratatui::Frame, app: &App, area: Rect) {
    let colors = &app.theme.colors;
    let nav = app.session.navigator();
    let selected = app.session.date();

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(9), Constraint::Min(0)])
        .split(area);

    let view = CalendarView::open_at(selected);
    let cells = view.cells(nav, selected, app.config.week_start);
    CalendarPicker::new(view.title(), &cells, app.config.week_start, app.theme)
        .render(rows[0], frame.buffer_mut());

    let block = Block::bordered()
        .title(" Share ")
        .border_style(Style::default().fg(colors.border()));
    let lines = vec![
        Line::from(Span::styled(
            app.share_link(),
            Style::default().fg(colors.accent()),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!("Since {}", nav.epoch()),
            Style::default().fg(colors.muted()),
        )),
    ];
    Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .render(rows[1], frame.buffer_mut());
}

fn render_calendar(frame: &mut ratatui::Frame, app: &App) {
    let Some(ref view) = app.calendar else {
        return;
    };
    let nav = app.session.navigator();
    let popup = centered_rect(27, 10, frame.area());
    frame.render_widget(Clear, popup);

    let cells = view.cells(nav, app.session.date(), app.config.week_start);
    CalendarPicker::new(view.title(), &cells, app.config.week_start, app.theme)
        .cursor(view.cursor())
        .bounds(view.can_go_prev(nav), view.can_go_next(nav))
        .render(popup, frame.buffer_mut());
}

fn render_link_prompt(frame: &mut ratatui::Frame, app: &App) {
    let Some(ref input) = app.prompt else {
        return;
    };
    let colors = &app.theme.colors;
    let popup = centered_rect(60, 5, frame.area());
    frame.render_widget(Clear, popup);

    let block = Block::bordered()
        .title(" Open link ")
        .border_style(Style::default().fg(colors.border_focused()))
        .style(Style::default().bg(colors.bg()));
    let inner = block.inner(popup);
    block.render(popup, frame.buffer_mut());

    let (before, cursor, after) = input.render_parts();
    let cursor_style = Style::default().add_modifier(Modifier::REVERSED);
    let cursor_text = cursor.map(String::from).unwrap_or_else(|| " ".to_string());
    let lines = vec![
        Line::from(vec![
            Span::styled(before, Style::default().fg(colors.fg())),
            Span::styled(cursor_text, cursor_style),
            Span::styled(after, Style::default().fg(colors.fg())),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "[Enter] Open  [Tab] Complete  [Esc] Cancel",
            Style::default().fg(colors.muted()),
        )),
    ];
    Paragraph::new(lines).render(inner, frame.buffer_mut());
}
