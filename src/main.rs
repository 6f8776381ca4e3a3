use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, Borders, Clear, Paragraph};

use derby_terminal::demo;
use derby_terminal::export::export_workbook;
use derby_terminal::forecast::{Forecast, ForecastConfig, forecast};
use derby_terminal::ingest::{read_stats_csv, read_times_csv};
use derby_terminal::intervals::aggregate;
use derby_terminal::normalize::{NormalizedTable, normalize};
use derby_terminal::tables::{
    COMPARISON_ATTRIBUTES, IntervalBucket, StatsTable, TeamPair, TimeSeriesTable,
};

const EXPORT_PATH: &str = "derby_report.xlsx";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    Comparison,
    Forecast,
    Timeline,
}

struct App {
    screen: Screen,
    table: StatsTable,
    pair: TeamPair,
    comparison: NormalizedTable,
    forecast: Forecast,
    timeline: TimeSeriesTable,
    status: Option<String>,
    help_overlay: bool,
    should_quit: bool,
}

impl App {
    fn on_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('1') | KeyCode::Char('c') => self.screen = Screen::Comparison,
            KeyCode::Char('2') | KeyCode::Char('f') => self.screen = Screen::Forecast,
            KeyCode::Char('3') | KeyCode::Char('t') => self.screen = Screen::Timeline,
            KeyCode::Char('e') => self.export_report(),
            KeyCode::Char('?') => self.help_overlay = !self.help_overlay,
            KeyCode::Esc => self.help_overlay = false,
            _ => {}
        }
    }

    fn export_report(&mut self) {
        let path = PathBuf::from(EXPORT_PATH);
        match export_workbook(&path, &self.comparison, &self.forecast, &self.timeline) {
            Ok(report) => {
                self.status = Some(format!(
                    "Exported {} ({} comparison, {} forecast, {} timeline rows)",
                    path.display(),
                    report.comparison_rows,
                    report.forecast_rows,
                    report.timeline_rows
                ));
            }
            Err(err) => self.status = Some(format!("Export failed: {err}")),
        }
    }
}

/// Everything the UI shows, computed once up front. The core pipeline is
/// pure, so a failed precondition aborts here with context instead of
/// surfacing mid-render.
fn build_app() -> Result<App> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let (table, events, pair) = match args.as_slice() {
        [] => (
            demo::demo_stats_table(),
            demo::demo_goal_events(),
            demo::demo_team_pair(),
        ),
        [stats_path, times_path, rest @ ..] => {
            let table = read_stats_csv(&PathBuf::from(stats_path))?;
            let events = read_times_csv(&PathBuf::from(times_path))?;
            let pair = match rest {
                [] => default_pair(&table)?,
                [home, away] => TeamPair::new(home.clone(), away.clone()),
                _ => bail!("usage: derby_terminal [stats.csv times.csv [home away]]"),
            };
            (table, events, pair)
        }
        _ => bail!("usage: derby_terminal [stats.csv times.csv [home away]]"),
    };

    let comparison =
        normalize(&table, &COMPARISON_ATTRIBUTES).context("normalize comparison attributes")?;
    let forecast = forecast(&table, &pair.first, &pair.second, &ForecastConfig::default())
        .context("forecast scoreline")?;
    let timeline = aggregate(&events, &pair).context("aggregate goal timeline")?;

    Ok(App {
        screen: Screen::Forecast,
        table,
        pair,
        comparison,
        forecast,
        timeline,
        status: None,
        help_overlay: false,
        should_quit: false,
    })
}

fn default_pair(table: &StatsTable) -> Result<TeamPair> {
    let names = table.team_names();
    match names.as_slice() {
        [first, second, ..] => Ok(TeamPair::new(*first, *second)),
        _ => bail!("stats table needs at least two teams (got {})", names.len()),
    }
}

fn main() -> io::Result<()> {
    let app = match build_app() {
        Ok(app) => app,
        Err(err) => {
            eprintln!("error: {err:#}");
            return Ok(());
        }
    };

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let mut app = app;
    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(app)).block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    match app.screen {
        Screen::Comparison => render_comparison(frame, chunks[1], app),
        Screen::Forecast => render_forecast(frame, chunks[1], app),
        Screen::Timeline => render_timeline(frame, chunks[1], app),
    }

    let footer = Paragraph::new(footer_text(app)).block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, chunks[2]);

    if app.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(app: &App) -> String {
    let screen = match app.screen {
        Screen::Comparison => "Comparison",
        Screen::Forecast => "Forecast",
        Screen::Timeline => "Timeline",
    };
    format!(
        "DERBY TERMINAL | {} vs {} | {screen}",
        app.pair.first, app.pair.second
    )
}

fn footer_text(app: &App) -> String {
    match &app.status {
        Some(status) => status.clone(),
        None => "1 Comparison | 2 Forecast | 3 Timeline | e Export | ? Help | q Quit".to_string(),
    }
}

fn render_comparison(frame: &mut Frame, area: Rect, app: &App) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(8), Constraint::Length(4)])
        .split(area);

    let (Some(first), Some(second)) = (
        app.comparison.row(&app.pair.first),
        app.comparison.row(&app.pair.second),
    ) else {
        let missing = Paragraph::new("Tracked teams missing from comparison table")
            .style(Style::default().fg(Color::Red));
        frame.render_widget(missing, area);
        return;
    };

    let mut chart = BarChart::default()
        .block(
            Block::default()
                .title("Squad profile (normalized 0-100)")
                .borders(Borders::ALL),
        )
        .bar_width(7)
        .bar_gap(1)
        .group_gap(3)
        .max(100);

    for (idx, attribute) in app.comparison.attributes.iter().enumerate() {
        let bars = [
            Bar::default()
                .value((first.values[idx] * 100.0).round() as u64)
                .style(Style::default().fg(Color::Blue)),
            Bar::default()
                .value((second.values[idx] * 100.0).round() as u64)
                .style(Style::default().fg(Color::Red)),
        ];
        chart = chart.data(
            BarGroup::default()
                .label(Line::from(short_attribute_label(attribute)))
                .bars(&bars),
        );
    }
    frame.render_widget(chart, sections[0]);

    let legend = Paragraph::new(format!(
        "{} (left, blue) vs {} (right, red)\nAttributes: {}",
        app.pair.first,
        app.pair.second,
        app.comparison.attributes.join(", ")
    ))
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(legend, sections[1]);
}

fn short_attribute_label(attribute: &str) -> &'static str {
    match attribute {
        "goals_scored" => "Goals",
        "xg_total" => "xG",
        "possession_percentage" => "Poss",
        "pass_accuracy" => "PassAcc",
        "shots_on_target_per_match" => "SoT",
        "passes_total" => "Passes",
        _ => "Attr",
    }
}

fn render_forecast(frame: &mut Frame, area: Rect, app: &App) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    render_score_matrix(frame, columns[0], &app.forecast);
    render_forecast_summary(frame, columns[1], app);
}

fn render_score_matrix(frame: &mut Frame, area: Rect, forecast: &Forecast) {
    let bound = forecast.grid.bound();
    let mut lines: Vec<Line> = Vec::with_capacity(bound + 1);

    let mut header_spans = vec![Span::raw("     ")];
    for j in 0..bound {
        header_spans.push(Span::styled(
            format!("{j:>7}"),
            Style::default().add_modifier(Modifier::BOLD),
        ));
    }
    lines.push(Line::from(header_spans));

    for (i, row) in forecast.grid.rows().iter().enumerate() {
        let mut spans = vec![Span::styled(
            format!("{i:>4} "),
            Style::default().add_modifier(Modifier::BOLD),
        )];
        for p in row {
            spans.push(Span::styled(
                format!("{:>6.2}%", p * 100.0),
                Style::default().fg(probability_color(*p)),
            ));
        }
        lines.push(Line::from(spans));
    }

    let title = format!(
        "Score matrix ({} down, {} across)",
        forecast.home_team, forecast.away_team
    );
    let matrix = Paragraph::new(lines).block(Block::default().title(title).borders(Borders::ALL));
    frame.render_widget(matrix, area);
}

fn probability_color(p: f64) -> Color {
    if p >= 0.08 {
        Color::Red
    } else if p >= 0.04 {
        Color::LightRed
    } else if p >= 0.01 {
        Color::Yellow
    } else {
        Color::DarkGray
    }
}

fn render_forecast_summary(frame: &mut Frame, area: Rect, app: &App) {
    let f = &app.forecast;
    let mut text = vec![
        format!(
            "Expected goals: {} {:.2} - {:.2} {}",
            f.home_team, f.lambda_home, f.lambda_away, f.away_team
        ),
        String::new(),
        "Most likely scorelines:".to_string(),
    ];
    for (idx, outcome) in f.ranked.iter().enumerate() {
        text.push(format!(
            "  {}. {} {} - {} {}  ({:.2}%)",
            idx + 1,
            f.home_team,
            outcome.home_goals,
            outcome.away_goals,
            f.away_team,
            outcome.probability * 100.0
        ));
    }
    text.push(String::new());
    text.push(format!(
        "Grid mass: {:.1}% (rest beyond {} goals)",
        f.grid.sum() * 100.0,
        f.grid.bound() - 1
    ));
    text.push(format!("League teams: {}", app.table.len()));

    let summary = Paragraph::new(text.join("\n"))
        .block(Block::default().title("Prediction").borders(Borders::ALL));
    frame.render_widget(summary, area);
}

fn render_timeline(frame: &mut Frame, area: Rect, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    // Panel 1: first team attacking vs second team conceding, per interval.
    render_timeline_panel(
        frame,
        rows[0],
        app,
        format!("{} scored / {} conceded", app.pair.first, app.pair.second),
        |bucket| (bucket.team1_scored, bucket.team2_conceded),
    );
    // Panel 2: the mirror image.
    render_timeline_panel(
        frame,
        rows[1],
        app,
        format!("{} scored / {} conceded", app.pair.second, app.pair.first),
        |bucket| (bucket.team2_scored, bucket.team1_conceded),
    );
}

fn render_timeline_panel(
    frame: &mut Frame,
    area: Rect,
    app: &App,
    title: String,
    select: impl Fn(&IntervalBucket) -> (u32, u32),
) {
    let max = app
        .timeline
        .buckets
        .iter()
        .map(|b| {
            let (scored, conceded) = select(b);
            scored.max(conceded)
        })
        .max()
        .unwrap_or(1)
        .max(1);

    let mut chart = BarChart::default()
        .block(Block::default().title(title).borders(Borders::ALL))
        .bar_width(5)
        .bar_gap(1)
        .group_gap(2)
        .max(max as u64);

    for bucket in &app.timeline.buckets {
        let (scored, conceded) = select(bucket);
        let bars = [
            Bar::default()
                .value(scored as u64)
                .style(Style::default().fg(Color::Blue)),
            Bar::default()
                .value(conceded as u64)
                .style(Style::default().fg(Color::Red)),
        ];
        chart = chart.data(
            BarGroup::default()
                .label(Line::from(bucket.interval.clone()))
                .bars(&bars),
        );
    }

    frame.render_widget(chart, area);
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Derby Terminal - Help",
        "",
        "Screens:",
        "  1 / c        Squad comparison",
        "  2 / f        Scoreline forecast",
        "  3 / t        Goal timeline",
        "",
        "Actions:",
        "  e            Export xlsx report",
        "  ?            Toggle help",
        "  q            Quit",
        "",
        "Run with no arguments for the built-in demo derby,",
        "or: derby_terminal stats.csv times.csv [home away]",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
