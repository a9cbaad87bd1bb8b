use tui::backend::Backend;
use tui::layout::{Alignment, Constraint, Layout, Rect};
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{Block, BorderType, Borders, Gauge, Paragraph, Tabs};
use tui::{Frame, Terminal};
use tui_logger::TuiLoggerWidget;

use crate::app::{App, MenuItem};
use crate::components::bracket::{BRACKET_HEIGHT, BracketGrid, BracketView, MIN_GRID_WIDTH};
use crate::state::network::{ERROR_CHAR, LoadingState};
use crate::ui::layout::LayoutAreas;
use ccup_api::TournamentView;
use ccup_api::bracket::BracketRoundView;
use ccup_api::standings::GroupStandings;
use ccup_api::view::TeamSlot;
use log::error;

static TABS: &[&str; 5] = &["Dashboard", "Standings", "Matchups", "Bracket", "Teams"];

pub fn draw<B>(terminal: &mut Terminal<B>, app: &mut App, loading: LoadingState)
where
    B: Backend,
{
    let current_size = terminal.size().unwrap_or_default();
    if current_size.width <= 10 || current_size.height <= 10 {
        return;
    }

    let mut layout = LayoutAreas::new(current_size);

    let mut limit = 0;
    let result = terminal.draw(|f| {
        layout.update(f.area(), app.settings.full_screen, app.state.show_logs);

        if !app.settings.full_screen {
            draw_tabs(f, layout.tab_bar, app);
        }

        limit = match app.state.active_tab {
            MenuItem::Dashboard => draw_dashboard(f, layout.main, app),
            MenuItem::Standings => draw_standings(f, layout.main, app),
            MenuItem::Matchups => draw_matchups(f, layout.main, app),
            MenuItem::Bracket => draw_bracket(f, layout.main, app),
            MenuItem::Teams => draw_teams(f, layout.main, app),
            MenuItem::Help => {
                draw_help(f, layout.main);
                0
            }
        };

        if let Some(logs) = layout.logs {
            draw_logs(f, logs);
        }
        draw_footer(f, layout.footer, app);
        draw_loading_spinner(f, f.area(), app, loading);
    });

    match result {
        Ok(_) => app.set_scroll_limit(limit),
        Err(e) => error!("draw failed: {e}"),
    }
}

pub fn default_border<'a>(color: Color) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
}

fn winner_style() -> Style {
    Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
}

fn dim() -> Style {
    Style::default().fg(Color::DarkGray)
}

fn draw_tabs(f: &mut Frame, tab_bar: [Rect; 2], app: &App) {
    let style = Style::default().fg(Color::White);
    let border_type = BorderType::Rounded;

    let tab_index = match app.state.active_tab {
        MenuItem::Dashboard => 0,
        MenuItem::Standings => 1,
        MenuItem::Matchups => 2,
        MenuItem::Bracket => 3,
        MenuItem::Teams => 4,
        MenuItem::Help => match app.state.previous_tab {
            MenuItem::Standings => 1,
            MenuItem::Matchups => 2,
            MenuItem::Bracket => 3,
            MenuItem::Teams => 4,
            _ => 0,
        },
    };

    let titles: Vec<Line> = TABS
        .iter()
        .enumerate()
        .map(|(i, t)| Line::from(format!("{} {t}", i + 1)))
        .collect();
    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::LEFT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .highlight_style(Style::default().add_modifier(Modifier::UNDERLINED))
        .select(tab_index)
        .style(style);
    f.render_widget(tabs, tab_bar[0]);

    let help = Paragraph::new("Help: ? ")
        .alignment(Alignment::Right)
        .block(
            Block::default()
                .borders(Borders::RIGHT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .style(style);
    f.render_widget(help, tab_bar[1]);
}

/// Draws the "nothing to show yet" message when no snapshot has loaded.
fn view_or_placeholder<'a>(f: &mut Frame, area: Rect, app: &'a App) -> Option<&'a TournamentView> {
    if let Some(view) = app.state.tournament.view.as_ref() {
        return Some(view);
    }
    let msg = match app.state.last_error.as_deref() {
        Some(err) => format!("Tournament data failed to load:\n{err}\n\nPress r to retry."),
        None => "Loading tournament data...".to_string(),
    };
    f.render_widget(Paragraph::new(msg).style(dim()).alignment(Alignment::Center), area);
    None
}

/// Largest useful scroll offset for `total_lines` shown in `visible` rows.
fn scroll_limit(total_lines: usize, visible: u16) -> u16 {
    u16::try_from(total_lines.saturating_sub(visible as usize)).unwrap_or(u16::MAX)
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

fn draw_dashboard(f: &mut Frame, area: Rect, app: &App) -> u16 {
    let block = default_border(Color::White).title(" Commissioner's Cup ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(view) = view_or_placeholder(f, inner, app) else {
        return 0;
    };
    let summary = &view.summary;

    let label = Style::default().fg(Color::Gray);
    let value = Style::default().fg(Color::White).add_modifier(Modifier::BOLD);
    let summary_lines = vec![
        Line::from(vec![
            Span::styled("Phase       ", label),
            Span::styled(view.phase.phase.label(), value),
            Span::styled(format!("  {}", view.phase.detail), Style::default().fg(Color::Yellow)),
        ]),
        Line::from(vec![
            Span::styled("NFL week    ", label),
            Span::styled(summary.nfl_week.to_string(), value),
        ]),
        Line::from(vec![
            Span::styled("Teams       ", label),
            Span::styled(summary.total_teams.to_string(), value),
        ]),
        Line::from(vec![
            Span::styled("Prize pool  ", label),
            Span::styled(format!("${}", summary.prize_pool), value),
        ]),
    ];

    let gauge_height = if summary.matchups_total > 0 { 3 } else { 0 };
    let [summary_area, gauge_area, leaders_area] = Layout::vertical([
        Constraint::Length(summary_lines.len() as u16 + 1),
        Constraint::Length(gauge_height),
        Constraint::Fill(1),
    ])
    .areas(inner);

    f.render_widget(Paragraph::new(summary_lines), summary_area);

    if summary.matchups_total > 0 {
        let ratio = summary.matchups_completed as f64 / summary.matchups_total as f64;
        let gauge = Gauge::default()
            .block(default_border(Color::DarkGray).title(" This week "))
            .gauge_style(Style::default().fg(Color::Green))
            .ratio(ratio.clamp(0.0, 1.0))
            .label(format!(
                "{}/{} matchups scored",
                summary.matchups_completed, summary.matchups_total
            ));
        f.render_widget(gauge, gauge_area);
    }

    let mut leaders = vec![Line::from(Span::styled("Group leaders", label)), Line::from("")];
    for group in &view.standings {
        let line = match group.rows.first() {
            Some(row) => Line::from(vec![
                Span::styled(format!("Group {}  ", group.group), label),
                Span::styled(truncate_name(&row.name, 24), value),
                Span::raw(format!(" {}-{}  ", row.wins, row.losses)),
                Span::styled(row.points_for.clone(), Style::default().fg(Color::Cyan)),
                Span::styled(format!("  {}", row.owner), dim()),
            ]),
            None => Line::from(vec![
                Span::styled(format!("Group {}  ", group.group), label),
                Span::styled("no standings yet", dim()),
            ]),
        };
        leaders.push(line);
    }
    f.render_widget(Paragraph::new(leaders), leaders_area);
    0
}

// ---------------------------------------------------------------------------
// Standings
// ---------------------------------------------------------------------------

fn draw_standings(f: &mut Frame, area: Rect, app: &App) -> u16 {
    let block = default_border(Color::White).title(" Group Standings ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(view) = view_or_placeholder(f, inner, app) else {
        return 0;
    };

    let [top_row, bottom_row] =
        Layout::vertical([Constraint::Fill(1), Constraint::Fill(1)]).areas(inner);
    let [top_left, top_right] =
        Layout::horizontal([Constraint::Fill(1), Constraint::Fill(1)]).areas(top_row);
    let [bottom_left, bottom_right] =
        Layout::horizontal([Constraint::Fill(1), Constraint::Fill(1)]).areas(bottom_row);

    let panes = [top_left, top_right, bottom_left, bottom_right];
    view.standings
        .iter()
        .zip(panes)
        .map(|(group, pane)| draw_group_pane(f, pane, group, app))
        .max()
        .unwrap_or(0)
}

fn draw_group_pane(f: &mut Frame, area: Rect, group: &GroupStandings, app: &App) -> u16 {
    let block = default_border(Color::DarkGray).title(format!(" Group {} ", group.group));
    let inner = block.inner(area);
    f.render_widget(block, area);

    if group.rows.is_empty() {
        f.render_widget(
            Paragraph::new("No standings yet").style(dim()).alignment(Alignment::Center),
            inner,
        );
        return 0;
    }

    let name_w = (inner.width as usize).saturating_sub(20).clamp(6, 28);
    let mut lines = vec![Line::from(Span::styled(
        format!("{:>2}  {:<name_w$} {:>5} {:>8}", "#", "Team", "W-L", "PF"),
        dim(),
    ))];
    let cutoff = group.qualifiers().count();
    for (idx, row) in group.rows.iter().enumerate() {
        if idx == cutoff && idx > 0 {
            lines.push(Line::from(Span::styled("─".repeat(inner.width as usize), dim())));
        }
        let style = if row.qualifying {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::Gray)
        };
        lines.push(Line::from(Span::styled(
            format!(
                "{:>2}  {} {:>5} {:>8}",
                rank_label(row.rank),
                truncate_name(&row.name, name_w),
                format!("{}-{}", row.wins, row.losses),
                row.points_for
            ),
            style,
        )));
    }

    let limit = scroll_limit(lines.len(), inner.height);
    let offset = app.state.scroll_offset.min(limit);
    f.render_widget(Paragraph::new(lines).scroll((offset, 0)), inner);
    limit
}

/// Rank as stored in the sheet; ties keep the same number.
fn rank_label(rank: f64) -> String {
    if rank == 0.0 {
        "-".to_string()
    } else if rank.fract() == 0.0 {
        format!("{}", rank as i64)
    } else {
        format!("{rank}")
    }
}

// ---------------------------------------------------------------------------
// Matchups
// ---------------------------------------------------------------------------

fn draw_matchups(f: &mut Frame, area: Rect, app: &App) -> u16 {
    let block = default_border(Color::White).title(" Group Matchups ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(view) = view_or_placeholder(f, inner, app) else {
        return 0;
    };

    if view.schedule.is_empty() {
        f.render_widget(
            Paragraph::new("No group matchups scheduled").style(dim()).alignment(Alignment::Center),
            inner,
        );
        return 0;
    }

    let name_w = (inner.width as usize).saturating_sub(30).clamp(6, 22) / 2 + 4;
    let mut lines = Vec::new();
    for week in &view.schedule {
        let header_style = if week.is_current {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
        };
        let mut header = vec![Span::styled(
            format!("Week {} (NFL week {})", week.week, week.nfl_week),
            header_style,
        )];
        if week.is_current {
            header.push(Span::styled("  current", Style::default().fg(Color::Yellow)));
        }
        header.push(Span::styled(format!("  {}/{} scored", week.completed(), week.total()), dim()));
        lines.push(Line::from(header));

        for bucket in &week.groups {
            lines.push(Line::from(Span::styled(format!("  Group {}", bucket.group), dim())));
            for m in &bucket.matchups {
                lines.push(Line::from(vec![
                    Span::raw("    "),
                    slot_span(&m.home, name_w, false),
                    Span::styled("  vs  ", dim()),
                    slot_span(&m.away, name_w, true),
                ]));
            }
        }
        lines.push(Line::from(""));
    }

    let limit = scroll_limit(lines.len(), inner.height);
    let offset = app.state.scroll_offset.min(limit);
    f.render_widget(Paragraph::new(lines).scroll((offset, 0)), inner);
    limit
}

/// `label name score`, or `score name label` for the away side.
fn slot_span(slot: &TeamSlot, name_w: usize, away: bool) -> Span<'static> {
    let name = truncate_name(&slot.name, name_w);
    let text = if away {
        format!("{:>7} {name} {:<3}", slot.score, slot.label)
    } else {
        format!("{:>3} {name} {:>7}", slot.label, slot.score)
    };
    let style = if slot.is_winner { winner_style() } else { Style::default().fg(Color::Gray) };
    Span::styled(text, style)
}

// ---------------------------------------------------------------------------
// Bracket
// ---------------------------------------------------------------------------

fn draw_bracket(f: &mut Frame, area: Rect, app: &App) -> u16 {
    let block = default_border(Color::White).title(" Elimination Bracket ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(view) = view_or_placeholder(f, inner, app) else {
        return 0;
    };

    if view.bracket.is_empty() {
        f.render_widget(
            Paragraph::new("Bracket not seeded yet").style(dim()).alignment(Alignment::Center),
            inner,
        );
        return 0;
    }

    if inner.width >= MIN_GRID_WIDTH {
        let grid = BracketGrid::compute(inner.width);
        let max_scroll = BRACKET_HEIGHT.saturating_sub(inner.height);
        f.render_widget(
            BracketView {
                rounds: &view.bracket,
                grid: &grid,
                scroll_offset: app.state.scroll_offset.min(max_scroll),
            },
            inner,
        );
        max_scroll
    } else {
        draw_bracket_list(f, inner, &view.bracket, app)
    }
}

/// Narrow-terminal fallback: one line per side, grouped by round.
fn draw_bracket_list(f: &mut Frame, area: Rect, rounds: &[BracketRoundView], app: &App) -> u16 {
    let name_w = (area.width as usize).saturating_sub(16).clamp(4, 24);
    let mut lines = Vec::new();
    for round in rounds {
        let style = if round.is_current {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
        };
        lines.push(Line::from(Span::styled(round.round.label(), style)));
        for m in &round.matches {
            lines.push(Line::from(slot_span(&m.home, name_w, false)));
            lines.push(Line::from(slot_span(&m.away, name_w, false)));
            lines.push(Line::from(""));
        }
    }
    let limit = scroll_limit(lines.len(), area.height);
    let offset = app.state.scroll_offset.min(limit);
    f.render_widget(Paragraph::new(lines).scroll((offset, 0)), area);
    limit
}

// ---------------------------------------------------------------------------
// Teams
// ---------------------------------------------------------------------------

fn draw_teams(f: &mut Frame, area: Rect, app: &App) -> u16 {
    let block = default_border(Color::White).title(" Teams ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(view) = view_or_placeholder(f, inner, app) else {
        return 0;
    };
    let franchises = app
        .state
        .tournament
        .snapshot
        .as_ref()
        .map(|s| s.franchises.as_slice())
        .unwrap_or_default();

    if franchises.is_empty() {
        f.render_widget(
            Paragraph::new("No franchises listed").style(dim()).alignment(Alignment::Center),
            inner,
        );
        return 0;
    }

    let mut lines = vec![Line::from(Span::styled(
        format!("{:<26} {:<20} {:>5} {:>5}  {}", "Team", "Owner", "Group", "W-L", "Logo"),
        dim(),
    ))];
    for franchise in franchises {
        let standing = franchise.team_id.as_ref().and_then(|id| {
            view.standings.iter().find_map(|g| {
                g.rows
                    .iter()
                    .find(|r| &r.team_id == id)
                    .map(|r| (g.group, r))
            })
        });
        let (group, record, style) = match standing {
            Some((group, row)) => (
                group.to_string(),
                format!("{}-{}", row.wins, row.losses),
                if row.qualifying { Style::default().fg(Color::Green) } else { Style::default() },
            ),
            None => ("-".to_string(), "-".to_string(), Style::default().fg(Color::Gray)),
        };
        let logo = franchise.logo.as_deref().unwrap_or("-");
        let logo_w = (inner.width as usize).saturating_sub(62).max(1);
        lines.push(Line::from(vec![
            Span::styled(
                format!(
                    "{} {} {group:>5} {record:>5}  ",
                    truncate_name(&franchise.name, 26),
                    truncate_name(&franchise.owner, 20)
                ),
                style,
            ),
            Span::styled(truncate_name(logo, logo_w), dim()),
        ]));
    }

    let limit = scroll_limit(lines.len(), inner.height);
    let offset = app.state.scroll_offset.min(limit);
    f.render_widget(Paragraph::new(lines).scroll((offset, 0)), inner);
    limit
}

// ---------------------------------------------------------------------------
// Help, logs, footer, spinner
// ---------------------------------------------------------------------------

fn draw_help(f: &mut Frame, area: Rect) {
    let block = default_border(Color::DarkGray).title(" Help ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let bindings = [
        ("1-5", "switch tab"),
        ("j / k", "scroll down / up"),
        ("r", "refresh now"),
        ("f", "toggle full screen"),
        ("\"", "toggle log pane"),
        ("?", "this help"),
        ("Esc", "leave help"),
        ("q / Ctrl-C", "quit"),
    ];
    let lines: Vec<Line> = bindings
        .iter()
        .map(|(key, action)| {
            Line::from(vec![
                Span::styled(format!("{key:>12}  "), Style::default().fg(Color::Yellow)),
                Span::raw(*action),
            ])
        })
        .collect();
    f.render_widget(Paragraph::new(lines), inner);
}

fn draw_logs(f: &mut Frame, area: Rect) {
    let logs = TuiLoggerWidget::default()
        .block(default_border(Color::DarkGray).title(" Logs "))
        .style_error(Style::default().fg(Color::Red))
        .style_warn(Style::default().fg(Color::Yellow))
        .style_info(Style::default().fg(Color::Gray));
    f.render_widget(logs, area);
}

fn draw_footer(f: &mut Frame, area: Rect, app: &App) {
    let updated = match app.state.tournament.last_updated_label() {
        Some(at) => format!(" Last updated {at}"),
        None => " Not loaded yet".to_string(),
    };
    let mut spans = vec![Span::styled(updated, dim())];
    if let Some(err) = app.state.last_error.as_deref() {
        spans.push(Span::styled(
            format!("  refresh failed: {err}"),
            Style::default().fg(Color::Red),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_loading_spinner(f: &mut Frame, area: Rect, app: &App, loading: LoadingState) {
    if !loading.is_loading && loading.spinner_char != ERROR_CHAR {
        return;
    }
    let style = match loading.spinner_char {
        ERROR_CHAR => Style::default().fg(Color::Red),
        _ => Style::default().fg(Color::White),
    };
    let spinner = Paragraph::new(loading.spinner_char.to_string())
        .alignment(Alignment::Right)
        .style(style);
    let area = if app.settings.full_screen {
        Rect::new(area.width.saturating_sub(3), area.height.saturating_sub(2), 1, 1)
    } else {
        Rect::new(area.width.saturating_sub(11), 1, 1, 1)
    };
    f.render_widget(spinner, area);
}

/// Clip or pad `name` to exactly `max` characters.
fn truncate_name(name: &str, max: usize) -> String {
    let mut s: String = name.chars().take(max).collect();
    while s.chars().count() < max {
        s.push(' ');
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::app_settings::AppSettings;
    use ccup_api::{Franchise, Snapshot, StandingEntry};
    use tui::backend::TestBackend;

    fn loaded_app() -> App {
        let mut app = App::with_settings(AppSettings::default());
        app.on_snapshot_loaded(Snapshot {
            franchises: vec![Franchise {
                name: "Alpha".into(),
                owner: "Ann".into(),
                logo: Some("alpha.png".into()),
                team_id: Some("T1".into()),
            }],
            group_standings: vec![StandingEntry {
                group: "A".into(),
                team_id: Some("T1".into()),
                wins: 3.0.into(),
                losses: 1.0.into(),
                points_for: "120.5".into(),
                rank: 1.0.into(),
            }],
            ..Default::default()
        });
        app
    }

    fn render(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).expect("terminal");
        draw(&mut terminal, app, LoadingState::default());
        let buffer = terminal.backend().buffer();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn truncate_pads_and_clips() {
        assert_eq!(truncate_name("Alpha", 7), "Alpha  ");
        assert_eq!(truncate_name("Alphabet", 5), "Alpha");
    }

    #[test]
    fn dashboard_shows_phase_and_footer() {
        let mut app = loaded_app();
        let screen = render(&mut app);
        assert!(screen.contains("Group Stage"), "{screen}");
        assert!(screen.contains("Week 2 of 5"));
        assert!(screen.contains("$25"));
        assert!(screen.contains("Last updated"));
    }

    #[test]
    fn standings_and_teams_tabs_render_rows() {
        let mut app = loaded_app();
        app.update_tab(MenuItem::Standings);
        let screen = render(&mut app);
        assert!(screen.contains("Group A"));
        assert!(screen.contains("120.50"));

        app.update_tab(MenuItem::Teams);
        let screen = render(&mut app);
        assert!(screen.contains("Alpha"));
        assert!(screen.contains("Ann"));
        assert!(screen.contains("3-1"));
        assert!(screen.contains("alpha.png"));
    }

    #[test]
    fn standings_show_stored_rank_for_ties() {
        let mut app = App::with_settings(AppSettings::default());
        let entry = |id: &str, rank: f64| StandingEntry {
            group: "A".into(),
            team_id: Some(id.into()),
            wins: 2.0.into(),
            losses: 2.0.into(),
            points_for: "100".into(),
            rank: rank.into(),
        };
        app.on_snapshot_loaded(Snapshot {
            group_standings: vec![entry("T1", 1.0), entry("T2", 1.0), entry("T3", 3.0)],
            ..Default::default()
        });
        app.update_tab(MenuItem::Standings);
        let screen = render(&mut app);
        let ranks: Vec<&str> = screen
            .lines()
            .filter(|l| l.contains("Unknown"))
            .filter_map(|l| l.trim_start_matches(|c: char| c == '│' || c == ' ').split_whitespace().next())
            .collect();
        assert_eq!(ranks, ["1", "1", "3"]);
        assert_eq!(rank_label(0.0), "-");
        assert_eq!(rank_label(2.5), "2.5");
    }

    #[test]
    fn draw_pulls_overscroll_back_to_content() {
        let mut app = loaded_app();
        app.update_tab(MenuItem::Teams);
        for _ in 0..5 {
            app.scroll_down();
        }
        render(&mut app);
        assert_eq!(app.state.scroll_limit, Some(0));
        assert_eq!(app.state.scroll_offset, 0);

        app.scroll_down();
        assert_eq!(app.state.scroll_offset, 0);
    }

    #[test]
    fn soft_error_without_data() {
        let mut app = App::with_settings(AppSettings::default());
        app.on_error("HTTP 503".into());
        let screen = render(&mut app);
        assert!(screen.contains("failed to load"));
        assert!(screen.contains("refresh failed: HTTP 503"));
        assert!(screen.contains("Not loaded yet"));
    }
}
