use ccup_api::bracket::{BracketMatchView, BracketRound, BracketRoundView};
use ccup_api::view::{PENDING_SCORE, TeamSlot};
use tui::buffer::Buffer;
use tui::layout::Rect;
use tui::style::{Color, Modifier, Style};
use tui::widgets::Widget;

// ---------------------------------------------------------------------------
// Layout constants
// ---------------------------------------------------------------------------

/// Rows per match cell: home line, status line, away line.
pub const MATCH_HEIGHT: u16 = 3;

/// Slot heights per bracket depth (0 = Sweet 16 leaf, 3 = Championship root).
/// SH[0] = MATCH_HEIGHT; SH[d] = 2 * SH[d-1] + 1.
const SH: [u16; 4] = [
    MATCH_HEIGHT,
    2 * MATCH_HEIGHT + 1,
    2 * (2 * MATCH_HEIGHT + 1) + 1,
    2 * (2 * (2 * MATCH_HEIGHT + 1) + 1) + 1,
];

/// Rows needed to draw the full bracket without scrolling.
pub const BRACKET_HEIGHT: u16 = SH[3];

/// Width of the connector zone between adjacent round columns.
pub const CONNECTOR_WIDTH: u16 = 3;

/// Narrowest pane the grid is drawn in; below this the caller falls back to a list.
pub const MIN_GRID_WIDTH: u16 = 4 * 16 + 3 * CONNECTOR_WIDTH;

const CELL_W_FULL: u16 = 28;
const MATCHES_PER_ROUND: [usize; 4] = [8, 4, 2, 1];

/// Pre-computed position of one match.
#[derive(Debug, Clone)]
pub struct MatchCell {
    /// Row of the status line, relative to the top of the bracket.
    pub center_row: u16,
    pub col: u16,
    pub cell_width: u16,
    pub round: BracketRound,
    pub match_idx: usize,
}

// ---------------------------------------------------------------------------
// BracketGrid: layout engine
// ---------------------------------------------------------------------------

/// Column order left to right: Sweet 16 | conn | Elite 8 | conn | Final 4 | conn | Championship
#[derive(Debug, Clone)]
pub struct BracketGrid {
    /// Depth-major: Sweet16(8) + Elite8(4) + Final4(2) + Championship(1).
    pub cells: Vec<MatchCell>,
    pub round_cols: [u16; 4],
    pub cell_width: u16,
}

impl BracketGrid {
    /// Lay out the bracket for a pane `width` columns wide.
    ///
    /// Center rows follow center[d][i] = SH[d]/2 + i * (SH[d+1] - SH[d]):
    ///   Sweet 16     (d=0): [1, 5, 9, 13, 17, 21, 25, 29]
    ///   Elite 8      (d=1): [3, 11, 19, 27]
    ///   Final 4      (d=2): [7, 23]
    ///   Championship (d=3): [15]
    pub fn compute(width: u16) -> Self {
        let per_col = width.saturating_sub(CONNECTOR_WIDTH * 3) / 4;
        let cell_width = per_col.clamp(1, CELL_W_FULL);
        let stride = cell_width + CONNECTOR_WIDTH;
        let round_cols = [0u16, stride, stride * 2, stride * 3];

        let first_center = [SH[0] / 2, SH[1] / 2, SH[2] / 2, SH[3] / 2];
        let spacing: [u16; 4] = [SH[1] - SH[0], SH[2] - SH[1], SH[3] - SH[2], 0];

        let mut cells = Vec::with_capacity(15);
        for (d, round) in BracketRound::ALL.into_iter().enumerate() {
            for i in 0..MATCHES_PER_ROUND[d] {
                cells.push(MatchCell {
                    center_row: first_center[d] + i as u16 * spacing[d],
                    col: round_cols[d],
                    cell_width,
                    round,
                    match_idx: i,
                });
            }
        }

        Self { cells, round_cols, cell_width }
    }

    pub fn cells_for_depth(&self, depth: usize) -> &[MatchCell] {
        const OFFSETS: [usize; 5] = [0, 8, 12, 14, 15];
        &self.cells[OFFSETS[depth]..OFFSETS[depth + 1]]
    }
}

// ---------------------------------------------------------------------------
// BracketView widget
// ---------------------------------------------------------------------------

/// Full elimination bracket. Rounds missing from `rounds` draw as empty slots.
pub struct BracketView<'a> {
    pub rounds: &'a [BracketRoundView],
    pub grid: &'a BracketGrid,
    pub scroll_offset: u16,
}

impl BracketView<'_> {
    fn match_at(&self, round: BracketRound, idx: usize) -> Option<&BracketMatchView> {
        self.rounds
            .iter()
            .find(|r| r.round == round)
            .and_then(|r| r.matches.get(idx))
    }

    fn is_current(&self, round: BracketRound) -> bool {
        self.rounds.iter().any(|r| r.round == round && r.is_current)
    }
}

impl Widget for BracketView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 20 || area.height < MATCH_HEIGHT {
            return;
        }

        for cell in &self.grid.cells {
            let m = self.match_at(cell.round, cell.match_idx);
            draw_match_cell(m, cell, self.is_current(cell.round), area, self.scroll_offset, buf);
        }

        for d in 0..3usize {
            let children = self.grid.cells_for_depth(d);
            let parents = self.grid.cells_for_depth(d + 1);
            let conn_x = area.x + self.grid.round_cols[d] + self.grid.cell_width;
            for (j, parent) in parents.iter().enumerate() {
                draw_connector(
                    children[2 * j].center_row,
                    parent.center_row,
                    children[2 * j + 1].center_row,
                    conn_x,
                    area,
                    self.scroll_offset,
                    buf,
                );
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Drawing helpers
// ---------------------------------------------------------------------------

fn dim() -> Style {
    Style::default().fg(Color::Indexed(240))
}

fn winner_style() -> Style {
    Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
}

/// Bracket row to screen y, or `None` when scrolled out of `area`.
fn screen_y(bracket_row: u16, scroll: u16, area: Rect) -> Option<u16> {
    let rel = bracket_row.checked_sub(scroll)?;
    (rel < area.height).then_some(area.y + rel)
}

fn draw_match_cell(
    m: Option<&BracketMatchView>,
    cell: &MatchCell,
    current: bool,
    area: Rect,
    scroll: u16,
    buf: &mut Buffer,
) {
    let x = area.x + cell.col;
    if x >= area.x + area.width {
        return;
    }
    let avail_w = (area.x + area.width).saturating_sub(x) as usize;
    let width = cell.cell_width as usize;

    let base_style = if current {
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };

    let rows = [
        (cell.center_row.saturating_sub(1), m.map(|m| &m.home)),
        (cell.center_row, None),
        (cell.center_row.saturating_add(1), m.map(|m| &m.away)),
    ];
    for (idx, (bracket_row, slot)) in rows.into_iter().enumerate() {
        let Some(sy) = screen_y(bracket_row, scroll, area) else {
            continue;
        };
        let (content, style) = match (idx, slot) {
            (1, _) => {
                let style = if current { Style::default().fg(Color::Yellow) } else { dim() };
                (format_status_line(m, width), style)
            }
            (_, Some(slot)) => {
                let style = if slot.is_winner { winner_style() } else { base_style };
                (format_team_line(slot, width), style)
            }
            _ => (format!("{:<width$}", "  TBD"), dim()),
        };
        let text: String = content.chars().take(avail_w).collect();
        buf.set_string(x, sy, &text, style);
    }
}

/// `"[label] [name      ] [score]"`, exactly `width` columns.
fn format_team_line(slot: &TeamSlot, width: usize) -> String {
    let label: String = slot.label.chars().take(2).collect();
    // label(2) + sp + name + sp + score(7) = width
    let name_w = width.saturating_sub(11);
    let name: String = slot.name.chars().take(name_w).collect();
    let line = format!("{label:>2} {name:<name_w$} {:>7}", slot.score);
    line.chars().take(width).collect()
}

fn format_status_line(m: Option<&BracketMatchView>, width: usize) -> String {
    let raw = match m {
        None => String::new(),
        Some(m) => match m.winner() {
            Some(w) => format!(" W: {}", w.owner),
            None if m.home.score != PENDING_SCORE || m.away.score != PENDING_SCORE => {
                " In progress".to_string()
            }
            None => " Pending".to_string(),
        },
    };
    let padded = format!("{raw:<width$}");
    padded.chars().take(width).collect()
}

/// Box-drawing connector between one parent and its two children.
///
/// ```text
///  child_top  ──┐
///               │
///  parent     ──├──
///               │
///  child_bot  ──┘
/// ```
fn draw_connector(
    r_top: u16,
    r_mid: u16,
    r_bot: u16,
    conn_x: u16,
    area: Rect,
    scroll: u16,
    buf: &mut Buffer,
) {
    let style = dim();
    let col_a = conn_x;
    let col_b = conn_x + 1;
    let col_c = conn_x + 2;
    let limit_x = area.x + area.width;

    let mut put = |x: u16, row: u16, ch: char| {
        if x < limit_x
            && let Some(sy) = screen_y(row, scroll, area)
            && let Some(cell) = buf.cell_mut((x, sy))
        {
            cell.set_char(ch);
            cell.set_style(style);
        }
    };

    put(col_a, r_top, '─');
    put(col_b, r_top, '┐');
    for row in (r_top + 1)..r_mid {
        put(col_b, row, '│');
    }
    put(col_a, r_mid, '─');
    put(col_b, r_mid, '├');
    put(col_c, r_mid, '─');
    for row in (r_mid + 1)..r_bot {
        put(col_b, row, '│');
    }
    put(col_a, r_bot, '─');
    put(col_b, r_bot, '┘');
}
