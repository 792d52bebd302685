use shortlist_engine::{Item, Tournament};
use tui::buffer::Buffer;
use tui::layout::Rect;
use tui::style::{Color, Modifier, Style};
use tui::widgets::Widget;

// ---------------------------------------------------------------------------
// Layout constants
// ---------------------------------------------------------------------------

/// Rows per duel cell: left-item line, status line, right-item line.
pub const DUEL_HEIGHT: u16 = 3;

/// Blank rows between two stacked duel cells.
const DUEL_SPACING: u16 = 1;

/// Gap between adjacent board columns.
pub const COLUMN_GAP: u16 = 3;

/// Narrowest cell worth drawing; below this columns are dropped, not squeezed.
const CELL_W_MIN: u16 = 18;

/// Maximum cell width in wide terminals.
const CELL_W_FULL: u16 = 36;

// ---------------------------------------------------------------------------
// Board model
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuelStatus {
    /// Settled; `left_won` says which side went through.
    Won { left_won: bool },
    /// The duel waiting on the user right now.
    Current,
    Pending,
}

/// One row of the round board, borrowed from the live tournament.
#[derive(Debug, Clone, Copy)]
pub struct BoardDuel<'a> {
    pub left: &'a Item,
    pub right: Option<&'a Item>,
    pub status: DuelStatus,
}

/// Flatten the current round into board rows: settled duels first, then the
/// head duel, then the rest in bracket order.
pub fn board_duels(tournament: &Tournament) -> Vec<BoardDuel<'_>> {
    let mut duels = Vec::with_capacity(tournament.total_pairs());

    for (pair, winner) in tournament.judged_pairs().zip(tournament.winners()) {
        duels.push(BoardDuel {
            left: &pair.left,
            right: pair.right.as_ref(),
            status: DuelStatus::Won { left_won: pair.left.id == winner.id },
        });
    }
    for (i, pair) in tournament.remaining_pairs().enumerate() {
        duels.push(BoardDuel {
            left: &pair.left,
            right: pair.right.as_ref(),
            status: if i == 0 { DuelStatus::Current } else { DuelStatus::Pending },
        });
    }
    duels
}

// ---------------------------------------------------------------------------
// BoardGrid: layout engine for one round
// ---------------------------------------------------------------------------

/// Pre-computed position of one duel on the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuelCell {
    pub duel_idx: usize,
    /// Page this cell is drawn on; only one page is visible at a time.
    pub page: usize,
    /// Top row of the cell, relative to the board origin.
    pub row: u16,
    /// Left column of the cell, relative to the board origin.
    pub col: u16,
}

/// Column-major layout: duels fill a column top to bottom, then the next
/// column to the right. Whatever does not fit spills onto further pages.
#[derive(Debug, Clone)]
pub struct BoardGrid {
    pub cells: Vec<DuelCell>,
    pub columns: u16,
    pub rows_per_column: usize,
    pub cell_width: u16,
}

impl BoardGrid {
    pub fn compute(duel_count: usize, width: u16, height: u16) -> Self {
        let stride = DUEL_HEIGHT + DUEL_SPACING;
        let rows_per_column = ((height + DUEL_SPACING) / stride).max(1) as usize;

        let needed = duel_count.div_ceil(rows_per_column).max(1) as u16;
        let fitting = ((width + COLUMN_GAP) / (CELL_W_MIN + COLUMN_GAP)).max(1);
        let columns = needed.min(fitting);

        let cell_width = (width.saturating_sub(COLUMN_GAP * (columns - 1)) / columns)
            .clamp(1, CELL_W_FULL);

        let per_page = rows_per_column * columns as usize;
        let cells = (0..duel_count)
            .map(|duel_idx| {
                let slot = duel_idx % per_page;
                let column = (slot / rows_per_column) as u16;
                let row = (slot % rows_per_column) as u16 * stride;
                DuelCell {
                    duel_idx,
                    page: duel_idx / per_page,
                    row,
                    col: column * (cell_width + COLUMN_GAP),
                }
            })
            .collect();

        Self { cells, columns, rows_per_column, cell_width }
    }

    pub fn per_page(&self) -> usize {
        self.rows_per_column * self.columns as usize
    }

    /// Page holding `duel_idx`, so the current duel is always on screen.
    pub fn page_of(&self, duel_idx: usize) -> usize {
        duel_idx / self.per_page().max(1)
    }

    pub fn page_count(&self) -> usize {
        self.cells.len().div_ceil(self.per_page().max(1))
    }
}

// ---------------------------------------------------------------------------
// RoundBoard widget
// ---------------------------------------------------------------------------

/// Renders every duel of the current round, settled ones with their winner
/// highlighted, and pages to wherever the head duel is.
pub struct RoundBoard<'a> {
    pub duels: &'a [BoardDuel<'a>],
    pub grid: &'a BoardGrid,
}

impl<'a> Widget for RoundBoard<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 8 || area.height < DUEL_HEIGHT {
            return;
        }

        let focus = self
            .duels
            .iter()
            .position(|d| d.status == DuelStatus::Current)
            .unwrap_or(self.duels.len().saturating_sub(1));
        let page = self.grid.page_of(focus);

        for cell in self.grid.cells.iter().filter(|c| c.page == page) {
            let Some(duel) = self.duels.get(cell.duel_idx) else {
                continue;
            };
            draw_duel_cell(duel, cell, self.grid.cell_width, area, buf);
        }

        let pages = self.grid.page_count();
        if pages > 1 {
            let label = format!(" {}/{} ", page + 1, pages);
            let x = (area.x + area.width).saturating_sub(label.len() as u16);
            let y = area.y + area.height - 1;
            buf.set_string(x, y, label, Style::default().fg(Color::DarkGray));
        }
    }
}

fn draw_duel_cell(duel: &BoardDuel, cell: &DuelCell, cell_width: u16, area: Rect, buf: &mut Buffer) {
    let x = area.x + cell.col;
    if x >= area.x + area.width {
        return;
    }
    let avail_w = (area.x + area.width).saturating_sub(x) as usize;
    let width = cell_width as usize;

    let winner = Style::default().fg(Color::Green).add_modifier(Modifier::BOLD);
    let loser = Style::default().fg(Color::DarkGray).add_modifier(Modifier::CROSSED_OUT);
    let current = Style::default().fg(Color::White).add_modifier(Modifier::BOLD);
    let pending = Style::default().fg(Color::Gray);
    let dim = Style::default().fg(Color::DarkGray);

    let (left_style, right_style) = match duel.status {
        DuelStatus::Won { left_won: true } => (winner, loser),
        DuelStatus::Won { left_won: false } => (loser, winner),
        DuelStatus::Current => (current, current),
        DuelStatus::Pending => (pending, pending),
    };
    let status_style = match duel.status {
        DuelStatus::Current => Style::default().fg(Color::Yellow),
        _ => dim,
    };

    let left_marker = match duel.status {
        DuelStatus::Won { left_won: true } => '✓',
        DuelStatus::Current => '›',
        _ => ' ',
    };
    let right_marker = match duel.status {
        DuelStatus::Won { left_won: false } => '✓',
        DuelStatus::Current if duel.right.is_some() => '›',
        _ => ' ',
    };

    let rows = [
        (format_slot_line(&duel.left.label(), left_marker, width), left_style),
        (format_status_line(duel, width), status_style),
        (
            match duel.right {
                Some(item) => format_slot_line(&item.label(), right_marker, width),
                None => format_slot_line("(bye)", ' ', width),
            },
            if duel.right.is_some() { right_style } else { dim },
        ),
    ];

    for (dy, (content, style)) in rows.into_iter().enumerate() {
        let y = area.y + cell.row + dy as u16;
        if y >= area.y + area.height {
            break;
        }
        let text: String = content.chars().take(avail_w).collect();
        buf.set_string(x, y, &text, style);
    }
}

/// Format an item line: `"[marker] [label      ] "`, exactly `width` chars.
fn format_slot_line(label: &str, marker: char, width: usize) -> String {
    let name_w = width.saturating_sub(3);
    let name: String = label.chars().take(name_w).collect();
    let line = format!("{marker} {name:<name_w$} ");
    line.chars().take(width).collect()
}

/// Format the middle row of a duel cell, exactly `width` chars.
fn format_status_line(duel: &BoardDuel, width: usize) -> String {
    let raw = match (duel.status, duel.right.is_some()) {
        (DuelStatus::Won { .. }, true) => "  ── decided",
        (DuelStatus::Won { .. }, false) => "  ── bye",
        (DuelStatus::Current, true) => "  ▸ vs  (now)",
        (DuelStatus::Current, false) => "  ▸ bye (now)",
        (DuelStatus::Pending, true) => "    vs",
        (DuelStatus::Pending, false) => "    bye",
    };
    let clipped: String = raw.chars().take(width).collect();
    format!("{clipped:<width$}")
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use shortlist_engine::{ByePolicy, Entry};

    fn tournament(n: usize, target: usize) -> Tournament {
        let entries = (0..n)
            .map(|i| Entry::new(format!("Album {i}"), format!("Artist {i}")))
            .collect();
        Tournament::start(entries, target, ByePolicy::Manual).unwrap()
    }

    fn row_text(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width).map(|x| buf[(x, y)].symbol()).collect()
    }

    #[test]
    fn test_single_column_when_everything_fits() {
        let grid = BoardGrid::compute(3, 40, 20);
        assert_eq!(grid.columns, 1);
        assert_eq!(grid.rows_per_column, 5); // (20 + 1) / 4
        let rows: Vec<u16> = grid.cells.iter().map(|c| c.row).collect();
        assert_eq!(rows, vec![0, 4, 8]);
        assert!(grid.cells.iter().all(|c| c.col == 0 && c.page == 0));
    }

    #[test]
    fn test_spills_into_second_column() {
        let grid = BoardGrid::compute(7, 80, 16);
        assert_eq!(grid.rows_per_column, 4);
        assert_eq!(grid.columns, 2);
        let second: Vec<&DuelCell> = grid.cells.iter().filter(|c| c.col > 0).collect();
        assert_eq!(second.len(), 3);
        assert_eq!(second[0].duel_idx, 4);
        assert_eq!(second[0].row, 0);
        assert_eq!(second[0].col, grid.cell_width + COLUMN_GAP);
    }

    #[test]
    fn test_pages_when_columns_run_out() {
        // 40 wide fits two 18-wide columns and a gap, no more.
        let grid = BoardGrid::compute(12, 40, 8);
        assert_eq!(grid.columns, 2);
        assert_eq!(grid.rows_per_column, 2);
        assert_eq!(grid.per_page(), 4);
        assert_eq!(grid.page_count(), 3);
        assert_eq!(grid.page_of(0), 0);
        assert_eq!(grid.page_of(5), 1);
        assert_eq!(grid.page_of(11), 2);
    }

    #[test]
    fn test_cell_width_caps_at_full_width_limit() {
        let grid = BoardGrid::compute(2, 200, 40);
        assert_eq!(grid.cell_width, CELL_W_FULL);
    }

    #[test]
    fn test_tiny_area_still_yields_one_cell_per_page() {
        let grid = BoardGrid::compute(3, 5, 1);
        assert_eq!(grid.per_page(), 1);
        assert_eq!(grid.page_count(), 3);
    }

    #[test]
    fn test_format_slot_line_width() {
        let line = format_slot_line("Blue - Joni Mitchell", '✓', 14);
        assert_eq!(line.chars().count(), 14, "line: {line:?}");
        assert!(line.starts_with("✓ Blue"));

        let padded = format_slot_line("Kid A", ' ', 30);
        assert_eq!(padded.chars().count(), 30, "line: {padded:?}");
    }

    #[test]
    fn test_format_slot_line_degenerate_width() {
        assert_eq!(format_slot_line("anything", '›', 2).chars().count(), 2);
    }

    #[test]
    fn test_board_duels_follow_round_progress() {
        let mut t = tournament(9, 2);
        let first = t.current_pair().cloned().unwrap();
        let right = first.right.as_ref().unwrap().id;
        t.judge(right).unwrap();

        let duels = board_duels(&t);
        assert_eq!(duels.len(), t.total_pairs());
        assert_eq!(duels[0].status, DuelStatus::Won { left_won: false });
        assert_eq!(duels[0].left.id, first.left.id);
        assert_eq!(duels[1].status, DuelStatus::Current);
        assert!(duels[2..].iter().all(|d| d.status == DuelStatus::Pending));
        assert!(duels.last().is_some_and(|d| d.right.is_none()));
    }

    #[test]
    fn test_render_marks_winner_and_current() {
        let mut t = tournament(6, 2);
        let first = t.current_pair().cloned().unwrap();
        t.judge(first.left.id).unwrap();

        let duels = board_duels(&t);
        let area = Rect::new(0, 0, 40, 12);
        let grid = BoardGrid::compute(duels.len(), area.width, area.height);
        let mut buf = Buffer::empty(area);
        RoundBoard { duels: &duels, grid: &grid }.render(area, &mut buf);

        assert!(row_text(&buf, 0).starts_with(&format!("✓ {}", first.left.title)));
        assert!(row_text(&buf, 1).contains("decided"));
        assert!(row_text(&buf, 5).contains("(now)"));
        assert!(row_text(&buf, 9).contains("vs"));
    }
}
