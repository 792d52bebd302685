use tui::backend::Backend;
use tui::layout::{Alignment, Constraint, Layout, Rect};
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{Block, BorderType, Borders, Paragraph, Tabs, Wrap};
use tui::{Frame, Terminal};
use tui_logger::TuiLoggerWidget;

use crate::app::{App, MenuItem};
use crate::components::bracket::{BoardGrid, RoundBoard, board_duels};
use crate::ui::layout::LayoutAreas;
use shortlist_engine::{Item, Tournament};

static TABS: &[&str; 3] = &["Entries", "Duel", "Results"];

const HELP_TEXT: &str = "\
Entries   Enter/i edit  Esc stop editing  Ctrl+S/F5/s start  x clear  j/k scroll
Duel      1/←/h left  2/→/l right  Enter advance bye  u undo  r restart
Results   j/k scroll  e export  r restart
Global    Tab/Shift+Tab or 1/2/3 switch tabs  ? help  \" logs  f full screen  q quit";

pub fn draw<B>(terminal: &mut Terminal<B>, app: &mut App)
where
    B: Backend,
{
    let current_size = terminal.size().unwrap_or_default();
    if current_size.width <= 10 || current_size.height <= 10 {
        return;
    }

    let mut layout = LayoutAreas::new(current_size);

    let result = terminal.draw(|f| {
        layout.update(f.area(), app.settings.full_screen, app.state.show_logs);

        if !app.settings.full_screen {
            draw_tabs(f, layout.tab_bar, app);
        }

        match app.state.active_tab {
            MenuItem::Entries => draw_entries(f, layout.main, app),
            MenuItem::Duel => draw_duel(f, layout.main, app),
            MenuItem::Results => draw_results(f, layout.main, app),
            MenuItem::Help => draw_placeholder(f, layout.main, HELP_TEXT),
        }

        if let Some(logs) = layout.logs {
            draw_logs(f, logs);
        }
        draw_status_line(f, layout.status, app);
    });
    if let Err(e) = result {
        log::error!("draw failed: {e}");
    }
}

pub fn default_border<'a>(color: Color) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
}

fn draw_tabs(f: &mut Frame, tab_bar: [Rect; 2], app: &App) {
    let style = Style::default().fg(Color::White);
    let border_type = BorderType::Rounded;

    let tab_index = match app.state.active_tab {
        MenuItem::Entries => 0,
        MenuItem::Duel => 1,
        MenuItem::Results => 2,
        MenuItem::Help => 0,
    };

    let titles: Vec<Line> = TABS.iter().map(|t| Line::from(*t)).collect();
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

// ---------------------------------------------------------------------------
// Entries
// ---------------------------------------------------------------------------

fn draw_entries(f: &mut Frame, area: Rect, app: &App) {
    let entry = &app.state.entry;
    let count = entry.entries().len();
    let title = match entry.source.as_deref() {
        Some(source) => format!(" Entries ({count}) from {source} "),
        None => format!(" Entries ({count}) "),
    };
    let border = if entry.composing { Color::Yellow } else { Color::White };
    let block = default_border(border).title(title);
    let inner = block.inner(area);
    f.render_widget(block, area);

    if inner.width == 0 || inner.height < 3 {
        return;
    }

    let [editor, error_area, legend] =
        Layout::vertical([Constraint::Fill(1), Constraint::Length(1), Constraint::Length(1)]).areas(inner);

    let mut text = entry.text.clone();
    if entry.composing {
        text.push('_');
    }
    f.render_widget(
        Paragraph::new(text).scroll((entry.scroll_offset, 0)),
        editor,
    );

    if let Some(err) = entry.error.as_deref() {
        f.render_widget(
            Paragraph::new(err.to_string()).style(Style::default().fg(Color::Red)),
            error_area,
        );
    }

    let hint = if entry.composing {
        format!(
            "One \"title - artist\" per line. Esc stop editing  Ctrl+S start (top {})",
            app.settings.target_size
        )
    } else {
        format!(
            "Keys: Enter/i=edit  s=start (top {})  x=clear  j/k=scroll  ?=help",
            app.settings.target_size
        )
    };
    f.render_widget(
        Paragraph::new(hint).style(Style::default().fg(Color::DarkGray)),
        legend,
    );
}

// ---------------------------------------------------------------------------
// Duel
// ---------------------------------------------------------------------------

fn draw_duel(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" Duel ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(tournament) = app.state.duel.tournament.as_ref() else {
        f.render_widget(
            Paragraph::new("No tournament running. Start one from the Entries tab.")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center),
            inner,
        );
        return;
    };

    if tournament.is_finished() {
        f.render_widget(
            Paragraph::new("Shortlist complete. See the Results tab.")
                .style(Style::default().fg(Color::Green))
                .alignment(Alignment::Center),
            inner,
        );
        return;
    }

    let [header, progress, cards, legend, board] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(5),
        Constraint::Length(1),
        Constraint::Fill(1),
    ])
    .areas(inner);

    f.render_widget(
        Paragraph::new(round_header(tournament)).style(Style::default().add_modifier(Modifier::BOLD)),
        header,
    );
    f.render_widget(
        Paragraph::new(format!(
            "Duel {}/{}  ({} judged)",
            (tournament.judged_count() + 1).min(tournament.total_pairs()),
            tournament.total_pairs(),
            tournament.judged_count()
        ))
        .style(Style::default().fg(Color::Gray)),
        progress,
    );

    if let Some(pair) = tournament.current_pair() {
        match pair.right.as_ref() {
            Some(right) => draw_matchup(f, cards, &pair.left, right),
            None => draw_bye(f, cards, &pair.left),
        }
    }

    let keys = match tournament.current_pair() {
        Some(pair) if pair.is_bye() => "Keys: Enter/1=advance  u=undo  r=restart  ?=help",
        _ => "Keys: 1/←=left  2/→=right  u=undo  r=restart  ?=help",
    };
    f.render_widget(
        Paragraph::new(keys).style(Style::default().fg(Color::DarkGray)),
        legend,
    );

    if board.height > 2 {
        let board_block = default_border(Color::DarkGray).title(format!(" Round {} ", tournament.round()));
        let board_inner = board_block.inner(board);
        f.render_widget(board_block, board);

        let duels = board_duels(tournament);
        let grid = BoardGrid::compute(duels.len(), board_inner.width, board_inner.height);
        f.render_widget(RoundBoard { duels: &duels, grid: &grid }, board_inner);
    }
}

fn round_header(tournament: &Tournament) -> String {
    let entrants = tournament.pool().len();
    format!(
        "Round {}: {} items, {} advance  |  keeping top {}",
        tournament.round(),
        entrants,
        tournament.total_pairs(),
        tournament.target()
    )
}

fn draw_matchup(f: &mut Frame, area: Rect, left: &Item, right: &Item) {
    let [left_area, vs_area, right_area] = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Length(6),
        Constraint::Fill(1),
    ])
    .areas(area);

    draw_card(f, left_area, left, "1 / ←", Color::Cyan);
    f.render_widget(
        Paragraph::new("\n\nVS")
            .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center),
        vs_area,
    );
    draw_card(f, right_area, right, "2 / →", Color::Magenta);
}

fn draw_card(f: &mut Frame, area: Rect, item: &Item, key: &str, color: Color) {
    let block = default_border(color).title(format!(" {key} "));
    let inner = block.inner(area);
    f.render_widget(block, area);
    let lines = vec![
        Line::from(Span::styled(
            item.title.clone(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(item.artist.clone(), Style::default().fg(Color::Gray))),
    ];
    f.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center).wrap(Wrap { trim: true }),
        inner,
    );
}

fn draw_bye(f: &mut Frame, area: Rect, item: &Item) {
    let block = default_border(Color::Yellow).title(" Bye ");
    let inner = block.inner(area);
    f.render_widget(block, area);
    let lines = vec![
        Line::from(Span::styled(
            item.label(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "No opponent this round. Press Enter to advance.",
            Style::default().fg(Color::Gray),
        )),
    ];
    f.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

fn draw_results(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" Results ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(shortlist) = app.state.duel.tournament.as_ref().and_then(|t| t.shortlist()) else {
        f.render_widget(
            Paragraph::new("Finish the duels to see your shortlist.")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center),
            inner,
        );
        return;
    };

    let [list_area, history_area, legend] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(4),
        Constraint::Length(1),
    ])
    .areas(inner);

    let width = shortlist.len().to_string().len();
    let lines: Vec<Line> = shortlist
        .iter()
        .enumerate()
        .skip(app.state.results.scroll_offset as usize)
        .map(|(idx, item)| {
            Line::from(vec![
                Span::styled(format!("{:>width$}. ", idx + 1), Style::default().fg(Color::Yellow)),
                Span::styled(item.title.clone(), Style::default().fg(Color::White)),
                Span::styled(format!(" - {}", item.artist), Style::default().fg(Color::Gray)),
            ])
        })
        .collect();
    f.render_widget(Paragraph::new(lines), list_area);

    if let Some(tournament) = app.state.duel.tournament.as_ref() {
        let history: Vec<Line> = tournament
            .history()
            .iter()
            .map(|r| {
                Line::from(format!(
                    "Round {}: {} in, {} through",
                    r.round, r.entrants, r.advancing
                ))
            })
            .collect();
        let history_block = default_border(Color::DarkGray).title(" Rounds ");
        let history_inner = history_block.inner(history_area);
        f.render_widget(history_block, history_area);
        f.render_widget(
            Paragraph::new(history).style(Style::default().fg(Color::Gray)),
            history_inner,
        );
    }

    let hint = match app.state.results.last_export.as_deref() {
        Some(path) => format!("Exported to {path}  |  e=export again  r=restart"),
        None => "Keys: e=export  r=restart  j/k=scroll  ?=help".to_string(),
    };
    f.render_widget(
        Paragraph::new(hint).style(Style::default().fg(Color::DarkGray)),
        legend,
    );
}

// ---------------------------------------------------------------------------
// Chrome
// ---------------------------------------------------------------------------

fn draw_logs(f: &mut Frame, area: Rect) {
    let logger = TuiLoggerWidget::default()
        .block(default_border(Color::DarkGray).title(" Logs "))
        .style_error(Style::default().fg(Color::Red))
        .style_warn(Style::default().fg(Color::Yellow))
        .style_info(Style::default().fg(Color::Cyan))
        .style_debug(Style::default().fg(Color::Gray));
    f.render_widget(logger, area);
}

fn draw_status_line(f: &mut Frame, area: Rect, app: &App) {
    let (text, style) = if let Some(err) = app.state.last_error.as_deref() {
        (err.to_string(), Style::default().fg(Color::Red))
    } else if let Some(status) = app.state.duel.status.as_deref() {
        (status.to_string(), Style::default().fg(Color::Green))
    } else {
        return;
    };
    f.render_widget(Paragraph::new(format!(" {text}")).style(style), area);
}

fn draw_placeholder(f: &mut Frame, area: Rect, msg: &str) {
    let block = default_border(Color::DarkGray).title(" Help ");
    let inner = block.inner(area);
    f.render_widget(block, area);
    f.render_widget(
        Paragraph::new(msg).style(Style::default().fg(Color::Gray)),
        inner,
    );
}
