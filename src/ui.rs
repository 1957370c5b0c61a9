//! Terminal UI rendering with ratatui

use crate::board::{Cell, BOARD_SIZE};
use crate::dock::DOCK_SIZE;
use crate::game::{Drag, Game, GameState};
use crate::menu::{Menu, MenuItem, MenuItemType, MenuScreen};
use crate::pointer::{Point, PointerMapper};
use crate::settings::Settings;
use crate::shape::Shape;
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use std::collections::HashSet;

const EMPTY: &str = " .";

/// Each board cell is two terminal columns wide and one row tall
const CELL_WIDTH: u16 = 2;
/// Board box: 8 cells plus borders
const BOARD_BOX_WIDTH: u16 = BOARD_SIZE as u16 * CELL_WIDTH + 2;
const BOARD_BOX_HEIGHT: u16 = BOARD_SIZE as u16 + 2;
const STATS_WIDTH: u16 = 22;
/// Dock boxes fit a 4x4 shape plus borders
const DOCK_HEIGHT: u16 = 6;

const GAME_WIDTH: u16 = BOARD_BOX_WIDTH + STATS_WIDTH;
const GAME_HEIGHT: u16 = BOARD_BOX_HEIGHT + DOCK_HEIGHT;

/// Where everything sits on the play screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayLayout {
    pub board: Rect,
    /// Board area inside its border; cell (0, 0) is its top-left corner
    pub board_inner: Rect,
    pub stats: Rect,
    pub dock: [Rect; DOCK_SIZE],
}

impl PlayLayout {
    /// Dock slot under a terminal position
    pub fn dock_slot_at(&self, column: u16, row: u16) -> Option<usize> {
        self.dock.iter().position(|r| {
            column >= r.x && column < r.x + r.width && row >= r.y && row < r.y + r.height
        })
    }

    /// Pointer geometry for this layout
    pub fn mapper(&self, lift_rows: u32) -> PointerMapper {
        PointerMapper::new(
            Point::new(self.board_inner.x as f32, self.board_inner.y as f32),
            CELL_WIDTH as f32,
            1.0,
            lift_rows as f32,
        )
    }
}

/// Compute the play screen layout for a terminal area
pub fn play_layout(area: Rect) -> PlayLayout {
    let game_area = center_rect(area, GAME_WIDTH, GAME_HEIGHT);

    let rows = Layout::vertical([
        Constraint::Length(BOARD_BOX_HEIGHT),
        Constraint::Length(DOCK_HEIGHT),
    ])
    .split(game_area);
    let top = Layout::horizontal([
        Constraint::Length(BOARD_BOX_WIDTH),
        Constraint::Length(STATS_WIDTH),
    ])
    .split(rows[0]);
    let dock = Layout::horizontal([Constraint::Ratio(1, DOCK_SIZE as u32); DOCK_SIZE]).split(rows[1]);

    PlayLayout {
        board: top[0],
        board_inner: Block::default().borders(Borders::ALL).inner(top[0]),
        stats: top[1],
        dock: [dock[0], dock[1], dock[2]],
    }
}

/// Center a rect within another rect
fn center_rect(area: Rect, width: u16, height: u16) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

/// Render the whole play screen
pub fn render_game(frame: &mut Frame, game: &Game, settings: &Settings) {
    let area = frame.area();
    let layout = play_layout(area);
    let (block_char, _) = settings.visual.block_chars();

    render_board(frame, &layout, game, settings);
    render_stats(frame, layout.stats, game, settings);
    render_dock(frame, &layout, game, block_char);
    render_dragged(frame, game, block_char);

    if game.state == GameState::GameOver {
        render_overlay(
            frame,
            area,
            "GAME OVER",
            &format!("Score {} - any key", game.score.points),
        );
    }
}

/// Render the board with ghost preview and lines about to clear
fn render_board(frame: &mut Frame, layout: &PlayLayout, game: &Game, settings: &Settings) {
    let (block_char, ghost_char) = settings.visual.block_chars();

    let block = Block::default()
        .title(" BLOCKDROP ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White));
    frame.render_widget(block, layout.board);

    let ghost = game.ghost().filter(|_| settings.visual.show_ghost);
    let ghost_cells: HashSet<(i32, i32)> = ghost
        .map(|g| {
            g.shape
                .matrix
                .cells()
                .iter()
                .map(|&(dr, dc)| (g.origin.row + dr as i32, g.origin.col + dc as i32))
                .collect()
        })
        .unwrap_or_default();
    let pending = game.pending_lines();

    let lines: Vec<Line> = game
        .board
        .rows()
        .enumerate()
        .map(|(r, row)| {
            let spans: Vec<Span> = row
                .iter()
                .enumerate()
                .map(|(c, cell)| {
                    let flashing = pending.is_some_and(|p| p.contains(r, c));
                    match cell {
                        Cell::Filled(_) if flashing => {
                            Span::styled(block_char, Style::default().fg(Color::White).bold())
                        }
                        Cell::Filled(tag) => Span::styled(block_char, Style::default().fg(tag.color())),
                        Cell::Empty => match ghost {
                            Some(g) if ghost_cells.contains(&(r as i32, c as i32)) => {
                                Span::styled(ghost_char, Style::default().fg(g.shape.color.color()))
                            }
                            _ => Span::styled(EMPTY, Style::default().fg(Color::DarkGray)),
                        },
                    }
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), layout.board_inner);
}

/// Render score and combo
fn render_stats(frame: &mut Frame, area: Rect, game: &Game, settings: &Settings) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let combo_style = if game.score.combo > 1 {
        Style::default().fg(Color::Magenta).bold()
    } else {
        Style::default().fg(Color::Cyan)
    };

    let mut lines = vec![
        Line::from(Span::styled("SCORE", Style::default().fg(Color::Gray))),
        Line::from(Span::styled(
            format!("{}", game.score.points),
            Style::default().fg(Color::Yellow).bold(),
        )),
        Line::raw(""),
        Line::from(vec![
            Span::styled("COMBO ", Style::default().fg(Color::Gray)),
            Span::styled(format!("x{}", game.score.combo), combo_style),
        ]),
        Line::from(vec![
            Span::styled("BEST  ", Style::default().fg(Color::Gray)),
            Span::styled(format!("x{}", game.score.best_combo), Style::default().fg(Color::Cyan)),
        ]),
        Line::from(vec![
            Span::styled("LINES ", Style::default().fg(Color::Gray)),
            Span::styled(format!("{}", game.score.lines), Style::default().fg(Color::Cyan)),
        ]),
        Line::raw(""),
    ];

    if let Some(action) = game.last_move.and_then(|m| m.describe()) {
        lines.push(Line::styled(action, Style::default().fg(Color::Green).bold()));
    } else {
        lines.push(Line::raw(""));
    }

    lines.push(Line::styled(settings.player.name.clone(), Style::default().fg(Color::DarkGray)));

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Render the three dock slots
fn render_dock(frame: &mut Frame, layout: &PlayLayout, game: &Game, block_char: &str) {
    let dragged_slot = match game.drag() {
        Drag::Dragging { slot, .. } => Some(slot),
        Drag::Idle => None,
    };

    for (i, area) in layout.dock.iter().enumerate() {
        let block = Block::default()
            .title(format!(" {} ", i + 1))
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Gray));
        let inner = block.inner(*area);
        frame.render_widget(block, *area);

        let Some(shape) = game.dock.get(i) else {
            continue;
        };
        if dragged_slot == Some(i) {
            continue;
        }

        // Shapes with nowhere to go are dimmed
        let color = if game.board.fits_anywhere(&shape.matrix) {
            shape.color.color()
        } else {
            Color::DarkGray
        };
        let paragraph = Paragraph::new(shape_lines(shape, block_char, color)).alignment(Alignment::Center);
        frame.render_widget(paragraph, inner);
    }
}

/// A shape as styled text, one line per matrix row
fn shape_lines(shape: &Shape, block_char: &str, color: Color) -> Vec<Line<'static>> {
    let block_char = block_char.to_string();
    (0..shape.matrix.rows())
        .map(|r| {
            let spans: Vec<Span> = (0..shape.matrix.cols())
                .map(|c| {
                    if shape.matrix.is_occupied(r, c) {
                        Span::styled(block_char.clone(), Style::default().fg(color))
                    } else {
                        Span::raw("  ")
                    }
                })
                .collect();
            Line::from(spans)
        })
        .collect()
}

/// Draw the dragged shape floating above the pointer
fn render_dragged(frame: &mut Frame, game: &Game, block_char: &str) {
    let Some((shape, pointer)) = game.dragged() else {
        return;
    };
    let mapper = game.mapper();
    let left = pointer.x - shape.matrix.cols() as f32 * mapper.cell_width / 2.0;
    let top = pointer.y - mapper.lift - shape.matrix.rows() as f32 * mapper.cell_height / 2.0;

    let area = frame.area();
    let style = Style::default().fg(shape.color.color()).bold();
    let buffer = frame.buffer_mut();
    for &(dr, dc) in shape.matrix.cells() {
        let x = (left + dc as f32 * mapper.cell_width).round();
        let y = (top + dr as f32 * mapper.cell_height).floor();
        if x < area.x as f32 || y < area.y as f32 {
            continue;
        }
        let (x, y) = (x as u16, y as u16);
        if x + CELL_WIDTH <= area.x + area.width && y < area.y + area.height {
            buffer.set_string(x, y, block_char, style);
        }
    }
}

/// Menu size for each screen
fn menu_size(menu: &Menu) -> (u16, u16) {
    match menu.screen {
        MenuScreen::Main => (44, 20),
        MenuScreen::Settings => (50, 20),
        MenuScreen::Leaderboard => (50, 30),
    }
}

const TITLE_HEIGHT: u16 = 4;

/// Inner rect where menu items are drawn
fn menu_items_area(area: Rect, menu: &Menu) -> Rect {
    let (width, height) = menu_size(menu);
    let menu_area = center_rect(area, width, height);
    let layout = Layout::vertical([Constraint::Length(TITLE_HEIGHT), Constraint::Min(8)]).split(menu_area);
    Block::default().borders(Borders::ALL).inner(layout[1])
}

/// Menu item under a terminal position.
/// Items start one row below the top of the list and take two rows each.
pub fn menu_item_at(area: Rect, menu: &Menu, column: u16, row: u16) -> Option<usize> {
    let inner = menu_items_area(area, menu);
    if column < inner.x || column >= inner.x + inner.width || row <= inner.y {
        return None;
    }
    let relative = row - inner.y - 1;
    if relative % 2 == 1 {
        return None;
    }
    let index = (relative / 2) as usize;
    (index < menu.items.len()).then_some(index)
}

/// Render the menu
pub fn render_menu(frame: &mut Frame, menu: &Menu) {
    let area = frame.area();
    let (width, height) = menu_size(menu);
    let menu_area = center_rect(area, width, height);

    let layout = Layout::vertical([Constraint::Length(TITLE_HEIGHT), Constraint::Min(8)]).split(menu_area);

    let title = match menu.screen {
        MenuScreen::Main => "B L O C K D R O P",
        MenuScreen::Settings => "SETTINGS",
        MenuScreen::Leaderboard => "LEADERBOARD",
    };
    let swatch: Vec<Span> = crate::shape::ColorTag::ALL
        .iter()
        .map(|tag| Span::styled("██", Style::default().fg(tag.color())))
        .collect();
    let title_lines = vec![
        Line::raw(""),
        Line::styled(title, Style::default().fg(Color::Cyan).bold()),
        Line::from(swatch),
    ];
    frame.render_widget(Paragraph::new(title_lines).alignment(Alignment::Center), layout[0]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));
    let inner = block.inner(layout[1]);
    frame.render_widget(block, layout[1]);

    let mut lines = vec![Line::raw("")];
    for (i, item) in menu.items.iter().enumerate() {
        lines.push(render_menu_item(item, i == menu.selected));
        lines.push(Line::raw(""));
    }

    let hint = match menu.items.get(menu.selected).map(|item| &item.item_type) {
        Some(MenuItemType::Toggle { .. } | MenuItemType::Cycle { .. } | MenuItemType::Number { .. }) => {
            "↑↓ Select  ←→ Adjust  Esc Back"
        }
        _ => "↑↓ Select  Enter Confirm  Esc Back",
    };
    lines.push(Line::styled(hint, Style::default().fg(Color::DarkGray)));

    if let Some(notice) = &menu.notice {
        lines.push(Line::raw(""));
        lines.push(Line::styled(notice.clone(), Style::default().fg(Color::Yellow).bold()));
    }

    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
}

/// Render a single menu item based on its type
fn render_menu_item(item: &MenuItem, is_selected: bool) -> Line<'static> {
    let prefix = if is_selected { "▶ " } else { "  " };

    let base_style = if is_selected {
        Style::default().fg(Color::Yellow).bold()
    } else {
        Style::default().fg(Color::White)
    };

    match &item.item_type {
        MenuItemType::Button(_) => Line::styled(format!("{}{}", prefix, item.label), base_style),
        MenuItemType::Toggle { value, .. } => {
            let value_str = if *value { "ON" } else { "OFF" };
            let value_color = if *value { Color::Green } else { Color::Red };
            Line::from(vec![
                Span::styled(format!("{}{}: ", prefix, item.label), base_style),
                Span::styled(format!("< {} >", value_str), Style::default().fg(value_color).bold()),
            ])
        }
        MenuItemType::Cycle { options, current, .. } => Line::from(vec![
            Span::styled(format!("{}{}: ", prefix, item.label), base_style),
            Span::styled(format!("< {} >", options[*current]), Style::default().fg(Color::Cyan)),
        ]),
        MenuItemType::Number { value, .. } => Line::from(vec![
            Span::styled(format!("{}{}: ", prefix, item.label), base_style),
            Span::styled(format!("< {} >", value), Style::default().fg(Color::Cyan)),
        ]),
        MenuItemType::Label { text } if text.is_empty() => {
            Line::styled(format!("  {}", item.label), Style::default().fg(Color::Gray))
        }
        MenuItemType::Label { text } => Line::from(vec![
            Span::styled(format!("  {}: ", item.label), Style::default().fg(Color::Gray)),
            Span::styled(text.clone(), Style::default().fg(Color::Cyan)),
        ]),
    }
}

/// Render a centered popup
fn render_overlay(frame: &mut Frame, area: Rect, title: &str, subtitle: &str) {
    let popup_area = center_rect(area, 28, 5);

    // Clear the background
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .style(Style::default().bg(Color::Black));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let text = vec![
        Line::styled(title.to_string(), Style::default().fg(Color::Yellow).bold()),
        Line::raw(""),
        Line::styled(subtitle.to_string(), Style::default().fg(Color::Gray)),
    ];

    frame.render_widget(Paragraph::new(text).alignment(Alignment::Center), inner);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;

    #[test]
    fn test_layout_fits_and_slots_do_not_overlap() {
        let layout = play_layout(Rect::new(0, 0, 80, 30));
        assert_eq!(layout.board_inner.width, BOARD_SIZE as u16 * CELL_WIDTH);
        assert_eq!(layout.board_inner.height, BOARD_SIZE as u16);
        for (i, slot) in layout.dock.iter().enumerate() {
            assert_eq!(layout.dock_slot_at(slot.x, slot.y), Some(i));
            assert_eq!(layout.dock_slot_at(slot.x + slot.width - 1, slot.y + slot.height - 1), Some(i));
        }
        assert_eq!(layout.dock_slot_at(layout.board_inner.x, layout.board_inner.y), None);
    }

    #[test]
    fn test_mapper_puts_cell_centers_on_cells() {
        let layout = play_layout(Rect::new(0, 0, 80, 30));
        let mapper = layout.mapper(0);
        let dot = crate::shape::ShapeKind::Dot.matrix();
        // Mouse over the left half of board cell (2, 5)
        let pointer = Point::new(
            layout.board_inner.x as f32 + 10.5,
            layout.board_inner.y as f32 + 2.5,
        );
        let pos = mapper.candidate_origin(pointer, &dot);
        assert_eq!((pos.row, pos.col), (2, 5));
    }

    #[test]
    fn test_menu_item_hit_testing() {
        let settings = Settings::default();
        let menu = Menu::main_menu(&settings);
        let area = Rect::new(0, 0, 80, 40);
        let inner = menu_items_area(area, &menu);
        assert_eq!(menu_item_at(area, &menu, inner.x + 2, inner.y + 1), Some(0));
        assert_eq!(menu_item_at(area, &menu, inner.x + 2, inner.y + 2), None);
        assert_eq!(menu_item_at(area, &menu, inner.x + 2, inner.y + 3), Some(1));
        assert_eq!(menu_item_at(area, &menu, 0, 0), None);
    }
}
