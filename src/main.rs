//! BLOCKDROP - drag shapes onto an 8x8 board, fill lines, chain combos.

mod account;
mod audio;
mod board;
mod dock;
mod game;
mod input;
mod menu;
mod pointer;
mod score;
mod settings;
mod shape;
mod ui;

use account::LocalLeaderboard;
use audio::{AudioManager, Sfx};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind, MouseButton,
        MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use game::{Drag, DropOutcome, Game, GameState};
use input::PlayInput;
use menu::{Menu, MenuAction, MenuItemType, MenuScreen};
use ratatui::{Terminal, backend::CrosstermBackend, layout::Rect};
use settings::Settings;
use std::{
    io::{self, stdout},
    path::PathBuf,
    time::{Duration, Instant},
};

/// Target frame rate
const TARGET_FPS: u64 = 60;
const FRAME_DURATION: Duration = Duration::from_micros(1_000_000 / TARGET_FPS);

/// Input delay after game over to prevent accidental menu return
const GAME_OVER_INPUT_DELAY: Duration = Duration::from_secs(2);

/// Environment variable that fixes the shape sequence
const SEED_VAR: &str = "BLOCKDROP_SEED";

/// Application state
enum AppState {
    Menu(Menu),
    Playing(Game),
}

/// What the play screen wants after handling an input
enum PlayFlow {
    Continue,
    /// Back to the menu, with an optional notice to show there
    Leave(Option<String>),
}

/// Get the blockdrop temp directory, creating it if needed
fn blockdrop_temp_dir() -> PathBuf {
    let dir = std::env::temp_dir().join("blockdrop");
    let _ = std::fs::create_dir_all(&dir);
    dir
}

fn main() -> io::Result<()> {
    // Generate session ID for this instance
    let session_id: u32 = rand::random();

    let temp_dir = blockdrop_temp_dir();
    let log_file = format!("{:08x}.log", session_id);

    // Setup tracing to log file
    let file_appender = tracing_appender::rolling::never(&temp_dir, &log_file);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let filter = tracing_subscriber::EnvFilter::from_default_env();
    let filter = match "blockdrop=debug".parse() {
        Ok(directive) => filter.add_directive(directive),
        Err(_) => filter,
    };
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(filter)
        .with_ansi(false)
        .init();

    tracing::info!(
        "BLOCKDROP starting up, session={:08x}, log={}",
        session_id,
        temp_dir.join(&log_file).display()
    );

    let mut settings = Settings::load();
    settings.credits.refresh(account::today());

    let mut leaderboard = LocalLeaderboard::open_default();
    match &leaderboard {
        Some(board) => tracing::info!("Leaderboard at {}", board.path().display()),
        None => tracing::warn!("No data directory, scores will not be saved"),
    }

    // Initialize audio (optional - game works without audio)
    let mut audio = AudioManager::new();
    if let Some(ref mut a) = audio {
        a.set_sfx_volume(settings.audio.sfx_volume as f32 / 100.0);
    }

    // Setup terminal
    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &mut settings, &mut audio, &mut leaderboard);

    // Restore terminal
    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen, DisableMouseCapture)?;

    // Save settings (including today's remaining credits)
    if let Err(e) = settings.save() {
        eprintln!("Warning: Could not save settings: {}", e);
    }

    match &result {
        Ok(Some(game)) => {
            println!("\nThanks for playing BLOCKDROP!");
            println!("Final Score: {}", game.score.points);
            println!("Lines: {} | Best Combo: x{}", game.score.lines, game.score.best_combo);
        }
        Ok(None) => {
            println!("\nThanks for playing BLOCKDROP!");
        }
        Err(_) => {}
    }

    result.map(|_| ())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    settings: &mut Settings,
    audio: &mut Option<AudioManager>,
    leaderboard: &mut Option<LocalLeaderboard>,
) -> io::Result<Option<Game>> {
    let mut state = AppState::Menu(Menu::new(settings));
    let mut last_game: Option<Game> = None;
    let mut game_over_time: Option<Instant> = None;

    loop {
        terminal.draw(|frame| match &state {
            AppState::Menu(menu) => ui::render_menu(frame, menu),
            AppState::Playing(game) => ui::render_game(frame, game, settings),
        })?;

        let size = terminal.size()?;
        let area = Rect::new(0, 0, size.width, size.height);

        if event::poll(FRAME_DURATION)? {
            let event = event::read()?;
            let mut next: Option<AppState> = None;

            match &mut state {
                AppState::Menu(menu) => {
                    let action = match event {
                        Event::Key(key) if key.kind == KeyEventKind::Press => {
                            handle_menu_key(menu, key, settings, audio)
                        }
                        Event::Mouse(mouse) => handle_menu_mouse(menu, mouse, area, settings, audio),
                        _ => None,
                    };
                    if let Some(action) = action {
                        match action {
                            MenuAction::StartGame => {
                                if let Some(game) = start_game(menu, settings, area) {
                                    play_sfx(audio, Sfx::SelectConfirm);
                                    game_over_time = None;
                                    next = Some(AppState::Playing(game));
                                } else {
                                    play_sfx(audio, Sfx::Reject);
                                }
                            }
                            MenuAction::GoToScreen(screen) => {
                                play_sfx(audio, Sfx::SelectConfirm);
                                let entries = match screen {
                                    MenuScreen::Leaderboard => {
                                        leaderboard.as_ref().map(|b| b.entries()).unwrap_or_default()
                                    }
                                    _ => Vec::new(),
                                };
                                menu.go_to(screen, settings, &entries);
                            }
                            MenuAction::Back => {
                                play_sfx(audio, Sfx::SelectBack);
                                leave_screen(menu, settings);
                            }
                            MenuAction::Quit => {
                                return Ok(last_game);
                            }
                        }
                    }
                }
                AppState::Playing(game) => {
                    let input = match event {
                        Event::Key(key) if key.kind == KeyEventKind::Press => Some(input::translate_key(key)),
                        Event::Mouse(mouse) => input::translate_mouse(mouse, &ui::play_layout(area)),
                        _ => None,
                    };
                    let flow = match input {
                        Some(input) => handle_play_input(game, input, game_over_time, leaderboard, settings),
                        None => PlayFlow::Continue,
                    };
                    if let PlayFlow::Leave(notice) = flow {
                        let mut menu = Menu::new(settings);
                        menu.notice = notice;
                        next = Some(AppState::Menu(menu));
                    }
                }
            }

            if let Some(next) = next {
                if let AppState::Playing(game) = std::mem::replace(&mut state, next) {
                    last_game = Some(game);
                }
            }
        }

        // Update game state
        if let AppState::Playing(game) = &mut state {
            let layout = ui::play_layout(area);
            game.set_mapper(layout.mapper(settings.gameplay.drag_lift));
            game.update(Instant::now());

            if let Some(a) = audio {
                a.play_events(&game.take_sounds());
            } else {
                game.take_sounds();
            }

            if game.state == GameState::GameOver && game_over_time.is_none() {
                game_over_time = Some(Instant::now());
            }
        }
    }
}

fn play_sfx(audio: &mut Option<AudioManager>, sfx: Sfx) {
    if let Some(a) = audio {
        a.play_sfx(sfx);
    }
}

/// Spend a credit and start a session sized to the current terminal
fn start_game(menu: &mut Menu, settings: &mut Settings, area: Rect) -> Option<Game> {
    settings.credits.refresh(account::today());

    let layout = ui::play_layout(area);
    let mapper = layout.mapper(settings.gameplay.drag_lift);
    let mut game = match seed_from_env() {
        Some(seed) => {
            tracing::info!(seed, "Using fixed shape seed");
            Game::with_seed(mapper, settings.gameplay.clear_delay(), seed)
        }
        None => Game::new(mapper, settings.gameplay.clear_delay()),
    };

    match game.start(&mut settings.credits) {
        Ok(()) => {
            if let Err(e) = settings.save() {
                tracing::warn!("Could not save settings after spending a credit: {}", e);
            }
            Some(game)
        }
        Err(e) => {
            *menu = Menu::main_menu(settings);
            menu.notice = Some(e.to_string());
            None
        }
    }
}

/// Fixed shape sequence for reproducing a session
fn seed_from_env() -> Option<u64> {
    std::env::var(SEED_VAR).ok()?.parse().ok()
}

/// Go back one screen, saving settings when leaving the settings screen
fn leave_screen(menu: &mut Menu, settings: &Settings) {
    if menu.screen == MenuScreen::Settings {
        if let Err(e) = settings.save() {
            tracing::warn!("Could not save settings: {}", e);
        }
    }
    menu.go_back(settings);
}

fn handle_menu_key(
    menu: &mut Menu,
    key: KeyEvent,
    settings: &mut Settings,
    audio: &mut Option<AudioManager>,
) -> Option<MenuAction> {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => {
            menu.move_up();
            play_sfx(audio, Sfx::SelectMove);
            None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            menu.move_down();
            play_sfx(audio, Sfx::SelectMove);
            None
        }
        KeyCode::Left | KeyCode::Char('h') => {
            menu.adjust_left(settings);
            apply_audio_settings(audio, settings);
            None
        }
        KeyCode::Right | KeyCode::Char('l') => {
            menu.adjust_right(settings);
            apply_audio_settings(audio, settings);
            None
        }
        KeyCode::Enter | KeyCode::Char(' ') => menu.select().cloned(),
        KeyCode::Esc | KeyCode::Char('q') => match menu.screen {
            MenuScreen::Main => Some(MenuAction::Quit),
            _ => Some(MenuAction::Back),
        },
        _ => None,
    }
}

fn apply_audio_settings(audio: &mut Option<AudioManager>, settings: &Settings) {
    if let Some(a) = audio {
        a.set_sfx_volume(settings.audio.sfx_volume as f32 / 100.0);
    }
}

fn handle_menu_mouse(
    menu: &mut Menu,
    mouse: MouseEvent,
    area: Rect,
    settings: &mut Settings,
    audio: &mut Option<AudioManager>,
) -> Option<MenuAction> {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            let index = ui::menu_item_at(area, menu, mouse.column, mouse.row)?;
            menu.selected = index;
            match &menu.items[index].item_type {
                MenuItemType::Button(action) => Some(action.clone()),
                MenuItemType::Toggle { .. } | MenuItemType::Cycle { .. } | MenuItemType::Number { .. } => {
                    menu.adjust_right(settings);
                    apply_audio_settings(audio, settings);
                    None
                }
                MenuItemType::Label { .. } => None,
            }
        }
        MouseEventKind::Moved => {
            // Highlight on hover
            if let Some(index) = ui::menu_item_at(area, menu, mouse.column, mouse.row) {
                if !matches!(menu.items[index].item_type, MenuItemType::Label { .. }) {
                    menu.selected = index;
                }
            }
            None
        }
        MouseEventKind::ScrollUp => {
            menu.move_up();
            None
        }
        MouseEventKind::ScrollDown => {
            menu.move_down();
            None
        }
        _ => None,
    }
}

fn handle_play_input(
    game: &mut Game,
    input: PlayInput,
    game_over_time: Option<Instant>,
    leaderboard: &mut Option<LocalLeaderboard>,
    settings: &Settings,
) -> PlayFlow {
    if game.state == GameState::GameOver {
        let ready = game_over_time.is_some_and(|t| t.elapsed() >= GAME_OVER_INPUT_DELAY);
        if !ready || matches!(input, PlayInput::Move(_)) {
            return PlayFlow::Continue;
        }
        let notice = match game.finish(leaderboard, &settings.player.name) {
            Some(Ok(score)) => format!("Final score {} saved", score),
            Some(Err(e)) => format!("Score not saved: {}", e),
            None => return PlayFlow::Leave(None),
        };
        return PlayFlow::Leave(Some(notice));
    }

    match input {
        PlayInput::Grab { slot, pointer } => {
            game.grab(slot, pointer);
        }
        PlayInput::Move(pointer) => game.drag_to(pointer),
        PlayInput::Release(pointer) => {
            if let DropOutcome::Placed { origin, cells, lines } = game.release(pointer, Instant::now()) {
                tracing::trace!(row = origin.row, col = origin.col, cells, lines, "Drop landed");
            }
        }
        PlayInput::Cancel => game.cancel_drag(),
        PlayInput::Back => {
            if matches!(game.drag(), Drag::Dragging { .. }) {
                game.cancel_drag();
            } else {
                game.abandon();
                return PlayFlow::Leave(None);
            }
        }
        PlayInput::Other => {}
    }
    PlayFlow::Continue
}
