//! Main menu, settings screen and leaderboard view

use crate::account::LeaderboardEntry;
use crate::settings::Settings;

/// Menu screens
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuScreen {
    Main,
    Settings,
    Leaderboard,
}

/// Menu state
#[derive(Debug, Clone)]
pub struct Menu {
    pub screen: MenuScreen,
    pub selected: usize,
    pub items: Vec<MenuItem>,
    /// One-off message such as "no credits left"
    pub notice: Option<String>,
}

#[derive(Debug, Clone)]
pub struct MenuItem {
    pub label: String,
    pub item_type: MenuItemType,
}

#[derive(Debug, Clone)]
pub enum MenuItemType {
    /// Simple button that triggers an action
    Button(MenuAction),
    /// Toggle boolean setting
    Toggle { key: SettingKey, value: bool },
    /// Cycle through options
    Cycle { key: SettingKey, options: Vec<String>, current: usize },
    /// Numeric value with increment/decrement
    Number { key: SettingKey, value: u64, min: u64, max: u64, step: u64 },
    /// Display-only label
    Label { text: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuAction {
    StartGame,
    GoToScreen(MenuScreen),
    Back,
    Quit,
}

/// Setting keys for identifying which setting to modify
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingKey {
    ShowGhost,
    BlockStyle,
    ClearDelayMs,
    DragLift,
    SfxVolume,
}

fn button(label: &str, action: MenuAction) -> MenuItem {
    MenuItem {
        label: label.to_string(),
        item_type: MenuItemType::Button(action),
    }
}

fn label(label: &str, text: String) -> MenuItem {
    MenuItem {
        label: label.to_string(),
        item_type: MenuItemType::Label { text },
    }
}

impl Menu {
    pub fn new(settings: &Settings) -> Self {
        Self::main_menu(settings)
    }

    fn with_items(screen: MenuScreen, items: Vec<MenuItem>) -> Self {
        Self {
            screen,
            selected: 0,
            items,
            notice: None,
        }
    }

    pub fn main_menu(settings: &Settings) -> Self {
        Self::with_items(
            MenuScreen::Main,
            vec![
                button("Play", MenuAction::StartGame),
                label(
                    "Credits today",
                    format!("{} / {}", settings.credits.remaining, settings.credits.daily_allowance),
                ),
                button("Leaderboard", MenuAction::GoToScreen(MenuScreen::Leaderboard)),
                button("Settings", MenuAction::GoToScreen(MenuScreen::Settings)),
                button("Quit", MenuAction::Quit),
            ],
        )
    }

    pub fn settings_menu(settings: &Settings) -> Self {
        let styles = vec!["solid".to_string(), "bracket".to_string(), "round".to_string()];
        let current_style = styles
            .iter()
            .position(|s| s == &settings.visual.block_style)
            .unwrap_or(0);

        Self::with_items(
            MenuScreen::Settings,
            vec![
                MenuItem {
                    label: "Ghost Preview".to_string(),
                    item_type: MenuItemType::Toggle {
                        key: SettingKey::ShowGhost,
                        value: settings.visual.show_ghost,
                    },
                },
                MenuItem {
                    label: "Block Style".to_string(),
                    item_type: MenuItemType::Cycle {
                        key: SettingKey::BlockStyle,
                        options: styles,
                        current: current_style,
                    },
                },
                MenuItem {
                    label: "Clear Delay (ms)".to_string(),
                    item_type: MenuItemType::Number {
                        key: SettingKey::ClearDelayMs,
                        value: settings.gameplay.clear_delay_ms,
                        min: 0,
                        max: 1000,
                        step: 50,
                    },
                },
                MenuItem {
                    label: "Drag Lift (rows)".to_string(),
                    item_type: MenuItemType::Number {
                        key: SettingKey::DragLift,
                        value: settings.gameplay.drag_lift as u64,
                        min: 0,
                        max: 4,
                        step: 1,
                    },
                },
                MenuItem {
                    label: "SFX Volume".to_string(),
                    item_type: MenuItemType::Number {
                        key: SettingKey::SfxVolume,
                        value: settings.audio.sfx_volume as u64,
                        min: 0,
                        max: 100,
                        step: 5,
                    },
                },
                button("Back", MenuAction::Back),
            ],
        )
    }

    pub fn leaderboard(entries: &[LeaderboardEntry]) -> Self {
        let mut items: Vec<MenuItem> = entries
            .iter()
            .enumerate()
            .map(|(i, e)| label(&format!("{:>2}. {}", i + 1, e.player), format!("{} ({})", e.score, e.date)))
            .collect();
        if items.is_empty() {
            items.push(label("No scores yet", String::new()));
        }
        items.push(button("Back", MenuAction::Back));

        let mut menu = Self::with_items(MenuScreen::Leaderboard, items);
        menu.selected = menu.items.len() - 1;
        menu
    }

    fn is_selectable(&self, index: usize) -> bool {
        self.items
            .get(index)
            .is_some_and(|item| !matches!(item.item_type, MenuItemType::Label { .. }))
    }

    pub fn move_up(&mut self) {
        let len = self.items.len();
        for _ in 0..len {
            self.selected = if self.selected > 0 { self.selected - 1 } else { len - 1 };
            if self.is_selectable(self.selected) {
                break;
            }
        }
    }

    pub fn move_down(&mut self) {
        let len = self.items.len();
        for _ in 0..len {
            self.selected = (self.selected + 1) % len;
            if self.is_selectable(self.selected) {
                break;
            }
        }
    }

    /// Handle left/right for cycling options and numbers
    pub fn adjust_left(&mut self, settings: &mut Settings) {
        self.adjust(settings, false);
    }

    pub fn adjust_right(&mut self, settings: &mut Settings) {
        self.adjust(settings, true);
    }

    fn adjust(&mut self, settings: &mut Settings, forward: bool) {
        let Some(item) = self.items.get_mut(self.selected) else {
            return;
        };
        match &mut item.item_type {
            MenuItemType::Toggle { key, value } => {
                *value = !*value;
                apply_setting(settings, key, &SettingValue::Bool(*value));
            }
            MenuItemType::Cycle { key, options, current } => {
                *current = match (forward, *current) {
                    (true, c) => (c + 1) % options.len(),
                    (false, 0) => options.len() - 1,
                    (false, c) => c - 1,
                };
                apply_setting(settings, key, &SettingValue::String(options[*current].clone()));
            }
            MenuItemType::Number { key, value, min, max, step } => {
                *value = if forward {
                    (*value + *step).min(*max)
                } else {
                    value.saturating_sub(*step).max(*min)
                };
                apply_setting(settings, key, &SettingValue::Number(*value));
            }
            _ => {}
        }
    }

    /// Get the action for the current selection (for Button types)
    pub fn select(&self) -> Option<&MenuAction> {
        match &self.items.get(self.selected)?.item_type {
            MenuItemType::Button(action) => Some(action),
            _ => None,
        }
    }

    pub fn go_to(&mut self, screen: MenuScreen, settings: &Settings, leaderboard: &[LeaderboardEntry]) {
        *self = match screen {
            MenuScreen::Main => Self::main_menu(settings),
            MenuScreen::Settings => Self::settings_menu(settings),
            MenuScreen::Leaderboard => Self::leaderboard(leaderboard),
        };
    }

    /// Go back to previous screen
    pub fn go_back(&mut self, settings: &Settings) {
        *self = Self::main_menu(settings);
    }
}

/// Helper enum for setting values
enum SettingValue {
    Bool(bool),
    String(String),
    Number(u64),
}

/// Apply a setting change to the Settings struct
fn apply_setting(settings: &mut Settings, key: &SettingKey, value: &SettingValue) {
    match (key, value) {
        (SettingKey::ShowGhost, SettingValue::Bool(v)) => {
            settings.visual.show_ghost = *v;
        }
        (SettingKey::BlockStyle, SettingValue::String(v)) => {
            settings.visual.block_style = v.clone();
        }
        (SettingKey::ClearDelayMs, SettingValue::Number(v)) => {
            settings.gameplay.clear_delay_ms = *v;
        }
        (SettingKey::DragLift, SettingValue::Number(v)) => {
            settings.gameplay.drag_lift = *v as u32;
        }
        (SettingKey::SfxVolume, SettingValue::Number(v)) => {
            settings.audio.sfx_volume = *v as u32;
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigation_skips_labels() {
        let settings = Settings::default();
        let mut menu = Menu::main_menu(&settings);
        assert_eq!(menu.select(), Some(&MenuAction::StartGame));
        menu.move_down();
        assert_eq!(menu.select(), Some(&MenuAction::GoToScreen(MenuScreen::Leaderboard)));
        menu.move_up();
        assert_eq!(menu.selected, 0);
        menu.move_up();
        assert_eq!(menu.select(), Some(&MenuAction::Quit));
    }

    #[test]
    fn test_adjust_updates_settings() {
        let mut settings = Settings::default();
        let mut menu = Menu::settings_menu(&settings);

        menu.adjust_right(&mut settings);
        assert!(!settings.visual.show_ghost);

        menu.move_down();
        menu.adjust_left(&mut settings);
        assert_eq!(settings.visual.block_style, "round");

        menu.move_down();
        for _ in 0..30 {
            menu.adjust_right(&mut settings);
        }
        assert_eq!(settings.gameplay.clear_delay_ms, 1000);
    }

    #[test]
    fn test_leaderboard_lists_entries() {
        let entries = vec![LeaderboardEntry {
            player: "ada".to_string(),
            score: 120,
            date: "2026-10-19".to_string(),
        }];
        let menu = Menu::leaderboard(&entries);
        assert_eq!(menu.items.len(), 2);
        assert_eq!(menu.select(), Some(&MenuAction::Back));

        let empty = Menu::leaderboard(&[]);
        assert_eq!(empty.items[0].label, "No scores yet");
    }
}
