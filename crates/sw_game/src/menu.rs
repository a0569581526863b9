//! Menu screens: shared entry-list navigation plus the main menu and the
//! in-game pause popup.

use glam::Vec2;

use sw_core::geom::Rect;
use sw_core::input::{InputState, Key};
use sw_render::{GlyphFont, SpriteBatch};

use crate::gameplay::GameplayScreen;
use crate::screen::{Screen, ScreenCommand, UpdateCtx};
use crate::sprites;

const TITLE_SCALE: f32 = 6.0;
const ENTRY_SCALE: f32 = 3.0;
const SELECTED_COLOR: [f32; 3] = [1.0, 0.9, 0.2];
const UNSELECTED_COLOR: [f32; 3] = [0.75, 0.75, 0.75];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuEvent {
    Activated(usize),
    Cancelled,
}

/// Entry list + selection cursor. Screens embed one and map its events to
/// stack commands.
pub struct MenuCore {
    pub title: String,
    pub entries: Vec<String>,
    pub selected: usize,
}

impl MenuCore {
    pub fn new(title: &str, entries: &[&str]) -> Self {
        Self {
            title: title.to_string(),
            entries: entries.iter().map(|e| e.to_string()).collect(),
            selected: 0,
        }
    }

    pub fn poll(&mut self, input: &InputState) -> Option<MenuEvent> {
        if input.is_just_pressed(Key::Up) || input.is_just_pressed(Key::W) {
            self.selected = (self.selected + self.entries.len() - 1) % self.entries.len();
        }
        if input.is_just_pressed(Key::Down) || input.is_just_pressed(Key::S) {
            self.selected = (self.selected + 1) % self.entries.len();
        }
        if input.is_just_pressed(Key::Enter) || input.is_just_pressed(Key::Space) {
            return Some(MenuEvent::Activated(self.selected));
        }
        if input.is_just_pressed(Key::Escape) {
            return Some(MenuEvent::Cancelled);
        }
        None
    }

    pub fn draw(&self, batch: &mut SpriteBatch, font: &GlyphFont, playfield: Rect, alpha: f32) {
        let center_x = playfield.min.x + playfield.width() / 2.0;

        let title_width = font.measure(&self.title, TITLE_SCALE);
        batch.text(
            font,
            &self.title,
            Vec2::new(center_x - title_width / 2.0, playfield.height() * 0.22),
            TITLE_SCALE,
            [1.0, 1.0, 1.0, alpha],
        );

        let mut entry_y = playfield.height() * 0.5;
        for (index, entry) in self.entries.iter().enumerate() {
            let selected = index == self.selected;
            let [r, g, b] = if selected {
                SELECTED_COLOR
            } else {
                UNSELECTED_COLOR
            };
            let label = if selected {
                format!("> {entry}")
            } else {
                entry.clone()
            };
            let width = font.measure(&label, ENTRY_SCALE);
            batch.text(
                font,
                &label,
                Vec2::new(center_x - width / 2.0, entry_y),
                ENTRY_SCALE,
                [r, g, b, alpha],
            );
            entry_y += font.line_height(ENTRY_SCALE) * 1.8;
        }
    }
}

pub struct MainMenuScreen {
    core: MenuCore,
}

impl MainMenuScreen {
    pub fn new() -> Self {
        Self {
            core: MenuCore::new("STARWARD", &["PLAY GAME", "EXIT"]),
        }
    }
}

impl Default for MainMenuScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl Screen for MainMenuScreen {
    fn transition_on_secs(&self) -> f32 {
        0.5
    }

    fn transition_off_secs(&self) -> f32 {
        0.5
    }

    fn handle_input(&mut self, ctx: &UpdateCtx, commands: &mut Vec<ScreenCommand>) {
        match self.core.poll(ctx.input) {
            Some(MenuEvent::Activated(0)) => {
                log::info!("Starting game");
                commands.push(ScreenCommand::ReplaceAll(Box::new(GameplayScreen::new(
                    ctx.playfield,
                ))));
            }
            Some(MenuEvent::Activated(_)) | Some(MenuEvent::Cancelled) => {
                commands.push(ScreenCommand::Exit);
            }
            None => {}
        }
    }

    fn update(&mut self, _ctx: &UpdateCtx, _has_focus: bool, _covered: bool) {}

    fn draw(&self, batch: &mut SpriteBatch, font: &GlyphFont, playfield: Rect, alpha: f32) {
        self.core.draw(batch, font, playfield, alpha);

        let hint = "ARROWS TO MOVE - SPACE TO FIRE";
        let hint_width = font.measure(hint, 2.0);
        batch.text(
            font,
            hint,
            Vec2::new(
                playfield.min.x + (playfield.width() - hint_width) / 2.0,
                playfield.height() * 0.85,
            ),
            2.0,
            [0.55, 0.55, 0.6, alpha],
        );
    }
}

pub struct PauseMenuScreen {
    core: MenuCore,
}

impl PauseMenuScreen {
    pub fn new() -> Self {
        Self {
            core: MenuCore::new("PAUSED", &["RESUME", "QUIT TO MENU"]),
        }
    }
}

impl Default for PauseMenuScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl Screen for PauseMenuScreen {
    fn transition_on_secs(&self) -> f32 {
        0.25
    }

    fn transition_off_secs(&self) -> f32 {
        0.25
    }

    fn is_popup(&self) -> bool {
        true
    }

    fn handle_input(&mut self, ctx: &UpdateCtx, commands: &mut Vec<ScreenCommand>) {
        match self.core.poll(ctx.input) {
            Some(MenuEvent::Activated(0)) | Some(MenuEvent::Cancelled) => {
                commands.push(ScreenCommand::Pop);
            }
            Some(MenuEvent::Activated(_)) => {
                log::info!("Quitting to menu");
                commands.push(ScreenCommand::ReplaceAll(Box::new(MainMenuScreen::new())));
            }
            None => {}
        }
    }

    fn update(&mut self, _ctx: &UpdateCtx, _has_focus: bool, _covered: bool) {}

    fn draw(&self, batch: &mut SpriteBatch, font: &GlyphFont, playfield: Rect, alpha: f32) {
        // Dim the gameplay underneath before drawing the menu itself.
        batch.quad(
            sprites::WHITE,
            playfield.min,
            Vec2::new(playfield.width(), playfield.height()),
            [0.0, 0.0, 0.0, 0.55 * alpha],
        );
        self.core.draw(batch, font, playfield, alpha);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pressed(key: Key) -> InputState {
        let mut input = InputState::new();
        input.key_down(key);
        input
    }

    #[test]
    fn selection_wraps_both_directions() {
        let mut core = MenuCore::new("TEST", &["A", "B", "C"]);
        assert_eq!(core.selected, 0);

        core.poll(&pressed(Key::Up));
        assert_eq!(core.selected, 2);

        core.poll(&pressed(Key::Down));
        assert_eq!(core.selected, 0);
        core.poll(&pressed(Key::Down));
        assert_eq!(core.selected, 1);
    }

    #[test]
    fn enter_activates_current_entry() {
        let mut core = MenuCore::new("TEST", &["A", "B"]);
        core.poll(&pressed(Key::Down));
        assert_eq!(core.poll(&pressed(Key::Enter)), Some(MenuEvent::Activated(1)));
    }

    #[test]
    fn escape_cancels() {
        let mut core = MenuCore::new("TEST", &["A"]);
        assert_eq!(core.poll(&pressed(Key::Escape)), Some(MenuEvent::Cancelled));
    }

    #[test]
    fn held_key_without_edge_does_nothing() {
        let mut core = MenuCore::new("TEST", &["A", "B"]);
        let mut input = InputState::new();
        input.key_down(Key::Down);
        input.end_frame();
        // Key still held, edge consumed: selection must not move again.
        core.poll(&input);
        assert_eq!(core.selected, 0);
    }
}
