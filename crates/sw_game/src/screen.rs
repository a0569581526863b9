//! Screen stack: menus, gameplay, and popups as a stack of screens with
//! timed on/off transitions.
//!
//! Focus rules, top of the stack downward:
//!  - the topmost screen that is not on its way out receives input and focus
//!  - every screen still updates each step, told whether it has focus and
//!    whether a non-popup screen above it covers it
//!  - for drawing, a fully transitioned non-popup hides everything beneath
//!    it; popups (the pause menu) leave the screens below visible
//!
//! Screens never mutate the stack directly. They emit `ScreenCommand`s from
//! `handle_input`, and the stack applies them at the start of the next
//! update, so the entry list is stable while screens run. A popped screen
//! stays on the stack until its off transition finishes, which is what makes
//! menus fade instead of vanish.

use sw_core::geom::Rect;
use sw_core::input::InputState;
use sw_render::{GlyphFont, SpriteBatch};

use crate::audio::AudioBank;

pub struct UpdateCtx<'a> {
    pub dt: f32,
    pub input: &'a InputState,
    pub audio: &'a AudioBank,
    pub playfield: Rect,
}

pub enum ScreenCommand {
    Push(Box<dyn Screen>),
    Pop,
    ReplaceAll(Box<dyn Screen>),
    Exit,
}

/// Live gameplay numbers surfaced to the debug overlay.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimStats {
    pub enemy_count: u32,
    pub wave_size: u32,
    pub laser_count: u32,
    pub score: u32,
}

pub trait Screen {
    fn transition_on_secs(&self) -> f32 {
        0.0
    }

    fn transition_off_secs(&self) -> f32 {
        0.0
    }

    fn is_popup(&self) -> bool {
        false
    }

    /// Called only for the focused screen, before `update`.
    fn handle_input(&mut self, ctx: &UpdateCtx, commands: &mut Vec<ScreenCommand>);

    fn update(&mut self, ctx: &UpdateCtx, has_focus: bool, covered: bool);

    /// `alpha` is the transition position, 0 (invisible) to 1 (fully on).
    fn draw(&self, batch: &mut SpriteBatch, font: &GlyphFont, playfield: Rect, alpha: f32);

    fn sim_stats(&self) -> Option<SimStats> {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    TransitionOn,
    Active,
    TransitionOff,
}

struct ScreenEntry {
    screen: Box<dyn Screen>,
    phase: Phase,
    position: f32,
}

impl ScreenEntry {
    fn new(screen: Box<dyn Screen>) -> Self {
        Self {
            screen,
            phase: Phase::TransitionOn,
            position: 0.0,
        }
    }

    fn exiting(&self) -> bool {
        self.phase == Phase::TransitionOff
    }

    fn tick(&mut self, dt: f32) {
        match self.phase {
            Phase::TransitionOn => {
                let secs = self.screen.transition_on_secs();
                self.position = if secs <= 0.0 {
                    1.0
                } else {
                    (self.position + dt / secs).min(1.0)
                };
                if self.position >= 1.0 {
                    self.phase = Phase::Active;
                }
            }
            Phase::Active => {}
            Phase::TransitionOff => {
                let secs = self.screen.transition_off_secs();
                self.position = if secs <= 0.0 {
                    0.0
                } else {
                    (self.position - dt / secs).max(0.0)
                };
            }
        }
    }
}

#[derive(Default)]
pub struct ScreenStack {
    entries: Vec<ScreenEntry>,
    pending: Vec<ScreenCommand>,
    exit_requested: bool,
}

impl ScreenStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, screen: Box<dyn Screen>) {
        self.entries.push(ScreenEntry::new(screen));
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    pub fn update(&mut self, ctx: &UpdateCtx) {
        self.apply_pending();

        let focus_index = self.entries.iter().rposition(|e| !e.exiting());

        let mut commands = Vec::new();
        if let Some(index) = focus_index {
            self.entries[index].screen.handle_input(ctx, &mut commands);
        }

        let mut covered = false;
        for index in (0..self.entries.len()).rev() {
            let has_focus = focus_index == Some(index);
            self.entries[index].screen.update(ctx, has_focus, covered);
            if !self.entries[index].screen.is_popup() && !self.entries[index].exiting() {
                covered = true;
            }
        }

        for entry in &mut self.entries {
            entry.tick(ctx.dt);
        }
        self.entries
            .retain(|entry| !(entry.exiting() && entry.position <= 0.0));

        self.pending.extend(commands);
    }

    fn apply_pending(&mut self) {
        for command in self.pending.drain(..) {
            match command {
                ScreenCommand::Push(screen) => {
                    self.entries.push(ScreenEntry::new(screen));
                }
                ScreenCommand::Pop => {
                    if let Some(index) = self.entries.iter().rposition(|e| !e.exiting()) {
                        self.entries[index].phase = Phase::TransitionOff;
                    }
                }
                ScreenCommand::ReplaceAll(screen) => {
                    for entry in &mut self.entries {
                        entry.phase = Phase::TransitionOff;
                    }
                    self.entries.push(ScreenEntry::new(screen));
                }
                ScreenCommand::Exit => {
                    self.exit_requested = true;
                }
            }
        }
    }

    pub fn draw(&self, batch: &mut SpriteBatch, font: &GlyphFont, playfield: Rect) {
        let first_visible = self
            .entries
            .iter()
            .rposition(|e| !e.screen.is_popup() && e.phase == Phase::Active)
            .unwrap_or(0);

        for entry in &self.entries[first_visible..] {
            entry.screen.draw(batch, font, playfield, entry.position);
        }
    }

    /// Stats from the topmost screen that has any (the gameplay screen,
    /// whether or not a popup sits above it).
    pub fn sim_stats(&self) -> Option<SimStats> {
        self.entries
            .iter()
            .rev()
            .find_map(|entry| entry.screen.sim_stats())
    }
}
