// ============================================================================
// ANIMATION ENGINE
// ============================================================================

// Per-appliance Stopped/Running state machine driving the drawing routines.

use std::collections::BTreeMap;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::animation::{AnimationState, Frame};
use crate::appliance::{AnimationFamily, Appliance, Registry};
use crate::canvas::Surface;
use crate::color::Color;
use crate::scheduler::{Scheduler, TimerHandle};
use rusttype::Font;

struct Slot {
    state: AnimationState,
    surface: Surface,
    /// Button colour override set by the pulse fallback while running.
    indicator: Option<Color>,
}

pub struct AnimationEngine {
    slots: BTreeMap<Appliance, Slot>,
    scheduler: Scheduler,
    rng: StdRng,
    on_color: Color,
    font: Option<Font<'static>>,
}

impl AnimationEngine {
    /// Builds one slot per appliance. `overrides` remaps the animation family
    /// of individual appliances.
    pub fn new(
        background: Color,
        on_color: Color,
        overrides: &BTreeMap<Appliance, AnimationFamily>,
    ) -> Self {
        Self::with_rng(
            background,
            on_color,
            overrides,
            StdRng::from_rng(&mut rand::rng()),
        )
    }

    pub fn with_rng(
        background: Color,
        on_color: Color,
        overrides: &BTreeMap<Appliance, AnimationFamily>,
        rng: StdRng,
    ) -> Self {
        let slots = Appliance::all()
            .map(|appliance| {
                let family = overrides
                    .get(&appliance)
                    .copied()
                    .unwrap_or_else(|| appliance.family());
                let (width, height) = appliance.surface_size();
                let slot = Slot {
                    state: AnimationState::new(family),
                    surface: Surface::new(width, height, background),
                    indicator: None,
                };
                (appliance, slot)
            })
            .collect();

        Self {
            slots,
            scheduler: Scheduler::new(),
            rng,
            on_color,
            font: None,
        }
    }

    /// Font used for text inside drawing surfaces (the TV news caption).
    pub fn set_font(&mut self, font: Option<Font<'static>>) {
        self.font = font;
    }

    /// Stopped -> Running. Stops any running timer first, draws one frame
    /// immediately and schedules the next one.
    pub fn start(&mut self, appliance: Appliance, now: Instant) -> TimerHandle {
        self.stop(appliance);
        let slot = self.slot_mut(appliance);
        slot.state.restart();
        let family = slot.state.family();
        tracing::debug!(%appliance, %family, "starting animation");
        self.draw_frame(appliance);
        self.scheduler.schedule(appliance, now + family.interval())
    }

    /// Running -> Stopped. Cancels the pending tick, blanks the surface and
    /// drops any indicator override. Safe on a stopped appliance.
    pub fn stop(&mut self, appliance: Appliance) {
        if let Some(handle) = self.scheduler.cancel(appliance) {
            tracing::debug!(%appliance, ?handle, "cancelled animation timer");
        }
        let slot = self.slot_mut(appliance);
        slot.surface.clear();
        slot.indicator = None;
    }

    /// One scheduled tick. Draws and reschedules while `on`; otherwise the
    /// tick does nothing and the loop ends. Returns whether a frame was drawn.
    pub fn tick(&mut self, appliance: Appliance, on: bool, now: Instant) -> bool {
        if !on {
            self.scheduler.cancel(appliance);
            return false;
        }
        self.draw_frame(appliance);
        let interval = self.slot(appliance).state.family().interval();
        self.scheduler.schedule(appliance, now + interval);
        true
    }

    /// Runs every tick due at `now`. Returns the number of frames drawn.
    pub fn run_due(&mut self, registry: &Registry, now: Instant) -> usize {
        let mut drawn = 0;
        while let Some(appliance) = self.scheduler.pop_due(now) {
            if self.tick(appliance, registry.get(appliance), now) {
                drawn += 1;
            }
        }
        drawn
    }

    fn draw_frame(&mut self, appliance: Appliance) {
        let on_color = self.on_color;
        let slot = self
            .slots
            .get_mut(&appliance)
            .unwrap_or_else(|| unreachable!("every appliance has a slot"));
        let indicator = slot.indicator.unwrap_or(on_color);
        match slot.state.tick(&mut self.rng, indicator) {
            Frame::Surface(scene) => {
                slot.surface.clear();
                scene.render(&mut slot.surface.canvas(), self.font.as_ref());
            }
            Frame::Indicator(color) => slot.indicator = Some(color),
        }
    }

    fn slot(&self, appliance: Appliance) -> &Slot {
        self.slots
            .get(&appliance)
            .unwrap_or_else(|| unreachable!("every appliance has a slot"))
    }

    fn slot_mut(&mut self, appliance: Appliance) -> &mut Slot {
        self.slots
            .get_mut(&appliance)
            .unwrap_or_else(|| unreachable!("every appliance has a slot"))
    }

    pub fn is_running(&self, appliance: Appliance) -> bool {
        self.scheduler.is_scheduled(appliance)
    }

    pub fn timer(&self, appliance: Appliance) -> Option<TimerHandle> {
        self.scheduler.handle(appliance)
    }

    pub fn active_timers(&self) -> usize {
        self.scheduler.active_count()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.scheduler.next_deadline()
    }

    pub fn surface(&self, appliance: Appliance) -> &Surface {
        &self.slot(appliance).surface
    }

    pub fn state(&self, appliance: Appliance) -> &AnimationState {
        &self.slot(appliance).state
    }

    pub fn family(&self, appliance: Appliance) -> AnimationFamily {
        self.slot(appliance).state.family()
    }

    pub fn indicator(&self, appliance: Appliance) -> Option<Color> {
        self.slot(appliance).indicator
    }
}
