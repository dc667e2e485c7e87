// ============================================================================
// PANEL CONTROLLER
// ============================================================================

// Ties the registry, the animation engine, the state file and the status
// line together. UI callbacks hold a `&mut Controller`.

use std::time::Instant;

use crate::appliance::{Appliance, Registry, UnknownApplianceError};
use crate::config::PanelConfig;
use crate::engine::AnimationEngine;
use crate::persistence::{PersistenceError, StateStore};
use crate::status::StatusLine;

pub struct Controller {
    registry: Registry,
    engine: AnimationEngine,
    store: StateStore,
    status: StatusLine,
}

impl Controller {
    pub fn new(config: &PanelConfig) -> Self {
        let engine = AnimationEngine::new(
            config.background_color,
            config.on_color,
            &config.family_overrides,
        );
        Self::with_parts(StateStore::new(&config.state_file), engine)
    }

    pub fn with_parts(store: StateStore, engine: AnimationEngine) -> Self {
        Self {
            registry: Registry::new(),
            engine,
            store,
            status: StatusLine::new(),
        }
    }

    /// Reads the state file and brings every animation in line with the
    /// restored states. Read failures are reported and leave defaults.
    pub fn load(&mut self, now: Instant) {
        match self.store.load_into(&mut self.registry) {
            Ok(true) => self.status.post("Configuration loaded"),
            Ok(false) => self.status.post("No saved configuration found"),
            Err(err) => {
                tracing::warn!(error = %err, "failed to load configuration");
                self.status.post(format!("Error loading configuration: {err}"));
            }
        }

        for appliance in Appliance::all() {
            if self.registry.get(appliance) {
                self.engine.start(appliance, now);
            } else {
                self.engine.stop(appliance);
            }
        }
    }

    /// Flips an appliance, starts or stops its animation and persists the
    /// full state map. Returns the new state; a failed write is reported on
    /// the status line and does not undo the toggle.
    pub fn toggle(&mut self, appliance: Appliance, now: Instant) -> bool {
        let on = self.registry.toggle(appliance);
        self.status
            .post(format!("{appliance} turned {}", if on { "ON" } else { "OFF" }));

        if on {
            self.engine.start(appliance, now);
        } else {
            self.engine.stop(appliance);
        }

        self.save_and_report();
        on
    }

    pub fn toggle_by_name(
        &mut self,
        name: &str,
        now: Instant,
    ) -> Result<bool, UnknownApplianceError> {
        let appliance = Appliance::from_name(name)?;
        Ok(self.toggle(appliance, now))
    }

    pub fn save(&self) -> Result<(), PersistenceError> {
        self.store.save(&self.registry)
    }

    /// Writes the state file and reports the outcome on the status line.
    pub fn save_and_report(&mut self) {
        match self.save() {
            Ok(()) => self.status.post("Configuration saved"),
            Err(err) => {
                tracing::warn!(error = %err, "failed to save configuration");
                self.status.post(format!("Error saving configuration: {err}"));
            }
        }
    }

    /// Runs all animation ticks due at `now`; returns the frames drawn.
    pub fn poll(&mut self, now: Instant) -> usize {
        self.engine.run_due(&self.registry, now)
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.engine.next_deadline()
    }

    pub fn is_on(&self, appliance: Appliance) -> bool {
        self.registry.get(appliance)
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn engine(&self) -> &AnimationEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut AnimationEngine {
        &mut self.engine
    }

    pub fn status(&self) -> &StatusLine {
        &self.status
    }
}
