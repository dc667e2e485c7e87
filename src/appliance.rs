// ============================================================================
// APPLIANCE REGISTRY
// ============================================================================

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Serialize, Serializer};
use strum::{Display, EnumCount, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

/// One of the nine simulated household appliances, in panel order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumCount,
    EnumIter,
    EnumString,
    IntoStaticStr,
)]
pub enum Appliance {
    #[strum(serialize = "Living Room Light")]
    LivingRoomLight,
    #[strum(serialize = "Bedroom Light")]
    BedroomLight,
    #[strum(serialize = "Kitchen Light")]
    KitchenLight,
    #[strum(serialize = "Living Room Fan")]
    LivingRoomFan,
    #[strum(serialize = "Bedroom Fan")]
    BedroomFan,
    #[strum(serialize = "Air Conditioner")]
    AirConditioner,
    #[strum(serialize = "TV")]
    Tv,
    #[strum(serialize = "Speaker")]
    Speaker,
    #[strum(serialize = "Radio")]
    Radio,
}

/// Which drawing routine animates an appliance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum AnimationFamily {
    Fan,
    Light,
    AirConditioner,
    Tv,
    Speaker,
    Radio,
    /// Pulses the appliance's button colour instead of drawing on its surface.
    Pulse,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown appliance {0:?}")]
pub struct UnknownApplianceError(pub String);

impl Appliance {
    pub fn all() -> impl Iterator<Item = Appliance> {
        Appliance::iter()
    }

    /// Looks an appliance up by its display name.
    pub fn from_name(name: &str) -> Result<Self, UnknownApplianceError> {
        Appliance::from_str(name).map_err(|_| UnknownApplianceError(name.to_string()))
    }

    /// Display name, also used as the key in the state file.
    pub fn name(self) -> &'static str {
        self.into()
    }

    pub fn family(self) -> AnimationFamily {
        match self {
            Appliance::LivingRoomLight | Appliance::BedroomLight | Appliance::KitchenLight => {
                AnimationFamily::Light
            }
            Appliance::LivingRoomFan | Appliance::BedroomFan => AnimationFamily::Fan,
            Appliance::AirConditioner => AnimationFamily::AirConditioner,
            Appliance::Tv => AnimationFamily::Tv,
            Appliance::Speaker => AnimationFamily::Speaker,
            Appliance::Radio => AnimationFamily::Radio,
        }
    }

    /// Drawing surface size in surface pixels.
    pub fn surface_size(self) -> (usize, usize) {
        match self {
            Appliance::AirConditioner => (60, 30),
            Appliance::Tv => (50, 40),
            _ => (40, 40),
        }
    }
}

impl Serialize for Appliance {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// Boolean on/off state for every appliance. All appliances start off.
/// Serializes as a flat `{"<name>": <bool>}` object in panel order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Registry {
    states: BTreeMap<Appliance, bool>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    pub fn new() -> Self {
        Self {
            states: Appliance::all().map(|appliance| (appliance, false)).collect(),
        }
    }

    pub fn get(&self, appliance: Appliance) -> bool {
        self.states.get(&appliance).copied().unwrap_or(false)
    }

    pub fn get_by_name(&self, name: &str) -> Result<bool, UnknownApplianceError> {
        Ok(self.get(Appliance::from_name(name)?))
    }

    pub fn set(&mut self, appliance: Appliance, on: bool) {
        self.states.insert(appliance, on);
    }

    /// Flips the state and returns the new value. Animation and persistence
    /// side effects are driven by [`crate::Controller::toggle`].
    pub fn toggle(&mut self, appliance: Appliance) -> bool {
        let state = self.states.entry(appliance).or_insert(false);
        *state = !*state;
        *state
    }

    pub fn toggle_by_name(&mut self, name: &str) -> Result<bool, UnknownApplianceError> {
        Ok(self.toggle(Appliance::from_name(name)?))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Appliance, bool)> + '_ {
        self.states.iter().map(|(appliance, on)| (*appliance, *on))
    }

    pub fn count_on(&self) -> usize {
        self.states.values().filter(|on| **on).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        assert_eq!(Appliance::COUNT, 9);
        for appliance in Appliance::all() {
            assert_eq!(appliance.to_string(), appliance.name());
            assert_eq!(
                serde_json::to_string(&appliance).unwrap(),
                format!("\"{}\"", appliance.name())
            );
            assert_eq!(Appliance::from_name(appliance.name()), Ok(appliance));
        }
    }

    #[test]
    fn display_names_match_state_file_keys() {
        assert_eq!(Appliance::LivingRoomLight.name(), "Living Room Light");
        assert_eq!(Appliance::AirConditioner.name(), "Air Conditioner");
        assert_eq!(Appliance::Tv.name(), "TV");
        assert_eq!(Appliance::from_name("Bedroom Fan"), Ok(Appliance::BedroomFan));
    }

    #[test]
    fn unknown_name_is_rejected() {
        let err = Appliance::from_name("Toaster").unwrap_err();
        assert_eq!(err, UnknownApplianceError("Toaster".to_string()));
        assert_eq!(err.to_string(), "unknown appliance \"Toaster\"");

        let mut registry = Registry::new();
        assert!(registry.toggle_by_name("Toaster").is_err());
        assert!(registry.get_by_name("tv").is_err());
        assert_eq!(registry.count_on(), 0);
    }

    #[test]
    fn families_cover_every_appliance() {
        let fans = Appliance::all()
            .filter(|a| a.family() == AnimationFamily::Fan)
            .count();
        let lights = Appliance::all()
            .filter(|a| a.family() == AnimationFamily::Light)
            .count();
        assert_eq!(fans, 2);
        assert_eq!(lights, 3);
        assert!(Appliance::all().all(|a| a.family() != AnimationFamily::Pulse));
    }

    #[test]
    fn toggle_flips_and_reports() {
        let mut registry = Registry::new();
        assert!(!registry.get(Appliance::Radio));
        assert!(registry.toggle(Appliance::Radio));
        assert!(registry.get(Appliance::Radio));
        assert_eq!(registry.toggle_by_name("Radio"), Ok(false));
        assert!(!registry.get(Appliance::Radio));
    }

    #[test]
    fn surface_sizes() {
        assert_eq!(Appliance::AirConditioner.surface_size(), (60, 30));
        assert_eq!(Appliance::Tv.surface_size(), (50, 40));
        assert_eq!(Appliance::Speaker.surface_size(), (40, 40));
    }

    #[test]
    fn registry_serializes_in_panel_order() {
        let mut registry = Registry::new();
        registry.set(Appliance::Tv, true);
        let json = serde_json::to_string(&registry).unwrap();
        assert!(json.starts_with(r#"{"Living Room Light":false,"Bedroom Light":false"#));
        assert!(json.contains(r#""TV":true"#));
        assert!(json.ends_with(r#""Radio":false}"#));
    }
}
