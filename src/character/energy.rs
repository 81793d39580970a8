//! Energy: the character's vitality scalar.
//!
//! Updated once per fixed tick by [`Energy::update`] and bumped by
//! [`Energy::feed`] whenever an item finishes being eaten.

use crate::config::CharacterConfig;

/// Which environment drove the last energy update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnergyRate {
    /// A black hole is active; energy drains.
    BlackHole,
    /// Standing on the map; fast recovery.
    Ground,
    /// In the air; slow recovery.
    Air,
}

impl EnergyRate {
    /// Pick the rate for this tick.  A black hole wins over everything else.
    #[inline]
    pub fn select(black_hole_active: bool, grounded: bool) -> Self {
        if black_hole_active {
            EnergyRate::BlackHole
        } else if grounded {
            EnergyRate::Ground
        } else {
            EnergyRate::Air
        }
    }

    /// Energy change per second for this rate.
    #[inline]
    pub fn per_second(self, config: &CharacterConfig) -> f32 {
        match self {
            EnergyRate::BlackHole => config.black_hole_energy_rate,
            EnergyRate::Ground => config.ground_energy_rate,
            EnergyRate::Air => config.air_energy_rate,
        }
    }
}

/// Energy scalar plus its clamp bounds and hungry threshold.
#[derive(Debug, Clone)]
pub struct Energy {
    value: f32,
    min: f32,
    max: f32,
    hungry_threshold: f32,
    hungry: bool,
}

impl Energy {
    /// Full energy, bounds taken from `config`.
    pub fn new(config: &CharacterConfig) -> Self {
        let mut energy = Self {
            value: config.energy_max,
            min: config.energy_min,
            max: config.energy_max,
            hungry_threshold: config.hungry_threshold,
            hungry: false,
        };
        energy.refresh_hungry();
        energy
    }

    #[inline]
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Cached result of the last [`Self::refresh_hungry`].
    #[inline]
    pub fn is_hungry(&self) -> bool {
        self.hungry
    }

    /// Apply one tick of environment-dependent drain or recovery.
    ///
    /// Returns the new (clamped) energy.
    pub fn update(
        &mut self,
        dt: f32,
        black_hole_active: bool,
        grounded: bool,
        config: &CharacterConfig,
    ) -> f32 {
        let rate = EnergyRate::select(black_hole_active, grounded).per_second(config);
        self.value += rate * dt;
        self.clamp()
    }

    /// Clamp into `[min, max]`.  NaN collapses to `min`.
    pub fn clamp(&mut self) -> f32 {
        self.value = if self.value.is_nan() {
            self.min
        } else {
            self.value.clamp(self.min, self.max)
        };
        self.value
    }

    /// Add a meal's worth of energy.
    ///
    /// Clamped to `[0, max]`: eating always lifts the character out of the
    /// negative starving band.
    pub fn feed(&mut self, bonus: f32) -> f32 {
        let fed = self.value + bonus;
        self.value = if fed.is_nan() { 0.0 } else { fed.clamp(0.0, self.max) };
        self.value
    }

    /// Recompute the hungry flag from the current value.
    pub fn refresh_hungry(&mut self) -> bool {
        self.hungry = self.value < self.hungry_threshold;
        self.hungry
    }

    #[cfg(test)]
    pub(crate) fn set_for_test(&mut self, value: f32) {
        self.value = value;
    }
}
