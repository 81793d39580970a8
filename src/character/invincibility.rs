//! Post-damage invincibility window.

/// Timer value while no window is armed.  Anything below zero means vulnerable;
/// the countdown saturates here instead of running off toward `-inf`.
const IDLE: f32 = -1.0;

/// Countdown gating damage-class contacts.
///
/// The character is invincible while the timer is **≥ 0**, so the tick that
/// brings it to exactly zero is still covered.
#[derive(Debug, Clone)]
pub struct InvincibilityGate {
    timer: f32,
}

impl Default for InvincibilityGate {
    fn default() -> Self {
        Self { timer: IDLE }
    }
}

impl InvincibilityGate {
    #[inline]
    pub fn is_invincible(&self) -> bool {
        self.timer >= 0.0
    }

    /// Seconds left in the current window; negative when none is armed.
    #[inline]
    pub fn remaining(&self) -> f32 {
        self.timer
    }

    pub fn trigger(&mut self, duration: f32) {
        self.timer = duration;
    }

    pub fn tick_down(&mut self, dt: f32) {
        self.timer = (self.timer - dt).max(IDLE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_vulnerable() {
        assert!(!InvincibilityGate::default().is_invincible());
    }

    #[test]
    fn window_covers_its_full_duration() {
        let mut gate = InvincibilityGate::default();
        gate.trigger(1.0);
        gate.tick_down(0.5);
        assert!(gate.is_invincible());
        gate.tick_down(0.5);
        assert!(gate.is_invincible(), "timer == 0 is still invincible");
        gate.tick_down(0.01);
        assert!(!gate.is_invincible());
    }

    #[test]
    fn countdown_saturates() {
        let mut gate = InvincibilityGate::default();
        for _ in 0..10_000 {
            gate.tick_down(1.0);
        }
        assert_eq!(gate.remaining(), IDLE);
    }
}
