//! The character controller: the single owner of all character state.
//!
//! [`CharacterController`] is a Bevy [`Resource`], so a `World` can hold at
//! most one; it is only ever created by [`super::spawn_character`].  Its two
//! entry points are [`CharacterController::fixed_tick`] (once per physics step)
//! and [`CharacterController::respond`] (once per touching collider per step).
//! Neither touches the ECS directly: they take plain values and return what
//! the systems in [`super::systems`] must apply to the physics body.

use super::contact::{knockback_direction, Contact, ContactResponse, DamageOutcome};
use super::eating::{EatAttempt, EatingQueue};
use super::energy::Energy;
use super::invincibility::InvincibilityGate;
use super::motion::{project_motion, Facing, MotionState};
use super::mouth::Mouth;
use crate::config::CharacterConfig;
use crate::game_state::{GamePhase, LifeLedger};
use bevy::prelude::*;

/// External signals sampled at the start of a fixed tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct TickSignals {
    /// Not fading, not changing scene, and the phase is `Playing`.
    pub movement_permitted: bool,
    /// The phase is `Playing` (a fade may still be running).
    pub playing: bool,
    pub black_hole_active: bool,
    pub grounded: bool,
    /// Position of the attractor pulling the character, if any.
    pub attractor: Option<Vec2>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Movement is not permitted; nothing but (maybe) the velocity changed.
    Frozen,
    Advanced,
}

/// Result of a finished meal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MealOutcome {
    pub energy: f32,
    pub still_eating: usize,
    /// The last item went down and the close clip should start.
    pub close_mouth: bool,
}

#[derive(Resource, Debug)]
pub struct CharacterController {
    body: Entity,
    energy: Energy,
    invincibility: InvincibilityGate,
    eating: EatingQueue,
    mouth: Mouth,
    motion: MotionState,
    facing: Facing,
}

impl CharacterController {
    pub(crate) fn new(body: Entity, config: &CharacterConfig) -> Self {
        Self {
            body,
            energy: Energy::new(config),
            invincibility: InvincibilityGate::default(),
            eating: EatingQueue::default(),
            mouth: Mouth::new(config.mouth_close_duration),
            motion: MotionState::Idle,
            facing: Facing::Right,
        }
    }

    // ── Read-only view for renderer / audio / UI ──────────────────────────────

    /// The physics body this controller drives.
    #[inline]
    pub fn body(&self) -> Entity {
        self.body
    }

    #[inline]
    pub fn energy(&self) -> f32 {
        self.energy.value()
    }

    #[inline]
    pub fn is_hungry(&self) -> bool {
        self.energy.is_hungry()
    }

    #[inline]
    pub fn motion_state(&self) -> MotionState {
        self.motion
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.motion == MotionState::Dead
    }

    #[inline]
    pub fn facing(&self) -> Facing {
        self.facing
    }

    #[inline]
    pub fn is_invincible(&self) -> bool {
        self.invincibility.is_invincible()
    }

    #[inline]
    pub fn eating_count(&self) -> usize {
        self.eating.len()
    }

    #[inline]
    pub fn mouth(&self) -> &Mouth {
        &self.mouth
    }

    // ── Fixed tick ────────────────────────────────────────────────────────────

    /// Advance one physics step.
    ///
    /// Order matters and is fixed: movement gate, motion state, energy
    /// update, clamp, hungry flag, invincibility countdown.
    pub fn fixed_tick(
        &mut self,
        dt: f32,
        signals: &TickSignals,
        position: Vec2,
        velocity: &mut Vec2,
        config: &CharacterConfig,
    ) -> TickOutcome {
        if !signals.movement_permitted {
            if signals.playing {
                *velocity = Vec2::ZERO;
            }
            return TickOutcome::Frozen;
        }

        let (motion, facing) = project_motion(self.motion, position, *velocity, signals.attractor);
        self.motion = motion;
        if let Some(facing) = facing {
            self.facing = facing;
        }

        self.energy
            .update(dt, signals.black_hole_active, signals.grounded, config);
        self.energy.clamp();
        self.energy.refresh_hungry();
        self.invincibility.tick_down(dt);
        self.mouth.tick(dt);
        TickOutcome::Advanced
    }

    // ── Contacts ──────────────────────────────────────────────────────────────

    /// Handle one touching collider.
    ///
    /// Repeating the same contact within or across ticks is safe: eating an
    /// item already in the queue is refused, and damage is gated by the
    /// invincibility window it arms.
    pub fn respond(
        &mut self,
        contact: Contact,
        position: Vec2,
        phase: GamePhase,
        lives: &mut impl LifeLedger,
        config: &CharacterConfig,
    ) -> ContactResponse {
        if self.is_dead() {
            return ContactResponse::Ignored;
        }
        match contact {
            Contact::Food { item } => self.begin_eat(item, config),
            Contact::Enemy { point } | Contact::DamageTile { point } => {
                self.take_damage(position, point, lives, config)
            }
            Contact::ClearZone { zone } => {
                if phase == GamePhase::Playing {
                    ContactResponse::StageClear { zone }
                } else {
                    ContactResponse::Ignored
                }
            }
        }
    }

    fn begin_eat(&mut self, item: Entity, config: &CharacterConfig) -> ContactResponse {
        match self.eating.try_begin(item) {
            EatAttempt::Started { opens_mouth } => {
                if opens_mouth {
                    self.mouth.open();
                }
                ContactResponse::EatStarted {
                    item,
                    opens_mouth,
                    normal_duration: config.eat_normal_duration,
                    min_duration: config.eat_min_duration,
                }
            }
            attempt => ContactResponse::EatRefused { item, attempt },
        }
    }

    fn take_damage(
        &mut self,
        position: Vec2,
        contact_point: Vec2,
        lives: &mut impl LifeLedger,
        config: &CharacterConfig,
    ) -> ContactResponse {
        if self.invincibility.is_invincible() {
            return ContactResponse::Ignored;
        }
        self.invincibility.trigger(config.invincibility_duration);

        let impulse = knockback_direction(position, contact_point) * config.knockback_impulse;
        let released = self.eating.release_all();
        let close_mouth = self.mouth.request_close().is_some();

        let game_over = lives.report_damage();
        if game_over {
            self.motion = MotionState::Dead;
        }

        ContactResponse::Damaged(DamageOutcome {
            impulse,
            released,
            close_mouth,
            game_over,
        })
    }

    /// An item reported that it has been eaten.
    ///
    /// Returns `None` when the item no longer holds a slot (it was released by
    /// damage before its completion arrived); no energy is granted then.
    pub fn complete_eat(&mut self, item: Entity, config: &CharacterConfig) -> Option<MealOutcome> {
        let still_eating = self.eating.complete(item)?;
        let energy = self.energy.feed(config.food_energy_bonus);
        self.energy.refresh_hungry();
        let close_mouth = still_eating == 0 && self.mouth.request_close().is_some();
        Some(MealOutcome {
            energy,
            still_eating,
            close_mouth,
        })
    }

    #[cfg(test)]
    pub(crate) fn set_energy_for_test(&mut self, value: f32) {
        self.energy.set_for_test(value);
        self.energy.refresh_hungry();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Ledger {
        remaining: i32,
        reports: u32,
    }

    impl LifeLedger for Ledger {
        fn report_damage(&mut self) -> bool {
            self.reports += 1;
            self.remaining -= 1;
            self.remaining <= 0
        }
    }

    fn ledger(remaining: i32) -> Ledger {
        Ledger {
            remaining,
            reports: 0,
        }
    }

    fn playing() -> TickSignals {
        TickSignals {
            movement_permitted: true,
            playing: true,
            ..Default::default()
        }
    }

    fn setup() -> (World, CharacterController, CharacterConfig) {
        let mut world = World::new();
        let body = world.spawn_empty().id();
        let config = CharacterConfig::default();
        let controller = CharacterController::new(body, &config);
        (world, controller, config)
    }

    fn enemy_at(point: Vec2) -> Contact {
        Contact::Enemy { point }
    }

    // ── fixed_tick ────────────────────────────────────────────────────────────

    #[test]
    fn frozen_tick_zeroes_velocity_while_playing() {
        let (_, mut ctl, config) = setup();
        let mut vel = Vec2::new(5.0, -3.0);
        let signals = TickSignals {
            movement_permitted: false,
            playing: true,
            black_hole_active: true,
            ..Default::default()
        };
        assert_eq!(
            ctl.fixed_tick(1.0, &signals, Vec2::ZERO, &mut vel, &config),
            TickOutcome::Frozen
        );
        assert_eq!(vel, Vec2::ZERO);
        assert_eq!(ctl.energy(), config.energy_max, "no energy update while frozen");
    }

    #[test]
    fn frozen_tick_outside_playing_keeps_velocity() {
        let (_, mut ctl, config) = setup();
        let mut vel = Vec2::new(0.0, -40.0);
        let signals = TickSignals::default();
        ctl.fixed_tick(0.1, &signals, Vec2::ZERO, &mut vel, &config);
        assert_eq!(vel, Vec2::new(0.0, -40.0));
    }

    #[test]
    fn black_hole_drains_over_one_second() {
        let (_, mut ctl, config) = setup();
        let mut vel = Vec2::ZERO;
        let signals = TickSignals {
            black_hole_active: true,
            ..playing()
        };
        ctl.fixed_tick(1.0, &signals, Vec2::ZERO, &mut vel, &config);
        assert!((ctl.energy() - 0.7).abs() < 1e-5);
    }

    #[test]
    fn energy_stays_in_bounds_every_tick() {
        let (_, mut ctl, config) = setup();
        let mut vel = Vec2::ZERO;
        for step in 0..400 {
            let signals = TickSignals {
                black_hole_active: step < 250,
                grounded: step % 3 == 0,
                ..playing()
            };
            ctl.fixed_tick(0.05, &signals, Vec2::ZERO, &mut vel, &config);
            assert!(ctl.energy() >= config.energy_min && ctl.energy() <= config.energy_max);
        }
    }

    #[test]
    fn hungry_flag_follows_energy() {
        let (_, mut ctl, config) = setup();
        let mut vel = Vec2::ZERO;
        let signals = TickSignals {
            black_hole_active: true,
            ..playing()
        };
        ctl.fixed_tick(2.0, &signals, Vec2::ZERO, &mut vel, &config);
        assert!((ctl.energy() - 0.4).abs() < 1e-5);
        assert!(!ctl.is_hungry());
        ctl.fixed_tick(0.5, &signals, Vec2::ZERO, &mut vel, &config);
        assert!(ctl.is_hungry());
    }

    #[test]
    fn suction_sets_sucked_and_faces_attractor() {
        let (_, mut ctl, config) = setup();
        let mut vel = Vec2::new(0.0, -10.0);
        let signals = TickSignals {
            attractor: Some(Vec2::new(-100.0, 0.0)),
            ..playing()
        };
        ctl.fixed_tick(0.016, &signals, Vec2::ZERO, &mut vel, &config);
        assert_eq!(ctl.motion_state(), MotionState::Sucked);
        assert_eq!(ctl.facing(), Facing::Left);

        ctl.fixed_tick(0.016, &playing(), Vec2::ZERO, &mut vel, &config);
        assert_eq!(ctl.motion_state(), MotionState::Fall);
        assert_eq!(ctl.facing(), Facing::Left, "facing only changes while sucked");
    }

    // ── eating ────────────────────────────────────────────────────────────────

    #[test]
    fn food_is_eaten_while_invincible() {
        let (mut world, mut ctl, config) = setup();
        let mut lives = ledger(3);
        ctl.respond(enemy_at(Vec2::X), Vec2::ZERO, GamePhase::Playing, &mut lives, &config);
        assert!(ctl.is_invincible());

        let item = world.spawn_empty().id();
        let response = ctl.respond(
            Contact::Food { item },
            Vec2::ZERO,
            GamePhase::Playing,
            &mut lives,
            &config,
        );
        assert!(matches!(response, ContactResponse::EatStarted { opens_mouth: true, .. }));
    }

    #[test]
    fn repeated_food_contact_does_not_restart_consumption() {
        let (mut world, mut ctl, config) = setup();
        let mut lives = ledger(3);
        let item = world.spawn_empty().id();
        let contact = Contact::Food { item };
        ctl.respond(contact, Vec2::ZERO, GamePhase::Playing, &mut lives, &config);
        let again = ctl.respond(contact, Vec2::ZERO, GamePhase::Playing, &mut lives, &config);
        assert_eq!(
            again,
            ContactResponse::EatRefused {
                item,
                attempt: EatAttempt::AlreadyEating
            }
        );
        assert_eq!(ctl.eating_count(), 1);
    }

    #[test]
    fn ninth_food_is_refused() {
        let (mut world, mut ctl, config) = setup();
        let mut lives = ledger(3);
        for _ in 0..8 {
            let item = world.spawn_empty().id();
            let r = ctl.respond(Contact::Food { item }, Vec2::ZERO, GamePhase::Playing, &mut lives, &config);
            assert!(matches!(r, ContactResponse::EatStarted { .. }));
        }
        let ninth = world.spawn_empty().id();
        let r = ctl.respond(Contact::Food { item: ninth }, Vec2::ZERO, GamePhase::Playing, &mut lives, &config);
        assert_eq!(
            r,
            ContactResponse::EatRefused {
                item: ninth,
                attempt: EatAttempt::Full
            }
        );
        assert_eq!(ctl.eating_count(), 8);
    }

    #[test]
    fn meal_adds_bonus_and_last_meal_closes_mouth() {
        let (mut world, mut ctl, config) = setup();
        let mut lives = ledger(3);
        let a = world.spawn_empty().id();
        let b = world.spawn_empty().id();
        for item in [a, b] {
            ctl.respond(Contact::Food { item }, Vec2::ZERO, GamePhase::Playing, &mut lives, &config);
        }
        ctl.set_energy_for_test(0.1);
        assert!(ctl.is_hungry());

        let first = ctl.complete_eat(a, &config).unwrap();
        assert!((first.energy - 0.6).abs() < 1e-5);
        assert_eq!(first.still_eating, 1);
        assert!(!first.close_mouth);
        assert!(!ctl.is_hungry());

        let second = ctl.complete_eat(b, &config).unwrap();
        assert_eq!(second.still_eating, 0);
        assert!(second.close_mouth);
        assert_eq!(ctl.energy(), config.energy_max);
    }

    #[test]
    fn bonus_from_point_four_is_point_nine() {
        let (mut world, mut ctl, config) = setup();
        let mut lives = ledger(3);
        let item = world.spawn_empty().id();
        ctl.respond(Contact::Food { item }, Vec2::ZERO, GamePhase::Playing, &mut lives, &config);
        ctl.set_energy_for_test(0.4);
        let meal = ctl.complete_eat(item, &config).unwrap();
        assert!((meal.energy - 0.9).abs() < 1e-5);
    }

    #[test]
    fn released_item_completion_grants_nothing() {
        let (mut world, mut ctl, config) = setup();
        let mut lives = ledger(3);
        let item = world.spawn_empty().id();
        ctl.respond(Contact::Food { item }, Vec2::ZERO, GamePhase::Playing, &mut lives, &config);
        ctl.respond(enemy_at(Vec2::X), Vec2::ZERO, GamePhase::Playing, &mut lives, &config);
        ctl.set_energy_for_test(0.2);
        assert_eq!(ctl.complete_eat(item, &config), None);
        assert!((ctl.energy() - 0.2).abs() < 1e-6);
    }

    // ── damage ────────────────────────────────────────────────────────────────

    #[test]
    fn damage_releases_items_and_knocks_back() {
        let (mut world, mut ctl, config) = setup();
        let mut lives = ledger(3);
        let items: Vec<Entity> = (0..3).map(|_| world.spawn_empty().id()).collect();
        for &item in &items {
            ctl.respond(Contact::Food { item }, Vec2::ZERO, GamePhase::Playing, &mut lives, &config);
        }

        let response = ctl.respond(
            enemy_at(Vec2::new(10.0, 0.0)),
            Vec2::ZERO,
            GamePhase::Playing,
            &mut lives,
            &config,
        );
        let ContactResponse::Damaged(outcome) = response else {
            panic!("expected damage, got {response:?}");
        };
        assert_eq!(outcome.impulse, Vec2::new(-config.knockback_impulse, 0.0));
        assert_eq!(outcome.released.len(), 3);
        for item in &items {
            assert!(outcome.released.contains(item));
        }
        assert!(outcome.close_mouth);
        assert!(!outcome.game_over);
        assert_eq!(ctl.eating_count(), 0);
        assert_eq!(lives.reports, 1);
    }

    #[test]
    fn invincibility_suppresses_repeated_damage() {
        let (_, mut ctl, config) = setup();
        let mut lives = ledger(3);
        let mut vel = Vec2::ZERO;
        let first = ctl.respond(enemy_at(Vec2::X), Vec2::ZERO, GamePhase::Playing, &mut lives, &config);
        assert!(matches!(first, ContactResponse::Damaged(_)));
        let window = ctl.invincibility.remaining();

        for _ in 0..10 {
            ctl.fixed_tick(0.01, &playing(), Vec2::ZERO, &mut vel, &config);
            let r = ctl.respond(
                Contact::DamageTile { point: Vec2::NEG_Y },
                Vec2::ZERO,
                GamePhase::Playing,
                &mut lives,
                &config,
            );
            assert_eq!(r, ContactResponse::Ignored);
        }
        assert_eq!(lives.reports, 1);
        assert!(ctl.invincibility.remaining() < window, "window was never re-armed");
    }

    #[test]
    fn damage_is_possible_again_after_window() {
        let (_, mut ctl, config) = setup();
        let mut lives = ledger(3);
        let mut vel = Vec2::ZERO;
        ctl.respond(enemy_at(Vec2::X), Vec2::ZERO, GamePhase::Playing, &mut lives, &config);
        ctl.fixed_tick(config.invincibility_duration + 0.1, &playing(), Vec2::ZERO, &mut vel, &config);
        let r = ctl.respond(enemy_at(Vec2::X), Vec2::ZERO, GamePhase::Playing, &mut lives, &config);
        assert!(matches!(r, ContactResponse::Damaged(_)));
        assert_eq!(lives.reports, 2);
    }

    #[test]
    fn contact_at_centre_knocks_straight_up() {
        let (_, mut ctl, config) = setup();
        let mut lives = ledger(3);
        let p = Vec2::new(4.0, 4.0);
        let ContactResponse::Damaged(outcome) =
            ctl.respond(Contact::DamageTile { point: p }, p, GamePhase::Playing, &mut lives, &config)
        else {
            panic!("expected damage");
        };
        assert_eq!(outcome.impulse, Vec2::Y * config.knockback_impulse);
        assert!(outcome.impulse.is_finite());
    }

    #[test]
    fn last_life_makes_dead_permanently() {
        let (mut world, mut ctl, config) = setup();
        let mut lives = ledger(1);
        let mut vel = Vec2::ZERO;
        let ContactResponse::Damaged(outcome) =
            ctl.respond(enemy_at(Vec2::X), Vec2::ZERO, GamePhase::Playing, &mut lives, &config)
        else {
            panic!("expected damage");
        };
        assert!(outcome.game_over);
        assert_eq!(ctl.motion_state(), MotionState::Dead);

        // Nothing afterwards may leave Dead: ticks, suction, more contacts.
        ctl.fixed_tick(
            10.0,
            &TickSignals {
                attractor: Some(Vec2::X),
                ..playing()
            },
            Vec2::ZERO,
            &mut vel,
            &config,
        );
        let item = world.spawn_empty().id();
        for contact in [
            enemy_at(Vec2::NEG_X),
            Contact::Food { item },
            Contact::ClearZone { zone: item },
        ] {
            assert_eq!(
                ctl.respond(contact, Vec2::ZERO, GamePhase::Playing, &mut lives, &config),
                ContactResponse::Ignored
            );
        }
        assert_eq!(ctl.motion_state(), MotionState::Dead);
        assert_eq!(lives.reports, 1);
    }

    // ── clear zone ────────────────────────────────────────────────────────────

    #[test]
    fn clear_zone_only_counts_while_playing() {
        let (mut world, mut ctl, config) = setup();
        let mut lives = ledger(3);
        let zone = world.spawn_empty().id();
        let contact = Contact::ClearZone { zone };
        assert_eq!(
            ctl.respond(contact, Vec2::ZERO, GamePhase::Playing, &mut lives, &config),
            ContactResponse::StageClear { zone }
        );
        assert_eq!(
            ctl.respond(contact, Vec2::ZERO, GamePhase::Clear, &mut lives, &config),
            ContactResponse::Ignored
        );
    }
}
