//! Edible items: the consumption side of eating.
//!
//! The character decides *whether* an item is eaten; the item decides *how
//! long* it takes.  [`BeginConsumption`] starts an item's timer, damage sends
//! [`AbortConsumption`], and when a timer runs out the item reports
//! [`ConsumptionComplete`] and despawns itself.
//!
//! Progress survives an abort: an item knocked out of the mouth halfway keeps
//! half its remaining time, never less than the minimum duration.

use crate::character::ContactTag;
use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

/// An edible item and how much of it is left.
#[derive(Component, Debug, Clone)]
pub struct Food {
    /// Uneaten fraction in `[0, 1]`.
    remaining: f32,
    consuming: Option<Consumption>,
}

#[derive(Debug, Clone, Copy)]
struct Consumption {
    elapsed: f32,
    duration: f32,
    start_remaining: f32,
}

impl Default for Food {
    fn default() -> Self {
        Self {
            remaining: 1.0,
            consuming: None,
        }
    }
}

impl Food {
    #[inline]
    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    #[inline]
    pub fn is_consuming(&self) -> bool {
        self.consuming.is_some()
    }

    /// Start the consumption clip.  Ignored while one is already running.
    ///
    /// The clip lasts `normal_duration` scaled by what is left of the item,
    /// but never less than `min_duration`.
    pub fn begin(&mut self, normal_duration: f32, min_duration: f32) {
        if self.consuming.is_some() {
            return;
        }
        self.consuming = Some(Consumption {
            elapsed: 0.0,
            duration: (normal_duration * self.remaining).max(min_duration),
            start_remaining: self.remaining,
        });
    }

    /// Stop consuming, keeping whatever progress was made.
    pub fn abort(&mut self) {
        self.consuming = None;
    }

    /// Advance the clip.  Returns `true` on the tick the item is finished.
    pub fn tick(&mut self, dt: f32) -> bool {
        let Some(c) = self.consuming.as_mut() else {
            return false;
        };
        c.elapsed += dt;
        let progress = (c.elapsed / c.duration).min(1.0);
        self.remaining = c.start_remaining * (1.0 - progress);
        if progress >= 1.0 {
            self.remaining = 0.0;
            self.consuming = None;
            return true;
        }
        false
    }
}

/// Ask `item` to start being consumed.
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub struct BeginConsumption {
    pub item: Entity,
    pub normal_duration: f32,
    pub min_duration: f32,
}

/// Ask `item` to stop being consumed.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct AbortConsumption {
    pub item: Entity,
}

/// `item` has been fully eaten.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsumptionComplete {
    pub item: Entity,
}

/// Spawn an edible item at `position` as a sensor on the food layer.
pub fn spawn_food(commands: &mut Commands, position: Vec2, radius: f32) -> Entity {
    commands
        .spawn((
            Food::default(),
            ContactTag::Food,
            Collider::ball(radius),
            Sensor,
            CollisionGroups::new(
                crate::character::FOOD_GROUP,
                crate::character::PLAYER_GROUP,
            ),
            Transform::from_translation(position.extend(0.0)),
            Visibility::default(),
        ))
        .id()
}

pub fn begin_consumption_system(
    mut requests: MessageReader<BeginConsumption>,
    mut q_food: Query<&mut Food>,
) {
    for request in requests.read() {
        if let Ok(mut food) = q_food.get_mut(request.item) {
            food.begin(request.normal_duration, request.min_duration);
        }
    }
}

pub fn abort_consumption_system(
    mut requests: MessageReader<AbortConsumption>,
    mut q_food: Query<&mut Food>,
) {
    for request in requests.read() {
        if let Ok(mut food) = q_food.get_mut(request.item) {
            food.abort();
        }
    }
}

/// Advance every running consumption; finished items report and despawn.
pub fn food_consumption_system(
    mut commands: Commands,
    time: Res<Time>,
    mut q_food: Query<(Entity, &mut Food)>,
    mut completed: MessageWriter<ConsumptionComplete>,
) {
    let dt = time.delta_secs();
    for (item, mut food) in q_food.iter_mut() {
        if food.tick(dt) {
            completed.write(ConsumptionComplete { item });
            commands.entity(item).despawn();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_item_takes_normal_duration() {
        let mut food = Food::default();
        food.begin(1.0, 0.2);
        assert!(!food.tick(0.5));
        assert!((food.remaining() - 0.5).abs() < 1e-6);
        assert!(food.tick(0.5));
        assert_eq!(food.remaining(), 0.0);
        assert!(!food.is_consuming());
    }

    #[test]
    fn aborted_item_resumes_with_shorter_clip() {
        let mut food = Food::default();
        food.begin(1.0, 0.2);
        food.tick(0.75);
        food.abort();
        assert!((food.remaining() - 0.25).abs() < 1e-6);

        // 1.0 × 0.25 = 0.25 s left, above the minimum.
        food.begin(1.0, 0.2);
        assert!(!food.tick(0.2));
        assert!(food.tick(0.06));
    }

    #[test]
    fn minimum_duration_is_a_floor() {
        let mut food = Food::default();
        food.begin(1.0, 0.5);
        food.tick(0.9);
        food.abort();
        food.begin(1.0, 0.5);
        assert!(!food.tick(0.4), "0.1 s of normal time is raised to 0.5 s");
        assert!(food.tick(0.1));
    }

    #[test]
    fn begin_while_consuming_is_ignored() {
        let mut food = Food::default();
        food.begin(1.0, 0.2);
        food.tick(0.5);
        food.begin(1.0, 0.2);
        assert!(food.tick(0.5), "the first clip keeps running");
    }

    #[test]
    fn idle_item_does_not_progress() {
        let mut food = Food::default();
        assert!(!food.tick(10.0));
        assert_eq!(food.remaining(), 1.0);
    }
}
