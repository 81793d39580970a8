use bevy::prelude::*;
use bevy::window::WindowResolution;
use bevy_rapier2d::prelude::*;

use glutton::character::MAP_GROUP;
use glutton::config::CharacterConfig;
use glutton::food::spawn_food;
use glutton::game_state::GamePhase;
use glutton::simulation::{CharacterPlugin, PhysicsSensePlugin};

/// Setup camera for 2D rendering.
fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}

/// Configure Rapier physics: world gravity from the character config.
fn setup_physics_config(
    mut rapier_config: Query<&mut RapierConfiguration>,
    config: Res<CharacterConfig>,
) {
    for mut cfg in rapier_config.iter_mut() {
        cfg.gravity = Vec2::new(0.0, config.world_gravity);
    }
}

/// A single floor slab on the map layer so the character has somewhere to stand.
fn spawn_floor(mut commands: Commands) {
    commands.spawn((
        RigidBody::Fixed,
        Collider::cuboid(2000.0, 20.0),
        CollisionGroups::new(MAP_GROUP, Group::ALL),
        Transform::from_xyz(0.0, -200.0, 0.0),
    ));
}

/// A row of snacks resting on the floor.
fn spawn_snacks(mut commands: Commands) {
    for i in 0..4 {
        spawn_food(&mut commands, Vec2::new(120.0 + 80.0 * i as f32, -168.0), 10.0);
    }
}

fn start_stage(mut next_phase: ResMut<NextState<GamePhase>>) {
    next_phase.set(GamePhase::Playing);
}

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Glutton".into(),
                resolution: WindowResolution::new(1280, 720),
                ..Default::default()
            }),
            ..Default::default()
        }))
        .insert_resource(ClearColor(Color::BLACK))
        // pixels_per_meter(1.0) keeps world units identical to physics units,
        // which the knockback impulse and gravity constants assume.
        .add_plugins(RapierPhysicsPlugin::<NoUserData>::pixels_per_meter(1.0).in_fixed_schedule())
        .add_plugins((CharacterPlugin, PhysicsSensePlugin))
        .add_systems(
            Startup,
            (
                setup_camera,
                spawn_floor,
                spawn_snacks,
                setup_physics_config.after(glutton::config::load_character_config),
                start_stage,
            ),
        )
        .run();
}
