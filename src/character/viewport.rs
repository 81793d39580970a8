//! One-shot correction keeping the character inside the camera's left edge.
//!
//! Not tick-driven: write a [`ClampToViewport`] message (on respawn or at a
//! checkpoint) and [`viewport_clamp_system`] handles it on the next frame.
//! The camera boundary is projected into world space by
//! [`track_view_edge_system`] and cached in [`ViewLeftEdge`].

use super::controller::CharacterController;
use crate::config::CharacterConfig;
use bevy::prelude::*;

/// Request a single left-edge clamp.
#[derive(Message, Debug, Default, Clone, Copy)]
pub struct ClampToViewport;

/// World x of the camera's left boundary, `None` until a camera has been seen.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq)]
pub struct ViewLeftEdge(pub Option<f32>);

/// New world x for the character, or `None` if it is already on screen.
///
/// `left_edge_x` is the character's left edge and `view_left_x` the camera's
/// left boundary, both in world space.
pub fn clamp_left_edge(left_edge_x: f32, view_left_x: f32, half_width: f32) -> Option<f32> {
    (left_edge_x < view_left_x).then_some(view_left_x + half_width)
}

/// Project the viewport's left edge into the world.
pub fn track_view_edge_system(
    q_camera: Query<(&Camera, &GlobalTransform), With<Camera2d>>,
    mut edge: ResMut<ViewLeftEdge>,
) {
    let Ok((camera, camera_transform)) = q_camera.single() else {
        return;
    };
    if let Ok(left) = camera.viewport_to_world_2d(camera_transform, Vec2::ZERO) {
        edge.0 = Some(left.x);
    }
}

pub fn viewport_clamp_system(
    mut requests: MessageReader<ClampToViewport>,
    controller: Option<Res<CharacterController>>,
    edge: Res<ViewLeftEdge>,
    mut q_body: Query<&mut Transform>,
    config: Res<CharacterConfig>,
) {
    if requests.read().count() == 0 {
        return;
    }
    let (Some(controller), Some(view_left)) = (controller, edge.0) else {
        return;
    };
    let Ok(mut transform) = q_body.get_mut(controller.body()) else {
        return;
    };

    let half_width = config.player_half_width;
    let left_edge = transform.translation.x - half_width;
    if let Some(x) = clamp_left_edge(left_edge, view_left, half_width) {
        debug!("Clamped character from x={:.1} to x={x:.1}", transform.translation.x);
        transform.translation.x = x;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn off_screen_left_edge_snaps_to_camera_boundary() {
        assert_eq!(clamp_left_edge(-700.0, -640.0, 16.0), Some(-624.0));
    }

    #[test]
    fn visible_left_edge_is_untouched() {
        assert_eq!(clamp_left_edge(-640.0, -640.0, 16.0), None);
        assert_eq!(clamp_left_edge(30.0, -640.0, 16.0), None);
    }
}
