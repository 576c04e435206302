use bevy::input::mouse::MouseMotion;
use bevy::math::EulerRot;
use bevy::prelude::*;

/// Free-fly rig standing in for a device camera being carried around the
/// room. The placement tool only ever reads the resulting `Camera3d`
/// transform, exactly as it would read a tracked pose.
#[derive(Resource)]
pub struct CameraRig {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.4, 1.2),
            yaw: 0.0,
            pitch: -0.35,
        }
    }
}

pub fn spawn_camera(mut commands: Commands) {
    let rig = CameraRig::default();
    commands.spawn((
        Camera3d::default(),
        Transform::from_translation(rig.position)
            .with_rotation(Quat::from_euler(EulerRot::YXZ, rig.yaw, rig.pitch, 0.0)),
    ));
    commands.insert_resource(rig);
}

pub fn camera_controller(
    mut cameras: Query<&mut Transform, With<Camera3d>>,
    mut rig: ResMut<CameraRig>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: EventReader<MouseMotion>,
    keyboard: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
) {
    let Ok(mut camera_transform) = cameras.single_mut() else {
        return;
    };

    let mouse_delta: Vec2 = mouse_motion.read().map(|m| m.delta).sum();

    // Look around with right mouse held.
    if mouse_button.pressed(MouseButton::Right) && mouse_delta != Vec2::ZERO {
        rig.yaw += -mouse_delta.x * 0.0035;
        rig.pitch = (rig.pitch - mouse_delta.y * 0.0030).clamp(-1.55, 1.55);
    }

    let mut move_input = Vec3::ZERO;
    if keyboard.pressed(KeyCode::KeyW) { move_input.z -= 1.0; }
    if keyboard.pressed(KeyCode::KeyS) { move_input.z += 1.0; }
    if keyboard.pressed(KeyCode::KeyD) { move_input.x += 1.0; }
    if keyboard.pressed(KeyCode::KeyA) { move_input.x -= 1.0; }
    if keyboard.pressed(KeyCode::KeyE) { move_input.y += 1.0; }
    if keyboard.pressed(KeyCode::KeyQ) { move_input.y -= 1.0; }

    let view_rot = Quat::from_euler(EulerRot::YXZ, rig.yaw, rig.pitch, 0.0);
    if move_input != Vec3::ZERO {
        let forward = (view_rot * Vec3::NEG_Z).normalize();
        let right = (view_rot * Vec3::X).normalize();
        let mut speed = 1.2;
        if keyboard.any_pressed([KeyCode::ShiftLeft, KeyCode::ShiftRight]) {
            speed *= 3.0;
        }
        let world_delta = right * move_input.x + Vec3::Y * move_input.y - forward * move_input.z;
        rig.position += world_delta.normalize() * speed * time.delta_secs();
    }

    let lerp_speed = (12.0 * time.delta_secs()).min(1.0);
    camera_transform.translation = camera_transform.translation.lerp(rig.position, lerp_speed);
    camera_transform.rotation = camera_transform.rotation.slerp(view_rot, lerp_speed);
}
