use bevy::prelude::*;
use bevy::render::alpha::AlphaMode;
use bevy::window::PrimaryWindow;

use crate::constants::{FOCUS_SQUARE_PROMPT_DELAY, FOCUS_SQUARE_SIZE};
use crate::placement::coordinator::PlacedElement;
use crate::placement::hit_test::world_position_from_screen;
use crate::session::messages::{MessageSchedule, MessageType};
use crate::session::plane_registry::PlaneRegistry;
use crate::session::tracking::TrackingState;

/// Reticle marking the current best placement location. Its last known
/// position supplies the height of the infinite-plane drag fallback.
#[derive(Resource, Debug, Default)]
pub struct FocusSquare {
    pub last_position: Option<Vec3>,
    pub visible: bool,
}

impl FocusSquare {
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Component)]
pub struct FocusSquareGizmo;

pub fn spawn_focus_square(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut messages: ResMut<MessageSchedule>,
) {
    // Fires only if the reticle never lands on anything.
    messages.schedule(
        "TRY MOVING LEFT OR RIGHT",
        FOCUS_SQUARE_PROMPT_DELAY,
        MessageType::FocusSquare,
    );
    commands.spawn((
        Mesh3d(meshes.add(Rectangle::new(FOCUS_SQUARE_SIZE, FOCUS_SQUARE_SIZE))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgba(1.0, 0.8, 0.2, 0.6),
            alpha_mode: AlphaMode::Blend,
            unlit: true,
            ..default()
        })),
        Transform::from_rotation(Quat::from_rotation_x(-std::f32::consts::FRAC_PI_2)),
        Visibility::Hidden,
        FocusSquareGizmo,
    ));
}

/// Screen-center hit test each frame: track the best placement position and
/// hide the reticle while a placed element is in view.
pub fn update_focus_square(
    tracking: Res<TrackingState>,
    registry: Res<PlaneRegistry>,
    mut focus: ResMut<FocusSquare>,
    mut messages: ResMut<MessageSchedule>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&GlobalTransform, &Camera), With<Camera3d>>,
    placed: Query<&GlobalTransform, (With<PlacedElement>, Without<Camera3d>)>,
    mut gizmos: Query<(&mut Transform, &mut Visibility), With<FocusSquareGizmo>>,
) {
    let Ok((mut gizmo_transform, mut gizmo_visibility)) = gizmos.single_mut() else {
        return;
    };
    if !tracking.has_pose() {
        focus.visible = false;
        *gizmo_visibility = Visibility::Hidden;
        return;
    }
    let Ok(window) = windows.single() else { return };
    let Ok((camera_transform, camera)) = cameras.single() else {
        return;
    };

    let screen_center = Vec2::new(window.width() * 0.5, window.height() * 0.5);

    // Hide the reticle while any placed element projects onto the screen.
    let element_visible = placed.iter().any(|transform| {
        camera
            .world_to_viewport(camera_transform, transform.translation())
            .is_ok_and(|point| {
                point.x >= 0.0
                    && point.y >= 0.0
                    && point.x <= window.width()
                    && point.y <= window.height()
            })
    });

    // The focus square itself may drift onto infinite planes at its own
    // last height, so the search never dead-ends once a plane was seen.
    let hit = world_position_from_screen(
        screen_center,
        camera,
        camera_transform,
        &registry,
        &focus,
        true,
    );

    if let Ok(hit) = hit {
        messages.cancel(MessageType::FocusSquare);
        focus.last_position = Some(hit.world_position);
        gizmo_transform.translation = hit.world_position + Vec3::Y * 0.002;
    }

    focus.visible = !element_visible && focus.last_position.is_some();
    *gizmo_visibility = if focus.visible {
        Visibility::Visible
    } else {
        Visibility::Hidden
    };
}
