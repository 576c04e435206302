use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::catalog::ElementCatalog;
use crate::constants::ELEMENT_BOUNDS_SIZE;
use crate::error::PlacementError;
use crate::placement::coordinator::{self, PlacedElement};
use crate::placement::hit_test::world_position_from_screen;
use crate::placement::ray::{ray_hits_obb, ray_hits_plane_rect};
use crate::placement::selection::{ElementAction, SelectionState};
use crate::session::anchors::PlaneAnchorEvent;
use crate::session::focus_square::FocusSquare;
use crate::session::messages::{MessageSchedule, MessageType};
use crate::session::plane_registry::{PlaneMaterialKind, PlaneRegistry};
use crate::session::tracking::TrackingState;

/// User picked a catalog category.
#[derive(Event, Debug, Clone, Copy)]
pub struct CategorySelectedEvent(pub usize);

/// User picked an element within the current category.
#[derive(Event, Debug, Clone, Copy)]
pub struct ElementSelectedEvent(pub usize);

/// Placement policy knobs.
#[derive(Resource, Debug, Default)]
pub struct PlacementSettings {
    /// Let drags continue onto an infinite plane at the focus square's last
    /// height when the pointer leaves every tracked plane.
    pub drag_on_infinite_planes: bool,
}

/// Element currently grabbed by the pointer.
#[derive(Component)]
pub struct Selected;

/// Raycast footprint of a placed element.
#[derive(Component)]
pub struct ElementBounds(pub Vec3);

/// Per-sub-node particle size, kept in sync with the element's uniform
/// scale so effects do not balloon when the element rescales.
#[derive(Component)]
pub struct ParticleEffectScale(pub f32);

/// Keyboard stand-in for the catalog UI: digits pick a category, Z/X/C/V
/// pick an element of the current category.
pub fn emit_selection_keys(
    keyboard: Res<ButtonInput<KeyCode>>,
    catalog: Res<ElementCatalog>,
    mut categories: EventWriter<CategorySelectedEvent>,
    mut elements: EventWriter<ElementSelectedEvent>,
) {
    const CATEGORY_KEYS: [KeyCode; 5] = [
        KeyCode::Digit1,
        KeyCode::Digit2,
        KeyCode::Digit3,
        KeyCode::Digit4,
        KeyCode::Digit5,
    ];
    const ELEMENT_KEYS: [KeyCode; 4] = [KeyCode::KeyZ, KeyCode::KeyX, KeyCode::KeyC, KeyCode::KeyV];

    for (index, key) in CATEGORY_KEYS.iter().enumerate() {
        if keyboard.just_pressed(*key) && index < catalog.categories().len() {
            categories.write(CategorySelectedEvent(index));
        }
    }
    for (index, key) in ELEMENT_KEYS.iter().enumerate() {
        if keyboard.just_pressed(*key) {
            elements.write(ElementSelectedEvent(index));
        }
    }
}

pub fn apply_category_selection(
    mut events: EventReader<CategorySelectedEvent>,
    catalog: Res<ElementCatalog>,
    mut selection: ResMut<SelectionState>,
    mut messages: ResMut<MessageSchedule>,
) {
    for CategorySelectedEvent(index) in events.read() {
        let Some(category) = catalog.category(*index) else {
            continue;
        };
        selection.select_category(*index, &catalog);
        messages.show(format!("CATEGORY: {}", category.category.to_uppercase()));
    }
}

/// Selecting an object places it at the current focus position; selecting a
/// floor texture arms the next plane tap instead.
pub fn apply_element_selection(
    mut events: EventReader<ElementSelectedEvent>,
    mut commands: Commands,
    catalog: Res<ElementCatalog>,
    tracking: Res<TrackingState>,
    registry: Res<PlaneRegistry>,
    focus: Res<FocusSquare>,
    mut selection: ResMut<SelectionState>,
    mut messages: ResMut<MessageSchedule>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&GlobalTransform, &Camera), With<Camera3d>>,
) {
    for ElementSelectedEvent(index) in events.read() {
        let Some(category) = selection.category().and_then(|c| catalog.category(c)) else {
            continue;
        };
        let Some(definition) = category.objects.get(*index).cloned() else {
            continue;
        };

        match selection.select_element(&definition) {
            ElementAction::AwaitFloorAssignment => {
                messages.show("TAP ON A DETECTED PLANE TO ADD THE FLOOR");
                continue;
            }
            ElementAction::PlaceObject => {}
        }

        // No pose, no placement. Silent by design; tracking feedback is
        // already on screen.
        if !tracking.has_pose() {
            continue;
        }
        let Ok(window) = windows.single() else { continue };
        let Ok((camera_transform, camera)) = cameras.single() else {
            continue;
        };

        let screen_center = Vec2::new(window.width() * 0.5, window.height() * 0.5);
        let hit = world_position_from_screen(
            screen_center,
            camera,
            camera_transform,
            &registry,
            &focus,
            false,
        );

        let (world_position, supporting_plane) = match hit {
            Ok(hit) => (hit.world_position, hit.plane_id),
            // No pose at all: no-op, the tracking feedback already showed.
            Err(PlacementError::PoseUnavailable) => continue,
            // Nowhere to place; fall back to the focus square, else tell
            // the user to reframe.
            Err(_) => match focus.last_position {
                Some(position) => (position, None),
                None => {
                    messages.show("CANNOT PLACE OBJECT\nTry moving left or right.");
                    continue;
                }
            },
        };

        let mut element = PlacedElement::new(definition.clone());
        let mut transform = Transform::default();
        coordinator::place(
            &mut element,
            &mut transform,
            world_position,
            supporting_plane,
            camera_transform.translation(),
        );

        info!("Placed `{}` at {:?}", definition.model_name, world_position);
        messages.cancel(MessageType::ContentPlacement);

        let particle_nodes: Vec<(String, f32)> =
            coordinator::particle_rescale(&element, &transform);

        commands
            .spawn((
                Mesh3d(meshes.add(Cuboid::new(
                    ELEMENT_BOUNDS_SIZE,
                    ELEMENT_BOUNDS_SIZE,
                    ELEMENT_BOUNDS_SIZE,
                ))),
                MeshMaterial3d(materials.add(StandardMaterial {
                    base_color: Color::srgb(0.8, 0.7, 0.6),
                    ..default()
                })),
                transform,
                element,
                ElementBounds(Vec3::splat(ELEMENT_BOUNDS_SIZE)),
                Name::new(format!("{}_element", definition.model_name)),
            ))
            .with_children(|parent| {
                for (node, size) in particle_nodes {
                    parent.spawn((ParticleEffectScale(size), Name::new(node)));
                }
            });
    }
}

/// Tap dispatch. Candidates from both plane rectangles and element bounds
/// are ranked together by ray distance; the closest wins. A plane tap with
/// a floor assignment pending applies the material; an element tap grabs
/// the element for dragging.
pub fn handle_tap(
    buttons: Res<ButtonInput<MouseButton>>,
    tracking: Res<TrackingState>,
    mut registry: ResMut<PlaneRegistry>,
    mut selection: ResMut<SelectionState>,
    mut messages: ResMut<MessageSchedule>,
    mut commands: Commands,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&GlobalTransform, &Camera), With<Camera3d>>,
    elements: Query<(Entity, &Transform, &ElementBounds), With<PlacedElement>>,
    selected: Query<Entity, With<Selected>>,
) {
    if !buttons.just_pressed(MouseButton::Left) || !tracking.has_pose() {
        return;
    }
    let Ok(window) = windows.single() else { return };
    let Some(cursor_position) = window.cursor_position() else {
        return;
    };
    let Ok((camera_transform, camera)) = cameras.single() else {
        return;
    };
    let Ok(ray) = camera.viewport_to_world(camera_transform, cursor_position) else {
        return;
    };
    let origin = ray.origin;
    let direction = ray.direction.as_vec3();

    let plane_hit = registry
        .iter()
        .filter_map(|record| ray_hits_plane_rect(origin, direction, record).map(|t| (record.id, t)))
        .min_by(|a, b| a.1.total_cmp(&b.1));

    let element_hit = elements
        .iter()
        .filter_map(|(entity, transform, ElementBounds(size))| {
            ray_hits_obb(origin, direction, transform, *size).map(|t| (entity, t))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1));

    let plane_first = match (plane_hit, element_hit) {
        (Some((id, plane_t)), Some((_, element_t))) if plane_t <= element_t => Some(id),
        (Some((id, _)), None) => Some(id),
        _ => None,
    };

    if let Some(plane_id) = plane_first {
        if let Some(floor_name) = selection.take_pending_floor() {
            match registry.set_material(plane_id, PlaneMaterialKind::Custom(floor_name.clone())) {
                Ok(()) => messages.show(format!("FLOOR `{}` APPLIED", floor_name.to_uppercase())),
                Err(err) => warn!("Floor assignment failed: {err}"),
            }
        }
        return;
    }

    if let Some((entity, _)) = element_hit {
        let was_selected = selected.contains(entity);
        for previous in selected.iter() {
            commands.entity(previous).remove::<Selected>();
        }
        if !was_selected {
            commands.entity(entity).insert(Selected);
        }
        return;
    }

    // Tapped empty space.
    for previous in selected.iter() {
        commands.entity(previous).remove::<Selected>();
    }
}

/// Drag the grabbed element under the pointer. When the pointer leaves
/// every tracked plane the infinite-plane fallback (if enabled) keeps the
/// element moving at the focus square's last height; otherwise the element
/// holds its ground until the pointer returns.
pub fn handle_drag(
    buttons: Res<ButtonInput<MouseButton>>,
    tracking: Res<TrackingState>,
    registry: Res<PlaneRegistry>,
    focus: Res<FocusSquare>,
    settings: Res<PlacementSettings>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&GlobalTransform, &Camera), With<Camera3d>>,
    mut grabbed: Query<(&mut PlacedElement, &mut Transform), With<Selected>>,
) {
    if grabbed.is_empty() || !buttons.pressed(MouseButton::Left) || !tracking.has_pose() {
        return;
    }
    let Ok(window) = windows.single() else { return };
    let Some(cursor_position) = window.cursor_position() else {
        return;
    };
    let Ok((camera_transform, camera)) = cameras.single() else {
        return;
    };

    let Ok(hit) = world_position_from_screen(
        cursor_position,
        camera,
        camera_transform,
        &registry,
        &focus,
        settings.drag_on_infinite_planes,
    ) else {
        return;
    };

    for (mut element, mut transform) in &mut grabbed {
        coordinator::move_to(
            &mut element,
            &mut transform,
            hit.world_position,
            hit.plane_id,
            camera_transform.translation(),
        );
    }
}

/// Remove grabbed elements with the Delete key.
pub fn handle_delete(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut commands: Commands,
    mut grabbed: Query<(Entity, &mut PlacedElement), With<Selected>>,
) {
    if !keyboard.just_pressed(KeyCode::Delete) {
        return;
    }
    for (entity, mut element) in &mut grabbed {
        coordinator::remove(&mut element);
        info!("Removed `{}`", element.definition().model_name);
        commands.entity(entity).despawn();
    }
}

/// Release the grab when the pointer lifts.
pub fn release_on_mouse_up(
    buttons: Res<ButtonInput<MouseButton>>,
    mut commands: Commands,
    selected: Query<Entity, With<Selected>>,
) {
    if buttons.just_released(MouseButton::Left) {
        for entity in selected.iter() {
            commands.entity(entity).remove::<Selected>();
        }
    }
}

/// Keep per-node particle sizes proportional to the element's uniform
/// scale after placement moves rescale it.
pub fn react_to_scale(
    parents: Query<(&PlacedElement, &Transform), Changed<Transform>>,
    mut particles: Query<(&Name, &ChildOf, &mut ParticleEffectScale)>,
) {
    for (name, child_of, mut particle) in &mut particles {
        let Ok((element, transform)) = parents.get(child_of.parent()) else {
            continue;
        };
        let rescaled = coordinator::particle_rescale(element, transform);
        if let Some((_, size)) = rescaled.iter().find(|(node, _)| node == name.as_str()) {
            particle.0 = *size;
        }
    }
}

/// Re-anchor standing elements onto planes the tracker just added or
/// refined.
pub fn snap_elements_to_planes(
    mut events: EventReader<PlaneAnchorEvent>,
    registry: Res<PlaneRegistry>,
    mut elements: Query<(&mut PlacedElement, &mut Transform)>,
) {
    for event in events.read() {
        let id = match event {
            PlaneAnchorEvent::Added { id, .. } | PlaneAnchorEvent::Updated { id, .. } => *id,
            PlaneAnchorEvent::Removed { .. } => continue,
        };
        let Some(record) = registry.get(id) else {
            continue;
        };
        for (mut element, mut transform) in &mut elements {
            if coordinator::snap_to_plane(&mut element, &mut transform, record) {
                info!(
                    "Snapped `{}` onto plane {:?}",
                    element.definition().model_name,
                    id
                );
            }
        }
    }
}
