use bevy::prelude::*;
use bevy::render::alpha::AlphaMode;

use crate::session::anchors::PlaneAnchorId;
use crate::session::plane_registry::{PlaneMaterialKind, PlaneRegistry};

/// Render-side mirror of one registry record.
#[derive(Component)]
pub struct PlaneVisual {
    pub id: PlaneAnchorId,
    applied: PlaneMaterialKind,
}

/// Global switch between drawing detected surfaces and tracking them
/// invisibly (the original experience's "present planes" toggle). Starts
/// enabled, matching the standard material new records carry, and feeds
/// the initial material of every plane detected after a toggle.
#[derive(Resource)]
pub struct GroundMaterialEnabled(pub bool);

impl Default for GroundMaterialEnabled {
    fn default() -> Self {
        Self(true)
    }
}

fn material_for(kind: &PlaneMaterialKind) -> StandardMaterial {
    let base_color = match kind {
        PlaneMaterialKind::Default => Color::srgba(1.0, 1.0, 1.0, 0.25),
        PlaneMaterialKind::Transparent => Color::srgba(0.0, 0.0, 0.0, 0.0),
        // Floor texture sets render as their dominant albedo tone; texture
        // bundling stays with the host asset pipeline.
        PlaneMaterialKind::Custom(name) => match name.as_str() {
            "oakfloor2" => Color::srgb(0.48, 0.33, 0.19),
            "granitesmooth" => Color::srgb(0.42, 0.42, 0.45),
            _ => Color::srgb(0.6, 0.55, 0.5),
        },
    };
    StandardMaterial {
        base_color,
        alpha_mode: AlphaMode::Blend,
        unlit: true,
        cull_mode: None,
        ..default()
    }
}

/// Reconcile plane quad entities with the registry: spawn for new records,
/// follow extent/center/material updates, despawn for dropped records.
/// Reads of the registry here are snapshot-consistent because records are
/// replaced whole, never partially mutated.
pub fn sync_plane_visuals(
    mut commands: Commands,
    registry: Res<PlaneRegistry>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut visuals: Query<(
        Entity,
        &mut PlaneVisual,
        &mut Transform,
        &mut MeshMaterial3d<StandardMaterial>,
        &mut Visibility,
    )>,
) {
    let mut mirrored = Vec::new();

    for (entity, mut visual, mut transform, mut material, mut visibility) in &mut visuals {
        let Some(record) = registry.get(visual.id) else {
            commands.entity(entity).despawn();
            continue;
        };
        mirrored.push(visual.id);

        transform.translation = record.surface_center();
        transform.scale = Vec3::new(record.extent.width, record.extent.depth, 1.0);
        *visibility = if record.visible {
            Visibility::Visible
        } else {
            Visibility::Hidden
        };

        if visual.applied != record.material_kind {
            material.0 = materials.add(material_for(&record.material_kind));
            visual.applied = record.material_kind.clone();
        }
    }

    for record in registry.iter() {
        if mirrored.contains(&record.id) {
            continue;
        }
        commands.spawn((
            Mesh3d(meshes.add(Rectangle::new(1.0, 1.0))),
            MeshMaterial3d(materials.add(material_for(&record.material_kind))),
            Transform {
                translation: record.surface_center(),
                rotation: Quat::from_rotation_x(-std::f32::consts::FRAC_PI_2),
                scale: Vec3::new(record.extent.width, record.extent.depth, 1.0),
            },
            PlaneVisual {
                id: record.id,
                applied: record.material_kind.clone(),
            },
        ));
    }
}

/// Flip every visible plane between the standard surface material and the
/// transparent one. Bound to the key standing in for the presentation
/// switch.
pub fn toggle_ground_material(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut enabled: ResMut<GroundMaterialEnabled>,
    mut registry: ResMut<PlaneRegistry>,
) {
    if !keyboard.just_pressed(KeyCode::KeyG) {
        return;
    }
    enabled.0 = !enabled.0;
    let target = if enabled.0 {
        PlaneMaterialKind::Default
    } else {
        PlaneMaterialKind::Transparent
    };

    let visible: Vec<PlaneAnchorId> = registry.visible_planes().map(|record| record.id).collect();
    for id in visible {
        if let Err(err) = registry.set_material(id, target.clone()) {
            warn!("Ground material toggle skipped a plane: {err}");
        }
    }
    info!("Ground material {}", if enabled.0 { "enabled" } else { "disabled" });
}
