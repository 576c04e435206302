use bevy::prelude::*;

use crate::placement::coordinator::PlacedElement;
use crate::placement::selection::SelectionState;
use crate::session::focus_square::FocusSquare;
use crate::session::messages::{MessageSchedule, MessageType};
use crate::session::plane_registry::PlaneRegistry;
use crate::session::plane_visuals::GroundMaterialEnabled;
use crate::session::simulation::AnchorFeed;

/// Quality of the tracking subsystem's pose estimate. Placement operations
/// are no-ops unless tracking is `Normal`; there is no camera pose worth
/// trusting in the other states.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackingState {
    #[default]
    NotAvailable,
    Limited,
    Normal,
}

impl TrackingState {
    pub fn has_pose(self) -> bool {
        self == TrackingState::Normal
    }
}

/// Restart the whole experience: planes, placed elements, selection,
/// focus square and the anchor feed.
#[derive(Event, Debug, Default)]
pub struct SessionResetEvent;

/// Prompt scheduled when the experience starts, cancelled by the first
/// detected surface.
pub fn schedule_initial_guidance(mut messages: ResMut<MessageSchedule>) {
    messages.schedule(
        "FIND A SURFACE TO PLACE AN OBJECT",
        crate::constants::PLANE_ESTIMATION_PROMPT_DELAY,
        MessageType::PlaneEstimation,
    );
}

pub fn emit_reset_on_key(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut events: EventWriter<SessionResetEvent>,
) {
    if keyboard.just_pressed(KeyCode::KeyR) {
        events.write(SessionResetEvent);
    }
}

pub fn apply_session_reset(
    mut events: EventReader<SessionResetEvent>,
    mut commands: Commands,
    mut registry: ResMut<PlaneRegistry>,
    mut selection: ResMut<SelectionState>,
    mut focus: ResMut<FocusSquare>,
    mut tracking: ResMut<TrackingState>,
    mut ground_material: ResMut<GroundMaterialEnabled>,
    mut feed: ResMut<AnchorFeed>,
    mut messages: ResMut<MessageSchedule>,
    placed: Query<Entity, With<PlacedElement>>,
) {
    if events.is_empty() {
        return;
    }
    events.clear();

    info!("Resetting session");
    registry.clear();
    selection.reset();
    focus.reset();
    *tracking = TrackingState::NotAvailable;
    *ground_material = GroundMaterialEnabled::default();
    feed.restart();

    for entity in placed.iter() {
        commands.entity(entity).despawn();
    }

    messages.clear();
    messages.show("RESETTING SESSION");
    messages.schedule(
        "FIND A SURFACE TO PLACE AN OBJECT",
        crate::constants::PLANE_ESTIMATION_PROMPT_DELAY,
        MessageType::PlaneEstimation,
    );
    messages.schedule(
        "TRY MOVING LEFT OR RIGHT",
        crate::constants::FOCUS_SQUARE_PROMPT_DELAY,
        MessageType::FocusSquare,
    );
}
