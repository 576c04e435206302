use bevy::prelude::*;

use crate::constants::MESSAGE_DISPLAY_DURATION;

/// Categories of scheduled guidance, used for targeted cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    TrackingStateEscalation,
    PlaneEstimation,
    ContentPlacement,
    FocusSquare,
}

#[derive(Debug)]
struct ScheduledMessage {
    text: String,
    remaining: f32,
    kind: MessageType,
}

/// Transient user guidance: immediate messages shown for a fixed duration
/// and delayed prompts that can be cancelled by type before they fire.
/// Only one scheduled prompt per type is kept; rescheduling replaces it.
#[derive(Resource, Default)]
pub struct MessageSchedule {
    current: Option<(String, f32)>,
    scheduled: Vec<ScheduledMessage>,
}

impl MessageSchedule {
    /// Show a message now, replacing whatever is on screen.
    pub fn show(&mut self, text: impl Into<String>) {
        self.current = Some((text.into(), MESSAGE_DISPLAY_DURATION));
    }

    /// Queue a prompt to appear after a delay unless cancelled first.
    pub fn schedule(&mut self, text: impl Into<String>, in_seconds: f32, kind: MessageType) {
        self.cancel(kind);
        self.scheduled.push(ScheduledMessage {
            text: text.into(),
            remaining: in_seconds,
            kind,
        });
    }

    /// Drop any queued prompt of the given type.
    pub fn cancel(&mut self, kind: MessageType) {
        self.scheduled.retain(|message| message.kind != kind);
    }

    /// Advance timers; fire due prompts and expire the current message.
    /// When several prompts come due in one tick the most overdue wins and
    /// the rest are dropped.
    pub fn tick(&mut self, delta: f32) {
        for message in &mut self.scheduled {
            message.remaining -= delta;
        }
        let due = self
            .scheduled
            .iter()
            .filter(|message| message.remaining <= 0.0)
            .min_by(|a, b| a.remaining.total_cmp(&b.remaining))
            .map(|message| message.text.clone());
        self.scheduled.retain(|message| message.remaining > 0.0);
        if let Some(text) = due {
            self.show(text);
            return;
        }

        if let Some((_, remaining)) = &mut self.current {
            *remaining -= delta;
            if *remaining <= 0.0 {
                self.current = None;
            }
        }
    }

    /// Message currently on screen, if any.
    pub fn current(&self) -> Option<&str> {
        self.current.as_ref().map(|(text, _)| text.as_str())
    }

    pub fn clear(&mut self) {
        self.current = None;
        self.scheduled.clear();
    }
}

#[derive(Component)]
pub struct MessagePanelText;

/// Bottom-center guidance panel.
pub fn spawn_message_panel(mut commands: Commands) {
    commands
        .spawn(Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            justify_content: JustifyContent::Center,
            ..default()
        })
        .with_children(|parent| {
            parent.spawn((
                Text::new(""),
                TextFont {
                    font_size: 18.0,
                    ..default()
                },
                TextColor(Color::srgb(1.0, 1.0, 1.0)),
                Node {
                    position_type: PositionType::Absolute,
                    bottom: Val::Px(48.0),
                    ..default()
                },
                MessagePanelText,
            ));
        });
}

pub fn update_message_panel(
    time: Res<Time>,
    mut schedule: ResMut<MessageSchedule>,
    mut query: Query<&mut Text, With<MessagePanelText>>,
) {
    schedule.tick(time.delta_secs());
    for mut text in &mut query {
        text.0 = schedule.current().unwrap_or("").to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scheduled_prompt_fires_after_delay() {
        let mut schedule = MessageSchedule::default();
        schedule.schedule("FIND A SURFACE", 2.0, MessageType::PlaneEstimation);

        schedule.tick(1.0);
        assert_eq!(schedule.current(), None);
        schedule.tick(1.5);
        assert_eq!(schedule.current(), Some("FIND A SURFACE"));
    }

    #[test]
    fn cancel_by_type_suppresses_prompt() {
        let mut schedule = MessageSchedule::default();
        schedule.schedule("FIND A SURFACE", 1.0, MessageType::PlaneEstimation);
        schedule.cancel(MessageType::PlaneEstimation);
        schedule.tick(2.0);
        assert_eq!(schedule.current(), None);
    }

    #[test]
    fn rescheduling_replaces_prompt_of_same_type() {
        let mut schedule = MessageSchedule::default();
        schedule.schedule("FIRST", 0.5, MessageType::ContentPlacement);
        schedule.schedule("SECOND", 1.0, MessageType::ContentPlacement);

        schedule.tick(0.6);
        assert_eq!(schedule.current(), None);
        schedule.tick(0.5);
        assert_eq!(schedule.current(), Some("SECOND"));
    }

    #[test]
    fn most_overdue_prompt_wins_when_several_fire_together() {
        let mut schedule = MessageSchedule::default();
        schedule.schedule("LATER", 1.5, MessageType::ContentPlacement);
        schedule.schedule("EARLIER", 0.5, MessageType::PlaneEstimation);

        schedule.tick(2.0);
        assert_eq!(schedule.current(), Some("EARLIER"));

        // The losing prompt was consumed, not left to resurface.
        schedule.tick(MESSAGE_DISPLAY_DURATION + 0.1);
        assert_eq!(schedule.current(), None);
    }

    #[test]
    fn shown_message_expires() {
        let mut schedule = MessageSchedule::default();
        schedule.show("SURFACE DETECTED");
        assert_eq!(schedule.current(), Some("SURFACE DETECTED"));
        schedule.tick(MESSAGE_DISPLAY_DURATION + 0.1);
        assert_eq!(schedule.current(), None);
    }
}
