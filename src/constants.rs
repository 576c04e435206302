//! Tuning constants for plane tracking and element placement.

/// Number of recent element-to-camera distances averaged when rescaling a
/// placed element. Averaging damps the scale jitter caused by plane extents
/// updating every frame.
pub const DISTANCE_SAMPLE_WINDOW: usize = 10;

/// Vertical tolerance when deciding whether a placed element sits on a
/// freshly detected or updated plane.
pub const PLANE_SNAP_VERTICAL_TOLERANCE: f32 = 0.05;

/// Side length of the focus square reticle in metres.
pub const FOCUS_SQUARE_SIZE: f32 = 0.17;

/// Default footprint of a placed element used for tap raycasts, metres.
pub const ELEMENT_BOUNDS_SIZE: f32 = 0.4;

/// How long a transient guidance message stays on screen, seconds.
pub const MESSAGE_DISPLAY_DURATION: f32 = 2.5;

/// Delay before prompting the user to place an object once a surface
/// has been detected, seconds.
pub const CONTENT_PLACEMENT_PROMPT_DELAY: f32 = 7.5;

/// Delay before prompting the user to find a surface after a session
/// reset, seconds.
pub const PLANE_ESTIMATION_PROMPT_DELAY: f32 = 7.5;

/// How long tracking may stay limited before the feedback escalates with
/// recovery advice, seconds.
pub const TRACKING_ESCALATION_DELAY: f32 = 10.0;

/// Delay before suggesting the user reframe when the focus square never
/// finds a surface, seconds.
pub const FOCUS_SQUARE_PROMPT_DELAY: f32 = 5.0;
