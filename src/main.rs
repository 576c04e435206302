use bevy::prelude::*;
use bevy::window::PresentMode;

mod catalog;
mod constants;
mod error;
mod placement;
mod session;

use catalog::ElementCatalog;
use placement::PlacementPlugin;
use session::SessionPlugin;

const CATALOG_PATH: &'static str = "assets/catalog/virtual_elements.json";

fn main() {
    // The element catalog cannot safely default, so a malformed file is
    // fatal before any session starts.
    let catalog = match ElementCatalog::load_from_path(CATALOG_PATH) {
        Ok(catalog) => catalog,
        Err(err) => {
            eprintln!("Failed to load element catalog from {CATALOG_PATH}: {err}");
            std::process::exit(1);
        }
    };

    create_app(catalog).run();
}

fn create_app(catalog: ElementCatalog) -> App {
    let mut app = App::new();

    app.add_plugins(create_default_plugins())
        .insert_resource(catalog)
        .add_plugins(SessionPlugin)
        .add_plugins(PlacementPlugin)
        .add_systems(Startup, setup);

    app
}

fn create_default_plugins() -> impl PluginGroup {
    let window_config = WindowPlugin {
        primary_window: Some(Window {
            title: "AR Placement Engine".into(),
            present_mode: PresentMode::AutoVsync,
            ..default()
        }),
        ..default()
    };

    DefaultPlugins.set(window_config)
}

fn setup(mut commands: Commands) {
    spawn_lighting(&mut commands);
}

fn spawn_lighting(commands: &mut Commands) {
    commands.spawn((
        DirectionalLight {
            shadows_enabled: false,
            ..default()
        },
        Transform::from_rotation(Quat::from_euler(
            EulerRot::ZYX,
            0.0,
            1.0,
            -std::f32::consts::FRAC_PI_4,
        )),
    ));
}
