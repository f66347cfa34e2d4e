//! Drives an editor session without a renderer: creates a designer, places
//! an object, drags it and prints the resulting records.
//!
//! Pass a JSON config path as the first argument to use file storage.

use dashboard3d::editor::Ray;
use dashboard3d::model::ObjectShape;
use dashboard3d::validation::DesignerForm;
use dashboard3d::{DashboardConfig, EditorSession, LocalApi};
use glam::Vec3;
use std::error::Error;
use std::path::Path;
use std::time::Duration;

const CAMERA: Vec3 = Vec3::new(5.0, 8.0, 12.0);

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(path) => DashboardConfig::load(Path::new(&path))?,
        None => DashboardConfig {
            latency_ms: 0,
            ..DashboardConfig::default()
        },
    };

    let mut session = EditorSession::new(LocalApi::open(&config)?);
    session.refresh().await?;

    let designer = session
        .add_designer(&DesignerForm::new("Ada Lovelace", 8.0))
        .await?;

    session.double_click_ground(&Ray::through(CAMERA, Vec3::new(1.5, 0.0, -2.0)));
    let object = session
        .confirm_placement(Some(designer.id.clone()), ObjectShape::Sphere)
        .await?;

    session.click_object(object.id.clone());
    let height = object.resting_center().y;
    let grab = object.position.to_vec3().with_y(height);
    if session.pointer_down(&object.id, &Ray::through(CAMERA, grab)) {
        session.pointer_move(&Ray::through(CAMERA, Vec3::new(-1.0, height, 1.0)));
        session.pointer_up().await?;
    }

    for look in session.frame(Duration::from_millis(250)) {
        println!("{} {:?} at {:?} ({})", look.id, look.shape, look.center, look.color);
    }
    println!("{}", serde_json::to_string_pretty(session.designers())?);
    println!("{}", serde_json::to_string_pretty(session.objects())?);
    Ok(())
}
