use cgmath::{InnerSpace, Point3};
use obj_viewer::{LoadError, controls::Action};

use crate::common::test_utils::{OFFSET_QUAD, loaded_viewer, parse, viewer};

mod common;

#[test]
fn loaded_model_is_centred_and_alone() {
    let viewer = loaded_viewer();
    assert_eq!(viewer.scene.model_count(), 1);
    let center = viewer.scene.model().unwrap().world_bounds().unwrap().center();
    assert!((center - Point3::new(0.0, 0.0, 0.0)).magnitude() < 1e-5);
    assert!((viewer.camera.position - Point3::new(0.0, 0.0, 5.0)).magnitude() < 1e-5);
}

#[test]
fn centred_model_spins_in_place() {
    let mut viewer = loaded_viewer();
    for _ in 0..100 {
        viewer.tick();
    }
    let center = viewer.scene.model().unwrap().world_bounds().unwrap().center();
    assert!((center - Point3::new(0.0, 0.0, 0.0)).magnitude() < 1e-4);
}

#[test]
fn failed_load_leaves_scene_empty_with_banner() {
    let mut viewer = viewer();
    viewer.on_model_loaded(Err(LoadError::Status {
        file: "male_ecorche.obj".to_string(),
        status: 404,
    }));
    assert_eq!(viewer.scene.model_count(), 0);
    let banner = viewer.banner.current().expect("banner should be visible");
    assert!(banner.message.starts_with("Error loading model:"));
    assert!(banner.message.contains("404"));
    // Ticking an empty scene is fine.
    viewer.tick();
}

#[test]
fn wireframe_toggle_flips_every_mesh() {
    let mut viewer = loaded_viewer();
    viewer.perform(Action::ToggleWireframe);
    assert!(viewer.scene.model().unwrap().meshes.iter().all(|m| m.material.wireframe));
    viewer.perform(Action::ToggleWireframe);
    assert!(viewer.scene.model().unwrap().meshes.iter().all(|m| !m.material.wireframe));
}

#[test]
fn manual_orbit_only_while_not_rotating() {
    let mut viewer = loaded_viewer();
    assert!(!viewer.controller.enabled);
    viewer.controller.handle_mouse(200.0, 0.0, 600);
    viewer.tick();
    assert!((viewer.camera.position.x).abs() < 1e-5);

    viewer.perform(Action::ToggleRotation);
    assert!(viewer.controller.enabled);
    viewer.controller.handle_mouse(200.0, 0.0, 600);
    viewer.tick();
    assert!(viewer.camera.position.x.abs() > 1e-3);
}

#[test]
fn reset_view_returns_camera_home() {
    let mut viewer = loaded_viewer();
    viewer.perform(Action::ToggleRotation);
    viewer.controller.handle_mouse(300.0, 100.0, 600);
    viewer.controller.handle_scroll(1.0);
    for _ in 0..30 {
        viewer.tick();
    }
    assert_ne!(viewer.camera.position, Point3::new(0.0, 0.0, 5.0));

    viewer.perform(Action::ResetView);
    assert_eq!(viewer.camera.position, Point3::new(0.0, 0.0, 5.0));
    assert_eq!(viewer.camera.target, Point3::new(0.0, 0.0, 0.0));
    viewer.tick();
    assert!((viewer.camera.position - Point3::new(0.0, 0.0, 5.0)).magnitude() < 1e-4);
}

#[test]
fn resize_updates_aspect_and_ignores_zero() {
    let mut viewer = viewer();
    assert!(viewer.resize(1024, 512));
    assert!((viewer.projection.aspect - 2.0).abs() < 1e-6);
    assert!(!viewer.resize(0, 512));
    assert_eq!((viewer.viewport.width, viewer.viewport.height), (1024, 512));
}

#[test]
fn second_model_replaces_the_first() {
    let mut viewer = loaded_viewer();
    viewer.on_model_loaded(Ok(parse(OFFSET_QUAD)));
    assert_eq!(viewer.scene.model_count(), 1);
}
