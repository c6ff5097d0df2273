//! End-to-end run of the construct / shrink / resize scenario

use asteroid_ring::sim::PoolChange;
use asteroid_ring::{
    Asteroid, AsteroidError, ColorPalette, CoreColor, ParamField, ParameterStore, Parameters,
    Recompute, Scene,
};

#[test]
fn test_construct_shrink_resize() {
    let params = Parameters {
        n_particles: 300,
        min_radius: 30.0,
        max_radius: 50.0,
        ..Default::default()
    };
    let store = ParameterStore::new(params, ColorPalette::default()).unwrap();
    let mut scene = Scene::new(store);
    scene.spawn_asteroid(20.0, CoreColor::default(), 2024).unwrap();

    let ring = scene.asteroid().unwrap().ring();
    assert_eq!(ring.len(), 300);
    assert!(ring.iter().all(|p| p.distance >= 30.0 && p.distance < 50.0));

    for _ in 0..60 {
        scene.tick().unwrap();
    }

    let report = scene.apply_changes(&[(ParamField::NParticles, 50.0)]).unwrap();
    assert_eq!(report.recompute, Recompute::Pool);
    assert_eq!(report.pool, Some(PoolChange { added: 0, removed: 250 }));
    assert_eq!(scene.asteroid().unwrap().ring().len(), 50);

    let report = scene
        .apply_changes(&[(ParamField::MinSize, 2.0), (ParamField::MaxSize, 2.0)])
        .unwrap();
    assert!(report.rejected.is_empty());
    assert!(scene.asteroid().unwrap().ring().iter().all(|p| p.scale == 2.0));

    // Layout survives further frames
    for _ in 0..60 {
        scene.tick().unwrap();
    }
    let object = scene.asteroid().unwrap().asteroid_object();
    assert_eq!(object.particle_instances().len(), 50);
}

#[test]
fn test_direct_entity_api() {
    let mut params = Parameters::default();
    let mut asteroid = Asteroid::with_defaults(&params, &ColorPalette::default(), 1).unwrap();

    params.n_particles = 50;
    asteroid.update_particles_count(&params).unwrap();
    assert_eq!(asteroid.ring().len(), 50);

    // Same target again converges without touching the ring size
    let change = asteroid.update_particles_count(&params).unwrap();
    assert!(change.is_noop());
    assert_eq!(asteroid.ring().len(), 50);

    params.min_size = 2.0;
    params.max_size = 2.0;
    asteroid.update_particles_definition(&params);
    assert!(asteroid.ring().iter().all(|p| p.scale == 2.0));

    asteroid.update(&params);
}

#[test]
fn test_scene_without_asteroid_fails_loudly() {
    let mut scene = Scene::new(ParameterStore::default());
    let err = scene.tick().unwrap_err();
    assert!(matches!(err, AsteroidError::MissingCollaborator(_)));
    assert!(err.to_string().contains("asteroid"));
}

#[test]
fn test_preset_roundtrip_through_scene() {
    let preset = Parameters::from_json(r#"{ "nParticles": 7, "coreRotation": -0.02 }"#).unwrap();
    let store = ParameterStore::new(preset, ColorPalette::default()).unwrap();
    let mut scene = Scene::new(store);
    scene.spawn_asteroid(15.0, CoreColor::FromPalette, 8).unwrap();
    assert_eq!(scene.asteroid().unwrap().ring().len(), 7);

    scene.tick().unwrap();
    let rotation = scene.asteroid().unwrap().core().rotation_y;
    assert!((rotation - 0.02).abs() < 1e-6);
}
