//! Owning context for the parameter store and the asteroid
//!
//! A control panel hands over a batch of field changes; the scene applies
//! them, merges what they require, and recomputes once. [`SharedScene`] puts
//! the whole thing behind a mutex so a UI thread and the frame loop never see
//! a half-applied batch.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::asteroid::{Asteroid, CoreColor};
use crate::error::{AsteroidError, Result};
use crate::params::{ParamError, ParamField, ParameterStore, Parameters, Recompute};
use crate::sim::PoolChange;

/// Outcome of applying a batch of parameter changes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangeReport {
    /// Recompute that was run for the batch
    pub recompute: Recompute,
    /// Changes that were rejected; the store kept the previous values
    pub rejected: Vec<ParamError>,
    /// Ring change, when the pool was reconciled
    pub pool: Option<PoolChange>,
}

/// Parameter store plus the asteroid it drives
pub struct Scene {
    store: ParameterStore,
    asteroid: Option<Asteroid>,
    ticks: u64,
}

impl Scene {
    pub fn new(store: ParameterStore) -> Self {
        Self {
            store,
            asteroid: None,
            ticks: 0,
        }
    }

    pub fn store(&self) -> &ParameterStore {
        &self.store
    }

    pub fn params(&self) -> &Parameters {
        self.store.get()
    }

    /// Frames advanced so far
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Build the asteroid from the current parameters, replacing any previous one
    pub fn spawn_asteroid(&mut self, radius: f32, core_color: CoreColor, seed: u64) -> Result<&Asteroid> {
        let asteroid = Asteroid::new(self.store.get(), self.store.palette(), radius, core_color, seed)?;
        Ok(&*self.asteroid.insert(asteroid))
    }

    pub fn asteroid(&self) -> Result<&Asteroid> {
        self.asteroid
            .as_ref()
            .ok_or(AsteroidError::MissingCollaborator("asteroid"))
    }

    /// Advance one frame
    pub fn tick(&mut self) -> Result<()> {
        let asteroid = self
            .asteroid
            .as_mut()
            .ok_or(AsteroidError::MissingCollaborator("asteroid"))?;
        asteroid.update(self.store.get());
        self.ticks += 1;
        Ok(())
    }

    /// Apply field changes in order, then run the merged recompute once.
    ///
    /// Rejected changes are logged and reported, the rest still apply.
    pub fn apply_changes(&mut self, changes: &[(ParamField, f64)]) -> Result<ChangeReport> {
        if self.asteroid.is_none() {
            return Err(AsteroidError::MissingCollaborator("asteroid"));
        }

        let mut report = ChangeReport::default();
        for &(field, value) in changes {
            match self.store.set(field, value) {
                Ok(recompute) => report.recompute = report.recompute.merge(recompute),
                Err(e) => {
                    log::warn!("{}", e);
                    report.rejected.push(e);
                }
            }
        }

        report.pool = self.recompute(report.recompute)?;
        Ok(report)
    }

    /// Replace all parameters at once (presets)
    pub fn apply_preset(&mut self, params: Parameters) -> Result<Recompute> {
        if self.asteroid.is_none() {
            return Err(AsteroidError::MissingCollaborator("asteroid"));
        }
        let recompute = self.store.apply(params)?;
        self.recompute(recompute)?;
        Ok(recompute)
    }

    /// Rebuild the ring from the current snapshot.
    ///
    /// Restores `ring.len() == n_particles` and the layout after a batch was
    /// interrupted partway.
    pub fn resync(&mut self) -> Result<()> {
        if self.asteroid.is_none() {
            return Ok(());
        }
        self.recompute(Recompute::Pool).map(|_| ())
    }

    fn recompute(&mut self, recompute: Recompute) -> Result<Option<PoolChange>> {
        let asteroid = self
            .asteroid
            .as_mut()
            .ok_or(AsteroidError::MissingCollaborator("asteroid"))?;
        let params = self.store.get();
        match recompute {
            Recompute::None => Ok(None),
            Recompute::Layout => {
                asteroid.update_particles_definition(params);
                Ok(None)
            }
            Recompute::Pool => asteroid.update_particles_count(params).map(Some),
        }
    }
}

/// Scene shared between a frame loop and a control thread
#[derive(Clone)]
pub struct SharedScene(Arc<Mutex<Scene>>);

impl SharedScene {
    pub fn new(scene: Scene) -> Self {
        Self(Arc::new(Mutex::new(scene)))
    }

    /// Lock the scene. A poisoned lock means a holder panicked mid-batch, so
    /// the scene is resynced to its snapshot before anyone sees it again.
    fn lock(&self) -> MutexGuard<'_, Scene> {
        self.0.lock().unwrap_or_else(|poisoned| {
            let mut scene = poisoned.into_inner();
            log::warn!("Scene lock was poisoned, resyncing ring to parameters");
            if let Err(e) = scene.resync() {
                log::error!("Scene resync failed: {}", e);
            }
            self.0.clear_poison();
            scene
        })
    }

    pub fn tick(&self) -> Result<()> {
        self.lock().tick()
    }

    pub fn apply_changes(&self, changes: &[(ParamField, f64)]) -> Result<ChangeReport> {
        self.lock().apply_changes(changes)
    }

    /// Run `f` with exclusive access to the scene
    pub fn with<T>(&self, f: impl FnOnce(&mut Scene) -> T) -> T {
        f(&mut self.lock())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn scene_with_asteroid() -> Scene {
        let mut scene = Scene::new(ParameterStore::default());
        scene.spawn_asteroid(20.0, CoreColor::default(), 42).unwrap();
        scene
    }

    #[test]
    fn test_missing_asteroid_is_reported() {
        let mut scene = Scene::new(ParameterStore::default());
        assert!(matches!(
            scene.tick(),
            Err(AsteroidError::MissingCollaborator("asteroid"))
        ));
        assert!(matches!(
            scene.apply_changes(&[(ParamField::NParticles, 10.0)]),
            Err(AsteroidError::MissingCollaborator(_))
        ));
        // Nothing was applied
        assert_eq!(scene.params().n_particles, 300);
    }

    #[test]
    fn test_batch_runs_merged_recompute() {
        let mut scene = scene_with_asteroid();
        let report = scene
            .apply_changes(&[
                (ParamField::MinSize, 1.0),
                (ParamField::NParticles, 64.0),
                (ParamField::CoreRotation, 0.02),
            ])
            .unwrap();
        assert_eq!(report.recompute, Recompute::Pool);
        assert_eq!(report.pool, Some(PoolChange { added: 0, removed: 236 }));
        assert_eq!(scene.asteroid().unwrap().ring().len(), 64);
    }

    #[test]
    fn test_layout_only_batch() {
        let mut scene = scene_with_asteroid();
        let report = scene
            .apply_changes(&[(ParamField::MinSize, 2.0), (ParamField::MaxSize, 2.0)])
            .unwrap();
        assert_eq!(report.recompute, Recompute::Layout);
        assert!(report.pool.is_none());
        assert!(scene.asteroid().unwrap().ring().iter().all(|p| p.scale == 2.0));
    }

    #[test]
    fn test_rejected_change_keeps_last_valid() {
        let mut scene = scene_with_asteroid();
        let report = scene
            .apply_changes(&[(ParamField::MinRadius, 59.0), (ParamField::MaxRadius, 45.0)])
            .unwrap();
        // minRadius 59 < maxRadius 50 fails, maxRadius 45 > minRadius 30 succeeds
        assert_eq!(report.rejected.len(), 1);
        assert_eq!(scene.params().min_radius, 30.0);
        assert_eq!(scene.params().max_radius, 45.0);
        assert!(
            scene
                .asteroid()
                .unwrap()
                .ring()
                .iter()
                .all(|p| (30.0..45.0).contains(&p.distance))
        );
    }

    #[test]
    fn test_apply_preset() {
        let mut scene = scene_with_asteroid();
        let preset = Parameters {
            n_particles: 3,
            ..Default::default()
        };
        assert_eq!(scene.apply_preset(preset).unwrap(), Recompute::Pool);
        assert_eq!(scene.asteroid().unwrap().ring().len(), 3);
    }

    #[test]
    fn test_tick_counts_frames() {
        let mut scene = scene_with_asteroid();
        for _ in 0..5 {
            scene.tick().unwrap();
        }
        assert_eq!(scene.ticks(), 5);
    }

    #[test]
    fn test_interrupted_batch_is_resynced() {
        let shared = SharedScene::new(scene_with_asteroid());

        let writer = {
            let shared = shared.clone();
            thread::spawn(move || {
                shared.with(|scene| {
                    scene.store.set(ParamField::NParticles, 5.0).unwrap();
                    panic!("interrupted before recompute");
                })
            })
        };
        assert!(writer.join().is_err());
        assert!(shared.0.is_poisoned());

        shared.tick().unwrap();
        assert!(!shared.0.is_poisoned());
        shared.with(|scene| {
            assert_eq!(scene.params().n_particles, 5);
            assert_eq!(scene.asteroid().unwrap().ring().len(), 5);
        });
    }

    #[test]
    fn test_resync_without_asteroid() {
        let mut scene = Scene::new(ParameterStore::default());
        assert!(scene.resync().is_ok());
    }

    #[test]
    fn test_shared_scene_across_threads() {
        let shared = SharedScene::new(scene_with_asteroid());

        let control = {
            let shared = shared.clone();
            thread::spawn(move || {
                for n in [10.0, 200.0, 1.0, 75.0] {
                    shared.apply_changes(&[(ParamField::NParticles, n)]).unwrap();
                }
            })
        };
        for _ in 0..100 {
            shared.tick().unwrap();
            shared.with(|scene| {
                let len = scene.asteroid().unwrap().ring().len();
                assert_eq!(len, scene.params().n_particles as usize);
            });
        }
        control.join().unwrap();

        shared.with(|scene| {
            assert_eq!(scene.asteroid().unwrap().ring().len(), 75);
            assert_eq!(scene.ticks(), 100);
        });
    }
}
