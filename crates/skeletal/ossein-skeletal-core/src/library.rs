//! Name-keyed asset cache, injected into whatever owns the instances.
//!
//! Assets load once, land behind an `Arc`, and every later lookup by the
//! same name returns the shared handle. Load failures log a diagnostic and
//! surface the error; the asset simply stays unavailable.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use hashbrown::HashMap;

use crate::clip::AnimationClip;
use crate::error::LoadError;
use crate::loader::{parse_clip_json, parse_skeleton_json};
use crate::skeleton::Skeleton;

#[derive(Default)]
pub struct AssetLibrary {
    skeletons: HashMap<String, Arc<Skeleton>>,
    clips: HashMap<String, Arc<AnimationClip>>,
}

impl AssetLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load an `itpskel` file, or return the cached handle for `name`.
    pub fn load_skeleton(&mut self, name: &str, path: &Path) -> Result<Arc<Skeleton>, LoadError> {
        if let Some(skeleton) = self.skeletons.get(name) {
            return Ok(Arc::clone(skeleton));
        }
        let contents = read_file(path)?;
        match parse_skeleton_json(&contents) {
            Ok(skeleton) => Ok(self.insert_skeleton(name, skeleton)),
            Err(err) => {
                log::error!("skeleton {name:?} failed to load from {}: {err}", path.display());
                Err(err)
            }
        }
    }

    /// Load an `itpanim` file, or return the cached handle for `name`.
    pub fn load_clip(&mut self, name: &str, path: &Path) -> Result<Arc<AnimationClip>, LoadError> {
        if let Some(clip) = self.clips.get(name) {
            return Ok(Arc::clone(clip));
        }
        let contents = read_file(path)?;
        match parse_clip_json(&contents) {
            Ok(clip) => Ok(self.insert_clip(name, clip)),
            Err(err) => {
                log::error!("clip {name:?} failed to load from {}: {err}", path.display());
                Err(err)
            }
        }
    }

    /// Register an already-built skeleton under `name`.
    pub fn insert_skeleton(&mut self, name: &str, skeleton: Skeleton) -> Arc<Skeleton> {
        let handle = Arc::new(skeleton);
        self.skeletons.insert(name.to_string(), Arc::clone(&handle));
        handle
    }

    /// Register an already-built clip under `name`.
    pub fn insert_clip(&mut self, name: &str, clip: AnimationClip) -> Arc<AnimationClip> {
        let handle = Arc::new(clip);
        self.clips.insert(name.to_string(), Arc::clone(&handle));
        handle
    }

    pub fn skeleton(&self, name: &str) -> Option<Arc<Skeleton>> {
        self.skeletons.get(name).map(Arc::clone)
    }

    pub fn clip(&self, name: &str) -> Option<Arc<AnimationClip>> {
        self.clips.get(name).map(Arc::clone)
    }
}

fn read_file(path: &Path) -> Result<String, LoadError> {
    fs::read_to_string(path).map_err(|source| {
        log::error!("file not found or unreadable: {}", path.display());
        LoadError::Io {
            path: path.display().to_string(),
            source,
        }
    })
}
