use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::Context;
use parking_lot::{Mutex, RwLock};
use rayon::prelude::*;

use crate::assets::animation::AnimatedImage;
use crate::assets::catalog::{AssetCatalog, AssetKey, AssetRef, identifier_stem};
use crate::assets::codec;
use crate::behavior::state::PetState;
use crate::config::AssetConfig;
use crate::foundation::core::FrameSize;
use crate::foundation::error::{PetError, PetResult};
use crate::foundation::rng::PetRng;

#[derive(Default)]
struct Slot {
    image: Mutex<Option<Arc<AnimatedImage>>>,
    decodes: AtomicUsize,
}

/// Lazily populated, never-evicted store of decoded animations.
///
/// Each identifier gets its own slot; the slot lock spans check, decode and store, so concurrent
/// first requests for one identifier share a single decode while distinct identifiers decode in
/// parallel. A failed decode leaves the slot empty and the identifier is retried on next request.
pub struct AnimationCache {
    catalog: AssetCatalog,
    normalize: HashSet<String>,
    reference_size: RwLock<Option<FrameSize>>,
    slots: Mutex<HashMap<AssetKey, Arc<Slot>>>,
    rng: Mutex<PetRng>,
}

impl AnimationCache {
    fn new(catalog: AssetCatalog, normalize: &[String], rng: PetRng) -> Self {
        Self {
            catalog,
            normalize: normalize.iter().map(|n| identifier_stem(n)).collect(),
            reference_size: RwLock::new(None),
            slots: Mutex::new(HashMap::new()),
            rng: Mutex::new(rng),
        }
    }

    /// Create a cache over `catalog` and fix the reference size from the baseline identifiers.
    ///
    /// The reference size is settled before any other identifier can be decoded.
    #[tracing::instrument(skip_all, fields(root = %catalog.root().display()))]
    pub fn load_assets(catalog: AssetCatalog, cfg: &AssetConfig, rng: PetRng) -> Self {
        let cache = Self::new(catalog, &cfg.normalize, rng);
        cache.init_reference_size(&cfg.reference);
        cache
    }

    /// Catalog the cache draws from.
    pub fn catalog(&self) -> &AssetCatalog {
        &self.catalog
    }

    /// Size every normalized asset is resized to, once known.
    pub fn reference_size(&self) -> Option<FrameSize> {
        *self.reference_size.read()
    }

    /// Decode the first baseline identifier that works and record its first frame's size.
    ///
    /// Runs once, on an empty cache. The baseline decode stays cached. Without any decodable
    /// baseline, normalization is off.
    fn init_reference_size<S: AsRef<str>>(&self, reference: &[S]) -> Option<FrameSize> {
        for asset in self.catalog.resolve_all(reference) {
            match self.get_or_load(&asset) {
                Ok(anim) => {
                    let size = anim.size();
                    *self.reference_size.write() = Some(size);
                    tracing::info!(asset = %asset.key, %size, "reference size fixed");
                    return Some(size);
                }
                Err(err) => {
                    tracing::warn!(asset = %asset.key, %err, "baseline asset failed to decode");
                }
            }
        }
        tracing::warn!("no baseline asset decoded; normalization disabled");
        None
    }

    /// `true` when `asset` is resized to the reference size.
    pub fn is_normalized(&self, asset: &AssetRef) -> bool {
        let file_name = asset
            .path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        self.normalize.contains(&identifier_stem(&file_name))
    }

    /// Random animation for `state`, or `None` when the state has no candidates or the chosen
    /// candidate fails to decode.
    pub fn get_random_animation(&self, state: PetState) -> Option<Arc<AnimatedImage>> {
        let candidates = self.catalog.candidates(state);
        let asset = self.rng.lock().choose(candidates)?.clone();
        match self.get_or_load(&asset) {
            Ok(anim) => Some(anim),
            Err(err) => {
                tracing::warn!(state = %state, asset = %asset.key, %err, "animation unavailable");
                None
            }
        }
    }

    /// Resolve `name` through the catalog and return its animation.
    pub fn load(&self, name: &str) -> PetResult<Arc<AnimatedImage>> {
        let asset = self.catalog.resolve(name).ok_or_else(|| {
            PetError::validation(format!(
                "no sprite named '{name}' under '{}'",
                self.catalog.root().display()
            ))
        })?;
        self.get_or_load(&asset)
    }

    /// Cached animation for `asset`, decoding it on first use.
    pub fn get_or_load(&self, asset: &AssetRef) -> PetResult<Arc<AnimatedImage>> {
        let slot = self.slot(&asset.key);
        let mut image = slot.image.lock();
        if let Some(cached) = image.as_ref() {
            tracing::trace!(asset = %asset.key, "cache hit");
            return Ok(cached.clone());
        }

        slot.decodes.fetch_add(1, Ordering::SeqCst);
        let normalize_to = if self.is_normalized(asset) {
            self.reference_size()
        } else {
            None
        };
        let decoded = codec::decode_file(self.catalog.codecs(), &asset.path, normalize_to)?;
        let decoded = Arc::new(decoded);
        tracing::debug!(
            asset = %asset.key,
            frames = decoded.frame_count(),
            size = %decoded.size(),
            normalized = normalize_to.is_some(),
            "decoded animation"
        );
        *image = Some(decoded.clone());
        Ok(decoded)
    }

    /// Decode every resolvable identifier in `names` in parallel. Returns how many are cached.
    #[tracing::instrument(skip_all, fields(count = names.len()))]
    pub fn preload_assets<S: AsRef<str>>(&self, names: &[S]) -> usize {
        let assets = self.catalog.resolve_all(names);
        let loaded = assets
            .par_iter()
            .filter(|asset| match self.get_or_load(asset) {
                Ok(_) => true,
                Err(err) => {
                    tracing::warn!(asset = %asset.key, %err, "preload failed");
                    false
                }
            })
            .count();
        tracing::info!(loaded, requested = names.len(), "preload finished");
        loaded
    }

    /// Run [`AnimationCache::preload_assets`] on a background thread.
    pub fn spawn_preload(
        self: &Arc<Self>,
        names: Vec<String>,
    ) -> PetResult<std::thread::JoinHandle<usize>> {
        let cache = Arc::clone(self);
        let handle = std::thread::Builder::new()
            .name("deskpet-preload".to_string())
            .spawn(move || cache.preload_assets(&names))
            .context("spawn preload thread")?;
        Ok(handle)
    }

    /// `true` when `key` holds a decoded animation.
    pub fn is_cached(&self, key: &AssetKey) -> bool {
        let slot = self.slots.lock().get(key).cloned();
        slot.is_some_and(|slot| slot.image.lock().is_some())
    }

    /// How many decodes have run for `key`, failures included.
    pub fn decode_count(&self, key: &AssetKey) -> usize {
        self.slots
            .lock()
            .get(key)
            .map_or(0, |slot| slot.decodes.load(Ordering::SeqCst))
    }

    fn slot(&self, key: &AssetKey) -> Arc<Slot> {
        self.slots.lock().entry(key.clone()).or_default().clone()
    }
}

impl std::fmt::Debug for AnimationCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimationCache")
            .field("root", &self.catalog.root())
            .field("reference_size", &self.reference_size())
            .field("slots", &self.slots.lock().len())
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/cache.rs"]
mod tests;
