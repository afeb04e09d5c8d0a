use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::assets::codec::CodecRegistry;
use crate::behavior::state::PetState;
use crate::foundation::error::{PetError, PetResult};

/// Case-insensitive identity of a sprite file, used as the cache key.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AssetKey(String);

impl AssetKey {
    /// Key for `path`: separators folded to `/`, ASCII-lowercased.
    pub fn for_path(path: &Path) -> Self {
        let text = path.to_string_lossy().replace('\\', "/");
        Self(text.to_ascii_lowercase())
    }

    /// Normalized key text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AssetKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Sprite file found on disk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssetRef {
    /// Identifier it was resolved from (e.g. `"cool"`).
    pub name: String,
    /// Existing file.
    pub path: PathBuf,
    /// Cache key derived from `path`.
    pub key: AssetKey,
}

/// Validate a catalog identifier: a bare file name or stem, no directories.
pub fn validate_identifier(name: &str) -> PetResult<&str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(PetError::validation("asset identifier must be non-empty"));
    }
    if name.contains(['/', '\\']) || name == "." || name == ".." {
        return Err(PetError::validation(format!(
            "asset identifier '{name}' must be a plain file name"
        )));
    }
    Ok(name)
}

/// Stem of an identifier or file path, lowercased (`"Cool.GIF"` -> `"cool"`).
pub fn identifier_stem(name: &str) -> String {
    Path::new(name)
        .file_stem()
        .map(|s| s.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default()
}

/// Resolves identifiers against an asset root and holds the per-state candidate lists.
#[derive(Clone, Debug)]
pub struct AssetCatalog {
    root: PathBuf,
    codecs: CodecRegistry,
    entries: BTreeMap<PetState, Vec<AssetRef>>,
}

impl AssetCatalog {
    /// Catalog with no state entries yet.
    pub fn new(root: impl Into<PathBuf>, codecs: CodecRegistry) -> Self {
        Self {
            root: root.into(),
            codecs,
            entries: BTreeMap::new(),
        }
    }

    /// Resolve every state's candidate identifiers, dropping those with no file on disk.
    #[tracing::instrument(skip_all)]
    pub fn build(
        root: impl AsRef<Path>,
        codecs: CodecRegistry,
        table: &BTreeMap<PetState, Vec<String>>,
    ) -> Self {
        let mut catalog = Self::new(root.as_ref(), codecs);
        tracing::debug!(root = %catalog.root.display(), "building sprite catalog");
        for (state, names) in table {
            let found = catalog.resolve_all(names);
            tracing::info!(state = %state, candidates = found.len(), "catalog entry");
            catalog.entries.insert(*state, found);
        }
        catalog
    }

    /// Asset root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Codecs used for extension resolution.
    pub fn codecs(&self) -> &CodecRegistry {
        &self.codecs
    }

    /// Candidates for `state`; empty when none exist.
    pub fn candidates(&self, state: PetState) -> &[AssetRef] {
        self.entries.get(&state).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Resolve identifiers in order, skipping those that do not exist.
    pub fn resolve_all<S: AsRef<str>>(&self, names: &[S]) -> Vec<AssetRef> {
        names
            .iter()
            .filter_map(|n| self.resolve(n.as_ref()))
            .collect()
    }

    /// Find the file for one identifier.
    ///
    /// A name with a supported extension is used as-is; a bare stem is tried with every codec
    /// extension in registry order. Invalid or missing names yield `None`.
    pub fn resolve(&self, name: &str) -> Option<AssetRef> {
        let name = match validate_identifier(name) {
            Ok(n) => n,
            Err(err) => {
                tracing::warn!(%err, "skipping catalog identifier");
                return None;
            }
        };

        let direct = self.root.join(name);
        if self.codecs.for_path(&direct).is_some() {
            return Self::existing(name, direct);
        }

        let found = self
            .codecs
            .extensions()
            .find_map(|ext| Self::existing(name, self.root.join(format!("{name}.{ext}"))));
        if found.is_none() {
            tracing::debug!(name, "no sprite file for identifier");
        }
        found
    }

    fn existing(name: &str, path: PathBuf) -> Option<AssetRef> {
        if !path.is_file() {
            return None;
        }
        Some(AssetRef {
            name: name.to_string(),
            key: AssetKey::for_path(&path),
            path,
        })
    }
}

/// Locate the sprite directory named `subdir`.
///
/// Probes `base_dir/subdir`, then `cwd/subdir`, then `subdir` under every ancestor of `base_dir`;
/// the first existing directory wins.
pub fn find_asset_root(subdir: &str, base_dir: &Path, cwd: &Path) -> Option<PathBuf> {
    std::iter::once(base_dir.join(subdir))
        .chain(std::iter::once(cwd.join(subdir)))
        .chain(base_dir.ancestors().skip(1).map(|dir| dir.join(subdir)))
        .find(|candidate| candidate.is_dir())
}

#[cfg(test)]
#[path = "../../tests/unit/assets/catalog.rs"]
mod tests;
