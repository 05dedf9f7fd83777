use std::{
    collections::{BTreeMap, HashMap},
    fs, io,
    path::{Path, PathBuf},
};

use invaders_core::SpriteKey;
use invaders_rendering::ResourceLoadError;
use macroquad::texture::Texture2D;

const SUPPORTED_MANIFEST_VERSION: u32 = 1;

/// Lazily populated cache of textures named by the sprite manifest.
#[derive(Debug)]
pub(crate) struct SpriteAtlas {
    paths: BTreeMap<SpriteKey, PathBuf>,
    textures: HashMap<SpriteKey, Texture2D>,
}

impl SpriteAtlas {
    /// Reads the manifest at `path` without touching any image.
    pub(crate) fn from_manifest_path(path: &Path) -> Result<Self, ResourceLoadError> {
        let contents = fs::read_to_string(path).map_err(|error| ResourceLoadError::Manifest {
            reason: format!("failed to read {}: {error}", path.display()),
        })?;
        let base = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Ok(Self::from_entries(parse_manifest(&contents, &base)?))
    }

    fn from_entries(entries: Vec<(SpriteKey, PathBuf)>) -> Self {
        Self {
            paths: entries.into_iter().collect(),
            textures: HashMap::new(),
        }
    }

    /// Returns the texture for `key`, loading it on first use.
    pub(crate) fn load(&mut self, key: SpriteKey) -> Result<Texture2D, ResourceLoadError> {
        self.load_with(key, default_loader)
    }

    fn load_with(
        &mut self,
        key: SpriteKey,
        loader: impl FnOnce(SpriteKey, &Path) -> Result<Texture2D, ResourceLoadError>,
    ) -> Result<Texture2D, ResourceLoadError> {
        if let Some(texture) = self.textures.get(&key) {
            return Ok(*texture);
        }

        let path = self
            .paths
            .get(&key)
            .ok_or(ResourceLoadError::Missing { key })?;
        let texture = loader(key, path)?;
        log::info!("loaded sprite {key:?} from {}", path.display());
        let _ = self.textures.insert(key, texture);
        Ok(texture)
    }

    /// Retrieves an already loaded texture.
    pub(crate) fn texture(&self, key: SpriteKey) -> Option<Texture2D> {
        self.textures.get(&key).copied()
    }
}

fn default_loader(key: SpriteKey, path: &Path) -> Result<Texture2D, ResourceLoadError> {
    let bytes = fs::read(path).map_err(|source| unreadable(key, path, source))?;
    let image = decode_image(key, path, &bytes)?;
    Ok(Texture2D::from_rgba8(image.width, image.height, &image.rgba))
}

fn unreadable(key: SpriteKey, path: &Path, source: io::Error) -> ResourceLoadError {
    ResourceLoadError::Unreadable {
        key,
        path: path.to_path_buf(),
        source,
    }
}

/// RGBA pixels ready for texture upload.
#[derive(Debug)]
struct DecodedImage {
    width: u16,
    height: u16,
    rgba: Vec<u8>,
}

/// Decodes `bytes` before they reach macroquad, which panics on corrupt data.
fn decode_image(
    key: SpriteKey,
    path: &Path,
    bytes: &[u8],
) -> Result<DecodedImage, ResourceLoadError> {
    let invalid = |reason: String| {
        unreadable(key, path, io::Error::new(io::ErrorKind::InvalidData, reason))
    };

    let rgba = image::load_from_memory(bytes)
        .map_err(|error| invalid(format!("failed to decode image: {error}")))?
        .to_rgba8();
    let (width, height) = rgba.dimensions();
    let (Ok(width), Ok(height)) = (u16::try_from(width), u16::try_from(height)) else {
        return Err(invalid(format!("image is too large: {width}x{height}")));
    };

    Ok(DecodedImage {
        width,
        height,
        rgba: rgba.into_raw(),
    })
}

#[derive(Debug, serde::Deserialize)]
struct Manifest {
    version: u32,
    sprites: HashMap<String, String>,
}

fn manifest_error(reason: impl Into<String>) -> ResourceLoadError {
    ResourceLoadError::Manifest {
        reason: reason.into(),
    }
}

fn parse_manifest(
    contents: &str,
    base_path: &Path,
) -> Result<Vec<(SpriteKey, PathBuf)>, ResourceLoadError> {
    let manifest: Manifest = toml::from_str(contents)
        .map_err(|error| manifest_error(format!("failed to parse toml contents: {error}")))?;
    if manifest.version != SUPPORTED_MANIFEST_VERSION {
        return Err(manifest_error(format!(
            "unsupported version {}; expected {SUPPORTED_MANIFEST_VERSION}",
            manifest.version
        )));
    }

    let mut resolved = HashMap::new();
    for (name, relative_path) in manifest.sprites {
        let key = parse_sprite_key(&name)
            .ok_or_else(|| manifest_error(format!("unknown sprite key `{name}`")))?;
        if resolved.insert(key, base_path.join(relative_path)).is_some() {
            return Err(manifest_error(format!("duplicate entry for {key:?}")));
        }
    }

    let mut ordered = Vec::with_capacity(SpriteKey::ALL.len());
    for key in SpriteKey::ALL {
        let Some(path) = resolved.remove(&key) else {
            return Err(manifest_error(format!("missing entry for {key:?}")));
        };
        ordered.push((key, path));
    }

    Ok(ordered)
}

fn parse_sprite_key(name: &str) -> Option<SpriteKey> {
    match name {
        "Background" => Some(SpriteKey::Background),
        "Player" => Some(SpriteKey::Player),
        "Alien" => Some(SpriteKey::Alien),
        "Bullet" => Some(SpriteKey::Bullet),
        _ => None,
    }
}
