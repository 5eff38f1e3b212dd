use std::path::{Path, PathBuf};

use bevy::{
    asset::{AssetLoader, LoadContext, io::Reader},
    platform::collections::HashMap,
    prelude::*,
    tasks::ConditionalSendFuture,
};
use normalize_path::NormalizePath;
use thiserror::Error;
use tiled::{LayerType, Properties, PropertyValue};

use crate::assets::map::{TileLocation, TileMapData, TileScale};

/// Name of the boolean tile property that marks a tile as a wall.
pub const WALL_PROPERTY: &str = "wall";

/// Asset loader turning a Tiled map (.tmx) into a [`TileMapData`].
///
/// - The first finite tile layer becomes the tile grid
/// - Tiles must come from image collection tilesets (one image per tile); tiles
///   sharing an image share a tileset slot
/// - Tiles with a `wall = true` custom property become walls
/// - The map's tile width selects the [`TileScale`]
#[derive(Default)]
pub struct TileMapDataLoader;

#[derive(Debug, Error)]
pub enum TileMapLoaderError {
    #[error("Failed to load map: {0}")]
    TiledError(#[from] tiled::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Map has no finite tile layer")]
    NoTileLayer,

    #[error("Tile {tile_id} of tileset {tileset_index} has no image of its own (atlas tilesets are not supported)")]
    AtlasTile { tileset_index: usize, tile_id: u32 },

    #[error("Map uses more distinct tiles than a tileset can index")]
    TilesetOverflow,

    #[error("Unsupported tile size {0}px (expected 8, 16 or 32)")]
    UnsupportedTileSize(u32),
}

impl AssetLoader for TileMapDataLoader {
    type Asset = TileMapData;
    type Settings = ();
    type Error = TileMapLoaderError;

    fn load(
        &self,
        _reader: &mut dyn Reader,
        _settings: &Self::Settings,
        load_context: &mut LoadContext,
    ) -> impl ConditionalSendFuture<Output = Result<Self::Asset, Self::Error>> {
        async move {
            // The tiled loader reads directly from the filesystem
            let asset_path = load_context.asset_path().path().to_path_buf();
            let full_path = Path::new("assets").join(&asset_path);

            let mut loader = tiled::Loader::new();
            let map = loader.load_tmx_map(&full_path)?;

            let data = build_tile_map(&map, |source| {
                let image_path = image_asset_path(&asset_path, source)?;
                Ok(load_context.load(image_path))
            })?;

            debug!(
                "Loaded {}x{} tilemap {:?} with {} tile images",
                data.width(),
                data.height(),
                asset_path,
                data.tileset().len() - 1
            );

            Ok(data)
        }
    }

    fn extensions(&self) -> &[&str] {
        &["tmx"]
    }
}

/// Convert a parsed Tiled map into a [`TileMapData`].
///
/// `load_image` turns a tile image source (as reported by the tiled crate) into a
/// handle. Every distinct image source gets a single tileset slot.
fn build_tile_map(
    map: &tiled::Map,
    mut load_image: impl FnMut(&Path) -> Result<Handle<Image>, TileMapLoaderError>,
) -> Result<TileMapData, TileMapLoaderError> {
    let scale = TileScale::from_tile_width(map.tile_width)
        .ok_or(TileMapLoaderError::UnsupportedTileSize(map.tile_width))?;

    let Some((tile_layer, width, height)) = map.layers().find_map(|layer| match layer.layer_type() {
        LayerType::Tiles(tile_layer) => {
            let width = tile_layer.width()?;
            let height = tile_layer.height()?;
            Some((tile_layer, width, height))
        }
        _ => None,
    }) else {
        return Err(TileMapLoaderError::NoTileLayer);
    };

    // Tileset slot 0 stays transparent
    let mut data = TileMapData::new(width, height, vec![Handle::default()], scale);

    // (tileset index, local tile id) -> (slot in our tileset, wall flag)
    let mut tiles: HashMap<(usize, u32), (u16, bool)> = HashMap::default();
    // Image source -> slot, so tilesets sharing an image share a slot
    let mut slots: HashMap<PathBuf, u16> = HashMap::default();

    for row in 0..height {
        for column in 0..width {
            let Some(layer_tile) = tile_layer.get_tile(column as i32, row as i32) else {
                continue;
            };

            let key = (layer_tile.tileset_index(), layer_tile.id());
            let (slot, wall) = match tiles.get(&key).copied() {
                Some(entry) => entry,
                None => {
                    let Some(tile) = layer_tile.get_tile() else {
                        warn!(
                            "Tile at ({}, {}) references missing tile {} in tileset {}",
                            column, row, key.1, key.0
                        );
                        continue;
                    };
                    let Some(image) = tile.image.as_ref() else {
                        return Err(TileMapLoaderError::AtlasTile {
                            tileset_index: key.0,
                            tile_id: key.1,
                        });
                    };

                    let slot = match slots.get(&image.source).copied() {
                        Some(slot) => slot,
                        None => {
                            let handle = load_image(&image.source)?;
                            let slot = u16::try_from(data.tileset().len())
                                .map_err(|_| TileMapLoaderError::TilesetOverflow)?;
                            data.tileset_mut().push(handle);
                            slots.insert(image.source.clone(), slot);
                            slot
                        }
                    };
                    let wall = is_wall(&tile.properties);

                    tiles.insert(key, (slot, wall));
                    (slot, wall)
                }
            };

            let location = TileLocation::new(column, row);
            data.set_tile(location, slot);
            if wall {
                data.set_wall(location, true);
            }
        }
    }

    Ok(data)
}

/// Whether a tile's custom properties mark it as a wall.
fn is_wall(properties: &Properties) -> bool {
    matches!(
        properties.get(WALL_PROPERTY),
        Some(PropertyValue::BoolValue(true))
    )
}

/// Bevy asset path of a tile image.
///
/// The tiled crate reports image sources joined onto the map's filesystem directory,
/// so they usually start with `assets/`; that prefix is stripped. Other sources are
/// taken relative to the map's own asset directory. `..` and `.` are resolved.
fn image_asset_path(map_path: &Path, source: &Path) -> Result<String, TileMapLoaderError> {
    let source = source
        .to_str()
        .ok_or_else(|| TileMapLoaderError::InvalidPath(format!("Invalid UTF-8 in path: {:?}", source)))?
        .replace('\\', "/");

    let joined = match source.strip_prefix("assets/") {
        Some(stripped) => PathBuf::from(stripped),
        None => map_path.parent().unwrap_or(Path::new("")).join(&source),
    };

    let normalized = joined.normalize();
    normalized
        .to_str()
        .map(|path| path.replace('\\', "/"))
        .ok_or_else(|| {
            TileMapLoaderError::InvalidPath(format!("Invalid UTF-8 in path: {:?}", normalized))
        })
}
