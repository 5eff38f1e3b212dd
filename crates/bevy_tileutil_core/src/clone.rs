//! Deep copies of tilemaps.

use bevy::prelude::*;
use bevy_tileutil_assets::prelude::{TileLocation, TileMapData};

/// Add an independent copy of `map` to `maps` and return its handle.
///
/// The copy has the same size, scale, tiles and walls, and its own copy of the
/// tileset. It is a new asset, so it starts with no connections and no covers.
///
/// Memory use grows with the map's cell count. Returns `None` if `map` is not loaded.
pub fn clone_map(
    maps: &mut Assets<TileMapData>,
    map: impl Into<AssetId<TileMapData>>,
) -> Option<Handle<TileMapData>> {
    let source = maps.get(map.into())?;

    let mut copy = TileMapData::new(
        source.width(),
        source.height(),
        source.tileset().to_vec(),
        source.scale(),
    );

    for row in 0..source.height() {
        for column in 0..source.width() {
            let location = TileLocation::new(column, row);
            if let Some(tile) = source.tile(location) {
                copy.set_tile(location, tile);
            }
            copy.set_wall(location, source.is_wall(location));
        }
    }

    Some(maps.add(copy))
}
