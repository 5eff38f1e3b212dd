//! # `bevy_tileutil_assets`
//!
//! Layer 1 of `bevy_tileutil`: the [`TileMapData`](assets::map::TileMapData) asset
//! (tile grid, wall bitmap, tileset and scale) and a loader that builds one from a
//! Tiled `.tmx` file.

pub mod assets;
pub mod loaders;
pub mod plugin;

pub use plugin::TileutilAssetsPlugin;

/// Prelude module for convenient imports
///
/// # Example
/// ```no_run
/// use bevy::prelude::*;
/// use bevy_tileutil_assets::prelude::*;
///
/// fn count_walls(maps: Res<Assets<TileMapData>>) {
///     for (_, map) in maps.iter() {
///         let _columns = map.property(TilemapProperty::Columns);
///     }
/// }
/// ```
pub mod prelude {
    pub use crate::assets::map::{TileLocation, TileMapData, TileScale, TilemapProperty};
    pub use crate::loaders::map::{TileMapDataLoader, TileMapLoaderError};
    pub use crate::plugin::TileutilAssetsPlugin;
}
