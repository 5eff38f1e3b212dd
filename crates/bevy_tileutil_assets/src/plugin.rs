use bevy::prelude::*;

use crate::assets::map::TileMapData;
use crate::loaders::map::TileMapDataLoader;

/// Plugin that registers the [`TileMapData`] asset type and its `.tmx` loader.
///
/// # Example
/// ```no_run
/// use bevy::prelude::*;
/// use bevy_tileutil_assets::TileutilAssetsPlugin;
///
/// App::new()
///     .add_plugins(DefaultPlugins)
///     .add_plugins(TileutilAssetsPlugin)
///     .run();
/// ```
///
/// This is a **Layer 1** plugin: asset types and loading only. The active map,
/// connections and covers live in `bevy_tileutil_core`.
pub struct TileutilAssetsPlugin;

impl Plugin for TileutilAssetsPlugin {
    fn build(&self, app: &mut App) {
        app.init_asset::<TileMapData>()
            .register_asset_loader(TileMapDataLoader);
    }
}
