//! Plugin for `bevy_tileutil_core`.

use bevy::prelude::*;

use crate::connections::registry::prune_removed_maps;
use crate::connections::{ConnectionKinds, ConnectionRegistry};
use crate::covers::{TileCovers, clear_covers_on_unload};
use crate::events::{TilemapEvent, TilemapListeners};
use crate::scene::ActiveTilemap;

/// Configuration for `TileutilCorePlugin`.
///
/// # Example
///
/// ```rust,no_run
/// use bevy::prelude::*;
/// use bevy_tileutil_core::{TileutilCoreConfig, TileutilCorePlugin};
///
/// App::new()
///     .add_plugins(TileutilCorePlugin::new(TileutilCoreConfig {
///         connection_kinds: vec!["Door1".into(), "Tunnel1".into()],
///         ..default()
///     }));
/// ```
#[derive(Resource, Debug, Clone)]
pub struct TileutilCoreConfig {
    /// Connection names interned at startup, in order, so they receive ids `0..n`.
    pub connection_kinds: Vec<String>,

    /// Cloning a map with more cells than this logs a warning.
    pub clone_warning_cells: usize,
}

impl Default for TileutilCoreConfig {
    fn default() -> Self {
        Self {
            connection_kinds: Vec::new(),
            clone_warning_cells: 128 * 128,
        }
    }
}

/// Plugin for map connections, tile covers and the tilemap lifecycle.
///
/// Add this plugin after `TileutilAssetsPlugin`.
///
/// Installs one [`ConnectionRegistry`], one [`TileCovers`] and one [`ConnectionKinds`]
/// per `App`, plus the [`ActiveTilemap`] and its listener lists. Covers are cleared by an
/// unloaded listener that always runs before any user listener, and again once the
/// unload fan-out is done. Connections survive level changes and are only dropped
/// when one of their maps is freed.
///
/// # Example
///
/// ```rust,no_run
/// use bevy::prelude::*;
/// use bevy_tileutil_assets::TileutilAssetsPlugin;
/// use bevy_tileutil_core::TileutilCorePlugin;
///
/// App::new()
///     .add_plugins(DefaultPlugins)
///     .add_plugins(TileutilAssetsPlugin)
///     .add_plugins(TileutilCorePlugin::default())
///     .run();
/// ```
#[derive(Default)]
pub struct TileutilCorePlugin {
    config: TileutilCoreConfig,
}

impl TileutilCorePlugin {
    /// Create a new plugin with custom configuration.
    pub fn new(config: TileutilCoreConfig) -> Self {
        Self { config }
    }
}

impl Plugin for TileutilCorePlugin {
    fn build(&self, app: &mut App) {
        let mut kinds = ConnectionKinds::default();
        for name in &self.config.connection_kinds {
            if kinds.intern(name).is_none() {
                warn!("No connection id left for kind '{}'", name);
            }
        }
        let kind_count = kinds.len();

        app.insert_resource(self.config.clone())
            .insert_resource(kinds)
            .init_resource::<ConnectionRegistry>()
            .init_resource::<TileCovers>()
            .init_resource::<ActiveTilemap>()
            .init_resource::<TilemapListeners>()
            .add_systems(Update, prune_removed_maps);

        // Front of the list: user listeners never observe covers of the map being unloaded
        let clear_covers = app.world_mut().register_system(clear_covers_on_unload);
        app.world_mut()
            .resource_mut::<TilemapListeners>()
            .push_front(TilemapEvent::Unloaded, clear_covers);

        info!(
            "TileutilCorePlugin initialized ({} connection kinds)",
            kind_count
        );
    }
}
