//! # `bevy_tileutil_core`
//!
//! Overworld plumbing for tile-based games: stitch small tilemaps together with
//! two-way connections, move between them, and temporarily cover tiles with other
//! images.
//!
//! ## Architecture
//!
//! Layer 2 (this crate) builds on Layer 1 (`bevy_tileutil_assets`, the
//! [`TileMapData`](bevy_tileutil_assets::prelude::TileMapData) asset):
//!
//! 1. **Active map**: [`ActiveTilemap`](scene::ActiveTilemap), switched by the
//!    [`SetTilemapLevel`](scene::SetTilemapLevel) command
//! 2. **Lifecycle listeners**: ordered loaded/unloaded one-shot systems
//! 3. **Connections**: [`ConnectionRegistry`](connections::ConnectionRegistry) plus the
//!    [`ConnectionKinds`](connections::ConnectionKinds) name table
//! 4. **Covers**: [`TileCovers`](covers::TileCovers), dropped on every unload
//! 5. **Facade**: the [`TileUtil`](tileutil::TileUtil) system param
//!
//! This crate does NOT render covers; a renderer reads [`TileCovers`](covers::TileCovers).
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use bevy::prelude::*;
//! use bevy_tileutil_assets::TileutilAssetsPlugin;
//! use bevy_tileutil_core::prelude::*;
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .add_plugins(TileutilAssetsPlugin)
//!         .add_plugins(TileutilCorePlugin::default())
//!         .on_map_loaded(|In(map): In<Handle<TileMapData>>| info!("Entered {:?}", map.id()))
//!         .add_systems(Startup, load_first_map)
//!         .run();
//! }
//!
//! fn load_first_map(mut commands: Commands, asset_server: Res<AssetServer>) {
//!     commands.set_tilemap_level(asset_server.load("maps/village.tmx"));
//! }
//! ```

pub mod clone;
pub mod connections;
pub mod covers;
pub mod events;
pub mod plugin;
pub mod scene;
pub mod tileutil;

pub mod prelude {
    //! Common imports for `bevy_tileutil_core` users.

    pub use crate::clone::clone_map;
    pub use crate::connections::{ConnectionId, ConnectionKinds, ConnectionRegistry};
    pub use crate::covers::TileCovers;
    pub use crate::events::{TilemapEvent, TilemapListenerAppExt, TilemapListeners};
    pub use crate::plugin::{TileutilCoreConfig, TileutilCorePlugin};
    pub use crate::scene::{ActiveTilemap, SetTilemapLevel, TilemapCommandsExt};
    pub use crate::tileutil::TileUtil;

    pub use bevy_tileutil_assets::prelude::{
        TileLocation, TileMapData, TileScale, TilemapProperty,
    };
}

pub use plugin::{TileutilCoreConfig, TileutilCorePlugin};
