//! # bevy_tileutil
//!
//! Connected overworld tilemaps and tile covers for Bevy.
//!
//! This is a meta-crate that combines the `bevy_tileutil_*` sub-crates.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bevy::prelude::*;
//! use bevy_tileutil::prelude::*;
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .add_plugins(BevyTileutilPlugin::default())
//!         .add_systems(Startup, load_village)
//!         .run();
//! }
//!
//! fn load_village(mut commands: Commands, asset_server: Res<AssetServer>) {
//!     commands.set_tilemap_level(asset_server.load("maps/village.tmx"));
//! }
//! ```
//!
//! ## Architecture
//!
//! - **Layer 1** ([`assets`]): the `TileMapData` asset and its `.tmx` loader
//! - **Layer 2** ([`core`]): active map, lifecycle listeners, connections and covers

pub mod plugin;

// Re-export sub-crates for advanced usage
pub use bevy_tileutil_assets as assets;
pub use bevy_tileutil_core as core;

/// Unified prelude for bevy_tileutil
pub mod prelude {
    pub use crate::assets::prelude::*;
    pub use crate::core::prelude::*;

    pub use crate::plugin::BevyTileutilPlugin;
}
