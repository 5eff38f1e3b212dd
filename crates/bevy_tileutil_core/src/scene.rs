//! The active tilemap and level switching.

use bevy::prelude::*;
use bevy_tileutil_assets::prelude::TileMapData;

use crate::covers::TileCovers;
use crate::events::{TilemapEvent, dispatch};

/// The tilemap currently set as the level.
///
/// Only changed through [`SetTilemapLevel`], so every change goes through the
/// unloaded/loaded listener fan-out.
#[derive(Resource, Debug, Clone)]
pub struct ActiveTilemap {
    map: Option<Handle<TileMapData>>,
    enabled: bool,
}

impl Default for ActiveTilemap {
    fn default() -> Self {
        Self {
            map: None,
            enabled: true,
        }
    }
}

impl ActiveTilemap {
    /// Handle of the active map, if any.
    pub fn map(&self) -> Option<&Handle<TileMapData>> {
        self.map.as_ref()
    }

    pub fn id(&self) -> Option<AssetId<TileMapData>> {
        self.map.as_ref().map(Handle::id)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enable or disable the active map without unloading it.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// The active map, but only while it is enabled.
    pub fn enabled_map(&self) -> Option<&Handle<TileMapData>> {
        self.map.as_ref().filter(|_| self.enabled)
    }

    /// Whether `map` is the active map.
    pub fn is_active(&self, map: impl Into<AssetId<TileMapData>>) -> bool {
        self.id() == Some(map.into())
    }
}

/// Command that makes `map` the active tilemap (or clears it with `None`).
///
/// Order of effects:
/// 1. unloaded listeners run for the previous map, which is still active
/// 2. covers are dropped and the active map is replaced
/// 3. loaded listeners run for the new map
///
/// Setting the map that is already active still unloads and reloads it.
#[derive(Debug, Clone)]
pub struct SetTilemapLevel {
    pub map: Option<Handle<TileMapData>>,
}

impl Command for SetTilemapLevel {
    fn apply(self, world: &mut World) {
        set_tilemap_level(world, self.map);
    }
}

/// Immediate form of [`SetTilemapLevel`].
pub fn set_tilemap_level(world: &mut World, map: Option<Handle<TileMapData>>) {
    let previous = world.get_resource_or_init::<ActiveTilemap>().map.clone();

    if let Some(previous) = previous {
        debug!("Unloading tilemap {:?}", previous.id());
        dispatch(world, TilemapEvent::Unloaded, &previous);

        // Unloaded listeners may have covered tiles of the outgoing map
        if let Some(mut covers) = world.get_resource_mut::<TileCovers>() {
            covers.clear();
        }
    }

    world.get_resource_or_init::<ActiveTilemap>().map = map.clone();

    if let Some(map) = map {
        debug!("Loaded tilemap {:?}", map.id());
        dispatch(world, TilemapEvent::Loaded, &map);
    }
}

/// `Commands` extension for level switching.
pub trait TilemapCommandsExt {
    /// Make `map` the active tilemap.
    fn set_tilemap_level(&mut self, map: Handle<TileMapData>);

    /// Unload the active tilemap, leaving no map active.
    fn unload_tilemap(&mut self);
}

impl TilemapCommandsExt for Commands<'_, '_> {
    fn set_tilemap_level(&mut self, map: Handle<TileMapData>) {
        self.queue(SetTilemapLevel { map: Some(map) });
    }

    fn unload_tilemap(&mut self) {
        self.queue(SetTilemapLevel { map: None });
    }
}
