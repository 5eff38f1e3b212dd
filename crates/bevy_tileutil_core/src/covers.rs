//! Per-cell cover images for the active tilemap.
//!
//! A cover makes a cell display a different image without touching the map's tile
//! data. Covers belong to the map that was active when they were added and are
//! dropped whenever that map is unloaded.

use bevy::{platform::collections::HashMap, prelude::*};
use bevy_tileutil_assets::prelude::{TileLocation, TileMapData};

/// Cover images keyed by cell, scoped to a single map.
#[derive(Resource, Debug, Default)]
pub struct TileCovers {
    map: Option<AssetId<TileMapData>>,
    entries: HashMap<TileLocation, Handle<Image>>,
}

impl TileCovers {
    /// Cover `location` on `map` with `image`, returning the cover it replaced.
    ///
    /// Covers held for any other map are discarded first.
    pub fn cover(
        &mut self,
        map: impl Into<AssetId<TileMapData>>,
        location: TileLocation,
        image: Handle<Image>,
    ) -> Option<Handle<Image>> {
        let map = map.into();
        if self.map != Some(map) {
            self.entries.clear();
            self.map = Some(map);
        }
        self.entries.insert(location, image)
    }

    /// Cover image at `location`, only if the covers belong to `map`.
    pub fn get(
        &self,
        map: impl Into<AssetId<TileMapData>>,
        location: TileLocation,
    ) -> Option<&Handle<Image>> {
        if self.map != Some(map.into()) {
            return None;
        }
        self.entries.get(&location)
    }

    /// Map the current covers belong to.
    pub fn map(&self) -> Option<AssetId<TileMapData>> {
        self.map
    }

    pub fn iter(&self) -> impl Iterator<Item = (TileLocation, &Handle<Image>)> {
        self.entries.iter().map(|(location, image)| (*location, image))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every cover.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.map = None;
    }
}

/// Unloaded listener installed by the plugin ahead of all user listeners.
pub fn clear_covers_on_unload(In(map): In<Handle<TileMapData>>, mut covers: ResMut<TileCovers>) {
    if !covers.is_empty() {
        debug!("Clearing {} covers of tilemap {:?}", covers.len(), map.id());
    }
    covers.clear();
}
