//! Bidirectional connection graph between tilemaps.

use std::fmt;

use bevy::{platform::collections::HashMap, prelude::*};
use bevy_tileutil_assets::prelude::TileMapData;

/// Numeric key of a connection ("door 1", "tunnel", ...).
///
/// Raw numbers can be used directly; names go through
/// [`ConnectionKinds`](super::ConnectionKinds).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Reflect)]
pub struct ConnectionId(pub u32);

impl From<u32> for ConnectionId {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Directed edges `(source, connection) -> target`, always written in pairs.
///
/// Connecting A and B by `k` stores both `(A, k) -> B` and `(B, k) -> A`, so the link
/// is navigable from either end. Entries survive level changes: they describe the
/// world layout, not the current level.
///
/// Only asset ids are stored, so the graph never keeps a map alive. Edges touching a
/// map are dropped by [`prune_removed_maps`] once the map asset is unused or removed.
///
/// # Example
///
/// ```rust,no_run
/// # use bevy::prelude::*;
/// # use bevy_tileutil_core::prelude::*;
/// fn link_rooms(
///     mut registry: ResMut<ConnectionRegistry>,
///     mut maps: ResMut<Assets<TileMapData>>,
/// ) {
///     let hall = maps.add(TileMapData::new(8, 8, vec![Handle::default()], TileScale::Eight));
///     let cellar = maps.add(TileMapData::new(8, 8, vec![Handle::default()], TileScale::Eight));
///     registry.connect(&hall, &cellar, ConnectionId(1));
///     assert_eq!(registry.connected(&cellar, ConnectionId(1)), Some(hall.id()));
/// }
/// ```
#[derive(Resource, Debug, Default)]
pub struct ConnectionRegistry {
    edges: HashMap<(AssetId<TileMapData>, ConnectionId), AssetId<TileMapData>>,
}

impl ConnectionRegistry {
    /// Connect `map_a` and `map_b` by `id` in both directions.
    ///
    /// An existing edge for `(map_a, id)` or `(map_b, id)` is overwritten. The edge the
    /// previous partner holds back to this map is left in place.
    pub fn connect(
        &mut self,
        map_a: impl Into<AssetId<TileMapData>>,
        map_b: impl Into<AssetId<TileMapData>>,
        id: ConnectionId,
    ) {
        let (map_a, map_b) = (map_a.into(), map_b.into());
        debug!("Connecting {:?} <-> {:?} by {}", map_a, map_b, id);
        self.edges.insert((map_a, id), map_b);
        self.edges.insert((map_b, id), map_a);
    }

    /// The map connected to `map` by `id`, if any.
    pub fn connected(
        &self,
        map: impl Into<AssetId<TileMapData>>,
        id: ConnectionId,
    ) -> Option<AssetId<TileMapData>> {
        self.edges.get(&(map.into(), id)).copied()
    }

    /// Remove the connection `id` of `map` and its mirror, returning the former partner.
    ///
    /// The partner's edge is only removed if it still points back at `map`.
    pub fn disconnect(
        &mut self,
        map: impl Into<AssetId<TileMapData>>,
        id: ConnectionId,
    ) -> Option<AssetId<TileMapData>> {
        let map = map.into();
        let partner = self.edges.remove(&(map, id))?;

        let mirror = (partner, id);
        if self.edges.get(&mirror) == Some(&map) {
            self.edges.remove(&mirror);
        }

        debug!("Disconnected {:?} from {:?} ({})", map, partner, id);
        Some(partner)
    }

    /// Drop every edge that starts or ends at `map`. Returns the number removed.
    pub fn remove_map(&mut self, map: impl Into<AssetId<TileMapData>>) -> usize {
        let map = map.into();
        let before = self.edges.len();
        self.edges
            .retain(|(source, _), target| *source != map && *target != map);
        before - self.edges.len()
    }

    /// Every outgoing connection of `map`, sorted by id.
    pub fn connections_of(
        &self,
        map: impl Into<AssetId<TileMapData>>,
    ) -> Vec<(ConnectionId, AssetId<TileMapData>)> {
        let map = map.into();
        let mut connections: Vec<_> = self
            .edges
            .iter()
            .filter(|((source, _), _)| *source == map)
            .map(|((_, id), target)| (*id, *target))
            .collect();
        connections.sort_by_key(|(id, _)| *id);
        connections
    }

    /// Number of directed edges.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

/// Drop the connections of tilemaps that are no longer in use.
pub fn prune_removed_maps(
    mut asset_events: MessageReader<AssetEvent<TileMapData>>,
    mut registry: ResMut<ConnectionRegistry>,
) {
    for event in asset_events.read() {
        let (AssetEvent::Unused { id } | AssetEvent::Removed { id }) = event else {
            continue;
        };
        let removed = registry.remove_map(*id);
        if removed > 0 {
            debug!("Dropped {} connection edges of tilemap {:?}", removed, id);
        }
    }
}
