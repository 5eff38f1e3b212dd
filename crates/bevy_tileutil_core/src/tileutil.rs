//! Script-facing facade over connections, covers and the active tilemap.

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy_tileutil_assets::prelude::{TileLocation, TileMapData, TilemapProperty};

use crate::clone;
use crate::connections::{ConnectionId, ConnectionKinds, ConnectionRegistry};
use crate::covers::TileCovers;
use crate::plugin::TileutilCoreConfig;
use crate::scene::{ActiveTilemap, TilemapCommandsExt};

/// Everything game code needs to connect maps, move between them and cover tiles.
///
/// Requires `TileutilCorePlugin` and `TileutilAssetsPlugin`.
///
/// # Example
///
/// ```rust,no_run
/// # use bevy::prelude::*;
/// # use bevy_tileutil_core::prelude::*;
/// #[derive(Resource)]
/// struct Rooms {
///     hall: Handle<TileMapData>,
///     cellar: Handle<TileMapData>,
/// }
///
/// fn build_overworld(mut tiles: TileUtil, rooms: Res<Rooms>, mut commands: Commands) {
///     tiles.connect_maps_by_name(&rooms.hall, &rooms.cellar, "Stairs");
///     commands.set_tilemap_level(rooms.hall.clone());
/// }
///
/// fn take_stairs(mut tiles: TileUtil, keys: Res<ButtonInput<KeyCode>>) {
///     if keys.just_pressed(KeyCode::Enter) {
///         tiles.load_connected_map_by_name("Stairs");
///     }
/// }
/// ```
#[derive(SystemParam)]
pub struct TileUtil<'w, 's> {
    commands: Commands<'w, 's>,
    active: Res<'w, ActiveTilemap>,
    maps: ResMut<'w, Assets<TileMapData>>,
    connections: ResMut<'w, ConnectionRegistry>,
    kinds: ResMut<'w, ConnectionKinds>,
    covers: ResMut<'w, TileCovers>,
    config: Res<'w, TileutilCoreConfig>,
}

impl TileUtil<'_, '_> {
    // ===== CONNECTIONS =====

    /// Connect two maps by `id`. The connection works in both directions.
    pub fn connect_maps(
        &mut self,
        map_a: &Handle<TileMapData>,
        map_b: &Handle<TileMapData>,
        id: impl Into<ConnectionId>,
    ) {
        self.connections.connect(map_a, map_b, id.into());
    }

    /// Connect two maps by a connection name, interning it if it is new.
    ///
    /// Returns the id used, or `None` (connecting nothing) if no id is left for a new name.
    pub fn connect_maps_by_name(
        &mut self,
        map_a: &Handle<TileMapData>,
        map_b: &Handle<TileMapData>,
        name: &str,
    ) -> Option<ConnectionId> {
        let id = self.kinds.intern(name)?;
        self.connections.connect(map_a, map_b, id);
        Some(id)
    }

    /// The map connected to `map` by `id`, while that map is still loaded.
    pub fn connected_map(
        &mut self,
        map: &Handle<TileMapData>,
        id: impl Into<ConnectionId>,
    ) -> Option<Handle<TileMapData>> {
        let target = self.connections.connected(map, id.into())?;
        self.maps.get_strong_handle(target)
    }

    pub fn connected_map_by_name(
        &mut self,
        map: &Handle<TileMapData>,
        name: &str,
    ) -> Option<Handle<TileMapData>> {
        let id = self.kinds.get(name)?;
        self.connected_map(map, id)
    }

    /// Make the map connected to the active map by `id` the new level.
    ///
    /// Does nothing without an active map, without such a connection, or when the
    /// connected map is no longer loaded. The switch happens when commands are
    /// applied; the queued target is returned.
    pub fn load_connected_map(&mut self, id: impl Into<ConnectionId>) -> Option<Handle<TileMapData>> {
        let current = self.active.id()?;
        let target = self.connections.connected(current, id.into())?;
        let next = self.maps.get_strong_handle(target)?;
        self.commands.set_tilemap_level(next.clone());
        Some(next)
    }

    pub fn load_connected_map_by_name(&mut self, name: &str) -> Option<Handle<TileMapData>> {
        let id = self.kinds.get(name)?;
        self.load_connected_map(id)
    }

    /// Interning table for connection names.
    pub fn kinds(&self) -> &ConnectionKinds {
        &self.kinds
    }

    pub fn connections(&self) -> &ConnectionRegistry {
        &self.connections
    }

    // ===== COVERS =====

    /// Show `image` on `location` of the active map instead of its tile.
    ///
    /// Does nothing if no map is active or the active map is disabled.
    pub fn cover_tile(&mut self, location: impl Into<TileLocation>, image: Handle<Image>) {
        let Some(map) = self.active.enabled_map().map(Handle::id) else {
            return;
        };
        self.covers.cover(map, location.into(), image);
    }

    /// Cover every `kind` tile of the active map with `cover`.
    ///
    /// Returns the number of cells covered. Same guard as [`cover_tile`](Self::cover_tile).
    pub fn cover_all_tiles(&mut self, kind: &Handle<Image>, cover: &Handle<Image>) -> usize {
        let Some(map) = self.active.enabled_map().map(Handle::id) else {
            return 0;
        };
        let Some(data) = self.maps.get(map) else {
            return 0;
        };

        let locations: Vec<TileLocation> = data.locations_of(kind).collect();
        for location in &locations {
            self.covers.cover(map, *location, cover.clone());
        }
        locations.len()
    }

    /// Cover shown at `location` of the active map, if any.
    pub fn cover_at(&self, location: impl Into<TileLocation>) -> Option<&Handle<Image>> {
        let map = self.active.id()?;
        self.covers.get(map, location.into())
    }

    pub fn covers(&self) -> &TileCovers {
        &self.covers
    }

    // ===== MAPS =====

    /// The active tilemap.
    pub fn current_tilemap(&self) -> Option<&Handle<TileMapData>> {
        self.active.map()
    }

    /// Add a map built in code and return its handle.
    pub fn add_map(&mut self, map: TileMapData) -> Handle<TileMapData> {
        self.maps.add(map)
    }

    /// Clone `map` (without its connections or covers).
    pub fn clone_map(&mut self, map: &Handle<TileMapData>) -> Option<Handle<TileMapData>> {
        if let Some(source) = self.maps.get(map)
            && source.cell_count() > self.config.clone_warning_cells
        {
            warn!(
                "Cloning tilemap {:?} with {} cells; this can use a lot of memory",
                map.id(),
                source.cell_count()
            );
        }
        clone::clone_map(&mut self.maps, map)
    }

    /// Replace every `from` tile of the active map with `to`.
    pub fn replace_all_tiles(&mut self, from: &Handle<Image>, to: &Handle<Image>) -> usize {
        let Some(map) = self.active.id() else {
            return 0;
        };
        self.maps
            .get_mut(map)
            .map_or(0, |data| data.replace_all(from, to))
    }

    /// Read a numeric property of `map`.
    pub fn tilemap_property(
        &self,
        map: &Handle<TileMapData>,
        property: TilemapProperty,
    ) -> Option<u32> {
        self.maps.get(map).map(|data| data.property(property))
    }
}

#[cfg(test)]
mod tests {
    use bevy::ecs::system::RunSystemOnce;
    use bevy_tileutil_assets::prelude::TileScale;

    use super::*;
    use crate::events::TilemapListenerAppExt;
    use crate::plugin::TileutilCorePlugin;
    use crate::scene::set_tilemap_level;

    struct Tiles {
        _images: Assets<Image>,
        clear: Handle<Image>,
        grass: Handle<Image>,
        rock: Handle<Image>,
    }

    fn tiles() -> Tiles {
        let mut images = Assets::<Image>::default();
        Tiles {
            clear: images.add(Image::default()),
            grass: images.add(Image::default()),
            rock: images.add(Image::default()),
            _images: images,
        }
    }

    fn app() -> App {
        let mut app = App::new();
        app.init_resource::<Assets<TileMapData>>();
        app.add_plugins(TileutilCorePlugin::default());
        app
    }

    fn add_map(app: &mut App, tiles: &Tiles) -> Handle<TileMapData> {
        app.world_mut()
            .resource_mut::<Assets<TileMapData>>()
            .add(TileMapData::new(
                4,
                4,
                vec![tiles.clear.clone(), tiles.grass.clone()],
                TileScale::Sixteen,
            ))
    }

    fn load(app: &mut App, map: &Handle<TileMapData>) {
        set_tilemap_level(app.world_mut(), Some(map.clone()));
    }

    fn active_id(app: &App) -> Option<AssetId<TileMapData>> {
        app.world().resource::<ActiveTilemap>().id()
    }

    #[test]
    fn test_connect_maps_is_symmetric() {
        let tiles = tiles();
        let mut app = app();
        let a = add_map(&mut app, &tiles);
        let b = add_map(&mut app, &tiles);

        let (a_to_b, b_to_a) = app
            .world_mut()
            .run_system_once({
                let (a, b) = (a.clone(), b.clone());
                move |mut util: TileUtil| {
                    util.connect_maps(&a, &b, 5u32);
                    (util.connected_map(&a, 5u32), util.connected_map(&b, 5u32))
                }
            })
            .expect("system should run");

        assert_eq!(a_to_b, Some(b));
        assert_eq!(b_to_a, Some(a));
    }

    #[test]
    fn test_connect_by_name_uses_declared_kinds() {
        let tiles = tiles();
        let mut app = App::new();
        app.init_resource::<Assets<TileMapData>>();
        app.add_plugins(TileutilCorePlugin::new(TileutilCoreConfig {
            connection_kinds: vec!["Door1".into(), "Tunnel1".into()],
            ..default()
        }));
        let a = add_map(&mut app, &tiles);
        let b = add_map(&mut app, &tiles);

        let (id, found, missing) = app
            .world_mut()
            .run_system_once({
                let (a, b) = (a.clone(), b.clone());
                move |mut util: TileUtil| {
                    let id = util.connect_maps_by_name(&a, &b, "Tunnel1");
                    (
                        id,
                        util.connected_map(&b, ConnectionId(1)),
                        util.connected_map_by_name(&a, "Door1"),
                    )
                }
            })
            .expect("system should run");

        assert_eq!(id, Some(ConnectionId(1)));
        assert_eq!(found, Some(a));
        assert_eq!(missing, None);
    }

    #[test]
    fn test_load_connected_map_switches_level() {
        let tiles = tiles();
        let mut app = app();
        let a = add_map(&mut app, &tiles);
        let b = add_map(&mut app, &tiles);
        app.world_mut()
            .resource_mut::<ConnectionRegistry>()
            .connect(&a, &b, ConnectionId(2));
        load(&mut app, &a);

        let queued = app
            .world_mut()
            .run_system_once(|mut util: TileUtil| util.load_connected_map(2u32))
            .expect("system should run");

        assert_eq!(queued.as_ref(), Some(&b));
        assert_eq!(active_id(&app), Some(b.id()));

        // And back again through the mirrored edge
        app.world_mut()
            .run_system_once(|mut util: TileUtil| util.load_connected_map(2u32))
            .expect("system should run");
        assert_eq!(active_id(&app), Some(a.id()));
    }

    #[test]
    fn test_load_connected_map_without_edge_or_map_is_noop() {
        let tiles = tiles();
        let mut app = app();
        let a = add_map(&mut app, &tiles);

        let without_map = app
            .world_mut()
            .run_system_once(|mut util: TileUtil| util.load_connected_map(1u32))
            .expect("system should run");
        assert_eq!(without_map, None);
        assert_eq!(active_id(&app), None);

        load(&mut app, &a);
        let without_edge = app
            .world_mut()
            .run_system_once(|mut util: TileUtil| util.load_connected_map(1u32))
            .expect("system should run");
        assert_eq!(without_edge, None);
        assert_eq!(active_id(&app), Some(a.id()));
    }

    #[test]
    fn test_connections_survive_level_changes() {
        let tiles = tiles();
        let mut app = app();
        let a = add_map(&mut app, &tiles);
        let b = add_map(&mut app, &tiles);
        app.world_mut()
            .resource_mut::<ConnectionRegistry>()
            .connect(&a, &b, ConnectionId(0));

        load(&mut app, &a);
        load(&mut app, &b);
        set_tilemap_level(app.world_mut(), None);

        let registry = app.world().resource::<ConnectionRegistry>();
        assert_eq!(registry.connected(&a, ConnectionId(0)), Some(b.id()));
        assert_eq!(registry.connected(&b, ConnectionId(0)), Some(a.id()));
    }

    #[test]
    fn test_cover_tile_is_visible_while_map_is_active() {
        let tiles = tiles();
        let mut app = app();
        let map = add_map(&mut app, &tiles);
        load(&mut app, &map);

        let rock = tiles.rock.clone();
        let shown = app
            .world_mut()
            .run_system_once(move |mut util: TileUtil| {
                util.cover_tile(TileLocation::new(2, 3), rock.clone());
                util.cover_at(TileLocation::new(2, 3)).cloned()
            })
            .expect("system should run");

        assert_eq!(shown, Some(tiles.rock.clone()));
        // The tile data itself is untouched
        let maps = app.world().resource::<Assets<TileMapData>>();
        assert_eq!(
            maps.get(&map).and_then(|data| data.tile(TileLocation::new(2, 3))),
            Some(0)
        );
    }

    #[test]
    fn test_covers_are_cleared_on_every_unload() {
        let tiles = tiles();
        let mut app = app();
        let map = add_map(&mut app, &tiles);
        load(&mut app, &map);

        let rock = tiles.rock.clone();
        app.world_mut()
            .run_system_once(move |mut util: TileUtil| util.cover_tile(TileLocation::new(2, 3), rock.clone()))
            .expect("system should run");
        assert_eq!(app.world().resource::<TileCovers>().len(), 1);

        // Reloading the same map still drops the covers
        load(&mut app, &map);
        assert!(app.world().resource::<TileCovers>().is_empty());

        let rock = tiles.rock.clone();
        let copy = app
            .world_mut()
            .run_system_once({
                let map = map.clone();
                move |mut util: TileUtil| {
                    util.cover_tile(TileLocation::new(1, 1), rock.clone());
                    util.clone_map(&map)
                }
            })
            .expect("system should run")
            .expect("map is loaded");

        load(&mut app, &copy);
        assert!(app.world().resource::<TileCovers>().is_empty());
    }

    #[derive(Resource, Default)]
    struct CoversSeenOnUnload(Vec<usize>);

    #[test]
    fn test_covers_are_gone_before_user_unload_listeners() {
        let tiles = tiles();
        let mut app = App::new();
        app.init_resource::<Assets<TileMapData>>();
        app.init_resource::<CoversSeenOnUnload>();
        // Registered before the plugin on purpose
        app.on_map_unloaded(
            |In(_): In<Handle<TileMapData>>,
             covers: Res<TileCovers>,
             mut seen: ResMut<CoversSeenOnUnload>| {
                seen.0.push(covers.len());
            },
        );
        app.add_plugins(TileutilCorePlugin::default());

        let first = add_map(&mut app, &tiles);
        let second = add_map(&mut app, &tiles);
        load(&mut app, &first);
        let rock = tiles.rock.clone();
        app.world_mut()
            .run_system_once(move |mut util: TileUtil| {
                util.cover_tile(TileLocation::new(0, 0), rock.clone());
                util.cover_tile(TileLocation::new(1, 0), rock.clone());
            })
            .expect("system should run");

        load(&mut app, &second);

        assert_eq!(app.world().resource::<CoversSeenOnUnload>().0, vec![0]);
    }

    #[test]
    fn test_covers_written_during_unload_do_not_outlive_it() {
        let tiles = tiles();
        let mut app = app();
        let rock = tiles.rock.clone();
        app.on_map_unloaded(move |In(_): In<Handle<TileMapData>>, mut util: TileUtil| {
            util.cover_tile(TileLocation::new(0, 0), rock.clone());
        });
        let first = add_map(&mut app, &tiles);
        let second = add_map(&mut app, &tiles);

        load(&mut app, &first);
        load(&mut app, &second);
        let covers = app.world().resource::<TileCovers>();
        assert!(covers.is_empty());
        assert_eq!(covers.map(), None);

        set_tilemap_level(app.world_mut(), None);
        assert!(app.world().resource::<TileCovers>().is_empty());
    }

    #[test]
    fn test_load_connected_map_skips_removed_map() {
        let tiles = tiles();
        let mut app = app();
        let a = add_map(&mut app, &tiles);
        let b = add_map(&mut app, &tiles);
        app.world_mut()
            .resource_mut::<ConnectionRegistry>()
            .connect(&a, &b, ConnectionId(1));
        load(&mut app, &a);
        app.world_mut()
            .resource_mut::<Assets<TileMapData>>()
            .remove(&b);

        let queued = app
            .world_mut()
            .run_system_once(|mut util: TileUtil| util.load_connected_map(1u32))
            .expect("system should run");

        assert_eq!(queued, None);
        assert_eq!(active_id(&app), Some(a.id()));
    }

    #[test]
    fn test_cover_without_enabled_map_is_noop() {
        let tiles = tiles();
        let mut app = app();
        let map = add_map(&mut app, &tiles);

        let rock = tiles.rock.clone();
        app.world_mut()
            .run_system_once(move |mut util: TileUtil| util.cover_tile(TileLocation::new(0, 0), rock.clone()))
            .expect("system should run");
        assert!(app.world().resource::<TileCovers>().is_empty());

        load(&mut app, &map);
        app.world_mut()
            .resource_mut::<ActiveTilemap>()
            .set_enabled(false);

        let (rock, grass) = (tiles.rock.clone(), tiles.grass.clone());
        let covered = app
            .world_mut()
            .run_system_once(move |mut util: TileUtil| {
                util.cover_tile(TileLocation::new(0, 0), rock.clone());
                util.cover_all_tiles(&grass, &rock)
            })
            .expect("system should run");
        assert_eq!(covered, 0);
        assert!(app.world().resource::<TileCovers>().is_empty());
    }

    #[test]
    fn test_cover_all_tiles_covers_each_match() {
        let tiles = tiles();
        let mut app = app();
        let map = add_map(&mut app, &tiles);
        let grass_cells = [
            TileLocation::new(0, 0),
            TileLocation::new(1, 3),
            TileLocation::new(3, 2),
        ];
        {
            let mut maps = app.world_mut().resource_mut::<Assets<TileMapData>>();
            let data = maps.get_mut(&map).expect("map is loaded");
            for cell in grass_cells {
                data.set_tile(cell, 1);
            }
        }
        load(&mut app, &map);

        let (rock, grass) = (tiles.rock.clone(), tiles.grass.clone());
        let covered = app
            .world_mut()
            .run_system_once(move |mut util: TileUtil| util.cover_all_tiles(&grass, &rock))
            .expect("system should run");

        assert_eq!(covered, 3);
        let covers = app.world().resource::<TileCovers>();
        assert_eq!(covers.len(), 3);
        for cell in grass_cells {
            assert_eq!(covers.get(&map, cell), Some(&tiles.rock));
        }
    }

    #[test]
    fn test_clone_has_no_connections_or_covers() {
        let tiles = tiles();
        let mut app = app();
        let a = add_map(&mut app, &tiles);
        let b = add_map(&mut app, &tiles);
        load(&mut app, &a);

        let rock = tiles.rock.clone();
        let (copy, copy_edge, copy_cover, source_edge) = app
            .world_mut()
            .run_system_once({
                let (a, b) = (a.clone(), b.clone());
                move |mut util: TileUtil| {
                    util.connect_maps(&a, &b, 1u32);
                    util.cover_tile(TileLocation::new(1, 1), rock.clone());
                    let copy = util.clone_map(&a).expect("map is loaded");
                    let copy_edge = util.connected_map(&copy, 1u32);
                    let copy_cover = util.covers().get(&copy, TileLocation::new(1, 1)).cloned();
                    let source_edge = util.connected_map(&a, 1u32);
                    (copy, copy_edge, copy_cover, source_edge)
                }
            })
            .expect("system should run");

        assert_ne!(copy.id(), a.id());
        assert_eq!(copy_edge, None);
        assert_eq!(copy_cover, None);
        assert_eq!(source_edge, Some(b));
    }

    #[test]
    fn test_replace_all_tiles_on_active_map() {
        let tiles = tiles();
        let mut app = app();
        let map = add_map(&mut app, &tiles);
        load(&mut app, &map);

        let (clear, rock) = (tiles.clear.clone(), tiles.rock.clone());
        let (replaced, columns) = app
            .world_mut()
            .run_system_once({
                let map = map.clone();
                move |mut util: TileUtil| {
                    let replaced = util.replace_all_tiles(&clear, &rock);
                    (replaced, util.tilemap_property(&map, TilemapProperty::Columns))
                }
            })
            .expect("system should run");

        assert_eq!(replaced, 16);
        assert_eq!(columns, Some(4));
        let maps = app.world().resource::<Assets<TileMapData>>();
        assert_eq!(
            maps.get(&map).map(|data| data.locations_of(&tiles.rock).count()),
            Some(16)
        );
    }

    #[test]
    fn test_loaded_listener_sees_new_map() {
        #[derive(Resource, Default)]
        struct Entered(Vec<AssetId<TileMapData>>);

        let tiles = tiles();
        let mut app = app();
        app.init_resource::<Entered>();
        app.on_map_loaded(
            |In(map): In<Handle<TileMapData>>,
             active: Res<ActiveTilemap>,
             mut entered: ResMut<Entered>| {
                assert!(active.is_active(&map));
                entered.0.push(map.id());
            },
        );
        let a = add_map(&mut app, &tiles);
        let b = add_map(&mut app, &tiles);

        load(&mut app, &a);
        load(&mut app, &b);

        assert_eq!(app.world().resource::<Entered>().0, vec![a.id(), b.id()]);
    }
}
