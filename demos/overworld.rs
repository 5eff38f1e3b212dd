//! Overworld example: two rooms built in code, joined by a door.
//!
//! Controls:
//! - `Space`: walk through the door to the connected room
//! - `C`: cover every grass tile of the current room with rocks
//! - `R`: permanently turn the current room's grass into rocks
//!
//! Covers disappear as soon as you leave the room.

use bevy::prelude::*;
use bevy_tileutil::prelude::*;

/// Connections do not keep maps alive, so the rooms are owned here.
#[derive(Resource)]
struct Rooms {
    meadow: Handle<TileMapData>,
    cave: Handle<TileMapData>,
}

#[derive(Resource)]
struct Palette {
    grass: Handle<Image>,
    rock: Handle<Image>,
}

fn main() {
    App::new()
        .add_plugins(DefaultPlugins)
        .add_plugins(BevyTileutilPlugin::default().with_core(TileutilCoreConfig {
            connection_kinds: vec!["Door1".into()],
            ..default()
        }))
        .on_map_loaded(|In(map): In<Handle<TileMapData>>| {
            info!("Entered room {:?}", map.id());
        })
        .on_map_unloaded(|In(map): In<Handle<TileMapData>>, covers: Res<TileCovers>| {
            info!("Left room {:?} ({} covers left)", map.id(), covers.len());
        })
        .add_systems(Startup, build_rooms)
        .add_systems(Update, handle_input)
        .run();
}

fn build_rooms(
    mut commands: Commands,
    mut images: ResMut<Assets<Image>>,
    mut tiles: TileUtil,
) {
    let grass = images.add(Image::default());
    let rock = images.add(Image::default());

    let mut meadow = TileMapData::new(
        8,
        6,
        vec![Handle::default(), grass.clone()],
        TileScale::Sixteen,
    );
    for column in 2..6 {
        meadow.set_tile(TileLocation::new(column, 2), 1);
    }
    for column in 0..8 {
        meadow.set_wall(TileLocation::new(column, 0), true);
    }

    let meadow = tiles.add_map(meadow);
    let Some(cave) = tiles.clone_map(&meadow) else {
        return;
    };

    tiles.connect_maps_by_name(&meadow, &cave, "Door1");
    info!(
        "Built two rooms of {} x {} tiles",
        tiles
            .tilemap_property(&meadow, TilemapProperty::Columns)
            .unwrap_or_default(),
        tiles
            .tilemap_property(&meadow, TilemapProperty::Rows)
            .unwrap_or_default(),
    );

    commands.insert_resource(Palette { grass, rock });
    commands.set_tilemap_level(meadow.clone());
    commands.insert_resource(Rooms { meadow, cave });
}

fn handle_input(
    keys: Res<ButtonInput<KeyCode>>,
    palette: Res<Palette>,
    rooms: Res<Rooms>,
    mut tiles: TileUtil,
) {
    if keys.just_pressed(KeyCode::Space) {
        match tiles.load_connected_map_by_name("Door1") {
            Some(next) if next == rooms.cave => info!("Walking into the cave"),
            Some(next) if next == rooms.meadow => info!("Walking out to the meadow"),
            Some(_) => {}
            None => warn!("No door out of this room"),
        }
    }

    if keys.just_pressed(KeyCode::KeyC) {
        let covered = tiles.cover_all_tiles(&palette.grass, &palette.rock);
        info!("Covered {} grass tiles", covered);
    }

    if keys.just_pressed(KeyCode::KeyR) {
        let replaced = tiles.replace_all_tiles(&palette.grass, &palette.rock);
        info!("Replaced {} grass tiles", replaced);
    }
}
