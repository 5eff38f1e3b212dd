use std::collections::BTreeSet;

use bevy::{platform::collections::HashMap, prelude::*};

/// A cell coordinate in a tilemap grid.
///
/// `column` grows rightward and `row` grows downward, with `(0, 0)` at the top-left
/// corner (the same convention Tiled uses).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Reflect)]
pub struct TileLocation {
    pub column: u32,
    pub row: u32,
}

impl TileLocation {
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }
}

impl From<(u32, u32)> for TileLocation {
    fn from((column, row): (u32, u32)) -> Self {
        Self { column, row }
    }
}

impl From<UVec2> for TileLocation {
    fn from(value: UVec2) -> Self {
        Self {
            column: value.x,
            row: value.y,
        }
    }
}

/// Tile size of a map, stored as the base-2 logarithm of the tile width in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TileScale {
    /// 8x8 pixel tiles
    Eight = 3,
    /// 16x16 pixel tiles
    #[default]
    Sixteen = 4,
    /// 32x32 pixel tiles
    ThirtyTwo = 5,
}

impl TileScale {
    /// Shift amount converting a tile count into pixels.
    pub const fn shift(self) -> u32 {
        self as u32
    }

    /// Tile width (and height) in pixels.
    pub const fn tile_width(self) -> u32 {
        1 << self.shift()
    }

    /// Find the scale matching a tile width in pixels.
    ///
    /// Returns `None` for sizes that are not 8, 16 or 32.
    pub fn from_tile_width(width: u32) -> Option<Self> {
        match width {
            8 => Some(Self::Eight),
            16 => Some(Self::Sixteen),
            32 => Some(Self::ThirtyTwo),
            _ => None,
        }
    }
}

/// Numeric properties readable from a [`TileMapData`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TilemapProperty {
    /// Width in columns
    Columns,
    /// Height in rows
    Rows,
    /// Width in pixels
    PixelWidth,
    /// Height in pixels
    PixelHeight,
    /// Width of a single tile in pixels
    TileWidth,
}

/// Cells in a `width` x `height` grid, computed without `u32` overflow.
fn cell_count(width: u32, height: u32) -> usize {
    width as usize * height as usize
}

/// An in-memory tilemap: a grid of tileset indices, a parallel wall bitmap,
/// a tileset of tile images and a tile scale.
///
/// Identity is the asset id, not the content. Two maps with identical tiles are
/// distinct maps, which is what lets connections and covers be keyed by
/// `AssetId<TileMapData>`.
///
/// Index 0 of the tileset is the transparent tile; freshly created maps are filled
/// with it.
///
/// The map keeps a per-kind index of tile locations in sync with every
/// [`set_tile`](Self::set_tile), so [`locations_of`](Self::locations_of) never scans
/// the grid.
///
/// # Example
///
/// ```rust,no_run
/// # use bevy::prelude::*;
/// # use bevy_tileutil_assets::prelude::*;
/// fn build_room(mut maps: ResMut<Assets<TileMapData>>, asset_server: Res<AssetServer>) {
///     let floor: Handle<Image> = asset_server.load("tiles/floor.png");
///     let mut room = TileMapData::new(10, 8, vec![Handle::default(), floor], TileScale::Sixteen);
///     room.set_tile(TileLocation::new(2, 3), 1);
///     maps.add(room);
/// }
/// ```
#[derive(Asset, TypePath, Debug)]
pub struct TileMapData {
    width: u32,
    height: u32,
    scale: TileScale,
    /// Flattened grid of tileset indices: index = row * width + column
    tiles: Vec<u16>,
    walls: Vec<bool>,
    tileset: Vec<Handle<Image>>,
    /// Tileset index -> every location currently holding that tile
    kinds: HashMap<u16, BTreeSet<TileLocation>>,
}

impl TileMapData {
    /// Create a map of `width` x `height` transparent, wall-free tiles.
    pub fn new(width: u32, height: u32, tileset: Vec<Handle<Image>>, scale: TileScale) -> Self {
        let cells = cell_count(width, height);
        let mut kinds = HashMap::default();
        if cells > 0 {
            let all: BTreeSet<TileLocation> = (0..height)
                .flat_map(|row| (0..width).map(move |column| TileLocation::new(column, row)))
                .collect();
            kinds.insert(0, all);
        }

        Self {
            width,
            height,
            scale,
            tiles: vec![0; cells],
            walls: vec![false; cells],
            tileset,
            kinds,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn scale(&self) -> TileScale {
        self.scale
    }

    /// Number of cells in the grid.
    pub fn cell_count(&self) -> usize {
        self.tiles.len()
    }

    /// Whether `location` lies inside the grid.
    pub fn contains(&self, location: TileLocation) -> bool {
        location.column < self.width && location.row < self.height
    }

    fn index(&self, location: TileLocation) -> Option<usize> {
        self.contains(location)
            .then(|| location.row as usize * self.width as usize + location.column as usize)
    }

    /// Tileset index at `location` (`None` if out of bounds).
    pub fn tile(&self, location: TileLocation) -> Option<u16> {
        self.index(location).map(|index| self.tiles[index])
    }

    /// Tile image at `location` (`None` if out of bounds or the index has no image).
    pub fn tile_image(&self, location: TileLocation) -> Option<&Handle<Image>> {
        self.tile(location)
            .and_then(|tile| self.tileset.get(tile as usize))
    }

    /// Set the tileset index at `location`. Out-of-bounds writes are ignored.
    pub fn set_tile(&mut self, location: TileLocation, tile: u16) {
        let Some(index) = self.index(location) else {
            return;
        };

        let previous = std::mem::replace(&mut self.tiles[index], tile);
        if previous == tile {
            return;
        }

        if let Some(locations) = self.kinds.get_mut(&previous) {
            locations.remove(&location);
            if locations.is_empty() {
                self.kinds.remove(&previous);
            }
        }
        self.kinds.entry(tile).or_default().insert(location);
    }

    /// Set the tile at `location` to `image`, appending it to the tileset if needed.
    pub fn set_tile_image(&mut self, location: TileLocation, image: &Handle<Image>) {
        if !self.contains(location) {
            return;
        }
        if let Some(tile) = self.index_of_or_insert(image) {
            self.set_tile(location, tile);
        }
    }

    /// Whether the cell at `location` is a wall. Out-of-bounds cells are not walls.
    pub fn is_wall(&self, location: TileLocation) -> bool {
        self.index(location).is_some_and(|index| self.walls[index])
    }

    /// Mark or clear a wall. Out-of-bounds writes are ignored.
    pub fn set_wall(&mut self, location: TileLocation, wall: bool) {
        if let Some(index) = self.index(location) {
            self.walls[index] = wall;
        }
    }

    /// Tile images, indexed by the values stored in the grid.
    pub fn tileset(&self) -> &[Handle<Image>] {
        &self.tileset
    }

    pub fn tileset_mut(&mut self) -> &mut Vec<Handle<Image>> {
        &mut self.tileset
    }

    /// First position of `image` in the tileset.
    pub fn index_of(&self, image: &Handle<Image>) -> Option<u16> {
        self.tileset
            .iter()
            .position(|candidate| candidate == image)
            .and_then(|position| u16::try_from(position).ok())
    }

    fn index_of_or_insert(&mut self, image: &Handle<Image>) -> Option<u16> {
        if let Some(index) = self.index_of(image) {
            return Some(index);
        }
        let index = u16::try_from(self.tileset.len()).ok()?;
        self.tileset.push(image.clone());
        Some(index)
    }

    /// Every tileset slot holding `image`. A tileset may list the same image twice.
    pub fn slots_of<'a>(&'a self, image: &'a Handle<Image>) -> impl Iterator<Item = u16> + 'a {
        self.tileset
            .iter()
            .enumerate()
            .filter(move |(_, candidate)| *candidate == image)
            .filter_map(|(position, _)| u16::try_from(position).ok())
    }

    /// Every location whose tile image is `image`, in column-major order.
    ///
    /// Served from the tile-type index; cost is proportional to the number of matches.
    pub fn locations_of(&self, image: &Handle<Image>) -> impl Iterator<Item = TileLocation> {
        let mut locations: Vec<TileLocation> = self
            .slots_of(image)
            .filter_map(|tile| self.kinds.get(&tile))
            .flatten()
            .copied()
            .collect();
        locations.sort_unstable();
        locations.into_iter()
    }

    /// Replace every `from` tile with `to`. Returns the number of cells changed.
    ///
    /// The tileset is left alone when no cell shows `from`.
    pub fn replace_all(&mut self, from: &Handle<Image>, to: &Handle<Image>) -> usize {
        let locations: Vec<TileLocation> = self.locations_of(from).collect();
        if locations.is_empty() {
            return 0;
        }
        let Some(tile) = self.index_of_or_insert(to) else {
            return 0;
        };
        for location in &locations {
            self.set_tile(*location, tile);
        }
        locations.len()
    }

    /// Read a numeric property of the map.
    pub fn property(&self, property: TilemapProperty) -> u32 {
        match property {
            TilemapProperty::Columns => self.width,
            TilemapProperty::Rows => self.height,
            TilemapProperty::PixelWidth => self.width << self.scale.shift(),
            TilemapProperty::PixelHeight => self.height << self.scale.shift(),
            TilemapProperty::TileWidth => self.scale.tile_width(),
        }
    }
}
