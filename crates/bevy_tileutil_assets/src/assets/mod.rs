pub mod map;

pub use map::{TileLocation, TileMapData, TileScale, TilemapProperty};
