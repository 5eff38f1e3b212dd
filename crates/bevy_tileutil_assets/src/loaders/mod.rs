pub mod map;

pub use map::{TileMapDataLoader, TileMapLoaderError, WALL_PROPERTY};
