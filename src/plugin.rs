//! Unified plugin for bevy_tileutil.

use bevy::prelude::*;

use bevy_tileutil_assets::TileutilAssetsPlugin;
use bevy_tileutil_core::{TileutilCoreConfig, TileutilCorePlugin};

/// Unified plugin that adds asset loading ([`TileutilAssetsPlugin`]) and the
/// connection/cover runtime ([`TileutilCorePlugin`]).
///
/// # With Custom Configuration
///
/// ```rust,no_run
/// use bevy::prelude::*;
/// use bevy_tileutil::prelude::*;
///
/// App::new()
///     .add_plugins(DefaultPlugins)
///     .add_plugins(BevyTileutilPlugin::default().with_core(TileutilCoreConfig {
///         connection_kinds: vec!["Door1".into(), "Door2".into()],
///         ..default()
///     }))
///     .run();
/// ```
#[derive(Default)]
pub struct BevyTileutilPlugin {
    /// Core configuration
    pub core: TileutilCoreConfig,
}

impl BevyTileutilPlugin {
    /// Create with custom core configuration
    pub fn with_core(mut self, config: TileutilCoreConfig) -> Self {
        self.core = config;
        self
    }
}

impl Plugin for BevyTileutilPlugin {
    fn build(&self, app: &mut App) {
        // Layer 1: Assets
        app.add_plugins(TileutilAssetsPlugin);

        // Layer 2: Core
        app.add_plugins(TileutilCorePlugin::new(self.core.clone()));

        info!("BevyTileutilPlugin initialized");
    }
}
