//! Ordered tilemap lifecycle listeners.
//!
//! Listeners are one-shot systems taking the affected map as input. They run
//! synchronously, in registration order, whenever the active tilemap changes
//! (see [`SetTilemapLevel`](crate::scene::SetTilemapLevel)).

use bevy::ecs::system::SystemId;
use bevy::prelude::*;
use bevy_tileutil_assets::prelude::TileMapData;

/// The two lifecycle notifications of the active tilemap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TilemapEvent {
    /// A map became the active tilemap.
    Loaded,
    /// The active tilemap is about to be replaced or removed.
    Unloaded,
}

/// A registered lifecycle listener.
pub type TilemapListener = SystemId<In<Handle<TileMapData>>>;

/// Ordered subscriber lists for [`TilemapEvent`]s.
#[derive(Resource, Debug, Default)]
pub struct TilemapListeners {
    loaded: Vec<TilemapListener>,
    unloaded: Vec<TilemapListener>,
}

impl TilemapListeners {
    /// Listeners for `event`, in invocation order.
    pub fn listeners(&self, event: TilemapEvent) -> &[TilemapListener] {
        match event {
            TilemapEvent::Loaded => &self.loaded,
            TilemapEvent::Unloaded => &self.unloaded,
        }
    }

    fn listeners_mut(&mut self, event: TilemapEvent) -> &mut Vec<TilemapListener> {
        match event {
            TilemapEvent::Loaded => &mut self.loaded,
            TilemapEvent::Unloaded => &mut self.unloaded,
        }
    }

    /// Append a listener; it runs after every listener already registered.
    pub fn push(&mut self, event: TilemapEvent, listener: TilemapListener) {
        self.listeners_mut(event).push(listener);
    }

    /// Insert a listener ahead of every other listener for `event`.
    pub(crate) fn push_front(&mut self, event: TilemapEvent, listener: TilemapListener) {
        self.listeners_mut(event).insert(0, listener);
    }
}

/// Register `system` as a listener for `event` and return its id.
pub fn add_tilemap_listener<M>(
    world: &mut World,
    event: TilemapEvent,
    system: impl IntoSystem<In<Handle<TileMapData>>, (), M> + 'static,
) -> TilemapListener {
    let listener = world.register_system(system);
    world
        .get_resource_or_init::<TilemapListeners>()
        .push(event, listener);
    listener
}

/// Run every listener for `event` with `map` as input.
///
/// The list is snapshotted first, so listeners may register further listeners or
/// switch levels without disturbing the current fan-out.
pub(crate) fn dispatch(world: &mut World, event: TilemapEvent, map: &Handle<TileMapData>) {
    let listeners = world
        .get_resource::<TilemapListeners>()
        .map(|listeners| listeners.listeners(event).to_vec())
        .unwrap_or_default();

    for listener in listeners {
        if let Err(err) = world.run_system_with(listener, map.clone()) {
            warn!("Tilemap {:?} listener failed for {:?}: {}", event, map.id(), err);
        }
    }
}

/// `App` extension for subscribing to tilemap lifecycle events.
///
/// # Example
///
/// ```rust,no_run
/// use bevy::prelude::*;
/// use bevy_tileutil_core::prelude::*;
///
/// fn announce(In(map): In<Handle<TileMapData>>) {
///     info!("Entered {:?}", map.id());
/// }
///
/// App::new()
///     .add_plugins(TileutilCorePlugin::default())
///     .on_map_loaded(announce);
/// ```
pub trait TilemapListenerAppExt {
    /// Run `system` every time a tilemap is loaded.
    fn on_map_loaded<M>(
        &mut self,
        system: impl IntoSystem<In<Handle<TileMapData>>, (), M> + 'static,
    ) -> &mut Self;

    /// Run `system` every time a tilemap is unloaded.
    ///
    /// Covers of the unloading map are already gone when it runs.
    fn on_map_unloaded<M>(
        &mut self,
        system: impl IntoSystem<In<Handle<TileMapData>>, (), M> + 'static,
    ) -> &mut Self;
}

impl TilemapListenerAppExt for App {
    fn on_map_loaded<M>(
        &mut self,
        system: impl IntoSystem<In<Handle<TileMapData>>, (), M> + 'static,
    ) -> &mut Self {
        add_tilemap_listener(self.world_mut(), TilemapEvent::Loaded, system);
        self
    }

    fn on_map_unloaded<M>(
        &mut self,
        system: impl IntoSystem<In<Handle<TileMapData>>, (), M> + 'static,
    ) -> &mut Self {
        add_tilemap_listener(self.world_mut(), TilemapEvent::Unloaded, system);
        self
    }
}
