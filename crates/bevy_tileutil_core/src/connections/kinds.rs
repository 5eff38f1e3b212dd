//! Interning table for connection names.

use bevy::{platform::collections::HashMap, prelude::*};

use super::ConnectionId;

/// Maps connection names ("Door1", "Tunnel") to stable [`ConnectionId`]s.
///
/// Ids are handed out in first-use order starting at 0 and never change for the
/// lifetime of the `App`. Names declared in
/// [`TileutilCoreConfig::connection_kinds`](crate::plugin::TileutilCoreConfig) are
/// interned when the plugin is built, so they get the lowest ids.
///
/// Mixing interned names with hand-picked raw ids in the same game is allowed, but
/// keeping the two apart is up to the caller.
#[derive(Resource, Debug, Clone, Default)]
pub struct ConnectionKinds {
    ids: HashMap<String, ConnectionId>,
    names: Vec<String>,
}

impl ConnectionKinds {
    /// Id for `name`, assigning the next free id on first use.
    ///
    /// Returns `None` once every `u32` id has been handed out.
    pub fn intern(&mut self, name: &str) -> Option<ConnectionId> {
        if let Some(id) = self.ids.get(name) {
            return Some(*id);
        }

        let id = id_at(self.names.len())?;
        self.ids.insert(name.to_string(), id);
        self.names.push(name.to_string());
        debug!("Interned connection kind '{}' as {}", name, id);
        Some(id)
    }

    /// Id for `name` if it has been interned.
    pub fn get(&self, name: &str) -> Option<ConnectionId> {
        self.ids.get(name).copied()
    }

    /// Name interned for `id`.
    pub fn name(&self, id: ConnectionId) -> Option<&str> {
        self.names.get(id.0 as usize).map(String::as_str)
    }

    /// All interned kinds in id order.
    pub fn iter(&self) -> impl Iterator<Item = (ConnectionId, &str)> {
        self.names
            .iter()
            .enumerate()
            .filter_map(|(index, name)| Some((id_at(index)?, name.as_str())))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

fn id_at(position: usize) -> Option<ConnectionId> {
    u32::try_from(position).ok().map(ConnectionId)
}
