use derive_more::Display;
use tracing::debug;

use crate::view::Key;

/// Logical region of the report that takes part in zone switching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Zone {
    #[display("toolbar")]
    Toolbar,
    #[display("layers")]
    LayerList,
    #[display("tree")]
    TreePane,
    #[display("files")]
    FilePane,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusDirection {
    Forward,
    Backward,
}

impl FocusDirection {
    pub fn from_key(key: Key) -> Option<Self> {
        match key {
            Key::Tab => Some(FocusDirection::Forward),
            Key::BackTab => Some(FocusDirection::Backward),
            _ => None,
        }
    }
}

/// Index reached by one zone switch, wrapping at both ends. With nothing
/// focused, forward starts at the first zone and backward at the last.
pub fn step(current: Option<usize>, direction: FocusDirection, zone_count: usize) -> Option<usize> {
    if zone_count == 0 {
        return None;
    }
    let next = match (current.filter(|&i| i < zone_count), direction) {
        (None, FocusDirection::Forward) => 0,
        (None, FocusDirection::Backward) => zone_count - 1,
        (Some(i), FocusDirection::Forward) => (i + 1) % zone_count,
        (Some(i), FocusDirection::Backward) => (i + zone_count - 1) % zone_count,
    };
    Some(next)
}

/// Roving focus across the mounted zones.
///
/// Focus is remembered by zone, not by position, so re-registering a shorter
/// zone list can never leave it pointing at a slot that no longer exists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FocusCoordinator {
    zones: Vec<Zone>,
    focused: Option<Zone>,
}

impl FocusCoordinator {
    pub fn new(zones: impl IntoIterator<Item = Zone>) -> Self {
        let mut coordinator = Self::default();
        coordinator.register_zones(zones);
        coordinator
    }

    pub fn register_zones(&mut self, zones: impl IntoIterator<Item = Zone>) {
        self.zones = zones.into_iter().collect();
        if let Some(zone) = self.focused {
            if !self.zones.contains(&zone) {
                debug!("Focused zone '{}' was unmounted", zone);
                self.focused = None;
            }
        }
    }

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    pub fn focused_index(&self) -> Option<usize> {
        let zone = self.focused?;
        self.zones.iter().position(|&candidate| candidate == zone)
    }

    pub fn focused_zone(&self) -> Option<Zone> {
        self.focused_index().map(|index| self.zones[index])
    }

    /// Moves focus straight to `zone`, as a pointer click would.
    #[cfg(test)]
    pub fn focus(&mut self, zone: Zone) -> bool {
        if self.zones.contains(&zone) {
            self.focused = Some(zone);
            true
        } else {
            false
        }
    }

    /// Handles a zone switch key. Returns the newly focused index, or `None`
    /// when the key is left for someone else: not a switch key, a modal is
    /// open, or there are no zones.
    pub fn navigate(&mut self, key: Key, modal_open: bool) -> Option<usize> {
        if modal_open {
            return None;
        }
        let direction = FocusDirection::from_key(key)?;
        let next = step(self.focused_index(), direction, self.zones.len())?;

        let zone = self.zones[next];
        debug!("Zone focus moved to '{}' ({})", zone, next);
        self.focused = Some(zone);
        Some(next)
    }
}
