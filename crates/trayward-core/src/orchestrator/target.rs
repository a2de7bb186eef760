use std::collections::HashMap;

use crate::window::{ManagedWindowInfo, WindowEnumerator, WindowHandle};

/// Maximum number of owner links followed when resolving an action target.
pub const MAX_OWNER_HOPS: usize = 8;

/// Handle → owner lookup for one round.
///
/// Used to redirect actions from a transient owned dialog to the root
/// application window that owns it. Owners come from the round's snapshot
/// first; hidden owners the snapshot leaves out are asked of `live`.
pub struct OwnerTable<'a> {
    owners: HashMap<WindowHandle, WindowHandle>,
    live: &'a dyn WindowEnumerator,
}

impl<'a> OwnerTable<'a> {
    pub fn new(windows: &[ManagedWindowInfo], live: &'a dyn WindowEnumerator) -> Self {
        Self {
            owners: windows
                .iter()
                .map(|w| (w.handle, w.owner_handle))
                .collect(),
            live,
        }
    }

    /// Owner of `handle`, or `None` when it is no longer a window.
    fn owner_of(&self, handle: WindowHandle) -> Option<WindowHandle> {
        if let Some(&owner) = self.owners.get(&handle) {
            return Some(owner);
        }
        self.live
            .is_window(handle)
            .then(|| self.live.owner_of(handle))
    }

    /// Walks the owner chain of `window` to its topmost owner.
    ///
    /// Stops at a null owner, a self reference, a handle already visited,
    /// an owner that is no longer a window, or after [`MAX_OWNER_HOPS`].
    pub fn resolve(&self, window: &ManagedWindowInfo) -> WindowHandle {
        let mut target = window.handle;
        let mut owner = window.owner_handle;
        let mut visited = vec![target];

        for _ in 0..MAX_OWNER_HOPS {
            if owner == 0 || owner == target || visited.contains(&owner) {
                break;
            }
            let Some(next) = self.owner_of(owner) else {
                break;
            };
            visited.push(owner);
            target = owner;
            owner = next;
        }
        target
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::NullEnumerator;

    fn win(handle: WindowHandle, owner: WindowHandle) -> ManagedWindowInfo {
        ManagedWindowInfo {
            handle,
            owner_handle: owner,
            ..Default::default()
        }
    }

    /// Live windows the snapshot never lists.
    struct Hidden(Vec<ManagedWindowInfo>);

    impl WindowEnumerator for Hidden {
        fn enumerate(&self) -> Vec<ManagedWindowInfo> {
            Vec::new()
        }

        fn is_window(&self, handle: WindowHandle) -> bool {
            self.0.iter().any(|w| w.handle == handle)
        }

        fn owner_of(&self, handle: WindowHandle) -> WindowHandle {
            self.0
                .iter()
                .find(|w| w.handle == handle)
                .map_or(0, |w| w.owner_handle)
        }
    }

    #[test]
    fn unowned_window_targets_itself() {
        let windows = vec![win(1, 0)];
        let table = OwnerTable::new(&windows, &NullEnumerator);

        assert_eq!(table.resolve(&windows[0]), 1);
    }

    #[test]
    fn dialog_resolves_to_root_owner() {
        // Arrange: 3 -> 2 -> 1
        let windows = vec![win(1, 0), win(2, 1), win(3, 2)];
        let table = OwnerTable::new(&windows, &NullEnumerator);

        // Act / Assert
        assert_eq!(table.resolve(&windows[2]), 1);
        assert_eq!(table.resolve(&windows[1]), 1);
    }

    #[test]
    fn destroyed_owner_is_not_followed() {
        let windows = vec![win(5, 0xDEAD)];
        let table = OwnerTable::new(&windows, &NullEnumerator);

        assert_eq!(table.resolve(&windows[0]), 5);
    }

    #[test]
    fn hidden_owner_chain_is_followed_through_live_queries() {
        // Arrange: visible 3 -> hidden 2 -> hidden 1
        let windows = vec![win(3, 2)];
        let live = Hidden(vec![win(2, 1), win(1, 0)]);
        let table = OwnerTable::new(&windows, &live);

        // Act
        let target = table.resolve(&windows[0]);

        // Assert
        assert_eq!(target, 1);
    }

    #[test]
    fn self_owned_window_targets_itself() {
        let windows = vec![win(7, 7)];
        let table = OwnerTable::new(&windows, &NullEnumerator);

        assert_eq!(table.resolve(&windows[0]), 7);
    }

    #[test]
    fn owner_cycle_terminates() {
        // Arrange: 1 -> 2 -> 3 -> 1
        let windows = vec![win(1, 2), win(2, 3), win(3, 1)];
        let table = OwnerTable::new(&windows, &NullEnumerator);

        // Act
        let target = table.resolve(&windows[0]);

        // Assert: stops before revisiting the start.
        assert_eq!(target, 3);
    }

    #[test]
    fn walk_is_bounded_by_max_hops() {
        // Arrange: a chain 100 -> 99 -> ... -> 1 -> (unowned)
        let windows: Vec<_> = (1..=100).map(|h| win(h, h - 1)).collect();
        let table = OwnerTable::new(&windows, &NullEnumerator);

        // Act
        let target = table.resolve(&windows[99]);

        // Assert
        assert_eq!(target, 100 - MAX_OWNER_HOPS);
    }
}
