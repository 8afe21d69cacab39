//! Shared stacking and placement helpers used by the desktop reducer.
//!
//! Stacking policy: minimized windows keep their z-index and still count toward the current
//! maximum, and every raise (open, focus, restore) goes above the highest value ever assigned.
//! Raised z-indexes are therefore strictly increasing for the lifetime of a [`DesktopState`].

use desktop_app_contract::WindowPosition;

use crate::model::{DesktopState, WindowId};

/// Returns the highest z-index currently in play, never below `floor`.
pub fn current_max_z_index(state: &DesktopState, floor: u32) -> u32 {
    state
        .windows
        .iter()
        .map(|w| w.z_index)
        .chain([floor, state.top_z_index])
        .max()
        .unwrap_or(floor)
}

/// Reserves and returns the z-index for the next raise.
pub fn next_raise_z_index(state: &mut DesktopState, floor: u32) -> u32 {
    let z_index = current_max_z_index(state, floor).saturating_add(1);
    state.top_z_index = z_index;
    z_index
}

/// Raises `window_id` to the top of the stack.
///
/// Returns `false` without touching state when the window is already frontmost or missing.
pub fn raise_window(state: &mut DesktopState, window_id: WindowId, floor: u32) -> bool {
    if state.frontmost_window_id() == Some(window_id) {
        return false;
    }
    if state.window(window_id).is_none() {
        return false;
    }
    let z_index = next_raise_z_index(state, floor);
    if let Some(window) = state.windows.iter_mut().find(|w| w.id == window_id) {
        window.z_index = z_index;
    }
    true
}

/// Offsets `base` so repeated opens cascade instead of stacking exactly on top of each other.
///
/// The offset grows by `step` on both axes per open window and wraps every `wrap` windows.
pub fn cascade_position(base: WindowPosition, open_count: usize, step: i32, wrap: usize) -> WindowPosition {
    let slot = (open_count % wrap.max(1)) as i32;
    base.offset(slot * step, slot * step)
}

/// Allocates the next window id.
pub fn next_window_id(state: &mut DesktopState) -> WindowId {
    let id = WindowId(state.next_window_id.max(1));
    state.next_window_id = id.0.saturating_add(1);
    id
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn empty_state_starts_above_the_floor() {
        let mut state = DesktopState::default();
        assert_eq!(current_max_z_index(&state, 9), 9);
        assert_eq!(next_raise_z_index(&mut state, 9), 10);
        assert_eq!(next_raise_z_index(&mut state, 9), 11);
        assert_eq!(state.top_z_index, 11);
    }

    #[test]
    fn cascade_wraps_every_ten_windows() {
        let base = WindowPosition { x: 100, y: 80 };
        assert_eq!(cascade_position(base, 0, 25, 10), base);
        assert_eq!(cascade_position(base, 3, 25, 10), WindowPosition { x: 175, y: 155 });
        assert_eq!(cascade_position(base, 10, 25, 10), base);
        assert_eq!(cascade_position(base, 11, 25, 10), WindowPosition { x: 125, y: 105 });
    }

    #[test]
    fn window_ids_are_allocated_sequentially_from_one() {
        let mut state = DesktopState::default();
        assert_eq!(next_window_id(&mut state), WindowId(1));
        assert_eq!(next_window_id(&mut state), WindowId(2));
        state.next_window_id = 40;
        assert_eq!(next_window_id(&mut state), WindowId(40));
    }
}
