//! Soft takeover for the three physical pots.
//!
//! A pot's absolute position rarely matches the parameter it is about to
//! control (after a preset load or a change of focus). Instead of jumping,
//! a [`TakeoverPot`] holds the parameter until the pot moves, then walks it
//! one unit per movement in the pot's direction until the pot's scaled
//! position meets or crosses the walked value, and only then tracks the pot
//! directly.

use crate::params::ParameterIndex;
use crate::ui::buttons;

/// Host-owned parameter storage the pots write into.
pub trait ParameterHost {
    fn value(&self, index: ParameterIndex) -> i32;

    /// Inclusive range, or `None` if the host does not know the parameter.
    fn range(&self, index: ParameterIndex) -> Option<(i32, i32)>;

    /// Store a value coming from the UI. Callers clamp beforehand.
    fn set_from_ui(&mut self, index: ParameterIndex, value: i32);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TakeoverState {
    /// Parameter untouched until the pot leaves its reference position.
    HoldingWaitForMove,
    /// Parameter nudged by one per movement towards the pot.
    RelativelyAdjusting,
    /// Parameter follows the scaled pot position.
    DirectControl,
}

#[derive(Debug, Clone)]
pub struct TakeoverPot {
    pot_index: usize,
    button_mask: u16,
    primary: ParameterIndex,
    alternate: Option<ParameterIndex>,
    primary_scale: f32,
    alternate_scale: f32,
    controlling_alternate: bool,
    state: TakeoverState,
    held_value: i32,
    hold_start: f32,
    previous_position: Option<f32>,
    /// `target - held` seen on the previous tick, for crossing detection.
    previous_gap: i32,
    needs_sync: bool,
}

impl TakeoverPot {
    pub fn new(pot_index: usize, primary: ParameterIndex) -> Self {
        let button_mask = match pot_index {
            0 => buttons::POT_BUTTON_L,
            1 => buttons::POT_BUTTON_C,
            _ => buttons::POT_BUTTON_R,
        };
        Self {
            pot_index,
            button_mask,
            primary,
            alternate: None,
            primary_scale: 255.0,
            alternate_scale: 255.0,
            controlling_alternate: false,
            state: TakeoverState::DirectControl,
            held_value: 0,
            hold_start: 0.0,
            previous_position: None,
            previous_gap: 0,
            needs_sync: true,
        }
    }

    /// Point the pot at new parameters. Takes effect, holding, on the next
    /// [`TakeoverPot::update`]. Non-positive scales become 1.
    pub fn configure(
        &mut self,
        primary: ParameterIndex,
        alternate: Option<ParameterIndex>,
        primary_scale: f32,
        alternate_scale: f32,
    ) {
        self.primary = primary;
        self.alternate = alternate;
        self.primary_scale = if primary_scale > 0.0 { primary_scale } else { 1.0 };
        self.alternate_scale = if alternate_scale > 0.0 { alternate_scale } else { 1.0 };
        self.needs_sync = true;
    }

    pub fn reset_for_mode_switch(&mut self) {
        self.controlling_alternate = false;
        self.needs_sync = true;
    }

    pub fn reset_for_new_primary(&mut self) {
        self.controlling_alternate = false;
        self.needs_sync = true;
    }

    /// Hold the active parameter at its current value, using `position` as
    /// the reference the pot has to leave.
    pub fn sync_physical_value(&mut self, position: f32, host: &impl ParameterHost) {
        self.hold(position, host);
        self.previous_position = Some(position);
        self.needs_sync = false;
    }

    /// Process one UI tick with the pot at `position` (0.0-1.0).
    pub fn update(
        &mut self,
        position: f32,
        buttons: u16,
        last_buttons: u16,
        host: &mut impl ParameterHost,
    ) {
        if self.needs_sync {
            self.sync_physical_value(position, &*host);
            return;
        }

        if self.alternate.is_some() {
            let pressed = buttons & self.button_mask != 0;
            let was_pressed = last_buttons & self.button_mask != 0;
            if pressed && !was_pressed && !self.controlling_alternate {
                self.controlling_alternate = true;
                self.hold(position, &*host);
            } else if !pressed && was_pressed && self.controlling_alternate {
                self.controlling_alternate = false;
                self.hold(position, &*host);
            }
        } else if self.controlling_alternate {
            self.controlling_alternate = false;
            self.hold(position, &*host);
        }

        let (param, scale) = self.active();
        let target = scaled_target(position, scale);

        if self.state == TakeoverState::HoldingWaitForMove && position != self.hold_start {
            self.transition(TakeoverState::RelativelyAdjusting);
        }

        match self.state {
            TakeoverState::HoldingWaitForMove => {}
            TakeoverState::RelativelyAdjusting => {
                let previous = self.previous_position.unwrap_or(self.hold_start);
                self.catch_up(param, position, previous, target, host);
            }
            TakeoverState::DirectControl => {
                let moved = self.previous_position.is_none_or(|prev| prev != position);
                if moved {
                    self.held_value = set_clamped(host, param, target);
                }
            }
        }

        self.previous_position = Some(position);
    }

    fn catch_up(
        &mut self,
        param: ParameterIndex,
        position: f32,
        previous: f32,
        target: i32,
        host: &mut impl ParameterHost,
    ) {
        let gap = target - self.held_value;
        if gap == 0 || gap.signum() != self.previous_gap.signum() {
            // Met or crossed by the pot since the last tick.
            self.held_value = set_clamped(host, param, target);
            self.transition(TakeoverState::DirectControl);
            return;
        }

        if position != previous {
            let step = if position > previous { 1 } else { -1 };
            let nudged = self.held_value + step;
            self.held_value = set_clamped(host, param, nudged);
            if self.held_value == target {
                self.transition(TakeoverState::DirectControl);
                return;
            }
        }
        self.previous_gap = target - self.held_value;
    }

    fn hold(&mut self, position: f32, host: &impl ParameterHost) {
        let (param, scale) = self.active();
        self.held_value = host.value(param);
        self.hold_start = position;
        self.previous_gap = scaled_target(position, scale) - self.held_value;
        self.transition(TakeoverState::HoldingWaitForMove);
    }

    fn transition(&mut self, state: TakeoverState) {
        if self.state != state {
            tracing::trace!(pot = self.pot_index, from = ?self.state, to = ?state, "takeover");
        }
        self.state = state;
    }

    fn active(&self) -> (ParameterIndex, f32) {
        match self.alternate {
            Some(alternate) if self.controlling_alternate => (alternate, self.alternate_scale),
            _ => (self.primary, self.primary_scale),
        }
    }

    pub fn state(&self) -> TakeoverState {
        self.state
    }

    pub fn held_value(&self) -> i32 {
        self.held_value
    }

    pub fn controlling_alternate(&self) -> bool {
        self.controlling_alternate
    }

    pub fn active_parameter(&self) -> ParameterIndex {
        self.active().0
    }

    pub fn pot_index(&self) -> usize {
        self.pot_index
    }
}

/// Parameter value a pot position maps to directly.
pub fn scaled_target(position: f32, scale: f32) -> i32 {
    (position * scale + 0.5) as i32
}

/// Clamp into the host's range and write; unknown parameters are left alone.
fn set_clamped(host: &mut impl ParameterHost, param: ParameterIndex, value: i32) -> i32 {
    let Some((min, max)) = host.range(param) else {
        return value;
    };
    let value = value.clamp(min, max);
    host.set_from_ui(param, value);
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParameterValues;

    fn host_with(param: ParameterIndex, value: i32) -> ParameterValues {
        let mut host = ParameterValues::default();
        host.set(param, value);
        host
    }

    #[test]
    fn first_update_only_syncs() {
        let mut host = host_with(ParameterIndex::Density1, 100);
        let mut pot = TakeoverPot::new(0, ParameterIndex::Density1);
        pot.configure(ParameterIndex::Density1, None, 255.0, 255.0);
        pot.update(0.9, 0, 0, &mut host);
        assert_eq!(pot.state(), TakeoverState::HoldingWaitForMove);
        assert_eq!(host.value(ParameterIndex::Density1), 100);

        pot.update(0.9, 0, 0, &mut host);
        assert_eq!(host.value(ParameterIndex::Density1), 100, "a still pot changes nothing");
    }

    #[test]
    fn first_movement_nudges_by_one() {
        let mut host = host_with(ParameterIndex::Density1, 100);
        let mut pot = TakeoverPot::new(0, ParameterIndex::Density1);
        pot.update(0.9, 0, 0, &mut host);
        pot.update(0.88, 0, 0, &mut host);
        assert_eq!(pot.state(), TakeoverState::RelativelyAdjusting);
        assert_eq!(host.value(ParameterIndex::Density1), 99);
    }

    #[test]
    fn reaching_target_switches_to_direct() {
        let mut host = host_with(ParameterIndex::Density1, 101);
        let mut pot = TakeoverPot::new(0, ParameterIndex::Density1);
        // 0.4 * 255 rounds to 102: one nudge up meets it.
        pot.update(0.396, 0, 0, &mut host);
        pot.update(0.4, 0, 0, &mut host);
        assert_eq!(pot.state(), TakeoverState::DirectControl);
        assert_eq!(host.value(ParameterIndex::Density1), 102);

        pot.update(0.5, 0, 0, &mut host);
        assert_eq!(host.value(ParameterIndex::Density1), 128);
    }

    #[test]
    fn writes_are_clamped_to_range() {
        let mut host = host_with(ParameterIndex::Length1, 32);
        let mut pot = TakeoverPot::new(0, ParameterIndex::Length1);
        pot.configure(ParameterIndex::Length1, None, 64.0, 1.0);
        pot.update(0.2, 0, 0, &mut host);
        pot.update(0.3, 0, 0, &mut host);
        // Target 19 is below 32 and we moved up: nudge to 33 clamps to 32.
        assert_eq!(host.value(ParameterIndex::Length1), 32);
        assert_eq!(pot.held_value(), 32);
    }

    #[test]
    fn non_positive_scale_becomes_one() {
        let mut host = host_with(ParameterIndex::Mode, 0);
        let mut pot = TakeoverPot::new(0, ParameterIndex::Mode);
        pot.configure(ParameterIndex::Mode, None, 0.0, -3.0);
        pot.update(0.0, 0, 0, &mut host);
        pot.update(0.7, 0, 0, &mut host);
        assert_eq!(pot.state(), TakeoverState::DirectControl);
        assert_eq!(host.value(ParameterIndex::Mode), 1);
    }

    #[test]
    fn alternate_follows_the_button() {
        let mut host = host_with(ParameterIndex::Density3, 40);
        host.set(ParameterIndex::ChaosAmount, 200);
        let mut pot = TakeoverPot::new(2, ParameterIndex::Density3);
        pot.configure(
            ParameterIndex::Density3,
            Some(ParameterIndex::ChaosAmount),
            255.0,
            255.0,
        );
        pot.update(0.5, 0, 0, &mut host);

        pot.update(0.5, buttons::POT_BUTTON_R, 0, &mut host);
        assert!(pot.controlling_alternate());
        assert_eq!(pot.active_parameter(), ParameterIndex::ChaosAmount);
        assert_eq!(pot.state(), TakeoverState::HoldingWaitForMove);
        assert_eq!(pot.held_value(), 200);

        pot.update(0.52, buttons::POT_BUTTON_R, buttons::POT_BUTTON_R, &mut host);
        assert_eq!(host.value(ParameterIndex::ChaosAmount), 201);
        assert_eq!(host.value(ParameterIndex::Density3), 40);

        pot.update(0.52, 0, buttons::POT_BUTTON_R, &mut host);
        assert!(!pot.controlling_alternate());
        assert_eq!(pot.held_value(), 40);
    }

    #[test]
    fn button_without_alternate_is_ignored() {
        let mut host = host_with(ParameterIndex::Density1, 10);
        let mut pot = TakeoverPot::new(0, ParameterIndex::Density1);
        pot.update(0.5, 0, 0, &mut host);
        pot.update(0.5, buttons::POT_BUTTON_L, 0, &mut host);
        assert!(!pot.controlling_alternate());
        assert_eq!(pot.state(), TakeoverState::HoldingWaitForMove);
    }

    #[test]
    fn reconfigure_rearms_holding() {
        let mut host = host_with(ParameterIndex::Fill1, 128);
        host.set(ParameterIndex::Length1, 16);
        let mut pot = TakeoverPot::new(0, ParameterIndex::Fill1);
        pot.update(0.5, 0, 0, &mut host);
        pot.update(0.6, 0, 0, &mut host);
        pot.update(0.7, 0, 0, &mut host);
        assert_eq!(pot.state(), TakeoverState::DirectControl);

        pot.configure(ParameterIndex::Length1, None, 32.0, 1.0);
        pot.reset_for_new_primary();
        pot.update(0.7, 0, 0, &mut host);
        assert_eq!(pot.state(), TakeoverState::HoldingWaitForMove);
        assert_eq!(host.value(ParameterIndex::Length1), 16);
    }
}
