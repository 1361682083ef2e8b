use strum_macros::{Display, EnumIter};

/// A unit of transmission work owed to the appliance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum PendingAction {
    /// Send the current full-state frame.
    ShortUpdate,
    /// Send the extended power-on frame.
    PowerOn,
    /// Send the fixed power-off frame.
    PowerOff,
}

impl PendingAction {
    /// Drain order, highest priority first.
    pub const PRIORITY: [PendingAction; 3] = [
        PendingAction::ShortUpdate,
        PendingAction::PowerOn,
        PendingAction::PowerOff,
    ];

    const fn bit(self) -> u8 {
        match self {
            PendingAction::ShortUpdate => 0b001,
            PendingAction::PowerOn => 0b010,
            PendingAction::PowerOff => 0b100,
        }
    }
}

/// Coalescing set of owed transmissions.
///
/// Raising an action that is already pending is a no-op, so any burst of
/// property changes between two drains costs at most one frame per action.
/// Power actions supersede each other and any pending short update: the
/// latest power intent wins, and a power-on frame already carries the full
/// state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PendingSignals(u8);

impl PendingSignals {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&mut self, action: PendingAction) {
        match action {
            PendingAction::ShortUpdate => {
                if self.contains(PendingAction::PowerOn) {
                    trace!("short update folded into pending power on");
                    return;
                }
            }
            PendingAction::PowerOn => {
                self.clear(PendingAction::ShortUpdate);
                self.clear(PendingAction::PowerOff);
            }
            PendingAction::PowerOff => {
                self.clear(PendingAction::ShortUpdate);
                self.clear(PendingAction::PowerOn);
            }
        }
        trace!("raising {}", action);
        self.0 |= action.bit();
    }

    pub fn contains(&self, action: PendingAction) -> bool {
        self.0 & action.bit() != 0
    }

    /// Returns whether the action was pending.
    pub fn clear(&mut self, action: PendingAction) -> bool {
        let was_set = self.contains(action);
        self.0 &= !action.bit();
        was_set
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Highest priority pending action, without removing it.
    pub fn peek(&self) -> Option<PendingAction> {
        PendingAction::PRIORITY
            .iter()
            .copied()
            .find(|a| self.contains(*a))
    }

    /// Removes and returns the highest priority pending action.
    pub fn take(&mut self) -> Option<PendingAction> {
        let next = self.peek()?;
        self.clear(next);
        Some(next)
    }

    pub fn iter(&self) -> impl Iterator<Item = PendingAction> + '_ {
        PendingAction::PRIORITY
            .iter()
            .copied()
            .filter(move |a| self.contains(*a))
    }
}
