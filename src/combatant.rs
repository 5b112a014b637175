use schema::{BaseStats, MonTemplate, MonType, MoveTemplate, StatusKind};
use serde::{Deserialize, Serialize};

/// Active status with its remaining turn count.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusCondition {
    Burn(u8),
    Poison(u8),
    Sleep(u8),
    Stun(u8),
}

impl StatusCondition {
    /// A freshly inflicted status with its full duration.
    pub fn inflict(kind: StatusKind) -> Self {
        Self::with_turns(kind, kind.initial_turns())
    }

    pub fn with_turns(kind: StatusKind, turns: u8) -> Self {
        match kind {
            StatusKind::Burn => StatusCondition::Burn(turns),
            StatusKind::Poison => StatusCondition::Poison(turns),
            StatusKind::Sleep => StatusCondition::Sleep(turns),
            StatusKind::Stun => StatusCondition::Stun(turns),
        }
    }

    pub fn kind(&self) -> StatusKind {
        match self {
            StatusCondition::Burn(_) => StatusKind::Burn,
            StatusCondition::Poison(_) => StatusKind::Poison,
            StatusCondition::Sleep(_) => StatusKind::Sleep,
            StatusCondition::Stun(_) => StatusKind::Stun,
        }
    }

    pub fn turns_remaining(&self) -> u8 {
        match *self {
            StatusCondition::Burn(turns)
            | StatusCondition::Poison(turns)
            | StatusCondition::Sleep(turns)
            | StatusCondition::Stun(turns) => turns,
        }
    }

    /// The same status one turn later, or `None` once the counter runs out.
    pub fn decremented(&self) -> Option<Self> {
        match self.turns_remaining().saturating_sub(1) {
            0 => None,
            turns => Some(Self::with_turns(self.kind(), turns)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveSlot {
    pub template: MoveTemplate,
    pub uses: u8,
}

impl MoveSlot {
    pub fn new(template: MoveTemplate) -> Self {
        let uses = template.max_uses;
        Self { template, uses }
    }

    pub fn name(&self) -> &str {
        &self.template.name
    }

    pub fn max_uses(&self) -> u8 {
        self.template.max_uses
    }

    pub fn is_usable(&self) -> bool {
        self.uses > 0
    }

    /// Spend one use. Returns false when the slot was already empty.
    pub fn use_move(&mut self) -> bool {
        if self.uses > 0 {
            self.uses -= 1;
            true
        } else {
            false
        }
    }
}

/// A battle-ready team member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Combatant {
    pub id: u32,
    pub name: String,
    pub types: Vec<MonType>,
    pub stats: BaseStats,
    current_hp: u16,
    pub status: Option<StatusCondition>,
    pub moves: Vec<MoveSlot>,
}

impl Combatant {
    pub fn from_template(template: &MonTemplate) -> Self {
        Self {
            id: template.id,
            name: template.name.clone(),
            types: template.types.clone(),
            stats: template.stats,
            current_hp: template.stats.hp,
            status: None,
            moves: template.moves.iter().cloned().map(MoveSlot::new).collect(),
        }
    }

    pub fn current_hp(&self) -> u16 {
        self.current_hp
    }

    pub fn max_hp(&self) -> u16 {
        self.stats.hp
    }

    pub fn is_fainted(&self) -> bool {
        self.current_hp == 0
    }

    pub fn is_at_full_hp(&self) -> bool {
        self.current_hp >= self.max_hp()
    }

    /// Apply damage, clamped at zero. Returns true if this damage caused the faint.
    pub fn take_damage(&mut self, amount: u16) -> bool {
        let was_standing = !self.is_fainted();
        self.current_hp = self.current_hp.saturating_sub(amount);
        was_standing && self.is_fainted()
    }

    /// Restore HP up to the maximum. Returns the amount actually restored.
    pub fn heal(&mut self, amount: u16) -> u16 {
        let before = self.current_hp;
        self.current_hp = self.current_hp.saturating_add(amount).min(self.max_hp());
        self.current_hp - before
    }

    pub fn set_hp(&mut self, hp: u16) {
        self.current_hp = hp.min(self.max_hp());
    }

    /// Clears the status tag and its counter together.
    pub fn cure_status(&mut self) -> Option<StatusCondition> {
        self.status.take()
    }

    pub fn status_turns_remaining(&self) -> u8 {
        self.status.map_or(0, |status| status.turns_remaining())
    }

    /// Set when sleep or stun will skip this combatant's next action.
    pub fn blocking_status(&self) -> Option<StatusCondition> {
        self.status.filter(|status| status.kind().blocks_action())
    }

    /// Indices of moves with uses remaining, in loadout order.
    pub fn usable_moves(&self) -> Vec<usize> {
        self.moves
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_usable())
            .map(|(index, _)| index)
            .collect()
    }
}
