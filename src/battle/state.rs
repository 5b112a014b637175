use crate::combatant::Combatant;
use crate::errors::ActionError;
use crate::inventory::Inventory;
use crate::player::{BattleSide, Side};
use schema::{StatusKind, TypeChart};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

pub const INITIAL_LOG_LINE: &str = "Select your team to begin!";

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GamePhase {
    TeamSelect,
    TeamPreview,
    Fight,
    ForcedSwitch,
    GameOver,
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GamePhase::TeamSelect => "team select",
            GamePhase::TeamPreview => "team preview",
            GamePhase::Fight => "the fight",
            GamePhase::ForcedSwitch => "a forced switch",
            GamePhase::GameOver => "game over",
        };
        write!(f, "{}", name)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Winner {
    Player,
    Cpu,
}

impl From<Side> for Winner {
    fn from(side: Side) -> Self {
        match side {
            Side::Player => Winner::Player,
            Side::Cpu => Winner::Cpu,
        }
    }
}

/// Cumulative per-side battle statistics.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BattleStats {
    pub damage_dealt: u32,
    pub crits_landed: u32,
    pub super_effective_hits: u32,
    pub status_effects_inflicted: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatCounter {
    DamageDealt,
    CritsLanded,
    SuperEffectiveHits,
    StatusEffectsInflicted,
}

impl BattleStats {
    pub fn add(&mut self, counter: StatCounter, amount: u32) {
        let field = match counter {
            StatCounter::DamageDealt => &mut self.damage_dealt,
            StatCounter::CritsLanded => &mut self.crits_landed,
            StatCounter::SuperEffectiveHits => &mut self.super_effective_hits,
            StatCounter::StatusEffectsInflicted => &mut self.status_effects_inflicted,
        };
        *field = field.saturating_add(amount);
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Info,
    Turn,
    Effectiveness,
    Critical,
    Status,
    Miss,
}

/// A transient on-screen message, separate from the battle log.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: u64,
    pub message: String,
    pub kind: NotificationKind,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum BattleEvent {
    // Setup
    TeamConfirmed {
        player_team: Vec<String>,
        cpu_team: Vec<String>,
    },
    BattleStarted {
        player_mon: String,
        cpu_mon: String,
    },

    // Turn Management
    TurnStarted {
        turn_number: u32,
    },
    TurnPrompt {
        side: Side,
    },

    // Actions
    MoveUsed {
        side: Side,
        mon: String,
        move_name: String,
    },
    ActionPrevented {
        side: Side,
        mon: String,
        status: StatusKind,
    },
    NoMovesLeft {
        side: Side,
        mon: String,
    },
    MoveMissed {
        side: Side,
        mon: String,
    },
    CriticalHit {
        side: Side,
    },
    AttackTypeEffectiveness {
        multiplier: f64,
    },
    DamageDealt {
        side: Side,
        target: String,
        damage: u16,
        remaining_hp: u16,
    },
    MonFainted {
        side: Side,
        mon: String,
    },
    MonSwitched {
        side: Side,
        old_mon: String,
        new_mon: String,
    },
    ForcedSwitchRequired,

    // Status Effects
    StatusApplied {
        side: Side,
        target: String,
        status: StatusKind,
    },
    StatusDamage {
        side: Side,
        target: String,
        status: StatusKind,
        damage: u16,
        remaining_hp: u16,
    },
    StatusExpired {
        side: Side,
        target: String,
        status: StatusKind,
    },

    // Items
    ItemUsed {
        item: String,
        target: String,
    },
    MonHealed {
        target: String,
        amount: u16,
        new_hp: u16,
    },
    StatusCured {
        target: String,
        status: StatusKind,
    },

    // Session
    ActionRejected {
        reason: ActionError,
    },
    AutoBattleToggled {
        enabled: bool,
    },
    Forfeited,
    BattleEnded {
        winner: Winner,
    },
}

impl BattleEvent {
    /// Battle-log line for the event. Returns None for silent events.
    pub fn format(&self) -> Option<String> {
        match self {
            BattleEvent::TeamConfirmed { .. } => None,
            BattleEvent::BattleStarted {
                player_mon,
                cpu_mon,
            } => Some(format!("{} vs {}!", player_mon, cpu_mon)),

            BattleEvent::TurnStarted { turn_number } => {
                Some(format!("--- Turn {} ---", turn_number))
            }
            BattleEvent::TurnPrompt { .. } => None,

            BattleEvent::MoveUsed {
                mon, move_name, ..
            } => Some(format!("{} used {}!", mon, move_name)),
            BattleEvent::ActionPrevented { mon, status, .. } => Some(format!(
                "{} is {} and can't move!",
                mon,
                Self::blocked_verb(*status)
            )),
            BattleEvent::NoMovesLeft { mon, .. } => Some(format!("{} has no moves left!", mon)),
            BattleEvent::MoveMissed { mon, .. } => Some(format!("{}'s attack missed!", mon)),
            BattleEvent::CriticalHit { .. } => Some("A critical hit!".to_string()),
            BattleEvent::AttackTypeEffectiveness { multiplier } => {
                Self::effectiveness_message(*multiplier).map(str::to_string)
            }
            BattleEvent::DamageDealt { .. } => None,
            BattleEvent::MonFainted { mon, .. } => Some(format!("{} fainted!", mon)),
            BattleEvent::MonSwitched {
                side: Side::Player,
                old_mon,
                new_mon,
            } => Some(format!("You switched from {} to {}!", old_mon, new_mon)),
            BattleEvent::MonSwitched {
                side: Side::Cpu,
                new_mon,
                ..
            } => Some(format!("CPU sent out {}!", new_mon)),
            BattleEvent::ForcedSwitchRequired => None,

            BattleEvent::StatusApplied { target, status, .. } => {
                Some(Self::status_applied_text(target, *status))
            }
            BattleEvent::StatusDamage { target, status, .. } => match status {
                StatusKind::Burn => Some(format!("{} was hurt by its burn!", target)),
                StatusKind::Poison => Some(format!("{} was hurt by poison!", target)),
                StatusKind::Sleep | StatusKind::Stun => None,
            },
            BattleEvent::StatusExpired { target, status, .. } => Some(match status {
                StatusKind::Burn => format!("{}'s burn was healed!", target),
                StatusKind::Poison => format!("{} was cured of poison!", target),
                StatusKind::Sleep | StatusKind::Stun => format!("{} woke up!", target),
            }),

            BattleEvent::ItemUsed { item, target } => {
                Some(format!("Used {} on {}.", item, target))
            }
            BattleEvent::MonHealed { .. } => None,
            BattleEvent::StatusCured { .. } => None,

            BattleEvent::ActionRejected { reason } => Some(reason.to_string()),
            BattleEvent::AutoBattleToggled { enabled } => Some(if *enabled {
                "Auto-Battle Enabled.".to_string()
            } else {
                "Auto-Battle Disabled.".to_string()
            }),
            BattleEvent::Forfeited => Some("You ran away from the battle...".to_string()),
            BattleEvent::BattleEnded { winner } => Some(match winner {
                Winner::Player => "You won the battle!".to_string(),
                Winner::Cpu => "The CPU won the battle!".to_string(),
            }),
        }
    }

    /// Transient notification for the event, if it raises one.
    pub fn notification(&self) -> Option<(NotificationKind, String)> {
        match self {
            BattleEvent::TurnStarted { .. } => {
                Some((NotificationKind::Turn, "Your Turn".to_string()))
            }
            BattleEvent::TurnPrompt { side: Side::Player } => {
                Some((NotificationKind::Turn, "Your Turn".to_string()))
            }
            BattleEvent::TurnPrompt { side: Side::Cpu } => {
                Some((NotificationKind::Turn, "Opponent's Turn".to_string()))
            }
            BattleEvent::ForcedSwitchRequired => Some((
                NotificationKind::Turn,
                "Choose your next Project!".to_string(),
            )),
            BattleEvent::ActionPrevented { mon, status, .. } => Some((
                NotificationKind::Status,
                format!("{} is {}!", mon, Self::blocked_verb(*status)),
            )),
            BattleEvent::MoveMissed { .. } => {
                Some((NotificationKind::Miss, "Attack missed!".to_string()))
            }
            BattleEvent::CriticalHit { .. } => {
                Some((NotificationKind::Critical, "A critical hit!".to_string()))
            }
            BattleEvent::AttackTypeEffectiveness { multiplier } => {
                Self::effectiveness_message(*multiplier)
                    .map(|message| (NotificationKind::Effectiveness, message.to_string()))
            }
            BattleEvent::StatusApplied { target, status, .. } => Some((
                NotificationKind::Status,
                Self::status_applied_text(target, *status),
            )),
            BattleEvent::StatusDamage { .. } => self
                .format()
                .map(|message| (NotificationKind::Status, message)),
            BattleEvent::StatusExpired {
                status: StatusKind::Burn | StatusKind::Poison,
                ..
            } => self.format().map(|message| (NotificationKind::Info, message)),
            BattleEvent::AutoBattleToggled { enabled } => Some((
                NotificationKind::Info,
                format!("Auto-Battle {}", if *enabled { "ON" } else { "OFF" }),
            )),
            _ => None,
        }
    }

    // --- Private Helper Functions ---

    fn effectiveness_message(multiplier: f64) -> Option<&'static str> {
        schema::Effectiveness { multiplier }.message()
    }

    fn blocked_verb(status: StatusKind) -> &'static str {
        match status {
            StatusKind::Sleep => "asleep",
            _ => "stunned",
        }
    }

    fn status_applied_text(target: &str, status: StatusKind) -> String {
        match status {
            StatusKind::Sleep => format!("{} fell asleep!", target),
            StatusKind::Burn => format!("{} was burned!", target),
            StatusKind::Poison => format!("{} was poisoned!", target),
            StatusKind::Stun => format!("{} was stunned!", target),
        }
    }
}

/// Event bus for collecting the events produced while resolving one action.
#[derive(Debug, Clone, Default)]
pub struct EventBus {
    events: Vec<BattleEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, event: BattleEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[BattleEvent] {
        &self.events
    }

    pub fn into_events(self) -> Vec<BattleEvent> {
        self.events
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

/// The complete, serializable state of one battle.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BattleSession {
    pub phase: GamePhase,
    /// Indexed by `Side::to_index`.
    pub sides: [BattleSide; 2],
    /// Catalog ids picked so far during team select.
    pub selection: Vec<u32>,
    pub turn_number: u32,
    pub log: Vec<String>,
    pub latest_notification: Option<Notification>,
    notification_queue: VecDeque<Notification>,
    next_notification_id: u64,
    pub stats: [BattleStats; 2],
    pub winner: Option<Winner>,
    pub inventory: Inventory,
    pub type_chart: TypeChart,
    pub status_faint_ends_round: bool,
    pub player_turn: bool,
    pub processing: bool,
    pub auto_battle: bool,
    /// The CPU still has to act this round once the player's forced switch completes.
    pub pending_cpu_step: bool,
    /// Bumped on every reset so stale playback acknowledgements can be ignored.
    pub epoch: u64,
}

impl BattleSession {
    pub fn new(type_chart: TypeChart, inventory: Inventory, status_faint_ends_round: bool) -> Self {
        Self {
            phase: GamePhase::TeamSelect,
            sides: [BattleSide::default(), BattleSide::default()],
            selection: Vec::new(),
            turn_number: 1,
            log: vec![INITIAL_LOG_LINE.to_string()],
            latest_notification: None,
            notification_queue: VecDeque::new(),
            next_notification_id: 0,
            stats: [BattleStats::default(); 2],
            winner: None,
            inventory,
            type_chart,
            status_faint_ends_round,
            player_turn: false,
            processing: false,
            auto_battle: false,
            pending_cpu_step: false,
            epoch: 0,
        }
    }

    /// Back to team select with `inventory`. Keeps the type chart and round rule, bumps the epoch
    /// and continues notification ids so nothing from the old battle can be confused for new.
    pub fn reset(&mut self, inventory: Inventory) {
        let mut fresh = Self::new(
            std::mem::take(&mut self.type_chart),
            inventory,
            self.status_faint_ends_round,
        );
        fresh.epoch = self.epoch + 1;
        fresh.next_notification_id = self.next_notification_id;
        *self = fresh;
    }

    pub fn side(&self, side: Side) -> &BattleSide {
        &self.sides[side.to_index()]
    }

    pub fn side_mut(&mut self, side: Side) -> &mut BattleSide {
        &mut self.sides[side.to_index()]
    }

    pub fn active(&self, side: Side) -> Option<&Combatant> {
        self.side(side).active()
    }

    pub fn stats(&self, side: Side) -> &BattleStats {
        &self.stats[side.to_index()]
    }

    /// Append an event's log line and notification, if it has them.
    pub fn record(&mut self, event: &BattleEvent) {
        if let Some(line) = event.format() {
            self.log.push(line);
        }
        if let Some((kind, message)) = event.notification() {
            self.notify(kind, message);
        }
    }

    pub fn record_all(&mut self, events: &[BattleEvent]) {
        for event in events {
            self.record(event);
        }
    }

    pub fn notify(&mut self, kind: NotificationKind, message: String) {
        let notification = Notification {
            id: self.next_notification_id,
            message,
            kind,
        };
        self.next_notification_id += 1;
        self.latest_notification = Some(notification.clone());
        self.notification_queue.push_back(notification);
    }

    /// Pop the oldest notification the presentation layer has not shown yet.
    pub fn next_notification(&mut self) -> Option<Notification> {
        self.notification_queue.pop_front()
    }

    pub fn pending_notifications(&self) -> usize {
        self.notification_queue.len()
    }

    /// Whether the player may submit an action right now.
    pub fn accepts_player_action(&self) -> bool {
        matches!(self.phase, GamePhase::Fight | GamePhase::ForcedSwitch)
            && self.player_turn
            && !self.processing
    }
}
