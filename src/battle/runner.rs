use crate::battle::ai::{AutoBattleAI, Behavior};
use crate::battle::engine;
use crate::battle::rng::{RandomSource, SeededRng};
use crate::battle::state::{BattleEvent, BattleSession, EventBus, GamePhase, Notification, Winner};
use crate::catalog::Catalog;
use crate::config::BattleConfig;
use crate::errors::BattleResult;
use crate::inventory::Inventory;
use crate::player::{PlayerAction, Side};
use std::sync::Arc;

/// When the processing flag is released after an action resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackMode {
    /// Released as soon as resolution finishes. Used by headless callers and tests.
    #[default]
    Instant,
    /// Held until [`BattleRunner::acknowledge_playback`], so a presentation layer can pace the
    /// events before the next action is accepted.
    Paced,
}

/// Result of executing one action.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnResult {
    pub events: Vec<BattleEvent>,
    pub phase: GamePhase,
    pub battle_ended: bool,
    pub winner: Option<Winner>,
    /// Pass back to [`BattleRunner::acknowledge_playback`] when running paced.
    pub epoch: u64,
}

/// High-level battle management interface. Owns the single battle session and its random source.
pub struct BattleRunner {
    catalog: Arc<Catalog>,
    config: BattleConfig,
    session: BattleSession,
    rng: Box<dyn RandomSource>,
    playback: PlaybackMode,
}

impl std::fmt::Debug for BattleRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BattleRunner")
            .field("session", &self.session)
            .field("playback", &self.playback)
            .finish_non_exhaustive()
    }
}

impl BattleRunner {
    /// Create a runner seeded from `config.seed`, or from the OS when unset.
    pub fn new(catalog: Arc<Catalog>, config: BattleConfig) -> BattleResult<Self> {
        let rng = Box::new(SeededRng::from_optional_seed(config.seed));
        Self::with_rng(catalog, config, rng)
    }

    pub fn with_rng(
        catalog: Arc<Catalog>,
        config: BattleConfig,
        rng: Box<dyn RandomSource>,
    ) -> BattleResult<Self> {
        let inventory = Inventory::from_catalog(&catalog, &config.starting_inventory)?;
        let session = BattleSession::new(
            catalog.type_chart().clone(),
            inventory,
            config.status_faint_ends_round,
        );
        Ok(Self {
            catalog,
            config,
            session,
            rng,
            playback: PlaybackMode::Instant,
        })
    }

    /// A runner over the bundled catalog and config.
    pub fn standard() -> BattleResult<Self> {
        let catalog = Arc::new(Catalog::standard()?.clone());
        Self::new(catalog, BattleConfig::bundled()?)
    }

    pub fn set_playback_mode(&mut self, playback: PlaybackMode) {
        self.playback = playback;
    }

    pub fn playback_mode(&self) -> PlaybackMode {
        self.playback
    }

    pub fn session(&self) -> &BattleSession {
        &self.session
    }

    #[cfg(test)]
    pub fn session_mut(&mut self) -> &mut BattleSession {
        &mut self.session
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    // --- Team select ---

    pub fn toggle_team_member(&mut self, mon_id: u32) -> BattleResult<()> {
        engine::toggle_team_member(&mut self.session, &self.catalog, mon_id)
    }

    /// Confirm the members picked with [`toggle_team_member`](Self::toggle_team_member).
    pub fn confirm_selection(&mut self) -> BattleResult<TurnResult> {
        let roster = self.session.selection.clone();
        self.confirm_team(&roster)
    }

    pub fn confirm_team(&mut self, roster: &[u32]) -> BattleResult<TurnResult> {
        let bus =
            engine::confirm_team(&mut self.session, &self.catalog, roster, self.rng.as_mut())?;
        Ok(self.turn_result(bus))
    }

    pub fn start_battle(&mut self) -> BattleResult<TurnResult> {
        let bus = engine::start_battle(&mut self.session)?;
        Ok(self.turn_result(bus))
    }

    // --- Player actions ---

    pub fn select_move(&mut self, move_index: usize) -> BattleResult<TurnResult> {
        self.submit(PlayerAction::UseMove { move_index })
    }

    pub fn select_switch(&mut self, team_index: usize) -> BattleResult<TurnResult> {
        self.submit(PlayerAction::SwitchMon { team_index })
    }

    pub fn use_item(&mut self, item: &str, target_index: usize) -> BattleResult<TurnResult> {
        self.submit(PlayerAction::UseItem {
            item: item.to_string(),
            target_index,
        })
    }

    pub fn forfeit(&mut self) -> BattleResult<TurnResult> {
        self.submit(PlayerAction::Forfeit)
    }

    pub fn submit(&mut self, action: PlayerAction) -> BattleResult<TurnResult> {
        let bus = engine::submit_action(&mut self.session, action, self.rng.as_mut())?;
        if self.playback == PlaybackMode::Instant {
            let epoch = self.session.epoch;
            engine::finish_playback(&mut self.session, epoch);
        }
        Ok(self.turn_result(bus))
    }

    /// Release the processing flag after paced playback. Stale epochs are ignored.
    pub fn acknowledge_playback(&mut self, epoch: u64) -> bool {
        engine::finish_playback(&mut self.session, epoch)
    }

    // --- Auto-battle ---

    pub fn toggle_auto_battle(&mut self) -> BattleResult<bool> {
        engine::toggle_auto_battle(&mut self.session)
    }

    /// Take one action on the player's behalf if auto-battle is on and the player may act.
    ///
    /// Returns `Ok(None)` when there was nothing to do. If the policy finds no usable move,
    /// auto-battle is switched off.
    pub fn auto_battle_step(&mut self) -> BattleResult<Option<TurnResult>> {
        if !self.session.auto_battle || !self.session.accepts_player_action() {
            return Ok(None);
        }
        match AutoBattleAI::new().decide_action(Side::Player, &self.session, self.rng.as_mut()) {
            Some(action) => self.submit(action).map(Some),
            None => {
                engine::stall_auto_battle(&mut self.session)?;
                Ok(None)
            }
        }
    }

    // --- Session ---

    /// Throw the current battle away and return to team select.
    pub fn reset(&mut self) -> BattleResult<()> {
        let inventory = Inventory::from_catalog(&self.catalog, &self.config.starting_inventory)?;
        engine::reset_session(&mut self.session, inventory);
        Ok(())
    }

    pub fn snapshot(&self) -> BattleSession {
        self.session.clone()
    }

    pub fn snapshot_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.session)
    }

    pub fn next_notification(&mut self) -> Option<Notification> {
        self.session.next_notification()
    }

    pub fn is_battle_ended(&self) -> bool {
        self.session.phase == GamePhase::GameOver
    }

    fn turn_result(&self, bus: EventBus) -> TurnResult {
        TurnResult {
            events: bus.into_events(),
            phase: self.session.phase,
            battle_ended: self.is_battle_ended(),
            winner: self.session.winner,
            epoch: self.session.epoch,
        }
    }
}
