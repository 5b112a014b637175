use crate::battle::ai::{choose_replacement, Behavior, RandomMoveAI};
use crate::battle::calculators::{calculate_item_outcome, calculate_move_outcome};
use crate::battle::commands::{execute_command_batch, BattleCommand};
use crate::battle::conditions::{calculate_action_prevention, calculate_status_tick};
use crate::battle::rng::RandomSource;
use crate::battle::state::{BattleEvent, BattleSession, EventBus, GamePhase, Winner};
use crate::catalog::Catalog;
use crate::combatant::Combatant;
use crate::errors::{ActionError, BattleEngineError, BattleResult, BattleStateError};
use crate::inventory::Inventory;
use crate::player::{BattleSide, PlayerAction, Side, TEAM_SIZE};
use schema::ItemEffect;
use std::collections::HashSet;
use tracing::{debug, error, info, warn};

/// What the faint protocol decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FaintOutcome {
    BattleOver,
    ForcedSwitch,
    CpuReplaced,
}

/// Record a rejected action in the log (when it is user-visible) and turn it into an error.
fn reject(session: &mut BattleSession, error: ActionError) -> BattleEngineError {
    debug!(reason = %error, phase = %session.phase, "action rejected");
    if error.is_logged() {
        session.record(&BattleEvent::ActionRejected {
            reason: error.clone(),
        });
    }
    error.into()
}

fn require_phase(session: &BattleSession, phase: GamePhase) -> Result<(), ActionError> {
    if session.phase == phase {
        Ok(())
    } else {
        Err(ActionError::WrongPhase(session.phase))
    }
}

// --- Team select ---

/// Add `mon_id` to the pending selection, or remove it if already picked.
pub fn toggle_team_member(
    session: &mut BattleSession,
    catalog: &Catalog,
    mon_id: u32,
) -> BattleResult<()> {
    let checked = require_phase(session, GamePhase::TeamSelect).and_then(|()| {
        catalog
            .mon(mon_id)
            .map(|_| ())
            .map_err(|_| ActionError::UnknownMon(mon_id))
    });
    if let Err(error) = checked {
        return Err(reject(session, error));
    }

    if let Some(position) = session.selection.iter().position(|&id| id == mon_id) {
        session.selection.remove(position);
    } else if session.selection.len() >= TEAM_SIZE {
        return Err(reject(session, ActionError::TeamFull));
    } else {
        session.selection.push(mon_id);
    }
    Ok(())
}

fn build_player_team(catalog: &Catalog, roster: &[u32]) -> Result<Vec<Combatant>, ActionError> {
    if roster.len() != TEAM_SIZE {
        return Err(ActionError::InvalidTeamSize {
            selected: roster.len(),
        });
    }
    let mut seen = HashSet::new();
    roster
        .iter()
        .map(|&id| {
            let template = catalog.mon(id).map_err(|_| ActionError::UnknownMon(id))?;
            if !seen.insert(id) {
                return Err(ActionError::DuplicateMon {
                    mon: template.name.clone(),
                });
            }
            Ok(Combatant::from_template(template))
        })
        .collect()
}

/// Three distinct catalog members not on the player's roster, chosen uniformly at random.
fn draw_cpu_team(
    catalog: &Catalog,
    roster: &[u32],
    rng: &mut dyn RandomSource,
) -> Result<Vec<Combatant>, BattleStateError> {
    let mut pool: Vec<_> = catalog
        .mons()
        .iter()
        .filter(|template| !roster.contains(&template.id))
        .collect();
    if pool.len() < TEAM_SIZE {
        return Err(BattleStateError::InconsistentState(format!(
            "catalog has only {} mons left for the CPU",
            pool.len()
        )));
    }

    // Partial Fisher-Yates: only the first TEAM_SIZE slots need shuffling.
    for slot in 0..TEAM_SIZE {
        let pick = slot + rng.next_index(pool.len() - slot);
        pool.swap(slot, pick);
    }
    Ok(pool
        .into_iter()
        .take(TEAM_SIZE)
        .map(Combatant::from_template)
        .collect())
}

/// Lock in the player's roster and draw the CPU's. Moves to team preview.
pub fn confirm_team(
    session: &mut BattleSession,
    catalog: &Catalog,
    roster: &[u32],
    rng: &mut dyn RandomSource,
) -> BattleResult<EventBus> {
    let player_team = match require_phase(session, GamePhase::TeamSelect)
        .and_then(|()| build_player_team(catalog, roster))
    {
        Ok(team) => team,
        Err(error) => return Err(reject(session, error)),
    };
    let cpu_team = draw_cpu_team(catalog, roster, rng)?;

    let mut bus = EventBus::new();
    bus.push(BattleEvent::TeamConfirmed {
        player_team: player_team.iter().map(|mon| mon.name.clone()).collect(),
        cpu_team: cpu_team.iter().map(|mon| mon.name.clone()).collect(),
    });
    info!(
        player = ?player_team.iter().map(|mon| mon.name.as_str()).collect::<Vec<_>>(),
        cpu = ?cpu_team.iter().map(|mon| mon.name.as_str()).collect::<Vec<_>>(),
        "teams confirmed"
    );

    session.sides = [BattleSide::new(player_team), BattleSide::new(cpu_team)];
    session.selection = roster.to_vec();
    session.phase = GamePhase::TeamPreview;
    session.record_all(bus.events());
    Ok(bus)
}

/// Begin the fight from team preview: turn 1, player to move.
pub fn start_battle(session: &mut BattleSession) -> BattleResult<EventBus> {
    if let Err(error) = require_phase(session, GamePhase::TeamPreview) {
        return Err(reject(session, error));
    }
    let player_mon = session
        .active(Side::Player)
        .ok_or(BattleStateError::EmptyTeam(Side::Player))?
        .name
        .clone();
    let cpu_mon = session
        .active(Side::Cpu)
        .ok_or(BattleStateError::EmptyTeam(Side::Cpu))?
        .name
        .clone();

    let mut bus = EventBus::new();
    session.turn_number = 1;
    bus.push(BattleEvent::TurnStarted { turn_number: 1 });
    bus.push(BattleEvent::BattleStarted {
        player_mon,
        cpu_mon,
    });
    session.phase = GamePhase::Fight;
    session.player_turn = true;
    session.record_all(bus.events());
    info!("battle started");
    Ok(bus)
}

// --- Fight ---

/// Check whether `action` is legal right now without changing anything.
pub fn validate_player_action(
    session: &BattleSession,
    action: &PlayerAction,
) -> Result<(), ActionError> {
    if session.processing {
        return Err(ActionError::TurnInProgress);
    }
    if !matches!(session.phase, GamePhase::Fight | GamePhase::ForcedSwitch) {
        return Err(ActionError::WrongPhase(session.phase));
    }
    if !session.player_turn {
        return Err(ActionError::NotPlayerTurn);
    }
    if session.phase == GamePhase::ForcedSwitch
        && !matches!(action, PlayerAction::SwitchMon { .. })
    {
        return Err(ActionError::SwitchRequired);
    }

    let side = session.side(Side::Player);
    match action {
        PlayerAction::UseMove { move_index } => {
            let active = side.active().ok_or(ActionError::WrongPhase(session.phase))?;
            let slot = active
                .moves
                .get(*move_index)
                .ok_or(ActionError::InvalidMoveIndex(*move_index))?;
            // A blocked combatant never reaches the move, so its uses don't matter.
            if active.blocking_status().is_none() && !slot.is_usable() {
                return Err(ActionError::NoUsesLeft {
                    move_name: slot.name().to_string(),
                });
            }
            Ok(())
        }
        PlayerAction::SwitchMon { team_index } => {
            let target = side
                .team
                .get(*team_index)
                .ok_or(ActionError::InvalidTeamIndex(*team_index))?;
            if target.is_fainted() {
                return Err(ActionError::SwitchTargetFainted {
                    mon: target.name.clone(),
                });
            }
            if *team_index == side.active_index {
                return Err(ActionError::SwitchTargetActive {
                    mon: target.name.clone(),
                });
            }
            Ok(())
        }
        PlayerAction::UseItem { item, target_index } => {
            let entry = session
                .inventory
                .get(item)
                .ok_or_else(|| ActionError::UnknownItem { item: item.clone() })?;
            if entry.quantity == 0 {
                return Err(ActionError::ItemDepleted { item: item.clone() });
            }
            let target = side
                .team
                .get(*target_index)
                .ok_or(ActionError::InvalidTeamIndex(*target_index))?;
            if target.is_fainted() {
                return Err(ActionError::ItemTargetFainted {
                    mon: target.name.clone(),
                });
            }
            match entry.item.effect {
                ItemEffect::Heal { .. } if target.is_at_full_hp() => {
                    Err(ActionError::HpAlreadyFull {
                        mon: target.name.clone(),
                    })
                }
                ItemEffect::CureStatus if target.status.is_none() => {
                    Err(ActionError::NoStatusToCure {
                        mon: target.name.clone(),
                    })
                }
                _ => Ok(()),
            }
        }
        PlayerAction::Forfeit => Ok(()),
    }
}

/// Resolve one player action, including the CPU's reply when the round continues.
///
/// The session is marked as processing until the caller finishes playback; see
/// [`finish_playback`].
pub fn submit_action(
    session: &mut BattleSession,
    action: PlayerAction,
    rng: &mut dyn RandomSource,
) -> BattleResult<EventBus> {
    if let Err(error) = validate_player_action(session, &action) {
        return Err(reject(session, error));
    }

    debug!(?action, turn = session.turn_number, "resolving player action");
    session.processing = true;
    session.player_turn = false;

    let mut bus = EventBus::new();
    let result = match (session.phase, action) {
        (GamePhase::ForcedSwitch, PlayerAction::SwitchMon { team_index }) => {
            complete_forced_switch(session, team_index, rng, &mut bus)
        }
        (_, PlayerAction::Forfeit) => forfeit(session, &mut bus),
        (_, action) => run_round(session, action, rng, &mut bus),
    };
    session.record_all(bus.events());

    if let Err(error) = result {
        error!(%error, "battle state became inconsistent");
        session.processing = false;
        return Err(error.into());
    }
    Ok(bus)
}

/// Clear the processing flag once the presentation layer has played the last result back.
///
/// Returns false for an acknowledgement from before the latest reset.
pub fn finish_playback(session: &mut BattleSession, epoch: u64) -> bool {
    if session.epoch != epoch {
        warn!(epoch, current = session.epoch, "ignoring stale playback acknowledgement");
        return false;
    }
    session.processing = false;
    true
}

fn run_round(
    session: &mut BattleSession,
    action: PlayerAction,
    rng: &mut dyn RandomSource,
    bus: &mut EventBus,
) -> Result<(), BattleStateError> {
    let mut cpu_replaced = false;

    match action {
        PlayerAction::UseMove { move_index } => {
            if resolve_move(session, Side::Player, move_index, rng, bus)? {
                match handle_faint(session, Side::Cpu, bus)? {
                    FaintOutcome::BattleOver => return Ok(()),
                    _ => cpu_replaced = true,
                }
            }
        }
        PlayerAction::SwitchMon { team_index } => {
            switch_active(session, Side::Player, team_index, bus)?;
        }
        PlayerAction::UseItem { item, target_index } => {
            let commands = calculate_item_outcome(session, &item, target_index)?;
            execute_command_batch(commands, session, bus)?;
        }
        PlayerAction::Forfeit => {
            return Err(BattleStateError::InconsistentState(
                "forfeit reached round resolution".to_string(),
            ))
        }
    }

    if run_status_tick(session, Side::Player, bus)? {
        match handle_faint(session, Side::Player, bus)? {
            FaintOutcome::BattleOver => return Ok(()),
            _ => {
                if session.status_faint_ends_round || cpu_replaced {
                    return close_round(session, bus);
                }
                return execute_command_batch(
                    vec![BattleCommand::SetPendingCpuStep(true)],
                    session,
                    bus,
                );
            }
        }
    }

    // A CPU replacement sent in this round does not act until the next one.
    if !cpu_replaced {
        cpu_step(session, rng, bus)?;
    }
    close_round(session, bus)
}

/// The CPU's half of a round: pick a move, resolve it, then tick its status.
fn cpu_step(
    session: &mut BattleSession,
    rng: &mut dyn RandomSource,
    bus: &mut EventBus,
) -> Result<(), BattleStateError> {
    if session.phase == GamePhase::GameOver {
        return Ok(());
    }
    bus.push(BattleEvent::TurnPrompt { side: Side::Cpu });

    match RandomMoveAI.decide_action(Side::Cpu, session, rng) {
        Some(PlayerAction::UseMove { move_index }) => {
            if resolve_move(session, Side::Cpu, move_index, rng, bus)? {
                // The player's faint ends the CPU's half; its status tick waits.
                handle_faint(session, Side::Player, bus)?;
                return Ok(());
            }
        }
        Some(other) => {
            return Err(BattleStateError::InconsistentState(format!(
                "CPU policy chose {:?}",
                other
            )))
        }
        None => {
            let mon = session
                .active(Side::Cpu)
                .ok_or(BattleStateError::EmptyTeam(Side::Cpu))?
                .name
                .clone();
            bus.push(BattleEvent::NoMovesLeft {
                side: Side::Cpu,
                mon,
            });
        }
    }

    if run_status_tick(session, Side::Cpu, bus)? {
        handle_faint(session, Side::Cpu, bus)?;
    }
    Ok(())
}

/// Resolve a move for `side`. Returns true if the defender fainted.
fn resolve_move(
    session: &mut BattleSession,
    side: Side,
    move_index: usize,
    rng: &mut dyn RandomSource,
    bus: &mut EventBus,
) -> Result<bool, BattleStateError> {
    if let Some(commands) = calculate_action_prevention(session, side)? {
        execute_command_batch(commands, session, bus)?;
        return Ok(false);
    }

    let resolution = calculate_move_outcome(session, side, move_index, rng)?;
    debug!(
        ?side,
        hit = resolution.hit,
        damage = resolution.damage,
        crit = resolution.is_crit,
        "move resolved"
    );
    let fainted = resolution.defender_fainted;
    execute_command_batch(resolution.commands, session, bus)?;
    Ok(fainted)
}

/// Returns true if the tick made `side`'s active combatant faint.
fn run_status_tick(
    session: &mut BattleSession,
    side: Side,
    bus: &mut EventBus,
) -> Result<bool, BattleStateError> {
    let tick = calculate_status_tick(session, side)?;
    let fainted = tick.fainted;
    execute_command_batch(tick.commands, session, bus)?;
    Ok(fainted)
}

fn handle_faint(
    session: &mut BattleSession,
    side: Side,
    bus: &mut EventBus,
) -> Result<FaintOutcome, BattleStateError> {
    if !session.side(side).has_living() {
        let winner = Winner::from(side.opponent());
        info!(?winner, turn = session.turn_number, "battle over");
        execute_command_batch(
            vec![
                BattleCommand::SetWinner(winner),
                BattleCommand::SetPhase(GamePhase::GameOver),
                BattleCommand::SetPlayerTurn(false),
                BattleCommand::SetPendingCpuStep(false),
                BattleCommand::SetAutoBattle(false),
                BattleCommand::EmitEvent(BattleEvent::BattleEnded { winner }),
            ],
            session,
            bus,
        )?;
        return Ok(FaintOutcome::BattleOver);
    }

    match side {
        Side::Player => {
            execute_command_batch(
                vec![
                    BattleCommand::SetPhase(GamePhase::ForcedSwitch),
                    BattleCommand::SetPlayerTurn(true),
                    BattleCommand::EmitEvent(BattleEvent::ForcedSwitchRequired),
                ],
                session,
                bus,
            )?;
            Ok(FaintOutcome::ForcedSwitch)
        }
        Side::Cpu => {
            let replacement = choose_replacement(session.side(Side::Cpu)).ok_or_else(|| {
                BattleStateError::InconsistentState("CPU has no replacement".to_string())
            })?;
            switch_active(session, Side::Cpu, replacement, bus)?;
            Ok(FaintOutcome::CpuReplaced)
        }
    }
}

fn switch_active(
    session: &mut BattleSession,
    side: Side,
    new_index: usize,
    bus: &mut EventBus,
) -> Result<(), BattleStateError> {
    let old_mon = session
        .active(side)
        .ok_or(BattleStateError::EmptyTeam(side))?
        .name
        .clone();
    let new_mon = session
        .side(side)
        .team
        .get(new_index)
        .ok_or(BattleStateError::InvalidTeamIndex {
            side,
            index: new_index,
        })?
        .name
        .clone();

    execute_command_batch(
        vec![
            BattleCommand::SwitchActive { side, new_index },
            BattleCommand::EmitEvent(BattleEvent::MonSwitched {
                side,
                old_mon,
                new_mon,
            }),
        ],
        session,
        bus,
    )
}

fn complete_forced_switch(
    session: &mut BattleSession,
    team_index: usize,
    rng: &mut dyn RandomSource,
    bus: &mut EventBus,
) -> Result<(), BattleStateError> {
    switch_active(session, Side::Player, team_index, bus)?;
    execute_command_batch(vec![BattleCommand::SetPhase(GamePhase::Fight)], session, bus)?;

    if session.pending_cpu_step {
        execute_command_batch(vec![BattleCommand::SetPendingCpuStep(false)], session, bus)?;
        cpu_step(session, rng, bus)?;
        return close_round(session, bus);
    }

    execute_command_batch(
        vec![
            BattleCommand::SetPlayerTurn(true),
            BattleCommand::EmitEvent(BattleEvent::TurnPrompt { side: Side::Player }),
        ],
        session,
        bus,
    )
}

fn forfeit(session: &mut BattleSession, bus: &mut EventBus) -> Result<(), BattleStateError> {
    info!(turn = session.turn_number, "player forfeited");
    execute_command_batch(
        vec![
            BattleCommand::EmitEvent(BattleEvent::Forfeited),
            BattleCommand::SetWinner(Winner::Cpu),
            BattleCommand::SetPhase(GamePhase::GameOver),
            BattleCommand::SetPlayerTurn(false),
            BattleCommand::SetPendingCpuStep(false),
            BattleCommand::SetAutoBattle(false),
            BattleCommand::EmitEvent(BattleEvent::BattleEnded { winner: Winner::Cpu }),
        ],
        session,
        bus,
    )
}

/// Advance the turn counter and hand control back to the player.
fn close_round(session: &mut BattleSession, bus: &mut EventBus) -> Result<(), BattleStateError> {
    if session.phase == GamePhase::GameOver {
        return Ok(());
    }
    let turn_number = session.turn_number + 1;
    debug!(turn_number, phase = %session.phase, "round closed");
    execute_command_batch(
        vec![
            BattleCommand::IncrementTurnNumber,
            BattleCommand::EmitEvent(BattleEvent::TurnStarted { turn_number }),
            BattleCommand::SetPlayerTurn(true),
        ],
        session,
        bus,
    )
}

// --- Session controls ---

/// Flip auto-battle. A finished battle accepts no further actions, this one included.
pub fn toggle_auto_battle(session: &mut BattleSession) -> BattleResult<bool> {
    if session.phase == GamePhase::GameOver {
        return Err(reject(session, ActionError::WrongPhase(GamePhase::GameOver)));
    }
    let enabled = !session.auto_battle;
    set_auto_battle(session, enabled);
    Ok(enabled)
}

fn set_auto_battle(session: &mut BattleSession, enabled: bool) {
    session.auto_battle = enabled;
    session.record(&BattleEvent::AutoBattleToggled { enabled });
    info!(enabled, "auto-battle toggled");
}

/// Auto-battle found nothing to do: report it and switch auto-battle off.
pub fn stall_auto_battle(session: &mut BattleSession) -> BattleResult<()> {
    let mon = session
        .active(Side::Player)
        .ok_or(BattleStateError::EmptyTeam(Side::Player))?
        .name
        .clone();
    warn!(%mon, "auto-battle has no usable moves");
    session.record(&BattleEvent::NoMovesLeft {
        side: Side::Player,
        mon,
    });
    if session.auto_battle {
        set_auto_battle(session, false);
    }
    Ok(())
}

/// Discard the current battle and return to team select with a fresh inventory.
pub fn reset_session(session: &mut BattleSession, inventory: Inventory) {
    session.reset(inventory);
    info!(epoch = session.epoch, "session reset");
}
