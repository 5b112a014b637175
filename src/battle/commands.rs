use crate::battle::state::{BattleEvent, BattleSession, GamePhase, StatCounter, Winner};
use crate::combatant::{Combatant, StatusCondition};
use crate::errors::BattleStateError;
use crate::player::Side;

/// Atomic commands representing final state changes
#[derive(Debug, Clone, PartialEq)]
pub enum BattleCommand {
    // Session flow
    SetPhase(GamePhase),
    IncrementTurnNumber,
    SetPlayerTurn(bool),
    SetPendingCpuStep(bool),
    SetWinner(Winner),
    SetAutoBattle(bool),

    // Combatant modifications
    DealDamage {
        side: Side,
        index: usize,
        amount: u16,
    },
    Heal {
        side: Side,
        index: usize,
        amount: u16,
    },
    SetStatus {
        side: Side,
        index: usize,
        status: Option<StatusCondition>,
    },
    CureStatus {
        side: Side,
        index: usize,
    },
    UseMove {
        side: Side,
        index: usize,
        move_index: usize,
    },
    SwitchActive {
        side: Side,
        new_index: usize,
    },

    // Bookkeeping
    AddStat {
        side: Side,
        counter: StatCounter,
        amount: u32,
    },
    ConsumeItem {
        item: String,
    },

    EmitEvent(BattleEvent),
}

/// Execute a batch of commands in order, stopping at the first failure.
pub fn execute_command_batch(
    commands: Vec<BattleCommand>,
    session: &mut BattleSession,
    bus: &mut crate::battle::state::EventBus,
) -> Result<(), BattleStateError> {
    for command in commands {
        execute_command(command, session, bus)?;
    }
    Ok(())
}

/// Helper for commands that operate on a single team member.
fn execute_combatant_command<F>(
    side: Side,
    index: usize,
    session: &mut BattleSession,
    operation: F,
) -> Result<(), BattleStateError>
where
    F: FnOnce(&mut Combatant) -> Result<(), BattleStateError>,
{
    match session.side_mut(side).team.get_mut(index) {
        Some(combatant) => operation(combatant),
        None => Err(BattleStateError::InvalidTeamIndex { side, index }),
    }
}

/// DealDamage also reports the hit and, when it lands the final blow, the faint.
fn execute_deal_damage_command(
    side: Side,
    index: usize,
    amount: u16,
    session: &mut BattleSession,
    bus: &mut crate::battle::state::EventBus,
) -> Result<(), BattleStateError> {
    let combatant = session
        .side_mut(side)
        .team
        .get_mut(index)
        .ok_or(BattleStateError::InvalidTeamIndex { side, index })?;

    let did_faint = combatant.take_damage(amount);
    bus.push(BattleEvent::DamageDealt {
        side,
        target: combatant.name.clone(),
        damage: amount,
        remaining_hp: combatant.current_hp(),
    });

    if did_faint {
        bus.push(BattleEvent::MonFainted {
            side,
            mon: combatant.name.clone(),
        });
    }

    Ok(())
}

fn execute_command(
    command: BattleCommand,
    session: &mut BattleSession,
    bus: &mut crate::battle::state::EventBus,
) -> Result<(), BattleStateError> {
    match command {
        BattleCommand::EmitEvent(event) => {
            bus.push(event);
            Ok(())
        }
        BattleCommand::SetPhase(phase) => {
            session.phase = phase;
            Ok(())
        }
        BattleCommand::IncrementTurnNumber => {
            session.turn_number += 1;
            Ok(())
        }
        BattleCommand::SetPlayerTurn(player_turn) => {
            session.player_turn = player_turn;
            Ok(())
        }
        BattleCommand::SetPendingCpuStep(pending) => {
            session.pending_cpu_step = pending;
            Ok(())
        }
        BattleCommand::SetWinner(winner) => {
            session.winner = Some(winner);
            Ok(())
        }
        BattleCommand::SetAutoBattle(enabled) => {
            session.auto_battle = enabled;
            Ok(())
        }
        BattleCommand::DealDamage {
            side,
            index,
            amount,
        } => execute_deal_damage_command(side, index, amount, session, bus),
        BattleCommand::Heal {
            side,
            index,
            amount,
        } => {
            let mut healed = None;
            execute_combatant_command(side, index, session, |combatant| {
                let restored = combatant.heal(amount);
                healed = Some((combatant.name.clone(), restored, combatant.current_hp()));
                Ok(())
            })?;
            if let Some((target, amount, new_hp)) = healed {
                bus.push(BattleEvent::MonHealed {
                    target,
                    amount,
                    new_hp,
                });
            }
            Ok(())
        }
        BattleCommand::SetStatus {
            side,
            index,
            status,
        } => execute_combatant_command(side, index, session, |combatant| {
            combatant.status = status;
            Ok(())
        }),
        BattleCommand::CureStatus { side, index } => {
            execute_combatant_command(side, index, session, |combatant| {
                combatant.cure_status();
                Ok(())
            })
        }
        BattleCommand::UseMove {
            side,
            index,
            move_index,
        } => execute_combatant_command(side, index, session, |combatant| {
            match combatant.moves.get_mut(move_index) {
                Some(slot) => {
                    if slot.use_move() {
                        Ok(())
                    } else {
                        Err(BattleStateError::InconsistentState(format!(
                            "{} has no uses left",
                            slot.name()
                        )))
                    }
                }
                None => Err(BattleStateError::InvalidMoveIndex {
                    side,
                    index,
                    move_index,
                }),
            }
        }),
        BattleCommand::SwitchActive { side, new_index } => {
            session.side_mut(side).switch_to(new_index, side)
        }
        BattleCommand::AddStat {
            side,
            counter,
            amount,
        } => {
            session.stats[side.to_index()].add(counter, amount);
            Ok(())
        }
        BattleCommand::ConsumeItem { item } => {
            if session.inventory.consume(&item) {
                Ok(())
            } else {
                Err(BattleStateError::MissingInventoryEntry(item))
            }
        }
    }
}
