use crate::battle::commands::BattleCommand;
use crate::battle::state::{BattleEvent, BattleSession};
use crate::errors::BattleStateError;
use crate::player::Side;

/// Result of the end-of-action status tick for one side.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StatusTick {
    pub damage: u16,
    pub fainted: bool,
    pub commands: Vec<BattleCommand>,
}

/// If sleep or stun blocks `side`'s action, the commands that report it and advance the counter.
///
/// Returns `None` when the active combatant is free to act. A counter that reaches zero clears
/// the status, but the action is still skipped.
pub fn calculate_action_prevention(
    session: &BattleSession,
    side: Side,
) -> Result<Option<Vec<BattleCommand>>, BattleStateError> {
    let index = session.side(side).active_index;
    let combatant = session.active(side).ok_or(BattleStateError::EmptyTeam(side))?;
    let Some(status) = combatant.blocking_status() else {
        return Ok(None);
    };

    let mut commands = vec![BattleCommand::EmitEvent(BattleEvent::ActionPrevented {
        side,
        mon: combatant.name.clone(),
        status: status.kind(),
    })];

    let next = status.decremented();
    commands.push(BattleCommand::SetStatus {
        side,
        index,
        status: next,
    });
    if next.is_none() {
        commands.push(BattleCommand::EmitEvent(BattleEvent::StatusExpired {
            side,
            target: combatant.name.clone(),
            status: status.kind(),
        }));
    }

    Ok(Some(commands))
}

/// Burn and poison damage for `side`'s active combatant after it acts.
///
/// Burn deals 1/16 and poison 1/8 of max HP, floored. The counter goes down on every tick; a
/// combatant that faints from the tick keeps its status tag.
pub fn calculate_status_tick(
    session: &BattleSession,
    side: Side,
) -> Result<StatusTick, BattleStateError> {
    let index = session.side(side).active_index;
    let combatant = session.active(side).ok_or(BattleStateError::EmptyTeam(side))?;

    let Some(status) = combatant.status else {
        return Ok(StatusTick::default());
    };
    let Some(divisor) = status.kind().tick_divisor() else {
        return Ok(StatusTick::default());
    };
    if combatant.is_fainted() {
        return Ok(StatusTick::default());
    }

    let damage = combatant.max_hp() / divisor;
    let remaining_hp = combatant.current_hp().saturating_sub(damage);
    let fainted = damage > 0 && remaining_hp == 0;
    let mut commands = Vec::new();

    if damage > 0 {
        commands.push(BattleCommand::EmitEvent(BattleEvent::StatusDamage {
            side,
            target: combatant.name.clone(),
            status: status.kind(),
            damage,
            remaining_hp,
        }));
        commands.push(BattleCommand::DealDamage {
            side,
            index,
            amount: damage,
        });
    }

    if !fainted {
        let next = status.decremented();
        commands.push(BattleCommand::SetStatus {
            side,
            index,
            status: next,
        });
        if next.is_none() {
            commands.push(BattleCommand::EmitEvent(BattleEvent::StatusExpired {
                side,
                target: combatant.name.clone(),
                status: status.kind(),
            }));
        }
    }

    Ok(StatusTick {
        damage,
        fainted,
        commands,
    })
}
