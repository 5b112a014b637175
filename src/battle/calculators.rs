use crate::battle::commands::BattleCommand;
use crate::battle::rng::RandomSource;
use crate::battle::state::{BattleEvent, BattleSession, StatCounter};
use crate::battle::stats::{
    calculate_damage, effectiveness, move_hits, move_is_critical_hit, random_factor,
};
use crate::combatant::StatusCondition;
use crate::errors::BattleStateError;
use crate::player::Side;
use schema::{Effectiveness, ItemEffect, StatusKind};

/// Everything one move use decided, plus the commands that apply it.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveResolution {
    pub hit: bool,
    pub damage: u16,
    pub is_crit: bool,
    /// `None` for misses and moves without power.
    pub effectiveness: Option<Effectiveness>,
    pub status_applied: Option<StatusKind>,
    pub defender_fainted: bool,
    pub commands: Vec<BattleCommand>,
}

impl MoveResolution {
    pub fn effectiveness_message(&self) -> Option<&'static str> {
        self.effectiveness.and_then(|effectiveness| effectiveness.message())
    }
}

/// Calculate the outcome of `side` using the move at `move_index` on the opposing active combatant.
///
/// Draws happen in a fixed order: accuracy, then the damage spread and crit roll for moves with
/// power, then the secondary effect roll when the effect could still land.
pub fn calculate_move_outcome(
    session: &BattleSession,
    side: Side,
    move_index: usize,
    rng: &mut dyn RandomSource,
) -> Result<MoveResolution, BattleStateError> {
    let defender_side = side.opponent();
    let attacker_index = session.side(side).active_index;
    let defender_index = session.side(defender_side).active_index;
    let attacker = session.active(side).ok_or(BattleStateError::EmptyTeam(side))?;
    let defender = session
        .active(defender_side)
        .ok_or(BattleStateError::EmptyTeam(defender_side))?;
    let template = &attacker
        .moves
        .get(move_index)
        .ok_or(BattleStateError::InvalidMoveIndex {
            side,
            index: attacker_index,
            move_index,
        })?
        .template;

    let mut commands = vec![
        BattleCommand::UseMove {
            side,
            index: attacker_index,
            move_index,
        },
        BattleCommand::EmitEvent(BattleEvent::MoveUsed {
            side,
            mon: attacker.name.clone(),
            move_name: template.name.clone(),
        }),
    ];

    if !move_hits(template.accuracy, rng) {
        commands.push(BattleCommand::EmitEvent(BattleEvent::MoveMissed {
            side,
            mon: attacker.name.clone(),
        }));
        return Ok(MoveResolution {
            hit: false,
            damage: 0,
            is_crit: false,
            effectiveness: None,
            status_applied: None,
            defender_fainted: false,
            commands,
        });
    }

    let mut damage = 0;
    let mut is_crit = false;
    let mut type_effectiveness = None;

    if template.is_damaging() {
        let matchup = effectiveness(&session.type_chart, template.move_type, defender);
        let factor = random_factor(rng.next());
        is_crit = move_is_critical_hit(template.crit_chance, rng);
        damage = calculate_damage(
            template.power,
            attacker.stats.atk,
            defender.stats.def,
            factor,
            matchup.multiplier,
            is_crit,
        );

        if is_crit {
            commands.push(BattleCommand::EmitEvent(BattleEvent::CriticalHit { side }));
            commands.push(BattleCommand::AddStat {
                side,
                counter: StatCounter::CritsLanded,
                amount: 1,
            });
        }
        commands.push(BattleCommand::EmitEvent(BattleEvent::AttackTypeEffectiveness {
            multiplier: matchup.multiplier,
        }));
        if matchup.is_super_effective() {
            commands.push(BattleCommand::AddStat {
                side,
                counter: StatCounter::SuperEffectiveHits,
                amount: 1,
            });
        }
        if damage > 0 {
            commands.push(BattleCommand::AddStat {
                side,
                counter: StatCounter::DamageDealt,
                amount: u32::from(damage),
            });
        }
        commands.push(BattleCommand::DealDamage {
            side: defender_side,
            index: defender_index,
            amount: damage,
        });
        type_effectiveness = Some(matchup);
    }

    let remaining_hp = defender.current_hp().saturating_sub(damage);
    let defender_fainted = remaining_hp == 0;

    let mut status_applied = None;
    if let Some(effect) = template.effect {
        // One status at a time; fainted targets can't be afflicted.
        if defender.status.is_none() && !defender_fainted && rng.next() < effect.chance {
            commands.push(BattleCommand::SetStatus {
                side: defender_side,
                index: defender_index,
                status: Some(StatusCondition::inflict(effect.kind)),
            });
            commands.push(BattleCommand::EmitEvent(BattleEvent::StatusApplied {
                side: defender_side,
                target: defender.name.clone(),
                status: effect.kind,
            }));
            commands.push(BattleCommand::AddStat {
                side,
                counter: StatCounter::StatusEffectsInflicted,
                amount: 1,
            });
            status_applied = Some(effect.kind);
        }
    }

    Ok(MoveResolution {
        hit: true,
        damage,
        is_crit,
        effectiveness: type_effectiveness,
        status_applied,
        defender_fainted,
        commands,
    })
}

/// Commands for using `item_name` on the player's team member at `target_index`.
///
/// Assumes the action was already validated: the item is in stock and has something to do.
pub fn calculate_item_outcome(
    session: &BattleSession,
    item_name: &str,
    target_index: usize,
) -> Result<Vec<BattleCommand>, BattleStateError> {
    let entry = session
        .inventory
        .get(item_name)
        .ok_or_else(|| BattleStateError::MissingInventoryEntry(item_name.to_string()))?;
    let target = session
        .side(Side::Player)
        .team
        .get(target_index)
        .ok_or(BattleStateError::InvalidTeamIndex {
            side: Side::Player,
            index: target_index,
        })?;

    let mut commands = vec![
        BattleCommand::ConsumeItem {
            item: item_name.to_string(),
        },
        BattleCommand::EmitEvent(BattleEvent::ItemUsed {
            item: item_name.to_string(),
            target: target.name.clone(),
        }),
    ];

    match entry.item.effect {
        ItemEffect::Heal { amount } => commands.push(BattleCommand::Heal {
            side: Side::Player,
            index: target_index,
            amount,
        }),
        ItemEffect::CureStatus => {
            if let Some(status) = target.status {
                commands.push(BattleCommand::CureStatus {
                    side: Side::Player,
                    index: target_index,
                });
                commands.push(BattleCommand::EmitEvent(BattleEvent::StatusCured {
                    target: target.name.clone(),
                    status: status.kind(),
                }));
            }
        }
    }

    Ok(commands)
}
