use crate::battle::rng::TurnRng;
use crate::battle::runner::BattleRunner;
use crate::battle::state::{BattleSession, GamePhase};
use crate::catalog::Catalog;
use crate::combatant::{Combatant, StatusCondition};
use crate::config::BattleConfig;
use crate::errors::BattleResult;
use crate::inventory::Inventory;
use crate::player::BattleSide;
use schema::{BaseStats, MonType, MoveTemplate};
use std::sync::Arc;

/// A builder for test combatants with neutral defaults.
///
/// Defaults: a single Design type, 100 in every stat, and one 40-power Health move ("Ping")
/// with perfect accuracy and 10 uses.
///
/// # Example
/// ```ignore
/// let mon = TestMonBuilder::new("Lumachor")
///     .with_moves(vec![test_move("Vectorize", 90, MonType::Ai)])
///     .with_status(StatusCondition::Burn(4))
///     .build();
/// ```
pub struct TestMonBuilder {
    name: String,
    types: Vec<MonType>,
    stats: BaseStats,
    moves: Vec<MoveTemplate>,
    status: Option<StatusCondition>,
    current_hp: Option<u16>,
    move_uses: Vec<(usize, u8)>,
}

impl TestMonBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            types: vec![MonType::Design],
            stats: BaseStats {
                hp: 100,
                atk: 100,
                def: 100,
                spd: 100,
            },
            moves: vec![test_move("Ping", 40, MonType::Health)],
            status: None,
            current_hp: None,
            move_uses: Vec::new(),
        }
    }

    pub fn with_types(mut self, types: Vec<MonType>) -> Self {
        self.types = types;
        self
    }

    pub fn with_stats(mut self, hp: u16, atk: u16, def: u16, spd: u16) -> Self {
        self.stats = BaseStats { hp, atk, def, spd };
        self
    }

    pub fn with_moves(mut self, moves: Vec<MoveTemplate>) -> Self {
        self.moves = moves;
        self
    }

    pub fn with_status(mut self, status: StatusCondition) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets the current HP. If not set, HP will be max.
    pub fn with_hp(mut self, hp: u16) -> Self {
        self.current_hp = Some(hp);
        self
    }

    /// Overrides the remaining uses of one move.
    pub fn with_move_uses(mut self, move_index: usize, uses: u8) -> Self {
        self.move_uses.push((move_index, uses));
        self
    }

    pub fn build(self) -> Combatant {
        let template = schema::MonTemplate {
            id: 0,
            name: self.name,
            url: String::new(),
            description: String::new(),
            types: self.types,
            stats: self.stats,
            moves: self.moves,
        };
        let mut mon = Combatant::from_template(&template);
        mon.status = self.status;
        if let Some(hp) = self.current_hp {
            mon.set_hp(hp);
        }
        for (move_index, uses) in self.move_uses {
            if let Some(slot) = mon.moves.get_mut(move_index) {
                slot.uses = uses;
            }
        }
        mon
    }
}

/// A perfectly accurate move with no crit chance or secondary effect.
pub fn test_move(name: &str, power: u16, move_type: MonType) -> MoveTemplate {
    MoveTemplate {
        name: name.to_string(),
        power,
        move_type,
        accuracy: 1.0,
        max_uses: 10,
        crit_chance: None,
        effect: None,
        description: String::new(),
    }
}

fn standard_catalog() -> &'static Catalog {
    match Catalog::standard() {
        Ok(catalog) => catalog,
        Err(err) => panic!("Failed to load bundled catalog: {}", err),
    }
}

fn default_inventory() -> Inventory {
    match Inventory::from_catalog(standard_catalog(), &BattleConfig::default().starting_inventory) {
        Ok(inventory) => inventory,
        Err(err) => panic!("Failed to build default inventory: {}", err),
    }
}

/// A session mid-fight on turn 1 with the player to move, using the bundled type chart and the
/// default starting inventory.
pub fn create_test_session(player_team: Vec<Combatant>, cpu_team: Vec<Combatant>) -> BattleSession {
    let mut session = BattleSession::new(
        standard_catalog().type_chart().clone(),
        default_inventory(),
        true,
    );
    session.sides = [BattleSide::new(player_team), BattleSide::new(cpu_team)];
    session.phase = GamePhase::Fight;
    session.player_turn = true;
    session
}

/// A runner over the bundled catalog whose session is `create_test_session` with the given teams
/// and whose draws come from `draws`.
pub fn create_test_runner(
    player_team: Vec<Combatant>,
    cpu_team: Vec<Combatant>,
    draws: Vec<f64>,
) -> BattleRunner {
    let mut runner = assert_ok(BattleRunner::with_rng(
        Arc::new(standard_catalog().clone()),
        BattleConfig::default(),
        Box::new(TurnRng::new_for_test(draws)),
    ));
    *runner.session_mut() = create_test_session(player_team, cpu_team);
    runner
}

/// Helper function to assert that a Result is Ok and return the value.
/// Provides clear error messages in tests when functions unexpectedly fail.
pub fn assert_ok<T>(result: BattleResult<T>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => panic!("Expected Ok but got error: {}", err),
    }
}
