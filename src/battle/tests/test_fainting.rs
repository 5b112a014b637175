#[cfg(test)]
mod tests {
    use crate::battle::state::{BattleEvent, GamePhase, Winner};
    use crate::battle::tests::common::{assert_ok, create_test_runner, TestMonBuilder};
    use crate::combatant::StatusCondition;
    use crate::errors::{ActionError, BattleEngineError};
    use crate::player::Side;
    use pretty_assertions::assert_eq;

    const PLAYER_PING: [f64; 2] = [0.0, 1.0];
    const CPU_PING: [f64; 3] = [0.0, 0.0, 1.0];

    fn full_round() -> Vec<f64> {
        PLAYER_PING.iter().chain(CPU_PING.iter()).copied().collect()
    }

    #[test]
    fn test_cpu_replacement_waits_for_next_round() {
        let mut runner = create_test_runner(
            vec![TestMonBuilder::new("Lumachor").build()],
            vec![
                TestMonBuilder::new("Splitway").with_hp(5).build(),
                TestMonBuilder::new("OMMC").build(),
            ],
            PLAYER_PING.to_vec(),
        );

        let result = assert_ok(runner.select_move(0));

        let session = runner.session();
        assert_eq!(result.phase, GamePhase::Fight);
        assert!(!result.battle_ended);
        assert_eq!(session.side(Side::Cpu).active_index, 1);
        assert_eq!(session.turn_number, 2);
        assert!(session.player_turn);
        assert_eq!(session.active(Side::Player).map(|m| m.current_hp()), Some(100));
        assert_eq!(
            &session.log[session.log.len() - 3..],
            &[
                "Splitway fainted!".to_string(),
                "CPU sent out OMMC!".to_string(),
                "--- Turn 2 ---".to_string(),
            ]
        );
    }

    #[test]
    fn test_last_cpu_faint_ends_the_battle() {
        let mut runner = create_test_runner(
            vec![TestMonBuilder::new("Lumachor").build()],
            vec![
                TestMonBuilder::new("Splitway").with_hp(5).build(),
                TestMonBuilder::new("OMMC").with_hp(0).build(),
            ],
            PLAYER_PING.to_vec(),
        );

        let result = assert_ok(runner.select_move(0));

        assert!(result.battle_ended);
        assert_eq!(result.winner, Some(Winner::Player));
        assert_eq!(
            result.events.last(),
            Some(&BattleEvent::BattleEnded {
                winner: Winner::Player
            })
        );
        let session = runner.session();
        assert_eq!(session.phase, GamePhase::GameOver);
        assert_eq!(session.turn_number, 1);
        assert!(!session.player_turn);
        assert_eq!(
            session.log.last().map(String::as_str),
            Some("You won the battle!")
        );

        assert_eq!(
            runner.select_move(0),
            Err(BattleEngineError::Action(ActionError::WrongPhase(
                GamePhase::GameOver
            )))
        );
    }

    #[test]
    fn test_player_faint_forces_a_switch() {
        let mut runner = create_test_runner(
            vec![
                TestMonBuilder::new("Lumachor").with_hp(5).build(),
                TestMonBuilder::new("Tutorial").build(),
            ],
            vec![TestMonBuilder::new("Splitway")
                .with_status(StatusCondition::Burn(3))
                .build()],
            full_round(),
        );

        assert_ok(runner.select_move(0));

        {
            let session = runner.session();
            assert_eq!(session.phase, GamePhase::ForcedSwitch);
            assert_eq!(session.turn_number, 2);
            assert!(session.player_turn);
            // The CPU's burn does not tick once the player's mon has fainted.
            let cpu = session.active(Side::Cpu).expect("cpu active");
            assert_eq!(cpu.current_hp(), 90);
            assert_eq!(cpu.status, Some(StatusCondition::Burn(3)));
            assert_eq!(
                session.latest_notification.as_ref().map(|n| n.message.as_str()),
                Some("Your Turn")
            );
        }

        assert_eq!(
            runner.select_move(0),
            Err(BattleEngineError::Action(ActionError::SwitchRequired))
        );
        assert_eq!(
            runner.use_item("API Key", 1),
            Err(BattleEngineError::Action(ActionError::SwitchRequired))
        );
        assert_eq!(
            runner.forfeit(),
            Err(BattleEngineError::Action(ActionError::SwitchRequired))
        );
        assert_eq!(
            runner.select_switch(0),
            Err(BattleEngineError::Action(ActionError::SwitchTargetFainted {
                mon: "Lumachor".to_string()
            }))
        );

        // No draws left: completing the switch must not give anyone an extra action.
        let result = assert_ok(runner.select_switch(1));

        assert_eq!(result.phase, GamePhase::Fight);
        let session = runner.session();
        assert_eq!(session.turn_number, 2);
        assert!(session.player_turn);
        assert_eq!(session.side(Side::Player).active_index, 1);
    }

    #[test]
    fn test_last_player_faint_hands_cpu_the_win() {
        let mut runner = create_test_runner(
            vec![
                TestMonBuilder::new("Lumachor").with_hp(5).build(),
                TestMonBuilder::new("Tutorial").with_hp(0).build(),
            ],
            vec![TestMonBuilder::new("Splitway").build()],
            full_round(),
        );

        let result = assert_ok(runner.select_move(0));

        assert_eq!(result.winner, Some(Winner::Cpu));
        assert_eq!(runner.session().phase, GamePhase::GameOver);
        assert_eq!(
            runner.session().log.last().map(String::as_str),
            Some("The CPU won the battle!")
        );
    }

    #[test]
    fn test_hp_never_leaves_bounds() {
        let mut runner = create_test_runner(
            vec![TestMonBuilder::new("Lumachor").with_hp(3).build()],
            vec![TestMonBuilder::new("Splitway").with_hp(2).build()],
            PLAYER_PING.to_vec(),
        );

        assert_ok(runner.select_move(0));

        for side in [Side::Player, Side::Cpu] {
            for mon in &runner.session().side(side).team {
                assert!(mon.current_hp() <= mon.max_hp());
            }
        }
        assert_eq!(runner.session().active(Side::Cpu).map(|m| m.current_hp()), Some(0));
    }
}
