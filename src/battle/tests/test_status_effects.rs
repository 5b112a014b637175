#[cfg(test)]
mod tests {
    use crate::battle::state::{BattleEvent, GamePhase};
    use crate::battle::tests::common::{assert_ok, create_test_runner, TestMonBuilder};
    use crate::combatant::StatusCondition;
    use crate::player::Side;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use schema::StatusKind;

    const PLAYER_PING: [f64; 2] = [0.0, 1.0];
    const CPU_PING: [f64; 3] = [0.0, 0.0, 1.0];

    fn full_round() -> Vec<f64> {
        PLAYER_PING.iter().chain(CPU_PING.iter()).copied().collect()
    }

    #[rstest]
    #[case(
        StatusCondition::Sleep(2),
        Some(StatusCondition::Sleep(1)),
        "Lumachor is asleep and can't move!"
    )]
    #[case(
        StatusCondition::Stun(3),
        Some(StatusCondition::Stun(2)),
        "Lumachor is stunned and can't move!"
    )]
    fn test_blocking_status_skips_action_and_counts_down(
        #[case] status: StatusCondition,
        #[case] expected: Option<StatusCondition>,
        #[case] expected_line: &str,
    ) {
        let mut runner = create_test_runner(
            vec![TestMonBuilder::new("Lumachor").with_status(status).build()],
            vec![TestMonBuilder::new("Splitway").build()],
            CPU_PING.to_vec(),
        );

        assert_ok(runner.select_move(0));

        let session = runner.session();
        let player = session.active(Side::Player).expect("player active");
        assert_eq!(player.status, expected);
        assert_eq!(player.moves[0].uses, 10, "a blocked move is not spent");
        assert_eq!(session.active(Side::Cpu).map(|m| m.current_hp()), Some(100));
        assert!(session.log.contains(&expected_line.to_string()));
        assert_eq!(session.turn_number, 2);
    }

    #[test]
    fn test_waking_up_still_loses_the_turn() {
        let mut runner = create_test_runner(
            vec![TestMonBuilder::new("Lumachor")
                .with_status(StatusCondition::Sleep(1))
                .build()],
            vec![TestMonBuilder::new("Splitway").build()],
            CPU_PING.to_vec(),
        );

        let result = assert_ok(runner.select_move(0));

        let session = runner.session();
        assert_eq!(session.active(Side::Player).and_then(|m| m.status), None);
        assert_eq!(session.active(Side::Cpu).map(|m| m.current_hp()), Some(100));
        assert!(result.events.contains(&BattleEvent::StatusExpired {
            side: Side::Player,
            target: "Lumachor".to_string(),
            status: StatusKind::Sleep,
        }));
        assert!(session.log.contains(&"Lumachor woke up!".to_string()));
    }

    #[test]
    fn test_sleeping_mon_may_pick_a_depleted_move() {
        let mut runner = create_test_runner(
            vec![TestMonBuilder::new("Lumachor")
                .with_status(StatusCondition::Sleep(2))
                .with_move_uses(0, 0)
                .build()],
            vec![TestMonBuilder::new("Splitway").build()],
            CPU_PING.to_vec(),
        );

        assert_ok(runner.select_move(0));

        assert_eq!(
            runner.session().active(Side::Player).and_then(|m| m.status),
            Some(StatusCondition::Sleep(1))
        );
    }

    #[test]
    fn test_cpu_is_blocked_too() {
        let mut runner = create_test_runner(
            vec![TestMonBuilder::new("Lumachor").build()],
            vec![TestMonBuilder::new("Splitway")
                .with_status(StatusCondition::Stun(2))
                .build()],
            // player's move, then the CPU picks a move before being blocked
            vec![0.0, 1.0, 0.0],
        );

        assert_ok(runner.select_move(0));

        let session = runner.session();
        assert_eq!(session.active(Side::Player).map(|m| m.current_hp()), Some(100));
        assert_eq!(
            session.active(Side::Cpu).and_then(|m| m.status),
            Some(StatusCondition::Stun(1))
        );
        assert!(session.log.contains(&"Splitway is stunned and can't move!".to_string()));
    }

    #[test]
    fn test_poison_ticks_after_the_players_action() {
        let mut runner = create_test_runner(
            vec![TestMonBuilder::new("Lumachor")
                .with_status(StatusCondition::Poison(4))
                .build()],
            vec![TestMonBuilder::new("Splitway").build()],
            full_round(),
        );

        assert_ok(runner.select_move(0));

        let session = runner.session();
        let player = session.active(Side::Player).expect("player active");
        // 100 / 8 = 12 from poison, then 10 from the CPU.
        assert_eq!(player.current_hp(), 78);
        assert_eq!(player.status, Some(StatusCondition::Poison(3)));

        let used = session
            .log
            .iter()
            .position(|line| line == "Lumachor used Ping!")
            .expect("player moved");
        let hurt = session
            .log
            .iter()
            .position(|line| line == "Lumachor was hurt by poison!")
            .expect("poison ticked");
        let cpu_used = session
            .log
            .iter()
            .position(|line| line == "Splitway used Ping!")
            .expect("cpu moved");
        assert!(used < hurt && hurt < cpu_used);
    }

    #[rstest]
    #[case(StatusCondition::Poison(1), "Lumachor was cured of poison!")]
    #[case(StatusCondition::Burn(1), "Lumachor's burn was healed!")]
    fn test_damage_status_expires_when_counter_runs_out(
        #[case] status: StatusCondition,
        #[case] expected_line: &str,
    ) {
        let mut runner = create_test_runner(
            vec![TestMonBuilder::new("Lumachor").with_status(status).build()],
            vec![TestMonBuilder::new("Splitway").build()],
            full_round(),
        );

        assert_ok(runner.select_move(0));

        let session = runner.session();
        let player = session.active(Side::Player).expect("player active");
        assert_eq!(player.status, None);
        assert_eq!(player.status_turns_remaining(), 0);
        assert!(session.log.contains(&expected_line.to_string()));
    }

    #[test]
    fn test_status_faint_ends_the_round_early() {
        let mut runner = create_test_runner(
            vec![
                TestMonBuilder::new("Lumachor")
                    .with_hp(5)
                    .with_status(StatusCondition::Poison(3))
                    .build(),
                TestMonBuilder::new("Tutorial").build(),
            ],
            vec![TestMonBuilder::new("Splitway").build()],
            // No CPU draws: the CPU must not act this round.
            PLAYER_PING.to_vec(),
        );

        assert_ok(runner.select_move(0));

        {
            let session = runner.session();
            assert_eq!(session.phase, GamePhase::ForcedSwitch);
            assert_eq!(session.turn_number, 2);
            assert!(!session.pending_cpu_step);
            assert!(!session.log.contains(&"Splitway used Ping!".to_string()));
            let fainted = session.side(Side::Player).team[0].clone();
            assert!(fainted.is_fainted());
            assert_eq!(fainted.status, Some(StatusCondition::Poison(3)));
        }

        let result = assert_ok(runner.select_switch(1));

        let session = runner.session();
        assert_eq!(result.phase, GamePhase::Fight);
        assert_eq!(session.turn_number, 2);
        assert!(session.player_turn);
        assert_eq!(
            session.log.last().map(String::as_str),
            Some("You switched from Lumachor to Tutorial!")
        );
    }

    #[test]
    fn test_status_faint_can_let_the_cpu_act_after_the_switch() {
        let mut runner = create_test_runner(
            vec![
                TestMonBuilder::new("Lumachor")
                    .with_hp(5)
                    .with_status(StatusCondition::Poison(3))
                    .build(),
                TestMonBuilder::new("Tutorial").build(),
            ],
            vec![TestMonBuilder::new("Splitway").build()],
            full_round(),
        );
        runner.session_mut().status_faint_ends_round = false;

        assert_ok(runner.select_move(0));

        assert_eq!(runner.session().phase, GamePhase::ForcedSwitch);
        assert_eq!(runner.session().turn_number, 1);
        assert!(runner.session().pending_cpu_step);

        assert_ok(runner.select_switch(1));

        let session = runner.session();
        assert_eq!(session.phase, GamePhase::Fight);
        assert_eq!(session.turn_number, 2);
        assert!(!session.pending_cpu_step);
        assert_eq!(session.active(Side::Player).map(|m| m.current_hp()), Some(90));
        assert_eq!(
            session.log.last().map(String::as_str),
            Some("--- Turn 2 ---")
        );
    }
}
