#[cfg(test)]
mod tests {
    use crate::battle::runner::TurnResult;
    use crate::battle::state::BattleEvent;
    use crate::battle::tests::common::{assert_ok, create_test_runner, TestMonBuilder};
    use crate::combatant::StatusCondition;
    use crate::errors::{ActionError, BattleEngineError};
    use crate::player::Side;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use schema::StatusKind;

    const CPU_PING: [f64; 3] = [0.0, 0.0, 1.0];

    fn rejected(error: ActionError) -> Result<TurnResult, BattleEngineError> {
        Err(BattleEngineError::Action(error))
    }

    #[test]
    fn test_debugger_cures_and_spends_the_turn() {
        let mut runner = create_test_runner(
            vec![TestMonBuilder::new("Lumachor")
                .with_status(StatusCondition::Poison(3))
                .build()],
            vec![TestMonBuilder::new("Splitway").build()],
            CPU_PING.to_vec(),
        );

        let result = assert_ok(runner.use_item("Debugger", 0));

        let session = runner.session();
        let player = session.active(Side::Player).expect("player active");
        assert_eq!(player.status, None);
        // Cured before the tick, so only the CPU's hit lands.
        assert_eq!(player.current_hp(), 90);
        assert_eq!(session.inventory.quantity("Debugger"), 1);
        assert_eq!(session.turn_number, 2);
        assert!(result.events.contains(&BattleEvent::StatusCured {
            target: "Lumachor".to_string(),
            status: StatusKind::Poison,
        }));
        assert!(session.log.contains(&"Used Debugger on Lumachor.".to_string()));
        assert!(session.log.contains(&"Splitway used Ping!".to_string()));
    }

    #[rstest]
    #[case("Code Snippet", 10, 30, 20)]
    #[case("System Restore", 50, 100, 50)]
    fn test_heal_reaches_a_benched_member(
        #[case] item: &str,
        #[case] start_hp: u16,
        #[case] expected_hp: u16,
        #[case] expected_amount: u16,
    ) {
        let mut runner = create_test_runner(
            vec![
                TestMonBuilder::new("Lumachor").build(),
                TestMonBuilder::new("Tutorial").with_hp(start_hp).build(),
            ],
            vec![TestMonBuilder::new("Splitway").build()],
            CPU_PING.to_vec(),
        );
        let before = runner.session().inventory.quantity(item);

        let result = assert_ok(runner.use_item(item, 1));

        let session = runner.session();
        assert_eq!(session.side(Side::Player).team[1].current_hp(), expected_hp);
        assert_eq!(session.side(Side::Player).active_index, 0);
        assert_eq!(session.inventory.quantity(item), before - 1);
        assert!(result.events.contains(&BattleEvent::MonHealed {
            target: "Tutorial".to_string(),
            amount: expected_amount,
            new_hp: expected_hp,
        }));
    }

    #[test]
    fn test_heal_on_full_hp_is_rejected_and_free() {
        let mut runner = create_test_runner(
            vec![TestMonBuilder::new("Lumachor").build()],
            vec![TestMonBuilder::new("Splitway").build()],
            vec![],
        );

        assert_eq!(
            runner.use_item("Code Snippet", 0),
            rejected(ActionError::HpAlreadyFull {
                mon: "Lumachor".to_string()
            })
        );

        let session = runner.session();
        assert_eq!(session.inventory.quantity("Code Snippet"), 5);
        assert_eq!(session.turn_number, 1);
        assert!(session.player_turn);
        assert_eq!(
            session.log.last().map(String::as_str),
            Some("Lumachor's HP is already full!")
        );
    }

    #[test]
    fn test_cure_without_status_is_rejected() {
        let mut runner = create_test_runner(
            vec![TestMonBuilder::new("Lumachor").build()],
            vec![TestMonBuilder::new("Splitway").build()],
            vec![],
        );

        assert_eq!(
            runner.use_item("Debugger", 0),
            rejected(ActionError::NoStatusToCure {
                mon: "Lumachor".to_string()
            })
        );
        assert_eq!(runner.session().inventory.quantity("Debugger"), 2);
    }

    #[test]
    fn test_items_cannot_target_fainted_members() {
        let mut runner = create_test_runner(
            vec![
                TestMonBuilder::new("Lumachor").build(),
                TestMonBuilder::new("Tutorial").with_hp(0).build(),
            ],
            vec![TestMonBuilder::new("Splitway").build()],
            vec![],
        );

        assert_eq!(
            runner.use_item("System Restore", 1),
            rejected(ActionError::ItemTargetFainted {
                mon: "Tutorial".to_string()
            })
        );
        assert_eq!(runner.session().inventory.quantity("System Restore"), 1);
    }

    #[test]
    fn test_last_item_runs_out() {
        let mut runner = create_test_runner(
            vec![
                TestMonBuilder::new("Lumachor").build(),
                TestMonBuilder::new("Tutorial").with_hp(10).build(),
            ],
            vec![TestMonBuilder::new("Splitway").build()],
            CPU_PING.to_vec(),
        );

        assert_ok(runner.use_item("Server Patch", 1));
        assert_eq!(runner.session().side(Side::Player).team[1].current_hp(), 100);

        runner.session_mut().side_mut(Side::Player).team[1].set_hp(10);
        assert_eq!(
            runner.use_item("Server Patch", 1),
            rejected(ActionError::ItemDepleted {
                item: "Server Patch".to_string()
            })
        );
        assert_eq!(
            runner.session().log.last().map(String::as_str),
            Some("You're out of Server Patch!")
        );
    }

    #[rstest]
    #[case("Coffee", 0, ActionError::UnknownItem { item: "Coffee".to_string() })]
    #[case("API Key", 3, ActionError::InvalidTeamIndex(3))]
    fn test_bad_item_requests(
        #[case] item: &str,
        #[case] target_index: usize,
        #[case] expected: ActionError,
    ) {
        let mut runner = create_test_runner(
            vec![TestMonBuilder::new("Lumachor").with_hp(50).build()],
            vec![TestMonBuilder::new("Splitway").build()],
            vec![],
        );

        assert_eq!(runner.use_item(item, target_index), rejected(expected));
        assert_eq!(runner.session().active(Side::Player).map(|m| m.current_hp()), Some(50));
    }
}
