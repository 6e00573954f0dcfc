//! Turn state machine integration tests: draw, bounded action loop,
//! discard enforcement, and win detection.

mod common;

use common::*;
use dealbench::game::{
    Action, CardKind, GameConfig, GameEvent, GameState, PropertyRef, RefusedRentPolicy, TurnPhase,
};
use dealbench::players::{DecisionProvider, GreedyPlayer, ProviderError, RandomPlayer};
use dealbench::types::{ActionType, BuildingKind, PropertyColor};
use dealbench::{CardId, Game};

fn events(state: &GameState) -> Vec<GameEvent> {
    state.history.events().cloned().collect()
}

fn count_rejections(state: &GameState) -> usize {
    state
        .history
        .events()
        .filter(|event| matches!(event, GameEvent::ActionRejected { .. }))
        .count()
}

fn players(alice: ScriptedPlayer) -> Vec<ScriptedPlayer> {
    vec![alice, ScriptedPlayer::new("Bob")]
}

// =============================================================================
// Discard phase
// =============================================================================

/// Nine cards at the end of the action phase means exactly two discards.
#[test]
fn test_discard_down_to_hand_limit() {
    let mut game = game_for(test_config(), players(ScriptedPlayer::new("Alice")), filler(100, 4));
    game.state.players[0].hand = filler(1, 7);

    game.play_turn().unwrap();

    assert_eq!(game.state.players[0].hand.len(), 7);
    assert_eq!(game.state.deck.discard_pile().len(), 2);
    assert!(events(&game.state).iter().any(|event| matches!(
        event,
        GameEvent::Discarded { cards, forced: false, .. } if cards.len() == 2
    )));
    assert_eq!(game.state.current_player, 1);
    assert_eq!(game.phase, TurnPhase::TurnStart);
}

/// A discard choice of the wrong size is rejected; after the retries run out
/// the engine drops the newest cards itself.
#[test]
fn test_bad_discard_choice_falls_back_to_newest_cards() {
    let mut alice = ScriptedPlayer::new("Alice");
    alice.discards.push_back(vec![CardId(1)]);
    alice.discards.push_back(vec![CardId(1), CardId(1)]);
    let mut game = game_for(test_config(), players(alice), filler(100, 4));
    game.state.players[0].hand = filler(1, 7);

    game.play_turn().unwrap();

    let hand: Vec<CardId> = game.state.players[0].hand.iter().map(|c| c.id).collect();
    assert_eq!(hand.len(), 7);
    assert!(!hand.contains(&CardId(100)));
    assert!(!hand.contains(&CardId(101)));
    assert_eq!(count_rejections(&game.state), 2);
    assert!(events(&game.state).iter().any(|event| matches!(
        event,
        GameEvent::Discarded { forced: true, .. }
    )));
}

/// No discard phase when the hand is within the limit.
#[test]
fn test_no_discard_at_or_below_limit() {
    let mut game = game_for(test_config(), players(ScriptedPlayer::new("Alice")), filler(100, 4));
    game.state.players[0].hand = filler(1, 5);

    game.play_turn().unwrap();

    assert_eq!(game.state.players[0].hand.len(), 7);
    assert!(!events(&game.state).iter().any(|event| matches!(event, GameEvent::DiscardRequired { .. })));
}

// =============================================================================
// Win detection
// =============================================================================

/// Completing a third full set ends the game on the spot, skipping discard.
#[test]
fn test_third_full_set_wins_mid_turn() {
    let [electric, water] = utility_pair(50);
    let alice = ScriptedPlayer::new("Alice")
        .with_actions([Action::new(0, ActionType::AddToProperties, &water).with_target_color(PropertyColor::Utility)]);
    let mut game = game_for(test_config(), players(alice), filler(100, 4));
    place(&mut game.state, 0, brown_pair(10), PropertyColor::Brown);
    place(&mut game.state, 0, dark_blue_pair(20), PropertyColor::DarkBlue);
    place(&mut game.state, 0, [electric], PropertyColor::Utility);
    let mut hand = filler(1, 8);
    hand.push(water);
    game.state.players[0].hand = hand;

    game.play_turn().unwrap();

    assert!(game.is_over());
    assert_eq!(game.winner(), Some("Alice"));
    assert_eq!(game.state.players[0].hand.len(), 10);
    assert!(!events(&game.state).iter().any(|event| matches!(event, GameEvent::DiscardRequired { .. })));
    assert!(matches!(
        game.state.history.last(),
        Some(GameEvent::GameWon { player, .. }) if player == "Alice"
    ));
    assert!(game.play_turn().is_err());
}

/// Two full sets is not enough.
#[test]
fn test_two_full_sets_do_not_win() {
    let [park, boardwalk] = dark_blue_pair(20);
    let alice = ScriptedPlayer::new("Alice").with_actions([
        Action::new(0, ActionType::AddToProperties, &park).with_target_color(PropertyColor::DarkBlue),
        Action::new(0, ActionType::AddToProperties, &boardwalk).with_target_color(PropertyColor::DarkBlue),
    ]);
    let mut game = game_for(test_config(), players(alice), filler(100, 4));
    place(&mut game.state, 0, brown_pair(10), PropertyColor::Brown);
    game.state.players[0].hand = vec![park, boardwalk];

    game.play_turn().unwrap();

    assert_eq!(game.state.players[0].full_set_count(), 2);
    assert!(!game.is_over());
    assert_eq!(game.winner(), None);
    assert_eq!(game.state.current_player, 1);
}

// =============================================================================
// Action loop
// =============================================================================

/// Rent with N Double The Rent cards charges R x 2^N and uses N + 1 slots.
#[test]
fn test_double_rent_multiplies_and_costs_slots() {
    let rent_card = rent(30, &[PropertyColor::Brown, PropertyColor::LightBlue]);
    let alice = ScriptedPlayer::new("Alice").with_actions([Action::new(0, ActionType::PlayAction, &rent_card)
        .with_rent_color(PropertyColor::Brown)
        .with_double_rent(2)]);
    let mut game = game_for(test_config(), players(alice), filler(100, 4));
    place(&mut game.state, 0, brown_pair(10), PropertyColor::Brown);
    game.state.players[0].hand = vec![rent_card, double_rent(31), double_rent(32)];
    game.state.players[1].bank = vec![money(40, 5), money(41, 3), money(42, 2)];

    game.play_turn().unwrap();

    assert!(events(&game.state).iter().any(|event| matches!(
        event,
        GameEvent::RentCharged { amount: 8, doubled: 2, .. }
    )));
    assert_eq!(game.state.actions_played, 3);
    assert_eq!(game.state.players[0].bank_value(), 10);
    assert_eq!(game.state.players[1].bank_value(), 0);
    assert_eq!(game.state.deck.discard_pile().len(), 3);
}

/// A rent stack needing more slots than remain is rejected, retried, then
/// skipped, which ends the action phase.
#[test]
fn test_double_rent_over_budget_is_skipped() {
    let rent_card = rent(30, &[PropertyColor::Brown, PropertyColor::LightBlue]);
    let cash = money(33, 3);
    let over_budget = Action::new(0, ActionType::PlayAction, &rent_card)
        .with_rent_color(PropertyColor::Brown)
        .with_double_rent(2);
    let alice = ScriptedPlayer::new("Alice").with_actions([
        Action::new(0, ActionType::AddToBank, &cash),
        over_budget.clone(),
        over_budget,
    ]);
    let mut game = game_for(test_config(), players(alice), filler(100, 4));
    place(&mut game.state, 0, brown_pair(10), PropertyColor::Brown);
    game.state.players[0].hand = vec![rent_card, double_rent(31), double_rent(32), cash];

    game.play_turn().unwrap();

    assert_eq!(game.state.actions_played, 1);
    assert_eq!(count_rejections(&game.state), 2);
    assert!(events(&game.state).iter().any(|event| matches!(event, GameEvent::ActionSkipped { .. })));
    assert_eq!(game.state.players[0].hand.len(), 5);
}

/// Moving a wild costs nothing; three more actions still fit.
#[test]
fn test_move_property_is_free() {
    let pink_orange = wild(20, &[PropertyColor::Pink, PropertyColor::Orange]);
    let cash: Vec<_> = (1..=3).map(|id| money(id, 1)).collect();
    let mut actions = vec![Action::new(0, ActionType::MoveProperty, &pink_orange).with_target_color(PropertyColor::Orange)];
    actions.extend(cash.iter().map(|card| Action::new(0, ActionType::AddToBank, card)));
    let alice = ScriptedPlayer::new("Alice").with_actions(actions);
    let mut game = game_for(test_config(), players(alice), filler(100, 4));
    place(&mut game.state, 0, [pink_orange], PropertyColor::Pink);
    game.state.players[0].hand = cash;

    game.play_turn().unwrap();

    assert_eq!(game.state.actions_played, 3);
    assert_eq!(game.state.players[0].bank_value(), 3);
    assert_eq!(
        game.state.players[0].property_color_of(CardId(20)),
        Some(PropertyColor::Orange)
    );
    assert!(!game.state.players[0].property_sets.contains_key(&PropertyColor::Pink));
}

/// Provider failures are retried and then forfeit the slot without
/// ending the game.
#[test]
fn test_provider_failures_forfeit_the_action() {
    let mut alice = ScriptedPlayer::new("Alice");
    alice.actions.push_back(Err(ProviderError::Timeout));
    alice.actions.push_back(Err(ProviderError::Malformed("not json".into())));
    let mut game = game_for(test_config(), players(alice), filler(100, 4));

    game.play_turn().unwrap();

    assert_eq!(count_rejections(&game.state), 2);
    let lines = lines(&game.state);
    assert!(lines.iter().any(|line| line.contains("decision provider timed out")));
    assert!(lines.iter().any(|line| line.starts_with("Skipping Alice's action")));
    assert_eq!(game.state.current_player, 1);
}

/// Acting for another seat is a rule violation.
#[test]
fn test_action_for_wrong_player_is_rejected() {
    let cash = money(1, 2);
    let alice = ScriptedPlayer::new("Alice").with_actions([Action::new(1, ActionType::AddToBank, &cash)]);
    let mut game = game_for(test_config(), players(alice), filler(100, 4));
    game.state.players[0].hand = vec![cash];

    game.play_turn().unwrap();

    assert_eq!(game.state.players[0].bank_value(), 0);
    assert!(lines(&game.state).iter().any(|line| line.contains("rejected")));
}

/// The provider-supplied card type is replaced by the real one before
/// validation, so a mislabeled money card cannot pose as a rent.
#[test]
fn test_mislabeled_card_type_is_corrected() {
    let cash = money(1, 2);
    let mut action = Action::new(0, ActionType::AddToBank, &cash);
    action.card_type = Some(dealbench::CardType::Rent);
    let alice = ScriptedPlayer::new("Alice").with_actions([action]);
    let mut game = game_for(test_config(), players(alice), filler(100, 4));
    game.state.players[0].hand = vec![cash];

    game.play_turn().unwrap();

    assert_eq!(game.state.players[0].bank_value(), 2);
    assert_eq!(game.state.actions_played, 1);
}

/// Fields an action type has no use for are cleared before validation, so a
/// bank play carrying rent and steal fields resolves as a plain bank play.
#[test]
fn test_stray_action_fields_are_dropped() {
    let cash = money(1, 2);
    let mut action = Action::new(0, ActionType::AddToBank, &cash);
    action.rent_color = Some(PropertyColor::Red);
    action.target_property = Some(PropertyRef::new("Kentucky Avenue", PropertyColor::Red));
    action.source_property = Some(PropertyRef::new("Boardwalk", PropertyColor::DarkBlue));
    let alice = ScriptedPlayer::new("Alice").with_actions([action]);
    let mut game = game_for(test_config(), players(alice), filler(100, 4));
    game.state.players[0].hand = vec![cash];

    game.play_turn().unwrap();

    assert_eq!(game.state.players[0].bank_value(), 2);
    let resolved: Vec<String> = events(&game.state)
        .into_iter()
        .filter_map(|event| match event {
            GameEvent::ActionResolved { action, .. } => Some(action),
            _ => None,
        })
        .collect();
    assert_eq!(resolved, vec![format!("ADD_TO_BANK card={}", CardId(1))]);
}

// =============================================================================
// Card effects
// =============================================================================

fn play(state: &mut GameState, action: &Action) -> bool {
    let mut providers = vec![ScriptedPlayer::new("Alice"), ScriptedPlayer::new("Bob")];
    state.validate_action(action).unwrap();
    state.execute(&mut providers, action).unwrap()
}

fn brown_rent(state: &GameState) -> u32 {
    state.players[0].property_sets[&PropertyColor::Brown].rent()
}

/// House then hotel on a full Brown set: rent goes 2, 5, 9 and both
/// building cards end up in the discard pile.
#[test]
fn test_buildings_raise_rent_and_are_consumed() {
    let mut state = state_for(&["Alice", "Bob"], filler(500, 10));
    place(&mut state, 0, brown_pair(10), PropertyColor::Brown);
    let house = building(1, BuildingKind::House);
    let hotel = building(2, BuildingKind::Hotel);
    state.players[0].hand = vec![house.clone(), hotel.clone()];
    assert_eq!(brown_rent(&state), 2);

    let build_house =
        Action::new(0, ActionType::PlayAction, &house).with_target_color(PropertyColor::Brown);
    assert!(play(&mut state, &build_house));
    assert_eq!(brown_rent(&state), 5);
    assert!(state.players[0].property_sets[&PropertyColor::Brown].has_house());

    state.actions_played = 1;
    let build_hotel =
        Action::new(0, ActionType::PlayAction, &hotel).with_target_color(PropertyColor::Brown);
    assert!(play(&mut state, &build_hotel));
    assert_eq!(brown_rent(&state), 9);
    assert!(state.players[0].property_sets[&PropertyColor::Brown].has_hotel());

    assert!(state.players[0].hand.is_empty());
    let discarded: Vec<CardId> = state.deck.discard_pile().iter().map(|card| card.id).collect();
    assert_eq!(discarded, vec![CardId(1), CardId(2)]);
    assert_eq!(state.players[0].property_sets[&PropertyColor::Brown].len(), 2);
}

#[test]
fn test_pass_go_draws_configured_cards() {
    let mut state = state_for(&["Alice", "Bob"], filler(500, 10));
    let pass_go = action_card(1, "Pass Go", CardKind::PassGo);
    state.players[0].hand = vec![pass_go.clone(), money(2, 1)];
    let before = state.deck.cards_remaining();

    assert!(play(&mut state, &Action::new(0, ActionType::PlayAction, &pass_go)));

    assert_eq!(state.players[0].hand.len(), 1 + state.config.pass_go_draw_count);
    assert_eq!(state.deck.cards_remaining(), before - 2);
    assert_eq!(state.deck.discard_pile().len(), 1);
    assert!(matches!(
        state.history.last(),
        Some(GameEvent::PassGo { drawn: 2, hand_size: 3, .. })
    ));
}

// =============================================================================
// Refused rent policy
// =============================================================================

/// Rent on a set of any-colour wilds asks for nothing, which counts as
/// collected: the slot is spent even under the refund policy.
#[test]
fn test_zero_rent_still_uses_slot_under_refund_policy() {
    let rent_card = rent(30, &[PropertyColor::Red, PropertyColor::Yellow]);
    let action = Action::new(0, ActionType::PlayAction, &rent_card).with_rent_color(PropertyColor::Red);
    let alice = ScriptedPlayer::new("Alice").with_actions([action]);
    let config = GameConfig {
        refused_rent: RefusedRentPolicy::RefundSlot,
        ..test_config()
    };
    let mut game = game_for(config, players(alice), filler(100, 4));
    game.state.players[0].hand = vec![rent_card];
    place(&mut game.state, 0, [rainbow(31)], PropertyColor::Red);
    game.state.players[1].bank = vec![money(41, 5)];

    game.play_turn().unwrap();

    assert_eq!(game.state.actions_played, 1);
    assert_eq!(game.state.players[1].bank_value(), 5);
    assert!(!events(&game.state)
        .iter()
        .any(|event| matches!(event, GameEvent::ChargeRequested { .. })));
    assert!(events(&game.state).iter().any(|event| matches!(
        event,
        GameEvent::ActionResolved { success: true, .. }
    )));
}

fn negated_birthday(policy: RefusedRentPolicy) -> u8 {
    let birthday = action_card(30, "It's My Birthday", CardKind::Birthday);
    let alice = ScriptedPlayer::new("Alice").with_actions([Action::new(0, ActionType::PlayAction, &birthday)]);
    let bob = ScriptedPlayer::new("Bob").negating();
    let config = GameConfig {
        refused_rent: policy,
        ..test_config()
    };
    let mut game = game_for(config, vec![alice, bob], filler(100, 4));
    game.state.players[0].hand = vec![birthday];
    game.state.players[1].hand = vec![just_say_no_card(40)];
    game.state.players[1].bank = vec![money(41, 5)];

    game.play_turn().unwrap();

    assert_eq!(game.state.players[1].bank_value(), 5);
    game.state.actions_played
}

#[test]
fn test_refused_charge_consumes_slot_by_default() {
    assert_eq!(negated_birthday(RefusedRentPolicy::ConsumeSlot), 1);
}

#[test]
fn test_refused_charge_refund_policy() {
    assert_eq!(negated_birthday(RefusedRentPolicy::RefundSlot), 0);
}

// =============================================================================
// Whole games
// =============================================================================

fn total_cards<P: DecisionProvider>(game: &Game<P>) -> usize {
    let held: usize = game
        .state
        .players
        .iter()
        .map(|p| p.hand.len() + p.bank.len() + p.property_sets.values().map(|s| s.len()).sum::<usize>())
        .sum();
    held + game.state.deck.cards_remaining() + game.state.deck.discard_pile().len()
}

/// Random play from the standard deck runs to an end without fatal errors
/// and never creates or loses a card.
#[test]
fn test_random_game_runs_to_completion() {
    let config = GameConfig {
        max_turns: 300,
        ..GameConfig::simulation()
    };
    let providers = vec![
        RandomPlayer::new("Ann", 1),
        RandomPlayer::new("Ben", 2),
        RandomPlayer::new("Cat", 3),
    ];
    let mut game = Game::new(config, providers).unwrap();
    let dealt = total_cards(&game);

    let outcome = game.play().unwrap();

    assert!(game.is_over());
    assert!(outcome.turns <= 300);
    assert_eq!(dealt, 117);
    assert_eq!(total_cards(&game), 117);
    if let Some(winner) = &outcome.winner {
        let idx = game.state.player_index(winner).unwrap();
        assert!(game.state.players[idx].has_won());
    }
    assert!(matches!(
        game.state.history.entries().first().map(|e| &e.event),
        Some(GameEvent::PlayOrder { .. })
    ));
}

/// The exported record carries every seat's full hand and the history.
#[test]
fn test_greedy_game_record_exports() {
    let config = GameConfig {
        max_turns: 200,
        ..GameConfig::simulation()
    };
    let providers = vec![GreedyPlayer::new("Gus", 5, None, None), GreedyPlayer::new("Hal", 6, None, Some(0.1))];
    let mut game = Game::new(config, providers).unwrap();
    game.play().unwrap();

    let record = game.record();
    assert_eq!(record.players.len(), 2);
    assert_eq!(record.history.len(), game.state.history.len());
    let json = serde_json::to_value(&record).unwrap();
    assert!(json["players"][0]["hand"].is_array());
    assert!(json["history"]["entries"].is_array());
}

#[test]
fn test_player_count_and_names_are_checked() {
    let lonely = Game::with_deck(test_config(), vec![ScriptedPlayer::new("Solo")], dealbench::game::Deck::stacked(Vec::new()));
    assert!(matches!(lonely, Err(dealbench::GameError::InvalidPlayerCount(1))));

    let twins = Game::with_deck(
        test_config(),
        vec![ScriptedPlayer::new("Ann"), ScriptedPlayer::new("Ann")],
        dealbench::game::Deck::stacked(Vec::new()),
    );
    assert!(matches!(twins, Err(dealbench::GameError::DuplicateName(name)) if name == "Ann"));
}
