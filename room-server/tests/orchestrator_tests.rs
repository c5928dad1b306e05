
use room_types::{GameError, LetterStatus, RoomStatus, ServerMessage, MAX_GUESSES};
use test_helpers::*;

#[tokio::test]
async fn create_room_notifies_only_the_creator() {
    let setup = TestSetup::new();
    let (alice, mut rx_alice) = setup.connect();
    let (_bob, mut rx_bob) = setup.connect();

    setup
        .orchestrator
        .create_room(alice, "ayse".into(), Some(2), Some(5), Some(30))
        .await
        .unwrap();

    let messages = drain(&mut rx_alice);
    let room_id = expect_room_id(&messages);
    assert_eq!(messages.len(), 1);
    assert!(drain(&mut rx_bob).is_empty());
    assert_eq!(room_id.len(), 6);
}

#[tokio::test]
async fn create_room_fails_without_words_of_that_length() {
    let setup = TestSetup::new();
    let (alice, mut rx_alice) = setup.connect();

    // Word length 7 is allowed by config but absent from the list.
    let result = setup
        .orchestrator
        .create_room(alice, "ayse".into(), Some(2), Some(7), Some(30))
        .await;

    assert_eq!(result, Err(GameError::NoWordsForLength { length: 7 }));
    assert!(drain(&mut rx_alice).is_empty());
    assert_eq!(setup.orchestrator.active_rooms().await, 0);
}

#[tokio::test]
async fn filling_a_room_starts_the_game_with_timers_for_everyone() {
    let setup = TestSetup::new();
    let (alice, mut rx_alice) = setup.connect();
    let (bob, mut rx_bob) = setup.connect();

    setup
        .orchestrator
        .create_room(alice, "ayse".into(), Some(2), Some(5), Some(60))
        .await
        .unwrap();
    let room_id = expect_room_id(&drain(&mut rx_alice));

    setup
        .orchestrator
        .join_room(bob, &room_id, "mehmet".into())
        .await
        .unwrap();

    let bob_messages = drain(&mut rx_bob);
    assert!(bob_messages
        .iter()
        .any(|m| matches!(m, ServerMessage::RoomJoined { .. })));

    let alice_messages = drain(&mut rx_alice);
    assert!(alice_messages
        .iter()
        .any(|m| matches!(m, ServerMessage::PlayerJoined { .. })));

    let start = alice_messages
        .iter()
        .find_map(|m| match m {
            ServerMessage::GameStart { state } => Some(state.clone()),
            _ => None,
        })
        .expect("no GameStart");
    assert_eq!(start.status, RoomStatus::Playing);
    assert_eq!(start.players.len(), 2);
    for player in &start.players {
        assert_eq!(player.remaining_time, Some(60));
    }
}

#[tokio::test]
async fn unlimited_rooms_start_with_the_sentinel() {
    let setup = TestSetup::new();
    let (alice, mut rx_alice) = setup.connect();
    let (bob, _rx_bob) = setup.connect();

    let room_id = setup
        .ready_room(alice, &mut rx_alice, bob, None, "kapak")
        .await;

    let start = drain(&mut rx_alice)
        .into_iter()
        .find_map(|m| match m {
            ServerMessage::GameStart { state } => Some(state),
            _ => None,
        })
        .expect("no GameStart");
    assert_eq!(start.id, room_id);
    for player in &start.players {
        assert_eq!(player.remaining_time, None);
    }
}

#[tokio::test]
async fn joining_a_missing_room_fails() {
    let setup = TestSetup::new();
    let (alice, _rx) = setup.connect();

    let result = setup
        .orchestrator
        .join_room(alice, "ZZZZZZ", "ayse".into())
        .await;
    assert_eq!(result, Err(GameError::RoomNotFound));
}

#[tokio::test]
async fn joining_a_full_room_fails() {
    let setup = TestSetup::new();
    let (alice, mut rx_alice) = setup.connect();
    let (bob, _rx_bob) = setup.connect();
    let (carol, _rx_carol) = setup.connect();

    let room_id = setup
        .ready_room(alice, &mut rx_alice, bob, Some(30), "kapak")
        .await;

    let result = setup
        .orchestrator
        .join_room(carol, &room_id, "fatma".into())
        .await;
    assert_eq!(result, Err(GameError::RoomFull));
}

#[tokio::test]
async fn rejoining_the_same_room_is_idempotent() {
    let setup = TestSetup::new();
    let (alice, mut rx_alice) = setup.connect();
    let (bob, _rx_bob) = setup.connect();

    let room_id = setup
        .ready_room(alice, &mut rx_alice, bob, Some(30), "kapak")
        .await;
    drain(&mut rx_alice);

    // A second join from an existing member re-sends the state.
    setup
        .orchestrator
        .join_room(alice, &room_id, "ayse".into())
        .await
        .unwrap();

    let messages = drain(&mut rx_alice);
    let state = messages
        .iter()
        .find_map(|m| match m {
            ServerMessage::RoomJoined { state } => Some(state),
            _ => None,
        })
        .expect("no RoomJoined");
    assert_eq!(state.players.len(), 2);
}

#[tokio::test]
async fn winning_scenario_reveals_the_solution() {
    let setup = TestSetup::new();
    let (alice, mut rx_alice) = setup.connect();
    let (bob, mut rx_bob) = setup.connect();

    setup
        .ready_room(alice, &mut rx_alice, bob, Some(30), "kapak")
        .await;
    drain(&mut rx_alice);
    drain(&mut rx_bob);

    // Near miss first: duplicate 'a's both count, the 'b' is absent.
    setup.orchestrator.make_guess(alice, "kabak").await.unwrap();
    let update = drain(&mut rx_alice);
    let feedback = update
        .iter()
        .find_map(|m| m.last_guess_of(alice))
        .expect("no guess in update")
        .feedback
        .clone();
    assert_eq!(
        feedback,
        vec![
            LetterStatus::Correct,
            LetterStatus::Correct,
            LetterStatus::Absent,
            LetterStatus::Correct,
            LetterStatus::Correct,
        ]
    );

    // Then the win.
    setup.orchestrator.make_guess(alice, "kapak").await.unwrap();
    let messages = drain(&mut rx_bob);
    let (game_over, winner) = find_game_over(&messages).expect("no GameOver");
    assert_eq!(winner, Some(alice));
    match game_over {
        ServerMessage::GameOver { state, solution, .. } => {
            assert_eq!(solution, "kapak");
            assert_eq!(state.status, RoomStatus::Finished);
        }
        _ => unreachable!(),
    }
}

#[tokio::test]
async fn guesses_are_validated_before_any_mutation() {
    let setup = TestSetup::new();
    let (alice, mut rx_alice) = setup.connect();
    let (bob, _rx_bob) = setup.connect();

    setup
        .ready_room(alice, &mut rx_alice, bob, Some(30), "kapak")
        .await;
    drain(&mut rx_alice);

    assert_eq!(
        setup.orchestrator.make_guess(alice, "bardak").await,
        Err(GameError::InvalidLength { expected: 5 })
    );
    assert_eq!(
        setup.orchestrator.make_guess(alice, "xxxxx").await,
        Err(GameError::InvalidWord {
            word: "xxxxx".into()
        })
    );
    // Neither rejection touched the history.
    assert!(drain(&mut rx_alice).is_empty());
}

#[tokio::test]
async fn guessing_outside_an_active_game_fails() {
    let setup = TestSetup::new();
    let (alice, mut rx_alice) = setup.connect();

    // Not in any room yet.
    assert_eq!(
        setup.orchestrator.make_guess(alice, "kapak").await,
        Err(GameError::RoomNotFound)
    );

    // In a room that is still waiting.
    setup
        .orchestrator
        .create_room(alice, "ayse".into(), Some(2), Some(5), Some(30))
        .await
        .unwrap();
    drain(&mut rx_alice);
    assert_eq!(
        setup.orchestrator.make_guess(alice, "kapak").await,
        Err(GameError::GameNotActive)
    );
}

#[tokio::test]
async fn seventh_guess_is_rejected() {
    let setup = TestSetup::new();
    let (alice, mut rx_alice) = setup.connect();
    let (bob, _rx_bob) = setup.connect();
    let (carol, _rx_carol) = setup.connect();

    // Three players so one exhausted player does not end the game.
    setup
        .orchestrator
        .create_room(alice, "ayse".into(), Some(3), Some(5), Some(30))
        .await
        .unwrap();
    let room_id = expect_room_id(&drain(&mut rx_alice));
    setup
        .orchestrator
        .override_solution(&room_id, "kapak")
        .await;
    setup
        .orchestrator
        .join_room(bob, &room_id, "mehmet".into())
        .await
        .unwrap();
    setup
        .orchestrator
        .join_room(carol, &room_id, "fatma".into())
        .await
        .unwrap();

    for _ in 0..MAX_GUESSES {
        setup.orchestrator.make_guess(alice, "kalem").await.unwrap();
    }
    assert_eq!(
        setup.orchestrator.make_guess(alice, "kalem").await,
        Err(GameError::NoAttemptsLeft)
    );

    // The others are unaffected; the game goes on.
    setup.orchestrator.make_guess(bob, "kazak").await.unwrap();
    assert_eq!(setup.orchestrator.active_rooms().await, 1);
}

#[tokio::test]
async fn exhausting_every_player_ends_in_a_draw() {
    let setup = TestSetup::new();
    let (alice, mut rx_alice) = setup.connect();
    let (bob, mut rx_bob) = setup.connect();

    setup
        .ready_room(alice, &mut rx_alice, bob, Some(30), "kapak")
        .await;

    for _ in 0..MAX_GUESSES {
        setup.orchestrator.make_guess(alice, "kalem").await.unwrap();
        setup.orchestrator.make_guess(bob, "kazak").await.unwrap();
    }

    let messages = drain(&mut rx_bob);
    let (game_over, winner) = find_game_over(&messages).expect("no GameOver");
    assert_eq!(winner, None);
    match game_over {
        ServerMessage::GameOver { solution, .. } => assert_eq!(solution, "kapak"),
        _ => unreachable!(),
    }
    drain(&mut rx_alice);
}

#[tokio::test]
async fn disconnect_of_the_only_player_deletes_the_room() {
    let setup = TestSetup::new();
    let (alice, mut rx_alice) = setup.connect();
    let (bob, _rx_bob) = setup.connect();

    setup
        .orchestrator
        .create_room(alice, "ayse".into(), Some(2), Some(5), Some(30))
        .await
        .unwrap();
    let room_id = expect_room_id(&drain(&mut rx_alice));

    setup.orchestrator.disconnect(alice).await;
    assert_eq!(setup.orchestrator.active_rooms().await, 0);

    let result = setup
        .orchestrator
        .join_room(bob, &room_id, "mehmet".into())
        .await;
    assert_eq!(result, Err(GameError::RoomNotFound));
}

#[tokio::test]
async fn mid_game_disconnect_keeps_the_game_running() {
    let setup = TestSetup::new();
    let (alice, mut rx_alice) = setup.connect();
    let (bob, mut rx_bob) = setup.connect();

    setup
        .ready_room(alice, &mut rx_alice, bob, Some(30), "kapak")
        .await;
    drain(&mut rx_alice);
    drain(&mut rx_bob);

    setup.orchestrator.disconnect(bob).await;

    let messages = drain(&mut rx_alice);
    let left = messages
        .iter()
        .find_map(|m| match m {
            ServerMessage::PlayerLeft { player_id, state } => Some((*player_id, state.clone())),
            _ => None,
        })
        .expect("no PlayerLeft");
    assert_eq!(left.0, bob);
    assert_eq!(left.1.players.len(), 1);
    assert_eq!(left.1.status, RoomStatus::Playing);

    // The remaining player can still win.
    setup.orchestrator.make_guess(alice, "kapak").await.unwrap();
    let messages = drain(&mut rx_alice);
    assert!(find_game_over(&messages).is_some());
}

#[tokio::test]
async fn disconnect_without_a_room_is_a_no_op() {
    let setup = TestSetup::new();
    let (alice, _rx) = setup.connect();
    setup.orchestrator.disconnect(alice).await;
    assert_eq!(setup.orchestrator.active_rooms().await, 0);
}
