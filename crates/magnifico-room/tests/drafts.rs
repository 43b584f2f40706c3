//! Tile and leader drafts as seen from the participants' links.

mod common;

use std::collections::BTreeSet;
use std::time::Duration;

use common::*;
use magnifico_model::LeaderCard;
use magnifico_room::{GameSettings, RoomEvent, RoomState};
use tokio::time::Instant;

fn four_players() -> GameSettings {
    GameSettings {
        max_players: 4,
        ..settings()
    }
}

fn names(cards: &[LeaderCard]) -> Vec<String> {
    cards.iter().map(|c| c.name.clone()).collect()
}

async fn wait_for_rejection(rx: &mut Events) -> String {
    match wait_for(rx, |e| matches!(e, RoomEvent::Rejected { .. })).await {
        RoomEvent::Rejected { reason } => reason,
        _ => unreachable!(),
    }
}

// =========================================================================
// Tile draft
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_tile_draft_runs_in_reverse_order() {
    let mut rooms = manager();
    let room = rooms.create_room(settings());
    let seats = admit_all(&mut rooms, room, &["a", "b"]).await;
    let mut seats = seat_in_turn_order(seats).await;

    let first = wait_for_tiles(&mut seats[1].rx).await;
    assert_eq!(first.len(), 4, "last seat sees the whole pool");
    let taken = first[2].id;
    rooms.choose_tile(seats[1].id.clone(), taken).await.unwrap();

    let second = wait_for_tiles(&mut seats[0].rx).await;
    assert_eq!(second.len(), 3);
    assert!(second.iter().all(|t| t.id != taken));
}

#[tokio::test(start_paused = true)]
async fn test_claimed_tiles_land_on_personal_boards() {
    let mut rooms = manager();
    let room = rooms.create_room(settings());
    let seats = admit_all(&mut rooms, room, &["a", "b"]).await;
    let mut seats = seat_in_turn_order(seats).await;

    let offer = wait_for_tiles(&mut seats[1].rx).await;
    rooms.choose_tile(seats[1].id.clone(), offer[3].id).await.unwrap();
    let offer = wait_for_tiles(&mut seats[0].rx).await;
    rooms.choose_tile(seats[0].id.clone(), offer[0].id).await.unwrap();
    for _ in 0..4 {
        for seat in seats.iter_mut() {
            let (_, cards) = wait_for_leaders(&mut seat.rx).await;
            rooms.choose_leader(seat.id.clone(), cards[0].name.clone()).await.unwrap();
        }
    }

    let RoomEvent::GameInfo { game } =
        wait_for(&mut seats[0].rx, |e| matches!(e, RoomEvent::GameInfo { .. })).await
    else {
        unreachable!()
    };
    let last = game.board_of(&seats[1].id).unwrap();
    let first = game.board_of(&seats[0].id).unwrap();
    assert_eq!(last.tile.as_ref().map(|t| t.id), Some(4));
    assert_eq!(first.tile.as_ref().map(|t| t.id), Some(1));
}

#[tokio::test(start_paused = true)]
async fn test_tile_choice_out_of_turn_is_rejected() {
    let mut rooms = manager();
    let room = rooms.create_room(settings());
    let seats = admit_all(&mut rooms, room, &["a", "b"]).await;
    let mut seats = seat_in_turn_order(seats).await;
    let offer = wait_for_tiles(&mut seats[1].rx).await;

    rooms.choose_tile(seats[0].id.clone(), offer[0].id).await.unwrap();

    let reason = wait_for_rejection(&mut seats[0].rx).await;
    assert!(reason.contains("not your turn"), "{reason}");
    let info = rooms.get_room_info(room).await.unwrap();
    assert_eq!(info.state, RoomState::TileDraft);
}

#[tokio::test(start_paused = true)]
async fn test_tile_not_on_offer_is_rejected() {
    let mut rooms = manager();
    let room = rooms.create_room(settings());
    let seats = admit_all(&mut rooms, room, &["a", "b"]).await;
    let mut seats = seat_in_turn_order(seats).await;
    wait_for_tiles(&mut seats[1].rx).await;

    rooms.choose_tile(seats[1].id.clone(), 99).await.unwrap();

    let reason = wait_for_rejection(&mut seats[1].rx).await;
    assert!(reason.contains("99"), "{reason}");
    // Still their pick: a valid answer is accepted afterwards.
    rooms.choose_tile(seats[1].id.clone(), 2).await.unwrap();
    let next = wait_for_tiles(&mut seats[0].rx).await;
    assert!(next.iter().all(|t| t.id != 2));
}

#[tokio::test(start_paused = true)]
async fn test_tile_timeout_forfeits_the_pick() {
    let mut rooms = manager();
    let room = rooms.create_room(settings());
    let seats = admit_all(&mut rooms, room, &["a", "b"]).await;
    let mut seats = seat_in_turn_order(seats).await;
    wait_for_tiles(&mut seats[1].rx).await;
    let offered_at = Instant::now();

    let next = wait_for_tiles(&mut seats[0].rx).await;

    assert_eq!(offered_at.elapsed(), Duration::from_millis(30_000));
    assert_eq!(next.len(), 4, "a forfeited pick takes nothing from the pool");
}

#[tokio::test(start_paused = true)]
async fn test_leader_choice_during_tile_draft_is_rejected() {
    let mut rooms = manager();
    let room = rooms.create_room(settings());
    let seats = admit_all(&mut rooms, room, &["a", "b"]).await;
    let mut seats = seat_in_turn_order(seats).await;
    wait_for_tiles(&mut seats[1].rx).await;

    rooms.choose_leader(seats[1].id.clone(), "leader-1".to_string()).await.unwrap();

    let reason = wait_for_rejection(&mut seats[1].rx).await;
    assert!(reason.contains("leader choice"), "{reason}");
}

// =========================================================================
// Leader draft
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_leader_round_one_deals_disjoint_blocks() {
    let mut rooms = manager();
    let room = rooms.create_room(four_players());
    let seats = admit_all(&mut rooms, room, &["a", "b", "c", "d"]).await;
    let mut seats = seat_in_turn_order(seats).await;
    finish_drafts(&rooms, &mut seats, 0).await;

    let mut seen = BTreeSet::new();
    for seat in seats.iter_mut() {
        let (round, cards) = wait_for_leaders(&mut seat.rx).await;
        assert_eq!(round, 1);
        assert_eq!(cards.len(), 4);
        seen.extend(names(&cards));
    }

    assert_eq!(seen.len(), 16, "every leader card is offered exactly once");
}

#[tokio::test(start_paused = true)]
async fn test_leader_blocks_pass_to_the_next_seat() {
    let mut rooms = manager();
    let room = rooms.create_room(four_players());
    let seats = admit_all(&mut rooms, room, &["a", "b", "c", "d"]).await;
    let mut seats = seat_in_turn_order(seats).await;
    finish_drafts(&rooms, &mut seats, 0).await;

    let mut round_one = Vec::new();
    for seat in seats.iter_mut() {
        let (_, cards) = wait_for_leaders(&mut seat.rx).await;
        rooms.choose_leader(seat.id.clone(), cards[0].name.clone()).await.unwrap();
        round_one.push(names(&cards));
    }

    for (i, seat) in seats.iter_mut().enumerate() {
        let (round, cards) = wait_for_leaders(&mut seat.rx).await;
        assert_eq!(round, 2);
        // The order rotated by one, so seat i now holds what seat i-1 left.
        let previous = &round_one[(i + 3) % 4];
        assert_eq!(names(&cards), previous[1..].to_vec());
    }
}

#[tokio::test(start_paused = true)]
async fn test_leader_pick_outside_block_is_rejected() {
    let mut rooms = manager();
    let room = rooms.create_room(settings());
    let seats = admit_all(&mut rooms, room, &["a", "b"]).await;
    let mut seats = seat_in_turn_order(seats).await;
    finish_drafts(&rooms, &mut seats, 0).await;
    let (_, mine) = wait_for_leaders(&mut seats[0].rx).await;
    let (_, theirs) = wait_for_leaders(&mut seats[1].rx).await;

    rooms.choose_leader(seats[0].id.clone(), theirs[0].name.clone()).await.unwrap();
    let reason = wait_for_rejection(&mut seats[0].rx).await;
    assert!(reason.contains(&theirs[0].name), "{reason}");

    rooms.choose_leader(seats[0].id.clone(), mine[0].name.clone()).await.unwrap();
    rooms.choose_leader(seats[0].id.clone(), mine[1].name.clone()).await.unwrap();
    let reason = wait_for_rejection(&mut seats[0].rx).await;
    assert!(reason.contains("already picked"), "{reason}");
}

#[tokio::test(start_paused = true)]
async fn test_leader_timeout_picks_first_card() {
    let mut rooms = manager();
    let room = rooms.create_room(settings());
    let seats = admit_all(&mut rooms, room, &["a", "b"]).await;
    let mut seats = seat_in_turn_order(seats).await;
    finish_drafts(&rooms, &mut seats, 0).await;

    let mut silent_first = Vec::new();
    for _ in 0..4 {
        let (_, mine) = wait_for_leaders(&mut seats[0].rx).await;
        let (_, theirs) = wait_for_leaders(&mut seats[1].rx).await;
        silent_first.push(theirs[0].name.clone());
        rooms.choose_leader(seats[0].id.clone(), mine[0].name.clone()).await.unwrap();
    }

    let RoomEvent::GameInfo { game } =
        wait_for(&mut seats[1].rx, |e| matches!(e, RoomEvent::GameInfo { .. })).await
    else {
        unreachable!()
    };
    let silent = game.board_of(&seats[1].id).unwrap();
    assert_eq!(names(&silent.leader_cards), silent_first);
    assert_eq!(game.board_of(&seats[0].id).unwrap().leader_cards.len(), 4);
}

#[tokio::test(start_paused = true)]
async fn test_leader_draft_waits_without_deadline() {
    let mut rooms = manager();
    let room = rooms.create_room(GameSettings {
        draft_wait_ms: None,
        ..settings()
    });
    let seats = admit_all(&mut rooms, room, &["a", "b"]).await;
    let mut seats = seat_in_turn_order(seats).await;
    finish_drafts(&rooms, &mut seats, 0).await;
    wait_for_leaders(&mut seats[0].rx).await;

    tokio::time::sleep(Duration::from_secs(3_600)).await;

    let info = rooms.get_room_info(room).await.unwrap();
    assert_eq!(info.state, RoomState::LeaderDraft);
}

#[tokio::test(start_paused = true)]
async fn test_rejoin_resends_leader_offer() {
    let mut rooms = manager();
    let room = rooms.create_room(settings());
    let seats = admit_all(&mut rooms, room, &["a", "b"]).await;
    let mut seats = seat_in_turn_order(seats).await;
    finish_drafts(&rooms, &mut seats, 0).await;
    let (round, cards) = wait_for_leaders(&mut seats[0].rx).await;

    let (tx, mut fresh) = link();
    rooms.rejoin(seats[0].id.clone(), tx).await.unwrap();

    assert_eq!(wait_for_leaders(&mut fresh).await, (round, cards));
}

// =========================================================================
// Unreachable participants
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_unreachable_participant_never_blocks_the_session() {
    let mut rooms = manager();
    let room = rooms.create_room(GameSettings {
        rounds: 1,
        sub_rounds: 1,
        ..settings()
    });
    let start = Instant::now();
    let (gone, dropped) = link();
    drop(dropped);
    rooms.admit(pid("dead"), room, gone).await.unwrap();
    let (tx, mut live) = link();
    rooms.admit(pid("live"), room, tx).await.unwrap();

    let mut first_leader_offer = None;
    let mut last_game = None;
    loop {
        match live.recv().await.unwrap() {
            RoomEvent::TileOffer { tiles } => {
                assert_eq!(start.elapsed(), Duration::ZERO);
                assert_eq!(tiles.len(), 4, "the unreachable seat claims nothing");
                rooms.choose_tile(pid("live"), tiles[0].id).await.unwrap();
            }
            RoomEvent::LeaderOffer { cards, .. } => {
                if first_leader_offer.is_none() {
                    first_leader_offer = Some(start.elapsed());
                }
                rooms.choose_leader(pid("live"), cards[0].name.clone()).await.unwrap();
            }
            RoomEvent::GameInfo { game } => last_game = Some(game),
            RoomEvent::TurnStarted { turn, player, .. } if player == pid("live") => {
                rooms.end_turn(player, turn).await.unwrap();
            }
            RoomEvent::SessionComplete => break,
            _ => {}
        }
    }

    assert_eq!(first_leader_offer, Some(Duration::ZERO));
    // Every leader round waits out the draft deadline, then one silent turn.
    assert_eq!(start.elapsed(), Duration::from_millis(4 * 30_000 + 10_000));
    let game = last_game.unwrap();
    let dead = game.board_of(&pid("dead")).unwrap();
    assert!(dead.tile.is_none());
    assert_eq!(dead.leader_cards.len(), 4);
    assert!(game.board_of(&pid("live")).unwrap().tile.is_some());
}
