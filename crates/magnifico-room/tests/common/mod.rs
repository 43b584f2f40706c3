//! Shared fixtures for the room integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use magnifico_model::{CardColor, Catalog, DevelopmentCard, LeaderCard, PersonalTile};
use magnifico_protocol::PlayerId;
use magnifico_room::{BasicRules, GameSettings, PlayerSender, RoomEvent, RoomManager};
use tokio::sync::mpsc;

pub type Events = mpsc::UnboundedReceiver<RoomEvent>;

pub fn pid(name: &str) -> PlayerId {
    PlayerId::from(name)
}

pub fn link() -> (PlayerSender, Events) {
    mpsc::unbounded_channel()
}

/// 8 cards per color for each of 3 rounds, 4 tiles and 16 leaders.
pub fn catalog() -> Catalog {
    let mut development_cards = Vec::new();
    let mut id = 0;
    for color in CardColor::COLUMNS {
        for round in 1..=3 {
            for _ in 0..8 {
                id += 1;
                development_cards.push(DevelopmentCard {
                    id,
                    name: format!("{color}-{id}"),
                    round,
                    color,
                    cost: Default::default(),
                });
            }
        }
    }
    let personal_tiles = (1..=4)
        .map(|id| PersonalTile {
            id,
            harvest_bonus: Default::default(),
            production_bonus: Default::default(),
        })
        .collect();
    let leader_cards = (1..=16)
        .map(|i| LeaderCard {
            name: format!("leader-{i}"),
            requirement: Default::default(),
        })
        .collect();
    Catalog {
        development_cards,
        leader_cards,
        personal_tiles,
    }
}

/// Two-player rooms with round-number waits and a fixed seed.
pub fn settings() -> GameSettings {
    GameSettings {
        min_players: 2,
        max_players: 2,
        pre_start_wait_ms: 5_000,
        move_wait_ms: 10_000,
        draft_wait_ms: Some(30_000),
        seed: Some(7),
        ..GameSettings::default()
    }
}

pub fn manager() -> RoomManager<BasicRules> {
    manager_with(catalog())
}

pub fn manager_with(catalog: Catalog) -> RoomManager<BasicRules> {
    RoomManager::new(Arc::new(catalog), settings())
}

/// Receives events until one matches `pred`, discarding the rest.
pub async fn wait_for(rx: &mut Events, pred: impl Fn(&RoomEvent) -> bool) -> RoomEvent {
    loop {
        let event = rx.recv().await.expect("room dropped the link");
        if pred(&event) {
            return event;
        }
    }
}

pub async fn wait_for_order(rx: &mut Events) -> Vec<PlayerId> {
    match wait_for(rx, |e| matches!(e, RoomEvent::SessionStarting { .. })).await {
        RoomEvent::SessionStarting { order } => order,
        _ => unreachable!(),
    }
}

pub async fn wait_for_tiles(rx: &mut Events) -> Vec<PersonalTile> {
    match wait_for(rx, |e| matches!(e, RoomEvent::TileOffer { .. })).await {
        RoomEvent::TileOffer { tiles } => tiles,
        _ => unreachable!(),
    }
}

pub async fn wait_for_leaders(rx: &mut Events) -> (u32, Vec<LeaderCard>) {
    match wait_for(rx, |e| matches!(e, RoomEvent::LeaderOffer { .. })).await {
        RoomEvent::LeaderOffer { round, cards } => (round, cards),
        _ => unreachable!(),
    }
}

/// A seated participant and their event stream.
pub struct Seat {
    pub id: PlayerId,
    pub rx: Events,
}

/// Admits `names` into `room` and returns their seats in admission order.
pub async fn admit_all(
    rooms: &mut RoomManager<BasicRules>,
    room: magnifico_protocol::RoomId,
    names: &[&str],
) -> Vec<Seat> {
    let mut seats = Vec::new();
    for name in names {
        let (tx, rx) = link();
        rooms.admit(pid(name), room, tx).await.unwrap();
        seats.push(Seat { id: pid(name), rx });
    }
    seats
}

/// Reorders `seats` to match the turn order announced by the room.
pub async fn seat_in_turn_order(mut seats: Vec<Seat>) -> Vec<Seat> {
    let order = wait_for_order(&mut seats[0].rx).await;
    let mut ordered = Vec::with_capacity(seats.len());
    for id in &order {
        let index = seats.iter().position(|s| &s.id == id).unwrap();
        ordered.push(seats.remove(index));
    }
    ordered
}

/// Runs both drafts, every participant taking the first item offered.
pub async fn finish_drafts(rooms: &RoomManager<BasicRules>, seats: &mut [Seat], leader_rounds: usize) {
    for seat in seats.iter_mut().rev() {
        let tiles = wait_for_tiles(&mut seat.rx).await;
        rooms.choose_tile(seat.id.clone(), tiles[0].id).await.unwrap();
    }
    for _ in 0..leader_rounds {
        for seat in seats.iter_mut() {
            let (_, cards) = wait_for_leaders(&mut seat.rx).await;
            rooms
                .choose_leader(seat.id.clone(), cards[0].name.clone())
                .await
                .unwrap();
        }
    }
}
