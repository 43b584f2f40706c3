//! A complete match played in-process by bots.
//!
//! ```text
//! RUST_LOG=info cargo run -p bot-match [config.json]
//! ```
//!
//! Every bot logs in, joins the same room, takes the first tile and leader
//! card it is offered, and on its turn sends one family member to the
//! council before ending the turn.

use std::sync::Arc;

use magnifico::prelude::*;
use serde_json::json;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

/// Bookkeeping rules plus one coin for every council placement.
struct CouncilRules;

impl RuleEngine for CouncilRules {
    fn validate_move(game: &Game, player: &PlayerId, mv: &Move) -> Result<(), String> {
        BasicRules::validate_move(game, player, mv)
    }

    fn apply_move(game: &mut Game, player: &PlayerId, mv: &Move) {
        BasicRules::apply_move(game, player, mv);
        if let Move::PlaceFamilyMember {
            area: ActionArea::Council,
            ..
        } = mv
        {
            if let Some(board) = game.board_of_mut(player) {
                board.resources.increase(ResourceKind::Coin, 1);
            }
        }
    }
}

type Server = GameServer<CouncilRules, UsernameAuthenticator>;

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

fn demo_catalog() -> Result<Catalog, MagnificoError> {
    let mut cards = Vec::new();
    for (c, color) in ["Green", "Blue", "Yellow", "Purple"].iter().enumerate() {
        for round in 1..=3 {
            for n in 0..8 {
                let id = c * 100 + round * 10 + n;
                cards.push(json!({
                    "id": id,
                    "name": format!("{} {id}", color.to_lowercase()),
                    "round": round,
                    "color": color,
                }));
            }
        }
    }
    let leaders: Vec<_> = (1..=16).map(|i| json!({ "name": format!("leader {i}") })).collect();
    let tiles: Vec<_> = (1..=4)
        .map(|id| json!({ "id": id, "harvest_bonus": { "coins": 1 } }))
        .collect();

    let catalog = json!({
        "development_cards": cards,
        "leader_cards": leaders,
        "personal_tiles": tiles,
    });
    Ok(Catalog::from_json(&catalog.to_string())?)
}

// ---------------------------------------------------------------------------
// Bots
// ---------------------------------------------------------------------------

async fn bot(server: Arc<Server>, name: &'static str, capacity: usize) -> Result<(), MagnificoError> {
    let login = server.login(name).await?;
    let me = login.player_id;
    let (link, mut events) = mpsc::unbounded_channel();
    let room = server.join(&me, Some(capacity), link).await?;
    tracing::info!(bot = name, %room, "seated");

    let mut members = FamilyMemberColor::ALL.into_iter().cycle();
    while let Some(event) = events.recv().await {
        match event {
            RoomEvent::TileOffer { tiles } => {
                if let Some(tile) = tiles.first() {
                    server.choose_tile(&me, tile.id).await?;
                }
            }
            RoomEvent::LeaderOffer { cards, .. } => {
                if let Some(card) = cards.first() {
                    server.choose_leader(&me, card.name.clone()).await?;
                }
            }
            RoomEvent::TurnStarted { turn, player, .. } if player == me => {
                let member = members.next().unwrap_or(FamilyMemberColor::Neutral);
                let mv = Move::PlaceFamilyMember {
                    member,
                    servants: 0,
                    area: ActionArea::Council,
                };
                server.submit_move(&me, mv).await?;
                server.end_turn(&me, turn).await?;
            }
            RoomEvent::GameInfo { game } => {
                if let Some(board) = game.board_of(&me) {
                    tracing::info!(
                        bot = name,
                        round = game.round,
                        sub_round = game.sub_round,
                        coins = board.resources.coins,
                        leaders = board.leader_cards.len(),
                        "sub-round dealt"
                    );
                }
            }
            RoomEvent::Rejected { reason } => tracing::warn!(bot = name, %reason, "decision rejected"),
            RoomEvent::SessionComplete => {
                tracing::info!(bot = name, "match finished");
                break;
            }
            RoomEvent::SessionAborted { reason } => {
                tracing::error!(bot = name, %reason, "match aborted");
                break;
            }
            _ => {}
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => ServerConfig::from_json(&std::fs::read_to_string(path)?)?,
        None => ServerConfig {
            game: GameSettings {
                pre_start_wait_ms: 1_000,
                move_wait_ms: 2_000,
                draft_wait_ms: Some(2_000),
                ..GameSettings::default()
            },
            ..ServerConfig::default()
        },
    };

    let server: Arc<Server> = Arc::new(
        GameServerBuilder::new()
            .config(config)
            .catalog(demo_catalog()?)
            .build(UsernameAuthenticator::default()),
    );

    let names = ["lorenzo", "cosimo", "giuliano"];
    let mut tasks = Vec::new();
    for name in names {
        tasks.push(tokio::spawn(bot(Arc::clone(&server), name, names.len())));
    }
    for task in tasks {
        task.await??;
    }
    Ok(())
}
