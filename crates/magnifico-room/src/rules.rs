//! The `RuleEngine` trait: the seam between orchestration and game rules.
//!
//! The room decides *who* may act and *when*. What a move does to the
//! game is up to the engine.

use magnifico_model::{BOARD_COLUMNS, Game, ResourceKind};
use magnifico_protocol::{ActionArea, Move, PlayerId};

/// Game rules plugged into a room.
///
/// All methods are associated functions; engines carry no state of their
/// own beyond the [`Game`] they are handed.
pub trait RuleEngine: Send + Sync + 'static {
    /// Checks `mv` from the current turn-holder before it is applied.
    ///
    /// An `Err` is sent back to the player as the rejection reason.
    fn validate_move(game: &Game, player: &PlayerId, mv: &Move) -> Result<(), String>;

    /// Applies a validated move.
    fn apply_move(game: &mut Game, player: &PlayerId, mv: &Move);

    /// Called after the board is dealt and the dice rolled for a new
    /// sub-round. Default: no-op.
    fn on_sub_round_start(_game: &mut Game) {}

    /// Called when `player` receives the turn. Default: no-op.
    fn on_turn_start(_game: &mut Game, _player: &PlayerId) {}
}

/// Bookkeeping-only rules.
///
/// Each family member may be placed once per sub-round, servants spent
/// must be owned, and leader indices must exist. Card effects and
/// resource exchanges are not modelled.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicRules;

impl RuleEngine for BasicRules {
    fn validate_move(game: &Game, player: &PlayerId, mv: &Move) -> Result<(), String> {
        let board = game
            .board_of(player)
            .ok_or_else(|| format!("{player} has no personal board"))?;

        match mv {
            Move::PlaceFamilyMember {
                member,
                servants,
                area,
            } => {
                if board.has_used(*member) {
                    return Err(format!("{member} family member already placed"));
                }
                if *servants > board.resources.servants {
                    return Err(format!(
                        "not enough servants: have {}, need {servants}",
                        board.resources.servants
                    ));
                }
                if let ActionArea::Tower { tower, floor } = area {
                    if *tower >= BOARD_COLUMNS {
                        return Err(format!("no tower {tower}"));
                    }
                    let cards = game.board.column(*tower).map_or(0, <[_]>::len);
                    if *floor >= cards {
                        return Err(format!("tower {tower} has no floor {floor}"));
                    }
                }
                Ok(())
            }
            Move::ActivateLeader { index, servants } => {
                if *index >= board.leader_cards.len() {
                    return Err(format!("no leader card {index}"));
                }
                if *servants > board.resources.servants {
                    return Err("not enough servants".to_string());
                }
                Ok(())
            }
            Move::DiscardLeader { index } => {
                if *index >= board.leader_cards.len() {
                    return Err(format!("no leader card {index}"));
                }
                Ok(())
            }
        }
    }

    fn apply_move(game: &mut Game, player: &PlayerId, mv: &Move) {
        let Some(board) = game.board_of_mut(player) else {
            return;
        };
        match mv {
            Move::PlaceFamilyMember {
                member, servants, ..
            } => {
                board.resources.decrease(ResourceKind::Servant, *servants);
                board.members_used.push(*member);
            }
            Move::ActivateLeader { index, servants } => {
                board.resources.decrease(ResourceKind::Servant, *servants);
                if *index < board.leader_cards.len() {
                    let leader = board.leader_cards.remove(*index);
                    board.active_leaders.push(leader);
                }
            }
            Move::DiscardLeader { index } => {
                if *index < board.leader_cards.len() {
                    board.leader_cards.remove(*index);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use magnifico_model::{CardColor, DevelopmentCard, LeaderCard, PersonalBoard, PlayerColor, Resources};
    use magnifico_protocol::FamilyMemberColor;

    use super::*;

    fn game_with(player: &PlayerId) -> Game {
        let mut game = Game::default();
        let mut board = PersonalBoard::new(PlayerColor::Green, Resources::starting_bundle());
        board.leader_cards.push(LeaderCard {
            name: "Pico della Mirandola".into(),
            requirement: Default::default(),
        });
        game.boards.insert(player.clone(), board);
        game.board
            .set_column(
                0,
                vec![DevelopmentCard {
                    id: 1,
                    name: "Forest".into(),
                    round: 1,
                    color: CardColor::Green,
                    cost: Default::default(),
                }],
            )
            .unwrap();
        game
    }

    fn place(member: FamilyMemberColor, servants: u32, area: ActionArea) -> Move {
        Move::PlaceFamilyMember {
            member,
            servants,
            area,
        }
    }

    #[test]
    fn test_member_cannot_be_placed_twice() {
        let player = PlayerId::from("a");
        let mut game = game_with(&player);
        let mv = place(FamilyMemberColor::Black, 1, ActionArea::Council);

        assert!(BasicRules::validate_move(&game, &player, &mv).is_ok());
        BasicRules::apply_move(&mut game, &player, &mv);

        assert_eq!(game.board_of(&player).unwrap().resources.servants, 2);
        assert!(BasicRules::validate_move(&game, &player, &mv).is_err());
        let other = place(FamilyMemberColor::White, 0, ActionArea::Council);
        assert!(BasicRules::validate_move(&game, &player, &other).is_ok());
    }

    #[test]
    fn test_servants_must_be_owned() {
        let player = PlayerId::from("a");
        let game = game_with(&player);
        let mv = place(FamilyMemberColor::Orange, 4, ActionArea::Market { slot: 0 });

        let err = BasicRules::validate_move(&game, &player, &mv).unwrap_err();
        assert!(err.contains("servants"));
    }

    #[test]
    fn test_tower_floor_must_hold_a_card() {
        let player = PlayerId::from("a");
        let game = game_with(&player);

        let ok = place(FamilyMemberColor::Neutral, 0, ActionArea::Tower { tower: 0, floor: 0 });
        let empty = place(FamilyMemberColor::Neutral, 0, ActionArea::Tower { tower: 1, floor: 0 });
        let missing = place(FamilyMemberColor::Neutral, 0, ActionArea::Tower { tower: 7, floor: 0 });

        assert!(BasicRules::validate_move(&game, &player, &ok).is_ok());
        assert!(BasicRules::validate_move(&game, &player, &empty).is_err());
        assert!(BasicRules::validate_move(&game, &player, &missing).is_err());
    }

    #[test]
    fn test_activate_leader_moves_card() {
        let player = PlayerId::from("a");
        let mut game = game_with(&player);
        let mv = Move::ActivateLeader { index: 0, servants: 0 };

        BasicRules::apply_move(&mut game, &player, &mv);

        let board = game.board_of(&player).unwrap();
        assert!(board.leader_cards.is_empty());
        assert_eq!(board.active_leaders.len(), 1);
        assert!(BasicRules::validate_move(&game, &player, &mv).is_err());
    }

    #[test]
    fn test_unknown_player_rejected() {
        let game = game_with(&PlayerId::from("a"));
        let mv = Move::DiscardLeader { index: 0 };
        assert!(BasicRules::validate_move(&game, &PlayerId::from("b"), &mv).is_err());
    }
}
