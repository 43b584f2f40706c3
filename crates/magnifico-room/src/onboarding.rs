//! Seating: turn order, colors, starting resources and dice.

use std::collections::BTreeMap;

use magnifico_model::{Dice, Game, PersonalBoard, PlayerColor, ResourceKind, Resources};
use magnifico_protocol::PlayerId;
use rand::Rng;
use rand::seq::SliceRandom;

use crate::SetupError;

/// Seats `players` and builds the initial game snapshot.
///
/// The order is shuffled once. The player at seat `i` gets
/// `PlayerColor::ALL[i]`, the `starting` bundle and `i` extra coins.
/// Dice are rolled and every family is initialized from them.
pub fn onboard(
    players: &[PlayerId],
    starting: Resources,
    rng: &mut impl Rng,
) -> Result<Game, SetupError> {
    if players.len() > PlayerColor::ALL.len() {
        return Err(SetupError::TooManyPlayers {
            players: players.len(),
            colors: PlayerColor::ALL.len(),
        });
    }

    let mut order = players.to_vec();
    order.shuffle(rng);
    let dice = Dice::roll(rng);

    let mut boards = BTreeMap::new();
    for (seat, (player, color)) in order.iter().zip(PlayerColor::ALL).enumerate() {
        let mut resources = starting;
        resources.increase(ResourceKind::Coin, seat as u32);
        let mut board = PersonalBoard::new(color, resources);
        board.refresh_family(&dice);
        tracing::debug!(%player, seat, %color, coins = resources.coins, "player seated");
        boards.insert(player.clone(), board);
    }

    Ok(Game {
        dice,
        order,
        boards,
        ..Game::default()
    })
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use magnifico_protocol::FamilyMemberColor;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn players(n: usize) -> Vec<PlayerId> {
        (0..n).map(|i| PlayerId::new(format!("p{i}"))).collect()
    }

    #[test]
    fn test_order_is_a_permutation() {
        let input = players(4);
        let game = onboard(&input, Resources::starting_bundle(), &mut StdRng::seed_from_u64(1)).unwrap();

        let seated: BTreeSet<_> = game.order.iter().cloned().collect();
        assert_eq!(seated, input.into_iter().collect());
        assert_eq!(game.boards.len(), 4);
    }

    #[test]
    fn test_later_seats_get_more_coins() {
        let game = onboard(&players(4), Resources::starting_bundle(), &mut StdRng::seed_from_u64(2)).unwrap();

        for (seat, player) in game.order.iter().enumerate() {
            let board = game.board_of(player).unwrap();
            assert_eq!(board.resources.coins, 5 + seat as u32);
            assert_eq!(board.resources.wood, 2);
            assert_eq!(board.resources.stone, 2);
            assert_eq!(board.resources.servants, 3);
        }
    }

    #[test]
    fn test_colors_are_distinct_and_follow_seats() {
        let game = onboard(&players(3), Resources::default(), &mut StdRng::seed_from_u64(3)).unwrap();

        for (seat, player) in game.order.iter().enumerate() {
            assert_eq!(game.board_of(player).unwrap().color, PlayerColor::ALL[seat]);
        }
    }

    #[test]
    fn test_families_follow_rolled_dice() {
        let game = onboard(&players(2), Resources::default(), &mut StdRng::seed_from_u64(4)).unwrap();

        for board in game.boards.values() {
            assert_eq!(board.family.value(FamilyMemberColor::White), game.dice.white);
            assert_eq!(board.family.value(FamilyMemberColor::Neutral), 0);
        }
    }

    #[test]
    fn test_too_many_players_rejected() {
        let result = onboard(&players(5), Resources::default(), &mut StdRng::seed_from_u64(5));
        assert!(matches!(
            result,
            Err(SetupError::TooManyPlayers { players: 5, colors: 4 })
        ));
    }
}
