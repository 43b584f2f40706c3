//! Draft pools: the pick-one-at-a-time tile draft and the rotating
//! leader draft.
//!
//! Both types only track pools and order. Offering, waiting and timeouts
//! belong to the room actor.

use std::collections::{BTreeMap, VecDeque};
use std::fmt::{Debug, Display};

use magnifico_model::{LeaderCard, PersonalTile};
use magnifico_protocol::PlayerId;
use rand::Rng;
use rand::seq::SliceRandom;

/// Something that can be drafted, identified by a key rather than by its
/// position in the pool. Keys must be unique within a pool; see
/// [`duplicate_key`].
pub trait DraftItem: Clone {
    type Key: Clone + PartialEq + Debug + Display;

    fn key(&self) -> Self::Key;
}

impl DraftItem for PersonalTile {
    type Key = u32;

    fn key(&self) -> u32 {
        self.id
    }
}

impl DraftItem for LeaderCard {
    type Key = String;

    fn key(&self) -> String {
        self.name.clone()
    }
}

/// The first key that appears more than once in `pool`.
pub fn duplicate_key<T: DraftItem>(pool: &[T]) -> Option<T::Key> {
    pool.iter().enumerate().find_map(|(i, item)| {
        let key = item.key();
        pool[..i].iter().any(|earlier| earlier.key() == key).then_some(key)
    })
}

/// Removes the first item matching `key` from `pool`.
fn take<T: DraftItem>(pool: &mut Vec<T>, key: &T::Key) -> Option<T> {
    let index = pool.iter().position(|item| &item.key() == key)?;
    Some(pool.remove(index))
}

// ---------------------------------------------------------------------------
// SequentialDraft
// ---------------------------------------------------------------------------

/// One pool, offered whole to one participant at a time.
///
/// Participants are served in reverse seating order, so the last seat
/// picks first.
#[derive(Debug, Clone)]
pub struct SequentialDraft<T> {
    pool: Vec<T>,
    queue: VecDeque<PlayerId>,
}

impl<T: DraftItem> SequentialDraft<T> {
    pub fn new(pool: Vec<T>, seating: &[PlayerId]) -> Self {
        Self {
            pool,
            queue: seating.iter().rev().cloned().collect(),
        }
    }

    /// The next participant to be offered the pool.
    pub fn next_picker(&mut self) -> Option<PlayerId> {
        self.queue.pop_front()
    }

    /// What is still on offer.
    pub fn pool(&self) -> &[T] {
        &self.pool
    }

    pub fn contains(&self, key: &T::Key) -> bool {
        self.pool.iter().any(|item| &item.key() == key)
    }

    /// Removes the item with `key` from the pool for good.
    pub fn claim(&mut self, key: &T::Key) -> Option<T> {
        take(&mut self.pool, key)
    }
}

// ---------------------------------------------------------------------------
// RotatingDraft
// ---------------------------------------------------------------------------

/// Simultaneous rounds over disjoint blocks, with a snake rotation of the
/// order after each round.
#[derive(Debug, Clone)]
pub struct RotatingDraft<T> {
    pool: Vec<T>,
    order: VecDeque<PlayerId>,
    rounds_left: usize,
}

impl<T: DraftItem> RotatingDraft<T> {
    /// Shuffles `pool` once and keeps exactly `order.len() × per_player`
    /// items. Surplus items are discarded before the first round.
    pub fn new(mut pool: Vec<T>, order: &[PlayerId], per_player: usize, rng: &mut impl Rng) -> Self {
        pool.shuffle(rng);
        pool.truncate(order.len() * per_player);
        Self {
            pool,
            order: order.iter().cloned().collect(),
            rounds_left: if order.is_empty() { 0 } else { per_player },
        }
    }

    /// The blocks for the coming round: block `i` goes to `order[i]`.
    pub fn offers(&self) -> Vec<(PlayerId, Vec<T>)> {
        let share = self.pool.len() / self.order.len().max(1);
        self.order
            .iter()
            .cloned()
            .zip(self.pool.chunks(share.max(1)).map(<[T]>::to_vec))
            .collect()
    }

    /// Removes every picked item, rotates the order and returns what each
    /// participant claimed.
    pub fn finish_round(&mut self, picks: &BTreeMap<PlayerId, T::Key>) -> Vec<(PlayerId, T)> {
        let mut claimed = Vec::with_capacity(picks.len());
        for player in &self.order {
            let Some(key) = picks.get(player) else {
                tracing::warn!(%player, "no pick recorded for draft round");
                continue;
            };
            match take(&mut self.pool, key) {
                Some(item) => claimed.push((player.clone(), item)),
                None => tracing::warn!(%player, ?key, "picked item no longer in pool"),
            }
        }
        self.order.rotate_left(1.min(self.order.len()));
        self.rounds_left = self.rounds_left.saturating_sub(1);
        claimed
    }

    pub fn order(&self) -> impl Iterator<Item = &PlayerId> {
        self.order.iter()
    }

    pub fn remaining(&self) -> &[T] {
        &self.pool
    }

    pub fn is_finished(&self) -> bool {
        self.rounds_left == 0
    }
}
