//! RNG module - 7-bag piece generation
//!
//! Each bag holds one of each identity, shuffled uniformly. Pieces are dealt
//! from the bag into a visible lookahead queue of [`NEXT_QUEUE_SIZE`]
//! entries; whenever the bag runs dry a fresh one is shuffled. The queue is
//! refilled before [`BagQueue::dequeue_next`] returns, so it is always full.
//!
//! With an explicit seed the sequence is reproducible (also across
//! [`BagQueue::reset`]); without one every reset reseeds from OS entropy.

use arrayvec::ArrayVec;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::types::{PieceKind, NEXT_QUEUE_SIZE};

/// 7-bag piece generator with a lookahead queue
#[derive(Debug, Clone)]
pub struct BagQueue {
    /// Remaining pieces of the current bag (dealt from the front)
    bag: ArrayVec<PieceKind, 7>,
    /// Visible upcoming pieces
    queue: ArrayVec<PieceKind, NEXT_QUEUE_SIZE>,
    rng: StdRng,
    seed: Option<u64>,
}

impl BagQueue {
    /// Create a queue; `None` seeds from entropy
    pub fn new(seed: Option<u64>) -> Self {
        let mut queue = Self {
            bag: ArrayVec::new(),
            queue: ArrayVec::new(),
            rng: Self::make_rng(seed),
            seed,
        };
        queue.refill_bag();
        queue.fill_queue();
        queue
    }

    fn make_rng(seed: Option<u64>) -> StdRng {
        match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    /// Generate a new shuffled bag
    fn refill_bag(&mut self) {
        self.bag.clear();
        self.bag.extend(PieceKind::ALL);
        self.bag.shuffle(&mut self.rng);
    }

    /// Drain the bag into the queue until it holds `NEXT_QUEUE_SIZE` pieces
    fn fill_queue(&mut self) {
        while !self.queue.is_full() {
            if self.bag.is_empty() {
                self.refill_bag();
            }
            let piece = self.bag.remove(0);
            self.queue.push(piece);
        }
    }

    /// The next `n` pieces without consuming them (at most the queue size)
    pub fn peek(&self, n: usize) -> &[PieceKind] {
        &self.queue[..n.min(self.queue.len())]
    }

    /// Remove and return the front piece, refilling the queue
    pub fn dequeue_next(&mut self) -> PieceKind {
        let piece = self.queue.remove(0);
        self.fill_queue();
        piece
    }

    /// Discard everything and start again from one fresh bag
    pub fn reset(&mut self) {
        self.rng = Self::make_rng(self.seed);
        self.queue.clear();
        self.refill_bag();
        self.fill_queue();
    }

    /// Fixed-size copy of the lookahead queue
    pub fn next_queue(&self) -> [PieceKind; NEXT_QUEUE_SIZE] {
        let mut out = [PieceKind::I; NEXT_QUEUE_SIZE];
        out.copy_from_slice(&self.queue);
        out
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Pieces left in the hidden bag (for testing/debugging)
    #[cfg(test)]
    pub fn bag_remaining(&self) -> usize {
        self.bag.len()
    }
}

impl Default for BagQueue {
    fn default() -> Self {
        Self::new(None)
    }
}
