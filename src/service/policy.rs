//! Baseline 選手的出手策略

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::game::LegalMove;

/// 從合法著手中挑一手；沒有著手時回傳 `None`
pub trait MovePolicy {
    fn choose(&mut self, moves: &[LegalMove]) -> Option<LegalMove>;
}

/// 均勻隨機選擇（card, space）組合
pub struct RandomMovePolicy {
    rng: StdRng,
}

impl RandomMovePolicy {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_rng(rng: StdRng) -> Self {
        Self { rng }
    }

    /// 重新設定種子（每局重現用）
    pub fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }
}

impl MovePolicy for RandomMovePolicy {
    fn choose(&mut self, moves: &[LegalMove]) -> Option<LegalMove> {
        moves.choose(&mut self.rng).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Card, Position, Suit};

    fn moves(n: usize) -> Vec<LegalMove> {
        (0..n)
            .map(|i| LegalMove {
                hand_index: i % 7,
                card: Card::new(2, Suit::Hearts),
                position: Position::new(i / 10, i % 10),
            })
            .collect()
    }

    #[test]
    fn test_empty_moves_yield_none() {
        let mut policy = RandomMovePolicy::new(0);
        assert_eq!(policy.choose(&[]), None);
    }

    #[test]
    fn test_same_seed_same_choices() {
        let candidates = moves(40);
        let mut a = RandomMovePolicy::new(42);
        let mut b = RandomMovePolicy::new(42);
        for _ in 0..20 {
            assert_eq!(a.choose(&candidates), b.choose(&candidates));
        }
    }

    #[test]
    fn test_reseed_restarts_sequence() {
        let candidates = moves(40);
        let mut policy = RandomMovePolicy::new(7);
        let first: Vec<_> = (0..5).map(|_| policy.choose(&candidates)).collect();
        policy.reseed(7);
        let second: Vec<_> = (0..5).map(|_| policy.choose(&candidates)).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_choices_cover_candidates() {
        let candidates = moves(4);
        let mut policy = RandomMovePolicy::new(3);
        let mut seen = [false; 4];
        for _ in 0..200 {
            let chosen = policy.choose(&candidates).unwrap();
            let idx = candidates.iter().position(|m| *m == chosen).unwrap();
            seen[idx] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }
}
