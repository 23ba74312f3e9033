//! 合法著手計算
//!
//! baseline 選手與 RL 環境的 action mask 共用同一套規則。
//! 這只是預測，伺服器仍是最終裁決者。

use super::board::{Board, ChipColour, Position};
use super::cards::{cards_match, Card};

/// 單一合法著手
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LegalMove {
    pub hand_index: usize,
    pub card: Card,
    pub position: Position,
}

/// 卡片在此盤面上已無任何未佔用的對應格
///
/// 萬用格與已有籌碼的格子不列入考慮。
pub fn is_dead_card(card: &Card, board: &Board) -> bool {
    !board
        .spaces()
        .iter()
        .filter(|space| space.is_open())
        .any(|space| cards_match(space.card.as_ref(), card))
}

/// 空的非萬用格
fn open_positions(board: &Board) -> Vec<Position> {
    board
        .addressable()
        .filter(|(_, space)| space.is_open())
        .map(|(pos, _)| pos)
        .collect()
}

/// 可被單眼 J 移除的籌碼：非自己隊伍、未組成 sequence
fn removable_positions(board: &Board, team: Option<ChipColour>) -> Vec<Position> {
    board
        .addressable()
        .filter(|(_, space)| !space.is_wildcard() && !space.is_part_of_sequence())
        .filter(|(_, space)| match (space.colour, team) {
            (None, _) => false,
            (Some(colour), Some(team)) => colour != team,
            (Some(_), None) => true,
        })
        .map(|(pos, _)| pos)
        .collect()
}

/// 單張卡的合法目標格（依序套用規則，先符合者勝）
///
/// 1. 單眼 J → 對手未鎖定籌碼
/// 2. 雙眼 J → 任一空格
/// 3. 一般牌 → 印刷卡相符的空格
/// 4. 死牌（相符格全被佔用或不存在）→ 任一空格換牌；
///    `allow_dead_discard` 為 false（本回合已換過）時無目標
pub fn legal_targets(
    card: &Card,
    board: &Board,
    team: Option<ChipColour>,
    allow_dead_discard: bool,
) -> Vec<Position> {
    if card.is_one_eyed_jack() {
        return removable_positions(board, team);
    }
    if card.is_two_eyed_jack() {
        return open_positions(board);
    }

    let matched: Vec<Position> = board
        .addressable()
        .filter(|(_, space)| space.is_open() && cards_match(space.card.as_ref(), card))
        .map(|(pos, _)| pos)
        .collect();
    if !matched.is_empty() {
        return matched;
    }

    if allow_dead_discard && is_dead_card(card, board) {
        open_positions(board)
    } else {
        Vec::new()
    }
}

/// 整手牌的合法著手（各牌目標的聯集）
pub fn legal_moves(
    hand: &[Card],
    board: &Board,
    team: Option<ChipColour>,
    allow_dead_discard: bool,
) -> Vec<LegalMove> {
    hand.iter()
        .enumerate()
        .flat_map(|(hand_index, card)| {
            legal_targets(card, board, team, allow_dead_discard)
                .into_iter()
                .map(move |position| LegalMove {
                    hand_index,
                    card: card.clone(),
                    position,
                })
        })
        .collect()
}

// ============================================================================
// 單元測試
// ============================================================================

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::game::board::BoardSpace;
    use crate::game::cards::Suit;
    use proptest::prelude::*;

    /// 10x10 空盤，四角為萬用格；其餘格依序循環 48 張非 J 牌兩次
    pub(crate) fn standard_board() -> Board {
        let mut deck = Vec::new();
        for &suit in Suit::all() {
            for value in 1..=13u8 {
                if value != 11 {
                    deck.push(Card::new(value, suit));
                }
            }
        }
        let mut spaces = Vec::new();
        let mut next = 0;
        for row in 0..10 {
            for col in 0..10 {
                let corner = (row == 0 || row == 9) && (col == 0 || col == 9);
                let card = if corner {
                    None
                } else {
                    let card = deck[next % deck.len()].clone();
                    next += 1;
                    Some(card)
                };
                spaces.push(BoardSpace::new(row, col, card));
            }
        }
        Board::from_spaces(spaces)
    }

    /// 單一印刷位置的盤面：(1,1) 印 7♥，其餘為 2♣
    fn single_twin_board() -> Board {
        let mut spaces = Vec::new();
        for row in 0..10 {
            for col in 0..10 {
                let corner = (row == 0 || row == 9) && (col == 0 || col == 9);
                let card = if corner {
                    None
                } else if (row, col) == (1, 1) {
                    Some(Card::new(7, Suit::Hearts))
                } else {
                    Some(Card::new(2, Suit::Clubs))
                };
                spaces.push(BoardSpace::new(row, col, card));
            }
        }
        Board::from_spaces(spaces)
    }

    fn set_chip(board: &mut Board, pos: Position, colour: ChipColour) {
        for space in board.spaces.as_mut().unwrap() {
            if space.position() == Some(pos) {
                space.colour = Some(colour);
            }
        }
    }

    #[test]
    fn test_two_eyed_jack_targets_every_open_space() {
        let board = standard_board();
        let jack = Card::new(11, Suit::Hearts);
        let targets = legal_targets(&jack, &board, Some(ChipColour::Red), true);
        assert_eq!(targets.len(), 96);
    }

    #[test]
    fn test_ordinary_card_single_twin() {
        let mut board = single_twin_board();
        let seven = Card::new(7, Suit::Hearts);
        assert_eq!(
            legal_targets(&seven, &board, Some(ChipColour::Red), true),
            vec![Position::new(1, 1)]
        );

        // 唯一的對應格被佔用：成為死牌，可換到任一空格（96 - 1）
        set_chip(&mut board, Position::new(1, 1), ChipColour::Blue);
        assert!(is_dead_card(&seven, &board));
        let targets = legal_targets(&seven, &board, Some(ChipColour::Red), true);
        assert_eq!(targets.len(), 95);
        assert!(!targets.contains(&Position::new(1, 1)));
    }

    #[test]
    fn test_dead_card_without_discard_has_no_targets() {
        let mut board = single_twin_board();
        set_chip(&mut board, Position::new(1, 1), ChipColour::Blue);
        let seven = Card::new(7, Suit::Hearts);
        assert!(legal_targets(&seven, &board, Some(ChipColour::Red), false).is_empty());

        // 只影響死牌；J 與有空位的牌不變
        let hand = vec![seven, Card::new(2, Suit::Clubs), Card::new(11, Suit::Hearts)];
        let moves = legal_moves(&hand, &board, Some(ChipColour::Red), false);
        assert!(moves.iter().all(|m| m.hand_index != 0));
        assert_eq!(moves.iter().filter(|m| m.hand_index == 1).count(), 95);
        assert_eq!(moves.iter().filter(|m| m.hand_index == 2).count(), 95);
    }

    #[test]
    fn test_dead_card_targets_every_open_space() {
        let board = single_twin_board();
        // 盤面上沒有任何 K♦
        let king = Card::new(13, Suit::Diamonds);
        assert!(is_dead_card(&king, &board));
        assert_eq!(legal_targets(&king, &board, Some(ChipColour::Red), true).len(), 96);
    }

    #[test]
    fn test_one_eyed_jack_targets_unlocked_opponent_chips() {
        let mut board = standard_board();
        let jack = Card::new(11, Suit::Spades);
        assert!(legal_targets(&jack, &board, Some(ChipColour::Red), true).is_empty());

        set_chip(&mut board, Position::new(2, 2), ChipColour::Blue);
        set_chip(&mut board, Position::new(3, 3), ChipColour::Red);
        set_chip(&mut board, Position::new(4, 4), ChipColour::Blue);
        for space in board.spaces.as_mut().unwrap() {
            if space.position() == Some(Position::new(4, 4)) {
                space.part_of_sequence = Some(true);
            }
        }

        let targets = legal_targets(&jack, &board, Some(ChipColour::Red), true);
        assert_eq!(targets, vec![Position::new(2, 2)]);

        // 不知道隊伍時，所有未鎖定籌碼都是候選
        let targets = legal_targets(&jack, &board, None, true);
        assert_eq!(targets, vec![Position::new(2, 2), Position::new(3, 3)]);
    }

    #[test]
    fn test_spaces_without_coordinates_excluded() {
        let mut board = standard_board();
        board.spaces.as_mut().unwrap()[1].row = None;
        let targets = legal_targets(&Card::new(11, Suit::Diamonds), &board, None, true);
        assert_eq!(targets.len(), 95);
    }

    #[test]
    fn test_legal_moves_union_over_hand() {
        let board = single_twin_board();
        let hand = vec![
            Card::new(7, Suit::Hearts),
            Card::new(11, Suit::Spades), // 沒有可移除的籌碼
        ];
        let moves = legal_moves(&hand, &board, Some(ChipColour::Red), true);
        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0].hand_index, 0);
        assert_eq!(moves[0].position, Position::new(1, 1));
        assert!(legal_moves(&[], &board, None, true).is_empty());
    }

    proptest! {
        /// 任意籌碼配置下，萬用格都不會出現在一般牌或雙眼 J 的目標中
        #[test]
        fn prop_wildcards_never_targeted(chips in proptest::collection::vec(0u8..4, 100), value in 1u8..=13, suit in 0usize..4) {
            let mut board = standard_board();
            for (space, chip) in board.spaces.as_mut().unwrap().iter_mut().zip(chips) {
                if space.is_wildcard() {
                    continue;
                }
                space.colour = match chip {
                    1 => Some(ChipColour::Red),
                    2 => Some(ChipColour::Blue),
                    _ => None,
                };
            }
            let card = Card::new(value, Suit::all()[suit]);
            for pos in legal_targets(&card, &board, Some(ChipColour::Red), true) {
                let space = board.space_at(pos).unwrap();
                prop_assert!(!space.is_wildcard());
                if !card.is_one_eyed_jack() {
                    prop_assert!(!space.has_chip());
                }
            }
        }

        /// 死牌的目標等於整個空格集合
        #[test]
        fn prop_dead_card_targets_all_open(filled in proptest::collection::vec(any::<bool>(), 100), value in 1u8..=13, suit in 0usize..4) {
            let mut board = standard_board();
            for (space, fill) in board.spaces.as_mut().unwrap().iter_mut().zip(filled) {
                if fill && !space.is_wildcard() {
                    space.colour = Some(ChipColour::Blue);
                }
            }
            let card = Card::new(value, Suit::all()[suit]);
            prop_assume!(!card.is_one_eyed_jack() && !card.is_two_eyed_jack());
            let open = open_positions(&board);
            let targets = legal_targets(&card, &board, Some(ChipColour::Red), true);
            if is_dead_card(&card, &board) {
                prop_assert_eq!(targets, open);
                prop_assert!(legal_targets(&card, &board, Some(ChipColour::Red), false).is_empty());
            } else {
                prop_assert!(targets.len() <= 2);
            }
        }
    }
}
