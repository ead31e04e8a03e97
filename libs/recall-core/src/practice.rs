//! Flip-through practice session state machine.

use serde::Serialize;

use crate::types::CardContent;

/// Where a practice session currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum PracticeState {
    /// Not practicing; the card list is merely being viewed.
    Browsing,
    /// Stepping through the cards one at a time.
    Practicing { index: usize, is_flipped: bool },
}

/// A flip-through review session over a snapshot of a set's cards.
///
/// The snapshot is taken once at construction; the order of cards does not
/// change for the lifetime of the session. All transitions are no-ops in
/// states that do not define them, so the machine can be driven safely from
/// arbitrary UI event sequences.
#[derive(Debug, Clone)]
pub struct PracticeSession {
    cards: Vec<CardContent>,
    state: PracticeState,
}

impl PracticeSession {
    /// Create a session in the `Browsing` state.
    pub fn new(cards: Vec<CardContent>) -> Self {
        Self {
            cards,
            state: PracticeState::Browsing,
        }
    }

    pub fn state(&self) -> PracticeState {
        self.state
    }

    pub fn cards(&self) -> &[CardContent] {
        &self.cards
    }

    /// The card currently shown, if practicing over a non-empty snapshot.
    pub fn current_card(&self) -> Option<&CardContent> {
        match self.state {
            PracticeState::Browsing => None,
            PracticeState::Practicing { index, .. } => self.cards.get(index),
        }
    }

    /// Enter (or re-enter) practice at the first card, term side up.
    pub fn start(&mut self) {
        self.state = PracticeState::Practicing {
            index: 0,
            is_flipped: false,
        };
    }

    /// Toggle between the term and definition sides of the current card.
    pub fn flip(&mut self) {
        if let PracticeState::Practicing { is_flipped, .. } = &mut self.state {
            *is_flipped = !*is_flipped;
        }
    }

    /// Advance to the next card. Clamps at the last card; a successful move
    /// always lands term side up.
    pub fn next(&mut self) {
        if let PracticeState::Practicing { index, is_flipped } = &mut self.state {
            if *index + 1 < self.cards.len() {
                *index += 1;
                *is_flipped = false;
            }
        }
    }

    /// Step back to the previous card. Clamps at the first card; a successful
    /// move always lands term side up.
    pub fn previous(&mut self) {
        if let PracticeState::Practicing { index, is_flipped } = &mut self.state {
            if *index > 0 {
                *index -= 1;
                *is_flipped = false;
            }
        }
    }

    /// Leave practice from any position.
    pub fn end(&mut self) {
        self.state = PracticeState::Browsing;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_cards() -> Vec<CardContent> {
        vec![
            CardContent::new("uno", "one"),
            CardContent::new("dos", "two"),
            CardContent::new("tres", "three"),
        ]
    }

    #[test]
    fn test_starts_browsing() {
        let session = PracticeSession::new(three_cards());
        assert_eq!(session.state(), PracticeState::Browsing);
        assert!(session.current_card().is_none());
    }

    #[test]
    fn test_start_resets_position() {
        let mut session = PracticeSession::new(three_cards());
        session.start();
        session.next();
        session.flip();

        session.start();
        assert_eq!(
            session.state(),
            PracticeState::Practicing {
                index: 0,
                is_flipped: false
            }
        );
    }

    #[test]
    fn test_flip_toggles_in_place() {
        let mut session = PracticeSession::new(three_cards());
        session.start();

        session.flip();
        assert_eq!(
            session.state(),
            PracticeState::Practicing {
                index: 0,
                is_flipped: true
            }
        );

        session.flip();
        assert_eq!(
            session.state(),
            PracticeState::Practicing {
                index: 0,
                is_flipped: false
            }
        );
    }

    #[test]
    fn test_next_clamps_at_end() {
        let mut session = PracticeSession::new(three_cards());
        session.start();

        for _ in 0..5 {
            session.next();
            if let PracticeState::Practicing { is_flipped, .. } = session.state() {
                assert!(!is_flipped);
            } else {
                panic!("left practice during next");
            }
        }

        assert_eq!(
            session.state(),
            PracticeState::Practicing {
                index: 2,
                is_flipped: false
            }
        );
        assert_eq!(session.current_card().unwrap().term, "tres");
    }

    #[test]
    fn test_previous_clamps_at_start() {
        let mut session = PracticeSession::new(three_cards());
        session.start();

        session.previous();
        assert_eq!(
            session.state(),
            PracticeState::Practicing {
                index: 0,
                is_flipped: false
            }
        );
    }

    #[test]
    fn test_moves_reset_flip() {
        let mut session = PracticeSession::new(three_cards());
        session.start();

        session.flip();
        session.next();
        assert_eq!(
            session.state(),
            PracticeState::Practicing {
                index: 1,
                is_flipped: false
            }
        );

        session.flip();
        session.previous();
        assert_eq!(
            session.state(),
            PracticeState::Practicing {
                index: 0,
                is_flipped: false
            }
        );
    }

    #[test]
    fn test_clamped_move_keeps_flip() {
        let mut session = PracticeSession::new(three_cards());
        session.start();
        session.previous();

        session.flip();
        session.previous();
        assert_eq!(
            session.state(),
            PracticeState::Practicing {
                index: 0,
                is_flipped: true
            }
        );
    }

    #[test]
    fn test_end_returns_to_browsing_from_any_index() {
        let mut session = PracticeSession::new(three_cards());
        session.start();
        session.next();
        session.next();

        session.end();
        assert_eq!(session.state(), PracticeState::Browsing);
    }

    #[test]
    fn test_reenterable_after_end() {
        let mut session = PracticeSession::new(three_cards());
        session.start();
        session.end();
        session.start();
        assert_eq!(
            session.state(),
            PracticeState::Practicing {
                index: 0,
                is_flipped: false
            }
        );
    }

    #[test]
    fn test_transitions_noop_while_browsing() {
        let mut session = PracticeSession::new(three_cards());
        session.flip();
        session.next();
        session.previous();
        session.end();
        assert_eq!(session.state(), PracticeState::Browsing);
    }

    #[test]
    fn test_empty_snapshot() {
        let mut session = PracticeSession::new(Vec::new());
        session.start();
        assert!(session.current_card().is_none());

        session.next();
        session.previous();
        assert_eq!(
            session.state(),
            PracticeState::Practicing {
                index: 0,
                is_flipped: false
            }
        );
    }
}
