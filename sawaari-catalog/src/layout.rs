use crate::inventory::Deck;

/// Default reason recorded on positions the layout declares blocked
/// (seats beside mechanical areas, staircases, and so on).
pub const LAYOUT_BLOCK_REASON: &str = "Initial layout blocked";

/// One physical seat position in the fixed coach layout.
#[derive(Debug, Clone)]
pub struct SeatPosition {
    /// Stable identifier: deck initial, column letter, row number
    /// ("U-A1", "L-C2").
    pub seat_id: String,
    pub deck: Deck,
    pub row: i32,
    pub column: String,
    pub pre_blocked: bool,
}

/// The fixed two-deck coach layout every slot is seeded from.
#[derive(Debug, Clone)]
pub struct SeatLayout {
    positions: Vec<SeatPosition>,
}

// Positions unavailable for sale from day one, per deck.
const UPPER_PRE_BLOCKED: &[&str] = &["U-A2", "U-B4", "U-C4", "U-A5"];
const LOWER_PRE_BLOCKED: &[&str] = &["L-A2", "L-A3", "L-B4", "L-C4", "L-A5"];

const ROWS_PER_DECK: i32 = 6;

impl SeatLayout {
    /// Standard sleeper coach: two decks of six rows, columns A–C, the
    /// last row a single seat in column A.
    pub fn standard() -> Self {
        let mut positions = Vec::new();
        for deck in [Deck::Upper, Deck::Lower] {
            let pre_blocked = match deck {
                Deck::Upper => UPPER_PRE_BLOCKED,
                Deck::Lower => LOWER_PRE_BLOCKED,
            };
            for row in 1..=ROWS_PER_DECK {
                let columns: &[&str] = if row == ROWS_PER_DECK {
                    &["A"]
                } else {
                    &["A", "B", "C"]
                };
                for column in columns {
                    let seat_id = format!("{}-{}{}", deck.initial(), column, row);
                    positions.push(SeatPosition {
                        pre_blocked: pre_blocked.contains(&seat_id.as_str()),
                        seat_id,
                        deck,
                        row,
                        column: (*column).to_owned(),
                    });
                }
            }
        }
        Self { positions }
    }

    pub fn positions(&self) -> &[SeatPosition] {
        &self.positions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn standard_layout_has_sixteen_seats_per_deck() {
        let layout = SeatLayout::standard();
        assert_eq!(layout.positions().len(), 32);

        let upper = layout
            .positions()
            .iter()
            .filter(|p| p.deck == Deck::Upper)
            .count();
        assert_eq!(upper, 16);
    }

    #[test]
    fn seat_ids_are_unique() {
        let layout = SeatLayout::standard();
        let ids: HashSet<&str> = layout.positions().iter().map(|p| p.seat_id.as_str()).collect();
        assert_eq!(ids.len(), layout.positions().len());
    }

    #[test]
    fn last_row_is_a_single_seat() {
        let layout = SeatLayout::standard();
        let last_upper: Vec<&SeatPosition> = layout
            .positions()
            .iter()
            .filter(|p| p.deck == Deck::Upper && p.row == 6)
            .collect();
        assert_eq!(last_upper.len(), 1);
        assert_eq!(last_upper[0].seat_id, "U-A6");
    }

    #[test]
    fn pre_blocked_positions_match_declared_lists() {
        let layout = SeatLayout::standard();
        let blocked: HashSet<&str> = layout
            .positions()
            .iter()
            .filter(|p| p.pre_blocked)
            .map(|p| p.seat_id.as_str())
            .collect();

        assert_eq!(blocked.len(), 9);
        assert!(blocked.contains("U-A2"));
        assert!(blocked.contains("L-C4"));
        assert!(!blocked.contains("U-A1"));
    }
}
