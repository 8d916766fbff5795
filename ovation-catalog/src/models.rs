use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

pub type ShowId = u32;
pub type SeatId = u32;
/// Zone code, e.g. "A".
pub type ZoneId = String;
/// Section code within a zone, e.g. "A2".
pub type SectionId = String;

/// A performance with a single schedule slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Show {
    pub id: ShowId,
    pub name: String,
    pub artist: String,
    pub genre: String,
    pub venue_gate: String,
    pub show_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

/// Pricing/seating tier of a show. The zone price is the only price in the
/// system; seats never carry their own copy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Zone {
    pub id: ZoneId,
    pub show_id: ShowId,
    pub name: String,
    pub unit_price: i32,
    pub capacity: u32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StagePosition {
    Left,
    Center,
    Right,
}

/// Sub-division of a zone on the venue floor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    pub id: SectionId,
    pub zone_id: ZoneId,
    pub label: String,
    pub position: StagePosition,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SeatStatus {
    Available,
    Booked,
}

/// A bookable unit. Availability is authoritative from the catalog provider;
/// the client never flips a booked seat back to selectable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Seat {
    pub id: SeatId,
    pub show_id: ShowId,
    pub zone_id: ZoneId,
    pub section_id: SectionId,
    pub row: String,
    pub number: u32,
    pub status: SeatStatus,
}

impl Seat {
    pub fn is_available(&self) -> bool {
        self.status == SeatStatus::Available
    }

    /// Display label, row letter plus seat number (e.g. "C7").
    pub fn label(&self) -> String {
        format!("{}{}", self.row, self.number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seat_status_serialization() {
        let json = r#"
            {
                "id": 42,
                "show_id": 1,
                "zone_id": "A",
                "section_id": "A2",
                "row": "C",
                "number": 7,
                "status": "AVAILABLE"
            }
        "#;
        let seat: Seat = serde_json::from_str(json).expect("Failed to deserialize");
        assert_eq!(seat.label(), "C7");
        assert!(seat.is_available());

        let booked = Seat { status: SeatStatus::Booked, ..seat };
        let value = serde_json::to_value(&booked).unwrap();
        assert_eq!(value["status"], "BOOKED");
    }
}
