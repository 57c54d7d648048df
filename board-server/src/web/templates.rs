//! Askama templates for the web frontend.

use askama::Template;

use crate::domain::Direction;

use super::dto::BoardResponse;

/// The departure board page.
#[derive(Template)]
#[template(path = "board.html")]
pub struct BoardTemplate {
    pub board: BoardResponse,
}

impl BoardTemplate {
    pub fn new(board: BoardResponse) -> Self {
        Self { board }
    }

    /// Heading for the current direction.
    pub fn direction_label(&self) -> &'static str {
        match self.board.direction {
            Direction::Outbound => "To the city",
            Direction::Inbound => "Going home",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(trains: bool, error: Option<&str>) -> BoardResponse {
        BoardResponse {
            direction: Direction::Outbound,
            from: "Twickenham".to_string(),
            to: "London Waterloo".to_string(),
            updated_at: Some("09:50:00".to_string()),
            trains: if trains { vec![sample_train()] } else { Vec::new() },
            error: error.map(str::to_string),
        }
    }

    fn sample_train() -> crate::engine::TrainPresentation {
        use crate::domain::{RailTime, ResolvedArrival, ResolvedTrain};
        use chrono::NaiveDate;

        let now = NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(9, 50, 0)
            .unwrap();
        let dep = RailTime::parse_hhmm("10:00", now.date()).unwrap();
        let arr = RailTime::parse_hhmm("10:25", now.date()).unwrap();
        let train = ResolvedTrain {
            service_id: "1".to_string(),
            scheduled_departure: dep,
            effective_departure: dep,
            arrival: ResolvedArrival::Confirmed {
                scheduled: arr,
                effective: arr,
            },
            platform: None,
            destination: "London Waterloo".to_string(),
            operator: "South Western Railway".to_string(),
            is_delayed: false,
            seconds_until_departure: 600,
            seconds_until_arrival: Some(35 * 60),
        };
        crate::engine::TrainPresentation::new(&train, now)
    }

    #[test]
    fn renders_trains() {
        let html = BoardTemplate::new(board(true, None)).render().unwrap();
        assert!(html.contains("Twickenham"));
        assert!(html.contains("10:25"));
        assert!(html.contains("25 mins"));
        assert!(html.contains("To the city"));
    }

    #[test]
    fn renders_error() {
        let html = BoardTemplate::new(board(false, Some("upstream down")))
            .render()
            .unwrap();
        assert!(html.contains("upstream down"));
    }

    #[test]
    fn renders_empty_board() {
        let html = BoardTemplate::new(board(false, None)).render().unwrap();
        assert!(html.contains("No trains"));
    }
}
