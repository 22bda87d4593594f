//! Askama templates for the web frontend.

use askama::Template;

use crate::network::Network;
use crate::planner::{FinalAnswer, Step, TravelMode};

// ============================================================================
// Page Templates
// ============================================================================

/// Home page with the route form.
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub stations: Vec<String>,
    pub lines: Vec<LineView>,
}

impl IndexTemplate {
    /// Create from the network.
    pub fn from_network(network: &Network) -> Self {
        Self {
            stations: network.stations().map(|s| s.to_string()).collect(),
            lines: network
                .lines()
                .iter()
                .map(|line| LineView {
                    name: line.name.to_string(),
                    color: line.color.clone().unwrap_or_else(|| "#888888".to_string()),
                    station_count: line.nodes.len(),
                })
                .collect(),
        }
    }
}

// ============================================================================
// Fragment Templates (AJAX responses, no page chrome)
// ============================================================================

/// Route result fragment.
#[derive(Template)]
#[template(path = "route_result.html")]
pub struct RouteResultTemplate {
    pub route: RouteView,
}

// ============================================================================
// View Models (for templates)
// ============================================================================

/// Line legend entry.
#[derive(Debug, Clone)]
pub struct LineView {
    pub name: String,
    pub color: String,
    pub station_count: usize,
}

/// Route view model for templates.
#[derive(Debug, Clone)]
pub struct RouteView {
    pub steps: Vec<StepView>,
    pub total_display: String,
    pub walk_display: String,
    pub is_walk: bool,
}

impl RouteView {
    /// Create from a final answer.
    pub fn from_answer(answer: &FinalAnswer) -> Self {
        Self {
            steps: answer.steps.iter().map(StepView::from_step).collect(),
            total_display: format_minutes(answer.total_time),
            walk_display: format_minutes(answer.direct_walk_time),
            is_walk: answer.mode == TravelMode::Walk,
        }
    }

    /// Number of line changes on the route.
    pub fn transfer_count(&self) -> usize {
        self.steps.iter().filter(|s| s.kind == "transfer").count()
    }
}

/// Step view model.
#[derive(Debug, Clone)]
pub struct StepView {
    pub from: String,
    pub to: String,
    pub kind: String,
    pub time_display: String,
}

impl StepView {
    pub fn from_step(step: &Step) -> Self {
        Self {
            from: step.from.to_string(),
            to: step.to.to_string(),
            kind: step.kind.to_string(),
            time_display: format_minutes(step.time),
        }
    }

    /// Human description of the step.
    pub fn describe(&self) -> String {
        match self.kind.as_str() {
            "transfer" => format!("Change lines at {}", self.from),
            "walk" => format!("Walk from {} to {}", self.from, self.to),
            _ => format!("Ride from {} to {}", self.from, self.to),
        }
    }
}

/// Format minutes for display, e.g. "4 min" or "3.96 min".
fn format_minutes(minutes: f64) -> String {
    if minutes.fract() == 0.0 {
        format!("{minutes:.0} min")
    } else {
        format!("{minutes:.2} min")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EdgeKind, StationName};

    fn step(from: &str, to: &str, time: f64, kind: EdgeKind) -> Step {
        Step {
            from: StationName::parse(from).unwrap(),
            to: StationName::parse(to).unwrap(),
            time,
            kind,
        }
    }

    #[test]
    fn minutes_formatting() {
        assert_eq!(format_minutes(4.0), "4 min");
        assert_eq!(format_minutes(3.96), "3.96 min");
        assert_eq!(format_minutes(0.5), "0.50 min");
    }

    #[test]
    fn step_descriptions() {
        let ride = StepView::from_step(&step("A", "B", 2.0, EdgeKind::Ride));
        assert_eq!(ride.describe(), "Ride from A to B");

        let transfer = StepView::from_step(&step("M", "M", 5.0, EdgeKind::Transfer));
        assert_eq!(transfer.describe(), "Change lines at M");

        let walk = StepView::from_step(&step("A", "C", 1.25, EdgeKind::Walk));
        assert_eq!(walk.describe(), "Walk from A to C");
        assert_eq!(walk.time_display, "1.25 min");
    }

    #[test]
    fn route_view_counts_transfers() {
        let answer = FinalAnswer {
            steps: vec![
                step("A", "M", 2.0, EdgeKind::Ride),
                step("M", "M", 5.0, EdgeKind::Transfer),
                step("M", "B", 2.0, EdgeKind::Ride),
            ],
            total_time: 9.0,
            direct_walk_time: 14.86,
            mode: TravelMode::Transit,
        };

        let view = RouteView::from_answer(&answer);
        assert_eq!(view.transfer_count(), 1);
        assert_eq!(view.total_display, "9 min");
        assert_eq!(view.walk_display, "14.86 min");
        assert!(!view.is_walk);
    }

    #[test]
    fn route_fragment_renders() {
        let answer = FinalAnswer {
            steps: vec![step("O", "D", 1.0, EdgeKind::Walk)],
            total_time: 1.0,
            direct_walk_time: 1.0,
            mode: TravelMode::Walk,
        };

        let html = RouteResultTemplate {
            route: RouteView::from_answer(&answer),
        }
        .render()
        .unwrap();

        assert!(html.contains("Walk from O to D"));
        assert!(html.contains("1 min"));
    }

    #[test]
    fn index_renders_station_options() {
        let html = IndexTemplate {
            stations: vec!["Central".into(), "Plaza".into()],
            lines: vec![LineView {
                name: "L1".into(),
                color: "#e2231a".into(),
                station_count: 2,
            }],
        }
        .render()
        .unwrap();

        assert!(html.contains("<option value=\"Central\">"));
        assert!(html.contains("L1"));
    }
}
