//! Ant System.

use super::deposit_along;
use crate::colony::{ConstructionPolicy, IterationOutcome, PheromoneField, StepContext};
use crate::grid::Point;
use crate::path::Trace;

/// The classic Ant System: inverse edge cost as heuristic, roulette
/// selection, and every valid tour deposits `Q / L` after evaporation.
///
/// All parameters come from [`ColonyConfig::ant_system`](crate::colony::ColonyConfig::ant_system).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AntSystem;

impl ConstructionPolicy for AntSystem {
    fn name(&self) -> &'static str {
        "AS"
    }

    fn heuristic(&self, _ctx: &StepContext<'_>, _r: Point, _s: Point, cost: f64) -> f64 {
        1.0 / cost
    }

    fn global_update(&mut self, field: &mut PheromoneField, outcome: &IterationOutcome<'_>) {
        field.evaporate(outcome.config.rho);
        for tour in outcome.valid_tours() {
            deposit_along(field, tour, outcome.config.deposit / tour.length());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colony::{ColonyConfig, ColonyRunner, Schedule};
    use crate::path::ListPath;
    use crate::variants::fixtures;

    #[test]
    fn test_allowed_moves_skip_visited_points() {
        let graph = fixtures::open();
        let config = ColonyConfig::ant_system();
        let field = PheromoneField::uniform(&graph, 1.0);
        let path = ListPath::from_points([Point::new(1, 1), Point::new(2, 1), Point::new(2, 2)]);
        let best = ListPath::unreached();
        let ctx = StepContext {
            graph: &graph,
            pheromone: &field,
            config: &config,
            schedule: Schedule {
                index: 0,
                max_iterations: 1,
            },
            path: &path,
            best: &best,
        };
        let moves = AntSystem.allowed_moves(&ctx, Point::new(2, 2));
        assert_eq!(moves.len(), 6);
        for (s, cost) in moves {
            assert!(!path.contains(s), "{s:?} already visited");
            assert_eq!(graph.cost(Point::new(2, 2), s), Some(cost));
        }
    }

    #[test]
    fn test_open_grid_finds_diagonal() {
        // 1/cost rates an orthogonal step above a diagonal one, so most
        // tours are staircases. A wide colony is needed for the zero-turn
        // line to show up and dominate the deposits.
        let config = ColonyConfig::ant_system()
            .with_ants(1000)
            .with_max_iterations(30)
            .with_seed(7);
        let result = ColonyRunner::run(&fixtures::open(), AntSystem, &config).unwrap();
        fixtures::assert_straight_diagonal(&result);
        assert_eq!(result.variant, "AS");
    }

    #[test]
    fn test_wall_forces_detour() {
        let config = ColonyConfig::ant_system()
            .with_ants(100)
            .with_max_iterations(20)
            .with_seed(8);
        let result = ColonyRunner::run(&fixtures::walled(), AntSystem, &config).unwrap();
        fixtures::assert_goes_around_wall(&result);
    }

    #[test]
    fn test_boxed_in_start() {
        let config = ColonyConfig::ant_system()
            .with_ants(5)
            .with_max_iterations(10)
            .with_seed(1);
        let result = ColonyRunner::run(&fixtures::boxed_in(), AntSystem, &config).unwrap();
        fixtures::assert_unreached(&result, 10);
    }

    #[test]
    fn test_shorter_tours_deposit_more() {
        let graph = fixtures::open();
        let config = ColonyConfig::ant_system();
        let mut field = PheromoneField::uniform(&graph, 1.0);
        let short = crate::path::ListPath::from_points([Point::new(0, 0), Point::new(1, 1)]);
        let long = crate::path::ListPath::from_points([
            Point::new(0, 0),
            Point::new(1, 0),
            Point::new(1, 1),
        ]);
        let tours = vec![short.clone(), long];
        let outcome = IterationOutcome {
            graph: &graph,
            config: &config,
            schedule: crate::colony::Schedule {
                index: 0,
                max_iterations: 1,
            },
            tours: &tours,
            iteration_best: Some(0),
            best: &short,
        };
        AntSystem.global_update(&mut field, &outcome);
        let diag = field.get(Point::new(0, 0), Point::new(1, 1));
        let first = field.get(Point::new(0, 0), Point::new(1, 0));
        let untouched = field.get(Point::new(2, 2), Point::new(3, 3));
        assert!((untouched - 0.5).abs() < 1e-12);
        assert!((diag - (0.5 + 300.0 / std::f64::consts::SQRT_2)).abs() < 1e-9);
        assert!((first - (0.5 + 150.0)).abs() < 1e-9);
    }
}
