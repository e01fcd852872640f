use crate::pathfinder::UniverseGraph;
use et_domain::SystemId;
use itertools::Itertools;
use pathfinding::prelude::dijkstra;
use std::collections::HashSet;

/// What happened during a route search. The caller decides how to surface these.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteEvent {
    UnknownStartSystem { name: String },
    UnknownDestinationSystem { name: String },
    SkippedUnsafeSystem { system_id: SystemId, name: String, security: f64 },
    RouteFound { jumps: usize },
    NoRouteFound,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RouteSearch {
    /// System names from start to destination, both included.
    pub route: Option<Vec<String>>,
    pub events: Vec<RouteEvent>,
}

impl RouteSearch {
    pub fn jumps(&self) -> Option<usize> {
        self.route.as_ref().map(|r| r.len().saturating_sub(1))
    }
}

/// Minimum-jump route between two systems given by name.
/// With `safe_only` no system below the high-sec threshold is entered.
pub fn find_path(graph: &UniverseGraph, start_name: &str, end_name: &str, safe_only: bool) -> RouteSearch {
    find_path_with_cost(graph, start_name, end_name, safe_only, |_, _| 1)
}

/// Cheapest route under `edge_cost`. Neighbors are offered in ascending id order and a system keeps the
/// first predecessor that reached it at its lowest cost, so equal-cost routes come out the same every time.
pub fn find_path_with_cost<C>(graph: &UniverseGraph, start_name: &str, end_name: &str, safe_only: bool, edge_cost: C) -> RouteSearch
where
    C: Fn(SystemId, SystemId) -> u32,
{
    let mut events = Vec::new();

    let start_id = graph.system_id(start_name);
    if start_id.is_none() {
        events.push(RouteEvent::UnknownStartSystem { name: start_name.to_string() });
    }
    let end_id = graph.system_id(end_name);
    if end_id.is_none() {
        events.push(RouteEvent::UnknownDestinationSystem { name: end_name.to_string() });
    }
    let (Some(start_id), Some(end_id)) = (start_id, end_id) else {
        return RouteSearch { route: None, events };
    };

    let mut reported_unsafe: HashSet<SystemId> = HashSet::new();

    let result = dijkstra(
        &start_id,
        |system_id| {
            graph
                .neighbors(system_id)
                .filter(|neighbor| {
                    if !safe_only || graph.is_safe(neighbor) {
                        return true;
                    }
                    if reported_unsafe.insert(*neighbor) {
                        events.push(RouteEvent::SkippedUnsafeSystem {
                            system_id: *neighbor,
                            name: display_name(graph, *neighbor),
                            security: graph.security(neighbor),
                        });
                    }
                    false
                })
                .map(|neighbor| (neighbor, edge_cost(*system_id, neighbor)))
                .collect_vec()
        },
        |system_id| *system_id == end_id,
    );

    match result {
        Some((path, _cost)) => {
            let route = path.into_iter().map(|id| display_name(graph, id)).collect_vec();
            events.push(RouteEvent::RouteFound { jumps: route.len() - 1 });
            RouteSearch { route: Some(route), events }
        }
        None => {
            events.push(RouteEvent::NoRouteFound);
            RouteSearch { route: None, events }
        }
    }
}

fn display_name(graph: &UniverseGraph, system_id: SystemId) -> String {
    graph.system_name(&system_id).map(str::to_string).unwrap_or_else(|| system_id.to_string())
}
