use et_domain::{RegionId, SystemId, Universe, SAFE_SECURITY_THRESHOLD};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Flat, undirected adjacency view of the universe with name and region lookups.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UniverseGraph {
    neighbors: BTreeMap<SystemId, BTreeSet<SystemId>>,
    security: HashMap<SystemId, f64>,
    regions: HashMap<SystemId, RegionId>,
    name_to_id: HashMap<String, SystemId>,
    id_to_name: HashMap<SystemId, String>,
    /// Connections pointing at systems that are not part of the universe. They are not in the graph.
    pub dangling_connections: Vec<(SystemId, SystemId)>,
}

fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

impl UniverseGraph {
    pub fn from_universe(universe: &Universe) -> Self {
        let mut graph = UniverseGraph::default();

        for entry in universe.systems() {
            let system_id = entry.system.solar_system_id;
            graph.name_to_id.insert(name_key(entry.system_name), system_id);
            graph.id_to_name.insert(system_id, entry.system_name.to_string());
            graph.security.insert(system_id, entry.system.security_rating());
            if let Some(region_id) = entry.region_id {
                graph.regions.insert(system_id, region_id);
            }
            graph.neighbors.entry(system_id).or_default();
        }

        for entry in universe.systems() {
            let system_id = entry.system.solar_system_id;
            for neighbor_id in entry.system.connections.iter().copied() {
                if neighbor_id == system_id {
                    continue;
                }
                if !graph.id_to_name.contains_key(&neighbor_id) {
                    graph.dangling_connections.push((system_id, neighbor_id));
                    continue;
                }
                graph.neighbors.entry(system_id).or_default().insert(neighbor_id);
                graph.neighbors.entry(neighbor_id).or_default().insert(system_id);
            }
        }

        graph
    }

    pub fn system_id(&self, name: &str) -> Option<SystemId> {
        self.name_to_id.get(&name_key(name)).copied()
    }

    pub fn system_name(&self, system_id: &SystemId) -> Option<&str> {
        self.id_to_name.get(system_id).map(String::as_str)
    }

    pub fn security(&self, system_id: &SystemId) -> f64 {
        self.security.get(system_id).copied().unwrap_or(0.0)
    }

    pub fn is_safe(&self, system_id: &SystemId) -> bool {
        self.security(system_id) >= SAFE_SECURITY_THRESHOLD
    }

    pub fn region_of(&self, system_id: &SystemId) -> Option<RegionId> {
        self.regions.get(system_id).copied()
    }

    /// Region and system id of a system given by name.
    pub fn locate(&self, name: &str) -> Option<(RegionId, SystemId)> {
        let system_id = self.system_id(name)?;
        Some((self.region_of(&system_id)?, system_id))
    }

    /// Neighbors in ascending id order.
    pub fn neighbors(&self, system_id: &SystemId) -> impl Iterator<Item = SystemId> + '_ {
        self.neighbors.get(system_id).into_iter().flat_map(|n| n.iter().copied())
    }

    pub fn system_ids(&self) -> impl Iterator<Item = SystemId> + '_ {
        self.neighbors.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.neighbors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }
}
