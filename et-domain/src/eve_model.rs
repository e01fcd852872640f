use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::hash::Hash;

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd)]
#[serde(transparent)]
pub struct SystemId(pub i64);

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd)]
#[serde(transparent)]
pub struct RegionId(pub i64);

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd)]
#[serde(transparent)]
pub struct ConstellationId(pub i64);

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd)]
#[serde(transparent)]
pub struct StationId(pub i64);

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd)]
#[serde(transparent)]
pub struct TypeId(pub i64);

impl fmt::Display for SystemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Security status at or above which a system counts as high-sec.
pub const SAFE_SECURITY_THRESHOLD: f64 = 0.5;

/// The pre-built universe export: region name -> region.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(transparent)]
pub struct Universe(pub BTreeMap<String, Region>);

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct Region {
    #[serde(default)]
    pub region_id: Option<RegionId>,
    #[serde(default)]
    pub constellations: BTreeMap<String, Constellation>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct Constellation {
    #[serde(default)]
    pub constellation_id: Option<ConstellationId>,
    #[serde(default)]
    pub systems: BTreeMap<String, SolarSystem>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct SolarSystem {
    #[serde(rename = "solarSystemID")]
    pub solar_system_id: SystemId,
    #[serde(default)]
    pub security: Option<f64>,
    #[serde(default)]
    pub connections: Vec<SystemId>,
}

impl SolarSystem {
    /// Missing security ratings count as 0.0, i.e. unsafe.
    pub fn security_rating(&self) -> f64 {
        self.security.unwrap_or(0.0)
    }
}

/// A system of the universe together with the names of everything it is nested in.
#[derive(Debug, Clone, PartialEq)]
pub struct UniverseSystem<'a> {
    pub region_name: &'a str,
    pub region_id: Option<RegionId>,
    pub constellation_name: &'a str,
    pub system_name: &'a str,
    pub system: &'a SolarSystem,
}

impl Universe {
    pub fn systems(&self) -> impl Iterator<Item = UniverseSystem<'_>> + '_ {
        self.0.iter().flat_map(|(region_name, region)| {
            region.constellations.iter().flat_map(move |(constellation_name, constellation)| {
                constellation.systems.iter().map(move |(system_name, system)| UniverseSystem {
                    region_name,
                    region_id: region.region_id,
                    constellation_name,
                    system_name,
                    system,
                })
            })
        })
    }

    /// Region ids of all regions whose name matches one of `region_names` (case-insensitive).
    pub fn region_ids_by_name<S: AsRef<str>>(&self, region_names: &[S]) -> Vec<RegionId> {
        let wanted = region_names.iter().map(|name| name.as_ref().trim().to_lowercase()).collect_vec();
        self.0
            .iter()
            .filter(|(name, _)| wanted.contains(&name.to_lowercase()))
            .filter_map(|(_, region)| region.region_id)
            .sorted()
            .dedup()
            .collect_vec()
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Item {
    pub name: String,
    pub volume: f64,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct ItemCatalog {
    #[serde(default)]
    pub by_id: HashMap<TypeId, Item>,
}

impl ItemCatalog {
    pub fn get(&self, type_id: &TypeId) -> Option<&Item> {
        self.by_id.get(type_id)
    }
}

impl FromIterator<(TypeId, Item)> for ItemCatalog {
    fn from_iter<T: IntoIterator<Item = (TypeId, Item)>>(iter: T) -> Self {
        ItemCatalog { by_id: iter.into_iter().collect() }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Station {
    #[serde(rename = "solarSystemID")]
    pub solar_system_id: SystemId,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "regionID", default)]
    pub region_id: Option<RegionId>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct StationCatalog {
    #[serde(default)]
    pub by_id: HashMap<StationId, Station>,
}

/// Resolves the location of a market order to the solar system it is in.
pub trait StationLookup {
    fn system_of(&self, location_id: &StationId) -> Option<SystemId>;
}

impl StationLookup for StationCatalog {
    fn system_of(&self, location_id: &StationId) -> Option<SystemId> {
        self.by_id.get(location_id).map(|station| station.solar_system_id)
    }
}

impl StationLookup for HashMap<StationId, SystemId> {
    fn system_of(&self, location_id: &StationId) -> Option<SystemId> {
        self.get(location_id).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const UNIVERSE_JSON: &str = r#"
    {
      "the forge": {
        "region_id": 10000002,
        "region_name_id": 1,
        "constellations": {
          "kimotoro": {
            "constellation_id": 20000020,
            "systems": {
              "jita": { "solarSystemID": 30000142, "security": 0.95, "connections": [30000144], "planets": [1, 2] },
              "perimeter": { "solarSystemID": 30000144, "security": 0.9, "connections": [30000142] }
            }
          }
        }
      },
      "domain": {
        "region_id": 10000043,
        "constellations": {
          "throne worlds": {
            "systems": {
              "amarr": { "solarSystemID": 30002187, "security": null }
            }
          }
        }
      }
    }"#;

    #[test]
    fn universe_export_deserializes_and_ignores_unknown_fields() {
        let universe: Universe = serde_json::from_str(UNIVERSE_JSON).unwrap();

        let systems = universe.systems().map(|s| (s.region_name.to_string(), s.system_name.to_string(), s.system.solar_system_id)).collect_vec();

        assert_eq!(
            systems,
            vec![
                ("domain".to_string(), "amarr".to_string(), SystemId(30002187)),
                ("the forge".to_string(), "jita".to_string(), SystemId(30000142)),
                ("the forge".to_string(), "perimeter".to_string(), SystemId(30000144)),
            ]
        );

        let amarr = universe.systems().find(|s| s.system_name == "amarr").unwrap();
        assert_eq!(amarr.system.security_rating(), 0.0);
        assert!(amarr.system.connections.is_empty());
    }

    #[test]
    fn region_ids_by_name_is_case_insensitive() {
        let universe: Universe = serde_json::from_str(UNIVERSE_JSON).unwrap();
        assert_eq!(universe.region_ids_by_name(&["The Forge", "Metropolis"]), vec![RegionId(10000002)]);
    }

    #[test]
    fn catalogs_deserialize_with_string_keys() {
        let items: ItemCatalog = serde_json::from_str(r#"{"by_id": {"34": {"name": "tritanium", "volume": 0.01}}, "by_name": {}}"#).unwrap();
        assert_eq!(items.get(&TypeId(34)).map(|i| i.volume), Some(0.01));

        let stations: StationCatalog = serde_json::from_str(r#"{"by_id": {"60003760": {"name": "Jita IV - Moon 4", "solarSystemID": 30000142, "regionID": 10000002}}}"#).unwrap();
        assert_eq!(stations.system_of(&StationId(60003760)), Some(SystemId(30000142)));
        assert_eq!(stations.system_of(&StationId(1)), None);
    }
}
