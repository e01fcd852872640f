use et_domain::{
    Constellation, ConstellationId, Isk, Item, ItemCatalog, MarketOrder, Region, RegionId, SolarSystem, Station, StationCatalog, StationId, SystemId, TypeId,
    Universe,
};
use std::collections::{BTreeMap, HashMap};

/// A small universe:
///
/// ```text
/// jita -- perimeter -- urlen -- sirppala -- tama (0.3) -- nourvukaiken
///    \-- maurasi ----/
/// amarr (isolated, with one dangling connection)
/// ```
pub struct TestObjects;

impl TestObjects {
    pub const THE_FORGE: RegionId = RegionId(10000002);
    pub const THE_CITADEL: RegionId = RegionId(10000033);
    pub const DOMAIN: RegionId = RegionId(10000043);

    pub const JITA: SystemId = SystemId(30000142);
    pub const PERIMETER: SystemId = SystemId(30000144);
    pub const MAURASI: SystemId = SystemId(30000140);
    pub const URLEN: SystemId = SystemId(30000139);
    pub const SIRPPALA: SystemId = SystemId(30000138);
    pub const TAMA: SystemId = SystemId(30002813);
    pub const NOURVUKAIKEN: SystemId = SystemId(30002812);
    pub const AMARR: SystemId = SystemId(30002187);

    pub const JITA_STATION: StationId = StationId(60003760);
    pub const MAURASI_STATION: StationId = StationId(60000361);
    pub const URLEN_STATION: StationId = StationId(60000001);
    pub const TAMA_STATION: StationId = StationId(60002500);
    pub const UNKNOWN_STATION: StationId = StationId(1);

    pub const TRITANIUM: TypeId = TypeId(34);
    pub const PYERITE: TypeId = TypeId(35);
    pub const WEIGHTLESS: TypeId = TypeId(44);
    pub const UNCATALOGUED: TypeId = TypeId(999);

    fn system(id: SystemId, security: f64, connections: &[SystemId]) -> SolarSystem {
        SolarSystem {
            solar_system_id: id,
            security: Some(security),
            connections: connections.to_vec(),
        }
    }

    fn region(region_id: RegionId, constellation_name: &str, systems: Vec<(&str, SolarSystem)>) -> Region {
        Region {
            region_id: Some(region_id),
            constellations: BTreeMap::from([(
                constellation_name.to_string(),
                Constellation {
                    constellation_id: Some(ConstellationId(region_id.0 + 10_000_000)),
                    systems: systems.into_iter().map(|(name, system)| (name.to_string(), system)).collect(),
                },
            )]),
        }
    }

    pub fn universe() -> Universe {
        Universe(BTreeMap::from([
            (
                "theforge".to_string(),
                Self::region(
                    Self::THE_FORGE,
                    "kimotoro",
                    vec![
                        ("jita", Self::system(Self::JITA, 0.95, &[Self::PERIMETER, Self::MAURASI])),
                        ("perimeter", Self::system(Self::PERIMETER, 0.95, &[Self::JITA, Self::URLEN])),
                        ("maurasi", Self::system(Self::MAURASI, 0.9, &[Self::JITA, Self::URLEN])),
                        ("urlen", Self::system(Self::URLEN, 0.95, &[Self::PERIMETER, Self::MAURASI])),
                        ("sirppala", Self::system(Self::SIRPPALA, 0.6, &[Self::URLEN])),
                    ],
                ),
            ),
            (
                "thecitadel".to_string(),
                Self::region(
                    Self::THE_CITADEL,
                    "ihilakken",
                    vec![
                        ("tama", Self::system(Self::TAMA, 0.3, &[Self::SIRPPALA, Self::NOURVUKAIKEN])),
                        ("nourvukaiken", Self::system(Self::NOURVUKAIKEN, 0.6, &[Self::TAMA])),
                    ],
                ),
            ),
            (
                "domain".to_string(),
                Self::region(Self::DOMAIN, "throne worlds", vec![("amarr", Self::system(Self::AMARR, 1.0, &[SystemId(99_999_999)]))]),
            ),
        ]))
    }

    pub fn stations() -> StationCatalog {
        let station = |system: SystemId, region: RegionId, name: &str| Station {
            solar_system_id: system,
            name: name.to_string(),
            region_id: Some(region),
        };

        StationCatalog {
            by_id: HashMap::from([
                (Self::JITA_STATION, station(Self::JITA, Self::THE_FORGE, "Jita IV - Moon 4")),
                (Self::MAURASI_STATION, station(Self::MAURASI, Self::THE_FORGE, "Maurasi I")),
                (Self::URLEN_STATION, station(Self::URLEN, Self::THE_FORGE, "Urlen II")),
                (Self::TAMA_STATION, station(Self::TAMA, Self::THE_CITADEL, "Tama VII")),
            ]),
        }
    }

    pub fn items() -> ItemCatalog {
        let item = |name: &str, volume: f64| Item { name: name.to_string(), volume };

        ItemCatalog::from_iter([
            (Self::TRITANIUM, item("tritanium", 0.01)),
            (Self::PYERITE, item("pyerite", 0.01)),
            (Self::WEIGHTLESS, item("broken item", 0.0)),
        ])
    }

    pub fn order(type_id: TypeId, location_id: StationId, is_buy_order: bool, price: f64, volume_remain: u64) -> MarketOrder {
        MarketOrder {
            type_id,
            price: Isk::from_f64(price),
            volume_remain,
            is_buy_order,
            location_id,
        }
    }

    pub fn the_forge_orders() -> Vec<MarketOrder> {
        vec![
            Self::order(Self::TRITANIUM, Self::JITA_STATION, false, 5.0, 1_000),
            Self::order(Self::PYERITE, Self::JITA_STATION, false, 10.0, 500),
            Self::order(Self::UNCATALOGUED, Self::JITA_STATION, false, 1.0, 10),
            Self::order(Self::WEIGHTLESS, Self::JITA_STATION, false, 1.0, 10),
            Self::order(Self::TRITANIUM, Self::MAURASI_STATION, true, 6.0, 400),
            Self::order(Self::TRITANIUM, Self::MAURASI_STATION, false, 5.5, 100),
            Self::order(Self::TRITANIUM, Self::URLEN_STATION, true, 7.0, 200),
            Self::order(Self::PYERITE, Self::URLEN_STATION, true, 12.0, 100),
            Self::order(Self::UNCATALOGUED, Self::URLEN_STATION, true, 100.0, 10),
            Self::order(Self::WEIGHTLESS, Self::URLEN_STATION, true, 100.0, 10),
            Self::order(Self::TRITANIUM, Self::UNKNOWN_STATION, true, 100.0, 1_000),
        ]
    }

    pub fn the_citadel_orders() -> Vec<MarketOrder> {
        vec![
            Self::order(Self::TRITANIUM, Self::TAMA_STATION, true, 9.0, 50),
            Self::order(Self::PYERITE, Self::TAMA_STATION, false, 2.0, 1_000),
        ]
    }
}
