//! Configuration types for the simulation.
//!
//! Settings live in integer-valued property files, one file per namespace:
//!
//! ```text
//! config/
//!   world.properties
//!   creatures/plants.properties
//!   creatures/herbivores.properties
//!   creatures/predators.properties
//!   creatures/creator.properties
//!   environment/day_and_night.properties
//!   environment/weather.properties
//! ```
//!
//! [`ConfigStore`] loads the raw key/value maps, the typed configs below are
//! built from it. A missing key is reported as [`Error::MissingKey`] naming it.

use crate::{Error, Kind, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const WORLD_NAMESPACE: &str = "world";
pub const PLANTS_NAMESPACE: &str = "plants";
pub const HERBIVORES_NAMESPACE: &str = "herbivores";
pub const PREDATORS_NAMESPACE: &str = "predators";
pub const CREATOR_NAMESPACE: &str = "creator";
pub const DAY_NIGHT_NAMESPACE: &str = "day_and_night";
pub const WEATHER_NAMESPACE: &str = "weather";

/// Namespace name and its file, relative to the configuration directory
pub const NAMESPACE_FILES: [(&str, &str); 7] = [
    (WORLD_NAMESPACE, "world.properties"),
    (PLANTS_NAMESPACE, "creatures/plants.properties"),
    (HERBIVORES_NAMESPACE, "creatures/herbivores.properties"),
    (PREDATORS_NAMESPACE, "creatures/predators.properties"),
    (CREATOR_NAMESPACE, "creatures/creator.properties"),
    (DAY_NIGHT_NAMESPACE, "environment/day_and_night.properties"),
    (WEATHER_NAMESPACE, "environment/weather.properties"),
];

/// An immutable set of integer properties belonging to one namespace
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Properties {
    namespace: String,
    values: HashMap<String, i64>,
}

impl Properties {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            values: HashMap::new(),
        }
    }

    pub fn from_pairs<'a>(
        namespace: impl Into<String>,
        pairs: impl IntoIterator<Item = (&'a str, i64)>,
    ) -> Self {
        let mut properties = Self::new(namespace);
        for (key, value) in pairs {
            properties.values.insert(key.to_string(), value);
        }
        properties
    }

    /// Parse `KEY=VALUE` (or `KEY: VALUE`) lines. Blank lines and lines
    /// starting with `#` or `!` are skipped.
    pub fn parse(namespace: impl Into<String>, text: &str) -> Result<Self> {
        let mut properties = Self::new(namespace);

        for (index, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                continue;
            }

            let (key, value) = line
                .split_once(|c: char| c == '=' || c == ':')
                .map(|(k, v)| (k.trim(), v.trim()))
                .filter(|(k, _)| !k.is_empty())
                .ok_or_else(|| {
                    Error::Parse(format!(
                        "{}: line {}: expected KEY=VALUE, got '{}'",
                        properties.namespace,
                        index + 1,
                        line
                    ))
                })?;

            let parsed = value.parse::<i64>().map_err(|_| Error::InvalidValue {
                namespace: properties.namespace.clone(),
                key: key.to_string(),
                value: value.to_string(),
            })?;

            properties.values.insert(key.to_string(), parsed);
        }

        Ok(properties)
    }

    pub fn load(namespace: impl Into<String>, path: &Path) -> Result<Self> {
        let namespace = namespace.into();
        let text = std::fs::read_to_string(path)?;
        let properties = Self::parse(namespace, &text)?;
        debug!(
            namespace = %properties.namespace,
            path = %path.display(),
            keys = properties.values.len(),
            "Loaded properties"
        );
        Ok(properties)
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Look up a required key
    pub fn get(&self, key: &str) -> Result<i64> {
        self.values
            .get(key)
            .copied()
            .ok_or_else(|| Error::MissingKey {
                namespace: self.namespace.clone(),
                key: key.to_string(),
            })
    }

    pub fn get_or(&self, key: &str, default: i64) -> i64 {
        self.values.get(key).copied().unwrap_or(default)
    }

    pub fn get_i32(&self, key: &str) -> Result<i32> {
        let value = self.get(key)?;
        i32::try_from(value).map_err(|_| self.invalid(key, value))
    }

    pub fn get_u32(&self, key: &str) -> Result<u32> {
        let value = self.get(key)?;
        u32::try_from(value).map_err(|_| self.invalid(key, value))
    }

    /// A count or size; must be non-negative
    pub fn get_usize(&self, key: &str) -> Result<usize> {
        let value = self.get(key)?;
        usize::try_from(value).map_err(|_| self.invalid(key, value))
    }

    /// A period in milliseconds; must be positive
    pub fn get_millis(&self, key: &str) -> Result<u64> {
        let value = self.get(key)?;
        match u64::try_from(value) {
            Ok(ms) if ms > 0 => Ok(ms),
            _ => Err(self.invalid(key, value)),
        }
    }

    fn invalid(&self, key: &str, value: i64) -> Error {
        Error::InvalidValue {
            namespace: self.namespace.clone(),
            key: key.to_string(),
            value: value.to_string(),
        }
    }
}

/// All property namespaces of a simulation
#[derive(Debug, Clone, Default)]
pub struct ConfigStore {
    namespaces: HashMap<String, Properties>,
}

impl ConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every namespace in [`NAMESPACE_FILES`] from `dir`
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let mut store = Self::new();
        for (namespace, file) in NAMESPACE_FILES {
            let path: PathBuf = dir.join(file);
            store.insert(Properties::load(namespace, &path)?);
        }
        Ok(store)
    }

    pub fn insert(&mut self, properties: Properties) {
        self.namespaces
            .insert(properties.namespace().to_string(), properties);
    }

    pub fn namespace(&self, name: &str) -> Result<&Properties> {
        self.namespaces
            .get(name)
            .ok_or_else(|| Error::MissingNamespace(name.to_string()))
    }
}

/// Board sizing and capacity limits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldConfig {
    /// Side length of the square board
    pub board_size: usize,
    /// Water level of a freshly created cell
    pub cell_water: i32,
    /// Water level above which a cell floods
    pub max_cell_water: i32,
    /// Plants one cell can hold
    pub cell_plants: usize,
    /// Animals one cell can hold
    pub cell_animals: usize,
    /// Plants alive on the whole board
    pub max_plants: usize,
    /// Animals alive on the whole board
    pub max_animals: usize,
    /// Attempts an animal makes to find a neighbouring cell with room
    pub move_attempts: u32,
    /// Pause between move attempts (milliseconds)
    pub move_backoff_ms: u64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            board_size: 10,
            cell_water: 5,
            max_cell_water: 20,
            cell_plants: 5,
            cell_animals: 5,
            max_plants: 60,
            max_animals: 40,
            move_attempts: 3,
            move_backoff_ms: 50,
        }
    }
}

impl WorldConfig {
    pub fn from_properties(props: &Properties) -> Result<Self> {
        let config = Self {
            board_size: props.get_usize("BOARD_SIZE")?,
            cell_water: props.get_i32("CELL_WATER")?,
            max_cell_water: props.get_i32("MAX_CELL_WATER_LEVEL")?,
            cell_plants: props.get_usize("CELL_PLANTS")?,
            cell_animals: props.get_usize("CELL_ANIMALS")?,
            max_plants: props.get_usize("MAX_PLANTS")?,
            max_animals: props.get_usize("MAX_ANIMALS")?,
            move_attempts: props.get_u32("MOVE_ATTEMPTS")?,
            move_backoff_ms: props.get_millis("MOVE_BACKOFF")?,
        };

        if config.board_size == 0 {
            return Err(props.invalid("BOARD_SIZE", 0));
        }
        if config.cell_water < 0 {
            return Err(props.invalid("CELL_WATER", config.cell_water as i64));
        }
        Ok(config)
    }

    /// Capacity of one cell for the given kind
    pub fn cell_capacity(&self, kind: Kind) -> usize {
        if kind.is_animal() {
            self.cell_animals
        } else {
            self.cell_plants
        }
    }

    /// Global capacity for the given kind
    pub fn global_capacity(&self, kind: Kind) -> usize {
        if kind.is_animal() {
            self.max_animals
        } else {
            self.max_plants
        }
    }
}

/// Per-species biology: base characteristics and behavior periods
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BiologyConfig {
    pub size: i32,
    pub energy: i32,
    pub adult_size: i32,
    pub grow_with: i32,
    /// Growth outside the active period. Plants grow at half rate at night
    /// instead and carry `grow_with / 2` here.
    pub inactive_grow_with: i32,
    pub energy_increase: i32,
    pub attack: i32,
    pub defence: i32,
    pub grow_period_ms: u64,
    pub evolve_period_ms: u64,
    pub replicate_period_ms: u64,
    pub feed_period_ms: u64,
}

impl BiologyConfig {
    pub fn plant() -> Self {
        Self {
            size: 1,
            energy: 5,
            adult_size: 10,
            grow_with: 2,
            inactive_grow_with: 1,
            energy_increase: 2,
            attack: 0,
            defence: 1,
            grow_period_ms: 1000,
            evolve_period_ms: 5000,
            replicate_period_ms: 3000,
            feed_period_ms: 1000,
        }
    }

    pub fn herbivore() -> Self {
        Self {
            size: 2,
            energy: 10,
            adult_size: 12,
            grow_with: 2,
            inactive_grow_with: 1,
            energy_increase: 1,
            attack: 3,
            defence: 2,
            grow_period_ms: 1000,
            evolve_period_ms: 6000,
            replicate_period_ms: 5000,
            feed_period_ms: 1500,
        }
    }

    pub fn predator() -> Self {
        Self {
            size: 3,
            energy: 12,
            adult_size: 15,
            grow_with: 2,
            inactive_grow_with: 1,
            energy_increase: 1,
            attack: 5,
            defence: 3,
            grow_period_ms: 1000,
            evolve_period_ms: 7000,
            replicate_period_ms: 7000,
            feed_period_ms: 2000,
        }
    }

    pub fn defaults(kind: Kind) -> Self {
        match kind {
            Kind::Plant => Self::plant(),
            Kind::Herbivore => Self::herbivore(),
            Kind::Predator => Self::predator(),
        }
    }

    /// Build from a species namespace. Animals must define
    /// `INACTIVE_GROW_WITH` and `ATTACK`; plants may omit them.
    pub fn from_properties(props: &Properties, kind: Kind) -> Result<Self> {
        let grow_with = props.get_i32("GROW_WITH")?;
        let (inactive_grow_with, attack) = if kind.is_animal() {
            (props.get_i32("INACTIVE_GROW_WITH")?, props.get_i32("ATTACK")?)
        } else {
            (grow_with / 2, props.get_or("ATTACK", 0) as i32)
        };

        Ok(Self {
            size: props.get_i32("SIZE")?,
            energy: props.get_i32("ENERGY")?,
            adult_size: props.get_i32("ADULT_SIZE")?,
            grow_with,
            inactive_grow_with,
            energy_increase: props.get_i32("ENERGY_INCREASE")?,
            attack,
            defence: props.get_i32("DEFENCE")?,
            grow_period_ms: props.get_millis("GROW_PERIOD")?,
            evolve_period_ms: props.get_millis("EVOLVE_PERIOD")?,
            replicate_period_ms: props.get_millis("REPLICATE_PERIOD")?,
            feed_period_ms: props.get_millis("FEED_PERIOD")?,
        })
    }
}

/// Quotas and period of the creature spawner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnerConfig {
    pub creation_period_ms: u64,
    pub plants_per_cycle: usize,
    pub herbivores_per_cycle: usize,
    pub predators_per_cycle: usize,
}

impl Default for SpawnerConfig {
    fn default() -> Self {
        Self {
            creation_period_ms: 2000,
            plants_per_cycle: 3,
            herbivores_per_cycle: 1,
            predators_per_cycle: 1,
        }
    }
}

impl SpawnerConfig {
    pub fn from_properties(props: &Properties) -> Result<Self> {
        Ok(Self {
            creation_period_ms: props.get_millis("CREATION_PERIOD")?,
            plants_per_cycle: props.get_usize("PLANTS_PER_CYCLE")?,
            herbivores_per_cycle: props.get_usize("HERBIVORES_PER_CYCLE")?,
            predators_per_cycle: props.get_usize("PREDATORS_PER_CYCLE")?,
        })
    }

    pub fn quota(&self, kind: Kind) -> usize {
        match kind {
            Kind::Plant => self.plants_per_cycle,
            Kind::Herbivore => self.herbivores_per_cycle,
            Kind::Predator => self.predators_per_cycle,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayNightConfig {
    /// Length of one day (and of one night) in milliseconds
    pub day_duration_ms: u64,
}

impl Default for DayNightConfig {
    fn default() -> Self {
        Self {
            day_duration_ms: 10_000,
        }
    }
}

impl DayNightConfig {
    pub fn from_properties(props: &Properties) -> Result<Self> {
        Ok(Self {
            day_duration_ms: props.get_millis("DAY_DURATION")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Largest amount of water a single rain drops on each cell
    pub rain_max_value: i32,
    /// Largest side length of the rained-on square
    pub rain_area: i32,
    pub rain_min_interval_ms: u64,
    pub rain_max_interval_ms: u64,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            rain_max_value: 10,
            rain_area: 4,
            rain_min_interval_ms: 1000,
            rain_max_interval_ms: 5000,
        }
    }
}

impl WeatherConfig {
    pub fn from_properties(props: &Properties) -> Result<Self> {
        let config = Self {
            rain_max_value: props.get_i32("RAIN_MAX_VALUE")?,
            rain_area: props.get_i32("RAIN_AREA")?,
            rain_min_interval_ms: props.get_millis("RAIN_MIN_INTERVAL")?,
            rain_max_interval_ms: props.get_millis("RAIN_MAX_INTERVAL")?,
        };

        if config.rain_max_value < 1 {
            return Err(props.invalid("RAIN_MAX_VALUE", config.rain_max_value as i64));
        }
        if config.rain_area < 1 {
            return Err(props.invalid("RAIN_AREA", config.rain_area as i64));
        }
        if config.rain_max_interval_ms < config.rain_min_interval_ms {
            return Err(props.invalid("RAIN_MAX_INTERVAL", config.rain_max_interval_ms as i64));
        }
        Ok(config)
    }
}

/// Everything a world and its drivers need
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub world: WorldConfig,
    pub plants: BiologyConfig,
    pub herbivores: BiologyConfig,
    pub predators: BiologyConfig,
    pub spawner: SpawnerConfig,
    pub day_night: DayNightConfig,
    pub weather: WeatherConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            world: WorldConfig::default(),
            plants: BiologyConfig::plant(),
            herbivores: BiologyConfig::herbivore(),
            predators: BiologyConfig::predator(),
            spawner: SpawnerConfig::default(),
            day_night: DayNightConfig::default(),
            weather: WeatherConfig::default(),
        }
    }
}

impl SimulationConfig {
    pub fn from_store(store: &ConfigStore) -> Result<Self> {
        Ok(Self {
            world: WorldConfig::from_properties(store.namespace(WORLD_NAMESPACE)?)?,
            plants: BiologyConfig::from_properties(
                store.namespace(PLANTS_NAMESPACE)?,
                Kind::Plant,
            )?,
            herbivores: BiologyConfig::from_properties(
                store.namespace(HERBIVORES_NAMESPACE)?,
                Kind::Herbivore,
            )?,
            predators: BiologyConfig::from_properties(
                store.namespace(PREDATORS_NAMESPACE)?,
                Kind::Predator,
            )?,
            spawner: SpawnerConfig::from_properties(store.namespace(CREATOR_NAMESPACE)?)?,
            day_night: DayNightConfig::from_properties(store.namespace(DAY_NIGHT_NAMESPACE)?)?,
            weather: WeatherConfig::from_properties(store.namespace(WEATHER_NAMESPACE)?)?,
        })
    }

    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self> {
        Self::from_store(&ConfigStore::load_dir(dir)?)
    }

    pub fn biology(&self, kind: Kind) -> &BiologyConfig {
        match kind {
            Kind::Plant => &self.plants,
            Kind::Herbivore => &self.herbivores,
            Kind::Predator => &self.predators,
        }
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server bind address
    pub bind_address: String,
    /// Server port
    pub port: u16,
    /// Directory holding the property files
    pub config_dir: String,
    /// OpenTelemetry endpoint
    pub otel_endpoint: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 8080,
            config_dir: "./config".to_string(),
            otel_endpoint: None,
        }
    }
}

impl ServerConfig {
    /// Defaults overridden by `ECO_BIND_ADDRESS`, `ECO_PORT`, `ECO_CONFIG_DIR`
    /// and `OTEL_EXPORTER_OTLP_ENDPOINT`
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(address) = std::env::var("ECO_BIND_ADDRESS") {
            config.bind_address = address;
        }
        if let Ok(port) = std::env::var("ECO_PORT") {
            config.port = port.parse().map_err(|_| Error::InvalidValue {
                namespace: "server".to_string(),
                key: "ECO_PORT".to_string(),
                value: port.clone(),
            })?;
        }
        if let Ok(dir) = std::env::var("ECO_CONFIG_DIR") {
            config.config_dir = dir;
        }
        config.otel_endpoint = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT").ok();

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world_properties() -> Properties {
        Properties::from_pairs(
            WORLD_NAMESPACE,
            [
                ("BOARD_SIZE", 10),
                ("CELL_WATER", 5),
                ("MAX_CELL_WATER_LEVEL", 20),
                ("CELL_PLANTS", 5),
                ("CELL_ANIMALS", 5),
                ("MAX_PLANTS", 60),
                ("MAX_ANIMALS", 40),
                ("MOVE_ATTEMPTS", 3),
                ("MOVE_BACKOFF", 50),
            ],
        )
    }

    #[test]
    fn test_default_configs() {
        let world = WorldConfig::default();
        assert_eq!(world.board_size, 10);
        assert_eq!(world.cell_water, 5);
        assert_eq!(world.max_cell_water, 20);

        let config = SimulationConfig::default();
        assert_eq!(config.biology(Kind::Plant).attack, 0);
        assert!(config.biology(Kind::Predator).attack > config.biology(Kind::Herbivore).defence);
        assert!(config.biology(Kind::Herbivore).attack > config.biology(Kind::Plant).defence);
    }

    #[test]
    fn test_parse_properties() {
        let text = "# world\n\nBOARD_SIZE=10\n! legacy comment\nCELL_WATER : 5\n  MAX_PLANTS = 60  \n";
        let props = Properties::parse("world", text).unwrap();

        assert_eq!(props.len(), 3);
        assert_eq!(props.get("BOARD_SIZE").unwrap(), 10);
        assert_eq!(props.get("CELL_WATER").unwrap(), 5);
        assert_eq!(props.get("MAX_PLANTS").unwrap(), 60);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = Properties::parse("world", "BOARD_SIZE\n").unwrap_err();
        assert!(matches!(err, Error::Parse(_)));

        let err = Properties::parse("world", "BOARD_SIZE=ten\n").unwrap_err();
        match err {
            Error::InvalidValue { key, value, .. } => {
                assert_eq!(key, "BOARD_SIZE");
                assert_eq!(value, "ten");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_key_is_named() {
        let props = Properties::new("world");
        let err = props.get("INVALID_KEY").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing configuration key INVALID_KEY in namespace 'world'"
        );
    }

    #[test]
    fn test_world_config_from_properties() {
        let config = WorldConfig::from_properties(&world_properties()).unwrap();
        assert_eq!(config, WorldConfig::default());
        assert_eq!(config.cell_capacity(Kind::Plant), 5);
        assert_eq!(config.global_capacity(Kind::Predator), 40);
    }

    #[test]
    fn test_world_config_rejects_empty_board() {
        let mut props = world_properties();
        props.values.insert("BOARD_SIZE".to_string(), 0);
        assert!(WorldConfig::from_properties(&props).is_err());

        props.values.insert("BOARD_SIZE".to_string(), -3);
        assert!(matches!(
            WorldConfig::from_properties(&props),
            Err(Error::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_move_attempts_out_of_range_is_rejected() {
        let mut props = world_properties();
        props
            .values
            .insert("MOVE_ATTEMPTS".to_string(), i64::from(u32::MAX) + 1);
        match WorldConfig::from_properties(&props) {
            Err(Error::InvalidValue { key, value, .. }) => {
                assert_eq!(key, "MOVE_ATTEMPTS");
                assert_eq!(value, "4294967296");
            }
            other => panic!("expected invalid value, got {:?}", other),
        }

        props.values.insert("MOVE_ATTEMPTS".to_string(), -1);
        assert!(WorldConfig::from_properties(&props).is_err());
    }

    #[test]
    fn test_animal_biology_requires_attack() {
        let props = Properties::from_pairs(
            HERBIVORES_NAMESPACE,
            [
                ("SIZE", 2),
                ("ENERGY", 10),
                ("ADULT_SIZE", 12),
                ("GROW_WITH", 2),
                ("INACTIVE_GROW_WITH", 1),
                ("ENERGY_INCREASE", 1),
                ("DEFENCE", 2),
                ("GROW_PERIOD", 1000),
                ("EVOLVE_PERIOD", 6000),
                ("REPLICATE_PERIOD", 5000),
                ("FEED_PERIOD", 1500),
            ],
        );

        let err = BiologyConfig::from_properties(&props, Kind::Herbivore).unwrap_err();
        assert!(err.to_string().contains("ATTACK"));
    }

    #[test]
    fn test_plant_biology_derives_night_growth() {
        let props = Properties::from_pairs(
            PLANTS_NAMESPACE,
            [
                ("SIZE", 1),
                ("ENERGY", 5),
                ("ADULT_SIZE", 10),
                ("GROW_WITH", 4),
                ("ENERGY_INCREASE", 2),
                ("DEFENCE", 1),
                ("GROW_PERIOD", 1000),
                ("EVOLVE_PERIOD", 5000),
                ("REPLICATE_PERIOD", 3000),
                ("FEED_PERIOD", 1000),
            ],
        );

        let biology = BiologyConfig::from_properties(&props, Kind::Plant).unwrap();
        assert_eq!(biology.inactive_grow_with, 2);
        assert_eq!(biology.attack, 0);
    }

    #[test]
    fn test_zero_period_is_invalid() {
        let props = Properties::from_pairs(DAY_NIGHT_NAMESPACE, [("DAY_DURATION", 0)]);
        assert!(DayNightConfig::from_properties(&props).is_err());
    }

    #[test]
    fn test_store_reports_missing_namespace() {
        let mut store = ConfigStore::new();
        store.insert(world_properties());

        assert!(store.namespace(WORLD_NAMESPACE).is_ok());
        let err = SimulationConfig::from_store(&store).unwrap_err();
        assert!(matches!(err, Error::MissingNamespace(ref ns) if ns == PLANTS_NAMESPACE));
    }

    #[test]
    fn test_simulation_config_serialization() {
        let config = SimulationConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: SimulationConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_shipped_files_match_defaults() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../config");
        let config = SimulationConfig::load_dir(dir).unwrap();
        assert_eq!(config, SimulationConfig::default());
    }
}
