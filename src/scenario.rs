use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, ensure, Context, Result};
use serde::Deserialize;

use crate::{
    components::{Range, Spawner, Transform},
    ecs::{Entity, World},
    engine::{Engine, EngineBuilder, EngineSettings},
    rng::RngManager,
    systems::{DrawListSystem, ExpirationSystem, LifetimeSystem, MovementSystem, SpawnerSystem},
};

/// Shortest accepted spawner interval, in seconds.
pub const MIN_SPAWN_INTERVAL: f32 = 0.001;

/// Largest accepted number of entities per spawner burst.
pub const MAX_BURST: u32 = 10_000;

fn default_frames() -> u64 {
    240
}

fn default_frame_dt() -> f32 {
    1.0 / 60.0
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_burst() -> u32 {
    1
}

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub description: Option<String>,
    pub seed: u64,
    #[serde(default = "default_frames")]
    pub frames: u64,
    #[serde(default = "default_frame_dt")]
    pub frame_dt: f32,
    #[serde(default)]
    pub report_interval_frames: u64,
    #[serde(default)]
    pub logging: LoggingConfig,
    pub spawners: Vec<ScenarioSpawner>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioSpawner {
    pub tag: String,
    #[serde(default)]
    pub position: [f32; 2],
    pub interval: f32,
    #[serde(default = "default_burst")]
    pub burst: u32,
    pub lifetime: RangeConfig,
    pub speed: RangeConfig,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RangeConfig {
    pub min: f32,
    pub max: f32,
}

impl From<RangeConfig> for Range {
    fn from(value: RangeConfig) -> Self {
        Range::new(value.min, value.max)
    }
}

pub struct ScenarioLoader {
    base_dir: PathBuf,
}

impl ScenarioLoader {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self, file: impl AsRef<Path>) -> Result<Scenario> {
        let path = self.base_dir.join(file);
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read scenario file {}", path.display()))?;
        let scenario = Scenario::from_yaml(&data)
            .with_context(|| format!("Failed to load {}", path.display()))?;
        Ok(scenario)
    }
}

impl Scenario {
    pub fn from_yaml(text: &str) -> Result<Self> {
        let scenario: Scenario = serde_yaml::from_str(text).context("invalid scenario YAML")?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.frame_dt.is_finite() && self.frame_dt > 0.0,
            "frame_dt must be positive and finite, got {}",
            self.frame_dt
        );
        ensure!(
            !self.spawners.is_empty(),
            "scenario must define at least one spawner"
        );

        let mut tags = HashSet::new();
        for spawner in &self.spawners {
            if !tags.insert(spawner.tag.as_str()) {
                bail!("spawner tag '{}' defined more than once", spawner.tag);
            }
            ensure!(
                spawner.interval.is_finite() && spawner.interval >= MIN_SPAWN_INTERVAL,
                "spawner '{}' interval must be a finite number of at least {MIN_SPAWN_INTERVAL}s, got {}",
                spawner.tag,
                spawner.interval
            );
            ensure!(
                spawner.burst <= MAX_BURST,
                "spawner '{}' burst must not exceed {MAX_BURST}, got {}",
                spawner.tag,
                spawner.burst
            );
            ensure!(
                Range::from(spawner.lifetime).is_valid(),
                "spawner '{}' has an invalid lifetime range",
                spawner.tag
            );
            ensure!(
                Range::from(spawner.speed).is_valid(),
                "spawner '{}' has an invalid speed range",
                spawner.tag
            );
        }
        Ok(())
    }

    pub fn build_world(&self) -> Result<World> {
        let mut world = World::new();
        for spawner in &self.spawners {
            let [x, y] = spawner.position;
            let entity = Entity::with_tag(spawner.tag.clone())
                .with_component(Transform::at(x, y))?
                .with_component(Spawner::new(
                    spawner.interval,
                    spawner.burst,
                    spawner.lifetime.into(),
                    spawner.speed.into(),
                ))?;
            world.add_entity(entity)?;
        }
        Ok(world)
    }

    /// World plus the standard system set, in execution order.
    pub fn build_engine(&self) -> Result<Engine> {
        let mut rng = RngManager::new(self.seed);
        let settings = EngineSettings {
            name: self.name.clone(),
            frame_dt: self.frame_dt,
        };
        let engine = EngineBuilder::new(settings)
            .with_world(self.build_world()?)
            .with_system(LifetimeSystem::new())
            .with_system(ExpirationSystem::new())
            .with_system(SpawnerSystem::new(rng.stream("spawner")))
            .with_system(MovementSystem::new())
            .with_system(DrawListSystem::new())
            .build();
        Ok(engine)
    }

    pub fn frames(&self, override_frames: Option<u64>) -> u64 {
        override_frames.unwrap_or(self.frames)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::LoopPhase;

    const MINIMAL: &str = r#"
name: minimal
seed: 3
spawners:
  - tag: emitter
    interval: 0.5
    lifetime: { min: 1.0, max: 2.0 }
    speed: { min: 0.0, max: 1.0 }
"#;

    #[test]
    fn test_defaults_applied() {
        let scenario = Scenario::from_yaml(MINIMAL).unwrap();
        assert_eq!(scenario.frames, 240);
        assert_eq!(scenario.report_interval_frames, 0);
        assert_eq!(scenario.logging.level, "info");
        assert_eq!(scenario.spawners[0].burst, 1);
        assert_eq!(scenario.spawners[0].position, [0.0, 0.0]);
        assert_eq!(scenario.frames(Some(5)), 5);
        assert_eq!(scenario.frames(None), 240);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let duplicate = format!(
            "{MINIMAL}  - tag: emitter\n    interval: 1.0\n    lifetime: {{ min: 1.0, max: 1.0 }}\n    speed: {{ min: 1.0, max: 1.0 }}\n"
        );
        let err = Scenario::from_yaml(&duplicate).unwrap_err();
        assert!(err.to_string().contains("more than once"));

        let inverted = MINIMAL.replace("min: 1.0, max: 2.0", "min: 3.0, max: 2.0");
        assert!(Scenario::from_yaml(&inverted).is_err());

        let frozen = MINIMAL.replace("interval: 0.5", "interval: 0.0");
        assert!(Scenario::from_yaml(&frozen).is_err());

        let empty = "name: empty\nseed: 1\nspawners: []\n";
        assert!(Scenario::from_yaml(empty).is_err());
    }

    #[test]
    fn test_validation_rejects_runaway_spawn_rates() {
        let tiny = MINIMAL.replace("interval: 0.5", "interval: 0.000000001");
        let err = Scenario::from_yaml(&tiny).unwrap_err();
        assert!(err.to_string().contains("interval must be"));

        let endless = MINIMAL.replace("interval: 0.5", "interval: .inf");
        assert!(Scenario::from_yaml(&endless).is_err());

        let flood = MINIMAL.replace("interval: 0.5", &format!("interval: 0.5\n    burst: {}", MAX_BURST + 1));
        let err = Scenario::from_yaml(&flood).unwrap_err();
        assert!(err.to_string().contains("burst must not exceed"));

        let at_cap = MINIMAL.replace("interval: 0.5", &format!("interval: {MIN_SPAWN_INTERVAL}\n    burst: {MAX_BURST}"));
        assert!(Scenario::from_yaml(&at_cap).is_ok());

        let infinite_step = format!("frame_dt: .inf\n{MINIMAL}");
        assert!(Scenario::from_yaml(&infinite_step).is_err());

        let unbounded = MINIMAL.replace("min: 0.0, max: 1.0", "min: 0.0, max: .inf");
        assert!(Scenario::from_yaml(&unbounded).is_err());
    }

    #[test]
    fn test_build_engine_registers_standard_systems() {
        let scenario = Scenario::from_yaml(MINIMAL).unwrap();
        let engine = scenario.build_engine().unwrap();
        let world = engine.world();

        assert_eq!(
            world.system_names(LoopPhase::Update),
            vec!["lifetime", "expiration", "spawner", "movement"]
        );
        assert_eq!(world.system_names(LoopPhase::Render), vec!["draw_list"]);
        assert!(world.find_by_tag("emitter").is_some());
        assert_eq!(world.entity_count(), 1);
    }
}
