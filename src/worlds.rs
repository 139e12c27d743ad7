//! Named visualization parameter presets ("worlds") and their registry.

use std::collections::HashMap;

/// A named preset of visualization parameters. Immutable once registered.
#[derive(Debug, Clone, PartialEq)]
pub struct WorldConfig {
    pub name: String,

    /// Base wireframe color (linear RGB, each channel in [0,1])
    pub color_scheme: [f32; 3],

    /// Effective dimensionality (3.0 = flat 3D feel, 4.0 = full hyper)
    pub dimensionality: f32,

    /// Base rotation speed (radians/second before plane weights)
    pub rotation_speed_base: f32,

    /// Global warp multiplier on projected space
    pub universe_modifier: f32,

    /// Line emphasis of the active pattern
    pub pattern_intensity: f32,

    /// Background lattice density hint for the renderer
    pub grid_density: f32,

    /// Wireframe-vs-field mix in [0,1]
    pub world_blend: f32,

    /// Overall brightness multiplier
    pub world_intensity: f32,

    /// Shape morph progress hint in [0,1]
    pub morph_factor: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            color_scheme: [0.0, 0.85, 1.0],
            dimensionality: 4.0,
            rotation_speed_base: 0.5,
            universe_modifier: 1.0,
            pattern_intensity: 1.0,
            grid_density: 12.0,
            world_blend: 0.5,
            world_intensity: 1.0,
            morph_factor: 0.5,
        }
    }
}

/// Partial world configuration; unset fields fall back to the default
#[derive(Debug, Clone, Default)]
pub struct WorldOverrides {
    pub color_scheme: Option<[f32; 3]>,
    pub dimensionality: Option<f32>,
    pub rotation_speed_base: Option<f32>,
    pub universe_modifier: Option<f32>,
    pub pattern_intensity: Option<f32>,
    pub grid_density: Option<f32>,
    pub world_blend: Option<f32>,
    pub world_intensity: Option<f32>,
    pub morph_factor: Option<f32>,
}

impl WorldConfig {
    /// Merge overrides over the documented default configuration
    pub fn from_overrides(name: &str, overrides: &WorldOverrides) -> Self {
        let base = Self::default();
        Self {
            name: name.to_string(),
            color_scheme: overrides.color_scheme.unwrap_or(base.color_scheme),
            dimensionality: overrides.dimensionality.unwrap_or(base.dimensionality),
            rotation_speed_base: overrides
                .rotation_speed_base
                .unwrap_or(base.rotation_speed_base),
            universe_modifier: overrides
                .universe_modifier
                .unwrap_or(base.universe_modifier),
            pattern_intensity: overrides
                .pattern_intensity
                .unwrap_or(base.pattern_intensity),
            grid_density: overrides.grid_density.unwrap_or(base.grid_density),
            world_blend: overrides.world_blend.unwrap_or(base.world_blend),
            world_intensity: overrides.world_intensity.unwrap_or(base.world_intensity),
            morph_factor: overrides.morph_factor.unwrap_or(base.morph_factor),
        }
    }
}

/// Registry of named world presets. Insertion order is irrelevant; the
/// active world name is tracked by the engine, not here.
#[derive(Debug, Default)]
pub struct WorldStore {
    worlds: HashMap<String, WorldConfig>,
}

impl WorldStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a world, merging overrides over the default config.
    /// Re-adding an existing name overwrites it (last write wins).
    pub fn add_world(&mut self, name: &str, overrides: &WorldOverrides) {
        self.worlds
            .insert(name.to_string(), WorldConfig::from_overrides(name, overrides));
    }

    pub fn get(&self, name: &str) -> Option<&WorldConfig> {
        self.worlds.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.worlds.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.worlds.keys().map(String::as_str)
    }
}

/// Install the built-in presets the visualizer ships with. Names are chosen
/// to land in distinct world-blend buckets of the transition heuristic.
pub fn register_default_worlds(store: &mut WorldStore) {
    store.add_world(
        "hypercube_lattice",
        &WorldOverrides {
            color_scheme: Some([0.0, 0.85, 1.0]),
            rotation_speed_base: Some(0.5),
            world_blend: Some(0.1),
            ..Default::default()
        },
    );
    store.add_world(
        "quantum_flux",
        &WorldOverrides {
            color_scheme: Some([0.75, 0.3, 1.0]),
            dimensionality: Some(3.7),
            rotation_speed_base: Some(0.8),
            pattern_intensity: Some(1.3),
            ..Default::default()
        },
    );
    store.add_world(
        "vortex_spiral",
        &WorldOverrides {
            color_scheme: Some([1.0, 0.45, 0.1]),
            rotation_speed_base: Some(1.1),
            universe_modifier: Some(1.4),
            ..Default::default()
        },
    );
    store.add_world(
        "nebula_drift",
        &WorldOverrides {
            color_scheme: Some([1.0, 0.2, 0.6]),
            rotation_speed_base: Some(0.3),
            grid_density: Some(8.0),
            morph_factor: Some(0.8),
            ..Default::default()
        },
    );
    store.add_world(
        "circuit_grid",
        &WorldOverrides {
            color_scheme: Some([0.2, 1.0, 0.4]),
            dimensionality: Some(3.2),
            rotation_speed_base: Some(0.65),
            grid_density: Some(20.0),
            world_blend: Some(0.9),
            ..Default::default()
        },
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_merge_over_default() {
        let mut store = WorldStore::new();
        store.add_world(
            "test_world",
            &WorldOverrides {
                rotation_speed_base: Some(2.0),
                ..Default::default()
            },
        );

        let world = store.get("test_world").unwrap();
        assert_eq!(world.rotation_speed_base, 2.0);
        // Unset fields keep their defaults
        assert_eq!(world.world_blend, WorldConfig::default().world_blend);
        assert_eq!(world.name, "test_world");
    }

    #[test]
    fn test_last_write_wins() {
        let mut store = WorldStore::new();
        store.add_world(
            "w",
            &WorldOverrides {
                grid_density: Some(5.0),
                ..Default::default()
            },
        );
        store.add_world(
            "w",
            &WorldOverrides {
                grid_density: Some(9.0),
                ..Default::default()
            },
        );

        assert_eq!(store.get("w").unwrap().grid_density, 9.0);
    }

    #[test]
    fn test_unknown_world_is_none() {
        let store = WorldStore::new();
        assert!(store.get("nope").is_none());
        assert!(!store.contains("nope"));
    }

    #[test]
    fn test_default_worlds_registered() {
        let mut store = WorldStore::new();
        register_default_worlds(&mut store);

        assert!(store.contains("hypercube_lattice"));
        assert!(store.contains("circuit_grid"));
        assert_eq!(store.names().count(), 5);
    }
}
