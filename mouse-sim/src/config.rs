use std::{collections::BTreeMap, fs, path::Path};

use mouse_motion::{
    config::MotionProfileConfig,
    geometry::{TurnParameters, TurnTable},
    movement::{Movement, PathLanguage},
};
use serde::Deserialize;

use crate::DynError;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimConfig {
    /// Maximum force applied on the tires, in newtons
    pub force: f32,
    /// Use the speed run profile instead of the search one
    #[serde(default)]
    pub run: bool,
    pub sequence: String,
    #[serde(default)]
    pub language: Language,
    #[serde(default)]
    pub profile: ProfileOverrides,
    #[serde(default)]
    pub maze: MazeConfig,
    #[serde(default)]
    pub turns: BTreeMap<String, TurnEntry>,
    /// JSON lines trace of every maneuver and control tick
    pub trace: Option<String>,
}

#[derive(Debug, Default, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    #[default]
    Safe,
    Diagonals,
}

impl From<Language> for PathLanguage {
    fn from(language: Language) -> Self {
        match language {
            Language::Safe => PathLanguage::Safe,
            Language::Diagonals => PathLanguage::Diagonals,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProfileOverrides {
    pub linear_acceleration: Option<f32>,
    pub linear_deceleration: Option<f32>,
    pub max_linear_speed: Option<f32>,
    pub angular_acceleration_scale: Option<f32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MazeConfig {
    /// Cell boundaries with a wall across the corridor, from the start cell back wall
    #[serde(default)]
    pub walls_at: Vec<u32>,
    /// Side wall distances, missing means no wall
    pub side_left: Option<f32>,
    pub side_right: Option<f32>,
    /// Encoder position at which a collision is reported, in micrometers
    pub collide_at: Option<i32>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TurnEntry {
    pub before: f32,
    pub after: f32,
    pub radius: f32,
}

pub fn turn_from_name(name: &str) -> Option<Movement> {
    let turn = match name {
        "left" => Movement::Left,
        "right" => Movement::Right,
        "left_90" => Movement::Left90,
        "right_90" => Movement::Right90,
        "left_180" => Movement::Left180,
        "right_180" => Movement::Right180,
        "left_to_45" => Movement::LeftTo45,
        "right_to_45" => Movement::RightTo45,
        "left_to_135" => Movement::LeftTo135,
        "right_to_135" => Movement::RightTo135,
        "left_from_45" => Movement::LeftFrom45,
        "right_from_45" => Movement::RightFrom45,
        "left_from_135" => Movement::LeftFrom135,
        "right_from_135" => Movement::RightFrom135,
        "left_diagonal" => Movement::LeftDiagonal,
        "right_diagonal" => Movement::RightDiagonal,
        _ => return None,
    };
    Some(turn)
}

impl SimConfig {
    pub fn load(path: &Path) -> Result<Self, DynError> {
        let text = fs::read_to_string(path).map_err(|e| format!("Unable to read {}: {}", path.display(), e))?;
        let config: SimConfig = toml::from_str(&text)?;
        Ok(config)
    }

    pub fn motion_profile(&self) -> Result<MotionProfileConfig, DynError> {
        let defaults = MotionProfileConfig::from_force(self.force, self.run);
        let overrides = &self.profile;
        let profile = MotionProfileConfig {
            linear_acceleration: overrides.linear_acceleration.unwrap_or(defaults.linear_acceleration),
            linear_deceleration: overrides.linear_deceleration.unwrap_or(defaults.linear_deceleration),
            max_linear_speed: overrides.max_linear_speed.unwrap_or(defaults.max_linear_speed),
            angular_acceleration_scale: overrides
                .angular_acceleration_scale
                .unwrap_or(defaults.angular_acceleration_scale),
        };
        if !profile.is_valid() {
            Err(format!("Invalid motion profile: {:?}", profile))?;
        }
        Ok(profile)
    }

    pub fn turn_table(&self) -> Result<TurnTable, DynError> {
        let mut table = TurnTable::default();
        for (name, entry) in &self.turns {
            let turn = turn_from_name(name).ok_or_else(|| format!("Unknown turn: {}", name))?;
            table.set(turn, TurnParameters::new(entry.before, entry.after, entry.radius));
        }
        Ok(table)
    }
}
