use std::path::Path;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::Error;

fn default_max_distance_to_allow_skip_waypoint() -> f64 {
    -1.0
}

fn default_min_timesteps_confirm_skip_waypoints() -> u32 {
    1
}

fn default_waypoint_angle_tolerance() -> f64 {
    5.0
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct WaypointsNavigatorConfig {
    /// Max distance to `foresee` waypoints [meters]. (<=0: unlimited)
    #[serde(default = "default_max_distance_to_allow_skip_waypoint")]
    pub max_distance_to_allow_skip_waypoint: f64,
    /// Min timesteps a `future` waypoint must be seen as reachable to become the active one.
    #[serde(default = "default_min_timesteps_confirm_skip_waypoints")]
    pub min_timesteps_confirm_skip_waypoints: u32,
    /// Angular error tolerance for waypoints with an assigned heading [deg] (Default: 5 deg)
    #[serde(default = "default_waypoint_angle_tolerance")]
    pub waypoint_angle_tolerance: f64,
}

impl Default for WaypointsNavigatorConfig {
    fn default() -> Self {
        Self {
            max_distance_to_allow_skip_waypoint: default_max_distance_to_allow_skip_waypoint(),
            min_timesteps_confirm_skip_waypoints: default_min_timesteps_confirm_skip_waypoints(),
            waypoint_angle_tolerance: default_waypoint_angle_tolerance(),
        }
    }
}

impl WaypointsNavigatorConfig {
    pub fn try_new<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        Self::from_toml_str(
            &std::fs::read_to_string(&path)
                .map_err(|e| Error::NoFile(path.as_ref().to_owned(), e))?,
            path,
        )
    }

    /// `path` is only used for error reporting.
    pub fn from_toml_str<P: AsRef<Path>>(s: &str, path: P) -> Result<Self, Error> {
        let config: Self =
            toml::from_str(s).map_err(|e| Error::TomlParseFailure(path.as_ref().to_owned(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values the navigator can not work with.
    pub fn validate(&self) -> Result<(), Error> {
        if !self.max_distance_to_allow_skip_waypoint.is_finite() {
            return Err(Error::InvalidArgument(format!(
                "max_distance_to_allow_skip_waypoint must be finite, got {}",
                self.max_distance_to_allow_skip_waypoint
            )));
        }
        if !(self.waypoint_angle_tolerance.is_finite() && self.waypoint_angle_tolerance >= 0.0) {
            return Err(Error::InvalidArgument(format!(
                "waypoint_angle_tolerance must be a non-negative angle in degrees, got {}",
                self.waypoint_angle_tolerance
            )));
        }
        Ok(())
    }

    pub fn to_toml_string(&self) -> Result<String, Error> {
        toml::to_string(self).map_err(Error::TomlSerializeFailure)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        std::fs::write(&path, self.to_toml_string()?)
            .map_err(|e| Error::WriteFailure(path.as_ref().to_owned(), e))
    }

    /// Falls back to the default tolerance if `waypoint_angle_tolerance` is
    /// negative or not finite.
    pub fn waypoint_angle_tolerance_rad(&self) -> f64 {
        if self.waypoint_angle_tolerance.is_finite() && self.waypoint_angle_tolerance >= 0.0 {
            self.waypoint_angle_tolerance.to_radians()
        } else {
            default_waypoint_angle_tolerance().to_radians()
        }
    }

    /// Whether `max_distance_to_allow_skip_waypoint` limits the look-ahead.
    pub fn has_skip_distance_limit(&self) -> bool {
        self.max_distance_to_allow_skip_waypoint > 0.0
    }
}
