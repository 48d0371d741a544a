use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("waypoints-navigator: Invalid argument: {}", .0)]
    InvalidArgument(String),
    #[error("waypoints-navigator: Pose unavailable ({}).", .0)]
    PoseUnavailable(#[source] nav_interface::Error),
    #[error("waypoints-navigator: nav-interface: {:?}", .0)]
    NavInterface(#[from] nav_interface::Error),
    #[error("waypoints-navigator: No File {:?} is found ({}).", .0, .1)]
    NoFile(PathBuf, #[source] std::io::Error),
    #[error("waypoints-navigator: Failed to write {:?} ({}).", .0, .1)]
    WriteFailure(PathBuf, #[source] std::io::Error),
    #[error("waypoints-navigator: Failed to parse {:?} as toml ({}).", .0, .1)]
    TomlParseFailure(PathBuf, #[source] toml::de::Error),
    #[error("waypoints-navigator: Failed to serialize config as toml ({}).", .0)]
    TomlSerializeFailure(#[source] toml::ser::Error),
}
