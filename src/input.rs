use std::path::{Path, PathBuf};

use yaml_rust::{Yaml, YamlLoader};

use super::config_utils;
use super::demands::{self, Demands};
use super::network;
use super::registry::{DuplicatePolicies, DuplicatePolicy, Registry};
use super::xml_tree::XmlElement;
use super::zoning;
use super::InputError;


/// Where the inputs live and how strictly duplicate ids are treated.
#[derive(PartialEq, Debug, Clone)]
pub struct InputConfig {
    pub network_path: PathBuf,
    pub zoning_path: PathBuf,
    pub demand_path: PathBuf,
    pub policies: DuplicatePolicies,
}

fn yaml_path(yaml_cfg: &Yaml, key: &str, base_dir: &Path) -> Result<PathBuf, InputError> {
    match yaml_cfg[key].as_str() {
        Some(path_str) => Ok(config_utils::str_to_absolute_path(path_str, base_dir)),
        None => Err(InputError::Config(format!("no {} given", key))),
    }
}

fn yaml_policy(policies_cfg: &Yaml, key: &str) -> Result<DuplicatePolicy, InputError> {
    if policies_cfg[key].is_badvalue() {
        return Ok(DuplicatePolicy::default());
    }
    match policies_cfg[key].as_str() {
        Some(value) => DuplicatePolicy::from_config_str(value),
        None => Err(InputError::Config(format!("duplicate_ids.{} must be a string", key))),
    }
}

impl InputConfig {
    pub fn from_yaml_path(config_path: &Path) -> Result<InputConfig, InputError> {
        let file_contents = std::fs::read_to_string(config_path)?;
        let base_dir = config_path.parent().unwrap_or_else(|| Path::new("."));
        Self::from_yaml_str(&file_contents, base_dir)
    }

    /// Parses the yaml config. Relative input paths are resolved against `base_dir`.
    pub fn from_yaml_str(yaml: &str, base_dir: &Path) -> Result<InputConfig, InputError> {
        let docs = YamlLoader::load_from_str(yaml)
            .map_err(|err| InputError::Config(format!("failed to parse config as yaml: {}", err)))?;
        let yaml_cfg = docs.first()
                           .ok_or_else(|| InputError::Config(String::from("config is empty")))?;

        let policies_cfg = &yaml_cfg["duplicate_ids"];
        let policies = DuplicatePolicies {
            modes: yaml_policy(policies_cfg, "modes")?,
            zones: yaml_policy(policies_cfg, "zones")?,
            traveler_types: yaml_policy(policies_cfg, "traveler_types")?,
            user_classes: yaml_policy(policies_cfg, "user_classes")?,
            time_periods: yaml_policy(policies_cfg, "time_periods")?,
            demands: yaml_policy(policies_cfg, "demands")?,
        };

        Ok(InputConfig {
            network_path: yaml_path(yaml_cfg, "network_path", base_dir)?,
            zoning_path: yaml_path(yaml_cfg, "zoning_path", base_dir)?,
            demand_path: yaml_path(yaml_cfg, "demand_path", base_dir)?,
            policies,
        })
    }
}

fn is_csv(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map_or(false, |ext| ext.eq_ignore_ascii_case("csv"))
}

/// The fully read inputs: every registered entity plus the demand matrices.
#[derive(Debug, Clone)]
pub struct PlanitInput {
    pub registry: Registry,
    pub demands: Demands,
}

impl PlanitInput {
    pub fn from_cfg(config_path: &Path) -> Result<PlanitInput, InputError> {
        let cfg = InputConfig::from_yaml_path(config_path)?;
        Self::from_files(&cfg)
    }

    /// Reads network, zoning and demand in that order; each stage resolves references against
    /// what the previous stages registered.
    pub fn from_files(cfg: &InputConfig) -> Result<PlanitInput, InputError> {
        let mut registry = Registry::new(cfg.policies);

        log::info!("Reading network from {}", cfg.network_path.display());
        let network_root = XmlElement::from_path(&cfg.network_path)?;
        network::read_network_modes(&network_root, &mut registry)?;

        log::info!("Reading zoning from {}", cfg.zoning_path.display());
        if is_csv(&cfg.zoning_path) {
            zoning::read_zones_csv(&cfg.zoning_path, &mut registry)?;
        } else {
            let zoning_root = XmlElement::from_path(&cfg.zoning_path)?;
            zoning::read_zones_xml(&zoning_root, &mut registry)?;
        }

        log::info!("Reading demands from {}", cfg.demand_path.display());
        let demand_root = XmlElement::from_path(&cfg.demand_path)?;
        let demands = demands::read_demands(&demand_root, &mut registry)?;

        Ok(PlanitInput {registry, demands})
    }

    pub fn from_xml(network_xml: &str, zoning_xml: &str, demand_xml: &str,
                    policies: DuplicatePolicies) -> Result<PlanitInput, InputError> {
        let mut registry = Registry::new(policies);
        network::read_network_modes(&XmlElement::from_xml_str(network_xml)?, &mut registry)?;
        zoning::read_zones_xml(&XmlElement::from_xml_str(zoning_xml)?, &mut registry)?;
        let demands = demands::read_demands(&XmlElement::from_xml_str(demand_xml)?,
                                            &mut registry)?;
        Ok(PlanitInput {registry, demands})
    }
}
