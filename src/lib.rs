//! Reads a transport network's modes, its zoning and its travel demand into an in-memory model
//! for traffic assignment.

// imports of other modules from this crate
mod config_utils;

mod error;
pub use error::InputError;

mod xml_tree;
pub use xml_tree::XmlElement;

mod registry;
pub use registry::{DuplicatePolicies, DuplicatePolicy, IdRegistry, Registry, SourceId};

mod network;
pub use network::{read_network_modes, Mode, DEFAULT_MODE_ID};

mod zoning;
pub use zoning::{read_zones_csv, read_zones_csv_from_reader, read_zones_xml, Zone};

pub mod parse_tree;

mod demand_config;
pub use demand_config::{resolve_demand_configuration, DurationUnit, TimePeriod, TravelerType,
                        UserClass, DEFAULT_TRAVELER_TYPE_ID, DEFAULT_USER_CLASS_ID};

mod od_matrix;
pub use od_matrix::{decode_od_matrix, split_on_separator};

mod demands;
pub use demands::{assemble_demands, read_demands, DemandKey, DemandMatrix, Demands};

mod input;
pub use input::{InputConfig, PlanitInput};

#[cfg(test)]
mod test_utils;
