use std::collections::HashMap;
use std::fmt;

use ndarray::prelude::*;

use super::demand_config;
use super::od_matrix;
use super::parse_tree::{XmlMacroscopicDemand, XmlOdMatrix};
use super::registry::{DuplicatePolicy, Registry};
use super::xml_tree::XmlElement;
use super::zoning::Zone;
use super::InputError;


/// A demand matrix is scoped to exactly one mode and one time period.
#[derive(PartialEq, Eq, Hash, Debug, Clone, PartialOrd, Ord)]
pub struct DemandKey {
    pub mode_id: String,
    pub time_period_id: String,
}

impl DemandKey {
    pub fn new(mode_id: &str, time_period_id: &str) -> DemandKey {
        DemandKey {
            mode_id: String::from(mode_id),
            time_period_id: String::from(time_period_id),
        }
    }
}

impl fmt::Display for DemandKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "(mode '{}', time period '{}')", self.mode_id, self.time_period_id)
    }
}

/// PCU-scaled demand between every pair of zones, indexed by zone ordinal. Cells that were
/// never written hold zero.
#[derive(PartialEq, Debug, Clone)]
pub struct DemandMatrix {
    key: DemandKey,
    demands: Array<f64, Ix2>,
}

impl DemandMatrix {
    pub fn new(key: DemandKey, num_zones: usize) -> DemandMatrix {
        DemandMatrix {
            key,
            demands: Array::zeros((num_zones, num_zones)),
        }
    }

    pub fn key(&self) -> &DemandKey {
        &self.key
    }

    pub fn num_zones(&self) -> usize {
        self.demands.nrows()
    }

    pub fn set(&mut self, origin: &Zone, destination: &Zone, value: f64) {
        self.demands[[origin.ordinal, destination.ordinal]] = value;
    }

    pub fn get(&self, origin: &Zone, destination: &Zone) -> f64 {
        self.get_by_ordinal(origin.ordinal, destination.ordinal)
    }

    pub fn get_by_ordinal(&self, origin: usize, destination: usize) -> f64 {
        self.demands[[origin, destination]]
    }

    pub fn total(&self) -> f64 {
        self.demands.sum()
    }

    /// Total demand leaving each origin.
    pub fn origin_totals(&self) -> Array<f64, Ix1> {
        self.demands.sum_axis(Axis(1))
    }

    /// Total demand arriving at each destination.
    pub fn destination_totals(&self) -> Array<f64, Ix1> {
        self.demands.sum_axis(Axis(0))
    }

    pub fn as_array(&self) -> &Array<f64, Ix2> {
        &self.demands
    }
}

/// The complete set of demand matrices, at most one per (mode, time period).
#[derive(PartialEq, Debug, Clone, Default)]
pub struct Demands {
    matrices: HashMap<DemandKey, DemandMatrix>,
}

impl Demands {
    pub fn new() -> Demands {
        Demands::default()
    }

    pub fn get(&self, mode_id: &str, time_period_id: &str) -> Option<&DemandMatrix> {
        self.matrices.get(&DemandKey::new(mode_id, time_period_id))
    }

    pub fn get_by_key(&self, key: &DemandKey) -> Option<&DemandMatrix> {
        self.matrices.get(key)
    }

    /// Stores a completed matrix. Returns true if a matrix was already registered for its key;
    /// the new matrix replaces it either way.
    pub fn register(&mut self, matrix: DemandMatrix) -> bool {
        self.matrices.insert(matrix.key().clone(), matrix).is_some()
    }

    pub fn len(&self) -> usize {
        self.matrices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matrices.is_empty()
    }

    /// Keys in sorted order, so that iteration is deterministic.
    pub fn keys(&self) -> Vec<&DemandKey> {
        let mut keys: Vec<&DemandKey> = self.matrices.keys().collect();
        keys.sort();
        keys
    }

    pub fn iter(&self) -> impl Iterator<Item = &DemandMatrix> {
        self.keys().into_iter().map(move |key| &self.matrices[key])
    }
}

/// Reads the demand section of a document: resolves the demand configuration into `registry`,
/// then assembles the OD matrices. Modes and zones must already be registered.
pub fn read_demands(root: &XmlElement, registry: &mut Registry) -> Result<Demands, InputError> {
    let demand = XmlMacroscopicDemand::from_xml_element(root)?;
    demand_config::resolve_demand_configuration(&demand.demand_configuration, registry)?;
    let demands = assemble_demands(&demand.od_matrices, registry)?;
    log::info!("Read {} demand matrices", demands.len());
    Ok(demands)
}

/// Decodes every OD matrix element, in document order, into its (mode, time period) matrix.
pub fn assemble_demands(od_matrices: &[XmlOdMatrix], registry: &Registry)
                        -> Result<Demands, InputError> {
    let mut demands = Demands::new();
    for (ii, od_matrix) in od_matrices.iter().enumerate() {
        let label = format!("<{}> #{}", od_matrix.values.element_name(), ii + 1);
        assemble_matrix(od_matrix, &label, registry, &mut demands)?;
    }
    Ok(demands)
}

fn assemble_matrix(od_matrix: &XmlOdMatrix, label: &str, registry: &Registry,
                   demands: &mut Demands) -> Result<(), InputError> {
    let user_class = match &od_matrix.user_class_ref {
        Some(uc_ref) => registry.user_classes.lookup(uc_ref, label)?,
        None => registry.user_classes.sole_entry(label)?,
    };
    let time_period = registry.time_periods.lookup(&od_matrix.time_period_ref, label)?;
    let mode = registry.modes.lookup(&user_class.mode_id, label)?;

    let key = DemandKey::new(&mode.id, &time_period.id);
    let mut matrix = match demands.get_by_key(&key) {
        Some(existing) => existing.clone(),
        None => DemandMatrix::new(key.clone(), registry.zones.len()),
    };
    log::debug!("Decoding {} into demand matrix {}", label, key);
    od_matrix::decode_od_matrix(&od_matrix.values, mode.pcu, &registry.zones, &mut matrix,
                                label)?;

    if demands.register(matrix) {
        match registry.policies.demands {
            DuplicatePolicy::Abort => return Err(InputError::DuplicateId {
                kind: "demand matrix",
                id: key.to_string(),
            }),
            DuplicatePolicy::Warn => {
                log::warn!("{} is a second matrix for {}, merged into the first", label, key);
            }
        }
    }
    Ok(())
}
