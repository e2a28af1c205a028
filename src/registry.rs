use std::collections::HashMap;

use super::demand_config::{TimePeriod, TravelerType, UserClass};
use super::network::Mode;
use super::zoning::Zone;
use super::InputError;


/// Entities that are identified by the id they were given in the input files.
pub trait SourceId {
    fn source_id(&self) -> &str;
}

/// What to do when an id is registered a second time.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum DuplicatePolicy {
    Abort,
    Warn,
}

impl Default for DuplicatePolicy {
    fn default() -> Self {
        DuplicatePolicy::Abort
    }
}

impl DuplicatePolicy {
    pub fn from_config_str(value: &str) -> Result<DuplicatePolicy, InputError> {
        match value.trim().to_lowercase().as_str() {
            "error" | "abort" => Ok(DuplicatePolicy::Abort),
            "warn" => Ok(DuplicatePolicy::Warn),
            other => Err(InputError::Config(
                format!("unknown duplicate id policy '{}', expected 'error' or 'warn'", other))),
        }
    }
}

/// One duplicate-id policy per registry.
#[derive(PartialEq, Eq, Debug, Clone, Copy, Default)]
pub struct DuplicatePolicies {
    pub modes: DuplicatePolicy,
    pub zones: DuplicatePolicy,
    pub traveler_types: DuplicatePolicy,
    pub user_classes: DuplicatePolicy,
    pub time_periods: DuplicatePolicy,
    pub demands: DuplicatePolicy,
}

/// Insertion-ordered map from source id to entity. Each id can be written once; the position
/// of an entity in insertion order is its ordinal.
#[derive(Debug, Clone)]
pub struct IdRegistry<T> {
    kind: &'static str,
    entries: Vec<T>,
    ordinals_by_id: HashMap<String, usize>,
}

impl<T: SourceId> IdRegistry<T> {
    pub fn new(kind: &'static str) -> IdRegistry<T> {
        IdRegistry {
            kind,
            entries: vec![],
            ordinals_by_id: HashMap::new(),
        }
    }

    pub fn kind(&self) -> &'static str {
        self.kind
    }

    /// Adds the entity unless its id is taken. Returns true if the id was a duplicate, in which
    /// case the registry is left unchanged.
    pub fn register(&mut self, entity: T) -> bool {
        if self.ordinals_by_id.contains_key(entity.source_id()) {
            return true;
        }
        self.ordinals_by_id.insert(entity.source_id().to_string(), self.entries.len());
        self.entries.push(entity);
        false
    }

    pub fn register_unique(&mut self, entity: T, policy: DuplicatePolicy)
                           -> Result<(), InputError> {
        let id = entity.source_id().to_string();
        if !self.register(entity) {
            return Ok(());
        }
        match policy {
            DuplicatePolicy::Abort => Err(InputError::DuplicateId {kind: self.kind, id}),
            DuplicatePolicy::Warn => {
                log::warn!("Duplicate {} id '{}', keeping the first one", self.kind, id);
                Ok(())
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.ordinals_by_id.get(id).map(|ii| &self.entries[*ii])
    }

    /// Like `get`, but a missing id is an error blaming `referrer`.
    pub fn lookup(&self, id: &str, referrer: &str) -> Result<&T, InputError> {
        self.get(id).ok_or_else(|| InputError::UnresolvedReference {
            kind: self.kind,
            id: id.to_string(),
            referrer: referrer.to_string(),
        })
    }

    pub fn get_by_ordinal(&self, ordinal: usize) -> Option<&T> {
        self.entries.get(ordinal)
    }

    pub fn ordinal_of(&self, id: &str) -> Option<usize> {
        self.ordinals_by_id.get(id).copied()
    }

    /// The single registered entity, used to fill in omitted references. Anything other than
    /// exactly one candidate is ambiguous.
    pub fn sole_entry(&self, referrer: &str) -> Result<&T, InputError> {
        match self.entries.as_slice() {
            [only] => Ok(only),
            _ => Err(InputError::AmbiguousDefault {
                kind: self.kind,
                referrer: referrer.to_string(),
                candidates: self.entries.len(),
            }),
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ordinals_by_id.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|ee| ee.source_id())
    }
}

/// All entities read for one set of inputs. It is built stage by stage (network, zoning,
/// demand configuration) and passed explicitly from one stage to the next.
#[derive(Debug, Clone)]
pub struct Registry {
    pub modes: IdRegistry<Mode>,
    pub zones: IdRegistry<Zone>,
    pub traveler_types: IdRegistry<TravelerType>,
    pub user_classes: IdRegistry<UserClass>,
    pub time_periods: IdRegistry<TimePeriod>,
    pub policies: DuplicatePolicies,
}

impl Registry {
    pub fn new(policies: DuplicatePolicies) -> Registry {
        Registry {
            modes: IdRegistry::new("mode"),
            zones: IdRegistry::new("zone"),
            traveler_types: IdRegistry::new("traveler type"),
            user_classes: IdRegistry::new("user class"),
            time_periods: IdRegistry::new("time period"),
            policies,
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Registry::new(DuplicatePolicies::default())
    }
}
