use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::registry::{Registry, SourceId};
use super::xml_tree::XmlElement;
use super::InputError;


/// A demand endpoint. The ordinal is the zone's 0-based position in declaration order, used
/// when OD matrices address zones by position rather than by id.
#[derive(PartialEq, Debug, Clone)]
pub struct Zone {
    pub id: String,
    pub name: Option<String>,
    pub ordinal: usize,
}

impl Zone {
    pub fn new(id: &str, name: Option<&str>, ordinal: usize) -> Zone {
        Zone {
            id: String::from(id),
            name: name.map(String::from),
            ordinal,
        }
    }
}

impl SourceId for Zone {
    fn source_id(&self) -> &str {
        &self.id
    }
}

fn register_zone(id: &str, name: Option<&str>, registry: &mut Registry)
                 -> Result<(), InputError> {
    let zone = Zone::new(id, name, registry.zones.len());
    registry.zones.register_unique(zone, registry.policies.zones)
}

/// Registers the zones declared under `<zones>` anywhere in the document.
pub fn read_zones_xml(root: &XmlElement, registry: &mut Registry) -> Result<(), InputError> {
    let zones = root.find_descendant("zones").ok_or_else(|| InputError::MissingElement {
        parent: root.name.clone(),
        element: String::from("zones"),
    })?;
    for element in zones.children_named("zone") {
        let id = element.required_attribute("id")?;
        register_zone(id, element.child_text("name"), registry)?;
    }
    log::info!("Read {} zones from zoning xml", registry.zones.len());
    Ok(())
}

pub fn read_zones_csv(csvpath: &Path, registry: &mut Registry) -> Result<(), InputError> {
    let file = File::open(csvpath)?;
    read_zones_csv_from_reader(file, registry)
}

// A convenience type for parsing csv data
type Row = HashMap<String, String>;

/// Reads zones from csv with an `id` column and an optional `name` column, one zone per row.
pub fn read_zones_csv_from_reader<R: Read>(source: R, registry: &mut Registry)
                                           -> Result<(), InputError> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(source);
    for (ii, result) in reader.deserialize().enumerate() {
        let row: Row = result?;
        let id = match row.get("id").map(|id| id.as_str()) {
            Some(id) if !id.is_empty() => id,
            _ => return Err(InputError::MissingAttribute {
                element: format!("zones csv row {}", ii + 1),
                attribute: String::from("id"),
            }),
        };
        let name = row.get("name").map(|nn| nn.as_str()).filter(|nn| !nn.is_empty());
        register_zone(id, name, registry)?;
    }
    log::info!("Read {} zones from zoning csv", registry.zones.len());
    Ok(())
}
