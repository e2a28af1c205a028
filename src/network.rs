use super::registry::{Registry, SourceId};
use super::xml_tree::XmlElement;
use super::InputError;


pub const DEFAULT_MODE_ID: &str = "1";
pub const DEFAULT_MODE_NAME: &str = "Default";
pub const DEFAULT_PCU: f64 = 1.0;

/// A travel mode. Its passenger-car-unit factor converts trip counts into car-equivalent demand.
#[derive(PartialEq, Debug, Clone)]
pub struct Mode {
    pub id: String,
    pub name: String,
    pub pcu: f64,
}

impl Mode {
    pub fn new(id: &str, name: &str, pcu: f64) -> Mode {
        Mode {
            id: String::from(id),
            name: String::from(name),
            pcu,
        }
    }

    fn from_xml_element(element: &XmlElement) -> Result<Mode, InputError> {
        let id = element.required_attribute("id")?;
        let name = element.child_text("name").unwrap_or(id);
        let pcu = match element.child_text("pcu") {
            Some(pcustr) => {
                let pcu: f64 = pcustr.parse().map_err(|_| InputError::NumericFormat {
                    token: pcustr.to_string(),
                    context: format!("pcu of mode '{}'", id),
                })?;
                if !pcu.is_finite() || pcu <= 0.0 {
                    return Err(InputError::InvalidValue {
                        field: format!("pcu of mode '{}'", id),
                        value: pcustr.to_string(),
                        reason: String::from("must be a positive number"),
                    });
                }
                pcu
            }
            None => DEFAULT_PCU,
        };
        Ok(Mode::new(id, name, pcu))
    }
}

impl SourceId for Mode {
    fn source_id(&self) -> &str {
        &self.id
    }
}

/// Registers the modes declared under `<modes>` anywhere in the document. A network that
/// declares none gets a single default mode.
pub fn read_network_modes(root: &XmlElement, registry: &mut Registry) -> Result<(), InputError> {
    if let Some(modes) = root.find_descendant("modes") {
        for element in modes.children_named("mode") {
            let mode = Mode::from_xml_element(element)?;
            registry.modes.register_unique(mode, registry.policies.modes)?;
        }
    }

    if registry.modes.is_empty() {
        log::info!("No modes declared in network, using default mode '{}'", DEFAULT_MODE_ID);
        registry.modes.register(Mode::new(DEFAULT_MODE_ID, DEFAULT_MODE_NAME, DEFAULT_PCU));
    }
    log::info!("Read {} modes from network", registry.modes.len());
    Ok(())
}
