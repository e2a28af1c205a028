use super::network::Mode;
use super::registry::Registry;
use super::zoning::Zone;


/// Builds a registry as the network and zoning readers would leave it: the given modes with
/// their pcus, and zones with ordinals in the order given.
pub fn registry_with(modes: &[(&str, f64)], zone_ids: &[&str]) -> Registry {
    let mut registry = Registry::default();
    for (id, pcu) in modes {
        assert!(!registry.modes.register(Mode::new(id, id, *pcu)), "Mode {} given twice!", id);
    }
    for (ii, id) in zone_ids.iter().enumerate() {
        assert!(!registry.zones.register(Zone::new(id, None, ii)), "Zone {} given twice!", id);
    }
    registry
}
