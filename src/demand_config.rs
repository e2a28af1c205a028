use super::config_utils;
use super::parse_tree::{XmlDemandConfiguration, XmlDuration, XmlTimePeriod, XmlUserClass};
use super::registry::{Registry, SourceId};
use super::InputError;


pub const DEFAULT_TRAVELER_TYPE_ID: &str = "1";
pub const DEFAULT_USER_CLASS_ID: &str = "1";
pub const DEFAULT_NAME: &str = "Default";

#[derive(PartialEq, Debug, Clone)]
pub struct TravelerType {
    pub id: String,
    pub name: String,
}

impl TravelerType {
    pub fn new(id: &str, name: &str) -> TravelerType {
        TravelerType {
            id: String::from(id),
            name: String::from(name),
        }
    }
}

impl SourceId for TravelerType {
    fn source_id(&self) -> &str {
        &self.id
    }
}

/// A class of travelers sharing one mode and one traveler type.
#[derive(PartialEq, Debug, Clone)]
pub struct UserClass {
    pub id: String,
    pub name: String,
    pub mode_id: String,
    pub traveler_type_id: String,
}

impl SourceId for UserClass {
    fn source_id(&self) -> &str {
        &self.id
    }
}

#[derive(PartialEq, Debug, Clone)]
pub struct TimePeriod {
    pub id: String,
    pub name: Option<String>,
    pub start_time_s: u32,
    pub duration_s: u32,
}

impl TimePeriod {
    pub fn end_time_s(&self) -> u32 {
        self.start_time_s.saturating_add(self.duration_s)
    }
}

impl SourceId for TimePeriod {
    fn source_id(&self) -> &str {
        &self.id
    }
}

#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum DurationUnit {
    Hour,
    Minute,
    Second,
}

impl DurationUnit {
    pub fn from_xml_str(unit: &str) -> Result<DurationUnit, InputError> {
        match unit.trim().to_lowercase().as_str() {
            "h" | "hour" | "hours" => Ok(DurationUnit::Hour),
            "m" | "min" | "minute" | "minutes" => Ok(DurationUnit::Minute),
            "s" | "sec" | "second" | "seconds" => Ok(DurationUnit::Second),
            _ => Err(InputError::InvalidValue {
                field: String::from("duration unit"),
                value: unit.to_string(),
                reason: String::from("expected one of h, m or s"),
            }),
        }
    }

    pub fn seconds(&self) -> u32 {
        match self {
            DurationUnit::Hour => 3600,
            DurationUnit::Minute => 60,
            DurationUnit::Second => 1,
        }
    }
}

/// Turns the declared traveler types, user classes and time periods into registry entries.
/// The network's modes must already be registered.
pub fn resolve_demand_configuration(config: &XmlDemandConfiguration, registry: &mut Registry)
                                    -> Result<(), InputError> {
    resolve_traveler_types(config, registry)?;
    resolve_user_classes(config, registry)?;
    resolve_time_periods(config, registry)?;
    log::info!("Resolved {} traveler types, {} user classes and {} time periods",
               registry.traveler_types.len(), registry.user_classes.len(),
               registry.time_periods.len());
    Ok(())
}

fn resolve_traveler_types(config: &XmlDemandConfiguration, registry: &mut Registry)
                          -> Result<(), InputError> {
    if config.traveler_types.is_empty() {
        log::debug!("No traveler types declared, creating default traveler type");
        let default_type = TravelerType::new(DEFAULT_TRAVELER_TYPE_ID, DEFAULT_NAME);
        return registry.traveler_types.register_unique(default_type,
                                                       registry.policies.traveler_types);
    }

    for declared in &config.traveler_types {
        let id = declared.id.as_deref().unwrap_or(DEFAULT_TRAVELER_TYPE_ID);
        let name = declared.name.as_deref().unwrap_or(id);
        registry.traveler_types.register_unique(TravelerType::new(id, name),
                                                registry.policies.traveler_types)?;
    }
    Ok(())
}

fn resolve_user_classes(config: &XmlDemandConfiguration, registry: &mut Registry)
                        -> Result<(), InputError> {
    if config.user_classes.is_empty() {
        log::debug!("No user classes declared, creating default user class");
        let referrer = "the default user class";
        let user_class = UserClass {
            id: String::from(DEFAULT_USER_CLASS_ID),
            name: String::from(DEFAULT_NAME),
            mode_id: registry.modes.sole_entry(referrer)?.id.clone(),
            traveler_type_id: registry.traveler_types.sole_entry(referrer)?.id.clone(),
        };
        return registry.user_classes.register_unique(user_class, registry.policies.user_classes);
    }

    for declared in &config.user_classes {
        let user_class = resolve_user_class(declared, registry)?;
        registry.user_classes.register_unique(user_class, registry.policies.user_classes)?;
    }
    Ok(())
}

fn resolve_user_class(declared: &XmlUserClass, registry: &Registry)
                      -> Result<UserClass, InputError> {
    let id = declared.id.as_deref().unwrap_or(DEFAULT_USER_CLASS_ID);
    let referrer = format!("user class '{}'", id);

    let mode = match &declared.mode_ref {
        Some(mode_ref) => registry.modes.lookup(mode_ref, &referrer)?,
        None => registry.modes.sole_entry(&referrer)?,
    };
    let traveler_type = match &declared.traveler_type_ref {
        Some(tt_ref) => registry.traveler_types.lookup(tt_ref, &referrer)?,
        None => registry.traveler_types.sole_entry(&referrer)?,
    };

    Ok(UserClass {
        id: String::from(id),
        name: declared.name.clone().unwrap_or_else(|| String::from(id)),
        mode_id: mode.id.clone(),
        traveler_type_id: traveler_type.id.clone(),
    })
}

fn resolve_time_periods(config: &XmlDemandConfiguration, registry: &mut Registry)
                        -> Result<(), InputError> {
    for declared in &config.time_periods {
        let time_period = resolve_time_period(declared)?;
        registry.time_periods.register_unique(time_period, registry.policies.time_periods)?;
    }
    Ok(())
}

fn resolve_time_period(declared: &XmlTimePeriod) -> Result<TimePeriod, InputError> {
    let start_time_s = match &declared.start_time {
        Some(start_time) => config_utils::get_num_seconds_from_time_str(start_time)?,
        None => config_utils::midnight_today_s(),
    };
    let duration_s = duration_to_seconds(&declared.duration, &declared.id)?;

    Ok(TimePeriod {
        id: declared.id.clone(),
        name: declared.name.clone(),
        start_time_s,
        duration_s,
    })
}

/// Fractional durations are truncated to whole units before conversion to seconds.
fn duration_to_seconds(duration: &XmlDuration, time_period_id: &str) -> Result<u32, InputError> {
    let context = format!("duration of time period '{}'", time_period_id);
    let value: f64 = duration.value.trim().parse().map_err(|_| InputError::NumericFormat {
        token: duration.value.clone(),
        context: context.clone(),
    })?;
    if !value.is_finite() || value < 0.0 {
        return Err(InputError::InvalidValue {
            field: context,
            value: duration.value.clone(),
            reason: String::from("must be a non-negative number"),
        });
    }
    let unit = DurationUnit::from_xml_str(&duration.unit)?;
    let too_long = || InputError::InvalidValue {
        field: context.clone(),
        value: duration.value.clone(),
        reason: String::from("too long"),
    };
    if value.trunc() > u32::MAX as f64 {
        return Err(too_long());
    }
    (value.trunc() as u32).checked_mul(unit.seconds()).ok_or_else(too_long)
}
