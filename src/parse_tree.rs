//! Typed, read-only mirror of the demand xml schema. Values are kept as the strings found in the
//! document; interpreting them is left to the demand configuration resolver and the OD matrix
//! decoder.

use super::xml_tree::XmlElement;
use super::InputError;


#[derive(PartialEq, Debug, Clone, Default)]
pub struct XmlMacroscopicDemand {
    pub demand_configuration: XmlDemandConfiguration,
    pub od_matrices: Vec<XmlOdMatrix>,
}

#[derive(PartialEq, Debug, Clone, Default)]
pub struct XmlDemandConfiguration {
    pub traveler_types: Vec<XmlTravelerType>,
    pub user_classes: Vec<XmlUserClass>,
    pub time_periods: Vec<XmlTimePeriod>,
}

#[derive(PartialEq, Debug, Clone)]
pub struct XmlTravelerType {
    pub id: Option<String>,
    pub name: Option<String>,
}

#[derive(PartialEq, Debug, Clone)]
pub struct XmlUserClass {
    pub id: Option<String>,
    pub name: Option<String>,
    pub mode_ref: Option<String>,
    pub traveler_type_ref: Option<String>,
}

#[derive(PartialEq, Debug, Clone)]
pub struct XmlTimePeriod {
    pub id: String,
    pub name: Option<String>,
    pub start_time: Option<String>,
    pub duration: XmlDuration,
}

#[derive(PartialEq, Debug, Clone)]
pub struct XmlDuration {
    pub value: String,
    pub unit: String,
}

/// One OD matrix element of the `<oddemands>` section.
#[derive(PartialEq, Debug, Clone)]
pub struct XmlOdMatrix {
    pub user_class_ref: Option<String>,
    pub time_period_ref: String,
    pub values: XmlOdMatrixValues,
}

/// The three ways an OD matrix can be written down.
#[derive(PartialEq, Debug, Clone)]
pub enum XmlOdMatrixValues {
    /// `<o ref><d ref>value</d></o>`, zones addressed by id.
    CellByCell(Vec<XmlOdOrigin>),
    /// One delimited row per origin id; destinations addressed by ordinal.
    Row {
        separator: Option<String>,
        rows: Vec<XmlOdRow>,
    },
    /// The whole matrix in one delimited string; all zones addressed by ordinal.
    Raw {
        origin_separator: Option<String>,
        destination_separator: Option<String>,
        values: String,
    },
}

#[derive(PartialEq, Debug, Clone)]
pub struct XmlOdOrigin {
    pub zone_ref: String,
    pub cells: Vec<XmlOdCell>,
}

#[derive(PartialEq, Debug, Clone)]
pub struct XmlOdCell {
    pub zone_ref: String,
    pub value: String,
}

#[derive(PartialEq, Debug, Clone)]
pub struct XmlOdRow {
    pub zone_ref: String,
    pub values: String,
}

pub const CELL_BY_CELL_ELEMENT: &str = "odcellbycellmatrix";
pub const ROW_ELEMENT: &str = "odrowmatrix";
pub const RAW_ELEMENT: &str = "odrawmatrix";

impl XmlOdMatrixValues {
    pub fn element_name(&self) -> &'static str {
        match self {
            XmlOdMatrixValues::CellByCell(_) => CELL_BY_CELL_ELEMENT,
            XmlOdMatrixValues::Row {..} => ROW_ELEMENT,
            XmlOdMatrixValues::Raw {..} => RAW_ELEMENT,
        }
    }
}

fn owned(value: Option<&str>) -> Option<String> {
    value.map(String::from)
}

impl XmlMacroscopicDemand {
    /// Builds the demand tree from the `<macroscopicdemand>` element, which may be the root or
    /// nested in a combined document.
    pub fn from_xml_element(root: &XmlElement) -> Result<XmlMacroscopicDemand, InputError> {
        let demand = root.find_descendant("macroscopicdemand")
            .ok_or_else(|| InputError::MissingElement {
                parent: root.name.clone(),
                element: String::from("macroscopicdemand"),
            })?;

        let demand_configuration = match demand.child("demandconfiguration") {
            Some(element) => XmlDemandConfiguration::from_xml_element(element)?,
            None => XmlDemandConfiguration::default(),
        };

        let mut od_matrices = vec![];
        if let Some(oddemands) = demand.child("oddemands") {
            for element in &oddemands.children {
                od_matrices.push(XmlOdMatrix::from_xml_element(element)?);
            }
        }

        Ok(XmlMacroscopicDemand {
            demand_configuration,
            od_matrices,
        })
    }
}

impl XmlDemandConfiguration {
    fn from_xml_element(element: &XmlElement) -> Result<XmlDemandConfiguration, InputError> {
        let mut config = XmlDemandConfiguration::default();

        if let Some(traveler_types) = element.child("travellertypes") {
            for tt in traveler_types.children_named("travellertype") {
                config.traveler_types.push(XmlTravelerType {
                    id: owned(tt.attribute("id")),
                    name: owned(tt.child_text("name")),
                });
            }
        }

        if let Some(user_classes) = element.child("userclasses") {
            for uc in user_classes.children_named("userclass") {
                config.user_classes.push(XmlUserClass {
                    id: owned(uc.attribute("id")),
                    name: owned(uc.child_text("name")),
                    mode_ref: owned(uc.attribute("moderef")),
                    traveler_type_ref: owned(uc.attribute("travellertyperef")),
                });
            }
        }

        if let Some(time_periods) = element.child("timeperiods") {
            for tp in time_periods.children_named("timeperiod") {
                let duration = tp.required_child("duration")?;
                config.time_periods.push(XmlTimePeriod {
                    id: tp.required_attribute("id")?.to_string(),
                    name: owned(tp.child_text("name")),
                    start_time: owned(tp.child_text("starttime")),
                    duration: XmlDuration {
                        value: duration.text().to_string(),
                        unit: duration.required_attribute("unit")?.to_string(),
                    },
                });
            }
        }

        Ok(config)
    }
}

impl XmlOdMatrix {
    fn from_xml_element(element: &XmlElement) -> Result<XmlOdMatrix, InputError> {
        let values = match element.name.as_str() {
            CELL_BY_CELL_ELEMENT => {
                let mut origins = vec![];
                for origin in element.children_named("o") {
                    let mut cells = vec![];
                    for destination in origin.children_named("d") {
                        cells.push(XmlOdCell {
                            zone_ref: destination.required_attribute("ref")?.to_string(),
                            value: destination.text().to_string(),
                        });
                    }
                    origins.push(XmlOdOrigin {
                        zone_ref: origin.required_attribute("ref")?.to_string(),
                        cells,
                    });
                }
                XmlOdMatrixValues::CellByCell(origins)
            }
            ROW_ELEMENT => {
                let mut rows = vec![];
                for row in element.children_named("odrow") {
                    rows.push(XmlOdRow {
                        zone_ref: row.required_attribute("ref")?.to_string(),
                        values: row.text().to_string(),
                    });
                }
                XmlOdMatrixValues::Row {
                    separator: owned(element.attribute("ds")),
                    rows,
                }
            }
            RAW_ELEMENT => {
                let values = element.required_child("values")?;
                XmlOdMatrixValues::Raw {
                    origin_separator: owned(values.attribute("os")),
                    destination_separator: owned(values.attribute("ds")),
                    values: values.text().to_string(),
                }
            }
            other => return Err(InputError::InvalidValue {
                field: String::from("oddemands entry"),
                value: other.to_string(),
                reason: format!("expected one of <{}>, <{}> or <{}>",
                                CELL_BY_CELL_ELEMENT, ROW_ELEMENT, RAW_ELEMENT),
            }),
        };

        Ok(XmlOdMatrix {
            user_class_ref: owned(element.attribute("userclassref")),
            time_period_ref: element.required_attribute("timeperiodref")?.to_string(),
            values,
        })
    }
}
