//! Experiment record → ReSpecTh XML.
//!
//! Records loaded from ChemKED carry every value on every data point, so the
//! exporter factors shared values back out into `commonProperties` and
//! writes the rest as data-group columns `x1`, `x2`, ...

use log::{debug, info};

use crate::model::{Composition, DataPoint, ExperimentRecord, IgnitionTarget, Property};
use crate::units::{format_magnitude, Unit};

use super::{ConvertError, XmlElement};

/// Scalar properties that may be factored into `commonProperties`
const COMMON_CANDIDATES: [Property; 3] = [
    Property::Temperature,
    Property::Pressure,
    Property::PressureRise,
];

/// Build the ReSpecTh document for a record
pub fn export_respecth(record: &ExperimentRecord) -> Result<XmlElement, ConvertError> {
    let points: Vec<DataPoint> = record
        .datapoints
        .iter()
        .map(|dp| {
            let mut dp = dp.clone();
            dp.apply_common(&record.common_properties);
            dp
        })
        .collect();
    let first = points
        .first()
        .ok_or_else(|| ConvertError::MissingElement("datapoints".to_string()))?;

    let histories = points.iter().filter(|dp| dp.volume_history.is_some()).count();
    if histories > 0 && points.len() > 1 {
        return Err(ConvertError::UnsupportedFeature(
            "ReSpecTh files do not support multiple datapoints with a volume history.".to_string(),
        ));
    }

    let mut root = XmlElement::new("experiment")
        .with_child(XmlElement::new("fileAuthor").with_text(record.file_author.name.as_str()))
        .with_child(version_element("fileVersion", record.file_version, 0))
        .with_child(version_element("ReSpecThVersion", 1, 0))
        .with_child(
            XmlElement::new("experimentType").with_text(record.experiment_type.respecth_name()),
        );

    if !record.reference.is_identified() {
        return Err(ConvertError::MissingElement("reference doi or detail".to_string()));
    }
    let mut bibliography =
        XmlElement::new("bibliographyLink").with_attr("preferredKey", record.reference.citation());
    if let Some(doi) = &record.reference.doi {
        bibliography.set_attr("doi", doi.as_str());
    }
    root.push(bibliography);

    root.push(
        XmlElement::new("apparatus")
            .with_child(XmlElement::new("kind").with_text(record.apparatus.kind.as_str())),
    );

    let common_composition = first.composition.is_some()
        && points.iter().all(|dp| dp.composition == first.composition);

    let mut common_scalars = Vec::new();
    let common = root.push(XmlElement::new("commonProperties"));
    if common_composition {
        if let Some(composition) = &first.composition {
            common.push(composition_element(composition));
        }
    }
    // single-point records only share their composition
    if points.len() > 1 {
        for property in COMMON_CANDIDATES {
            let Some(shared) = first.get(property) else {
                continue;
            };
            let all_equal = points
                .iter()
                .all(|dp| dp.get(property).is_some_and(|q| q.same_as(shared)));
            if all_equal {
                debug!("{} is common to all data points", property);
                common_scalars.push(property);
                common.push(
                    XmlElement::new("property")
                        .with_attr("description", "")
                        .with_attr("name", property.respecth_name())
                        .with_attr("units", shared.units.as_str())
                        .with_child(
                            XmlElement::new("value").with_text(format_magnitude(shared.magnitude)),
                        ),
                );
            }
        }
    }

    let mut group = data_group("dg1");
    let mut columns: Vec<(String, ColumnSource)> = Vec::new();

    for property in Property::DATAGROUP {
        if common_scalars.contains(&property) {
            continue;
        }
        let Some(units) = points.iter().find_map(|dp| dp.get(property)).map(|q| q.units.clone())
        else {
            continue;
        };
        let id = format!("x{}", columns.len() + 1);
        group.push(
            XmlElement::new("property")
                .with_attr("description", "")
                .with_attr("name", property.respecth_name())
                .with_attr("units", units.as_str())
                .with_attr("id", id.as_str())
                .with_attr("label", property.label()),
        );
        columns.push((id, ColumnSource::Scalar(property, units)));
    }

    if !common_composition {
        if let Some(composition) = &first.composition {
            for species in &composition.species {
                let id = format!("x{}", columns.len() + 1);
                let mut link = XmlElement::new("speciesLink")
                    .with_attr("preferredKey", species.name.as_str());
                if let Some(inchi) = &species.inchi {
                    link.set_attr("InChI", inchi.as_str());
                }
                group.push(
                    XmlElement::new("property")
                        .with_attr("description", "")
                        .with_attr("id", id.as_str())
                        .with_attr("label", format!("[{}]", species.name))
                        .with_attr("name", "composition")
                        .with_attr("units", composition.kind.as_str())
                        .with_child(link),
                );
                columns.push((id, ColumnSource::Species(species.name.clone())));
            }
        }
    }

    for dp in &points {
        let row = group.push(XmlElement::new("dataPoint"));
        for (id, source) in &columns {
            if let Some(value) = source.value(dp)? {
                row.push(XmlElement::new(id.as_str()).with_text(format_magnitude(value)));
            }
        }
    }
    root.push(group);

    if let Some(history) = first.volume_history.as_ref() {
        let time_id = format!("x{}", columns.len() + 1);
        let volume_id = format!("x{}", columns.len() + 2);
        let mut group = data_group("dg2")
            .with_child(
                XmlElement::new("property")
                    .with_attr("description", "")
                    .with_attr("name", "time")
                    .with_attr("units", history.time_units.as_str())
                    .with_attr("id", time_id.as_str())
                    .with_attr("label", Property::Time.label()),
            )
            .with_child(
                XmlElement::new("property")
                    .with_attr("description", "")
                    .with_attr("name", "volume")
                    .with_attr("units", history.volume_units.as_str())
                    .with_attr("id", volume_id.as_str())
                    .with_attr("label", Property::Volume.label()),
            );
        for (time, volume) in &history.values {
            group.push(
                XmlElement::new("dataPoint")
                    .with_child(
                        XmlElement::new(time_id.as_str()).with_text(format_magnitude(*time)),
                    )
                    .with_child(
                        XmlElement::new(volume_id.as_str()).with_text(format_magnitude(*volume)),
                    ),
            );
        }
        root.push(group);
    }

    let ignition = first
        .ignition_type
        .as_ref()
        .ok_or_else(|| ConvertError::MissingElement("ignition-type".to_string()))?;
    let target = match &ignition.target {
        IgnitionTarget::Pressure => "P",
        IgnitionTarget::Temperature => "T",
        IgnitionTarget::Species(name) => name.as_str(),
    };
    root.push(
        XmlElement::new("ignitionType")
            .with_attr("target", target)
            .with_attr("type", ignition.kind.as_str()),
    );

    info!(
        "Exported {} data point(s) in {} column(s)",
        points.len(),
        columns.len()
    );
    Ok(root)
}

/// Where a data-group column takes its values from
enum ColumnSource {
    Scalar(Property, Unit),
    Species(String),
}

impl ColumnSource {
    fn value(&self, dp: &DataPoint) -> Result<Option<f64>, ConvertError> {
        match self {
            ColumnSource::Scalar(property, units) => match dp.get(*property) {
                Some(q) if q.units == *units => Ok(Some(q.magnitude)),
                Some(q) => Ok(Some(q.value_in(units)?)),
                None => Ok(None),
            },
            ColumnSource::Species(name) => Ok(dp
                .composition
                .as_ref()
                .and_then(|c| c.amount_of(name))),
        }
    }
}

fn version_element(name: &str, major: u32, minor: u32) -> XmlElement {
    XmlElement::new(name)
        .with_child(XmlElement::new("major").with_text(major.to_string()))
        .with_child(XmlElement::new("minor").with_text(minor.to_string()))
}

fn data_group(id: &str) -> XmlElement {
    XmlElement::new("dataGroup").with_attr("id", id).with_child(
        XmlElement::new("dataGroupLink")
            .with_attr("dataGroupID", "")
            .with_attr("dataPointID", ""),
    )
}

fn composition_element(composition: &Composition) -> XmlElement {
    let mut prop = XmlElement::new("property").with_attr("name", "initial composition");
    for species in &composition.species {
        let mut link =
            XmlElement::new("speciesLink").with_attr("preferredKey", species.name.as_str());
        if let Some(inchi) = &species.inchi {
            link.set_attr("InChI", inchi.as_str());
        }
        prop.push(
            XmlElement::new("component").with_child(link).with_child(
                XmlElement::new("amount")
                    .with_attr("units", composition.kind.as_str())
                    .with_text(format_magnitude(species.amount)),
            ),
        );
    }
    prop
}
