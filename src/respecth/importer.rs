//! ReSpecTh XML → experiment record.

use std::collections::HashMap;
use std::str::FromStr;

use log::{debug, info, warn};

use crate::model::{
    Apparatus, ApparatusKind, Author, CommonProperties, Composition, CompositionKind, DataPoint,
    ExperimentRecord, ExperimentType, IgnitionDefinition, IgnitionTarget, IgnitionType, Property,
    Reference, Species, VolumeHistory, CHEMKED_VERSION,
};
use crate::resolver::{LookupError, MetadataResolver};
use crate::units::{normalize_unit_name, Quantity, Unit};

use super::{ConvertError, XmlElement};

/// Ignition targets accepted in `ignitionType/@target` (after upper-casing)
const IGNITION_TARGETS: [&str; 6] = ["P", "T", "OH", "OH*", "CH*", "CH"];

/// Properties allowed in `commonProperties` besides the initial composition
const COMMON_SCALARS: [Property; 4] = [
    Property::Temperature,
    Property::Pressure,
    Property::PressureRise,
    Property::CompressionTime,
];

/// Overrides applied after a document has been read
#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    /// Replace the file author's name
    pub file_author: Option<String>,
    /// Set the file author's ORCID
    pub file_author_orcid: Option<String>,
}

/// Reads ReSpecTh ignition-delay documents into [`ExperimentRecord`]s
pub struct RespecthImporter<'a> {
    resolver: &'a dyn MetadataResolver,
    options: ImportOptions,
}

impl<'a> RespecthImporter<'a> {
    /// Create an importer that resolves DOIs through `resolver`
    pub fn new(resolver: &'a dyn MetadataResolver) -> Self {
        Self {
            resolver,
            options: ImportOptions::default(),
        }
    }

    /// Apply file-author overrides
    pub fn with_options(mut self, options: ImportOptions) -> Self {
        self.options = options;
        self
    }

    /// Parse and import a document
    pub fn import_str(&self, xml: &str) -> Result<ExperimentRecord, ConvertError> {
        let root = XmlElement::parse_str(xml)?;
        self.import(&root)
    }

    /// Import a parsed document
    pub fn import(&self, root: &XmlElement) -> Result<ExperimentRecord, ConvertError> {
        if root.name != "experiment" {
            warn!("Unexpected root element <{}>, expected <experiment>", root.name);
        }

        let file_author = read_file_author(root)?;
        let reference = read_reference(root, self.resolver)?;
        let (experiment_type, apparatus) = read_experiment_kind(root)?;
        let mut common_properties = read_common_properties(root)?;
        common_properties.ignition_type = Some(read_ignition_type(root)?);
        let datapoints = read_datapoints(root, apparatus.kind)?;

        let mut record = ExperimentRecord {
            file_author,
            file_version: 0,
            chemked_version: CHEMKED_VERSION.to_string(),
            experiment_type,
            apparatus,
            reference,
            common_properties,
            datapoints,
        };

        if let Some(conflict) = record.property_conflicts().into_iter().next() {
            return Err(ConvertError::InconsistentField(conflict));
        }

        if let Some(name) = &self.options.file_author {
            record.file_author.name = name.clone();
        }
        if let Some(orcid) = &self.options.file_author_orcid {
            record.file_author.orcid = Some(orcid.clone());
        }

        record.apply_common_properties();
        // compression time is kept per data point only
        record.common_properties.compression_time = None;

        info!(
            "Imported {} data point(s) from {} experiment",
            record.datapoints.len(),
            record.apparatus.kind
        );
        Ok(record)
    }
}

fn required_child<'e>(element: &'e XmlElement, name: &str) -> Result<&'e XmlElement, ConvertError> {
    element
        .child(name)
        .ok_or_else(|| ConvertError::MissingElement(name.to_string()))
}

fn required_attr<'e>(element: &'e XmlElement, attribute: &str) -> Result<&'e str, ConvertError> {
    element
        .attr(attribute)
        .ok_or_else(|| ConvertError::missing_attribute(attribute, &element.name))
}

fn parse_number(text: &str, element: &str) -> Result<f64, ConvertError> {
    text.trim().parse().map_err(|_| ConvertError::InvalidValue {
        element: element.to_string(),
        value: text.to_string(),
    })
}

fn parse_units(units: &str) -> Result<Unit, ConvertError> {
    Ok(Unit::parse(&normalize_unit_name(units))?)
}

fn read_file_author(root: &XmlElement) -> Result<Author, ConvertError> {
    let name = required_child(root, "fileAuthor")?.text.trim();
    if name.is_empty() {
        return Err(ConvertError::MissingElement("fileAuthor".to_string()));
    }
    Ok(Author::new(name))
}

fn read_reference(
    root: &XmlElement,
    resolver: &dyn MetadataResolver,
) -> Result<Reference, ConvertError> {
    let elem = required_child(root, "bibliographyLink")?;
    let mut reference = Reference::default();

    match elem.attr("doi").map(str::trim).filter(|doi| !doi.is_empty()) {
        Some(doi) => {
            reference.doi = Some(doi.to_string());
            match resolver.resolve_reference(doi) {
                Ok(meta) => {
                    debug!("Resolved DOI {}", doi);
                    reference.journal = meta.container_titles.first().cloned();
                    reference.year = meta.year;
                    reference.volume = meta.volume.as_deref().and_then(|v| v.trim().parse().ok());
                    reference.pages = meta.pages;
                    reference.authors = meta
                        .authors
                        .into_iter()
                        .map(|a| Author {
                            name: a.name.full_name(),
                            orcid: a.orcid,
                        })
                        .collect();
                    return Ok(reference);
                }
                Err(LookupError::NotFound(_)) => warn!("DOI {} not found", doi),
                Err(LookupError::Unreachable(reason)) => {
                    warn!("Network not available, DOI not validated ({})", reason)
                }
            }
        }
        None => warn!("Missing doi attribute in bibliographyLink"),
    }

    warn!("Setting reference detail from preferredKey as a fallback; please update");
    let mut detail = elem
        .attr("preferredKey")
        .ok_or_else(|| ConvertError::missing_attribute("preferredKey", "bibliographyLink"))?
        .trim()
        .to_string();
    if !detail.ends_with('.') {
        detail.push('.');
    }
    reference.detail = Some(detail);
    Ok(reference)
}

fn read_experiment_kind(root: &XmlElement) -> Result<(ExperimentType, Apparatus), ConvertError> {
    let type_text = required_child(root, "experimentType")?.text.trim();
    let experiment_type = ExperimentType::from_respecth_name(type_text).ok_or_else(|| {
        ConvertError::UnsupportedFeature(format!("{} not (yet) supported", type_text))
    })?;

    let kind_text = root
        .find("apparatus/kind")
        .map(|e| e.text.trim())
        .ok_or_else(|| ConvertError::MissingElement("apparatus/kind".to_string()))?;
    let kind = ApparatusKind::from_str(kind_text).map_err(|_| {
        ConvertError::UnsupportedFeature(format!("{} experiment not (yet) supported", kind_text))
    })?;

    Ok((experiment_type, Apparatus::new(kind)))
}

fn read_composition(elem: &XmlElement) -> Result<Composition, ConvertError> {
    let mut species = Vec::new();
    let mut composition_units: Option<&str> = None;

    for component in elem.descendants_named("component") {
        let link = required_child(component, "speciesLink")?;
        let name = required_attr(link, "preferredKey")?.to_string();
        let inchi = link.attr("InChI").map(str::to_string);
        if inchi.is_none() {
            warn!("Missing InChI for species {}", name);
        }

        let amount = required_child(component, "amount")?;
        let units = required_attr(amount, "units")?;
        match composition_units {
            None => composition_units = Some(units),
            Some(first) if first != units => {
                return Err(ConvertError::InconsistentField(
                    "inconsistent initial composition units".to_string(),
                ))
            }
            Some(_) => {}
        }

        species.push(Species {
            name,
            inchi,
            amount: parse_number(&amount.text, "amount")?,
        });
    }

    let units =
        composition_units.ok_or_else(|| ConvertError::MissingElement("component".to_string()))?;
    let kind = CompositionKind::from_str(units).map_err(|_| {
        ConvertError::UndefinedKeyword(format!("{} is not a valid composition kind", units))
    })?;
    Ok(Composition { kind, species })
}

fn read_common_properties(root: &XmlElement) -> Result<CommonProperties, ConvertError> {
    let mut common = CommonProperties::default();

    for elem in root.find_all("commonProperties/property") {
        let name = required_attr(elem, "name")?;

        if name == "initial composition" {
            common.composition = Some(read_composition(elem)?);
            continue;
        }

        let property = Property::from_respecth_name(name)
            .filter(|p| COMMON_SCALARS.contains(p))
            .ok_or_else(|| {
                ConvertError::UndefinedKeyword(format!(
                    "Property {} not supported as common property",
                    name
                ))
            })?;

        let units = parse_units(required_attr(elem, "units")?)?;
        let reference = Unit::parse(property.reference_unit())?;
        if !units.is_compatible_with(&reference) {
            return Err(ConvertError::InconsistentField(format!(
                "units incompatible for property {}",
                name
            )));
        }

        let value = required_child(elem, "value")?;
        let magnitude = parse_number(&value.text, "value")?;
        debug!("Common property {} = {} {}", name, magnitude, units);
        common.set(
            property,
            Quantity {
                magnitude,
                units,
            },
        );
    }

    Ok(common)
}

fn read_ignition_type(root: &XmlElement) -> Result<IgnitionDefinition, ConvertError> {
    let elem = required_child(root, "ignitionType")?;
    let target = required_attr(elem, "target")?
        .trim()
        .trim_end_matches(';')
        .to_uppercase();
    let kind = required_attr(elem, "type")?;

    if target.split(';').count() > 1 {
        return Err(ConvertError::UnsupportedFeature(
            "Multiple ignition targets not supported.".to_string(),
        ));
    }

    let target = match target.as_str() {
        "OHEX" => "OH*".to_string(),
        "CHEX" => "CH*".to_string(),
        _ => target,
    };
    if !IGNITION_TARGETS.contains(&target.as_str()) {
        return Err(ConvertError::UndefinedKeyword(format!(
            "{} not valid ignition target",
            target
        )));
    }

    let kind = IgnitionType::from_str(kind)
        .map_err(|_| ConvertError::UndefinedKeyword(format!("{} not valid ignition type", kind)))?;

    let target = match target.as_str() {
        "P" => IgnitionTarget::Pressure,
        "T" => IgnitionTarget::Temperature,
        _ => IgnitionTarget::Species(target),
    };
    Ok(IgnitionDefinition { kind, target })
}

/// A column of the primary data group
enum Column {
    Scalar(Property, Unit),
    Species { name: String, inchi: Option<String> },
}

fn read_datapoints(
    root: &XmlElement,
    apparatus: ApparatusKind,
) -> Result<Vec<DataPoint>, ConvertError> {
    // shock tubes have one data group; RCMs may add a volume history
    let groups: Vec<&XmlElement> = root.children_named("dataGroup").collect();
    if groups.is_empty() {
        return Err(ConvertError::MissingElement("dataGroup".to_string()));
    }
    if groups.len() > 2 {
        return Err(ConvertError::UnsupportedFeature(
            "More than two dataGroups not supported.".to_string(),
        ));
    }

    let group = groups[0];
    let mut columns: HashMap<&str, Column> = HashMap::new();
    let mut composition_kind: Option<CompositionKind> = None;
    for prop in group.children_named("property") {
        let id = required_attr(prop, "id")?;
        let name = required_attr(prop, "name")?;
        let units = required_attr(prop, "units")?;

        if name == "composition" {
            let link = required_child(prop, "speciesLink")?;
            let kind = CompositionKind::from_str(units).map_err(|_| {
                ConvertError::UndefinedKeyword(format!("{} is not a valid composition kind", units))
            })?;
            if composition_kind.is_some_and(|k| k != kind) {
                return Err(ConvertError::InconsistentField(
                    "inconsistent initial composition units".to_string(),
                ));
            }
            composition_kind = Some(kind);
            columns.insert(
                id,
                Column::Species {
                    name: required_attr(link, "preferredKey")?.to_string(),
                    inchi: link.attr("InChI").map(str::to_string),
                },
            );
            continue;
        }

        let property = Property::from_respecth_name(name)
            .filter(|p| Property::DATAGROUP.contains(p))
            .ok_or_else(|| {
                ConvertError::UndefinedKeyword(format!("{} not valid dataPoint property", name))
            })?;
        columns.insert(id, Column::Scalar(property, parse_units(units)?));
    }
    if columns.is_empty() {
        return Err(ConvertError::MissingElement("property".to_string()));
    }

    let mut datapoints = Vec::new();
    for row in group.children_named("dataPoint") {
        let mut point = DataPoint::default();
        for cell in &row.children {
            let column = columns.get(cell.name.as_str()).ok_or_else(|| {
                ConvertError::UndefinedKeyword(format!(
                    "dataPoint value {} has no matching property",
                    cell.name
                ))
            })?;
            let magnitude = parse_number(&cell.text, &cell.name)?;
            match column {
                Column::Scalar(property, units) => {
                    point.set(
                        *property,
                        Quantity {
                            magnitude,
                            units: units.clone(),
                        },
                    );
                }
                Column::Species { name, inchi } => {
                    if let Some(kind) = composition_kind {
                        point
                            .composition
                            .get_or_insert_with(|| Composition::new(kind))
                            .species
                            .push(Species {
                                name: name.clone(),
                                inchi: inchi.clone(),
                                amount: magnitude,
                            });
                    }
                }
            }
        }
        datapoints.push(point);
    }
    if datapoints.is_empty() {
        return Err(ConvertError::MissingElement("dataPoint".to_string()));
    }
    debug!("Read {} data point(s) from primary dataGroup", datapoints.len());

    if let Some(history_group) = groups.get(1) {
        if apparatus != ApparatusKind::RapidCompressionMachine {
            return Err(ConvertError::UnsupportedFeature(
                "Second dataGroup only valid for RCM.".to_string(),
            ));
        }
        if datapoints.len() != 1 {
            return Err(ConvertError::UnsupportedFeature(
                "Multiple datapoints for single volume history.".to_string(),
            ));
        }
        datapoints[0].volume_history = Some(read_volume_history(history_group)?);
    }

    Ok(datapoints)
}

fn history_column(prop: &XmlElement) -> Result<(&str, Unit), ConvertError> {
    Ok((
        required_attr(prop, "id")?,
        parse_units(required_attr(prop, "units")?)?,
    ))
}

fn read_volume_history(group: &XmlElement) -> Result<VolumeHistory, ConvertError> {
    let mut time: Option<(&str, Unit)> = None;
    let mut volume: Option<(&str, Unit)> = None;

    for prop in group.children_named("property") {
        match required_attr(prop, "name")? {
            "time" => time = Some(history_column(prop)?),
            "volume" => volume = Some(history_column(prop)?),
            other => debug!("Ignoring volume-history property {}", other),
        }
    }

    let (volume_id, volume_units) =
        volume.ok_or_else(|| ConvertError::MissingElement("volume property".to_string()))?;
    let (time_id, time_units) = time.ok_or_else(|| {
        ConvertError::InconsistentField("Time values needed for volume history".to_string())
    })?;

    let mut history = VolumeHistory::new(time_units, volume_units);
    for row in group.children_named("dataPoint") {
        let value = |id: &str| -> Result<f64, ConvertError> {
            let cell = row
                .child(id)
                .ok_or_else(|| ConvertError::MissingElement(format!("{} value in dataPoint", id)))?;
            parse_number(&cell.text, id)
        };
        history.values.push((value(time_id)?, value(volume_id)?));
    }
    debug!("Read volume history with {} samples", history.len());
    Ok(history)
}
