//! Conversions between [`ChemKedDocument`] and [`ExperimentRecord`].

use std::str::FromStr;

use serde_yaml::Value;

use crate::model::{
    Apparatus, ApparatusKind, Author, CommonProperties, Composition, CompositionKind, DataPoint,
    ExperimentRecord, ExperimentType, IgnitionDefinition, IgnitionTarget, IgnitionType, Reference,
    Species, VolumeHistory,
};
use crate::units::{Quantity, Unit};

use super::document::{
    ApparatusDoc, AuthorDoc, AxisDoc, ChemKedDocument, CommonPropertiesDoc, CompositionDoc,
    DataPointDoc, IgnitionDoc, ReferenceDoc, SpeciesDoc, ValueList, VolumeHistoryDoc,
};
use super::ChemKedError;

fn author_doc(author: &Author) -> AuthorDoc {
    AuthorDoc {
        name: author.name.clone(),
        orcid: author.orcid.clone(),
    }
}

fn quantity_doc(quantity: &Option<Quantity>) -> Option<ValueList> {
    quantity
        .as_ref()
        .map(|q| vec![Value::String(q.to_string())])
}

fn composition_doc(composition: &Composition) -> CompositionDoc {
    CompositionDoc {
        kind: composition.kind.as_str().to_string(),
        species: composition
            .species
            .iter()
            .map(|s| SpeciesDoc {
                name: s.name.clone(),
                inchi: s.inchi.clone(),
                amount: vec![Value::from(s.amount)],
            })
            .collect(),
    }
}

fn ignition_doc(ignition: &IgnitionDefinition) -> IgnitionDoc {
    IgnitionDoc {
        target: ignition.target.as_str().to_string(),
        kind: ignition.kind.as_str().to_string(),
    }
}

fn volume_history_doc(history: &VolumeHistory) -> VolumeHistoryDoc {
    VolumeHistoryDoc {
        time: AxisDoc {
            units: history.time_units.as_str().to_string(),
            column: 0,
        },
        volume: AxisDoc {
            units: history.volume_units.as_str().to_string(),
            column: 1,
        },
        values: history.values.iter().map(|&(t, v)| vec![t, v]).collect(),
    }
}

impl From<&ExperimentRecord> for ChemKedDocument {
    fn from(record: &ExperimentRecord) -> Self {
        let reference = &record.reference;
        let common = &record.common_properties;

        let common_properties = (!common.is_empty()).then(|| CommonPropertiesDoc {
            composition: common.composition.as_ref().map(composition_doc),
            temperature: quantity_doc(&common.temperature),
            pressure: quantity_doc(&common.pressure),
            pressure_rise: quantity_doc(&common.pressure_rise),
            compression_time: quantity_doc(&common.compression_time),
            ignition_type: common.ignition_type.as_ref().map(ignition_doc),
        });

        ChemKedDocument {
            file_author: author_doc(&record.file_author),
            file_version: record.file_version,
            chemked_version: record.chemked_version.clone(),
            reference: ReferenceDoc {
                doi: reference.doi.clone(),
                authors: reference.authors.iter().map(author_doc).collect(),
                journal: reference.journal.clone(),
                year: reference.year,
                volume: reference.volume,
                pages: reference.pages.clone(),
                detail: reference.detail.clone(),
            },
            experiment_type: record.experiment_type.as_str().to_string(),
            apparatus: ApparatusDoc {
                kind: record.apparatus.kind.as_str().to_string(),
                institution: record.apparatus.institution.clone(),
                facility: record.apparatus.facility.clone(),
            },
            common_properties,
            datapoints: record
                .datapoints
                .iter()
                .map(|dp| DataPointDoc {
                    temperature: quantity_doc(&dp.temperature),
                    pressure: quantity_doc(&dp.pressure),
                    ignition_delay: quantity_doc(&dp.ignition_delay),
                    pressure_rise: quantity_doc(&dp.pressure_rise),
                    compression_time: quantity_doc(&dp.compression_time),
                    composition: dp.composition.as_ref().map(composition_doc),
                    ignition_type: dp.ignition_type.as_ref().map(ignition_doc),
                    volume_history: dp.volume_history.as_ref().map(volume_history_doc),
                })
                .collect(),
        }
    }
}

fn author(doc: AuthorDoc) -> Author {
    Author {
        name: doc.name,
        orcid: doc.orcid,
    }
}

fn quantity(field: &str, list: Option<ValueList>) -> Result<Option<Quantity>, ChemKedError> {
    let Some(list) = list else {
        return Ok(None);
    };
    let text = list
        .first()
        .and_then(Value::as_str)
        .ok_or_else(|| ChemKedError::invalid_field(field, "expected a quantity string"))?;
    Quantity::parse(text)
        .map(Some)
        .map_err(|e| ChemKedError::invalid_field(field, e.to_string()))
}

fn composition(
    field: &str,
    doc: Option<CompositionDoc>,
) -> Result<Option<Composition>, ChemKedError> {
    let Some(doc) = doc else {
        return Ok(None);
    };
    let mut composition = Composition::new(CompositionKind::from_str(&doc.kind)?);
    for species in doc.species {
        let amount = species
            .amount
            .first()
            .and_then(Value::as_f64)
            .ok_or_else(|| {
                ChemKedError::invalid_field(
                    format!("{}.species", field),
                    format!("amount of {} must be a number", species.name),
                )
            })?;
        composition.species.push(Species {
            name: species.name,
            inchi: species.inchi,
            amount,
        });
    }
    Ok(Some(composition))
}

fn ignition(doc: Option<IgnitionDoc>) -> Result<Option<IgnitionDefinition>, ChemKedError> {
    doc.map(|doc| {
        Ok(IgnitionDefinition {
            kind: IgnitionType::from_str(&doc.kind)?,
            target: IgnitionTarget::from_str(&doc.target)?,
        })
    })
    .transpose()
}

fn volume_history(field: &str, doc: VolumeHistoryDoc) -> Result<VolumeHistory, ChemKedError> {
    let mut history =
        VolumeHistory::new(Unit::parse(&doc.time.units)?, Unit::parse(&doc.volume.units)?);
    for (idx, row) in doc.values.iter().enumerate() {
        let cell = |column: usize| {
            row.get(column).copied().ok_or_else(|| {
                ChemKedError::invalid_field(
                    format!("{}.values[{}]", field, idx),
                    format!("row has no column {}", column),
                )
            })
        };
        history.values.push((cell(doc.time.column)?, cell(doc.volume.column)?));
    }
    Ok(history)
}

impl TryFrom<ChemKedDocument> for ExperimentRecord {
    type Error = ChemKedError;

    fn try_from(doc: ChemKedDocument) -> Result<Self, Self::Error> {
        let common = doc.common_properties.unwrap_or_default();
        let common_properties = CommonProperties {
            composition: composition("common-properties.composition", common.composition)?,
            temperature: quantity("common-properties.temperature", common.temperature)?,
            pressure: quantity("common-properties.pressure", common.pressure)?,
            pressure_rise: quantity("common-properties.pressure-rise", common.pressure_rise)?,
            compression_time: quantity(
                "common-properties.compression-time",
                common.compression_time,
            )?,
            ignition_type: ignition(common.ignition_type)?,
        };

        let mut datapoints = Vec::with_capacity(doc.datapoints.len());
        for (idx, dp) in doc.datapoints.into_iter().enumerate() {
            let path = format!("datapoints[{}]", idx);
            let field = |name: &str| format!("{}.{}", path, name);
            datapoints.push(DataPoint {
                temperature: quantity(&field("temperature"), dp.temperature)?,
                pressure: quantity(&field("pressure"), dp.pressure)?,
                ignition_delay: quantity(&field("ignition-delay"), dp.ignition_delay)?,
                pressure_rise: quantity(&field("pressure-rise"), dp.pressure_rise)?,
                compression_time: quantity(&field("compression-time"), dp.compression_time)?,
                composition: composition(&field("composition"), dp.composition)?,
                ignition_type: ignition(dp.ignition_type)?,
                volume_history: dp
                    .volume_history
                    .map(|h| volume_history(&field("volume-history"), h))
                    .transpose()?,
            });
        }

        let mut record = ExperimentRecord {
            file_author: author(doc.file_author),
            file_version: doc.file_version,
            chemked_version: doc.chemked_version,
            experiment_type: ExperimentType::from_str(&doc.experiment_type)?,
            apparatus: Apparatus {
                kind: ApparatusKind::from_str(&doc.apparatus.kind)?,
                institution: doc.apparatus.institution,
                facility: doc.apparatus.facility,
            },
            reference: Reference {
                doi: doc.reference.doi,
                detail: doc.reference.detail,
                journal: doc.reference.journal,
                year: doc.reference.year,
                volume: doc.reference.volume,
                pages: doc.reference.pages,
                authors: doc.reference.authors.into_iter().map(author).collect(),
            },
            common_properties,
            datapoints,
        };
        record.apply_common_properties();
        Ok(record)
    }
}
