//! # Conversion Pipelines
//!
//! End-to-end conversion between ReSpecTh XML and ChemKED YAML.
//!
//! ```text
//! ReSpecTh XML ──import──▶ ExperimentRecord ──serialize──▶ YAML ──validate──▶ output
//! ChemKED YAML ──validate──▶ ExperimentRecord ──export──▶ ReSpecTh XML
//! ```
//!
//! The XML → YAML direction reloads its own output through the validating
//! load path, so a conversion that would produce an invalid ChemKED file
//! fails instead of writing it.

use std::io::Write;
use std::path::{Path, PathBuf};

use log::info;

use crate::chemked::{self, ChemKedError};
use crate::model::ExperimentRecord;
use crate::resolver::MetadataResolver;
use crate::respecth::{export_respecth, ConvertError, ImportOptions, RespecthImporter};
use crate::validator::{ValidationConfig, Validator};

/// Errors from a conversion pipeline
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// ReSpecTh import or export failed
    #[error(transparent)]
    Respecth(#[from] ConvertError),

    /// ChemKED serialization, loading or validation failed
    #[error(transparent)]
    ChemKed(#[from] ChemKedError),

    /// I/O error reading the input or writing the output
    #[error("I/O error on {path}: {source}")]
    Io {
        /// File being read or written
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },
}

impl PipelineError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        PipelineError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Output of one conversion
#[derive(Debug, Clone)]
pub struct Conversion {
    /// The record that was written
    pub record: ExperimentRecord,
    /// Serialized document in the target format
    pub text: String,
}

/// Runs both conversion directions with a shared resolver and validation
/// configuration
pub struct Converter<'a> {
    resolver: &'a dyn MetadataResolver,
    validation: ValidationConfig,
    import_options: ImportOptions,
}

impl<'a> Converter<'a> {
    /// Converter with default validation and no import overrides
    pub fn new(resolver: &'a dyn MetadataResolver) -> Self {
        Self {
            resolver,
            validation: ValidationConfig::default(),
            import_options: ImportOptions::default(),
        }
    }

    /// Set the validation applied when loading ChemKED documents
    pub fn with_validation(mut self, validation: ValidationConfig) -> Self {
        self.validation = validation;
        self
    }

    /// Set the file-author overrides applied on import
    pub fn with_import_options(mut self, options: ImportOptions) -> Self {
        self.import_options = options;
        self
    }

    fn validator(&self) -> Validator<'a> {
        Validator::new(self.resolver).with_config(self.validation)
    }

    /// Convert a ReSpecTh document to validated ChemKED YAML.
    ///
    /// `source_name` is the XML file name; when given, it is recorded in the
    /// reference detail.
    pub fn respecth_to_chemked(
        &self,
        xml: &str,
        source_name: Option<&str>,
    ) -> Result<Conversion, PipelineError> {
        let mut record = RespecthImporter::new(self.resolver)
            .with_options(self.import_options.clone())
            .import_str(xml)?;

        if let Some(name) = source_name {
            add_provenance(&mut record, name);
        }

        let text = chemked::to_yaml_string(&record)?;
        let value = serde_yaml::from_str(&text).map_err(ChemKedError::from)?;
        let source = source_name.unwrap_or("<converted>");
        let record = chemked::from_value(value, &self.validator(), source)?;
        Ok(Conversion { record, text })
    }

    /// Convert a ChemKED document to ReSpecTh XML. The YAML is validated
    /// before export.
    pub fn chemked_to_respecth(
        &self,
        yaml: &str,
        source_name: Option<&str>,
    ) -> Result<Conversion, PipelineError> {
        let value = serde_yaml::from_str(yaml).map_err(ChemKedError::from)?;
        let source = source_name.unwrap_or("<string>");
        let record = chemked::from_value(value, &self.validator(), source)?;
        let text = export_respecth(&record)?.to_xml_string()?;
        Ok(Conversion { record, text })
    }

    /// Convert `input` (ReSpecTh XML) to `<stem>.yaml` in `output_dir`, or
    /// next to the input when no directory is given
    pub fn respecth_file_to_chemked(
        &self,
        input: &Path,
        output_dir: Option<&Path>,
    ) -> Result<PathBuf, PipelineError> {
        let xml = std::fs::read_to_string(input).map_err(|e| PipelineError::io(input, e))?;
        let name = input.file_name().map(|n| n.to_string_lossy().into_owned());
        let conversion = self.respecth_to_chemked(&xml, name.as_deref())?;

        let output = output_path(input, output_dir, "yaml");
        write_atomic(&output, conversion.text.as_bytes())?;
        info!("Converted {} to {}", input.display(), output.display());
        Ok(output)
    }

    /// Convert `input` (ChemKED YAML) to `<stem>.xml` in `output_dir`, or
    /// next to the input when no directory is given
    pub fn chemked_file_to_respecth(
        &self,
        input: &Path,
        output_dir: Option<&Path>,
    ) -> Result<PathBuf, PipelineError> {
        let yaml = std::fs::read_to_string(input).map_err(|e| PipelineError::io(input, e))?;
        let source = input.display().to_string();
        let conversion = self.chemked_to_respecth(&yaml, Some(&source))?;

        let output = output_path(input, output_dir, "xml");
        write_atomic(&output, conversion.text.as_bytes())?;
        info!("Converted {} to {}", input.display(), output.display());
        Ok(output)
    }
}

/// Append `Converted from XML file <name>` to the reference detail
pub fn add_provenance(record: &mut ExperimentRecord, source_name: &str) {
    let note = format!("Converted from XML file {}", source_name);
    record.reference.detail = Some(match record.reference.detail.take() {
        Some(detail) if !detail.is_empty() => format!("{} {}", detail, note),
        _ => note,
    });
}

/// `<output_dir or input dir>/<input stem>.<extension>`
pub fn output_path(input: &Path, output_dir: Option<&Path>, extension: &str) -> PathBuf {
    let dir = match output_dir {
        Some(dir) => dir.to_path_buf(),
        None => input.parent().map(Path::to_path_buf).unwrap_or_default(),
    };
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "converted".to_string());
    dir.join(format!("{}.{}", stem, extension))
}

/// Write through a temporary file in the destination directory so a failed
/// write never leaves a truncated output behind
fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), PipelineError> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let mut file = tempfile::NamedTempFile::new_in(&dir).map_err(|e| PipelineError::io(&dir, e))?;
    file.write_all(contents)
        .and_then(|()| file.flush())
        .map_err(|e| PipelineError::io(path, e))?;
    file.persist(path)
        .map_err(|e| PipelineError::io(path, e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Apparatus, ApparatusKind, Author, Reference};
    use crate::resolver::OfflineResolver;

    const XML: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<experiment>
    <fileAuthor>Kyle E Niemeyer</fileAuthor>
    <experimentType>Ignition delay measurement</experimentType>
    <bibliographyLink preferredKey="Smith et al. 2001"/>
    <apparatus><kind>shock tube</kind></apparatus>
    <commonProperties>
        <property name="pressure" units="atm"><value>2.0</value></property>
        <property name="initial composition">
            <component>
                <speciesLink preferredKey="H2" InChI="1S/H2/h1H"/>
                <amount units="mole fraction">0.1</amount>
            </component>
            <component>
                <speciesLink preferredKey="Ar"/>
                <amount units="mole fraction">0.9</amount>
            </component>
        </property>
    </commonProperties>
    <dataGroup id="dg1">
        <property id="x1" name="temperature" units="K"/>
        <property id="x2" name="ignition delay" units="us"/>
        <dataPoint><x1>1200.0</x1><x2>150.0</x2></dataPoint>
        <dataPoint><x1>1300.0</x1><x2>90.0</x2></dataPoint>
    </dataGroup>
    <ignitionType target="P" type="d/dt max"/>
</experiment>
"#;

    fn converter() -> Converter<'static> {
        Converter::new(&OfflineResolver).with_validation(ValidationConfig::all())
    }

    #[test]
    fn test_add_provenance() {
        let mut record = ExperimentRecord::new(
            Author::new("A"),
            Apparatus::new(ApparatusKind::ShockTube),
            Reference::from_detail("Smith et al. 2001."),
        );
        add_provenance(&mut record, "x.xml");
        assert_eq!(
            record.reference.detail.as_deref(),
            Some("Smith et al. 2001. Converted from XML file x.xml")
        );

        record.reference.detail = None;
        add_provenance(&mut record, "x.xml");
        assert_eq!(record.reference.detail.as_deref(), Some("Converted from XML file x.xml"));
    }

    #[test]
    fn test_output_path() {
        assert_eq!(
            output_path(Path::new("data/run1.xml"), None, "yaml"),
            PathBuf::from("data/run1.yaml")
        );
        assert_eq!(
            output_path(Path::new("run1.yaml"), Some(Path::new("out")), "xml"),
            PathBuf::from("out/run1.xml")
        );
    }

    #[test]
    fn test_respecth_to_chemked() {
        let conversion = converter().respecth_to_chemked(XML, Some("smith.xml")).unwrap();

        assert!(conversion.text.contains("file-author:"));
        assert!(conversion
            .text
            .contains("Smith et al. 2001. Converted from XML file smith.xml"));
        assert_eq!(conversion.record.datapoints.len(), 2);
        assert_eq!(
            conversion.record.reference.detail.as_deref(),
            Some("Smith et al. 2001. Converted from XML file smith.xml")
        );
    }

    #[test]
    fn test_import_options_applied() {
        let options = ImportOptions {
            file_author: Some("Bryan W Weber".to_string()),
            file_author_orcid: None,
        };
        let conversion = converter()
            .with_import_options(options)
            .respecth_to_chemked(XML, None)
            .unwrap();
        assert_eq!(conversion.record.file_author.name, "Bryan W Weber");
        assert_eq!(conversion.record.reference.detail.as_deref(), Some("Smith et al. 2001."));
    }

    #[test]
    fn test_invalid_conversion_produces_no_output() {
        let xml = XML.replace(r#"units="K""#, r#"units="Pa""#);
        let err = converter().respecth_to_chemked(&xml, None).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::ChemKed(ChemKedError::ValidationFailed(_))
        ));
    }

    #[test]
    fn test_chemked_to_respecth() {
        let yaml = converter().respecth_to_chemked(XML, None).unwrap().text;
        let conversion = converter().chemked_to_respecth(&yaml, None).unwrap();

        assert!(conversion.text.starts_with("<?xml"));
        assert!(conversion.text.contains("Ignition delay measurement"));
        assert!(conversion.text.contains(r#"target="P""#));
    }

    #[test]
    fn test_file_pipelines() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("smith.xml");
        std::fs::write(&input, XML).unwrap();
        let out = dir.path().join("out");
        std::fs::create_dir(&out).unwrap();

        let yaml_path = converter().respecth_file_to_chemked(&input, Some(out.as_path())).unwrap();
        assert_eq!(yaml_path, out.join("smith.yaml"));
        let yaml = std::fs::read_to_string(&yaml_path).unwrap();
        assert!(yaml.contains("Converted from XML file smith.xml"));

        let xml_path = converter().chemked_file_to_respecth(&yaml_path, None).unwrap();
        assert_eq!(xml_path, out.join("smith.xml"));
        assert!(xml_path.exists());

        let missing = converter().respecth_file_to_chemked(&dir.path().join("none.xml"), None);
        assert!(matches!(missing, Err(PipelineError::Io { .. })));
    }
}
