//! Declarative ChemKED schema and the structural walk over a document.

use log::debug;
use serde_yaml::Value;

use super::rules::{Finding, RuleContext, SemanticRule};
use super::{ValidationCheck, ValidationReport};

/// Whether a field must be present
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Presence {
    Required,
    Optional,
    /// Required on a data point unless `common-properties` supplies it
    RequiredOrCommon,
}

/// Expected shape of a field value
#[derive(Debug, Clone, Copy)]
pub(crate) enum Kind {
    Text,
    /// Signed 32-bit integer
    Integer,
    /// Non-negative 32-bit integer (versions, volumes, column indices)
    Count,
    Keyword(&'static [&'static str]),
    Map(&'static [FieldSpec]),
    List { item: &'static FieldSpec, min_len: usize },
    /// `[quantity string, uncertainty mapping?]`
    Quantity,
    /// `[number, uncertainty mapping?]`
    Amount,
    /// `[number, number, ...]`
    Row,
}

/// One entry of the schema table
#[derive(Debug, Clone, Copy)]
pub(crate) struct FieldSpec {
    pub name: &'static str,
    pub kind: Kind,
    pub presence: Presence,
    pub rules: &'static [SemanticRule],
}

const fn field(name: &'static str, kind: Kind, presence: Presence) -> FieldSpec {
    FieldSpec {
        name,
        kind,
        presence,
        rules: &[],
    }
}

const fn checked(
    name: &'static str,
    kind: Kind,
    presence: Presence,
    rules: &'static [SemanticRule],
) -> FieldSpec {
    FieldSpec {
        name,
        kind,
        presence,
        rules,
    }
}

use Presence::{Optional, Required, RequiredOrCommon};

const AUTHOR_FIELDS: &[FieldSpec] = &[
    field("name", Kind::Text, Required),
    field("ORCID", Kind::Text, Optional),
];

const AUTHOR: FieldSpec = checked(
    "author",
    Kind::Map(AUTHOR_FIELDS),
    Required,
    &[SemanticRule::Orcid],
);

const REFERENCE_FIELDS: &[FieldSpec] = &[
    field("doi", Kind::Text, Optional),
    field("authors", Kind::List { item: &AUTHOR, min_len: 0 }, Optional),
    field("journal", Kind::Text, Optional),
    field("year", Kind::Integer, Optional),
    field("volume", Kind::Count, Optional),
    field("pages", Kind::Text, Optional),
    field("detail", Kind::Text, Optional),
];

const APPARATUS_FIELDS: &[FieldSpec] = &[
    field(
        "kind",
        Kind::Keyword(&["shock tube", "rapid compression machine"]),
        Required,
    ),
    field("institution", Kind::Text, Optional),
    field("facility", Kind::Text, Optional),
];

const SPECIES_FIELDS: &[FieldSpec] = &[
    field("species-name", Kind::Text, Required),
    field("InChI", Kind::Text, Optional),
    field("amount", Kind::Amount, Required),
];

const SPECIES: FieldSpec = field("species", Kind::Map(SPECIES_FIELDS), Required);

const COMPOSITION_FIELDS: &[FieldSpec] = &[
    field("kind", Kind::Keyword(&["mole fraction", "mass fraction"]), Required),
    field("species", Kind::List { item: &SPECIES, min_len: 1 }, Required),
];

const IGNITION_FIELDS: &[FieldSpec] = &[
    field("target", Kind::Text, Required),
    field("type", Kind::Keyword(&["max", "d/dt max", "1/2 max", "min"]), Required),
];

const AXIS_FIELDS: &[FieldSpec] = &[
    field("units", Kind::Text, Required),
    field("column", Kind::Count, Required),
];

const ROW: FieldSpec = field("values", Kind::Row, Required);

const VOLUME_HISTORY_FIELDS: &[FieldSpec] = &[
    checked("time", Kind::Map(AXIS_FIELDS), Required, &[SemanticRule::Units]),
    checked("volume", Kind::Map(AXIS_FIELDS), Required, &[SemanticRule::Units]),
    field("values", Kind::List { item: &ROW, min_len: 1 }, Required),
];

const QUANTITY_RULES: &[SemanticRule] = &[SemanticRule::Quantity];

const COMMON_FIELDS: &[FieldSpec] = &[
    field("composition", Kind::Map(COMPOSITION_FIELDS), Optional),
    checked("temperature", Kind::Quantity, Optional, QUANTITY_RULES),
    checked("pressure", Kind::Quantity, Optional, QUANTITY_RULES),
    checked("pressure-rise", Kind::Quantity, Optional, QUANTITY_RULES),
    checked("compression-time", Kind::Quantity, Optional, QUANTITY_RULES),
    field("ignition-type", Kind::Map(IGNITION_FIELDS), Optional),
];

const DATAPOINT_FIELDS: &[FieldSpec] = &[
    checked("temperature", Kind::Quantity, RequiredOrCommon, QUANTITY_RULES),
    checked("pressure", Kind::Quantity, RequiredOrCommon, QUANTITY_RULES),
    checked("ignition-delay", Kind::Quantity, Required, QUANTITY_RULES),
    checked("pressure-rise", Kind::Quantity, Optional, QUANTITY_RULES),
    checked("compression-time", Kind::Quantity, Optional, QUANTITY_RULES),
    field("composition", Kind::Map(COMPOSITION_FIELDS), RequiredOrCommon),
    field("ignition-type", Kind::Map(IGNITION_FIELDS), RequiredOrCommon),
    field("volume-history", Kind::Map(VOLUME_HISTORY_FIELDS), Optional),
];

const DATAPOINT: FieldSpec = field("datapoint", Kind::Map(DATAPOINT_FIELDS), Required);

/// Top level of a ChemKED document
pub(crate) const CHEMKED_SCHEMA: &[FieldSpec] = &[
    checked("file-author", Kind::Map(AUTHOR_FIELDS), Required, &[SemanticRule::Orcid]),
    field("file-version", Kind::Count, Required),
    field("chemked-version", Kind::Text, Required),
    checked(
        "reference",
        Kind::Map(REFERENCE_FIELDS),
        Required,
        &[SemanticRule::Reference],
    ),
    field("experiment-type", Kind::Keyword(&["ignition delay"]), Required),
    field("apparatus", Kind::Map(APPARATUS_FIELDS), Required),
    field("common-properties", Kind::Map(COMMON_FIELDS), Optional),
    field("datapoints", Kind::List { item: &DATAPOINT, min_len: 1 }, Required),
];

/// Walks a document against [`CHEMKED_SCHEMA`], recording structural
/// failures and running the semantic rules each field carries
pub(crate) struct SchemaWalk<'r, 'a> {
    ctx: &'r RuleContext<'a>,
    report: &'r mut ValidationReport,
    common_keys: Vec<String>,
    structural_failures: usize,
}

impl<'r, 'a> SchemaWalk<'r, 'a> {
    pub(crate) fn new(ctx: &'r RuleContext<'a>, report: &'r mut ValidationReport) -> Self {
        Self {
            ctx,
            report,
            common_keys: Vec::new(),
            structural_failures: 0,
        }
    }

    /// Check the whole document; returns the number of structural failures
    pub(crate) fn run(mut self, document: &Value) -> usize {
        if let Some(common) = document.get("common-properties").and_then(Value::as_mapping) {
            self.common_keys = common
                .keys()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect();
        }
        self.check_map("", CHEMKED_SCHEMA, document);
        self.structural_failures
    }

    fn fail(&mut self, path: &str, message: impl Into<String>) {
        let path = if path.is_empty() { "<document>" } else { path };
        self.structural_failures += 1;
        self.report.add_check(ValidationCheck::failed(path, message));
    }

    fn check_map(&mut self, path: &str, fields: &'static [FieldSpec], value: &Value) {
        let Some(mapping) = value.as_mapping() else {
            self.fail(path, "must be of dict type");
            return;
        };

        for key in mapping.keys() {
            match key.as_str() {
                Some(name) if fields.iter().any(|f| f.name == name) => {}
                Some(name) => self.fail(&join(path, name), "unknown field"),
                None => self.fail(path, "keys must be strings"),
            }
        }

        for spec in fields {
            let child_path = join(path, spec.name);
            match mapping.get(spec.name) {
                Some(child) => self.check_field(&child_path, spec, child),
                None => match spec.presence {
                    Required => self.fail(&child_path, "required field"),
                    RequiredOrCommon if !self.common_keys.iter().any(|k| k == spec.name) => {
                        self.fail(&child_path, "required field")
                    }
                    _ => {}
                },
            }
        }
    }

    fn check_field(&mut self, path: &str, spec: &'static FieldSpec, value: &Value) {
        let failures_before = self.structural_failures;

        match spec.kind {
            Kind::Text => {
                if !value.is_string() {
                    self.fail(path, "must be of string type");
                }
            }
            Kind::Integer => {
                if !value.as_i64().is_some_and(|n| i32::try_from(n).is_ok()) {
                    self.fail(path, "must be of integer type");
                }
            }
            Kind::Count => {
                if !value.as_u64().is_some_and(|n| u32::try_from(n).is_ok()) {
                    self.fail(path, "must be a non-negative integer");
                }
            }
            Kind::Keyword(allowed) => match value.as_str() {
                Some(text) if allowed.contains(&text) => {}
                Some(text) => self.fail(path, format!("unallowed value {}", text)),
                None => self.fail(path, "must be of string type"),
            },
            Kind::Map(fields) => self.check_map(path, fields, value),
            Kind::List { item, min_len } => match value.as_sequence() {
                Some(items) if items.len() < min_len => {
                    self.fail(path, format!("min length is {}", min_len))
                }
                Some(items) => {
                    for (idx, entry) in items.iter().enumerate() {
                        self.check_field(&format!("{}[{}]", path, idx), item, entry);
                    }
                }
                None => self.fail(path, "must be of list type"),
            },
            Kind::Quantity => self.check_value_list(path, value, Value::is_string, "string"),
            Kind::Amount => self.check_value_list(path, value, Value::is_number, "number"),
            Kind::Row => match value.as_sequence() {
                Some(cells) if cells.len() >= 2 && cells.iter().all(Value::is_number) => {}
                _ => self.fail(path, "must be a list of at least two numbers"),
            },
        }

        // semantic rules only run on structurally sound values
        if self.structural_failures == failures_before {
            let target = match spec.kind {
                Kind::Quantity => value.as_sequence().and_then(|items| items.first()),
                _ => Some(value),
            };
            if let Some(target) = target {
                self.apply_rules(path, spec, target);
            }
        }
    }

    fn check_value_list(
        &mut self,
        path: &str,
        value: &Value,
        first_ok: fn(&Value) -> bool,
        expected: &str,
    ) {
        let Some(items) = value.as_sequence() else {
            self.fail(path, "must be of list type");
            return;
        };
        match items.split_first() {
            None => self.fail(path, "min length is 1"),
            Some((first, _)) if !first_ok(first) => {
                self.fail(path, format!("first item must be of {} type", expected))
            }
            Some((_, rest)) if rest.len() > 1 || rest.iter().any(|r| !r.is_mapping()) => {
                self.fail(path, "only an uncertainty mapping may follow the value")
            }
            Some(_) => {}
        }
    }

    fn apply_rules(&mut self, path: &str, spec: &FieldSpec, value: &Value) {
        for rule in spec.rules {
            if !rule.enabled(&self.ctx.config) {
                debug!("Skipping {} check for {}", rule, path);
                continue;
            }
            let findings = rule.check(spec.name, value, self.ctx);
            if findings.is_empty() {
                self.report
                    .add_check(ValidationCheck::ok(format!("{} ({})", path, rule)));
            }
            for finding in findings {
                match finding {
                    Finding::Error(message) => {
                        self.report.add_check(ValidationCheck::failed(path, message))
                    }
                    Finding::Warning(message) => {
                        self.report.add_check(ValidationCheck::warning(path, message))
                    }
                }
            }
        }
    }
}

fn join(path: &str, name: &str) -> String {
    if path.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", path, name)
    }
}
