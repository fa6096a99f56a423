//! # ReSpecTh XML Conversion
//!
//! Reading and writing the ReSpecTh kinetics interchange format for
//! ignition-delay experiments.
//!
//! ## Document Layout
//!
//! ```text
//! <experiment>
//!   <fileAuthor/> <fileVersion/> <ReSpecThVersion/> <experimentType/>
//!   <bibliographyLink doi="..." preferredKey="..."/>
//!   <apparatus><kind/></apparatus>
//!   <commonProperties> <property name="..." units="..."> ... </commonProperties>
//!   <dataGroup id="dg1"> <property id="x1" .../> <dataPoint><x1>..</x1></dataPoint> </dataGroup>
//!   <dataGroup id="dg2"> time / volume columns (RCM volume history) </dataGroup>
//!   <ignitionType target="..." type="..."/>
//! </experiment>
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use chemked::resolver::OfflineResolver;
//! use chemked::respecth::{export_respecth, RespecthImporter};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let xml = std::fs::read_to_string("experiment.xml")?;
//! let record = RespecthImporter::new(&OfflineResolver).import_str(&xml)?;
//! let document = export_respecth(&record)?;
//! println!("{}", document.to_xml_string()?);
//! # Ok(())
//! # }
//! ```

mod error;
mod exporter;
mod importer;
mod tree;


pub use error::ConvertError;
pub use exporter::export_respecth;
pub use importer::{ImportOptions, RespecthImporter};
pub use tree::XmlElement;
