use crate::core::error::{ReconError, Result};
use crate::core::results::Findings;
use crate::core::traits::ReconModule;
use crate::utils::logger::{ScanLogger, TracingLogger};
use async_trait::async_trait;
use exif::{Context, Exif, Field, In, Tag, Value};
use lopdf::{Dictionary, Document, Object};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Tags echoed to the log as well as collected
const HIGHLIGHT_TAGS: &[Tag] = &[Tag::Model, Tag::Make, Tag::DateTime, Tag::Software];

const POINTER_TAGS: &[Tag] = &[
    Tag::ExifIFDPointer,
    Tag::GPSInfoIFDPointer,
    Tag::InteropIFDPointer,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileKind {
    Image,
    Document,
}

/// Signed decimal coordinates taken from an image's GPS directory
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GpsPosition {
    pub latitude: f64,
    pub longitude: f64,
}

impl GpsPosition {
    pub fn maps_link(&self) -> String {
        format!(
            "https://www.google.com/maps?q={},{}",
            self.latitude, self.longitude
        )
    }
}

/// Degrees/minutes/seconds to decimal degrees, negated for the southern and
/// western hemispheres.
pub fn dms_to_decimal(degrees: f64, minutes: f64, seconds: f64, hemisphere: Option<char>) -> f64 {
    let value = degrees + minutes / 60.0 + seconds / 3600.0;
    match hemisphere.map(|c| c.to_ascii_uppercase()) {
        Some('S') | Some('W') => -value,
        _ => value,
    }
}

/// Extracts EXIF data from images and document info from PDFs
pub struct MetadataExtractor {
    logger: Arc<dyn ScanLogger>,
}

impl MetadataExtractor {
    pub fn new() -> Self {
        Self {
            logger: Arc::new(TracingLogger),
        }
    }

    pub fn with_logger(mut self, logger: Arc<dyn ScanLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Dispatch on the text after the last `.` of the file name
    fn classify(path: &Path) -> Result<FileKind> {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy())
            .unwrap_or_default();
        let ext = name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_lowercase())
            .unwrap_or_default();

        if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            Ok(FileKind::Image)
        } else if ext == "pdf" {
            Ok(FileKind::Document)
        } else {
            Err(ReconError::UnsupportedFileType(ext))
        }
    }

    fn analyze_image(&self, path: &Path) -> Result<Option<Findings>> {
        let file = File::open(path)?;
        let exif = match exif::Reader::new().read_from_container(&mut BufReader::new(file)) {
            Ok(exif) => exif,
            Err(exif::Error::NotFound(_)) => {
                self.logger.info("No EXIF data found in image.");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        if exif.fields().next().is_none() {
            self.logger.info("No EXIF data found in image.");
            return Ok(None);
        }

        self.logger.info("EXIF Data Found!");

        let mut findings = Findings::new();
        for field in exif.fields().filter(|f| f.ifd_num == In::PRIMARY) {
            if POINTER_TAGS.contains(&field.tag) || field.tag.context() == Context::Gps {
                continue;
            }

            let value = field_text(field, &exif);
            if HIGHLIGHT_TAGS.contains(&field.tag) {
                self.logger
                    .info(&format!("  [+] {}: {}", field.tag, value));
            }
            findings.insert(field.tag.to_string(), serde_json::Value::String(value));
        }

        self.analyze_gps(&exif, &mut findings);

        Ok(Some(findings))
    }

    fn analyze_gps(&self, exif: &Exif, findings: &mut Findings) {
        let gps_fields: Vec<&Field> = exif
            .fields()
            .filter(|f| f.ifd_num == In::PRIMARY && f.tag.context() == Context::Gps)
            .collect();

        if gps_fields.is_empty() {
            return;
        }

        self.logger.info("  [!] GPS Directory found. Analyzing...");
        for field in &gps_fields {
            self.logger.debug(&format!(
                "      Found GPS Tag: {} -> {}",
                field.tag,
                field_text(field, exif)
            ));
        }

        let has_coordinates = exif.get_field(Tag::GPSLatitude, In::PRIMARY).is_some()
            && exif.get_field(Tag::GPSLongitude, In::PRIMARY).is_some();
        if !has_coordinates {
            self.logger
                .warning("  [!] GPS Directory exists, but Latitude/Longitude keys are missing.");
            return;
        }

        match gps_position(exif) {
            Ok(position) => {
                let link = position.maps_link();
                self.logger.info(&format!(
                    "  [+] GPS Location: {}, {}",
                    position.latitude, position.longitude
                ));
                self.logger.info(&format!("  [+] Google Maps: {}", link));
                findings.insert("GoogleMapsLink".to_string(), serde_json::Value::String(link));
            }
            Err(e) => {
                self.logger
                    .warning(&format!("Could not convert GPS math: {}", e));
            }
        }
    }

    fn analyze_pdf(&self, path: &Path) -> Result<Option<Findings>> {
        let doc = Document::load(path)?;

        let info = match info_dictionary(&doc)? {
            Some(info) if !info.is_empty() => info,
            _ => {
                self.logger.info("No PDF metadata found.");
                return Ok(None);
            }
        };

        self.logger.info("PDF Metadata Found!");

        let mut findings = Findings::new();
        for (key, value) in info.iter() {
            let raw_key = String::from_utf8_lossy(key);
            let clean_key = raw_key.strip_prefix('/').unwrap_or(&*raw_key).to_string();

            let value = match value {
                Object::Reference(id) => doc.get_object(*id).unwrap_or(value),
                other => other,
            };
            let text = object_text(value);

            self.logger.info(&format!("  [+] {}: {}", clean_key, text));
            findings.insert(clean_key, serde_json::Value::String(text));
        }

        Ok(Some(findings))
    }
}

impl Default for MetadataExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReconModule for MetadataExtractor {
    fn name(&self) -> &str {
        "Metadata Extractor"
    }

    fn description(&self) -> &str {
        "Extracts EXIF and metadata from Images and PDFs"
    }

    async fn run(&self, target: &str) -> Option<Findings> {
        let path = Path::new(target);
        if !path.exists() {
            self.logger.error(&format!("File not found: {}", target));
            return None;
        }

        self.logger
            .info(&format!("Analyzing metadata for: {}", target));

        let result = match Self::classify(path) {
            Ok(FileKind::Image) => self.analyze_image(path).map_err(|e| ("Image", e)),
            Ok(FileKind::Document) => self.analyze_pdf(path).map_err(|e| ("PDF", e)),
            Err(e) => {
                self.logger.warning(&e.to_string());
                return None;
            }
        };

        match result {
            Ok(findings) => findings,
            Err((kind, e)) => {
                self.logger
                    .error(&format!("{} processing error: {}", kind, e));
                None
            }
        }
    }
}

/// Human-readable value; ASCII tags are shown without the quoting exif adds
fn field_text(field: &Field, exif: &Exif) -> String {
    match &field.value {
        Value::Ascii(parts) => parts
            .iter()
            .map(|p| String::from_utf8_lossy(p).trim_end_matches('\0').to_string())
            .collect::<Vec<_>>()
            .join(", "),
        _ => field.display_value().with_unit(exif).to_string(),
    }
}

fn gps_position(exif: &Exif) -> Result<GpsPosition> {
    let latitude = coordinate(exif, Tag::GPSLatitude, Tag::GPSLatitudeRef)?;
    let longitude = coordinate(exif, Tag::GPSLongitude, Tag::GPSLongitudeRef)?;
    Ok(GpsPosition {
        latitude,
        longitude,
    })
}

fn coordinate(exif: &Exif, value_tag: Tag, ref_tag: Tag) -> Result<f64> {
    let field = exif
        .get_field(value_tag, In::PRIMARY)
        .ok_or_else(|| ReconError::Coordinate(format!("{} is missing", value_tag)))?;

    let parts = match &field.value {
        Value::Rational(parts) if parts.len() >= 3 => parts,
        other => {
            return Err(ReconError::Coordinate(format!(
                "{} is not a DMS triple: {:?}",
                value_tag, other
            )))
        }
    };

    let (d, m, s) = (parts[0].to_f64(), parts[1].to_f64(), parts[2].to_f64());
    if ![d, m, s].iter().all(|v| v.is_finite()) {
        return Err(ReconError::Coordinate(format!(
            "{} has a zero denominator",
            value_tag
        )));
    }

    let hemisphere = exif
        .get_field(ref_tag, In::PRIMARY)
        .and_then(|f| match &f.value {
            Value::Ascii(parts) => parts.first().and_then(|p| p.first()).map(|b| *b as char),
            _ => None,
        });

    Ok(dms_to_decimal(d, m, s, hemisphere))
}

fn info_dictionary(doc: &Document) -> Result<Option<&Dictionary>> {
    let info = match doc.trailer.get(b"Info") {
        Ok(info) => info,
        Err(_) => return Ok(None),
    };

    match info {
        Object::Reference(id) => Ok(Some(doc.get_object(*id)?.as_dict()?)),
        Object::Dictionary(dict) => Ok(Some(dict)),
        _ => Ok(None),
    }
}

fn object_text(object: &Object) -> String {
    match object {
        Object::String(bytes, _) => decode_pdf_string(bytes),
        Object::Name(name) => String::from_utf8_lossy(name).into_owned(),
        Object::Integer(i) => i.to_string(),
        Object::Real(r) => r.to_string(),
        Object::Boolean(b) => b.to_string(),
        Object::Reference((id, generation)) => format!("{} {} R", id, generation),
        other => format!("{:?}", other),
    }
}

/// PDF text strings are UTF-16BE when they carry a byte-order mark
fn decode_pdf_string(bytes: &[u8]) -> String {
    match bytes.strip_prefix(&[0xFE, 0xFF]) {
        Some(utf16) => {
            let units: Vec<u16> = utf16
                .chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                .collect();
            String::from_utf16_lossy(&units)
        }
        None => String::from_utf8_lossy(bytes).into_owned(),
    }
}
