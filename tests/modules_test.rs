use exif::experimental::Writer;
use exif::{Field, In, Rational, Tag, Value};
use lopdf::{dictionary, Dictionary, Document, Object, StringFormat};
use mockall::mock;
use recon_hunter::core::{Config, ReconError, ReconModule, Result};
use recon_hunter::modules::{BreachChecker, FootprintTracker, MetadataExtractor};
use recon_hunter::utils::{HttpFetch, HttpRequest, HttpResponse, LogLevel, MemoryLogger};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;

mock! {
    pub Http {}

    impl HttpFetch for Http {
        fn get(&self, request: &HttpRequest) -> Result<HttpResponse>;
    }
}

fn http_returning(status: u16, body: &'static str) -> Arc<MockHttp> {
    let mut http = MockHttp::new();
    http.expect_get()
        .returning(move |_| Ok(HttpResponse::new(status, body)));
    Arc::new(http)
}

fn breach_checker(http: Arc<MockHttp>) -> (BreachChecker, Arc<MemoryLogger>) {
    let logger = Arc::new(MemoryLogger::new());
    let checker = BreachChecker::new()
        .with_config(Arc::new(Config::default()))
        .with_logger(logger.clone())
        .with_http(http);
    (checker, logger)
}

fn metadata_extractor() -> (MetadataExtractor, Arc<MemoryLogger>) {
    let logger = Arc::new(MemoryLogger::new());
    (MetadataExtractor::new().with_logger(logger.clone()), logger)
}

fn rational(num: u32, denom: u32) -> Rational {
    Rational { num, denom }
}

fn ascii(text: &str) -> Value {
    Value::Ascii(vec![text.as_bytes().to_vec()])
}

fn tiff_bytes(fields: &[Field]) -> Vec<u8> {
    let mut writer = Writer::new();
    for field in fields {
        writer.push_field(field);
    }
    let mut tiff = Cursor::new(Vec::new());
    writer.write(&mut tiff, false).unwrap();
    tiff.into_inner()
}

/// Minimal JPEG: SOI, one APP1 Exif segment, EOI
fn write_jpeg(path: &Path, fields: &[Field]) {
    let tiff = tiff_bytes(fields);

    let mut jpeg = vec![0xFF, 0xD8, 0xFF, 0xE1];
    let segment_len = (2 + 6 + tiff.len()) as u16;
    jpeg.extend_from_slice(&segment_len.to_be_bytes());
    jpeg.extend_from_slice(b"Exif\0\0");
    jpeg.extend_from_slice(&tiff);
    jpeg.extend_from_slice(&[0xFF, 0xD9]);

    std::fs::write(path, jpeg).unwrap();
}

fn crc32(bytes: &[u8]) -> u32 {
    let mut crc = 0xFFFF_FFFFu32;
    for byte in bytes {
        crc ^= *byte as u32;
        for _ in 0..8 {
            let mask = (crc & 1).wrapping_neg();
            crc = (crc >> 1) ^ (0xEDB8_8320 & mask);
        }
    }
    !crc
}

fn png_chunk(png: &mut Vec<u8>, kind: &[u8; 4], data: &[u8]) {
    png.extend_from_slice(&(data.len() as u32).to_be_bytes());
    let mut body = kind.to_vec();
    body.extend_from_slice(data);
    png.extend_from_slice(&body);
    png.extend_from_slice(&crc32(&body).to_be_bytes());
}

/// Minimal PNG: signature, 1x1 IHDR, eXIf, IEND
fn write_png(path: &Path, fields: &[Field]) {
    let mut png = b"\x89PNG\r\n\x1a\n".to_vec();
    let mut ihdr = Vec::new();
    ihdr.extend_from_slice(&1u32.to_be_bytes());
    ihdr.extend_from_slice(&1u32.to_be_bytes());
    ihdr.extend_from_slice(&[8, 2, 0, 0, 0]);
    png_chunk(&mut png, b"IHDR", &ihdr);
    png_chunk(&mut png, b"eXIf", &tiff_bytes(fields));
    png_chunk(&mut png, b"IEND", &[]);

    std::fs::write(path, png).unwrap();
}

fn camera_fields() -> Vec<Field> {
    vec![
        Field {
            tag: Tag::Make,
            ifd_num: In::PRIMARY,
            value: ascii("Canon"),
        },
        Field {
            tag: Tag::Model,
            ifd_num: In::PRIMARY,
            value: ascii("Canon EOS 80D"),
        },
    ]
}

fn write_pdf(path: &Path, info: Option<Dictionary>) {
    write_pdf_with(path, |_| info);
}

/// `build` may add objects to the document before returning the info dictionary
fn write_pdf_with<F>(path: &Path, build: F)
where
    F: FnOnce(&mut Document) -> Option<Dictionary>,
{
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    if let Some(info) = build(&mut doc) {
        let info_id = doc.add_object(info);
        doc.trailer.set("Info", info_id);
    }

    doc.save(path).unwrap();
}

fn temp_file(dir: &tempfile::TempDir, name: &str) -> PathBuf {
    dir.path().join(name)
}

#[tokio::test]
async fn breach_clean_target_returns_none() {
    let (checker, logger) = breach_checker(http_returning(200, r#"{"success": false}"#));

    assert!(checker.run("alice@example.com").await.is_none());
    assert!(logger.contains(LogLevel::Info, "clean"));
}

#[tokio::test]
async fn breach_hits_return_body_and_one_block_per_source() {
    let body = r#"{"success": true, "found": 3, "sources": [
        {"name": "A", "date": "2020-01"},
        {"name": "B", "date": "2021-02", "fields": ["password"]},
        {"name": "C", "date": "2022-03", "fields": []}
    ]}"#;
    let (checker, logger) = breach_checker(http_returning(200, body));

    let findings = checker.run("alice@example.com").await.unwrap();

    assert_eq!(findings["success"], serde_json::json!(true));
    assert_eq!(findings["sources"].as_array().unwrap().len(), 3);
    assert_eq!(logger.count_containing("-> Source:"), 3);
    assert_eq!(logger.count_containing("--------------------------------"), 3);
}

#[tokio::test]
async fn breach_rate_limit_is_an_error() {
    let (checker, logger) = breach_checker(http_returning(429, ""));

    assert!(checker.run("alice@example.com").await.is_none());
    assert!(logger.contains(LogLevel::Error, "Rate limit"));
}

#[tokio::test]
async fn breach_transport_error_is_contained() {
    let mut http = MockHttp::new();
    http.expect_get()
        .returning(|_| Err(ReconError::Http("could not resolve host".to_string())));
    let (checker, logger) = breach_checker(Arc::new(http));

    assert!(checker.run("alice@example.com").await.is_none());
    assert!(logger.contains(LogLevel::Error, "could not resolve host"));
}

#[tokio::test]
async fn footprint_resolves_upi_providers() {
    for (target, provider) in [
        ("alice@okaxis", "Google Pay (Axis)"),
        ("alice@unknownbank", "Unknown Provider"),
    ] {
        let logger = Arc::new(MemoryLogger::new());
        let tracker = FootprintTracker::new()
            .with_logger(logger.clone())
            .with_http(http_returning(200, "{}"));

        assert!(tracker.run(target).await.is_none());
        assert!(logger.contains(LogLevel::Info, provider), "{}", target);
    }
}

#[tokio::test]
async fn footprint_github_404_generates_dork() {
    let mut http = MockHttp::new();
    http.expect_get().returning(|req| {
        let status = if req.url.contains("api.github.com") { 404 } else { 500 };
        Ok(HttpResponse::new(status, ""))
    });
    let logger = Arc::new(MemoryLogger::new());
    let tracker = FootprintTracker::new()
        .with_logger(logger.clone())
        .with_http(Arc::new(http));

    tracker.run("octocat").await;

    assert!(logger.contains(LogLevel::Info, "github.com/octocat"));
    // Reddit's 500 is skipped without a fallback
    assert!(!logger.contains(LogLevel::Info, "reddit.com/user/octocat"));
}

#[tokio::test]
async fn metadata_gps_jpeg_yields_maps_link() {
    let dir = tempfile::tempdir().unwrap();
    let path = temp_file(&dir, "holiday.jpg");

    let mut fields = camera_fields();
    fields.extend([
        Field {
            tag: Tag::GPSLatitudeRef,
            ifd_num: In::PRIMARY,
            value: ascii("N"),
        },
        Field {
            tag: Tag::GPSLatitude,
            ifd_num: In::PRIMARY,
            value: Value::Rational(vec![rational(40, 1), rational(26, 1), rational(4600, 100)]),
        },
        Field {
            tag: Tag::GPSLongitudeRef,
            ifd_num: In::PRIMARY,
            value: ascii("W"),
        },
        Field {
            tag: Tag::GPSLongitude,
            ifd_num: In::PRIMARY,
            value: Value::Rational(vec![rational(74, 1), rational(0, 1), rational(21, 1)]),
        },
    ]);
    write_jpeg(&path, &fields);

    let (extractor, logger) = metadata_extractor();
    let findings = extractor.run(path.to_str().unwrap()).await.unwrap();

    let link = findings["GoogleMapsLink"].as_str().unwrap();
    let coords = link.strip_prefix("https://www.google.com/maps?q=").unwrap();
    let (lat, lon) = coords.split_once(',').unwrap();
    let lat: f64 = lat.parse().unwrap();
    let lon: f64 = lon.parse().unwrap();

    assert!((lat - 40.446111).abs() < 1e-4);
    assert!((lon + 74.005833).abs() < 1e-4);
    assert_eq!(findings["Make"], serde_json::json!("Canon"));
    assert!(logger.contains(LogLevel::Info, "Model: Canon EOS 80D"));
    assert!(!logger.messages(LogLevel::Debug).is_empty());
}

#[tokio::test]
async fn metadata_gps_without_coordinates_still_returns_tags() {
    let dir = tempfile::tempdir().unwrap();
    let path = temp_file(&dir, "canon.jpeg");

    let mut fields = camera_fields();
    fields.push(Field {
        tag: Tag::GPSVersionID,
        ifd_num: In::PRIMARY,
        value: Value::Byte(vec![2, 2, 0, 0]),
    });
    write_jpeg(&path, &fields);

    let (extractor, logger) = metadata_extractor();
    let findings = extractor.run(path.to_str().unwrap()).await.unwrap();

    assert!(findings.contains_key("Model"));
    assert!(!findings.contains_key("GoogleMapsLink"));
    assert!(logger.contains(LogLevel::Warning, "Latitude/Longitude keys are missing"));
}

#[tokio::test]
async fn metadata_unconvertible_gps_keeps_tags() {
    let bad_latitudes = [
        vec![rational(40, 0), rational(26, 1), rational(46, 1)],
        vec![rational(40, 1), rational(26, 1)],
    ];

    for latitude in bad_latitudes {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_file(&dir, "tampered.jpg");

        let mut fields = camera_fields();
        fields.extend([
            Field {
                tag: Tag::GPSLatitudeRef,
                ifd_num: In::PRIMARY,
                value: ascii("N"),
            },
            Field {
                tag: Tag::GPSLatitude,
                ifd_num: In::PRIMARY,
                value: Value::Rational(latitude),
            },
            Field {
                tag: Tag::GPSLongitude,
                ifd_num: In::PRIMARY,
                value: Value::Rational(vec![rational(74, 1), rational(0, 1), rational(21, 1)]),
            },
        ]);
        write_jpeg(&path, &fields);

        let (extractor, logger) = metadata_extractor();
        let findings = extractor.run(path.to_str().unwrap()).await.unwrap();

        assert_eq!(findings["Make"], serde_json::json!("Canon"));
        assert_eq!(findings["Model"], serde_json::json!("Canon EOS 80D"));
        assert!(!findings.contains_key("GoogleMapsLink"));
        assert!(logger.contains(LogLevel::Warning, "Could not convert GPS math"));
        assert!(!logger.contains(LogLevel::Info, "Google Maps"));
        assert!(logger.messages(LogLevel::Error).is_empty());
    }
}

#[tokio::test]
async fn metadata_png_exif_is_read() {
    let dir = tempfile::tempdir().unwrap();
    let path = temp_file(&dir, "screenshot.PNG");
    write_png(&path, &camera_fields());

    let (extractor, logger) = metadata_extractor();
    let findings = extractor.run(path.to_str().unwrap()).await.unwrap();

    assert_eq!(findings["Make"], serde_json::json!("Canon"));
    assert!(logger.contains(LogLevel::Info, "EXIF Data Found!"));
    assert!(logger.contains(LogLevel::Info, "Make: Canon"));
}

#[tokio::test]
async fn metadata_missing_file() {
    let (extractor, logger) = metadata_extractor();

    assert!(extractor.run("/definitely/not/here.jpg").await.is_none());
    assert!(logger.contains(LogLevel::Error, "File not found"));
}

#[tokio::test]
async fn metadata_unsupported_type() {
    let dir = tempfile::tempdir().unwrap();
    let path = temp_file(&dir, "notes.txt");
    std::fs::write(&path, "hello").unwrap();

    let (extractor, logger) = metadata_extractor();

    assert!(extractor.run(path.to_str().unwrap()).await.is_none());
    assert!(logger.contains(LogLevel::Warning, "Unsupported file type: .txt"));
}

#[tokio::test]
async fn metadata_corrupt_image_is_contained() {
    let dir = tempfile::tempdir().unwrap();
    let path = temp_file(&dir, "broken.png");
    std::fs::write(&path, b"definitely not a png").unwrap();

    let (extractor, logger) = metadata_extractor();

    assert!(extractor.run(path.to_str().unwrap()).await.is_none());
    assert!(logger.contains(LogLevel::Error, "Image processing error"));
}

#[tokio::test]
async fn metadata_pdf_info_fields() {
    let dir = tempfile::tempdir().unwrap();
    let path = temp_file(&dir, "report.PDF");
    write_pdf(
        &path,
        Some(dictionary! {
            "Author" => Object::string_literal("Jane Doe"),
            "Creator" => Object::string_literal("LibreOffice Writer"),
        }),
    );

    let (extractor, logger) = metadata_extractor();
    let findings = extractor.run(path.to_str().unwrap()).await.unwrap();

    assert_eq!(findings["Author"], serde_json::json!("Jane Doe"));
    assert_eq!(findings["Creator"], serde_json::json!("LibreOffice Writer"));
    assert!(logger.contains(LogLevel::Info, "PDF Metadata Found!"));
}

#[tokio::test]
async fn metadata_pdf_without_info() {
    let dir = tempfile::tempdir().unwrap();
    let path = temp_file(&dir, "bare.pdf");
    write_pdf(&path, None);

    let (extractor, logger) = metadata_extractor();

    assert!(extractor.run(path.to_str().unwrap()).await.is_none());
    assert!(logger.contains(LogLevel::Info, "No PDF metadata found."));
}

#[tokio::test]
async fn metadata_pdf_resolves_indirect_utf16_values() {
    let dir = tempfile::tempdir().unwrap();
    let path = temp_file(&dir, "cv.pdf");

    let mut utf16 = vec![0xFE, 0xFF];
    utf16.extend("Zoë Ångström".encode_utf16().flat_map(|unit| unit.to_be_bytes()));

    write_pdf_with(&path, |doc| {
        let author_id = doc.add_object(Object::String(utf16, StringFormat::Hexadecimal));
        Some(dictionary! {
            "Author" => author_id,
            "Title" => Object::string_literal("Curriculum Vitae"),
        })
    });

    let (extractor, logger) = metadata_extractor();
    let findings = extractor.run(path.to_str().unwrap()).await.unwrap();

    assert_eq!(findings["Author"], serde_json::json!("Zoë Ångström"));
    assert_eq!(findings["Title"], serde_json::json!("Curriculum Vitae"));
    assert!(logger.contains(LogLevel::Info, "Author: Zoë Ångström"));
}
