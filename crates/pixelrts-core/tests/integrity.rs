// crates/pixelrts-core/tests/integrity.rs

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;

use pixelrts_core::container::{read_png, write_png};
use pixelrts_core::meta::{read_sidecar, sidecar_path};
use pixelrts_core::{
    decode, encode, DecodeOptions, EncodeOptions, LoadedContainer, MetadataSource, Provenance,
    RtsError,
};

const PAYLOAD: &[u8] = b"integrity matters more than convenience, every single byte";

fn saved(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("payload.png");
    encode(PAYLOAD, &EncodeOptions::default())
        .unwrap()
        .save(&path)
        .unwrap();
    path
}

/// Rewrite the PNG keeping pixels but dropping the embedded block.
fn strip_embedded(path: &Path) {
    let (grid, embedded) = read_png(BufReader::new(File::open(path).unwrap())).unwrap();
    assert!(embedded.is_some());
    let row_bytes = grid.side() as usize * 4;
    let out = BufWriter::new(File::create(path).unwrap());
    write_png(out, grid.order(), None, |rows, buf| {
        let start = rows.start as usize * row_bytes;
        buf.copy_from_slice(&grid.as_rgba()[start..start + buf.len()]);
        Ok(())
    })
    .unwrap();
}

#[test]
fn flipped_pixel_byte_is_an_integrity_error() {
    let c = encode(PAYLOAD, &EncodeOptions::default()).unwrap();
    let mut loaded = LoadedContainer::from(c);
    let px = loaded.grid.pixel(0, 0);
    loaded.grid.set_pixel(0, 0, [px[0] ^ 0x01, px[1], px[2], px[3]]);

    match decode(&loaded, &DecodeOptions::default()) {
        Err(RtsError::Integrity { expected, actual }) => assert_ne!(expected, actual),
        other => panic!("expected integrity error, got {other:?}"),
    }

    let lenient = DecodeOptions {
        lenient: true,
        ..Default::default()
    };
    let d = decode(&loaded, &lenient).unwrap();
    assert!(!d.verified);
    assert_eq!(d.bytes.len(), PAYLOAD.len());
    assert_eq!(d.bytes[0], PAYLOAD[0] ^ 0x01);
    assert_eq!(&d.bytes[1..], &PAYLOAD[1..]);
}

#[test]
fn padding_is_not_hashed() {
    // Corrupting a padding channel leaves the payload intact.
    let c = encode(b"abcde", &EncodeOptions::default()).unwrap();
    let mut loaded = LoadedContainer::from(c);
    // order 1: pixel k=1 sits at (1, 0); channels 1..3 are padding
    let px = loaded.grid.pixel(1, 0);
    assert_eq!(px, [b'e', 0, 0, 0]);
    loaded.grid.set_pixel(1, 0, [b'e', 9, 9, 9]);
    let d = decode(&loaded, &DecodeOptions::default()).unwrap();
    assert!(d.verified);
    assert_eq!(d.bytes, b"abcde");
}

#[test]
fn removed_sidecar_still_verifies() {
    let dir = tempfile::tempdir().unwrap();
    let path = saved(dir.path());
    fs::remove_file(sidecar_path(&path)).unwrap();

    let d = decode(&LoadedContainer::open(&path).unwrap(), &DecodeOptions::default()).unwrap();
    assert!(d.verified);
    assert_eq!(d.bytes, PAYLOAD);
    assert_eq!(d.provenance, Provenance::EmbeddedOnly);
}

#[test]
fn embedded_block_removed_falls_back_to_sidecar() {
    let dir = tempfile::tempdir().unwrap();
    let path = saved(dir.path());
    strip_embedded(&path);

    let d = decode(&LoadedContainer::open(&path).unwrap(), &DecodeOptions::default()).unwrap();
    assert!(d.verified);
    assert_eq!(d.provenance, Provenance::SidecarOnly);
}

#[test]
fn both_copies_removed_is_metadata_missing() {
    let dir = tempfile::tempdir().unwrap();
    let path = saved(dir.path());
    strip_embedded(&path);
    fs::remove_file(sidecar_path(&path)).unwrap();

    let loaded = LoadedContainer::open(&path).unwrap();
    assert!(matches!(
        decode(&loaded, &DecodeOptions::default()),
        Err(RtsError::MetadataMissing { .. })
    ));
}

#[test]
fn disagreeing_copies_need_an_explicit_preference() {
    let dir = tempfile::tempdir().unwrap();
    let path = saved(dir.path());
    let mut side = read_sidecar(&path).unwrap().unwrap();
    side.extension_fields.insert("type".into(), "kernel".into());
    fs::write(sidecar_path(&path), serde_json::to_string_pretty(&side).unwrap()).unwrap();

    let loaded = LoadedContainer::open(&path).unwrap();
    match decode(&loaded, &DecodeOptions::default()) {
        Err(RtsError::MetadataMismatch { field, .. }) => assert_eq!(field, "extension_fields"),
        other => panic!("expected mismatch, got {other:?}"),
    }

    let opts = DecodeOptions {
        prefer: Some(MetadataSource::Embedded),
        ..Default::default()
    };
    let d = decode(&loaded, &opts).unwrap();
    assert!(d.verified);
    assert_eq!(d.provenance, Provenance::Preferred(MetadataSource::Embedded));
    assert!(d.metadata.extension_fields.is_empty());
}

#[test]
fn garbage_sidecar_reads_as_absent() {
    let dir = tempfile::tempdir().unwrap();
    let path = saved(dir.path());
    fs::write(sidecar_path(&path), b"not json at all").unwrap();

    let d = decode(&LoadedContainer::open(&path).unwrap(), &DecodeOptions::default()).unwrap();
    assert!(d.verified);
    assert_eq!(d.provenance, Provenance::EmbeddedOnly);
}

#[test]
fn non_utf8_sidecar_reads_as_absent() {
    let dir = tempfile::tempdir().unwrap();
    let path = saved(dir.path());
    fs::write(sidecar_path(&path), [0xffu8, 0xfe, 0x00, 0x80]).unwrap();

    let d = decode(&LoadedContainer::open(&path).unwrap(), &DecodeOptions::default()).unwrap();
    assert!(d.verified);
    assert_eq!(d.provenance, Provenance::EmbeddedOnly);
    assert_eq!(d.bytes, PAYLOAD);
}
