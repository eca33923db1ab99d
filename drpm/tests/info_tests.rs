//! The caller-visible projection

mod common;

use common::*;
use drpm::{Compression, DeltaInfo, DeltaRpm, DeltaType};

#[test]
fn projection_of_a_populated_delta() {
    let mut body = DeltaBody::v3();
    body.tgt_md5 = *b"\x00\x01\x02\x03\x04\x05\x06\x07\x08\x09\x0a\x0b\x0c\x0d\x0e\x0f";
    body.tgt_comp_param = vec![0xbe, 0xef];
    body.offadj = vec![(1, 0x8000_0005)];
    body.int_data = vec![0; 4];
    body.int_copies = vec![(7, 2), (9, 2)];
    body.ext_data_len = 10;
    body.ext_copies = vec![(0, 4), (0x8000_0002, 8)];

    let file = temp_drpm(&rpmonly_file(
        "foo-1.0-1.x86_64",
        &[],
        &gzip(&body.encode()),
    ));
    let delta = DeltaRpm::read_file(file.path()).unwrap();
    let info = DeltaInfo::from_delta(&delta).unwrap();

    assert_eq!(info.filename, file.path());
    assert_eq!(info.delta_type, DeltaType::RpmOnly);
    assert_eq!(info.version, 3);
    assert_eq!(info.comp, Compression::Gzip);
    assert_eq!(info.src_nevr, "bar-0.9-1.x86_64");
    assert_eq!(info.tgt_nevr, "foo-1.0-1.x86_64");

    // hex fields are twice as long as their sources
    assert_eq!(info.sequence.len(), 32);
    assert_eq!(info.tgt_md5, "000102030405060708090a0b0c0d0e0f");
    assert_eq!(info.tgt_leadsig.len(), 224);
    assert!(info.tgt_leadsig.chars().all(|c| c == 'a'));
    assert_eq!(info.tgt_comp_param.as_deref(), Some("beef"));

    // tables flatten to wire word order, signed entries two's-complement
    assert_eq!(info.offadj_elems, vec![1, (-5i32) as u32]);
    assert_eq!(info.int_copies, vec![7, 2, 9, 2]);
    assert_eq!(info.ext_copies, vec![0, 4, (-2i32) as u32, 8]);

    assert_eq!(info.tgt_size, 0x100);
    assert_eq!(info.tgt_header_len, 0x50);
    assert_eq!(info.payload_fmt_off, 0);
    assert_eq!(info.ext_data_len, 10);
    assert_eq!(info.int_data_len, 4);
}

#[test]
fn projection_omits_absent_compression_params() {
    let body = DeltaBody::v3();
    let file = temp_drpm(&rpmonly_file(
        "foo-1.0-1.x86_64",
        &[],
        &gzip(&body.encode()),
    ));
    let delta = DeltaRpm::read_file(file.path()).unwrap();
    let info = DeltaInfo::from_delta(&delta).unwrap();

    assert_eq!(info.tgt_comp_param, None);
    assert!(info.offadj_elems.is_empty());
    assert!(info.int_copies.is_empty());
    assert!(info.ext_copies.is_empty());
}

#[test]
fn projection_resolves_standard_nevr_from_rpm_header() {
    let body = DeltaBody::v1();
    let file = temp_drpm(&standard_file(
        &minimal_rpm(Some("xz")),
        &gzip(&body.encode()),
    ));
    let delta = DeltaRpm::read_file(file.path()).unwrap();
    let info = DeltaInfo::from_delta(&delta).unwrap();

    assert_eq!(info.tgt_nevr, "foo-1.0-1");
    assert_eq!(info.tgt_comp, Compression::Xz);
    // 32-bit widened lengths on version 1
    assert_eq!(info.ext_data_len, 0);
    assert_eq!(info.int_data_len, 0);
}
