// Phase 2: CCITT 画像ビルダーテスト

use pdf_image_ingest::error::IngestError;
use pdf_image_ingest::image::ImageKind;
use pdf_image_ingest::image::bits::{reverse_bits, reversed};
use pdf_image_ingest::image::ccitt::{
    CcittBuilder, CcittFlags, CcittKind, CompressionParameters, build_ccitt,
};

fn g4() -> CompressionParameters {
    CompressionParameters::new(CcittKind::G4, CcittFlags::empty())
}

#[test]
fn test_reverse_twice_is_identity() {
    let inputs: [&[u8]; 3] = [&[], &[0x00, 0xFF], &[0x12, 0x34, 0x56, 0x78, 0x9A]];
    for input in inputs {
        let mut buf = input.to_vec();
        reverse_bits(&mut buf);
        reverse_bits(&mut buf);
        assert_eq!(buf, input);
        assert_eq!(reversed(&reversed(input)), input);
    }
}

#[test]
fn test_build_with_reversed_bits() {
    let record = CcittBuilder::new(100, 50, g4())
        .reverse_bits(true)
        .data(vec![0x0F])
        .build()
        .expect("should build");

    assert_eq!(record.kind(), ImageKind::Raw);
    assert_eq!(record.width(), 100.0);
    assert_eq!(record.height(), 50.0);
    assert_eq!(record.data(), Some(&[0xF0][..]));
}

#[test]
fn test_build_keeps_bytes_without_reverse() {
    let record = CcittBuilder::new(8, 8, g4())
        .data(vec![0x0F, 0x01])
        .build()
        .expect("should build");
    assert_eq!(record.data(), Some(&[0x0F, 0x01][..]));
}

#[test]
fn test_overloaded_fields_carry_codec_and_flags() {
    let params = CompressionParameters::new(
        CcittKind::G3_2D,
        CcittFlags::BLACK_IS_1 | CcittFlags::END_OF_LINE,
    );
    let record = CcittBuilder::new(10, 10, params)
        .data(vec![0xAA])
        .build()
        .expect("should build");
    assert_eq!(record.bits_per_component(), 258);
    assert_eq!(record.colorspace_or_flags(), 1 | 4);
}

#[test]
fn test_unknown_type_code_is_bad_format() {
    for code in [0, 1, 255, 259, -256] {
        for (w, h) in [(1, 1), (100, 50), (0, 0)] {
            let err = build_ccitt(w, h, false, code, 0, &[0x00]).unwrap_err();
            assert!(
                matches!(err, IngestError::BadFormat(_)),
                "code {code} should be BadFormat, got {err:?}"
            );
        }
    }
}

#[test]
fn test_known_type_codes() {
    for (code, kind) in [
        (256, CcittKind::G4),
        (257, CcittKind::G3_1D),
        (258, CcittKind::G3_2D),
    ] {
        let record = build_ccitt(4, 4, false, code, 0, &[0x00]).expect("should build");
        assert_eq!(record.bits_per_component(), kind.code());
    }
}

#[test]
fn test_missing_data_is_argument_null() {
    let err = CcittBuilder::new(10, 10, g4()).build().unwrap_err();
    assert!(matches!(err, IngestError::ArgumentNull(_)));
}

#[test]
fn test_empty_data_is_invalid_input() {
    let err = CcittBuilder::new(10, 10, g4())
        .data(Vec::new())
        .build()
        .unwrap_err();
    assert!(matches!(err, IngestError::InvalidInput(_)));
}

#[test]
fn test_zero_dimension_is_invalid_input() {
    for (w, h) in [(0, 10), (10, 0)] {
        let err = CcittBuilder::new(w, h, g4())
            .data(vec![0x00])
            .build()
            .unwrap_err();
        assert!(matches!(err, IngestError::InvalidInput(_)));
    }
}

#[test]
fn test_dimension_beyond_float_precision_is_invalid_input() {
    let err = CcittBuilder::new(16_777_217, 10, g4())
        .data(vec![0x00])
        .build()
        .unwrap_err();
    assert!(matches!(err, IngestError::InvalidInput(ref m) if m.contains("16777217")));

    let record = CcittBuilder::new(16_777_216, 10, g4())
        .data(vec![0x00])
        .build()
        .expect("2^24 is exact");
    assert_eq!(record.width(), 16_777_216.0);
}
