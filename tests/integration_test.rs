//! Integration tests for hfm

use hfm::code_table::CodeTable;
use hfm::error::CodecError;
use hfm::frequency::count_frequencies;
use hfm::header::{FileHeader, FIXED_HEADER_LEN, FORMAT_VERSION};
use hfm::tree::HuffmanTree;
use hfm::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[test]
fn test_full_lifecycle() {
    let codec = Codec::default();
    let data = b"the quick brown fox jumps over the lazy dog".repeat(50);
    let artifact = codec.encode(&data).unwrap();
    assert!(artifact.len() < data.len());
    assert_eq!(codec.decode(&artifact).unwrap(), data);
}

#[test]
fn test_random_roundtrips() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    for len in [1usize, 2, 3, 7, 8, 9, 100, 1000, 4096] {
        let data: Vec<u8> = (0..len).map(|_| rng.gen()).collect();
        let artifact = encode(&data).unwrap();
        assert_eq!(decode(&artifact).unwrap(), data, "roundtrip failed for len {}", len);
    }
}

#[test]
fn test_small_alphabet_random_roundtrips() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..50 {
        let len = rng.gen_range(1..500);
        let data: Vec<u8> = (0..len).map(|_| rng.gen_range(b'a'..=b'e')).collect();
        assert_eq!(decode(&encode(&data).unwrap()).unwrap(), data);
    }
}

#[test]
fn test_empty_input() {
    let artifact = encode(&[]).unwrap();
    let (header, payload) = FileHeader::parse(&artifact).unwrap();
    assert_eq!(header.content_bit_len, 0);
    assert!(header.codes.is_empty());
    assert!(payload.is_empty());
    assert!(decode(&artifact).unwrap().is_empty());
}

#[test]
fn test_single_repeated_byte() {
    let data = vec![0x41u8; 1000];
    let artifact = encode(&data).unwrap();
    let (header, payload) = FileHeader::parse(&artifact).unwrap();
    assert_eq!(header.content_bit_len, 1000);
    assert_eq!(header.codes.get("0"), Some(&0x41));
    assert_eq!(payload.len(), 125);
    assert_eq!(decode(&artifact).unwrap(), data);
}

#[test]
fn test_single_byte_input() {
    let artifact = encode(b"z").unwrap();
    assert_eq!(decode(&artifact).unwrap(), b"z");
}

#[test]
fn test_full_alphabet() {
    let mut data = Vec::new();
    for b in 0..=255u8 {
        data.extend(std::iter::repeat(b).take(b as usize + 1));
    }
    let tree = HuffmanTree::build(&count_frequencies(&data)).unwrap();
    assert_eq!(tree.leaf_count(), 256);

    let table = CodeTable::from_tree(&tree);
    assert_eq!(table.len(), 256);
    let codes: Vec<&[bool]> = table.iter().map(|(_, c)| c).collect();
    for (i, a) in codes.iter().enumerate() {
        for (j, b) in codes.iter().enumerate() {
            if i != j {
                assert!(!b.starts_with(a), "code {} prefixes code {}", i, j);
            }
        }
    }

    assert_eq!(decode(&encode(&data).unwrap()).unwrap(), data);
}

#[test]
fn test_header_exactness() {
    let artifact = Codec::default().encode_at(b"aaaaaaaaab", 1_600_000_000).unwrap();
    let table = br#"{"0":98,"1":97}"#;

    assert_eq!(artifact[0], FORMAT_VERSION);
    assert_eq!(&artifact[1..9], &1_600_000_000i64.to_le_bytes());
    assert_eq!(&artifact[9..17], &10i64.to_le_bytes());
    assert_eq!(&artifact[17..19], &(table.len() as i16).to_le_bytes());
    assert_eq!(&artifact[FIXED_HEADER_LEN..FIXED_HEADER_LEN + table.len()], &table[..]);
    // 'a' -> 1, 'b' -> 0: nine ones then a zero
    assert_eq!(&artifact[FIXED_HEADER_LEN + table.len()..], &[0xFF, 0x80]);
}

#[test]
fn test_truncated_payload_is_detected() {
    let data = b"corruption must never pass silently".repeat(4);
    let artifact = encode(&data).unwrap();
    let err = decode(&artifact[..artifact.len() - 1]).unwrap_err();
    assert!(matches!(err, CodecError::MalformedPayload(_)), "got {:?}", err);
}

#[test]
fn test_short_artifact_is_malformed_header() {
    let artifact = encode(b"hello").unwrap();
    for len in [0, 1, 9, 18] {
        assert!(matches!(
            decode(&artifact[..len]),
            Err(CodecError::MalformedHeader(_))
        ));
    }
}

#[test]
fn test_corrupted_table_is_malformed_table() {
    let mut artifact = encode(b"aaaaaaaaab").unwrap();
    // first character of the JSON table
    artifact[FIXED_HEADER_LEN] = b'[';
    assert!(matches!(
        decode(&artifact),
        Err(CodecError::MalformedTable(_))
    ));
}

#[test]
fn test_determinism_with_ties() {
    let codec = Codec::default();
    let data = b"abcdefgh".repeat(16);
    let first = codec.encode_at(&data, 0).unwrap();
    for _ in 0..10 {
        assert_eq!(codec.encode_at(&data, 0).unwrap(), first);
    }

    let a = CodeTable::from_tree(&HuffmanTree::build(&count_frequencies(&data)).unwrap());
    let b = CodeTable::from_tree(&HuffmanTree::build(&count_frequencies(&data)).unwrap());
    assert_eq!(a, b);
    // eight equally weighted symbols give a balanced tree
    assert!(a.iter().all(|(_, code)| code.len() == 3));
}

#[test]
fn test_compression_sanity() {
    let data = b"aaaaaaaaab";
    let (header, _) = FileHeader::parse(&encode(data).unwrap()).unwrap();
    assert!((header.content_bit_len as usize) < 8 * data.len());

    let mut rng = StdRng::seed_from_u64(7);
    let noise: Vec<u8> = (0..10_000).map(|_| rng.gen()).collect();
    assert_eq!(decode(&encode(&noise).unwrap()).unwrap(), noise);
}

#[test]
fn test_large_data() {
    let codec = Codec::default();
    let data = vec![0xABu8; 100_000];
    let (artifact, stats) = codec.encode_with_stats(&data).unwrap();
    assert!(stats.ratio < 0.5, "uniform data should compress well");
    assert_eq!(codec.decode(&artifact).unwrap(), data);
}

#[test]
fn test_codec_config() {
    use hfm::config::CodecConfig;
    let config = CodecConfig {
        max_input_size: 1024,
        verify_after_encode: true,
        ..CodecConfig::default()
    };
    let codec = Codec::new(config);
    let data = b"config test data with a verified encode";
    let artifact = codec.encode(data).unwrap();
    assert_eq!(codec.decode(&artifact).unwrap(), data);
    assert!(codec.encode(&vec![0u8; 2048]).is_err());
}
