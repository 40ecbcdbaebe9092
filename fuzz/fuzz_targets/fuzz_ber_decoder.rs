#![no_main]

use libfuzzer_sys::fuzz_target;

use snacc_ber::{
    AnyRegistry, AnyValue, BitString, Captured, Codec, Decode, Decoder, Discriminator, Null,
    OctetString, Oid, Result, Tag, oid,
};

fn registry() -> AnyRegistry {
    let registry = AnyRegistry::new();
    registry.register_by_int(1, 1, 0i64);
    registry.register_by_int(2, 2, OctetString::default());
    registry.register_by_oid(3, oid!(1, 2, 3), BitString::default());
    registry.register_by_oid(4, oid!(1, 2, 4), 0f64);
    registry
}

/// SEQUENCE { id INTEGER, value ANY DEFINED BY id }
fn decode_defined_by(dec: &mut Decoder<'_>) -> Result<AnyValue> {
    dec.expect_tag(Tag::SEQUENCE)?;
    let len = dec.read_length()?;
    dec.constructed(len, |dec| {
        let id = i64::decode(dec)?;
        AnyValue::decode_defined_by(dec, &Discriminator::Int(id))
    })
}

fuzz_target!(|data: &[u8]| {
    let registry = registry();
    let codec = Codec::new(&registry).max_depth(32).allow_trailing_data(true);

    // Primitive decoders
    let _ = codec.decode_pdu::<bool>(data);
    let _ = codec.decode_pdu::<i64>(data);
    let _ = codec.decode_pdu::<f64>(data);
    let _ = codec.decode_pdu::<Null>(data);
    let _ = codec.decode_pdu::<OctetString>(data);
    let _ = codec.decode_pdu::<BitString>(data);
    let _ = codec.decode_pdu::<Oid>(data);

    // Nested and indefinite-length framing
    let _ = codec.decode_pdu::<Vec<Captured>>(data);
    let _ = codec.decode_pdu::<Vec<Vec<i64>>>(data);

    // ANY dispatch
    let _ = codec.decode_pdu_with(data, decode_defined_by);

    // Captured values must re-encode to the same bytes
    if let Ok((captured, consumed)) = codec.decode_pdu::<Captured>(data) {
        let bytes = codec
            .clone()
            .block_size(consumed.max(1))
            .encode_pdu(&captured)
            .expect("captured value fits its own size");
        assert_eq!(&bytes[..], &data[..consumed]);
    }
});
