#![no_main]

use libfuzzer_sys::fuzz_target;

use snacc_ber::oid::Oid;

fuzz_target!(|data: &[u8]| {
    // OID from BER content; valid content must round-trip
    if let Ok(oid) = Oid::from_ber(data) {
        assert_eq!(Oid::from_ber(&oid.to_ber_smallvec().unwrap()).unwrap(), oid);
    }

    // OID from dotted string notation (if data is valid UTF-8)
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(oid) = Oid::parse(s) {
            assert_eq!(oid.to_string().parse::<Oid>().unwrap(), oid);
        }
    }
});
