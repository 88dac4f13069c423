#![no_main]

use bufio_codec::{Encoding, RangeCfg, Reader, Struct};
use bytes::Bytes;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let data = Bytes::copy_from_slice(data);

    // Decoding arbitrary input may fail but must never panic
    let _ = Vec::<Bytes>::decode_cfg(data.clone(), &(RangeCfg::new(..1024), RangeCfg::default()));
    let _ = <(String, Bytes)>::decode_cfg(data.clone(), &RangeCfg::new(..=64));

    let mut reader = Reader::with_zero_copy(data);
    reader.start();
    let _ = reader.read_varint2();
    let _ = reader.read_var_string(Encoding::Latin1, 64);
    let _ = reader.read_null_string(Encoding::Utf8);
    let _ = reader.verify_checksum(|data| data.iter().rev().copied().collect());
    if let Ok(consumed) = reader.end() {
        assert!(consumed <= reader.size());
    }
});
