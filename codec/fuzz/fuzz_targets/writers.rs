#![no_main]

use arbitrary::Arbitrary;
use bufio_codec::{BufferWriter, Encoding, Error, Reader, StaticWriter, Writer};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
enum Op {
    U8(u8),
    U16Le(u16),
    U24Be(u32),
    I40Le(i64),
    U64Be(u64),
    F64Le(f64),
    Varint(u64),
    Varint2(u64),
    VarBytes(Vec<u8>),
    Ascii(String),
    Fill(u8, u8),
}

fn apply(writer: &mut impl Writer, op: &Op) -> Result<(), Error> {
    match op {
        Op::U8(v) => writer.write_u8(*v),
        Op::U16Le(v) => writer.write_u16_le(*v),
        Op::U24Be(v) => writer.write_u24_be(*v),
        Op::I40Le(v) => writer.write_i40_le(*v),
        Op::U64Be(v) => writer.write_u64_be(*v),
        Op::F64Le(v) => writer.write_f64_le(*v),
        Op::Varint(v) => writer.write_varint(*v),
        Op::Varint2(v) => writer.write_varint2(*v),
        Op::VarBytes(v) => writer.write_var_bytes(v),
        Op::Ascii(v) => writer.write_var_string(v, Encoding::Ascii),
        Op::Fill(v, n) => writer.fill(*v, usize::from(*n)),
    }
}

fn verify(reader: &mut Reader, op: &Op) {
    match op {
        Op::U8(v) => assert_eq!(reader.read_u8().unwrap(), *v),
        Op::U16Le(v) => assert_eq!(reader.read_u16_le().unwrap(), *v),
        Op::U24Be(v) => assert_eq!(reader.read_u24_be().unwrap(), *v),
        Op::I40Le(v) => assert_eq!(reader.read_i40_le().unwrap(), *v),
        Op::U64Be(v) => assert_eq!(reader.read_u64_be().unwrap(), *v),
        Op::F64Le(v) => assert_eq!(reader.read_f64_le().unwrap().to_bits(), v.to_bits()),
        Op::Varint(v) => assert_eq!(reader.read_varint().unwrap(), *v),
        Op::Varint2(v) => assert_eq!(reader.read_varint2().unwrap(), *v),
        Op::VarBytes(v) => assert_eq!(reader.read_var_bytes(false).unwrap(), &v[..]),
        Op::Ascii(v) => assert_eq!(&reader.read_var_string(Encoding::Ascii, 0).unwrap(), v),
        Op::Fill(v, n) => {
            let bytes = reader.read_bytes(usize::from(*n), false).unwrap();
            assert!(bytes.iter().all(|b| b == v));
        }
    }
}

fuzz_target!(|ops: Vec<Op>| {
    // Keep only the operations the deferred writer accepts
    let mut deferred = BufferWriter::new();
    let ops: Vec<Op> = ops
        .into_iter()
        .filter(|op| apply(&mut deferred, op).is_ok())
        .collect();
    let size = deferred.offset();
    let deferred = deferred.render().expect("deferred render failed");
    assert_eq!(deferred.len(), size);

    // The static writer must accept the same operations and produce the same bytes
    let mut fixed = StaticWriter::new(size);
    for op in &ops {
        apply(&mut fixed, op).expect("static writer rejected an accepted operation");
    }
    assert_eq!(fixed.render().expect("static render failed"), deferred);

    let mut reader = Reader::new(deferred);
    for op in &ops {
        verify(&mut reader, op);
    }
    assert_eq!(reader.left(), 0);
});
