use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use trackdb::{codec, DescriptorTable, EaddMessage, EaddData, Record};

const INT_DATA: &[u8] = &[0xD1, 0x03, 0xE8];
const DOUBLE_DATA: &[u8] = &[0xCB, 0x40, 0x59, 0x0C, 0xCC, 0xCC, 0xCC, 0xCC, 0xCD];
const STRING_DATA: &[u8] = &[0xA3, 0x66, 0x6F, 0x6F];

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec_decode");
    for (name, buf) in [
        ("int16", INT_DATA),
        ("float64", DOUBLE_DATA),
        ("fixstr", STRING_DATA),
    ] {
        group.bench_with_input(BenchmarkId::from_parameter(name), buf, |b, buf| {
            b.iter(|| codec::decode(black_box(buf)).unwrap());
        });
    }
    group.finish();
}

fn bench_set_value(c: &mut Criterion) {
    let mut table = DescriptorTable::new(0, 2).unwrap();
    table.set_property(0, 0, "integer").unwrap();
    table.set_property(1, 8, "float").unwrap();
    table.set_property(2, 16, "string").unwrap();
    let mut record = Record::with_capacity(32);

    c.bench_function("descriptor_set_value", |b| {
        b.iter(|| {
            table
                .set_value(black_box(&mut record), 0, black_box(INT_DATA))
                .unwrap();
            table
                .set_value(black_box(&mut record), 1, black_box(DOUBLE_DATA))
                .unwrap();
            table
                .set_value(black_box(&mut record), 2, black_box(STRING_DATA))
                .unwrap();
        });
    });
}

fn bench_eadd_parse(c: &mut Criterion) {
    let bytes = EaddMessage::new(
        42,
        1_351_700_000_000,
        "checkout",
        (0..16)
            .map(|i| EaddData {
                key: format!("field_{i}"),
                value: vec![b'v'; 32],
            })
            .collect(),
    )
    .serialize();

    c.bench_function("eadd_parse", |b| {
        b.iter(|| EaddMessage::parse(black_box(&bytes)).unwrap());
    });
}

criterion_group!(benches, bench_decode, bench_set_value, bench_eadd_parse);
criterion_main!(benches);
