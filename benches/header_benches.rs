//! Benchmarks for header encoding/decoding and request framing.
//!
//! Run with: cargo bench

use std::hint::black_box;
use std::io::Cursor;

use criterion::{criterion_group, criterion_main, Criterion};
use ownet::{read_message, write_message, OwHeader, Request, DEFAULT_FLAGS};

fn header_benches(c: &mut Criterion) {
    let header = OwHeader::new(2, 23, DEFAULT_FLAGS, 16, 0);
    let bytes = header.to_bytes();

    c.bench_function("header_to_bytes", |b| {
        b.iter(|| black_box(header).to_bytes())
    });

    c.bench_function("header_from_bytes", |b| {
        b.iter(|| OwHeader::from_bytes(black_box(&bytes)).unwrap())
    });
}

fn request_benches(c: &mut Criterion) {
    let path = "/3A.BEE71B000000/PIO.B";

    c.bench_function("request_read", |b| {
        b.iter(|| Request::read(black_box(path), 0, 16, DEFAULT_FLAGS).unwrap())
    });

    c.bench_function("request_write", |b| {
        b.iter(|| Request::write(black_box(path), 0, black_box(b"1"), DEFAULT_FLAGS).unwrap())
    });

    let request = Request::write(path, 0, b"1", DEFAULT_FLAGS).unwrap();
    c.bench_function("write_message", |b| {
        let mut wire = Vec::with_capacity(64);
        b.iter(|| {
            wire.clear();
            write_message(&mut wire, request.header(), request.payload()).unwrap();
        })
    });

    let mut response = OwHeader::new(2, 6, 0, 0, 0).to_bytes().to_vec();
    response.extend_from_slice(b"DS2413");
    c.bench_function("read_message", |b| {
        let mut buf = [0u8; 16];
        b.iter(|| read_message(&mut Cursor::new(black_box(&response)), &mut buf).unwrap())
    });
}

criterion_group!(benches, header_benches, request_benches);
criterion_main!(benches);
