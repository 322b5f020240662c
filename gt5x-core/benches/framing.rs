//! Decoder throughput on bulk data frames.

use criterion::{Criterion, criterion_group, criterion_main};

use gt5x_core::packet::encode_data_frame;
use gt5x_core::{FrameDecoder, Progress};

fn decode_frame(stream: &[u8], payload_len: usize) -> usize {
    let mut decoder = FrameDecoder::data(payload_len, true);
    let mut delivered = 0;
    let mut pos = 0;
    while pos < stream.len() {
        let (used, progress) = decoder.advance(&stream[pos..]);
        pos += used;
        match progress {
            Progress::Payload(chunk) => delivered += chunk.len(),
            Progress::Complete => break,
            _ => {}
        }
    }
    delivered
}

fn bench_data_decode(c: &mut Criterion) {
    // Template-sized and raw-image-sized payloads
    for len in [498usize, 19200] {
        let body = vec![0x5Cu8; len];
        let frame = encode_data_frame(&body);

        c.bench_function(&format!("decode_data_{len}"), |b| {
            b.iter(|| decode_frame(std::hint::black_box(&frame), len))
        });
    }
}

criterion_group!(benches, bench_data_decode);
criterion_main!(benches);
