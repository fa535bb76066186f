use criterion::{black_box, criterion_group, criterion_main, Criterion};
use meshmap_crypto::{ChannelCipher, ChannelKey};
use meshmap_types::NodeNum;

fn aes128_ctr_small_bench(c: &mut Criterion) {
    let cipher = ChannelCipher::default();
    let data = [0xABu8; 64];
    let from = NodeNum::new(0xAAAA01);

    c.bench_function("aes128_ctr_decrypt_64B", |b| {
        b.iter(|| cipher.decrypt(black_box(42), from, black_box(&data)))
    });
}

fn aes128_ctr_max_packet_bench(c: &mut Criterion) {
    let cipher = ChannelCipher::default();
    // Largest LoRa payload the radios emit.
    let data = vec![0xCDu8; 237];
    let from = NodeNum::new(0xAAAA01);

    c.bench_function("aes128_ctr_decrypt_237B", |b| {
        b.iter(|| cipher.decrypt(black_box(42), from, black_box(&data)))
    });
}

fn aes256_ctr_bench(c: &mut Criterion) {
    let cipher = ChannelCipher::new(ChannelKey::Aes256([0x11; 32]));
    let data = vec![0xCDu8; 237];
    let from = NodeNum::new(0xAAAA01);

    c.bench_function("aes256_ctr_decrypt_237B", |b| {
        b.iter(|| cipher.decrypt(black_box(42), from, black_box(&data)))
    });
}

criterion_group!(
    benches,
    aes128_ctr_small_bench,
    aes128_ctr_max_packet_bench,
    aes256_ctr_bench
);
criterion_main!(benches);
