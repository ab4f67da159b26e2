//! Derivation benchmark: normalized table → per-source-IP features, both sensors.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ids_predict::config::AppConfig;
use ids_predict::features::derive_features;
use ids_predict::ingest::{normalize, read_csv};
use ids_predict::SensorVariant;

fn snort_export(rows: usize) -> String {
    let mut csv = String::from("timestamp,src_ip,dst_ip,src_port,dst_port,protocol,msg\n");
    for i in 0..rows {
        csv.push_str(&format!(
            "10/05-12:{:02}:{:02}.{:06},10.0.{}.{},10.0.0.1,{},{},TCP,bench\n",
            (i / 60) % 60,
            i % 60,
            (i * 7919) % 1_000_000,
            i % 4,
            i % 50,
            40000 + i % 100,
            [22, 80, 443][i % 3],
        ));
    }
    csv
}

fn suricata_export(rows: usize) -> String {
    let mut csv = String::from("timestamp,src_ip,dst_ip,src_port,dst_port,protocol,message\n");
    for i in 0..rows {
        csv.push_str(&format!(
            "2025-01-15T10:{:02}:{:02}.{:06}+0000,192.168.{}.{},192.168.0.1,{},{},UDP,bench\n",
            (i / 60) % 60,
            i % 60,
            (i * 7919) % 1_000_000,
            i % 4,
            i % 50,
            if i % 17 == 0 { "-".to_string() } else { (40000 + i % 100).to_string() },
            53,
        ));
    }
    csv
}

fn bench_derive(c: &mut Criterion) {
    let config = AppConfig::default();
    let mut g = c.benchmark_group("derive_features");
    for (variant, csv) in [
        (SensorVariant::Snort, snort_export(10_000)),
        (SensorVariant::Suricata, suricata_export(10_000)),
    ] {
        let strategy = variant.strategy(&config);
        let table = normalize(read_csv(csv.as_bytes()).unwrap(), strategy.as_ref()).unwrap();
        g.bench_function(format!("{}_10k", variant).as_str(), |b| {
            b.iter(|| black_box(derive_features(black_box(&table), strategy.as_ref()).unwrap()))
        });
    }
    g.finish();
}

criterion_group!(benches, bench_derive);
criterion_main!(benches);
