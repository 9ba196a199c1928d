//! Benchmarks for the transform chain and encoders.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use image::{DynamicImage, Rgb, RgbImage};
use pixcut_image::{
    OutputFormat, ResizeMode, ResizeSettings, Settings, SourceImage, Transformer, encode_to_vec,
    target_dimensions,
};

fn photo(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x ^ y) % 256) as u8])
    })
}

fn bench_target_dimensions(c: &mut Criterion) {
    let settings = ResizeSettings {
        mode: ResizeMode::Custom {
            width: 1200,
            height: 800,
        },
        maintain_aspect: true,
    };
    c.bench_function("target_dimensions", |b| {
        b.iter(|| target_dimensions(black_box(4000), black_box(3000), &settings))
    });
}

fn bench_transform(c: &mut Criterion) {
    let source = SourceImage::from_pixels(DynamicImage::ImageRgb8(photo(1920, 1080)));
    let settings = Settings {
        resize: Some(ResizeSettings {
            mode: ResizeMode::Preset { width: 800 },
            maintain_aspect: true,
        }),
        ..Settings::default()
    };
    let transformer = Transformer::new(&settings).unwrap();

    c.bench_function("transform_1080p_to_800", |b| {
        b.iter(|| transformer.transform(black_box(&source)).unwrap())
    });
}

fn bench_encode(c: &mut Criterion) {
    let img = photo(800, 450);
    let mut group = c.benchmark_group("encode_800x450");
    for format in [OutputFormat::WebP, OutputFormat::Jpeg, OutputFormat::Png] {
        group.bench_with_input(BenchmarkId::from_parameter(format), &format, |b, &format| {
            b.iter(|| encode_to_vec(black_box(&img), format, 85, None).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_target_dimensions, bench_transform, bench_encode);
criterion_main!(benches);
