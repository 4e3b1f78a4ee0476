use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;

use convkit_image::Image;
use convkit_imgproc::filter::{convolve3x3, kernels::KernelType};
use convkit_imgproc::parallel::ExecutionStrategy;

fn bench_filters(c: &mut Criterion) {
    let mut group = c.benchmark_group("Convolve3x3");

    let kernel = KernelType::Gauss.kernel();

    for (width, height) in [(256, 224), (512, 448), (1024, 896)].iter() {
        group.throughput(criterion::Throughput::Elements((*width * *height) as u64));

        let parameter_string = format!("{}x{}", width, height);

        // input image
        let image_data = (0..width * height * 3).map(|i| (i % 251) as u8).collect();
        let image_size = [*width, *height].into();
        let image = Image::new(image_size, 3, image_data).unwrap();

        // output image
        let output = image.zeros_like();

        for (name, strategy) in [
            ("serial", ExecutionStrategy::Serial),
            ("fixed_4", ExecutionStrategy::Fixed(4)),
            ("auto", ExecutionStrategy::Auto),
        ] {
            group.bench_with_input(
                BenchmarkId::new(name, &parameter_string),
                &(&image, &output),
                |b, i| {
                    let (src, mut dst) = (i.0, i.1.clone());
                    b.iter(|| black_box(convolve3x3(src, &mut dst, &kernel, strategy)))
                },
            );
        }
    }

    group.finish();
}

criterion_group!(benches, bench_filters);
criterion_main!(benches);
