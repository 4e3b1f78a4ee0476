use argh::FromArgs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use convkit::imgproc::{
    filter::{
        self,
        kernels::{Kernel3x3, KernelType},
    },
    parallel::ExecutionStrategy,
};
use convkit::io::functional as F;

#[derive(FromArgs)]
/// Apply a 3x3 convolution kernel to an image and write the result as png.
struct Args {
    /// path to the input image (jpg, png, bmp or tga)
    #[argh(positional)]
    input: PathBuf,

    /// the kernel to apply: edge, sharpen, blur, gauss, emboss or identity
    #[argh(positional)]
    kernel: String,

    /// path of the filtered image
    #[argh(option, short = 'o', default = "PathBuf::from(\"output.png\")")]
    output: PathBuf,

    /// number of workers, defaults to the available parallelism
    #[argh(option, short = 'w')]
    workers: Option<usize>,

    /// run on the current thread only
    #[argh(switch)]
    serial: bool,
}

impl Args {
    fn strategy(&self) -> ExecutionStrategy {
        match (self.serial, self.workers) {
            (true, Some(n)) => {
                log::warn!("--serial overrides --workers {n}");
                ExecutionStrategy::Serial
            }
            (true, None) => ExecutionStrategy::Serial,
            (false, Some(n)) => ExecutionStrategy::Fixed(n),
            (false, None) => ExecutionStrategy::Auto,
        }
    }
}

/// Resolve the kernel, warning when the name falls back to identity.
fn resolve_kernel(name: &str) -> Kernel3x3 {
    if KernelType::from_name(name).is_none() {
        let known = KernelType::ALL.map(|k| k.name()).join(", ");
        log::warn!("unknown kernel '{name}', using identity. Expected one of: {known}");
    }
    filter::kernels::resolve(name)
}

fn is_gauss_on_gauss(input: &Path, kernel: &str) -> bool {
    kernel == "gauss" && input.file_name().is_some_and(|f| f == "pic4.jpg")
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Args = argh::from_env();
    let start = Instant::now();

    if is_gauss_on_gauss(&args.input, &args.kernel) {
        log::info!(
            "You have applied a gaussian filter to Gauss which has caused a tear in the time-space continuum."
        );
    }

    let kernel = resolve_kernel(&args.kernel);
    let strategy = args.strategy();

    // read the image
    let src = F::read_image_any(&args.input)?;
    log::info!(
        "loaded {} ({}x{}, {} channels)",
        args.input.display(),
        src.width(),
        src.height(),
        src.num_channels()
    );

    // convolve into a freshly allocated image of the same layout
    let dst = filter::filter3x3(&src, &kernel, strategy)?;

    F::write_image_png(&args.output, &dst)?;
    log::info!(
        "wrote {} with '{}' kernel using {} workers",
        args.output.display(),
        kernel.name(),
        strategy.num_workers()
    );

    log::info!("Took {:.3?}", start.elapsed());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(argv: &[&str]) -> Args {
        Args::from_args(&["convkit"], argv).unwrap()
    }

    #[test]
    fn test_args_defaults() {
        let args = args(&["in.png", "blur"]);
        assert_eq!(args.input, PathBuf::from("in.png"));
        assert_eq!(args.kernel, "blur");
        assert_eq!(args.output, PathBuf::from("output.png"));
        assert_eq!(args.strategy(), ExecutionStrategy::Auto);
    }

    #[test]
    fn test_args_strategy() {
        assert_eq!(
            args(&["in.png", "edge", "-w", "50"]).strategy(),
            ExecutionStrategy::Fixed(50)
        );
        assert_eq!(
            args(&["in.png", "edge", "--serial"]).strategy(),
            ExecutionStrategy::Serial
        );
        assert_eq!(
            args(&["in.png", "edge", "--serial", "--workers", "2"]).strategy(),
            ExecutionStrategy::Serial
        );
    }

    #[test]
    fn test_resolve_kernel_fallback() {
        assert_eq!(resolve_kernel("emboss"), KernelType::Emboss.kernel());
        assert_eq!(resolve_kernel("laplace"), KernelType::Identity.kernel());
    }

    #[test]
    fn test_gauss_on_gauss() {
        assert!(is_gauss_on_gauss(Path::new("pic4.jpg"), "gauss"));
        assert!(is_gauss_on_gauss(Path::new("photos/pic4.jpg"), "gauss"));
        assert!(!is_gauss_on_gauss(Path::new("pic4.jpg"), "blur"));
        assert!(!is_gauss_on_gauss(Path::new("pic5.jpg"), "gauss"));
    }
}
