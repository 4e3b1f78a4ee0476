use std::fmt;

use super::FilterError;

/// Weights of a 3x3 kernel, indexed as `weights[row][col]`.
pub type Weights3x3 = [[f32; 3]; 3];

/// An immutable, named 3x3 convolution kernel.
///
/// The weights are fixed at construction and there is no way to mutate them afterwards, so
/// a kernel can be shared by reference across all the workers of a filtering pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel3x3 {
    name: String,
    weights: Weights3x3,
}

impl Kernel3x3 {
    /// Create a new kernel from its weights.
    ///
    /// # Arguments
    ///
    /// * `name` - The name used to identify the kernel.
    /// * `weights` - The row-major 3x3 weight matrix.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::NonFiniteWeight`] if any weight is NaN or infinite.
    ///
    /// # Examples
    ///
    /// ```
    /// use convkit_imgproc::filter::kernels::Kernel3x3;
    ///
    /// let kernel = Kernel3x3::new("double", [[0.0, 0.0, 0.0], [0.0, 2.0, 0.0], [0.0, 0.0, 0.0]])
    ///     .unwrap();
    ///
    /// assert_eq!(kernel.name(), "double");
    /// assert_eq!(kernel.sum(), 2.0);
    /// ```
    pub fn new(name: impl Into<String>, weights: Weights3x3) -> Result<Self, FilterError> {
        for (r, row) in weights.iter().enumerate() {
            for (c, w) in row.iter().enumerate() {
                if !w.is_finite() {
                    return Err(FilterError::NonFiniteWeight(r, c));
                }
            }
        }

        Ok(Self {
            name: name.into(),
            weights,
        })
    }

    /// The name of the kernel.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The weight matrix of the kernel.
    pub fn weights(&self) -> &Weights3x3 {
        &self.weights
    }

    /// Sum of all the weights.
    ///
    /// Kernels summing to one preserve the intensity of uniform regions.
    pub fn sum(&self) -> f32 {
        self.weights.iter().flatten().sum()
    }
}

impl fmt::Display for Kernel3x3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:?}", self.name, self.weights)
    }
}

/// The kernels known by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KernelType {
    /// Laplacian edge detection.
    Edge,
    /// Laplacian sharpening.
    Sharpen,
    /// 3x3 box blur.
    Blur,
    /// 3x3 gaussian blur.
    Gauss,
    /// Diagonal emboss.
    Emboss,
    /// Copies the source unchanged.
    #[default]
    Identity,
}

impl KernelType {
    /// Every registered kernel, in the order they are listed to users.
    pub const ALL: [KernelType; 6] = [
        KernelType::Edge,
        KernelType::Sharpen,
        KernelType::Blur,
        KernelType::Gauss,
        KernelType::Emboss,
        KernelType::Identity,
    ];

    /// The lower case name of the kernel.
    pub fn name(&self) -> &'static str {
        match self {
            KernelType::Edge => "edge",
            KernelType::Sharpen => "sharpen",
            KernelType::Blur => "blur",
            KernelType::Gauss => "gauss",
            KernelType::Emboss => "emboss",
            KernelType::Identity => "identity",
        }
    }

    /// Look up a kernel by its exact name.
    ///
    /// Returns `None` for unknown names, see [`resolve`] for the lookup with fallback.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }

    /// The weight matrix of the kernel.
    pub fn weights(&self) -> Weights3x3 {
        match self {
            KernelType::Edge => [[0.0, -1.0, 0.0], [-1.0, 4.0, -1.0], [0.0, -1.0, 0.0]],
            KernelType::Sharpen => [[0.0, -1.0, 0.0], [-1.0, 5.0, -1.0], [0.0, -1.0, 0.0]],
            KernelType::Blur => [[1.0 / 9.0; 3]; 3],
            KernelType::Gauss => [
                [1.0 / 16.0, 1.0 / 8.0, 1.0 / 16.0],
                [1.0 / 8.0, 1.0 / 4.0, 1.0 / 8.0],
                [1.0 / 16.0, 1.0 / 8.0, 1.0 / 16.0],
            ],
            KernelType::Emboss => [[-2.0, -1.0, 0.0], [-1.0, 1.0, 1.0], [0.0, 1.0, 2.0]],
            KernelType::Identity => [[0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 0.0]],
        }
    }

    /// Build the kernel.
    pub fn kernel(&self) -> Kernel3x3 {
        Kernel3x3 {
            name: self.name().to_string(),
            weights: self.weights(),
        }
    }
}

impl fmt::Display for KernelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Resolve a kernel by name.
///
/// Unknown names fall back to the identity kernel instead of failing.
///
/// # Arguments
///
/// * `name` - The lower case name of the kernel.
///
/// # Returns
///
/// The matching kernel, or the identity kernel.
///
/// # Examples
///
/// ```
/// use convkit_imgproc::filter::kernels::resolve;
///
/// assert_eq!(resolve("blur").name(), "blur");
/// assert_eq!(resolve("does-not-exist").name(), "identity");
/// ```
pub fn resolve(name: &str) -> Kernel3x3 {
    KernelType::from_name(name).unwrap_or_default().kernel()
}
