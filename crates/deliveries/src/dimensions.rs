use shiptrack_core::error::require_positive;
use shiptrack_core::{DomainResult, ValueObject};

/// Package dimensions (cm) and weight (kg).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Dimensions {
    length: f64,
    width: f64,
    height: f64,
    weight: f64,
}

impl ValueObject for Dimensions {}

impl Dimensions {
    pub fn new(length: f64, width: f64, height: f64, weight: f64) -> DomainResult<Self> {
        require_positive(length, "Length")?;
        require_positive(width, "Width")?;
        require_positive(height, "Height")?;
        require_positive(weight, "Weight")?;

        Ok(Self {
            length,
            width,
            height,
            weight,
        })
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn volume(&self) -> f64 {
        self.length * self.width * self.height
    }
}

impl core::fmt::Display for Dimensions {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{}x{}x{} ({}kg)",
            self.length, self.width, self.height, self.weight
        )
    }
}
