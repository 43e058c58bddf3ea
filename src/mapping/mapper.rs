//! Mapper trait

/// Trait for mapping functions
pub trait Mapper: Send + Sync {
    /// Get the name of this mapper
    fn name(&self) -> &str;

    /// Map an input value to an output value
    fn map(&self, input: f64) -> f64;

    /// Map every value of a series
    fn map_series(&self, values: &[f64]) -> Vec<f64> {
        values.iter().map(|&v| self.map(v)).collect()
    }
}
