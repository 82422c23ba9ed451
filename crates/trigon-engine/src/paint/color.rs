/// Straight-alpha RGBA color.
///
/// Components are `f32` and are not required to stay inside `[0, 1]`; clear
/// values outside the displayable range are clamped by the GPU on write.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    #[inline]
    pub const fn black() -> Self {
        Self::new(0.0, 0.0, 0.0, 1.0)
    }

    #[inline]
    pub const fn white() -> Self {
        Self::new(1.0, 1.0, 1.0, 1.0)
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite() && self.a.is_finite()
    }

    /// Converts to the `f64`-component color used by clear operations.
    #[inline]
    pub fn to_wgpu(self) -> wgpu::Color {
        wgpu::Color {
            r: self.r as f64,
            g: self.g as f64,
            b: self.b as f64,
            a: self.a as f64,
        }
    }

    /// Flattens to an RGBA array for vertex data.
    #[inline]
    pub const fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_wgpu_widens_components() {
        let c = Color::new(0.25, 0.5, 0.75, 1.0).to_wgpu();
        assert_eq!(c.r, 0.25);
        assert_eq!(c.g, 0.5);
        assert_eq!(c.b, 0.75);
        assert_eq!(c.a, 1.0);
    }

    #[test]
    fn out_of_range_components_are_preserved() {
        // The demo's clear color is deliberately out of range; clamping is
        // the GPU's job, not ours.
        let c = Color::new(3.0, 0.1, 0.1, 1.0);
        assert_eq!(c.to_array(), [3.0, 0.1, 0.1, 1.0]);
        assert!(c.is_finite());
    }

    #[test]
    fn non_finite_is_detected() {
        assert!(!Color::new(f32::NAN, 0.0, 0.0, 1.0).is_finite());
        assert!(!Color::new(0.0, f32::INFINITY, 0.0, 1.0).is_finite());
    }
}
