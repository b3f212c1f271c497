use crate::{
    buffer::DoubleBuffer,
    error::ConfigurationError,
    math::wrap_cell,
    params::Color,
};

/// A 2D grid of trail intensities with one RGB triple per grid block, double buffered so that a tick
/// can read the previous state while writing the new one.
#[derive(Debug, Clone)]
pub struct EnvironmentField {
    width: usize,
    height: usize,
    cells: DoubleBuffer<Color>,
}

impl EnvironmentField {
    /// Create a new grid with every channel set to zero.
    pub fn new(width: usize, height: usize) -> Result<Self, ConfigurationError> {
        if width == 0 || height == 0 {
            return Err(ConfigurationError::EmptyGrid { width, height });
        }
        // Each side must also fit the u32 dimensions of an exported image.
        if u32::try_from(width).is_err() || u32::try_from(height).is_err() {
            return Err(ConfigurationError::GridTooLarge { width, height });
        }
        let len = width
            .checked_mul(height)
            .filter(|&n| i64::try_from(n).is_ok())
            .ok_or(ConfigurationError::GridTooLarge { width, height })?;

        Ok(EnvironmentField {
            width,
            height,
            cells: DoubleBuffer::new(len, [0.0; 3]),
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Read-only handle on the current buffer.
    pub fn view(&self) -> FieldView<'_> {
        FieldView {
            width: self.width,
            height: self.height,
            cells: self.cells.current(),
        }
    }

    /// Read-only handle on the buffer being written during this tick.
    pub(crate) fn next_view(&self) -> FieldView<'_> {
        FieldView {
            width: self.width,
            height: self.height,
            cells: self.cells.next(),
        }
    }

    /// Set every cell of the current buffer to `color`.
    pub fn fill(&mut self, color: Color) {
        self.cells.current_mut().iter_mut().for_each(|c| *c = color);
    }

    /// Mutable access to the current buffer, for seeding patterns between ticks.
    pub fn current_mut(&mut self) -> &mut [Color] {
        self.cells.current_mut()
    }

    pub(crate) fn split(&mut self) -> (&[Color], &mut [Color]) {
        self.cells.split()
    }

    pub(crate) fn swap(&mut self) {
        self.cells.swap();
    }
}

/// Borrowed view of one buffer of the field. Positions are treated as periodic, hence any finite
/// position maps to a cell.
#[derive(Debug, Clone, Copy)]
pub struct FieldView<'a> {
    width: usize,
    height: usize,
    cells: &'a [Color],
}

impl<'a> FieldView<'a> {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> &'a [Color] {
        self.cells
    }

    /// Floor x and y, wrap them onto the torus and return the corresponding index into the cells.
    #[inline]
    pub fn index(&self, x: f32, y: f32) -> usize {
        index(self.width, self.height, x, y)
    }

    /// Get the raw cell value at a given position.
    #[inline]
    pub fn get(&self, x: f32, y: f32) -> Color {
        self.cells[self.index(x, y)]
    }

    /// Sum of all channels at a given position, with negative channels read as zero.
    #[inline]
    pub fn intensity(&self, x: f32, y: f32) -> f32 {
        self.get(x, y).iter().map(|c| c.max(0.0)).sum()
    }
}

#[inline]
pub(crate) fn index(width: usize, height: usize, x: f32, y: f32) -> usize {
    let i = wrap_cell(x.floor() as i64, width);
    let j = wrap_cell(y.floor() as i64, height);
    j * width + i
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_new_rejects_empty() {
        assert_eq!(
            EnvironmentField::new(0, 5).unwrap_err(),
            ConfigurationError::EmptyGrid {
                width: 0,
                height: 5
            }
        );
        assert!(EnvironmentField::new(5, 0).is_err());
        assert!(matches!(
            EnvironmentField::new(usize::MAX, 2),
            Err(ConfigurationError::GridTooLarge { .. })
        ));
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn test_grid_side_must_fit_u32() {
        let side = u32::MAX as usize + 1;
        assert_eq!(
            EnvironmentField::new(side, 1).unwrap_err(),
            ConfigurationError::GridTooLarge {
                width: side,
                height: 1
            }
        );
        assert!(matches!(
            EnvironmentField::new(1, side),
            Err(ConfigurationError::GridTooLarge { .. })
        ));
    }

    #[test]
    fn test_grid_index() {
        let grid = EnvironmentField::new(8, 8).unwrap();
        let view = grid.view();
        assert_eq!(view.index(0.5, 0.6), 0);
        assert_eq!(view.index(1.5, 0.6), 1);
        assert_eq!(view.index(0.5, 1.6), 8);
        assert_eq!(view.index(2.5, 0.6), 2);
        assert_eq!(view.index(2.5, 1.6), 10);
        assert_eq!(view.index(7.9, 7.9), 63);
        assert_eq!(view.index(-0.5, -0.6), 63);
        assert_eq!(view.index(8.2, 16.1), 0);
    }

    #[test]
    fn test_non_power_of_two_grid() {
        let grid = EnvironmentField::new(5, 3).unwrap();
        let view = grid.view();
        assert_eq!(view.cells().len(), 15);
        assert_eq!(view.index(4.5, 2.5), 14);
        assert_eq!(view.index(-1.0, 3.0), 4);
    }

    #[test]
    fn test_intensity_clamps_negative_channels() {
        let mut grid = EnvironmentField::new(4, 4).unwrap();
        grid.fill([0.25, -1.0, 0.5]);
        assert_eq!(grid.view().get(1.0, 1.0), [0.25, -1.0, 0.5]);
        assert_eq!(grid.view().intensity(1.0, 1.0), 0.75);
        assert_eq!(grid.next_view().intensity(1.0, 1.0), 0.0);
    }
}
