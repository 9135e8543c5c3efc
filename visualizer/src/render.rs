use std::any::{self, Any};

use log::debug;

use crate::error::Error;

/// The color of the highest-value cell.
///
/// The lowest value always maps to white; everything in between is scaled
/// per channel toward the tint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tint {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Tint {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// A rendered BGRA plane.
#[derive(Clone, Debug)]
pub struct Frame {
    pub width: i32,
    pub height: i32,
    pub data: Vec<u8>,
}

/// A borrowed jagged matrix of one of the supported element kinds.
#[derive(Clone, Copy, Debug)]
pub enum Matrix<'a> {
    U8(&'a [Vec<u8>]),
    I8(&'a [Vec<i8>]),
    I32(&'a [Vec<i32>]),
    I64(&'a [Vec<i64>]),
    F64(&'a [Vec<f64>]),
}

macro_rules! with_rows {
    ($matrix:expr, $rows:ident => $body:expr) => {
        match $matrix {
            Matrix::U8($rows) => $body,
            Matrix::I8($rows) => $body,
            Matrix::I32($rows) => $body,
            Matrix::I64($rows) => $body,
            Matrix::F64($rows) => $body,
        }
    };
}

macro_rules! impl_from_rows {
    ($($variant:ident($ty:ty)),*) => {
        $(impl<'a> From<&'a [Vec<$ty>]> for Matrix<'a> {
            fn from(rows: &'a [Vec<$ty>]) -> Self {
                Matrix::$variant(rows)
            }
        })*
    };
}

impl_from_rows!(U8(u8), I8(i8), I32(i32), I64(i64), F64(f64));

impl<'a> Matrix<'a> {
    /// Dispatches a type-erased matrix to the matching kind, trying each
    /// supported element type in turn.
    pub fn from_any<M: Any>(matrix: &'a M) -> Result<Matrix<'a>, Error> {
        let any = matrix as &dyn Any;
        if let Some(rows) = any.downcast_ref::<Vec<Vec<u8>>>() {
            return Ok(Matrix::U8(rows));
        }
        if let Some(rows) = any.downcast_ref::<Vec<Vec<i8>>>() {
            return Ok(Matrix::I8(rows));
        }
        if let Some(rows) = any.downcast_ref::<Vec<Vec<i32>>>() {
            return Ok(Matrix::I32(rows));
        }
        if let Some(rows) = any.downcast_ref::<Vec<Vec<i64>>>() {
            return Ok(Matrix::I64(rows));
        }
        if let Some(rows) = any.downcast_ref::<Vec<Vec<f64>>>() {
            return Ok(Matrix::F64(rows));
        }
        Err(Error::UnsupportedElementType(any::type_name::<M>()))
    }

    /// Writes a gradient-mapped color for every cell into `buf` as 4-byte
    /// BGRA, row-major, intra-row order.
    ///
    /// `buf` must hold exactly `4 * total_cells` bytes. The fourth byte of
    /// each cell is left untouched. Nothing is written when an error is
    /// returned.
    pub fn render_into(&self, buf: &mut [u8], tint: Tint) -> Result<(), Error> {
        with_rows!(self, rows => render_rows(rows, buf, tint))
    }

    /// Number of cells across all rows.
    pub fn total_cells(&self) -> usize {
        with_rows!(self, rows => rows.iter().map(|row| row.len()).sum())
    }

    fn dimensions(&self) -> Result<(usize, usize), Error> {
        with_rows!(self, rows => {
            let width = rows.first().map(|row| row.len()).unwrap_or(0);
            for (i, row) in rows.iter().enumerate() {
                if row.len() != width {
                    return Err(Error::NotRectangular {
                        row: i,
                        expected: width,
                        actual: row.len(),
                    });
                }
            }
            Ok((width, rows.len()))
        })
    }
}

/// Writes a gradient-mapped BGRA color for every cell of `matrix` into `buf`.
///
/// `matrix` must be a `Vec<Vec<T>>` with `T` one of `u8`, `i8`, `i32`, `i64`
/// or `f64`; anything else fails with [`Error::UnsupportedElementType`]
/// without touching the buffer.
pub fn create_image<M: Any>(matrix: &M, buf: &mut [u8], tint: Tint) -> Result<(), Error> {
    Matrix::from_any(matrix)?.render_into(buf, tint)
}

/// Renders a rectangular matrix into an owned [`Frame`] with zeroed alpha.
pub fn render<M: Any>(matrix: &M, tint: Tint) -> Result<Frame, Error> {
    let matrix = Matrix::from_any(matrix)?;
    let (width, height) = matrix.dimensions()?;
    let mut data = vec![0u8; width * height * 4];
    matrix.render_into(&mut data, tint)?;
    Ok(Frame {
        width: width as i32,
        height: height as i32,
        data,
    })
}

/// Distance from `min` in the element's own domain, widened to `f64`.
///
/// Integer kinds wrap on overflow instead of panicking; out-of-range inputs
/// produce out-of-range bytes through the saturating `as u8` cast rather
/// than an abort.
trait Element: Copy + PartialOrd {
    fn delta(self, min: Self) -> f64;
}

macro_rules! impl_element {
    ($($ty:ty),*) => {
        $(impl Element for $ty {
            #[inline]
            fn delta(self, min: Self) -> f64 {
                self.wrapping_sub(min) as f64
            }
        })*
    };
}

impl_element!(u8, i8, i32, i64);

impl Element for f64 {
    #[inline]
    fn delta(self, min: Self) -> f64 {
        self - min
    }
}

fn render_rows<T: Element>(rows: &[Vec<T>], buf: &mut [u8], tint: Tint) -> Result<(), Error> {
    let mut min = *rows
        .first()
        .and_then(|row| row.first())
        .ok_or(Error::EmptyMatrix)?;
    let mut max = min;
    let expected = rows.iter().map(|row| row.len()).sum::<usize>() * 4;
    if buf.len() != expected {
        return Err(Error::BufferSize {
            expected,
            actual: buf.len(),
        });
    }
    for row in rows {
        for &value in row {
            if value < min {
                min = value;
            }
            if value > max {
                max = value;
            }
        }
    }

    let range = max.delta(min);
    // All cells share one value when the range collapses; force the scales
    // to zero so every cell lands on the white end instead of NaN.
    let inv = if range == 0.0 {
        debug!("matrix range collapsed, rendering uniform white");
        0.0
    } else {
        range.recip()
    };
    let scale_r = f64::from(255 - tint.r) * inv;
    let scale_g = f64::from(255 - tint.g) * inv;
    let scale_b = f64::from(255 - tint.b) * inv;

    let mut pixels = buf.chunks_exact_mut(4);
    for row in rows {
        for &value in row {
            let diff = value.delta(min);
            let pixel = pixels.next().unwrap();
            pixel[0] = (255.0 - diff * scale_b) as u8;
            pixel[1] = (255.0 - diff * scale_g) as u8;
            pixel[2] = (255.0 - diff * scale_r) as u8;
        }
    }
    Ok(())
}
