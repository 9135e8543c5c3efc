use std::any::{self, Any};

use num_traits::ToPrimitive;

use crate::error::Error;

/// Casts a type-erased stage array to `f64` planes ready for rendering.
///
/// A `Vec<Vec<T>>` becomes a singleton series and a `Vec<Vec<Vec<T>>>` is
/// converted plane by plane, for `T` in {`bool`, `u8`, `i8`, `i32`, `i64`,
/// `f64`}. `bool` cells map to 1.0/0.0. Any other runtime type fails with
/// [`Error::UnsupportedElementType`].
pub fn to_planes<M: Any>(stages: &M) -> Result<Vec<Vec<Vec<f64>>>, Error> {
    let any = stages as &dyn Any;
    if let Some(planes) = any.downcast_ref::<Vec<Vec<Vec<f64>>>>() {
        return Ok(planes.clone());
    }
    if let Some(plane) = any.downcast_ref::<Vec<Vec<f64>>>() {
        return Ok(vec![plane.clone()]);
    }

    macro_rules! try_numeric {
        ($($ty:ty),*) => {
            $(
                if let Some(plane) = any.downcast_ref::<Vec<Vec<$ty>>>() {
                    return Ok(vec![to_plane(plane)]);
                }
                if let Some(planes) = any.downcast_ref::<Vec<Vec<Vec<$ty>>>>() {
                    return Ok(planes.iter().map(|plane| to_plane(plane)).collect());
                }
            )*
        };
    }
    try_numeric!(u8, i8, i32, i64);

    if let Some(plane) = any.downcast_ref::<Vec<Vec<bool>>>() {
        return Ok(vec![bits_to_plane(plane)]);
    }
    if let Some(planes) = any.downcast_ref::<Vec<Vec<Vec<bool>>>>() {
        return Ok(planes.iter().map(|plane| bits_to_plane(plane)).collect());
    }
    Err(Error::UnsupportedElementType(any::type_name::<M>()))
}

fn to_plane<T: ToPrimitive + Copy>(rows: &[Vec<T>]) -> Vec<Vec<f64>> {
    rows.iter()
        .map(|row| {
            row.iter()
                .map(|value| value.to_f64().unwrap_or(0.0))
                .collect()
        })
        .collect()
}

fn bits_to_plane(rows: &[Vec<bool>]) -> Vec<Vec<f64>> {
    rows.iter()
        .map(|row| {
            row.iter()
                .map(|&value| if value { 1.0 } else { 0.0 })
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::to_planes;
    use crate::{
        error::Error,
        render::{Tint, create_image},
    };

    #[test]
    fn plane_wraps_into_singleton_series() {
        let plane = vec![vec![1i32, 2], vec![3, 4]];
        let planes = to_planes(&plane).unwrap();
        assert_eq!(planes, vec![vec![vec![1.0, 2.0], vec![3.0, 4.0]]]);
    }

    #[test]
    fn f64_series_passes_through() {
        let series = vec![vec![vec![1.5f64]], vec![vec![2.5]]];
        assert_eq!(to_planes(&series).unwrap(), series);
    }

    #[test]
    fn bits_map_to_zero_and_one() {
        let series = vec![vec![vec![true, false]], vec![vec![false, true]]];
        let planes = to_planes(&series).unwrap();
        assert_eq!(planes, vec![vec![vec![1.0, 0.0]], vec![vec![0.0, 1.0]]]);
    }

    #[test]
    fn unsupported_shapes_are_rejected() {
        let flat = vec![1.0f64, 2.0];
        assert!(matches!(
            to_planes(&flat).unwrap_err(),
            Error::UnsupportedElementType(_)
        ));

        let wide = vec![vec![1u16]];
        assert!(matches!(
            to_planes(&wide).unwrap_err(),
            Error::UnsupportedElementType(_)
        ));
    }

    #[test]
    fn planes_feed_the_renderer() {
        let series = vec![vec![vec![0u8, 10]], vec![vec![20, 30]]];
        let planes = to_planes(&series).unwrap();
        for plane in &planes {
            let mut buf = [0u8; 8];
            create_image(plane, &mut buf, Tint::new(0, 0, 0)).unwrap();
            assert_eq!(buf[..3], [255, 255, 255]);
            assert_eq!(buf[4..7], [0, 0, 0]);
        }
    }
}
