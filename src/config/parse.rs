//! Parsers for textual parameter values (`5x5`, `2,2`, `0.5,0.47,0.53`).

use crate::error::{Error, Result};
use crate::image::{Point, Size};

fn invalid(what: &str, value: &str, form: &str) -> Error {
    Error::InvalidParameter(format!("{} '{}' is not of the form {}", what, value, form))
}

fn numbers<T: std::str::FromStr>(value: &str, separator: char) -> Option<Vec<T>> {
    value
        .split(separator)
        .map(|part| part.trim().parse().ok())
        .collect()
}

/// Parse `<W>x<H>`.
pub fn parse_size(value: &str) -> Result<Size> {
    match numbers::<usize>(&value.to_ascii_lowercase(), 'x').as_deref() {
        Some(&[width, height]) => Ok(Size::new(width, height)),
        _ => Err(invalid("size", value, "<W>x<H>")),
    }
}

/// Parse `<X>,<Y>`.
pub fn parse_point(value: &str) -> Result<Point> {
    match numbers::<usize>(value, ',').as_deref() {
        Some(&[x, y]) => Ok(Point::new(x, y)),
        _ => Err(invalid("point", value, "<X>,<Y>")),
    }
}

/// Parse `<a>,<b>,<c>`; range checks are left to the builder.
pub fn parse_noise(value: &str) -> Result<[f32; 3]> {
    match numbers::<f32>(value, ',').as_deref() {
        Some(&[a, b, c]) => Ok([a, b, c]),
        _ => Err(invalid("noise", value, "<a>,<b>,<c>")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("5x5").unwrap(), Size::new(5, 5));
        assert_eq!(parse_size("640X480").unwrap(), Size::new(640, 480));
        assert!(parse_size("5").is_err());
        assert!(parse_size("5x5x5").is_err());
        assert!(parse_size("ax5").is_err());
    }

    #[test]
    fn test_parse_point() {
        assert_eq!(parse_point("2,3").unwrap(), Point::new(2, 3));
        assert_eq!(parse_point(" 0 , 1 ").unwrap(), Point::new(0, 1));
        assert!(matches!(parse_point("-1,2"), Err(Error::InvalidParameter(_))));
    }

    #[test]
    fn test_parse_noise() {
        assert_eq!(parse_noise("0.5,0.47,0.53").unwrap(), [0.5, 0.47, 0.53]);
        assert!(parse_noise("0.5,0.5").is_err());
    }
}
