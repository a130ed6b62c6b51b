//! CSS-like value parsing for dimensions and padding shorthands.
//!
//! Built on `winnow` 0.7. Accepts the forms hosts and prototype producers
//! emit: `120`, `120px`, `50%`, `auto`, and 1–4 value padding shorthands.

use crate::model::{Dimension, Padding};
use winnow::ascii::{float, space1};
use winnow::combinator::{alt, opt, separated, terminated};
use winnow::prelude::*;

/// Parse a dimension value: `auto`, `<n>`, `<n>px` or `<n>%`.
///
/// # Errors
/// Returns a human-readable message if the input is not a dimension.
pub fn parse_dimension(input: &str) -> Result<Dimension, String> {
    dimension
        .parse(input.trim())
        .map_err(|e| format!("invalid dimension `{input}`: {e}"))
}

/// Parse a CSS padding shorthand (`t`, `v h`, `t h b`, `t r b l`).
///
/// # Errors
/// Returns a human-readable message if the input has 0 or more than 4 lengths.
pub fn parse_padding(input: &str) -> Result<Padding, String> {
    padding
        .parse(input.trim())
        .map_err(|e| format!("invalid padding `{input}`: {e}"))
}

// ─── Low-level parsers ──────────────────────────────────────────────────

/// A float literal; `inf` and `nan` are rejected.
fn finite(input: &mut &str) -> ModalResult<f64> {
    float.verify(|v: &f64| v.is_finite()).parse_next(input)
}

fn length(input: &mut &str) -> ModalResult<f64> {
    terminated(finite, opt("px")).parse_next(input)
}

fn dimension(input: &mut &str) -> ModalResult<Dimension> {
    alt((
        "auto".value(Dimension::Auto),
        terminated(finite, '%').map(Dimension::Percentage),
        length.map(Dimension::Fixed),
    ))
    .parse_next(input)
}

fn padding(input: &mut &str) -> ModalResult<Padding> {
    let values: Vec<f64> = separated(1..=4, length, space1).parse_next(input)?;
    Ok(match values.as_slice() {
        [all] => Padding::uniform(*all),
        [v, h] => Padding {
            top: *v,
            right: *h,
            bottom: *v,
            left: *h,
        },
        [t, h, b] => Padding {
            top: *t,
            right: *h,
            bottom: *b,
            left: *h,
        },
        [t, r, b, l, ..] => Padding {
            top: *t,
            right: *r,
            bottom: *b,
            left: *l,
        },
        [] => Padding::default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimension_forms() {
        assert_eq!(parse_dimension("auto"), Ok(Dimension::Auto));
        assert_eq!(parse_dimension("120"), Ok(Dimension::Fixed(120.0)));
        assert_eq!(parse_dimension(" 120px "), Ok(Dimension::Fixed(120.0)));
        assert_eq!(parse_dimension("50%"), Ok(Dimension::Percentage(50.0)));
        assert_eq!(parse_dimension("-4.5"), Ok(Dimension::Fixed(-4.5)));
    }

    #[test]
    fn dimension_rejects_garbage() {
        assert!(parse_dimension("wide").is_err());
        assert!(parse_dimension("12em").is_err());
        assert!(parse_dimension("").is_err());
    }

    #[test]
    fn non_finite_numbers_are_rejected() {
        assert!(parse_dimension("nan").is_err());
        assert!(parse_dimension("inf").is_err());
        assert!(parse_dimension("infinitypx").is_err());
        assert!(parse_dimension("NaN%").is_err());
        assert!(parse_padding("4 inf").is_err());
        assert_eq!(parse_dimension("1e3"), Ok(Dimension::Fixed(1000.0)));
    }

    #[test]
    fn padding_shorthands() {
        assert_eq!(parse_padding("8"), Ok(Padding::uniform(8.0)));
        assert_eq!(
            parse_padding("8px 16px"),
            Ok(Padding {
                top: 8.0,
                right: 16.0,
                bottom: 8.0,
                left: 16.0
            })
        );
        assert_eq!(
            parse_padding("1 2 3"),
            Ok(Padding {
                top: 1.0,
                right: 2.0,
                bottom: 3.0,
                left: 2.0
            })
        );
        assert_eq!(
            parse_padding("1 2 3 4"),
            Ok(Padding {
                top: 1.0,
                right: 2.0,
                bottom: 3.0,
                left: 4.0
            })
        );
        assert!(parse_padding("1 2 3 4 5").is_err());
    }
}
