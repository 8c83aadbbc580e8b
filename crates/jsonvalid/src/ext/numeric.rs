use num_cmp::NumCmp;
use serde_json::Number;

macro_rules! num_cmp {
    ($left:expr, $right:expr, $method:ident) => {
        if let Some(left) = $left.as_u64() {
            num_cmp!(@right left, $right, $method)
        } else if let Some(left) = $left.as_i64() {
            num_cmp!(@right left, $right, $method)
        } else {
            let left = $left.as_f64().unwrap_or(f64::NAN);
            num_cmp!(@right left, $right, $method)
        }
    };
    (@right $left:ident, $right:expr, $method:ident) => {
        if let Some(right) = $right.as_u64() {
            NumCmp::$method($left, right)
        } else if let Some(right) = $right.as_i64() {
            NumCmp::$method($left, right)
        } else {
            NumCmp::$method($left, $right.as_f64().unwrap_or(f64::NAN))
        }
    };
}

#[inline]
pub(crate) fn lt(left: &Number, right: &Number) -> bool {
    num_cmp!(left, right, num_lt)
}

#[inline]
pub(crate) fn le(left: &Number, right: &Number) -> bool {
    num_cmp!(left, right, num_le)
}

#[inline]
pub(crate) fn gt(left: &Number, right: &Number) -> bool {
    num_cmp!(left, right, num_gt)
}

#[inline]
pub(crate) fn ge(left: &Number, right: &Number) -> bool {
    num_cmp!(left, right, num_ge)
}

#[inline]
pub(crate) fn eq(left: &Number, right: &Number) -> bool {
    num_cmp!(left, right, num_eq)
}

/// Count of digits after the decimal point in the shortest representation of `value`.
fn fraction_digits(value: f64) -> i32 {
    let repr = value.to_string();
    repr.split_once('.')
        .map_or(0, |(_, fraction)| i32::try_from(fraction.len()).unwrap_or(i32::MAX))
}

/// Whether `value` is a multiple of the fractional `multiple`.
///
/// Both sides are rescaled by a power of ten derived from the divisor so the remainder is taken
/// between integers. A value with more decimal digits than the divisor can never be a multiple.
#[allow(clippy::float_cmp)]
pub(crate) fn is_multiple_of_float(value: f64, multiple: f64) -> bool {
    let factor = 10_f64.powi(fraction_digits(multiple));
    if value.fract() != 0.0 && 10_f64.powi(fraction_digits(value)) > factor {
        return false;
    }
    (factor * value).round() % (factor * multiple).round() == 0.0
}

#[allow(clippy::float_cmp)]
pub(crate) fn is_multiple_of_integer(value: f64, multiple: f64) -> bool {
    if value.fract() != 0.0 {
        return false;
    }
    value % multiple == 0.0
}
