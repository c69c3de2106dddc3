//! Tick label formatting from format patterns such as `{x:,.0f}`.
//!
//! A pattern is literal text around one placeholder, `{x}`, `{x:SPEC}`,
//! `{}` or `{:SPEC}`. `SPEC` is `[+][,|_][.PRECISION][TYPE]` where `TYPE`
//! is one of:
//!
//! | type | output |
//! |------|--------|
//! | `f`  | fixed point, default precision 6 |
//! | `%`  | value × 100 in fixed point, followed by `%` |
//! | `e`  | scientific, exponent with sign and at least two digits |
//! | `d`  | rounded integer |
//! | `g` or none | shortest representation |

use geoplot_common::{PlotError, PlotResult};

/// A parsed tick label pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickFormat {
    prefix: String,
    suffix: String,
    spec: Spec,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct Spec {
    plus_sign: bool,
    grouping: Option<char>,
    precision: Option<usize>,
    kind: Kind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Kind {
    Fixed,
    Percent,
    Exponent,
    Integer,
    #[default]
    General,
}

impl TickFormat {
    /// Parse a pattern. Invalid patterns fail with `InvalidParameter`
    /// naming `colorbar_format`.
    pub fn parse(pattern: &str) -> PlotResult<TickFormat> {
        let invalid = |msg: &str| {
            PlotError::invalid_parameter("colorbar_format", format!("{} in '{}'", msg, pattern))
        };

        let open = pattern.find('{').ok_or_else(|| invalid("missing '{x}' placeholder"))?;
        let close = pattern[open..]
            .find('}')
            .map(|i| open + i)
            .ok_or_else(|| invalid("unclosed placeholder"))?;

        let prefix = &pattern[..open];
        let suffix = &pattern[close + 1..];
        if suffix.contains('{') || suffix.contains('}') || prefix.contains('}') {
            return Err(invalid("only one placeholder is supported"));
        }

        let field = &pattern[open + 1..close];
        let (name, spec_text) = match field.split_once(':') {
            Some((name, spec)) => (name, spec),
            None => (field, ""),
        };
        if !(name.is_empty() || name == "x") {
            return Err(invalid("placeholder must be named 'x'"));
        }

        let spec = parse_spec(spec_text).ok_or_else(|| invalid("unsupported format spec"))?;

        Ok(TickFormat {
            prefix: prefix.to_string(),
            suffix: suffix.to_string(),
            spec,
        })
    }

    /// Format one tick value.
    pub fn format(&self, value: f64) -> String {
        format!("{}{}{}", self.prefix, format_number(value, &self.spec), self.suffix)
    }
}

impl Default for TickFormat {
    /// `{x:,.0f}`
    fn default() -> Self {
        TickFormat {
            prefix: String::new(),
            suffix: String::new(),
            spec: Spec {
                plus_sign: false,
                grouping: Some(','),
                precision: Some(0),
                kind: Kind::Fixed,
            },
        }
    }
}

fn parse_spec(text: &str) -> Option<Spec> {
    let mut spec = Spec::default();
    let mut rest = text;

    if let Some(r) = rest.strip_prefix('+') {
        spec.plus_sign = true;
        rest = r;
    } else if let Some(r) = rest.strip_prefix('-') {
        rest = r;
    }

    if let Some(c) = rest.chars().next().filter(|c| *c == ',' || *c == '_') {
        spec.grouping = Some(c);
        rest = &rest[1..];
    }

    if let Some(r) = rest.strip_prefix('.') {
        let digits: String = r.chars().take_while(|c| c.is_ascii_digit()).collect();
        if digits.is_empty() {
            return None;
        }
        spec.precision = Some(digits.parse().ok()?);
        rest = &r[digits.len()..];
    }

    spec.kind = match rest {
        "f" | "F" => Kind::Fixed,
        "%" => Kind::Percent,
        "e" | "E" => Kind::Exponent,
        "d" => Kind::Integer,
        "g" | "G" | "" => Kind::General,
        _ => return None,
    };
    Some(spec)
}

fn format_number(value: f64, spec: &Spec) -> String {
    if !value.is_finite() {
        return if value.is_nan() {
            "nan".to_string()
        } else if value > 0.0 {
            "inf".to_string()
        } else {
            "-inf".to_string()
        };
    }

    let body = match spec.kind {
        Kind::Fixed => format!("{:.*}", spec.precision.unwrap_or(6), value.abs()),
        Kind::Percent => format!("{:.*}%", spec.precision.unwrap_or(6), value.abs() * 100.0),
        Kind::Integer => format!("{:.0}", value.abs()),
        Kind::Exponent => exponent(value.abs(), spec.precision.unwrap_or(6)),
        Kind::General => general(value.abs(), spec.precision),
    };

    let body = match (spec.grouping, spec.kind) {
        (Some(sep), Kind::Fixed | Kind::Percent | Kind::Integer | Kind::General) => group(&body, sep),
        _ => body,
    };

    // "-0" after rounding prints without a sign
    let is_zero = body.chars().all(|c| !c.is_ascii_digit() || c == '0');
    let sign = if value < 0.0 && !is_zero {
        "-"
    } else if spec.plus_sign {
        "+"
    } else {
        ""
    };
    format!("{}{}", sign, body)
}

fn exponent(value: f64, precision: usize) -> String {
    let raw = format!("{:.*e}", precision, value);
    match raw.split_once('e') {
        Some((mantissa, exp)) => {
            let (sign, digits) = match exp.strip_prefix('-') {
                Some(d) => ('-', d),
                None => ('+', exp),
            };
            format!("{}e{}{:0>2}", mantissa, sign, digits)
        }
        None => raw,
    }
}

fn general(value: f64, precision: Option<usize>) -> String {
    match precision {
        Some(p) => {
            // `p` significant digits, trailing zeros trimmed
            let p = p.max(1);
            let magnitude = if value == 0.0 { 0 } else { value.log10().floor() as i32 };
            let decimals = (p as i32 - 1 - magnitude).max(0) as usize;
            trim_zeros(format!("{:.*}", decimals, value))
        }
        None => value.to_string(),
    }
}

fn trim_zeros(text: String) -> String {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text
    }
}

/// Insert `sep` between thousands in the integer part of `body`.
fn group(body: &str, sep: char) -> String {
    let int_end = body
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(body.len());
    let (int_part, rest) = body.split_at(int_end);

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3 + rest.len());
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(sep);
        }
        grouped.push(c);
    }
    grouped.push_str(rest);
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fmt(pattern: &str, value: f64) -> String {
        TickFormat::parse(pattern).unwrap().format(value)
    }

    #[test]
    fn test_default_pattern() {
        assert_eq!(fmt("{x:,.0f}", 1234567.4), "1,234,567");
        assert_eq!(TickFormat::default(), TickFormat::parse("{x:,.0f}").unwrap());
    }

    #[test]
    fn test_prefix_and_suffix() {
        assert_eq!(fmt("{x:.1f} 人", 12.26), "12.3 人");
        assert_eq!(fmt("$ {x:,.2f}", 1000.0), "$ 1,000.00");
    }

    #[test]
    fn test_percent_and_exponent() {
        assert_eq!(fmt("{x:.0%}", 0.25), "25%");
        assert_eq!(fmt("{x:.2e}", 12345.0), "1.23e+04");
        assert_eq!(fmt("{x:.1e}", 0.005), "5.0e-03");
    }

    #[test]
    fn test_signs() {
        assert_eq!(fmt("{x:+.0f}", 3.0), "+3");
        assert_eq!(fmt("{x:,.0f}", -0.2), "0");
        assert_eq!(fmt("{x:,d}", -1500.0), "-1,500");
    }

    #[test]
    fn test_general() {
        assert_eq!(fmt("{x}", 2.5), "2.5");
        assert_eq!(fmt("{}", 100.0), "100");
        assert_eq!(fmt("{x:.3g}", 3.14159), "3.14");
    }

    #[test]
    fn test_invalid_patterns() {
        for bad in ["no placeholder", "{x:.q}", "{y}", "{x}{x}", "{x:.f}"] {
            let err = TickFormat::parse(bad).unwrap_err();
            assert!(matches!(err, PlotError::InvalidParameter { .. }), "{}", bad);
        }
    }
}
