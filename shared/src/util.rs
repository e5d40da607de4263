/// Current UTC timestamp in milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Serde helpers for backend fields that arrive either as JSON numbers or as
/// decimal strings (`"30000.00"`).
pub mod lenient {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(f64),
        Text(String),
    }

    /// Parse the leading number of a decimal-ish string
    ///
    /// Leading whitespace is skipped and trailing junk after the number is
    /// ignored (`"30000 COP"` is 30000). `None` when the string does not
    /// start with a finite number.
    pub fn parse_f64(raw: &str) -> Option<f64> {
        let s = raw.trim_start();
        let bytes = s.as_bytes();
        let is_digit = |i: usize| bytes.get(i).is_some_and(u8::is_ascii_digit);

        let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
        let int_start = end;
        while is_digit(end) {
            end += 1;
        }
        let mut digits = end - int_start;

        if bytes.get(end) == Some(&b'.') {
            let mut frac_end = end + 1;
            while is_digit(frac_end) {
                frac_end += 1;
            }
            if frac_end > end + 1 {
                digits += frac_end - end - 1;
                end = frac_end;
            }
        }
        if digits == 0 {
            return None;
        }

        if matches!(bytes.get(end), Some(b'e' | b'E')) {
            let mut exp_end = end + 1;
            if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
                exp_end += 1;
            }
            let exp_digits = exp_end;
            while is_digit(exp_end) {
                exp_end += 1;
            }
            if exp_end > exp_digits {
                end = exp_end;
            }
        }

        s[..end].parse::<f64>().ok().filter(|v| v.is_finite())
    }

    /// Number-or-string to `f64`, unparseable values become 0
    pub fn f64_or_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(opt_f64(deserializer)?.unwrap_or(0.0))
    }

    /// Number-or-string to `Option<f64>`, unparseable values become `None`
    pub fn opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<NumberOrString>::deserialize(deserializer)?;
        Ok(match value {
            Some(NumberOrString::Number(n)) if n.is_finite() => Some(n),
            Some(NumberOrString::Text(s)) => parse_f64(&s),
            _ => None,
        })
    }
}
