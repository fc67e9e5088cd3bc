/// One command letter and the flat list of numbers that follow it.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PathToken {
    pub(crate) command: char,
    pub(crate) args: Vec<f64>,
}

/// Split path data into command tokens.
///
/// Any ASCII letter other than the exponent marker `e`/`E` starts a new token; unsupported letters
/// are kept so the interpreter can skip them without merging their numbers into the previous
/// command. Numbers before the first command letter are discarded.
pub(crate) fn tokenize(d: &str) -> Vec<PathToken> {
    let mut out = Vec::new();
    let mut current: Option<(char, usize)> = None;

    for (i, c) in d.char_indices() {
        if c.is_ascii_alphabetic() && !matches!(c, 'e' | 'E') {
            if let Some((command, start)) = current.take() {
                out.push(PathToken {
                    command,
                    args: scan_numbers(&d[start..i]),
                });
            }
            current = Some((c, i + c.len_utf8()));
        }
    }
    if let Some((command, start)) = current {
        out.push(PathToken {
            command,
            args: scan_numbers(&d[start..]),
        });
    }
    out
}

/// Extract signed decimal literals (`-1`, `+.5`, `2.`, `1e-3`) in order of appearance.
///
/// Separators are anything that is not part of a literal, so `10-5` yields `[10, -5]` and
/// `1.5.5` yields `[1.5, 0.5]`.
pub(crate) fn scan_numbers(s: &str) -> Vec<f64> {
    let bytes = s.as_bytes();
    let mut out = Vec::new();
    let mut i = 0usize;

    while i < bytes.len() {
        let start = i;
        let mut j = i;
        if matches!(bytes[j], b'+' | b'-') {
            j += 1;
        }

        let int_start = j;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        let mut digits = j - int_start;

        if j < bytes.len() && bytes[j] == b'.' {
            let frac_start = j + 1;
            let mut k = frac_start;
            while k < bytes.len() && bytes[k].is_ascii_digit() {
                k += 1;
            }
            if digits > 0 || k > frac_start {
                digits += k - frac_start;
                j = k;
            }
        }

        if digits == 0 {
            i = start + 1;
            continue;
        }

        if j < bytes.len() && matches!(bytes[j], b'e' | b'E') {
            let mut k = j + 1;
            if k < bytes.len() && matches!(bytes[k], b'+' | b'-') {
                k += 1;
            }
            let exp_digits = k;
            while k < bytes.len() && bytes[k].is_ascii_digit() {
                k += 1;
            }
            if k > exp_digits {
                j = k;
            }
        }

        if let Ok(v) = s[start..j].parse::<f64>() {
            out.push(v);
        }
        i = j;
    }
    out
}
