//! Compact number display: `950`, `1.5K`, `12M`, `3.2Qa`.

const SUFFIXES: [&str; 12] = [
    "", "K", "M", "B", "T", "Qa", "Qi", "Sx", "Sp", "Oc", "No", "Dc",
];

/// Totals and costs. Below 1000 the value is floored; above, it is scaled to
/// the largest suffix and shown with one decimal, dropping a trailing `.0`.
pub fn format_number(n: f64) -> String {
    if !n.is_finite() {
        return if n.is_nan() { "0".to_string() } else { "∞".to_string() };
    }
    if n < 0.0 {
        return format!("-{}", format_number(-n));
    }
    if n < 1000.0 {
        return format!("{}", n.floor() as u64);
    }

    let mut exp = 0;
    let mut scaled = n;
    while scaled >= 1000.0 && exp < SUFFIXES.len() - 1 {
        scaled /= 1000.0;
        exp += 1;
    }
    // 999.96K rounds to "1000.0"; carry into the next suffix
    let mut tenths = (scaled * 10.0).round();
    if tenths >= 10_000.0 && exp < SUFFIXES.len() - 1 {
        exp += 1;
        tenths = (scaled / 1000.0 * 10.0).round();
    }

    let whole = (tenths / 10.0).floor();
    let frac = tenths - whole * 10.0;
    if frac == 0.0 {
        format!("{}{}", whole, SUFFIXES[exp])
    } else {
        format!("{}.{}{}", whole, frac, SUFFIXES[exp])
    }
}

/// Per-second and per-click rates. Small rates keep one decimal so a single
/// intern (0.5/s) does not read as zero.
pub fn format_rate(n: f64) -> String {
    if n.is_finite() && n.abs() < 1000.0 {
        let s = format!("{:.1}", n);
        s.strip_suffix(".0").map(str::to_string).unwrap_or(s)
    } else {
        format_number(n)
    }
}
