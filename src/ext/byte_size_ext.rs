const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Human readable size with binary (1024) steps.
pub fn format_bytes(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut unit = 0;
    let mut threshold = 1024u64;
    while unit < UNITS.len() - 1 && bytes >= threshold {
        unit += 1;
        threshold = threshold.saturating_mul(1024);
    }

    if unit == 0 {
        format!("{bytes} B")
    } else {
        let value = bytes as f64 / 1024f64.powi(unit as i32);
        format!("{value:.1} {}", UNITS[unit])
    }
}

pub trait ByteSizeExt {
    fn format_bytes(&self) -> String;
}

impl ByteSizeExt for u64 {
    fn format_bytes(&self) -> String {
        format_bytes(*self)
    }
}
