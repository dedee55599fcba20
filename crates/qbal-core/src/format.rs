//! Human-readable throughput formatting for logs and the status table.

const KIB: f64 = 1024.0;
const MIB: f64 = 1024.0 * 1024.0;

/// Formats a bytes-per-second rate as `B/s`, `KB/s` or `MB/s` with two decimals.
pub fn format_speed(bytes_per_sec: f64) -> String {
    if bytes_per_sec >= MIB {
        format!("{:.2} MB/s", bytes_per_sec / MIB)
    } else if bytes_per_sec >= KIB {
        format!("{:.2} KB/s", bytes_per_sec / KIB)
    } else {
        format!("{:.2} B/s", bytes_per_sec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_range() {
        assert_eq!(format_speed(0.0), "0.00 B/s");
        assert_eq!(format_speed(512.0), "512.00 B/s");
    }

    #[test]
    fn kilobytes_range() {
        assert_eq!(format_speed(1024.0), "1.00 KB/s");
        assert_eq!(format_speed(150.0 * 1024.0), "150.00 KB/s");
    }

    #[test]
    fn megabytes_range() {
        assert_eq!(format_speed(1024.0 * 1024.0), "1.00 MB/s");
        assert_eq!(format_speed(2.5 * 1024.0 * 1024.0), "2.50 MB/s");
    }
}
