use crate::error::{ClientError, Result};

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;

/// Renders an elapsed time for display.
///
/// - under a minute: `"{n} seconds"`
/// - under an hour: `"{m} Minute(s) {s} Seconds"`, or `"{m} Min(s) {s} Sec"` abbreviated
/// - otherwise: `"{h} Hr(s) {m} Min(s)"`, seconds dropped
///
/// The seconds unit never changes with the count ("1 seconds", "1 Sec").
pub fn format_duration(seconds: i64, abbreviated: bool) -> Result<String> {
    if seconds < 0 {
        return Err(ClientError::InvalidInput(format!(
            "duration must be non-negative, got {seconds}"
        )));
    }

    if seconds < MINUTE {
        return Ok(format!("{seconds} seconds"));
    }

    if seconds < HOUR {
        let m = seconds / MINUTE;
        let s = seconds - m * MINUTE;
        return Ok(if abbreviated {
            format!("{m} {} {s} Sec", plural(m, "Min", "Mins"))
        } else {
            format!("{m} {} {s} Seconds", plural(m, "Minute", "Minutes"))
        });
    }

    let h = seconds / HOUR;
    let m = (seconds - h * HOUR) / MINUTE;
    Ok(format!(
        "{h} {} {m} {}",
        plural(h, "Hr", "Hrs"),
        plural(m, "Min", "Mins")
    ))
}

fn plural(n: i64, one: &'static str, many: &'static str) -> &'static str {
    if n == 1 {
        one
    } else {
        many
    }
}
