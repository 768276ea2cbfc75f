// SPDX-License-Identifier: Apache-2.0

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};

#[must_use]
pub fn now_utc() -> DateTime<Utc> {
    Utc::now()
}

#[must_use]
pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}

#[must_use]
pub fn unix_seconds() -> i64 {
    Utc::now().timestamp()
}

#[must_use]
pub fn unix_millis() -> i64 {
    Utc::now().timestamp_millis()
}

#[must_use]
pub fn to_rfc3339(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::{to_rfc3339, unix_millis, unix_seconds};
    use chrono::{TimeZone, Utc};

    #[test]
    fn rfc3339_uses_millis_and_z_suffix() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 45).unwrap();
        assert_eq!(to_rfc3339(ts), "2024-03-01T12:30:45.000Z");
    }

    #[test]
    fn unix_clocks_agree_on_scale() {
        let secs = unix_seconds();
        let millis = unix_millis();
        assert!(millis / 1000 - secs <= 1);
    }
}
