pub const DATE_FMT: &str = "%Y-%m-%dT%H:%M:%S%.f";

pub mod serializer {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use serde::de::Error;
    use crate::utils::date::DATE_FMT;

    pub fn serialize<S: Serializer>(time: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        time_to_json(*time).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let str_time: String = Deserialize::deserialize(deserializer)?;
        let time = NaiveDateTime::parse_from_str(&str_time, DATE_FMT).map_err(D::Error::custom)?;
        Ok(time)
    }

    fn time_to_json(t: NaiveDateTime) -> String {
        format!("{}", t.format(DATE_FMT))
    }
}

// Whole days between two timestamps at calendar-day granularity; the time of
// day on either side is ignored so a loan taken at 23:59 ages the same as one
// taken at 00:01.
pub fn days_between(from: chrono::NaiveDateTime, to: chrono::NaiveDateTime) -> i64 {
    to.date().signed_duration_since(from.date()).num_days()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDateTime;
    use crate::utils::date::{days_between, DATE_FMT};

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, DATE_FMT).unwrap()
    }

    #[tokio::test]
    async fn test_should_count_whole_days() {
        assert_eq!(14, days_between(ts("2023-04-01T10:00:00.0"), ts("2023-04-15T09:00:00.0")));
        assert_eq!(0, days_between(ts("2023-04-01T00:01:00.0"), ts("2023-04-01T23:59:00.0")));
    }

    #[tokio::test]
    async fn test_should_ignore_time_of_day() {
        // late evening to early morning still counts as one day
        assert_eq!(1, days_between(ts("2023-04-01T23:59:00.0"), ts("2023-04-02T00:01:00.0")));
    }

    #[tokio::test]
    async fn test_should_count_negative_days() {
        assert_eq!(-3, days_between(ts("2023-04-10T12:00:00.0"), ts("2023-04-07T12:00:00.0")));
    }
}
