use time::{format_description::well_known::Rfc3339, Duration, OffsetDateTime, PrimitiveDateTime};

pub(crate) fn primitive_now_utc() -> PrimitiveDateTime {
    let now = OffsetDateTime::now_utc();
    PrimitiveDateTime::new(now.date(), now.time())
}

/// Current time, but strictly after `previous`. Keeps `updated_at` moving forward
/// when two writes land within the clock's resolution.
pub(crate) fn now_after(previous: PrimitiveDateTime) -> PrimitiveDateTime {
    let now = primitive_now_utc();
    if now > previous {
        now
    } else {
        previous + Duration::microseconds(1)
    }
}

pub(crate) fn format_primitive(value: PrimitiveDateTime) -> String {
    value.assume_utc().format(&Rfc3339).unwrap_or_else(|_| value.assume_utc().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::{Date, Time};

    #[test]
    fn format_primitive_outputs_utc_z() {
        let date = Date::from_calendar_date(2025, time::Month::January, 2).unwrap();
        let time = Time::from_hms(10, 20, 30).unwrap();
        let value = PrimitiveDateTime::new(date, time);
        assert_eq!(format_primitive(value), "2025-01-02T10:20:30Z");
    }

    #[test]
    fn now_after_never_returns_an_earlier_instant() {
        let future = primitive_now_utc() + Duration::hours(1);
        let bumped = now_after(future);
        assert!(bumped > future);

        let past = primitive_now_utc() - Duration::hours(1);
        assert!(now_after(past) > past);
    }
}
