use crate::div_rem::FloorDivMod;
use crate::gregorian::{self, CycleDate};

const SECONDS_PER_DAY: i64 = 86_400;
const SECONDS_PER_HOUR: i32 = 3600;
/// Rule times default to 02:00 local.
const DEFAULT_RULE_TIME: i32 = 2 * SECONDS_PER_HOUR;
/// Rule times may reach into the following week.
const MAX_HOURS: i32 = 167;

/// A POSIX TZ string such as `CET-1CEST,M3.5.0,M10.5.0/3`, as carried in the footer of
/// version 2+ TZif files. It describes the offsets after the last stored transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PosixTz {
    /// Seconds east of UTC. POSIX writes offsets west of Greenwich; they are flipped on parse.
    std_offset: i32,
    dst: Option<DstRule>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct DstRule {
    offset: i32,
    /// Start of summer time, in standard local time.
    start: RuleDate,
    start_time: i32,
    /// End of summer time, in summer local time.
    end: RuleDate,
    end_time: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RuleDate {
    /// `Jn`: day 1-365, February 29 is never counted.
    Julian(u16),
    /// `n`: day 0-365, counting February 29.
    ZeroBased(u16),
    /// `Mm.w.d`: weekday `d` (0 = Sunday) of week `w` (5 = last) of month `m`.
    MonthWeekDay { month: u8, week: u8, weekday: u8 },
}

impl RuleDate {
    fn epoch_day(self, year: i64) -> i64 {
        let new_year = CycleDate::from_date(year, 1, 1).to_epoch_day();
        match self {
            RuleDate::Julian(day) => {
                let day = day as i64;
                let leap_day = if gregorian::is_leap_year(year) && day >= 60 {
                    1
                } else {
                    0
                };
                new_year + day - 1 + leap_day
            }
            RuleDate::ZeroBased(day) => new_year + day as i64,
            RuleDate::MonthWeekDay {
                month,
                week,
                weekday,
            } => {
                let first = CycleDate::from_date(year, month, 1).to_epoch_day();
                // 1970-01-01 was a Thursday.
                let (_, first_weekday) = (first + 4).floor_div_mod(7);
                let (_, skip) = (weekday as i64 - first_weekday).floor_div_mod(7);
                let mut day = first + skip + (week as i64 - 1) * 7;
                if day >= first + gregorian::days_in_month(year, month) as i64 {
                    day -= 7;
                }
                day
            }
        }
    }
}

impl PosixTz {
    pub(crate) fn parse(tz: &str) -> Option<PosixTz> {
        let mut cursor = Cursor(tz);
        cursor.name()?;
        let std_offset = -cursor.offset()?;
        if cursor.is_empty() {
            return Some(PosixTz {
                std_offset,
                dst: None,
            });
        }

        cursor.name()?;
        let dst_offset = match cursor.peek() {
            Some(c) if c.is_ascii_digit() || c == '+' || c == '-' => -cursor.offset()?,
            _ => std_offset + SECONDS_PER_HOUR,
        };
        if cursor.is_empty() {
            // No rule to say when summer time applies.
            return Some(PosixTz {
                std_offset,
                dst: None,
            });
        }

        cursor.expect(',')?;
        let (start, start_time) = cursor.rule()?;
        cursor.expect(',')?;
        let (end, end_time) = cursor.rule()?;
        if !cursor.is_empty() {
            return None;
        }

        Some(PosixTz {
            std_offset,
            dst: Some(DstRule {
                offset: dst_offset,
                start,
                start_time,
                end,
                end_time,
            }),
        })
    }

    #[cfg(test)]
    pub(crate) fn std_offset(&self) -> i32 {
        self.std_offset
    }

    pub(crate) fn offset_at(&self, epoch_second: i64) -> i32 {
        let dst = match &self.dst {
            Some(dst) => dst,
            None => return self.std_offset,
        };

        let local_second = epoch_second.saturating_add(self.std_offset as i64);
        let (local_day, _) = local_second.floor_div_mod(SECONDS_PER_DAY);
        let (year, _, _) = CycleDate::from_epoch_day(local_day).to_date();
        let start = dst.start.epoch_day(year) * SECONDS_PER_DAY + dst.start_time as i64
            - self.std_offset as i64;
        let end =
            dst.end.epoch_day(year) * SECONDS_PER_DAY + dst.end_time as i64 - dst.offset as i64;

        let in_dst = if start <= end {
            start <= epoch_second && epoch_second < end
        } else {
            // Southern hemisphere: summer time spans the new year.
            epoch_second < end || start <= epoch_second
        };
        if in_dst {
            dst.offset
        } else {
            self.std_offset
        }
    }
}

struct Cursor<'a>(&'a str);

impl<'a> Cursor<'a> {
    fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn peek(&self) -> Option<char> {
        self.0.chars().next()
    }

    fn expect(&mut self, c: char) -> Option<()> {
        self.0 = self.0.strip_prefix(c)?;
        Some(())
    }

    fn take_while(&mut self, f: impl Fn(char) -> bool) -> &'a str {
        let end = self.0.find(|c: char| !f(c)).unwrap_or(self.0.len());
        let (taken, rest) = self.0.split_at(end);
        self.0 = rest;
        taken
    }

    /// `EST` or `<-05>`.
    fn name(&mut self) -> Option<&'a str> {
        let name = if self.expect('<').is_some() {
            let name = self.take_while(|c| c.is_ascii_alphanumeric() || c == '+' || c == '-');
            self.expect('>')?;
            name
        } else {
            self.take_while(|c| c.is_ascii_alphabetic())
        };
        if name.is_empty() {
            None
        } else {
            Some(name)
        }
    }

    fn number(&mut self) -> Option<i32> {
        self.take_while(|c| c.is_ascii_digit()).parse().ok()
    }

    /// `[+-]hh[:mm[:ss]]` in seconds, with the sign as written.
    fn offset(&mut self) -> Option<i32> {
        let sign = match self.peek() {
            Some('-') => {
                self.0 = &self.0[1..];
                -1
            }
            Some('+') => {
                self.0 = &self.0[1..];
                1
            }
            _ => 1,
        };
        let hours = self.number()?;
        if hours > MAX_HOURS {
            return None;
        }
        let mut seconds = hours * SECONDS_PER_HOUR;
        for scale in [60, 1] {
            if self.expect(':').is_none() {
                break;
            }
            match self.number()? {
                part @ 0..=59 => seconds += part * scale,
                _ => return None,
            }
        }
        Some(sign * seconds)
    }

    /// `date[/time]`.
    fn rule(&mut self) -> Option<(RuleDate, i32)> {
        let date = if self.expect('J').is_some() {
            match self.number()? {
                day @ 1..=365 => RuleDate::Julian(day as u16),
                _ => return None,
            }
        } else if self.expect('M').is_some() {
            let month = self.number()?;
            self.expect('.')?;
            let week = self.number()?;
            self.expect('.')?;
            let weekday = self.number()?;
            let valid = (1..=12).contains(&month)
                && (1..=5).contains(&week)
                && (0..=6).contains(&weekday);
            if !valid {
                return None;
            }
            RuleDate::MonthWeekDay {
                month: month as u8,
                week: week as u8,
                weekday: weekday as u8,
            }
        } else {
            match self.number()? {
                day @ 0..=365 => RuleDate::ZeroBased(day as u16),
                _ => return None,
            }
        };
        let time = if self.expect('/').is_some() {
            self.offset()?
        } else {
            DEFAULT_RULE_TIME
        };
        Some((date, time))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_offsets() {
        let std = |tz: &str| PosixTz::parse(tz).map(|tz| tz.std_offset());
        assert_eq!(std("UTC0"), Some(0));
        assert_eq!(std("CET-1CEST,M3.5.0,M10.5.0/3"), Some(3600));
        assert_eq!(std("EST5EDT,M3.2.0,M11.1.0"), Some(-18_000));
        assert_eq!(std("<-05>5"), Some(-18_000));
        assert_eq!(std("<+0545>-5:45"), Some(20_700));
        assert_eq!(std("<+1030>-10:30<+11>-11,M10.1.0,M4.1.0"), Some(37_800));
        assert_eq!(std(""), None);
        assert_eq!(std("<oops"), None);
        assert_eq!(std("CET-1CEST,M3.5.0"), None);
        assert_eq!(std("CET-1CEST,M13.5.0,M10.5.0"), None);
    }

    #[test]
    fn central_europe() {
        let tz = PosixTz::parse("CET-1CEST,M3.5.0,M10.5.0/3").unwrap();
        // 2025-03-30T01:00:00Z and 2025-10-26T01:00:00Z.
        assert_eq!(tz.offset_at(1_743_296_399), 3600);
        assert_eq!(tz.offset_at(1_743_296_400), 7200);
        assert_eq!(tz.offset_at(1_761_440_399), 7200);
        assert_eq!(tz.offset_at(1_761_440_400), 3600);
    }

    #[test]
    fn new_york() {
        let tz = PosixTz::parse("EST5EDT,M3.2.0,M11.1.0").unwrap();
        // 2024-03-10T07:00:00Z and 2024-11-03T06:00:00Z.
        assert_eq!(tz.offset_at(1_710_053_999), -18_000);
        assert_eq!(tz.offset_at(1_710_054_000), -14_400);
        assert_eq!(tz.offset_at(1_730_613_599), -14_400);
        assert_eq!(tz.offset_at(1_730_613_600), -18_000);
        // 2038-07-01T12:00:00Z and 2100-07-01T12:00:00Z.
        assert_eq!(tz.offset_at(2_161_598_400), -14_400);
        assert_eq!(tz.offset_at(4_118_126_400), -14_400);
        // 2024-12-31T12:00:00Z.
        assert_eq!(tz.offset_at(1_735_646_400), -18_000);
    }

    #[test]
    fn sydney_summer_spans_the_new_year() {
        let tz = PosixTz::parse("AEST-10AEDT,M10.1.0,M4.1.0/3").unwrap();
        // 2040-01-15T12:00:00Z and 2040-07-15T12:00:00Z.
        assert_eq!(tz.offset_at(2_210_241_600), 39_600);
        assert_eq!(tz.offset_at(2_225_966_400), 36_000);
        // Summer time ends 2040-03-31T16:00:00Z and starts again 2040-10-06T16:00:00Z.
        assert_eq!(tz.offset_at(2_216_822_399), 39_600);
        assert_eq!(tz.offset_at(2_216_822_400), 36_000);
        assert_eq!(tz.offset_at(2_233_151_999), 36_000);
        assert_eq!(tz.offset_at(2_233_152_000), 39_600);
    }

    #[test]
    fn no_rule_means_standard_time() {
        let tz = PosixTz::parse("<+0545>-5:45").unwrap();
        assert_eq!(tz.offset_at(0), 20_700);
        assert_eq!(tz.offset_at(4_118_126_400), 20_700);
        let tz = PosixTz::parse("EST5EDT").unwrap();
        assert_eq!(tz.offset_at(2_161_598_400), -18_000);
    }

    #[test]
    fn all_year_summer_time() {
        let tz = PosixTz::parse("<+03>-3<+04>,0/0,J365/25").unwrap();
        assert_eq!(tz.offset_at(2_210_241_600), 14_400);
        assert_eq!(tz.offset_at(2_225_966_400), 14_400);
    }

    #[test]
    fn rule_dates() {
        // 2024 is a leap year; epoch day 19723 is 2024-01-01.
        assert_eq!(RuleDate::Julian(60).epoch_day(2024), 19_783);
        assert_eq!(RuleDate::Julian(59).epoch_day(2024), 19_781);
        assert_eq!(RuleDate::ZeroBased(59).epoch_day(2024), 19_782);
        // Last Sunday of March 2025 is the 30th.
        let last_sunday = RuleDate::MonthWeekDay {
            month: 3,
            week: 5,
            weekday: 0,
        };
        assert_eq!(
            last_sunday.epoch_day(2025),
            CycleDate::from_date(2025, 3, 30).to_epoch_day()
        );
        // 2040-04-01 is itself the first Sunday.
        let first_sunday = RuleDate::MonthWeekDay {
            month: 4,
            week: 1,
            weekday: 0,
        };
        assert_eq!(
            first_sunday.epoch_day(2040),
            CycleDate::from_date(2040, 4, 1).to_epoch_day()
        );
    }
}
