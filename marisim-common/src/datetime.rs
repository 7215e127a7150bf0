//! NMEA time and date value types.
//!
//! `NmeaTime` round-trips exactly through the `HHMMSS[.sss]` text encoding
//! and `NmeaDate` through `DDMMYY`.

use std::fmt;

use crate::Error;

/// UTC time of day as carried in NMEA sentences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NmeaTime {
    /// Hour 0-23
    pub hour: u8,
    /// Minute 0-59
    pub minute: u8,
    /// Second 0-59
    pub second: u8,
    /// Fractional milliseconds 0-999
    pub millisecond: u16,
}

impl NmeaTime {
    /// Creates a new time, validating each component.
    pub fn new(hour: u8, minute: u8, second: u8, millisecond: u16) -> Result<Self, Error> {
        if hour > 23 || minute > 59 || second > 59 || millisecond > 999 {
            return Err(Error::Format(format!(
                "invalid time {hour:02}:{minute:02}:{second:02}.{millisecond:03}"
            )));
        }
        Ok(Self {
            hour,
            minute,
            second,
            millisecond,
        })
    }

    /// Parses `HHMMSS` or `HHMMSS.sss`.
    pub fn from_nmea(s: &str) -> Result<Self, Error> {
        let (whole, frac) = match s.split_once('.') {
            Some((w, f)) => (w, Some(f)),
            None => (s, None),
        };
        if whole.len() != 6 || !whole.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::Format(format!("invalid time field: {s:?}")));
        }
        let hour: u8 = whole[0..2].parse().unwrap();
        let minute: u8 = whole[2..4].parse().unwrap();
        let second: u8 = whole[4..6].parse().unwrap();

        let millisecond = match frac {
            Some(f) if !f.is_empty() && f.len() <= 3 && f.bytes().all(|b| b.is_ascii_digit()) => {
                let padded = format!("{f:0<3}");
                padded.parse::<u16>().unwrap()
            }
            Some(_) => return Err(Error::Format(format!("invalid time fraction: {s:?}"))),
            None => 0,
        };

        Self::new(hour, minute, second, millisecond)
    }

    /// Formats as `HHMMSS.sss`, or `HHMMSS` when `include_fractional` is
    /// false.
    pub fn to_nmea(&self, include_fractional: bool) -> String {
        if include_fractional {
            format!(
                "{:02}{:02}{:02}.{:03}",
                self.hour, self.minute, self.second, self.millisecond
            )
        } else {
            format!("{:02}{:02}{:02}", self.hour, self.minute, self.second)
        }
    }

    /// Seconds-of-minute, as used by AIS timestamp fields.
    pub fn seconds_of_minute(&self) -> u8 {
        self.second
    }
}

impl fmt::Display for NmeaTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}.{:03}",
            self.hour, self.minute, self.second, self.millisecond
        )
    }
}

/// UTC date as carried in NMEA sentences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NmeaDate {
    /// Full year (e.g. 2005)
    pub year: u16,
    /// Month 1-12
    pub month: u8,
    /// Day 1-31
    pub day: u8,
}

impl NmeaDate {
    /// Creates a new date, validating the month and day ranges.
    pub fn new(year: u16, month: u8, day: u8) -> Result<Self, Error> {
        if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
            return Err(Error::Format(format!(
                "invalid date {year:04}-{month:02}-{day:02}"
            )));
        }
        Ok(Self { year, month, day })
    }

    /// Parses `DDMMYY`. Two-digit years 70-99 map to 19xx, 00-69 to 20xx.
    pub fn from_nmea(s: &str) -> Result<Self, Error> {
        if s.len() != 6 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::Format(format!("invalid date field: {s:?}")));
        }
        let day: u8 = s[0..2].parse().unwrap();
        let month: u8 = s[2..4].parse().unwrap();
        let yy: u16 = s[4..6].parse().unwrap();
        let year = if yy >= 70 { 1900 + yy } else { 2000 + yy };

        Self::new(year, month, day)
    }

    /// Formats as `DDMMYY`.
    pub fn to_nmea(&self) -> String {
        format!("{:02}{:02}{:02}", self.day, self.month, self.year % 100)
    }
}

impl fmt::Display for NmeaDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}
