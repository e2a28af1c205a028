use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::path::PathBuf;

use chrono::{Local, NaiveTime, Timelike};
use xml::attribute::OwnedAttribute;
use xml::reader::EventReader;

use super::InputError;


pub fn xml_parser_from_path(path: &Path) -> Result<EventReader<BufReader<File>>, InputError> {
    let file = File::open(path)?;
    let file = BufReader::new(file);
    Ok(EventReader::new(file))
}

pub fn get_xml_attribute_value<'a>(attributes: &'a [OwnedAttribute], attr_name: &str)
                                   -> Option<&'a str> {
    attributes.iter()
              .find(|attr| attr.name.local_name == attr_name)
              .map(|attr| attr.value.as_str())
}

/// Relative paths in a config file are taken relative to the directory holding it.
pub fn str_to_absolute_path(path_str: &str, default_base_dir: &Path) -> PathBuf {
    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        path
    } else {
        default_base_dir.join(path)
    }
}

/// Parses an `HH:MM:SS` (or `HH:MM`) clock time into seconds since midnight.
pub fn get_num_seconds_from_time_str(timestr: &str) -> Result<u32, InputError> {
    let timestr = timestr.trim();
    let time = NaiveTime::parse_from_str(timestr, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(timestr, "%H:%M"))
        .map_err(|err| InputError::InvalidValue {
            field: String::from("clock time"),
            value: timestr.to_string(),
            reason: err.to_string(),
        })?;
    Ok(time.num_seconds_from_midnight())
}

/// Seconds since midnight of midnight on the current local date.
pub fn midnight_today_s() -> u32 {
    Local::now().date_naive()
                .and_hms_opt(0, 0, 0)
                .map_or(0, |midnight| midnight.time().num_seconds_from_midnight())
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_str_parsing() {
        assert_eq!(get_num_seconds_from_time_str("00:00:00").unwrap(), 0);
        assert_eq!(get_num_seconds_from_time_str("08:30:15").unwrap(), 8 * 3600 + 30 * 60 + 15);
        assert_eq!(get_num_seconds_from_time_str(" 17:45 ").unwrap(), 17 * 3600 + 45 * 60);
        assert!(matches!(get_num_seconds_from_time_str("quarter past eight"),
                         Err(InputError::InvalidValue { .. })));
        assert_eq!(midnight_today_s(), 0);
    }

    #[test]
    fn test_absolute_path() {
        let base = Path::new("/data/inputs");
        assert_eq!(str_to_absolute_path("demands.xml", base),
                   PathBuf::from("/data/inputs/demands.xml"));
        assert_eq!(str_to_absolute_path("/tmp/zones.csv", base), PathBuf::from("/tmp/zones.csv"));
    }
}
