use osmutil::Tags;

use crate::Options;

const MIN_HEIGHT_KEYS: [&str; 2] = ["min_height", "building:min_height"];
const HEIGHT_KEYS: [&str; 2] = ["height", "building:height"];
const LEVELS_KEY: &str = "building:levels";

/// Parses the loose numbers people write in OSM tags, like "12.5 m", "12,5", or "12;15" (only the
/// first value counts). Returns None for anything else.
pub fn parse_osm_number(raw: &str) -> Option<f64> {
    let mut value = raw.trim().to_lowercase();
    if value.is_empty() {
        return None;
    }
    if value.contains(',') && !value.contains('.') {
        value = value.replace(',', ".");
    }
    if let Some(idx) = value.find(|c: char| c == ';' || c == '|') {
        value.truncate(idx);
    }
    let mut value = value.trim_end();
    if let Some(number) = value.strip_suffix('m') {
        value = number;
    }
    // "inf" and "nan" parse, but aren't heights
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|x| x.is_finite())
}

/// The vertical extent of a building, in meters. `height` is always strictly above `min_height`,
/// and `min_height` is never negative.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Heights {
    pub height: f64,
    pub min_height: f64,
}

pub fn building_height(tags: &Tags, opts: &Options) -> Heights {
    let min_height = tags
        .parse_first(&MIN_HEIGHT_KEYS, parse_osm_number)
        .unwrap_or(0.0)
        .max(0.0);

    let mut height = tags
        .parse_first(&HEIGHT_KEYS, parse_osm_number)
        .or_else(|| {
            tags.get(LEVELS_KEY)
                .and_then(|x| parse_osm_number(x))
                .map(|levels| levels * opts.level_height)
        })
        .unwrap_or(opts.default_height);

    if height <= min_height {
        let mut repaired = min_height + (opts.default_height * 0.25).max(1.0);
        if repaired <= min_height {
            // The bump got lost to rounding, so take the next representable value instead.
            // min_height is finite and never negative here.
            repaired = f64::from_bits(min_height.to_bits() + 1);
        }
        debug!(
            "Height {} isn't above min_height {}, using {}",
            height, min_height, repaired
        );
        height = repaired;
    }

    Heights { height, min_height }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(pairs: &[(&str, &str)]) -> Tags {
        pairs.iter().cloned().collect()
    }

    #[test]
    fn parse_numbers() {
        for (input, expected) in [
            ("12", Some(12.0)),
            ("12.5 m", Some(12.5)),
            ("12.5m", Some(12.5)),
            ("  7 M ", Some(7.0)),
            ("12,5", Some(12.5)),
            ("1,234.5", None),
            ("12;15", Some(12.0)),
            ("12|15", Some(12.0)),
            ("3|4;5", Some(3.0)),
            ("-2", Some(-2.0)),
            ("abc", None),
            ("", None),
            ("   ", None),
            ("m", None),
            ("nan", None),
            ("inf", None),
            (";12", None),
        ] {
            assert_eq!(parse_osm_number(input), expected, "parsing {:?}", input);
        }
    }

    #[test]
    fn height_precedence() {
        let opts = Options::default();
        for (input, height, min_height) in [
            (vec![], 10.0, 0.0),
            (vec![("height", "9m")], 9.0, 0.0),
            (vec![("height", "20"), ("building:height", "30")], 20.0, 0.0),
            (vec![("height", "tall"), ("building:height", "30")], 30.0, 0.0),
            (vec![("building:levels", "5")], 15.0, 0.0),
            (vec![("building:levels", "5"), ("building:height", "12")], 12.0, 0.0),
            (vec![("building:levels", "five")], 10.0, 0.0),
            (vec![("height", "20"), ("min_height", "5")], 20.0, 5.0),
            (
                vec![
                    ("height", "20"),
                    ("min_height", "x"),
                    ("building:min_height", "4"),
                ],
                20.0,
                4.0,
            ),
        ] {
            let h = building_height(&tags(&input), &opts);
            assert_eq!(h.height, height, "for {:?}", input);
            assert_eq!(h.min_height, min_height, "for {:?}", input);
        }
    }

    #[test]
    fn level_height_is_configurable() {
        let opts = Options {
            default_height: 10.0,
            level_height: 4.0,
        };
        let h = building_height(&tags(&[("building:levels", "2.5")]), &opts);
        assert_eq!(h.height, 10.0);
    }

    #[test]
    fn repair_inverted_heights() {
        let opts = Options::default();
        // 10 * 0.25 = 2.5 beats the 1 meter floor
        let h = building_height(&tags(&[("height", "5"), ("min_height", "8")]), &opts);
        assert_eq!(
            h,
            Heights {
                height: 10.5,
                min_height: 8.0
            }
        );

        let h = building_height(&tags(&[("height", "8"), ("min_height", "8")]), &opts);
        assert_eq!(h.height, 10.5);

        // A tiny default height falls back to the 1 meter floor
        let opts = Options {
            default_height: 2.0,
            level_height: 3.0,
        };
        let h = building_height(&tags(&[("min_height", "6")]), &opts);
        assert_eq!(h.height, 7.0);
        assert_eq!(h.min_height, 6.0);
    }

    #[test]
    fn repair_survives_rounding() {
        let h = building_height(&tags(&[("min_height", "1e17")]), &Options::default());
        assert_eq!(h.min_height, 1e17);
        assert!(h.height > h.min_height);

        let h = building_height(
            &tags(&[("height", "2e300"), ("min_height", "3e300")]),
            &Options::default(),
        );
        assert!(h.height > h.min_height);
    }

    #[test]
    fn negative_min_height_is_clamped() {
        let h = building_height(&tags(&[("min_height", "-3")]), &Options::default());
        assert_eq!(h.min_height, 0.0);
        assert_eq!(h.height, 10.0);
    }

    #[test]
    fn always_above_min_height() {
        let opts = Options::default();
        for height in ["-5", "0", "1", "50", "junk"] {
            for min_height in ["-1", "0", "1", "49", "50", "200", "junk"] {
                let h = building_height(
                    &tags(&[("height", height), ("min_height", min_height)]),
                    &opts,
                );
                assert!(h.height > h.min_height);
                assert!(h.min_height >= 0.0);
            }
        }
    }
}
