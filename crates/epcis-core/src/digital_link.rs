//! GS1 Digital Link codec.
//!
//! Parsing accepts any host (and any path prefix before the primary key);
//! rendering always uses the canonical `https://id.gs1.org` resolver with
//! only the key qualifiers that belong to the identifier, so the canonical
//! output is a fixed point of parse + render.

use crate::errors::ResolveError;
use crate::gs1::{percent_decode, percent_encode, Gs1Key, Scheme, DIGITAL_LINK_RESERVED};
use crate::identifier::EpcFlavor;

/// Canonical Digital Link resolver host.
pub const CANONICAL_HOST: &str = "https://id.gs1.org";

const PRIMARY_AIS: &[&str] = &[
    "00", "01", "253", "255", "401", "402", "414", "417", "8003", "8004", "8006", "8010", "8017",
    "8018",
];

fn path_segments(literal: &str) -> Option<Vec<&str>> {
    let rest = literal
        .strip_prefix("https://")
        .or_else(|| literal.strip_prefix("http://"))?;
    let path = &rest[rest.find('/')?..];
    let path = path.split(['?', '#']).next().unwrap_or(path);
    Some(path.split('/').filter(|s| !s.is_empty()).collect())
}

fn primary_position(segments: &[&str]) -> Option<usize> {
    segments
        .iter()
        .position(|s| PRIMARY_AIS.contains(s))
        .filter(|&idx| idx + 1 < segments.len())
}

/// Cheap syntactic check used for format hints.
pub(crate) fn looks_like_digital_link(literal: &str) -> bool {
    path_segments(literal)
        .map(|segments| primary_position(&segments).is_some())
        .unwrap_or(false)
}

/// Parses a Digital Link URI into a GS1 key of the requested flavor.
///
/// Returns `Ok(None)` for URIs that are not Digital Links at all.
pub(crate) fn parse_digital_link(
    literal: &str,
    flavor: EpcFlavor,
) -> Result<Option<Gs1Key>, ResolveError> {
    let Some(segments) = path_segments(literal) else {
        return Ok(None);
    };
    let Some(start) = primary_position(&segments) else {
        return Ok(None);
    };

    let pairs = &segments[start..];
    if pairs.len() % 2 != 0 {
        return Err(ResolveError::invalid_identifier(
            literal,
            "key qualifiers must come in AI/value pairs",
        ));
    }
    let mut values: Vec<(&str, String)> = Vec::with_capacity(pairs.len() / 2);
    for chunk in pairs.chunks(2) {
        values.push((chunk[0], percent_decode(chunk[1], literal)?));
    }

    let (primary_ai, primary_value) = (values[0].0, values[0].1.clone());
    let qualifier = |ai: &str| {
        values
            .iter()
            .skip(1)
            .find(|(k, _)| *k == ai)
            .map(|(_, v)| v.clone())
    };

    let key = match primary_ai {
        "01" => {
            let gtin = pad_gtin(&primary_value, literal)?;
            match flavor {
                EpcFlavor::Instance => {
                    if let Some(serial) = qualifier("21") {
                        gs1_key(Scheme::Sgtin, gtin, Some(serial))
                    } else if let Some(tpx) = qualifier("235") {
                        gs1_key(Scheme::Upui, gtin, Some(tpx))
                    } else {
                        return Err(ResolveError::conversion(
                            "gtin (class)",
                            literal,
                            "instance identifier",
                        ));
                    }
                }
                EpcFlavor::Class => {
                    if qualifier("21").is_some() || qualifier("235").is_some() {
                        return Err(ResolveError::conversion(
                            "sgtin (instance)",
                            literal,
                            "class identifier",
                        ));
                    }
                    match qualifier("10") {
                        Some(lot) => gs1_key(Scheme::Lgtin, gtin, Some(lot)),
                        None => gs1_key(Scheme::GtinClass, gtin, None),
                    }
                }
            }
        }
        "8003" => split_serial(Scheme::Grai, Scheme::GraiClass, 14, primary_value, flavor, literal)?,
        "253" => split_serial(Scheme::Gdti, Scheme::GdtiClass, 13, primary_value, flavor, literal)?,
        "255" => split_serial(Scheme::Sgcn, Scheme::SgcnClass, 13, primary_value, flavor, literal)?,
        ai => {
            let (scheme, secondary) = match ai {
                "00" => (Scheme::Sscc, None),
                "414" => (Scheme::Sgln, qualifier("254")),
                "417" => (Scheme::Pgln, None),
                "8004" => (Scheme::Giai, None),
                "8017" => (Scheme::Gsrnp, None),
                "8018" => (Scheme::Gsrn, None),
                "401" => (Scheme::Ginc, None),
                "402" => (Scheme::Gsin, None),
                "8006" => (Scheme::Itip, qualifier("21")),
                _ => (Scheme::Cpi, qualifier("8011")),
            };
            if flavor == EpcFlavor::Class {
                return Err(ResolveError::conversion(
                    format!("{} (instance)", scheme.name()),
                    literal,
                    "class identifier",
                ));
            }
            if matches!(scheme, Scheme::Itip | Scheme::Cpi) && secondary.is_none() {
                return Err(ResolveError::conversion(
                    format!("{} (class)", scheme.name()),
                    literal,
                    "instance identifier",
                ));
            }
            gs1_key(scheme, primary_value, secondary)
        }
    };

    key.validate(literal)?;
    Ok(Some(key))
}

fn gs1_key(scheme: Scheme, primary: String, serial: Option<String>) -> Gs1Key {
    Gs1Key {
        scheme,
        primary,
        serial,
        company_prefix_len: None,
    }
}

/// Splits keys whose serial is appended to the numeric part (GRAI, GDTI, SGCN).
fn split_serial(
    instance: Scheme,
    class: Scheme,
    numeric_len: usize,
    value: String,
    flavor: EpcFlavor,
    literal: &str,
) -> Result<Gs1Key, ResolveError> {
    let (Some(numeric), Some(serial)) = (value.get(..numeric_len), value.get(numeric_len..))
    else {
        return Err(ResolveError::invalid_identifier(
            literal,
            format!(
                "AI ({}) needs at least {} digits",
                instance.primary_ai(),
                numeric_len
            ),
        ));
    };
    let serial = (!serial.is_empty()).then(|| serial.to_string());
    match (flavor, serial) {
        (EpcFlavor::Instance, Some(serial)) => Ok(gs1_key(instance, numeric.to_string(), Some(serial))),
        (EpcFlavor::Instance, None) => Err(ResolveError::conversion(
            format!("{} (class)", instance.name()),
            literal,
            "instance identifier",
        )),
        (EpcFlavor::Class, None) => Ok(gs1_key(class, numeric.to_string(), None)),
        (EpcFlavor::Class, Some(_)) => Err(ResolveError::conversion(
            format!("{} (instance)", instance.name()),
            literal,
            "class identifier",
        )),
    }
}

/// GTIN-8, GTIN-12 and GTIN-13 are zero-padded to GTIN-14.
fn pad_gtin(value: &str, literal: &str) -> Result<String, ResolveError> {
    match value.len() {
        8 | 12 | 13 | 14 if value.bytes().all(|b| b.is_ascii_digit()) => {
            Ok(format!("{:0>14}", value))
        }
        _ => Err(ResolveError::invalid_identifier(
            literal,
            "GTIN must be 8, 12, 13 or 14 digits",
        )),
    }
}

/// Renders a key as a canonical Digital Link URI.
pub(crate) fn render_digital_link(key: &Gs1Key) -> String {
    let scheme = key.scheme;
    let mut primary = key.primary.clone();
    if scheme.concatenated_serial() {
        if let Some(serial) = &key.serial {
            primary.push_str(serial);
        }
    }

    let mut out = format!(
        "{}/{}/{}",
        CANONICAL_HOST,
        scheme.primary_ai(),
        percent_encode(&primary, DIGITAL_LINK_RESERVED)
    );
    if let (Some(ai), Some(serial)) = (scheme.secondary_ai(), &key.serial) {
        out.push('/');
        out.push_str(ai);
        out.push('/');
        out.push_str(&percent_encode(serial, DIGITAL_LINK_RESERVED));
    }
    out
}
