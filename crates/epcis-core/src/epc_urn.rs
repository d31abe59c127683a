//! EPC pure-identity URN codec (`urn:epc:id:*`, `urn:epc:class:lgtin`, `urn:epc:idpat:*`).

use crate::errors::ResolveError;
use crate::gs1::{
    check_digit, is_digits, is_valid_company_prefix_len, percent_decode, percent_encode,
    Gs1Key, Gs1Settings, Scheme, URN_RESERVED,
};

const TARGET: &str = "EPC URN";

/// Result of parsing an `urn:epc:` literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ParsedUrn {
    /// A GS1 key with a Digital Link equivalent.
    Gs1(Gs1Key),
    /// An EPC URN outside the GS1 key space (`gid`, `usdod`, `adi`, `bic`, ...).
    Other { scheme: String },
}

/// Parses an EPC URN. Returns `Ok(None)` when the literal is not an EPC URN.
pub(crate) fn parse_epc_urn(literal: &str) -> Result<Option<ParsedUrn>, ResolveError> {
    let Some(rest) = literal.strip_prefix("urn:epc:") else {
        return Ok(None);
    };
    let mut parts = rest.splitn(3, ':');
    let (Some(namespace), Some(name), Some(body)) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(ResolveError::invalid_identifier(
            literal,
            "expected urn:epc:<namespace>:<scheme>:<body>",
        ));
    };

    let scheme = match (namespace, name) {
        ("id", "sgtin") => Scheme::Sgtin,
        ("id", "sscc") => Scheme::Sscc,
        ("id", "sgln") => Scheme::Sgln,
        ("id", "grai") => Scheme::Grai,
        ("id", "giai") => Scheme::Giai,
        ("id", "gsrn") => Scheme::Gsrn,
        ("id", "gsrnp") => Scheme::Gsrnp,
        ("id", "gdti") => Scheme::Gdti,
        ("id", "cpi") => Scheme::Cpi,
        ("id", "sgcn") => Scheme::Sgcn,
        ("id", "ginc") => Scheme::Ginc,
        ("id", "gsin") => Scheme::Gsin,
        ("id", "itip") => Scheme::Itip,
        ("id", "upui") => Scheme::Upui,
        ("id", "pgln") => Scheme::Pgln,
        ("class", "lgtin") => Scheme::Lgtin,
        ("idpat", "sgtin") => Scheme::GtinClass,
        ("idpat", "grai") => Scheme::GraiClass,
        ("idpat", "gdti") => Scheme::GdtiClass,
        ("idpat", "sgcn") => Scheme::SgcnClass,
        _ => {
            return Ok(Some(ParsedUrn::Other {
                scheme: format!("{}:{}", namespace, name),
            }))
        }
    };

    parse_body(scheme, body, literal).map(|key| Some(ParsedUrn::Gs1(key)))
}

fn component_count(scheme: Scheme) -> usize {
    match scheme {
        Scheme::Sscc
        | Scheme::Giai
        | Scheme::Gsrn
        | Scheme::Gsrnp
        | Scheme::Ginc
        | Scheme::Gsin
        | Scheme::Pgln => 2,
        Scheme::Itip => 5,
        _ => 3,
    }
}

fn parse_body(scheme: Scheme, body: &str, literal: &str) -> Result<Gs1Key, ResolveError> {
    let expected = component_count(scheme);
    // The last component takes the remainder: serials may contain '.'
    let parts: Vec<&str> = body.splitn(expected, '.').collect();
    if parts.len() != expected {
        return Err(ResolveError::invalid_identifier(
            literal,
            format!("{} expects {} dot-separated components", scheme.name(), expected),
        ));
    }

    let company_prefix = parts[0];
    if !is_digits(company_prefix) || !is_valid_company_prefix_len(company_prefix.len()) {
        return Err(ResolveError::invalid_identifier(
            literal,
            "company prefix must be 6 to 12 digits",
        ));
    }
    let reference = parts[1];

    let mut primary = match scheme {
        Scheme::Sgtin | Scheme::Lgtin | Scheme::GtinClass | Scheme::Upui | Scheme::Itip => {
            indicator_key(company_prefix, reference, 13, literal)?
        }
        Scheme::Sscc => indicator_key(company_prefix, reference, 17, literal)?,
        Scheme::Grai | Scheme::GraiClass => {
            format!("0{}", fixed_key(company_prefix, reference, 12, literal)?)
        }
        Scheme::Sgln
        | Scheme::Pgln
        | Scheme::Gdti
        | Scheme::GdtiClass
        | Scheme::Sgcn
        | Scheme::SgcnClass => fixed_key(company_prefix, reference, 12, literal)?,
        Scheme::Gsrn | Scheme::Gsrnp => fixed_key(company_prefix, reference, 17, literal)?,
        Scheme::Gsin => fixed_key(company_prefix, reference, 16, literal)?,
        Scheme::Giai | Scheme::Ginc | Scheme::Cpi => {
            format!("{}{}", company_prefix, percent_decode(reference, literal)?)
        }
    };

    if scheme == Scheme::Itip {
        let (piece, total) = (parts[2], parts[3]);
        if piece.len() != 2 || total.len() != 2 || !is_digits(piece) || !is_digits(total) {
            return Err(ResolveError::invalid_identifier(
                literal,
                "piece and total must be two digits each",
            ));
        }
        primary.push_str(piece);
        primary.push_str(total);
    }

    let serial = match scheme {
        Scheme::Sgtin
        | Scheme::Grai
        | Scheme::Gdti
        | Scheme::Cpi
        | Scheme::Sgcn
        | Scheme::Upui
        | Scheme::Lgtin => Some(percent_decode(parts[2], literal)?),
        Scheme::Itip => Some(percent_decode(parts[4], literal)?),
        Scheme::Sgln => match parts[2] {
            "0" => None,
            extension => Some(percent_decode(extension, literal)?),
        },
        Scheme::GtinClass | Scheme::GraiClass | Scheme::GdtiClass | Scheme::SgcnClass => {
            if parts[2] != "*" {
                return Err(ResolveError::invalid_identifier(
                    literal,
                    "pattern URNs must end in '*'",
                ));
            }
            None
        }
        _ => None,
    };

    let key = Gs1Key {
        scheme,
        primary,
        serial,
        company_prefix_len: Some(company_prefix.len()),
    };
    key.validate(literal)?;
    Ok(key)
}

/// Builds a key whose reference carries a leading indicator/extension digit.
fn indicator_key(
    company_prefix: &str,
    reference: &str,
    data_len: usize,
    literal: &str,
) -> Result<String, ResolveError> {
    if !is_digits(reference) || company_prefix.len() + reference.len() != data_len {
        return Err(ResolveError::invalid_identifier(
            literal,
            format!("company prefix and reference must total {} digits", data_len),
        ));
    }
    let data = format!("{}{}{}", &reference[..1], company_prefix, &reference[1..]);
    let check = check_digit(&data);
    Ok(format!("{}{}", data, check))
}

fn fixed_key(
    company_prefix: &str,
    reference: &str,
    data_len: usize,
    literal: &str,
) -> Result<String, ResolveError> {
    if !reference.bytes().all(|b| b.is_ascii_digit())
        || company_prefix.len() + reference.len() != data_len
    {
        return Err(ResolveError::invalid_identifier(
            literal,
            format!("company prefix and reference must total {} digits", data_len),
        ));
    }
    let data = format!("{}{}", company_prefix, reference);
    let check = check_digit(&data);
    Ok(format!("{}{}", data, check))
}

/// Renders a key as an EPC URN.
///
/// Keys parsed from a URN remember their company prefix length; keys parsed
/// from a Digital Link look it up in `settings`.
pub(crate) fn render_epc_urn(
    key: &Gs1Key,
    settings: &Gs1Settings,
    literal: &str,
) -> Result<String, ResolveError> {
    let scheme = key.scheme;
    let p = key.primary.as_str();
    let offset = scheme.company_prefix_offset();
    let cp_len = key
        .company_prefix_len
        .unwrap_or_else(|| settings.company_prefix_length(&p[offset..]));

    let data_end = match scheme {
        Scheme::Giai | Scheme::Ginc | Scheme::Cpi => p.len(),
        // everything before the check digit
        Scheme::Itip => 13,
        _ => p.len() - 1,
    };
    // GIAI, GINC and CPI need a non-empty reference after the company prefix
    let max_end = match scheme {
        Scheme::Giai | Scheme::Ginc | Scheme::Cpi => data_end.saturating_sub(1),
        _ => data_end,
    };
    let fits = is_valid_company_prefix_len(cp_len)
        && offset + cp_len <= max_end
        && p[offset..offset + cp_len].bytes().all(|b| b.is_ascii_digit());
    if !fits {
        return Err(ResolveError::conversion(
            format!("{} (company prefix length {})", scheme.name(), cp_len),
            literal,
            TARGET,
        ));
    }

    let cp = &p[offset..offset + cp_len];
    let serial = percent_encode(key.serial.as_deref().unwrap_or_default(), URN_RESERVED);
    let indicator_ref = || format!("{}{}", &p[..1], &p[offset + cp_len..data_end]);
    let plain_ref = || p[offset + cp_len..data_end].to_string();

    let body = match scheme {
        Scheme::Sgtin | Scheme::Lgtin | Scheme::Upui => {
            format!("{}.{}.{}", cp, indicator_ref(), serial)
        }
        Scheme::GtinClass => format!("{}.{}.*", cp, indicator_ref()),
        Scheme::Itip => format!(
            "{}.{}.{}.{}.{}",
            cp,
            indicator_ref(),
            &p[14..16],
            &p[16..18],
            serial
        ),
        Scheme::Sscc => format!("{}.{}", cp, indicator_ref()),
        Scheme::Grai | Scheme::Gdti | Scheme::Sgcn => {
            format!("{}.{}.{}", cp, plain_ref(), serial)
        }
        Scheme::GraiClass | Scheme::GdtiClass | Scheme::SgcnClass => {
            format!("{}.{}.*", cp, plain_ref())
        }
        Scheme::Sgln => {
            let extension = if key.serial.is_some() { serial } else { "0".to_string() };
            format!("{}.{}.{}", cp, plain_ref(), extension)
        }
        Scheme::Pgln | Scheme::Gsrn | Scheme::Gsrnp | Scheme::Gsin => {
            format!("{}.{}", cp, plain_ref())
        }
        Scheme::Giai | Scheme::Ginc => {
            format!("{}.{}", cp, percent_encode(&plain_ref(), URN_RESERVED))
        }
        Scheme::Cpi => format!(
            "{}.{}.{}",
            cp,
            percent_encode(&plain_ref(), URN_RESERVED),
            serial
        ),
    };

    let prefix = match scheme {
        Scheme::Lgtin => "urn:epc:class:lgtin:".to_string(),
        Scheme::GtinClass | Scheme::GraiClass | Scheme::GdtiClass | Scheme::SgcnClass => {
            format!("urn:epc:idpat:{}:", scheme.name())
        }
        _ => format!("urn:epc:id:{}:", scheme.name()),
    };
    Ok(format!("{}{}", prefix, body))
}
