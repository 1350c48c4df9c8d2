use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// VAR_KEYS grammar
// ---------------------------------------------------------------------------

/// Prefix of the variable-keyword family holding radiometric calibration
/// factors.
pub const RADCAL_PREFIX: &str = "RADCAL";

/// One `extname;key1,key2,...` group from a `VAR_KEYS` header value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarKeysGroup {
    /// Extension name of the binary table holding the listed columns.
    pub extname: String,
    /// Column names (TTYPE values) within that table.
    pub keys: Vec<String>,
}

/// Location of the radiometric-calibration column named by a `VAR_KEYS`
/// value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RadcalColumn {
    /// Extension name of the binary table holding the column.
    pub extname: String,
    /// Column name, e.g. `RADCAL1`.
    pub name: String,
}

/// Parse a `VAR_KEYS` value into structured extension groups.
///
/// The value is a comma-separated token list. A token containing a `;`
/// starts a new group and reads `extname;first-key`; later tokens are
/// further keys of the current group:
///
/// ```text
/// "VARIABLE_KEYWORDS;LAMBDA1,RADCAL1"
/// "EXT_A;K1,K2,EXT_B;K3"
/// ```
///
/// Whitespace around tokens is trimmed and empty tokens are skipped.
pub fn parse_var_keys(value: &str) -> Result<Vec<VarKeysGroup>> {
    let mut groups: Vec<VarKeysGroup> = Vec::new();

    for token in value.split(',') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }

        match token.matches(';').count() {
            0 => match groups.last_mut() {
                Some(group) => group.keys.push(token.to_string()),
                None => {
                    return Err(Error::VarKeys(format!(
                        "key '{token}' appears before any extension name"
                    )));
                }
            },
            1 => {
                if let Some((extname, key)) = token.split_once(';') {
                    let extname = extname.trim();
                    if extname.is_empty() {
                        return Err(Error::VarKeys(format!(
                            "empty extension name in token '{token}'"
                        )));
                    }
                    let key = key.trim();
                    let keys = if key.is_empty() {
                        Vec::new()
                    } else {
                        vec![key.to_string()]
                    };
                    groups.push(VarKeysGroup {
                        extname: extname.to_string(),
                        keys,
                    });
                }
            }
            _ => {
                return Err(Error::VarKeys(format!(
                    "token '{token}' contains more than one ';'"
                )));
            }
        }
    }

    if groups.is_empty() {
        return Err(Error::VarKeys("no extension groups found".to_string()));
    }
    Ok(groups)
}

/// Resolve the single radiometric-calibration column named by a `VAR_KEYS`
/// value.
///
/// Exactly one key starting with `RADCAL` must be listed across all groups;
/// zero or several is a malformed header.
pub fn resolve_radcal_column(var_keys: &str) -> Result<RadcalColumn> {
    let groups = parse_var_keys(var_keys)?;

    let mut found: Option<RadcalColumn> = None;
    for group in &groups {
        for key in &group.keys {
            if !key.starts_with(RADCAL_PREFIX) {
                continue;
            }
            if found.is_some() {
                return Err(Error::VarKeys(format!(
                    "more than one {RADCAL_PREFIX} key listed"
                )));
            }
            found = Some(RadcalColumn {
                extname: group.extname.clone(),
                name: key.clone(),
            });
        }
    }

    found.ok_or_else(|| Error::VarKeys(format!("no {RADCAL_PREFIX} key listed")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_single_group() {
        let groups = parse_var_keys("VARIABLE_KEYWORDS;LAMBDA1,RADCAL1").unwrap();
        assert_eq!(
            groups,
            vec![VarKeysGroup {
                extname: "VARIABLE_KEYWORDS".to_string(),
                keys: vec!["LAMBDA1".to_string(), "RADCAL1".to_string()],
            }]
        );
    }

    #[test]
    fn parses_multiple_groups() {
        let groups = parse_var_keys("EXT_A;K1,K2,EXT_B;K3").unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].extname, "EXT_A");
        assert_eq!(groups[0].keys, vec!["K1", "K2"]);
        assert_eq!(groups[1].extname, "EXT_B");
        assert_eq!(groups[1].keys, vec!["K3"]);
    }

    #[test]
    fn trims_whitespace() {
        let groups = parse_var_keys(" VARIABLE_KEYWORDS ; RADCAL1 , LAMBDA1 ").unwrap();
        assert_eq!(groups[0].extname, "VARIABLE_KEYWORDS");
        assert_eq!(groups[0].keys, vec!["RADCAL1", "LAMBDA1"]);
    }

    #[test]
    fn rejects_empty_value() {
        assert!(matches!(parse_var_keys(""), Err(Error::VarKeys(_))));
        assert!(matches!(parse_var_keys(" , "), Err(Error::VarKeys(_))));
    }

    #[test]
    fn rejects_key_before_extension() {
        assert!(matches!(
            parse_var_keys("RADCAL1,VARIABLE_KEYWORDS;LAMBDA1"),
            Err(Error::VarKeys(_))
        ));
    }

    #[test]
    fn rejects_doubled_separator() {
        assert!(matches!(
            parse_var_keys("EXT;K1;K2"),
            Err(Error::VarKeys(_))
        ));
    }

    #[test]
    fn rejects_empty_extension_name() {
        assert!(matches!(
            parse_var_keys(";RADCAL1"),
            Err(Error::VarKeys(_))
        ));
    }

    #[test]
    fn resolves_real_world_value() {
        let column = resolve_radcal_column("VARIABLE_KEYWORDS;RADCAL1").unwrap();
        assert_eq!(column.extname, "VARIABLE_KEYWORDS");
        assert_eq!(column.name, "RADCAL1");
    }

    #[test]
    fn resolves_across_groups() {
        let column = resolve_radcal_column("EXT_A;K1,K2,EXT_B;RADCAL2,K3").unwrap();
        assert_eq!(column.extname, "EXT_B");
        assert_eq!(column.name, "RADCAL2");
    }

    #[test]
    fn rejects_missing_radcal_key() {
        assert!(matches!(
            resolve_radcal_column("VARIABLE_KEYWORDS;LAMBDA1,WAVCORR1"),
            Err(Error::VarKeys(_))
        ));
    }

    #[test]
    fn rejects_duplicate_radcal_in_group() {
        assert!(matches!(
            resolve_radcal_column("VARIABLE_KEYWORDS;RADCAL1,RADCAL2"),
            Err(Error::VarKeys(_))
        ));
    }

    #[test]
    fn rejects_duplicate_radcal_across_groups() {
        assert!(matches!(
            resolve_radcal_column("EXT_A;RADCAL1,EXT_B;RADCAL2"),
            Err(Error::VarKeys(_))
        ));
    }

    #[test]
    fn bare_radcal_name_matches() {
        let column = resolve_radcal_column("VARIABLE_KEYWORDS;RADCAL").unwrap();
        assert_eq!(column.name, "RADCAL");
    }
}
