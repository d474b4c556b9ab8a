//! Classification of the short codes used in the InfraLCA sheet.

use infralca_records::{Standard, SubType, Unit};

use crate::error::{CodeKind, ExportError, Result};

/// Data type codes of the sheet's "Datatype" column.
///
/// The same column drives both the standard and the subtype of an EPD, so
/// both projections are defined on this one enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataTypeCode {
    /// `R`
    R,
    /// `R13`
    R13,
    /// `R,R13` and its spelling variants
    RAndR13,
    /// `D`
    D,
    /// `D13`
    D13,
    /// `Komb` / `Komb.`
    Komb,
    /// `Komb13`
    Komb13,
    /// `S`
    S,
    /// `E`
    E,
    /// `T`
    T,
}

impl DataTypeCode {
    pub const ALL: [DataTypeCode; 10] = [
        Self::R,
        Self::R13,
        Self::RAndR13,
        Self::D,
        Self::D13,
        Self::Komb,
        Self::Komb13,
        Self::S,
        Self::E,
        Self::T,
    ];

    /// Match a raw code. Only the `Komb` spellings are trimmed first; every
    /// other code has to match exactly.
    pub fn parse(raw: &str) -> Option<Self> {
        let code = match raw {
            "R" => Self::R,
            "R13" => Self::R13,
            "R,R13" | "R, R13" | "RD,  R13" => Self::RAndR13,
            "D" => Self::D,
            "D13" => Self::D13,
            "Komb13" => Self::Komb13,
            "S" => Self::S,
            "E" => Self::E,
            "T" => Self::T,
            other if matches!(other.trim(), "Komb." | "Komb") => Self::Komb,
            _ => return None,
        };
        Some(code)
    }

    pub fn standard(self) -> Standard {
        match self {
            Self::R | Self::D | Self::Komb => Standard::En15804A2,
            Self::R13 | Self::RAndR13 | Self::D13 | Self::Komb13 => Standard::En15804A1,
            Self::S | Self::E | Self::T => Standard::Unknown,
        }
    }

    pub fn subtype(self) -> SubType {
        match self {
            Self::R | Self::R13 | Self::RAndR13 => SubType::Representative,
            Self::D | Self::D13 | Self::Komb | Self::Komb13 | Self::T => SubType::Generic,
            Self::S | Self::E => SubType::Industry,
        }
    }
}

pub fn standard_from_code(raw: Option<&str>) -> Result<Standard> {
    match raw {
        None => Ok(Standard::Unknown),
        Some(code) => DataTypeCode::parse(code)
            .map(DataTypeCode::standard)
            .ok_or_else(|| unknown(CodeKind::Standard, code)),
    }
}

pub fn subtype_from_code(raw: Option<&str>) -> Result<SubType> {
    match raw {
        None => Ok(SubType::Generic),
        Some(code) => DataTypeCode::parse(code)
            .map(DataTypeCode::subtype)
            .ok_or_else(|| unknown(CodeKind::SubType, code)),
    }
}

pub fn unit_from_code(raw: Option<&str>) -> Result<Unit> {
    let Some(code) = raw else {
        return Ok(Unit::Unknown);
    };

    match code {
        "t" => Ok(Unit::Tones),
        "kg" => Ok(Unit::Kg),
        "m" => Ok(Unit::M),
        "m2" => Ok(Unit::M2),
        "m³" => Ok(Unit::M3),
        "stk" | "stk." => Ok(Unit::Pcs),
        "kWh" => Ok(Unit::Kwh),
        "l" => Ok(Unit::L),
        "tkm" => Ok(Unit::TonesKm),
        other => Err(unknown(CodeKind::Unit, other)),
    }
}

fn unknown(kind: CodeKind, code: &str) -> ExportError {
    ExportError::UnknownCode {
        kind,
        code: code.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    /// Every spelling found in the sheet with its expected classification.
    const DATA_TYPES: &[(&str, Standard, SubType)] = &[
        ("R", Standard::En15804A2, SubType::Representative),
        ("R13", Standard::En15804A1, SubType::Representative),
        ("R,R13", Standard::En15804A1, SubType::Representative),
        ("R, R13", Standard::En15804A1, SubType::Representative),
        ("RD,  R13", Standard::En15804A1, SubType::Representative),
        ("D", Standard::En15804A2, SubType::Generic),
        ("D13", Standard::En15804A1, SubType::Generic),
        ("Komb.", Standard::En15804A2, SubType::Generic),
        ("Komb", Standard::En15804A2, SubType::Generic),
        (" Komb. ", Standard::En15804A2, SubType::Generic),
        ("Komb13", Standard::En15804A1, SubType::Generic),
        ("S", Standard::Unknown, SubType::Industry),
        ("E", Standard::Unknown, SubType::Industry),
        ("T", Standard::Unknown, SubType::Generic),
    ];

    #[test]
    fn classifies_every_data_type_code() {
        for &(code, standard, subtype) in DATA_TYPES {
            assert_eq!(
                standard_from_code(Some(code)).unwrap(),
                standard,
                "standard of {code:?}"
            );
            assert_eq!(
                subtype_from_code(Some(code)).unwrap(),
                subtype,
                "subtype of {code:?}"
            );
        }
    }

    #[test]
    fn missing_data_type_is_unknown_generic() {
        assert_eq!(standard_from_code(None).unwrap(), Standard::Unknown);
        assert_eq!(subtype_from_code(None).unwrap(), SubType::Generic);
    }

    #[test]
    fn unknown_data_types_fail_in_both_tables() {
        for code in ["X", "r", "R13 ", "R,  R13", "Komb14", "", " "] {
            let standard = standard_from_code(Some(code)).unwrap_err();
            let subtype = subtype_from_code(Some(code)).unwrap_err();
            assert!(
                matches!(standard, ExportError::UnknownCode { kind: CodeKind::Standard, code: ref found } if found == code),
                "{code:?}"
            );
            assert!(
                matches!(subtype, ExportError::UnknownCode { kind: CodeKind::SubType, .. }),
                "{code:?}"
            );
        }
    }

    #[test]
    fn standard_and_subtype_tables_cover_the_same_codes() {
        for code in DataTypeCode::ALL {
            let (standard, subtype) = (code.standard(), code.subtype());
            if subtype == SubType::Representative {
                assert_ne!(standard, Standard::Unknown, "{code:?}");
            }
            if subtype == SubType::Industry {
                assert_eq!(standard, Standard::Unknown, "{code:?}");
            }
        }

        // Every code the sheet uses maps onto the enum, and every variant is used.
        let parsed: HashSet<DataTypeCode> = DATA_TYPES
            .iter()
            .map(|(raw, ..)| DataTypeCode::parse(raw).unwrap())
            .collect();
        assert_eq!(parsed, HashSet::from(DataTypeCode::ALL));
    }

    #[test]
    fn classifies_units() {
        let cases = [
            ("t", Unit::Tones),
            ("kg", Unit::Kg),
            ("m", Unit::M),
            ("m2", Unit::M2),
            ("m³", Unit::M3),
            ("stk", Unit::Pcs),
            ("stk.", Unit::Pcs),
            ("kWh", Unit::Kwh),
            ("l", Unit::L),
            ("tkm", Unit::TonesKm),
        ];
        for (code, unit) in cases {
            assert_eq!(unit_from_code(Some(code)).unwrap(), unit, "{code:?}");
        }
        assert_eq!(unit_from_code(None).unwrap(), Unit::Unknown);
    }

    #[test]
    fn unknown_units_fail() {
        for code in ["m3", "KG", "pcs", "kwh", " t"] {
            let err = unit_from_code(Some(code)).unwrap_err();
            assert!(
                matches!(err, ExportError::UnknownCode { kind: CodeKind::Unit, .. }),
                "{code:?}"
            );
        }
    }
}
